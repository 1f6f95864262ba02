//! Tabular export of a calculation: one row of input echo plus results.

use std::{fs::File, io::Write, path::Path};

use serde::Serialize;
use thiserror::Error;

use crate::domain::{CostInput, CostResult};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON write error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }
}

/// Flat record written to CSV and JSON. Field order is the column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportRow {
    pub incoterm: String,
    pub destination: String,
    pub currency: String,
    pub fx_rate: f64,
    pub unit_price_eur: f64,
    pub quantity: u32,
    pub goods_value_eur: f64,
    pub gross_weight_kg: f64,
    pub volume_m3: f64,
    pub volumetric_weight_kg: f64,
    pub shipping_mode: String,
    pub freight_entry: String,
    pub freight_eur: f64,
    pub insurance_eur: f64,
    pub customs_base_eur: f64,
    pub hs_code: String,
    pub duty_rate: f64,
    pub duty_source: String,
    pub duty_eur: f64,
    pub vat_rate: f64,
    pub vat_eur: f64,
    pub local_fees_eur: f64,
    pub total_landed_eur: f64,
    pub unit_landed_eur: f64,
}

impl ExportRow {
    pub fn new(input: &CostInput, result: &CostResult) -> Self {
        Self {
            incoterm: input.incoterm.label().to_string(),
            destination: input.destination.label().to_string(),
            currency: input.currency.code().to_string(),
            fx_rate: input.fx_rate,
            unit_price_eur: result.unit_price_ref,
            quantity: input.quantity,
            goods_value_eur: result.goods_value,
            gross_weight_kg: input.gross_weight_kg,
            volume_m3: input.volume_m3,
            volumetric_weight_kg: result.volumetric_weight_kg,
            shipping_mode: input.shipping_mode.label().to_string(),
            freight_entry: input.freight_entry.label().to_string(),
            freight_eur: result.freight_amount,
            insurance_eur: result.insurance_amount,
            customs_base_eur: result.customs_base,
            hs_code: input.hs_code.clone(),
            duty_rate: result.duty_rate,
            duty_source: result.duty_source.label().to_string(),
            duty_eur: result.duty_amount,
            vat_rate: result.vat_rate,
            vat_eur: result.vat_amount,
            local_fees_eur: result.local_fees,
            total_landed_eur: result.total,
            unit_landed_eur: result.unit_cost,
        }
    }
}

/// Writes a header line followed by one line per row.
pub fn write_csv(rows: &[ExportRow], writer: impl Write) -> Result<(), ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes the rows as a pretty-printed JSON array of records.
pub fn write_json(rows: &[ExportRow], mut writer: impl Write) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    Ok(())
}

pub fn write_rows(
    rows: &[ExportRow],
    format: ExportFormat,
    writer: impl Write,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(rows, writer),
        ExportFormat::Json => write_json(rows, writer),
    }
}

pub fn export_to_path(
    rows: &[ExportRow],
    format: ExportFormat,
    path: &Path,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_rows(rows, format, file)?;
    tracing::info!(path = %path.display(), format = format.label(), "exported results");
    Ok(())
}
