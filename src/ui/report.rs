//! Plain-text rendering of a calculation for the terminal.

use std::fmt::Write;

use url::Url;

use super::format::{fmt_eur, fmt_number, fmt_percent};
use crate::domain::{CostInput, CostResult, FreightEntry};
use crate::util::version::{version_label, APP_NAME};

const BAR_WIDTH: usize = 30;

pub const DISCLAIMER: &str = "Estimates only. Duty and VAT rates change; check binding figures \
with official sources (EU Access2Markets / TARIC).";

pub fn render_report(input: &CostInput, result: &CostResult, tariff_link: Option<&Url>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{APP_NAME} {}\n", version_label());
    out.push_str("Results\n");
    let metrics = [
        ("Goods value", fmt_eur(result.goods_value)),
        ("Customs base", fmt_eur(result.customs_base)),
        ("Duty", fmt_eur(result.duty_amount)),
        ("VAT", fmt_eur(result.vat_amount)),
        ("Local fees", fmt_eur(result.local_fees)),
        ("Total landed cost", fmt_eur(result.total)),
        ("Cost per unit", fmt_eur(result.unit_cost)),
    ];
    push_rows(&mut out, &metrics);

    let share = result.freight_share_clamped();
    let _ = writeln!(
        out,
        "\n{} Freight share ~ {}%",
        share_bar(share),
        fmt_number(share * 100.0, 1)
    );

    out.push_str("\nDetails\n");
    let freight_entry = match input.freight_entry {
        FreightEntry::Automatic => format!("Automatic ({})", input.shipping_mode),
        FreightEntry::Manual(_) => "Manual".to_string(),
    };
    let details = [
        ("Incoterm", input.incoterm.to_string()),
        ("Destination", input.destination.to_string()),
        ("Currency", input.currency.to_string()),
        ("FX -> EUR", fmt_number(input.fx_rate, 4)),
        ("Unit price EUR", fmt_eur(result.unit_price_ref)),
        ("Quantity", fmt_number(input.quantity as f64, 0)),
        ("Gross weight kg", fmt_number(input.gross_weight_kg, 2)),
        ("Volume m³", fmt_number(input.volume_m3, 2)),
        ("Volumetric weight kg", fmt_number(result.volumetric_weight_kg, 2)),
        ("Freight entry", freight_entry),
        ("Freight", fmt_eur(result.freight_amount)),
        ("Insurance", fmt_eur(result.insurance_amount)),
        ("HS code", display_or_dash(&input.hs_code)),
        (
            "Duty rate",
            format!(
                "{} ({})",
                fmt_percent(result.duty_rate),
                result.duty_source.label()
            ),
        ),
        ("VAT rate", fmt_percent(result.vat_rate)),
    ];
    push_rows(&mut out, &details);

    if let Some(link) = tariff_link {
        let _ = writeln!(out, "\nHS code in Access2Markets: {link}");
    }

    let _ = writeln!(out, "\n{DISCLAIMER}");
    out
}

/// `[######------------------------]` for a share in `[0, 1]`.
pub fn share_bar(share: f64) -> String {
    let filled = ((share.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn push_rows(out: &mut String, rows: &[(&str, String)]) {
    let width = rows
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {label}{}  {value}", " ".repeat(pad));
    }
}

fn display_or_dash(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "-".to_string()
    } else {
        trimmed.to_string()
    }
}
