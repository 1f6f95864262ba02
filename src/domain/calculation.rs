//! The landed cost pipeline: freight, customs base, duty, VAT and totals.

use super::{
    entities::{CostInput, CostResult, DutySource, FreightEntry, Incoterm, ShippingMode},
    rates::RateTables,
};

/// Computes the landed cost of one shipment.
///
/// `external_duty_rate` is the result of an optional duty-service lookup and,
/// when finite, replaces the HS table rate. The function has no side effects
/// and is total over validated input; zero divisors produce zero.
pub fn compute(
    input: &CostInput,
    rates: &RateTables,
    external_duty_rate: Option<f64>,
) -> CostResult {
    let unit_price_ref = input.unit_price * input.fx_rate;
    let goods_value = unit_price_ref * input.quantity as f64;

    let volumetric_weight_kg = input.volume_m3 * rates.volumetric_factor;
    let freight_amount = freight_amount(input, rates, volumetric_weight_kg);
    let insurance_amount = input.insurance_rate * goods_value;

    let customs_base = customs_base(
        input.incoterm,
        goods_value,
        freight_amount,
        insurance_amount,
    );

    let (duty_rate, duty_source) =
        resolve_duty_rate(input.hs_code_trimmed(), rates, external_duty_rate);
    let duty_amount = customs_base * duty_rate;

    let vat_rate = rates.vat_rate(input.destination);
    // VAT is assessed on the duty-paid value.
    let vat_amount = (customs_base + duty_amount) * vat_rate;

    let local_fees = input.broker_fee + input.other_fee;
    let total = customs_base + duty_amount + vat_amount + local_fees;

    let unit_cost = if input.quantity > 0 {
        total / input.quantity as f64
    } else {
        0.0
    };
    let freight_share = if total > 0.0 {
        freight_amount / total
    } else {
        0.0
    };

    CostResult {
        unit_price_ref,
        goods_value,
        volumetric_weight_kg,
        freight_amount,
        insurance_amount,
        customs_base,
        duty_rate,
        duty_source,
        duty_amount,
        vat_rate,
        vat_amount,
        local_fees,
        total,
        unit_cost,
        freight_share,
    }
}

/// Greater of actual and volumetric weight.
pub fn chargeable_weight(gross_weight_kg: f64, volumetric_weight_kg: f64) -> f64 {
    gross_weight_kg.max(volumetric_weight_kg)
}

fn freight_amount(input: &CostInput, rates: &RateTables, volumetric_weight_kg: f64) -> f64 {
    if let FreightEntry::Manual(amount) = input.freight_entry {
        return amount;
    }

    let variable = if input.shipping_mode.priced_by_weight() {
        let per_kg = match input.shipping_mode {
            ShippingMode::Express => rates.express_rate_per_kg,
            _ => rates.air_rate(input.destination),
        };
        chargeable_weight(input.gross_weight_kg, volumetric_weight_kg) * per_kg
    } else {
        let per_m3 = match input.shipping_mode {
            ShippingMode::Rail => rates.rail_rate_per_m3,
            _ => rates.sea_rate_per_m3,
        };
        input.volume_m3 * per_m3
    };
    variable + rates.base_fee
}

/// Value duty is assessed on. CIF prices already carry freight and insurance.
pub fn customs_base(
    incoterm: Incoterm,
    goods_value: f64,
    freight_amount: f64,
    insurance_amount: f64,
) -> f64 {
    if incoterm.includes_freight_and_insurance() {
        goods_value
    } else {
        goods_value + freight_amount + insurance_amount
    }
}

/// Picks the duty rate: external override, then exact HS match, then default.
pub fn resolve_duty_rate(
    hs_code: &str,
    rates: &RateTables,
    external_duty_rate: Option<f64>,
) -> (f64, DutySource) {
    if let Some(rate) = external_duty_rate.filter(|rate| rate.is_finite()) {
        return (rate, DutySource::Override);
    }
    match rates.hs_duty_rate(hs_code) {
        Some(rate) => (rate, DutySource::HsTable),
        None => (rates.default_duty, DutySource::Default),
    }
}
