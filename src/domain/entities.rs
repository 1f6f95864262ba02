use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Delivery term agreed with the supplier. Decides whether freight and
/// insurance are already part of the quoted goods value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Incoterm {
    #[serde(rename = "EXW")]
    Exw,
    #[default]
    #[serde(rename = "FOB")]
    Fob,
    #[serde(rename = "CIF")]
    Cif,
}

impl Incoterm {
    pub const ALL: [Incoterm; 3] = [Incoterm::Exw, Incoterm::Fob, Incoterm::Cif];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Exw => "EXW",
            Self::Fob => "FOB",
            Self::Cif => "CIF",
        }
    }

    /// True when the supplier price already covers freight and insurance.
    pub fn includes_freight_and_insurance(&self) -> bool {
        matches!(self, Self::Cif)
    }
}

/// Destination countries with known VAT and air-freight rates.
///
/// Serialized by English name so the value can be used as a map key in
/// JSON and TOML rate files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Country {
    #[default]
    Austria,
    Germany,
    Italy,
    Czechia,
    Poland,
    Slovakia,
}

impl Country {
    pub const ALL: [Country; 6] = [
        Country::Austria,
        Country::Germany,
        Country::Italy,
        Country::Czechia,
        Country::Poland,
        Country::Slovakia,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Austria => "Austria",
            Self::Germany => "Germany",
            Self::Italy => "Italy",
            Self::Czechia => "Czechia",
            Self::Poland => "Poland",
            Self::Slovakia => "Slovakia",
        }
    }

    pub fn local_name(&self) -> &'static str {
        match self {
            Self::Austria => "Österreich",
            Self::Germany => "Deutschland",
            Self::Italy => "Italien",
            Self::Czechia => "Tschechien",
            Self::Poland => "Polen",
            Self::Slovakia => "Slowakei",
        }
    }

    pub fn iso_code(&self) -> &'static str {
        match self {
            Self::Austria => "AT",
            Self::Germany => "DE",
            Self::Italy => "IT",
            Self::Czechia => "CZ",
            Self::Poland => "PL",
            Self::Slovakia => "SK",
        }
    }
}

impl Serialize for Country {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Currency the supplier quotes in. Only echoed; the FX rate converts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Cny,
    Gbp,
    Jpy,
    Chf,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Cny => "CNY",
            Self::Gbp => "GBP",
            Self::Jpy => "JPY",
            Self::Chf => "CHF",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShippingMode {
    #[default]
    Sea,
    Air,
    Rail,
    Express,
}

impl ShippingMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sea => "Sea",
            Self::Air => "Air",
            Self::Rail => "Rail",
            Self::Express => "Express",
        }
    }

    /// Air and express are priced on chargeable weight, sea and rail on volume.
    pub fn priced_by_weight(&self) -> bool {
        matches!(self, Self::Air | Self::Express)
    }
}

/// How the freight amount is obtained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum FreightEntry {
    #[default]
    Automatic,
    /// Quoted freight in reference currency, used verbatim.
    Manual(f64),
}

impl FreightEntry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Automatic => "Automatic",
            Self::Manual(_) => "Manual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl ParseError {
    fn new(kind: &'static str, value: &str, expected: &'static str) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected,
        }
    }
}

impl FromStr for Incoterm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EXW" => Ok(Self::Exw),
            "FOB" => Ok(Self::Fob),
            "CIF" => Ok(Self::Cif),
            _ => Err(ParseError::new("incoterm", s, "EXW, FOB, CIF")),
        }
    }
}

impl FromStr for Country {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|country| {
                needle.eq_ignore_ascii_case(country.label())
                    || needle.eq_ignore_ascii_case(country.iso_code())
                    || needle.to_lowercase() == country.local_name().to_lowercase()
            })
            .ok_or_else(|| {
                ParseError::new(
                    "country",
                    s,
                    "Austria, Germany, Italy, Czechia, Poland, Slovakia",
                )
            })
    }
}

impl FromStr for Currency {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "CNY" => Ok(Self::Cny),
            "GBP" => Ok(Self::Gbp),
            "JPY" => Ok(Self::Jpy),
            "CHF" => Ok(Self::Chf),
            _ => Err(ParseError::new("currency", s, "USD, EUR, CNY, GBP, JPY, CHF")),
        }
    }
}

impl FromStr for ShippingMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // German names are what the original order form used.
        match s.trim().to_lowercase().as_str() {
            "sea" | "see" => Ok(Self::Sea),
            "air" | "luft" => Ok(Self::Air),
            "rail" | "schiene" => Ok(Self::Rail),
            "express" => Ok(Self::Express),
            _ => Err(ParseError::new("shipping mode", s, "sea, air, rail, express")),
        }
    }
}

impl fmt::Display for Incoterm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for ShippingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One shipment as entered by the user. Amounts other than `unit_price`
/// are in the reference currency (EUR).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostInput {
    pub incoterm: Incoterm,
    pub destination: Country,
    pub currency: Currency,
    /// Units of reference currency per unit of supplier currency.
    pub fx_rate: f64,
    /// Supplier price per piece, in supplier currency.
    pub unit_price: f64,
    pub quantity: u32,
    pub gross_weight_kg: f64,
    pub volume_m3: f64,
    #[serde(default)]
    pub hs_code: String,
    pub shipping_mode: ShippingMode,
    #[serde(default)]
    pub freight_entry: FreightEntry,
    pub insurance_rate: f64,
    pub broker_fee: f64,
    pub other_fee: f64,
}

impl Default for CostInput {
    fn default() -> Self {
        Self {
            incoterm: Incoterm::Fob,
            destination: Country::Austria,
            currency: Currency::Usd,
            fx_rate: 0.92,
            unit_price: 10.0,
            quantity: 1000,
            gross_weight_kg: 200.0,
            volume_m3: 1.5,
            hs_code: "8414.59".to_string(),
            shipping_mode: ShippingMode::Sea,
            freight_entry: FreightEntry::Automatic,
            insurance_rate: 0.003,
            broker_fee: 250.0,
            other_fee: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("FX rate must be a positive number, got {0}")]
    FxRate(f64),
    #[error("quantity must be at least 1")]
    Quantity,
    #[error("{field} must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f64 },
}

impl CostInput {
    /// Checks the constraints the calculation relies on.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.fx_rate.is_finite() || self.fx_rate <= 0.0 {
            return Err(InputError::FxRate(self.fx_rate));
        }
        if self.quantity == 0 {
            return Err(InputError::Quantity);
        }

        let manual_freight = match self.freight_entry {
            FreightEntry::Manual(amount) => amount,
            FreightEntry::Automatic => 0.0,
        };
        let fields = [
            ("unit price", self.unit_price),
            ("gross weight", self.gross_weight_kg),
            ("volume", self.volume_m3),
            ("manual freight", manual_freight),
            ("insurance rate", self.insurance_rate),
            ("broker fee", self.broker_fee),
            ("other fee", self.other_fee),
        ];
        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(InputError::Negative { field, value });
            }
        }
        Ok(())
    }

    /// HS code as used for table lookups.
    pub fn hs_code_trimmed(&self) -> &str {
        self.hs_code.trim()
    }
}

/// Where the duty rate of a calculation came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutySource {
    /// Supplied by the external duty-rate service.
    Override,
    /// Exact match in the HS code table.
    HsTable,
    Default,
}

impl DutySource {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Override => "duty service",
            Self::HsTable => "HS table",
            Self::Default => "default rate",
        }
    }
}

/// Outcome of one landed cost calculation. Amounts are in reference currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub unit_price_ref: f64,
    pub goods_value: f64,
    pub volumetric_weight_kg: f64,
    pub freight_amount: f64,
    pub insurance_amount: f64,
    pub customs_base: f64,
    pub duty_rate: f64,
    pub duty_source: DutySource,
    pub duty_amount: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub local_fees: f64,
    pub total: f64,
    pub unit_cost: f64,
    /// Freight as a fraction of the total, unclamped.
    pub freight_share: f64,
}

impl CostResult {
    /// Freight share bounded to `[0, 1]` for progress bars and percentages.
    pub fn freight_share_clamped(&self) -> f64 {
        if self.freight_share.is_finite() {
            self.freight_share.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}
