//! Rate tables feeding the landed cost calculation.
//!
//! The reference values are sample figures, not binding tariffs. A TOML file
//! can replace any part of them; omitted keys keep the reference value.

use std::{collections::HashMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entities::Country;

pub const DEFAULT_VAT_RATE: f64 = 0.20;
pub const DEFAULT_AIR_RATE_PER_KG: f64 = 4.2;
pub const DEFAULT_DUTY_RATE: f64 = 0.05;
/// kg per m³
pub const VOLUMETRIC_FACTOR: f64 = 167.0;
pub const BASE_FEE: f64 = 80.0;
pub const SEA_RATE_PER_M3: f64 = 65.0;
pub const RAIL_RATE_PER_M3: f64 = 120.0;
pub const EXPRESS_RATE_PER_KG: f64 = 5.2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateTables {
    /// VAT fraction per destination country.
    pub vat: HashMap<Country, f64>,
    pub default_vat: f64,
    pub air_rate_per_kg: HashMap<Country, f64>,
    pub default_air_rate_per_kg: f64,
    /// Duty fraction per HS code, matched exactly.
    pub hs_duty: HashMap<String, f64>,
    pub default_duty: f64,
    pub volumetric_factor: f64,
    pub base_fee: f64,
    pub sea_rate_per_m3: f64,
    pub rail_rate_per_m3: f64,
    pub express_rate_per_kg: f64,
}

impl Default for RateTables {
    fn default() -> Self {
        let vat = HashMap::from([
            (Country::Austria, 0.20),
            (Country::Germany, 0.19),
            (Country::Italy, 0.22),
            (Country::Czechia, 0.21),
            (Country::Poland, 0.23),
            (Country::Slovakia, 0.20),
        ]);
        let air_rate_per_kg = HashMap::from([
            (Country::Austria, 4.2),
            (Country::Germany, 4.0),
            (Country::Italy, 4.5),
            (Country::Czechia, 4.4),
            (Country::Poland, 4.6),
            (Country::Slovakia, 4.3),
        ]);
        let hs_duty = [
            ("8501.10", 0.025),
            ("8414.59", 0.03),
            ("8504.40", 0.02),
            ("8536.50", 0.03),
            ("8414.51", 0.03),
        ]
        .into_iter()
        .map(|(code, rate)| (code.to_string(), rate))
        .collect();

        Self {
            vat,
            default_vat: DEFAULT_VAT_RATE,
            air_rate_per_kg,
            default_air_rate_per_kg: DEFAULT_AIR_RATE_PER_KG,
            hs_duty,
            default_duty: DEFAULT_DUTY_RATE,
            volumetric_factor: VOLUMETRIC_FACTOR,
            base_fee: BASE_FEE,
            sea_rate_per_m3: SEA_RATE_PER_M3,
            rail_rate_per_m3: RAIL_RATE_PER_M3,
            express_rate_per_kg: EXPRESS_RATE_PER_KG,
        }
    }
}

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("failed to read rate file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate file: {0}")]
    Toml(#[from] toml::de::Error),
}

impl RateTables {
    pub fn from_toml_str(raw: &str) -> Result<Self, RatesError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, RatesError> {
        let raw = fs::read_to_string(path)?;
        let tables = Self::from_toml_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            hs_codes = tables.hs_duty.len(),
            "loaded rate tables"
        );
        Ok(tables)
    }

    pub fn vat_rate(&self, country: Country) -> f64 {
        self.vat.get(&country).copied().unwrap_or(self.default_vat)
    }

    pub fn air_rate(&self, country: Country) -> f64 {
        self.air_rate_per_kg
            .get(&country)
            .copied()
            .unwrap_or(self.default_air_rate_per_kg)
    }

    /// Table rate for an HS code. No prefix or fuzzy matching.
    pub fn hs_duty_rate(&self, hs_code: &str) -> Option<f64> {
        self.hs_duty.get(hs_code.trim()).copied()
    }
}
