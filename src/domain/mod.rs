//! Domain logic for landed cost estimation lives here.

pub mod calculation;
pub mod entities;
pub mod rates;

pub use calculation::{chargeable_weight, compute, customs_base, resolve_duty_rate};
pub use entities::{
    CostInput, CostResult, Country, Currency, DutySource, FreightEntry, Incoterm, InputError,
    ParseError, ShippingMode,
};
pub use rates::{RateTables, RatesError};
