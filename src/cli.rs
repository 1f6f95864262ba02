use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use landed_cost::{
    app::RunOptions,
    domain::{CostInput, Country, Currency, FreightEntry, Incoterm, ShippingMode},
    infra::{
        duty::{DutyServiceConfig, API_KEY_ENV, ENDPOINT_ENV},
        export::ExportFormat,
    },
    util::persistence::LeadContact,
};

#[derive(Parser, Debug)]
#[command(
    name = "landed-cost",
    version,
    about = "Estimate the landed cost of an import shipment (customs base, duty, VAT, fees)"
)]
pub struct Cli {
    /// Delivery term: EXW, FOB or CIF
    #[arg(long, default_value = "FOB")]
    pub incoterm: Incoterm,

    /// Destination country (VAT and air-freight rates)
    #[arg(long, default_value = "Austria")]
    pub destination: Country,

    /// Supplier currency
    #[arg(long, default_value = "USD")]
    pub currency: Currency,

    /// FX rate: 1 unit of supplier currency in EUR
    #[arg(long, default_value_t = 0.92)]
    pub fx: f64,

    /// Unit price in supplier currency
    #[arg(long, default_value_t = 10.0)]
    pub unit_price: f64,

    /// Quantity in pieces
    #[arg(long, default_value_t = 1000)]
    pub quantity: u32,

    /// Gross weight in kg
    #[arg(long, default_value_t = 200.0)]
    pub weight: f64,

    /// Volume in m³
    #[arg(long, default_value_t = 1.5)]
    pub volume: f64,

    /// HS tariff code (may be empty)
    #[arg(long, default_value = "8414.59")]
    pub hs_code: String,

    /// Shipping mode: sea, air, rail or express
    #[arg(long, default_value = "sea")]
    pub mode: ShippingMode,

    /// Quoted freight in EUR; skips the automatic freight estimate
    #[arg(long)]
    pub manual_freight: Option<f64>,

    /// Insurance rate as a fraction of goods value
    #[arg(long, default_value_t = 0.003)]
    pub insurance_rate: f64,

    /// Brokerage, port and customs fees in EUR
    #[arg(long, default_value_t = 250.0)]
    pub broker_fee: f64,

    /// Other local fees in EUR
    #[arg(long, default_value_t = 50.0)]
    pub other_fee: f64,

    /// TOML file replacing parts of the built-in rate tables
    #[arg(long)]
    pub rates: Option<PathBuf>,

    /// Ask the external duty service for a rate
    #[arg(long)]
    pub use_duty_api: bool,

    /// Duty service API key
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub duty_api_key: Option<String>,

    /// Duty service endpoint URL
    #[arg(long, env = ENDPOINT_ENV)]
    pub duty_endpoint: Option<String>,

    /// Contact email; stores the calculation in the lead log
    #[arg(long)]
    pub email: Option<String>,

    /// Contact company
    #[arg(long)]
    pub company: Option<String>,

    /// Do not store the lead even when an email is given
    #[arg(long)]
    pub no_consent: bool,

    /// Lead log file (defaults to leads.json in the user data directory)
    #[arg(long)]
    pub lead_log: Option<PathBuf>,

    /// Write the result row as CSV to this file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Write the result row as JSON to this file
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// What to print on stdout
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    pub fn cost_input(&self) -> CostInput {
        CostInput {
            incoterm: self.incoterm,
            destination: self.destination,
            currency: self.currency,
            fx_rate: self.fx,
            unit_price: self.unit_price,
            quantity: self.quantity,
            gross_weight_kg: self.weight,
            volume_m3: self.volume,
            hs_code: self.hs_code.clone(),
            shipping_mode: self.mode,
            freight_entry: self
                .manual_freight
                .map(FreightEntry::Manual)
                .unwrap_or(FreightEntry::Automatic),
            insurance_rate: self.insurance_rate,
            broker_fee: self.broker_fee,
            other_fee: self.other_fee,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        let mut exports = Vec::new();
        if let Some(path) = &self.csv {
            exports.push((path.clone(), ExportFormat::Csv));
        }
        if let Some(path) = &self.json {
            exports.push((path.clone(), ExportFormat::Json));
        }

        RunOptions {
            input: self.cost_input(),
            duty_service: DutyServiceConfig {
                enabled: self.use_duty_api,
                endpoint: self.duty_endpoint.clone(),
                api_key: self.duty_api_key.clone(),
            },
            lead: LeadContact {
                email: self.email.clone().unwrap_or_default(),
                company: self.company.clone().unwrap_or_default(),
                consent: !self.no_consent,
            },
            lead_log_path: self.lead_log.clone(),
            exports,
        }
    }
}
