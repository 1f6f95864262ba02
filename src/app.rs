use std::path::PathBuf;

use url::Url;

use crate::{
    domain::{compute, CostInput, CostResult, RateTables},
    infra::{
        duty::{DutyQuery, DutyRateClient, DutyServiceConfig},
        export::{export_to_path, ExportFormat, ExportRow},
    },
    ui::notice::{push_notice, Notice, NoticeKind},
    util::{
        links::tariff_lookup_url,
        persistence::{append_lead, default_lead_log_path, LeadContact, LeadLogError, LeadRecord},
    },
};

/// Everything one run of the calculator needs besides the rate tables.
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    pub input: CostInput,
    pub duty_service: DutyServiceConfig,
    pub lead: LeadContact,
    /// Overrides the platform data directory for `leads.json`.
    pub lead_log_path: Option<PathBuf>,
    pub exports: Vec<(PathBuf, ExportFormat)>,
}

#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub result: CostResult,
    pub row: ExportRow,
    pub tariff_link: Option<Url>,
    pub notices: Vec<Notice>,
}

/// Runs lookup, calculation, exports and lead capture for one input.
///
/// Only the calculation is required to succeed; every other step degrades to
/// a notice.
pub async fn run(options: &RunOptions, rates: &RateTables) -> RunOutcome {
    let input = &options.input;
    let mut notices = Vec::new();

    let override_rate = fetch_duty_override(input, rates, &options.duty_service, &mut notices).await;
    let result = compute(input, rates, override_rate);
    tracing::info!(
        total = result.total,
        unit_cost = result.unit_cost,
        duty_source = result.duty_source.label(),
        "landed cost computed"
    );

    let row = ExportRow::new(input, &result);
    for (path, format) in &options.exports {
        if let Err(err) = export_to_path(std::slice::from_ref(&row), *format, path) {
            push_notice(
                &mut notices,
                NoticeKind::Warning,
                format!("{} export to {} failed: {err}", format.label(), path.display()),
            );
        }
    }

    if options.lead.should_record() {
        record_lead(options, &result, &mut notices);
    }

    RunOutcome {
        result,
        row,
        tariff_link: tariff_lookup_url(&input.hs_code),
        notices,
    }
}

/// Asks the duty service for a rate. Any failure means "no override".
async fn fetch_duty_override(
    input: &CostInput,
    rates: &RateTables,
    config: &DutyServiceConfig,
    notices: &mut Vec<Notice>,
) -> Option<f64> {
    if !config.enabled {
        return None;
    }
    let client = match DutyRateClient::from_config(config) {
        Some(Ok(client)) => client,
        None => {
            push_notice(
                notices,
                NoticeKind::Warning,
                "Duty service enabled but endpoint or API key missing; using local rate",
            );
            return None;
        }
        Some(Err(err)) => {
            push_notice(
                notices,
                NoticeKind::Warning,
                format!("Duty service not usable: {err}"),
            );
            return None;
        }
    };

    // The query carries the customs figures, which do not depend on duty.
    let provisional = compute(input, rates, None);
    let query = DutyQuery::new(input, &provisional);

    match client.fetch_duty_rate(&query).await {
        Ok(rate) => {
            push_notice(
                notices,
                NoticeKind::Info,
                format!("Duty rate {rate} supplied by duty service"),
            );
            Some(rate)
        }
        Err(err) => {
            push_notice(
                notices,
                NoticeKind::Warning,
                format!("Duty service error: {err}; using local rate"),
            );
            None
        }
    }
}

fn record_lead(options: &RunOptions, result: &CostResult, notices: &mut Vec<Notice>) {
    let stored = options
        .lead_log_path
        .clone()
        .or_else(default_lead_log_path)
        .ok_or(LeadLogError::StorageUnavailable)
        .and_then(|path| {
            let record = LeadRecord::new(&options.lead, &options.input, result);
            append_lead(&path, &record).map(|_| path)
        });

    match stored {
        Ok(path) => push_notice(
            notices,
            NoticeKind::Success,
            format!("Lead saved to {}", path.display()),
        ),
        Err(err) => push_notice(
            notices,
            NoticeKind::Warning,
            format!("Lead could not be saved: {err}"),
        ),
    }
}
