//! Thin asynchronous client for an external duty-rate service.
//!
//! - Posts the shipment's customs figures and reads back a duty rate.
//! - Any failure is reported as an error; callers treat it as "no override".

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{CostInput, CostResult};
use crate::util::version::user_agent;

/// Upper bound for one lookup, connection included.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(12);

/// Response keys that may carry the rate, in priority order.
const RATE_KEYS: [&str; 3] = ["duty_rate", "dutyRate", "duty_percent"];
const ERROR_BODY_LIMIT: usize = 200;

pub const API_KEY_ENV: &str = "SIMPLYDUTY_API_KEY";
pub const ENDPOINT_ENV: &str = "SIMPLYDUTY_ENDPOINT";

#[derive(Debug, Error)]
pub enum DutyClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("response has no numeric duty rate")]
    MissingRate,
}

/// Settings for the optional duty lookup, as collected from flags and env.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DutyServiceConfig {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
}

impl DutyServiceConfig {
    /// Endpoint and key, when the lookup is switched on and both are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.enabled {
            return None;
        }
        let endpoint = self.endpoint.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let api_key = self.api_key.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        Some((endpoint, api_key))
    }
}

/// Request body sent to the duty service. Amounts in EUR.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DutyQuery {
    pub destination_country: String,
    pub hs_code: String,
    pub customs_value_eur: f64,
    pub goods_value_eur: f64,
    pub freight_eur: f64,
    pub insurance_eur: f64,
}

impl DutyQuery {
    /// Builds the query from a calculation made without an override.
    pub fn new(input: &CostInput, provisional: &CostResult) -> Self {
        Self {
            destination_country: input.destination.label().to_string(),
            hs_code: input.hs_code_trimmed().to_string(),
            customs_value_eur: provisional.customs_base,
            goods_value_eur: provisional.goods_value,
            freight_eur: provisional.freight_amount,
            insurance_eur: provisional.insurance_amount,
        }
    }
}

#[derive(Clone)]
pub struct DutyRateClient {
    http: Client,
    endpoint: Url,
    api_key: String,
}

impl DutyRateClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, DutyClientError> {
        Self::with_timeout(endpoint, api_key, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        endpoint: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, DutyClientError> {
        let endpoint = Url::parse(endpoint)?;
        let http = Client::builder()
            .user_agent(user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint,
            api_key: api_key.to_string(),
        })
    }

    pub fn from_config(config: &DutyServiceConfig) -> Option<Result<Self, DutyClientError>> {
        config
            .credentials()
            .map(|(endpoint, api_key)| Self::new(endpoint, api_key))
    }

    pub async fn fetch_duty_rate(&self, query: &DutyQuery) -> Result<f64, DutyClientError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            hs_code = %query.hs_code,
            destination = %query.destination_country,
            "requesting duty rate"
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(query)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(DutyClientError::Status {
                status,
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let rate = extract_duty_rate(&payload).ok_or(DutyClientError::MissingRate)?;
        tracing::debug!(rate, "duty service answered");
        Ok(rate)
    }
}

/// Reads the first numeric rate among the accepted keys of a JSON object.
pub fn extract_duty_rate(payload: &serde_json::Value) -> Option<f64> {
    let object = payload.as_object()?;
    RATE_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(serde_json::Value::as_f64)
            .filter(|rate| rate.is_finite())
    })
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn extracts_rate_from_accepted_keys_in_order() {
        assert_eq!(extract_duty_rate(&json!({"duty_rate": 0.04})), Some(0.04));
        assert_eq!(extract_duty_rate(&json!({"dutyRate": 0.07})), Some(0.07));
        assert_eq!(extract_duty_rate(&json!({"duty_percent": 2})), Some(2.0));
        assert_eq!(
            extract_duty_rate(&json!({"duty_percent": 0.5, "duty_rate": 0.01})),
            Some(0.01)
        );
    }

    #[test]
    fn skips_non_numeric_values() {
        assert_eq!(extract_duty_rate(&json!({"duty_rate": "0.04"})), None);
        assert_eq!(
            extract_duty_rate(&json!({"duty_rate": null, "dutyRate": 0.06})),
            Some(0.06)
        );
        assert_eq!(extract_duty_rate(&json!({"duty_rate": true})), None);
        assert_eq!(extract_duty_rate(&json!([0.04])), None);
        assert_eq!(extract_duty_rate(&json!({})), None);
    }

    #[test]
    fn credentials_require_flag_and_both_values() {
        let mut config = DutyServiceConfig {
            enabled: true,
            endpoint: Some("https://duty.example/api".into()),
            api_key: Some("secret".into()),
        };
        assert_eq!(
            config.credentials(),
            Some(("https://duty.example/api", "secret"))
        );

        config.api_key = Some("   ".into());
        assert_eq!(config.credentials(), None);

        config.api_key = Some("secret".into());
        config.enabled = false;
        assert_eq!(config.credentials(), None);
    }

    #[test]
    fn query_echoes_provisional_figures() {
        let input = CostInput {
            hs_code: " 8504.40 ".into(),
            ..CostInput::default()
        };
        let provisional =
            crate::domain::compute(&input, &crate::domain::RateTables::default(), None);
        let query = DutyQuery::new(&input, &provisional);
        assert_eq!(query.hs_code, "8504.40");
        assert_eq!(query.destination_country, "Austria");
        assert_eq!(query.customs_value_eur, provisional.customs_base);
        assert_eq!(query.freight_eur, provisional.freight_amount);
    }

    #[test]
    fn rejects_invalid_endpoint() {
        let err = DutyRateClient::new("not a url", "key").err().unwrap();
        assert!(matches!(err, DutyClientError::InvalidUrl(_)));
    }

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate("äöü", 2), "äö");
    }
}
