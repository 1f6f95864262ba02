use landed_cost::{
    app::{run, RunOptions},
    domain::{DutySource, RateTables},
    infra::{duty::DutyServiceConfig, export::ExportFormat},
    ui::notice::NoticeKind,
    util::persistence::{load_leads, LeadContact},
};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

fn duty_service(server: &MockServer) -> DutyServiceConfig {
    DutyServiceConfig {
        enabled: true,
        endpoint: Some(format!("{}/duty", server.uri())),
        api_key: Some("test-key".into()),
    }
}

#[tokio::test]
async fn runs_offline_with_table_rate() {
    let outcome = run(&RunOptions::default(), &RateTables::default()).await;

    assert_eq!(outcome.result.duty_source, DutySource::HsTable);
    assert!((outcome.result.total - 11924.7036).abs() < 1e-6);
    assert!(outcome.notices.is_empty());
    assert_eq!(
        outcome.tariff_link.unwrap().as_str(),
        "https://trade.ec.europa.eu/access-to-markets/en/results?text=8414.59"
    );
}

#[tokio::test]
async fn duty_service_rate_overrides_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/duty"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duty_percent": 0.1})))
        .mount(&server)
        .await;

    let options = RunOptions {
        duty_service: duty_service(&server),
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;

    assert_eq!(outcome.result.duty_rate, 0.1);
    assert_eq!(outcome.result.duty_source, DutySource::Override);
    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].kind, NoticeKind::Info);
}

#[tokio::test]
async fn failing_duty_service_falls_back_with_warning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/duty"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let options = RunOptions {
        duty_service: duty_service(&server),
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;

    assert_eq!(outcome.result.duty_rate, 0.03);
    assert_eq!(outcome.result.duty_source, DutySource::HsTable);
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].is_warning());
    assert!(outcome.notices[0].text.contains("503"));
}

#[tokio::test]
async fn disabled_duty_service_is_not_called() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duty_rate": 0.5})))
        .expect(0)
        .mount(&server)
        .await;

    let options = RunOptions {
        duty_service: DutyServiceConfig {
            enabled: false,
            ..duty_service(&server)
        },
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;
    assert_eq!(outcome.result.duty_source, DutySource::HsTable);
    assert!(outcome.notices.is_empty());
}

#[tokio::test]
async fn enabled_duty_service_without_key_warns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"duty_rate": 0.2})))
        .expect(0)
        .mount(&server)
        .await;

    let options = RunOptions {
        duty_service: DutyServiceConfig {
            api_key: Some("  ".into()),
            ..duty_service(&server)
        },
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;

    assert_eq!(outcome.result.duty_source, DutySource::HsTable);
    assert_eq!(outcome.notices.len(), 1);
    assert!(outcome.notices[0].is_warning());
    assert!(outcome.notices[0].text.contains("API key missing"));
}

#[tokio::test]
async fn stores_lead_and_writes_exports() {
    let dir = tempfile::tempdir().unwrap();
    let leads = dir.path().join("leads.json");
    let csv = dir.path().join("landed_cost_result.csv");
    let json_out = dir.path().join("landed_cost_result.json");

    let options = RunOptions {
        lead: LeadContact {
            email: "buyer@firma.example".into(),
            company: "Firma GmbH".into(),
            consent: true,
        },
        lead_log_path: Some(leads.clone()),
        exports: vec![
            (csv.clone(), ExportFormat::Csv),
            (json_out.clone(), ExportFormat::Json),
        ],
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;

    assert_eq!(outcome.notices.len(), 1);
    assert_eq!(outcome.notices[0].kind, NoticeKind::Success);

    let stored = load_leads(&leads).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].email, "buyer@firma.example");
    assert_eq!(stored[0].result.total_landed, outcome.result.total);
    assert!(stored[0].timestamp.ends_with('Z'));

    assert_eq!(std::fs::read_to_string(&csv).unwrap().lines().count(), 2);
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_out).unwrap()).unwrap();
    assert_eq!(exported.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn storage_failures_only_warn() {
    let dir = tempfile::tempdir().unwrap();
    let leads = dir.path().join("leads.json");
    std::fs::write(&leads, "not json").unwrap();

    let options = RunOptions {
        lead: LeadContact {
            email: "buyer@firma.example".into(),
            ..LeadContact::default()
        },
        lead_log_path: Some(leads),
        exports: vec![(
            dir.path().join("missing").join("out.csv"),
            ExportFormat::Csv,
        )],
        ..RunOptions::default()
    };
    let outcome = run(&options, &RateTables::default()).await;

    assert!((outcome.result.total - 11924.7036).abs() < 1e-6);
    assert_eq!(outcome.notices.len(), 2);
    assert!(outcome.notices.iter().all(|notice| notice.is_warning()));
}
