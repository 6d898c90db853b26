use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use fxconv::core::converter::{CONVERSION_FAILED, ConversionOutcome, Converter, FailureKind};
use fxconv::core::{CurrencyCode, RateProvider};
use fxconv::providers::FrankfurterProvider;

mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_mock_server(
        amount: &str,
        from: &str,
        to: &str,
        template: ResponseTemplate,
    ) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", amount))
            .and(query_param("from", from))
            .and(query_param("to", to))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn rates_body(to: &str, rate: f64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"amount":100.0,"base":"BRL","date":"2024-05-17","rates":{{"{to}":{rate}}}}}"#
        ))
    }
}

fn converter_for(base_url: &str, timeout: Duration) -> Converter {
    let provider: Arc<dyn RateProvider> = Arc::new(FrankfurterProvider::new(base_url));
    Converter::new(provider, timeout)
}

#[test_log::test(tokio::test)]
async fn test_full_conversion_against_mock_service() {
    let mock_server =
        test_utils::create_mock_server("100", "BRL", "USD", test_utils::rates_body("USD", 0.18))
            .await;

    let mut converter = converter_for(&mock_server.uri(), Duration::from_secs(5));
    converter.type_amount("100");
    let outcome = converter.convert().await.expect("Conversion was blocked");
    info!(?outcome, "Conversion settled");

    let snapshot = converter.snapshot();
    assert_eq!(snapshot.result.as_deref(), Some("100 BRL = 0.18 USD"));
    assert_eq!(
        snapshot.rate_date,
        chrono::NaiveDate::from_ymd_opt(2024, 5, 17)
    );
    assert!(!snapshot.loading);
    assert_eq!(snapshot.error, None);
}

#[test_log::test(tokio::test)]
async fn test_http_error_maps_to_generic_failure() {
    let mock_server =
        test_utils::create_mock_server("100", "BRL", "USD", wiremock::ResponseTemplate::new(500))
            .await;

    let mut converter = converter_for(&mock_server.uri(), Duration::from_secs(5));
    converter.type_amount("100");
    converter.convert().await.expect("Conversion was blocked");

    let snapshot = converter.snapshot();
    assert_eq!(snapshot.error, Some(CONVERSION_FAILED));
    assert!(!snapshot.loading);
    assert_eq!(snapshot.result, None);
}

#[test_log::test(tokio::test)]
async fn test_slow_service_times_out() {
    let mock_server = test_utils::create_mock_server(
        "100",
        "BRL",
        "USD",
        test_utils::rates_body("USD", 0.18).set_delay(Duration::from_secs(5)),
    )
    .await;

    let mut converter = converter_for(&mock_server.uri(), Duration::from_millis(100));
    converter.type_amount("100");
    let outcome = converter.convert().await.expect("Conversion was blocked");
    assert_eq!(outcome, &ConversionOutcome::Failure(FailureKind::TimedOut));
    assert_eq!(converter.snapshot().error, Some(CONVERSION_FAILED));
}

#[test_log::test(tokio::test)]
async fn test_connection_failure_maps_to_generic_failure() {
    let mut converter = converter_for("http://127.0.0.1:1", Duration::from_secs(5));
    converter.type_amount("100");
    converter.convert().await.expect("Conversion was blocked");
    assert_eq!(converter.snapshot().error, Some(CONVERSION_FAILED));
}

#[test_log::test(tokio::test)]
async fn test_run_command_with_config_file() {
    let mock_server =
        test_utils::create_mock_server("250", "EUR", "GBP", test_utils::rates_body("GBP", 214.3))
            .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_path = config_file.path();
    let config_content = format!(
        r#"
        api:
          base_url: {}
          timeout_ms: 2000
        defaults:
          from: EUR
          to: GBP
    "#,
        mock_server.uri()
    );
    fs::write(config_path, &config_content).expect("Failed to write config file");

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "250".to_string(),
            from: None,
            to: None,
        },
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_run_command_reports_failed_conversion() {
    let mock_server =
        test_utils::create_mock_server("5", "BRL", "USD", wiremock::ResponseTemplate::new(502))
            .await;

    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    let config_content = format!("api:\n  base_url: {}\n", mock_server.uri());
    fs::write(config_file.path(), &config_content).expect("Failed to write config file");
    let config_path = config_file.path().to_str().unwrap();

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "5".to_string(),
            from: None,
            to: None,
        },
        Some(config_path),
    )
    .await;
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), format!("Conversion failed: {CONVERSION_FAILED}"));

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "5".to_string(),
            from: Some("usd".to_string()),
            to: Some("USD".to_string()),
        },
        Some(config_path),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Conversion failed: Select different currencies for conversion."
    );
    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[test_log::test(tokio::test)]
async fn test_run_command_rejects_unknown_currency() {
    let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    fs::write(config_file.path(), "{}").expect("Failed to write config file");

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert {
            amount: "1".to_string(),
            from: Some("XYZ".to_string()),
            to: Some("USD".to_string()),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    let err = result.unwrap_err();
    assert!(err.to_string().contains("Invalid currency argument: XYZ"));
}

#[test_log::test(tokio::test)]
async fn test_with_currencies_overrides_defaults() {
    let converter = converter_for("http://localhost", Duration::from_secs(1))
        .with_currencies("EUR".parse().unwrap(), "JPY".parse().unwrap());
    assert_eq!(converter.from_currency().as_str(), "EUR");
    assert_eq!(converter.to_currency(), "JPY".parse::<CurrencyCode>().unwrap());
}
