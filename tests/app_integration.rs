use std::fs;
use tracing::info;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fxc::AppCommand;
use fxc::core::Currency;

mod test_utils {
    use std::fs;

    pub fn write_config(dir: &tempfile::TempDir, base_url: &str) -> String {
        let config_path = dir.path().join("config.yaml");
        let config_content = format!(
            r#"
            providers:
              frankfurter:
                base_url: {}
            defaults:
              from: USD
              to: INR
            chart:
              output_dir: {}
        "#,
            base_url,
            dir.path().join("charts").display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path.to_str().unwrap().to_string()
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_with_mock() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .and(query_param("amount", "100"))
        .and(query_param("from", "USD"))
        .and(query_param("to", "INR"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"amount":100.0,"base":"USD","rates":{"INR":8300}}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let result = fxc::run_command(
        AppCommand::Convert {
            from: None,
            to: None,
            amount: "100".to_string(),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_rejects_invalid_amount_without_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    for amount in ["-5", "abc"] {
        let result = fxc::run_command(
            AppCommand::Convert {
                from: Some(Currency::Usd),
                to: Some(Currency::Inr),
                amount: amount.to_string(),
            },
            Some(&config_path),
        )
        .await;
        let err = result.expect_err("invalid amount should fail");
        assert_eq!(err.to_string(), "Please enter a valid positive number.");
    }
}

#[test_log::test(tokio::test)]
async fn test_convert_reports_server_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latest"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let result = fxc::run_command(
        AppCommand::Convert {
            from: Some(Currency::Eur),
            to: Some(Currency::Gbp),
            amount: "10".to_string(),
        },
        Some(&config_path),
    )
    .await;
    let err = result.expect_err("server error should fail");
    assert_eq!(
        err.to_string(),
        "Failed to fetch exchange rate. Please try again."
    );
}

#[test_log::test(tokio::test)]
async fn test_chart_with_mock() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/\d{4}-\d{2}-\d{2}\.\.\d{4}-\d{2}-\d{2}$"))
        .and(query_param("from", "EUR"))
        .and(query_param("to", "INR"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "base": "EUR",
                "rates": {
                    "2024-01-01": {"INR": 91.2},
                    "2024-01-02": {"INR": 91.5},
                    "2024-01-03": {"INR": 90.8}
                }
            }"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());
    let output_dir = dir.path().join("out");

    let result = fxc::run_command(
        AppCommand::Chart {
            from: Some(Currency::Eur),
            to: None,
            output_dir: Some(output_dir.to_str().unwrap().to_string()),
        },
        Some(&config_path),
    )
    .await;
    assert!(result.is_ok(), "Chart failed with: {:?}", result.err());

    let svg = fs::read_to_string(output_dir.join("rateChart.svg")).expect("chart not written");
    info!(bytes = svg.len(), "Chart rendered");
    assert!(svg.contains("EUR to INR"));
}

#[test_log::test(tokio::test)]
async fn test_chart_failure_writes_nothing() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .mount(&mock_server)
        .await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let result = fxc::run_command(
        AppCommand::Chart {
            from: None,
            to: None,
            output_dir: None,
        },
        Some(&config_path),
    )
    .await;
    let err = result.expect_err("bad payload should fail");
    assert_eq!(err.to_string(), "Failed to load chart data.");
    assert!(!dir.path().join("charts").join("rateChart.svg").exists());
}

#[test_log::test(tokio::test)]
async fn test_currencies_needs_no_network() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, "http://127.0.0.1:9");

    let result = fxc::run_command(AppCommand::Currencies, Some(&config_path)).await;
    assert!(result.is_ok());
    assert!(!dir.path().join("charts").exists());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("absent.yaml");

    let result = fxc::run_command(AppCommand::Currencies, config_path.to_str()).await;
    assert!(result.is_err());
}
