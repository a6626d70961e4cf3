use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::core::currency::{DateRange, ExchangeRateProvider, LatestRates, RateSeries};
use crate::core::error::FxError;

/// Client for the Frankfurter exchange rate API (https://www.frankfurter.app).
pub struct FrankfurterProvider {
    base_url: String,
}

impl FrankfurterProvider {
    pub fn new(base_url: &str) -> Self {
        FrankfurterProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url, FxError> {
        let raw = format!("{}/{}", self.base_url, path);
        Url::parse_with_params(&raw, params).map_err(|e| FxError::Url(format!("{raw}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FxError> {
        let url_str = url.to_string();
        debug!("Requesting rates from {}", url_str);

        let client = reqwest::Client::builder()
            .user_agent("fxc/1.0")
            .build()
            .map_err(|source| FxError::Request {
                url: url_str.clone(),
                source,
            })?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|source| FxError::Request {
                url: url_str.clone(),
                source,
            })?;

        debug!(response = ?response, "Received Frankfurter response");

        if !response.status().is_success() {
            return Err(FxError::Status {
                url: url_str,
                status: response.status().as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| FxError::Request {
            url: url_str.clone(),
            source,
        })?;

        serde_json::from_str(&text).map_err(|source| FxError::Parse {
            url: url_str,
            source,
        })
    }
}

#[async_trait]
impl ExchangeRateProvider for FrankfurterProvider {
    #[instrument(name = "FrankfurterLatest", skip(self))]
    async fn latest(&self, amount: f64, from: &str, to: &str) -> Result<LatestRates, FxError> {
        let url = self.url(
            "latest",
            &[
                ("amount", amount.to_string()),
                ("from", from.to_string()),
                ("to", to.to_string()),
            ],
        )?;
        self.get_json(url).await
    }

    #[instrument(name = "FrankfurterSeries", skip(self, range), fields(dates = %range.to_path_segment()))]
    async fn series(
        &self,
        range: &DateRange,
        from: &str,
        to: &str,
    ) -> Result<RateSeries, FxError> {
        let url = self.url(
            &range.to_path_segment(),
            &[("from", from.to_string()), ("to", to.to_string())],
        )?;
        self.get_json(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(request_path: &str, status: u16, body: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(request_path))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn range() -> DateRange {
        DateRange::trailing_year(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
    }

    #[tokio::test]
    async fn test_successful_latest() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("amount", "100"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "INR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"amount":100.0,"base":"USD","date":"2024-03-15","rates":{"INR":8300}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest(100.0, "USD", "INR").await.unwrap();
        assert_eq!(result.rates.get("INR"), Some(&8300.0));
        assert_eq!(result.base.as_deref(), Some("USD"));
    }

    #[tokio::test]
    async fn test_successful_series() {
        let mock_response = r#"{
            "amount": 1.0,
            "base": "EUR",
            "start_date": "2023-03-15",
            "end_date": "2024-03-15",
            "rates": {
                "2023-03-16": {"GBP": 0.88},
                "2023-03-15": {"GBP": 0.87}
            }
        }"#;
        let mock_server =
            create_mock_server("/2023-03-15..2024-03-15", 200, mock_response).await;

        let provider = FrankfurterProvider::new(&format!("{}/", mock_server.uri()));
        let series = provider.series(&range(), "EUR", "GBP").await.unwrap();
        let dates: Vec<String> = series.rates.keys().map(|d| d.to_string()).collect();
        assert_eq!(dates, vec!["2023-03-15", "2023-03-16"]);
        assert_eq!(series.rates.values().next().unwrap()["GBP"], 0.87);
    }

    #[tokio::test]
    async fn test_http_error() {
        let mock_server = create_mock_server("/latest", 404, r#"{"message":"not found"}"#).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest(1.0, "USD", "INR").await;
        assert!(matches!(result, Err(FxError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_invalid_json() {
        let mock_server = create_mock_server("/latest", 200, "not json").await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.latest(1.0, "USD", "INR").await;
        assert!(matches!(result, Err(FxError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_missing_rates_field() {
        let mock_server =
            create_mock_server("/2023-03-15..2024-03-15", 200, r#"{"base":"EUR"}"#).await;

        let provider = FrankfurterProvider::new(&mock_server.uri());
        let result = provider.series(&range(), "EUR", "GBP").await;
        assert!(matches!(result, Err(FxError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Nothing listens on port 9 locally
        let provider = FrankfurterProvider::new("http://127.0.0.1:9");
        let result = provider.latest(1.0, "USD", "INR").await;
        assert!(matches!(result, Err(FxError::Request { .. })));
    }
}
