//! FMP API client
//!
//! One authenticated GET per call against the FMP stable API. The client
//! returns the decoded JSON body verbatim, or an [`ApiError`] describing where
//! the failure was observed. It holds no session state and performs no retries;
//! every failure is terminal for that call.

use std::fmt;

use serde_json::Value;

use crate::config::{fmp::API_KEY_PARAM, Config};
use crate::error::{ApiError, ConfigError, FmpMcpError, Result};

/// Outcome of a single API call: the JSON body as-is, or a structured error
pub type ApiResult = std::result::Result<Value, ApiError>;

/// Scalar query parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(x) => write!(f, "{}", x),
            ParamValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Str(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Str(s)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Float(x)
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

/// FMP API client
pub struct FmpClient {
    /// HTTP client
    http_client: reqwest::Client,

    /// Base URL for the stable API
    base_url: String,

    /// API key appended to every request
    api_key: String,
}

impl FmpClient {
    /// Create a new FMP client from a resolved configuration
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| {
                FmpMcpError::Config(ConfigError::InvalidConfig {
                    message: format!("Failed to build HTTP client: {}", e),
                })
            })?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Issue a GET against `<base_url>/<endpoint>` with the given query
    /// parameters plus the API key.
    ///
    /// The body is returned as an untyped JSON value; the client enforces no
    /// schema. Repeated identical calls hit the remote service every time.
    pub async fn get(&self, endpoint: &str, params: &[(&str, ParamValue)]) -> ApiResult {
        let url = format!("{}/{}", self.base_url, endpoint);

        let mut query: Vec<(&str, String)> =
            params.iter().map(|(k, v)| (*k, v.to_string())).collect();
        query.push((API_KEY_PARAM, self.api_key.clone()));

        tracing::debug!(endpoint, "FMP API request");

        let response = match self.http_client.get(&url).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(ApiError::Transport {
                    message: e.to_string(),
                })
            }
        };

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        match response.json::<Value>().await {
            Ok(value) => Ok(value),
            Err(e) => Err(ApiError::Unknown {
                message: e.to_string(),
            }),
        }
    }
}

/// Pull a readable message out of an error body.
///
/// FMP error bodies are usually JSON with an `error`, `Error Message`, or
/// `message` field; anything else is passed through as raw text.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["error", "Error Message", "message"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }
    body.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> FmpClient {
        FmpClient::new(&Config::with_credentials("test-key", base_url)).unwrap()
    }

    #[tokio::test]
    async fn test_successful_call_returns_body_verbatim() {
        let mock_server = MockServer::start().await;
        let body = json!([{"symbol": "AAPL", "price": 202.52}]);

        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let result = client.get("quote", &[("symbol", "AAPL".into())]).await;

        assert_eq!(result, Ok(body));
    }

    #[tokio::test]
    async fn test_http_error_preserves_status_and_message() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"error": "Unauthorized"})),
            )
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let result = client.get("quote", &[("symbol", "BAD".into())]).await;

        let err = result.unwrap_err();
        assert_eq!(
            err,
            ApiError::HttpStatus {
                status: 401,
                message: "Unauthorized".to_string(),
            }
        );
        assert_eq!(
            serde_json::to_value(&err).unwrap(),
            json!({"error": "HTTP error: 401", "message": "Unauthorized"})
        );
    }

    #[tokio::test]
    async fn test_server_error_maps_to_http_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let err = client
            .get("profile", &[("symbol", "AAPL".into())])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::HttpStatus { status: 503, .. }));
        assert_eq!(err.message(), "Service Unavailable");
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_transport() {
        // Start a server to grab a free port, then drop it so the port is closed.
        let uri = {
            let mock_server = MockServer::start().await;
            mock_server.uri()
        };

        let client = test_client(&uri);
        let err = client.get("quote", &[("symbol", "AAPL".into())]).await.unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.to_string(), "Request error");
    }

    #[tokio::test]
    async fn test_api_key_sent_even_without_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/batch-index-quotes"))
            .and(query_param("apikey", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let result = client.get("batch-index-quotes", &[]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_api_key_still_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("apikey", ""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client =
            FmpClient::new(&Config::with_credentials("", mock_server.uri())).unwrap();
        let result = client.get("quote", &[("symbol", "AAPL".into())]).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_repeated_calls_are_independent() {
        let mock_server = MockServer::start().await;
        let body = json!([{"symbol": "MSFT", "price": 415.1}]);

        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let first = client.get("quote", &[("symbol", "MSFT".into())]).await;
        let second = client.get("quote", &[("symbol", "MSFT".into())]).await;

        assert_eq!(first, Ok(body.clone()));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_non_json_success_body_maps_to_unknown() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server.uri());
        let err = client.get("quote", &[("symbol", "AAPL".into())]).await.unwrap_err();

        assert!(matches!(err, ApiError::Unknown { .. }));
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(extract_error_message(r#"{"error": "Unauthorized"}"#), "Unauthorized");
        assert_eq!(
            extract_error_message(r#"{"Error Message": "Invalid API KEY"}"#),
            "Invalid API KEY"
        );
        assert_eq!(extract_error_message(r#"{"message": "Limit Reach"}"#), "Limit Reach");
        assert_eq!(extract_error_message("plain text"), "plain text");
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(ParamValue::from("AAPL").to_string(), "AAPL");
        assert_eq!(ParamValue::from(5u32).to_string(), "5");
        assert_eq!(ParamValue::from(2.5).to_string(), "2.5");
        assert_eq!(ParamValue::from(true).to_string(), "true");
    }
}
