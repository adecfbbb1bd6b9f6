use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::completion::Completion;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Environment variable consulted when no API key is passed explicitly.
pub const API_KEY_ENV: &str = "HUSTLEBOT_API_KEY";

/// Client for the generative-language `generateContent` endpoint.
///
/// The client keeps no conversational state: each call carries exactly one
/// question.
#[derive(Clone)]
pub struct Gemini {
    api_key: String,
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    model: Model,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl Gemini {
    /// Create a new client.
    ///
    /// The API key can be provided directly or read from the
    /// `HUSTLEBOT_API_KEY` environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with a custom base URL and/or timeout.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var(API_KEY_ENV).map_err(|_| {
                Error::authentication(format!(
                    "API key not provided and {API_KEY_ENV} environment variable not set"
                ))
            })?,
        };

        let base_url = parse_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(Error::validation(
                "timeout must be greater than zero",
                Some("timeout".to_string()),
            ));
        }
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url,
            timeout,
            model: Model::default(),
            logger: None,
        })
    }

    /// Use `model` for subsequent calls.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Report every request, response and failure to `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The model this client talks to.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The configured request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The URL a `generateContent` call for the current model is posted to.
    pub fn endpoint(&self) -> Result<Url> {
        Ok(self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))?)
    }

    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.api_key).map_err(|_| {
            Error::authentication("API key contains characters not valid in a header")
        })?;
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        match response.text().await {
            Ok(body) => error_from_body(status_code, &body, retry_after),
            Err(e) => Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            ),
        }
    }

    /// Send one `generateContent` request and decode the envelope.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        CLIENT_REQUESTS.click();
        let start = Instant::now();
        if let Some(logger) = &self.logger {
            logger.log_request(&self.model, request);
        }
        let result = self.send(request).await;
        CLIENT_REQUEST_DURATION.add(start.elapsed().as_secs_f64());
        match &result {
            Ok(response) => {
                if let Some(logger) = &self.logger {
                    logger.log_response(response);
                }
            }
            Err(err) => self.record_error(err),
        }
        result
    }

    async fn send(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let response = self
            .client
            .post(self.endpoint()?)
            .headers(self.default_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::timeout(
                        format!("Request timed out: {}", e),
                        Some(self.timeout.as_secs_f64()),
                    )
                } else if e.is_connect() {
                    Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
                } else {
                    Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
                }
            })?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                Error::serialization(
                    format!("Failed to parse response: {}", e),
                    Some(Box::new(e)),
                )
            })
    }

    fn record_error(&self, err: &Error) {
        CLIENT_REQUEST_ERRORS.click();
        if let Some(logger) = &self.logger {
            logger.log_error(err);
        }
    }
}

impl fmt::Debug for Gemini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gemini")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("model", &format_args!("{}", self.model))
            .field("logger", &self.logger.is_some())
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Completion for Gemini {
    async fn complete(&self, question: &str) -> Result<String> {
        let response = self
            .generate_content(&GenerateContentRequest::question(question))
            .await?;
        match response.answer_text() {
            Ok(text) => Ok(text.to_string()),
            Err(err) => {
                self.record_error(&err);
                Err(err)
            }
        }
    }
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    // Url::join drops the last path segment unless the base ends in a slash.
    let mut base_url = base_url.to_string();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    Ok(Url::parse(&base_url)?)
}

/// Map a non-2xx status and its body onto the error taxonomy.
///
/// The body is expected to be the Google error envelope
/// `{"error": {"code", "message", "status", "details"}}`; anything else is
/// carried through verbatim as the message.
fn error_from_body(status_code: u16, body: &str, retry_after: Option<u64>) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
        status: Option<String>,
        #[serde(default)]
        details: Vec<ErrorInfo>,
    }

    #[derive(Deserialize)]
    struct ErrorInfo {
        reason: Option<String>,
    }

    let parsed = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error);
    let message = parsed
        .as_ref()
        .and_then(|e| e.message.clone())
        .unwrap_or_else(|| body.to_string());
    let status = parsed.as_ref().and_then(|e| e.status.clone());
    let key_rejected = status.as_deref() == Some("UNAUTHENTICATED")
        || parsed.as_ref().is_some_and(|e| {
            e.details
                .iter()
                .any(|info| info.reason.as_deref() == Some("API_KEY_INVALID"))
        });

    match status_code {
        _ if key_rejected => Error::authentication(message),
        400 => Error::bad_request(message, status),
        401 => Error::authentication(message),
        403 => Error::permission(message),
        404 => Error::not_found(message, Some("model".to_string()), None),
        408 => Error::timeout(message, None),
        429 => Error::rate_limit(message, retry_after),
        500 => Error::internal_server(message),
        502..=504 => Error::service_unavailable(message, retry_after),
        _ => Error::api(status_code, status, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::KnownModel;

    #[test]
    fn test_client_creation() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url.as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout, DEFAULT_TIMEOUT);
        assert_eq!(client.model(), &Model::Known(KnownModel::GeminiPro));

        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("https://proxy.example.com/v1".to_string()),
            Some(Duration::from_secs(10)),
        )
        .unwrap();
        assert_eq!(client.base_url.as_str(), "https://proxy.example.com/v1/");
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_bad_base_url() {
        let err = Gemini::with_options(Some("k".to_string()), Some("not a url".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Gemini::with_options(Some("k".to_string()), None, Some(Duration::ZERO))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "Validation error: timeout must be greater than zero (parameter: timeout)"
        );
    }

    #[test]
    fn test_endpoint() {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );

        let client = client.with_model(Model::Known(KnownModel::Gemini15Flash));
        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let client = Gemini::new(Some("super-secret".to_string())).unwrap();
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("gemini-pro"));
    }

    #[test]
    fn test_invalid_header_key() {
        let client = Gemini::new(Some("bad\nkey".to_string())).unwrap();
        assert!(client.default_headers().unwrap_err().is_authentication());
    }

    #[test]
    fn test_error_mapping() {
        let body = r#"{"error": {"code": 400, "message": "Invalid JSON payload", "status": "INVALID_ARGUMENT"}}"#;
        let err = error_from_body(400, body, None);
        assert!(err.is_bad_request());
        assert_eq!(
            err.to_string(),
            "Bad request: Invalid JSON payload (INVALID_ARGUMENT)"
        );

        let body = r#"{"error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT",
            "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "API_KEY_INVALID"}]}}"#;
        assert!(error_from_body(400, body, None).is_authentication());

        let body = r#"{"error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}}"#;
        match error_from_body(429, body, Some(7)) {
            Error::RateLimit {
                message,
                retry_after,
            } => {
                assert_eq!(message, "Quota exceeded");
                assert_eq!(retry_after, Some(7));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(error_from_body(403, "{}", None).is_permission());
        assert!(error_from_body(404, "{}", None).is_not_found());
        assert!(error_from_body(503, "overloaded", None).is_server_error());
    }

    #[test]
    fn test_error_mapping_non_json_body() {
        let err = error_from_body(418, "<html>teapot</html>", None);
        assert_eq!(err.status_code(), Some(418));
        assert!(err.to_string().contains("<html>teapot</html>"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:9/".to_string()),
            Some(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.complete("Hello").await.unwrap_err();
        assert!(err.is_connection() || err.is_timeout() || matches!(err, Error::HttpClient { .. }));
    }

    #[tokio::test]
    #[ignore] // Ignore by default as this requires a real API key
    async fn test_live_completion() {
        let api_key = env::var(API_KEY_ENV).ok();
        if api_key.is_none() {
            println!("Skipping test_live_completion: {API_KEY_ENV} not set");
            return;
        }
        let client = Gemini::new(api_key).unwrap();
        let answer = client
            .complete("Reply with the single word: ready")
            .await
            .unwrap();
        assert!(!answer.is_empty());
    }
}
