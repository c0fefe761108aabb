use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::ServiceError;
use super::transform::TransformService;
use super::types::{TransformRequest, TransformResponse};

const API_URL: &str = "https://api.scriba.dev/v1/transform";

/// HTTP client for the text transformation service.
pub struct TextServiceClient {
    api_key: String,
    client: Client,
    base_url: String,
}

impl TextServiceClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            client,
            base_url,
        }
    }

    async fn send(&self, req: &TransformRequest) -> Result<TransformResponse, ServiceError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(ServiceError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ServiceError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<TransformResponse>()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))
    }
}

#[async_trait]
impl TransformService for TextServiceClient {
    async fn proofread(&self, text: &str, language: &str) -> Result<String, ServiceError> {
        let req = TransformRequest {
            operation: "proofread".into(),
            text: text.to_string(),
            language: language.to_string(),
            target_language: None,
        };
        Ok(self.send(&req).await?.text)
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, ServiceError> {
        let req = TransformRequest {
            operation: "translate".into(),
            text: text.to_string(),
            language: source.to_string(),
            target_language: Some(target.to_string()),
        };
        Ok(self.send(&req).await?.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn proofread_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("x-api-key", "sk-test"))
            .and(body_partial_json(serde_json::json!({
                "operation": "proofread",
                "language": "en",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "The corrected text."
            })))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let out = client.proofread("Teh corected text.", "en").await.unwrap();
        assert_eq!(out, "The corrected text.");
    }

    #[tokio::test]
    async fn translate_sends_language_pair() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "operation": "translate",
                "language": "en",
                "target_language": "fr",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "text": "Bonjour le monde",
                "model": "lexica-2"
            })))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let out = client.translate("Hello world", "en", "fr").await.unwrap();
        assert_eq!(out, "Bonjour le monde");
    }

    #[tokio::test]
    async fn rate_limit_maps_to_transient_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let err = client.proofread("text", "en").await.unwrap_err();
        match err {
            ServiceError::RateLimited { retry_after_ms } => {
                assert_eq!(retry_after_ms, 7000);
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn client_error_is_permanent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("unsupported language"))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let err = client.proofread("text", "xx").await.unwrap_err();
        match &err {
            ServiceError::ApiError { status, message } => {
                assert_eq!(*status, 422);
                assert_eq!(message, "unsupported language");
            }
            other => panic!("expected ApiError, got {other:?}"),
        }
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn server_error_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let err = client.proofread("text", "en").await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn malformed_body_maps_to_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = TextServiceClient::with_base_url("sk-test".into(), server.uri());
        let err = client.proofread("text", "en").await.unwrap_err();
        assert!(matches!(err, ServiceError::Parse(_)));
        assert!(!err.is_transient());
    }
}
