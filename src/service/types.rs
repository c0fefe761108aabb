//! Wire types for the transformation service HTTP API.
//!
//! All structs derive `Serialize` and `Deserialize` for JSON conversion
//! matching the service's `/v1/transform` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for the `/v1/transform` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformRequest {
    /// Which operation to perform: "proofread" or "translate".
    pub operation: String,
    /// The text to transform.
    pub text: String,
    /// Language of the text. For translation this is the source language.
    pub language: String,
    /// Target language. Only present for translation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

/// Response body from the `/v1/transform` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformResponse {
    /// The transformed text.
    pub text: String,
    /// Model or engine identifier that produced the output.
    #[serde(default)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_request_roundtrip() {
        let req = TransformRequest {
            operation: "translate".into(),
            text: "Bonjour".into(),
            language: "fr".into(),
            target_language: Some("en".into()),
        };
        let json = serde_json::to_string(&req).unwrap();
        let parsed: TransformRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.operation, "translate");
        assert_eq!(parsed.text, "Bonjour");
        assert_eq!(parsed.target_language.as_deref(), Some("en"));
    }

    #[test]
    fn proofread_request_omits_target_language() {
        let req = TransformRequest {
            operation: "proofread".into(),
            text: "teh text".into(),
            language: "en".into(),
            target_language: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("target_language"));
    }

    #[test]
    fn transform_response_without_model() {
        let json = r#"{"text": "corrected text"}"#;
        let resp: TransformResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.text, "corrected text");
        assert_eq!(resp.model, None);
    }
}
