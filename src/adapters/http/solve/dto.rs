//! Request and response DTOs for the solving endpoints
//!
//! Request bodies use the camelCase keys the client sends. Successful
//! responses are the normalized records themselves.

use serde::{Deserialize, Serialize};

use crate::domain::normalization::ExtractRecord;

/// POST /api/extract
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractRequest {
    #[serde(default)]
    pub image_data_list: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /api/generate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub problem_info: ExtractRecord,
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /api/debug
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugRequest {
    pub problem_info: ExtractRecord,
    #[serde(default)]
    pub image_data_list: Vec<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// POST /api/mcq
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McqRequest {
    #[serde(default)]
    pub image_data_list: Vec<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// GET /health
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub provider: String,
    pub model: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new("PAYLOAD_TOO_LARGE", message)
    }

    pub fn invalid_api_key() -> Self {
        Self::new("INVALID_API_KEY", "The upstream provider rejected the API key")
    }

    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self {
            details: Some(serde_json::json!({ "retryAfterSecs": retry_after_secs })),
            ..Self::new("RATE_LIMITED", "The upstream provider is rate limiting requests")
        }
    }

    pub fn upstream_timeout(message: impl Into<String>) -> Self {
        Self::new("UPSTREAM_TIMEOUT", message)
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::new("UPSTREAM_ERROR", message)
    }

    pub fn ocr_failed(message: impl Into<String>) -> Self {
        Self::new("OCR_FAILED", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn requests_use_camel_case_keys() {
        let req: DebugRequest = serde_json::from_value(json!({
            "problemInfo": {"problem_statement": "Sum"},
            "imageDataList": ["aGVsbG8="],
            "language": "go"
        }))
        .unwrap();

        assert_eq!(req.problem_info.problem_statement, "Sum");
        assert!(req.problem_info.test_cases.is_empty());
        assert_eq!(req.image_data_list.len(), 1);
    }

    #[test]
    fn mcq_request_fields_are_optional() {
        let req: McqRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.image_data_list.is_empty());
        assert!(req.text.is_none());
    }

    #[test]
    fn rate_limited_error_carries_retry_delay() {
        let json = serde_json::to_value(ErrorResponse::rate_limited(12)).unwrap();
        assert_eq!(json["code"], "RATE_LIMITED");
        assert_eq!(json["details"]["retryAfterSecs"], 12);
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let json = serde_json::to_string(&ErrorResponse::bad_request("nope")).unwrap();
        assert_eq!(json, r#"{"code":"BAD_REQUEST","message":"nope"}"#);
    }
}
