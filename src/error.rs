//! Error types for argocd-mcp

use serde_json::{Map, Value, json};
use thiserror::Error;

/// Result type alias for argocd-mcp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Marker substituted for the bearer token wherever it would leak
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Top-level error type for the application
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt error: {0}")]
    Dialoguer(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Operation failed: {0}")]
    Other(String),
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Dialoguer(err.to_string())
    }
}

/// Failures of a single ArgoCD API request.
///
/// Every variant renders to the `{error, details?}` mapping handed back to
/// tool callers; see [`ApiError::into_payload`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Token is required. Please set the ARGOCD_TOKEN environment variable.")]
    MissingToken,

    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("{message}")]
    Rejected {
        status: u16,
        message: String,
        details: Option<Value>,
    },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request error: {0}")]
    Network(String),

    #[error("Request error: {0}")]
    Unexpected(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Render the error as a tool-facing payload with `secret` scrubbed out.
    pub fn into_payload(self, secret: Option<&str>) -> Value {
        let message = redact(&self.to_string(), secret);
        let mut payload = Map::new();
        payload.insert("error".to_string(), Value::String(message));

        if let ApiError::Rejected {
            details: Some(details),
            ..
        } = self
        {
            payload.insert("details".to_string(), redact_value(details, secret));
        }

        Value::Object(payload)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidResponse(err.to_string())
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Replace every occurrence of `secret` in `message`.
///
/// Matching is literal, so a very short secret also matches inside ordinary
/// words of the message.
pub fn redact(message: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() && message.contains(secret) => {
            message.replace(secret, REDACTION_MARKER)
        }
        _ => message.to_string(),
    }
}

/// Recursively scrub `secret` from every string inside a JSON value.
pub fn redact_value(value: Value, secret: Option<&str>) -> Value {
    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        return value;
    };

    match value {
        Value::String(s) => Value::String(redact(&s, Some(secret))),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| redact_value(item, Some(secret)))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (redact(&k, Some(secret)), redact_value(v, Some(secret))))
                .collect(),
        ),
        other => other,
    }
}

/// Payload for a tool that received arguments it could not use.
pub fn invalid_arguments(message: impl std::fmt::Display) -> Value {
    json!({ "error": format!("Invalid arguments: {}", message) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_message() {
        let err = ApiError::MissingToken;
        assert!(err.to_string().starts_with("Token is required"));
        assert!(err.to_string().contains("ARGOCD_TOKEN"));
    }

    #[test]
    fn test_unsupported_method_message() {
        let err = ApiError::UnsupportedMethod("TRACE".to_string());
        assert_eq!(err.to_string(), "unsupported method: TRACE");
    }

    #[test]
    fn test_timeout_message() {
        let err = ApiError::Timeout(30);
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
    }

    #[test]
    fn test_network_message() {
        let err = ApiError::Network("Connection refused".to_string());
        assert_eq!(err.to_string(), "Request error: Connection refused");
    }

    #[test]
    fn test_rejected_payload_includes_details() {
        let err = ApiError::Rejected {
            status: 404,
            message: "API request failed: 404 - app not found".to_string(),
            details: Some(json!({"error": "app not found"})),
        };
        let payload = err.into_payload(None);
        assert_eq!(
            payload,
            json!({
                "error": "API request failed: 404 - app not found",
                "details": {"error": "app not found"}
            })
        );
    }

    #[test]
    fn test_rejected_payload_without_details() {
        let err = ApiError::Rejected {
            status: 502,
            message: "API request failed: 502 - Bad Gateway".to_string(),
            details: None,
        };
        let payload = err.into_payload(None);
        assert!(payload.get("details").is_none());
    }

    #[test]
    fn test_payload_redacts_secret() {
        let err = ApiError::Unexpected("header value s3cr3t-token is invalid".to_string());
        let payload = err.into_payload(Some("s3cr3t-token"));
        let message = payload["error"].as_str().unwrap();
        assert!(!message.contains("s3cr3t-token"));
        assert!(message.contains(REDACTION_MARKER));
    }

    #[test]
    fn test_payload_redacts_secret_in_details() {
        let err = ApiError::Rejected {
            status: 401,
            message: "API request failed: 401".to_string(),
            details: Some(json!({"message": "bad token abc123", "echo": ["abc123"]})),
        };
        let payload = err.into_payload(Some("abc123"));
        assert!(!payload.to_string().contains("abc123"));
    }

    #[test]
    fn test_redact_ignores_empty_secret() {
        assert_eq!(redact("nothing to hide", Some("")), "nothing to hide");
        assert_eq!(redact("nothing to hide", None), "nothing to hide");
    }

    #[test]
    fn test_redact_realistic_token_leaves_message_intact() {
        let message = "API request failed: 502";
        assert_eq!(redact(message, Some("argocd-test-token")), message);
    }

    #[test]
    fn test_redact_short_secret_matches_literally() {
        assert_eq!(
            redact("API request failed: 502", Some("t")),
            "API reques[REDACTED] failed: 502"
        );
    }

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound("/tmp/missing.yaml".to_string());
        assert!(err.to_string().contains("/tmp/missing.yaml"));
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: [yaml: content")
            .unwrap_err();
        let config_err: ConfigError = yaml_err.into();

        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::MissingToken.into();
        match err {
            Error::Api(ApiError::MissingToken) => (),
            _ => panic!("Expected Error::Api(ApiError::MissingToken)"),
        }
    }

    #[test]
    fn test_invalid_arguments_payload() {
        let payload = invalid_arguments("missing field `name`");
        assert_eq!(payload["error"], "Invalid arguments: missing field `name`");
    }
}
