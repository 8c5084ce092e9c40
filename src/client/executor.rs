//! ArgoCD request executor
//!
//! One call to [`RequestExecutor::execute`] is one HTTP round trip (or none,
//! when the token or method is rejected up front). Every outcome is folded
//! into an `(ok, payload)` pair; nothing is raised to the caller.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde_json::{Value, json};

use super::transport::{
    HttpMethod, HttpTransport, Transport, TransportError, TransportRequest, TransportResponse,
};
use crate::config::Config;
use crate::error::{ApiError, Result, redact};

/// Upstream error text kept when the body is not JSON
const ERROR_TEXT_LIMIT: usize = 200;

/// A single API call, relative to a base URL.
///
/// Anything left unset falls back to the executor's [`Config`].
#[derive(Clone, Default)]
pub struct ApiRequest {
    path: String,
    method: String,
    token: Option<String>,
    base_url: Option<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
    timeout_secs: Option<u64>,
    verify_ssl: Option<bool>,
}

impl ApiRequest {
    /// GET request for `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: HttpMethod::Get.as_str().to_string(),
            ..Default::default()
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Append one query parameter
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append several query parameters
    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = Some(verify);
        self
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("query", &self.query)
            .field("timeout_secs", &self.timeout_secs)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

/// Executes ArgoCD API requests against a fixed configuration
#[derive(Clone)]
pub struct RequestExecutor {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    /// Create an executor backed by the reqwest transport
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Create an executor over any transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one request and normalize the outcome.
    ///
    /// Returns `(true, body)` for 2xx responses and `(false, {error, details?})`
    /// for everything else. The bearer token never appears in the payload.
    pub async fn execute(&self, request: ApiRequest) -> (bool, Value) {
        let token = request
            .token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| self.config.token.clone());

        match self.try_execute(request, token.as_deref()).await {
            Ok(payload) => (true, payload),
            Err(err) => {
                let payload = err.into_payload(token.as_deref());
                if let Some(message) = payload.get("error").and_then(Value::as_str) {
                    warn!("{}", message);
                }
                (false, payload)
            }
        }
    }

    async fn try_execute(
        &self,
        request: ApiRequest,
        token: Option<&str>,
    ) -> std::result::Result<Value, ApiError> {
        let token = token.ok_or(ApiError::MissingToken)?;
        let method: HttpMethod = request.method.parse()?;

        let base_url = request
            .base_url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| self.config.api_url.clone());
        let verify_ssl = request.verify_ssl.unwrap_or(self.config.verify_ssl);
        let timeout_secs = request.timeout_secs.unwrap_or(self.config.timeout_secs);
        let url = join_url(&base_url, &request.path);

        debug!("{} {}", method, redact(&url, Some(token)));

        let body = if method.sends_body() {
            request.body
        } else {
            None
        };

        let outbound = TransportRequest {
            method,
            url,
            bearer_token: token.to_string(),
            query: request.query,
            body,
            timeout: Duration::from_secs(timeout_secs),
            verify_ssl,
        };

        let response = self
            .transport
            .send(outbound)
            .await
            .map_err(|err| match err {
                TransportError::Timeout => ApiError::Timeout(timeout_secs),
                TransportError::Network(message) => ApiError::Network(message),
                TransportError::Other(message) => ApiError::Unexpected(message),
            })?;

        debug!("{} {} -> {}", method, request.path, response.status);
        classify(response)
    }
}

/// Map a raw response onto success or an upstream rejection
fn classify(response: TransportResponse) -> std::result::Result<Value, ApiError> {
    match response.status {
        204 => Ok(json!({ "status": "success" })),
        200..=202 => match serde_json::from_str(&response.body) {
            Ok(payload) => Ok(payload),
            Err(_) => Ok(json!({
                "status": "success",
                "raw_response": response.body,
            })),
        },
        status => Err(rejection(status, &response.body)),
    }
}

fn rejection(status: u16, body: &str) -> ApiError {
    let mut message = format!("API request failed: {}", status);

    match serde_json::from_str::<Value>(body) {
        Ok(details) => {
            if let Some(upstream) = details.get("error") {
                let text = match upstream {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                message = format!("{} - {}", message, text);
            }
            ApiError::Rejected {
                status,
                message,
                details: Some(details),
            }
        }
        Err(_) => {
            let excerpt: String = body.chars().take(ERROR_TEXT_LIMIT).collect();
            if !excerpt.is_empty() {
                message = format!("{} - {}", message, excerpt);
            }
            ApiError::Rejected {
                status,
                message,
                details: None,
            }
        }
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
