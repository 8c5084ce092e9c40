//! HTTP transport seam
//!
//! [`Transport`] is the only place network I/O happens. The executor talks
//! to it through a trait object so tests can swap in a recording fake.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::{ApiError, Result};

/// HTTP methods the ArgoCD API is called with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether a JSON body accompanies the query string
    pub fn sends_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(ApiError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A fully resolved outbound request
#[derive(Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub timeout: Duration,
    pub verify_ssl: bool,
}

impl fmt::Debug for TransportRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("bearer_token", &"[REDACTED]")
            .field("query", &self.query)
            .field("body", &self.body)
            .field("timeout", &self.timeout)
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

/// Raw upstream response: status code and undecoded body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Transport-level failures, before any HTTP status exists
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() || err.is_request() || err.is_body() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

/// Sends one request and returns the raw response
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    verified: HttpClient,
    unverified: HttpClient,
}

impl HttpTransport {
    /// Build clients for both TLS verification modes up front
    pub fn new() -> Result<Self> {
        let user_agent = format!("argocd-mcp/{}", env!("CARGO_PKG_VERSION"));

        let verified = HttpClient::builder()
            .user_agent(user_agent.clone())
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let unverified = HttpClient::builder()
            .user_agent(user_agent)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            verified,
            unverified,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: TransportRequest,
    ) -> std::result::Result<TransportResponse, TransportError> {
        let client = if request.verify_ssl {
            &self.verified
        } else {
            &self.unverified
        };

        let mut builder = client
            .request(request.method.into(), &request.url)
            .timeout(request.timeout)
            .bearer_auth(&request.bearer_token)
            .header(CONTENT_TYPE, "application/json")
            .query(&request.query);

        if request.method.sends_body() {
            let body = request
                .body
                .unwrap_or_else(|| Value::Object(Map::new()));
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(TransportResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn request(method: HttpMethod, url: String) -> TransportRequest {
        TransportRequest {
            method,
            url,
            bearer_token: "test-token".to_string(),
            query: Vec::new(),
            body: None,
            timeout: Duration::from_secs(5),
            verify_ssl: true,
        }
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!(
            "TRACE".parse::<HttpMethod>(),
            Err(ApiError::UnsupportedMethod(m)) if m == "TRACE"
        ));
    }

    #[test]
    fn test_method_sends_body() {
        assert!(!HttpMethod::Get.sends_body());
        assert!(!HttpMethod::Delete.sends_body());
        assert!(HttpMethod::Post.sends_body());
        assert!(HttpMethod::Put.sends_body());
        assert!(HttpMethod::Patch.sends_body());
    }

    #[test]
    fn test_debug_hides_token() {
        let req = request(HttpMethod::Get, "http://localhost/api/v1/settings".to_string());
        let debug = format!("{:?}", req);
        assert!(!debug.contains("test-token"));
    }

    #[tokio::test]
    async fn test_get_sends_auth_and_query() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/applications")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_query(Matcher::UrlEncoded("project".into(), "default".into()))
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let mut req = request(
            HttpMethod::Get,
            format!("{}/api/v1/applications", server.url()),
        );
        req.query.push(("project".to_string(), "default".to_string()));

        let response = transport.send(req).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, r#"{"items":[]}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/applications/guestbook/sync")
            .match_body(Matcher::Json(serde_json::json!({"name": "guestbook"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let mut req = request(
            HttpMethod::Post,
            format!("{}/api/v1/applications/guestbook/sync", server.url()),
        );
        req.body = Some(serde_json::json!({"name": "guestbook"}));

        let response = transport.send(req).await.unwrap();
        assert_eq!(response.status, 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_without_body_sends_empty_object() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/thing")
            .match_body(Matcher::Json(serde_json::json!({})))
            .with_status(201)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let req = request(HttpMethod::Post, format!("{}/api/v1/thing", server.url()));

        let response = transport.send(req).await.unwrap();
        assert_eq!(response.status, 201);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_not_transport_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/v1/applications/missing")
            .with_status(404)
            .with_body(r#"{"error":"app not found"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new().unwrap();
        let req = request(
            HttpMethod::Delete,
            format!("{}/api/v1/applications/missing", server.url()),
        );

        let response = transport.send(req).await.unwrap();
        assert_eq!(response.status, 404);
        assert!(response.body.contains("app not found"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let transport = HttpTransport::new().unwrap();
        // Port 9 (discard) is almost never listening locally
        let req = request(HttpMethod::Get, "http://127.0.0.1:9/api/v1".to_string());

        match transport.send(req).await {
            Err(TransportError::Network(_)) | Err(TransportError::Other(_)) => (),
            other => panic!("Expected a network failure, got {:?}", other),
        }
    }
}
