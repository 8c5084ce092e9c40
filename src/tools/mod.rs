//! Tool catalog and dispatch
//!
//! Every tool takes a JSON object of arguments and returns a JSON mapping.
//! Failures are mappings with an `error` key; nothing here panics or
//! returns early with a Rust error.

pub mod applications;
pub mod session;
pub mod settings;
pub mod version;

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::client::RequestExecutor;
use crate::error::invalid_arguments;

/// A tool as advertised to MCP clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: &'static str, description: &'static str, input_schema: Value) -> Self {
        Self {
            name,
            description,
            input_schema,
        }
    }
}

/// Schema for tools that take no arguments
fn no_arguments() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// All tools, in catalog order
pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = applications::definitions();
    tools.extend(session::definitions());
    tools.extend(settings::definitions());
    tools.extend(version::definitions());
    tools
}

/// Whether `name` is in the catalog
pub fn is_known(name: &str) -> bool {
    definitions().iter().any(|tool| tool.name == name)
}

/// Invoke a tool by name
pub async fn call_tool(executor: &RequestExecutor, name: &str, arguments: Value) -> Value {
    match name {
        "list_applications" => {
            with_args(arguments, |p| applications::list_applications(executor, p)).await
        }
        "get_application_details" => {
            with_args(arguments, |p| applications::get_application_details(executor, p)).await
        }
        "create_application" => {
            with_args(arguments, |p| applications::create_application(executor, p)).await
        }
        "update_application" => {
            with_args(arguments, |p| applications::update_application(executor, p)).await
        }
        "delete_application" => {
            with_args(arguments, |p| applications::delete_application(executor, p)).await
        }
        "sync_application" => {
            with_args(arguments, |p| applications::sync_application(executor, p)).await
        }
        "get_user_info" => session::get_user_info(executor).await,
        "get_settings" => settings::get_settings(executor).await,
        "get_plugins" => settings::get_plugins(executor).await,
        "get_version" => version::get_version(executor).await,
        other => json!({ "error": format!("Unknown tool: {}", other) }),
    }
}

/// Deserialize arguments, treating a missing/null value as `{}`
fn parse_args<P: DeserializeOwned>(arguments: Value) -> Result<P, Value> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(invalid_arguments)
}

async fn with_args<P, F, Fut>(arguments: Value, tool: F) -> Value
where
    P: DeserializeOwned,
    F: FnOnce(P) -> Fut,
    Fut: Future<Output = Value>,
{
    match parse_args(arguments) {
        Ok(params) => tool(params).await,
        Err(payload) => payload,
    }
}

/// Shape a failed call: keep the executor's message, else use `fallback`.
/// `details` is carried over when present.
pub(crate) fn failure(payload: Value, fallback: impl Into<String>) -> Value {
    let message = payload
        .get("error")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| fallback.into());

    let mut result = Map::new();
    result.insert("error".to_string(), Value::String(message));
    if let Some(details) = payload.get("details") {
        result.insert("details".to_string(), details.clone());
    }
    Value::Object(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::config::Config;
    use std::sync::Arc;

    fn executor(mock: &MockTransport, token: Option<&str>) -> RequestExecutor {
        let config = Config {
            token: token.map(str::to_string),
            ..Default::default()
        };
        RequestExecutor::with_transport(config, Arc::new(mock.clone()))
    }

    #[test]
    fn test_catalog_has_every_tool() {
        let names: Vec<_> = definitions().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "list_applications",
                "get_application_details",
                "create_application",
                "update_application",
                "delete_application",
                "sync_application",
                "get_user_info",
                "get_settings",
                "get_plugins",
                "get_version",
            ]
        );
        assert!(is_known("get_version"));
        assert!(!is_known("rollback_application"));
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let tool = serde_json::to_value(&definitions()[1]).unwrap();
        assert_eq!(tool["name"], "get_application_details");
        assert_eq!(tool["inputSchema"]["required"], json!(["name"]));
    }

    #[test]
    fn test_failure_prefers_executor_message() {
        let payload = json!({ "error": "API request failed: 500", "details": { "code": 13 } });
        let result = failure(payload, "Failed to retrieve settings");
        assert_eq!(result["error"], "API request failed: 500");
        assert_eq!(result["details"]["code"], 13);

        let result = failure(json!({}), "Failed to retrieve settings");
        assert_eq!(result, json!({ "error": "Failed to retrieve settings" }));
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let mock = MockTransport::new();
        let result = call_tool(&executor(&mock, Some("argocd-test-token")), "nope", Value::Null).await;
        assert_eq!(result["error"], "Unknown tool: nope");
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_required_argument() {
        let mock = MockTransport::new();
        let result = call_tool(
            &executor(&mock, Some("argocd-test-token")),
            "get_application_details",
            json!({}),
        )
        .await;

        let message = result["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid arguments:"));
        assert!(message.contains("name"));
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_wrong_argument_type() {
        let mock = MockTransport::new();
        let result = call_tool(
            &executor(&mock, Some("argocd-test-token")),
            "delete_application",
            json!({ "name": "guestbook", "cascade": "yes" }),
        )
        .await;

        assert!(
            result["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid arguments:")
        );
    }

    #[tokio::test]
    async fn test_null_arguments_for_optional_tool() {
        let mock = MockTransport::new().with_json(200, json!({ "items": [] }));
        let result = call_tool(&executor(&mock, Some("argocd-test-token")), "list_applications", Value::Null).await;
        assert_eq!(result, json!({ "items": [] }));
    }

    #[tokio::test]
    async fn test_missing_token_never_hits_network() {
        let mock = MockTransport::new();
        let result = call_tool(&executor(&mock, None), "get_settings", json!({})).await;

        assert_eq!(
            result["error"],
            "Token is required. Please set the ARGOCD_TOKEN environment variable."
        );
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_token_is_scrubbed_from_failures() {
        let mock = MockTransport::new()
            .with_response(401, r#"{"error":"invalid token s3cr3t-value"}"#);
        let result = call_tool(
            &executor(&mock, Some("s3cr3t-value")),
            "get_user_info",
            json!({}),
        )
        .await;

        let rendered = result.to_string();
        assert!(!rendered.contains("s3cr3t-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
