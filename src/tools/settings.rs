//! Server settings tools

use serde_json::Value;

use super::{ToolDefinition, failure, no_arguments};
use crate::client::{ApiRequest, RequestExecutor};

/// Server settings (URL, OIDC, resource overrides, ...)
pub async fn get_settings(executor: &RequestExecutor) -> Value {
    let (ok, data) = executor.execute(ApiRequest::new("settings")).await;

    if ok {
        data
    } else {
        failure(data, "Failed to retrieve ArgoCD settings")
    }
}

/// Configured config-management plugins
pub async fn get_plugins(executor: &RequestExecutor) -> Value {
    let (ok, data) = executor.execute(ApiRequest::new("settings/plugins")).await;

    if ok {
        data
    } else {
        failure(data, "Failed to retrieve ArgoCD plugins")
    }
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "get_settings",
            "Get ArgoCD server settings including UI, OIDC, and other configurations",
            no_arguments(),
        ),
        ToolDefinition::new(
            "get_plugins",
            "Get available ArgoCD plugins",
            no_arguments(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;

    fn executor(mock: &MockTransport) -> RequestExecutor {
        let config = Config {
            token: Some("argocd-test-token".to_string()),
            ..Default::default()
        };
        RequestExecutor::with_transport(config, Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_get_settings_path() {
        let mock = MockTransport::new().with_json(200, json!({ "url": "https://argocd.example.com" }));
        let result = get_settings(&executor(&mock)).await;

        assert_eq!(result["url"], "https://argocd.example.com");
        assert!(mock.last_request().await.unwrap().url.ends_with("/api/v1/settings"));
    }

    #[tokio::test]
    async fn test_get_plugins_failure_without_json_error() {
        let mock = MockTransport::new().with_response(502, "");
        let result = get_plugins(&executor(&mock)).await;

        assert_eq!(result, json!({ "error": "API request failed: 502" }));
        assert!(
            mock.last_request()
                .await
                .unwrap()
                .url
                .ends_with("/api/v1/settings/plugins")
        );
    }
}
