//! Session tools

use serde_json::Value;

use super::{ToolDefinition, failure, no_arguments};
use crate::client::{ApiRequest, RequestExecutor};

/// Current user info for the configured token
pub async fn get_user_info(executor: &RequestExecutor) -> Value {
    let (ok, data) = executor.execute(ApiRequest::new("session/userinfo")).await;

    if ok {
        data
    } else {
        failure(data, "Failed to retrieve user information")
    }
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        "get_user_info",
        "Get the current user's info via api/v1/session/userinfo",
        no_arguments(),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use crate::config::Config;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_get_user_info() {
        let mock = MockTransport::new().with_json(
            200,
            json!({ "loggedIn": true, "username": "admin", "iss": "argocd" }),
        );
        let config = Config {
            token: Some("argocd-test-token".to_string()),
            ..Default::default()
        };
        let exec = RequestExecutor::with_transport(config, Arc::new(mock.clone()));

        let result = get_user_info(&exec).await;

        assert_eq!(result["username"], "admin");
        let sent = mock.last_request().await.unwrap();
        assert!(sent.url.ends_with("/api/v1/session/userinfo"));
        assert_eq!(sent.bearer_token, "argocd-test-token");
    }
}
