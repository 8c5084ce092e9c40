//! Version tool
//!
//! The version endpoint lives outside the versioned API prefix
//! (`/api/version`, not `/api/v1/version`).

use serde_json::Value;

use super::{ToolDefinition, failure, no_arguments};
use crate::client::{ApiRequest, RequestExecutor};

/// Build and version information of the API server
pub async fn get_version(executor: &RequestExecutor) -> Value {
    let request = ApiRequest::new("version").base_url(executor.config().version_base_url());
    let (ok, data) = executor.execute(request).await;

    if ok {
        data
    } else {
        failure(data, "Failed to retrieve ArgoCD version information")
    }
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        "get_version",
        "Get version information of the ArgoCD API server",
        no_arguments(),
    )]
}
