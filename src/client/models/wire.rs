//! ArgoCD wire shapes
//!
//! Mirrors the JSON the API server accepts and returns for an Application.
//! Every field is optional so partial server objects always deserialize;
//! defaults are applied when converting to the domain model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `v1alpha1.Application` as seen on the wire
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireApplication {
    #[serde(default)]
    pub metadata: WireMetadata,

    #[serde(default)]
    pub spec: WireSpec,

    /// Server-populated; never written back
    #[serde(default, skip_serializing)]
    pub status: Option<WireStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<WireSource>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<WireDestination>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_policy: Option<WireSyncPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSource {
    #[serde(rename = "repoURL", default, skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_revision: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helm: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kustomize: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireDestination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSyncPolicy {
    /// Presence of this key, even as `{}`, means automated sync is on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automated: Option<WireAutomated>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync_options: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAutomated {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub self_heal: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_empty: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sync: Option<WireStatusField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<WireStatusField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_state: Option<Value>,

    /// Keys such as `reconciledAt` or `sourceType` that are not modeled
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WireStatus {
    /// True only for `status: {}`
    pub fn is_empty(&self) -> bool {
        self.sync.is_none()
            && self.health.is_none()
            && self.resources.is_none()
            && self.conditions.is_none()
            && self.operation_state.is_none()
            && self.extra.is_empty()
    }
}

/// `{ "status": "..." }` wrapper used by sync and health
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireStatusField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
