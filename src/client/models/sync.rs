//! Sync, refresh and delete options

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;

/// Reconciliation forced by a read (`refresh` query parameter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    Hard,
    Normal,
}

impl RefreshMode {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshMode::Hard => "hard",
            RefreshMode::Normal => "normal",
        }
    }
}

impl FromStr for RefreshMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hard" => Ok(RefreshMode::Hard),
            "normal" => Ok(RefreshMode::Normal),
            other => Err(format!("unknown refresh mode: {}", other)),
        }
    }
}

/// Kubernetes propagation policy for cascading deletes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationPolicy {
    Foreground,
    Background,
    Orphan,
}

impl PropagationPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            PropagationPolicy::Foreground => "foreground",
            PropagationPolicy::Background => "background",
            PropagationPolicy::Orphan => "orphan",
        }
    }
}

impl FromStr for PropagationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "foreground" => Ok(PropagationPolicy::Foreground),
            "background" => Ok(PropagationPolicy::Background),
            "orphan" => Ok(PropagationPolicy::Orphan),
            other => Err(format!("unknown propagation policy: {}", other)),
        }
    }
}

/// Sync strategy; serializes as `{"apply":{}}` or `{"hook":{}}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStrategy {
    Apply {},
    Hook {},
}

impl FromStr for SyncStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apply" => Ok(SyncStrategy::Apply {}),
            "hook" => Ok(SyncStrategy::Hook {}),
            other => Err(format!("unknown sync strategy: {}", other)),
        }
    }
}

/// Body of `POST applications/{name}/sync`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub name: String,
    pub prune: bool,
    pub dry_run: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<SyncStrategy>,

    /// Restrict the sync to these resources (group/kind/name/namespace)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<BTreeMap<String, String>>>,
}

impl SyncRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prune: false,
            dry_run: false,
            revision: None,
            strategy: None,
            resources: None,
        }
    }
}
