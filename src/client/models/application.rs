//! Application domain model and its wire mapping

use serde::Serialize;
use serde_json::Value;

use super::wire::{
    WireApplication, WireAutomated, WireDestination, WireMetadata, WireSource, WireSpec,
    WireStatus, WireStatusField, WireSyncPolicy,
};

/// Revision used when none is given
pub const DEFAULT_TARGET_REVISION: &str = "HEAD";

/// Namespace the ArgoCD control plane runs in
pub const DEFAULT_APP_NAMESPACE: &str = "argocd";

/// Project assumed when the server omits one
pub const DEFAULT_PROJECT: &str = "default";

/// Sync/health value when the server reports nothing
pub const UNKNOWN_STATUS: &str = "Unknown";

/// Where manifests come from, typically a Git repository
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationSource {
    pub repo_url: String,
    pub path: String,
    pub target_revision: String,

    /// Helm render options, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helm: Option<Value>,

    /// Kustomize render options, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kustomize: Option<Value>,

    /// Plain directory render options, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<Value>,
}

impl ApplicationSource {
    pub fn new(repo_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            path: path.into(),
            target_revision: DEFAULT_TARGET_REVISION.to_string(),
            helm: None,
            kustomize: None,
            directory: None,
        }
    }

    pub fn target_revision(mut self, revision: impl Into<String>) -> Self {
        self.target_revision = revision.into();
        self
    }
}

/// Cluster and namespace an application deploys to
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationDestination {
    pub server: String,
    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ApplicationDestination {
    pub fn new(server: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            namespace: namespace.into(),
            name: None,
        }
    }
}

/// Declarative sync behavior.
///
/// `prune`, `self_heal` and `allow_empty` only mean something while
/// `automated` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ApplicationSyncPolicy {
    pub automated: bool,
    pub prune: bool,
    pub self_heal: bool,
    pub allow_empty: bool,
    pub sync_options: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<Value>,
}

impl ApplicationSyncPolicy {
    /// Automated policy with the given prune/self-heal flags
    pub fn automated(prune: bool, self_heal: bool) -> Self {
        Self {
            automated: true,
            prune,
            self_heal,
            ..Default::default()
        }
    }
}

/// Server-populated status; only ever read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStatus {
    pub sync_status: String,
    pub health_status: String,
    pub resources: Vec<Value>,
    pub conditions: Vec<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_state: Option<Value>,
}

/// ArgoCD application
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Application {
    pub name: String,
    pub project: String,
    pub source: ApplicationSource,
    pub destination: ApplicationDestination,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_policy: Option<ApplicationSyncPolicy>,

    pub namespace: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,
}

impl Application {
    pub fn new(
        name: impl Into<String>,
        project: impl Into<String>,
        source: ApplicationSource,
        destination: ApplicationDestination,
    ) -> Self {
        Self {
            name: name.into(),
            project: project.into(),
            source,
            destination,
            sync_policy: None,
            namespace: DEFAULT_APP_NAMESPACE.to_string(),
            status: None,
        }
    }

    /// Convert to the shape the API server accepts. Status is never included.
    pub fn to_wire(&self) -> WireApplication {
        WireApplication::from(self)
    }

    /// Build from a server object, defaulting anything missing
    pub fn from_wire(wire: WireApplication) -> Self {
        Self::from(wire)
    }

    /// Parse a raw JSON application.
    ///
    /// Missing fields are defaulted; only values of the wrong JSON type fail.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let wire: WireApplication = serde_json::from_value(value)?;
        Ok(Self::from_wire(wire))
    }
}

impl From<&Application> for WireApplication {
    fn from(app: &Application) -> Self {
        let source = &app.source;
        let destination = &app.destination;

        let sync_policy = app.sync_policy.as_ref().map(|policy| WireSyncPolicy {
            automated: policy.automated.then(|| WireAutomated {
                prune: Some(policy.prune),
                self_heal: Some(policy.self_heal),
                allow_empty: Some(policy.allow_empty),
            }),
            sync_options: (!policy.sync_options.is_empty()).then(|| policy.sync_options.clone()),
            retry: policy.retry.clone(),
        });

        WireApplication {
            metadata: WireMetadata {
                name: Some(app.name.clone()),
                namespace: Some(app.namespace.clone()),
            },
            spec: WireSpec {
                project: Some(app.project.clone()),
                source: Some(WireSource {
                    repo_url: Some(source.repo_url.clone()),
                    path: Some(source.path.clone()),
                    target_revision: Some(source.target_revision.clone()),
                    helm: source.helm.clone(),
                    kustomize: source.kustomize.clone(),
                    directory: source.directory.clone(),
                }),
                destination: Some(WireDestination {
                    server: Some(destination.server.clone()),
                    namespace: Some(destination.namespace.clone()),
                    name: destination.name.clone().filter(|n| !n.is_empty()),
                }),
                sync_policy,
            },
            status: None,
        }
    }
}

impl From<WireApplication> for Application {
    fn from(wire: WireApplication) -> Self {
        let WireApplication {
            metadata,
            spec,
            status,
        } = wire;

        let source = spec.source.unwrap_or_default();
        let destination = spec.destination.unwrap_or_default();

        let sync_policy = spec.sync_policy.map(|policy| {
            let automated = policy.automated.is_some();
            let flags = policy.automated.unwrap_or_default();
            ApplicationSyncPolicy {
                automated,
                prune: flags.prune.unwrap_or(false),
                self_heal: flags.self_heal.unwrap_or(false),
                allow_empty: flags.allow_empty.unwrap_or(false),
                sync_options: policy.sync_options.unwrap_or_default(),
                retry: policy.retry,
            }
        });

        Application {
            name: metadata.name.unwrap_or_default(),
            project: spec.project.unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
            source: ApplicationSource {
                repo_url: source.repo_url.unwrap_or_default(),
                path: source.path.unwrap_or_default(),
                target_revision: source
                    .target_revision
                    .unwrap_or_else(|| DEFAULT_TARGET_REVISION.to_string()),
                helm: source.helm,
                kustomize: source.kustomize,
                directory: source.directory,
            },
            destination: ApplicationDestination {
                server: destination.server.unwrap_or_default(),
                namespace: destination.namespace.unwrap_or_default(),
                name: destination.name,
            },
            sync_policy,
            namespace: metadata
                .namespace
                .unwrap_or_else(|| DEFAULT_APP_NAMESPACE.to_string()),
            status: status.filter(|s| !s.is_empty()).map(status_from_wire),
        }
    }
}

fn status_from_wire(status: WireStatus) -> ApplicationStatus {
    let field = |f: Option<WireStatusField>| {
        f.and_then(|f| f.status)
            .unwrap_or_else(|| UNKNOWN_STATUS.to_string())
    };

    ApplicationStatus {
        sync_status: field(status.sync),
        health_status: field(status.health),
        resources: status.resources.unwrap_or_default(),
        conditions: status.conditions.unwrap_or_default(),
        operation_state: status.operation_state,
    }
}
