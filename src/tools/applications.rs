//! Application tools: list, get, create, update, delete, sync

use log::{debug, error, info};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use super::{ToolDefinition, failure};
use crate::client::models::{
    Application, ApplicationDestination, ApplicationPatch, ApplicationSource,
    ApplicationSyncPolicy, DEFAULT_TARGET_REVISION, PropagationPolicy, RefreshMode, SyncRequest,
    SyncStrategy,
};
use crate::client::{ApiRequest, RequestExecutor};
use crate::error::ApiError;

fn default_true() -> bool {
    true
}

fn default_revision() -> String {
    DEFAULT_TARGET_REVISION.to_string()
}

/// Append `key=value` unless the value is empty
fn push_param(params: &mut Vec<(String, String)>, key: &str, value: &str) {
    if !value.is_empty() {
        params.push((key.to_string(), value.to_string()));
    }
}

/// Append `refresh` only for a recognized mode
fn push_refresh(params: &mut Vec<(String, String)>, refresh: &str) {
    if let Ok(mode) = refresh.parse::<RefreshMode>() {
        params.push(("refresh".to_string(), mode.as_str().to_string()));
    }
}

/// Names become a single path segment, so only characters valid in a
/// Kubernetes object name are accepted
fn require_name(name: &str) -> Result<(), Value> {
    if name.trim().is_empty() {
        return Err(json!({ "error": "Application name is required" }));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if !valid_chars || name == "." || name == ".." {
        return Err(json!({ "error": format!("Invalid application name: '{}'", name) }));
    }

    Ok(())
}

/// Domain view of one wire application
fn summarize(item: Value) -> Result<Value, ApiError> {
    let app = Application::from_value(item)?;
    Ok(serde_json::to_value(app)?)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListApplicationsParams {
    pub project: String,
    pub name: String,
    pub repo: String,
    pub namespace: String,
    pub refresh: String,
    pub summary: bool,
}

impl ListApplicationsParams {
    fn query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        push_param(&mut params, "project", &self.project);
        push_param(&mut params, "name", &self.name);
        push_param(&mut params, "repo", &self.repo);
        push_param(&mut params, "appNamespace", &self.namespace);
        push_refresh(&mut params, &self.refresh);
        params
    }
}

/// List applications with optional filters
pub async fn list_applications(executor: &RequestExecutor, params: ListApplicationsParams) -> Value {
    let request = ApiRequest::new("applications").query_pairs(params.query());
    let (ok, data) = executor.execute(request).await;

    if !ok {
        return failure(data, "Failed to retrieve applications");
    }

    if !params.summary {
        return data;
    }

    let items = match data.get("items") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };
    match items.into_iter().map(summarize).collect::<Result<Vec<_>, _>>() {
        Ok(items) => json!({ "items": items }),
        Err(err) => err.into_payload(None),
    }
}

#[derive(Debug, Deserialize)]
pub struct GetApplicationParams {
    pub name: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub refresh: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub summary: bool,
}

/// Get one application by name
pub async fn get_application_details(
    executor: &RequestExecutor,
    params: GetApplicationParams,
) -> Value {
    if let Err(payload) = require_name(&params.name) {
        return payload;
    }

    let mut query = Vec::new();
    push_param(&mut query, "project", &params.project);
    push_refresh(&mut query, &params.refresh);
    push_param(&mut query, "appNamespace", &params.namespace);

    let request = ApiRequest::new(format!("applications/{}", params.name)).query_pairs(query);
    let (ok, data) = executor.execute(request).await;

    if !ok {
        return failure(
            data,
            format!("Failed to get details for application '{}'", params.name),
        );
    }

    if params.summary {
        match summarize(data) {
            Ok(summary) => summary,
            Err(err) => err.into_payload(None),
        }
    } else {
        data
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateApplicationParams {
    pub name: String,
    pub project: String,
    pub repo_url: String,
    pub path: String,
    pub dest_server: String,
    pub dest_namespace: String,
    #[serde(default = "default_revision")]
    pub revision: String,
    #[serde(default)]
    pub automated_sync: bool,
    #[serde(default)]
    pub prune: bool,
    #[serde(default)]
    pub self_heal: bool,
    #[serde(default)]
    pub namespace: String,
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default)]
    pub upsert: bool,
}

impl CreateApplicationParams {
    fn application(&self) -> Application {
        let revision = if self.revision.is_empty() {
            DEFAULT_TARGET_REVISION
        } else {
            self.revision.as_str()
        };

        let mut app = Application::new(
            &self.name,
            &self.project,
            ApplicationSource::new(&self.repo_url, &self.path).target_revision(revision),
            ApplicationDestination::new(&self.dest_server, &self.dest_namespace),
        );

        if self.automated_sync {
            app.sync_policy = Some(ApplicationSyncPolicy::automated(self.prune, self.self_heal));
        }

        if !self.namespace.is_empty() {
            app.namespace = self.namespace.clone();
        }

        app
    }
}

/// Create a new application
pub async fn create_application(
    executor: &RequestExecutor,
    params: CreateApplicationParams,
) -> Value {
    if let Err(payload) = require_name(&params.name) {
        return payload;
    }

    let body = match serde_json::to_value(params.application().to_wire()) {
        Ok(body) => body,
        Err(err) => return ApiError::from(err).into_payload(None),
    };

    let mut request = ApiRequest::new("applications").method("POST").body(body);
    if params.validate {
        request = request.query("validate", "true");
    }
    if params.upsert {
        request = request.query("upsert", "true");
    }

    let (ok, response) = executor.execute(request).await;

    if ok {
        info!("Application '{}' created successfully", params.name);
        response
    } else {
        error!(
            "Failed to create application '{}': {}",
            params.name,
            error_text(&response)
        );
        failure(response, "Failed to create application")
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationParams {
    pub name: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub dest_server: Option<String>,
    #[serde(default)]
    pub dest_namespace: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub automated_sync: Option<bool>,
    #[serde(default)]
    pub prune: Option<bool>,
    #[serde(default)]
    pub self_heal: Option<bool>,
    #[serde(default = "default_true")]
    pub validate: bool,
}

impl UpdateApplicationParams {
    fn patch(&self) -> ApplicationPatch {
        ApplicationPatch {
            project: self.project.clone(),
            repo_url: self.repo_url.clone(),
            path: self.path.clone(),
            target_revision: self.revision.clone(),
            dest_server: self.dest_server.clone(),
            dest_namespace: self.dest_namespace.clone(),
            automated: self.automated_sync,
            prune: self.prune,
            self_heal: self.self_heal,
        }
    }
}

/// Update an existing application.
///
/// Fetches the current object, applies the overrides and PUTs it back. The
/// read-modify-write is not atomic.
pub async fn update_application(
    executor: &RequestExecutor,
    params: UpdateApplicationParams,
) -> Value {
    if let Err(payload) = require_name(&params.name) {
        return payload;
    }

    let path = format!("applications/{}", params.name);
    let (ok, mut current) = executor.execute(ApiRequest::new(&path)).await;
    if !ok {
        return failure(
            current,
            format!(
                "Failed to get current application details for '{}'",
                params.name
            ),
        );
    }

    let patch = params.patch();
    if patch.is_empty() {
        debug!("No overrides for '{}', resubmitting current spec", params.name);
    }
    if let Err(err) = patch.apply(&mut current) {
        return err.into_payload(None);
    }

    let mut request = ApiRequest::new(&path).method("PUT").body(current);
    if params.validate {
        request = request.query("validate", "true");
    }

    let (ok, response) = executor.execute(request).await;

    if ok {
        info!("Application '{}' updated successfully", params.name);
        response
    } else {
        error!(
            "Failed to update application '{}': {}",
            params.name,
            error_text(&response)
        );
        failure(
            response,
            format!("Failed to update application '{}'", params.name),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteApplicationParams {
    pub name: String,
    #[serde(default = "default_true")]
    pub cascade: bool,
    #[serde(default)]
    pub propagation_policy: String,
    #[serde(default)]
    pub namespace: String,
}

/// Delete an application
pub async fn delete_application(
    executor: &RequestExecutor,
    params: DeleteApplicationParams,
) -> Value {
    if let Err(payload) = require_name(&params.name) {
        return payload;
    }

    let mut query = vec![("cascade".to_string(), params.cascade.to_string())];
    if let Ok(policy) = params.propagation_policy.parse::<PropagationPolicy>() {
        query.push(("propagationPolicy".to_string(), policy.as_str().to_string()));
    }
    push_param(&mut query, "appNamespace", &params.namespace);

    let request = ApiRequest::new(format!("applications/{}", params.name))
        .method("DELETE")
        .query_pairs(query);
    let (ok, data) = executor.execute(request).await;

    if ok {
        info!(
            "Application '{}' deleted successfully (cascade: {})",
            params.name, params.cascade
        );
        json!({
            "status": "success",
            "message": format!("Application '{}' deleted successfully", params.name),
            "details": data,
        })
    } else {
        error!(
            "Failed to delete application '{}': {}",
            params.name,
            error_text(&data)
        );
        let message = data
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Failed to delete application '{}'", params.name));
        json!({ "error": message, "details": data })
    }
}

#[derive(Debug, Deserialize)]
pub struct SyncApplicationParams {
    pub name: String,
    #[serde(default)]
    pub revision: String,
    #[serde(default)]
    pub prune: bool,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub resources: Option<Vec<BTreeMap<String, String>>>,
    #[serde(default)]
    pub namespace: String,
}

impl SyncApplicationParams {
    fn sync_request(&self) -> SyncRequest {
        SyncRequest {
            prune: self.prune,
            dry_run: self.dry_run,
            revision: Some(self.revision.clone()).filter(|r| !r.is_empty()),
            strategy: self.strategy.parse::<SyncStrategy>().ok(),
            resources: self.resources.clone().filter(|r| !r.is_empty()),
            ..SyncRequest::new(&self.name)
        }
    }
}

/// Trigger a sync of an application
pub async fn sync_application(executor: &RequestExecutor, params: SyncApplicationParams) -> Value {
    if let Err(payload) = require_name(&params.name) {
        return payload;
    }

    let body = match serde_json::to_value(params.sync_request()) {
        Ok(body) => body,
        Err(err) => return ApiError::from(err).into_payload(None),
    };

    let mut query = Vec::new();
    push_param(&mut query, "appNamespace", &params.namespace);

    let request = ApiRequest::new(format!("applications/{}/sync", params.name))
        .method("POST")
        .query_pairs(query)
        .body(body);
    let (ok, response) = executor.execute(request).await;

    if ok {
        info!("Application '{}' sync initiated", params.name);
        response
    } else {
        error!(
            "Failed to sync application '{}': {}",
            params.name,
            error_text(&response)
        );
        failure(
            response,
            format!("Failed to sync application '{}'", params.name),
        )
    }
}

fn error_text(payload: &Value) -> &str {
    payload
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
}

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "list_applications",
            "List applications in ArgoCD with filtering options",
            json!({
                "type": "object",
                "properties": {
                    "project": { "type": "string", "description": "Filter applications by project name" },
                    "name": { "type": "string", "description": "Filter applications by name" },
                    "repo": { "type": "string", "description": "Filter applications by repository URL" },
                    "namespace": { "type": "string", "description": "Filter applications by namespace" },
                    "refresh": {
                        "type": "string",
                        "enum": ["hard", "normal"],
                        "description": "Force application reconciliation"
                    },
                    "summary": { "type": "boolean", "description": "Return a condensed view of each application" }
                }
            }),
        ),
        ToolDefinition::new(
            "get_application_details",
            "Get details for a specific application",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The application name" },
                    "project": { "type": "string", "description": "The project name" },
                    "refresh": {
                        "type": "string",
                        "enum": ["hard", "normal"],
                        "description": "Force application reconciliation"
                    },
                    "namespace": { "type": "string", "description": "The application namespace" },
                    "summary": { "type": "boolean", "description": "Return a condensed view of the application" }
                },
                "required": ["name"]
            }),
        ),
        ToolDefinition::new(
            "create_application",
            "Create a new application in ArgoCD",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The name of the application" },
                    "project": { "type": "string", "description": "The project name" },
                    "repo_url": { "type": "string", "description": "The Git repository URL" },
                    "path": { "type": "string", "description": "Path within the repository" },
                    "dest_server": { "type": "string", "description": "Destination Kubernetes API server URL" },
                    "dest_namespace": { "type": "string", "description": "Destination namespace" },
                    "revision": { "type": "string", "description": "Git revision (default: HEAD)" },
                    "automated_sync": { "type": "boolean", "description": "Enable automated sync" },
                    "prune": { "type": "boolean", "description": "Auto-prune resources" },
                    "self_heal": { "type": "boolean", "description": "Enable self-healing" },
                    "namespace": { "type": "string", "description": "Application namespace" },
                    "validate": { "type": "boolean", "description": "Validate the application before creation (default: true)" },
                    "upsert": { "type": "boolean", "description": "Update the application if it already exists" }
                },
                "required": ["name", "project", "repo_url", "path", "dest_server", "dest_namespace"]
            }),
        ),
        ToolDefinition::new(
            "update_application",
            "Update an existing application in ArgoCD",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The application name to update" },
                    "project": { "type": "string", "description": "New project name" },
                    "repo_url": { "type": "string", "description": "New Git repository URL" },
                    "path": { "type": "string", "description": "New path within the repository" },
                    "dest_server": { "type": "string", "description": "New destination Kubernetes API server URL" },
                    "dest_namespace": { "type": "string", "description": "New destination namespace" },
                    "revision": { "type": "string", "description": "New Git revision" },
                    "automated_sync": { "type": "boolean", "description": "Enable or disable automated sync" },
                    "prune": { "type": "boolean", "description": "Enable or disable auto-pruning" },
                    "self_heal": { "type": "boolean", "description": "Enable or disable self-healing" },
                    "validate": { "type": "boolean", "description": "Validate the application (default: true)" }
                },
                "required": ["name"]
            }),
        ),
        ToolDefinition::new(
            "delete_application",
            "Delete an application from ArgoCD",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The name of the application to delete" },
                    "cascade": { "type": "boolean", "description": "Delete application resources as well (default: true)" },
                    "propagation_policy": {
                        "type": "string",
                        "enum": ["foreground", "background", "orphan"],
                        "description": "Kubernetes propagation policy"
                    },
                    "namespace": { "type": "string", "description": "The application namespace" }
                },
                "required": ["name"]
            }),
        ),
        ToolDefinition::new(
            "sync_application",
            "Sync an application in ArgoCD",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "The name of the application to sync" },
                    "revision": { "type": "string", "description": "Git revision to sync to" },
                    "prune": { "type": "boolean", "description": "Prune resources" },
                    "dry_run": { "type": "boolean", "description": "Perform a dry run" },
                    "strategy": {
                        "type": "string",
                        "enum": ["apply", "hook"],
                        "description": "Sync strategy"
                    },
                    "resources": {
                        "type": "array",
                        "items": { "type": "object", "additionalProperties": { "type": "string" } },
                        "description": "Resources to sync (group, kind, name, namespace)"
                    },
                    "namespace": { "type": "string", "description": "The application namespace" }
                },
                "required": ["name"]
            }),
        ),
    ]
}
