//! Field-level overrides for updating an existing application
//!
//! The patch is applied to the raw object fetched from the server so that
//! fields the domain model does not know about (resourceVersion, labels,
//! ignoreDifferences, ...) survive the PUT.

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Optional overrides for an application update.
///
/// `None` and empty strings leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationPatch {
    pub project: Option<String>,
    pub repo_url: Option<String>,
    pub path: Option<String>,
    pub target_revision: Option<String>,
    pub dest_server: Option<String>,
    pub dest_namespace: Option<String>,
    pub automated: Option<bool>,
    pub prune: Option<bool>,
    pub self_heal: Option<bool>,
}

impl ApplicationPatch {
    /// True when applying the patch would change nothing
    pub fn is_empty(&self) -> bool {
        text(&self.project).is_none()
            && !self.touches_source()
            && !self.touches_destination()
            && !self.touches_sync_policy()
    }

    fn touches_source(&self) -> bool {
        text(&self.repo_url).is_some()
            || text(&self.path).is_some()
            || text(&self.target_revision).is_some()
    }

    fn touches_destination(&self) -> bool {
        text(&self.dest_server).is_some() || text(&self.dest_namespace).is_some()
    }

    fn touches_sync_policy(&self) -> bool {
        self.automated.is_some() || self.prune.is_some() || self.self_heal.is_some()
    }

    /// Apply the overrides to a wire application in place
    pub fn apply(&self, application: &mut Value) -> Result<(), ApiError> {
        let Value::Object(root) = application else {
            return Err(ApiError::InvalidResponse(
                "application is not a JSON object".to_string(),
            ));
        };

        let spec = object_entry(root, "spec")?;

        if let Some(project) = text(&self.project) {
            spec.insert("project".to_string(), Value::from(project));
        }

        if self.touches_source() {
            let source = object_entry(spec, "source")?;
            set_text(source, "repoURL", &self.repo_url);
            set_text(source, "path", &self.path);
            set_text(source, "targetRevision", &self.target_revision);
        }

        if self.touches_destination() {
            let destination = object_entry(spec, "destination")?;
            set_text(destination, "server", &self.dest_server);
            set_text(destination, "namespace", &self.dest_namespace);
        }

        if self.touches_sync_policy() {
            let policy = object_entry(spec, "syncPolicy")?;

            match self.automated {
                Some(true) => {
                    object_entry(policy, "automated")?;
                }
                Some(false) => {
                    policy.remove("automated");
                }
                None => {}
            }

            // Flags are only meaningful inside an existing automated block
            if let Some(Value::Object(automated)) = policy.get_mut("automated") {
                if let Some(prune) = self.prune {
                    automated.insert("prune".to_string(), Value::Bool(prune));
                }
                if let Some(self_heal) = self.self_heal {
                    automated.insert("selfHeal".to_string(), Value::Bool(self_heal));
                }
            }
        }

        Ok(())
    }
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn set_text(target: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(value) = text(value) {
        target.insert(key.to_string(), Value::from(value));
    }
}

/// Object stored under `key`, replacing a missing, null or scalar value
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
) -> Result<&'a mut Map<String, Value>, ApiError> {
    let slot = map.entry(key.to_string()).or_insert(Value::Null);
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
        .ok_or_else(|| ApiError::InvalidResponse(format!("{} is not an object", key)))
}
