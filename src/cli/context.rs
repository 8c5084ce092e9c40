//! Command execution context
//!
//! Resolves configuration once and builds the shared request executor.

use crate::cli::args::GlobalOptions;
use crate::client::RequestExecutor;
use crate::config::{Config, ConfigFile};
use crate::error::Result;

/// Resolved configuration plus the executor every tool call goes through
pub struct CommandContext {
    pub config: Config,
    pub executor: RequestExecutor,
}

impl CommandContext {
    /// Load the config file, apply flag/env overrides and build the executor.
    ///
    /// # Errors
    /// Returns an error if an explicit config file is missing or invalid,
    /// or if the resolved URLs/timeout fail validation.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        let config = Self::resolve_config(opts)?;
        log::debug!("Resolved configuration: {:?}", config);

        if config.token.is_none() {
            log::warn!("No ArgoCD token configured; API tools will fail until ARGOCD_TOKEN is set");
        }

        let executor = RequestExecutor::new(config.clone())?;
        Ok(Self { config, executor })
    }

    /// Resolve configuration without building a client
    pub fn resolve_config(opts: &GlobalOptions) -> Result<Config> {
        let file = ConfigFile::load_at(opts.config_ref())?;
        Config::resolve(&opts.overrides(), file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "token: file-token\napi_url: https://file.example.com/api/v1\ntimeout_secs: 12\n",
        )
        .unwrap();

        let opts = GlobalOptions {
            api_url: Some("https://flag.example.com/api/v1".to_string()),
            config: Some(path.display().to_string()),
            ..Default::default()
        };
        let config = CommandContext::resolve_config(&opts).unwrap();

        assert_eq!(config.api_url, "https://flag.example.com/api/v1");
        assert_eq!(config.token.as_deref(), Some("file-token"));
        assert_eq!(config.timeout_secs, 12);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        let opts = GlobalOptions {
            config: Some(dir.path().join("nope.yaml").display().to_string()),
            ..Default::default()
        };
        assert!(CommandContext::resolve_config(&opts).is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();

        let opts = GlobalOptions {
            api_url: Some("argocd.example.com".to_string()),
            config: Some(path.display().to_string()),
            ..Default::default()
        };
        assert!(CommandContext::new(&opts).is_err());
    }
}
