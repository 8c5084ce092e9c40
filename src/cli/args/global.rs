//! Global CLI options shared across all commands

use crate::cli::Cli;
use crate::config::ConfigOverrides;

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// CLI flag > environment variable > config file > default. This struct
/// captures the CLI/env layer (clap reads the environment); the config file
/// is layered underneath in `CommandContext`.
#[derive(Clone, Default)]
pub struct GlobalOptions {
    /// Bearer token override
    pub token: Option<String>,

    /// API base URL override
    pub api_url: Option<String>,

    /// Version endpoint base URL override
    pub version_url: Option<String>,

    /// Raw TLS verification flag
    pub verify_ssl: Option<String>,

    /// Request timeout override, in seconds
    pub timeout: Option<u64>,

    /// Custom config file path (defaults to ~/.argocd-mcp/config.yaml)
    pub config: Option<String>,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            token: cli.token.clone(),
            api_url: cli.api_url.clone(),
            version_url: cli.version_url.clone(),
            verify_ssl: cli.verify_ssl.clone(),
            timeout: cli.timeout,
            config: cli.config.clone(),
        }
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }

    /// The flag/env layer of configuration
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            token: self.token.clone(),
            api_url: self.api_url.clone(),
            version_url: self.version_url.clone(),
            verify_ssl: self.verify_ssl.clone(),
            timeout_secs: self.timeout,
        }
    }
}
