//! Configuration management for argocd-mcp
//!
//! Settings are resolved once at startup with the precedence
//! CLI flag > environment variable > config file > default.
//! The resulting [`Config`] is immutable and shared by every tool call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Fallback ArgoCD API base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved runtime configuration
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Default bearer token used when a request does not carry its own
    pub token: Option<String>,

    /// Base URL for all `/api/v1` endpoints
    pub api_url: String,

    /// Base URL for the version endpoint, derived from `api_url` when unset
    pub version_url: Option<String>,

    /// Verify TLS certificates
    pub verify_ssl: bool,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: None,
            api_url: DEFAULT_API_URL.to_string(),
            version_url: None,
            verify_ssl: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &self.masked_token())
            .field("api_url", &self.api_url)
            .field("version_url", &self.version_url)
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Config {
    /// Layer command-line/environment overrides on top of a config file.
    pub fn resolve(overrides: &ConfigOverrides, file: ConfigFile) -> Result<Self> {
        let token = overrides
            .token
            .clone()
            .or(file.token)
            .filter(|t| !t.trim().is_empty());

        let api_url = overrides
            .api_url
            .clone()
            .or(file.api_url)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let version_url = overrides
            .version_url
            .clone()
            .or(file.version_url)
            .filter(|u| !u.trim().is_empty());

        let verify_ssl = match &overrides.verify_ssl {
            Some(raw) => parse_verify_ssl(raw),
            None => file.verify_ssl.unwrap_or(true),
        };

        let timeout_secs = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let config = Self {
            token,
            api_url,
            version_url,
            verify_ssl,
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that URLs and the timeout are usable
    pub fn validate(&self) -> Result<()> {
        for url in std::iter::once(&self.api_url).chain(self.version_url.as_ref()) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "URL must start with http:// or https://: {}",
                    url
                ))
                .into());
            }
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be at least 1 second".into()).into());
        }

        Ok(())
    }

    /// Base URL the version endpoint lives under.
    ///
    /// ArgoCD serves `/api/version` beside `/api/v1`, so without an explicit
    /// value the last path segment of `api_url` is dropped.
    pub fn version_base_url(&self) -> String {
        match &self.version_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => parent_url(&self.api_url),
        }
    }

    /// Token with all but the last four characters hidden
    pub fn masked_token(&self) -> Option<String> {
        self.token.as_deref().map(mask_secret)
    }
}

/// Values captured from CLI flags and environment variables
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub token: Option<String>,
    pub api_url: Option<String>,
    pub version_url: Option<String>,
    pub verify_ssl: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// On-disk configuration file; every field is optional
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_ssl: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("token", &self.token.as_deref().map(mask_secret))
            .field("api_url", &self.api_url)
            .field("version_url", &self.version_url)
            .field("verify_ssl", &self.verify_ssl)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".argocd-mcp").join("config.yaml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Self::default_path(),
        }
    }

    /// Load the config file.
    ///
    /// A missing file at the default location yields an empty config; a
    /// missing file at an explicit path is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        let resolved = Self::resolve_path(path)?;
        if path.is_none() && !resolved.exists() {
            log::debug!("No config file at {}, using defaults", resolved.display());
            return Ok(Self::default());
        }
        Self::load_from(resolved)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ConfigFile = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;
        Ok(file)
    }

    /// Save to an explicit path or the default location
    pub fn save_at(&self, path: Option<&str>) -> Result<PathBuf> {
        let resolved = Self::resolve_path(path)?;
        self.save_to(&resolved)?;
        Ok(resolved)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(path, contents)?;

        // The file holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(path, perms)?;
        }

        Ok(())
    }
}

/// Interpret an `ARGOCD_VERIFY_SSL` style string; only "false" disables.
pub fn parse_verify_ssl(value: &str) -> bool {
    !value.trim().eq_ignore_ascii_case("false")
}

fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

/// Drop the last path segment of a URL, keeping scheme and host intact.
fn parent_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let path_start = trimmed
        .find("://")
        .map(|i| i + 3)
        .and_then(|host_start| trimmed[host_start..].find('/').map(|j| host_start + j));

    match path_start {
        Some(start) => {
            let (root, path) = trimmed.split_at(start);
            match path.rfind('/') {
                Some(0) | None => root.to_string(),
                Some(idx) => format!("{}{}", root, &path[..idx]),
            }
        }
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.token.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.verify_ssl);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_parse_verify_ssl() {
        assert!(!parse_verify_ssl("false"));
        assert!(!parse_verify_ssl("FALSE"));
        assert!(!parse_verify_ssl(" False "));
        assert!(parse_verify_ssl("true"));
        assert!(parse_verify_ssl("0"));
        assert!(parse_verify_ssl("no"));
        assert!(parse_verify_ssl(""));
    }

    #[test]
    fn test_overrides_beat_file() {
        let overrides = ConfigOverrides {
            token: Some("cli-token".to_string()),
            api_url: Some("https://argocd.example.com/api/v1".to_string()),
            verify_ssl: Some("false".to_string()),
            ..Default::default()
        };
        let file = ConfigFile {
            token: Some("file-token".to_string()),
            api_url: Some("https://other.example.com/api/v1".to_string()),
            verify_ssl: Some(true),
            timeout_secs: Some(10),
            ..Default::default()
        };

        let config = Config::resolve(&overrides, file).unwrap();
        assert_eq!(config.token.as_deref(), Some("cli-token"));
        assert_eq!(config.api_url, "https://argocd.example.com/api/v1");
        assert!(!config.verify_ssl);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_blank_token_is_absent() {
        let overrides = ConfigOverrides {
            token: Some("   ".to_string()),
            ..Default::default()
        };
        let config = Config::resolve(&overrides, ConfigFile::default()).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let overrides = ConfigOverrides {
            api_url: Some("localhost:8080".to_string()),
            ..Default::default()
        };
        assert!(Config::resolve(&overrides, ConfigFile::default()).is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let overrides = ConfigOverrides {
            timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(Config::resolve(&overrides, ConfigFile::default()).is_err());
    }

    #[test]
    fn test_version_base_url_derived() {
        let config = Config::default();
        assert_eq!(config.version_base_url(), "http://localhost:8080/api");

        let config = Config {
            api_url: "https://argocd.example.com/api/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.version_base_url(), "https://argocd.example.com/api");

        let config = Config {
            api_url: "https://argocd.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(config.version_base_url(), "https://argocd.example.com");
    }

    #[test]
    fn test_version_base_url_explicit() {
        let config = Config {
            version_url: Some("https://argocd.example.com/api/".to_string()),
            ..Default::default()
        };
        assert_eq!(config.version_base_url(), "https://argocd.example.com/api");
    }

    #[test]
    fn test_debug_masks_token() {
        let config = Config {
            token: Some("eyJhbGciOiJIUzI1NiJ9.secret-part".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-part"));
        assert!(debug.contains("****"));
    }

    #[test]
    fn test_masked_token_short() {
        let config = Config {
            token: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(config.masked_token().as_deref(), Some("****"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");
        let file = ConfigFile {
            token: Some("file-token".to_string()),
            api_url: Some("https://argocd.example.com/api/v1".to_string()),
            verify_ssl: Some(false),
            ..Default::default()
        };

        file.save_to(&path).unwrap();
        let loaded = ConfigFile::load_from(path.clone()).unwrap();
        assert_eq!(loaded.token.as_deref(), Some("file-token"));
        assert_eq!(loaded.verify_ssl, Some(false));
        assert!(loaded.timeout_secs.is_none());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_load_explicit_missing_path_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(ConfigFile::load_at(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn test_load_empty_file_is_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        let loaded = ConfigFile::load_from(path).unwrap();
        assert!(loaded.api_url.is_none());
    }
}
