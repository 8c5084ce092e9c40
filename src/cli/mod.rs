//! CLI command definitions and handlers

use clap::{Parser, Subcommand};
pub use clap_complete::Shell;

pub mod args;
pub mod completions;
pub mod context;
pub mod init;
pub mod serve;
pub mod status;
pub mod tools;

pub use args::{GlobalOptions, OutputFormat};

/// argocd-mcp - Model Context Protocol server for the ArgoCD API
#[derive(Parser)]
#[command(name = "argocd-mcp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// ArgoCD bearer token
    #[arg(long, global = true, env = "ARGOCD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// ArgoCD API base URL (e.g. https://argocd.example.com/api/v1)
    #[arg(long, global = true, env = "ARGOCD_API_URL", hide_env = true)]
    pub api_url: Option<String>,

    /// Base URL of the version endpoint (defaults to the parent of --api-url)
    #[arg(long, global = true, env = "ARGOCD_VERSION_URL", hide_env = true)]
    pub version_url: Option<String>,

    /// Verify TLS certificates ("false" disables)
    #[arg(long, global = true, env = "ARGOCD_VERIFY_SSL", hide_env = true)]
    pub verify_ssl: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "ARGOCD_TIMEOUT", hide_env = true)]
    pub timeout: Option<u64>,

    /// Override config file location
    #[arg(long, global = true, env = "ARGOCD_MCP_CONFIG", hide_env = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(
        long,
        global = true,
        env = "ARGOCD_MCP_DEBUG",
        hide_env = true,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the MCP server on stdio (default)
    Serve,

    /// List the tools the server exposes
    #[command(after_help = "EXAMPLES:\n  \
            argocd-mcp tools                 # Table of tools\n  \
            argocd-mcp tools --format json   # Full catalog with input schemas")]
    Tools {
        /// Output format: table (default), json
        #[arg(long, short = 'o', default_value = "table")]
        format: OutputFormat,
    },

    /// Invoke a single tool and print its result
    #[command(after_help = "EXAMPLES:\n  \
            argocd-mcp call get_version\n  \
            argocd-mcp call list_applications --args '{\"project\":\"default\"}'\n  \
            argocd-mcp call sync_application --args '{\"name\":\"guestbook\",\"dry_run\":true}'")]
    Call {
        /// Tool name (see `argocd-mcp tools`)
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long, short = 'a', default_value = "{}")]
        args: String,
    },

    /// Show resolved configuration
    Status,

    /// Interactively create a configuration file
    Init,

    /// Generate shell completions
    #[command(after_help = "\
  bash:   argocd-mcp completions bash > /etc/bash_completion.d/argocd-mcp
  zsh:    argocd-mcp completions zsh > \"${fpath[1]}/_argocd-mcp\"
  fish:   argocd-mcp completions fish > ~/.config/fish/completions/argocd-mcp.fish")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Display version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["argocd-mcp"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "argocd-mcp",
            "call",
            "get_version",
            "--api-url",
            "https://argocd.example.com/api/v1",
            "--timeout",
            "5",
        ])
        .unwrap();

        assert_eq!(
            cli.api_url.as_deref(),
            Some("https://argocd.example.com/api/v1")
        );
        assert_eq!(cli.timeout, Some(5));
        match cli.command {
            Some(Commands::Call { tool, args }) => {
                assert_eq!(tool, "get_version");
                assert_eq!(args, "{}");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_debug_flag_without_value() {
        let cli = Cli::try_parse_from(["argocd-mcp", "version", "--debug"]).unwrap();
        assert!(cli.debug);

        let cli = Cli::try_parse_from(["argocd-mcp", "version"]).unwrap();
        assert!(!cli.debug);
    }

    #[test]
    fn test_tools_format() {
        let cli = Cli::try_parse_from(["argocd-mcp", "tools", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Tools {
                format: OutputFormat::Json
            })
        ));
    }
}
