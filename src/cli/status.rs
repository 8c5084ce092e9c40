//! Status command implementation

use colored::Colorize;

use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::config::ConfigFile;
use crate::error::Result;

/// Display the resolved configuration. The token is shown masked.
pub fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}\n", "argocd-mcp Configuration Status".bold());

    let config_path = ConfigFile::resolve_path(opts.config_ref())?;
    if config_path.exists() {
        println!("Config file: {}", config_path.display().to_string().cyan());
    } else {
        println!(
            "Config file: {} {}",
            config_path.display().to_string().cyan(),
            "(not found)".dimmed()
        );
    }
    println!();

    let config = match CommandContext::resolve_config(opts) {
        Ok(config) => config,
        Err(err) => {
            println!("{} Configuration invalid: {}", "✗".red(), err);
            println!("  → Run 'argocd-mcp init' to create a configuration");
            println!();
            return Ok(());
        }
    };

    match config.masked_token() {
        Some(masked) => println!("{} Token configured: {}", "✓".green(), masked),
        None => {
            println!("{} Token not configured", "✗".red());
            println!("  → Set ARGOCD_TOKEN or run 'argocd-mcp init'");
        }
    }

    println!("{} API URL: {}", "○".dimmed(), config.api_url.cyan());
    println!(
        "{} Version URL: {}",
        "○".dimmed(),
        config.version_base_url().cyan()
    );

    if config.verify_ssl {
        println!("{} TLS verification enabled", "✓".green());
    } else {
        println!("{} TLS verification disabled", "⚠".yellow());
    }

    println!("{} Timeout: {}s", "○".dimmed(), config.timeout_secs);
    println!();

    Ok(())
}
