//! Init command implementation

use colored::Colorize;
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};

use crate::cli::args::GlobalOptions;
use crate::client::{ApiRequest, RequestExecutor};
use crate::config::{Config, ConfigFile, DEFAULT_API_URL};
use crate::error::Result;

/// Timeout for the connectivity check after prompting
const CHECK_TIMEOUT_SECS: u64 = 10;

/// Run the init command.
///
/// Prompts for the API URL, token and TLS verification, checks the token
/// against `session/userinfo` and saves the config file. A failed check is
/// reported but the configuration is still saved.
pub async fn run(opts: &GlobalOptions) -> Result<()> {
    println!("{}", "Welcome to argocd-mcp!".bold().green());
    println!("Let's set up your ArgoCD connection.\n");

    let existing = ConfigFile::load_at(opts.config_ref()).unwrap_or_default();
    let theme = ColorfulTheme::default();

    let api_url: String = Input::with_theme(&theme)
        .with_prompt("ArgoCD API URL")
        .default(
            existing
                .api_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(())
            } else {
                Err("URL must start with http:// or https://")
            }
        })
        .interact_text()?;

    let token: String = Password::with_theme(&theme)
        .with_prompt("ArgoCD token")
        .interact()?;

    let verify_ssl = Confirm::with_theme(&theme)
        .with_prompt("Verify TLS certificates?")
        .default(existing.verify_ssl.unwrap_or(true))
        .interact()?;

    let file = ConfigFile {
        token: Some(token).filter(|t| !t.is_empty()),
        api_url: Some(api_url),
        verify_ssl: Some(verify_ssl),
        ..existing
    };

    println!("\n{}", "Checking connection...".cyan());
    let executor = RequestExecutor::new(Config {
        api_url: file.api_url.clone().unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        ..Config::default()
    })?;
    let mut probe = ApiRequest::new("session/userinfo")
        .verify_ssl(verify_ssl)
        .timeout_secs(CHECK_TIMEOUT_SECS);
    if let Some(token) = &file.token {
        probe = probe.token(token.as_str());
    }
    let (ok, data) = executor.execute(probe).await;

    if ok {
        let user = data
            .get("username")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown user");
        println!("{} Authenticated as {}", "✓".green(), user.bold());
    } else {
        let message = data
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        println!("{} Connection check failed: {}", "⚠".yellow(), message);
        println!("  The configuration will be saved anyway.");
    }

    let path = file.save_at(opts.config_ref())?;
    println!(
        "\n{} Configuration saved to: {}",
        "✓".green(),
        path.display()
    );

    println!("\n{}", "You're all set! Try running:".bold());
    println!("  {} - Show configuration status", "argocd-mcp status".cyan());
    println!("  {} - List applications", "argocd-mcp call list_applications".cyan());
    println!("  {} - Start the MCP server", "argocd-mcp serve".cyan());

    Ok(())
}
