//! argocd-mcp - Model Context Protocol server for the ArgoCD API

use clap::Parser;

mod cli;
mod client;
mod config;
mod error;
mod output;
mod server;
mod tools;

use cli::{Cli, Commands, GlobalOptions};
use error::Result;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

/// Log to stderr; stdout carries the MCP protocol.
///
/// `RUST_LOG` wins over the default filter and `--debug`.
fn init_logging(debug: bool) {
    let default_filter = if debug {
        "argocd_mcp=debug"
    } else {
        "argocd_mcp=info"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let opts = GlobalOptions::from_cli(&cli);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::serve::run(&opts).await,
        Commands::Tools { format } => cli::tools::list(format),
        Commands::Call { tool, args } => cli::tools::call(&opts, &tool, &args).await,
        Commands::Status => cli::status::run(&opts),
        Commands::Init => cli::init::run(&opts).await,
        Commands::Completions { shell } => {
            cli::completions::run(shell);
            Ok(())
        }
        Commands::Version => {
            println!("argocd-mcp version {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
