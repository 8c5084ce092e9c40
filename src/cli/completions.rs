//! Static shell completions

use std::io;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write a completion script for `shell` to stdout
pub fn run(shell: Shell) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, &mut io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bash_script_mentions_subcommands() {
        let mut command = Cli::command();
        let mut buf = Vec::new();
        generate(Shell::Bash, &mut command, "argocd-mcp", &mut buf);

        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("argocd-mcp"));
        assert!(script.contains("serve"));
        assert!(script.contains("completions"));
    }
}
