//! Output formatting for CLI commands
//!
//! Only operator subcommands print through here; the MCP server writes
//! protocol frames directly.

pub mod json;
pub mod table;
