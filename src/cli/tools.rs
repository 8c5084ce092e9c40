//! Tool catalog and one-shot tool invocation

use serde_json::Value;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::cli::args::GlobalOptions;
use crate::cli::context::CommandContext;
use crate::error::{Error, Result};
use crate::output::json::format_json;
use crate::output::table::format_table;
use crate::tools::{self, ToolDefinition};

/// Table row for the tool catalog
#[derive(Debug, Tabled)]
struct ToolRow {
    #[tabled(rename = "TOOL")]
    name: String,
    #[tabled(rename = "ARGUMENTS")]
    arguments: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
}

impl From<&ToolDefinition> for ToolRow {
    fn from(tool: &ToolDefinition) -> Self {
        let required: Vec<&str> = tool.input_schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let arguments = tool.input_schema["properties"]
            .as_object()
            .map(|props| {
                props
                    .keys()
                    .map(|key| {
                        if required.contains(&key.as_str()) {
                            format!("{}*", key)
                        } else {
                            key.clone()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();

        Self {
            name: tool.name.to_string(),
            arguments: if arguments.is_empty() {
                "-".to_string()
            } else {
                arguments
            },
            description: tool.description.to_string(),
        }
    }
}

/// Print the tool catalog
pub fn list(format: OutputFormat) -> Result<()> {
    let definitions = tools::definitions();

    let output = match format {
        OutputFormat::Table => {
            let rows: Vec<ToolRow> = definitions.iter().map(ToolRow::from).collect();
            format_table(&rows)
        }
        OutputFormat::Json => format_json(&definitions)?,
    };

    println!("{}", output);
    Ok(())
}

/// Call one tool and print its mapping.
///
/// A mapping with an `error` key is still printed, then reported as a
/// failure so the exit status is non-zero.
pub async fn call(opts: &GlobalOptions, tool: &str, raw_args: &str) -> Result<()> {
    if !tools::is_known(tool) {
        return Err(Error::Other(format!(
            "Unknown tool: {} (run 'argocd-mcp tools' to list tools)",
            tool
        )));
    }

    let arguments: Value = serde_json::from_str(raw_args)
        .map_err(|e| Error::Other(format!("--args is not valid JSON: {}", e)))?;
    if !arguments.is_object() {
        return Err(Error::Other("--args must be a JSON object".to_string()));
    }

    let ctx = CommandContext::new(opts)?;
    let result = tools::call_tool(&ctx.executor, tool, arguments).await;

    println!("{}", serde_json::to_string_pretty(&result)?);

    match result.get("error").and_then(Value::as_str) {
        Some(message) => Err(Error::Other(format!("{} failed: {}", tool, message))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_marks_required_arguments() {
        let definitions = tools::definitions();
        let delete = definitions
            .iter()
            .find(|t| t.name == "delete_application")
            .unwrap();

        let row = ToolRow::from(delete);
        assert!(row.arguments.contains("name*"));
        assert!(row.arguments.contains("cascade"));
        assert!(!row.arguments.contains("cascade*"));
    }

    #[test]
    fn test_row_without_arguments() {
        let definitions = tools::definitions();
        let version = definitions.iter().find(|t| t.name == "get_version").unwrap();
        assert_eq!(ToolRow::from(version).arguments, "-");
    }
}
