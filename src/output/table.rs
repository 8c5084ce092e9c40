//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, Width, object::Columns, object::Rows},
};

/// Widest the last column (usually a description) may grow before wrapping
const LAST_COLUMN_WIDTH: usize = 60;

/// Format rows as a rounded table with a centered header
pub fn format_table<T: Tabled>(data: &[T]) -> String {
    if data.is_empty() {
        return "No results found.".to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Modify::new(Columns::last()).with(Width::wrap(LAST_COLUMN_WIDTH)));

    table.to_string()
}
