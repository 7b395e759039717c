use comfy_table::{presets::UTF8_FULL_CONDENSED, CellAlignment, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::Serialize;

/// Prints `data` as pretty JSON in JSON mode, otherwise hands it to `render`.
pub fn output<T: Serialize + ?Sized>(json_mode: bool, data: &T, render: impl FnOnce(&T)) {
    if !json_mode {
        render(data);
        return;
    }
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{json}"),
        Err(e) => error(&format!("Failed to serialize JSON: {e}")),
    }
}

/// Table whose columns after the first `text_columns` are right-aligned counts.
pub fn counts_table(headers: &[&str], text_columns: usize) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    for index in text_columns..headers.len() {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

pub fn heading(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "─".repeat(title.chars().count()).cyan());
}

pub fn success(msg: &str) {
    println!("{} {msg}", "✓".green().bold());
}

pub fn warn(msg: &str) {
    eprintln!("{} {msg}", "warning:".yellow().bold());
}

pub fn error(msg: &str) {
    eprintln!("{} {msg}", "error:".red().bold());
}
