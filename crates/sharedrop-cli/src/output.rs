//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use sharedrop_realtime::Event;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item as JSON, or as `key: value` lines for tables.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    let value = serde_json::to_value(item).unwrap_or_default();
    match (format, value) {
        (OutputFormat::Table, serde_json::Value::Object(fields)) => {
            for (key, value) in fields {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                print_kv(&key, &text);
            }
        }
        (_, value) => {
            let json = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print one live event.
pub fn print_event(event: &Event, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(event) {
            Ok(line) => println!("{line}"),
            Err(e) => print_error(&format!("Cannot render event: {e}")),
        },
        OutputFormat::Table => println!("{}", describe_event(event)),
    }
}

/// One-line human summary of an event.
pub fn describe_event(event: &Event) -> String {
    let mut line = format!(
        "[{}] {:<16} {}",
        event.timestamp.format("%H:%M:%S"),
        event.event_type.as_str(),
        event.user
    );
    if let Some(photo) = &event.photo_id {
        line.push_str(&format!(" on {photo}"));
    }
    if let Some(action) = &event.action {
        line.push_str(&format!(" ({action})"));
    }
    if let Some(data) = &event.data {
        line.push_str(&format!(" {data}"));
    }
    line
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
