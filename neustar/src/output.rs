//! Output formatting: plain text (tables and key/value) and JSON.

use serde::Serialize;
use serde_json::Value;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable tables and key-value
    #[default]
    Plain,
    /// JSON (pretty-printed)
    Json,
}

/// Columns shown for each resource in plain output.
pub const MONITOR_COLUMNS: &[&str] = &["id", "name", "active", "interval", "type", "browser"];
pub const SAMPLE_COLUMNS: &[&str] = &["id", "startTime", "duration", "status", "location"];
pub const AGGREGATE_COLUMNS: &[&str] = &[
    "date", "location", "stepName", "count", "avg", "tp50", "tp90", "uptime",
];
pub const POLICY_COLUMNS: &[&str] = &["id", "name", "strikes", "emailAddresses"];
pub const SCRIPT_COLUMNS: &[&str] = &["id", "name", "version", "inUse", "modified"];

/// Trailer under a page of samples, with a hint for fetching the next one.
pub fn page_footer(shown: usize, offset: Option<u64>, more: Option<bool>) -> String {
    let offset = offset.unwrap_or(0);
    if more == Some(true) {
        format!(
            "{} shown from offset {}; more available with --offset {}",
            shown,
            offset,
            offset + shown as u64
        )
    } else {
        format!("{} shown from offset {}", shown, offset)
    }
}

/// Render any serializable result.
pub fn render<T: Serialize + ?Sized>(
    value: &T,
    format: OutputFormat,
    columns: &[&str],
) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&value),
        OutputFormat::Plain => Ok(format_plain(&value, columns)),
    }
}

/// Arrays of objects become a table over `columns` (all keys of the first row
/// when `columns` is empty); objects become `key: value` lines.
pub fn format_plain(value: &Value, columns: &[&str]) -> String {
    let mut out = String::new();
    match value {
        Value::Array(rows) if rows.is_empty() => out.push_str("<empty>\n"),
        Value::Array(rows) if rows.iter().all(Value::is_object) => {
            let keys: Vec<String> = if columns.is_empty() {
                rows[0]
                    .as_object()
                    .map(|m| m.keys().cloned().collect())
                    .unwrap_or_default()
            } else {
                columns.iter().map(|c| c.to_string()).collect()
            };
            write_table(&mut out, rows, &keys);
        }
        Value::Array(items) => {
            for item in items {
                let _ = writeln!(out, "{}", cell(item));
            }
        }
        Value::Object(map) => {
            let width = map.keys().map(String::len).max().unwrap_or(0);
            for (k, v) in map {
                if v.is_null() {
                    continue;
                }
                let _ = writeln!(out, "{:<width$}  {}", k, cell(v), width = width);
            }
        }
        other => {
            let _ = writeln!(out, "{}", cell(other));
        }
    }
    out
}

fn write_table(out: &mut String, rows: &[Value], keys: &[String]) {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            keys.iter()
                .map(|k| row.get(k).map(cell).unwrap_or_else(|| "-".to_string()))
                .collect()
        })
        .collect();
    let widths: Vec<usize> = keys
        .iter()
        .enumerate()
        .map(|(i, k)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(k.len()))
                .max()
                .unwrap_or(0)
                .min(40)
        })
        .collect();
    let line = |values: Vec<String>| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", truncate(v, *w), w = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    let _ = writeln!(out, "{}", line(keys.to_vec()));
    let _ = writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  ")
    );
    for row in cells {
        let _ = writeln!(out, "{}", line(row));
    }
}

fn cell(v: &Value) -> String {
    match v {
        Value::Null => "-".to_string(),
        Value::String(s) => s.replace('\n', " "),
        Value::Array(items) => items.iter().map(cell).collect::<Vec<_>>().join(","),
        Value::Object(_) => v.to_string(),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
