use clap::ValueEnum;
use serde_json::Value;
use tabled::{builder::Builder, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: OutputFormat, value: &Value) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).unwrap_or_default(),
        OutputFormat::Table => render_table(value),
    }
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in map {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            Table::from(builder).to_string()
        }
        Value::Array(rows) => render_rows(rows),
        _ => format_value(value),
    }
}

fn render_rows(rows: &[Value]) -> String {
    let Some(Value::Object(first)) = rows.first() else {
        return "(empty)".to_string();
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(String::as_str));
    for row in rows {
        if let Value::Object(map) = row {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default()),
            );
        }
    }
    Table::from(builder).to_string()
}

pub(crate) fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(x) if n.is_f64() => format!("{x:.6}"),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => items.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
