pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Rows of a quantity grid, in display order: (row label, key in the result).
pub(crate) const GRID_ROWS: [(&str, &str); 3] = [
    ("Derived", "auto_values"),
    ("Observed", "user_values"),
    ("Result", "result_row"),
];

/// Column labels when `result` is a quantity table (it carries `columns`).
pub(crate) fn grid_columns(result: &Map<String, Value>) -> Option<Vec<String>> {
    let Value::Array(columns) = result.get("columns")? else {
        return None;
    };
    Some(
        columns
            .iter()
            .filter_map(|c| c.as_str().map(str::to_string))
            .collect(),
    )
}

/// One grid row; blank where the column has no value.
pub(crate) fn grid_row(result: &Map<String, Value>, key: &str, columns: &[String]) -> Vec<String> {
    let values = result.get(key).and_then(Value::as_object);
    columns
        .iter()
        .map(|c| {
            values
                .and_then(|m| m.get(c))
                .map(scalar_text)
                .unwrap_or_default()
        })
        .collect()
}

/// Plain text for a scalar JSON value. Null renders blank.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
