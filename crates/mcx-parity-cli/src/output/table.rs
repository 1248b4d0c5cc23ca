use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{grid_columns, grid_row, scalar_text, GRID_ROWS};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => match grid_columns(res_map) {
            Some(columns) => print_grid(res_map, &columns),
            None => print_flat_object(res_map),
        },
        _ => print_flat_object(envelope),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Quantity table laid out like the calculator: one column per instrument,
/// one row each for derived, observed and result values.
fn print_grid(result: &Map<String, Value>, columns: &[String]) {
    if let Some(label) = result.get("label").and_then(Value::as_str) {
        println!("{}", label);
    }
    let mut builder = Builder::default();
    let mut header = vec![String::new()];
    header.extend(columns.iter().cloned());
    builder.push_record(header);

    for (label, key) in GRID_ROWS {
        let mut row = vec![label.to_string()];
        row.extend(grid_row(result, key, columns));
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_value(val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for map in arr.iter().filter_map(Value::as_object) {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}={}", k, scalar_text(v)))
            .collect::<Vec<_>>()
            .join(", "),
        _ => scalar_text(value),
    }
}
