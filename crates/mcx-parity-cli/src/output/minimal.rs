use serde_json::Value;

use super::{grid_columns, grid_row, scalar_text};

/// Print just the answer: the parity line, or the result row of a quantity table.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        println!("{}", scalar_text(result_obj));
        return;
    };

    // Parity (one-shot or replayed session)
    if let Some(display) = map.get("display").and_then(Value::as_str) {
        println!("{}", display);
        return;
    }

    // Quantity table: COLUMN=result for every column that has one
    if let Some(columns) = grid_columns(map) {
        let row = grid_row(map, "result_row", &columns);
        for (column, value) in columns.iter().zip(row) {
            if !value.is_empty() {
                println!("{}={}", column, value);
            }
        }
        return;
    }

    if let Some(Value::Object(row)) = map.get("result_row") {
        for (column, value) in row {
            println!("{}={}", column, scalar_text(value));
        }
        return;
    }

    if let Some((key, val)) = map.iter().next() {
        println!("{}: {}", key, scalar_text(val));
    }
}
