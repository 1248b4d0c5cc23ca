use serde_json::{Map, Value};
use std::io;

use super::{grid_columns, grid_row, scalar_text, GRID_ROWS};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => match grid_columns(result) {
                Some(columns) => write_grid_csv(&mut wtr, result, &columns),
                None => write_field_csv(&mut wtr, result),
            },
            _ => write_field_csv(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

/// `row,CME,CE,...` header then one record per grid row.
fn write_grid_csv(wtr: &mut StdoutWriter<'_>, result: &Map<String, Value>, columns: &[String]) {
    let mut header = vec!["row".to_string()];
    header.extend(columns.iter().cloned());
    let _ = wtr.write_record(&header);

    for (label, key) in GRID_ROWS {
        let mut record = vec![label.to_ascii_lowercase()];
        record.extend(grid_row(result, key, columns));
        let _ = wtr.write_record(&record);
    }
}

fn write_field_csv(wtr: &mut StdoutWriter<'_>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
    }
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}
