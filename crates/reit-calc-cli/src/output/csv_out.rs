use serde_json::{Map, Value};
use std::io;

use super::cell;

/// Write output as CSV to stdout.
///
/// Objects become `field,value` rows with nested keys joined by `.`; a list of
/// records becomes one row per record.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let rows: Vec<Vec<String>> = match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let mut rows = vec![vec!["field".to_string(), "value".to_string()]];
            flatten("", body, &mut rows);
            rows
        }
        Value::Array(records) => record_rows(records),
        other => vec![vec![cell(other)]],
    };

    for row in rows {
        if let Err(e) = wtr.write_record(&row) {
            eprintln!("CSV write error: {e}");
            return;
        }
    }
    let _ = wtr.flush();
}

fn flatten(prefix: &str, map: &Map<String, Value>, rows: &mut Vec<Vec<String>>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten(&name, inner, rows),
            _ => rows.push(vec![name, cell(val)]),
        }
    }
}

fn record_rows(records: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Object(first)) = records.first() else {
        return records.iter().map(|v| vec![cell(v)]).collect();
    };
    let headers: Vec<String> = first.keys().cloned().collect();
    let mut rows = vec![headers.clone()];
    for record in records {
        if let Value::Object(map) = record {
            rows.push(
                headers
                    .iter()
                    .map(|h| map.get(h).map(cell).unwrap_or_default())
                    .collect(),
            );
        }
    }
    rows
}
