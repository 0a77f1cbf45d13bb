use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::cell;

/// Print a computation envelope, a bare object, or a list of records as tables.
///
/// Nested objects (such as the echoed parameters) get their own table and
/// numeric series are printed one row per year.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_object(result);
                print_envelope_notes(map);
            }
            _ => print_object(map),
        },
        Value::Array(records) => print_records(records),
        other => println!("{}", cell(other)),
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut nested: Vec<(&String, &Map<String, Value>)> = Vec::new();
    let mut series: Vec<(&String, &Vec<Value>)> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Object(inner) => nested.push((key, inner)),
            Value::Array(items) if items.iter().all(|v| !v.is_object()) && items.len() > 3 => {
                series.push((key, items))
            }
            _ => builder.push_record([key.as_str(), &cell(val)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in series {
        let mut builder = Builder::default();
        builder.push_record(["Year", key.as_str()]);
        for (i, item) in items.iter().enumerate() {
            builder.push_record([(i + 1).to_string(), cell(item)]);
        }
        println!("\n{}", Table::from(builder));
    }

    for (key, inner) in nested {
        println!("\n{key}:");
        print_object(inner);
    }
}

fn print_records(records: &[Value]) {
    let Some(Value::Object(first)) = records.first() else {
        for item in records {
            println!("{}", cell(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for record in records {
        if let Value::Object(map) = record {
            builder.push_record(
                headers
                    .iter()
                    .map(|h| map.get(h).map(cell).unwrap_or_default()),
            );
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }
    if let Some(Value::String(methodology)) = envelope.get("methodology") {
        println!("\nMethodology: {methodology}");
    }
}
