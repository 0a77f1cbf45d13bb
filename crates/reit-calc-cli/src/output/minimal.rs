use serde_json::Value;

use super::cell;

/// Headline figure of each command, checked in order.
const HEADLINE_KEYS: [&str; 6] = [
    "actual_roi",
    "leveraged_roi",
    "recommended_cap_rate",
    "gross_operating_profit",
    "total_investment",
    "distribution_requirement",
];

/// Print just the headline value of the output.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => {
            let headline = HEADLINE_KEYS
                .iter()
                .find_map(|key| map.get(*key).filter(|v| !v.is_null()));
            match headline {
                Some(val) => println!("{}", cell(val)),
                None => {
                    if let Some((key, val)) = map.iter().next() {
                        println!("{key}: {}", cell(val));
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                println!("{}", cell(item));
            }
        }
        other => println!("{}", cell(other)),
    }
}
