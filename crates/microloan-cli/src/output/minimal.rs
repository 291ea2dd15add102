use serde_json::Value;

use super::format_value;

/// Fields answered by `--output minimal`, in priority order. Document
/// exports answer with the written path, quotes with the amount due.
const PRIORITY_KEYS: [&str; 4] = ["file", "total_amount", "daily_payment", "total_interest"];

/// Print just the key answer value from the output.
///
/// Looks through the result object and then its `totals`, falling back to
/// the first field.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal(value));
}

fn minimal(value: &Value) -> String {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result else {
        return format_value(result);
    };

    let scopes = [Some(map), map.get("totals").and_then(Value::as_object)];
    for key in PRIORITY_KEYS {
        for scope in scopes.iter().flatten() {
            if let Some(val) = scope.get(key).filter(|v| !v.is_null()) {
                return format_value(val);
            }
        }
    }

    match map.iter().next() {
        Some((key, val)) => format!("{}: {}", key, format_value(val)),
        None => String::new(),
    }
}
