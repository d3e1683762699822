use serde_json::Value;
use std::io;

/// Write output as CSV to stdout.
///
/// Objects become two-column `field,value` records; nested objects and arrays
/// are flattened into dotted / indexed field names (`schedule[1].days`).
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Array(arr) if arr.iter().all(Value::is_object) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record(["field", "value"]);
            for (field, val) in flatten("", body) {
                let _ = wtr.write_record([field, val]);
            }
        }
    }

    let _ = wtr.flush();
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

/// Flatten a JSON value into (path, scalar) pairs.
fn flatten(prefix: &str, value: &Value) -> Vec<(String, String)> {
    match value {
        Value::Object(map) => map
            .iter()
            .flat_map(|(key, val)| {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val)
            })
            .collect(),
        Value::Array(arr) => arr
            .iter()
            .enumerate()
            .flat_map(|(i, val)| flatten(&format!("{prefix}[{i}]"), val))
            .collect(),
        _ => vec![(prefix.to_string(), format_csv_value(value))],
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "difference": "67.99",
            "breakdown": { "discount_value": "100.00" },
            "schedule": [{ "days": 90 }]
        });
        let pairs = flatten("", &value);
        assert!(pairs.contains(&("difference".to_string(), "67.99".to_string())));
        assert!(pairs.contains(&("breakdown.discount_value".to_string(), "100.00".to_string())));
        assert!(pairs.contains(&("schedule[0].days".to_string(), "90".to_string())));
    }
}
