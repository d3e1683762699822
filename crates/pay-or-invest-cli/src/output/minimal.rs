use serde_json::Value;

/// Fields that answer each command, most specific first.
const ANSWER_KEYS: [&str; 5] = [
    "recommendation_message",
    "invoice_date",
    "net_earnings",
    "recommendation",
    "difference",
];

/// Print just the answer: the recommendation sentence for comparisons, the
/// date for invoice lookups, the net amount for tax runs.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_minimal(result_obj);
    };

    ANSWER_KEYS
        .iter()
        .filter_map(|key| map.get(*key).filter(|v| !v.is_null()))
        .map(format_minimal)
        .next()
        .or_else(|| {
            map.iter()
                .next()
                .map(|(key, val)| format!("{}: {}", key, format_minimal(val)))
        })
        .unwrap_or_default()
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
