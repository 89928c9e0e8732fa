use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known result fields in order of priority,
/// then fall back to the first field in the result object.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_answer(value));
}

/// JSON pointers into the result, most specific first.
const PRIORITY_PATHS: [&str; 6] = [
    "/break_even_rent_monthly",
    "/break_even_interest_pct",
    "/traffic_light/tone",
    "/net_cashflow_difference",
    "/net_cashflow",
    "/base_net_cashflow",
];

fn minimal_answer(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    // A present-but-null break-even is the answer ("unreachable")
    for path in &PRIORITY_PATHS {
        if let Some(val) = result_obj.pointer(path) {
            return format_minimal(val);
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, format_minimal(val));
        }
    }

    format_minimal(result_obj)
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "unreachable".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
