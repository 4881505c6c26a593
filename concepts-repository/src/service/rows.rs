//! Accessors over the loosely-shaped JSON rows the store hands back.
//! Absent keys, JSON nulls and empty strings all read as "not present",
//! which is what OPTIONAL MATCH artifacts decay to.
use serde_json::Value;

pub(crate) fn opt_str(row: &Value, key: &str) -> Option<String> {
    row.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn str_list(row: &Value, key: &str) -> Vec<String> {
    row.get(key)
        .and_then(Value::as_array)
        .map(|xs| {
            xs.iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn opt_bool(row: &Value, key: &str) -> Option<bool> {
    row.get(key).and_then(Value::as_bool)
}

pub(crate) fn opt_i64(row: &Value, key: &str) -> Option<i64> {
    row.get(key).and_then(Value::as_i64)
}
