//! Shared test utilities for the spendguard workspace.
//!
//! `xtask conformance` needs `normalize_nondeterministic` at runtime, not only under
//! `#[cfg(test)]`, so it lives in its own crate.

use serde_json::Value;

const TIMESTAMP: &str = "__TIMESTAMP__";
const VERSION: &str = "__VERSION__";

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// 1. **Root-only**: `tool.version` becomes `"__VERSION__"` only when the root object is a
///    report envelope (`schema`, `tool`, `run`, `summary`, `entries`). A transaction purpose or
///    destination that happens to hold a `tool` object is left alone.
///
/// 2. **Recursive**: `started_at`, `finished_at` and `duration_ms` are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = ["schema", "tool", "run", "summary", "entries"]
            .iter()
            .all(|k| obj.contains_key(*k));
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert("version".to_string(), Value::String(VERSION.to_string()));
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

/// Decision statuses of a report, in entry order.
pub fn entry_statuses(report: &Value) -> Vec<String> {
    report["entries"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|e| e["status"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String(TIMESTAMP.to_string()));
                }
            }
            if map.contains_key("duration_ms") {
                map.insert("duration_ms".to_string(), Value::Number(0.into()));
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
