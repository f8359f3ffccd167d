// src/specs/matches.rs
use serde_json::Value;

/// Router phases that can carry the loader payload.
const PAYLOAD_KEYS: [&str; 2] = ["l", "b"];

/// Pull the raw player items out of a page payload.
///
/// Accepted shapes, first match wins:
/// - the router `matches` array: first entry whose `l` or `b` object has
///   `playerItems.data` as an array;
/// - an object with `playerItems.data` or `data` as an array;
/// - a bare array of items (objects without router keys).
///
/// Anything else yields no items.
pub fn extract_player_items(payload: &Value) -> Vec<Value> {
    match payload {
        Value::Array(entries) => {
            let is_router = entries
                .iter()
                .any(|m| PAYLOAD_KEYS.iter().any(|k| m.get(*k).is_some_and(Value::is_object)));
            if is_router {
                entries.iter().find_map(items_in_match).unwrap_or_default()
            } else {
                entries.iter().filter(|v| v.is_object()).cloned().collect()
            }
        }
        Value::Object(_) => player_items(payload)
            .or_else(|| data_array(payload))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn items_in_match(m: &Value) -> Option<Vec<Value>> {
    PAYLOAD_KEYS
        .iter()
        .filter_map(|k| m.get(*k).filter(|v| v.is_object()))
        .find_map(player_items)
}

fn player_items(v: &Value) -> Option<Vec<Value>> {
    v.get("playerItems").and_then(data_array)
}

fn data_array(v: &Value) -> Option<Vec<Value>> {
    v.get("data").and_then(Value::as_array).cloned()
}
