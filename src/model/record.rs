//! Immutable updates and safe reads over JSON user records.
//!
//! Form inputs are named after the dotted path of the field they edit
//! (`address.geo.lat`), so a single change event maps onto one call to
//! [`update`].

use serde_json::{Map, Value};

/// Returns `record` with the leaf at the dot-separated `path` set to `value`.
///
/// Every object on the way down is rebuilt in place from the owned input, so
/// subtrees off the path are moved into the result untouched. Missing levels
/// are created. A level holding anything other than an object (including an
/// empty string or `null`) is replaced by an empty object before descending.
pub fn update(record: Value, path: &str, value: impl Into<Value>) -> Value {
    let keys: Vec<&str> = path.split('.').collect();
    Value::Object(assign(into_object(record), &keys, value.into()))
}

fn assign(mut node: Map<String, Value>, keys: &[&str], value: Value) -> Map<String, Value> {
    match keys {
        [] => node,
        [last] => {
            node.insert((*last).to_owned(), value);
            node
        }
        [head, rest @ ..] => {
            let slot = node.entry(*head).or_insert(Value::Null);
            let child = into_object(slot.take());
            *slot = Value::Object(assign(child, rest, value));
            node
        }
    }
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Reads the leaf at `path` as display text.
///
/// Absent levels, `null` and container values read as `""`.
pub fn lookup_text(record: &Value, path: &str) -> String {
    let leaf = path
        .split('.')
        .try_fold(record, |node, key| node.as_object()?.get(key));

    match leaf {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}
