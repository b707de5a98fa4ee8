//! Flatten nested JSON records into one row of named cells.

use crate::cell::Cell;
use serde_json::Value;

/// Flatten `value` depth-first into parallel name and value lists.
///
/// Object keys and array indexes are joined with `.`: `[{"rt": 0.8}]`
/// becomes `0.rt`. `null` leaves are dropped. When `id` is given it comes
/// first, under the column `id`.
pub fn flatten(value: &Value, id: Option<Cell>) -> (Vec<String>, Vec<Cell>) {
    let mut names = Vec::new();
    let mut values = Vec::new();
    if let Some(id) = id {
        names.push("id".to_string());
        values.push(id);
    }
    walk(value, &mut String::new(), &mut names, &mut values);
    (names, values)
}

fn walk(value: &Value, path: &mut String, names: &mut Vec<String>, values: &mut Vec<Cell>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                descend(key, child, path, names, values);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                descend(&i.to_string(), child, path, names, values);
            }
        }
        Value::Null => {}
        leaf => {
            names.push(path.clone());
            values.push(Cell::from_json(leaf));
        }
    }
}

fn descend(
    segment: &str,
    child: &Value,
    path: &mut String,
    names: &mut Vec<String>,
    values: &mut Vec<Cell>,
) {
    let restore = path.len();
    if !path.is_empty() {
        path.push('.');
    }
    path.push_str(segment);
    walk(child, path, names, values);
    path.truncate(restore);
}
