//! Recursive structural merge.
//!
//! The rule, applied type-directed at every level: objects merge
//! key-by-key, a live array absorbs incoming values by concatenation
//! (arrays extend, anything else pushes), and everything else
//! overwrites. Arrays always append — never replace, never dedup.

use serde_json::{Map, Value};

/// Merge `incoming` into the live value at `slot`.
pub fn merge_into(slot: &mut Value, incoming: &Value) {
    match incoming {
        Value::Object(src) => match slot {
            Value::Object(dst) => {
                for (key, value) in src {
                    match dst.get_mut(key) {
                        Some(nested) => merge_into(nested, value),
                        None => {
                            dst.insert(key.clone(), value.clone());
                        }
                    }
                }
            }
            Value::Array(dst) => dst.push(incoming.clone()),
            _ => *slot = incoming.clone(),
        },
        Value::Array(src) => match slot {
            Value::Array(dst) => dst.extend(src.iter().cloned()),
            _ => *slot = incoming.clone(),
        },
        scalar => match slot {
            Value::Array(dst) => dst.push(scalar.clone()),
            _ => *slot = scalar.clone(),
        },
    }
}

/// Merge a partial object into the document root, key by key.
///
/// Returns false when the root is not an object (nothing to merge into).
pub fn merge_properties(doc: &mut Value, properties: &Map<String, Value>) -> bool {
    let Some(root) = doc.as_object_mut() else {
        return false;
    };
    for (key, value) in properties {
        match root.get_mut(key) {
            Some(slot) => merge_into(slot, value),
            None => {
                root.insert(key.clone(), value.clone());
            }
        }
    }
    true
}
