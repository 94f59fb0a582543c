//! The directive interpreter.
//!
//! Applies directives to a document tree strictly in batch order. Each
//! directive observes the cumulative effect of all prior directives;
//! there is no isolation or rollback. Per-directive failures — a path
//! that fails to resolve, an out-of-range index, an invalid regex, an
//! unrecognized wire shape — are skips, not errors: they are surfaced
//! as `tracing::warn!` events and counted in the [`BatchReport`], and
//! the remaining directives still run.

use regex::Regex;
use serde_json::{Map, Value};
use snap_path::{format_path, locate, locate_mut, parent_mut, parent_mut_or_create, Token};
use tracing::{debug, warn};

use super::codec::from_json;
use super::merge::{merge_into, merge_properties};
use super::types::{Directive, MoveMode, Payload, UpdateMode};

// ── Outcome & report ──────────────────────────────────────────────────────

/// What happened to a single directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Skipped,
}

/// Tally of a batch application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub applied: usize,
    pub skipped: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }
}

// ── Final-token slot access ───────────────────────────────────────────────

/// Mutable slot at the final token. Never creates.
fn slot_mut<'a>(parent: &'a mut Value, last: &Token) -> Option<&'a mut Value> {
    match (parent, last) {
        (Value::Object(map), Token::Key(k)) => map.get_mut(k),
        (Value::Array(arr), Token::Index(i)) => arr.get_mut(*i),
        _ => None,
    }
}

/// Mutable slot at the final token, inserting a null placeholder for an
/// absent object property. Array slots must already exist.
fn slot_mut_or_insert<'a>(parent: &'a mut Value, last: &Token) -> Option<&'a mut Value> {
    match (parent, last) {
        (Value::Object(map), Token::Key(k)) => {
            Some(map.entry(k.clone()).or_insert(Value::Null))
        }
        (Value::Array(arr), Token::Index(i)) => arr.get_mut(*i),
        _ => None,
    }
}

/// Write-mode resolution of a full target path.
///
/// Object routes may be created, but array elements never are — so a
/// final index token requires the parent to already exist. Resolving it
/// in read mode keeps a directive that ultimately misses from creating
/// intermediate objects on the way to a nonexistent element.
fn resolve_target<'a, 'p>(
    doc: &'a mut Value,
    path: &'p [Token],
) -> Option<(&'a mut Value, &'p Token)> {
    match path.split_last() {
        Some((Token::Index(_), _)) => parent_mut(doc, path),
        _ => parent_mut_or_create(doc, path),
    }
}

/// Delete the value at the final token from its container.
fn delete_slot(parent: &mut Value, last: &Token) -> Option<Value> {
    match (parent, last) {
        (Value::Object(map), Token::Key(k)) => map.remove(k),
        (Value::Array(arr), Token::Index(i)) if *i < arr.len() => Some(arr.remove(*i)),
        _ => None,
    }
}

// ── update ────────────────────────────────────────────────────────────────

fn apply_update_properties(doc: &mut Value, properties: &Value) -> Outcome {
    let Some(props) = properties.as_object() else {
        warn!("update properties payload is not an object; directive skipped");
        return Outcome::Skipped;
    };
    if !merge_properties(doc, props) {
        warn!("document root is not an object; update skipped");
        return Outcome::Skipped;
    }
    Outcome::Applied
}

fn append_to(slot: &mut Value, payload: &Payload) {
    match slot {
        Value::Array(arr) => arr.extend(payload.concat_items()),
        Value::String(s) => match payload {
            Payload::One(Value::String(new)) => s.push_str(new),
            _ => *slot = payload.clone().into_value(),
        },
        _ => *slot = payload.clone().into_value(),
    }
}

fn prepend_to(slot: &mut Value, payload: &Payload) {
    match slot {
        Value::Array(arr) => {
            let mut items = payload.concat_items();
            items.append(arr);
            *arr = items;
        }
        Value::String(s) => match payload {
            Payload::One(Value::String(new)) => {
                let combined = format!("{new}{s}");
                *s = combined;
            }
            _ => *slot = payload.clone().into_value(),
        },
        _ => *slot = payload.clone().into_value(),
    }
}

fn apply_update_path(
    doc: &mut Value,
    path: &[Token],
    payload: &Payload,
    mode: UpdateMode,
) -> Outcome {
    let Some((parent, last)) = resolve_target(doc, path) else {
        warn!(path = %format_path(path), "update path did not resolve; directive skipped");
        return Outcome::Skipped;
    };
    let Some(slot) = slot_mut_or_insert(parent, last) else {
        warn!(path = %format_path(path), "update target index out of range; directive skipped");
        return Outcome::Skipped;
    };
    match mode {
        UpdateMode::Set => *slot = payload.clone().into_value(),
        UpdateMode::Append => append_to(slot, payload),
        UpdateMode::Prepend => prepend_to(slot, payload),
    }
    Outcome::Applied
}

// ── remove ────────────────────────────────────────────────────────────────

/// Depth-first walk of an object-shaped removal specifier.
///
/// An array leaf in the specifier either filters matching elements out
/// of a live array, or — when the live value is an object — names keys
/// to delete from it. Scalar leaves are ignored.
fn remove_matching(doc: &mut Value, removal: &Map<String, Value>) {
    let Some(live) = doc.as_object_mut() else {
        return;
    };
    for (key, spec) in removal {
        match spec {
            Value::Object(nested) => {
                if let Some(child) = live.get_mut(key) {
                    remove_matching(child, nested);
                }
            }
            Value::Array(entries) => match live.get_mut(key) {
                Some(Value::Array(target)) => {
                    target.retain(|element| !entries.contains(element));
                }
                Some(Value::Object(target)) => {
                    for entry in entries {
                        if let Some(name) = entry.as_str() {
                            target.remove(name);
                        }
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
}

fn apply_remove_properties(doc: &mut Value, properties: &Value) -> Outcome {
    match properties {
        Value::Array(keys) => {
            let Some(root) = doc.as_object_mut() else {
                warn!("document root is not an object; remove skipped");
                return Outcome::Skipped;
            };
            for key in keys {
                if let Some(name) = key.as_str() {
                    root.remove(name);
                }
            }
            Outcome::Applied
        }
        Value::Object(removal) => {
            remove_matching(doc, removal);
            Outcome::Applied
        }
        _ => {
            warn!("remove properties payload is neither array nor object; directive skipped");
            Outcome::Skipped
        }
    }
}

fn apply_remove_path(
    doc: &mut Value,
    path: &[Token],
    payload: Option<&Payload>,
    index: Option<usize>,
) -> Outcome {
    let Some((parent, last)) = parent_mut(doc, path) else {
        warn!(path = %format_path(path), "remove path did not resolve; directive skipped");
        return Outcome::Skipped;
    };
    if let Some(payload) = payload {
        // Filter the array at the full path by value equality.
        let Some(Value::Array(arr)) = slot_mut(parent, last) else {
            warn!(path = %format_path(path), "remove-by-value target is not an array; directive skipped");
            return Outcome::Skipped;
        };
        arr.retain(|element| !payload.matches(element));
        return Outcome::Applied;
    }
    if let Some(index) = index {
        // Splice the array at the full path at the given index.
        let Some(Value::Array(arr)) = slot_mut(parent, last) else {
            warn!(path = %format_path(path), "remove-by-index target is not an array; directive skipped");
            return Outcome::Skipped;
        };
        if index >= arr.len() {
            warn!(path = %format_path(path), index, "remove index out of range; directive skipped");
            return Outcome::Skipped;
        }
        arr.remove(index);
        return Outcome::Applied;
    }
    // No value or index: delete the key or splice out the element.
    match delete_slot(parent, last) {
        Some(_) => Outcome::Applied,
        None => {
            warn!(path = %format_path(path), "remove target does not exist; directive skipped");
            Outcome::Skipped
        }
    }
}

// ── move ──────────────────────────────────────────────────────────────────

fn apply_move(
    doc: &mut Value,
    path: &[Token],
    new_path: &[Token],
    mode: Option<MoveMode>,
) -> Outcome {
    if new_path.starts_with(path) {
        warn!(
            path = %format_path(path),
            new_path = %format_path(new_path),
            "move destination is inside the source; directive skipped"
        );
        return Outcome::Skipped;
    }
    let Some(source) = locate(doc, path).cloned() else {
        warn!(path = %format_path(path), "move source does not exist; directive skipped");
        return Outcome::Skipped;
    };
    let existing = locate(doc, new_path);
    let mode = match (existing, mode) {
        (Some(Value::String(_)), None) => MoveMode::Overwrite,
        (Some(_), None) => {
            // Occupied destination with no modifier: never clobber.
            debug!(
                path = %format_path(path),
                new_path = %format_path(new_path),
                "move destination occupied and no modifier given; directive skipped"
            );
            return Outcome::Skipped;
        }
        (_, Some(mode)) => mode,
        (None, None) => MoveMode::Overwrite,
    };
    {
        let Some((parent, last)) = resolve_target(doc, new_path) else {
            warn!(new_path = %format_path(new_path), "move destination did not resolve; directive skipped");
            return Outcome::Skipped;
        };
        let Some(slot) = slot_mut_or_insert(parent, last) else {
            warn!(new_path = %format_path(new_path), "move destination index out of range; directive skipped");
            return Outcome::Skipped;
        };
        match mode {
            MoveMode::Overwrite => *slot = source,
            MoveMode::Merge => merge_into(slot, &source),
        }
    }
    // The move completed; drop the source from its original container.
    if let Some((parent, last)) = parent_mut(doc, path) {
        delete_slot(parent, last);
    }
    Outcome::Applied
}

// ── replace ───────────────────────────────────────────────────────────────

fn apply_replace(doc: &mut Value, path: &[Token], pattern: &str, with: &str) -> Outcome {
    let Some(slot) = locate_mut(doc, path) else {
        warn!(path = %format_path(path), "replace path did not resolve; directive skipped");
        return Outcome::Skipped;
    };
    let Value::String(s) = slot else {
        warn!(path = %format_path(path), "replace target is not a string; directive skipped");
        return Outcome::Skipped;
    };
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(pattern, error = %e, "invalid replace pattern; directive skipped");
            return Outcome::Skipped;
        }
    };
    *s = re.replace_all(s, with).into_owned();
    Outcome::Applied
}

// ── Entry points ──────────────────────────────────────────────────────────

/// Apply one directive to the document tree.
pub fn apply_directive(doc: &mut Value, directive: &Directive) -> Outcome {
    match directive {
        Directive::UpdateProperties { properties } => apply_update_properties(doc, properties),
        Directive::UpdatePath { path, payload, mode } => {
            apply_update_path(doc, path, payload, *mode)
        }
        Directive::RemoveProperties { properties } => apply_remove_properties(doc, properties),
        Directive::RemovePath { path, payload, index } => {
            apply_remove_path(doc, path, payload.as_ref(), *index)
        }
        Directive::Move { path, new_path, mode } => apply_move(doc, path, new_path, *mode),
        Directive::Replace { path, pattern, with } => apply_replace(doc, path, pattern, with),
    }
}

/// Apply a batch of decoded directives strictly in order.
pub fn apply_batch(doc: &mut Value, directives: &[Directive]) -> BatchReport {
    let mut report = BatchReport::default();
    for directive in directives {
        report.record(apply_directive(doc, directive));
    }
    report
}

/// Apply a batch of wire-form directives strictly in order.
///
/// Directives whose shape cannot be decoded are skipped with a warning,
/// matching the best-effort contract of the engine.
pub fn apply_raw_batch(doc: &mut Value, raw: &[Value]) -> BatchReport {
    let mut report = BatchReport::default();
    for entry in raw {
        match from_json(entry) {
            Ok(directive) => report.record(apply_directive(doc, &directive)),
            Err(e) => {
                warn!(error = %e, "directive not recognized; skipped");
                report.record(Outcome::Skipped);
            }
        }
    }
    report
}

// ── Tests ─────────────────────────────────────────────────────────────────
