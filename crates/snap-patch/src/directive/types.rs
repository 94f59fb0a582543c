//! Core types for change directives.

use serde_json::Value;
use thiserror::Error;

pub use snap_path::Path;

// ── Errors ────────────────────────────────────────────────────────────────

/// Errors raised while decoding a directive from its wire form.
///
/// These are non-fatal to a batch: the batch applier skips the
/// offending directive and keeps going.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("UNRECOGNIZED_SHAPE")]
    UnrecognizedShape,
    #[error("INVALID_DIRECTIVE: {0}")]
    Invalid(String),
}

impl From<snap_path::PathError> for DirectiveError {
    fn from(e: snap_path::PathError) -> Self {
        DirectiveError::Invalid(e.to_string())
    }
}

// ── Modifiers ─────────────────────────────────────────────────────────────

/// How a new value combines with the existing value at a path target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateMode {
    /// Replace the value at the target outright.
    #[default]
    Set,
    /// Array target: concatenate at the end. String target: `existing + new`.
    Append,
    /// Array target: concatenate at the front. String target: `new + existing`.
    Prepend,
}

/// Destination-collision policy for a move directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Deep-merge the source value into the destination value.
    Merge,
    /// Assign the source value onto the destination.
    Overwrite,
}

// ── Payload ───────────────────────────────────────────────────────────────

/// The value payload of a path-addressed directive: `value` or `values`.
///
/// The distinction matters for removal filters — `value` means "equal
/// to this value" (even when it is itself an array), `values` means
/// "equal to any of these".
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(Value),
    Many(Vec<Value>),
}

impl Payload {
    /// Collapse the payload into a single value (`Many` becomes an array).
    pub fn into_value(self) -> Value {
        match self {
            Payload::One(v) => v,
            Payload::Many(vs) => Value::Array(vs),
        }
    }

    /// The payload as a flat list of elements for array concatenation.
    ///
    /// A single array value contributes its elements, so appending
    /// `["a", "b"]` extends rather than nests.
    pub fn concat_items(&self) -> Vec<Value> {
        match self {
            Payload::Many(vs) => vs.clone(),
            Payload::One(Value::Array(vs)) => vs.clone(),
            Payload::One(v) => vec![v.clone()],
        }
    }

    /// Equality filter for remove-by-value.
    pub fn matches(&self, candidate: &Value) -> bool {
        match self {
            Payload::One(v) => candidate == v,
            Payload::Many(vs) => vs.iter().any(|v| candidate == v),
        }
    }
}

// ── Directive enum ────────────────────────────────────────────────────────

/// One instruction in a patch batch.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Deep structural merge of a nested partial object into the root.
    UpdateProperties { properties: Value },
    /// Write a value at an explicit path, with a combine modifier.
    UpdatePath {
        path: Path,
        payload: Payload,
        mode: UpdateMode,
    },
    /// Delete keys named by an array, or walk a nested removal object.
    RemoveProperties { properties: Value },
    /// Delete a key / splice an element / filter an array at a path.
    RemovePath {
        path: Path,
        payload: Option<Payload>,
        index: Option<usize>,
    },
    /// Relocate the value at `path` to `new_path`.
    Move {
        path: Path,
        new_path: Path,
        mode: Option<MoveMode>,
    },
    /// Regex find/replace on a string leaf.
    Replace {
        path: Path,
        pattern: String,
        with: String,
    },
}

impl Directive {
    /// The action name as it appears on the wire.
    pub fn action(&self) -> &'static str {
        match self {
            Directive::UpdateProperties { .. } | Directive::UpdatePath { .. } => "update",
            Directive::RemoveProperties { .. } | Directive::RemovePath { .. } => "remove",
            Directive::Move { .. } => "move",
            Directive::Replace { .. } => "replace",
        }
    }
}
