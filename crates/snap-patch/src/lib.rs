//! snap-patch — declarative patch engine for Snap project configuration
//! files.
//!
//! Given a configuration document (JSON or YAML) and an ordered batch
//! of change directives, the engine mutates the document tree in place
//! and rewrites the file only when the serialized content actually
//! changed. Used by the Snap scaffolding tool when it edits
//! `package.json` and CI YAML during version patches.
//!
//! Directives address the tree in one of two modes: `properties`
//! (structural shape matching, deep merge) or `path` (an explicit
//! token list). Application is best-effort and non-transactional: a
//! directive that fails to resolve is skipped with a warning, and the
//! remaining directives still run against the cumulative state.

pub mod adapter;
pub mod directive;
pub mod driver;

pub use adapter::{Format, FormatAdapter, JsonAdapter, YamlAdapter};
pub use directive::{
    apply_batch, apply_directive, apply_raw_batch, from_json, to_json, BatchReport, Directive,
    DirectiveError, MoveMode, Outcome, Payload, UpdateMode,
};
pub use driver::{patch_file, patch_text, PatchError, PatchOutcome};
