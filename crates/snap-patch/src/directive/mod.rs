//! Change directives: types, wire codec, and the interpreter.
//!
//! # Directives
//!
//! ```text
//! { "update": { "properties": { <nested partial object> } } }
//! { "update": { "path": [<token>...], "value"|"values": <any>, "modifier"?: "set"|"append"|"prepend" } }
//! { "remove": { "properties": <array-of-keys> | <nested object of arrays> } }
//! { "remove": { "path": [<token>...], "value"|"values"?: <any>, "index"?: <int> } }
//! { "move":   { "path": [<token>...], "newPath": [<token>...], "modifier"?: "merge"|"replace" } }
//! { "replace": { "path": [<token>...], "pattern": <regex>, "with": <string> } }
//! ```
//!
//! The addressing mode is inferred from the directive shape: a sole
//! `properties` specifier selects properties mode, a `path` specifier
//! selects path mode, anything else is unrecognized and skipped.

pub mod apply;
pub mod codec;
pub mod merge;
pub mod types;

pub use apply::{apply_batch, apply_directive, apply_raw_batch, BatchReport, Outcome};
pub use codec::{from_json, to_json};
pub use merge::merge_into;
pub use types::{Directive, DirectiveError, MoveMode, Payload, UpdateMode};
