//! snap-path — typed path navigation over configuration document trees.
//!
//! A path is an ordered list of [`Token`]s: object keys and array
//! indices. Navigation comes in two flavours:
//!
//! - read mode ([`locate`], [`locate_mut`], [`parent_mut`]) never
//!   creates nodes and short-circuits on the first token that fails to
//!   navigate;
//! - write mode ([`parent_mut_or_create`]) materializes missing object
//!   properties as empty objects, but never creates array elements.
//!
//! In both modes the final token is returned unresolved — what happens
//! at the target depends on the operation being applied there.

pub mod resolve;
pub mod types;

pub use resolve::{locate, locate_mut, parent_mut, parent_mut_or_create};
pub use types::{format_path, parse_tokens, Path, PathError, Token};
