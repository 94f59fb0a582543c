//! Patch driver and diff guard.
//!
//! A patch operation parses the file once, retains a serialized
//! snapshot of the unmodified tree, applies the directive batch in
//! order, and re-serializes. The diff guard compares the two
//! serializations byte for byte: equality means nothing is written,
//! anything else replaces the file contents wholesale.

use std::fs;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::adapter::{AdapterError, Format};
use crate::directive::{apply_raw_batch, BatchReport};

/// Fatal errors of a patch operation. Parse failures abort the whole
/// batch: no directive is applied and nothing is written.
#[derive(Debug, Error)]
pub enum PatchError {
    #[error(transparent)]
    Adapter(#[from] AdapterError),
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a file-level patch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Whether the file was rewritten.
    pub changed: bool,
    pub report: BatchReport,
}

/// Apply a wire-form directive batch to a document text.
///
/// Returns `None` when the serialized result is byte-identical to the
/// serialized snapshot of the parsed input — the caller must not write
/// in that case.
pub fn patch_text(
    text: &str,
    format: Format,
    directives: &[Value],
) -> Result<(Option<String>, BatchReport), PatchError> {
    let adapter = format.adapter();
    let mut doc = adapter.parse(text)?;
    let snapshot = adapter.serialize(&doc)?;
    let report = apply_raw_batch(&mut doc, directives);
    let output = adapter.serialize(&doc)?;
    if output == snapshot {
        Ok((None, report))
    } else {
        Ok((Some(output), report))
    }
}

/// Apply a wire-form directive batch to a file, rewriting it only when
/// the content actually changed.
pub fn patch_file(
    path: &Path,
    format: Format,
    directives: &[Value],
) -> Result<PatchOutcome, PatchError> {
    let text = fs::read_to_string(path)?;
    let (output, report) = patch_text(&text, format, directives)?;
    match output {
        Some(new_text) => {
            fs::write(path, new_text)?;
            info!(path = %path.display(), applied = report.applied, skipped = report.skipped, "file patched");
            Ok(PatchOutcome { changed: true, report })
        }
        None => {
            debug!(path = %path.display(), "no structural change; file left untouched");
            Ok(PatchOutcome { changed: false, report })
        }
    }
}
