//! `snap-patch` — apply a directive batch to a configuration file in place.
//!
//! Usage:
//!   snap-patch <file> '<directives-json>' [json|yaml]
//!
//! The format defaults to the file extension. Prints `changed` when the
//! file was rewritten, `unchanged` otherwise. Skipped directives are
//! reported as warnings (set `RUST_LOG=warn` or stricter).

use std::path::PathBuf;

use serde_json::Value;
use snap_patch::{patch_file, Format};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let (file, batch) = match (args.get(1), args.get(2)) {
        (Some(f), Some(b)) => (PathBuf::from(f), b.clone()),
        _ => {
            eprintln!("Usage: snap-patch <file> '<directives-json>' [json|yaml]");
            std::process::exit(1);
        }
    };

    let format = match args.get(3) {
        Some(name) => match Format::from_name(name) {
            Some(format) => format,
            None => {
                eprintln!("Unknown format: {name}");
                std::process::exit(1);
            }
        },
        None => match Format::from_path(&file) {
            Some(format) => format,
            None => {
                eprintln!("Cannot infer format from {}; pass json or yaml.", file.display());
                std::process::exit(1);
            }
        },
    };

    let directives: Value = match serde_json::from_str(&batch) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid directive batch: {e}");
            std::process::exit(1);
        }
    };
    let directives = match directives.as_array() {
        Some(arr) => arr.clone(),
        None => {
            eprintln!("Directive batch must be a JSON array.");
            std::process::exit(1);
        }
    };

    match patch_file(&file, format, &directives) {
        Ok(outcome) => {
            println!("{}", if outcome.changed { "changed" } else { "unchanged" });
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
