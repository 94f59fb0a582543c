//! Format adapters: parse and serialize configuration documents.
//!
//! Both adapters feed the same tree type (`serde_json::Value` with
//! preserved key order), so directive semantics never vary by format —
//! only parse and serialize do.

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Parse/serialize contract consumed by the patch driver.
pub trait FormatAdapter {
    fn parse(&self, text: &str) -> Result<Value, AdapterError>;
    fn serialize(&self, doc: &Value) -> Result<String, AdapterError>;
}

/// JSON adapter: 2-space pretty print with a trailing newline, the
/// convention `package.json` files are written in.
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn parse(&self, text: &str) -> Result<Value, AdapterError> {
        Ok(serde_json::from_str(text)?)
    }

    fn serialize(&self, doc: &Value) -> Result<String, AdapterError> {
        let mut out = serde_json::to_string_pretty(doc)?;
        out.push('\n');
        Ok(out)
    }
}

/// YAML adapter for CI configuration files.
pub struct YamlAdapter;

impl FormatAdapter for YamlAdapter {
    fn parse(&self, text: &str) -> Result<Value, AdapterError> {
        Ok(serde_yaml::from_str(text)?)
    }

    fn serialize(&self, doc: &Value) -> Result<String, AdapterError> {
        Ok(serde_yaml::to_string(doc)?)
    }
}

/// Selects the adapter for a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    pub fn adapter(&self) -> &'static dyn FormatAdapter {
        match self {
            Format::Json => &JsonAdapter,
            Format::Yaml => &YamlAdapter,
        }
    }

    pub fn from_name(name: &str) -> Option<Format> {
        match name.to_lowercase().as_str() {
            "json" => Some(Format::Json),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Sniff the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Format> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_name)
    }
}
