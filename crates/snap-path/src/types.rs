//! Path token types and wire-form decoding.

use serde_json::Value;
use thiserror::Error;

/// One step in a document path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Key(String),
    Index(usize),
}

/// An ordered list of path tokens.
pub type Path = Vec<Token>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("INVALID_TOKEN: {0}")]
    InvalidToken(String),
    #[error("NOT_AN_ARRAY")]
    NotAnArray,
}

impl Token {
    pub fn key(name: &str) -> Self {
        Token::Key(name.to_string())
    }

    /// Decode a single token from its wire form.
    ///
    /// Accepted shapes: a string (object key), a non-negative integer
    /// (array index), or a single-element array wrapping a non-negative
    /// integer (the YAML-oriented path dialect).
    pub fn from_value(raw: &Value) -> Result<Self, PathError> {
        match raw {
            Value::String(s) => Ok(Token::Key(s.clone())),
            Value::Number(n) => n
                .as_u64()
                .map(|i| Token::Index(i as usize))
                .ok_or_else(|| PathError::InvalidToken(raw.to_string())),
            Value::Array(items) if items.len() == 1 => match &items[0] {
                Value::Number(n) => n
                    .as_u64()
                    .map(|i| Token::Index(i as usize))
                    .ok_or_else(|| PathError::InvalidToken(raw.to_string())),
                _ => Err(PathError::InvalidToken(raw.to_string())),
            },
            _ => Err(PathError::InvalidToken(raw.to_string())),
        }
    }

    pub fn as_key(&self) -> Option<&str> {
        match self {
            Token::Key(k) => Some(k),
            Token::Index(_) => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Key(k) => f.write_str(k),
            Token::Index(i) => write!(f, "[{i}]"),
        }
    }
}

/// Decode a wire-form path (a JSON array of tokens) into a [`Path`].
pub fn parse_tokens(raw: &Value) -> Result<Path, PathError> {
    let arr = raw.as_array().ok_or(PathError::NotAnArray)?;
    arr.iter().map(Token::from_value).collect()
}

/// Render a path for log messages: `scripts.build`, `jobs[0].steps`.
pub fn format_path(path: &[Token]) -> String {
    let mut out = String::new();
    for token in path {
        match token {
            Token::Key(k) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(k);
            }
            Token::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}
