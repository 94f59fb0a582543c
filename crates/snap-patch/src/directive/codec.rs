//! Wire codec for change directives.
//!
//! Decoding works on raw `serde_json::Value` objects rather than serde
//! derive because the addressing mode is inferred from the directive's
//! shape: a sole `properties` specifier selects properties mode, a
//! `path` specifier selects path mode, and anything else is an
//! unrecognized shape.

use serde_json::{json, Map, Value};
use snap_path::parse_tokens;

use super::types::{Directive, DirectiveError, MoveMode, Payload, UpdateMode};

// ── Decoding ──────────────────────────────────────────────────────────────

/// Decode one directive from its wire form.
pub fn from_json(raw: &Value) -> Result<Directive, DirectiveError> {
    let map = raw.as_object().ok_or(DirectiveError::UnrecognizedShape)?;
    if map.len() != 1 {
        return Err(DirectiveError::UnrecognizedShape);
    }
    let (action, body) = map.iter().next().ok_or(DirectiveError::UnrecognizedShape)?;
    match action.as_str() {
        "update" => decode_update(body),
        "remove" => decode_remove(body),
        "move" => decode_move(body),
        "replace" => decode_replace(body),
        _ => Err(DirectiveError::UnrecognizedShape),
    }
}

fn specifiers(body: &Value) -> Result<&Map<String, Value>, DirectiveError> {
    body.as_object().ok_or(DirectiveError::UnrecognizedShape)
}

fn decode_payload(body: &Map<String, Value>) -> Result<Option<Payload>, DirectiveError> {
    if let Some(v) = body.get("value") {
        return Ok(Some(Payload::One(v.clone())));
    }
    if let Some(vs) = body.get("values") {
        let arr = vs
            .as_array()
            .ok_or_else(|| DirectiveError::Invalid("values must be an array".into()))?;
        return Ok(Some(Payload::Many(arr.clone())));
    }
    Ok(None)
}

fn decode_update(body: &Value) -> Result<Directive, DirectiveError> {
    let body = specifiers(body)?;
    if body.len() == 1 {
        if let Some(props) = body.get("properties") {
            if !props.is_object() {
                return Err(DirectiveError::Invalid(
                    "update properties must be an object".into(),
                ));
            }
            return Ok(Directive::UpdateProperties {
                properties: props.clone(),
            });
        }
    }
    let Some(path) = body.get("path") else {
        return Err(DirectiveError::UnrecognizedShape);
    };
    let path = parse_tokens(path)?;
    let payload = decode_payload(body)?
        .ok_or_else(|| DirectiveError::Invalid("update requires value or values".into()))?;
    let mode = match body.get("modifier") {
        None => UpdateMode::default(),
        Some(Value::String(s)) => match s.as_str() {
            "set" => UpdateMode::Set,
            "append" => UpdateMode::Append,
            "prepend" => UpdateMode::Prepend,
            other => {
                return Err(DirectiveError::Invalid(format!(
                    "unknown update modifier: {other}"
                )))
            }
        },
        Some(_) => return Err(DirectiveError::Invalid("modifier must be a string".into())),
    };
    Ok(Directive::UpdatePath { path, payload, mode })
}

fn decode_remove(body: &Value) -> Result<Directive, DirectiveError> {
    let body = specifiers(body)?;
    if body.len() == 1 {
        if let Some(props) = body.get("properties") {
            if !props.is_object() && !props.is_array() {
                return Err(DirectiveError::Invalid(
                    "remove properties must be an array or object".into(),
                ));
            }
            return Ok(Directive::RemoveProperties {
                properties: props.clone(),
            });
        }
    }
    let Some(path) = body.get("path") else {
        return Err(DirectiveError::UnrecognizedShape);
    };
    let path = parse_tokens(path)?;
    let payload = decode_payload(body)?;
    let index = match body.get("index") {
        None => None,
        Some(v) => Some(
            v.as_u64()
                .map(|i| i as usize)
                .ok_or_else(|| DirectiveError::Invalid("index must be a non-negative integer".into()))?,
        ),
    };
    Ok(Directive::RemovePath { path, payload, index })
}

fn decode_move(body: &Value) -> Result<Directive, DirectiveError> {
    let body = specifiers(body)?;
    let Some(path) = body.get("path") else {
        return Err(DirectiveError::UnrecognizedShape);
    };
    let path = parse_tokens(path)?;
    let new_path = parse_tokens(
        body.get("newPath")
            .ok_or_else(|| DirectiveError::Invalid("move requires newPath".into()))?,
    )?;
    let mode = match body.get("modifier") {
        None => None,
        Some(Value::String(s)) => match s.as_str() {
            "merge" => Some(MoveMode::Merge),
            "replace" | "overwrite" => Some(MoveMode::Overwrite),
            other => {
                return Err(DirectiveError::Invalid(format!(
                    "unknown move modifier: {other}"
                )))
            }
        },
        Some(_) => return Err(DirectiveError::Invalid("modifier must be a string".into())),
    };
    Ok(Directive::Move { path, new_path, mode })
}

fn decode_replace(body: &Value) -> Result<Directive, DirectiveError> {
    let body = specifiers(body)?;
    let Some(path) = body.get("path") else {
        return Err(DirectiveError::UnrecognizedShape);
    };
    let path = parse_tokens(path)?;
    let pattern = body
        .get("pattern")
        .and_then(Value::as_str)
        .ok_or_else(|| DirectiveError::Invalid("replace requires a string pattern".into()))?
        .to_string();
    let with = body
        .get("with")
        .and_then(Value::as_str)
        .ok_or_else(|| DirectiveError::Invalid("replace requires a string with".into()))?
        .to_string();
    Ok(Directive::Replace { path, pattern, with })
}

// ── Encoding ──────────────────────────────────────────────────────────────

fn encode_path(path: &[snap_path::Token]) -> Value {
    Value::Array(
        path.iter()
            .map(|t| match t {
                snap_path::Token::Key(k) => Value::String(k.clone()),
                snap_path::Token::Index(i) => json!(*i),
            })
            .collect(),
    )
}

fn encode_payload(body: &mut Map<String, Value>, payload: &Payload) {
    match payload {
        Payload::One(v) => {
            body.insert("value".into(), v.clone());
        }
        Payload::Many(vs) => {
            body.insert("values".into(), Value::Array(vs.clone()));
        }
    }
}

/// Re-emit a directive in its wire form.
pub fn to_json(directive: &Directive) -> Value {
    match directive {
        Directive::UpdateProperties { properties } => json!({
            "update": { "properties": properties }
        }),
        Directive::UpdatePath { path, payload, mode } => {
            let mut body = Map::new();
            body.insert("path".into(), encode_path(path));
            encode_payload(&mut body, payload);
            match mode {
                UpdateMode::Set => {}
                UpdateMode::Append => {
                    body.insert("modifier".into(), json!("append"));
                }
                UpdateMode::Prepend => {
                    body.insert("modifier".into(), json!("prepend"));
                }
            }
            json!({ "update": body })
        }
        Directive::RemoveProperties { properties } => json!({
            "remove": { "properties": properties }
        }),
        Directive::RemovePath { path, payload, index } => {
            let mut body = Map::new();
            body.insert("path".into(), encode_path(path));
            if let Some(p) = payload {
                encode_payload(&mut body, p);
            }
            if let Some(i) = index {
                body.insert("index".into(), json!(*i));
            }
            json!({ "remove": body })
        }
        Directive::Move { path, new_path, mode } => {
            let mut body = Map::new();
            body.insert("path".into(), encode_path(path));
            body.insert("newPath".into(), encode_path(new_path));
            match mode {
                Some(MoveMode::Merge) => {
                    body.insert("modifier".into(), json!("merge"));
                }
                Some(MoveMode::Overwrite) => {
                    body.insert("modifier".into(), json!("replace"));
                }
                None => {}
            }
            json!({ "move": body })
        }
        Directive::Replace { path, pattern, with } => json!({
            "replace": {
                "path": encode_path(path),
                "pattern": pattern,
                "with": with,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snap_path::Token;

    #[test]
    fn decode_update_properties() {
        let raw = json!({"update": {"properties": {"scripts": {"build": "snap build"}}}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::UpdateProperties {
                properties: json!({"scripts": {"build": "snap build"}})
            }
        );
    }

    #[test]
    fn decode_update_path_default_modifier() {
        let raw = json!({"update": {"path": ["version"], "value": "1.2.3"}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::UpdatePath {
                path: vec![Token::key("version")],
                payload: Payload::One(json!("1.2.3")),
                mode: UpdateMode::Set,
            }
        );
    }

    #[test]
    fn decode_update_path_values_append() {
        let raw = json!({"update": {"path": ["tags"], "values": ["a", "b"], "modifier": "append"}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::UpdatePath {
                path: vec![Token::key("tags")],
                payload: Payload::Many(vec![json!("a"), json!("b")]),
                mode: UpdateMode::Append,
            }
        );
    }

    #[test]
    fn decode_update_without_payload_is_invalid() {
        let raw = json!({"update": {"path": ["version"]}});
        assert!(matches!(from_json(&raw), Err(DirectiveError::Invalid(_))));
    }

    #[test]
    fn decode_remove_properties_array_shape() {
        let raw = json!({"remove": {"properties": ["private", "workspaces"]}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::RemoveProperties {
                properties: json!(["private", "workspaces"])
            }
        );
    }

    #[test]
    fn decode_remove_path_with_index() {
        let raw = json!({"remove": {"path": ["jobs", [0], "steps"], "index": 2}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::RemovePath {
                path: vec![Token::key("jobs"), Token::Index(0), Token::key("steps")],
                payload: None,
                index: Some(2),
            }
        );
    }

    #[test]
    fn decode_move_with_merge() {
        let raw = json!({"move": {"path": ["old"], "newPath": ["new"], "modifier": "merge"}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::Move {
                path: vec![Token::key("old")],
                new_path: vec![Token::key("new")],
                mode: Some(MoveMode::Merge),
            }
        );
    }

    #[test]
    fn decode_replace() {
        let raw = json!({"replace": {"path": ["name"], "pattern": "^legacy-", "with": "snap-"}});
        let d = from_json(&raw).unwrap();
        assert_eq!(
            d,
            Directive::Replace {
                path: vec![Token::key("name")],
                pattern: "^legacy-".into(),
                with: "snap-".into(),
            }
        );
    }

    #[test]
    fn unknown_action_is_unrecognized() {
        let raw = json!({"rename": {"path": ["a"]}});
        assert_eq!(from_json(&raw), Err(DirectiveError::UnrecognizedShape));
    }

    #[test]
    fn neither_properties_nor_path_is_unrecognized() {
        let raw = json!({"update": {"value": 1}});
        assert_eq!(from_json(&raw), Err(DirectiveError::UnrecognizedShape));
    }

    #[test]
    fn non_object_directive_is_unrecognized() {
        assert_eq!(from_json(&json!("update")), Err(DirectiveError::UnrecognizedShape));
        assert_eq!(from_json(&json!({})), Err(DirectiveError::UnrecognizedShape));
    }

    #[test]
    fn round_trip_wire_form() {
        let raws = vec![
            json!({"update": {"properties": {"a": 1}}}),
            json!({"update": {"path": ["tags"], "values": ["a"], "modifier": "prepend"}}),
            json!({"remove": {"path": ["tags"], "values": ["x", "y"]}}),
            json!({"move": {"path": ["old"], "newPath": ["new"]}}),
            json!({"replace": {"path": ["name"], "pattern": "a+", "with": "b"}}),
        ];
        for raw in raws {
            let d = from_json(&raw).unwrap();
            assert_eq!(to_json(&d), raw);
        }
    }
}
