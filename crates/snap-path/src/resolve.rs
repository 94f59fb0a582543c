//! Navigation into a document tree.
//!
//! All functions return `None` the first time a token fails to
//! navigate; remaining tokens are not attempted.

use serde_json::{Map, Value};

use crate::types::Token;

/// Read-mode navigation to the value at `path`. Never creates nodes.
pub fn locate<'a>(root: &'a Value, path: &[Token]) -> Option<&'a Value> {
    let mut current = root;
    for token in path {
        current = match (current, token) {
            (Value::Object(map), Token::Key(k)) => map.get(k)?,
            (Value::Array(arr), Token::Index(i)) => arr.get(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Mutable read-mode navigation to the value at `path`. Never creates
/// nodes.
pub fn locate_mut<'a>(root: &'a mut Value, path: &[Token]) -> Option<&'a mut Value> {
    let mut current = root;
    for token in path {
        current = match (current, token) {
            (Value::Object(map), Token::Key(k)) => map.get_mut(k)?,
            (Value::Array(arr), Token::Index(i)) => arr.get_mut(*i)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Read-mode navigation of all but the final token.
///
/// Returns the parent container and the unresolved final token; the
/// caller decides how to read, write, or delete at the target.
pub fn parent_mut<'a, 'p>(
    root: &'a mut Value,
    path: &'p [Token],
) -> Option<(&'a mut Value, &'p Token)> {
    let (last, front) = path.split_last()?;
    Some((locate_mut(root, front)?, last))
}

/// Write-mode navigation of all but the final token.
///
/// Missing object properties along the route are created as empty
/// objects. Array elements are never created: a missing index anywhere
/// in the route is a miss. A scalar occupying an intermediate position
/// is also a miss, in both modes.
pub fn parent_mut_or_create<'a, 'p>(
    root: &'a mut Value,
    path: &'p [Token],
) -> Option<(&'a mut Value, &'p Token)> {
    let (last, front) = path.split_last()?;
    // Probe first so a route that ultimately misses leaves the tree
    // untouched (no half-created intermediate objects).
    if !route_is_creatable(root, front) {
        return None;
    }
    let mut current = root;
    for token in front {
        current = match token {
            Token::Key(k) => current
                .as_object_mut()?
                .entry(k.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Token::Index(i) => current.as_array_mut()?.get_mut(*i)?,
        };
    }
    Some((current, last))
}

/// Read-only validation of a write-mode route.
///
/// Once navigation falls off the existing tree, every remaining token
/// must be an object key (those will be created); an array index past
/// that point, a missing array element, or a scalar in the way all fail
/// the route.
fn route_is_creatable(root: &Value, front: &[Token]) -> bool {
    let mut cursor: Option<&Value> = Some(root);
    for token in front {
        cursor = match (cursor, token) {
            (Some(Value::Object(map)), Token::Key(k)) => map.get(k),
            (Some(Value::Array(arr)), Token::Index(i)) => match arr.get(*i) {
                Some(v) => Some(v),
                None => return false,
            },
            (Some(_), _) => return false,
            (None, Token::Key(_)) => None,
            (None, Token::Index(_)) => return false,
        };
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Token;
    use serde_json::json;

    fn key(s: &str) -> Token {
        Token::key(s)
    }

    #[test]
    fn locate_nested_key() {
        let doc = json!({"a": {"b": {"c": 1}}});
        let path = vec![key("a"), key("b"), key("c")];
        assert_eq!(locate(&doc, &path), Some(&json!(1)));
    }

    #[test]
    fn locate_array_index() {
        let doc = json!({"tags": ["x", "y"]});
        let path = vec![key("tags"), Token::Index(1)];
        assert_eq!(locate(&doc, &path), Some(&json!("y")));
    }

    #[test]
    fn locate_missing_key_is_none() {
        let doc = json!({"a": 1});
        assert_eq!(locate(&doc, &[key("b")]), None);
    }

    #[test]
    fn locate_short_circuits_on_intermediate_miss() {
        let doc = json!({"a": 1});
        let path = vec![key("b"), key("c"), key("d")];
        assert_eq!(locate(&doc, &path), None);
    }

    #[test]
    fn locate_scalar_in_the_way_is_none() {
        let doc = json!({"a": 1});
        assert_eq!(locate(&doc, &[key("a"), key("b")]), None);
    }

    #[test]
    fn locate_mut_allows_in_place_edit() {
        let mut doc = json!({"a": {"b": 1}});
        *locate_mut(&mut doc, &[key("a"), key("b")]).unwrap() = json!(2);
        assert_eq!(doc, json!({"a": {"b": 2}}));
    }

    #[test]
    fn parent_mut_returns_final_token_unresolved() {
        let mut doc = json!({"a": {"b": 1}});
        let path = [key("a"), key("missing")];
        let (parent, last) = parent_mut(&mut doc, &path).unwrap();
        assert_eq!(parent, &json!({"b": 1}));
        assert_eq!(last, &key("missing"));
    }

    #[test]
    fn parent_mut_empty_path_is_none() {
        let mut doc = json!({});
        assert!(parent_mut(&mut doc, &[]).is_none());
    }

    #[test]
    fn create_builds_missing_objects() {
        let mut doc = json!({});
        let path = vec![key("a"), key("b"), key("c")];
        {
            let (parent, last) = parent_mut_or_create(&mut doc, &path).unwrap();
            parent
                .as_object_mut()
                .unwrap()
                .insert(last.as_key().unwrap().to_string(), json!(1));
        }
        assert_eq!(doc, json!({"a": {"b": {"c": 1}}}));
    }

    #[test]
    fn create_never_creates_array_elements() {
        let mut doc = json!({"jobs": []});
        let path = vec![key("jobs"), Token::Index(0), key("name")];
        assert!(parent_mut_or_create(&mut doc, &path).is_none());
        // Miss must leave the tree untouched.
        assert_eq!(doc, json!({"jobs": []}));
    }

    #[test]
    fn create_navigates_existing_array_elements() {
        let mut doc = json!({"jobs": [{"steps": []}]});
        let path = vec![key("jobs"), Token::Index(0), key("name")];
        assert!(parent_mut_or_create(&mut doc, &path).is_some());
    }

    #[test]
    fn create_miss_leaves_tree_untouched() {
        let mut doc = json!({"a": {}});
        let path = vec![key("a"), key("b"), Token::Index(0), key("c")];
        assert!(parent_mut_or_create(&mut doc, &path).is_none());
        assert_eq!(doc, json!({"a": {}}));
    }

    #[test]
    fn create_scalar_in_the_way_is_miss() {
        let mut doc = json!({"a": "leaf"});
        let path = vec![key("a"), key("b"), key("c")];
        assert!(parent_mut_or_create(&mut doc, &path).is_none());
        assert_eq!(doc, json!({"a": "leaf"}));
    }
}
