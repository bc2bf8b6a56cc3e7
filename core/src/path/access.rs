//! Dotted-path reads and writes over a document tree.
//!
//! The tree is a `serde_json::Value`. Only mappings are descended into;
//! a path that runs into a scalar or a sequence before its last segment
//! resolves to nothing. None of these functions fail: missing, blocked
//! or empty paths read as absent and write as no-ops.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::segments::DottedPath;


/// Outcome of resolving a path against a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup<'a> {
    /// Every segment resolved; this is the value at the end of the path.
    Found(&'a Value),
    /// The path is well-formed but does not exist in the tree.
    Missing,
    /// The path is empty or names a blocked key.
    Invalid,
}


/// Resolve `path` against `tree`.
pub fn lookup<'a>(tree: &'a Value, path: &str) -> Lookup<'a> {
    let parsed = DottedPath::parse(path);
    if !parsed.is_usable() {
        trace!(path, blocked = parsed.is_blocked(), "lookup on unusable path");
        return Lookup::Invalid;
    }

    let mut current = tree;
    for segment in parsed.segments() {
        match current.as_object().and_then(|map| map.get(segment)) {
            Some(next) => current = next,
            None => {
                trace!(path = %parsed, "lookup missing");
                return Lookup::Missing;
            }
        }
    }
    trace!(path = %parsed, "lookup found");
    Lookup::Found(current)
}


/// True if every segment of `path` resolves, whatever the final value is
/// (`null`, `false` and `0` all count as present).
pub fn has(tree: &Value, path: &str) -> bool {
    matches!(lookup(tree, path), Lookup::Found(_))
}


/// Read the value at `path`.
///
/// A missing path returns `default`. An empty or blocked path returns
/// `None` even when a default is given. Present values are returned as-is,
/// including `null`, `false`, `0` and `""`.
pub fn get<'a>(tree: &'a Value, path: &str, default: Option<&'a Value>) -> Option<&'a Value> {
    match lookup(tree, path) {
        Lookup::Found(value) => Some(value),
        Lookup::Missing => default,
        Lookup::Invalid => None,
    }
}


/// Assign `value` at `path`, creating intermediate mappings as needed.
///
/// Any intermediate that is absent or not a mapping is replaced by an
/// empty mapping, so `set("a.b", 1)` then `set("a.b.c", 2)` leaves
/// `{"a": {"b": {"c": 2}}}`. The final segment is overwritten, never
/// merged. Returns the same root for chaining; a root that is not a
/// mapping is left untouched.
pub fn set<'a>(tree: &'a mut Value, path: &str, value: Value) -> &'a mut Value {
    let parsed = DottedPath::parse(path);
    if !parsed.is_usable() {
        debug!(path, blocked = parsed.is_blocked(), "ignoring set on unusable path");
        return tree;
    }
    match tree.as_object_mut() {
        Some(root) => {
            trace!(path = %parsed, "set");
            insert_at(root, parsed.segments(), value);
        }
        None => debug!(path = %parsed, "ignoring set on non-mapping root"),
    }
    tree
}


/// Remove the key at `path` from its containing mapping.
///
/// Returns true if a key was removed. Stops without effect when an
/// intermediate is missing or not a mapping; removing an absent key is a
/// no-op. Sibling order is preserved.
pub fn delete(tree: &mut Value, path: &str) -> bool {
    let parsed = DottedPath::parse(path);
    if !parsed.is_usable() {
        debug!(path, blocked = parsed.is_blocked(), "ignoring delete on unusable path");
        return false;
    }
    trace!(path = %parsed, "delete");
    let Some((last, parents)) = parsed.segments().split_last() else {
        return false;
    };

    let mut current = tree;
    for segment in parents {
        current = match current.as_object_mut().and_then(|map| map.get_mut(segment)) {
            Some(next) => next,
            None => return false,
        };
    }
    current
        .as_object_mut()
        .is_some_and(|map| map.shift_remove(last).is_some())
}


// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

fn insert_at(root: &mut Map<String, Value>, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot.as_object_mut() {
            Some(next) => next,
            None => return,
        };
    }
    current.insert(last.clone(), value);
}


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
