//! Structural reads and writes on a component model addressed by [`Path`].

use crate::path::Path;
use serde_json::{Map, Value};

/// Reads the value at `path`. Object members are addressed by key, array elements by
/// decimal index.
#[must_use]
pub fn get<'a>(model: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments().iter().try_fold(model, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Writes `value` at `path`, creating intermediate objects as needed.
///
/// A scalar or `null` in the way is replaced by an empty object, as is an array addressed
/// with a non-index segment or an index past its end. Writing at index `len` appends. The
/// root path replaces the whole model.
pub fn set(model: &mut Value, path: &Path, value: Value) {
    let Some((last, parents)) = path.segments().split_last() else {
        *model = value;
        return;
    };

    let mut node = model;
    for segment in parents {
        node = slot(node, segment);
    }
    *slot(node, last) = value;
}

/// Removes the value at `path`. An absent path is left untouched; the root path resets
/// the model to `null`.
pub fn delete(model: &mut Value, path: &Path) {
    let Some((last, parents)) = path.segments().split_last() else {
        *model = Value::Null;
        return;
    };

    let mut node = model;
    for segment in parents {
        let next = match node {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get_mut(i)),
            _ => None,
        };
        match next {
            Some(next) => node = next,
            None => return,
        }
    }

    match node {
        Value::Object(map) => {
            map.remove(last);
        },
        Value::Array(items) => {
            if let Some(i) = last.parse::<usize>().ok().filter(|&i| i < items.len()) {
                items.remove(i);
            }
        },
        _ => {},
    }
}

/// Deep-merges `overlay` onto `base`. Objects merge key by key; any other overlay value
/// replaces what is underneath.
///
/// ```rust
/// use nexus_tree::value::merge;
/// use serde_json::json;
///
/// let merged = merge(json!({"a": 1, "b": {"c": 2}}), json!({"b": {"d": 3}}));
/// assert_eq!(merged, json!({"a": 1, "b": {"c": 2, "d": 3}}));
/// ```
#[must_use]
pub fn merge(base: Value, overlay: Value) -> Value {
    match (base, overlay) {
        (Value::Object(mut base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            Value::Object(base)
        },
        (_, overlay) => overlay,
    }
}

/// The child slot for `segment`, reshaping `node` so the slot exists.
fn slot<'a>(node: &'a mut Value, segment: &str) -> &'a mut Value {
    let index = match &*node {
        Value::Array(items) => segment.parse::<usize>().ok().filter(|&i| i <= items.len()),
        _ => None,
    };

    match (node, index) {
        (Value::Array(items), Some(index)) => {
            if index == items.len() {
                items.push(Value::Null);
            }
            &mut items[index]
        },
        (node, _) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            &mut node[segment]
        },
    }
}
