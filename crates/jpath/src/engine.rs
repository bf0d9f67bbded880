//! Evaluates a [`PathExpr`] against a JSON value.
use crate::ast::{PathExpr, PathSegment};
use serde_json::Value;

/// The outcome of selecting a path.
///
/// `null` values count as absent, so a record with `"customer": null` and a
/// record without a `customer` key select the same way.
#[derive(Debug, Clone, PartialEq)]
pub enum Selected<'a> {
    Absent,
    One(&'a Value),
    /// Produced by wildcard paths; elements that did not resolve are dropped.
    Many(Vec<&'a Value>),
}

impl<'a> Selected<'a> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Selected::Absent)
    }

    /// The first selected value, if any.
    pub fn first(&self) -> Option<&'a Value> {
        match self {
            Selected::Absent => None,
            Selected::One(v) => Some(*v),
            Selected::Many(values) => values.first().copied(),
        }
    }

    pub fn into_values(self) -> Vec<&'a Value> {
        match self {
            Selected::Absent => Vec::new(),
            Selected::One(v) => vec![v],
            Selected::Many(values) => values,
        }
    }
}

fn step<'a>(node: &'a Value, segment: &PathSegment, out: &mut Vec<&'a Value>) {
    match (segment, node) {
        (PathSegment::Key(key), Value::Object(map)) => {
            if let Some(v) = map.get(key) {
                out.push(v);
            }
        }
        (PathSegment::Index(i), Value::Array(items)) => {
            if let Some(v) = items.get(*i) {
                out.push(v);
            }
        }
        (PathSegment::Wildcard, Value::Array(items)) => out.extend(items.iter()),
        _ => {}
    }
}

/// Selects the value(s) addressed by `path` inside `root`.
///
/// Missing keys, out-of-range indices and type mismatches along the way all
/// produce [`Selected::Absent`] rather than an error.
pub fn select<'a>(path: &PathExpr, root: &'a Value) -> Selected<'a> {
    let mut frontier = vec![root];
    for segment in path.segments() {
        let mut next = Vec::with_capacity(frontier.len());
        for node in frontier {
            step(node, segment, &mut next);
        }
        next.retain(|v| !v.is_null());
        if next.is_empty() {
            return if path.has_wildcard() {
                Selected::Many(Vec::new())
            } else {
                Selected::Absent
            };
        }
        frontier = next;
    }

    if root.is_null() && path.is_root() {
        return Selected::Absent;
    }
    if path.has_wildcard() {
        Selected::Many(frontier)
    } else {
        frontier.first().map_or(Selected::Absent, |v| Selected::One(*v))
    }
}

/// Convenience wrapper returning the single value a non-wildcard path selects.
pub fn select_one<'a>(path: &PathExpr, root: &'a Value) -> Option<&'a Value> {
    select(path, root).first()
}
