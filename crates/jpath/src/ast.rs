//! Defines the typed representation of a record path.
use std::fmt;

/// One step of a path into a business record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object key (e.g., `.name` or `['unit price']`).
    Key(String),
    /// An array index (e.g., `[0]`).
    Index(usize),
    /// Every element of an array (`[]` or `[*]`).
    Wildcard,
}

/// A parsed path such as `customer.name` or `items[].unit_price`.
///
/// An empty segment list addresses the record itself and is written `$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathExpr {
    segments: Vec<PathSegment>,
}

impl PathExpr {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// True when the path can select more than one value.
    pub fn has_wildcard(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, PathSegment::Wildcard))
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.segments.push(PathSegment::Key(key.into()));
        self
    }

    pub fn index(mut self, index: usize) -> Self {
        self.segments.push(PathSegment::Index(index));
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.segments.push(PathSegment::Wildcard);
        self
    }
}

fn is_plain_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("$");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => {
                    if i > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Key(key) => write!(f, "['{}']", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Wildcard => f.write_str("[]")?,
            }
        }
        Ok(())
    }
}
