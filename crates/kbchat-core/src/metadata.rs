//! Lookup of values nested inside passage metadata

use serde_json::Value;

/// Outcome of walking a metadata tree along a key path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Every key was present; holds the value at the end of the path
    Found(&'a Value),
    /// Some key along the path was missing from its mapping
    Absent,
    /// The key at `depth` was looked up in something that is not a mapping
    NotAMapping { depth: usize },
}

impl<'a> Resolution<'a> {
    /// The found value, treating both failure modes as absence
    pub fn value(self) -> Option<&'a Value> {
        match self {
            Resolution::Found(value) => Some(value),
            Resolution::Absent | Resolution::NotAMapping { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

/// Walk `tree` one key at a time. An empty path resolves to `tree` itself.
pub fn resolve<'a, S: AsRef<str>>(tree: &'a Value, path: &[S]) -> Resolution<'a> {
    let mut current = tree;
    for (depth, key) in path.iter().enumerate() {
        let Value::Object(map) = current else {
            return Resolution::NotAMapping { depth };
        };
        match map.get(key.as_ref()) {
            Some(next) => current = next,
            None => return Resolution::Absent,
        }
    }
    Resolution::Found(current)
}
