//! Dotted field paths: the identity of a leaf field.
//!
//! A path is stored as its already-split segments; the dot-joined string is
//! only the wire form used by change events.
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::MalformedPathError;

pub const SEPARATOR: char = '.';

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// The empty base path every top-level node hangs off.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the dot-joined wire form. Rejects `""`, `"a..b"`, `".a"` and `"a."`.
    pub fn parse(src: &str) -> Result<Self, MalformedPathError> {
        if src.is_empty() {
            return Err(MalformedPathError::Empty);
        }
        let mut segments = Vec::new();
        for (index, segment) in src.split(SEPARATOR).enumerate() {
            if segment.is_empty() {
                return Err(MalformedPathError::EmptySegment {
                    path: src.to_string(),
                    index,
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Path of a node named `name` nested under `self`.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The node's own name (last segment).
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Segments that survive a round trip through the wire form: none empty,
    /// none containing the separator.
    pub fn is_addressable(&self) -> bool {
        !self.is_root()
            && self
                .segments
                .iter()
                .all(|s| !s.is_empty() && !s.contains(SEPARATOR))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = MalformedPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
