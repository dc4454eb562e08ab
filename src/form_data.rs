//! Nested form values and the dotted-path merge that builds them.
//!
//! Snapshots are immutable. `merge` copies only the maps along the written
//! path; every untouched branch is an `Arc` shared with the previous snapshot.
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::MalformedPathError;
use crate::path::FieldPath;

/// Deepest path `merge` accepts. Nested groups are compared, serialized and
/// dropped recursively, so their depth has to stay bounded.
pub const MAX_PATH_DEPTH: usize = 256;

pub type FormMap = IndexMap<String, FormValue>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    Group(Arc<FormMap>),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    root: Arc<FormMap>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the leaf at a dot-joined `path`, returning the new snapshot.
    pub fn merge(&self, path: &str, value: impl Into<String>) -> Result<Self, MalformedPathError> {
        let path = FieldPath::parse(path)?;
        self.merge_path(&path, value)
    }

    /// Same as [`FormData::merge`] with the segments already split.
    ///
    /// A leaf sitting where the path needs a group is replaced by that group.
    /// The old value is dropped; this is deliberate and lossy.
    pub fn merge_path(
        &self,
        path: &FieldPath,
        value: impl Into<String>,
    ) -> Result<Self, MalformedPathError> {
        let segments = path.segments();
        if segments.is_empty() {
            return Err(MalformedPathError::Empty);
        }
        if let Some(index) = segments.iter().position(String::is_empty) {
            return Err(MalformedPathError::EmptySegment { path: path.to_string(), index });
        }
        if segments.len() > MAX_PATH_DEPTH {
            return Err(MalformedPathError::TooDeep { depth: segments.len(), limit: MAX_PATH_DEPTH });
        }
        debug!(%path, "merging form value");
        let root = assign(&self.root, segments, value.into());
        Ok(Self { root: Arc::new(root) })
    }

    /// Current value of the leaf at `path`, if it has received one.
    pub fn get(&self, path: &FieldPath) -> Option<&str> {
        let (leaf, parents) = path.segments().split_last()?;
        let mut map: &FormMap = &self.root;
        for segment in parents {
            match map.get(segment)? {
                FormValue::Group(group) => map = &**group,
                FormValue::Text(_) => return None,
            }
        }
        match map.get(leaf)? {
            FormValue::Text(text) => Some(text),
            FormValue::Group(_) => None,
        }
    }

    pub fn entries(&self) -> &FormMap {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// True when both snapshots are backed by the same top-level map.
    pub fn shares_root_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    pub fn to_json(&self) -> Value {
        fn map_to_json(map: &FormMap) -> Value {
            Value::Object(
                map.iter()
                    .map(|(k, v)| {
                        let v = match v {
                            FormValue::Text(text) => Value::String(text.clone()),
                            FormValue::Group(group) => map_to_json(group),
                        };
                        (k.clone(), v)
                    })
                    .collect(),
            )
        }
        map_to_json(&self.root)
    }

    /// Accepts only objects whose leaves are strings.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Copies the maps along `segments` top-down, then relinks them bottom-up
/// around the new leaf. `segments` is non-empty.
fn assign(root: &FormMap, segments: &[String], value: String) -> FormMap {
    let Some((leaf, parents)) = segments.split_last() else {
        return root.clone();
    };

    let mut spine = Vec::with_capacity(parents.len());
    let mut current = Some(root);
    for segment in parents {
        let next = match current.and_then(|map| map.get(segment)) {
            Some(FormValue::Group(group)) => Some(&**group),
            Some(FormValue::Text(old)) => {
                debug!(segment = %segment, old = %old, "replacing leaf value with nested group");
                None
            }
            None => None,
        };
        spine.push(current.cloned().unwrap_or_default());
        current = next;
    }

    let mut map = current.cloned().unwrap_or_default();
    map.insert(leaf.clone(), FormValue::Text(value));
    for (mut parent, segment) in spine.into_iter().zip(parents).rev() {
        parent.insert(segment.clone(), FormValue::Group(Arc::new(map)));
        map = parent;
    }
    map
}
