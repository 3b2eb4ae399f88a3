//! The in-memory document tree.
//!
//! [`Node`] is a nested mapping from string keys to [`Value`]s and owns all
//! path-walking logic. Paths descend through mapping values only: a lookup
//! that hits a scalar or a list partway through resolves to absent rather
//! than an error, and a write paves over whatever non-mapping value occupies
//! an intermediate segment.
//!
//! # Shared views
//!
//! [`Node::get`] and [`Node::get_mut`] hand out references directly into the
//! tree. Mutating through them is supported and unguarded; nothing is
//! persisted until the owning store saves.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod path;
pub mod value;


pub use path::{Path, PathBuf};
pub use value::Value;

/// A nested string-keyed mapping; the root of every document is one.
///
/// Keys within one level are unique and insertion order is preserved, so a
/// loaded document serializes back in a stable order. Overwriting a key
/// replaces its value and entire subtree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Node {
    children: IndexMap<String, Value>,
}

impl Node {
    /// Creates a new empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of direct keys.
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the node holds no keys.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Gets the value at a dot-notation path.
    ///
    /// Intermediate segments descend through mapping values only; an absent
    /// key or a non-mapping intermediate resolves to `None`.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&Value> {
        let mut segments = path.as_ref().segments();
        let mut current = self;
        let mut segment = segments.next()?;
        for next in segments {
            current = match current.children.get(segment) {
                Some(Value::Node(node)) => node,
                _ => return None,
            };
            segment = next;
        }
        current.children.get(segment)
    }

    /// Gets a mutable reference to the value at a dot-notation path.
    ///
    /// Resolution rules match [`Node::get`]. The reference is a live view
    /// into the tree; mutating through it is supported and unguarded.
    pub fn get_mut(&mut self, path: impl AsRef<Path>) -> Option<&mut Value> {
        let mut segments = path.as_ref().segments();
        let mut current = self;
        let mut segment = segments.next()?;
        for next in segments {
            current = match current.children.get_mut(segment) {
                Some(Value::Node(node)) => node,
                _ => return None,
            };
            segment = next;
        }
        current.children.get_mut(segment)
    }

    /// Sets the value at a dot-notation path, returning the replaced value.
    ///
    /// Every intermediate segment that is absent or holds a non-mapping
    /// value is overwritten with a new empty mapping, silently destroying
    /// scalars and lists that occupy the way. The final segment is replaced
    /// wholesale.
    pub fn set(&mut self, path: impl AsRef<Path>, value: impl Into<Value>) -> Option<Value> {
        let mut segments = path.as_ref().segments();
        let mut current = self;
        // segments() always yields at least one element
        let mut segment = segments.next().unwrap_or("");
        for next in segments {
            let entry = current
                .children
                .entry(segment.to_string())
                .or_insert_with(|| Value::Node(Node::new()));
            if !matches!(entry, Value::Node(_)) {
                *entry = Value::Node(Node::new());
            }
            current = match entry {
                Value::Node(node) => node,
                _ => unreachable!(),
            };
            segment = next;
        }
        current.children.insert(segment.to_string(), value.into())
    }

    /// Removes the value at a dot-notation path, returning it if present.
    ///
    /// Intermediate segments walk exactly as [`Node::get`]; if resolution
    /// fails at any point the call is a no-op returning `None`.
    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<Value> {
        let mut segments = path.as_ref().segments();
        let mut current = self;
        let mut segment = segments.next()?;
        for next in segments {
            current = match current.children.get_mut(segment) {
                Some(Value::Node(node)) => node,
                _ => return None,
            };
            segment = next;
        }
        current.children.shift_remove(segment)
    }

    /// Returns true if the given path resolves to a value.
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.get(path).is_some()
    }

    /// Gets the value bound to a single top-level key.
    ///
    /// Unlike [`Node::get`] this never splits on dots, so keys that contain
    /// a literal `.` are reachable here.
    pub fn get_key(&self, key: &str) -> Option<&Value> {
        self.children.get(key)
    }

    /// Gets a mutable reference to the value bound to a single top-level key.
    pub fn get_key_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.children.get_mut(key)
    }

    /// Binds a single top-level key directly, without dot splitting.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.children.insert(key.into(), value.into())
    }

    /// Returns an iterator over all key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.children.iter()
    }

    /// Returns an iterator over all keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.children.keys()
    }

    /// Returns an iterator over all values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.children.values()
    }

    /// Removes every key from this node.
    pub fn clear(&mut self) {
        self.children.clear();
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{key}: {value}")?;
            first = false;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Node {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        let mut node = Node::new();
        for (key, value) in iter {
            node.insert(key, value);
        }
        node
    }
}
