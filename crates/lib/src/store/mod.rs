//! The document store: a persistent tree of values addressed by
//! dot-notation paths.
//!
//! [`DocumentStore`] ties a shared [`Node`] tree to a
//! [`Persistence`](crate::persist::Persistence) controller. Every mutation
//! goes through the tree first and then triggers a whole-document save, so
//! the backing file always reflects the last completed operation (in
//! background mode the file catches up in submission order; see
//! [`DocumentStore::flush`]).
//!
//! Reads never touch the file. [`DocumentStore::get`] hands out clones, and
//! [`DocumentStore::read`] exposes the tree under its read lock for callers
//! that want to walk it without copying.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use tracing::trace;

pub mod errors;

pub use errors::StoreError;

use crate::{
    Result,
    persist::{Mode, Persistence},
    tree::{Node, Path, Value},
};

/// A key-value document store backed by a single YAML file.
///
/// ```no_run
/// use canopy::{DocumentStore, Mode};
///
/// # fn main() -> canopy::Result<()> {
/// let store = DocumentStore::open("settings.yml", Mode::Blocking)?;
/// store.set("server.port", 8080)?;
/// assert_eq!(store.get("server.port"), Some(8080.into()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct DocumentStore {
    tree: Arc<RwLock<Node>>,
    persistence: Persistence,
}

impl DocumentStore {
    /// Opens the store at `path`, loading the file's current contents and
    /// immediately writing them back in canonical form.
    ///
    /// A missing or unreadable-as-YAML file yields an empty store; the
    /// write-back then creates the file. In [`Mode::Blocking`] I/O failures
    /// other than absence are returned here.
    pub fn open(path: impl Into<std::path::PathBuf>, mode: Mode) -> Result<Self> {
        let tree = Arc::new(RwLock::new(Node::new()));
        let persistence = Persistence::new(path.into(), mode, Arc::clone(&tree))?;
        let store = Self { tree, persistence };
        store.load()?;
        // In background mode the load is only queued; wait for it to apply
        // so the normalizing save below snapshots the loaded tree, not the
        // empty one, and so a late-applying load cannot wipe mutations made
        // after open returns.
        store.flush()?;
        store.save()?;
        Ok(store)
    }

    /// Returns a clone of the value at `path`, if present.
    ///
    /// Traversal descends through mappings only; a list or scalar in the
    /// middle of the path means the value is absent.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Value> {
        self.tree.read().unwrap().get(path).cloned()
    }

    /// Borrows the whole tree under its read lock.
    ///
    /// Useful for walking the document without cloning. Holding the guard
    /// blocks writers, including the load half of a background writer.
    pub fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.tree.read().unwrap()
    }

    /// Binds `value` at `path`, creating intermediate mappings as needed,
    /// then saves.
    ///
    /// Non-mapping values in the middle of the path are silently replaced
    /// by empty mappings.
    pub fn set(&self, path: impl AsRef<Path>, value: impl Into<Value>) -> Result<()> {
        let path = path.as_ref();
        trace!(%path, "set");
        self.tree.write().unwrap().set(path, value);
        self.persistence.save()
    }

    /// Removes and returns the value at `path`, saving only when something
    /// was actually removed.
    pub fn remove(&self, path: impl AsRef<Path>) -> Result<Option<Value>> {
        let path = path.as_ref();
        trace!(%path, "remove");
        let removed = self.tree.write().unwrap().remove(path);
        if removed.is_some() {
            self.persistence.save()?;
        }
        Ok(removed)
    }

    /// Adds `value` to the top-level entry named `section`, then saves.
    ///
    /// `section` is a literal key here, not a dot path. What "adding"
    /// means depends on what the section already holds:
    ///
    /// - a mapping: `value` is bound under `key`, which must be given or
    ///   the call fails with [`StoreError::KeyRequired`];
    /// - a sequence: `value` is appended and `key` is ignored;
    /// - anything else (including an absent section): the old value is
    ///   replaced by a new one-element sequence when `key` is `None`, or a
    ///   new one-entry mapping otherwise.
    pub fn add_to_section(
        &self,
        section: &str,
        key: Option<&str>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let value = value.into();
        trace!(section, ?key, "add_to_section");
        {
            let mut tree = self.tree.write().unwrap();
            match tree.get_key_mut(section) {
                Some(Value::Node(node)) => {
                    let key = key.ok_or_else(|| StoreError::KeyRequired {
                        section: section.to_string(),
                    })?;
                    node.insert(key, value);
                }
                Some(Value::List(items)) => items.push(value),
                _ => match key {
                    Some(key) => {
                        let mut node = Node::new();
                        node.insert(key, value);
                        tree.insert(section, node);
                    }
                    None => {
                        tree.insert(section, vec![value]);
                    }
                },
            }
        }
        self.persistence.save()
    }

    /// Ensures a mapping exists at the dot path `section`, then saves.
    ///
    /// A no-op (without a save) when the path already holds a mapping;
    /// anything else there is replaced by an empty mapping.
    pub fn create_section(&self, section: impl AsRef<Path>) -> Result<()> {
        let section = section.as_ref();
        trace!(%section, "create_section");
        {
            let mut tree = self.tree.write().unwrap();
            if matches!(tree.get(section), Some(Value::Node(_))) {
                return Ok(());
            }
            tree.set(section, Node::new());
        }
        self.persistence.save()
    }

    /// Ensures the top-level entry `section` holds a sequence, then saves.
    ///
    /// A no-op (without a save) when the entry is already a sequence;
    /// anything else there is replaced by an empty sequence.
    pub fn create_sequence(&self, section: &str) -> Result<()> {
        trace!(section, "create_sequence");
        {
            let mut tree = self.tree.write().unwrap();
            if matches!(tree.get_key(section), Some(Value::List(_))) {
                return Ok(());
            }
            tree.insert(section, Value::List(Vec::new()));
        }
        self.persistence.save()
    }

    /// Checks whether `path` currently holds a mapping.
    pub fn has_section(&self, path: impl AsRef<Path>) -> bool {
        matches!(self.tree.read().unwrap().get(path), Some(Value::Node(_)))
    }

    /// Moves the mapping at `old` to `new`, then saves.
    ///
    /// A no-op (without a save) unless `old` holds a mapping. The subtree
    /// keeps its contents; `new` is paved over whatever it held before.
    pub fn rename_section(&self, old: impl AsRef<Path>, new: impl AsRef<Path>) -> Result<()> {
        let (old, new) = (old.as_ref(), new.as_ref());
        trace!(%old, %new, "rename_section");
        {
            let mut tree = self.tree.write().unwrap();
            if !matches!(tree.get(old), Some(Value::Node(_))) {
                return Ok(());
            }
            if let Some(moved) = tree.remove(old) {
                tree.set(new, moved);
            }
        }
        self.persistence.save()
    }

    /// Replaces the in-memory tree with the file's current contents.
    pub fn load(&self) -> Result<()> {
        self.persistence.load()
    }

    /// Writes the whole tree to the backing file.
    pub fn save(&self) -> Result<()> {
        self.persistence.save()
    }

    /// Waits for all queued background I/O to complete. A no-op in
    /// [`Mode::Blocking`].
    pub fn flush(&self) -> Result<()> {
        self.persistence.flush()
    }

    /// Returns the persistence mode the store was opened with.
    pub fn mode(&self) -> Mode {
        self.persistence.mode()
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &std::path::Path {
        self.persistence.path()
    }
}
