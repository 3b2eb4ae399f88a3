//! A small key-value document store backed by a single YAML file.
//!
//! The store holds one nested mapping in memory and mirrors it to disk.
//! Values are addressed with dot-notation paths (`"server.port"`), every
//! mutation is followed by a whole-document save, and the file is always
//! written in one canonical shape: block style, four-space indent, Unix
//! newlines.
//!
//! ```no_run
//! use canopy::{DocumentStore, Mode};
//!
//! # fn main() -> canopy::Result<()> {
//! let store = DocumentStore::open("settings.yml", Mode::Blocking)?;
//! store.set("server.host", "localhost")?;
//! store.set("server.port", 8080)?;
//! store.remove("debug")?;
//! # Ok(())
//! # }
//! ```
//!
//! Two persistence modes are available:
//!
//! - [`Mode::Blocking`]: I/O runs on the caller's thread and failures are
//!   returned from the mutating call.
//! - [`Mode::Background`]: I/O is queued to a dedicated writer thread and
//!   mutating calls return immediately; [`DocumentStore::flush`] waits for
//!   the queue to drain.
//!
//! The crate is split along its responsibilities:
//!
//! - [`tree`]: the in-memory document ([`Node`], [`Value`]) and the
//!   dot-notation [`Path`] type.
//! - [`codec`]: YAML parsing and the canonical emitter.
//! - [`persist`]: the file controller and the background writer.
//! - [`store`]: the public [`DocumentStore`] facade.

pub mod codec;
pub mod persist;
pub mod store;
pub mod tree;

pub use persist::Mode;
pub use store::DocumentStore;
pub use tree::{Node, Path, PathBuf, Value};

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The unified error type for all store operations.
///
/// Wraps the module-specific error types so callers can match on the broad
/// category or drill into the structured variant.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Errors from reading or writing the backing file.
    #[error(transparent)]
    Persist(persist::PersistError),

    /// Errors from store-level operations.
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Check if this error originates from file I/O.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Persist(err) if err.is_io_error())
    }

    /// Check if this error is a missing-key failure from
    /// [`DocumentStore::add_to_section`].
    pub fn is_key_required(&self) -> bool {
        matches!(self, Error::Store(store::StoreError::KeyRequired { .. }))
    }
}
