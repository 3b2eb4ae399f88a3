//! Error types for the persistence layer.

use std::path::PathBuf;

use thiserror::Error;

/// Structured error types for load/save operations against the backing
/// file. Only blocking-mode calls ever surface these; the background writer
/// reports failures to the diagnostic log instead.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PersistError {
    /// Reading the backing file failed for a reason other than the file
    /// being absent (absence is treated as an empty document).
    #[error("failed to read document at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the backing file failed.
    #[error("failed to write document at {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Spawning the background writer thread failed.
    #[error("failed to start background writer for {path}: {source}")]
    Spawn {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The background writer thread is no longer running.
    #[error("background writer for {path} has stopped")]
    WriterStopped { path: PathBuf },
}

impl PersistError {
    /// Check if this error wraps an I/O failure.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            PersistError::Read { .. } | PersistError::Write { .. } | PersistError::Spawn { .. }
        )
    }
}

// Conversion to the main Error type
impl From<PersistError> for crate::Error {
    fn from(err: PersistError) -> Self {
        crate::Error::Persist(err)
    }
}
