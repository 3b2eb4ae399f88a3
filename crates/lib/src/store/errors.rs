//! Error types for store-level operations.

use thiserror::Error;

/// Structured error types for [`DocumentStore`](super::DocumentStore)
/// operations that fail for reasons other than I/O.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A value was added to a section that holds a mapping without naming
    /// the key to bind it under.
    #[error("adding to mapping section '{section}' requires a key")]
    KeyRequired { section: String },
}

// Conversion to the main Error type
impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
