//! Dot-notation key paths for nested document access.
//!
//! A path addresses a value at arbitrary nesting depth by joining mapping
//! keys with `.`. The [`Path`]/[`PathBuf`] pair follows the same
//! borrowed/owned pattern as `std::path::Path`/`PathBuf`.
//!
//! Splitting is on the literal `.` character with no escaping and no
//! normalization: `".user"` has the segments `["", "user"]`, and the empty
//! string is a path with a single empty segment. Empty-string segments are
//! legal (if unusual) mapping keys and are looked up like any other key.
//! Keys that themselves contain a `.` cannot be addressed through a path;
//! that is an accepted limitation of the notation.

use std::{borrow::Borrow, fmt, ops::Deref};

/// A borrowed dot-notation path.
///
/// This type is unsized and always used behind a reference, like `str`.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Path {
    inner: str,
}

/// An owned dot-notation path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathBuf {
    inner: String,
}

impl Path {
    /// Wraps a string slice as a path. Every string is a valid path.
    pub fn new<S: AsRef<str> + ?Sized>(s: &S) -> &Path {
        // SAFETY: Path is repr(transparent) over str.
        unsafe { &*(s.as_ref() as *const str as *const Path) }
    }

    /// Returns an iterator over the `.`-separated segments.
    ///
    /// Always yields at least one segment; empty segments are preserved.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.inner.split('.')
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.inner.split('.').count()
    }

    /// Returns `true` if the path is the empty string.
    ///
    /// Note that an empty path still has one (empty) segment and resolves
    /// as a top-level lookup of the empty-string key.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the final segment.
    pub fn last(&self) -> &str {
        self.inner.split('.').next_back().unwrap_or("")
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Converts this `Path` to an owned [`PathBuf`].
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf {
            inner: self.inner.to_string(),
        }
    }
}

impl PathBuf {
    /// Creates a new empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment, joining with `.` when the path is non-empty.
    pub fn push(mut self, segment: impl AsRef<str>) -> Self {
        if !self.inner.is_empty() {
            self.inner.push('.');
        }
        self.inner.push_str(segment.as_ref());
        self
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Path {
        Path::new(self.inner.as_str())
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl ToOwned for Path {
    type Owned = PathBuf;

    fn to_owned(&self) -> PathBuf {
        self.to_path_buf()
    }
}

impl AsRef<Path> for Path {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for PathBuf {
    fn as_ref(&self) -> &Path {
        self
    }
}

impl AsRef<Path> for str {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<Path> for String {
    fn as_ref(&self) -> &Path {
        Path::new(self)
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl From<&str> for PathBuf {
    fn from(s: &str) -> Self {
        PathBuf {
            inner: s.to_string(),
        }
    }
}

impl From<String> for PathBuf {
    fn from(inner: String) -> Self {
        PathBuf { inner }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.inner)
    }
}

impl fmt::Display for PathBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner)
    }
}
