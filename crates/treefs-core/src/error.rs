//! Typed errors for namespace operations.
//!
//! Every resolution or mutation failure is returned to the caller as an
//! [`FsError`]; the core never aborts the process. The variants carry the
//! offending path, segment or name so the command layer can print a
//! useful message without re-deriving context.

use std::io;
use thiserror::Error;

/// Errors produced by path parsing, tree mutation and the backing store.
///
/// # Examples
///
/// ```
/// use treefs_core::FsError;
///
/// let error = FsError::NotFound { segment: "docs".to_string() };
/// assert!(error.is_not_found());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    /// The path string could not be segmented unambiguously.
    #[error("malformed path: {path:?}")]
    MalformedPath {
        /// The raw path string that failed to parse.
        path: String,
    },

    /// A directory or file was missing during resolution.
    #[error("not found: {segment}")]
    NotFound {
        /// The first missing segment on the walk.
        segment: String,
    },

    /// A reserved character or empty string was used as a name.
    #[error("invalid name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// Creating the entry would shadow a sibling of the other kind.
    #[error("name collision: {name}")]
    NameCollision {
        /// The name already held by a sibling.
        name: String,
    },

    /// A backing-store operation failed for an environmental reason.
    #[error("i/o failure on {path}: {message}")]
    Io {
        /// The physical path involved.
        path: String,
        /// The underlying operating-system error text.
        message: String,
    },
}

impl FsError {
    /// Builds an [`FsError::Io`] from an [`io::Error`] and the physical
    /// path it concerned.
    pub(crate) fn io(path: impl Into<String>, err: &io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Returns `true` if this is a missing-segment error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a malformed-path error.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedPath { .. })
    }

    /// Returns `true` if this is an invalid-name error.
    #[must_use]
    pub const fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName { .. })
    }

    /// Returns `true` if this is a cross-kind name collision.
    #[must_use]
    pub const fn is_collision(&self) -> bool {
        matches!(self, Self::NameCollision { .. })
    }

    /// Returns `true` if this is an environmental I/O failure.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

/// Type alias for namespace operation results.
pub type Result<T> = std::result::Result<T, FsError>;
