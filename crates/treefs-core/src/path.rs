//! Path parsing and rendering.
//!
//! A single reserved character, [`SEPARATOR`], both separates segments
//! and marks an absolute path when leading. `-docs-notes` is absolute;
//! `docs-notes` resolves from the caller's current directory. The root
//! renders as the bare separator.
//!
//! # Examples
//!
//! ```
//! use treefs_core::TreePath;
//!
//! let path = TreePath::parse("-docs-notes")?;
//! assert!(path.is_absolute());
//! assert_eq!(path.segments(), ["docs", "notes"]);
//! # Ok::<(), treefs_core::FsError>(())
//! ```

use crate::error::{FsError, Result};
use crate::node::{DirRef, FileRef};

/// The reserved delimiter: segment separator and absolute-path marker.
pub const SEPARATOR: char = '-';

/// The root's reserved sentinel name, the bare delimiter.
pub const ROOT_NAME: &str = "-";

/// The parent-reference token understood by `cd`.
pub const PARENT_TOKEN: &str = "..";

/// A parsed path: classification plus ordered segments.
///
/// A trailing delimiter is legal on directory targets and is recorded
/// rather than rejected; file operations refuse paths that carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreePath {
    absolute: bool,
    segments: Vec<String>,
    trailing_delimiter: bool,
}

impl TreePath {
    /// Parses a raw path string into segments.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::MalformedPath`] if the input is empty, contains
    /// consecutive delimiters, or uses the parent token `..` as a segment
    /// (only `cd` understands that token, as a whole argument).
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || FsError::MalformedPath {
            path: raw.to_string(),
        };

        if raw.is_empty() {
            return Err(malformed());
        }

        let (absolute, body) = match raw.strip_prefix(SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let (trailing_delimiter, body) = match body.strip_suffix(SEPARATOR) {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        // The bare delimiter names the root itself.
        if absolute && body.is_empty() {
            if trailing_delimiter {
                // "--" or longer runs of the delimiter alone
                return Err(malformed());
            }
            return Ok(Self {
                absolute: true,
                segments: Vec::new(),
                trailing_delimiter: false,
            });
        }

        let mut segments = Vec::with_capacity(1 + body.matches(SEPARATOR).count());
        for segment in body.split(SEPARATOR) {
            if segment.is_empty() || segment == PARENT_TOKEN {
                return Err(malformed());
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            absolute,
            segments,
            trailing_delimiter,
        })
    }

    /// Returns `true` if resolution starts at the root.
    #[must_use]
    pub const fn is_absolute(&self) -> bool {
        self.absolute
    }

    /// The ordered path segments, root excluded.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns `true` if the raw input ended with the delimiter.
    #[must_use]
    pub const fn has_trailing_delimiter(&self) -> bool {
        self.trailing_delimiter
    }

    /// Splits into the directory walk and the terminal segment.
    ///
    /// Returns `None` for the root path, which has no terminal segment.
    #[must_use]
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        let (last, dirs) = self.segments.split_last()?;
        Some((dirs, last.as_str()))
    }
}

/// Renders a directory's full path by walking parent links to the root.
///
/// The root renders as the bare delimiter. A handle detached from the
/// tree renders the portion of the path it can still reach.
#[must_use]
pub fn render_dir(dir: &DirRef) -> String {
    let mut segments = Vec::new();
    let mut current = dir.clone();
    loop {
        let parent = {
            let node = current.borrow();
            if node.is_root() {
                break;
            }
            segments.push(node.name().to_string());
            node.parent()
        };
        match parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    join_segments(segments)
}

/// Renders a file's full path, ending in the file's own name.
#[must_use]
pub fn render_file(file: &FileRef) -> String {
    let node = file.borrow();
    match node.parent() {
        Some(parent) => {
            let mut rendered = render_dir(&parent);
            if !rendered.ends_with(SEPARATOR) {
                rendered.push(SEPARATOR);
            }
            rendered.push_str(node.name());
            rendered
        }
        // Unlinked file handle: all that is left is the bare name.
        None => format!("{SEPARATOR}{}", node.name()),
    }
}

fn join_segments(mut reversed: Vec<String>) -> String {
    reversed.reverse();
    let mut rendered = String::with_capacity(1 + reversed.iter().map(|s| s.len() + 1).sum::<usize>());
    rendered.push(SEPARATOR);
    rendered.push_str(&reversed.join(&SEPARATOR.to_string()));
    rendered
}
