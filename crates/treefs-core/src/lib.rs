//! In-memory hierarchical namespace with disk-backed files.
//!
//! Directories and files form a tree rooted at a single sentinel node.
//! Paths use `-` both as the segment separator and, when leading, as the
//! absolute-path marker, so `-docs-notes` names the file `notes` inside
//! the directory `docs` under the root. Every virtual file is persisted
//! to exactly one flat physical file whose name is the rendered virtual
//! path.
//!
//! The crate is the core of a line-oriented shell: a command layer parses
//! input, calls [`Tree`] operations with an explicit current-directory
//! handle, and prints the typed results. The core never reads input and
//! never terminates the process.
//!
//! # Examples
//!
//! ```no_run
//! use treefs_core::{BackingStore, Tree};
//!
//! let store = BackingStore::open("/tmp/treefs-data")?;
//! let mut tree = Tree::new(store);
//! let cwd = tree.root();
//!
//! let notes = tree.create_file("-docs-notes", &cwd)?;
//! tree.write_file(&notes, "hello")?;
//! assert_eq!(tree.read_file(&notes)?, "hello");
//! # Ok::<(), treefs_core::FsError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod node;
pub mod path;
pub mod render;
pub mod store;
pub mod tree;

pub use error::{FsError, Result};
pub use node::{Dir, DirRef, EntryKind, File, FileRef};
pub use path::{PARENT_TOKEN, ROOT_NAME, SEPARATOR, TreePath, render_dir, render_file};
pub use render::render_subtree;
pub use store::BackingStore;
pub use tree::{ListEntry, Tree};
