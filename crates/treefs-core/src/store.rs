//! Physical persistence for virtual files.
//!
//! Each virtual file maps to exactly one flat physical file inside a
//! base directory chosen once at process start. The physical name is
//! the rendered virtual path itself (`-docs-notes`), so the delimiter
//! stands in for directory separators and the base directory never
//! needs subdirectories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FsError, Result};

/// Creates, overwrites, reads and removes the physical files backing
/// the virtual tree, in lockstep with node lifecycles.
///
/// # Examples
///
/// ```no_run
/// use treefs_core::BackingStore;
///
/// let store = BackingStore::open("/tmp/treefs-data")?;
/// store.materialize("-docs-notes")?;
/// store.write("-docs-notes", "hello")?;
/// assert_eq!(store.read("-docs-notes")?, "hello");
/// # Ok::<(), treefs_core::FsError>(())
/// ```
#[derive(Debug)]
pub struct BackingStore {
    base: PathBuf,
}

impl BackingStore {
    /// Opens a store rooted at `base`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the base directory cannot be created.
    pub fn open(base: impl Into<PathBuf>) -> Result<Self> {
        let base = base.into();
        fs::create_dir_all(&base).map_err(|err| FsError::io(base.display().to_string(), &err))?;
        Ok(Self { base })
    }

    /// The directory holding the physical files.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn host_path(&self, full_path: &str) -> PathBuf {
        self.base.join(full_path)
    }

    /// Creates (or truncates) the physical file for `full_path`.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the file cannot be created.
    pub fn materialize(&self, full_path: &str) -> Result<()> {
        let host = self.host_path(full_path);
        debug!(path = full_path, "materialize backing file");
        fs::File::create(&host)
            .map(drop)
            .map_err(|err| FsError::io(full_path, &err))
    }

    /// Replaces the physical file's entire contents with `text`.
    ///
    /// This is a full overwrite, never an append.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the write fails.
    pub fn write(&self, full_path: &str, text: &str) -> Result<()> {
        let host = self.host_path(full_path);
        debug!(path = full_path, bytes = text.len(), "write backing file");
        fs::write(&host, text).map_err(|err| FsError::io(full_path, &err))
    }

    /// Returns the physical file's full current contents.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the file cannot be read.
    pub fn read(&self, full_path: &str) -> Result<String> {
        let host = self.host_path(full_path);
        fs::read_to_string(&host).map_err(|err| FsError::io(full_path, &err))
    }

    /// Deletes the physical file. Removal is idempotent: an already
    /// absent file is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if deletion is blocked by the
    /// environment (permissions, in-use lock).
    pub fn remove(&self, full_path: &str) -> Result<()> {
        let host = self.host_path(full_path);
        debug!(path = full_path, "remove backing file");
        match fs::remove_file(&host) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(FsError::io(full_path, &err)),
        }
    }

    /// Moves a physical file to the name of a renamed virtual path.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the rename fails.
    pub fn rename(&self, old_full_path: &str, new_full_path: &str) -> Result<()> {
        let old_host = self.host_path(old_full_path);
        let new_host = self.host_path(new_full_path);
        debug!(from = old_full_path, to = new_full_path, "rename backing file");
        fs::rename(&old_host, &new_host).map_err(|err| FsError::io(old_full_path, &err))
    }
}
