//! The namespace tree and its resolution and mutation operations.
//!
//! Every operation takes the caller's current directory as an explicit
//! handle; the tree holds no hidden cursor state, so the core stays
//! reentrant and testable. Mutations that touch the backing store are
//! logically atomic: if the physical side fails, just-created nodes are
//! unlinked again so the virtual tree never diverges from disk.

use std::rc::Rc;

use tracing::debug;

use crate::error::{FsError, Result};
use crate::node::{Dir, DirRef, EntryKind, File, FileRef};
use crate::path::{PARENT_TOKEN, ROOT_NAME, SEPARATOR, TreePath, render_dir, render_file};
use crate::store::BackingStore;

/// One row of a non-recursive directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
    /// The entry's segment name.
    pub name: String,
}

/// The namespace: a root directory plus the store persisting its files.
///
/// # Examples
///
/// ```no_run
/// use treefs_core::{BackingStore, Tree};
///
/// let mut tree = Tree::new(BackingStore::open("/tmp/treefs-data")?);
/// let cwd = tree.root();
///
/// tree.create_file("-a-b-c", &cwd)?;
/// let b = tree.resolve_dir("-a-b", &cwd)?;
/// assert_eq!(tree.list(&b).len(), 1);
/// # Ok::<(), treefs_core::FsError>(())
/// ```
#[derive(Debug)]
pub struct Tree {
    root: DirRef,
    store: BackingStore,
}

impl Tree {
    /// Creates an empty namespace persisting into `store`.
    #[must_use]
    pub fn new(store: BackingStore) -> Self {
        Self {
            root: Dir::new_root(),
            store,
        }
    }

    /// A handle to the root directory.
    #[must_use]
    pub fn root(&self) -> DirRef {
        Rc::clone(&self.root)
    }

    /// The backing store the tree persists into.
    #[must_use]
    pub fn store(&self) -> &BackingStore {
        &self.store
    }

    fn start(&self, path: &TreePath, cwd: &DirRef) -> DirRef {
        if path.is_absolute() {
            self.root()
        } else {
            Rc::clone(cwd)
        }
    }

    fn walk(&self, start: DirRef, segments: &[String]) -> Result<DirRef> {
        let mut current = start;
        for segment in segments {
            let next = current.borrow().child(segment).ok_or_else(|| FsError::NotFound {
                segment: segment.clone(),
            })?;
            current = next;
        }
        Ok(current)
    }

    /// Resolves a path to a directory, walking from the root for
    /// absolute paths and from `cwd` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] naming the first missing segment,
    /// or [`FsError::MalformedPath`] if the path fails to parse.
    pub fn resolve_dir(&self, raw: &str, cwd: &DirRef) -> Result<DirRef> {
        let path = TreePath::parse(raw)?;
        self.walk(self.start(&path, cwd), path.segments())
    }

    /// Resolves a path to a file: the directory walk for all but the
    /// last segment, then a file lookup in the final directory.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if an intermediate directory or the
    /// terminal file is missing, and [`FsError::MalformedPath`] for
    /// unparseable input or a trailing delimiter (which denotes a
    /// directory target).
    pub fn resolve_file(&self, raw: &str, cwd: &DirRef) -> Result<FileRef> {
        let path = TreePath::parse(raw)?;
        if path.has_trailing_delimiter() {
            return Err(FsError::MalformedPath {
                path: raw.to_string(),
            });
        }
        let Some((dirs, last)) = path.split_last() else {
            return Err(FsError::NotFound {
                segment: raw.to_string(),
            });
        };
        let parent = self.walk(self.start(&path, cwd), dirs)?;
        let found = parent.borrow().file(last);
        found.ok_or_else(|| FsError::NotFound {
            segment: last.to_string(),
        })
    }

    /// Creates a file, creating missing intermediate directories on the
    /// way (mkdir-p semantics).
    ///
    /// Re-creating an existing file truncates it and returns the
    /// existing node; it never duplicates a sibling. If the physical
    /// file cannot be materialized, every node this call linked in is
    /// unlinked again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidName`] for the bare root path,
    /// [`FsError::NameCollision`] when a segment is already held by an
    /// entry of the other kind, [`FsError::MalformedPath`] for
    /// unparseable input, and [`FsError::Io`] when materialization
    /// fails.
    pub fn create_file(&mut self, raw: &str, cwd: &DirRef) -> Result<FileRef> {
        let path = TreePath::parse(raw)?;
        if path.has_trailing_delimiter() {
            return Err(FsError::MalformedPath {
                path: raw.to_string(),
            });
        }
        let Some((dirs, last)) = path.split_last() else {
            // cannot create a directory (or the root) via this operation
            return Err(FsError::InvalidName {
                name: raw.to_string(),
            });
        };

        let mut current = self.start(&path, cwd);
        let mut created: Vec<DirRef> = Vec::new();
        for segment in dirs {
            let existing = current.borrow().child(segment);
            current = match existing {
                Some(dir) => dir,
                None => {
                    if current.borrow().file(segment).is_some() {
                        Self::rollback(&created);
                        return Err(FsError::NameCollision {
                            name: segment.clone(),
                        });
                    }
                    let dir = Dir::create_child(&current, segment);
                    created.push(Rc::clone(&dir));
                    dir
                }
            };
        }

        if current.borrow().child(last).is_some() {
            Self::rollback(&created);
            return Err(FsError::NameCollision {
                name: last.to_string(),
            });
        }
        if let Some(existing) = current.borrow().file(last) {
            // the whole chain already existed, nothing to roll back
            self.store.materialize(&render_file(&existing))?;
            return Ok(existing);
        }

        let file = File::create_in(&current, last);
        let full = render_file(&file);
        if let Err(err) = self.store.materialize(&full) {
            current.borrow_mut().unlink_file(last);
            Self::rollback(&created);
            return Err(err);
        }
        debug!(path = %full, "created file");
        Ok(file)
    }

    /// Unlinks just-created intermediate directories, deepest first.
    fn rollback(created: &[DirRef]) {
        for dir in created.iter().rev() {
            let (name, parent) = {
                let node = dir.borrow();
                (node.name().to_string(), node.parent())
            };
            if let Some(parent) = parent {
                parent.borrow_mut().unlink_child(&name);
            }
            dir.borrow_mut().detach();
        }
    }

    /// Replaces the file's entire contents with `text` (full overwrite).
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the backing write fails.
    pub fn write_file(&mut self, file: &FileRef, text: &str) -> Result<()> {
        self.store.write(&render_file(file), text)
    }

    /// Returns the file's full current contents.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] if the backing read fails.
    pub fn read_file(&self, file: &FileRef) -> Result<String> {
        self.store.read(&render_file(file))
    }

    /// Deletes one file: backing removal first, then the unlink.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the file is missing and
    /// [`FsError::Io`] if the environment blocks physical removal.
    pub fn delete_file(&mut self, raw: &str, cwd: &DirRef) -> Result<()> {
        let file = self.resolve_file(raw, cwd)?;
        let full = render_file(&file);
        self.store.remove(&full)?;
        let (name, parent) = {
            let node = file.borrow();
            (node.name().to_string(), node.parent())
        };
        if let Some(parent) = parent {
            parent.borrow_mut().unlink_file(&name);
        }
        debug!(path = %full, "deleted file");
        Ok(())
    }

    /// Recursively deletes a directory subtree, post-order: files and
    /// children before the directory itself.
    ///
    /// Returns the removed directory's former parent so the command
    /// layer can relocate its current directory if it pointed inside the
    /// subtree (the tree does not own that state; see
    /// [`Tree::is_attached`]).
    ///
    /// On a backing-store failure the deletion aborts at the point of
    /// failure: everything removed so far stays removed on both sides,
    /// and nothing is ever left partially linked.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] if the directory is missing,
    /// [`FsError::InvalidName`] for the root (which is never deleted),
    /// and [`FsError::Io`] if a backing file cannot be removed.
    pub fn delete_dir(&mut self, raw: &str, cwd: &DirRef) -> Result<DirRef> {
        let dir = self.resolve_dir(raw, cwd)?;
        if dir.borrow().is_root() {
            return Err(FsError::InvalidName {
                name: ROOT_NAME.to_string(),
            });
        }
        let full = render_dir(&dir);
        self.remove_contents(&dir)?;
        let (name, parent) = {
            let node = dir.borrow();
            (node.name().to_string(), node.parent())
        };
        let parent = parent.ok_or_else(|| FsError::NotFound { segment: name.clone() })?;
        parent.borrow_mut().unlink_child(&name);
        dir.borrow_mut().detach();
        debug!(path = %full, "deleted directory");
        Ok(parent)
    }

    /// Recursively deletes every child and file of the root, leaving an
    /// empty namespace. Irreversible.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::Io`] and aborts at the point of failure if a
    /// backing file cannot be removed.
    pub fn clear(&mut self) -> Result<()> {
        let root = self.root();
        self.remove_contents(&root)?;
        debug!("namespace cleared");
        Ok(())
    }

    fn remove_contents(&self, dir: &DirRef) -> Result<()> {
        // snapshot both collections before mutating them
        let files: Vec<FileRef> = dir.borrow().files().to_vec();
        for file in files {
            self.store.remove(&render_file(&file))?;
            let name = file.borrow().name().to_string();
            dir.borrow_mut().unlink_file(&name);
        }
        let children: Vec<DirRef> = dir.borrow().children().to_vec();
        for child in children {
            self.remove_contents(&child)?;
            let name = child.borrow().name().to_string();
            dir.borrow_mut().unlink_child(&name);
            child.borrow_mut().detach();
        }
        Ok(())
    }

    /// Lists a directory non-recursively: files first, then
    /// subdirectories, each kind in insertion order.
    #[must_use]
    pub fn list(&self, dir: &DirRef) -> Vec<ListEntry> {
        let node = dir.borrow();
        let mut entries = Vec::with_capacity(node.files().len() + node.children().len());
        for file in node.files() {
            entries.push(ListEntry {
                kind: EntryKind::File,
                name: file.borrow().name().to_string(),
            });
        }
        for child in node.children() {
            entries.push(ListEntry {
                kind: EntryKind::Directory,
                name: child.borrow().name().to_string(),
            });
        }
        entries
    }

    /// Changes directory: no path returns the root, the parent token
    /// ascends one level (a no-op at the root), anything else resolves.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::NotFound`] or [`FsError::MalformedPath`] from
    /// resolution.
    pub fn change_dir(&self, raw: Option<&str>, cwd: &DirRef) -> Result<DirRef> {
        match raw {
            None => Ok(self.root()),
            Some(PARENT_TOKEN) => Ok(cwd.borrow().parent().unwrap_or_else(|| Rc::clone(cwd))),
            Some(path) => self.resolve_dir(path, cwd),
        }
    }

    /// Reports whether a directory handle still hangs off this tree's
    /// root. Stale handles into a deleted subtree return `false`.
    #[must_use]
    pub fn is_attached(&self, dir: &DirRef) -> bool {
        let mut current = Rc::clone(dir);
        loop {
            if Rc::ptr_eq(&current, &self.root) {
                return true;
            }
            let parent = current.borrow().parent();
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Renames a directory, moving every backing file underneath it to
    /// its new rendered path.
    ///
    /// If a physical rename fails partway, the files moved so far are
    /// moved back and the virtual name is restored before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidName`] for the root, an empty name or
    /// a name containing the delimiter, [`FsError::NameCollision`] when
    /// a sibling already holds `new_name`, and resolution or I/O errors
    /// otherwise.
    pub fn rename_dir(&mut self, raw: &str, new_name: &str, cwd: &DirRef) -> Result<()> {
        Self::validate_name(new_name)?;
        let dir = self.resolve_dir(raw, cwd)?;
        if dir.borrow().is_root() {
            return Err(FsError::InvalidName {
                name: ROOT_NAME.to_string(),
            });
        }
        let old_name = dir.borrow().name().to_string();
        if old_name == new_name {
            return Ok(());
        }
        let parent = dir.borrow().parent().ok_or_else(|| FsError::NotFound {
            segment: old_name.clone(),
        })?;
        if parent.borrow().entry_kind(new_name).is_some() {
            return Err(FsError::NameCollision {
                name: new_name.to_string(),
            });
        }

        let old_prefix = render_dir(&dir);
        let files = collect_files(&dir);
        let old_paths: Vec<String> = files.iter().map(render_file).collect();
        dir.borrow_mut().set_name(new_name);
        let new_prefix = render_dir(&dir);

        for (index, old_path) in old_paths.iter().enumerate() {
            let new_path = format!("{new_prefix}{}", &old_path[old_prefix.len()..]);
            if let Err(err) = self.store.rename(old_path, &new_path) {
                for undo in (0..index).rev() {
                    let moved = format!("{new_prefix}{}", &old_paths[undo][old_prefix.len()..]);
                    let _ = self.store.rename(&moved, &old_paths[undo]);
                }
                dir.borrow_mut().set_name(&old_name);
                return Err(err);
            }
        }
        debug!(from = %old_prefix, to = %new_prefix, "renamed directory");
        Ok(())
    }

    /// Renames a file, moving its backing file to the new rendered
    /// path. The virtual name changes only if the physical move
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`FsError::InvalidName`] for an empty name or one
    /// containing the delimiter, [`FsError::NameCollision`] when a
    /// sibling already holds `new_name`, and resolution or I/O errors
    /// otherwise.
    pub fn rename_file(&mut self, raw: &str, new_name: &str, cwd: &DirRef) -> Result<()> {
        Self::validate_name(new_name)?;
        let file = self.resolve_file(raw, cwd)?;
        let old_name = file.borrow().name().to_string();
        if old_name == new_name {
            return Ok(());
        }
        let parent = file.borrow().parent().ok_or_else(|| FsError::NotFound {
            segment: old_name.clone(),
        })?;
        if parent.borrow().entry_kind(new_name).is_some() {
            return Err(FsError::NameCollision {
                name: new_name.to_string(),
            });
        }

        let old_path = render_file(&file);
        file.borrow_mut().set_name(new_name);
        let new_path = render_file(&file);
        if let Err(err) = self.store.rename(&old_path, &new_path) {
            file.borrow_mut().set_name(&old_name);
            return Err(err);
        }
        debug!(from = %old_path, to = %new_path, "renamed file");
        Ok(())
    }

    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty() || name == PARENT_TOKEN || name.contains(SEPARATOR) {
            return Err(FsError::InvalidName {
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// Gathers every file in the subtree, the directory's own files first.
fn collect_files(dir: &DirRef) -> Vec<FileRef> {
    let mut files: Vec<FileRef> = dir.borrow().files().to_vec();
    let children: Vec<DirRef> = dir.borrow().children().to_vec();
    for child in &children {
        files.extend(collect_files(child));
    }
    files
}
