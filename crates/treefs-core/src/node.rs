//! Tree entities: directories, files and their shared handles.
//!
//! Nodes are held behind `Rc<RefCell<_>>` handles with `Weak` parent
//! links. The namespace is single-caller and synchronous, so interior
//! mutability is safe here, and the weak back-references keep parent
//! links from forming ownership cycles: traversal and drop both
//! terminate.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::path::ROOT_NAME;

/// Shared handle to a [`Dir`].
pub type DirRef = Rc<RefCell<Dir>>;

/// Shared handle to a [`File`].
pub type FileRef = Rc<RefCell<File>>;

/// Kind of a named entry inside a directory.
///
/// This is the capability test for "directory or file": a tagged value,
/// never an identity comparison against a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file with one physical backing file.
    File,
    /// A directory holding further entries.
    Directory,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
        }
    }
}

/// A directory node: identity, parent link and ordered contents.
///
/// Names are unique within a directory across both kinds; the [`Tree`]
/// operations enforce that invariant at creation and rename time.
///
/// [`Tree`]: crate::tree::Tree
#[derive(Debug)]
pub struct Dir {
    name: String,
    root: bool,
    parent: Option<Weak<RefCell<Dir>>>,
    children: Vec<DirRef>,
    files: Vec<FileRef>,
}

impl Dir {
    /// Creates the distinguished root: the unique node with no parent.
    pub(crate) fn new_root() -> DirRef {
        Rc::new(RefCell::new(Self {
            name: ROOT_NAME.to_string(),
            root: true,
            parent: None,
            children: Vec::new(),
            files: Vec::new(),
        }))
    }

    /// Creates a directory and links it into `parent`'s children.
    pub(crate) fn create_child(parent: &DirRef, name: &str) -> DirRef {
        let child = Rc::new(RefCell::new(Self {
            name: name.to_string(),
            root: false,
            parent: Some(Rc::downgrade(parent)),
            children: Vec::new(),
            files: Vec::new(),
        }));
        parent.borrow_mut().children.push(Rc::clone(&child));
        child
    }

    /// The directory's segment name; the root uses the reserved sentinel.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for the distinguished root. A directory that was
    /// deleted from the tree keeps reporting `false`; only the node
    /// created as the root ever reports `true`.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.root
    }

    /// The owning directory, `None` for the root (and for handles that
    /// have been unlinked from the tree).
    #[must_use]
    pub fn parent(&self) -> Option<DirRef> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    /// Looks up a child directory by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<DirRef> {
        self.children
            .iter()
            .find(|child| child.borrow().name == name)
            .map(Rc::clone)
    }

    /// Looks up a file by name.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<FileRef> {
        self.files
            .iter()
            .find(|file| file.borrow().name == name)
            .map(Rc::clone)
    }

    /// Reports which kind of entry, if any, holds `name` here.
    #[must_use]
    pub fn entry_kind(&self, name: &str) -> Option<EntryKind> {
        if self.file(name).is_some() {
            Some(EntryKind::File)
        } else if self.child(name).is_some() {
            Some(EntryKind::Directory)
        } else {
            None
        }
    }

    /// The child directories, in insertion order.
    #[must_use]
    pub fn children(&self) -> &[DirRef] {
        &self.children
    }

    /// The files, in insertion order.
    #[must_use]
    pub fn files(&self) -> &[FileRef] {
        &self.files
    }

    /// Removes the named child directory from this directory's contents.
    pub(crate) fn unlink_child(&mut self, name: &str) -> Option<DirRef> {
        let index = self
            .children
            .iter()
            .position(|child| child.borrow().name == name)?;
        Some(self.children.remove(index))
    }

    /// Removes the named file from this directory's contents.
    pub(crate) fn unlink_file(&mut self, name: &str) -> Option<FileRef> {
        let index = self
            .files
            .iter()
            .position(|file| file.borrow().name == name)?;
        Some(self.files.remove(index))
    }

    /// Clears the parent link after the node leaves the tree, so stale
    /// handles stop resolving as attached.
    pub(crate) fn detach(&mut self) {
        self.parent = None;
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}

/// A file node: identity plus its exclusively-owning directory.
#[derive(Debug)]
pub struct File {
    name: String,
    parent: Weak<RefCell<Dir>>,
}

impl File {
    /// Creates a file and links it into `parent`'s files.
    pub(crate) fn create_in(parent: &DirRef, name: &str) -> FileRef {
        let file = Rc::new(RefCell::new(Self {
            name: name.to_string(),
            parent: Rc::downgrade(parent),
        }));
        parent.borrow_mut().files.push(Rc::clone(&file));
        file
    }

    /// The file's segment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning directory, `None` once the file has been unlinked.
    #[must_use]
    pub fn parent(&self) -> Option<DirRef> {
        self.parent.upgrade()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }
}
