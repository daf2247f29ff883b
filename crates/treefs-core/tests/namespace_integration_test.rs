//! End-to-end namespace scenarios across tree and backing store.

use std::rc::Rc;

use tempfile::TempDir;
use treefs_core::{BackingStore, Tree, render_dir};

fn fixture() -> (TempDir, Tree) {
    let guard = TempDir::new().unwrap();
    let tree = Tree::new(BackingStore::open(guard.path()).unwrap());
    (guard, tree)
}

/// The worked example: create, write, read back, delete the parent,
/// and observe the file gone.
#[test]
fn test_create_write_read_delete_cycle() {
    let (guard, mut tree) = fixture();
    let cwd = tree.root();

    let notes = tree.create_file("-docs-notes", &cwd).unwrap();
    tree.write_file(&notes, "hello").unwrap();
    assert_eq!(tree.read_file(&notes).unwrap(), "hello");
    assert_eq!(
        std::fs::read_to_string(guard.path().join("-docs-notes")).unwrap(),
        "hello"
    );

    tree.delete_dir("-docs", &cwd).unwrap();
    assert!(
        tree.resolve_file("-docs-notes", &cwd)
            .unwrap_err()
            .is_not_found()
    );
    assert!(!guard.path().join("-docs-notes").exists());
}

/// A command-layer shaped session: navigate with an explicit cwd
/// handle, delete the subtree the cwd lives in, and relocate.
#[test]
fn test_cwd_relocates_after_subtree_deletion() {
    let (_guard, mut tree) = fixture();
    let root = tree.root();
    tree.create_file("-projects-app-src-main", &root).unwrap();

    let mut cwd = tree.resolve_dir("-projects-app-src", &root).unwrap();
    assert_eq!(render_dir(&cwd), "-projects-app-src");

    let former_parent = tree.delete_dir("-projects-app", &cwd).unwrap();
    if !tree.is_attached(&cwd) {
        cwd = former_parent;
    }
    assert_eq!(render_dir(&cwd), "-projects");
    assert!(tree.is_attached(&cwd));
}

/// Mixed absolute and relative traffic against one tree.
#[test]
fn test_mixed_absolute_and_relative_resolution() {
    let (_guard, mut tree) = fixture();
    let root = tree.root();
    tree.create_file("-a-b-c-leaf", &root).unwrap();

    let b = tree.resolve_dir("-a-b", &root).unwrap();
    let via_relative = tree.resolve_file("c-leaf", &b).unwrap();
    let via_absolute = tree.resolve_file("-a-b-c-leaf", &root).unwrap();
    assert!(Rc::ptr_eq(&via_relative, &via_absolute));
}

/// Clearing the namespace removes every backing file at once.
#[test]
fn test_clear_after_populating_many_paths() {
    let (guard, mut tree) = fixture();
    let cwd = tree.root();
    for path in ["-a-one", "-a-b-two", "-c-three", "-four"] {
        let file = tree.create_file(path, &cwd).unwrap();
        tree.write_file(&file, path).unwrap();
    }
    assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 4);

    tree.clear().unwrap();
    assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
    assert!(tree.list(&tree.root()).is_empty());
}
