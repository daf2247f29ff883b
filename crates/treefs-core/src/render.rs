//! Box-drawing rendering of a directory subtree.
//!
//! Produces the shape the `tree` command prints: the starting
//! directory's full path as the header, then every entry connected with
//! `├──`/`└──`, files before subdirectories at each level.
//!
//! ```text
//! -docs
//! ├── notes
//! └── sub
//!     └── draft
//! ```

use crate::node::DirRef;
use crate::path::render_dir;

/// Renders the subtree rooted at `dir` with box-drawing connectors.
#[must_use]
pub fn render_subtree(dir: &DirRef) -> String {
    let mut out = String::new();
    out.push_str(&render_dir(dir));
    out.push('\n');
    render_level(dir, "", &mut out);
    out
}

fn render_level(dir: &DirRef, prefix: &str, out: &mut String) {
    let node = dir.borrow();
    let total = node.files().len() + node.children().len();
    let mut index = 0;

    for file in node.files() {
        index += 1;
        push_entry(out, prefix, index == total, file.borrow().name());
    }

    let children: Vec<DirRef> = node.children().to_vec();
    drop(node);
    for child in children {
        index += 1;
        let is_last = index == total;
        push_entry(out, prefix, is_last, child.borrow().name());
        let continuation = if is_last { "    " } else { "│   " };
        render_level(&child, &format!("{prefix}{continuation}"), out);
    }
}

fn push_entry(out: &mut String, prefix: &str, is_last: bool, name: &str) {
    out.push_str(prefix);
    out.push_str(if is_last { "└── " } else { "├── " });
    out.push_str(name);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackingStore;
    use crate::tree::Tree;
    use tempfile::TempDir;

    #[test]
    fn test_render_shape() {
        let guard = TempDir::new().unwrap();
        let mut tree = Tree::new(BackingStore::open(guard.path()).unwrap());
        let cwd = tree.root();
        tree.create_file("-docs-notes", &cwd).unwrap();
        tree.create_file("-docs-sub-draft", &cwd).unwrap();

        let docs = tree.resolve_dir("-docs", &cwd).unwrap();
        let rendered = render_subtree(&docs);
        let expected = ["-docs", "├── notes", "└── sub", "    └── draft", ""].join("\n");
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_empty_root() {
        let guard = TempDir::new().unwrap();
        let tree = Tree::new(BackingStore::open(guard.path()).unwrap());
        assert_eq!(render_subtree(&tree.root()), "-\n");
    }

    #[test]
    fn test_render_keeps_sibling_guides() {
        let guard = TempDir::new().unwrap();
        let mut tree = Tree::new(BackingStore::open(guard.path()).unwrap());
        let cwd = tree.root();
        tree.create_file("-a-deep-leaf", &cwd).unwrap();
        tree.create_file("-b", &cwd).unwrap();

        let rendered = render_subtree(&tree.root());
        // "a" is not the last entry of the root, so its subtree keeps
        // the vertical guide
        assert!(rendered.contains("├── a\n"));
        assert!(rendered.contains("│   └── deep\n"));
        assert!(rendered.contains("│       └── leaf\n"));
    }
}
