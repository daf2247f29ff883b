//! Interactive session state and command dispatch.
//!
//! A [`Session`] owns the [`Tree`] and the current-directory handle the
//! core operations take explicitly. Each evaluated command line maps to
//! exactly one core operation; results come back as printable
//! [`Outcome`]s and errors as `anyhow` errors for the loop to display.

use anyhow::{Result, bail};
use colored::Colorize;

use treefs_core::{
    BackingStore, DirRef, EntryKind, Tree, render_dir, render_file, render_subtree,
};

/// What a successfully evaluated command asks the loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text, then keep reading.
    Output(String),
    /// Nothing to print, keep reading.
    Silent,
    /// Leave the interpreter.
    Quit,
}

/// One interactive session: the namespace plus the caller-owned cwd.
#[derive(Debug)]
pub struct Session {
    tree: Tree,
    cwd: DirRef,
}

impl Session {
    /// Starts a session with an empty namespace over `store`.
    #[must_use]
    pub fn new(store: BackingStore) -> Self {
        let tree = Tree::new(store);
        let cwd = tree.root();
        Self { tree, cwd }
    }

    /// The current directory's full rendered path.
    #[must_use]
    pub fn cwd_path(&self) -> String {
        render_dir(&self.cwd)
    }

    /// Evaluates one tokenized command line.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, wrong arity, and every
    /// typed failure the core reports; the session stays usable either
    /// way.
    pub fn eval(&mut self, argv: &[String]) -> Result<Outcome> {
        let Some(command) = argv.first() else {
            return Ok(Outcome::Silent);
        };
        let args = &argv[1..];

        match command.as_str() {
            "pwd" => Ok(Outcome::Output(self.cwd_path())),
            "cd" => self.cd(args.first().map(String::as_str)),
            "ls" => self.ls(args.first().map(String::as_str)),
            "rls" => self.rls(args.first().map(String::as_str)),
            "tree" => self.tree_view(args.first().map(String::as_str)),
            "clear" => {
                self.tree.clear()?;
                Ok(Outcome::Silent)
            }
            "create" => self.create(args),
            "add" => self.add(args),
            "cat" => self.cat(args),
            "delete" => self.delete(args),
            "dd" => self.delete_dir(args),
            "quit" | "q" => Ok(Outcome::Quit),
            unknown => bail!("{unknown}: command not found"),
        }
    }

    fn cd(&mut self, path: Option<&str>) -> Result<Outcome> {
        self.cwd = self.tree.change_dir(path, &self.cwd)?;
        Ok(Outcome::Silent)
    }

    fn target_dir(&self, path: Option<&str>) -> Result<DirRef> {
        match path {
            Some(path) => Ok(self.tree.resolve_dir(path, &self.cwd)?),
            None => Ok(self.cwd.clone()),
        }
    }

    fn ls(&self, path: Option<&str>) -> Result<Outcome> {
        let dir = self.target_dir(path)?;
        let lines: Vec<String> = self
            .tree
            .list(&dir)
            .into_iter()
            .map(|entry| match entry.kind {
                EntryKind::File => entry.name,
                EntryKind::Directory => entry.name.blue().bold().to_string(),
            })
            .collect();
        if lines.is_empty() {
            // an empty directory prints nothing, not a blank line
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Output(lines.join("\n")))
    }

    fn rls(&self, path: Option<&str>) -> Result<Outcome> {
        let dir = self.target_dir(path)?;
        let node = dir.borrow();
        let mut lines = Vec::with_capacity(node.files().len() + node.children().len());
        for file in node.files() {
            let size = self.tree.read_file(file)?.len();
            lines.push(format!("f {size:>8}  {}", render_file(file)));
        }
        for child in node.children() {
            let entries = child.borrow().files().len() + child.borrow().children().len();
            lines.push(format!("d {entries:>8}  {}", render_dir(child)));
        }
        if lines.is_empty() {
            return Ok(Outcome::Silent);
        }
        Ok(Outcome::Output(lines.join("\n")))
    }

    fn tree_view(&self, path: Option<&str>) -> Result<Outcome> {
        let dir = self.target_dir(path)?;
        let mut rendered = render_subtree(&dir);
        // the loop adds the final newline
        if rendered.ends_with('\n') {
            rendered.pop();
        }
        Ok(Outcome::Output(rendered))
    }

    fn create(&mut self, args: &[String]) -> Result<Outcome> {
        let [path] = args else {
            bail!("usage: create PATH");
        };
        self.tree.create_file(path, &self.cwd)?;
        Ok(Outcome::Silent)
    }

    /// `add PATH TEXT...` replaces the named file's contents with TEXT
    /// (a full overwrite, not an append).
    fn add(&mut self, args: &[String]) -> Result<Outcome> {
        let Some((path, text)) = args.split_first() else {
            bail!("usage: add PATH TEXT");
        };
        if text.is_empty() {
            bail!("usage: add PATH TEXT");
        }
        let file = self.tree.resolve_file(path, &self.cwd)?;
        self.tree.write_file(&file, &text.join(" "))?;
        Ok(Outcome::Silent)
    }

    fn cat(&self, args: &[String]) -> Result<Outcome> {
        let [path] = args else {
            bail!("usage: cat PATH");
        };
        let file = self.tree.resolve_file(path, &self.cwd)?;
        Ok(Outcome::Output(self.tree.read_file(&file)?))
    }

    fn delete(&mut self, args: &[String]) -> Result<Outcome> {
        let [path] = args else {
            bail!("usage: delete PATH");
        };
        self.tree.delete_file(path, &self.cwd)?;
        Ok(Outcome::Silent)
    }

    fn delete_dir(&mut self, args: &[String]) -> Result<Outcome> {
        let [path] = args else {
            bail!("usage: dd PATH");
        };
        let former_parent = self.tree.delete_dir(path, &self.cwd)?;
        // if the cwd lived inside the removed subtree, relocate it to
        // the removed directory's former parent
        if !self.tree.is_attached(&self.cwd) {
            self.cwd = former_parent;
        }
        Ok(Outcome::Silent)
    }
}
