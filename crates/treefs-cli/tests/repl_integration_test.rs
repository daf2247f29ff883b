//! Integration tests driving whole interpreter sessions.

use tempfile::TempDir;
use treefs_cli::repl::tokenize;
use treefs_cli::session::{Outcome, Session};
use treefs_core::BackingStore;

fn session() -> (TempDir, Session) {
    let guard = TempDir::new().unwrap();
    let session = Session::new(BackingStore::open(guard.path()).unwrap());
    (guard, session)
}

fn eval(session: &mut Session, line: &str) -> Outcome {
    session.eval(&tokenize(line).unwrap()).unwrap()
}

fn output(session: &mut Session, line: &str) -> String {
    match eval(session, line) {
        Outcome::Output(text) => text,
        other => panic!("expected output from {line:?}, got {other:?}"),
    }
}

#[test]
fn test_pwd_starts_at_root() {
    let (_guard, mut session) = session();
    assert_eq!(output(&mut session, "pwd"), "-");
}

#[test]
fn test_create_add_cat_round_trip() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -docs-notes");
    eval(&mut session, "add -docs-notes hello");
    assert_eq!(output(&mut session, "cat -docs-notes"), "hello");
}

#[test]
fn test_add_replaces_contents() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -notes");
    eval(&mut session, "add -notes first draft");
    eval(&mut session, "add -notes second");
    assert_eq!(output(&mut session, "cat -notes"), "second");
}

#[test]
fn test_quoted_text_reaches_the_file() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -notes");
    eval(&mut session, "add -notes \"two words\"");
    assert_eq!(output(&mut session, "cat -notes"), "two words");
}

#[test]
fn test_cd_and_relative_paths() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -a-b-c");
    eval(&mut session, "cd -a-b");
    assert_eq!(output(&mut session, "pwd"), "-a-b");

    eval(&mut session, "add c bottom");
    assert_eq!(output(&mut session, "cat c"), "bottom");

    eval(&mut session, "cd ..");
    assert_eq!(output(&mut session, "pwd"), "-a");

    eval(&mut session, "cd");
    assert_eq!(output(&mut session, "pwd"), "-");

    eval(&mut session, "cd ..");
    assert_eq!(output(&mut session, "pwd"), "-");
}

#[test]
fn test_ls_lists_files_then_directories() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -docs-inner");
    eval(&mut session, "create -readme");
    let listing = output(&mut session, "ls");
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("readme"));
    assert!(lines[1].contains("docs"));
}

#[test]
fn test_rls_reports_sizes_and_full_paths() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -docs-notes");
    eval(&mut session, "add -docs-notes hello");
    let listing = output(&mut session, "rls -docs");
    assert!(listing.contains("-docs-notes"));
    assert!(listing.contains('5'));
    assert!(listing.starts_with('f'));
}

#[test]
fn test_tree_renders_subtree() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -docs-notes");
    eval(&mut session, "create -docs-sub-draft");
    let rendered = output(&mut session, "tree -docs");
    assert_eq!(
        rendered,
        "-docs\n├── notes\n└── sub\n    └── draft"
    );
}

#[test]
fn test_delete_file_and_directory() {
    let (guard, mut session) = session();
    eval(&mut session, "create -docs-a");
    eval(&mut session, "create -docs-b");
    eval(&mut session, "delete -docs-a");
    assert!(!guard.path().join("-docs-a").exists());

    eval(&mut session, "dd -docs");
    assert!(!guard.path().join("-docs-b").exists());
    let err = session
        .eval(&tokenize("cat -docs-b").unwrap())
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
}

#[test]
fn test_dd_relocates_cwd_out_of_deleted_subtree() {
    let (_guard, mut session) = session();
    eval(&mut session, "create -projects-app-src-main");
    eval(&mut session, "cd -projects-app-src");
    eval(&mut session, "dd -projects-app");
    assert_eq!(output(&mut session, "pwd"), "-projects");
}

#[test]
fn test_clear_empties_everything() {
    let (guard, mut session) = session();
    eval(&mut session, "create -a-one");
    eval(&mut session, "create -b-two");
    eval(&mut session, "clear");
    assert_eq!(eval(&mut session, "ls"), Outcome::Silent);
    assert_eq!(std::fs::read_dir(guard.path()).unwrap().count(), 0);
}

#[test]
fn test_listing_an_empty_directory_prints_nothing() {
    let (_guard, mut session) = session();
    assert_eq!(eval(&mut session, "ls"), Outcome::Silent);

    eval(&mut session, "create -docs-note");
    eval(&mut session, "delete -docs-note");
    assert_eq!(eval(&mut session, "ls -docs"), Outcome::Silent);
    assert_eq!(eval(&mut session, "rls -docs"), Outcome::Silent);
}

#[test]
fn test_errors_keep_the_session_usable() {
    let (_guard, mut session) = session();
    assert!(session.eval(&tokenize("cat -missing").unwrap()).is_err());
    assert!(session.eval(&tokenize("cd -nowhere").unwrap()).is_err());
    assert!(session.eval(&tokenize("nonsense").unwrap()).is_err());
    assert_eq!(output(&mut session, "pwd"), "-");
}

#[test]
fn test_backing_files_are_flat_renders_of_paths() {
    let (guard, mut session) = session();
    eval(&mut session, "create -a-b-c");
    eval(&mut session, "add -a-b-c deep");
    assert_eq!(
        std::fs::read_to_string(guard.path().join("-a-b-c")).unwrap(),
        "deep"
    );
}
