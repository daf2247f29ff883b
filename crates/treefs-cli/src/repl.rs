//! The read-eval-print loop: logging setup, tokenization, prompt.

use std::io::{self, BufRead, Write};

use anyhow::{Result, bail};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use treefs_core::BackingStore;

use crate::cli::Cli;
use crate::session::{Outcome, Session};

/// The interactive prompt.
pub const PROMPT: &str = "ffs> ";

/// Initializes logging infrastructure.
///
/// Sets up tracing with appropriate log levels based on the verbosity
/// flag, writing to stderr so diagnostics never mix with command
/// output.
///
/// # Errors
///
/// Returns an error if logging initialization fails.
pub fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

/// Splits a command line into words, honoring single and double quotes
/// and backslash escapes, so `add -notes "two words"` carries the text
/// through as one argument.
///
/// # Errors
///
/// Returns an error on an unterminated quote or a trailing backslash.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some('"') | None if ch == '\\' => {
                let Some(escaped) = chars.next() else {
                    bail!("trailing backslash");
                };
                in_word = true;
                current.push(escaped);
            }
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                in_word = true;
                current.push(ch);
            }
        }
    }

    if quote.is_some() {
        bail!("unterminated quote");
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Runs the interpreter until `quit` or end of input.
///
/// Errors from individual commands are printed and the loop continues;
/// only environment failures (a broken stdin, an unusable backing
/// directory) end the process with an error.
///
/// # Errors
///
/// Returns an error if the backing directory cannot be opened or stdin
/// cannot be read.
pub fn run(cli: &Cli) -> Result<()> {
    let store = BackingStore::open(&cli.root)?;
    info!(root = %store.base().display(), "session started");
    let mut session = Session::new(store);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        print!("{PROMPT}");
        stdout.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break; // end of input
        }
        if line.trim().is_empty() {
            continue;
        }
        let argv = match tokenize(&line) {
            Ok(argv) => argv,
            Err(err) => {
                println!("ffs: {err}");
                continue;
            }
        };
        match session.eval(&argv) {
            Ok(Outcome::Output(text)) => println!("{text}"),
            Ok(Outcome::Silent) => {}
            Ok(Outcome::Quit) => break,
            Err(err) => println!("ffs: {err}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_words() {
        let words = tokenize("create -docs-notes").unwrap();
        assert_eq!(words, ["create", "-docs-notes"]);
    }

    #[test]
    fn test_tokenize_collapses_whitespace() {
        let words = tokenize("  ls   -docs  ").unwrap();
        assert_eq!(words, ["ls", "-docs"]);
    }

    #[test]
    fn test_tokenize_double_quotes_group() {
        let words = tokenize("add -notes \"two words\"").unwrap();
        assert_eq!(words, ["add", "-notes", "two words"]);
    }

    #[test]
    fn test_tokenize_single_quotes_group() {
        let words = tokenize("add -notes 'it\"s fine'").unwrap();
        assert_eq!(words, ["add", "-notes", "it\"s fine"]);
    }

    #[test]
    fn test_tokenize_escape_inside_double_quotes() {
        let words = tokenize(r#"add -notes "a \" b""#).unwrap();
        assert_eq!(words, ["add", "-notes", "a \" b"]);
    }

    #[test]
    fn test_tokenize_adjacent_quotes_join() {
        let words = tokenize("cat 'a'\"b\"").unwrap();
        assert_eq!(words, ["cat", "ab"]);
    }

    #[test]
    fn test_tokenize_empty_quoted_word() {
        let words = tokenize("add -notes \"\"").unwrap();
        assert_eq!(words, ["add", "-notes", ""]);
    }

    #[test]
    fn test_tokenize_unterminated_quote_fails() {
        assert!(tokenize("add -notes \"oops").is_err());
        assert!(tokenize("cat 'oops").is_err());
    }

    #[test]
    fn test_tokenize_trailing_backslash_fails() {
        assert!(tokenize("cat -notes\\").is_err());
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
