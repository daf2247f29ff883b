//! CLI argument definitions and parsing.

use clap::Parser;
use std::path::PathBuf;

/// treefs - an in-memory hierarchical namespace with disk-backed files.
///
/// Starts an interactive shell. Every virtual file is persisted as one
/// flat physical file inside the chosen backing directory.
#[derive(Parser, Debug)]
#[command(name = "treefs")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the physical backing files
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["treefs"]);
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_root_and_verbose_flags() {
        let cli = Cli::parse_from(["treefs", "--root", "/tmp/data", "-v"]);
        assert_eq!(cli.root, PathBuf::from("/tmp/data"));
        assert!(cli.verbose);
    }
}
