//! Line-oriented shell over the treefs namespace.
//!
//! The binary reads commands from stdin one line at a time, tokenizes
//! them, and dispatches to a [`session::Session`] holding the tree and
//! the explicit current-directory handle. All namespace semantics live
//! in `treefs-core`; this crate is glue: input, dispatch, output.

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod cli;
pub mod repl;
pub mod session;
