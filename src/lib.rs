//! depgrapher - Dependency graphs from Makefiles, Dot files and similar text formats
//!
//! This crate reads dependency declarations with configurable line syntaxes,
//! keeps them in a thread-safe graph, and prints the result as an ASCII tree
//! or writes it back out as Dot, Makefile or JSON.

pub mod export;
pub mod graph;
pub mod ingest;
pub mod render;
pub mod syntax;
