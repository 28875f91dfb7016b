//! Ingestion of dependency declarations from text.
//!
//! Input is read line by line (with backslash continuation, see
//! [`ContinuedLines`]) and every line is matched against a list of
//! [`Syntax`] definitions. Matching declarations become edges of a
//! [`SyncedGraph`].
//!
//! # Example
//!
//! ```rust
//! use depgrapher::ingest;
//! use depgrapher::syntax::Syntax;
//!
//! let input = "1: 2 3\n2 3: 4 5 6 7\n";
//! let graph = ingest::ingest(input.as_bytes(), &[Syntax::makefile()]).unwrap();
//! assert_eq!(graph.node_count(), 7);
//! assert_eq!(graph.get_dependencies("1"), vec!["2", "3"]);
//! ```

pub mod lines;
mod scanner;

pub use lines::ContinuedLines;
pub use scanner::{ingest_into, split_declaration, IngestStats, SyntaxScanner};

use std::io::{self, BufRead};

use thiserror::Error;

use crate::graph::SyncedGraph;
use crate::syntax::Syntax;

/// Reading the input failed part way through.
///
/// The edges read before the failure are kept and can be recovered with
/// [`IngestError::into_partial`].
#[derive(Debug, Error)]
#[error("Failed to read input: {source}")]
pub struct IngestError {
    #[source]
    source: io::Error,
    partial: SyncedGraph,
}

impl IngestError {
    /// The underlying I/O error.
    pub fn io_error(&self) -> &io::Error {
        &self.source
    }

    /// The graph built before the failure.
    pub fn partial(&self) -> &SyncedGraph {
        &self.partial
    }

    /// Consumes the error and returns the partial graph.
    pub fn into_partial(self) -> SyncedGraph {
        self.partial
    }
}

/// Builds a new graph from everything `reader` declares.
///
/// # Arguments
///
/// * `reader` - Source of the text to scan
/// * `syntaxes` - Syntaxes to try on each line, in priority order
///
/// # Errors
///
/// Returns an [`IngestError`] holding the partial graph if reading fails or
/// if `syntaxes` is empty.
pub fn ingest<R: BufRead>(reader: R, syntaxes: &[Syntax]) -> Result<SyncedGraph, IngestError> {
    let graph = SyncedGraph::new();
    match ingest_into(&graph, reader, syntaxes) {
        Ok(_) => Ok(graph),
        Err(source) => Err(IngestError {
            source,
            partial: graph,
        }),
    }
}
