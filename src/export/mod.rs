//! Export functionality for dependency graphs.
//!
//! Graphs can be written back in any line-oriented [`Syntax`] (Dot and
//! Makefile have shortcuts) or as JSON. Syntax output can be read again by
//! the ingester; JSON is meant for other tools.

pub mod json;
pub mod syntax;

pub use self::json::JsonExporter;
pub use self::syntax::{write_dot, write_graph, SyntaxExporter};

use std::io::{self, Write};

use crate::graph::{Graph, Node};
use crate::syntax::Syntax;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Dot digraph, readable by graphviz and the Dot syntax
    #[default]
    Dot,
    /// Makefile rules without recipes
    Makefile,
    /// JSON document with node and edge lists
    Json,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dot" | "d" => Ok(ExportFormat::Dot),
            "makefile" | "make" | "m" => Ok(ExportFormat::Makefile),
            "json" => Ok(ExportFormat::Json),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: dot, makefile, json",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Dot => write!(f, "dot"),
            ExportFormat::Makefile => write!(f, "makefile"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for exporters.
pub trait Exporter {
    /// Export the graph to the given writer.
    fn export<N: Node, W: Write>(&self, graph: &Graph<N>, writer: &mut W) -> io::Result<()>;
}

/// Export a graph in the specified format.
pub fn export<N: Node, W: Write>(
    format: ExportFormat,
    graph: &Graph<N>,
    writer: &mut W,
) -> io::Result<()> {
    match format {
        ExportFormat::Dot => SyntaxExporter::new(Syntax::dot()).export(graph, writer),
        ExportFormat::Makefile => SyntaxExporter::new(Syntax::makefile()).export(graph, writer),
        ExportFormat::Json => JsonExporter.export(graph, writer),
    }
}

/// Export a graph to a string.
pub fn export_to_string<N: Node>(format: ExportFormat, graph: &Graph<N>) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, graph, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
