//! Export in a line-oriented syntax.
//!
//! Output follows the declaration shape of the [`Syntax`] it is written
//! with, so it can be ingested again with that syntax. Names are always
//! quoted. Only edges are written: a node without dependencies only shows up
//! as a target, and isolated nodes are lost.
//!
//! Quotes inside names are not escaped, and ingestion splits a declaration
//! at the first edge infix even inside quotes. A name that contains `"` or
//! the infix of the syntax (such as `x->y` in Dot) does not survive a round
//! trip.

use std::io::{self, Write};

use super::Exporter;
use crate::graph::{Graph, Node};
use crate::syntax::Syntax;

/// Writes graphs as declarations of one syntax.
#[derive(Debug, Clone)]
pub struct SyntaxExporter {
    syntax: Syntax,
}

impl SyntaxExporter {
    /// Creates an exporter writing declarations of `syntax`.
    pub fn new(syntax: Syntax) -> Self {
        Self { syntax }
    }

    fn write_header<W: Write>(&self, writer: &mut W, source: &str) -> io::Result<()> {
        write!(
            writer,
            "{}\"{}\"{}",
            self.syntax.edge_prefix, source, self.syntax.edge_infix
        )
    }
}

impl Exporter for SyntaxExporter {
    fn export<N: Node, W: Write>(&self, graph: &Graph<N>, writer: &mut W) -> io::Result<()> {
        let syntax = &self.syntax;
        if !syntax.graph_prefix.is_empty() {
            writeln!(writer, "{}", syntax.graph_prefix)?;
        }

        for node in graph.get_nodes() {
            let dependencies = graph.get_dependencies(node.name());
            if dependencies.is_empty() {
                continue;
            }

            self.write_header(writer, node.name())?;
            for (index, dependency) in dependencies.iter().enumerate() {
                if index > 0 {
                    if syntax.target_delimiter.is_empty() {
                        // one target per statement
                        writeln!(writer, "{}", syntax.edge_suffix)?;
                        self.write_header(writer, node.name())?;
                    } else {
                        write!(writer, "{}", syntax.target_delimiter)?;
                    }
                }
                write!(writer, "\"{}\"", dependency.name())?;
            }
            writeln!(writer, "{}", syntax.edge_suffix)?;
        }

        if !syntax.graph_suffix.is_empty() {
            writeln!(writer, "{}", syntax.graph_suffix)?;
        }
        writer.flush()
    }
}

/// Writes `graph` as declarations of `syntax`.
///
/// # Example
///
/// ```rust
/// use depgrapher::export::write_graph;
/// use depgrapher::graph::Graph;
/// use depgrapher::syntax::Syntax;
///
/// let mut graph = Graph::new();
/// graph.add_edge_and_nodes("all".to_string(), "a".to_string());
/// graph.add_edge_and_nodes("all".to_string(), "b".to_string());
///
/// let mut out = Vec::new();
/// write_graph(&graph, &mut out, &Syntax::makefile()).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "\"all\":\"a\" \"b\"\n");
/// ```
pub fn write_graph<N: Node, W: Write>(
    graph: &Graph<N>,
    writer: &mut W,
    syntax: &Syntax,
) -> io::Result<()> {
    SyntaxExporter::new(syntax.clone()).export(graph, writer)
}

/// Writes `graph` as a Dot digraph.
pub fn write_dot<N: Node, W: Write>(graph: &Graph<N>, writer: &mut W) -> io::Result<()> {
    write_graph(graph, writer, &Syntax::dot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ingest;

    fn level_graph() -> Graph {
        let mut graph = Graph::new();
        for (parent, child) in [("1", "2"), ("1", "3")] {
            graph.add_edge_and_nodes(parent.to_string(), child.to_string());
        }
        for parent in ["2", "3"] {
            for child in ["4", "5", "6", "7"] {
                graph.add_edge_and_nodes(parent.to_string(), child.to_string());
            }
        }
        graph
    }

    fn written(graph: &Graph, syntax: &Syntax) -> String {
        let mut out = Vec::new();
        write_graph(graph, &mut out, syntax).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_dot() {
        let mut graph = Graph::new();
        graph.add_edge_and_nodes("a".to_string(), "b".to_string());
        graph.add_edge_and_nodes("a".to_string(), "c".to_string());

        let mut out = Vec::new();
        write_dot(&graph, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "digraph{\n\"a\"->\"b\";\n\"a\"->\"c\";\n}\n"
        );
    }

    #[test]
    fn test_write_empty_graph() {
        let graph: Graph = Graph::new();
        assert_eq!(written(&graph, &Syntax::dot()), "digraph{\n}\n");
        assert_eq!(written(&graph, &Syntax::makefile()), "");
    }

    #[test]
    fn test_write_make_call() {
        let mut graph = Graph::new();
        graph.add_edge_and_nodes("app".to_string(), "lib".to_string());
        graph.add_edge_and_nodes("app".to_string(), "base".to_string());

        let calls = Syntax::make_call();
        assert_eq!(
            written(&graph, &calls[0]),
            "$(call DEPEND_ALL,\"app\",\"lib\",\"base\")\n"
        );
    }

    #[test]
    fn test_isolated_nodes_are_dropped() {
        let mut graph = Graph::new();
        graph.add_nodes(["alone".to_string()]);
        graph.add_edge_and_nodes("a".to_string(), "b".to_string());
        assert!(!written(&graph, &Syntax::makefile()).contains("alone"));
    }

    #[test]
    fn test_dot_round_trip() {
        let graph = level_graph();
        let dot = written(&graph, &Syntax::dot());
        let reread = ingest(dot.as_bytes(), &[Syntax::dot()]).unwrap().into_inner();

        assert_eq!(reread.node_count(), graph.node_count());
        assert_eq!(reread.edge_count(), graph.edge_count());
        for (source, target) in graph.edges() {
            assert!(reread.has_edge(source, target));
        }
    }

    #[test]
    fn test_dot_name_containing_infix_is_split() {
        let mut graph: Graph = Graph::new();
        graph.add_edge_and_nodes("x->y".to_string(), "z".to_string());
        let dot = written(&graph, &Syntax::dot());
        assert_eq!(dot, "digraph{\n\"x->y\"->\"z\";\n}\n");

        let reread = ingest(dot.as_bytes(), &[Syntax::dot()]).unwrap().into_inner();
        assert_eq!(reread.edge_count(), 1);
        assert!(!reread.has_edge("x->y", "z"));
    }

    #[test]
    fn test_makefile_round_trip() {
        let graph = level_graph();
        let make = written(&graph, &Syntax::makefile());
        let reread = ingest(make.as_bytes(), &[Syntax::makefile()])
            .unwrap()
            .into_inner();

        assert_eq!(reread.edge_count(), graph.edge_count());
        assert_eq!(reread.get_dependencies("2"), graph.get_dependencies("2"));
    }
}
