//! JSON export implementation.
//!
//! Unlike the syntax exporters, the JSON document keeps isolated nodes.

use super::Exporter;
use crate::graph::{Graph, Node};
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Serializable edge for JSON output.
#[derive(Serialize)]
struct JsonEdge<'a> {
    source: &'a str,
    target: &'a str,
}

/// Root JSON export structure.
#[derive(Serialize)]
struct JsonGraph<'a> {
    nodes: Vec<&'a str>,
    edges: Vec<JsonEdge<'a>>,
}

impl Exporter for JsonExporter {
    fn export<N: Node, W: Write>(&self, graph: &Graph<N>, writer: &mut W) -> io::Result<()> {
        let nodes = graph.get_nodes();
        let edges = nodes
            .iter()
            .flat_map(|source| {
                graph
                    .get_dependencies(source.name())
                    .into_iter()
                    .map(move |target| JsonEdge {
                        source: source.name(),
                        target: target.name(),
                    })
            })
            .collect();

        let export = JsonGraph {
            nodes: nodes.iter().map(|node| node.name()).collect(),
            edges,
        };

        let json = serde_json::to_string_pretty(&export)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_graph() -> Graph {
        let mut graph = Graph::new();
        graph.add_edge_and_nodes("app".to_string(), "lib".to_string());
        graph.add_edge_and_nodes("app".to_string(), "log".to_string());
        graph.add_edge_and_nodes("lib".to_string(), "log".to_string());
        graph.add_nodes(["docs".to_string()]);
        graph
    }

    fn export_json(graph: &Graph) -> serde_json::Value {
        let mut output = Vec::new();
        JsonExporter.export(graph, &mut output).unwrap();
        let json_str = String::from_utf8(output).unwrap();
        serde_json::from_str(&json_str).unwrap()
    }

    #[test]
    fn test_json_export_nodes() {
        let parsed = export_json(&create_test_graph());
        let nodes = parsed["nodes"].as_array().unwrap();
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], "app");
        assert_eq!(nodes[3], "docs");
    }

    #[test]
    fn test_json_export_edges() {
        let parsed = export_json(&create_test_graph());
        let edges = parsed["edges"].as_array().unwrap();
        assert_eq!(edges.len(), 3);

        assert_eq!(edges[0]["source"], "app");
        assert_eq!(edges[0]["target"], "lib");
        assert_eq!(edges[1]["target"], "log");
        assert_eq!(edges[2]["source"], "lib");
    }

    #[test]
    fn test_json_export_empty_graph() {
        let parsed = export_json(&Graph::new());
        assert!(parsed["nodes"].as_array().unwrap().is_empty());
        assert!(parsed["edges"].as_array().unwrap().is_empty());
    }
}
