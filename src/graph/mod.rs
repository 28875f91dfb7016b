//! Graph module for dependency relationship modeling.
//!
//! This module provides the [`Graph`] struct for building and querying
//! dependency relationships, and [`SyncedGraph`] for sharing one graph
//! between threads.
//!
//! # Example
//!
//! ```rust
//! use depgrapher::graph::Graph;
//!
//! let mut graph = Graph::new();
//! graph.add_edge_and_nodes("react-dom", "react");
//! graph.add_edge_and_nodes("my-app", "react-dom");
//!
//! assert_eq!(graph.node_count(), 3);
//! assert_eq!(graph.edge_count(), 2);
//! ```

mod dependency_graph;
mod synced;

pub use dependency_graph::{Graph, GraphError, Node};
pub use synced::SyncedGraph;
