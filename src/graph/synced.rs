//! Concurrency-safe wrapper around [`Graph`].

use parking_lot::{RwLock, RwLockReadGuard};

use super::dependency_graph::{Graph, GraphError, Node};

/// A [`Graph`] guarded by a read/write lock.
///
/// Mutations take the write lock, queries the read lock, so the graph can be
/// shared between threads (ingestion workers insert edges through it).
/// Queries return owned clones of the nodes.
///
/// To run several queries against one consistent state, or to render and
/// export, take the read guard with [`SyncedGraph::read`]; writers block
/// until the guard is dropped.
///
/// # Example
///
/// ```rust
/// use depgrapher::graph::SyncedGraph;
///
/// let graph: SyncedGraph = SyncedGraph::new();
/// std::thread::scope(|scope| {
///     for i in 0..4 {
///         let graph = &graph;
///         scope.spawn(move || graph.add_edge_and_nodes("all".to_string(), i.to_string()));
///     }
/// });
/// assert_eq!(graph.get_dependencies("all").len(), 4);
/// ```
#[derive(Debug)]
pub struct SyncedGraph<N = String> {
    inner: RwLock<Graph<N>>,
}

impl<N: Node> Default for SyncedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> Clone for SyncedGraph<N> {
    /// Copies the graph under the read lock.
    fn clone(&self) -> Self {
        Self::from(self.snapshot())
    }
}

impl<N: Node> From<Graph<N>> for SyncedGraph<N> {
    fn from(graph: Graph<N>) -> Self {
        Self {
            inner: RwLock::new(graph),
        }
    }
}

impl<N: Node> SyncedGraph<N> {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::from(Graph::new())
    }

    /// Creates a new graph with pre-allocated capacity.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self::from(Graph::with_capacity(nodes, edges))
    }

    /// Locks the graph for reading and returns the guard.
    pub fn read(&self) -> RwLockReadGuard<'_, Graph<N>> {
        self.inner.read()
    }

    /// Returns an unsynchronized copy of the current state.
    pub fn snapshot(&self) -> Graph<N> {
        self.inner.read().clone()
    }

    /// Consumes the wrapper and returns the inner graph.
    pub fn into_inner(self) -> Graph<N> {
        self.inner.into_inner()
    }

    /// See [`Graph::add_node`].
    pub fn add_node(&self, node: N, targets: &[&str]) -> Result<(), GraphError> {
        self.inner.write().add_node(node, targets)
    }

    /// See [`Graph::add_nodes`].
    pub fn add_nodes(&self, nodes: impl IntoIterator<Item = N>) {
        self.inner.write().add_nodes(nodes)
    }

    /// See [`Graph::add_edge`].
    pub fn add_edge(&self, source: &str, target: &str) -> Result<(), GraphError> {
        self.inner.write().add_edge(source, target)
    }

    /// See [`Graph::add_edge_and_nodes`].
    pub fn add_edge_and_nodes(&self, source: N, target: N) {
        self.inner.write().add_edge_and_nodes(source, target)
    }

    /// See [`Graph::get_node`].
    pub fn get_node(&self, name: &str) -> Option<N> {
        self.inner.read().get_node(name).cloned()
    }

    /// See [`Graph::get_nodes`].
    pub fn get_nodes(&self) -> Vec<N> {
        self.inner.read().get_nodes().into_iter().cloned().collect()
    }

    /// See [`Graph::remove_node`].
    pub fn remove_node(&self, name: &str) -> bool {
        self.inner.write().remove_node(name)
    }

    /// See [`Graph::has_edge`].
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.inner.read().has_edge(source, target)
    }

    /// See [`Graph::remove_edge`].
    pub fn remove_edge(&self, source: &str, target: &str) -> bool {
        self.inner.write().remove_edge(source, target)
    }

    /// See [`Graph::get_dependencies`].
    pub fn get_dependencies(&self, name: &str) -> Vec<N> {
        self.inner
            .read()
            .get_dependencies(name)
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`Graph::get_dependants`].
    pub fn get_dependants(&self, name: &str) -> Vec<N> {
        self.inner
            .read()
            .get_dependants(name)
            .into_iter()
            .cloned()
            .collect()
    }

    /// See [`Graph::get_dependency_graph`].
    ///
    /// The result is an unsynchronized graph; wrap it with
    /// `SyncedGraph::from` if it is shared again.
    pub fn get_dependency_graph(&self, root: &str) -> Option<Graph<N>> {
        self.inner.read().get_dependency_graph(root)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.inner.read().edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains(name)
    }
}

impl<N: Node> std::fmt::Display for SyncedGraph<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&*self.inner.read(), f)
    }
}
