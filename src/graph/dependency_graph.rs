//! Dependency graph implementation using petgraph.
//!
//! Provides a directed graph keyed by node name, where an edge from `a` to
//! `b` means "`a` depends on `b`". Nodes are any type implementing [`Node`];
//! ingestion produces plain `String` nodes.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

/// A value that can be stored in a [`Graph`].
///
/// Nodes are identified solely by their name: two nodes with the same name
/// are the same node. `name` is called on every lookup and should be cheap.
pub trait Node: Clone {
    /// Returns the unique name of this node.
    fn name(&self) -> &str;
}

impl Node for String {
    fn name(&self) -> &str {
        self
    }
}

impl Node for &str {
    fn name(&self) -> &str {
        self
    }
}

/// Errors raised by the strict graph operations.
///
/// These signal a caller bug: the lenient
/// [`Graph::add_edge_and_nodes`] never fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// An edge endpoint was not registered in the graph.
    #[error("Node '{0}' is not present in the graph")]
    MissingNode(String),
}

/// A directed graph representing dependencies between named nodes.
///
/// The graph uses petgraph's `StableDiGraph` internally so node indices stay
/// valid across removals. Edges have set semantics: adding an edge that
/// already exists is a no-op.
///
/// # Example
///
/// ```rust
/// use depgrapher::graph::Graph;
///
/// let mut graph: Graph = Graph::new();
/// graph.add_edge_and_nodes("app".to_string(), "lib".to_string());
/// graph.add_edge_and_nodes("lib".to_string(), "core".to_string());
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert!(graph.has_edge("app", "lib"));
/// assert!(!graph.has_edge("lib", "app"));
/// ```
#[derive(Debug, Clone)]
pub struct Graph<N = String> {
    /// The underlying directed graph
    graph: StableDiGraph<N, ()>,
    /// Maps node names to their indices for O(1) lookup
    node_indices: HashMap<String, NodeIndex>,
    /// Existing (source, target) pairs for O(1) edge checks
    edge_set: HashSet<(NodeIndex, NodeIndex)>,
}

impl<N: Node> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Node> Graph<N> {
    /// Creates a new empty graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::Graph;
    ///
    /// let graph: Graph = Graph::new();
    /// assert_eq!(graph.node_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            graph: StableDiGraph::default(),
            node_indices: HashMap::new(),
            edge_set: HashSet::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// Use this when you know approximately how many nodes and edges
    /// will be added to avoid reallocations.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of nodes
    /// * `edges` - Expected number of edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: StableDiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
            edge_set: HashSet::with_capacity(edges),
        }
    }

    /// Adds a node together with edges to already registered targets.
    ///
    /// If a node with the same name exists it is kept and only the edges
    /// are added. A target may name the node itself.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingNode`] if a target is not registered.
    /// Nothing is modified in that case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_node("lib", &[]).unwrap();
    /// graph.add_node("app", &["lib"]).unwrap();
    /// assert!(graph.has_edge("app", "lib"));
    ///
    /// assert!(graph.add_node("tool", &["missing"]).is_err());
    /// assert!(!graph.contains("tool"));
    /// ```
    pub fn add_node(&mut self, node: N, targets: &[&str]) -> Result<(), GraphError> {
        if let Some(missing) = targets
            .iter()
            .find(|&&target| target != node.name() && !self.node_indices.contains_key(target))
        {
            return Err(GraphError::MissingNode(missing.to_string()));
        }

        let source = self.ensure_node(node);
        for target in targets {
            if let Some(&target) = self.node_indices.get(*target) {
                self.connect(source, target);
            }
        }
        Ok(())
    }

    /// Adds several nodes without any edges.
    pub fn add_nodes(&mut self, nodes: impl IntoIterator<Item = N>) {
        for node in nodes {
            self.ensure_node(node);
        }
    }

    /// Adds an edge between two registered nodes.
    ///
    /// Creates an edge from `source` (the dependant) to `target` (the
    /// dependency).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingNode`] if either node doesn't exist; use
    /// [`Graph::add_edge_and_nodes`] when endpoints may be new.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::{Graph, GraphError};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_nodes(["react-dom", "react"]);
    ///
    /// assert!(graph.add_edge("react-dom", "react").is_ok());
    /// assert_eq!(
    ///     graph.add_edge("nonexistent", "react"),
    ///     Err(GraphError::MissingNode("nonexistent".to_string()))
    /// );
    /// ```
    pub fn add_edge(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
        let source_idx = self.index_of(source)?;
        let target_idx = self.index_of(target)?;
        self.connect(source_idx, target_idx);
        Ok(())
    }

    /// Adds an edge, registering either endpoint if it is not present yet.
    ///
    /// Existing nodes are kept; the passed value is dropped in that case.
    pub fn add_edge_and_nodes(&mut self, source: N, target: N) {
        let source = self.ensure_node(source);
        let target = self.ensure_node(target);
        self.connect(source, target);
    }

    /// Gets a reference to a node by name.
    ///
    /// # Returns
    ///
    /// `Some(&N)` if found, `None` otherwise.
    pub fn get_node(&self, name: &str) -> Option<&N> {
        self.node_indices
            .get(name)
            .and_then(|&idx| self.graph.node_weight(idx))
    }

    /// Gets all nodes in the graph.
    ///
    /// Nodes come in insertion order until a node is removed; later nodes
    /// may then fill the freed slots.
    pub fn get_nodes(&self) -> Vec<&N> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Removes a node and every edge starting or ending at it.
    ///
    /// # Returns
    ///
    /// `true` if the node was present.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_edge_and_nodes("a", "b");
    /// assert!(graph.remove_node("b"));
    /// assert!(!graph.remove_node("b"));
    /// assert_eq!(graph.edge_count(), 0);
    /// ```
    pub fn remove_node(&mut self, name: &str) -> bool {
        let Some(idx) = self.node_indices.remove(name) else {
            return false;
        };

        let incident: Vec<(NodeIndex, NodeIndex)> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.graph.edges_directed(idx, Direction::Incoming))
            .map(|edge| (edge.source(), edge.target()))
            .collect();
        for pair in incident {
            self.edge_set.remove(&pair);
        }

        self.graph.remove_node(idx);
        true
    }

    /// Checks whether the graph has an edge from `source` to `target`.
    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        match (self.node_indices.get(source), self.node_indices.get(target)) {
            (Some(&s), Some(&t)) => self.edge_set.contains(&(s, t)),
            _ => false,
        }
    }

    /// Removes the edge from `source` to `target`.
    ///
    /// # Returns
    ///
    /// `true` if the edge was present.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let (Some(&s), Some(&t)) = (self.node_indices.get(source), self.node_indices.get(target))
        else {
            return false;
        };
        if !self.edge_set.remove(&(s, t)) {
            return false;
        }
        if let Some(edge) = self.graph.find_edge(s, t) {
            self.graph.remove_edge(edge);
        }
        true
    }

    /// Gets the dependencies of a node (targets of its outgoing edges).
    ///
    /// Dependencies are returned in the order their edges were added.
    /// An unknown name yields an empty list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_edge_and_nodes("my-app", "react");
    /// graph.add_edge_and_nodes("my-app", "lodash");
    ///
    /// let deps = graph.get_dependencies("my-app");
    /// assert_eq!(deps, vec![&"react", &"lodash"]);
    /// assert!(graph.get_dependencies("nonexistent").is_empty());
    /// ```
    pub fn get_dependencies(&self, name: &str) -> Vec<&N> {
        self.neighbors(name, Direction::Outgoing)
    }

    /// Gets the dependants of a node (sources of its incoming edges).
    pub fn get_dependants(&self, name: &str) -> Vec<&N> {
        self.neighbors(name, Direction::Incoming)
    }

    /// Builds the subgraph reachable from `root` by following dependencies.
    ///
    /// The walk is breadth-first. Every reachable node is included once and
    /// every edge between included nodes that lies on the walk is copied, so
    /// cycles terminate without losing their closing edge.
    ///
    /// # Returns
    ///
    /// `None` if no node is named `root`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use depgrapher::graph::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_edge_and_nodes("a", "b");
    /// graph.add_edge_and_nodes("b", "a");
    /// graph.add_edge_and_nodes("c", "a");
    ///
    /// let sub = graph.get_dependency_graph("a").unwrap();
    /// assert_eq!(sub.node_count(), 2);
    /// assert!(sub.has_edge("b", "a"));
    /// assert!(!sub.contains("c"));
    /// ```
    pub fn get_dependency_graph(&self, root: &str) -> Option<Self> {
        let &start = self.node_indices.get(root)?;
        let mut result = Self::new();
        let mut mapped: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::new();

        mapped.insert(start, result.ensure_node(self.graph[start].clone()));
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let source = mapped[&current];
            for target in self.dependency_indices(current) {
                let copied = match mapped.get(&target) {
                    Some(&copied) => copied,
                    None => {
                        let copied = result.ensure_node(self.graph[target].clone());
                        mapped.insert(target, copied);
                        queue.push_back(target);
                        copied
                    }
                };
                result.connect(source, copied);
            }
        }

        Some(result)
    }

    /// Gets all nodes without dependants.
    ///
    /// These are the tops of the dependency trees in this graph. Nodes that
    /// only take part in cycles are never roots.
    pub fn roots(&self) -> Vec<&N> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .filter_map(|idx| self.graph.node_weight(idx))
            .collect()
    }

    /// Gets all edges as (source, target) pairs.
    pub fn edges(&self) -> Vec<(&N, &N)> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(s, t)| (&self.graph[s], &self.graph[t]))
            .collect()
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    fn index_of(&self, name: &str) -> Result<NodeIndex, GraphError> {
        self.node_indices
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::MissingNode(name.to_string()))
    }

    /// Returns the index of the node with the same name, adding it if needed.
    fn ensure_node(&mut self, node: N) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(node.name()) {
            return idx;
        }
        let name = node.name().to_string();
        let idx = self.graph.add_node(node);
        self.node_indices.insert(name, idx);
        idx
    }

    fn connect(&mut self, source: NodeIndex, target: NodeIndex) {
        if self.edge_set.insert((source, target)) {
            self.graph.add_edge(source, target, ());
        }
    }

    /// Targets of the outgoing edges of `idx`, oldest edge first.
    fn dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // petgraph yields the most recently added edge first
        let mut targets: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .collect();
        targets.reverse();
        targets
    }

    fn neighbors(&self, name: &str, direction: Direction) -> Vec<&N> {
        let Some(&idx) = self.node_indices.get(name) else {
            return Vec::new();
        };

        let mut nodes: Vec<&N> = self
            .graph
            .neighbors_directed(idx, direction)
            .filter_map(|other| self.graph.node_weight(other))
            .collect();
        nodes.reverse();
        nodes
    }
}

impl<N: Node> fmt::Display for Graph<N> {
    /// Formats every edge as `source => target; `.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{{empty graph}}");
        }
        for (source, target) in self.edges() {
            write!(f, "{} => {}; ", source.name(), target.name())?;
        }
        Ok(())
    }
}
