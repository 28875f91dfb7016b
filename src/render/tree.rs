//! ASCII dependency tree layout.
//!
//! A node is drawn as a field `" [name] "` centred above its dependencies,
//! which are laid out left to right. Two connector rows join the field to
//! each dependency:
//!
//! ```text
//!     [a]
//!     / \
//!    V   V
//!  [b]  [c]
//!   |     |
//!   V     V
//!  [d]  [&d]
//! ```
//!
//! A node met a second time in the same drawing is marked with `&` and its
//! dependencies are not repeated, so shared dependencies and cycles are
//! drawn once.

use std::collections::HashSet;

use log::debug;

use super::block::Block;
use super::wrap;
use crate::graph::{Graph, Node};

/// Text printed for a graph without nodes.
pub const EMPTY_GRAPH: &str = "{empty graph}";

/// Number of connector rows between a node and its dependencies.
const ARROW_ROWS: usize = 2;

fn field(name: &str, revisited: bool) -> String {
    if revisited {
        format!(" [&{}] ", name)
    } else {
        format!(" [{}] ", name)
    }
}

/// Draws dependency trees of a [`Graph`].
///
/// # Example
///
/// ```rust
/// use depgrapher::graph::Graph;
/// use depgrapher::render::TreeRenderer;
///
/// let mut graph = Graph::new();
/// graph.add_edge_and_nodes("a".to_string(), "b".to_string());
///
/// let lines = TreeRenderer::new(&graph).render(&"a".to_string());
/// assert_eq!(lines, vec![" [a]", "  |", "  V", " [b]"]);
/// ```
#[derive(Debug, Clone)]
pub struct TreeRenderer<'g, N> {
    graph: &'g Graph<N>,
    max_width: Option<usize>,
}

impl<'g, N: Node> TreeRenderer<'g, N> {
    /// Creates a renderer that does not wrap its output.
    pub fn new(graph: &'g Graph<N>) -> Self {
        Self {
            graph,
            max_width: None,
        }
    }

    /// Sets the column limit used to wrap wide drawings, see [`wrap`].
    pub fn max_width(mut self, max_width: Option<usize>) -> Self {
        self.max_width = max_width;
        self
    }

    /// Draws the tree of everything `root` depends on.
    ///
    /// A root that is not part of the graph is drawn on its own.
    pub fn render(&self, root: &N) -> Vec<String> {
        let block = match self.graph.get_node(root.name()) {
            Some(node) => Session::new(self.graph).layout(node),
            None => Block::leaf(&field(root.name(), false)),
        };
        self.finish(block)
    }

    /// Draws every tree of the graph side by side.
    ///
    /// Each root (a node without dependants) starts a tree. Nodes that are
    /// only reachable through a cycle get a tree of their own, started at
    /// the first such node, so every node shows up at least once.
    pub fn render_full(&self) -> Vec<String> {
        if self.graph.is_empty() {
            return vec![EMPTY_GRAPH.to_string()];
        }

        let mut session = Session::new(self.graph);
        let mut trees: Vec<Block> = self
            .graph
            .roots()
            .into_iter()
            .map(|root| session.layout(root))
            .collect();

        for node in self.graph.get_nodes() {
            if !session.visited.contains(node.name()) {
                debug!("Drawing cycle starting at '{}' as its own tree", node.name());
                trees.push(session.layout(node));
            }
        }

        self.finish(Block::beside(trees))
    }

    fn finish(&self, block: Block) -> Vec<String> {
        let lines = block.into_lines();
        match self.max_width {
            Some(width) => wrap(lines, width),
            None => lines,
        }
    }
}

/// State of one drawing.
struct Session<'g, N> {
    graph: &'g Graph<N>,
    visited: HashSet<&'g str>,
}

/// A node whose dependencies are being laid out.
struct Frame<'g, N> {
    label: String,
    pending: std::vec::IntoIter<&'g N>,
    children: Vec<Block>,
}

impl<'g, N: Node> Session<'g, N> {
    fn new(graph: &'g Graph<N>) -> Self {
        Self {
            graph,
            visited: HashSet::new(),
        }
    }

    /// Lays out the tree below `root`.
    ///
    /// Depth first with an explicit stack, so long chains do not exhaust
    /// the thread stack.
    fn layout(&mut self, root: &'g N) -> Block {
        let mut stack: Vec<Frame<'g, N>> = Vec::new();
        let mut frame = self.enter(root);
        loop {
            match frame.pending.next() {
                Some(dependency) => {
                    let child = self.enter(dependency);
                    stack.push(std::mem::replace(&mut frame, child));
                }
                None => {
                    let block = compose(&frame.label, frame.children);
                    match stack.pop() {
                        Some(parent) => {
                            frame = parent;
                            frame.children.push(block);
                        }
                        None => return block,
                    }
                }
            }
        }
    }

    /// Marks `node` visited. A revisit gets no dependencies.
    fn enter(&mut self, node: &'g N) -> Frame<'g, N> {
        let name = node.name();
        let (label, dependencies) = if self.visited.insert(name) {
            (field(name, false), self.graph.get_dependencies(name))
        } else {
            (field(name, true), Vec::new())
        };
        Frame {
            label,
            pending: dependencies.into_iter(),
            children: Vec::new(),
        }
    }
}

/// Puts `label` above its laid out dependencies and draws the arrows.
fn compose(label: &str, children: Vec<Block>) -> Block {
    if children.is_empty() {
        return Block::leaf(label);
    }

    let mut midpoints = Vec::with_capacity(children.len());
    let mut offset = 0;
    for child in &children {
        midpoints.push(offset + child.width() / 2);
        offset += child.width();
    }

    let mut below = Block::beside(children);
    let label_len = label.chars().count();
    let label_start = if label_len > below.width() {
        // centre the children under the wider label
        let spare = label_len - below.width();
        below = below.pad(spare / 2, spare - spare / 2);
        for midpoint in &mut midpoints {
            *midpoint += spare / 2;
        }
        0
    } else {
        (below.width() - label_len) / 2
    };

    let width = below.width();
    let header = Block::leaf(label).pad(label_start, width - label_start - label_len);
    let arrows = midpoints
        .into_iter()
        .fold(Block::blank(width, ARROW_ROWS), |arrows, midpoint| {
            if midpoint < label_start {
                arrows
                    .with_glyph(midpoint + 2, 0, '/')
                    .with_glyph(midpoint + 1, 1, 'V')
            } else if midpoint < label_start + label_len {
                arrows.with_glyph(midpoint, 0, '|').with_glyph(midpoint, 1, 'V')
            } else {
                arrows
                    .with_glyph(midpoint.saturating_sub(2), 0, '\\')
                    .with_glyph(midpoint.saturating_sub(1), 1, 'V')
            }
        });

    header.above(arrows).above(below)
}

/// Draws the tree below `root` without wrapping.
pub fn render_tree<N: Node>(graph: &Graph<N>, root: &N) -> Vec<String> {
    TreeRenderer::new(graph).render(root)
}

/// Draws the whole graph without wrapping.
pub fn render_full_tree<N: Node>(graph: &Graph<N>) -> Vec<String> {
    TreeRenderer::new(graph).render_full()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_of(edges: &[(&str, &str)]) -> Graph {
        let mut graph = Graph::new();
        for (source, target) in edges {
            graph.add_edge_and_nodes(source.to_string(), target.to_string());
        }
        graph
    }

    /// 1 -> {2, 3}, {2, 3} -> {4, 5, 6, 7}
    fn level_graph() -> Graph {
        let mut edges = vec![("1", "2"), ("1", "3")];
        for parent in ["2", "3"] {
            for child in ["4", "5", "6", "7"] {
                edges.push((parent, child));
            }
        }
        graph_of(&edges)
    }

    #[test]
    fn test_render_single_node() {
        let mut graph = Graph::new();
        graph.add_nodes(["a".to_string()]);
        assert_eq!(render_tree(&graph, &"a".to_string()), vec![" [a]"]);
    }

    #[test]
    fn test_render_unknown_root() {
        let graph = graph_of(&[("a", "b")]);
        assert_eq!(render_tree(&graph, &"zzz".to_string()), vec![" [zzz]"]);
    }

    #[test]
    fn test_render_two_children() {
        let graph = graph_of(&[("a", "b"), ("a", "c")]);
        assert_eq!(
            render_tree(&graph, &"a".to_string()),
            vec!["   [a]", "  |  \\", "  V   V", " [b]  [c]"]
        );
    }

    #[test]
    fn test_render_diamond_marks_revisit() {
        let graph = graph_of(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let lines = render_tree(&graph, &"a".to_string());
        assert_eq!(
            lines,
            vec![
                "    [a]",
                "    / \\",
                "   V   V",
                " [b]  [c]",
                "  |     |",
                "  V     V",
                " [d]  [&d]",
            ]
        );
    }

    #[test]
    fn test_render_self_cycle_terminates() {
        let graph = graph_of(&[("a", "a")]);
        assert_eq!(
            render_tree(&graph, &"a".to_string()),
            vec![" [a]", "   |", "   V", " [&a]"]
        );
    }

    #[test]
    fn test_render_wide_label_centres_children() {
        let graph = graph_of(&[("root", "x")]);
        assert_eq!(
            render_tree(&graph, &"root".to_string()),
            vec![" [root]", "   |", "   V", "  [x]"]
        );
    }

    #[test]
    fn test_render_level_graph() {
        let lines = render_tree(&level_graph(), &"1".to_string());
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], "                    [1]");
        assert_eq!(lines[3], "        [2]                   [3]");
        assert_eq!(lines[6], " [4]  [5]  [6]  [7]  [&4]  [&5]  [&6]  [&7]");
    }

    #[test]
    fn test_render_full_matches_single_root() {
        let graph = level_graph();
        assert_eq!(render_full_tree(&graph), render_tree(&graph, &"1".to_string()));
    }

    #[test]
    fn test_render_full_includes_unreachable_cycles() {
        let graph = graph_of(&[("a", "b"), ("x", "y"), ("p", "q"), ("q", "p")]);
        assert_eq!(
            render_full_tree(&graph),
            vec![
                " [a]  [x]  [p]",
                "  |    |     |",
                "  V    V     V",
                " [b]  [y]  [q]",
                "             |",
                "             V",
                "           [&p]",
            ]
        );
    }

    #[test]
    fn test_render_full_empty_graph() {
        let graph: Graph = Graph::new();
        assert_eq!(render_full_tree(&graph), vec![EMPTY_GRAPH]);
    }

    #[test]
    fn test_render_full_isolated_nodes() {
        let mut graph: Graph = Graph::new();
        graph.add_nodes(["a".to_string(), "b".to_string()]);
        assert_eq!(render_full_tree(&graph), vec![" [a]  [b]"]);
    }

    #[test]
    fn test_render_is_repeatable() {
        let graph = graph_of(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        let renderer = TreeRenderer::new(&graph);
        assert_eq!(renderer.render(&"a".to_string()), renderer.render(&"a".to_string()));
    }

    #[test]
    fn test_render_wraps_to_max_width() {
        let graph = graph_of(&[("a", "b"), ("a", "c")]);
        let lines = TreeRenderer::new(&graph)
            .max_width(Some(5))
            .render(&"a".to_string());
        assert_eq!(
            lines,
            vec!["   [a", "  |", "  V", " [b]", "", "]", "\\", " V", " [c]"]
        );
    }

    #[test]
    fn test_render_synced_graph_under_read_lock() {
        let synced = crate::graph::SyncedGraph::from(graph_of(&[("a", "b")]));
        let guard = synced.read();
        let lines = TreeRenderer::new(&guard).render(&"a".to_string());
        assert_eq!(lines[3], " [b]");
    }

    #[test]
    fn test_render_long_chain() {
        let mut graph: Graph = Graph::new();
        for i in 0..10_000 {
            graph.add_edge_and_nodes(format!("n{}", i), format!("n{}", i + 1));
        }

        let lines = render_tree(&graph, &"n0".to_string());
        assert_eq!(lines.len(), 3 * 10_000 + 1);
        assert_eq!(lines[0].trim(), "[n0]");
        assert_eq!(lines[lines.len() - 1].trim(), "[n10000]");
        assert_eq!(lines.iter().filter(|line| line.contains("[n")).count(), 10_001);
    }
}
