//! Connectivity diagnostics over a flow graph snapshot.
//!
//! Degenerate graphs (nodes cut off from `start` after a delete) are valid
//! states; these helpers only report them.

use std::collections::HashMap;

use petgraph::{
    Direction,
    graph::{DiGraph, NodeIndex},
    visit::{Bfs, EdgeRef},
};

use crate::graph::{
    flow::FlowGraph,
    node::{Node, NodeId},
};

impl FlowGraph {
    fn digraph(&self) -> (DiGraph<&Node, &str>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();
        for node in self.nodes() {
            index.insert(node.id.as_str(), graph.add_node(node));
        }
        for c in self.connections() {
            if let (Some(from), Some(to)) = (index.get(c.from.as_str()), index.get(c.to.as_str())) {
                graph.add_edge(*from, *to, c.id.as_str());
            }
        }
        (graph, index)
    }

    /// Nodes that cannot be reached from `start`, in insertion order.
    pub fn unreachable_nodes(&self) -> Vec<NodeId> {
        let (graph, index) = self.digraph();
        let Some(start) = index.get(self.start_id()) else {
            return self.nodes().iter().map(|n| n.id.clone()).collect();
        };

        let mut reached = vec![false; graph.node_count()];
        let mut bfs = Bfs::new(&graph, *start);
        while let Some(idx) = bfs.next(&graph) {
            reached[idx.index()] = true;
        }

        graph.node_indices().filter(|idx| !reached[idx.index()]).map(|idx| graph[idx].id.clone()).collect()
    }

    /// whether `end` can be reached from `start`
    pub fn is_complete(&self) -> bool {
        !self.unreachable_nodes().iter().any(|id| id == self.end_id())
    }

    /// Output a human-readable representation of the flow graph
    pub fn schema(&self) -> String {
        let (graph, _) = self.digraph();
        let mut lines = Vec::new();

        lines.push("=== Flow Graph ===".to_string());
        lines.push(format!("Nodes: {}, Connections: {}", graph.node_count(), graph.edge_count()));
        lines.push(String::new());

        lines.push("--- Nodes ---".to_string());
        for idx in graph.node_indices() {
            let node = graph[idx];
            lines.push(format!("[{}] {} (kind: {}, x: {})", node.id, node.label, node.kind.as_ref(), node.position.x));
        }
        lines.push(String::new());

        lines.push("--- Graph Structure ---".to_string());
        for idx in graph.node_indices() {
            let node = graph[idx];
            let outgoing: Vec<String> = graph.edges_directed(idx, Direction::Outgoing).map(|e| graph[e.target()].id.clone()).collect();

            if outgoing.is_empty() {
                lines.push(format!("{} -> (none)", node.id));
            } else {
                lines.push(format!("{} -> {}", node.id, outgoing.join(", ")));
            }
        }

        lines.join("\n")
    }
}
