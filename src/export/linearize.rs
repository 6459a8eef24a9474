//! Export order of flow nodes.
//!
//! Stages follow the canvas left to right: non-terminal nodes sorted by `x`,
//! ties kept in insertion order. Connection topology plays no part, so a
//! branching graph whose edges disagree with the visual order still exports
//! in visual order.

use crate::graph::Node;

/// Non-terminal nodes in export order.
pub fn linearize(nodes: &[Node]) -> Vec<&Node> {
    let mut ordered: Vec<&Node> = nodes.iter().filter(|n| !n.is_terminal()).collect();
    // stable sort: equal x keeps insertion order
    ordered.sort_by(|a, b| a.position.x.total_cmp(&b.position.x));
    ordered
}
