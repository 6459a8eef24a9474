//! Change notifications emitted by the editor session.

use crate::{Rejection, graph::NodeId};

#[derive(Debug, Clone, PartialEq)]
pub enum FlowEvent {
    /// A new snapshot replaced the previous one.
    Changed {
        revision: u64,
        op: &'static str,
        /// node created by an `add_node` edit
        added: Option<NodeId>,
    },
    /// An edit was refused and the snapshot kept.
    Rejected { op: &'static str, rejection: Rejection },
}

impl FlowEvent {
    pub fn str(&self) -> &str {
        match self {
            FlowEvent::Changed { .. } => "Changed",
            FlowEvent::Rejected { .. } => "Rejected",
        }
    }
}
