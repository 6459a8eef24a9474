use serde::{Deserialize, Serialize};

use crate::graph::{
    connection::ConnectionId,
    node::{NodeConfig, NodeId, NodeKind, Position},
};

/// Partial update for a node. There is no `kind` field: a node's kind is
/// fixed for its lifetime.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<NodeConfig>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }

    pub fn position(position: Position) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn config(config: NodeConfig) -> Self {
        Self {
            config: Some(config),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.label.is_none() && self.position.is_none() && self.config.is_none()
    }

    /// whether the patch touches fields that terminal nodes keep fixed
    pub(crate) fn edits_terminal_fields(&self) -> bool {
        self.label.is_some() || self.config.is_some()
    }
}

/// One user edit against the flow graph.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    AddNode {
        kind: NodeKind,
        #[serde(default)]
        position: Option<Position>,
    },
    UpdateNode {
        id: NodeId,
        patch: NodePatch,
    },
    MoveNode {
        id: NodeId,
        position: Position,
    },
    DeleteNode {
        id: NodeId,
    },
    Connect {
        from: NodeId,
        to: NodeId,
    },
    Disconnect {
        id: ConnectionId,
    },
}

impl Edit {
    pub fn name(&self) -> &'static str {
        match self {
            Edit::AddNode { .. } => "add_node",
            Edit::UpdateNode { .. } => "update_node",
            Edit::MoveNode { .. } => "move_node",
            Edit::DeleteNode { .. } => "delete_node",
            Edit::Connect { .. } => "connect",
            Edit::Disconnect { .. } => "disconnect",
        }
    }
}
