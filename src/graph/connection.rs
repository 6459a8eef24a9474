//! Directed connections between flow nodes.

use serde::{Deserialize, Serialize};

use crate::{graph::node::NodeId, utils};

/// Unique identifier for a connection. Opaque: never parsed back into node ids.
pub type ConnectionId = String;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Unique connection identifier.
    pub id: ConnectionId,
    /// ID of the source node.
    pub from: NodeId,
    /// ID of the target node.
    pub to: NodeId,
}

impl Connection {
    /// Creates a connection whose id is `<from>-<to>`, suffixed with a random
    /// id when `taken` reports the plain form as already in use.
    pub fn between(
        from: &str,
        to: &str,
        taken: impl Fn(&str) -> bool,
    ) -> Self {
        let mut id = format!("{}-{}", from, to);
        while taken(&id) {
            id = format!("{}-{}-{}", from, to, utils::shortid());
        }
        Self {
            id,
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// whether this connection joins the ordered pair `(from, to)`
    pub fn joins(
        &self,
        from: &str,
        to: &str,
    ) -> bool {
        self.from == from && self.to == to
    }

    /// whether either endpoint is `nid`
    pub fn touches(
        &self,
        nid: &str,
    ) -> bool {
        self.from == nid || self.to == nid
    }
}
