//! The flow graph: an immutable snapshot of nodes and connections.
//!
//! Every edit takes `&self` and returns a new snapshot, leaving the input
//! untouched. The snapshot always holds:
//! - exactly one start node and exactly one end node
//! - unique node ids and unique connection ids
//! - connections whose endpoints both exist, without self-loops
//! - at most one connection per ordered `(from, to)` pair

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::{
    FlowError, FlowModel, Rejection, Result,
    config::LayoutConfig,
    graph::{
        connection::Connection,
        edit::{Edit, NodePatch},
        node::{Node, NodeId, NodeKind, Position},
    },
    utils,
};

#[derive(Debug, Clone, PartialEq)]
pub struct FlowGraph {
    /// nodes in insertion order
    nodes: Vec<Node>,
    /// connections in insertion order
    connections: Vec<Connection>,
    start_id: NodeId,
    end_id: NodeId,
    layout: LayoutConfig,
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowGraph {
    /// create the initial graph: `start -> end`
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        let start = Node::start(Position::new(layout.start_x, layout.lane_y));
        let end = Node::end(Position::new(layout.end_x, layout.lane_y));
        let connection = Connection::between(&start.id, &end.id, |_| false);

        Self {
            start_id: start.id.clone(),
            end_id: end.id.clone(),
            nodes: vec![start, end],
            connections: vec![connection],
            layout,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn start_id(&self) -> &str {
        &self.start_id
    }

    pub fn end_id(&self) -> &str {
        &self.end_id
    }

    /// get node by id
    pub fn node(
        &self,
        id: &str,
    ) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// get connection by id
    pub fn connection(
        &self,
        id: &str,
    ) -> Option<&Connection> {
        self.connections.iter().find(|c| c.id == id)
    }

    pub fn is_connected(
        &self,
        from: &str,
        to: &str,
    ) -> bool {
        self.connections.iter().any(|c| c.joins(from, to))
    }

    fn has_connection_id(
        &self,
        id: &str,
    ) -> bool {
        self.connections.iter().any(|c| c.id == id)
    }

    fn push_connection(
        &mut self,
        from: &str,
        to: &str,
    ) {
        let connection = Connection::between(from, to, |id| self.has_connection_id(id));
        self.connections.push(connection);
    }

    fn fresh_node_id(
        &self,
        kind: NodeKind,
    ) -> NodeId {
        loop {
            let id = format!("{}-{}", kind, utils::shortid());
            if self.node(&id).is_none() {
                return id;
            }
        }
    }

    /// Position right of the rightmost non-end node, on the default lane.
    fn next_position(&self) -> Position {
        let rightmost = self.nodes.iter().filter(|n| n.kind != NodeKind::End).map(|n| n.position.x).fold(f64::NEG_INFINITY, f64::max);
        let x = if rightmost.is_finite() {
            rightmost + self.layout.node_spacing
        } else {
            self.layout.start_x + self.layout.node_spacing
        };
        Position::new(x, self.layout.lane_y)
    }

    /// Add a `test` or `condition` node and splice it in right before `end`.
    ///
    /// A direct `start -> end` connection is replaced by `start -> new -> end`.
    /// Otherwise the first connection `X -> end` becomes `X -> new -> end`.
    /// With nothing leading into `end`, only `new -> end` is added.
    ///
    /// Returns the new snapshot and the id of the added node.
    pub fn add_node(
        &self,
        kind: NodeKind,
        position: Option<Position>,
    ) -> Result<(Self, NodeId)> {
        if kind.is_terminal() {
            return Err(Rejection::TerminalKind.into());
        }

        let mut next = self.clone();
        let id = self.fresh_node_id(kind);
        let position = position.unwrap_or_else(|| self.next_position());
        next.nodes.push(Node::new(id.clone(), kind, position));

        let direct = next.connections.iter().position(|c| c.joins(&self.start_id, &self.end_id));
        let into_end = direct.or_else(|| next.connections.iter().position(|c| c.to == self.end_id));
        match into_end {
            Some(idx) => {
                let replaced = next.connections.remove(idx);
                next.push_connection(&replaced.from, &id);
                next.push_connection(&id, &self.end_id);
            }
            None => next.push_connection(&id, &self.end_id),
        }

        debug!(nid = %id, kind = %kind, x = position.x, "node added");
        Ok((next, id))
    }

    /// Merge `patch` into the node `id`.
    ///
    /// Terminal nodes accept position changes only; a config must match the
    /// node's kind.
    pub fn update_node(
        &self,
        id: &str,
        patch: NodePatch,
    ) -> Result<Self> {
        let node = self.node(id).ok_or(Rejection::UnknownNode)?;
        if node.is_terminal() && patch.edits_terminal_fields() {
            return Err(Rejection::TerminalNode.into());
        }
        if let Some(config) = &patch.config {
            if !config.fits(node.kind) {
                return Err(Rejection::ConfigMismatch.into());
            }
        }

        let mut next = self.clone();
        if let Some(node) = next.nodes.iter_mut().find(|n| n.id == id) {
            if let Some(label) = patch.label {
                node.label = label;
            }
            if let Some(position) = patch.position {
                node.position = position;
            }
            if let Some(config) = patch.config {
                node.config = config;
            }
        }
        debug!(nid = %id, "node updated");
        Ok(next)
    }

    pub fn move_node(
        &self,
        id: &str,
        position: Position,
    ) -> Result<Self> {
        self.update_node(id, NodePatch::position(position))
    }

    /// Remove a node and every connection touching it. Neighbors are not
    /// reconnected.
    pub fn delete_node(
        &self,
        id: &str,
    ) -> Result<Self> {
        let node = self.node(id).ok_or(Rejection::UnknownNode)?;
        if node.is_terminal() {
            return Err(Rejection::TerminalNode.into());
        }

        let mut next = self.clone();
        next.nodes.retain(|n| n.id != id);
        next.connections.retain(|c| !c.touches(id));
        debug!(nid = %id, removed = self.connections.len() - next.connections.len(), "node deleted");
        Ok(next)
    }

    /// Add a connection `from -> to`.
    pub fn connect(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Self> {
        if from == to {
            return Err(Rejection::SelfLoop.into());
        }
        if self.node(from).is_none() || self.node(to).is_none() {
            return Err(Rejection::UnknownNode.into());
        }
        if self.is_connected(from, to) {
            return Err(Rejection::DuplicateConnection.into());
        }

        let mut next = self.clone();
        next.push_connection(from, to);
        debug!(from, to, "connected");
        Ok(next)
    }

    /// Remove a single connection by id.
    pub fn disconnect(
        &self,
        id: &str,
    ) -> Result<Self> {
        if !self.has_connection_id(id) {
            return Err(Rejection::UnknownConnection.into());
        }
        let mut next = self.clone();
        next.connections.retain(|c| c.id != id);
        debug!(cid = %id, "disconnected");
        Ok(next)
    }

    /// Apply an edit, reporting refused edits as [`FlowError::InvalidOperation`].
    pub fn try_apply(
        &self,
        edit: &Edit,
    ) -> Result<Self> {
        match edit {
            Edit::AddNode { kind, position } => self.add_node(*kind, *position).map(|(g, _)| g),
            Edit::UpdateNode { id, patch } => self.update_node(id, patch.clone()),
            Edit::MoveNode { id, position } => self.move_node(id, *position),
            Edit::DeleteNode { id } => self.delete_node(id),
            Edit::Connect { from, to } => self.connect(from, to),
            Edit::Disconnect { id } => self.disconnect(id),
        }
    }

    /// Apply an edit the way the canvas does: a refused edit leaves the
    /// snapshot unchanged.
    pub fn apply(
        &self,
        edit: &Edit,
    ) -> Self {
        match self.try_apply(edit) {
            Ok(next) => next,
            Err(e) => {
                debug!(op = edit.name(), "edit ignored: {}", e);
                self.clone()
            }
        }
    }
}

impl TryFrom<&FlowModel> for FlowGraph {
    type Error = FlowError;

    fn try_from(model: &FlowModel) -> Result<Self> {
        let layout = LayoutConfig::default();
        let mut nodes: Vec<Node> = Vec::with_capacity(model.nodes.len());
        let mut ids = HashSet::new();

        for node_model in model.nodes.iter() {
            if !ids.insert(node_model.id.clone()) {
                return Err(FlowError::Model(format!("duplicate node id '{}'", node_model.id)));
            }
            let mut node = Node::try_from(node_model)?;
            if node.is_terminal() && node.label != node.kind.default_label() {
                warn!(nid = %node.id, label = %node.label, "terminal label reset");
                node.label = node.kind.default_label().to_string();
            }
            nodes.push(node);
        }

        let terminal = |kind: NodeKind| -> Result<NodeId> {
            let mut matching = nodes.iter().filter(|n| n.kind == kind);
            match (matching.next(), matching.next()) {
                (Some(n), None) => Ok(n.id.clone()),
                (None, _) => Err(FlowError::Model(format!("missing {} node", kind))),
                (Some(_), Some(_)) => Err(FlowError::Model(format!("more than one {} node", kind))),
            }
        };
        let start_id = terminal(NodeKind::Start)?;
        let end_id = terminal(NodeKind::End)?;

        let mut connections: Vec<Connection> = Vec::with_capacity(model.connections.len());
        for c in model.connections.iter() {
            if !ids.contains(&c.from) || !ids.contains(&c.to) {
                warn!(cid = %c.id, from = %c.from, to = %c.to, "dangling connection pruned");
                continue;
            }
            if c.from == c.to {
                warn!(cid = %c.id, "self-loop connection pruned");
                continue;
            }
            if connections.iter().any(|e| e.joins(&c.from, &c.to)) {
                warn!(cid = %c.id, "duplicate connection pruned");
                continue;
            }
            if connections.iter().any(|e| e.id == c.id) {
                return Err(FlowError::Model(format!("duplicate connection id '{}'", c.id)));
            }
            connections.push(Connection {
                id: c.id.clone(),
                from: c.from.clone(),
                to: c.to.clone(),
            });
        }

        Ok(Self {
            nodes,
            connections,
            start_id,
            end_id,
            layout,
        })
    }
}

impl FlowGraph {
    /// Build a graph from an exchange model, then adopt `layout` for future placement.
    pub fn from_model(
        model: &FlowModel,
        layout: LayoutConfig,
    ) -> Result<Self> {
        let mut graph = Self::try_from(model)?;
        graph.layout = layout;
        Ok(graph)
    }
}
