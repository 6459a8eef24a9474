//! Editing session - the handle the presentation layer holds.
//!
//! The editor owns the current graph snapshot and is the only writer. Each
//! accepted edit replaces the snapshot wholesale and bumps the revision;
//! listeners learn about changes through a broadcast queue.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::debug;

use crate::{
    Config, FlowError, FlowModel, Result,
    common::BroadcastQueue,
    events::FlowEvent,
    export::{PipelineBuilder, PipelineDocument},
    graph::{Edit, FlowGraph, NodeId, NodeKind, NodePatch, Position},
};

/// The editing session.
///
/// # Example
///
/// ```rust,ignore
/// let mut editor = FlowEditor::new();
/// let nid = editor.add_node(NodeKind::Test, None)?;
/// editor.update_node(&nid, NodePatch::label("API Test"))?;
/// println!("{}", editor.render()?);
/// ```
pub struct FlowEditor {
    /// Current snapshot.
    graph: FlowGraph,
    /// Number of accepted edits.
    revision: u64,
    /// Document builder carrying the pipeline metadata.
    builder: PipelineBuilder,
    /// Change notifications.
    events: Arc<BroadcastQueue<FlowEvent>>,
}

impl Default for FlowEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowEditor {
    pub fn new() -> Self {
        Self::new_with_config(&Config::default())
    }

    pub fn new_with_config(config: &Config) -> Self {
        Self::from_graph(FlowGraph::with_layout(config.layout.clone()), config)
    }

    /// Resume editing an existing snapshot.
    pub fn from_graph(
        graph: FlowGraph,
        config: &Config,
    ) -> Self {
        Self {
            graph,
            revision: 0,
            builder: PipelineBuilder::with_config(config.pipeline.clone()),
            events: BroadcastQueue::new(config.monitor.event_capacity),
        }
    }

    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FlowEvent> {
        self.events.subscribe()
    }

    fn notify(
        &self,
        event: FlowEvent,
    ) {
        // no listeners is fine
        if self.events.send(event).is_err() {
            debug!("flow event dropped, no subscribers");
        }
    }

    fn commit(
        &mut self,
        op: &'static str,
        outcome: Result<FlowGraph>,
        added: Option<NodeId>,
    ) -> Result<()> {
        match outcome {
            Ok(next) => {
                self.graph = next;
                self.revision += 1;
                self.notify(FlowEvent::Changed {
                    revision: self.revision,
                    op,
                    added,
                });
                Ok(())
            }
            Err(e) => Err(self.reject(op, e)),
        }
    }

    fn reject(
        &self,
        op: &'static str,
        e: FlowError,
    ) -> FlowError {
        if let Some(rejection) = e.rejection() {
            self.notify(FlowEvent::Rejected { op, rejection });
        }
        e
    }

    /// Apply any edit to the current snapshot.
    pub fn edit(
        &mut self,
        edit: &Edit,
    ) -> Result<()> {
        if let Edit::AddNode { kind, position } = edit {
            return self.add_node(*kind, *position).map(|_| ());
        }
        let outcome = self.graph.try_apply(edit);
        self.commit(edit.name(), outcome, None)
    }

    pub fn add_node(
        &mut self,
        kind: NodeKind,
        position: Option<Position>,
    ) -> Result<NodeId> {
        let (next, nid) = match self.graph.add_node(kind, position) {
            Ok(added) => added,
            Err(e) => return Err(self.reject("add_node", e)),
        };
        self.commit("add_node", Ok(next), Some(nid.clone()))?;
        Ok(nid)
    }

    pub fn update_node(
        &mut self,
        id: &str,
        patch: NodePatch,
    ) -> Result<()> {
        let outcome = self.graph.update_node(id, patch);
        self.commit("update_node", outcome, None)
    }

    pub fn move_node(
        &mut self,
        id: &str,
        position: Position,
    ) -> Result<()> {
        let outcome = self.graph.move_node(id, position);
        self.commit("move_node", outcome, None)
    }

    pub fn delete_node(
        &mut self,
        id: &str,
    ) -> Result<()> {
        let outcome = self.graph.delete_node(id);
        self.commit("delete_node", outcome, None)
    }

    pub fn connect(
        &mut self,
        from: &str,
        to: &str,
    ) -> Result<()> {
        let outcome = self.graph.connect(from, to);
        self.commit("connect", outcome, None)
    }

    pub fn disconnect(
        &mut self,
        id: &str,
    ) -> Result<()> {
        let outcome = self.graph.disconnect(id);
        self.commit("disconnect", outcome, None)
    }

    /// Exchange form of the current snapshot.
    pub fn model(&self) -> FlowModel {
        FlowModel::from(&self.graph)
    }

    pub fn document(&self) -> Result<PipelineDocument> {
        self.builder.build(self.graph.nodes())
    }

    /// Pipeline text for the current snapshot.
    pub fn render(&self) -> Result<String> {
        self.builder.render(self.graph.nodes(), self.graph.connections())
    }
}
