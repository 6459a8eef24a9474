//! Pipeline export: linearize the flow, build the document, render text.
//!
//! Export is a pure read of the graph. The rendered text is a one-way
//! artifact; the graph stays the only source of truth.

mod builder;
pub mod document;
mod linearize;
mod yaml;

use std::collections::HashSet;

use tracing::{trace, warn};

use crate::{
    Result,
    graph::{Connection, FlowGraph, Node},
};

pub use builder::{PipelineBuilder, stage_name};
pub use document::PipelineDocument;
pub use linearize::linearize;
pub use yaml::to_yaml;

impl PipelineBuilder {
    /// Build and render in one step.
    pub fn render(
        &self,
        nodes: &[Node],
        connections: &[Connection],
    ) -> Result<String> {
        let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let dangling = connections.iter().filter(|c| !ids.contains(c.from.as_str()) || !ids.contains(c.to.as_str())).count();
        if dangling > 0 {
            warn!(dangling, "skipping connections with unresolved endpoints");
        }

        let document = self.build(nodes)?;
        let text = to_yaml(&document)?;
        trace!(nodes = nodes.len(), connections = connections.len() - dangling, bytes = text.len(), "pipeline rendered");
        Ok(text)
    }
}

/// Render the pipeline text for a set of nodes and connections using the
/// default pipeline metadata.
pub fn render(
    nodes: &[Node],
    connections: &[Connection],
) -> Result<String> {
    PipelineBuilder::new().render(nodes, connections)
}

impl FlowGraph {
    /// Pipeline document for this snapshot.
    pub fn to_document(&self) -> Result<PipelineDocument> {
        PipelineBuilder::new().build(self.nodes())
    }

    /// Pipeline text for this snapshot.
    pub fn render(&self) -> Result<String> {
        render(self.nodes(), self.connections())
    }
}
