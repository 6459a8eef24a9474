use serde::{Deserialize, Serialize};

use crate::{
    FlowError, Result,
    graph::FlowGraph,
    model::{ConnectionModel, NodeModel},
};

/// Plain snapshot exchanged with the presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowModel {
    pub nodes: Vec<NodeModel>,
    #[serde(default)]
    pub connections: Vec<ConnectionModel>,
}

impl FlowModel {
    pub fn from_json(s: &str) -> Result<Self> {
        let flow = serde_json::from_str::<FlowModel>(s);
        match flow {
            Ok(v) => Ok(v),
            Err(e) => Err(FlowError::Model(format!("{}", e))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<&FlowGraph> for FlowModel {
    fn from(graph: &FlowGraph) -> Self {
        Self {
            nodes: graph.nodes().iter().map(NodeModel::from).collect(),
            connections: graph
                .connections()
                .iter()
                .map(|c| ConnectionModel {
                    id: c.id.clone(),
                    from: c.from.clone(),
                    to: c.to.clone(),
                })
                .collect(),
        }
    }
}
