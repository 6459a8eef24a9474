//! Flow node definitions.
//!
//! A node is one typed, positioned step on the canvas. Its config is a tagged
//! variant keyed by the node's kind, so the recognized fields of each kind are
//! explicit and typed.

use serde::{Deserialize, Serialize};

/// node id
pub type NodeId = String;

/// Id of the single start node.
pub const START_NODE_ID: &str = "start";
/// Id of the single end node.
pub const END_NODE_ID: &str = "end";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, strum::AsRefStr, strum::EnumString, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Start,
    Test,
    Condition,
    End,
}

impl NodeKind {
    /// start and end nodes are terminals: fixed label, no config, never deleted
    pub fn is_terminal(&self) -> bool {
        matches!(self, NodeKind::Start | NodeKind::End)
    }

    /// label given to a freshly created node of this kind
    pub fn default_label(&self) -> &'static str {
        match self {
            NodeKind::Start => "Start",
            NodeKind::Test => "Test Step",
            NodeKind::Condition => "Condition",
            NodeKind::End => "End",
        }
    }
}

/// Canvas coordinate. Only `x` matters for export order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(
        x: f64,
        y: f64,
    ) -> Self {
        Self { x, y }
    }
}

/// Config of a `test` node. Every field is optional; export fills defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// JSON-encoded header map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,
    /// seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl TestConfig {
    /// HTTP GET expecting 200 within 30 seconds
    pub fn default_for_new() -> Self {
        Self {
            test_type: Some("Http".to_string()),
            method: Some("GET".to_string()),
            expected_status: Some(200),
            timeout: Some(30),
            ..Default::default()
        }
    }
}

/// Config of a `condition` node.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConditionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_true: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_false: Option<String>,
}

impl ConditionConfig {
    pub fn default_for_new() -> Self {
        Self {
            condition: Some("response.status == 200".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeConfig {
    Test(TestConfig),
    Condition(ConditionConfig),
    #[default]
    None,
}

impl NodeConfig {
    /// config given to a freshly created node of `kind`
    pub fn default_for(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Test => NodeConfig::Test(TestConfig::default_for_new()),
            NodeKind::Condition => NodeConfig::Condition(ConditionConfig::default_for_new()),
            NodeKind::Start | NodeKind::End => NodeConfig::None,
        }
    }

    /// whether this config may be attached to a node of `kind`
    pub fn fits(
        &self,
        kind: NodeKind,
    ) -> bool {
        matches!(
            (self, kind),
            (NodeConfig::Test(_), NodeKind::Test) | (NodeConfig::Condition(_), NodeKind::Condition) | (NodeConfig::None, _)
        )
    }

    /// String-valued fields in declaration order, keyed by their exchange
    /// names. `testType` is left out; numeric fields never appear.
    pub fn string_fields(&self) -> Vec<(&'static str, &str)> {
        let fields: Vec<(&'static str, Option<&String>)> = match self {
            NodeConfig::Test(c) => vec![
                ("endpoint", c.endpoint.as_ref()),
                ("method", c.method.as_ref()),
                ("headers", c.headers.as_ref()),
                ("body", c.body.as_ref()),
            ],
            NodeConfig::Condition(c) => vec![
                ("condition", c.condition.as_ref()),
                ("description", c.description.as_ref()),
                ("onTrue", c.on_true.as_ref()),
                ("onFalse", c.on_false.as_ref()),
            ],
            NodeConfig::None => vec![],
        };
        fields.into_iter().filter_map(|(k, v)| v.map(|v| (k, v.as_str()))).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    /// node id
    pub id: NodeId,
    /// node kind, fixed for the node's lifetime
    pub kind: NodeKind,
    /// display label
    pub label: String,
    /// canvas position
    pub position: Position,
    /// kind-specific config
    #[serde(default)]
    pub config: NodeConfig,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        kind: NodeKind,
        position: Position,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: kind.default_label().to_string(),
            position,
            config: NodeConfig::default_for(kind),
        }
    }

    pub fn start(position: Position) -> Self {
        Self::new(START_NODE_ID, NodeKind::Start, position)
    }

    pub fn end(position: Position) -> Self {
        Self::new(END_NODE_ID, NodeKind::End, position)
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }
}
