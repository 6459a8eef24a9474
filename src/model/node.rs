use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::trace;

use crate::{
    FlowError, Result,
    graph::{ConditionConfig, Node, NodeConfig, NodeKind, Position, TestConfig},
};

/// A node as the canvas hands it over: flat position, free-form config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeModel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, JsonValue>>,
}

/// Read a scalar as text. Numbers are stringified, `null` is absent.
fn text_field(
    nid: &str,
    key: &str,
    value: &JsonValue,
) -> Result<Option<String>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        JsonValue::Number(n) => Ok(Some(n.to_string())),
        JsonValue::Bool(b) => Ok(Some(b.to_string())),
        _ => Err(FlowError::Model(format!("node '{}': field '{}' must be a scalar", nid, key))),
    }
}

/// Read an integer given either as a number or as a numeric string.
/// `null` and the empty string are absent.
fn int_field<T: TryFrom<u64>>(
    nid: &str,
    key: &str,
    value: &JsonValue,
) -> Result<Option<T>> {
    let invalid = || FlowError::Model(format!("node '{}': field '{}' must be a non-negative integer", nid, key));
    let raw = match value {
        JsonValue::Null => return Ok(None),
        JsonValue::Number(n) => n.as_u64().ok_or_else(invalid)?,
        JsonValue::String(s) if s.trim().is_empty() => return Ok(None),
        JsonValue::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };
    T::try_from(raw).map(Some).map_err(|_| invalid())
}

fn test_config(
    nid: &str,
    map: &Map<String, JsonValue>,
) -> Result<TestConfig> {
    let mut config = TestConfig::default();
    for (key, value) in map {
        match key.as_str() {
            "testType" => config.test_type = text_field(nid, key, value)?,
            "endpoint" => config.endpoint = text_field(nid, key, value)?,
            "method" => config.method = text_field(nid, key, value)?,
            "headers" => config.headers = text_field(nid, key, value)?,
            "body" => config.body = text_field(nid, key, value)?,
            "expectedStatus" => config.expected_status = int_field(nid, key, value)?,
            "timeout" => config.timeout = int_field(nid, key, value)?,
            _ => trace!(nid, key = key.as_str(), "unrecognized test config field dropped"),
        }
    }
    Ok(config)
}

fn condition_config(
    nid: &str,
    map: &Map<String, JsonValue>,
) -> Result<ConditionConfig> {
    let mut config = ConditionConfig::default();
    for (key, value) in map {
        match key.as_str() {
            "condition" => config.condition = text_field(nid, key, value)?,
            "description" => config.description = text_field(nid, key, value)?,
            "onTrue" => config.on_true = text_field(nid, key, value)?,
            "onFalse" => config.on_false = text_field(nid, key, value)?,
            _ => trace!(nid, key = key.as_str(), "unrecognized condition config field dropped"),
        }
    }
    Ok(config)
}

impl NodeModel {
    /// Typed config for this node's kind. Terminal nodes never carry config.
    pub fn typed_config(&self) -> Result<NodeConfig> {
        let Some(map) = &self.config else {
            return Ok(NodeConfig::None);
        };
        match self.kind {
            NodeKind::Test => Ok(NodeConfig::Test(test_config(&self.id, map)?)),
            NodeKind::Condition => Ok(NodeConfig::Condition(condition_config(&self.id, map)?)),
            NodeKind::Start | NodeKind::End => Ok(NodeConfig::None),
        }
    }
}

impl TryFrom<&NodeModel> for Node {
    type Error = FlowError;

    fn try_from(model: &NodeModel) -> Result<Self> {
        Ok(Node {
            id: model.id.clone(),
            kind: model.kind,
            label: model.label.clone(),
            position: Position::new(model.x, model.y),
            config: model.typed_config()?,
        })
    }
}

impl From<&Node> for NodeModel {
    fn from(node: &Node) -> Self {
        let config = match &node.config {
            NodeConfig::Test(c) => serde_json::to_value(c).ok(),
            NodeConfig::Condition(c) => serde_json::to_value(c).ok(),
            NodeConfig::None => None,
        };
        NodeModel {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            x: node.position.x,
            y: node.position.y,
            config: config.and_then(|v| match v {
                JsonValue::Object(map) => Some(map),
                _ => None,
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn model(
        kind: NodeKind,
        config: JsonValue,
    ) -> NodeModel {
        NodeModel {
            id: "n1".into(),
            kind,
            label: "N".into(),
            x: 0.0,
            y: 0.0,
            config: config.as_object().cloned(),
        }
    }

    #[test]
    fn test_typed_test_config() {
        let m = model(
            NodeKind::Test,
            json!({"testType": "Http", "endpoint": "https://x/y", "expectedStatus": "201", "timeout": 15, "extra": "dropped"}),
        );
        let NodeConfig::Test(c) = m.typed_config().unwrap() else {
            panic!("expected test config");
        };
        assert_eq!(c.endpoint.as_deref(), Some("https://x/y"));
        assert_eq!(c.expected_status, Some(201));
        assert_eq!(c.timeout, Some(15));
    }

    #[test]
    fn test_typed_condition_config() {
        let m = model(NodeKind::Condition, json!({"condition": "x==1", "onTrue": "go"}));
        assert_eq!(
            m.typed_config().unwrap(),
            NodeConfig::Condition(ConditionConfig {
                condition: Some("x==1".into()),
                on_true: Some("go".into()),
                ..Default::default()
            })
        );
    }

    #[test]
    fn test_terminal_config_ignored() {
        let m = model(NodeKind::Start, json!({"endpoint": "ignored"}));
        assert_eq!(m.typed_config().unwrap(), NodeConfig::None);
    }

    #[test]
    fn test_invalid_numbers() {
        let m = model(NodeKind::Test, json!({"expectedStatus": "abc"}));
        assert!(m.typed_config().is_err());
        let m = model(NodeKind::Test, json!({"expectedStatus": 70000}));
        assert!(m.typed_config().is_err());
        let m = model(NodeKind::Test, json!({"timeout": ""}));
        assert!(m.typed_config().is_ok());
    }

    #[test]
    fn test_node_to_model() {
        let node = Node::new("test-1", NodeKind::Test, Position::new(300.0, 200.0));
        let m = NodeModel::from(&node);
        let config = m.config.unwrap();
        assert_eq!(config.get("testType"), Some(&json!("Http")));
        assert_eq!(config.get("timeout"), Some(&json!(30)));
        assert!(config.get("endpoint").is_none());
    }
}
