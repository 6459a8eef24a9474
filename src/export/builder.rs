//! Maps flow nodes to pipeline stages and variables.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{
    FlowError, Result,
    config::PipelineConfig,
    export::{
        document::*,
        linearize::linearize,
    },
    graph::{ConditionConfig, Node, NodeConfig, NodeKind, TestConfig},
};

const API_VERSION: &str = "v1";
const DOCUMENT_KIND: &str = "Pipeline";

const DEFAULT_TEST_TYPE: &str = "Http";
const DEFAULT_METHOD: &str = "GET";
const DEFAULT_URL: &str = "https://api.example.com/endpoint";
const DEFAULT_EXPECTED_STATUS: u16 = 200;
/// seconds
const DEFAULT_TIMEOUT: u64 = 30;

const DEFAULT_CONDITION: &str = "<+pipeline.variables.test_result> == 'pass'";

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Empty strings count as unset.
fn or_default<'a>(
    value: &'a Option<String>,
    default: &'a str,
) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Stage name: lowercased label, each run of whitespace replaced by `-`.
pub fn stage_name(label: &str) -> String {
    WHITESPACE.replace_all(&label.to_lowercase(), "-").into_owned()
}

/// Builds [`PipelineDocument`]s from flow nodes.
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Build the pipeline document. Fails only when a test node's headers
    /// are not valid JSON; nothing is emitted in that case.
    pub fn build(
        &self,
        nodes: &[Node],
    ) -> Result<PipelineDocument> {
        let stages = linearize(nodes).into_iter().map(|node| self.stage(node)).collect::<Result<Vec<_>>>()?;
        let variables = self.variables(nodes);
        trace!(stages = stages.len(), variables = variables.len(), "pipeline document built");

        Ok(PipelineDocument {
            api_version: API_VERSION.to_string(),
            kind: DOCUMENT_KIND.to_string(),
            metadata: Metadata {
                name: self.config.name.clone(),
                description: self.config.description.clone(),
            },
            spec: PipelineSpec { stages, variables },
        })
    }

    fn stage(
        &self,
        node: &Node,
    ) -> Result<Stage> {
        match node.kind {
            NodeKind::Condition => {
                let fallback = ConditionConfig::default();
                let config = match &node.config {
                    NodeConfig::Condition(c) => c,
                    _ => &fallback,
                };
                Ok(condition_stage(node, config))
            }
            _ => {
                let fallback = TestConfig::default();
                let config = match &node.config {
                    NodeConfig::Test(c) => c,
                    _ => &fallback,
                };
                test_stage(node, config)
            }
        }
    }

    /// Two fixed defaults, then every non-empty string field of every node
    /// in insertion order as `<nodeId>_<field>`.
    fn variables(
        &self,
        nodes: &[Node],
    ) -> Vec<Variable> {
        let mut variables = vec![Variable::string("test_environment", "development"), Variable::string("timeout_duration", "300s")];
        for node in nodes {
            for (key, value) in node.config.string_fields() {
                if !value.is_empty() {
                    variables.push(Variable::string(format!("{}_{}", node.id, key), value));
                }
            }
        }
        variables
    }
}

fn test_stage(
    node: &Node,
    config: &TestConfig,
) -> Result<Stage> {
    let headers = match config.headers.as_deref().filter(|h| !h.is_empty()) {
        Some(raw) => Some(serde_json::from_str::<serde_json::Value>(raw).map_err(|e| FlowError::Export {
            node_id: node.id.clone(),
            field: "headers".to_string(),
            message: e.to_string(),
        })?),
        None => None,
    };
    let expected_status = config.expected_status.filter(|s| *s != 0).unwrap_or(DEFAULT_EXPECTED_STATUS);
    let timeout = config.timeout.filter(|t| *t != 0).unwrap_or(DEFAULT_TIMEOUT);

    let step = HttpStep {
        step_type: or_default(&config.test_type, DEFAULT_TEST_TYPE).to_string(),
        name: node.label.clone(),
        identifier: format!("{}_step", node.id),
        timeout: format!("{}s", timeout),
        spec: HttpStepSpec {
            method: or_default(&config.method, DEFAULT_METHOD).to_string(),
            url: or_default(&config.endpoint, DEFAULT_URL).to_string(),
            headers,
            request_body: config.body.clone().filter(|b| !b.is_empty()),
            assertion: format!("response.status == {}", expected_status),
        },
    };

    Ok(Stage {
        name: stage_name(&node.label),
        identifier: node.id.clone(),
        stage_type: StageType::Integration,
        when: None,
        spec: StageSpec {
            execution: Execution {
                steps: vec![StepEntry { step: Step::Http(step) }],
            },
        },
    })
}

fn condition_stage(
    node: &Node,
    config: &ConditionConfig,
) -> Stage {
    let script = [
        format!("# {}", or_default(&config.description, "Condition check")),
        format!("echo \"Checking: {}\"", or_default(&config.condition, "No condition specified")),
        format!("# On success: {}", or_default(&config.on_true, "continue")),
        format!("# On failure: {}", or_default(&config.on_false, "fail")),
    ]
    .join("\n");

    let step = ShellStep {
        step_type: "ShellScript".to_string(),
        name: or_default(&config.description, "Conditional Check").to_string(),
        identifier: format!("{}_condition", node.id),
        spec: ShellStepSpec {
            shell: "Bash".to_string(),
            source: ScriptSource {
                source_type: "Inline".to_string(),
                spec: InlineScript { script },
            },
        },
    };

    Stage {
        name: stage_name(&node.label),
        identifier: node.id.clone(),
        stage_type: StageType::Conditional,
        when: Some(When {
            pipeline_status: "Success".to_string(),
            condition: or_default(&config.condition, DEFAULT_CONDITION).to_string(),
        }),
        spec: StageSpec {
            execution: Execution {
                steps: vec![StepEntry { step: Step::Shell(step) }],
            },
        },
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::graph::Position;

    fn test_node(
        id: &str,
        label: &str,
        config: TestConfig,
    ) -> Node {
        Node {
            id: id.into(),
            kind: NodeKind::Test,
            label: label.into(),
            position: Position::new(300.0, 200.0),
            config: NodeConfig::Test(config),
        }
    }

    fn http_step(stage: &Stage) -> &HttpStep {
        match &stage.spec.execution.steps[0].step {
            Step::Http(s) => s,
            Step::Shell(_) => panic!("expected http step"),
        }
    }

    #[test]
    fn test_stage_name() {
        assert_eq!(stage_name("API Test"), "api-test");
        assert_eq!(stage_name("Login   and\tCheckout"), "login-and-checkout");
        assert_eq!(stage_name("single"), "single");
    }

    #[test]
    fn test_test_stage_fields() {
        let node = test_node(
            "test-1",
            "API Test",
            TestConfig {
                endpoint: Some("https://x/y".into()),
                method: Some("POST".into()),
                headers: Some(r#"{"Authorization": "Bearer t"}"#.into()),
                body: Some("{}".into()),
                expected_status: Some(201),
                timeout: Some(5),
                ..Default::default()
            },
        );
        let doc = PipelineBuilder::new().build(&[node]).unwrap();
        let stage = doc.stage("test-1").unwrap();
        assert_eq!(stage.name, "api-test");
        assert_eq!(stage.stage_type, StageType::Integration);
        assert!(stage.when.is_none());

        let step = http_step(stage);
        assert_eq!(step.step_type, "Http");
        assert_eq!(step.identifier, "test-1_step");
        assert_eq!(step.timeout, "5s");
        assert_eq!(step.spec.url, "https://x/y");
        assert_eq!(step.spec.method, "POST");
        assert_eq!(step.spec.headers, Some(json!({"Authorization": "Bearer t"})));
        assert_eq!(step.spec.request_body.as_deref(), Some("{}"));
        assert_eq!(step.spec.assertion, "response.status == 201");
    }

    #[test]
    fn test_test_stage_defaults() {
        let node = test_node(
            "t",
            "T",
            TestConfig {
                headers: Some(String::new()),
                expected_status: Some(0),
                ..Default::default()
            },
        );
        let doc = PipelineBuilder::new().build(&[node]).unwrap();
        let step = http_step(&doc.spec.stages[0]);
        assert_eq!(step.timeout, "30s");
        assert_eq!(step.spec.method, "GET");
        assert_eq!(step.spec.url, "https://api.example.com/endpoint");
        assert_eq!(step.spec.headers, None);
        assert_eq!(step.spec.request_body, None);
        assert_eq!(step.spec.assertion, "response.status == 200");
    }

    #[test]
    fn test_bad_headers_fail_export() {
        let ok = test_node("ok", "Ok", TestConfig::default());
        let bad = test_node(
            "bad-1",
            "Bad",
            TestConfig {
                headers: Some("{not json".into()),
                ..Default::default()
            },
        );
        let err = PipelineBuilder::new().build(&[ok, bad]).unwrap_err();
        let FlowError::Export { node_id, field, .. } = err else {
            panic!("expected export error");
        };
        assert_eq!(node_id, "bad-1");
        assert_eq!(field, "headers");
    }

    #[test]
    fn test_condition_stage() {
        let node = Node {
            id: "cond-1".into(),
            kind: NodeKind::Condition,
            label: "Check Status".into(),
            position: Position::default(),
            config: NodeConfig::Condition(ConditionConfig {
                condition: Some("x==1".into()),
                description: Some("d".into()),
                on_true: Some("deploy".into()),
                ..Default::default()
            }),
        };
        let doc = PipelineBuilder::new().build(&[node]).unwrap();
        let stage = &doc.spec.stages[0];
        assert_eq!(stage.name, "check-status");
        assert_eq!(stage.stage_type, StageType::Conditional);
        let when = stage.when.as_ref().unwrap();
        assert_eq!(when.pipeline_status, "Success");
        assert_eq!(when.condition, "x==1");

        let Step::Shell(step) = &stage.spec.execution.steps[0].step else {
            panic!("expected shell step");
        };
        assert_eq!(step.name, "d");
        assert_eq!(step.identifier, "cond-1_condition");
        assert_eq!(step.spec.source.spec.script, "# d\necho \"Checking: x==1\"\n# On success: deploy\n# On failure: fail");
    }

    #[test]
    fn test_condition_defaults() {
        let node = Node::new("c", NodeKind::Condition, Position::default());
        let node = Node {
            config: NodeConfig::None,
            ..node
        };
        let doc = PipelineBuilder::new().build(&[node]).unwrap();
        let stage = &doc.spec.stages[0];
        assert_eq!(stage.when.as_ref().unwrap().condition, DEFAULT_CONDITION);
    }

    #[test]
    fn test_variables() {
        let cond = Node {
            id: "c1".into(),
            kind: NodeKind::Condition,
            label: "C".into(),
            position: Position::default(),
            config: NodeConfig::Condition(ConditionConfig {
                condition: Some("x==1".into()),
                description: Some("d".into()),
                on_true: Some(String::new()),
                ..Default::default()
            }),
        };
        let quiet = test_node(
            "t1",
            "T",
            TestConfig {
                test_type: Some("Http".into()),
                timeout: Some(30),
                ..Default::default()
            },
        );
        let nodes = vec![Node::start(Position::default()), cond, quiet, Node::end(Position::default())];
        let doc = PipelineBuilder::new().build(&nodes).unwrap();
        let names: Vec<&str> = doc.spec.variables.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["test_environment", "timeout_duration", "c1_condition", "c1_description"]);
        assert_eq!(doc.spec.variables[2].value, "x==1");
        assert!(doc.spec.variables.iter().all(|v| v.var_type == "String"));
    }

    #[test]
    fn test_metadata_from_config() {
        let builder = PipelineBuilder::with_config(PipelineConfig {
            name: "checkout".into(),
            description: "desc".into(),
        });
        let doc = builder.build(&[]).unwrap();
        assert_eq!(doc.api_version, "v1");
        assert_eq!(doc.kind, "Pipeline");
        assert_eq!(doc.metadata.name, "checkout");
        assert!(doc.spec.stages.is_empty());
        assert_eq!(doc.spec.variables.len(), 2);
    }
}
