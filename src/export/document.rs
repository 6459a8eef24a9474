//! In-memory pipeline document produced by export.
//!
//! Field declaration order is the output order of the rendered text.

use serde::Serialize;
use serde_json::Value as JsonValue;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PipelineDocument {
    pub api_version: String,
    pub kind: String,
    pub metadata: Metadata,
    pub spec: PipelineSpec,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Metadata {
    pub name: String,
    pub description: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PipelineSpec {
    pub stages: Vec<Stage>,
    pub variables: Vec<Variable>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr)]
pub enum StageType {
    Integration,
    Conditional,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Stage {
    pub name: String,
    pub identifier: String,
    #[serde(rename = "type")]
    pub stage_type: StageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<When>,
    pub spec: StageSpec,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct When {
    pub pipeline_status: String,
    pub condition: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StageSpec {
    pub execution: Execution,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Execution {
    pub steps: Vec<StepEntry>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StepEntry {
    pub step: Step,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Step {
    Http(HttpStep),
    Shell(ShellStep),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HttpStep {
    #[serde(rename = "type")]
    pub step_type: String,
    pub name: String,
    pub identifier: String,
    pub timeout: String,
    pub spec: HttpStepSpec,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpStepSpec {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<String>,
    pub assertion: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShellStep {
    #[serde(rename = "type")]
    pub step_type: String,
    pub name: String,
    pub identifier: String,
    pub spec: ShellStepSpec,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ShellStepSpec {
    pub shell: String,
    pub source: ScriptSource,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScriptSource {
    #[serde(rename = "type")]
    pub source_type: String,
    pub spec: InlineScript,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct InlineScript {
    pub script: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
    pub value: String,
}

impl Variable {
    pub fn string(
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            var_type: "String".to_string(),
            value: value.into(),
        }
    }
}

impl PipelineDocument {
    /// Stage with the given identifier.
    pub fn stage(
        &self,
        identifier: &str,
    ) -> Option<&Stage> {
        self.spec.stages.iter().find(|s| s.identifier == identifier)
    }
}
