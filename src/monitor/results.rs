//! Screenshot test results kept for later comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{monitor::metrics::PerformanceMetrics, utils};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Device {
    #[default]
    Desktop,
    Mobile,
    Tablet,
}

impl Device {
    /// Emulated viewport `(width, height)`; desktop uses the full frame.
    pub fn viewport(&self) -> Option<(u32, u32)> {
        match self {
            Device::Desktop => None,
            Device::Tablet => Some((768, 1024)),
            Device::Mobile => Some((375, 667)),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TestResult {
    pub id: String,
    pub url: String,
    pub timestamp: DateTime<Utc>,
    pub device: Device,
    /// screenshot as a data URI
    pub screenshot: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<PerformanceMetrics>,
}

impl TestResult {
    pub fn new(
        url: impl Into<String>,
        device: Device,
        screenshot: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: utils::longid(),
            url: url.into(),
            timestamp: utils::time::now(),
            device,
            screenshot: screenshot.into(),
            name: name.into(),
            metrics: None,
        }
    }

    pub fn with_metrics(
        mut self,
        metrics: Option<PerformanceMetrics>,
    ) -> Self {
        self.metrics = metrics;
        self
    }
}

/// Append-only list of captured results.
#[derive(Debug, Clone, Default)]
pub struct ResultLog {
    results: Vec<TestResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        result: TestResult,
    ) {
        self.results.push(result);
    }

    /// Results newest first.
    pub fn list(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().rev()
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&TestResult> {
        self.results.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
