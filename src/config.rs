use std::{fs, path::Path};

use serde::Deserialize;

use crate::{FlowError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// canvas placement config
    pub layout: LayoutConfig,
    /// exported pipeline metadata
    pub pipeline: PipelineConfig,
    /// metrics monitor config
    pub monitor: MonitorConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// x coordinate of the start node in a new graph
    pub start_x: f64,
    /// x coordinate of the end node in a new graph
    pub end_x: f64,
    /// y coordinate shared by nodes placed without a hint
    pub lane_y: f64,
    /// horizontal offset between a new node and the rightmost non-end node
    pub node_spacing: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// pipeline name written to `metadata.name`
    pub name: String,
    /// pipeline description written to `metadata.description`
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// delay after the load signal before sampling, in milliseconds
    pub settle_delay_ms: u64,
    /// capacity of the editor event queue
    pub event_capacity: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            start_x: 100.0,
            end_x: 700.0,
            lane_y: 200.0,
            node_spacing: 200.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "integration-test-pipeline".to_string(),
            description: "Auto-generated integration test pipeline".to_string(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 2000,
            event_capacity: 64,
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| FlowError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        if !config.layout.node_spacing.is_finite() || config.layout.node_spacing <= 0.0 {
            return Err(FlowError::Config("layout.node_spacing must be a positive number".to_string()));
        }
        if config.monitor.event_capacity == 0 {
            return Err(FlowError::Config("monitor.event_capacity must be at least 1".to_string()));
        }
        Ok(config)
    }
}
