//! # Flowstudio
//!
//! Flowstudio is the model behind a visual test pipeline editor. Users place
//! typed nodes (start, test step, condition, end) on a canvas, wire them
//! together and export the result as a declarative pipeline document.
//!
//! ## Core Features
//!
//! - **Flow Graph**: immutable snapshots with enforced structural invariants
//! - **Explicit Rejections**: invalid edits report a [`Rejection`] instead of failing silently
//! - **Pipeline Export**: nodes ordered left to right on the canvas, mapped to stages and rendered as indented text
//! - **Preview Metrics**: screenshot results and last-write-wins performance sampling sessions
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use flowstudio::{FlowGraph, NodeKind, NodePatch};
//!
//! let graph = FlowGraph::new();
//! let (graph, nid) = graph.add_node(NodeKind::Test, None)?;
//! let graph = graph.update_node(&nid, NodePatch::label("API Test"))?;
//! println!("{}", graph.render()?);
//! ```

mod common;
mod config;
mod editor;
mod error;
mod events;
pub mod export;
pub mod graph;
mod model;
pub mod monitor;
mod utils;

pub use config::{Config, LayoutConfig, MonitorConfig, PipelineConfig};
pub use editor::FlowEditor;
pub use error::{FlowError, Rejection};
pub use events::FlowEvent;
pub use export::{PipelineBuilder, PipelineDocument, render};
pub use graph::{Connection, Edit, FlowGraph, Node, NodeConfig, NodeKind, NodePatch, Position};
pub use model::*;

/// Result type alias for Flowstudio operations.
pub type Result<T> = std::result::Result<T, FlowError>;
