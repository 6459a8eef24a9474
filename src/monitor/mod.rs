//! Boundary collaborators for the URL preview panel: captured screenshot
//! results and page performance metrics.

pub mod metrics;
pub mod results;
mod session;

pub use metrics::{Cookie, NetworkCall, PageSample, PerformanceMetrics, ResourceKind, ResourceMetric, Viewport, parse_cookies};
pub use results::{Device, ResultLog, TestResult};
pub use session::{MetricsMonitor, MetricsSampler};
