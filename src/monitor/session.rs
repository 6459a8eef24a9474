//! Fire-and-forget metrics sessions.
//!
//! A session loads a URL through a [`MetricsSampler`], waits for the page to
//! settle and samples it. Sessions are never awaited by the editor. When a
//! new session starts before an older one finishes, the older result is
//! discarded on arrival: only the newest session may publish.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use crate::{
    Result,
    config::MonitorConfig,
    monitor::metrics::{PageSample, PerformanceMetrics},
};

/// Browser-side collaborator that loads pages and reads their counters.
#[async_trait]
pub trait MetricsSampler: Send + Sync {
    /// Load `url`, resolving once the page signals it has loaded.
    async fn load(
        &self,
        url: &str,
    ) -> Result<()>;

    /// Read the performance counters of the page loaded for `url`.
    async fn sample(
        &self,
        url: &str,
    ) -> Result<PageSample>;
}

pub struct MetricsMonitor {
    /// Delay between the load signal and sampling.
    settle_delay: Duration,
    /// Generation of the newest session started.
    started: Arc<AtomicU64>,
    /// Generation of the newest session that published.
    finished: Arc<AtomicU64>,
    /// Latest published metrics.
    latest: Arc<watch::Sender<Option<Arc<PerformanceMetrics>>>>,
}

impl Default for MetricsMonitor {
    fn default() -> Self {
        Self::new(&MonitorConfig::default())
    }
}

impl MetricsMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let (latest, _) = watch::channel(None);
        Self {
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            started: Arc::new(AtomicU64::new(0)),
            finished: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(latest),
        }
    }

    /// Start a session on the current tokio runtime.
    ///
    /// The returned handle resolves to the session's own metrics whether or
    /// not they were retained; dropping it detaches the session.
    pub fn start(
        &self,
        sampler: Arc<dyn MetricsSampler>,
        url: impl Into<String>,
    ) -> JoinHandle<PerformanceMetrics> {
        let url = url.into();
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        let started = self.started.clone();
        let finished = self.finished.clone();
        let latest = self.latest.clone();
        let settle_delay = self.settle_delay;

        debug!(generation, url = %url, "metrics session started");
        tokio::spawn(async move {
            let begin = Instant::now();
            let metrics = match sampler.load(&url).await {
                Ok(()) => {
                    tokio::time::sleep(settle_delay).await;
                    let load_time = begin.elapsed().as_secs_f64() * 1000.0;
                    match sampler.sample(&url).await {
                        Ok(sample) => PerformanceMetrics::summarize(load_time, sample),
                        Err(e) => {
                            warn!(generation, "sampling failed, keeping basic metrics: {}", e);
                            PerformanceMetrics::basic(load_time)
                        }
                    }
                }
                Err(e) => {
                    warn!(generation, "page load failed: {}", e);
                    PerformanceMetrics::basic(0.0)
                }
            };

            if publish(&started, &finished, &latest, generation, &metrics) {
                debug!(generation, "metrics session published");
            } else {
                debug!(generation, "stale metrics session discarded");
            }
            metrics
        })
    }

    /// Metrics of the newest session that finished while still newest.
    pub fn latest(&self) -> Option<Arc<PerformanceMetrics>> {
        self.latest.borrow().clone()
    }

    /// Watch published metrics.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<PerformanceMetrics>>> {
        self.latest.subscribe()
    }

    /// whether the newest session is still running
    pub fn is_monitoring(&self) -> bool {
        self.finished.load(Ordering::SeqCst) < self.started.load(Ordering::SeqCst)
    }
}

/// Store `metrics` if `generation` is still the newest session. The check
/// runs under the watch lock so a newer result is never overwritten.
fn publish(
    started: &AtomicU64,
    finished: &AtomicU64,
    latest: &watch::Sender<Option<Arc<PerformanceMetrics>>>,
    generation: u64,
    metrics: &PerformanceMetrics,
) -> bool {
    let published = latest.send_if_modified(|current| {
        if started.load(Ordering::SeqCst) != generation {
            return false;
        }
        *current = Some(Arc::new(metrics.clone()));
        true
    });
    if published {
        finished.fetch_max(generation, Ordering::SeqCst);
    }
    published
}
