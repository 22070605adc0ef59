//! Public API for FlowCanvas performance metrics
//!
//! This module provides a simple, ergonomic API for embedding the
//! performance sampler in a FlowCanvas shell. It wraps the lower-level
//! `metrics_component` with a clean public interface.
//!
//! # Example
//!
//! ```no_run
//! use metrics_api::{FlowMetrics, SamplerConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let metrics = FlowMetrics::new(SamplerConfig::default())?;
//!
//!     metrics.start().await?;
//!     println!("Memory: {}", metrics.memory_usage_summary());
//!
//!     // ... editor runs ...
//!
//!     metrics.stop().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

use std::sync::Arc;
use tokio::sync::watch;

// Re-export public types from the component and type crates
pub use host_probes::{HostEnvironment, MockHost, SystemHost};
pub use metrics_component::{MetricsError, Result, SamplerConfig, SamplerConfigBuilder};
pub use metrics_types::{
    CpuInfo, CpuLoadSample, EnvironmentMetrics, FrameStats, MemoryInfo, MetricsSnapshot,
};

use metrics_component::MetricsComponent;

/// Main performance metrics public API
///
/// This is the primary interface for sampling performance metrics in a
/// FlowCanvas shell. It provides a simplified wrapper around the underlying
/// MetricsComponent.
pub struct FlowMetrics {
    component: MetricsComponent,
}

impl FlowMetrics {
    /// Create a new FlowMetrics instance probing the local system
    ///
    /// # Arguments
    ///
    /// * `config` - Sampler configuration
    ///
    /// # Returns
    ///
    /// Returns `Ok(FlowMetrics)` on success, or an error if the
    /// configuration is invalid.
    ///
    /// # Example
    ///
    /// ```
    /// use metrics_api::{FlowMetrics, SamplerConfig};
    ///
    /// let metrics = FlowMetrics::new(SamplerConfig::default()).unwrap();
    /// ```
    pub fn new(config: SamplerConfig) -> Result<Self> {
        Ok(Self {
            component: MetricsComponent::new(config)?,
        })
    }

    /// Create a new FlowMetrics instance against an arbitrary host
    ///
    /// Embedders pass the environment of their shell; tests pass a
    /// scripted [`MockHost`].
    ///
    /// # Arguments
    ///
    /// * `config` - Sampler configuration
    /// * `host` - Environment the probes will query
    pub fn with_host(config: SamplerConfig, host: Arc<dyn HostEnvironment>) -> Result<Self> {
        Ok(Self {
            component: MetricsComponent::with_host(config, host)?,
        })
    }

    /// Start the sampling loops
    ///
    /// Takes an immediate reading of every metric, then samples on the
    /// configured cadences until [`stop`](Self::stop) is called.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or an error if sampling is already
    /// running.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use metrics_api::{FlowMetrics, SamplerConfig};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// let metrics = FlowMetrics::new(SamplerConfig::default())?;
    /// metrics.start().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start(&self) -> Result<()> {
        self.component.start().await
    }

    /// Stop the sampling loops
    ///
    /// The snapshot keeps its last committed state.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` on success, or an error if sampling is not running.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use metrics_api::{FlowMetrics, SamplerConfig};
    /// # #[tokio::main]
    /// # async fn main() -> anyhow::Result<()> {
    /// # let metrics = FlowMetrics::new(SamplerConfig::default())?;
    /// # metrics.start().await?;
    /// metrics.stop().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn stop(&self) -> Result<()> {
        self.component.stop().await
    }

    /// Check if the sampling loops are currently running
    pub fn is_running(&self) -> bool {
        self.component.is_running()
    }

    /// Whether the startup phase is still in progress
    pub fn is_loading(&self) -> bool {
        self.component.is_loading()
    }

    /// Subscribe to snapshot updates
    ///
    /// The receiver yields every committed snapshot. Subscriptions can be
    /// taken before [`start`](Self::start) and survive restarts.
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.component.subscribe()
    }

    /// Get a clone of the current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.component.snapshot()
    }

    /// Record a named startup checkpoint
    ///
    /// # Arguments
    ///
    /// * `label` - Checkpoint name (e.g., "pane-ready")
    pub fn mark_ready(&self, label: &str) -> MetricsSnapshot {
        self.component.mark_ready(label)
    }

    /// Record the canonical pane-ready checkpoint
    pub fn mark_pane_ready(&self) -> MetricsSnapshot {
        self.component.mark_pane_ready()
    }

    /// Record the end of the startup phase
    ///
    /// Flips the loading flag and fixes the init and total times. Without
    /// an explicit call, the configured grace delay does this automatically
    /// after [`start`](Self::start).
    pub fn finish_loading(&self) -> MetricsSnapshot {
        self.component.finish_loading()
    }

    /// Get the first available memory reading in probe priority order
    pub fn memory_info(&self) -> MemoryInfo {
        self.component.memory_info()
    }

    /// Get a human-scale memory summary
    ///
    /// Returns "512 MB" when a direct reading exists, "8 GB (estimated)"
    /// when only a device hint exists, and "N/A" otherwise.
    ///
    /// # Example
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use metrics_api::{FlowMetrics, MockHost, SamplerConfig};
    /// let metrics =
    ///     FlowMetrics::with_host(SamplerConfig::default(), Arc::new(MockHost::new())).unwrap();
    ///
    /// assert_eq!(metrics.memory_usage_summary(), "120 MB");
    /// ```
    pub fn memory_usage_summary(&self) -> String {
        self.component.memory_usage_summary()
    }

    /// Get static CPU facts plus a fresh load sample
    pub fn cpu_info(&self) -> CpuInfo {
        self.component.cpu_info()
    }

    /// Get display, viewport, and startup timing facts
    pub fn environment_metrics(&self) -> EnvironmentMetrics {
        self.component.environment_metrics()
    }

    /// Run the synthetic CPU workload once and return the load sample
    ///
    /// The reading is bounded to [0, 100] percent.
    pub fn measure_cpu_usage(&self) -> CpuLoadSample {
        self.component.measure_cpu_usage()
    }
}
