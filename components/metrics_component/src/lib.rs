//! Metrics sampling orchestration
//!
//! This module provides the MetricsComponent that owns the recurring
//! sampling loops and exposes the public API for startup milestones and
//! on-demand measurements.
//!
//! # Example
//!
//! ```no_run
//! use metrics_component::{MetricsComponent, SamplerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SamplerConfig::builder()
//!         .sample_interval_ms(1000)
//!         .ready_grace_delay_ms(100)
//!         .build();
//!
//!     let metrics = MetricsComponent::new(config)?;
//!     metrics.start().await?;
//!     Ok(())
//! }
//! ```

mod component;
mod config;
mod error;

pub use component::MetricsComponent;
pub use config::{SamplerConfig, SamplerConfigBuilder};
pub use error::{MetricsError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use host_probes::MockHost;
    use std::sync::Arc;

    #[test]
    fn test_config_default() {
        // Test that default config has expected values
        let config = SamplerConfig::default();

        assert_eq!(config.sample_interval_ms(), 1000);
        assert_eq!(config.frame_interval_ms(), 16);
        assert_eq!(config.ready_grace_delay_ms(), 100);
        assert_eq!(config.cpu_full_load_millis(), 50.0);
    }

    #[test]
    fn test_config_builder() {
        // Test builder pattern for custom config
        let config = SamplerConfig::builder()
            .sample_interval_ms(500)
            .fps_window_ms(2000)
            .cpu_workload_iterations(250_000)
            .build();

        assert_eq!(config.sample_interval_ms(), 500);
        assert_eq!(config.fps_window_ms(), 2000);
        assert_eq!(config.cpu_workload_iterations(), 250_000);
    }

    #[test]
    fn test_metrics_component_new() {
        // Test creating a new MetricsComponent
        let config = SamplerConfig::default();
        let result = MetricsComponent::new(config);

        assert!(result.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sampling_lifecycle() {
        // Test full sampling lifecycle
        let config = SamplerConfig::builder().cpu_workload_iterations(10_000).build();
        let metrics = MetricsComponent::with_host(config, Arc::new(MockHost::new())).unwrap();

        // Initially not running
        assert!(!metrics.is_running());

        // Start sampling
        metrics.start().await.unwrap();
        assert!(metrics.is_running());

        // Stop sampling
        metrics.stop().await.unwrap();
        assert!(!metrics.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cannot_start_twice() {
        // Test that starting an already running sampler returns error
        let config = SamplerConfig::builder().cpu_workload_iterations(10_000).build();
        let metrics = MetricsComponent::with_host(config, Arc::new(MockHost::new())).unwrap();

        metrics.start().await.unwrap();

        // Starting again should fail
        let result = metrics.start().await;
        assert!(result.is_err());

        metrics.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_reflects_host() {
        // Test that snapshots carry the probed readings
        let config = SamplerConfig::builder().cpu_workload_iterations(10_000).build();
        let metrics = MetricsComponent::with_host(config, Arc::new(MockHost::new())).unwrap();

        metrics.start().await.unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.memory_summary, "120 MB");
        assert_eq!(snapshot.cpu.cores, Some(8));

        metrics.stop().await.unwrap();
    }
}
