//! Configuration for the metrics component

use serde::{Deserialize, Serialize};

/// Configuration for the metrics component
///
/// This struct holds all tuning knobs for the sampling service: loop
/// cadences, the FPS aggregation window, the startup grace delay, and the
/// synthetic CPU workload calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Cadence of the fixed-interval sampling loop, milliseconds
    sample_interval_ms: u64,

    /// Period of the fuller environment refresh, milliseconds
    full_refresh_period_ms: u64,

    /// Cadence of the frame tick loop, milliseconds
    frame_interval_ms: u64,

    /// FPS aggregation window, milliseconds
    fps_window_ms: u64,

    /// Grace delay before startup is auto-finished, milliseconds
    ready_grace_delay_ms: u64,

    /// Iteration count of the synthetic CPU workload
    cpu_workload_iterations: u64,

    /// Workload wall time that maps to a 100% CPU reading, milliseconds
    cpu_full_load_millis: f64,
}

impl SamplerConfig {
    /// Create a new builder for SamplerConfig
    ///
    /// # Example
    ///
    /// ```
    /// use metrics_component::SamplerConfig;
    ///
    /// let config = SamplerConfig::builder()
    ///     .sample_interval_ms(500)
    ///     .ready_grace_delay_ms(50)
    ///     .build();
    /// ```
    pub fn builder() -> SamplerConfigBuilder {
        SamplerConfigBuilder::default()
    }

    /// Get the sampling loop cadence in milliseconds
    pub fn sample_interval_ms(&self) -> u64 {
        self.sample_interval_ms
    }

    /// Get the fuller refresh period in milliseconds
    pub fn full_refresh_period_ms(&self) -> u64 {
        self.full_refresh_period_ms
    }

    /// Get the frame tick cadence in milliseconds
    pub fn frame_interval_ms(&self) -> u64 {
        self.frame_interval_ms
    }

    /// Get the FPS aggregation window in milliseconds
    pub fn fps_window_ms(&self) -> u64 {
        self.fps_window_ms
    }

    /// Get the startup grace delay in milliseconds
    pub fn ready_grace_delay_ms(&self) -> u64 {
        self.ready_grace_delay_ms
    }

    /// Get the synthetic workload iteration count
    pub fn cpu_workload_iterations(&self) -> u64 {
        self.cpu_workload_iterations
    }

    /// Get the full-load calibration in milliseconds
    pub fn cpu_full_load_millis(&self) -> f64 {
        self.cpu_full_load_millis
    }
}

impl Default for SamplerConfig {
    /// Create a default configuration
    ///
    /// Default values:
    /// - sample_interval_ms: 1000
    /// - full_refresh_period_ms: 5000
    /// - frame_interval_ms: 16
    /// - fps_window_ms: 1000
    /// - ready_grace_delay_ms: 100
    /// - cpu_workload_iterations: 1,000,000
    /// - cpu_full_load_millis: 50.0
    fn default() -> Self {
        Self {
            sample_interval_ms: 1000,
            full_refresh_period_ms: 5000,
            frame_interval_ms: 16,
            fps_window_ms: 1000,
            ready_grace_delay_ms: 100,
            cpu_workload_iterations: 1_000_000,
            cpu_full_load_millis: 50.0,
        }
    }
}

/// Builder for SamplerConfig
///
/// Provides a fluent interface for constructing SamplerConfig instances.
#[derive(Debug, Clone, Default)]
pub struct SamplerConfigBuilder {
    sample_interval_ms: Option<u64>,
    full_refresh_period_ms: Option<u64>,
    frame_interval_ms: Option<u64>,
    fps_window_ms: Option<u64>,
    ready_grace_delay_ms: Option<u64>,
    cpu_workload_iterations: Option<u64>,
    cpu_full_load_millis: Option<f64>,
}

impl SamplerConfigBuilder {
    /// Set the sampling loop cadence
    ///
    /// # Arguments
    ///
    /// * `millis` - Milliseconds between interval ticks
    pub fn sample_interval_ms(mut self, millis: u64) -> Self {
        self.sample_interval_ms = Some(millis);
        self
    }

    /// Set the fuller refresh period
    ///
    /// # Arguments
    ///
    /// * `millis` - Milliseconds between fuller environment refreshes
    pub fn full_refresh_period_ms(mut self, millis: u64) -> Self {
        self.full_refresh_period_ms = Some(millis);
        self
    }

    /// Set the frame tick cadence
    ///
    /// # Arguments
    ///
    /// * `millis` - Milliseconds between frame ticks
    pub fn frame_interval_ms(mut self, millis: u64) -> Self {
        self.frame_interval_ms = Some(millis);
        self
    }

    /// Set the FPS aggregation window
    ///
    /// # Arguments
    ///
    /// * `millis` - Minimum window span before an FPS figure is derived
    pub fn fps_window_ms(mut self, millis: u64) -> Self {
        self.fps_window_ms = Some(millis);
        self
    }

    /// Set the startup grace delay
    ///
    /// # Arguments
    ///
    /// * `millis` - Delay before startup is auto-finished
    pub fn ready_grace_delay_ms(mut self, millis: u64) -> Self {
        self.ready_grace_delay_ms = Some(millis);
        self
    }

    /// Set the synthetic workload size
    ///
    /// # Arguments
    ///
    /// * `iterations` - Loop iterations per CPU load sample
    pub fn cpu_workload_iterations(mut self, iterations: u64) -> Self {
        self.cpu_workload_iterations = Some(iterations);
        self
    }

    /// Set the full-load calibration
    ///
    /// # Arguments
    ///
    /// * `millis` - Workload wall time that reads as 100% CPU
    pub fn cpu_full_load_millis(mut self, millis: f64) -> Self {
        self.cpu_full_load_millis = Some(millis);
        self
    }

    /// Build the SamplerConfig
    ///
    /// Uses default values for any options not explicitly set.
    pub fn build(self) -> SamplerConfig {
        let default = SamplerConfig::default();

        SamplerConfig {
            sample_interval_ms: self.sample_interval_ms.unwrap_or(default.sample_interval_ms),
            full_refresh_period_ms: self
                .full_refresh_period_ms
                .unwrap_or(default.full_refresh_period_ms),
            frame_interval_ms: self.frame_interval_ms.unwrap_or(default.frame_interval_ms),
            fps_window_ms: self.fps_window_ms.unwrap_or(default.fps_window_ms),
            ready_grace_delay_ms: self
                .ready_grace_delay_ms
                .unwrap_or(default.ready_grace_delay_ms),
            cpu_workload_iterations: self
                .cpu_workload_iterations
                .unwrap_or(default.cpu_workload_iterations),
            cpu_full_load_millis: self
                .cpu_full_load_millis
                .unwrap_or(default.cpu_full_load_millis),
        }
    }
}
