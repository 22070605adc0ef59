//! The aggregate metrics snapshot read by the UI shell
//!
//! One writer (the sampler) mutates the snapshot on its ticks; consumers
//! receive clones. Every field is either a measurement or the documented
//! unavailable sentinel once the first tick has completed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::readings::{CpuInfo, EnvironmentMetrics, FrameStats, MemoryInfo};
use crate::UNAVAILABLE;

/// Checkpoint label recorded when the canvas finishes its first render.
pub const PANE_READY_CHECKPOINT: &str = "pane-ready";

/// Aggregate of all currently known metric values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Commit counter; unchanged revision implies unchanged snapshot
    pub revision: u64,
    /// True from start until `finish()` flips it
    pub loading: bool,
    /// Baseline offset of `start()` from service creation, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time_ms: Option<f64>,
    /// Elapsed time from baseline to `finish()`, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub init_time_ms: Option<f64>,
    /// Total startup time reported at `finish()`, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_app_time_ms: Option<f64>,
    /// Named elapsed-time checkpoints measured from the baseline
    pub checkpoints: HashMap<String, f64>,
    /// Latest committed memory reading
    pub memory: MemoryInfo,
    /// Human-scale memory summary derived from the reading
    pub memory_summary: String,
    /// Latest committed CPU reading
    pub cpu: CpuInfo,
    /// Latest frame statistics
    pub frame: FrameStats,
    /// Latest static environment facts
    pub environment: EnvironmentMetrics,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            revision: 0,
            loading: true,
            start_time_ms: None,
            init_time_ms: None,
            total_app_time_ms: None,
            checkpoints: HashMap::new(),
            memory: MemoryInfo::empty(),
            memory_summary: UNAVAILABLE.to_string(),
            cpu: CpuInfo::default(),
            frame: FrameStats::default(),
            environment: EnvironmentMetrics::default(),
        }
    }
}

impl MetricsSnapshot {
    /// Elapsed time of the pane-ready checkpoint, if recorded.
    pub fn pane_ready_ms(&self) -> Option<f64> {
        self.checkpoints.get(PANE_READY_CHECKPOINT).copied()
    }

    /// Record a named checkpoint; a repeated label overwrites.
    pub fn record_checkpoint(&mut self, label: &str, elapsed_ms: f64) {
        self.checkpoints.insert(label.to_string(), elapsed_ms);
    }
}
