// Metric reading and snapshot types for the FlowCanvas performance sampler
//
// This module is part of the FlowCanvas editor implementation.

pub mod readings;
pub mod snapshot;

// Re-export commonly used types
pub use readings::{
    CpuInfo, CpuLoadSample, DisplayInfo, EnvironmentMetrics, FrameStats, HeapMemory, MemoryInfo,
    MemorySource, NavigationTiming, ProcessMemory, ViewportInfo,
};
pub use snapshot::{MetricsSnapshot, PANE_READY_CHECKPOINT};

/// Sentinel shown wherever a derived display string has no backing measurement.
pub const UNAVAILABLE: &str = "N/A";

/// Round a millisecond value to two decimal places for display-grade fields.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
