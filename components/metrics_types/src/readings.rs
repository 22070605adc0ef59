//! Reading types produced by environment probes and samplers
//!
//! Contains the data structures exchanged between the host probes, the
//! sampling engine, and the snapshot: memory readings, CPU readings, frame
//! statistics, and static environment facts.

use serde::{Deserialize, Serialize};

use crate::UNAVAILABLE;

// ============================================================================
// Memory Types
// ============================================================================

/// Origin of a memory reading, in probe priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MemorySource {
    /// Allocation-accounting query (used/total/limit).
    Heap,
    /// Process resident-set query (used/total).
    ProcessRss,
    /// Coarse installed-memory hint, gigabytes only.
    DeviceHint,
}

impl std::fmt::Display for MemorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heap => write!(f, "heap"),
            Self::ProcessRss => write!(f, "process-rss"),
            Self::DeviceHint => write!(f, "device-hint"),
        }
    }
}

/// Raw heap-accounting reading, in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HeapMemory {
    /// Bytes currently in use
    pub used_bytes: u64,
    /// Bytes currently committed
    pub total_bytes: u64,
    /// Hard allocation limit, if the accounting source exposes one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_bytes: Option<u64>,
}

/// Raw process resident-set reading, in bytes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessMemory {
    /// Resident bytes of the current process
    pub used_bytes: u64,
    /// Total system memory in bytes
    pub total_bytes: u64,
}

/// Aggregated memory reading, tagged with the probe that produced it.
///
/// All fields are optional: an empty value (no probe succeeded) is the
/// documented "unavailable" state, never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
    /// Used memory in whole megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_mb: Option<f64>,
    /// Committed memory in whole megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_mb: Option<f64>,
    /// Allocation limit in whole megabytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_mb: Option<f64>,
    /// Installed-memory estimate in gigabytes (hint probes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_gb: Option<f64>,
    /// Probe that produced this reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<MemorySource>,
}

impl MemoryInfo {
    /// An empty reading: no probe produced a value.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a reading from a device-memory hint in gigabytes.
    pub fn from_device_hint(gigabytes: f64) -> Self {
        Self {
            available_gb: Some(gigabytes),
            source: Some(MemorySource::DeviceHint),
            ..Self::default()
        }
    }

    /// True when no probe produced a value.
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
    }

    /// True when the reading carries a usable figure worth committing.
    pub fn has_reading(&self) -> bool {
        self.used_mb.is_some() || self.available_gb.is_some()
    }

    /// Single human-scale summary: used megabytes, then the gigabyte
    /// estimate, then the "N/A" sentinel.
    pub fn usage_summary(&self) -> String {
        if let Some(used) = self.used_mb {
            return format!("{used:.0} MB");
        }
        if let Some(gb) = self.available_gb {
            return format!("{gb} GB (estimated)");
        }
        UNAVAILABLE.to_string()
    }
}

fn whole_mb(bytes: u64) -> f64 {
    (bytes as f64 / 1_048_576.0).round()
}

impl From<HeapMemory> for MemoryInfo {
    fn from(heap: HeapMemory) -> Self {
        Self {
            used_mb: Some(whole_mb(heap.used_bytes)),
            total_mb: Some(whole_mb(heap.total_bytes)),
            limit_mb: heap.limit_bytes.map(whole_mb),
            available_gb: None,
            source: Some(MemorySource::Heap),
        }
    }
}

impl From<ProcessMemory> for MemoryInfo {
    fn from(rss: ProcessMemory) -> Self {
        Self {
            used_mb: Some(whole_mb(rss.used_bytes)),
            total_mb: Some(whole_mb(rss.total_bytes)),
            limit_mb: None,
            available_gb: None,
            source: Some(MemorySource::ProcessRss),
        }
    }
}

// ============================================================================
// CPU Types
// ============================================================================

/// One synchronous CPU-load sample taken by the synthetic workload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuLoadSample {
    /// Coarse load percentage in [0, 100], rounded to a whole number
    pub usage_percent: f64,
    /// Wall time the workload took, milliseconds, two-decimal precision
    pub processing_time_ms: f64,
    /// Workload accumulator, kept so the computation cannot be elided
    pub accumulator: f64,
}

/// Aggregated CPU reading: static capability facts plus the latest load
/// sample. Interval commits merge over the previous value so static facts
/// survive a partial probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuInfo {
    /// Logical core count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<usize>,
    /// Host identification string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    /// Platform identifier (os-arch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Latest coarse load percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_percent: Option<f64>,
    /// Wall time of the latest load sample, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<f64>,
}

impl CpuInfo {
    /// Merge a newer reading over this one: present fields win, absent
    /// fields keep their previous value.
    pub fn merge_from(&mut self, newer: CpuInfo) {
        if newer.cores.is_some() {
            self.cores = newer.cores;
        }
        if newer.user_agent.is_some() {
            self.user_agent = newer.user_agent;
        }
        if newer.platform.is_some() {
            self.platform = newer.platform;
        }
        if newer.usage_percent.is_some() {
            self.usage_percent = newer.usage_percent;
        }
        if newer.processing_time_ms.is_some() {
            self.processing_time_ms = newer.processing_time_ms;
        }
    }

    /// Fold a load sample into the reading.
    pub fn with_load_sample(mut self, sample: CpuLoadSample) -> Self {
        self.usage_percent = Some(sample.usage_percent);
        self.processing_time_ms = Some(sample.processing_time_ms);
        self
    }
}

// ============================================================================
// Frame Types
// ============================================================================

/// Windowed frame statistics maintained by the frame sampler.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameStats {
    /// Delta between the two most recent frame ticks, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_time_ms: Option<f64>,
    /// Frames per second over the last completed window, rounded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
    /// Average frame time derived from the last window, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_frame_time_ms: Option<f64>,
}

// ============================================================================
// Environment Types
// ============================================================================

/// Physical display facts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    /// Screen width in pixels
    pub screen_width: u32,
    /// Screen height in pixels
    pub screen_height: u32,
    /// Bits per pixel available for colors
    pub color_depth: u32,
    /// Bits per pixel of the output device
    pub pixel_depth: u32,
}

/// Current viewport dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

/// Startup timing deltas reported by the host, milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationTiming {
    /// Content-parsed phase duration
    pub dom_content_loaded_ms: f64,
    /// Full-load phase duration
    pub load_complete_ms: f64,
}

/// Aggregated static environment facts: display, viewport, and startup
/// timing. Absent capabilities stay `None`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentMetrics {
    /// Screen width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_width: Option<u32>,
    /// Screen height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_height: Option<u32>,
    /// Bits per pixel available for colors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_depth: Option<u32>,
    /// Bits per pixel of the output device
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pixel_depth: Option<u32>,
    /// Viewport width in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_width: Option<u32>,
    /// Viewport height in pixels
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport_height: Option<u32>,
    /// Content-parsed phase duration, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom_content_loaded_ms: Option<f64>,
    /// Full-load phase duration, milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_complete_ms: Option<f64>,
}

impl EnvironmentMetrics {
    /// Assemble from whichever capability readings are present.
    pub fn from_parts(
        display: Option<DisplayInfo>,
        viewport: Option<ViewportInfo>,
        timing: Option<NavigationTiming>,
    ) -> Self {
        let mut metrics = Self::default();
        if let Some(display) = display {
            metrics.screen_width = Some(display.screen_width);
            metrics.screen_height = Some(display.screen_height);
            metrics.color_depth = Some(display.color_depth);
            metrics.pixel_depth = Some(display.pixel_depth);
        }
        if let Some(viewport) = viewport {
            metrics.viewport_width = Some(viewport.width);
            metrics.viewport_height = Some(viewport.height);
        }
        if let Some(timing) = timing {
            metrics.dom_content_loaded_ms = Some(timing.dom_content_loaded_ms);
            metrics.load_complete_ms = Some(timing.load_complete_ms);
        }
        metrics
    }
}
