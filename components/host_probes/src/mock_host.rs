//! Mock host environment for testing
//!
//! Simulates a fully-capable host with typical readings. Tests script probe
//! sequences by toggling individual capabilities between ticks; production
//! code uses `SystemHost` or a shell-provided environment instead.

use parking_lot::RwLock;

use metrics_types::{DisplayInfo, HeapMemory, NavigationTiming, ProcessMemory, ViewportInfo};

use crate::environment::HostEnvironment;

#[derive(Debug, Clone)]
struct MockState {
    heap_memory: Option<HeapMemory>,
    process_memory: Option<ProcessMemory>,
    device_memory_gb: Option<f64>,
    logical_cores: Option<usize>,
    user_agent: Option<String>,
    platform: Option<String>,
    navigation_timing: Option<NavigationTiming>,
    display_info: Option<DisplayInfo>,
    viewport: Option<ViewportInfo>,
}

/// Scriptable host environment with per-capability toggles.
pub struct MockHost {
    state: RwLock<MockState>,
}

impl MockHost {
    /// A fully-capable host with typical desktop readings.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MockState {
                heap_memory: Some(HeapMemory {
                    used_bytes: 125_829_120,  // 120 MB
                    total_bytes: 268_435_456, // 256 MB
                    limit_bytes: Some(2_147_483_648),
                }),
                process_memory: Some(ProcessMemory {
                    used_bytes: 157_286_400,
                    total_bytes: 17_179_869_184,
                }),
                device_memory_gb: Some(8.0),
                logical_cores: Some(8),
                user_agent: Some("FlowCanvasHost/0.1 (mock)".to_string()),
                platform: Some("linux-x86_64".to_string()),
                navigation_timing: Some(NavigationTiming {
                    dom_content_loaded_ms: 12.5,
                    load_complete_ms: 48.2,
                }),
                display_info: Some(DisplayInfo {
                    screen_width: 1920,
                    screen_height: 1080,
                    color_depth: 24,
                    pixel_depth: 24,
                }),
                viewport: Some(ViewportInfo {
                    width: 1280,
                    height: 720,
                }),
            }),
        }
    }

    /// A host with every capability absent.
    pub fn unavailable() -> Self {
        Self {
            state: RwLock::new(MockState {
                heap_memory: None,
                process_memory: None,
                device_memory_gb: None,
                logical_cores: None,
                user_agent: None,
                platform: None,
                navigation_timing: None,
                display_info: None,
                viewport: None,
            }),
        }
    }

    /// Replace the heap-accounting reading.
    pub fn set_heap_memory(&self, reading: Option<HeapMemory>) {
        self.state.write().heap_memory = reading;
    }

    /// Replace the heap reading with the given used/total megabytes.
    pub fn set_heap_used_mb(&self, used_mb: u64, total_mb: u64) {
        self.set_heap_memory(Some(HeapMemory {
            used_bytes: used_mb * 1_048_576,
            total_bytes: total_mb * 1_048_576,
            limit_bytes: None,
        }));
    }

    /// Replace the resident-set reading.
    pub fn set_process_memory(&self, reading: Option<ProcessMemory>) {
        self.state.write().process_memory = reading;
    }

    /// Replace the device-memory hint.
    pub fn set_device_memory_gb(&self, gigabytes: Option<f64>) {
        self.state.write().device_memory_gb = gigabytes;
    }

    /// Replace the logical core count.
    pub fn set_logical_cores(&self, cores: Option<usize>) {
        self.state.write().logical_cores = cores;
    }

    /// Replace the host identification string.
    pub fn set_user_agent(&self, user_agent: Option<&str>) {
        self.state.write().user_agent = user_agent.map(str::to_string);
    }

    /// Replace the platform identifier.
    pub fn set_platform(&self, platform: Option<&str>) {
        self.state.write().platform = platform.map(str::to_string);
    }

    /// Replace the startup timing deltas.
    pub fn set_navigation_timing(&self, timing: Option<NavigationTiming>) {
        self.state.write().navigation_timing = timing;
    }

    /// Replace the display facts.
    pub fn set_display_info(&self, display: Option<DisplayInfo>) {
        self.state.write().display_info = display;
    }

    /// Replace the viewport dimensions.
    pub fn set_viewport(&self, viewport: Option<ViewportInfo>) {
        self.state.write().viewport = viewport;
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostEnvironment for MockHost {
    fn heap_memory(&self) -> Option<HeapMemory> {
        self.state.read().heap_memory
    }

    fn process_memory(&self) -> Option<ProcessMemory> {
        self.state.read().process_memory
    }

    fn device_memory_gb(&self) -> Option<f64> {
        self.state.read().device_memory_gb
    }

    fn logical_cores(&self) -> Option<usize> {
        self.state.read().logical_cores
    }

    fn user_agent(&self) -> Option<String> {
        self.state.read().user_agent.clone()
    }

    fn platform(&self) -> Option<String> {
        self.state.read().platform.clone()
    }

    fn navigation_timing(&self) -> Option<NavigationTiming> {
        self.state.read().navigation_timing
    }

    fn display_info(&self) -> Option<DisplayInfo> {
        self.state.read().display_info
    }

    fn viewport(&self) -> Option<ViewportInfo> {
        self.state.read().viewport
    }
}
