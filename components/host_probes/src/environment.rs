//! Host environment capability surface

use metrics_types::{DisplayInfo, HeapMemory, NavigationTiming, ProcessMemory, ViewportInfo};

/// Optional measurement sources exposed by the host environment.
///
/// Every query is synchronous, bounded, and independent: an absent capability
/// returns `None` and must not affect any other query. Implementations are
/// shared across sampling tasks, so interior mutability is required where a
/// query keeps scratch state.
pub trait HostEnvironment: Send + Sync {
    /// Allocation-accounting reading (used/total/limit), if the host tracks one.
    fn heap_memory(&self) -> Option<HeapMemory>;

    /// Resident-set reading for the current process plus total system memory.
    fn process_memory(&self) -> Option<ProcessMemory>;

    /// Coarse installed-memory hint in gigabytes, quantized by the host.
    fn device_memory_gb(&self) -> Option<f64>;

    /// Number of logical cores available to the process.
    fn logical_cores(&self) -> Option<usize>;

    /// Host identification string.
    fn user_agent(&self) -> Option<String>;

    /// Platform identifier, conventionally `os-arch`.
    fn platform(&self) -> Option<String>;

    /// Startup timing deltas, if the host recorded them.
    fn navigation_timing(&self) -> Option<NavigationTiming>;

    /// Physical display facts, if a display is attached.
    fn display_info(&self) -> Option<DisplayInfo>;

    /// Current viewport dimensions, if a viewport exists.
    fn viewport(&self) -> Option<ViewportInfo>;
}
