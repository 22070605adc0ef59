//! Environment capability probes for the FlowCanvas performance sampler
//!
//! The sampler never talks to the operating system directly; it queries a
//! [`HostEnvironment`], a set of optionally-present measurement sources.
//! Every capability is probed independently and an absent capability is a
//! `None`, never an error.
//!
//! ## Features
//!
//! - **Host trait**: synchronous, bounded capability queries for memory,
//!   core count, identity strings, startup timing, and display facts
//! - **Ordered memory probing**: heap accounting, then process resident-set,
//!   then the coarse device hint; the first reading wins
//! - **Linux host**: cgroup v2 and /proc backed implementation
//! - **Mock host**: scriptable per-capability toggles for tests
//!
//! ## Usage
//!
//! ```rust
//! use host_probes::{probe_memory, MockHost};
//!
//! let host = MockHost::new();
//! let reading = probe_memory(&host);
//! assert_eq!(reading.used_mb, Some(120.0));
//! assert_eq!(reading.usage_summary(), "120 MB");
//! ```
//!
//! For testing purposes, a `MockHost` simulates a fully-capable machine. In
//! production the sampler runs against `SystemHost` or an environment the
//! embedding shell provides.

mod environment;
mod mock_host;
mod probes;
mod system_host;

pub use environment::HostEnvironment;
pub use mock_host::MockHost;
pub use probes::{
    probe_cpu_facts, probe_environment, probe_memory, run_memory_probe, MEMORY_PROBE_ORDER,
};
pub use system_host::SystemHost;

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_types::MemorySource;
    use std::sync::Arc;

    #[test]
    fn test_probe_order_constant_is_stable() {
        assert_eq!(
            MEMORY_PROBE_ORDER,
            [
                MemorySource::Heap,
                MemorySource::ProcessRss,
                MemorySource::DeviceHint
            ]
        );
    }

    #[test]
    fn test_hosts_are_object_safe_and_shareable() {
        let mock: Arc<dyn HostEnvironment> = Arc::new(MockHost::new());
        let system: Arc<dyn HostEnvironment> = Arc::new(SystemHost::new());

        assert!(mock.heap_memory().is_some());
        // System capabilities vary by machine; the call just must not panic.
        let _ = system.heap_memory();
    }

    #[test]
    fn test_mock_scripts_a_probe_sequence() {
        let host = MockHost::new();

        let first = probe_memory(&host);
        host.set_heap_memory(None);
        host.set_process_memory(None);
        host.set_device_memory_gb(None);
        let second = probe_memory(&host);
        host.set_heap_used_mb(130, 256);
        let third = probe_memory(&host);

        assert_eq!(first.used_mb, Some(120.0));
        assert!(second.is_empty());
        assert_eq!(third.used_mb, Some(130.0));
    }
}
