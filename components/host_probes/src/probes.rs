//! Ordered capability probing
//!
//! Memory is probed through a fixed priority list; the aggregator takes the
//! first probe that yields a reading. Probe order is a policy, not an
//! implementation detail: tests pin it.

use tracing::debug;

use metrics_types::{CpuInfo, EnvironmentMetrics, MemoryInfo, MemorySource};

use crate::environment::HostEnvironment;

/// Memory probe priority: heap accounting first, then the process
/// resident-set, then the coarse device hint.
pub const MEMORY_PROBE_ORDER: [MemorySource; 3] = [
    MemorySource::Heap,
    MemorySource::ProcessRss,
    MemorySource::DeviceHint,
];

/// Run a single named memory probe against the host.
pub fn run_memory_probe(host: &dyn HostEnvironment, source: MemorySource) -> Option<MemoryInfo> {
    match source {
        MemorySource::Heap => host.heap_memory().map(MemoryInfo::from),
        MemorySource::ProcessRss => host.process_memory().map(MemoryInfo::from),
        MemorySource::DeviceHint => host.device_memory_gb().map(MemoryInfo::from_device_hint),
    }
}

/// Probe memory capabilities in priority order and return the first reading.
///
/// Returns an empty reading when every probe comes back absent; callers treat
/// that as "unavailable", never as an error.
pub fn probe_memory(host: &dyn HostEnvironment) -> MemoryInfo {
    for source in MEMORY_PROBE_ORDER {
        if let Some(info) = run_memory_probe(host, source) {
            debug!("Memory probe {} produced a reading", source);
            return info;
        }
    }
    debug!("No memory probe produced a reading");
    MemoryInfo::empty()
}

/// Gather the static CPU capability facts (no load sample).
pub fn probe_cpu_facts(host: &dyn HostEnvironment) -> CpuInfo {
    CpuInfo {
        cores: host.logical_cores(),
        user_agent: host.user_agent(),
        platform: host.platform(),
        usage_percent: None,
        processing_time_ms: None,
    }
}

/// Gather static display/viewport facts and startup timing deltas.
pub fn probe_environment(host: &dyn HostEnvironment) -> EnvironmentMetrics {
    EnvironmentMetrics::from_parts(
        host.display_info(),
        host.viewport(),
        host.navigation_timing(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_host::MockHost;

    #[test]
    fn test_probe_order_prefers_heap_over_hint() {
        let host = MockHost::new();
        // Both heap and device hint are present on the default mock.
        let info = probe_memory(&host);
        assert_eq!(
            info.source,
            Some(MemorySource::Heap),
            "heap reading must win over the device hint"
        );
    }

    #[test]
    fn test_probe_falls_back_in_order() {
        let host = MockHost::new();
        host.set_heap_memory(None);
        let info = probe_memory(&host);
        assert_eq!(info.source, Some(MemorySource::ProcessRss));

        host.set_process_memory(None);
        let info = probe_memory(&host);
        assert_eq!(info.source, Some(MemorySource::DeviceHint));
        assert!(info.used_mb.is_none());
        assert!(info.available_gb.is_some());
    }

    #[test]
    fn test_probe_empty_when_all_absent() {
        let host = MockHost::unavailable();
        let info = probe_memory(&host);
        assert!(info.is_empty());
        assert_eq!(info.usage_summary(), "N/A");
    }

    #[test]
    fn test_cpu_facts_partial_host() {
        let host = MockHost::unavailable();
        host.set_logical_cores(Some(4));

        let facts = probe_cpu_facts(&host);
        assert_eq!(facts.cores, Some(4));
        assert!(facts.user_agent.is_none(), "absent capabilities stay None");
        assert!(facts.usage_percent.is_none(), "facts carry no load sample");
    }

    #[test]
    fn test_environment_probe_independent_capabilities() {
        let host = MockHost::unavailable();
        host.set_viewport(Some(metrics_types::ViewportInfo {
            width: 800,
            height: 600,
        }));

        let metrics = probe_environment(&host);
        assert_eq!(metrics.viewport_width, Some(800));
        assert!(
            metrics.screen_width.is_none(),
            "missing display must not block the viewport reading"
        );
    }
}
