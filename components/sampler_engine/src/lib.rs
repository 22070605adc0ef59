//! Sampler Engine
//!
//! Pure measurement core of the FlowCanvas performance sampler. Every
//! routine here is timestamp-parameterized: the engine never reads a clock
//! for bookkeeping, so the owning service chooses the time source and tests
//! replay tick sequences deterministically.
//!
//! Features:
//! - Synthetic-workload CPU estimation with a configurable calibration
//! - Windowed FPS aggregation from raw frame ticks
//! - Single-writer snapshot state machine with lifecycle milestones
//! - Interval tick that merges readings without flapping to "unavailable"

pub mod cpu_sampler;
pub mod frame_sampler;
pub mod sampler;

pub use cpu_sampler::{CpuSampler, DEFAULT_FULL_LOAD_MILLIS, DEFAULT_WORKLOAD_ITERATIONS};
pub use frame_sampler::{FpsWindow, FrameSampler, FrameUpdate, DEFAULT_FPS_WINDOW_MILLIS};
pub use sampler::{Sampler, SamplerOptions};

#[cfg(test)]
mod tests {
    use super::*;
    use host_probes::MockHost;
    use std::sync::Arc;

    #[test]
    fn test_default_options_match_documented_cadence() {
        let options = SamplerOptions::default();
        assert_eq!(options.sample_interval_ms, 1000.0);
        assert_eq!(options.full_refresh_period_ms, 5000.0);
        assert_eq!(options.fps_window_ms, 1000.0);
        assert_eq!(options.cpu_workload_iterations, 1_000_000);
        assert_eq!(options.cpu_full_load_millis, 50.0);
    }

    #[test]
    fn test_engine_composes_end_to_end() {
        let options = SamplerOptions {
            cpu_workload_iterations: 10_000,
            ..SamplerOptions::default()
        };
        let sampler = Sampler::new(Arc::new(MockHost::new()), options);

        sampler.begin(0.0);
        sampler.refresh_all();
        for i in 0..=60u32 {
            sampler.frame_tick(f64::from(i) * 16.67);
        }
        sampler.mark_ready(metrics_types::PANE_READY_CHECKPOINT, 84.5);
        let snapshot = sampler.finish(100.0);

        assert!(!snapshot.loading);
        assert_eq!(snapshot.memory_summary, "120 MB");
        assert!(snapshot.cpu.usage_percent.is_some());
        assert_eq!(sampler.snapshot().frame.fps, Some(60));
    }
}
