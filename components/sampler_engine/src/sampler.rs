//! The single-writer sampler
//!
//! Owns the metrics snapshot and applies every mutation to it: lifecycle
//! milestones, frame ticks, and interval ticks. All methods take the current
//! timestamp as a parameter, so the owning service decides the clock and
//! tests replay deterministic tick sequences. Readers get snapshot clones;
//! the revision counter identifies committed states.

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{debug, info, warn};

use host_probes::{probe_cpu_facts, probe_environment, probe_memory, HostEnvironment};
use metrics_types::{
    CpuInfo, CpuLoadSample, EnvironmentMetrics, MemoryInfo, MetricsSnapshot,
};

use crate::cpu_sampler::{CpuSampler, DEFAULT_FULL_LOAD_MILLIS, DEFAULT_WORKLOAD_ITERATIONS};
use crate::frame_sampler::{FrameSampler, DEFAULT_FPS_WINDOW_MILLIS};

/// Measurement policy knobs for a [`Sampler`].
#[derive(Debug, Clone)]
pub struct SamplerOptions {
    /// Fixed-interval loop cadence, milliseconds
    pub sample_interval_ms: f64,
    /// Modulo window of the fuller environment refresh, milliseconds
    pub full_refresh_period_ms: f64,
    /// FPS aggregation window, milliseconds
    pub fps_window_ms: f64,
    /// Synthetic CPU workload size
    pub cpu_workload_iterations: u64,
    /// Elapsed milliseconds that map to a 100% CPU reading
    pub cpu_full_load_millis: f64,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            sample_interval_ms: 1000.0,
            full_refresh_period_ms: 5000.0,
            fps_window_ms: DEFAULT_FPS_WINDOW_MILLIS,
            cpu_workload_iterations: DEFAULT_WORKLOAD_ITERATIONS,
            cpu_full_load_millis: DEFAULT_FULL_LOAD_MILLIS,
        }
    }
}

/// Single writer of the metrics snapshot.
pub struct Sampler {
    host: Arc<dyn HostEnvironment>,
    cpu: CpuSampler,
    frame: Mutex<FrameSampler>,
    baseline_ms: RwLock<Option<f64>>,
    snapshot: RwLock<MetricsSnapshot>,
    sample_interval_ms: f64,
    full_refresh_period_ms: f64,
}

impl Sampler {
    /// Create a sampler bound to a host environment.
    pub fn new(host: Arc<dyn HostEnvironment>, options: SamplerOptions) -> Self {
        Self {
            host,
            cpu: CpuSampler::new(
                options.cpu_workload_iterations,
                options.cpu_full_load_millis,
            ),
            frame: Mutex::new(FrameSampler::new(options.fps_window_ms)),
            baseline_ms: RwLock::new(None),
            snapshot: RwLock::new(MetricsSnapshot::default()),
            sample_interval_ms: options.sample_interval_ms,
            full_refresh_period_ms: options.full_refresh_period_ms,
        }
    }

    // ========================================================================
    // Snapshot access
    // ========================================================================

    /// Clone of the current snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.snapshot.read().clone()
    }

    /// Whether the loading flag is still set.
    pub fn is_loading(&self) -> bool {
        self.snapshot.read().loading
    }

    fn commit<F>(&self, mutate: F) -> MetricsSnapshot
    where
        F: FnOnce(&mut MetricsSnapshot),
    {
        let mut snapshot = self.snapshot.write();
        mutate(&mut snapshot);
        snapshot.revision += 1;
        snapshot.clone()
    }

    fn elapsed_since_baseline(&self, now_ms: f64) -> f64 {
        match *self.baseline_ms.read() {
            Some(baseline) => (now_ms - baseline).max(0.0),
            None => {
                warn!("Elapsed time requested before the measurement epoch began");
                now_ms.max(0.0)
            }
        }
    }

    // ========================================================================
    // Lifecycle milestones
    // ========================================================================

    /// Begin the measurement epoch at `now_ms`.
    ///
    /// Records the baseline timestamp, rearms the frame sampler, and resets
    /// the lifecycle fields of the snapshot. Environment readings survive;
    /// they are refreshed right after start anyway.
    pub fn begin(&self, now_ms: f64) -> MetricsSnapshot {
        *self.baseline_ms.write() = Some(now_ms);
        self.frame.lock().reset();
        info!("Metrics measurement started (baseline {:.2} ms)", now_ms);
        self.commit(|snapshot| {
            snapshot.start_time_ms = Some(now_ms);
            snapshot.loading = true;
            snapshot.init_time_ms = None;
            snapshot.total_app_time_ms = None;
            snapshot.checkpoints.clear();
            snapshot.frame = Default::default();
        })
    }

    /// Record a named checkpoint at `now_ms`, measured from the baseline.
    pub fn mark_ready(&self, label: &str, now_ms: f64) -> MetricsSnapshot {
        let elapsed = self.elapsed_since_baseline(now_ms);
        info!("Checkpoint {} reached after {:.2} ms", label, elapsed);
        self.commit(|snapshot| snapshot.record_checkpoint(label, elapsed))
    }

    /// Record the end of initialization and flip the loading flag.
    ///
    /// Also refreshes memory, CPU, and environment readings immediately, so a
    /// HUD shows current figures the moment loading ends.
    pub fn finish(&self, now_ms: f64) -> MetricsSnapshot {
        if !self.is_loading() {
            warn!("Startup finish recorded again; overwriting timing fields");
        }
        let elapsed = self.elapsed_since_baseline(now_ms);
        let memory = probe_memory(self.host.as_ref());
        let cpu = self.cpu.sample_cpu_info(self.host.as_ref());
        let environment = probe_environment(self.host.as_ref());
        info!("Startup finished in {:.2} ms", elapsed);
        self.commit(|snapshot| {
            snapshot.init_time_ms = Some(elapsed);
            snapshot.total_app_time_ms = Some(elapsed);
            snapshot.loading = false;
            commit_memory_if_usable(snapshot, memory);
            snapshot.cpu.merge_from(cpu);
            snapshot.environment = environment;
        })
    }

    // ========================================================================
    // Recurring ticks
    // ========================================================================

    /// Record one frame tick at `now_ms`.
    pub fn frame_tick(&self, now_ms: f64) -> MetricsSnapshot {
        let update = self.frame.lock().on_frame(now_ms);
        if update.frame_time_ms.is_none() && update.completed_window.is_none() {
            // Baseline tick; nothing to commit.
            return self.snapshot();
        }
        self.commit(|snapshot| {
            if let Some(frame_time) = update.frame_time_ms {
                snapshot.frame.frame_time_ms = Some(frame_time);
            }
            if let Some(window) = update.completed_window {
                snapshot.frame.fps = Some(window.fps);
                snapshot.frame.avg_frame_time_ms = window.avg_frame_time_ms;
            }
        })
    }

    /// Run one fixed-interval tick at `now_ms`.
    ///
    /// Memory is committed only when the probe produced a usable figure, so a
    /// transient miss never replaces a good reading with "N/A". The CPU
    /// reading always commits, merged over the previous one. Roughly once per
    /// full-refresh period, decided by a modulo check against the clock, the
    /// static environment facts are re-gathered as well.
    pub fn interval_tick(&self, now_ms: f64) -> MetricsSnapshot {
        let memory = probe_memory(self.host.as_ref());
        let cpu = self.cpu.sample_cpu_info(self.host.as_ref());
        let fuller = now_ms % self.full_refresh_period_ms < self.sample_interval_ms;
        let environment = fuller.then(|| probe_environment(self.host.as_ref()));

        debug!(
            "Interval tick at {:.2} ms (fuller refresh: {})",
            now_ms, fuller
        );
        self.commit(|snapshot| {
            commit_memory_if_usable(snapshot, memory);
            snapshot.cpu.merge_from(cpu);
            if let Some(environment) = environment {
                snapshot.environment = environment;
            }
        })
    }

    // ========================================================================
    // On-demand refresh
    // ========================================================================

    /// Probe and commit every reading at once. Used for the immediate first
    /// population when sampling starts.
    pub fn refresh_all(&self) -> MetricsSnapshot {
        let memory = probe_memory(self.host.as_ref());
        let cpu = self.cpu.sample_cpu_info(self.host.as_ref());
        let environment = probe_environment(self.host.as_ref());
        debug!("Full metrics refresh");
        self.commit(|snapshot| {
            commit_memory_if_usable(snapshot, memory);
            snapshot.cpu.merge_from(cpu);
            snapshot.environment = environment;
        })
    }

    /// Probe memory and commit the reading if it is usable.
    pub fn refresh_memory(&self) -> MetricsSnapshot {
        let memory = probe_memory(self.host.as_ref());
        self.commit(|snapshot| commit_memory_if_usable(snapshot, memory))
    }

    /// Probe display/viewport facts and startup timing, and commit them.
    pub fn refresh_environment(&self) -> MetricsSnapshot {
        let environment = probe_environment(self.host.as_ref());
        self.commit(|snapshot| snapshot.environment = environment)
    }

    // ========================================================================
    // Pure reads (no snapshot mutation)
    // ========================================================================

    /// First available memory reading in probe priority order.
    pub fn memory_info(&self) -> MemoryInfo {
        probe_memory(self.host.as_ref())
    }

    /// Human-scale memory summary derived from the current probe result.
    pub fn memory_usage_summary(&self) -> String {
        self.memory_info().usage_summary()
    }

    /// Static CPU facts plus one fresh load sample.
    pub fn cpu_info(&self) -> CpuInfo {
        self.cpu.sample_cpu_info(self.host.as_ref())
    }

    /// Static display/viewport facts and startup timing deltas.
    pub fn environment_metrics(&self) -> EnvironmentMetrics {
        probe_environment(self.host.as_ref())
    }

    /// Run the synthetic CPU workload once.
    pub fn measure_cpu_usage(&self) -> CpuLoadSample {
        self.cpu.measure()
    }

    /// Static capability facts without a load sample.
    pub fn cpu_facts(&self) -> CpuInfo {
        probe_cpu_facts(self.host.as_ref())
    }
}

// A probe miss never replaces a good reading: empty results commit only
// while the snapshot itself is still empty.
fn commit_memory_if_usable(snapshot: &mut MetricsSnapshot, memory: MemoryInfo) {
    if memory.has_reading() || snapshot.memory.is_empty() {
        snapshot.memory_summary = memory.usage_summary();
        snapshot.memory = memory;
    }
}
