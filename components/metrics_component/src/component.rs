//! Main metrics component implementation

use crate::{MetricsError, Result, SamplerConfig};
use host_probes::{HostEnvironment, SystemHost};
use metrics_types::{
    CpuInfo, CpuLoadSample, EnvironmentMetrics, MemoryInfo, MetricsSnapshot,
    PANE_READY_CHECKPOINT,
};
use sampler_engine::{Sampler, SamplerOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

/// Main metrics component that owns the sampling loops and the snapshot
///
/// This component is responsible for:
/// - Driving the frame tick and fixed-interval sampling loops
/// - Auto-finishing the startup phase after a short grace delay
/// - Publishing every committed snapshot to watch subscribers
/// - Providing the public API for on-demand measurements
///
/// # Example
///
/// ```no_run
/// use metrics_component::{MetricsComponent, SamplerConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = SamplerConfig::builder()
///         .sample_interval_ms(1000)
///         .build();
///
///     let metrics = MetricsComponent::new(config)?;
///     metrics.start().await?;
///
///     // Sampling loops are now running in the background
///     println!("Memory: {}", metrics.memory_usage_summary());
///
///     metrics.stop().await?;
///     Ok(())
/// }
/// ```
pub struct MetricsComponent {
    /// Configuration for this component
    config: SamplerConfig,

    /// Single writer of the metrics snapshot
    sampler: Arc<Sampler>,

    /// Creation instant; every timestamp is milliseconds since this epoch
    epoch: Instant,

    /// Publishes each committed snapshot to subscribers
    updates: watch::Sender<MetricsSnapshot>,

    /// Whether the sampling loops are currently running
    running: Arc<AtomicBool>,

    /// Frame tick loop handle (when running)
    frame_handle: Arc<RwLock<Option<JoinHandle<()>>>>,

    /// Fixed-interval loop handle (when running)
    interval_handle: Arc<RwLock<Option<JoinHandle<()>>>>,

    /// Startup grace one-shot handle (when running)
    grace_handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl MetricsComponent {
    /// Create a new MetricsComponent probing the local system
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the metrics component
    ///
    /// # Returns
    ///
    /// A Result containing the MetricsComponent or a configuration error
    ///
    /// # Example
    ///
    /// ```
    /// use metrics_component::{MetricsComponent, SamplerConfig};
    ///
    /// let metrics = MetricsComponent::new(SamplerConfig::default()).unwrap();
    /// ```
    pub fn new(config: SamplerConfig) -> Result<Self> {
        Self::with_host(config, Arc::new(SystemHost::new()))
    }

    /// Create a new MetricsComponent against an arbitrary host environment
    ///
    /// Shells embedding the sampler pass their own environment here; tests
    /// pass a scripted mock.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the metrics component
    /// * `host` - Environment the probes will query
    pub fn with_host(config: SamplerConfig, host: Arc<dyn HostEnvironment>) -> Result<Self> {
        Self::validate_config(&config)?;

        debug!("Creating MetricsComponent with config: {:?}", config);

        let options = SamplerOptions {
            sample_interval_ms: config.sample_interval_ms() as f64,
            full_refresh_period_ms: config.full_refresh_period_ms() as f64,
            fps_window_ms: config.fps_window_ms() as f64,
            cpu_workload_iterations: config.cpu_workload_iterations(),
            cpu_full_load_millis: config.cpu_full_load_millis(),
        };
        let sampler = Arc::new(Sampler::new(host, options));
        let (updates, _) = watch::channel(sampler.snapshot());

        Ok(Self {
            config,
            sampler,
            epoch: Instant::now(),
            updates,
            running: Arc::new(AtomicBool::new(false)),
            frame_handle: Arc::new(RwLock::new(None)),
            interval_handle: Arc::new(RwLock::new(None)),
            grace_handle: Arc::new(RwLock::new(None)),
        })
    }

    fn validate_config(config: &SamplerConfig) -> Result<()> {
        if config.sample_interval_ms() == 0 {
            return Err(MetricsError::InvalidConfiguration(
                "sample_interval_ms must be nonzero".to_string(),
            ));
        }
        if config.frame_interval_ms() == 0 {
            return Err(MetricsError::InvalidConfiguration(
                "frame_interval_ms must be nonzero".to_string(),
            ));
        }
        if config.fps_window_ms() == 0 {
            return Err(MetricsError::InvalidConfiguration(
                "fps_window_ms must be nonzero".to_string(),
            ));
        }
        if config.full_refresh_period_ms() < config.sample_interval_ms() {
            return Err(MetricsError::InvalidConfiguration(
                "full_refresh_period_ms must be at least sample_interval_ms".to_string(),
            ));
        }
        if config.cpu_workload_iterations() == 0 {
            return Err(MetricsError::InvalidConfiguration(
                "cpu_workload_iterations must be nonzero".to_string(),
            ));
        }
        if !(config.cpu_full_load_millis() > 0.0) {
            return Err(MetricsError::InvalidConfiguration(
                "cpu_full_load_millis must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Start the sampling loops
    ///
    /// Begins the measurement epoch, takes an immediate first reading of
    /// every metric, then spawns the frame tick loop, the fixed-interval
    /// loop, and the startup grace one-shot.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling is already running
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use metrics_component::{MetricsComponent, SamplerConfig};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let metrics = MetricsComponent::new(SamplerConfig::default())?;
    /// metrics.start().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn start(&self) -> Result<()> {
        // Check if already running
        if self.running.load(Ordering::SeqCst) {
            return Err(MetricsError::SamplerAlreadyRunning);
        }

        info!("Starting performance sampling");

        let now = self.now_ms();
        self.sampler.begin(now);
        // Arm the frame window; the first spaced tick measures against this.
        self.sampler.frame_tick(now);
        let snapshot = self.sampler.refresh_all();
        self.updates.send_replace(snapshot);

        // Mark as running before spawning tasks
        self.running.store(true, Ordering::SeqCst);

        let frame_period = Duration::from_millis(self.config.frame_interval_ms());
        let sample_period = Duration::from_millis(self.config.sample_interval_ms());
        let grace_delay = Duration::from_millis(self.config.ready_grace_delay_ms());

        // Frame tick loop
        {
            let sampler = Arc::clone(&self.sampler);
            let updates = self.updates.clone();
            let epoch = self.epoch;
            let handle = tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + frame_period, frame_period);
                loop {
                    ticker.tick().await;
                    updates.send_replace(sampler.frame_tick(millis_since(epoch)));
                }
            });
            *self.frame_handle.write().await = Some(handle);
        }

        // Fixed-interval sampling loop
        {
            let sampler = Arc::clone(&self.sampler);
            let updates = self.updates.clone();
            let epoch = self.epoch;
            let handle = tokio::spawn(async move {
                let mut ticker = interval_at(Instant::now() + sample_period, sample_period);
                loop {
                    ticker.tick().await;
                    updates.send_replace(sampler.interval_tick(millis_since(epoch)));
                }
            });
            *self.interval_handle.write().await = Some(handle);
        }

        // Startup grace one-shot: auto-finish unless something did it first
        {
            let sampler = Arc::clone(&self.sampler);
            let updates = self.updates.clone();
            let epoch = self.epoch;
            let handle = tokio::spawn(async move {
                tokio::time::sleep(grace_delay).await;
                if !sampler.is_loading() {
                    debug!("Startup already finished before the grace delay elapsed");
                    return;
                }
                updates.send_replace(sampler.finish(millis_since(epoch)));
            });
            *self.grace_handle.write().await = Some(handle);
        }

        info!(
            "Performance sampling started ({} ms interval, {} ms frame ticks)",
            self.config.sample_interval_ms(),
            self.config.frame_interval_ms()
        );

        Ok(())
    }

    /// Stop the sampling loops
    ///
    /// Cancels the frame loop, the interval loop, and the grace one-shot.
    /// The snapshot keeps its last committed state and stops changing.
    ///
    /// # Errors
    ///
    /// Returns an error if sampling is not running
    pub async fn stop(&self) -> Result<()> {
        // Check if running
        if !self.running.load(Ordering::SeqCst) {
            return Err(MetricsError::SamplerNotRunning);
        }

        info!("Stopping performance sampling");

        halt(&self.frame_handle).await;
        halt(&self.interval_handle).await;
        halt(&self.grace_handle).await;

        // Mark as not running
        self.running.store(false, Ordering::SeqCst);

        info!("Performance sampling stopped");

        Ok(())
    }

    /// Check if the sampling loops are currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the configuration used by this component
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Subscribe to snapshot updates
    ///
    /// The receiver yields every snapshot committed by the loops or by the
    /// milestone methods. Receivers outlive start/stop cycles.
    pub fn subscribe(&self) -> watch::Receiver<MetricsSnapshot> {
        self.updates.subscribe()
    }

    /// Clone of the current snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.sampler.snapshot()
    }

    /// Whether the startup phase is still in progress
    pub fn is_loading(&self) -> bool {
        self.sampler.is_loading()
    }

    /// Record a named startup checkpoint, measured from the sampling baseline
    pub fn mark_ready(&self, label: &str) -> MetricsSnapshot {
        let snapshot = self.sampler.mark_ready(label, self.now_ms());
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Record the canonical pane-ready checkpoint
    pub fn mark_pane_ready(&self) -> MetricsSnapshot {
        self.mark_ready(PANE_READY_CHECKPOINT)
    }

    /// Record the end of the startup phase
    ///
    /// Flips the loading flag, fixes the init and total times, and takes an
    /// immediate reading so the snapshot is current when loading ends. The
    /// grace one-shot becomes a no-op after this.
    pub fn finish_loading(&self) -> MetricsSnapshot {
        let snapshot = self.sampler.finish(self.now_ms());
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Run the synthetic CPU workload once and return the load sample
    pub fn measure_cpu_usage(&self) -> CpuLoadSample {
        self.sampler.measure_cpu_usage()
    }

    /// First available memory reading in probe priority order
    pub fn memory_info(&self) -> MemoryInfo {
        self.sampler.memory_info()
    }

    /// Human-scale memory summary ("512 MB", "8 GB (estimated)", or "N/A")
    pub fn memory_usage_summary(&self) -> String {
        self.sampler.memory_usage_summary()
    }

    /// Static CPU facts plus a fresh load sample
    pub fn cpu_info(&self) -> CpuInfo {
        self.sampler.cpu_info()
    }

    /// Display, viewport, and startup timing facts
    pub fn environment_metrics(&self) -> EnvironmentMetrics {
        self.sampler.environment_metrics()
    }

    fn now_ms(&self) -> f64 {
        millis_since(self.epoch)
    }
}

impl Drop for MetricsComponent {
    fn drop(&mut self) {
        // Cancel the loops even when stop() was never called.
        for slot in [&self.frame_handle, &self.interval_handle, &self.grace_handle] {
            if let Ok(mut guard) = slot.try_write() {
                if let Some(handle) = guard.take() {
                    handle.abort();
                }
            }
        }
    }
}

fn millis_since(epoch: Instant) -> f64 {
    epoch.elapsed().as_secs_f64() * 1000.0
}

async fn halt(slot: &RwLock<Option<JoinHandle<()>>>) {
    if let Some(handle) = slot.write().await.take() {
        handle.abort();
        // Wait for the task to finish (it should abort quickly)
        let _ = handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use host_probes::MockHost;

    fn quick_config() -> SamplerConfig {
        // Small workload keeps the synthetic CPU probe cheap in tests.
        SamplerConfig::builder().cpu_workload_iterations(10_000).build()
    }

    fn mock_component() -> MetricsComponent {
        MetricsComponent::with_host(quick_config(), Arc::new(MockHost::new())).unwrap()
    }

    #[test]
    fn test_new_component() {
        let result = MetricsComponent::new(SamplerConfig::default());

        assert!(result.is_ok());
    }

    #[test]
    fn test_component_stores_config() {
        let config = SamplerConfig::builder().frame_interval_ms(8).build();
        let component = MetricsComponent::with_host(config, Arc::new(MockHost::new())).unwrap();

        assert_eq!(component.config().frame_interval_ms(), 8);
    }

    #[test]
    fn test_rejects_zero_sample_interval() {
        let config = SamplerConfig::builder().sample_interval_ms(0).build();
        let result = MetricsComponent::with_host(config, Arc::new(MockHost::new()));

        match result {
            Err(MetricsError::InvalidConfiguration(_)) => {}
            _ => panic!("Expected InvalidConfiguration error"),
        }
    }

    #[test]
    fn test_rejects_refresh_period_below_interval() {
        let config = SamplerConfig::builder().full_refresh_period_ms(500).build();
        let result = MetricsComponent::with_host(config, Arc::new(MockHost::new()));

        assert!(result.is_err());
    }

    #[test]
    fn test_initially_not_running() {
        let component = mock_component();

        assert!(!component.is_running());
        assert!(component.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_stop_lifecycle() {
        let component = mock_component();

        // Initially not running
        assert!(!component.is_running());

        // Start
        let start_result = component.start().await;
        assert!(start_result.is_ok(), "Start failed: {:?}", start_result);
        assert!(component.is_running());

        // Stop
        let stop_result = component.stop().await;
        assert!(stop_result.is_ok(), "Stop failed: {:?}", stop_result);
        assert!(!component.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cannot_start_twice() {
        let component = mock_component();

        component.start().await.unwrap();

        let result = component.start().await;
        assert!(result.is_err());

        match result {
            Err(MetricsError::SamplerAlreadyRunning) => {}
            _ => panic!("Expected SamplerAlreadyRunning error"),
        }

        // Cleanup
        component.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_cannot_stop_when_not_running() {
        let component = mock_component();

        let result = component.stop().await;
        assert!(result.is_err());

        match result {
            Err(MetricsError::SamplerNotRunning) => {}
            _ => panic!("Expected SamplerNotRunning error"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_can_restart() {
        let component = mock_component();

        // First run
        component.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;
        component.stop().await.unwrap();

        // Second run
        component.start().await.unwrap();
        assert!(component.is_running());
        assert!(
            component.is_loading(),
            "a restart must reopen the startup phase"
        );
        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_populates_snapshot_immediately() {
        let component = mock_component();
        component.start().await.unwrap();

        let snapshot = component.snapshot();
        assert_eq!(snapshot.memory_summary, "120 MB");
        assert_eq!(snapshot.cpu.cores, Some(8));
        assert_eq!(snapshot.environment.screen_width, Some(1920));
        assert!(snapshot.start_time_ms.is_some());

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_auto_finishes_startup() {
        let component = mock_component();
        component.start().await.unwrap();
        assert!(component.is_loading());

        tokio::time::sleep(Duration::from_millis(150)).await;

        let snapshot = component.snapshot();
        assert!(!snapshot.loading, "grace delay must end the startup phase");
        assert!(snapshot.total_app_time_ms.is_some());
        assert!(
            snapshot.pane_ready_ms().is_none(),
            "the grace finish records no checkpoint of its own"
        );

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_grace_keeps_earlier_pane_ready() {
        let component = mock_component();
        component.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        component.mark_pane_ready();

        // Let the grace delay end loading on its own.
        tokio::time::sleep(Duration::from_millis(200)).await;

        let snapshot = component.snapshot();
        assert!(!snapshot.loading, "grace delay must end the startup phase");
        let pane_ready = snapshot.pane_ready_ms().expect("checkpoint recorded");
        assert!(
            (pane_ready - 40.0).abs() < 1.0,
            "the shell's checkpoint must survive the auto-finish, got {:.2} ms",
            pane_ready
        );
        let total = snapshot.total_app_time_ms.expect("total time recorded");
        assert!(total >= pane_ready);

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_finish_preempts_grace() {
        let component = mock_component();
        component.start().await.unwrap();

        let finished = component.finish_loading();
        assert!(!finished.loading);
        let manual_total = finished.total_app_time_ms;

        tokio::time::sleep(Duration::from_millis(300)).await;

        let snapshot = component.snapshot();
        assert_eq!(snapshot.total_app_time_ms, manual_total);
        assert!(
            snapshot.pane_ready_ms().is_none(),
            "grace must not add a checkpoint after an explicit finish"
        );

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_loop_samples_periodically() {
        let component = mock_component();
        component.start().await.unwrap();
        let initial = component.snapshot().revision;

        tokio::time::sleep(Duration::from_millis(2100)).await;

        let snapshot = component.snapshot();
        assert!(snapshot.revision > initial);
        assert_eq!(snapshot.memory_summary, "120 MB");
        assert!(snapshot.cpu.usage_percent.is_some());

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_loop_derives_fps() {
        let component = mock_component();
        component.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(1200)).await;

        let frame = component.snapshot().frame;
        assert!(frame.frame_time_ms.is_some());
        let fps = frame.fps.expect("a full window elapsed");
        assert!(
            (55..=65).contains(&fps),
            "16 ms ticks should read near 60 FPS, got {}",
            fps
        );

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_mark_ready_measures_from_baseline() {
        let component = mock_component();
        component.start().await.unwrap();

        tokio::time::sleep(Duration::from_millis(42)).await;
        let snapshot = component.mark_pane_ready();

        let pane_ready = snapshot.pane_ready_ms().expect("checkpoint recorded");
        assert!((pane_ready - 42.0).abs() < 1.0);

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_the_snapshot() {
        let component = mock_component();
        component.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        component.stop().await.unwrap();

        let frozen = component.snapshot().revision;
        tokio::time::sleep(Duration::from_millis(3000)).await;

        assert_eq!(
            component.snapshot().revision,
            frozen,
            "no loop may mutate the snapshot after stop"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribe_receives_updates() {
        let component = mock_component();
        let mut updates = component.subscribe();

        component.start().await.unwrap();
        updates.changed().await.unwrap();

        assert!(updates.borrow().start_time_ms.is_some());

        component.stop().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_measure_cpu_usage_is_bounded() {
        let component = mock_component();

        let sample = component.measure_cpu_usage();

        assert!(sample.usage_percent >= 0.0);
        assert!(sample.usage_percent <= 100.0);
        assert!(sample.processing_time_ms >= 0.0);
    }
}
