//! Frame timing and windowed FPS derivation
//!
//! A pure state machine fed with millisecond timestamps: no clock access, so
//! tests drive it with synthetic tick sequences. The first tick establishes
//! the baseline; each later tick yields the instantaneous frame time, and
//! once the aggregation window has elapsed the accumulated count becomes an
//! FPS figure plus a derived average frame time.

/// Default FPS aggregation window, milliseconds.
pub const DEFAULT_FPS_WINDOW_MILLIS: f64 = 1000.0;

/// Statistics for one completed aggregation window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FpsWindow {
    /// Frames per second, rounded to a whole number
    pub fps: u32,
    /// Average frame time derived as 1000/fps, two-decimal precision
    pub avg_frame_time_ms: Option<f64>,
    /// Frames counted inside the window
    pub frames: u32,
}

/// Result of one frame tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameUpdate {
    /// Delta to the previous tick; `None` on the baseline tick
    pub frame_time_ms: Option<f64>,
    /// Present when this tick closed an aggregation window
    pub completed_window: Option<FpsWindow>,
}

/// Windowed frame sampler.
#[derive(Debug, Clone)]
pub struct FrameSampler {
    window_millis: f64,
    last_frame_ms: Option<f64>,
    window_start_ms: Option<f64>,
    frames_in_window: u32,
}

impl FrameSampler {
    /// Create a sampler with the given aggregation window.
    pub fn new(window_millis: f64) -> Self {
        Self {
            window_millis,
            last_frame_ms: None,
            window_start_ms: None,
            frames_in_window: 0,
        }
    }

    /// Aggregation window length in milliseconds.
    pub fn window_millis(&self) -> f64 {
        self.window_millis
    }

    /// Forget all tick history; the next tick becomes a new baseline.
    pub fn reset(&mut self) {
        self.last_frame_ms = None;
        self.window_start_ms = None;
        self.frames_in_window = 0;
    }

    /// Record one frame tick at `now_ms`.
    pub fn on_frame(&mut self, now_ms: f64) -> FrameUpdate {
        let Some(last) = self.last_frame_ms else {
            // Baseline tick: arms the window without counting a frame, so a
            // window spanning N deltas reports N frames.
            self.last_frame_ms = Some(now_ms);
            self.window_start_ms = Some(now_ms);
            return FrameUpdate::default();
        };

        let frame_time_ms = now_ms - last;
        self.last_frame_ms = Some(now_ms);
        self.frames_in_window += 1;

        let window_start = self.window_start_ms.unwrap_or(now_ms);
        let window_span = now_ms - window_start;
        let completed_window = if window_span >= self.window_millis {
            let stats = close_window(self.frames_in_window, window_span);
            self.frames_in_window = 0;
            self.window_start_ms = Some(now_ms);
            Some(stats)
        } else {
            None
        };

        FrameUpdate {
            frame_time_ms: Some(frame_time_ms),
            completed_window,
        }
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new(DEFAULT_FPS_WINDOW_MILLIS)
    }
}

fn close_window(frames: u32, window_span_ms: f64) -> FpsWindow {
    let fps = ((f64::from(frames) * 1000.0) / window_span_ms).round() as u32;
    // A window long enough to round the rate down to zero has no meaningful
    // average frame time.
    let avg_frame_time_ms = (fps > 0).then(|| metrics_types::round2(1000.0 / f64::from(fps)));
    FpsWindow {
        fps,
        avg_frame_time_ms,
        frames,
    }
}
