//! Frame pacing and smoothed FPS measurement.

use web_time::{Duration, Instant};

/// How often the smoothed frame rate is written to the log.
const FPS_LOG_INTERVAL: Duration = Duration::from_secs(10);

/// Frame timing with FPS calculation and optional frame limiting
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the frame rate was logged
    last_log: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames completed since start
    frames: u64,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        let now = Instant::now();
        Self {
            target_fps,
            min_frame_duration,
            last_frame: now,
            last_log: now,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Call at the start of each frame. Returns true if enough time has passed
    /// to render.
    #[must_use]
    pub fn should_render(&self) -> bool {
        if self.target_fps == 0 {
            return true;
        }
        self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }

        if now.duration_since(self.last_log) >= FPS_LOG_INTERVAL {
            self.last_log = now;
            log::debug!(
                "{:.1} fps ({} frames)",
                self.smoothed_fps,
                self.frames
            );
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames completed so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlimited_always_renders() {
        let timing = FrameTiming::new(0);
        assert!(timing.should_render());
    }

    #[test]
    fn counts_frames() {
        let mut timing = FrameTiming::new(0);
        timing.end_frame();
        timing.end_frame();
        assert_eq!(timing.frame_count(), 2);
        assert!(timing.fps() > 0.0);
    }

    #[test]
    fn capped_timer_waits() {
        let timing = FrameTiming::new(1);
        assert!(!timing.should_render());
    }

    #[test]
    fn capped_timer_opens_after_interval_and_closes_on_end_frame() {
        let mut timing = FrameTiming::new(20);
        std::thread::sleep(Duration::from_millis(60));
        assert!(timing.should_render());
        // Asking again without drawing leaves the gate open.
        assert!(timing.should_render());
        timing.end_frame();
        assert!(!timing.should_render());
    }
}
