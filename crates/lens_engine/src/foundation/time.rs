//! Frame timing for the driver loop

use std::time::Instant;

/// Frame clock measuring the time between successive frames
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance to the next frame, measuring wall time
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a fixed step (headless runs and tests)
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
        delta_time
    }

    /// Time since the last frame in seconds
    pub const fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total elapsed time in seconds
    pub const fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames ticked so far
    pub const fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
