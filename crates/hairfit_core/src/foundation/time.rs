//! Frame timing utilities

use std::time::{Duration, Instant};

/// Frame clock for the interactive loop
///
/// Tracks wall-clock delta between frames. Scripted or headless drivers can
/// feed a fixed step through [`Timer::advance`] instead of sampling the clock.
#[derive(Debug, Clone)]
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Sample the clock (call once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed);
    }

    /// Step the timer by an explicit delta in seconds
    pub fn advance(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }

    /// Time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Number of frames stepped so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Simple stopwatch for measuring how long an import or export takes
pub struct Stopwatch {
    start_time: Instant,
}

impl Stopwatch {
    /// Create a stopwatch that is already running
    pub fn start_new() -> Self {
        Self { start_time: Instant::now() }
    }

    /// Elapsed time since start
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f32 {
        self.elapsed().as_secs_f32() * 1000.0
    }
}
