//! Frame pacing and frame-time statistics.

use std::time::Duration;

use circular_buffer::CircularBuffer;
use tracing::{info, warn};

use crate::constants::loop_time;

/// The number of frame durations kept for statistics.
const TIMING_WINDOW_SIZE: usize = 120;

/// Mean and standard deviation of recent frame times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub mean: Duration,
    pub std_dev: Duration,
}

/// A rolling window of frame durations.
#[derive(Debug, Default)]
pub struct FrameTimings {
    buffer: CircularBuffer<TIMING_WINDOW_SIZE, Duration>,
}

impl FrameTimings {
    pub fn push(&mut self, duration: Duration) {
        self.buffer.push_back(duration);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Statistics over the window, using Welford's algorithm. `None` while empty.
    pub fn stats(&self) -> Option<FrameStats> {
        let mut count = 0u32;
        let mut mean = 0.0;
        let mut sum_squared_diff = 0.0;

        for duration in self.buffer.iter() {
            let value = duration.as_secs_f64();
            count += 1;
            let delta = value - mean;
            mean += delta / count as f64;
            sum_squared_diff += delta * (value - mean);
        }

        (count > 0).then(|| FrameStats {
            mean: Duration::from_secs_f64(mean),
            std_dev: Duration::from_secs_f64((sum_squared_diff / count as f64).sqrt()),
        })
    }
}

/// Keeps the loop at a fixed tick rate.
#[derive(Debug)]
pub struct FrameGovernor {
    budget: Duration,
    timings: FrameTimings,
    frames: u64,
    report_every: u64,
}

impl FrameGovernor {
    /// A governor ticking `fps` times per second, reporting averages once a minute.
    pub fn new(fps: u32) -> Self {
        Self {
            budget: loop_time(fps),
            timings: FrameTimings::default(),
            frames: 0,
            report_every: u64::from(fps.max(1)) * 60,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn timings(&self) -> &FrameTimings {
        &self.timings
    }

    /// Records a frame that took `elapsed` and returns how long to sleep before the next one.
    pub fn finish_frame(&mut self, elapsed: Duration) -> Option<Duration> {
        self.timings.push(elapsed);
        self.frames += 1;

        if self.frames % self.report_every == 0 {
            if let Some(stats) = self.timings.stats() {
                info!(mean = ?stats.mean, std_dev = ?stats.std_dev, frames = self.frames, "Frame time");
            }
        }

        if elapsed < self.budget {
            Some(self.budget - elapsed)
        } else {
            if elapsed > self.budget {
                warn!("Game loop behind schedule by: {:?}", elapsed - self.budget);
            }
            None
        }
    }
}
