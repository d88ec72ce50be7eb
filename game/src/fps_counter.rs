use std::{collections::VecDeque, time::Duration};

const MEASUREMENTS: usize = 120;

/// Rolling average of recent frame times.
pub struct FpsCounter {
    frame_durations: VecDeque<Duration>,
    slowest_frame: Duration,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            frame_durations: VecDeque::with_capacity(MEASUREMENTS),
            slowest_frame: Duration::ZERO,
        }
    }

    pub fn record(&mut self, duration: Duration) {
        if self.frame_durations.len() == MEASUREMENTS {
            self.frame_durations.pop_front();
        }
        self.frame_durations.push_back(duration);
        self.slowest_frame = self.slowest_frame.max(duration);
    }

    pub fn average_frame_time(&self) -> Duration {
        if self.frame_durations.is_empty() {
            return Duration::ZERO;
        }

        let sum: Duration = self.frame_durations.iter().sum();
        sum / (self.frame_durations.len() as u32)
    }

    /// Slowest frame since the counter was created. Cache misses show up here.
    pub fn slowest_frame_time(&self) -> Duration {
        self.slowest_frame
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
