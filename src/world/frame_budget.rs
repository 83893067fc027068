//! Per-frame time budget (§13): chunk-job dispatch and GPU uploads are
//! capped to a slice of the frame so a burst of newly visible chunks can't
//! stall rendering. Grounded on the same budget/throttle split as the
//! renderer's chunk-load pacing, trimmed to the counters `World::update`
//! actually needs.

use std::time::{Duration, Instant};

pub struct FrameBudget {
    frame_start: Instant,
    target_frame_time: Duration,
    max_frame_time: Duration,
    time_spent: Duration,
}

impl FrameBudget {
    pub fn with_target_fps(fps: f32) -> Self {
        let target_frame_time = Duration::from_secs_f32(1.0 / fps.max(1.0));
        Self {
            frame_start: Instant::now(),
            target_frame_time,
            max_frame_time: target_frame_time * 2,
            time_spent: Duration::ZERO,
        }
    }

    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
        self.time_spent = Duration::ZERO;
    }

    pub fn has_budget(&self) -> bool {
        self.time_spent < self.target_frame_time && self.frame_start.elapsed() < self.max_frame_time
    }

    pub fn remaining_budget(&self) -> Duration {
        self.target_frame_time.saturating_sub(self.time_spent)
    }

    pub fn record_time(&mut self, elapsed: Duration) {
        self.time_spent += elapsed;
    }

    pub fn usage_percentage(&self) -> f32 {
        self.time_spent.as_secs_f32() / self.target_frame_time.as_secs_f32() * 100.0
    }
}

/// Scales how many chunk jobs get dispatched per frame based on how full
/// the budget already is, so a slow frame sheds load instead of digging the
/// hole deeper.
pub struct ChunkLoadThrottler {
    base_chunks_per_frame: usize,
    min_chunks_per_frame: usize,
    max_chunks_per_frame: usize,
}

impl ChunkLoadThrottler {
    pub fn new(base_chunks_per_frame: usize) -> Self {
        Self {
            base_chunks_per_frame,
            min_chunks_per_frame: 1,
            max_chunks_per_frame: base_chunks_per_frame * 4,
        }
    }

    pub fn chunks_this_frame(&self, budget: &FrameBudget) -> usize {
        let usage = budget.usage_percentage();
        let scale = if usage < 50.0 {
            2.0
        } else if usage < 80.0 {
            1.0
        } else {
            0.25
        };
        ((self.base_chunks_per_frame as f32 * scale) as usize)
            .clamp(self.min_chunks_per_frame, self.max_chunks_per_frame)
    }
}
