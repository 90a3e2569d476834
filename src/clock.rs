//! Frame pacing and elapsed-time measurement.

use std::time::{Duration, Instant};

/// Longest step the simulation will take in one tick, in seconds.  A stalled
/// terminal must not teleport entities through the player.
pub const MAX_FRAME_DT: f32 = 0.05;

pub fn clamp_dt(secs: f32) -> f32 {
    if secs.is_finite() {
        secs.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    }
}

#[derive(Debug)]
pub struct FrameClock {
    frame: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(10, 240);
        Self {
            frame: Duration::from_secs(1) / fps,
            last: Instant::now(),
        }
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame
    }

    /// Seconds since the previous call, clamped to `MAX_FRAME_DT`.
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        clamp_dt(dt)
    }

    /// Sleep out whatever is left of the frame that began at `frame_start`.
    pub fn wait(&self, frame_start: Instant) {
        let elapsed = frame_start.elapsed();
        if elapsed < self.frame {
            std::thread::sleep(self.frame - elapsed);
        }
    }
}
