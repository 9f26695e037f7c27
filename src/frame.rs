use std::time::Instant;

const FPS_UPDATE_INTERVAL: f32 = 1.0;
/// Frames slower than this blow the interactive budget and get logged
const FRAME_BUDGET_SECS: f32 = 0.016;

/// Wall-clock frame statistics for the HUD and logs.
///
/// The simulation itself steps on a fixed tick and never reads this.
#[derive(Debug)]
pub struct FrameClock {
    last_tick: Instant,
    frame_count: u32,
    fps_timer: f32,
    fps: f32,
    last_delta: f32,
    over_budget: u32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            frame_count: 0,
            fps_timer: 0.0,
            fps: 0.0,
            last_delta: 0.0,
            over_budget: 0,
        }
    }

    /// Mark the start of a frame and return the seconds since the last one
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.record(delta);
        delta
    }

    /// Fold a measured frame duration into the statistics
    pub fn record(&mut self, delta: f32) {
        self.last_delta = delta;
        self.frame_count += 1;
        self.fps_timer += delta;
        if delta > FRAME_BUDGET_SECS {
            self.over_budget += 1;
        }

        if self.fps_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_timer;
            log::debug!(
                "FPS: {:.1} ({} of {} frames over budget)",
                self.fps,
                self.over_budget,
                self.frame_count
            );
            self.frame_count = 0;
            self.fps_timer = 0.0;
            self.over_budget = 0;
        }
    }

    /// Frames per second, refreshed once per interval
    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frame_time_ms(&self) -> f32 {
        self.last_delta * 1000.0
    }

    /// Reset so the next tick does not include a pause
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
