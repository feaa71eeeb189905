/// Seconds between FPS samples
pub const FPS_UPDATE_INTERVAL: f32 = 1.0;

/// Frame-rate sampler: counts frames and publishes a rate once per interval
#[derive(Debug, Clone)]
pub struct FpsCounter {
    interval: f32,
    frame_count: u32,
    timer: f32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            frame_count: 0,
            timer: 0.0,
            fps: 0.0,
        }
    }

    /// Record one frame. Returns the new rate when a sample completes.
    pub fn frame(&mut self, delta: f32) -> Option<f32> {
        self.frame_count += 1;
        self.timer += delta;

        if self.timer < self.interval {
            return None;
        }

        self.fps = self.frame_count as f32 / self.timer;
        self.frame_count = 0;
        self.timer = 0.0;
        Some(self.fps)
    }

    /// Last published rate
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new(FPS_UPDATE_INTERVAL)
    }
}
