/// Counts rendered frames and reports the frame rate once per interval.
#[derive(Debug, Clone)]
pub struct FrameCounter {
    interval: f64,
    frames: u32,
    window_start: f64,
    last_fps: Option<u32>,
}

impl FrameCounter {
    /// ## Panics
    /// - if `interval` isn't positive
    pub fn new(interval: f64) -> Self {
        assert!(interval > 0.0, "FPS report interval must be positive");

        Self {
            interval,
            frames: 0,
            window_start: 0.0,
            last_fps: None,
        }
    }

    /// Starts counting from scratch, with the first interval beginning at `time`.
    pub fn reset(&mut self, time: f64) {
        self.frames = 0;
        self.window_start = time;
        self.last_fps = None;
    }

    /// Records a frame finished at `time` (in seconds). Once the current interval is over, returns
    /// the number of frames per second rendered during it.
    pub fn end_frame(&mut self, time: f64) -> Option<u32> {
        self.frames += 1;

        let elapsed = time - self.window_start;
        if elapsed < self.interval {
            return None;
        }

        // After a stall, report the average over the whole stretch once instead of catching up
        // interval by interval
        let (fps, next_start) = if elapsed > 2.0 * self.interval {
            (f64::from(self.frames) / elapsed, time)
        } else {
            (
                f64::from(self.frames) / self.interval,
                self.window_start + self.interval,
            )
        };

        let fps = fps.round() as u32;
        self.frames = 0;
        self.window_start = next_start;

        self.last_fps = Some(fps);
        Some(fps)
    }

    /// The most recently reported frame rate.
    pub fn last_fps(&self) -> Option<u32> {
        self.last_fps
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new(1.0)
    }
}
