//! Frame timing: deltas from animation-frame timestamps, logical tick
//! accumulation and an FPS counter

use crate::consts::{FALLBACK_DT, MAX_FRAME_DT, MAX_SUBSTEPS};

const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    accumulator: f32,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            last_time: None,
            accumulator: 0.0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }
}

impl FrameClock {
    /// Seconds since the previous frame, clamped. `time` is in milliseconds.
    pub fn advance(&mut self, time: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) if time > last => ((time - last) / 1000.0) as f32,
            Some(_) => 0.0,
            None => FALLBACK_DT,
        };
        self.last_time = Some(time);

        self.frame_times[self.frame_index] = time;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW as f64 - 1.0) * 1000.0 / elapsed).round() as u32;
            }
        }

        dt.min(MAX_FRAME_DT)
    }

    /// Logical ticks to run for a frame of `dt` seconds.
    ///
    /// Without a tick interval every frame is one tick. With one, whole
    /// intervals are drained from an accumulator, at most `MAX_SUBSTEPS` per
    /// frame.
    pub fn steps(&mut self, dt: f32, tick_interval: Option<f32>) -> u32 {
        let Some(step) = tick_interval.filter(|s| *s > 0.0) else {
            return 1;
        };
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= step && substeps < MAX_SUBSTEPS {
            self.accumulator -= step;
            substeps += 1;
        }
        substeps
    }

    /// Forget the previous timestamp so the next frame does not see the
    /// time spent paused
    pub fn reset(&mut self) {
        self.last_time = None;
        self.accumulator = 0.0;
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_uses_fallback() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.advance(5000.0), FALLBACK_DT);
        assert!((clock.advance(5020.0) - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_long_gap_is_clamped() {
        let mut clock = FrameClock::default();
        clock.advance(0.0);
        assert_eq!(clock.advance(3000.0), MAX_FRAME_DT);
    }

    #[test]
    fn test_reset_forgets_last_time() {
        let mut clock = FrameClock::default();
        clock.advance(100.0);
        clock.reset();
        assert_eq!(clock.advance(60_000.0), FALLBACK_DT);
    }

    #[test]
    fn test_one_step_per_frame_without_interval() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.steps(0.016, None), 1);
        assert_eq!(clock.steps(0.1, None), 1);
    }

    #[test]
    fn test_accumulator_drains_whole_intervals() {
        let mut clock = FrameClock::default();
        let mut total = 0;
        // 0.5 s of 16 ms frames at a 0.1 s tick
        for _ in 0..32 {
            total += clock.steps(0.016, Some(0.1));
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn test_substeps_are_capped() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.steps(0.1, Some(0.001)), MAX_SUBSTEPS);
    }

    #[test]
    fn test_fps_over_window() {
        let mut clock = FrameClock::default();
        for i in 1..=120 {
            clock.advance(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(clock.fps(), 60);
    }
}
