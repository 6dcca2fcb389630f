/// Fixed-rate tick loop for native hosts
use orbit3d_core::Scheduler;
use std::ops::ControlFlow;
use std::time::{Duration, Instant};

/// Runs ticks back to back, sleeping off whatever is left of each interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRateScheduler;

impl Scheduler for FixedRateScheduler {
    fn run(&mut self, interval: Duration, tick: &mut dyn FnMut() -> ControlFlow<()>) {
        loop {
            let frame_start = Instant::now();
            if tick().is_break() {
                break;
            }

            let elapsed = frame_start.elapsed();
            if elapsed < interval {
                std::thread::sleep(interval - elapsed);
            }
        }
    }
}

/// Frame rate measured once per second
#[derive(Debug)]
pub struct FpsCounter {
    last_report: Instant,
    frame_count: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            last_report: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Count a finished frame and return the current estimate.
    pub fn record(&mut self) -> f32 {
        self.frame_count += 1;
        let now = Instant::now();
        let elapsed = now - self.last_report;
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frame_count as f32 / elapsed.as_secs_f32();
            self.frame_count = 0;
            self.last_report = now;
        }
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_until_break_and_paces_ticks() {
        let mut scheduler = FixedRateScheduler;
        let interval = Duration::from_millis(5);
        let mut ticks = 0;
        let start = Instant::now();
        scheduler.run(interval, &mut || {
            ticks += 1;
            if ticks == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(ticks, 4);
        // three full intervals were slept before the fourth tick
        assert!(start.elapsed() >= interval * 3);
    }

    #[test]
    fn test_fps_counter_starts_at_zero() {
        let mut counter = FpsCounter::new();
        assert_eq!(counter.record(), 0.0);
        assert_eq!(counter.fps(), 0.0);
    }
}
