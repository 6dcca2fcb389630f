/// Tick scheduling.
///
/// The frame itself is a plain callable ([`crate::Viewer::tick`]); hosts
/// decide how it gets invoked at the target rate by implementing [`Scheduler`].
use std::ops::ControlFlow;
use std::time::Duration;

/// Target frames per second
pub const TICK_RATE: f32 = 59.94;

/// Time between two ticks at [`TICK_RATE`]
pub fn tick_interval() -> Duration {
    Duration::from_secs_f64(1.0 / TICK_RATE as f64)
}

/// Fixed time step handed to the state advance each tick
pub fn tick_dt() -> f32 {
    1.0 / TICK_RATE
}

/// Invokes a tick callback repeatedly until it asks to stop.
///
/// A tick always runs to completion before the next one starts.
pub trait Scheduler {
    fn run(&mut self, interval: Duration, tick: &mut dyn FnMut() -> ControlFlow<()>);
}

/// Runs a fixed number of ticks back to back, without waiting.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    pub steps: usize,
    pub ticks_run: usize,
}

impl ManualScheduler {
    pub fn new(steps: usize) -> Self {
        Self { steps, ticks_run: 0 }
    }
}

impl Scheduler for ManualScheduler {
    fn run(&mut self, _interval: Duration, tick: &mut dyn FnMut() -> ControlFlow<()>) {
        for _ in 0..self.steps {
            self.ticks_run += 1;
            if tick().is_break() {
                break;
            }
        }
    }
}
