use std::time::{Duration, Instant};

use cpu_time::ProcessTime;

/// Wall-clock and process CPU time spent in one measured section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timing {
    pub wall: Duration,
    pub cpu: Duration,
}

impl Timing {
    #[must_use]
    pub fn wall_seconds(&self) -> f64 {
        self.wall.as_secs_f64()
    }

    #[must_use]
    pub fn cpu_seconds(&self) -> f64 {
        self.cpu.as_secs_f64()
    }
}

/// Samples a monotonic wall clock and the process CPU clock together.
///
/// Start it immediately before the measured call and stop it immediately
/// after, so I/O and allocation outside the call are not counted.
#[derive(Debug)]
pub struct Stopwatch {
    wall: Instant,
    cpu: ProcessTime,
}

impl Stopwatch {
    #[must_use]
    pub fn start() -> Self {
        Self {
            wall: Instant::now(),
            cpu: ProcessTime::now(),
        }
    }

    #[must_use]
    pub fn stop(self) -> Timing {
        // CPU clock first so the wall interval encloses it.
        let cpu = self.cpu.elapsed();
        let wall = self.wall.elapsed();
        Timing { wall, cpu }
    }

    /// Runs `f` between `start` and `stop`.
    pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Timing) {
        let watch = Self::start();
        let out = f();
        (out, watch.stop())
    }
}
