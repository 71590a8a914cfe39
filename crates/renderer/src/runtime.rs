use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Abstraction over where frame timing comes from.
///
/// The frame driver only ever asks "how long since some fixed origin" and
/// "block for this long", so tests can swap in a [`ManualClock`] and never
/// touch the wall clock.
pub trait FrameClock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
    /// Blocks (or pretends to) for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Clock backed by the system monotonic clock and `thread::sleep`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a system clock whose origin is `Instant::now()`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl FrameClock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same timeline, so a test render target can hold a clone
/// and [`advance`](ManualClock::advance) it to simulate slow frames while the
/// driver owns the original. Sleeping advances the timeline and is recorded.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
    slept: Rc<Cell<Duration>>,
    sleeps: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the shared timeline forward without counting it as sleep.
    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Total time spent in [`FrameClock::sleep`].
    pub fn total_slept(&self) -> Duration {
        self.slept.get()
    }

    /// Number of [`FrameClock::sleep`] calls.
    pub fn sleep_count(&self) -> u64 {
        self.sleeps.get()
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&mut self, duration: Duration) {
        self.advance(duration);
        self.slept.set(self.slept.get() + duration);
        self.sleeps.set(self.sleeps.get() + 1);
    }
}
