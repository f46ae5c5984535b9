//! Millisecond clock abstraction.
//!
//! The controller never reads a hardware timer directly. It asks a [`Clock`]
//! for the current tick, which lets tests drive time by hand with
//! [`MockClock`] and lets firmware plug in [`EmbassyClock`].

use core::cell::Cell;

/// Monotonic milliseconds. Wraps after ~49.7 days; all comparisons use
/// wrapping subtraction.
pub type Millis = u32;

pub trait Clock {
    /// Current time in milliseconds since an arbitrary epoch.
    fn now_ms(&self) -> Millis;

    /// Milliseconds since `start`, correct across a counter wrap.
    fn elapsed_since(&self, start: Millis) -> Millis {
        self.now_ms().wrapping_sub(start)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Millis {
        (**self).now_ms()
    }
}

/// Hand-driven clock for tests and simulation.
///
/// Shared by reference (`&MockClock` is itself a [`Clock`]) so the owner of
/// the clock can advance time while a controller holds it.
#[derive(Debug, Default)]
pub struct MockClock {
    now: Cell<Millis>,
}

impl MockClock {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(ms: Millis) -> Self {
        Self { now: Cell::new(ms) }
    }

    pub fn set(&self, ms: Millis) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: Millis) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> Millis {
        self.now.get()
    }
}

/// Clock backed by the embassy time driver.
#[cfg(feature = "embassy")]
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

#[cfg(feature = "embassy")]
impl Clock for EmbassyClock {
    fn now_ms(&self) -> Millis {
        embassy_time::Instant::now().as_millis() as Millis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_clock_advance() {
        let clock = MockClock::new();
        clock.advance(1500);
        assert_eq!(clock.now_ms(), 1500);
        assert_eq!(clock.elapsed_since(500), 1000);
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let clock = MockClock::starting_at(u32::MAX - 99);
        let start = clock.now_ms();
        clock.advance(250);
        assert_eq!(clock.now_ms(), 150);
        assert_eq!(clock.elapsed_since(start), 250);
    }

    #[test]
    fn test_clock_by_reference() {
        fn read<C: Clock>(clock: C) -> Millis {
            clock.now_ms()
        }
        let clock = MockClock::starting_at(42);
        assert_eq!(read(&clock), 42);
    }
}
