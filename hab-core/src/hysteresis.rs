use crate::time::Millis;

/// Debounce window for one phase transition.
///
/// A condition must hold on every tick from the moment the timer is armed
/// until `duration_ms` has passed. If the condition drops out the caller
/// clears the timer, and the next arming starts a fresh window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HysteresisTimer {
    armed_at: Option<Millis>,
    duration_ms: Millis,
}

impl HysteresisTimer {
    pub const fn new(duration_ms: Millis) -> Self {
        Self {
            armed_at: None,
            duration_ms,
        }
    }

    pub const fn duration_ms(&self) -> Millis {
        self.duration_ms
    }

    pub const fn is_armed(&self) -> bool {
        self.armed_at.is_some()
    }

    pub const fn armed_at(&self) -> Option<Millis> {
        self.armed_at
    }

    /// Stops and forgets the window.
    pub fn clear(&mut self) {
        self.armed_at = None;
    }

    /// True once an armed window has run its full duration.
    pub fn has_elapsed(&self, now: Millis) -> bool {
        match self.armed_at {
            Some(start) => now.wrapping_sub(start) >= self.duration_ms,
            None => false,
        }
    }

    /// Arms the timer if idle, otherwise checks it.
    ///
    /// The arming tick never reports elapse. Returns `true` exactly once per
    /// window, and the timer is cleared when it does.
    pub fn arm_or_check(&mut self, now: Millis) -> bool {
        if self.armed_at.is_none() {
            self.armed_at = Some(now);
            return false;
        }
        if self.has_elapsed(now) {
            self.clear();
            return true;
        }
        false
    }
}
