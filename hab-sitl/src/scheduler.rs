use hab_core::{BehaviorProfile, Millis};

/// Which periodic jobs fire on this tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Due {
    pub report: bool,
    pub position: bool,
    pub log: bool,
}

/// Paces downlink reports and logging from the active [`BehaviorProfile`].
#[derive(Debug, Default)]
pub struct Cadence {
    last_report: Option<Millis>,
    last_position: Option<Millis>,
    last_log: Option<Millis>,
}

impl Cadence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, now: Millis, profile: &BehaviorProfile) -> Due {
        Due {
            report: fire(
                &mut self.last_report,
                now,
                profile.telemetry_report_interval.as_millis(),
            ),
            position: fire(
                &mut self.last_position,
                now,
                profile.position_report_interval.as_millis(),
            ),
            log: fire(
                &mut self.last_log,
                now,
                profile.telemetry_log_interval.as_millis(),
            ),
        }
    }
}

fn fire(last: &mut Option<Millis>, now: Millis, interval_ms: u64) -> bool {
    let due = match *last {
        None => true,
        Some(at) => u64::from(now.wrapping_sub(at)) >= interval_ms,
    };
    if due {
        *last = Some(now);
    }
    due
}
