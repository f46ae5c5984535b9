use crate::types::MissionPhase;
use embassy_time::Duration;

/// How the payload should behave while in a given phase.
///
/// Read by the scheduler to pace sensor polling, downlink reports and
/// logging, and to drive the recovery beacons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BehaviorProfile {
    pub telemetry_check_interval: Duration,
    pub telemetry_report_interval: Duration,
    pub telemetry_log_interval: Duration,
    pub position_report_interval: Duration,
    pub beeper_enabled: bool,
    pub led_enabled: bool,
}

impl BehaviorProfile {
    const fn row(
        check_ms: u64,
        report_ms: u64,
        log_ms: u64,
        position_ms: u64,
        beeper_enabled: bool,
        led_enabled: bool,
    ) -> Self {
        Self {
            telemetry_check_interval: Duration::from_millis(check_ms),
            telemetry_report_interval: Duration::from_millis(report_ms),
            telemetry_log_interval: Duration::from_millis(log_ms),
            position_report_interval: Duration::from_millis(position_ms),
            beeper_enabled,
            led_enabled,
        }
    }

    pub const fn for_phase(phase: MissionPhase) -> Self {
        match phase {
            MissionPhase::Staging => STAGING_PROFILE,
            MissionPhase::Takeoff => TAKEOFF_PROFILE,
            MissionPhase::Ascending => ASCENDING_PROFILE,
            MissionPhase::Descending => DESCENDING_PROFILE,
            MissionPhase::Landing => LANDING_PROFILE,
            MissionPhase::Recovery => RECOVERY_PROFILE,
            MissionPhase::Recovered => RECOVERED_PROFILE,
        }
    }
}

impl From<MissionPhase> for BehaviorProfile {
    fn from(phase: MissionPhase) -> Self {
        Self::for_phase(phase)
    }
}

//                                                          check  report   log   position beeper led
pub const STAGING_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 5_000, 5_000, 30_000, false, true);
pub const TAKEOFF_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 15_000, 5_000, 15_000, true, true);
pub const ASCENDING_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 60_000, 5_000, 30_000, false, false);
pub const DESCENDING_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 60_000, 5_000, 30_000, false, false);
pub const LANDING_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 60_000, 5_000, 5_000, true, true);
pub const RECOVERY_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 300_000, 5_000, 300_000, true, true);
pub const RECOVERED_PROFILE: BehaviorProfile = BehaviorProfile::row(1_000, 900_000, 5_000, 900_000, false, false);
