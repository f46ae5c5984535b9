use crate::behavior::BehaviorProfile;
use crate::config::MissionConfig;
use crate::hysteresis::HysteresisTimer;
use crate::radio_types::LinkMessage;
use crate::time::{Clock, Millis};
use crate::types::{MissionError, MissionPhase, TelemetrySample};
use crate::{info, warn};

/// MissionController tracks the flight phase of the balloon.
///
/// Fed one telemetry sample and the two switch inputs per poll tick. Every
/// transition that reacts to noisy altitude or a held switch is debounced
/// by its own [`HysteresisTimer`].
pub struct MissionController<C: Clock> {
    /// The current phase of the mission.
    phase: MissionPhase,
    /// Altitude seen on the previous tick of an altitude-tracking phase.
    previous_altitude_m: f32,
    /// Altitude has been dropping since this timer was armed.
    descent_timer: HysteresisTimer,
    /// Altitude has held inside the dead-zone since this timer was armed.
    landing_timer: HysteresisTimer,
    /// Silence switch has been held since this timer was armed.
    silence_timer: HysteresisTimer,
    /// Time spent in Recovered.
    recovered_timer: HysteresisTimer,
    config: MissionConfig,
    clock: C,
}

impl<C: Clock> MissionController<C> {
    /// Constructs a controller in the Staging phase with the flight defaults.
    pub fn new(clock: C) -> Self {
        Self::with_config(MissionConfig::new(), clock)
    }

    pub fn with_config(config: MissionConfig, clock: C) -> Self {
        Self {
            phase: MissionPhase::Staging,
            previous_altitude_m: 0.0,
            descent_timer: HysteresisTimer::new(config.descent_window_ms),
            landing_timer: HysteresisTimer::new(config.landing_window_ms),
            silence_timer: HysteresisTimer::new(config.silence_window_ms),
            recovered_timer: HysteresisTimer::new(config.recovered_inactivity_window_ms),
            config,
            clock,
        }
    }

    /// Advances the state machine by one poll tick.
    ///
    /// Only the rules of the phase the controller is in at the start of the
    /// call are evaluated. A missing sample, or one whose altitude is not a
    /// number, is rejected before any state is touched.
    pub fn update(
        &mut self,
        sample: Option<&TelemetrySample>,
        launch_switch: bool,
        silence_switch: bool,
    ) -> Result<MissionPhase, MissionError> {
        let Some(sample) = sample else {
            warn!("Telemetry unavailable, holding {:?}", self.phase);
            return Err(MissionError::TelemetryUnavailable);
        };
        let altitude_m = sample.altitude(self.config.altitude_source);
        if !altitude_m.is_finite() {
            warn!("Non-finite altitude, holding {:?}", self.phase);
            return Err(MissionError::TelemetryUnavailable);
        }

        let now = self.clock.now_ms();
        let old_phase = self.phase;

        self.phase = match old_phase {
            MissionPhase::Staging => {
                if launch_switch {
                    MissionPhase::Takeoff
                } else {
                    MissionPhase::Staging
                }
            }
            MissionPhase::Takeoff => {
                if !launch_switch {
                    MissionPhase::Staging
                } else if altitude_m >= self.config.terminal_altitude_m {
                    MissionPhase::Ascending
                } else {
                    MissionPhase::Takeoff
                }
            }
            MissionPhase::Ascending => self.ascending(altitude_m, now),
            MissionPhase::Descending => {
                if altitude_m <= self.config.terminal_altitude_m {
                    MissionPhase::Landing
                } else {
                    MissionPhase::Descending
                }
            }
            MissionPhase::Landing => self.landing(altitude_m, now),
            MissionPhase::Recovery => {
                if !silence_switch {
                    self.silence_timer.clear();
                    MissionPhase::Recovery
                } else if self.silence_timer.arm_or_check(now) {
                    MissionPhase::Recovered
                } else {
                    MissionPhase::Recovery
                }
            }
            MissionPhase::Recovered => {
                if self.recovered_timer.arm_or_check(now) {
                    MissionPhase::Recovery
                } else {
                    MissionPhase::Recovered
                }
            }
        };

        if self.phase != old_phase {
            info!("PHASE CHANGE: {:?} -> {:?}", old_phase, self.phase);
        }
        Ok(self.phase)
    }

    fn ascending(&mut self, altitude_m: f32, now: Millis) -> MissionPhase {
        let next = if altitude_m < self.previous_altitude_m {
            if self.descent_timer.arm_or_check(now) {
                MissionPhase::Descending
            } else {
                MissionPhase::Ascending
            }
        } else {
            self.descent_timer.clear();
            MissionPhase::Ascending
        };
        self.previous_altitude_m = altitude_m;
        next
    }

    fn landing(&mut self, altitude_m: f32, now: Millis) -> MissionPhase {
        let deadzone = self.config.landed_altitude_deadzone_m;
        let settled = altitude_m <= self.previous_altitude_m + deadzone
            && altitude_m >= self.previous_altitude_m - deadzone;
        let next = if settled {
            if self.landing_timer.arm_or_check(now) {
                MissionPhase::Recovery
            } else {
                MissionPhase::Landing
            }
        } else {
            self.landing_timer.clear();
            MissionPhase::Landing
        };
        self.previous_altitude_m = altitude_m;
        next
    }

    /// Forces the phase. Timers are left as they are.
    pub fn set(&mut self, phase: MissionPhase) {
        if phase != self.phase {
            info!("PHASE OVERRIDE: {:?} -> {:?}", self.phase, phase);
        }
        self.phase = phase;
    }

    pub fn get(&self) -> MissionPhase {
        self.phase
    }

    /// Operating profile for the current phase.
    pub fn behavior_profile(&self) -> BehaviorProfile {
        BehaviorProfile::for_phase(self.phase)
    }

    pub fn config(&self) -> &MissionConfig {
        &self.config
    }

    /// Applies an operator uplink. Returns the new phase if the message was a
    /// phase override; every other message is ignored.
    pub fn apply(&mut self, message: &LinkMessage) -> Option<MissionPhase> {
        match *message {
            LinkMessage::SetPhase(phase) => {
                self.set(phase);
                Some(phase)
            }
            _ => None,
        }
    }
}
