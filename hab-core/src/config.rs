use crate::time::Millis;
use crate::types::AltitudeSource;
use serde::{Deserialize, Serialize};

/// Altitude (m) separating the ground phases from the flight phases.
pub const TERMINAL_ALTITUDE_M: f32 = 500.0;

/// Altitude band (m) either side of the previous reading that counts as "not moving".
pub const LANDED_ALTITUDE_DEADZONE_M: f32 = 5.0;

/// Altitude must fall continuously this long before descent is declared.
pub const DESCENT_DETECTION_WINDOW_MS: Millis = 5_000;

/// Altitude must hold inside the dead-zone this long before landing is declared.
pub const LANDING_DETECTION_WINDOW_MS: Millis = 5_000;

/// Silence switch must be held this long before the payload goes quiet.
pub const SILENCE_DETECTION_WINDOW_MS: Millis = 5_000;

/// Time spent silenced before falling back to beaconing.
pub const RECOVERED_INACTIVITY_WINDOW_MS: Millis = 300_000;

/// Tunables for [`crate::MissionController`].
///
/// Defaults are the flight constants above. Missing keys in a loaded config
/// fall back to the defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct MissionConfig {
    pub terminal_altitude_m: f32,
    pub landed_altitude_deadzone_m: f32,
    pub descent_window_ms: Millis,
    pub landing_window_ms: Millis,
    pub silence_window_ms: Millis,
    pub recovered_inactivity_window_ms: Millis,
    pub altitude_source: AltitudeSource,
}

impl MissionConfig {
    pub const fn new() -> Self {
        Self {
            terminal_altitude_m: TERMINAL_ALTITUDE_M,
            landed_altitude_deadzone_m: LANDED_ALTITUDE_DEADZONE_M,
            descent_window_ms: DESCENT_DETECTION_WINDOW_MS,
            landing_window_ms: LANDING_DETECTION_WINDOW_MS,
            silence_window_ms: SILENCE_DETECTION_WINDOW_MS,
            recovered_inactivity_window_ms: RECOVERED_INACTIVITY_WINDOW_MS,
            altitude_source: AltitudeSource::Gps,
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self::new()
    }
}
