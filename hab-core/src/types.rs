// types.rs
use serde::{Deserialize, Serialize};

/// Flight phases of a balloon mission, in the order a normal flight visits them.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MissionPhase {
    Staging = 0,    // On the ground, launch switch not yet pulled
    Takeoff = 1,    // Released, climbing through the terminal altitude
    Ascending = 2,  // Free ascent, waiting for burst
    Descending = 3, // Under parachute
    Landing = 4,    // Below the terminal altitude, waiting for the altitude to settle
    Recovery = 5,   // On the ground, beaconing for the recovery team
    Recovered = 6,  // Silenced by the recovery team
}

impl MissionPhase {
    pub const ALL: [MissionPhase; 7] = [
        MissionPhase::Staging,
        MissionPhase::Takeoff,
        MissionPhase::Ascending,
        MissionPhase::Descending,
        MissionPhase::Landing,
        MissionPhase::Recovery,
        MissionPhase::Recovered,
    ];
}

impl TryFrom<u8> for MissionPhase {
    type Error = MissionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(value as usize)
            .copied()
            .ok_or(MissionError::UnknownPhase(value))
    }
}

/// Which altitude reading drives the phase logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "snake_case")]
pub enum AltitudeSource {
    #[default]
    Gps,
    Barometric,
}

/// One poll's worth of sensor readings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetrySample {
    /// Latitude in decimal degrees.
    pub latitude: f32,
    /// Longitude in decimal degrees.
    pub longitude: f32,
    /// Altitude in metres from the GPS.
    pub gps_altitude: f32,
    /// Altitude in metres derived from barometric pressure.
    pub barometric_altitude: f32,
    /// Roll in radians.
    pub roll: f32,
    /// Pitch in radians.
    pub pitch: f32,
    /// Magnetic heading in degrees.
    pub heading: f32,
    /// Direction of travel in degrees.
    pub course: f32,
    /// Temperature in degrees C.
    pub temperature: f32,
    /// Pressure in pascals.
    pub pressure: f32,
}

impl TelemetrySample {
    pub const fn new() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            gps_altitude: 0.0,
            barometric_altitude: 0.0,
            roll: 0.0,
            pitch: 0.0,
            heading: 0.0,
            course: 0.0,
            temperature: 0.0,
            pressure: 0.0,
        }
    }

    pub const fn altitude(&self, source: AltitudeSource) -> f32 {
        match source {
            AltitudeSource::Gps => self.gps_altitude,
            AltitudeSource::Barometric => self.barometric_altitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MissionError {
    #[error("telemetry sample unavailable")]
    TelemetryUnavailable,
    #[error("unknown mission phase {0}")]
    UnknownPhase(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_discriminant() {
        for phase in MissionPhase::ALL {
            assert_eq!(MissionPhase::try_from(phase as u8), Ok(phase));
        }
        assert_eq!(
            MissionPhase::try_from(7),
            Err(MissionError::UnknownPhase(7))
        );
    }

    #[test]
    fn test_phases_are_ordered() {
        assert!(MissionPhase::Staging < MissionPhase::Takeoff);
        assert!(MissionPhase::Recovery < MissionPhase::Recovered);
    }

    #[test]
    fn test_altitude_source() {
        let sample = TelemetrySample {
            gps_altitude: 1200.0,
            barometric_altitude: 1180.0,
            ..TelemetrySample::new()
        };
        assert_eq!(sample.altitude(AltitudeSource::Gps), 1200.0);
        assert_eq!(sample.altitude(AltitudeSource::Barometric), 1180.0);
    }
}
