use hab_core::TelemetrySample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Scale height of the standard atmosphere (m).
const SCALE_HEIGHT_M: f32 = 8_434.0;
const SEA_LEVEL_PRESSURE_PA: f32 = 101_325.0;

#[derive(Debug, Clone, Copy)]
pub struct FlightProfile {
    /// Time on the pad before the launch switch is pulled.
    pub pad_hold_s: f32,
    pub ground_altitude_m: f32,
    pub ascent_rate_ms: f32,
    pub burst_altitude_m: f32,
    /// Descent rate under canopy at sea level; faster in thin air.
    pub descent_rate_ms: f32,
    /// Time from touchdown until the recovery team holds the silence switch.
    pub recovery_delay_s: f32,
    pub launch_latitude: f32,
    pub launch_longitude: f32,
    /// Probability that a poll returns no sample at all.
    pub dropout_rate: f64,
}

impl Default for FlightProfile {
    fn default() -> Self {
        Self {
            pad_hold_s: 120.0,
            ground_altitude_m: 150.0,
            ascent_rate_ms: 5.0,
            burst_altitude_m: 30_000.0,
            descent_rate_ms: 7.0,
            recovery_delay_s: 900.0,
            launch_latitude: -35.28,
            launch_longitude: 149.13,
            dropout_rate: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    OnPad,
    Ascent,
    Descent,
    Landed,
}

/// Synthetic balloon standing in for the sensors and switches.
pub struct BalloonAgent {
    profile: FlightProfile,
    stage: Stage,
    elapsed_s: f32,
    altitude_m: f32,
    latitude: f32,
    longitude: f32,
    landed_at_s: Option<f32>,
    rng: StdRng,
}

impl BalloonAgent {
    pub fn new(profile: FlightProfile, seed: u64) -> Self {
        Self {
            profile,
            stage: Stage::OnPad,
            elapsed_s: 0.0,
            altitude_m: profile.ground_altitude_m,
            latitude: profile.launch_latitude,
            longitude: profile.launch_longitude,
            landed_at_s: None,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn altitude_m(&self) -> f32 {
        self.altitude_m
    }

    #[cfg(test)]
    pub fn elapsed_s(&self) -> f32 {
        self.elapsed_s
    }

    /// Advances the flight by `dt_s` seconds.
    pub fn step(&mut self, dt_s: f32) {
        self.elapsed_s += dt_s;

        match self.stage {
            Stage::OnPad => {
                if self.elapsed_s >= self.profile.pad_hold_s {
                    self.stage = Stage::Ascent;
                }
            }
            Stage::Ascent => {
                self.altitude_m += self.profile.ascent_rate_ms * dt_s;
                if self.altitude_m >= self.profile.burst_altitude_m {
                    self.altitude_m = self.profile.burst_altitude_m;
                    self.stage = Stage::Descent;
                }
            }
            Stage::Descent => {
                // Terminal velocity scales with 1/sqrt(air density).
                let thin_air = (self.altitude_m / (2.0 * SCALE_HEIGHT_M)).exp();
                self.altitude_m -= self.profile.descent_rate_ms * thin_air * dt_s;
                if self.altitude_m <= self.profile.ground_altitude_m {
                    self.altitude_m = self.profile.ground_altitude_m;
                    self.stage = Stage::Landed;
                    self.landed_at_s = Some(self.elapsed_s);
                }
            }
            Stage::Landed => {}
        }

        if matches!(self.stage, Stage::Ascent | Stage::Descent) {
            // Steady easterly drift.
            self.longitude += 0.000_2 * dt_s;
            self.latitude += 0.000_02 * dt_s;
        }
    }

    /// Reads the "sensors". Returns `None` on a simulated dropout.
    pub fn sample(&mut self) -> Option<TelemetrySample> {
        if self.rng.gen_bool(self.profile.dropout_rate) {
            return None;
        }

        let gps_altitude = self.altitude_m + self.rng.gen_range(-1.0..=1.0);
        let pressure = SEA_LEVEL_PRESSURE_PA * (-self.altitude_m / SCALE_HEIGHT_M).exp();
        let temperature = (15.0 - 0.0065 * self.altitude_m).max(-56.5);
        let swinging = self.stage != Stage::Landed && self.stage != Stage::OnPad;
        let sway = if swinging { 0.05 } else { 0.005 };

        Some(TelemetrySample {
            latitude: self.latitude,
            longitude: self.longitude,
            gps_altitude,
            barometric_altitude: self.altitude_m + self.rng.gen_range(-3.0..=3.0),
            roll: self.rng.gen_range(-sway..=sway),
            pitch: self.rng.gen_range(-sway..=sway),
            heading: self.rng.gen_range(0.0..360.0),
            course: 75.0,
            temperature,
            pressure,
        })
    }

    pub fn launch_switch(&self) -> bool {
        self.stage != Stage::OnPad
    }

    pub fn silence_switch(&self) -> bool {
        match self.landed_at_s {
            Some(t) => self.elapsed_s - t >= self.profile.recovery_delay_s,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fly_until(agent: &mut BalloonAgent, stage: Stage, limit_s: u32) -> bool {
        for _ in 0..limit_s {
            agent.step(1.0);
            if agent.stage() == stage {
                return true;
            }
        }
        false
    }

    #[test]
    fn test_launch_switch_after_pad_hold() {
        let mut agent = BalloonAgent::new(FlightProfile::default(), 7);
        assert!(!agent.launch_switch());
        assert!(fly_until(&mut agent, Stage::Ascent, 200));
        assert!(agent.launch_switch());
        assert!(agent.elapsed_s() >= 120.0);
    }

    #[test]
    fn test_flight_reaches_ground() {
        let profile = FlightProfile {
            burst_altitude_m: 5_000.0,
            ..FlightProfile::default()
        };
        let mut agent = BalloonAgent::new(profile, 7);
        assert!(fly_until(&mut agent, Stage::Descent, 2_000));
        assert_eq!(agent.altitude_m(), 5_000.0);
        assert!(fly_until(&mut agent, Stage::Landed, 2_000));
        assert_eq!(agent.altitude_m(), profile.ground_altitude_m);
    }

    #[test]
    fn test_silence_after_recovery_delay() {
        let profile = FlightProfile {
            burst_altitude_m: 1_000.0,
            recovery_delay_s: 60.0,
            ..FlightProfile::default()
        };
        let mut agent = BalloonAgent::new(profile, 7);
        assert!(fly_until(&mut agent, Stage::Landed, 2_000));
        assert!(!agent.silence_switch());
        for _ in 0..60 {
            agent.step(1.0);
        }
        assert!(agent.silence_switch());
    }

    #[test]
    fn test_sample_noise_is_bounded() {
        let profile = FlightProfile {
            dropout_rate: 0.0,
            ..FlightProfile::default()
        };
        let mut agent = BalloonAgent::new(profile, 3);
        for _ in 0..100 {
            let sample = agent.sample().unwrap();
            assert!((sample.gps_altitude - profile.ground_altitude_m).abs() <= 1.0);
            assert!(sample.pressure > 99_000.0);
        }
    }

    #[test]
    fn test_dropouts() {
        let profile = FlightProfile {
            dropout_rate: 1.0,
            ..FlightProfile::default()
        };
        let mut agent = BalloonAgent::new(profile, 3);
        assert!(agent.sample().is_none());
    }
}
