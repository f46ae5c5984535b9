//! Messages carried inside link frames, keyed by the frame's command byte.
//!
//! Both ends must agree on these definitions: postcard payloads are not
//! self-describing, so field order and types must match exactly.

use crate::link::{Frame, LinkError, MAX_PAYLOAD_LENGTH};
use crate::types::{MissionPhase, TelemetrySample};
use serde::{Deserialize, Serialize};

pub mod command {
    /// Downlink: full [`crate::TelemetrySample`].
    pub const TELEMETRY_REPORT: u8 = 0x01;
    /// Downlink: [`crate::PositionReport`].
    pub const POSITION_REPORT: u8 = 0x02;
    /// Downlink: current phase discriminant.
    pub const PHASE_REPORT: u8 = 0x03;
    /// Uplink: operator phase override.
    pub const SET_PHASE: u8 = 0x10;
    /// Either direction, no payload.
    pub const PING: u8 = 0x11;
}

/// Compact fix for the recovery team.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionReport {
    /// Latitude in decimal degrees.
    pub latitude: f32,
    /// Longitude in decimal degrees.
    pub longitude: f32,
    /// GPS altitude in metres.
    pub altitude: f32,
}

impl From<&TelemetrySample> for PositionReport {
    fn from(sample: &TelemetrySample) -> Self {
        Self {
            latitude: sample.latitude,
            longitude: sample.longitude,
            altitude: sample.gps_altitude,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkMessage {
    TelemetryReport(TelemetrySample),
    PositionReport(PositionReport),
    PhaseReport(MissionPhase),
    SetPhase(MissionPhase),
    Ping,
}

impl LinkMessage {
    pub const fn command(&self) -> u8 {
        match self {
            LinkMessage::TelemetryReport(_) => command::TELEMETRY_REPORT,
            LinkMessage::PositionReport(_) => command::POSITION_REPORT,
            LinkMessage::PhaseReport(_) => command::PHASE_REPORT,
            LinkMessage::SetPhase(_) => command::SET_PHASE,
            LinkMessage::Ping => command::PING,
        }
    }

    pub fn to_frame(&self) -> Result<Frame, LinkError> {
        let mut buf = [0u8; MAX_PAYLOAD_LENGTH];
        let payload: &[u8] = match self {
            LinkMessage::TelemetryReport(sample) => {
                &*postcard::to_slice(sample, &mut buf).map_err(|_| LinkError::MalformedPayload)?
            }
            LinkMessage::PositionReport(report) => {
                &*postcard::to_slice(report, &mut buf).map_err(|_| LinkError::MalformedPayload)?
            }
            LinkMessage::PhaseReport(phase) | LinkMessage::SetPhase(phase) => {
                buf[0] = *phase as u8;
                &buf[..1]
            }
            LinkMessage::Ping => &[],
        };
        Frame::new(self.command(), payload)
    }
}

impl TryFrom<&Frame> for LinkMessage {
    type Error = LinkError;

    fn try_from(frame: &Frame) -> Result<Self, Self::Error> {
        let payload = frame.payload();
        match frame.command() {
            command::TELEMETRY_REPORT => postcard::from_bytes(payload)
                .map(LinkMessage::TelemetryReport)
                .map_err(|_| LinkError::MalformedPayload),
            command::POSITION_REPORT => postcard::from_bytes(payload)
                .map(LinkMessage::PositionReport)
                .map_err(|_| LinkError::MalformedPayload),
            command::PHASE_REPORT => parse_phase(payload).map(LinkMessage::PhaseReport),
            command::SET_PHASE => parse_phase(payload).map(LinkMessage::SetPhase),
            command::PING if payload.is_empty() => Ok(LinkMessage::Ping),
            command::PING => Err(LinkError::MalformedPayload),
            other => Err(LinkError::UnknownCommand(other)),
        }
    }
}

fn parse_phase(payload: &[u8]) -> Result<MissionPhase, LinkError> {
    match payload {
        [raw] => MissionPhase::try_from(*raw).map_err(|_| LinkError::MalformedPayload),
        _ => Err(LinkError::MalformedPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::{FrameDecoder, encode};

    #[test]
    fn test_telemetry_report_over_link() {
        let sample = TelemetrySample {
            latitude: -35.2809,
            longitude: 149.13,
            gps_altitude: 28_450.5,
            barometric_altitude: 28_390.0,
            roll: 0.02,
            pitch: -0.01,
            heading: 271.0,
            course: 265.5,
            temperature: -52.3,
            pressure: 1_540.0,
        };
        let frame = LinkMessage::TelemetryReport(sample).to_frame().unwrap();
        assert_eq!(frame.command(), command::TELEMETRY_REPORT);
        assert_eq!(frame.length(), 40);

        let mut decoder = FrameDecoder::new();
        let received = decoder.feed(&encode(&frame)).next().unwrap();
        assert_eq!(
            LinkMessage::try_from(&received),
            Ok(LinkMessage::TelemetryReport(sample))
        );
    }

    #[test]
    fn test_position_report_from_sample() {
        let sample = TelemetrySample {
            latitude: 51.5,
            longitude: -0.12,
            gps_altitude: 80.0,
            ..TelemetrySample::new()
        };
        let message = LinkMessage::PositionReport(PositionReport::from(&sample));
        let frame = message.to_frame().unwrap();
        assert_eq!(frame.length(), 12);
        assert_eq!(LinkMessage::try_from(&frame), Ok(message));
    }

    #[test]
    fn test_phase_messages() {
        let frame = LinkMessage::SetPhase(MissionPhase::Recovery).to_frame().unwrap();
        assert_eq!(frame.payload(), &[MissionPhase::Recovery as u8]);
        assert_eq!(
            LinkMessage::try_from(&frame),
            Ok(LinkMessage::SetPhase(MissionPhase::Recovery))
        );

        let bad = Frame::new(command::PHASE_REPORT, &[9]).unwrap();
        assert_eq!(LinkMessage::try_from(&bad), Err(LinkError::MalformedPayload));
    }

    #[test]
    fn test_ping_and_unknown_commands() {
        let ping = LinkMessage::Ping.to_frame().unwrap();
        assert_eq!(ping.length(), 0);
        assert_eq!(LinkMessage::try_from(&ping), Ok(LinkMessage::Ping));

        let unknown = Frame::empty(0x55);
        assert_eq!(
            LinkMessage::try_from(&unknown),
            Err(LinkError::UnknownCommand(0x55))
        );
    }

    #[test]
    fn test_truncated_telemetry_rejected() {
        let frame = Frame::new(command::TELEMETRY_REPORT, &[0u8; 12]).unwrap();
        assert_eq!(LinkMessage::try_from(&frame), Err(LinkError::MalformedPayload));
    }
}
