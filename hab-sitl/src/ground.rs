use hab_core::{Frame, LinkMessage, MissionPhase, PositionReport, TelemetrySample};

/// Receive side of the downlink, as the chase team would run it.
#[derive(Debug, Default)]
pub struct GroundStation {
    pub telemetry_reports: u32,
    pub position_reports: u32,
    pub phase_reports: u32,
    pub pings: u32,
    pub rejected: u32,
    pub last_sample: Option<TelemetrySample>,
    pub last_position: Option<PositionReport>,
    pub last_phase: Option<MissionPhase>,
}

impl GroundStation {
    pub fn on_frame(&mut self, frame: Frame) {
        match LinkMessage::try_from(&frame) {
            Ok(LinkMessage::TelemetryReport(sample)) => {
                self.telemetry_reports += 1;
                self.last_sample = Some(sample);
            }
            Ok(LinkMessage::PositionReport(position)) => {
                self.position_reports += 1;
                self.last_position = Some(position);
            }
            Ok(LinkMessage::PhaseReport(phase)) => {
                self.phase_reports += 1;
                if self.last_phase != Some(phase) {
                    log::info!("[GROUND] Payload reports phase {:?}", phase);
                }
                self.last_phase = Some(phase);
            }
            Ok(LinkMessage::Ping) => self.pings += 1,
            Ok(other) => {
                self.rejected += 1;
                log::warn!("[GROUND] Unexpected uplink message on downlink: {:?}", other);
            }
            Err(err) => {
                self.rejected += 1;
                log::warn!(
                    "[GROUND] Rejected frame {:#04x}: {}",
                    frame.command(),
                    err
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_station_tracks_messages() {
        let mut ground = GroundStation::default();
        let position = PositionReport {
            latitude: -35.0,
            longitude: 149.0,
            altitude: 620.0,
        };

        for message in [
            LinkMessage::PhaseReport(MissionPhase::Takeoff),
            LinkMessage::PositionReport(position),
            LinkMessage::Ping,
            LinkMessage::SetPhase(MissionPhase::Recovery),
        ] {
            ground.on_frame(message.to_frame().unwrap());
        }
        ground.on_frame(Frame::empty(0x55));

        assert_eq!(ground.last_phase, Some(MissionPhase::Takeoff));
        assert_eq!(ground.last_position, Some(position));
        assert_eq!(ground.pings, 1);
        assert_eq!(ground.rejected, 2);
    }
}
