mod agent;
mod ground;
mod radio;
mod scheduler;

use agent::{BalloonAgent, FlightProfile};
use clap::Parser;
use ground::GroundStation;
use hab_core::{
    Clock, Frame, FrameDecoder, LinkError, LinkMessage, Millis, MissionConfig, MissionController,
    MissionPhase, MockClock, PositionReport, encode,
};
use radio::LossyLink;
use scheduler::Cadence;
use std::io::{Write, stdout};
use std::path::PathBuf;

/// Largest burst the simulated UART hands over at once.
const MAX_RX_CHUNK: usize = 24;
/// Ground station keepalive cadence.
const UPLINK_PING_INTERVAL_MS: Millis = 60_000;

#[derive(Parser, Debug)]
#[command(name = "hab-sitl", about = "Fly hab-core through a simulated balloon mission")]
struct Args {
    /// Seed for flight noise and link errors
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Altitude at which the balloon bursts (m)
    #[arg(long, default_value_t = 30_000.0)]
    burst_altitude: f32,

    /// Ascent rate under the balloon (m/s)
    #[arg(long, default_value_t = 5.0)]
    ascent_rate: f32,

    /// Sea-level descent rate under the parachute (m/s)
    #[arg(long, default_value_t = 7.0)]
    descent_rate: f32,

    /// Probability of flipping each transmitted bit
    #[arg(long, default_value_t = 1e-4)]
    bit_error_rate: f64,

    /// Probability that a sensor poll returns nothing
    #[arg(long, default_value_t = 0.01)]
    dropout_rate: f64,

    /// JSON file overriding the mission thresholds
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give up after this much simulated time (s)
    #[arg(long, default_value_t = 6 * 3600)]
    max_sim_secs: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => MissionConfig::default(),
    };
    println!("Mission config: {:?}", config);

    let flight = FlightProfile {
        ascent_rate_ms: args.ascent_rate,
        burst_altitude_m: args.burst_altitude,
        descent_rate_ms: args.descent_rate,
        dropout_rate: args.dropout_rate.clamp(0.0, 1.0),
        ..FlightProfile::default()
    };

    let clock = MockClock::new();
    let mut controller = MissionController::with_config(config, &clock);
    let mut agent = BalloonAgent::new(flight, args.seed);
    let mut cadence = Cadence::new();

    let mut downlink = LossyLink::new(args.seed.wrapping_add(1), args.bit_error_rate, MAX_RX_CHUNK);
    let mut uplink = LossyLink::new(args.seed.wrapping_add(2), args.bit_error_rate, MAX_RX_CHUNK);
    let mut ground_rx = FrameDecoder::new();
    let mut payload_rx = FrameDecoder::new();
    let mut ground = GroundStation::default();
    let mut last_ping: Option<Millis> = None;

    let mut beacons = (false, false);
    let mut skipped_polls = 0u32;

    println!("SITL active. Balloon on the pad, {}s hold.", flight.pad_hold_s);

    let limit_ms = sim_limit_ms(args.max_sim_secs);
    while clock.now_ms() < limit_ms {
        let dt_ms = controller.behavior_profile().telemetry_check_interval.as_millis() as Millis;
        clock.advance(dt_ms);
        agent.step(dt_ms as f32 / 1_000.0);
        let now = clock.now_ms();

        // 1. Poll sensors and step the controller
        let sample = agent.sample();
        let old_phase = controller.get();
        match controller.update(sample.as_ref(), agent.launch_switch(), agent.silence_switch()) {
            Ok(phase) if phase != old_phase => {
                // The controller logs the change itself.
                log::debug!("Balloon {:?} at {:.1}m", agent.stage(), agent.altitude_m());
                send(&mut downlink, &LinkMessage::PhaseReport(phase))?;
            }
            Ok(_) => {}
            Err(err) => {
                skipped_polls += 1;
                log::debug!("Poll skipped: {}", err);
            }
        }

        // 2. Beacons and downlink at the phase's cadence
        let profile = controller.behavior_profile();
        if (profile.beeper_enabled, profile.led_enabled) != beacons {
            beacons = (profile.beeper_enabled, profile.led_enabled);
            log::info!("Beeper {} | LED {}", on_off(beacons.0), on_off(beacons.1));
        }

        if let Some(sample) = sample {
            let due = cadence.poll(now, &profile);
            if due.report {
                send(&mut downlink, &LinkMessage::TelemetryReport(sample))?;
            }
            if due.position {
                send(&mut downlink, &LinkMessage::PositionReport(PositionReport::from(&sample)))?;
            }
            if due.log {
                log::debug!(
                    "T+{}s alt {:.1}m baro {:.1}m {:.1}Pa {:.1}C",
                    now / 1_000,
                    sample.gps_altitude,
                    sample.barometric_altitude,
                    sample.pressure,
                    sample.temperature
                );
            }
        }

        if last_ping.is_none_or(|at| now.wrapping_sub(at) >= UPLINK_PING_INTERVAL_MS) {
            last_ping = Some(now);
            send(&mut uplink, &LinkMessage::Ping)?;
        }

        // 3. Deliver whatever the radios carried this tick
        while let Some(chunk) = downlink.receive_chunk() {
            ground_rx.feed_into(&chunk, &mut |frame: Frame| ground.on_frame(frame));
        }
        let mut replies = Vec::new();
        while let Some(chunk) = uplink.receive_chunk() {
            for frame in payload_rx.feed(&chunk) {
                match LinkMessage::try_from(&frame) {
                    Ok(LinkMessage::Ping) => replies.push(LinkMessage::Ping),
                    Ok(message) => {
                        if let Some(phase) = controller.apply(&message) {
                            replies.push(LinkMessage::PhaseReport(phase));
                        }
                    }
                    Err(err) => log::warn!("Payload rejected uplink frame: {}", err),
                }
            }
        }
        for reply in &replies {
            send(&mut downlink, reply)?;
        }

        print!(
            "\rT+{:>6}s | Alt: {:>8.1}m | Phase: {:?} | RX ok {:>5} crc {:>4}   ",
            now / 1_000,
            agent.altitude_m(),
            controller.get(),
            ground_rx.stats().frames_delivered,
            ground_rx.stats().crc_errors
        );
        stdout().flush()?;

        if controller.get() == MissionPhase::Recovered {
            break;
        }
    }

    // Drain anything still in flight.
    while let Some(chunk) = downlink.receive_chunk() {
        ground_rx.feed_into(&chunk, &mut |frame: Frame| ground.on_frame(frame));
    }

    let rx = ground_rx.stats();
    println!("\n\nSimulation ended at T+{}s in {:?}", clock.now_ms() / 1_000, controller.get());
    println!("Polls skipped (no telemetry): {}", skipped_polls);
    println!(
        "Downlink: {} bytes sent, {} bits flipped",
        downlink.bytes_sent, downlink.bits_flipped
    );
    println!(
        "Ground RX: {} delivered, {} CRC errors, {} malformed, {} overflows",
        rx.frames_delivered, rx.crc_errors, rx.malformed_frames, rx.overflows
    );
    println!(
        "Ground saw {} telemetry, {} position, {} phase reports, {} pings ({} rejected)",
        ground.telemetry_reports,
        ground.position_reports,
        ground.phase_reports,
        ground.pings,
        ground.rejected
    );
    if let Some(position) = ground.last_position {
        println!(
            "Last known position: {:.5}, {:.5} at {:.0}m",
            position.latitude, position.longitude, position.altitude
        );
    }

    Ok(())
}

/// Run length in clock ticks, capped so the `u32` clock cannot wrap.
fn sim_limit_ms(max_sim_secs: u32) -> Millis {
    max_sim_secs.min(Millis::MAX / 1_000) * 1_000
}

fn send(link: &mut LossyLink, message: &LinkMessage) -> Result<(), LinkError> {
    let frame = message.to_frame()?;
    link.transmit(&encode(&frame));
    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_flight_walks_every_phase() {
        let flight = FlightProfile {
            burst_altitude_m: 2_000.0,
            recovery_delay_s: 60.0,
            dropout_rate: 0.0,
            ..FlightProfile::default()
        };
        let clock = MockClock::new();
        let mut controller = MissionController::new(&clock);
        let mut agent = BalloonAgent::new(flight, 11);

        let mut phases = vec![controller.get()];
        for _ in 0..5_000 {
            clock.advance(1_000);
            agent.step(1.0);
            let sample = agent.sample();
            let phase = controller
                .update(sample.as_ref(), agent.launch_switch(), agent.silence_switch())
                .unwrap();
            if phases.last() != Some(&phase) {
                phases.push(phase);
            }
            if phase == MissionPhase::Recovered {
                break;
            }
        }

        assert_eq!(phases, MissionPhase::ALL);
    }

    #[test]
    fn test_sim_limit_never_wraps() {
        assert_eq!(sim_limit_ms(60), 60_000);
        assert_eq!(sim_limit_ms(u32::MAX), 4_294_967_000);

        // The loop steps by whole seconds, so the capped limit is reached
        // before the clock wraps.
        let clock = MockClock::starting_at(sim_limit_ms(u32::MAX) - 1_000);
        clock.advance(1_000);
        assert!(clock.now_ms() >= sim_limit_ms(u32::MAX));
    }

    #[test]
    fn test_partial_json_config() {
        let config: MissionConfig =
            serde_json::from_str(r#"{ "terminal_altitude_m": 800.0, "altitude_source": "barometric" }"#)
                .unwrap();
        assert_eq!(config.terminal_altitude_m, 800.0);
        assert_eq!(config.altitude_source, hab_core::AltitudeSource::Barometric);
        assert_eq!(config.landing_window_ms, MissionConfig::default().landing_window_ms);
    }

    #[test]
    fn test_send_frames_message() {
        let mut link = LossyLink::new(0, 0.0, 64);
        send(&mut link, &LinkMessage::PhaseReport(MissionPhase::Landing)).unwrap();

        let mut decoder = FrameDecoder::new();
        let bytes = link.receive_chunk().unwrap();
        let frame = decoder.feed(&bytes).next().unwrap();
        assert_eq!(
            LinkMessage::try_from(&frame),
            Ok(LinkMessage::PhaseReport(MissionPhase::Landing))
        );
    }
}
