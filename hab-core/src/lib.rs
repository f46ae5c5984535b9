// lib.rs
#![no_std]

pub mod macros;

pub mod behavior;
pub mod config;
pub mod hysteresis;
pub mod link;
pub mod radio_types;
pub mod state_machine;
pub mod time;
pub mod types;

pub use behavior::*;
pub use config::*;
pub use hysteresis::HysteresisTimer;
pub use link::{Frame, FrameDecoder, FrameHandler, LinkError, LinkStats, encode, encode_into};
pub use radio_types::{LinkMessage, PositionReport};
pub use state_machine::*;
pub use time::*;
pub use types::*;
