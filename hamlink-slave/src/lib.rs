//! # hamlink-slave
//!
//! Slave-side (responder) receiver for hamlink.
//!
//! This crate provides:
//! - [`FrameAccumulator`]: byte-at-a-time frame assembly shared between
//!   the interrupt path and the main loop, with stale-frame discard
//! - [`Responder`]: decode, ACK/NACK, and dispatch to a
//!   [`CommandHandler`]

pub mod accumulator;
pub mod config;
pub mod responder;

pub use accumulator::FrameAccumulator;
pub use config::ReceiverConfig;
pub use responder::{CommandHandler, Reply, Responder};
