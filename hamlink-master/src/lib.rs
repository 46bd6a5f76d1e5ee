//! # hamlink-master
//!
//! Master-side (initiator) exchange engine for hamlink.
//!
//! This crate provides:
//! - A blocking [`Transport`] trait abstracting the serial bus, chip
//!   select and elapsed-time source
//! - The [`Exchange`] state machine: validate, encode, send, await-ACK,
//!   and for read-class commands receive-and-validate with retries
//! - The closed [`ExchangeError`] taxonomy

pub mod config;
pub mod error;
pub mod exchange;
pub mod transport;

pub use config::ExchangeConfig;
pub use error::ExchangeError;
pub use exchange::Exchange;
pub use transport::{Transport, TransportError};
