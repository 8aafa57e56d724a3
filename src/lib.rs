//! Control a Sony Bravia set over its RS-232C port.
//!
//! [`Bravia`] owns one serial link and exposes power, volume and mute
//! commands. Every command is a single request/response transaction with a
//! modulo-256 checksum on both sides.

pub mod config;
pub mod engine;
pub mod error;
pub mod frame;
pub mod port;
pub mod proto;
pub mod stats;
pub mod transport;

pub use config::{LinkConfig, ReadTimeout};
pub use engine::Bravia;
pub use error::{AnswerCode, Error, ProtocolError, Result};
pub use proto::command::Operation;
pub use transport::{SerialTransport, Transport};
