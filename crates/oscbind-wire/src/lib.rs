//! oscbind Wire Protocol - OSC 1.0 packet format
//!
//! This crate implements the wire format used between channels:
//! - Typed arguments (int32, int64, float32, float64, string, blob, bool, nil)
//! - Messages (address + type tags + argument data)
//! - Bundles (decoded and flattened into messages)

pub mod arg;
pub mod message;
pub mod packet;

pub use arg::*;
pub use message::*;
pub use packet::*;
