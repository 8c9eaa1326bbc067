//! oscbind Transport Layer - moving messages between processes
//!
//! This crate provides:
//! - The `Transport`, `MessageSender` and `MessageReceiver` seams
//! - Non-blocking UDP transport
//! - In-memory loopback transport for tests and single-process setups
//!
//! Senders are fire-and-forget. Receivers never wait: `poll` only collects
//! what the transport already has buffered.

pub mod memory;
pub mod queue;
pub mod udp;

pub use memory::*;
pub use queue::*;
pub use udp::*;

use oscbind_core::OscResult;
use oscbind_wire::OscMessage;

/// Outbound half of a connection
pub trait MessageSender: Send {
    /// Hand one message to the transport without waiting for delivery
    fn send(&mut self, msg: &OscMessage) -> OscResult<()>;
}

/// Inbound half of a connection
pub trait MessageReceiver: Send {
    /// Collect every datagram currently buffered by the transport into the
    /// receive queue and return the queue length
    fn poll(&mut self) -> OscResult<usize>;

    /// Whether the receive queue holds at least one message
    fn has_waiting_messages(&self) -> bool;

    /// Pop the oldest queued message
    fn next_message(&mut self) -> Option<OscMessage>;
}

/// Factory for connections
pub trait Transport {
    type Sender: MessageSender;
    type Receiver: MessageReceiver;

    /// Open an outbound connection to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> OscResult<Self::Sender>;

    /// Open an inbound connection on a local port
    fn listen(&mut self, port: u16) -> OscResult<Self::Receiver>;
}
