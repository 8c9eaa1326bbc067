//! Receive queue shared by the receiver implementations

use std::collections::VecDeque;
use std::fmt;

use oscbind_wire::{decode_messages, OscMessage};

/// FIFO of decoded messages
///
/// Bundles are flattened on arrival so each entry is one message.
/// Datagrams that fail to decode are counted and dropped.
#[derive(Default)]
pub struct ReceiveQueue {
    queue: VecDeque<OscMessage>,
    malformed: u64,
}

impl ReceiveQueue {
    pub fn new() -> Self {
        ReceiveQueue::default()
    }

    /// Decode a datagram and queue its messages
    pub fn push_datagram(&mut self, data: &[u8], from: impl fmt::Display) {
        match decode_messages(data) {
            Ok(messages) => {
                tracing::trace!(%from, count = messages.len(), "datagram queued");
                self.queue.extend(messages);
            }
            Err(e) => {
                self.malformed += 1;
                tracing::warn!(%from, len = data.len(), "dropping malformed datagram: {}", e);
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[inline]
    pub fn pop(&mut self) -> Option<OscMessage> {
        self.queue.pop_front()
    }

    /// Datagrams dropped because they could not be decoded
    pub fn malformed(&self) -> u64 {
        self.malformed
    }
}
