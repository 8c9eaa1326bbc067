//! In-memory loopback transport
//!
//! Every host name resolves to this process: a message sent to `(host, port)`
//! is delivered to whichever receiver listens on `port`. A network built with
//! `recording()` also keeps every datagram per destination so tests can
//! inspect what was published. Messages still travel through the packet codec.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use oscbind_core::{OscError, OscResult, PublisherKey};
use oscbind_wire::{decode_messages, encode_message, OscMessage};

use crate::{MessageReceiver, MessageSender, ReceiveQueue, Transport};

#[derive(Default)]
struct NetworkState {
    /// Datagrams waiting for a bound receiver, keyed by port
    inboxes: HashMap<u16, VecDeque<Bytes>>,
    /// Everything sent, keyed by destination, when recording
    sent: HashMap<PublisherKey, Vec<Bytes>>,
    recording: bool,
}

/// Shared handle to an in-memory network
#[derive(Clone, Default)]
pub struct MemoryNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl MemoryNetwork {
    pub fn new() -> Self {
        MemoryNetwork::default()
    }

    /// Network that keeps every sent datagram until `sent_to` drains it
    pub fn recording() -> Self {
        let network = MemoryNetwork::default();
        network.state.lock().recording = true;
        network
    }

    fn deliver(&self, host: &str, port: u16, bytes: Bytes) {
        let mut state = self.state.lock();
        if let Some(inbox) = state.inboxes.get_mut(&port) {
            inbox.push_back(bytes.clone());
        }
        if state.recording {
            state
                .sent
                .entry(PublisherKey::new(host, port))
                .or_default()
                .push(bytes);
        }
    }

    /// Deliver a message to the receiver on `port`, as if sent from outside.
    /// Returns false when nothing listens there (the message is lost).
    pub fn inject(&self, port: u16, msg: &OscMessage) -> OscResult<bool> {
        let bytes = encode_message(msg)?;
        Ok(self.inject_raw(port, bytes))
    }

    /// Deliver raw datagram bytes to the receiver on `port`
    pub fn inject_raw(&self, port: u16, bytes: impl Into<Bytes>) -> bool {
        let mut state = self.state.lock();
        match state.inboxes.get_mut(&port) {
            Some(inbox) => {
                inbox.push_back(bytes.into());
                true
            }
            None => false,
        }
    }

    /// Drain the messages sent to `host:port` so far. Always empty unless
    /// the network was built with `recording()`.
    pub fn sent_to(&self, host: &str, port: u16) -> Vec<OscMessage> {
        let datagrams = self
            .state
            .lock()
            .sent
            .remove(&PublisherKey::new(host, port))
            .unwrap_or_default();

        datagrams
            .iter()
            .filter_map(|d| decode_messages(d).ok())
            .flatten()
            .collect()
    }

    /// Whether a receiver is bound to `port`
    pub fn is_listening(&self, port: u16) -> bool {
        self.state.lock().inboxes.contains_key(&port)
    }
}

impl Transport for MemoryNetwork {
    type Sender = MemorySender;
    type Receiver = MemoryReceiver;

    fn connect(&mut self, host: &str, port: u16) -> OscResult<MemorySender> {
        Ok(MemorySender {
            network: self.clone(),
            host: host.to_owned(),
            port,
        })
    }

    fn listen(&mut self, port: u16) -> OscResult<MemoryReceiver> {
        let mut state = self.state.lock();
        if state.inboxes.contains_key(&port) {
            return Err(OscError::AddressInUse(port));
        }
        state.inboxes.insert(port, VecDeque::new());

        Ok(MemoryReceiver {
            network: self.clone(),
            port,
            queue: ReceiveQueue::new(),
        })
    }
}

/// Outbound in-memory connection
pub struct MemorySender {
    network: MemoryNetwork,
    host: String,
    port: u16,
}

impl MessageSender for MemorySender {
    fn send(&mut self, msg: &OscMessage) -> OscResult<()> {
        let bytes = encode_message(msg)?;
        self.network.deliver(&self.host, self.port, bytes);
        Ok(())
    }
}

/// Inbound in-memory connection; dropping it frees the port
pub struct MemoryReceiver {
    network: MemoryNetwork,
    port: u16,
    queue: ReceiveQueue,
}

impl MemoryReceiver {
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl MessageReceiver for MemoryReceiver {
    fn poll(&mut self) -> OscResult<usize> {
        let datagrams: Vec<Bytes> = {
            let mut state = self.network.state.lock();
            match state.inboxes.get_mut(&self.port) {
                Some(inbox) => inbox.drain(..).collect(),
                None => Vec::new(),
            }
        };

        for datagram in datagrams {
            self.queue.push_datagram(&datagram, self.port);
        }
        Ok(self.queue.len())
    }

    fn has_waiting_messages(&self) -> bool {
        !self.queue.is_empty()
    }

    fn next_message(&mut self) -> Option<OscMessage> {
        self.queue.pop()
    }
}

impl Drop for MemoryReceiver {
    fn drop(&mut self) {
        self.network.state.lock().inboxes.remove(&self.port);
    }
}
