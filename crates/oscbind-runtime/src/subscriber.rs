//! Inbound channel

use std::collections::BTreeMap;

use oscbind_binding::{Binding, OscValue, Shared, Source, ValueBinding};
use oscbind_core::{OscError, OscResult, SubscriberKey};
use oscbind_transport::MessageReceiver;

use crate::SyncStats;

/// One listening port plus the targets its addresses write into
pub struct Subscriber<R> {
    key: SubscriberKey,
    receiver: R,
    bindings: BTreeMap<String, Box<dyn Binding>>,
    prune_stale: bool,
    stats: SyncStats,
}

impl<R: MessageReceiver> Subscriber<R> {
    pub fn new(key: SubscriberKey, receiver: R) -> Self {
        Subscriber {
            key,
            receiver,
            bindings: BTreeMap::new(),
            prune_stale: true,
            stats: SyncStats::default(),
        }
    }

    pub fn with_prune_stale(mut self, prune: bool) -> Self {
        self.prune_stale = prune;
        self
    }

    pub fn key(&self) -> SubscriberKey {
        self.key
    }

    pub fn port(&self) -> u16 {
        self.key.port()
    }

    /// Write arguments received at `address` into `target`, replacing any
    /// previous binding there
    pub fn bind<T: OscValue>(&mut self, address: impl Into<String>, target: &Shared<T>) {
        self.bind_binding(address, Box::new(ValueBinding::new(Source::shared(target))));
    }

    pub fn bind_binding(&mut self, address: impl Into<String>, binding: Box<dyn Binding>) {
        let address = address.into();
        if self.bindings.insert(address.clone(), binding).is_some() {
            tracing::debug!(port = self.key.port(), %address, "subscriber binding replaced");
        }
    }

    pub fn unbind(&mut self, address: &str) -> bool {
        self.bindings.remove(address).is_some()
    }

    pub fn unbind_all(&mut self) {
        self.bindings.clear();
    }

    pub fn has_any(&self) -> bool {
        !self.bindings.is_empty()
    }

    pub fn has(&self, address: &str) -> bool {
        self.bindings.contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Drain the messages waiting at the start of this tick and apply them
    /// in arrival order. Messages that arrive meanwhile wait for the next tick.
    pub fn tick(&mut self) -> OscResult<()> {
        let pending = self.receiver.poll()?;

        for _ in 0..pending {
            let Some(msg) = self.receiver.next_message() else {
                break;
            };
            self.stats.messages_received += 1;

            let Some(binding) = self.bindings.get_mut(msg.address()) else {
                self.stats.messages_dropped += 1;
                tracing::trace!(port = self.key.port(), address = msg.address(), "no binding, dropped");
                continue;
            };

            match binding.decode(msg.args()) {
                Ok(()) => self.stats.messages_applied += 1,
                Err(OscError::StaleBinding) if self.prune_stale => {
                    tracing::warn!(port = self.key.port(), address = msg.address(), "target dropped, unbinding");
                    self.bindings.remove(msg.address());
                    self.stats.messages_dropped += 1;
                    self.stats.stale_pruned += 1;
                }
                Err(e) if e.is_transport() || matches!(e, OscError::StaleBinding) => return Err(e),
                Err(e) => {
                    tracing::warn!(port = self.key.port(), address = msg.address(), "message not applied: {}", e);
                    self.stats.messages_dropped += 1;
                }
            }
        }

        Ok(())
    }
}
