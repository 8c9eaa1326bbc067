//! Outbound channel

use std::collections::BTreeMap;

use oscbind_binding::{binding, Binding, OscValue, Source};
use oscbind_core::{OscError, OscResult, PublisherKey};
use oscbind_transport::MessageSender;
use oscbind_wire::OscMessage;

use crate::SyncStats;

/// One outbound connection plus the sources published through it
///
/// Addresses are kept sorted, so every tick sends in the same order.
pub struct Publisher<S> {
    key: PublisherKey,
    sender: S,
    bindings: BTreeMap<String, Box<dyn Binding>>,
    prune_stale: bool,
    stats: SyncStats,
}

impl<S: MessageSender> Publisher<S> {
    pub fn new(key: PublisherKey, sender: S) -> Self {
        Publisher {
            key,
            sender,
            bindings: BTreeMap::new(),
            prune_stale: true,
            stats: SyncStats::default(),
        }
    }

    pub fn with_prune_stale(mut self, prune: bool) -> Self {
        self.prune_stale = prune;
        self
    }

    pub fn key(&self) -> &PublisherKey {
        &self.key
    }

    /// Publish `source` at `address`, replacing any previous binding there
    pub fn bind<T: OscValue>(
        &mut self,
        address: impl Into<String>,
        source: Source<T>,
        change_filter: bool,
    ) {
        self.bind_binding(address, binding(source, change_filter));
    }

    pub fn bind_binding(&mut self, address: impl Into<String>, binding: Box<dyn Binding>) {
        let address = address.into();
        if self.bindings.insert(address.clone(), binding).is_some() {
            tracing::debug!(dest = %self.key, %address, "publisher binding replaced");
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

    /// Encode every binding and send one message per address that produced
    /// arguments. A value that cannot be encoded is skipped for this tick;
    /// transport errors abort the tick.
    pub fn tick(&mut self) -> OscResult<()> {
        let mut stale = Vec::new();

        for (address, binding) in self.bindings.iter_mut() {
            let args = match binding.encode() {
                Ok(Some(args)) => args,
                Ok(None) => {
                    self.stats.messages_suppressed += 1;
                    continue;
                }
                Err(OscError::StaleBinding) if self.prune_stale => {
                    stale.push(address.clone());
                    continue;
                }
                Err(e) => return Err(e),
            };

            let msg = OscMessage::with_args(address.clone(), args);
            match self.sender.send(&msg) {
                Ok(()) => {
                    binding.confirm();
                    self.stats.messages_sent += 1;
                    tracing::trace!(dest = %self.key, %address, "message sent");
                }
                Err(e) if e.is_transport() => return Err(e),
                Err(e) => {
                    self.stats.messages_failed += 1;
                    tracing::warn!(dest = %self.key, %address, "message not sent: {}", e);
                }
            }
        }

        for address in stale {
            tracing::warn!(dest = %self.key, %address, "source dropped, unbinding");
            self.bindings.remove(&address);
            self.stats.stale_pruned += 1;
        }

        Ok(())
    }
}
