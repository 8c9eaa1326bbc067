//! Endpoint registry and the per-tick update hooks
//!
//! The registry owns every channel. Publishers are keyed by destination
//! `(host, port)` and subscribers by local port, so repeated binds against
//! one endpoint share one connection.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use oscbind_binding::{OscValue, Shared, Source};
use oscbind_core::{OscResult, PublisherKey, SubscriberKey};
use oscbind_transport::{Transport, UdpConfig, UdpTransport};

use crate::{Publisher, Subscriber, SyncConfig, SyncStats};

/// Registry shared with threads other than the one driving updates
pub type SharedRegistry<T = UdpTransport> = Arc<Mutex<Registry<T>>>;

pub struct Registry<T: Transport = UdpTransport> {
    transport: T,
    config: SyncConfig,
    publishers: BTreeMap<PublisherKey, Publisher<T::Sender>>,
    subscribers: BTreeMap<SubscriberKey, Subscriber<T::Receiver>>,
    running: bool,
    /// Registry-level counters (ticks, timing)
    stats: SyncStats,
    /// Counters of channels that have been removed
    retired: SyncStats,
}

impl Registry<UdpTransport> {
    /// Registry over UDP with default configuration
    pub fn new() -> Self {
        Registry::with_config(SyncConfig::default(), UdpConfig::default())
    }

    pub fn with_config(config: SyncConfig, udp: UdpConfig) -> Self {
        Registry::with_transport(UdpTransport::new(udp), config)
    }
}

impl Default for Registry<UdpTransport> {
    fn default() -> Self {
        Registry::new()
    }
}

impl<T: Transport> Registry<T> {
    pub fn with_transport(transport: T, config: SyncConfig) -> Self {
        Registry {
            transport,
            running: config.start_running,
            config,
            publishers: BTreeMap::new(),
            subscribers: BTreeMap::new(),
            stats: SyncStats::default(),
            retired: SyncStats::default(),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_shared(self) -> SharedRegistry<T> {
        Arc::new(Mutex::new(self))
    }

    // ========================================================================
    // Channels
    // ========================================================================

    /// Publisher for `host:port`, connecting on first use
    pub fn publisher_for(&mut self, host: &str, port: u16) -> OscResult<&mut Publisher<T::Sender>> {
        match self.publishers.entry(PublisherKey::new(host, port)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let sender = self.transport.connect(host, port)?;
                let key = entry.key().clone();
                tracing::debug!(dest = %key, "publisher created");
                let publisher = Publisher::new(key, sender)
                    .with_prune_stale(self.config.prune_stale_bindings);
                Ok(entry.insert(publisher))
            }
        }
    }

    /// Subscriber on `port`, binding the port on first use. A port that is
    /// already taken by another socket is reported here.
    pub fn subscriber_for(&mut self, port: u16) -> OscResult<&mut Subscriber<T::Receiver>> {
        match self.subscribers.entry(SubscriberKey::new(port)) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let receiver = self.transport.listen(port)?;
                tracing::debug!(port, "subscriber created");
                let subscriber = Subscriber::new(*entry.key(), receiver)
                    .with_prune_stale(self.config.prune_stale_bindings);
                Ok(entry.insert(subscriber))
            }
        }
    }

    pub fn publisher(&self, host: &str, port: u16) -> Option<&Publisher<T::Sender>> {
        self.publishers.get(&PublisherKey::new(host, port))
    }

    pub fn subscriber(&self, port: u16) -> Option<&Subscriber<T::Receiver>> {
        self.subscribers.get(&SubscriberKey::new(port))
    }

    pub fn publisher_count(&self) -> usize {
        self.publishers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    // ========================================================================
    // Binding API
    // ========================================================================

    pub fn bind_outbound<V: OscValue>(
        &mut self,
        host: &str,
        port: u16,
        address: impl Into<String>,
        source: impl Into<Source<V>>,
        change_filter: bool,
    ) -> OscResult<()> {
        self.publisher_for(host, port)?
            .bind(address, source.into(), change_filter);
        Ok(())
    }

    pub fn bind_inbound<V: OscValue>(
        &mut self,
        port: u16,
        address: impl Into<String>,
        target: &Shared<V>,
    ) -> OscResult<()> {
        self.subscriber_for(port)?.bind(address, target);
        Ok(())
    }

    /// Returns whether a binding was removed. The publisher stays connected.
    pub fn unbind_outbound(&mut self, host: &str, port: u16, address: &str) -> bool {
        self.publishers
            .get_mut(&PublisherKey::new(host, port))
            .map_or(false, |p| p.unbind(address))
    }

    pub fn unbind_inbound(&mut self, port: u16, address: &str) -> bool {
        self.subscribers
            .get_mut(&SubscriberKey::new(port))
            .map_or(false, |s| s.unbind(address))
    }

    /// Remove the subscriber on `port` with all its bindings and release the port
    pub fn unbind_inbound_all(&mut self, port: u16) -> bool {
        match self.subscribers.remove(&SubscriberKey::new(port)) {
            Some(subscriber) => {
                self.retired += subscriber.stats();
                tracing::debug!(port, "subscriber removed");
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Apply every message waiting on subscribed ports. Run this before the
    /// host's own frame logic to see received values in the same frame.
    pub fn update_inbound(&mut self) -> OscResult<()> {
        if !self.running {
            return Ok(());
        }
        for subscriber in self.subscribers.values_mut() {
            subscriber.tick()?;
        }
        Ok(())
    }

    /// Publish every bound source. Run this after the host's frame logic.
    pub fn update_outbound(&mut self) -> OscResult<()> {
        if !self.running {
            return Ok(());
        }
        self.stats.ticks += 1;
        for publisher in self.publishers.values_mut() {
            publisher.tick()?;
        }
        Ok(())
    }

    /// Inbound then outbound, for hosts with a single hook
    pub fn update(&mut self) -> OscResult<()> {
        if !self.running {
            return Ok(());
        }
        let start = Instant::now();
        self.update_inbound()?;
        self.update_outbound()?;
        self.stats.last_tick_duration = start.elapsed();
        Ok(())
    }

    /// Counters summed over every channel, including removed ones
    pub fn stats(&self) -> SyncStats {
        let mut total = self.retired.clone();
        total += &self.stats;
        for publisher in self.publishers.values() {
            total += publisher.stats();
        }
        for subscriber in self.subscribers.values() {
            total += subscriber.stats();
        }
        total.last_tick_duration = self.stats.last_tick_duration;
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oscbind_core::OscError;
    use oscbind_transport::MemoryNetwork;
    use oscbind_wire::{OscArg, OscMessage};

    fn registry() -> (MemoryNetwork, Registry<MemoryNetwork>) {
        let net = MemoryNetwork::recording();
        let registry = Registry::with_transport(net.clone(), SyncConfig::default());
        (net, registry)
    }

    #[test]
    fn test_publisher_dedup() {
        let (net, mut registry) = registry();
        let a = Shared::new(1i32);
        let b = Shared::new(2i32);

        registry.publisher_for("host", 9000).unwrap().bind("/a", Source::shared(&a), false);
        registry.publisher_for("host", 9000).unwrap().bind("/b", Source::shared(&b), false);

        assert_eq!(registry.publisher_count(), 1);
        let publisher = registry.publisher("host", 9000).unwrap();
        assert!(publisher.has("/a") && publisher.has("/b"));

        registry.update().unwrap();
        assert_eq!(net.sent_to("host", 9000).len(), 2);
    }

    #[test]
    fn test_distinct_endpoints() {
        let (_net, mut registry) = registry();
        let v = Shared::new(0.0f32);

        registry.bind_outbound("host", 9000, "/v", &v, true).unwrap();
        registry.bind_outbound("host", 9001, "/v", &v, true).unwrap();
        registry.bind_outbound("other", 9000, "/v", &v, true).unwrap();
        assert_eq!(registry.publisher_count(), 3);
    }

    #[test]
    fn test_subscriber_dedup() {
        let (net, mut registry) = registry();
        let x = Shared::new(0i32);
        let y = Shared::new(0i32);

        registry.bind_inbound(9200, "/x", &x).unwrap();
        registry.bind_inbound(9200, "/y", &y).unwrap();
        assert_eq!(registry.subscriber_count(), 1);

        net.inject(9200, &OscMessage::new("/x").arg(4i32)).unwrap();
        net.inject(9200, &OscMessage::new("/y").arg(5i32)).unwrap();
        registry.update().unwrap();

        assert_eq!((x.get(), y.get()), (4, 5));
    }

    #[test]
    fn test_port_in_use_surfaces() {
        let (mut net, mut registry) = registry();
        let _taken = net.listen(9201).unwrap();
        let x = Shared::new(0i32);

        let err = registry.bind_inbound(9201, "/x", &x).unwrap_err();
        assert!(matches!(err, OscError::AddressInUse(9201)));
        assert_eq!(registry.subscriber_count(), 0);
    }

    #[test]
    fn test_unbind_inbound_all_frees_port() {
        let (net, mut registry) = registry();
        let x = Shared::new(0i32);
        registry.bind_inbound(9202, "/x", &x).unwrap();
        assert!(net.is_listening(9202));

        assert!(registry.unbind_inbound_all(9202));
        assert!(!registry.unbind_inbound_all(9202));
        assert!(!net.is_listening(9202));

        registry.bind_inbound(9202, "/x", &x).unwrap();
        assert_eq!(registry.subscriber_count(), 1);
    }

    #[test]
    fn test_unbind_single_address() {
        let (net, mut registry) = registry();
        let v = Shared::new(1i32);
        registry.bind_outbound("host", 9000, "/a", &v, false).unwrap();
        registry.bind_outbound("host", 9000, "/b", &v, false).unwrap();
        registry.bind_inbound(9203, "/a", &v).unwrap();

        assert!(registry.unbind_outbound("host", 9000, "/a"));
        assert!(!registry.unbind_outbound("host", 9000, "/a"));
        assert!(!registry.unbind_outbound("nobody", 1, "/a"));
        assert!(registry.unbind_inbound(9203, "/a"));
        assert!(!registry.unbind_inbound(9204, "/a"));

        registry.update().unwrap();
        let sent = net.sent_to("host", 9000);
        assert_eq!(sent, vec![OscMessage::new("/b").arg(1i32)]);
    }

    #[test]
    fn test_stopped_registry_is_idle() {
        let net = MemoryNetwork::recording();
        let config = SyncConfig {
            start_running: false,
            ..SyncConfig::default()
        };
        let mut registry = Registry::with_transport(net.clone(), config);
        let v = Shared::new(7i32);
        registry.bind_outbound("host", 9000, "/v", &v, false).unwrap();

        assert!(!registry.is_running());
        registry.update().unwrap();
        assert!(net.sent_to("host", 9000).is_empty());

        registry.start();
        registry.update().unwrap();
        assert_eq!(net.sent_to("host", 9000).len(), 1);

        registry.stop();
        registry.update().unwrap();
        assert!(net.sent_to("host", 9000).is_empty());
        assert_eq!(registry.stats().ticks, 1);
    }

    #[test]
    fn test_inbound_before_outbound() {
        let (net, mut registry) = registry();
        let level = Shared::new(0i32);
        registry.bind_inbound(9205, "/level", &level).unwrap();
        registry.bind_outbound("host", 9000, "/level", &level, true).unwrap();

        net.inject(9205, &OscMessage::new("/level").arg(42i32)).unwrap();
        registry.update().unwrap();

        // Received value is published in the same update
        let sent = net.sent_to("host", 9000);
        assert_eq!(sent[0].args, vec![OscArg::Int32(42)]);
    }

    #[test]
    fn test_stats_aggregate() {
        let (net, mut registry) = registry();
        let v = Shared::new(1i32);
        registry.bind_outbound("host", 9000, "/v", &v, true).unwrap();
        registry.bind_inbound(9206, "/v", &v).unwrap();

        net.inject(9206, &OscMessage::new("/unknown")).unwrap();
        registry.update().unwrap();
        registry.update().unwrap();

        let stats = registry.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.messages_sent, 1);
        assert_eq!(stats.messages_suppressed, 1);
        assert_eq!(stats.messages_received, 1);
        assert_eq!(stats.messages_dropped, 1);

        registry.unbind_inbound_all(9206);
        assert_eq!(registry.stats().messages_received, 1);
    }

    #[test]
    fn test_bad_value_does_not_stall_update() {
        let (net, mut registry) = registry();
        let label = Shared::new(String::from("a\0b"));
        let level = Shared::new(7i32);
        registry.bind_outbound("host", 9000, "/a_label", &label, false).unwrap();
        registry.bind_outbound("host", 9000, "/b_level", &level, false).unwrap();
        registry.bind_outbound("other", 9000, "/level", &level, false).unwrap();

        for _ in 0..3 {
            registry.update().unwrap();
        }

        assert_eq!(net.sent_to("host", 9000).len(), 3);
        assert_eq!(net.sent_to("other", 9000).len(), 3);
        let stats = registry.stats();
        assert_eq!(stats.messages_failed, 3);
        assert_eq!(stats.messages_sent, 6);
    }

    #[test]
    fn test_stale_error_config() {
        let net = MemoryNetwork::recording();
        let config = SyncConfig {
            prune_stale_bindings: false,
            ..SyncConfig::default()
        };
        let mut registry = Registry::with_transport(net, config);
        let v = Shared::new(1i32);
        registry.bind_outbound("host", 9000, "/v", &v, true).unwrap();
        drop(v);

        assert!(matches!(registry.update(), Err(OscError::StaleBinding)));
    }

    #[test]
    fn test_into_shared() {
        let (net, registry) = registry();
        let shared = registry.into_shared();
        let v = Shared::new(3i32);

        let binder = {
            let shared = shared.clone();
            let v = v.clone();
            std::thread::spawn(move || {
                shared
                    .lock()
                    .bind_outbound("host", 9000, "/v", &v, false)
                    .unwrap();
            })
        };
        binder.join().unwrap();

        shared.lock().update().unwrap();
        assert_eq!(net.sent_to("host", 9000).len(), 1);
    }
}
