//! Endpoint keys
//!
//! One channel exists per key. Outbound channels are keyed by destination
//! host and port, inbound channels by local port only.

use std::fmt;

/// Destination of an outbound channel
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PublisherKey {
    pub host: String,
    pub port: u16,
}

impl PublisherKey {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        PublisherKey {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Debug for PublisherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Publisher({}:{})", self.host, self.port)
    }
}

impl fmt::Display for PublisherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Local port of an inbound channel
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SubscriberKey(pub u16);

impl SubscriberKey {
    #[inline]
    pub fn new(port: u16) -> Self {
        SubscriberKey(port)
    }

    #[inline]
    pub fn port(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for SubscriberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Subscriber(:{})", self.0)
    }
}

impl fmt::Display for SubscriberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}
