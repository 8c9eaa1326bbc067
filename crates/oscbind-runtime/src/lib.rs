//! oscbind Runtime - channels, registry and the per-tick update hooks
//!
//! Each update cycle runs in two phases:
//! 1. Inbound: every subscriber drains the messages already waiting on its
//!    port and decodes them into bound targets
//! 2. Outbound: every publisher encodes its bound sources and sends one
//!    message per address, skipping unchanged values when filtered
//!
//! Whether the host runs its own frame logic between the two phases decides
//! if received values are visible in the same frame.

pub mod config;
pub mod publisher;
pub mod registry;
pub mod stats;
pub mod subscriber;

pub use config::*;
pub use publisher::*;
pub use registry::*;
pub use stats::*;
pub use subscriber::*;

pub use oscbind_binding::{binding, Binding, OscValue, Shared, Source};
pub use oscbind_core::{
    Color, FloatColor, Mat3, Mat4, OscError, OscResult, PublisherKey, Quat, Rect, ShortColor,
    SubscriberKey, Vec2, Vec3, Vec4,
};
pub use oscbind_transport::{MemoryNetwork, Transport, UdpConfig, UdpTransport};
pub use oscbind_wire::{OscArg, OscMessage};
