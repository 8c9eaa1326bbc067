//! Error types for oscbind

use thiserror::Error;

/// Core oscbind errors
#[derive(Error, Debug)]
pub enum OscError {
    // Wire errors
    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    #[error("Buffer too short: expected {expected}, got {actual}")]
    BufferTooShort { expected: usize, actual: usize },

    #[error("Unknown type tag: {0:?}")]
    UnknownTypeTag(char),

    #[error("Packet too large: {size} > {max}")]
    PacketTooLarge { size: usize, max: usize },

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Port {0} is already in use")]
    AddressInUse(u16),

    #[error("Cannot resolve host: {0}")]
    UnresolvedHost(String),

    // Binding errors
    #[error("Bound value no longer exists")]
    StaleBinding,
}

impl OscError {
    /// Whether this error comes from the transport rather than a binding or the codec
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            OscError::TransportError(_) | OscError::AddressInUse(_) | OscError::UnresolvedHost(_)
        )
    }
}

/// Result type for oscbind operations
pub type OscResult<T> = Result<T, OscError>;
