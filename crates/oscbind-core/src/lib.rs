//! oscbind Core - Fundamental types shared by every layer
//!
//! This crate defines:
//! - The error taxonomy (wire, transport, binding)
//! - Endpoint keys used to deduplicate connections
//! - Composite value types (vectors, colors, rectangles, matrices)

pub mod endpoint;
pub mod error;
pub mod types;

pub use endpoint::*;
pub use error::*;
pub use types::*;
