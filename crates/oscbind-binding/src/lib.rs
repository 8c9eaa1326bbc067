//! oscbind Binding Engine - values to argument lists and back
//!
//! This crate implements:
//! - `OscValue`: flattening of scalars, composites and sequences
//! - `Shared`: host-owned values that bindings observe through weak handles
//! - `Source`: direct, accessor-function and bound-method value sources
//! - `Binding`: the type-erased encode/decode unit, with optional change filter

pub mod binding;
pub mod flatten;
pub mod shared;
pub mod source;
pub mod value;

pub use binding::*;
pub use flatten::*;
pub use shared::*;
pub use source::*;
pub use value::*;
