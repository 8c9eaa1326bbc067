//! Value sources a binding can wrap

use std::fmt;

use oscbind_core::{OscError, OscResult};
use oscbind_wire::OscArg;

use crate::{OscValue, Shared, WeakShared};

/// Where a binding reads (and possibly writes) its value
///
/// Only `Shared` sources can be written to; decoding into an accessor is a
/// no-op.
pub enum Source<T> {
    /// A host variable, observed through a weak handle
    Shared(WeakShared<T>),
    /// A zero-argument accessor, called on every encode
    Getter(fn() -> T),
    /// An accessor bound to an owning object; `None` once the owner is gone
    Method(Box<dyn Fn() -> Option<T> + Send + Sync>),
}

impl<T: OscValue> Source<T> {
    pub fn shared(value: &Shared<T>) -> Self {
        Source::Shared(value.downgrade())
    }

    pub fn getter(f: fn() -> T) -> Self {
        Source::Getter(f)
    }

    /// Call `getter` on `owner` every encode
    pub fn method<U>(owner: &Shared<U>, getter: fn(&U) -> T) -> Self
    where
        U: Send + Sync + 'static,
    {
        let owner = owner.downgrade();
        Source::Method(Box::new(move || {
            owner.upgrade().map(|o| getter(&o.read()))
        }))
    }

    /// Whether decode can write to this source
    pub fn is_writable(&self) -> bool {
        matches!(self, Source::Shared(_))
    }

    /// Current value
    pub fn fetch(&self) -> OscResult<T> {
        match self {
            Source::Shared(weak) => weak
                .upgrade()
                .map(|v| v.get())
                .ok_or(OscError::StaleBinding),
            Source::Getter(f) => Ok(f()),
            Source::Method(f) => f().ok_or(OscError::StaleBinding),
        }
    }

    /// Flatten the current value
    pub fn encode(&self, out: &mut Vec<OscArg>) -> OscResult<()> {
        match self {
            // Encode under the read lock rather than cloning first
            Source::Shared(weak) => {
                let value = weak.upgrade().ok_or(OscError::StaleBinding)?;
                value.read().encode(out);
                Ok(())
            }
            _ => {
                self.fetch()?.encode(out);
                Ok(())
            }
        }
    }

    /// Populate the target from `args`
    pub fn decode(&self, args: &[OscArg]) -> OscResult<()> {
        match self {
            Source::Shared(weak) => {
                let value = weak.upgrade().ok_or(OscError::StaleBinding)?;
                value.write().decode(args);
                Ok(())
            }
            _ => {
                tracing::trace!("decode on a read-only source ignored");
                Ok(())
            }
        }
    }
}

impl<T: OscValue> From<&Shared<T>> for Source<T> {
    fn from(value: &Shared<T>) -> Self {
        Source::shared(value)
    }
}

impl<T> fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Shared(weak) => write!(f, "Source::Shared({:?})", weak),
            Source::Getter(_) => write!(f, "Source::Getter"),
            Source::Method(_) => write!(f, "Source::Method"),
        }
    }
}
