//! Type-erased bindings

use oscbind_core::OscResult;
use oscbind_wire::OscArg;

use crate::{OscValue, Source};

/// One value source that can be flattened into arguments and populated from them
pub trait Binding: Send {
    /// Flatten the current value. `None` means nothing needs sending.
    fn encode(&mut self) -> OscResult<Option<Vec<OscArg>>>;

    /// The arguments from the last `encode` were sent
    fn confirm(&mut self) {}

    /// Populate the bound target. Read-only sources ignore this.
    fn decode(&mut self, args: &[OscArg]) -> OscResult<()>;
}

/// Binding that encodes on every call
pub struct ValueBinding<T> {
    source: Source<T>,
}

impl<T: OscValue> ValueBinding<T> {
    pub fn new(source: Source<T>) -> Self {
        ValueBinding { source }
    }

    pub fn source(&self) -> &Source<T> {
        &self.source
    }
}

impl<T: OscValue> Binding for ValueBinding<T> {
    fn encode(&mut self) -> OscResult<Option<Vec<OscArg>>> {
        let mut out = Vec::with_capacity(T::WIDTH.max(1));
        self.source.encode(&mut out)?;
        Ok(Some(out))
    }

    fn decode(&mut self, args: &[OscArg]) -> OscResult<()> {
        self.source.decode(args)
    }
}

/// Binding that suppresses encoding while the value equals the last one sent
///
/// Values compare structurally; blobs compare by length and content. An
/// encoded value only becomes the last one sent once `confirm` is called.
pub struct ChangeFilter<T> {
    source: Source<T>,
    last: Option<T>,
    pending: Option<T>,
}

impl<T: OscValue> ChangeFilter<T> {
    pub fn new(source: Source<T>) -> Self {
        ChangeFilter {
            source,
            last: None,
            pending: None,
        }
    }

    /// Forget the cached value so the next encode always produces arguments
    pub fn reset(&mut self) {
        self.last = None;
        self.pending = None;
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

impl<T: OscValue> Binding for ChangeFilter<T> {
    fn encode(&mut self) -> OscResult<Option<Vec<OscArg>>> {
        let current = self.source.fetch()?;
        if self.last.as_ref() == Some(&current) {
            return Ok(None);
        }
        let args = current.to_args();
        self.pending = Some(current);
        Ok(Some(args))
    }

    fn confirm(&mut self) {
        if let Some(sent) = self.pending.take() {
            self.last = Some(sent);
        }
    }

    fn decode(&mut self, args: &[OscArg]) -> OscResult<()> {
        self.source.decode(args)
    }
}

/// Box a source, with or without the change filter
pub fn binding<T: OscValue>(source: Source<T>, change_filter: bool) -> Box<dyn Binding> {
    if change_filter {
        Box::new(ChangeFilter::new(source))
    } else {
        Box::new(ValueBinding::new(source))
    }
}
