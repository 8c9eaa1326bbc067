//! OSC message: an address plus an ordered argument list

use crate::{ArgTag, OscArg};

/// A single addressed message
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OscMessage {
    /// Address pattern (e.g. `/mixer/fader/1`)
    pub address: String,
    /// Arguments in wire order
    pub args: Vec<OscArg>,
}

impl OscMessage {
    pub fn new(address: impl Into<String>) -> Self {
        OscMessage {
            address: address.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(address: impl Into<String>, args: Vec<OscArg>) -> Self {
        OscMessage {
            address: address.into(),
            args,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn args(&self) -> &[OscArg] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Tag of the argument at `index`, if present
    pub fn arg_tag(&self, index: usize) -> Option<ArgTag> {
        self.args.get(index).map(OscArg::tag)
    }

    /// Append an argument (builder style)
    pub fn arg(mut self, arg: impl Into<OscArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn push(&mut self, arg: impl Into<OscArg>) {
        self.args.push(arg.into());
    }

    /// The `,ifs...` type tag string
    pub fn type_tags(&self) -> String {
        let mut tags = String::with_capacity(self.args.len() + 1);
        tags.push(',');
        tags.extend(self.args.iter().map(|a| a.tag().to_char()));
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_builder() {
        let msg = OscMessage::new("/a/b").arg(1i32).arg(2.5f32).arg("x");

        assert_eq!(msg.address(), "/a/b");
        assert_eq!(msg.len(), 3);
        assert_eq!(msg.type_tags(), ",ifs");
        assert_eq!(msg.arg_tag(1), Some(ArgTag::Float));
        assert_eq!(msg.arg_tag(3), None);
    }
}
