//! Packet encoding for the OSC 1.0 wire format
//!
//! All numbers are big-endian and every field is padded to 4 bytes.
//! - Message: `[address][,tags][arg data]`
//! - Bundle:  `[#bundle][timetag:8]([size:4][element])*`

use bytes::{Buf, BufMut, Bytes, BytesMut};

use oscbind_core::{OscError, OscResult};

use crate::{ArgTag, OscArg, OscMessage};

/// Largest datagram we will produce (UDP payload limit over IPv4)
pub const MAX_PACKET_SIZE: usize = 65_507;

/// Bundle marker string
pub const BUNDLE_TAG: &str = "#bundle";

/// Time tag meaning "process immediately"
pub const IMMEDIATE: u64 = 1;

/// Nesting limit for bundles inside bundles
pub const MAX_BUNDLE_DEPTH: usize = 8;

/// A decoded or to-be-encoded packet
#[derive(Clone, Debug, PartialEq)]
pub enum OscPacket {
    Message(OscMessage),
    Bundle(OscBundle),
}

/// A time-tagged group of packets
#[derive(Clone, Debug, PartialEq)]
pub struct OscBundle {
    pub timetag: u64,
    pub content: Vec<OscPacket>,
}

impl OscBundle {
    pub fn new(content: Vec<OscPacket>) -> Self {
        OscBundle {
            timetag: IMMEDIATE,
            content,
        }
    }

    /// Flatten into messages, depth first, in order
    pub fn into_messages(self) -> Vec<OscMessage> {
        let mut out = Vec::new();
        flatten_into(OscPacket::Bundle(self), &mut out);
        out
    }
}

fn flatten_into(packet: OscPacket, out: &mut Vec<OscMessage>) {
    match packet {
        OscPacket::Message(msg) => out.push(msg),
        OscPacket::Bundle(bundle) => {
            for p in bundle.content {
                flatten_into(p, out);
            }
        }
    }
}

#[inline]
fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn put_osc_string(buf: &mut BytesMut, s: &str) -> OscResult<()> {
    if s.as_bytes().contains(&0) {
        return Err(OscError::InvalidWireFormat(
            "String contains NUL byte".into(),
        ));
    }
    let total = padded(s.len() + 1);
    buf.put_slice(s.as_bytes());
    buf.put_bytes(0, total - s.len());
    Ok(())
}

fn put_message(buf: &mut BytesMut, msg: &OscMessage) -> OscResult<()> {
    put_osc_string(buf, &msg.address)?;
    put_osc_string(buf, &msg.type_tags())?;

    for arg in &msg.args {
        match arg {
            OscArg::Int32(v) => buf.put_i32(*v),
            OscArg::Int64(v) => buf.put_i64(*v),
            OscArg::Float(v) => buf.put_f32(*v),
            OscArg::Double(v) => buf.put_f64(*v),
            OscArg::String(s) => put_osc_string(buf, s)?,
            OscArg::Blob(b) => {
                buf.put_i32(b.len() as i32);
                buf.put_slice(b);
                buf.put_bytes(0, padded(b.len()) - b.len());
            }
            OscArg::Bool(_) | OscArg::Nil => {}
        }
    }
    Ok(())
}

fn put_packet(buf: &mut BytesMut, packet: &OscPacket) -> OscResult<()> {
    match packet {
        OscPacket::Message(msg) => put_message(buf, msg),
        OscPacket::Bundle(bundle) => {
            put_osc_string(buf, BUNDLE_TAG)?;
            buf.put_u64(bundle.timetag);
            for element in &bundle.content {
                let mut inner = BytesMut::new();
                put_packet(&mut inner, element)?;
                buf.put_i32(inner.len() as i32);
                buf.put_slice(&inner);
            }
            Ok(())
        }
    }
}

fn check_size(buf: BytesMut) -> OscResult<Bytes> {
    if buf.len() > MAX_PACKET_SIZE {
        return Err(OscError::PacketTooLarge {
            size: buf.len(),
            max: MAX_PACKET_SIZE,
        });
    }
    Ok(buf.freeze())
}

/// Encode a single message into one datagram
pub fn encode_message(msg: &OscMessage) -> OscResult<Bytes> {
    let mut buf = BytesMut::with_capacity(64);
    put_message(&mut buf, msg)?;
    check_size(buf)
}

/// Encode a message or bundle into one datagram
pub fn encode_packet(packet: &OscPacket) -> OscResult<Bytes> {
    let mut buf = BytesMut::with_capacity(128);
    put_packet(&mut buf, packet)?;
    check_size(buf)
}

/// Bounds-checked reader over a datagram
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Reader { buf }
    }

    fn need(&self, n: usize) -> OscResult<()> {
        if self.buf.remaining() < n {
            return Err(OscError::BufferTooShort {
                expected: n,
                actual: self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn is_empty(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn i32(&mut self) -> OscResult<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    fn i64(&mut self) -> OscResult<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    fn u64(&mut self) -> OscResult<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    fn f32(&mut self) -> OscResult<f32> {
        self.need(4)?;
        Ok(self.buf.get_f32())
    }

    fn f64(&mut self) -> OscResult<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64())
    }

    fn bytes(&mut self, n: usize) -> OscResult<&'a [u8]> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn string(&mut self) -> OscResult<String> {
        let nul = self
            .buf
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| OscError::InvalidWireFormat("Unterminated string".into()))?;
        let raw = self.bytes(padded(nul + 1))?;
        std::str::from_utf8(&raw[..nul])
            .map(str::to_owned)
            .map_err(|_| OscError::InvalidWireFormat("String is not UTF-8".into()))
    }

    fn blob(&mut self) -> OscResult<Bytes> {
        let len = self.i32()?;
        if len < 0 {
            return Err(OscError::InvalidWireFormat("Negative blob size".into()));
        }
        let len = len as usize;
        let raw = self.bytes(padded(len))?;
        Ok(Bytes::copy_from_slice(&raw[..len]))
    }
}

fn read_message(r: &mut Reader<'_>, address: String) -> OscResult<OscMessage> {
    let mut msg = OscMessage::new(address);

    // Messages without a tag string are legal in OSC 1.0 and carry no arguments
    if r.is_empty() {
        return Ok(msg);
    }

    let tags = r.string()?;
    let mut chars = tags.chars();
    if chars.next() != Some(',') {
        return Err(OscError::InvalidWireFormat(
            "Type tag string must start with ','".into(),
        ));
    }

    for c in chars {
        let tag = ArgTag::from_char(c).ok_or(OscError::UnknownTypeTag(c))?;
        let arg = match tag {
            ArgTag::Int32 => OscArg::Int32(r.i32()?),
            ArgTag::Int64 => OscArg::Int64(r.i64()?),
            ArgTag::Float => OscArg::Float(r.f32()?),
            ArgTag::Double => OscArg::Double(r.f64()?),
            ArgTag::String => OscArg::String(r.string()?),
            ArgTag::Blob => OscArg::Blob(r.blob()?),
            ArgTag::True => OscArg::Bool(true),
            ArgTag::False => OscArg::Bool(false),
            ArgTag::Nil => OscArg::Nil,
        };
        msg.args.push(arg);
    }

    Ok(msg)
}

fn read_packet(buf: &[u8], depth: usize) -> OscResult<OscPacket> {
    if buf.len() % 4 != 0 {
        return Err(OscError::InvalidWireFormat(format!(
            "Packet size {} is not a multiple of 4",
            buf.len()
        )));
    }

    let mut r = Reader::new(buf);
    let head = r.string()?;

    if head != BUNDLE_TAG {
        if !head.starts_with('/') {
            return Err(OscError::InvalidWireFormat(format!(
                "Address must start with '/': {:?}",
                head
            )));
        }
        return read_message(&mut r, head).map(OscPacket::Message);
    }

    if depth >= MAX_BUNDLE_DEPTH {
        return Err(OscError::InvalidWireFormat("Bundles nested too deep".into()));
    }

    let timetag = r.u64()?;
    let mut content = Vec::new();
    while !r.is_empty() {
        let size = r.i32()?;
        if size < 0 {
            return Err(OscError::InvalidWireFormat(
                "Negative bundle element size".into(),
            ));
        }
        let element = r.bytes(size as usize)?;
        content.push(read_packet(element, depth + 1)?);
    }

    Ok(OscPacket::Bundle(OscBundle { timetag, content }))
}

/// Decode one datagram
pub fn decode_packet(buf: &[u8]) -> OscResult<OscPacket> {
    read_packet(buf, 0)
}

/// Decode one datagram, flattening any bundles into their messages
pub fn decode_messages(buf: &[u8]) -> OscResult<Vec<OscMessage>> {
    let mut out = Vec::new();
    flatten_into(decode_packet(buf)?, &mut out);
    Ok(out)
}
