//! Scalar values and the flattening trait

use bytes::Bytes;

use oscbind_wire::OscArg;

/// A value that can be written to and read from an argument list
///
/// Decoding never fails: arguments with an unexpected tag leave the target
/// untouched, and missing arguments leave the corresponding fields untouched.
pub trait OscValue: Clone + PartialEq + Send + Sync + 'static {
    /// Arguments one value occupies; 0 when the length comes from the message
    const WIDTH: usize;

    /// Append this value's arguments
    fn encode(&self, out: &mut Vec<OscArg>);

    /// Populate this value from leading arguments
    fn decode(&mut self, args: &[OscArg]);

    fn to_args(&self) -> Vec<OscArg> {
        let mut out = Vec::with_capacity(Self::WIDTH.max(1));
        self.encode(&mut out);
        out
    }
}

/// Conversion from a numeric argument, chosen by the argument's tag
pub trait FromNumber: Sized {
    fn from_arg(arg: &OscArg) -> Option<Self>;
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {$(
        impl FromNumber for $t {
            #[inline]
            fn from_arg(arg: &OscArg) -> Option<Self> {
                match *arg {
                    OscArg::Int32(v) => Some(v as $t),
                    OscArg::Int64(v) => Some(v as $t),
                    OscArg::Float(v) => Some(v as $t),
                    OscArg::Double(v) => Some(v as $t),
                    _ => None,
                }
            }
        }
    )*};
}

impl_from_number!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl FromNumber for bool {
    #[inline]
    fn from_arg(arg: &OscArg) -> Option<Self> {
        match *arg {
            OscArg::Int32(v) => Some(v != 0),
            OscArg::Int64(v) => Some(v != 0),
            OscArg::Float(v) => Some(v != 0.0),
            OscArg::Double(v) => Some(v != 0.0),
            _ => None,
        }
    }
}

#[inline]
fn decode_number<T: FromNumber>(target: &mut T, args: &[OscArg]) {
    if let Some(v) = args.first().and_then(T::from_arg) {
        *target = v;
    }
}

macro_rules! impl_scalar {
    ($variant:ident as $wire:ty: $($t:ty),*) => {$(
        impl OscValue for $t {
            const WIDTH: usize = 1;

            #[inline]
            fn encode(&self, out: &mut Vec<OscArg>) {
                out.push(OscArg::$variant(*self as $wire));
            }

            #[inline]
            fn decode(&mut self, args: &[OscArg]) {
                decode_number(self, args);
            }
        }
    )*};
}

impl_scalar!(Int32 as i32: i8, u8, i16, u16, i32, u32);
impl_scalar!(Int64 as i64: i64, u64);
impl_scalar!(Float as f32: f32);
// f64 keeps full precision as `d`. Peers that only read i/h/f/s/b ignore
// it; bind an f32 when such peers must receive the value.
impl_scalar!(Double as f64: f64);

impl OscValue for bool {
    const WIDTH: usize = 1;

    fn encode(&self, out: &mut Vec<OscArg>) {
        out.push(OscArg::Int32(*self as i32));
    }

    fn decode(&mut self, args: &[OscArg]) {
        decode_number(self, args);
    }
}

impl OscValue for String {
    const WIDTH: usize = 1;

    fn encode(&self, out: &mut Vec<OscArg>) {
        out.push(OscArg::String(self.clone()));
    }

    fn decode(&mut self, args: &[OscArg]) {
        if let Some(s) = args.first().and_then(OscArg::as_str) {
            self.clear();
            self.push_str(s);
        }
    }
}

/// Blobs travel as one opaque argument and compare by content
impl OscValue for Bytes {
    const WIDTH: usize = 1;

    fn encode(&self, out: &mut Vec<OscArg>) {
        out.push(OscArg::Blob(self.clone()));
    }

    fn decode(&mut self, args: &[OscArg]) {
        if let Some(b) = args.first().and_then(OscArg::as_blob) {
            *self = b.clone();
        }
    }
}
