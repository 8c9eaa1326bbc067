//! Composite flattening
//!
//! Field order per kind:
//!
//! | Kind                  | Order                                   |
//! |-----------------------|-----------------------------------------|
//! | `Vec2`                | x, y                                    |
//! | `Vec3`                | x, y, z                                 |
//! | `Vec4` / `Quat`       | x, y, z, w                              |
//! | `Color`               | r, g, b, a                              |
//! | `Rect`                | x, y, width, height                     |
//! | `Mat3`                | 9 elements, row-major                   |
//! | `Mat4`                | 16 elements, column-outer / row-inner   |
//! | `[T; N]`, `Vec<T>`    | elements in index order                 |

use oscbind_core::{Channel, Color, Mat3, Mat4, Quat, Rect, Vec2, Vec3, Vec4};
use oscbind_wire::OscArg;

use crate::OscValue;

/// Append every item in order
pub fn encode_all<T: OscValue>(items: &[T], out: &mut Vec<OscArg>) {
    for item in items {
        item.encode(out);
    }
}

/// Populate leading items from consecutive `T::WIDTH`-sized chunks.
/// Items beyond the available arguments are left untouched.
pub fn decode_leading<T: OscValue>(items: &mut [T], args: &[OscArg]) {
    let width = T::WIDTH.max(1);
    for (item, chunk) in items.iter_mut().zip(args.chunks(width)) {
        item.decode(chunk);
    }
}

/// Number of `T` values carried by `len` arguments (a partial chunk counts)
#[inline]
pub fn element_count<T: OscValue>(len: usize) -> usize {
    let width = T::WIDTH.max(1);
    (len + width - 1) / width
}

/// `(row, col)` cells of a 4x4 matrix in wire order
pub fn mat4_cells() -> impl Iterator<Item = (usize, usize)> {
    (0..4).flat_map(|col| (0..4).map(move |row| (row, col)))
}

/// Populate a color from 1 (gray), 3 (rgb) or 4 (rgba) arguments.
/// Other counts, or a single non-numeric argument, leave the color untouched.
pub fn decode_color<T: Channel + OscValue>(color: &mut Color<T>, args: &[OscArg]) {
    match args.len() {
        1 if !args[0].tag().is_numeric() => {}
        1 => {
            color.r.decode(args);
            color.g.decode(args);
            color.b.decode(args);
            color.a = T::OPAQUE;
        }
        3 => {
            color.r.decode(&args[0..1]);
            color.g.decode(&args[1..2]);
            color.b.decode(&args[2..3]);
            color.a = T::OPAQUE;
        }
        4 => {
            color.r.decode(&args[0..1]);
            color.g.decode(&args[1..2]);
            color.b.decode(&args[2..3]);
            color.a.decode(&args[3..4]);
        }
        n => tracing::trace!(args = n, "color needs 1, 3 or 4 arguments"),
    }
}

macro_rules! impl_fixed_composite {
    ($($ty:ident => $n:literal),*) => {$(
        impl OscValue for $ty {
            const WIDTH: usize = $n;

            fn encode(&self, out: &mut Vec<OscArg>) {
                encode_all(&self.to_array(), out);
            }

            fn decode(&mut self, args: &[OscArg]) {
                let mut fields = self.to_array();
                decode_leading(&mut fields, args);
                *self = $ty::from_array(fields);
            }
        }
    )*};
}

impl_fixed_composite!(Vec2 => 2, Vec3 => 3, Vec4 => 4, Quat => 4, Rect => 4);

impl<T: Channel + OscValue> OscValue for Color<T> {
    const WIDTH: usize = 4;

    fn encode(&self, out: &mut Vec<OscArg>) {
        encode_all(&[self.r, self.g, self.b, self.a], out);
    }

    fn decode(&mut self, args: &[OscArg]) {
        decode_color(self, args);
    }
}

impl OscValue for Mat3 {
    const WIDTH: usize = 9;

    fn encode(&self, out: &mut Vec<OscArg>) {
        for row in &self.m {
            encode_all(row, out);
        }
    }

    fn decode(&mut self, args: &[OscArg]) {
        for (row, chunk) in self.m.iter_mut().zip(args.chunks(3)) {
            decode_leading(row, chunk);
        }
    }
}

impl OscValue for Mat4 {
    const WIDTH: usize = 16;

    fn encode(&self, out: &mut Vec<OscArg>) {
        for (row, col) in mat4_cells() {
            self.m[row][col].encode(out);
        }
    }

    fn decode(&mut self, args: &[OscArg]) {
        for ((row, col), arg) in mat4_cells().zip(args.chunks(1)) {
            self.m[row][col].decode(arg);
        }
    }
}

impl<T: OscValue, const N: usize> OscValue for [T; N] {
    const WIDTH: usize = T::WIDTH * N;

    fn encode(&self, out: &mut Vec<OscArg>) {
        encode_all(self, out);
    }

    fn decode(&mut self, args: &[OscArg]) {
        decode_leading(self, args);
    }
}

/// Sequences grow to fit the incoming element count but never shrink
impl<T: OscValue + Default> OscValue for Vec<T> {
    const WIDTH: usize = 0;

    fn encode(&self, out: &mut Vec<OscArg>) {
        encode_all(self, out);
    }

    fn decode(&mut self, args: &[OscArg]) {
        let incoming = element_count::<T>(args.len());
        if self.len() < incoming {
            self.resize(incoming, T::default());
        }
        decode_leading(self, args);
    }
}
