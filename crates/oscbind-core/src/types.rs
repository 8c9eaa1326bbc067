//! Composite value types
//!
//! Plain structured data with a fixed field layout. How each kind is
//! flattened into message arguments lives in `oscbind-binding`.

/// 2-component vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// 3-component vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// 4-component vector
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Rotation quaternion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quat {
    fn default() -> Self {
        Quat::IDENTITY
    }
}

impl Quat {
    pub const IDENTITY: Quat = Quat {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };
}

macro_rules! impl_components {
    ($ty:ident, $n:literal, $($field:ident),+) => {
        impl $ty {
            #[inline]
            pub fn new($($field: f32),+) -> Self {
                $ty { $($field),+ }
            }

            #[inline]
            pub fn to_array(self) -> [f32; $n] {
                [$(self.$field),+]
            }

            #[inline]
            pub fn from_array(a: [f32; $n]) -> Self {
                let [$($field),+] = a;
                $ty { $($field),+ }
            }
        }
    };
}

impl_components!(Vec2, 2, x, y);
impl_components!(Vec3, 3, x, y, z);
impl_components!(Vec4, 4, x, y, z, w);
impl_components!(Quat, 4, x, y, z, w);

/// Channel type of a color
///
/// `OPAQUE` is the alpha used when an incoming color carries no alpha.
pub trait Channel: Copy + PartialEq + Default {
    const OPAQUE: Self;
}

impl Channel for u8 {
    const OPAQUE: u8 = u8::MAX;
}

impl Channel for u16 {
    const OPAQUE: u16 = u16::MAX;
}

impl Channel for f32 {
    const OPAQUE: f32 = 1.0;
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color<T: Channel = u8> {
    pub r: T,
    pub g: T,
    pub b: T,
    pub a: T,
}

/// Normalized floating point color
pub type FloatColor = Color<f32>;

/// 16-bit per channel color
pub type ShortColor = Color<u16>;

impl<T: Channel> Color<T> {
    #[inline]
    pub fn new(r: T, g: T, b: T, a: T) -> Self {
        Color { r, g, b, a }
    }

    /// Opaque color from red, green, blue
    #[inline]
    pub fn rgb(r: T, g: T, b: T) -> Self {
        Color { r, g, b, a: T::OPAQUE }
    }

    /// Opaque gray
    #[inline]
    pub fn gray(v: T) -> Self {
        Color::rgb(v, v, v)
    }
}

impl<T: Channel> Default for Color<T> {
    fn default() -> Self {
        Color::gray(T::default())
    }
}

/// Axis-aligned rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    #[inline]
    pub fn from_array(a: [f32; 4]) -> Self {
        Rect::new(a[0], a[1], a[2], a[3])
    }
}

/// 3x3 matrix, `m[row][col]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3 {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    pub fn from_rows(m: [[f32; 3]; 3]) -> Self {
        Mat3 { m }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Mat3::IDENTITY
    }
}

/// 4x4 matrix, `m[row][col]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub m: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        m: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn from_rows(m: [[f32; 4]; 4]) -> Self {
        Mat4 { m }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Mat4::IDENTITY
    }
}
