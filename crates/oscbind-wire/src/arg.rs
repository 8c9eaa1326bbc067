//! Typed message arguments

use bytes::Bytes;

/// Wire-level type tag of an argument
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArgTag {
    Int32,
    Int64,
    Float,
    Double,
    String,
    Blob,
    True,
    False,
    Nil,
}

impl ArgTag {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'i' => Some(ArgTag::Int32),
            'h' => Some(ArgTag::Int64),
            'f' => Some(ArgTag::Float),
            'd' => Some(ArgTag::Double),
            's' => Some(ArgTag::String),
            'b' => Some(ArgTag::Blob),
            'T' => Some(ArgTag::True),
            'F' => Some(ArgTag::False),
            'N' => Some(ArgTag::Nil),
            _ => None,
        }
    }

    #[inline]
    pub fn to_char(self) -> char {
        match self {
            ArgTag::Int32 => 'i',
            ArgTag::Int64 => 'h',
            ArgTag::Float => 'f',
            ArgTag::Double => 'd',
            ArgTag::String => 's',
            ArgTag::Blob => 'b',
            ArgTag::True => 'T',
            ArgTag::False => 'F',
            ArgTag::Nil => 'N',
        }
    }

    /// Tags a numeric target can be populated from
    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ArgTag::Int32 | ArgTag::Int64 | ArgTag::Float | ArgTag::Double
        )
    }
}

/// A single primitive argument
#[derive(Clone, Debug, PartialEq)]
pub enum OscArg {
    Int32(i32),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    Blob(Bytes),
    Bool(bool),
    Nil,
}

impl OscArg {
    pub fn tag(&self) -> ArgTag {
        match self {
            OscArg::Int32(_) => ArgTag::Int32,
            OscArg::Int64(_) => ArgTag::Int64,
            OscArg::Float(_) => ArgTag::Float,
            OscArg::Double(_) => ArgTag::Double,
            OscArg::String(_) => ArgTag::String,
            OscArg::Blob(_) => ArgTag::Blob,
            OscArg::Bool(true) => ArgTag::True,
            OscArg::Bool(false) => ArgTag::False,
            OscArg::Nil => ArgTag::Nil,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OscArg::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Bytes> {
        match self {
            OscArg::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl From<i32> for OscArg {
    fn from(v: i32) -> Self {
        OscArg::Int32(v)
    }
}

impl From<i64> for OscArg {
    fn from(v: i64) -> Self {
        OscArg::Int64(v)
    }
}

impl From<f32> for OscArg {
    fn from(v: f32) -> Self {
        OscArg::Float(v)
    }
}

impl From<f64> for OscArg {
    fn from(v: f64) -> Self {
        OscArg::Double(v)
    }
}

impl From<&str> for OscArg {
    fn from(v: &str) -> Self {
        OscArg::String(v.to_owned())
    }
}

impl From<String> for OscArg {
    fn from(v: String) -> Self {
        OscArg::String(v)
    }
}

impl From<Bytes> for OscArg {
    fn from(v: Bytes) -> Self {
        OscArg::Blob(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_chars() {
        for c in ['i', 'h', 'f', 'd', 's', 'b', 'T', 'F', 'N'] {
            let tag = ArgTag::from_char(c).unwrap();
            assert_eq!(tag.to_char(), c);
        }
        assert_eq!(ArgTag::from_char('x'), None);
    }

    #[test]
    fn test_numeric_tags() {
        assert!(OscArg::Int32(1).tag().is_numeric());
        assert!(OscArg::Double(1.0).tag().is_numeric());
        assert!(!OscArg::from("a").tag().is_numeric());
        assert!(!OscArg::Bool(true).tag().is_numeric());
        assert_eq!(OscArg::Bool(false).tag(), ArgTag::False);
    }
}
