// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The data type registry.
//!
//! Every array carries a [`DType`] describing the element type of its buffer.
//! Each dtype has a canonical string name, a one character code, a byte width
//! (`None` for `generic`, which holds values of any kind) and a stable integer
//! enumeration constant used by the binary meta data format.
use std::fmt;
use std::str::FromStr;

use crate::error::{from_kind, ErrorKind, ShapeError};

/// Element data type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DType {
    Bool,
    Int8,
    Uint8,
    /// unsigned 8-bit integer that clamps on assignment
    Uint8c,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float32,
    Float64,
    Complex64,
    Complex128,
    /// boxed values of any kind
    Generic,
}

/// The broad category of a dtype, used by the same-kind casting rule.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DTypeKind {
    Bool,
    UnsignedInteger,
    SignedInteger,
    RealFloat,
    ComplexFloat,
    Generic,
}

static ALL: [DType; 15] = [
    DType::Bool,
    DType::Int8,
    DType::Uint8,
    DType::Uint8c,
    DType::Int16,
    DType::Uint16,
    DType::Int32,
    DType::Uint32,
    DType::Int64,
    DType::Uint64,
    DType::Float32,
    DType::Float64,
    DType::Complex64,
    DType::Complex128,
    DType::Generic,
];

impl DType {
    /// All supported dtypes, in enumeration order.
    pub fn all() -> &'static [DType] {
        &ALL
    }

    /// Canonical name, e.g. `"float64"`.
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Uint8 => "uint8",
            DType::Uint8c => "uint8c",
            DType::Int16 => "int16",
            DType::Uint16 => "uint16",
            DType::Int32 => "int32",
            DType::Uint32 => "uint32",
            DType::Int64 => "int64",
            DType::Uint64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::Generic => "generic",
        }
    }

    /// Look up a dtype by canonical name.
    pub fn from_name(name: &str) -> Option<DType> {
        ALL.iter().copied().find(|dt| dt.name() == name)
    }

    /// Single character code, e.g. `'d'` for `float64`.
    pub fn char(self) -> char {
        match self {
            DType::Bool => 'x',
            DType::Int8 => 's',
            DType::Uint8 => 'b',
            DType::Uint8c => 'a',
            DType::Int16 => 'k',
            DType::Uint16 => 't',
            DType::Int32 => 'i',
            DType::Uint32 => 'u',
            DType::Int64 => 'l',
            DType::Uint64 => 'v',
            DType::Float32 => 'f',
            DType::Float64 => 'd',
            DType::Complex64 => 'c',
            DType::Complex128 => 'z',
            DType::Generic => 'o',
        }
    }

    /// Look up a dtype by its character code.
    pub fn from_char(c: char) -> Option<DType> {
        ALL.iter().copied().find(|dt| dt.char() == c)
    }

    /// Bytes per element; `None` for `generic`.
    pub fn bytes_per_element(self) -> Option<usize> {
        match self {
            DType::Bool | DType::Int8 | DType::Uint8 | DType::Uint8c => Some(1),
            DType::Int16 | DType::Uint16 => Some(2),
            DType::Int32 | DType::Uint32 | DType::Float32 => Some(4),
            DType::Int64 | DType::Uint64 | DType::Float64 | DType::Complex64 => Some(8),
            DType::Complex128 => Some(16),
            DType::Generic => None,
        }
    }

    /// Stable enumeration constant.
    pub fn code(self) -> i16 {
        match self {
            DType::Bool => 0,
            DType::Int8 => 1,
            DType::Uint8 => 2,
            DType::Uint8c => 3,
            DType::Int16 => 4,
            DType::Uint16 => 5,
            DType::Int32 => 6,
            DType::Uint32 => 7,
            DType::Int64 => 8,
            DType::Uint64 => 9,
            DType::Float32 => 16,
            DType::Float64 => 17,
            DType::Complex64 => 20,
            DType::Complex128 => 21,
            DType::Generic => 23,
        }
    }

    /// Inverse of `code`.
    pub fn from_code(code: i16) -> Option<DType> {
        ALL.iter().copied().find(|dt| dt.code() == code)
    }

    pub fn kind(self) -> DTypeKind {
        match self {
            DType::Bool => DTypeKind::Bool,
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64 => DTypeKind::SignedInteger,
            DType::Uint8 | DType::Uint8c | DType::Uint16 | DType::Uint32 | DType::Uint64 => {
                DTypeKind::UnsignedInteger
            }
            DType::Float32 | DType::Float64 => DTypeKind::RealFloat,
            DType::Complex64 | DType::Complex128 => DTypeKind::ComplexFloat,
            DType::Generic => DTypeKind::Generic,
        }
    }

    #[inline]
    pub fn is_integer(self) -> bool {
        matches!(self.kind(), DTypeKind::SignedInteger | DTypeKind::UnsignedInteger)
    }

    #[inline]
    pub fn is_floating_point(self) -> bool {
        matches!(self.kind(), DTypeKind::RealFloat | DTypeKind::ComplexFloat)
    }

    #[inline]
    pub fn is_complex(self) -> bool {
        self.kind() == DTypeKind::ComplexFloat
    }
}

impl Default for DType {
    fn default() -> Self {
        DType::Float64
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::from_name(s).ok_or_else(|| from_kind(ErrorKind::UnknownName))
    }
}

/// Bytes per element for a dtype name; `None` for unknown names and for
/// `generic`.
pub fn bytes_per_element(name: &str) -> Option<usize> {
    DType::from_name(name).and_then(DType::bytes_per_element)
}

/// Enumeration constant for a dtype name.
pub fn dtype_to_enum(name: &str) -> Option<i16> {
    DType::from_name(name).map(DType::code)
}

/// Dtype for an enumeration constant.
pub fn enum_to_dtype(code: i16) -> Option<DType> {
    DType::from_code(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn widths() {
        assert_eq!(bytes_per_element("float64"), Some(8));
        assert_eq!(bytes_per_element("complex128"), Some(16));
        assert_eq!(bytes_per_element("uint8c"), Some(1));
        assert_eq!(bytes_per_element("generic"), None);
        assert_eq!(bytes_per_element("foo"), None);
    }

    #[test]
    fn codes_are_unique_and_invert() {
        assert!(DType::all().iter().map(|dt| dt.code()).all_unique());
        assert!(DType::all().iter().map(|dt| dt.char()).all_unique());
        for &dt in DType::all() {
            assert_eq!(enum_to_dtype(dt.code()), Some(dt));
            assert_eq!(dtype_to_enum(dt.name()), Some(dt.code()));
            assert_eq!(DType::from_char(dt.char()), Some(dt));
            assert_eq!(dt.name().parse::<DType>().unwrap(), dt);
        }
        assert_eq!(enum_to_dtype(-1), None);
        assert_eq!(dtype_to_enum("beep"), None);
    }

    #[test]
    fn kinds() {
        assert_eq!(DType::Uint8c.kind(), DTypeKind::UnsignedInteger);
        assert_eq!(DType::Float32.kind(), DTypeKind::RealFloat);
        assert!(DType::Complex64.is_complex());
        assert!(DType::Int16.is_integer());
        assert!(!DType::Bool.is_integer());
    }
}
