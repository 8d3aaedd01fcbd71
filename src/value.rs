// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use num_complex::{Complex32, Complex64};

use crate::dtype::DType;

/// A single dynamically typed element.
///
/// Values cross the boundary between the typed buffers and the untyped array
/// accessors. Writing a value into a buffer of another dtype converts it with
/// the same rules as an `as` cast; complex values keep their real part when
/// written to a real buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    Int8(i8),
    Uint8(u8),
    Int16(i16),
    Uint16(u16),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Complex64(Complex32),
    Complex128(Complex64),
}

macro_rules! value_from {
    ($($t:ty => $variant:ident,)*) => {
        $(
        impl From<$t> for Value {
            #[inline]
            fn from(x: $t) -> Self {
                Value::$variant(x)
            }
        }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int8,
    u8 => Uint8,
    i16 => Int16,
    u16 => Uint16,
    i32 => Int32,
    u32 => Uint32,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    Complex32 => Complex64,
    Complex64 => Complex128,
}

/// Dispatch on the variant of a real (non complex, non bool) value, binding
/// its payload to `$x`.
macro_rules! with_real {
    ($v:expr, $x:ident => $e:expr, bool $b:ident => $be:expr, complex $c:ident => $ce:expr) => {
        match $v {
            Value::Bool($b) => $be,
            Value::Int8($x) => $e,
            Value::Uint8($x) => $e,
            Value::Int16($x) => $e,
            Value::Uint16($x) => $e,
            Value::Int32($x) => $e,
            Value::Uint32($x) => $e,
            Value::Int64($x) => $e,
            Value::Uint64($x) => $e,
            Value::Float32($x) => $e,
            Value::Float64($x) => $e,
            Value::Complex64($c) => {
                let $c = Complex64::new($c.re as f64, $c.im as f64);
                $ce
            }
            Value::Complex128($c) => $ce,
        }
    };
}

macro_rules! value_as {
    ($($name:ident -> $t:ty,)*) => {
        $(
        /// Convert with `as` cast semantics. Booleans map to 0 or 1 and
        /// complex values keep their real part.
        pub fn $name(self) -> $t {
            with_real!(self, x => x as $t, bool b => b as u8 as $t, complex c => c.re as $t)
        }
        )*
    };
}

impl Value {
    /// The natural dtype of this value.
    pub fn dtype(&self) -> DType {
        match *self {
            Value::Bool(_) => DType::Bool,
            Value::Int8(_) => DType::Int8,
            Value::Uint8(_) => DType::Uint8,
            Value::Int16(_) => DType::Int16,
            Value::Uint16(_) => DType::Uint16,
            Value::Int32(_) => DType::Int32,
            Value::Uint32(_) => DType::Uint32,
            Value::Int64(_) => DType::Int64,
            Value::Uint64(_) => DType::Uint64,
            Value::Float32(_) => DType::Float32,
            Value::Float64(_) => DType::Float64,
            Value::Complex64(_) => DType::Complex64,
            Value::Complex128(_) => DType::Complex128,
        }
    }

    value_as! {
        as_i8 -> i8,
        as_u8 -> u8,
        as_i16 -> i16,
        as_u16 -> u16,
        as_i32 -> i32,
        as_u32 -> u32,
        as_i64 -> i64,
        as_u64 -> u64,
        as_f32 -> f32,
        as_f64 -> f64,
    }

    /// Nonzero test; for complex values either component counts.
    pub fn as_bool(self) -> bool {
        with_real!(self, x => x != (0 as _), bool b => b, complex c => c.re != 0. || c.im != 0.)
    }

    pub fn as_complex64(self) -> Complex64 {
        match self {
            Value::Complex64(c) => Complex64::new(c.re as f64, c.im as f64),
            Value::Complex128(c) => c,
            other => Complex64::new(other.as_f64(), 0.),
        }
    }

    pub fn as_complex32(self) -> Complex32 {
        match self {
            Value::Complex64(c) => c,
            Value::Complex128(c) => Complex32::new(c.re as f32, c.im as f32),
            other => Complex32::new(other.as_f32(), 0.),
        }
    }

    /// Convert to the canonical value of `dtype`. `uint8c` clamps and rounds
    /// half to even; `generic` leaves the value unchanged.
    pub fn cast(self, dtype: DType) -> Value {
        match dtype {
            DType::Bool => Value::Bool(self.as_bool()),
            DType::Int8 => Value::Int8(self.as_i8()),
            DType::Uint8 => Value::Uint8(self.as_u8()),
            DType::Uint8c => Value::Uint8(clamp_u8(self)),
            DType::Int16 => Value::Int16(self.as_i16()),
            DType::Uint16 => Value::Uint16(self.as_u16()),
            DType::Int32 => Value::Int32(self.as_i32()),
            DType::Uint32 => Value::Uint32(self.as_u32()),
            DType::Int64 => Value::Int64(self.as_i64()),
            DType::Uint64 => Value::Uint64(self.as_u64()),
            DType::Float32 => Value::Float32(self.as_f32()),
            DType::Float64 => Value::Float64(self.as_f64()),
            DType::Complex64 => Value::Complex64(self.as_complex32()),
            DType::Complex128 => Value::Complex128(self.as_complex64()),
            DType::Generic => self,
        }
    }
}

/// Clamped conversion to `u8`: saturate to `0..=255`, round half to even,
/// NaN becomes 0.
pub(crate) fn clamp_u8(v: Value) -> u8 {
    match v {
        Value::Uint8(x) => x,
        Value::Bool(b) => b as u8,
        _ => {
            let x = v.as_f64();
            if x.is_nan() || x <= 0. {
                0
            } else if x >= 255. {
                255
            } else {
                let r = x.round();
                // ties go to the even neighbour
                let r = if (x - x.trunc()).abs() == 0.5 && r % 2. != 0. { r - 1. } else { r };
                r as u8
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Value::Bool(x) => fmt::Display::fmt(&x, f),
            Value::Int8(x) => fmt::Display::fmt(&x, f),
            Value::Uint8(x) => fmt::Display::fmt(&x, f),
            Value::Int16(x) => fmt::Display::fmt(&x, f),
            Value::Uint16(x) => fmt::Display::fmt(&x, f),
            Value::Int32(x) => fmt::Display::fmt(&x, f),
            Value::Uint32(x) => fmt::Display::fmt(&x, f),
            Value::Int64(x) => fmt::Display::fmt(&x, f),
            Value::Uint64(x) => fmt::Display::fmt(&x, f),
            Value::Float32(x) => fmt::Display::fmt(&x, f),
            Value::Float64(x) => fmt::Display::fmt(&x, f),
            Value::Complex64(x) => fmt::Display::fmt(&x, f),
            Value::Complex128(x) => fmt::Display::fmt(&x, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_casts() {
        assert_eq!(Value::Float64(3.7).as_i32(), 3);
        assert_eq!(Value::Int32(-1).as_u8(), 255);
        assert_eq!(Value::Bool(true).as_f64(), 1.);
        assert_eq!(Value::Complex128(Complex64::new(2., 5.)).as_f32(), 2.);
        assert!(Value::Complex64(Complex32::new(0., 1.)).as_bool());
        assert!(!Value::Float32(0.).as_bool());
    }

    #[test]
    fn clamped() {
        assert_eq!(clamp_u8(Value::Int32(-5)), 0);
        assert_eq!(clamp_u8(Value::Int32(300)), 255);
        assert_eq!(clamp_u8(Value::Float64(2.5)), 2);
        assert_eq!(clamp_u8(Value::Float64(3.5)), 4);
        assert_eq!(clamp_u8(Value::Float64(f64::NAN)), 0);
        assert_eq!(Value::Float64(1e9).cast(DType::Uint8c), Value::Uint8(255));
    }

    #[test]
    fn cast_to_dtype() {
        assert_eq!(Value::Int8(-3).cast(DType::Float64), Value::Float64(-3.));
        assert_eq!(Value::Int8(-3).cast(DType::Generic), Value::Int8(-3));
        assert_eq!(
            Value::Float32(1.5).cast(DType::Complex128),
            Value::Complex128(Complex64::new(1.5, 0.))
        );
        assert_eq!(Value::Float64(6.).to_string(), "6");
    }
}
