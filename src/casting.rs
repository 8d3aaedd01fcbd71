// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Casting policies and type promotion.
//!
//! All answers come from fixed tables over the closed set of [`DType`]s;
//! nothing here looks at runtime values except [`min_dtype`].
use std::fmt;
use std::str::FromStr;

use num_traits::NumCast;

use crate::dtype::{DType, DTypeKind};
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::value::Value;

/// Casting policy.
///
/// The policies are nested: every cast allowed under one policy is also
/// allowed under all policies further down the list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum CastingMode {
    /// Only identical dtypes.
    None,
    /// Identical byte layout: the same dtype, or `uint8` and `uint8c`.
    Equiv,
    /// No loss of precision or range.
    #[default]
    Safe,
    /// Safe casts plus narrowing within a kind, or widening to a higher kind.
    SameKind,
    /// Anything.
    Unsafe,
}

impl CastingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CastingMode::None => "none",
            CastingMode::Equiv => "equiv",
            CastingMode::Safe => "safe",
            CastingMode::SameKind => "same-kind",
            CastingMode::Unsafe => "unsafe",
        }
    }
}

impl fmt::Display for CastingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CastingMode {
    type Err = ShapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(CastingMode::None),
            "equiv" => Ok(CastingMode::Equiv),
            "safe" => Ok(CastingMode::Safe),
            "same-kind" => Ok(CastingMode::SameKind),
            "unsafe" => Ok(CastingMode::Unsafe),
            _ => Err(from_kind(ErrorKind::UnknownName)),
        }
    }
}

use self::DType::*;

/// Dtypes that `from` can be cast to without loss.
pub fn safe_casts(from: DType) -> &'static [DType] {
    match from {
        Bool => &[Bool, Generic],
        Int8 => &[Int8, Int16, Int32, Int64, Float32, Float64, Complex64, Complex128, Generic],
        Uint8 | Uint8c => &[
            Uint8, Uint8c, Int16, Uint16, Int32, Uint32, Int64, Uint64, Float32, Float64,
            Complex64, Complex128, Generic,
        ],
        Int16 => &[Int16, Int32, Int64, Float32, Float64, Complex64, Complex128, Generic],
        Uint16 => &[
            Uint16, Int32, Uint32, Int64, Uint64, Float32, Float64, Complex64, Complex128,
            Generic,
        ],
        Int32 => &[Int32, Int64, Float64, Complex128, Generic],
        Uint32 => &[Uint32, Int64, Uint64, Float64, Complex128, Generic],
        Int64 => &[Int64, Generic],
        Uint64 => &[Uint64, Generic],
        Float32 => &[Float32, Float64, Complex64, Complex128, Generic],
        Float64 => &[Float64, Complex128, Generic],
        Complex64 => &[Complex64, Complex128, Generic],
        Complex128 => &[Complex128, Generic],
        Generic => &[Generic],
    }
}

fn kind_rank(kind: DTypeKind) -> Option<u8> {
    match kind {
        DTypeKind::UnsignedInteger => Some(0),
        DTypeKind::SignedInteger => Some(1),
        DTypeKind::RealFloat => Some(2),
        DTypeKind::ComplexFloat => Some(3),
        DTypeKind::Bool | DTypeKind::Generic => None,
    }
}

fn same_kind_cast(from: DType, to: DType) -> bool {
    if safe_casts(from).contains(&to) {
        return true;
    }
    match (kind_rank(from.kind()), kind_rank(to.kind())) {
        (Some(a), Some(b)) => a <= b,
        _ => false,
    }
}

/// Dtypes that `from` can be cast to under the same-kind policy.
pub fn same_kind_casts(from: DType) -> Vec<DType> {
    DType::all()
        .iter()
        .copied()
        .filter(|&to| same_kind_cast(from, to))
        .collect()
}

/// Return true if `from` may be cast to `to` under `mode`.
pub fn can_cast(from: DType, to: DType, mode: CastingMode) -> bool {
    match mode {
        CastingMode::None => from == to,
        CastingMode::Equiv => {
            from == to || matches!((from, to), (Uint8, Uint8c) | (Uint8c, Uint8))
        }
        CastingMode::Safe => safe_casts(from).contains(&to),
        CastingMode::SameKind => same_kind_cast(from, to),
        CastingMode::Unsafe => true,
    }
}

// Candidate results of promotion, smallest first.
static PROMOTION_LADDER: [DType; 14] = [
    Bool, Int8, Uint8, Uint8c, Int16, Uint16, Int32, Uint32, Float32, Int64, Uint64, Float64,
    Complex64, Complex128,
];

/// The smallest dtype both `a` and `b` can be safely cast to.
///
/// `generic` absorbs everything. Returns `None` when no such dtype exists,
/// for example `int64` with `uint64`, or `bool` with any numeric type.
pub fn promote(a: DType, b: DType) -> Option<DType> {
    if a == b {
        return Some(a);
    }
    if a == Generic || b == Generic {
        return Some(Generic);
    }
    let (sa, sb) = (safe_casts(a), safe_casts(b));
    PROMOTION_LADDER
        .iter()
        .copied()
        .find(|dt| sa.contains(dt) && sb.contains(dt))
}

fn fits<T: NumCast, S: num_traits::ToPrimitive + Copy>(x: S) -> bool {
    <T as NumCast>::from(x).is_some()
}

fn min_integer_dtype(x: i128) -> DType {
    if x >= 0 {
        if fits::<u8, _>(x) {
            Uint8
        } else if fits::<u16, _>(x) {
            Uint16
        } else if fits::<u32, _>(x) {
            Uint32
        } else if fits::<u64, _>(x) {
            Uint64
        } else {
            Float64
        }
    } else if fits::<i8, _>(x) {
        Int8
    } else if fits::<i16, _>(x) {
        Int16
    } else if fits::<i32, _>(x) {
        Int32
    } else if fits::<i64, _>(x) {
        Int64
    } else {
        Float64
    }
}

fn min_float_dtype(x: f64) -> DType {
    if x.is_finite() && x.fract() == 0. && x.abs() < 2f64.powi(63) {
        return min_integer_dtype(x as i128);
    }
    if !x.is_finite() || (x as f32) as f64 == x {
        Float32
    } else {
        Float64
    }
}

/// The smallest dtype that can represent `value` exactly.
///
/// Nonnegative integers prefer unsigned types, negative integers signed
/// types; integral floats are treated like integers.
pub fn min_dtype(value: &Value) -> DType {
    match *value {
        Value::Bool(_) => Bool,
        Value::Float32(x) => min_float_dtype(x as f64),
        Value::Float64(x) => min_float_dtype(x),
        Value::Complex64(_) => Complex64,
        Value::Complex128(c) => {
            if (c.re as f32) as f64 == c.re && (c.im as f32) as f64 == c.im {
                Complex64
            } else {
                Complex128
            }
        }
        Value::Int64(x) => min_integer_dtype(x as i128),
        Value::Uint64(x) => min_integer_dtype(x as i128),
        other => min_integer_dtype(other.as_i64() as i128),
    }
}

/// The next larger dtype of the same kind, or `None` at the top of a kind.
pub fn next_dtype(dtype: DType) -> Option<DType> {
    match dtype {
        Int8 => Some(Int16),
        Int16 => Some(Int32),
        Int32 => Some(Int64),
        Uint8 | Uint8c => Some(Uint16),
        Uint16 => Some(Uint32),
        Uint32 => Some(Uint64),
        Float32 => Some(Float64),
        Complex64 => Some(Complex128),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_are_nested() {
        let modes = [
            CastingMode::None,
            CastingMode::Equiv,
            CastingMode::Safe,
            CastingMode::SameKind,
            CastingMode::Unsafe,
        ];
        for &from in DType::all() {
            for &to in DType::all() {
                for w in modes.windows(2) {
                    if can_cast(from, to, w[0]) {
                        assert!(can_cast(from, to, w[1]), "{} -> {} {}", from, to, w[1]);
                    }
                }
            }
        }
    }

    #[test]
    fn safe_examples() {
        assert!(can_cast(Int8, Float32, CastingMode::Safe));
        assert!(!can_cast(Int32, Float32, CastingMode::Safe));
        assert!(!can_cast(Float64, Float32, CastingMode::Safe));
        assert!(can_cast(Float64, Float32, CastingMode::SameKind));
        assert!(can_cast(Int16, Float32, CastingMode::SameKind));
        assert!(!can_cast(Float32, Int16, CastingMode::SameKind));
        assert!(!can_cast(Bool, Int8, CastingMode::SameKind));
        assert!(can_cast(Uint8, Uint8c, CastingMode::Equiv));
        assert!(!can_cast(Int8, Uint8, CastingMode::Equiv));
        assert!(can_cast(Generic, Bool, CastingMode::Unsafe));
    }

    #[test]
    fn promotion() {
        assert_eq!(promote(Int8, Uint8), Some(Int16));
        assert_eq!(promote(Int32, Float32), Some(Float64));
        assert_eq!(promote(Uint16, Int16), Some(Int32));
        assert_eq!(promote(Float32, Complex64), Some(Complex64));
        assert_eq!(promote(Float64, Complex64), Some(Complex128));
        assert_eq!(promote(Int64, Uint64), None);
        assert_eq!(promote(Bool, Int8), None);
        assert_eq!(promote(Bool, Generic), Some(Generic));
        for &a in DType::all() {
            for &b in DType::all() {
                assert_eq!(promote(a, b), promote(b, a));
            }
        }
    }

    #[test]
    fn minimal_dtypes() {
        assert_eq!(min_dtype(&Value::Int32(3)), Uint8);
        assert_eq!(min_dtype(&Value::Int32(-3)), Int8);
        assert_eq!(min_dtype(&Value::Int64(300)), Uint16);
        assert_eq!(min_dtype(&Value::Int64(-40000)), Int32);
        assert_eq!(min_dtype(&Value::Float64(1.5)), Float32);
        assert_eq!(min_dtype(&Value::Float64(0.1)), Float64);
        assert_eq!(min_dtype(&Value::Float64(256.)), Uint16);
        assert_eq!(min_dtype(&Value::Bool(true)), Bool);
    }

    #[test]
    fn next() {
        assert_eq!(next_dtype(Uint8c), Some(Uint16));
        assert_eq!(next_dtype(Int32), Some(Int64));
        assert_eq!(next_dtype(Int64), None);
        assert_eq!(next_dtype(Float64), None);
        assert_eq!(same_kind_casts(Float64), [Float32, Float64, Complex64, Complex128, Generic]);
    }
}
