// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The element and storage traits for ndview

use std::fmt;

use num_complex::{Complex32, Complex64};

use crate::dtype::DType;
use crate::value::{clamp_u8, Value};

/// An element type that can be stored in a typed buffer.
///
/// Each element type corresponds to exactly one [`DType`]. Conversions go
/// through [`Value`], so any value can be written into any buffer.
pub trait Element: Copy + fmt::Debug + 'static {
    /// The dtype of buffers holding this element type.
    const DTYPE: DType;

    fn into_value(self) -> Value;

    fn from_value(v: Value) -> Self;
}

/// An unsigned 8-bit integer that clamps instead of wrapping when assigned.
///
/// This is the element type of `uint8c` buffers.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uint8Clamped(pub u8);

macro_rules! impl_element {
    ($($t:ty => $dtype:ident, $conv:ident;)*) => {
        $(
        impl Element for $t {
            const DTYPE: DType = DType::$dtype;

            #[inline]
            fn into_value(self) -> Value {
                Value::from(self)
            }

            #[inline]
            fn from_value(v: Value) -> Self {
                v.$conv()
            }
        }
        )*
    };
}

impl_element! {
    bool => Bool, as_bool;
    i8 => Int8, as_i8;
    u8 => Uint8, as_u8;
    i16 => Int16, as_i16;
    u16 => Uint16, as_u16;
    i32 => Int32, as_i32;
    u32 => Uint32, as_u32;
    i64 => Int64, as_i64;
    u64 => Uint64, as_u64;
    f32 => Float32, as_f32;
    f64 => Float64, as_f64;
    Complex32 => Complex64, as_complex32;
    Complex64 => Complex128, as_complex64;
}

impl Element for Uint8Clamped {
    const DTYPE: DType = DType::Uint8c;

    #[inline]
    fn into_value(self) -> Value {
        Value::Uint8(self.0)
    }

    #[inline]
    fn from_value(v: Value) -> Self {
        Uint8Clamped(clamp_u8(v))
    }
}

/// `generic` buffers store values as they are given.
impl Element for Value {
    const DTYPE: DType = DType::Generic;

    #[inline]
    fn into_value(self) -> Value {
        self
    }

    #[inline]
    fn from_value(v: Value) -> Self {
        v
    }
}

/// Typed linear storage behind a [`Buffer`](crate::Buffer).
///
/// ***Note:*** `DataBuffer` is not an extension interface at this point. It
/// is public because it appears in the signature of `Buffer::from_data`.
pub trait DataBuffer: fmt::Debug {
    /// The dtype of the stored elements.
    fn dtype(&self) -> DType;

    /// Number of stored elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i`, `None` past the end.
    fn read(&self, i: usize) -> Option<Value>;

    /// Write element `i`, converting `value` to the element type. Return
    /// false when `i` is past the end.
    fn write(&mut self, i: usize, value: Value) -> bool;

    private_decl! {}
}

impl<T: Element> DataBuffer for Vec<T> {
    #[inline]
    fn dtype(&self) -> DType {
        T::DTYPE
    }

    #[inline]
    fn len(&self) -> usize {
        Vec::len(self)
    }

    #[inline]
    fn read(&self, i: usize) -> Option<Value> {
        self.get(i).map(|x| x.into_value())
    }

    #[inline]
    fn write(&mut self, i: usize, value: Value) -> bool {
        match self.get_mut(i) {
            Some(slot) => {
                *slot = T::from_value(value);
                true
            }
            None => false,
        }
    }

    private_impl! {}
}
