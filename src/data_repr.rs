// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_complex::{Complex32, Complex64};

use crate::data_traits::{DataBuffer, Element, Uint8Clamped};
use crate::dtype::DType;
use crate::value::Value;

/// Run `$e` with the element type of `$dtype` bound to the type alias `$T`.
macro_rules! with_element_type {
    ($dtype:expr, $T:ident => $e:expr) => {
        match $dtype {
            DType::Bool => { type $T = bool; $e }
            DType::Int8 => { type $T = i8; $e }
            DType::Uint8 => { type $T = u8; $e }
            DType::Uint8c => { type $T = Uint8Clamped; $e }
            DType::Int16 => { type $T = i16; $e }
            DType::Uint16 => { type $T = u16; $e }
            DType::Int32 => { type $T = i32; $e }
            DType::Uint32 => { type $T = u32; $e }
            DType::Int64 => { type $T = i64; $e }
            DType::Uint64 => { type $T = u64; $e }
            DType::Float32 => { type $T = f32; $e }
            DType::Float64 => { type $T = f64; $e }
            DType::Complex64 => { type $T = Complex32; $e }
            DType::Complex128 => { type $T = Complex64; $e }
            DType::Generic => { type $T = Value; $e }
        }
    };
}

/// A typed, shared, linear data buffer.
///
/// Cloning a `Buffer` is cheap and yields a handle to the *same* storage;
/// this is how array views alias their base. Writes through any handle are
/// visible through all of them.
#[derive(Clone)]
pub struct Buffer {
    inner: Rc<RefCell<Box<dyn DataBuffer>>>,
}

impl Buffer {
    /// Wrap typed storage.
    pub fn from_data<B>(data: B) -> Self
    where
        B: DataBuffer + 'static,
    {
        Buffer {
            inner: Rc::new(RefCell::new(Box::new(data))),
        }
    }

    /// Wrap a vector of elements.
    pub fn from_vec<T: Element>(v: Vec<T>) -> Self {
        Self::from_data(v)
    }

    /// A buffer of `len` zeros (`false` for `bool`).
    pub fn zeros(dtype: DType, len: usize) -> Self {
        with_element_type!(dtype, T => {
            let zero = T::from_value(Value::Float64(0.));
            Self::from_vec(vec![zero; len])
        })
    }

    /// A buffer holding `values` converted to `dtype`.
    pub fn from_values(dtype: DType, values: &[Value]) -> Self {
        with_element_type!(dtype, T => {
            Self::from_vec(values.iter().map(|&v| T::from_value(v)).collect::<Vec<T>>())
        })
    }

    pub fn dtype(&self) -> DType {
        self.inner.borrow().dtype()
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.inner.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read element `i`, or `None` if out of bounds.
    #[inline]
    pub fn read(&self, i: usize) -> Option<Value> {
        self.inner.borrow().read(i)
    }

    /// Write element `i`, converting to the buffer's dtype. Return false if
    /// `i` is out of bounds.
    #[inline]
    pub fn write(&self, i: usize, value: Value) -> bool {
        self.inner.borrow_mut().write(i, value)
    }

    /// Return true if both handles refer to the same storage.
    pub fn ptr_eq(&self, other: &Buffer) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// All elements as values, in storage order.
    pub fn to_values(&self) -> Vec<Value> {
        let data = self.inner.borrow();
        (0..data.len()).filter_map(|i| data.read(i)).collect()
    }

    /// All elements converted to `T`, in storage order.
    pub fn to_vec<T: Element>(&self) -> Vec<T> {
        let data = self.inner.borrow();
        (0..data.len()).filter_map(|i| data.read(i)).map(T::from_value).collect()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("dtype", &self.dtype())
            .field("len", &self.len())
            .finish()
    }
}

impl<T: Element> From<Vec<T>> for Buffer {
    fn from(v: Vec<T>) -> Self {
        Buffer::from_vec(v)
    }
}
