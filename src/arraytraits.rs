// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::iterators::Iter;
use crate::{Buffer, Element, NdArray, Order, Value};

/// Return `true` if the array shapes and all elements of `self` and
/// `rhs` are equal. Return `false` otherwise.
///
/// Elements are compared as [`Value`]s, so arrays of different dtypes are
/// never equal. Layout and flags are not compared.
impl PartialEq for NdArray {
    fn eq(&self, rhs: &NdArray) -> bool {
        self.shape() == rhs.shape() && self.iter().eq(rhs.iter())
    }
}

impl<'a> IntoIterator for &'a NdArray {
    type Item = Value;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Create a one-dimensional array from a vector (no copying needed).
///
/// ```
/// use ndview::{DType, NdArray};
///
/// let a = NdArray::from(vec![1., 2., 3.]);
/// assert_eq!(a.dtype(), DType::Float64);
/// assert_eq!(a.shape(), &[3]);
/// ```
impl<T: Element> From<Vec<T>> for NdArray {
    fn from(v: Vec<T>) -> Self {
        let len = v.len();
        let data = Buffer::from_vec(v);
        let flags = crate::Flags::compute(&[len], &[1], 0, false);
        NdArray {
            data,
            dtype: T::DTYPE,
            shape: vec![len],
            strides: vec![1],
            offset: 0,
            order: Order::RowMajor,
            flags,
            mode: crate::IndexMode::Throw,
            submode: vec![crate::IndexMode::Throw],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{NdArray, Order, Value};

    #[test]
    fn equality_ignores_layout() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4], &[2, 2], Order::RowMajor).unwrap();
        let b = NdArray::from_vec(vec![1, 3, 2, 4], &[2, 2], Order::ColumnMajor).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, a.transpose());
        assert_ne!(a, NdArray::from(vec![1, 2, 3, 4]));
        let c = NdArray::from_vec(vec![1i64, 2, 3, 4], &[2, 2], Order::RowMajor).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn into_iter_ref() {
        let a = NdArray::from(vec![true, false]);
        let mut n = 0;
        for v in &a {
            assert_eq!(v.dtype(), crate::DType::Bool);
            n += 1;
        }
        assert_eq!(n, 2);
        assert_eq!((&a).into_iter().last(), Some(Value::Bool(false)));
    }
}
