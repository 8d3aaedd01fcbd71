// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::iter::FusedIterator;

use crate::{Ix, NdArray, Order, Value};

/// Base for array iterators: an odometer over the shape.
#[derive(Clone, Debug)]
struct Baseiter<'a> {
    array: &'a NdArray,
    index: Option<Vec<Ix>>,
    order: Order,
    remaining: usize,
}

impl<'a> Baseiter<'a> {
    fn new(array: &'a NdArray, order: Order) -> Baseiter<'a> {
        let shape = array.shape();
        let index = if shape.iter().any(|&d| d == 0) {
            None
        } else {
            Some(vec![0; shape.len()])
        };
        let remaining = if index.is_none() { 0 } else { shape.iter().product() };
        Baseiter { array, index, order, remaining }
    }

    #[inline]
    fn next(&mut self) -> Option<Vec<Ix>> {
        let index = self.index.take()?;
        let mut next = index.clone();
        let more = match self.order {
            Order::RowMajor => next_for(self.array.shape(), &mut next, true),
            Order::ColumnMajor => next_for(self.array.shape(), &mut next, false),
        };
        if more {
            self.index = Some(next);
        }
        self.remaining -= 1;
        Some(index)
    }

    fn stop(&mut self) {
        self.index = None;
        self.remaining = 0;
    }
}

/// Advance `index` by one step within `shape`, last axis fastest when
/// `rev` is set. Return false if iteration is done.
#[inline]
fn next_for(shape: &[Ix], index: &mut [Ix], rev: bool) -> bool {
    let step = |(&dim, ix): (&Ix, &mut Ix)| {
        *ix += 1;
        if *ix == dim {
            *ix = 0;
            false
        } else {
            true
        }
    };
    let mut pairs = shape.iter().zip(index.iter_mut());
    if rev {
        pairs.rev().any(|p| step(p))
    } else {
        pairs.any(|p| step(p))
    }
}

/// An iterator over the elements of an array, yielding `Value`s.
///
/// Created with [`NdArray::iter`], [`NdArray::iter_order`] and
/// [`NdArray::iter_memory_order`].
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    inner: Baseiter<'a>,
}

/// An iterator over the subscripts and elements of an array.
///
/// Created with [`NdArray::indexed_iter`].
#[derive(Clone, Debug)]
pub struct IndexedIter<'a> {
    inner: Baseiter<'a>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = Value;

    #[inline]
    fn next(&mut self) -> Option<Value> {
        let index = self.inner.next()?;
        let value = self.inner.array.read_at(&index);
        if value.is_none() {
            self.inner.stop();
        }
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl<'a> ExactSizeIterator for Iter<'a> {}
impl<'a> FusedIterator for Iter<'a> {}

impl<'a> Iterator for IndexedIter<'a> {
    type Item = (Vec<Ix>, Value);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let index = self.inner.next()?;
        match self.inner.array.read_at(&index) {
            Some(value) => Some((index, value)),
            None => {
                self.inner.stop();
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.inner.remaining, Some(self.inner.remaining))
    }
}

impl<'a> ExactSizeIterator for IndexedIter<'a> {}
impl<'a> FusedIterator for IndexedIter<'a> {}

/// # Iteration
///
/// A rank-0 array yields its single element; an array with a zero-length
/// axis yields nothing.
impl NdArray {
    /// Return an iterator over the elements in logical order, the last axis
    /// varying fastest.
    ///
    /// ```
    /// use ndview::{NdArray, Order, Value};
    ///
    /// let a = NdArray::from_vec(vec![1u8, 2, 3, 4], &[2, 2], Order::ColumnMajor).unwrap();
    /// let v: Vec<Value> = a.iter().collect();
    /// assert_eq!(v, [Value::Uint8(1), Value::Uint8(3), Value::Uint8(2), Value::Uint8(4)]);
    /// ```
    pub fn iter(&self) -> Iter<'_> {
        self.iter_order(Order::RowMajor)
    }

    /// Return an iterator over the elements with axes advancing in `order`.
    pub fn iter_order(&self, order: Order) -> Iter<'_> {
        Iter { inner: Baseiter::new(self, order) }
    }

    /// Return an iterator over the elements in the order they are laid out
    /// in memory when the array is contiguous, and in the array's declared
    /// order otherwise.
    pub fn iter_memory_order(&self) -> Iter<'_> {
        let flags = self.flags();
        let order = if flags.row_major_contiguous {
            Order::RowMajor
        } else if flags.column_major_contiguous {
            Order::ColumnMajor
        } else {
            self.order()
        };
        self.iter_order(order)
    }

    /// Return an iterator of subscripts and elements in logical order.
    pub fn indexed_iter(&self) -> IndexedIter<'_> {
        IndexedIter { inner: Baseiter::new(self, Order::RowMajor) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn odometer() {
        let mut index = vec![0, 2];
        assert!(next_for(&[2, 3], &mut index, true));
        assert_eq!(index, [1, 0]);
        let mut index = vec![1, 2];
        assert!(!next_for(&[2, 3], &mut index, true));
        assert_eq!(index, [0, 0]);
        let mut index = vec![1, 0];
        assert!(next_for(&[2, 3], &mut index, false));
        assert_eq!(index, [0, 1]);
        assert!(!next_for(&[], &mut [], true));
    }

    #[test]
    fn indexed_cover_shape() {
        let a = NdArray::from_vec((0..24).collect::<Vec<i64>>(), &[2, 3, 4], Order::RowMajor).unwrap();
        let it = a.indexed_iter();
        assert_eq!(it.len(), 24);
        let indices = it.map(|(i, _)| i).collect::<Vec<_>>();
        let expected = (0..2usize).cartesian_product(0..3usize).cartesian_product(0..4usize)
                             .map(|((i, j), k)| vec![i, j, k])
                             .collect::<Vec<_>>();
        assert_eq!(indices, expected);
        for (i, v) in a.indexed_iter() {
            assert_eq!(Some(v), a.get(&i.iter().map(|&x| x as isize).collect::<Vec<_>>()));
        }
    }

    #[test]
    fn memory_order() {
        let a = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3], Order::ColumnMajor).unwrap();
        assert_eq!(a.iter_memory_order().map(|v| v.as_i32()).collect_vec(), [1, 2, 3, 4, 5, 6]);
        assert_eq!(a.iter().map(|v| v.as_i32()).collect_vec(), [1, 3, 5, 2, 4, 6]);
    }

    #[test]
    fn degenerate() {
        let z = NdArray::from_vec(vec![5i8], &[], Order::RowMajor).unwrap();
        let mut it = z.iter();
        assert_eq!(it.size_hint(), (1, Some(1)));
        assert_eq!(it.next(), Some(Value::Int8(5)));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
        let e = NdArray::zeros(crate::DType::Int8, &[3, 0], Order::RowMajor).unwrap();
        assert_eq!(e.iter().count(), 0);
    }
}
