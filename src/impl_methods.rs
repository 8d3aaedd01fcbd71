// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dimension::{self, numel, shape_to_strides, sub2ind, vind2bind};
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{Buffer, DType, Element, Flags, IndexMode, Ix, Ixs, NdArray, Order, Value};

/// # Accessors
impl NdArray {
    /// Return the data type of the elements.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Return the shape of the array as a slice.
    pub fn shape(&self) -> &[Ix] {
        &self.shape
    }

    /// Return the strides of the array as a slice, in elements.
    pub fn strides(&self) -> &[Ixs] {
        &self.strides
    }

    /// Return the buffer index of the element with all-zero subscripts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Return the number of dimensions (axes) in the array
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Return the number of elements, [`numel`] of the shape. This is zero
    /// for a rank-0 array.
    pub fn len(&self) -> usize {
        numel(&self.shape)
    }

    /// Return whether the shape has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.read_only
    }

    /// Mode used by linear indexing.
    pub fn mode(&self) -> IndexMode {
        self.mode
    }

    /// Per-dimension modes used by subscript indexing.
    pub fn submode(&self) -> &[IndexMode] {
        &self.submode
    }

    /// Return the underlying buffer.
    pub fn data(&self) -> &Buffer {
        &self.data
    }

    /// Bytes per element, `None` for `generic`.
    pub fn bytes_per_element(&self) -> Option<usize> {
        self.dtype.bytes_per_element()
    }

    /// Size of the viewed elements in bytes, `None` for `generic`.
    pub fn byte_length(&self) -> Option<usize> {
        self.bytes_per_element().map(|b| b * self.len())
    }

    /// Return true if both arrays view the same buffer.
    pub fn shares_buffer(&self, other: &NdArray) -> bool {
        self.data.ptr_eq(&other.data)
    }
}

/// # Element access
///
/// The plain accessors are permissive: [`get`](NdArray::get) returns `None`
/// for an index it cannot resolve and [`set`](NdArray::set) ignores writes
/// it cannot perform. The `try_` variants report the reason instead.
impl NdArray {
    /// Return the element at `index`, or `None` if the index cannot be
    /// resolved under the array's subscript modes.
    ///
    /// ```
    /// use ndview::{NdArray, Order, Value};
    ///
    /// let a = NdArray::from_vec(vec![1., 2., 3., 4., 5., 6.], &[2, 3], Order::RowMajor).unwrap();
    /// assert_eq!(a.get(&[0, 0]), Some(Value::Float64(1.)));
    /// assert_eq!(a.get(&[-1, 0]), None);
    /// assert_eq!(a.get(&[0]), None);
    /// ```
    pub fn get(&self, index: &[Ixs]) -> Option<Value> {
        self.try_get(index).ok()
    }

    /// Return the element at `index`.
    ///
    /// **Errors** with `IncompatibleShape` for a wrong number of subscripts
    /// and `IndexOutOfBounds` for a subscript that cannot be resolved.
    pub fn try_get(&self, index: &[Ixs]) -> Result<Value, ShapeError> {
        let i = self.buffer_index(index)?;
        self.data.read(i).ok_or_else(|| from_kind(ErrorKind::OutOfBounds))
    }

    /// Write `value` at `index`, converting it to the array's dtype.
    ///
    /// A write to a read-only array or to an index that cannot be resolved is
    /// silently ignored. Returns `self` for chaining.
    pub fn set<V: Into<Value>>(&self, index: &[Ixs], value: V) -> &Self {
        let _ = self.try_set(index, value);
        self
    }

    /// Write `value` at `index`, converting it to the array's dtype.
    ///
    /// **Errors** with `ReadOnly` for a read-only array and otherwise as
    /// [`try_get`](NdArray::try_get).
    pub fn try_set<V: Into<Value>>(&self, index: &[Ixs], value: V) -> Result<&Self, ShapeError> {
        if self.flags.read_only {
            return Err(from_kind(ErrorKind::ReadOnly));
        }
        let i = self.buffer_index(index)?;
        if self.data.write(i, value.into()) {
            Ok(self)
        } else {
            Err(from_kind(ErrorKind::OutOfBounds))
        }
    }

    /// Return the element at linear view index `idx`, counted in the array's
    /// order, or `None` if it cannot be resolved under the array's mode.
    pub fn iget(&self, idx: Ixs) -> Option<Value> {
        self.try_iget(idx).ok()
    }

    /// Return the element at linear view index `idx`.
    ///
    /// **Errors** with `IndexOutOfBounds` if `idx` cannot be resolved.
    pub fn try_iget(&self, idx: Ixs) -> Result<Value, ShapeError> {
        let i = self.linear_buffer_index(idx)?;
        self.data.read(i).ok_or_else(|| from_kind(ErrorKind::OutOfBounds))
    }

    /// Write `value` at linear view index `idx`; ignored when impossible.
    pub fn iset<V: Into<Value>>(&self, idx: Ixs, value: V) -> &Self {
        let _ = self.try_iset(idx, value);
        self
    }

    /// Write `value` at linear view index `idx`.
    ///
    /// **Errors** with `ReadOnly` for a read-only array and with
    /// `IndexOutOfBounds` if `idx` cannot be resolved.
    pub fn try_iset<V: Into<Value>>(&self, idx: Ixs, value: V) -> Result<&Self, ShapeError> {
        if self.flags.read_only {
            return Err(from_kind(ErrorKind::ReadOnly));
        }
        let i = self.linear_buffer_index(idx)?;
        if self.data.write(i, value.into()) {
            Ok(self)
        } else {
            Err(from_kind(ErrorKind::OutOfBounds))
        }
    }

    fn buffer_index(&self, index: &[Ixs]) -> Result<usize, ShapeError> {
        sub2ind(&self.shape, &self.strides, self.offset, index, &self.submode)
    }

    fn linear_buffer_index(&self, idx: Ixs) -> Result<usize, ShapeError> {
        vind2bind(&self.shape, &self.strides, self.offset, self.order, idx, self.mode)
    }

    /// Return the buffer index of the element at in-bounds subscripts.
    #[inline]
    pub(crate) fn buffer_index_unchecked(&self, index: &[Ix]) -> usize {
        dimension::offset_of(&self.strides, self.offset, index)
    }

    /// Read the element at in-bounds subscripts.
    ///
    /// Returns `None` only if the buffer no longer covers the layout, which
    /// construction rules out since buffers never shrink.
    #[inline]
    pub(crate) fn read_at(&self, index: &[Ix]) -> Option<Value> {
        let value = self.data.read(self.buffer_index_unchecked(index));
        debug_assert!(value.is_some(), "layout escapes the buffer at {:?}", index);
        value
    }
}

/// # Copying
impl NdArray {
    /// Return the elements as values, visiting them in `order`.
    pub fn to_values(&self, order: Order) -> Vec<Value> {
        self.iter_order(order).collect()
    }

    /// Return the elements converted to `T`, visiting them in `order`.
    ///
    /// ```
    /// use ndview::{NdArray, Order};
    ///
    /// let a = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3], Order::RowMajor).unwrap();
    /// assert_eq!(a.to_vec::<i32>(Order::ColumnMajor), [1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn to_vec<T: Element>(&self, order: Order) -> Vec<T> {
        self.iter_order(order).map(T::from_value).collect()
    }

    /// Return a contiguous copy in `order` with a freshly allocated buffer.
    ///
    /// The copy is writable and shares nothing with `self`; it keeps the
    /// dtype, shape and index modes.
    pub fn copy(&self, order: Order) -> NdArray {
        let values = self.to_values(order);
        let strides = shape_to_strides(&self.shape, order);
        NdArray {
            data: Buffer::from_values(self.dtype, &values),
            dtype: self.dtype,
            flags: Flags::compute(&self.shape, &strides, 0, false),
            shape: self.shape.clone(),
            strides,
            offset: 0,
            order,
            mode: self.mode,
            submode: self.submode.clone(),
        }
    }

    /// Return a read-only view of the same elements.
    pub fn to_read_only(&self) -> NdArray {
        self.clone().with_read_only(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ArrayOptions;

    fn arange(n: usize, shape: &[Ix]) -> NdArray {
        NdArray::from_vec((0..n as i32).collect(), shape, Order::RowMajor).unwrap()
    }

    #[test]
    fn accessors() {
        let a = arange(6, &[2, 3]);
        assert_eq!(a.ndim(), 2);
        assert_eq!(a.len(), 6);
        assert_eq!(a.byte_length(), Some(24));
        assert_eq!(a.bytes_per_element(), Some(4));
        assert_eq!(a.offset(), 0);
        assert!(a.shares_buffer(&a.clone()));
        assert!(!a.shares_buffer(&a.copy(Order::RowMajor)));
    }

    #[test]
    fn strict_and_permissive() {
        let a = arange(6, &[2, 3]);
        assert_eq!(a.try_get(&[2, 0]).map_err(|e| e.kind()), Err(ErrorKind::IndexOutOfBounds));
        assert_eq!(a.try_get(&[0]).map_err(|e| e.kind()), Err(ErrorKind::IncompatibleShape));
        assert_eq!(a.get(&[1, 1]), Some(Value::Int32(4)));
        a.set(&[1, 1], 40).set(&[0, 0], -1);
        assert_eq!(a.to_vec::<i32>(Order::RowMajor), [-1, 1, 2, 3, 40, 5]);
        a.set(&[5, 5], 1);
        assert_eq!(a.to_vec::<i32>(Order::RowMajor), [-1, 1, 2, 3, 40, 5]);
    }

    #[test]
    fn reads_follow_the_layout() {
        let buf = Buffer::from_vec((0..6).collect::<Vec<i32>>());
        let a = NdArray::new(DType::Int32, buf, &[2, 3], &[-3, 1], 3, Order::RowMajor).unwrap();
        assert_eq!(a.read_at(&[0, 0]), Some(Value::Int32(3)));
        assert_eq!(a.read_at(&[1, 2]), Some(Value::Int32(2)));
        assert_eq!(a.iter().count(), 6);
        assert_eq!(a.indexed_iter().last(), Some((vec![1, 2], Value::Int32(2))));
    }

    #[test]
    fn read_only_refuses_writes() {
        let a = arange(3, &[3]).to_read_only();
        assert_eq!(a.try_set(&[0], 9).err().map(|e| e.kind()), Some(ErrorKind::ReadOnly));
        assert_eq!(a.try_iset(0, 9).err().map(|e| e.kind()), Some(ErrorKind::ReadOnly));
        a.set(&[0], 9);
        assert_eq!(a.get(&[0]), Some(Value::Int32(0)));
    }

    #[test]
    fn submodes_apply_per_axis() {
        let a = arange(6, &[2, 3])
            .with_array_options(ArrayOptions::new().submode(vec![IndexMode::Wrap, IndexMode::Clamp]));
        // row wraps, column clamps
        assert_eq!(a.get(&[3, 10]), Some(Value::Int32(5)));
        assert_eq!(a.get(&[-2, -10]), Some(Value::Int32(0)));
    }

    #[test]
    fn linear_indexing() {
        let a = arange(6, &[2, 3]);
        assert_eq!(a.iget(4), Some(Value::Int32(4)));
        assert_eq!(a.iget(6), None);
        let w = a.with_array_options(ArrayOptions::new().mode(IndexMode::Wrap));
        assert_eq!(w.iget(7), Some(Value::Int32(1)));
        w.iset(-1, 50);
        assert_eq!(a.get(&[1, 2]), Some(Value::Int32(50)));
    }

    #[test]
    fn rank0() {
        let a = NdArray::from_vec(vec![7u16], &[], Order::RowMajor).unwrap();
        assert_eq!(a.len(), 0);
        assert_eq!(a.get(&[]), Some(Value::Uint16(7)));
        assert_eq!(a.iget(0), Some(Value::Uint16(7)));
        a.set(&[], 8);
        assert_eq!(a.to_vec::<u16>(Order::RowMajor), [8]);
    }

    #[test]
    fn copy_in_other_order() {
        let a = arange(6, &[2, 3]);
        let c = a.copy(Order::ColumnMajor);
        assert_eq!(c.strides(), &[1, 2]);
        assert!(c.flags().column_major_contiguous);
        assert_eq!(c.data().to_vec::<i32>(), [0, 3, 1, 4, 2, 5]);
        assert_eq!(c, a);
        c.set(&[0, 0], 100);
        assert_eq!(a.get(&[0, 0]), Some(Value::Int32(0)));
    }
}
