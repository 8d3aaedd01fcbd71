// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods that derive new views of an array's buffer.

use crate::dimension::{broadcast_shapes, broadcast_strides, reshape_strides, shape_to_strides};
use crate::error::{self, from_kind, ErrorKind, ShapeError};
use crate::slice::slice_layout;
use crate::{Ix, Ixs, NdArray, Slice, SliceArg};

/// What [`NdArray::reshape`] does when the new shape cannot be expressed
/// over the existing layout.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReshapeCopy {
    /// Fail with `IncompatibleLayout`.
    #[default]
    Never,
    /// Copy the elements into a fresh buffer and reshape the copy.
    IfNeeded,
}

/// # Views
///
/// All methods in this section return a new array sharing the buffer of
/// `self`, except [`reshape`](NdArray::reshape) with
/// [`ReshapeCopy::IfNeeded`] when a copy is unavoidable. Flags are recomputed
/// for the new layout and the read-only flag is inherited.
impl NdArray {
    /// Return a sliced view of the array.
    ///
    /// See [*Slicing*](crate::s!) for full documentation.
    /// Integer arguments remove their axis, slices keep it.
    ///
    /// With `strict`, out-of-bounds indices and slice bounds are errors;
    /// otherwise slice bounds are clamped and an out-of-bounds index gives an
    /// empty view.
    ///
    /// **Errors** with `IncompatibleShape` if the number of arguments does
    /// not match the rank, `InvalidSlice` for a zero step or a second
    /// ellipsis, and `IndexOutOfBounds` for out-of-bounds arguments in strict
    /// mode.
    ///
    /// ```
    /// use ndview::{s, NdArray, Order, Value};
    ///
    /// let a = NdArray::from_vec((0..24).collect::<Vec<i32>>(), &[2, 3, 4], Order::RowMajor).unwrap();
    /// let v = a.slice(&s![1, .., -1], false).unwrap();
    /// assert_eq!(v.shape(), &[3]);
    /// assert_eq!(v.to_vec::<i32>(Order::RowMajor), [15, 19, 23]);
    /// ```
    pub fn slice(&self, args: &[SliceArg], strict: bool) -> Result<NdArray, ShapeError> {
        let (shape, strides, offset) =
            slice_layout(&self.shape, &self.strides, self.offset, args, strict).map_err(|e| {
                tracing::debug!(shape = ?self.shape, ?args, strict, error = %e, "rejected slice");
                e
            })?;
        Ok(self.with_layout(shape, strides, offset))
    }

    /// Return a view starting each axis at the given index; `None` keeps the
    /// whole axis.
    ///
    /// **Errors** as [`slice`](NdArray::slice).
    pub fn slice_from(&self, starts: &[Option<isize>], strict: bool) -> Result<NdArray, ShapeError> {
        let args = starts.iter()
                         .map(|&start| SliceArg::Slice(Slice::new(start, None, None)))
                         .collect::<Vec<_>>();
        self.slice(&args, strict)
    }

    /// Return a view ending each axis before the given index; `None` keeps
    /// the whole axis.
    ///
    /// **Errors** as [`slice`](NdArray::slice).
    pub fn slice_to(&self, stops: &[Option<isize>], strict: bool) -> Result<NdArray, ShapeError> {
        let args = stops.iter()
                        .map(|&stop| SliceArg::Slice(Slice::new(None, stop, None)))
                        .collect::<Vec<_>>();
        self.slice(&args, strict)
    }

    /// Return a view sliced along `axis` only.
    ///
    /// **Errors** with `InvalidAxis` if `axis` is out of bounds, and
    /// otherwise as [`slice`](NdArray::slice).
    pub fn slice_dimension(&self, axis: usize, slice: Slice, strict: bool)
        -> Result<NdArray, ShapeError>
    {
        self.check_axis(axis)?;
        let args = (0..self.ndim())
            .map(|ax| if ax == axis { SliceArg::Slice(slice) } else { SliceArg::from(..) })
            .collect::<Vec<_>>();
        self.slice(&args, strict)
    }

    /// Return a view of `axis` from `start` on, other axes untouched.
    ///
    /// ```
    /// use ndview::{NdArray, Order};
    ///
    /// let a = NdArray::from_vec(vec![1., 2., 3., 4., 5., 6.], &[3, 2], Order::RowMajor).unwrap();
    /// let b = a.slice_dimension_from(0, 1, false).unwrap();
    /// assert_eq!(b.to_vec::<f64>(Order::RowMajor), [3., 4., 5., 6.]);
    /// ```
    pub fn slice_dimension_from(&self, axis: usize, start: isize, strict: bool)
        -> Result<NdArray, ShapeError>
    {
        self.slice_dimension(axis, Slice::new(Some(start), None, None), strict)
    }

    /// Return a view of `axis` truncated before `stop`, other axes untouched.
    ///
    /// ```
    /// use ndview::{NdArray, Order};
    ///
    /// let a = NdArray::from_vec(vec![1., 2., 3., 4., 5., 6.], &[3, 2], Order::RowMajor).unwrap();
    /// let b = a.slice_dimension_to(0, 2, false).unwrap();
    /// assert_eq!(b.shape(), &[2, 2]);
    /// assert_eq!(b.to_vec::<f64>(Order::RowMajor), [1., 2., 3., 4.]);
    /// ```
    pub fn slice_dimension_to(&self, axis: usize, stop: isize, strict: bool)
        -> Result<NdArray, ShapeError>
    {
        self.slice_dimension(axis, Slice::new(None, Some(stop), None), strict)
    }

    /// Return a view with a different shape and the same elements, read in
    /// the array's order.
    ///
    /// **Errors** with `IncompatibleShape` if the number of elements differs
    /// and with `IncompatibleLayout` if the shape cannot be expressed over the
    /// current strides and `copy` is [`ReshapeCopy::Never`].
    ///
    /// ```
    /// use ndview::{NdArray, Order, ReshapeCopy};
    ///
    /// let a = NdArray::from_vec((0..6).collect::<Vec<u8>>(), &[2, 3], Order::RowMajor).unwrap();
    /// let t = a.transpose();
    /// assert!(t.reshape(&[6], ReshapeCopy::Never).is_err());
    /// let flat = t.reshape(&[6], ReshapeCopy::IfNeeded).unwrap();
    /// assert_eq!(flat.to_vec::<u8>(Order::RowMajor), [0, 3, 1, 4, 2, 5]);
    /// assert!(!flat.shares_buffer(&a));
    /// ```
    pub fn reshape(&self, shape: &[Ix], copy: ReshapeCopy) -> Result<NdArray, ShapeError> {
        match reshape_strides(&self.shape, &self.strides, shape, self.order) {
            Ok(strides) => Ok(self.with_layout(shape.to_vec(), strides, self.offset)),
            Err(e) if e.kind() == ErrorKind::IncompatibleLayout && copy == ReshapeCopy::IfNeeded => {
                tracing::trace!(from = ?self.shape, to = ?shape, "reshape copies elements");
                let copied = self.copy(self.order);
                let strides = shape_to_strides(shape, self.order);
                Ok(copied.with_layout(shape.to_vec(), strides, 0))
            }
            Err(e) => {
                if e.kind() == ErrorKind::IncompatibleShape {
                    return Err(error::incompatible_shapes(&self.shape, shape));
                }
                tracing::debug!(from = ?self.shape, strides = ?self.strides, to = ?shape,
                                "reshape needs a copy");
                Err(e)
            }
        }
    }

    /// Permute the axes.
    ///
    /// This does not move any data, it just adjusts the array's shape and
    /// strides.
    ///
    /// *i* in the *j*-th place in the axes sequence means `self`'s *i*-th
    /// axis becomes the *j*-th axis of the view. The offset is unchanged.
    ///
    /// **Errors** with `InvalidPermutation` if `axes` is not a permutation
    /// of `0..ndim`.
    ///
    /// ```
    /// use ndview::{NdArray, DType, Order};
    ///
    /// let a = NdArray::zeros(DType::Float32, &[2, 3, 4], Order::RowMajor).unwrap();
    /// let p = a.permute_axes(&[1, 0, 2]).unwrap();
    /// assert_eq!(p.shape(), &[3, 2, 4]);
    /// assert_eq!(p.strides(), &[4, 12, 1]);
    /// ```
    pub fn permute_axes(&self, axes: &[usize]) -> Result<NdArray, ShapeError> {
        let ndim = self.ndim();
        let mut usage_counts = vec![0; ndim];
        if axes.len() != ndim {
            return Err(self.invalid_permutation(axes));
        }
        for &axis in axes {
            if axis >= ndim {
                return Err(self.invalid_permutation(axes));
            }
            usage_counts[axis] += 1;
        }
        if usage_counts.iter().any(|&c| c != 1) {
            return Err(self.invalid_permutation(axes));
        }
        let shape = axes.iter().map(|&ax| self.shape[ax]).collect();
        let strides = axes.iter().map(|&ax| self.strides[ax]).collect();
        Ok(self.with_layout(shape, strides, self.offset))
    }

    fn invalid_permutation(&self, axes: &[usize]) -> ShapeError {
        tracing::debug!(ndim = self.ndim(), ?axes, "invalid axis permutation");
        from_kind(ErrorKind::InvalidPermutation)
    }

    /// Transpose the array by reversing axes.
    ///
    /// Transposition reverses the order of the axes (dimensions and strides)
    /// while retaining the same data.
    pub fn transpose(&self) -> NdArray {
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.reverse();
        strides.reverse();
        self.with_layout(shape, strides, self.offset)
    }

    /// Swap axes `ax` and `bx`.
    ///
    /// **Errors** with `InvalidAxis` if either axis is out of bounds.
    pub fn swap_axes(&self, ax: usize, bx: usize) -> Result<NdArray, ShapeError> {
        self.check_axis(ax)?;
        self.check_axis(bx)?;
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.swap(ax, bx);
        strides.swap(ax, bx);
        Ok(self.with_layout(shape, strides, self.offset))
    }

    /// Reverse the order of the elements along `axis`.
    ///
    /// The stride of the axis is negated and the offset moved to the last
    /// element of the axis.
    ///
    /// **Errors** with `InvalidAxis` if the axis is out of bounds.
    ///
    /// ```
    /// use ndview::{NdArray, Order};
    ///
    /// let a = NdArray::from_vec(vec![1, 2, 3, 4, 5, 6], &[2, 3], Order::RowMajor).unwrap();
    /// let f = a.flip(1).unwrap();
    /// assert_eq!(f.to_vec::<i32>(Order::RowMajor), [3, 2, 1, 6, 5, 4]);
    /// assert_eq!((f.strides(), f.offset()), (&[3, -1][..], 2));
    /// ```
    pub fn flip(&self, axis: usize) -> Result<NdArray, ShapeError> {
        self.check_axis(axis)?;
        let mut strides = self.strides.clone();
        let mut offset = self.offset;
        let n = self.shape[axis];
        if n > 0 {
            // the last element along the axis is addressable, so this stays >= 0
            offset = (offset as Ixs + (n as Ixs - 1) * strides[axis]) as usize;
        }
        strides[axis] = -strides[axis];
        Ok(self.with_layout(self.shape.clone(), strides, offset))
    }

    /// Reverse the order of the elements along each of `axes`, or along all
    /// axes if `axes` is empty. An axis named twice is flipped twice.
    ///
    /// **Errors** with `InvalidAxis` if any axis is out of bounds.
    pub fn flip_axes(&self, axes: &[usize]) -> Result<NdArray, ShapeError> {
        let all = (0..self.ndim()).collect::<Vec<_>>();
        let axes = if axes.is_empty() { &all[..] } else { axes };
        let mut view = self.clone();
        for &axis in axes {
            view = view.flip(axis)?;
        }
        Ok(view)
    }

    /// Insert a new axis of length 1 at `axis`.
    ///
    /// **Errors** with `InvalidAxis` if `axis > ndim`.
    pub fn insert_axis(&self, axis: usize) -> Result<NdArray, ShapeError> {
        if axis > self.ndim() {
            tracing::debug!(axis, ndim = self.ndim(), "axis out of bounds");
            return Err(from_kind(ErrorKind::InvalidAxis));
        }
        let mut shape = self.shape.clone();
        let mut strides = self.strides.clone();
        shape.insert(axis, 1);
        strides.insert(axis, 1);
        Ok(self.with_layout(shape, strides, self.offset))
    }

    /// Remove all axes of length 1.
    pub fn squeeze(&self) -> NdArray {
        let (shape, strides) = self.shape.iter()
                                         .zip(&self.strides)
                                         .filter(|&(&d, _)| d != 1)
                                         .map(|(&d, &s)| (d, s))
                                         .unzip();
        self.with_layout(shape, strides, self.offset)
    }

    /// Return a read-only view of the array broadcast to `shape`.
    ///
    /// Axes of length 1, and missing leading axes, are stretched with stride
    /// 0 so that every position along them reads the same element. The view
    /// is always read-only.
    ///
    /// **Errors** with `IncompatibleShape` if the array cannot be broadcast
    /// to `shape`.
    ///
    /// ```
    /// use ndview::{NdArray, Order, Value};
    ///
    /// let a = NdArray::from_vec(vec![10, 20, 30], &[1, 3], Order::RowMajor).unwrap();
    /// let b = a.broadcast_to(&[4, 3]).unwrap();
    /// assert_eq!(b.strides(), &[0, 1]);
    /// assert_eq!(b.get(&[3, 2]), Some(Value::Int32(30)));
    /// assert!(b.try_set(&[0, 0], 1).is_err());
    /// ```
    pub fn broadcast_to(&self, shape: &[Ix]) -> Result<NdArray, ShapeError> {
        let strides = broadcast_strides(&self.shape, &self.strides, shape)
            .ok_or_else(|| error::incompatible_shapes(&self.shape, shape))?;
        Ok(self.with_layout(shape.to_vec(), strides, self.offset).with_read_only(true))
    }

    fn check_axis(&self, axis: usize) -> Result<(), ShapeError> {
        if axis >= self.ndim() {
            tracing::debug!(axis, ndim = self.ndim(), "axis out of bounds");
            return Err(from_kind(ErrorKind::InvalidAxis));
        }
        Ok(())
    }
}

/// Broadcast arrays to their common shape.
///
/// Return read-only views of all arrays with the shape given by
/// [`broadcast_shapes`] of their shapes.
///
/// **Errors** with `IncompatibleShape` if the shapes cannot be broadcast
/// together.
///
/// ```
/// use ndview::{broadcast_arrays, NdArray, Order};
///
/// let a = NdArray::from_vec(vec![1, 2, 3], &[3, 1], Order::RowMajor).unwrap();
/// let b = NdArray::from_vec(vec![10, 20, 30, 40], &[4], Order::RowMajor).unwrap();
/// let out = broadcast_arrays(&[&a, &b]).unwrap();
/// assert_eq!(out[0].shape(), &[3, 4]);
/// assert_eq!(out[1].shape(), &[3, 4]);
/// ```
pub fn broadcast_arrays(arrays: &[&NdArray]) -> Result<Vec<NdArray>, ShapeError> {
    let shapes = arrays.iter().map(|a| a.shape()).collect::<Vec<_>>();
    let shape = broadcast_shapes(&shapes)?;
    arrays.iter().map(|a| a.broadcast_to(&shape)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{s, DType, Order, Value};

    fn arange(shape: &[Ix]) -> NdArray {
        let n = shape.iter().product::<usize>();
        NdArray::from_vec((0..n as i64).collect(), shape, Order::RowMajor).unwrap()
    }

    #[test]
    fn slice_aliases() {
        let a = arange(&[4, 5]);
        let v = a.slice(&s![1..3, ..;-2], false).unwrap();
        assert_eq!(v.shape(), &[2, 3]);
        assert_eq!(v.to_vec::<i64>(Order::RowMajor), [9, 7, 5, 14, 12, 10]);
        v.set(&[0, 0], -9);
        assert_eq!(a.get(&[1, 4]), Some(Value::Int64(-9)));
    }

    #[test]
    fn slice_strictness() {
        let a = arange(&[3, 3]);
        assert_eq!(a.slice(&s![5, ..], true).err().map(|e| e.kind()),
                   Some(ErrorKind::IndexOutOfBounds));
        let v = a.slice(&s![5, ..], false).unwrap();
        assert_eq!(v.shape(), &[0, 3]);
        assert!(v.is_empty());
        let w = a.slice(&s![..10, -10..], false).unwrap();
        assert_eq!(w.shape(), &[3, 3]);
        assert_eq!(a.slice(&s![..], false).err().map(|e| e.kind()),
                   Some(ErrorKind::IncompatibleShape));
    }

    #[test]
    fn slice_helpers() {
        let a = arange(&[3, 4]);
        assert_eq!(a.slice_from(&[Some(1), None], false).unwrap().shape(), &[2, 4]);
        assert_eq!(a.slice_to(&[None, Some(-1)], false).unwrap().shape(), &[3, 3]);
        let d = a.slice_dimension(1, Slice::from(1..).step_by(2), false).unwrap();
        assert_eq!(d.to_vec::<i64>(Order::RowMajor), [1, 3, 5, 7, 9, 11]);
        assert_eq!(a.slice_dimension(2, Slice::default(), false).err().map(|e| e.kind()),
                   Some(ErrorKind::InvalidAxis));
    }

    #[test]
    fn reshape_views_and_copies() {
        let a = arange(&[2, 3, 4]);
        let r = a.reshape(&[6, 4], ReshapeCopy::Never).unwrap();
        assert!(r.shares_buffer(&a));
        assert_eq!(r.get(&[5, 3]), Some(Value::Int64(23)));
        assert_eq!(a.reshape(&[5, 5], ReshapeCopy::IfNeeded).err().map(|e| e.kind()),
                   Some(ErrorKind::IncompatibleShape));
        let t = a.transpose();
        assert_eq!(t.reshape(&[24], ReshapeCopy::Never).err().map(|e| e.kind()),
                   Some(ErrorKind::IncompatibleLayout));
        let c = t.reshape(&[4, 6], ReshapeCopy::IfNeeded).unwrap();
        assert!(!c.shares_buffer(&a));
        assert_eq!(c.get(&[0, 1]), Some(Value::Int64(12)));
    }

    #[test]
    fn reshape_rank0() {
        let a = NdArray::from_vec(vec![4.5f32], &[1, 1], Order::RowMajor).unwrap();
        let s = a.reshape(&[], ReshapeCopy::Never).unwrap();
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.get(&[]), Some(Value::Float32(4.5)));
        assert_eq!(s.reshape(&[1], ReshapeCopy::Never).unwrap().shape(), &[1]);
    }

    #[test]
    fn permutations() {
        let a = arange(&[2, 3, 4]);
        let bad_axes: [&[usize]; 3] = [&[0, 1], &[0, 1, 1], &[0, 1, 3]];
        for bad in bad_axes {
            assert_eq!(a.permute_axes(bad).err().map(|e| e.kind()),
                       Some(ErrorKind::InvalidPermutation));
        }
        let p = a.permute_axes(&[2, 0, 1]).unwrap();
        assert_eq!(p.shape(), &[4, 2, 3]);
        assert_eq!(p.get(&[3, 1, 2]), a.get(&[1, 2, 3]));
        let s = a.swap_axes(0, 2).unwrap();
        assert_eq!(s.shape(), &[4, 3, 2]);
        assert!(a.swap_axes(0, 3).is_err());
        assert!(a.transpose().flags().column_major_contiguous);
    }

    #[test]
    fn flips() {
        let a = arange(&[2, 3]);
        let f = a.flip(0).unwrap();
        assert_eq!(f.offset(), 3);
        assert_eq!(f.to_vec::<i64>(Order::RowMajor), [3, 4, 5, 0, 1, 2]);
        assert_eq!(f.flip(0).unwrap(), a);
        let all = a.flip_axes(&[]).unwrap();
        assert_eq!(all.to_vec::<i64>(Order::RowMajor), [5, 4, 3, 2, 1, 0]);
        assert_eq!(all.offset(), 5);
        assert_eq!(a.flip(2).err().map(|e| e.kind()), Some(ErrorKind::InvalidAxis));
        let e = NdArray::zeros(DType::Int8, &[0, 2], Order::RowMajor).unwrap().flip(0).unwrap();
        assert_eq!(e.offset(), 0);
    }

    #[test]
    fn axes_of_length_one() {
        let a = arange(&[3]);
        let b = a.insert_axis(0).unwrap().insert_axis(2).unwrap();
        assert_eq!(b.shape(), &[1, 3, 1]);
        assert!(b.flags().row_major_contiguous);
        assert!(a.insert_axis(2).is_err());
        assert_eq!(b.squeeze().shape(), &[3]);
        assert_eq!(b.squeeze(), a);
    }

    #[test]
    fn broadcasting() {
        let a = NdArray::from_vec(vec![1., 2., 3.], &[3, 1], Order::RowMajor).unwrap();
        let b = a.broadcast_to(&[2, 3, 4]).unwrap();
        assert_eq!(b.strides(), &[0, 1, 0]);
        assert!(b.is_read_only());
        for (index, value) in b.indexed_iter() {
            assert_eq!(Some(value), a.get(&[index[1] as isize, 0]));
        }
        assert!(a.broadcast_to(&[3, 2]).is_ok());
        assert!(a.broadcast_to(&[2, 4]).is_err());
        assert!(a.broadcast_to(&[3]).is_err());
        // views of a broadcast view stay read-only
        assert!(b.slice(&s![0, .., ..], false).unwrap().is_read_only());
    }

    #[test]
    fn broadcast_many() {
        let a = arange(&[3, 1]);
        let b = arange(&[1, 4]);
        let c = arange(&[2]);
        assert!(broadcast_arrays(&[&a, &b, &c]).is_err());
        let out = broadcast_arrays(&[&a, &b]).unwrap();
        assert_eq!(out[0].get(&[2, 3]), Some(Value::Int64(2)));
        assert_eq!(out[1].get(&[2, 3]), Some(Value::Int64(3)));
        assert!(broadcast_arrays(&[]).unwrap().is_empty());
    }
}
