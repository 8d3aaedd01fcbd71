// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{Ix, Ixs};

/// A slice (range with step size).
///
/// Every field may be elided. Negative `start` or `stop` indexes are counted
/// from the back of the axis. An elided `step` is 1; elided `start` and
/// `stop` cover the whole axis in the direction of the step.
///
/// ## Examples
///
/// `Slice::new(None, None, None)` is the full range of an axis. It can also
/// be created with `Slice::from(..)`. The Python equivalent is `[:]`.
///
/// `Slice::new(Some(a), Some(b), Some(2))` is every second element from `a`
/// until `b`. It can also be created with `Slice::from(a..b).step_by(2)`. The
/// Python equivalent is `[a:b:2]`.
///
/// `Slice::new(Some(a), None, Some(-1))` is every element from `a` down to
/// the start of the axis. It can also be created with
/// `Slice::from(a..).step_by(-1)`. The Python equivalent is `[a::-1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// A zero `step` is accepted here and rejected when the slice is
    /// normalized.
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Slice {
        Slice { start, stop, step }
    }

    /// Create a new `Slice` with the given step size (multiplied with the
    /// previous step size).
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        Slice {
            step: Some(self.step.unwrap_or(1) * step),
            ..self
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        write!(f, "..")?;
        if let Some(stop) = self.stop {
            write!(f, "{}", stop)?;
        }
        if let Some(step) = self.step {
            if step != 1 {
                write!(f, ";{}", step)?;
            }
        }
        Ok(())
    }
}

macro_rules! impl_slice_from_index_type {
    ($index:ty) => {
        impl From<Range<$index>> for Slice {
            #[inline]
            fn from(r: Range<$index>) -> Slice {
                Slice::new(Some(r.start as isize), Some(r.end as isize), None)
            }
        }

        impl From<RangeFrom<$index>> for Slice {
            #[inline]
            fn from(r: RangeFrom<$index>) -> Slice {
                Slice::new(Some(r.start as isize), None, None)
            }
        }

        impl From<RangeTo<$index>> for Slice {
            #[inline]
            fn from(r: RangeTo<$index>) -> Slice {
                Slice::new(None, Some(r.end as isize), None)
            }
        }
    };
}

impl_slice_from_index_type!(isize);
impl_slice_from_index_type!(usize);
impl_slice_from_index_type!(i32);

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice::default()
    }
}

/// Placeholder standing for as many full slices as needed to cover the
/// axes not named by the other arguments. Written `...` in Python.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Ellipsis;

/// One per-axis selector of a multi-slice.
///
/// See also the [`s![]`](crate::s!) macro for a convenient way to create an
/// array of `SliceArg`s.
///
/// ## Examples
///
/// `SliceArg::Index(a)` is the index `a`; it removes the axis. The Python
/// equivalent is `[a]`. The macro equivalent is `s![a]`.
///
/// `SliceArg::Slice(Slice::from(a..b).step_by(2))` is every second element
/// from `a` until `b`; it keeps the axis. The Python equivalent is
/// `[a:b:2]`. The macro equivalent is `s![a..b;2]`.
///
/// `SliceArg::Ellipsis` covers all remaining axes. The macro equivalent is
/// `s![Ellipsis]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SliceArg {
    /// A single index.
    Index(isize),
    /// A range with step size.
    Slice(Slice),
    /// Full slices for every axis not otherwise covered.
    Ellipsis,
}

impl SliceArg {
    /// Returns `true` if `self` is a `Slice` value.
    pub fn is_slice(&self) -> bool {
        matches!(self, SliceArg::Slice(_))
    }

    /// Returns `true` if `self` is an `Index` value.
    pub fn is_index(&self) -> bool {
        matches!(self, SliceArg::Index(_))
    }

    /// Returns a new `SliceArg` with the given step size (multiplied with the
    /// previous step size). Indices and ellipses are returned unchanged.
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        match self {
            SliceArg::Slice(s) => SliceArg::Slice(s.step_by(step)),
            other => other,
        }
    }
}

impl fmt::Display for SliceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SliceArg::Index(index) => write!(f, "{}", index),
            SliceArg::Slice(s) => fmt::Display::fmt(&s, f),
            SliceArg::Ellipsis => write!(f, "..."),
        }
    }
}

impl From<Slice> for SliceArg {
    #[inline]
    fn from(s: Slice) -> SliceArg {
        SliceArg::Slice(s)
    }
}

impl From<Ellipsis> for SliceArg {
    #[inline]
    fn from(_: Ellipsis) -> SliceArg {
        SliceArg::Ellipsis
    }
}

macro_rules! impl_slicearg_from_index_type {
    ($index:ty) => {
        impl From<$index> for SliceArg {
            #[inline]
            fn from(r: $index) -> SliceArg {
                SliceArg::Index(r as isize)
            }
        }

        impl From<Range<$index>> for SliceArg {
            #[inline]
            fn from(r: Range<$index>) -> SliceArg {
                SliceArg::Slice(r.into())
            }
        }

        impl From<RangeFrom<$index>> for SliceArg {
            #[inline]
            fn from(r: RangeFrom<$index>) -> SliceArg {
                SliceArg::Slice(r.into())
            }
        }

        impl From<RangeTo<$index>> for SliceArg {
            #[inline]
            fn from(r: RangeTo<$index>) -> SliceArg {
                SliceArg::Slice(r.into())
            }
        }
    };
}

impl_slicearg_from_index_type!(isize);
impl_slicearg_from_index_type!(usize);
impl_slicearg_from_index_type!(i32);

impl From<RangeFull> for SliceArg {
    #[inline]
    fn from(_: RangeFull) -> SliceArg {
        SliceArg::Slice(Slice::default())
    }
}

/// A slice resolved against an axis length: `start` is the first selected
/// index and `stop` is exclusive. For a negative step `stop` may be `-1`,
/// meaning the selection runs through index 0.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NormalizedSlice {
    pub start: isize,
    pub stop: isize,
    pub step: isize,
}

impl NormalizedSlice {
    /// Number of selected elements.
    pub fn len(&self) -> usize {
        let span = if self.step > 0 {
            self.stop - self.start
        } else {
            self.start - self.stop
        };
        if span <= 0 {
            0
        } else {
            (span as usize - 1) / self.step.unsigned_abs() + 1
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// What to do with a start or stop that lands outside the axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Bounds {
    /// Clamp to the axis, as Python does.
    Clamp,
    /// Select nothing.
    Empty,
    /// Report `IndexOutOfBounds`.
    Error,
}

pub(crate) fn normalize_slice_with(slice: &Slice, len: Ix, bounds: Bounds)
    -> Result<NormalizedSlice, ShapeError>
{
    let step = slice.step.unwrap_or(1);
    if step == 0 {
        return Err(from_kind(ErrorKind::InvalidSlice));
    }
    let n = len as Ixs;
    let resolve = |i: isize| if i < 0 { i + n } else { i };
    let start = slice.start.map(resolve);
    let stop = slice.stop.map(resolve);

    let out_of_range = |i: Option<isize>| matches!(i, Some(i) if i < 0 || i > n);
    if out_of_range(start) || out_of_range(stop) {
        match bounds {
            Bounds::Error => {
                tracing::debug!(%slice, len, "slice out of bounds");
                return Err(from_kind(ErrorKind::IndexOutOfBounds));
            }
            Bounds::Empty => return Ok(NormalizedSlice { start: 0, stop: 0, step }),
            Bounds::Clamp => {}
        }
    }

    let (start, stop) = if step > 0 {
        (
            start.map_or(0, |i| i.clamp(0, n)),
            stop.map_or(n, |i| i.clamp(0, n)),
        )
    } else {
        (
            start.map_or(n - 1, |i| i.clamp(-1, n - 1)),
            stop.map_or(-1, |i| i.clamp(-1, n - 1)),
        )
    };
    Ok(NormalizedSlice { start, stop, step })
}

/// Resolve `slice` against an axis of length `len`.
///
/// Negative `start` and `stop` count from the end of the axis. When
/// `allow_out_of_bounds` is false, a `start` or `stop` outside the axis is
/// clamped to it; when true, it makes the whole slice select nothing.
///
/// **Errors** with `InvalidSlice` if the step is zero.
///
/// ```
/// use ndview::{normalize_slice, NormalizedSlice, Slice};
///
/// let s = normalize_slice(&Slice::new(Some(-1), None, Some(1)), 10, false).unwrap();
/// assert_eq!(s, NormalizedSlice { start: 9, stop: 10, step: 1 });
/// let s = normalize_slice(&Slice::new(Some(2), Some(-1), Some(1)), 5, false).unwrap();
/// assert_eq!(s, NormalizedSlice { start: 2, stop: 4, step: 1 });
/// ```
pub fn normalize_slice(slice: &Slice, len: Ix, allow_out_of_bounds: bool)
    -> Result<NormalizedSlice, ShapeError>
{
    let bounds = if allow_out_of_bounds { Bounds::Empty } else { Bounds::Clamp };
    normalize_slice_with(slice, len, bounds)
}

/// Convert a single, possibly negative, index into a slice selecting just
/// that element.
///
/// An index outside `-len..len` is an `IndexOutOfBounds` error in strict
/// mode and an empty slice otherwise.
pub fn int2slice(index: isize, len: Ix, strict: bool) -> Result<Slice, ShapeError> {
    let n = len as Ixs;
    let i = if index < 0 { index + n } else { index };
    if i < 0 || i >= n {
        if strict {
            return Err(from_kind(ErrorKind::IndexOutOfBounds));
        }
        return Ok(Slice::new(Some(0), Some(0), Some(1)));
    }
    Ok(Slice::new(Some(i), Some(i + 1), Some(1)))
}

/// Shape, strides and offset of a view.
pub(crate) type Layout = (Vec<Ix>, Vec<Ixs>, usize);

/// Apply a multi-slice to a layout.
///
/// Indexed axes are removed and sliced axes kept. At most one
/// `SliceArg::Ellipsis` may appear; without one the number of arguments
/// must equal the rank. With `strict` any out-of-bounds index or slice
/// bound is an error; otherwise slice bounds are clamped and an
/// out-of-bounds index leaves its axis in place with length 0.
pub(crate) fn slice_layout(shape: &[Ix], strides: &[Ixs], offset: usize, args: &[SliceArg],
                           strict: bool)
    -> Result<Layout, ShapeError>
{
    let ellipses = args.iter().filter(|a| **a == SliceArg::Ellipsis).count();
    let named = args.len() - ellipses;
    if ellipses > 1 {
        return Err(from_kind(ErrorKind::InvalidSlice));
    }
    if (ellipses == 0 && named != shape.len()) || named > shape.len() {
        tracing::debug!(nargs = args.len(), ndim = shape.len(), "wrong number of slice arguments");
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }

    let bounds = if strict { Bounds::Error } else { Bounds::Clamp };
    let mut new_shape = Vec::with_capacity(shape.len());
    let mut new_strides = Vec::with_capacity(shape.len());
    let mut new_offset = offset as Ixs;
    let mut axis = 0;
    let full = Slice::default();

    for arg in args {
        let slices: &[Slice] = match arg {
            SliceArg::Ellipsis => {
                let fill = shape.len() - named;
                for _ in 0..fill {
                    let ns = normalize_slice_with(&full, shape[axis], bounds)?;
                    new_shape.push(ns.len());
                    new_strides.push(strides[axis]);
                    axis += 1;
                }
                continue;
            }
            SliceArg::Slice(s) => std::slice::from_ref(s),
            SliceArg::Index(i) => {
                match int2slice(*i, shape[axis], strict)? {
                    Slice { start: Some(start), stop: Some(stop), .. } if stop > start => {
                        new_offset += start * strides[axis];
                    }
                    _ => {
                        // nothing to select; keep the axis so the view is empty
                        new_shape.push(0);
                        new_strides.push(strides[axis]);
                    }
                }
                axis += 1;
                continue;
            }
        };
        for s in slices {
            let ns = normalize_slice_with(s, shape[axis], bounds)?;
            let len = ns.len();
            if len > 0 {
                new_offset += ns.start * strides[axis];
            }
            // the stride of an axis with at most one element is never used
            let stride = if len <= 1 {
                strides[axis]
            } else {
                strides[axis]
                    .checked_mul(ns.step)
                    .ok_or_else(|| from_kind(ErrorKind::Overflow))?
            };
            new_shape.push(len);
            new_strides.push(stride);
            axis += 1;
        }
    }

    if new_shape.iter().any(|&d| d == 0) {
        return Ok((new_shape, new_strides, offset));
    }
    Ok((new_shape, new_strides, new_offset as usize))
}

/// Slice argument constructor.
///
/// `s![]` takes a list of ranges/slices/indices, separated by comma, with
/// optional step sizes that are separated from the range by a semicolon. It is
/// converted into an array of [`SliceArg`](crate::SliceArg).
///
/// Each range/slice/index uses signed indices, where a negative value is
/// counted from the end of the axis. Step sizes are also signed and may be
/// negative, but must not be zero.
///
/// The syntax is `s![` *[ axis-slice-or-index [, axis-slice-or-index [ , ... ]
/// ] ]* `]`, where *axis-slice-or-index* is any of the following:
///
/// * *index*: an index to use for taking a subview with respect to that axis
/// * *range*: a range with step size 1 to use for slicing that axis
/// * *range* `;` *step*: a range with step size *step* to use for slicing that axis
/// * *slice*: a [`Slice`](crate::Slice) instance to use for slicing that axis
/// * `Ellipsis`: full ranges for all axes not named by the other arguments
///
/// For example `s![0..4;2, 6, 1..5]` is a slice of the first axis for 0..4
/// with step size 2, a subview of the second axis at index 6, and a slice of
/// the third axis for 1..5 with default step size 1. The input array must have
/// 3 dimensions. The resulting view has shape `[2, 4]`.
///
/// # Example
///
/// ```
/// use ndview::{s, NdArray, Order};
///
/// let a = NdArray::from_vec((0..12).map(|x| x as f64).collect(), &[3, 4], Order::RowMajor)
///     .unwrap();
/// let corners = a.slice(&s![..;2, ..;3], false).unwrap();
/// assert_eq!(corners.shape(), &[2, 2]);
/// assert_eq!(corners.to_vec::<f64>(Order::RowMajor), [0., 3., 8., 11.]);
/// ```
#[macro_export]
macro_rules! s(
    (@parse [$($stack:tt)*]) => {
        [$($stack)*]
    };
    // convert a..b;c into @convert(a..b, c), final item
    (@parse [$($stack:tt)*] $r:expr;$s:expr) => {
        [$($stack)* $crate::s!(@convert $r, $s)]
    };
    // convert a..b into @convert(a..b), final item
    (@parse [$($stack:tt)*] $r:expr) => {
        [$($stack)* $crate::s!(@convert $r)]
    };
    // convert a..b;c into @convert(a..b, c), final item, trailing comma
    (@parse [$($stack:tt)*] $r:expr;$s:expr ,) => {
        [$($stack)* $crate::s!(@convert $r, $s)]
    };
    // convert a..b into @convert(a..b), final item, trailing comma
    (@parse [$($stack:tt)*] $r:expr ,) => {
        [$($stack)* $crate::s!(@convert $r)]
    };
    // convert a..b;c into @convert(a..b, c)
    (@parse [$($stack:tt)*] $r:expr;$s:expr, $($t:tt)*) => {
        $crate::s![@parse [$($stack)* $crate::s!(@convert $r, $s),] $($t)*]
    };
    // convert a..b into @convert(a..b)
    (@parse [$($stack:tt)*] $r:expr, $($t:tt)*) => {
        $crate::s![@parse [$($stack)* $crate::s!(@convert $r),] $($t)*]
    };
    // convert range/index into SliceArg
    (@convert $r:expr) => {
        <$crate::SliceArg as ::std::convert::From<_>>::from($r)
    };
    // convert range/index and step into SliceArg
    (@convert $r:expr, $s:expr) => {
        <$crate::SliceArg as ::std::convert::From<_>>::from($r).step_by($s as isize)
    };
    ($($t:tt)*) => {
        $crate::s![@parse [] $($t)*]
    };
);

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(start: isize, stop: isize, step: isize) -> NormalizedSlice {
        NormalizedSlice { start, stop, step }
    }

    #[test]
    fn normalize_defaults() {
        let s = Slice::default();
        assert_eq!(normalize_slice(&s, 5, false).unwrap(), ns(0, 5, 1));
        let r = s.step_by(-1);
        assert_eq!(normalize_slice(&r, 5, false).unwrap(), ns(4, -1, -1));
        assert_eq!(normalize_slice(&r, 5, false).unwrap().len(), 5);
        let s = Slice::new(Some(-1), None, Some(1));
        assert_eq!(normalize_slice(&s, 10, false).unwrap(), ns(9, 10, 1));
        let s = Slice::new(Some(2), Some(-1), Some(1));
        assert_eq!(normalize_slice(&s, 5, false).unwrap(), ns(2, 4, 1));
    }

    #[test]
    fn normalize_out_of_bounds() {
        let s = Slice::new(Some(-20), Some(20), None);
        assert_eq!(normalize_slice(&s, 5, false).unwrap(), ns(0, 5, 1));
        assert!(normalize_slice(&s, 5, true).unwrap().is_empty());
        assert_eq!(
            normalize_slice_with(&s, 5, Bounds::Error),
            Err(from_kind(ErrorKind::IndexOutOfBounds))
        );
        let r = Slice::new(Some(10), None, Some(-2));
        assert_eq!(normalize_slice(&r, 5, false).unwrap(), ns(4, -1, -2));
        assert_eq!(normalize_slice(&r, 5, false).unwrap().len(), 3);
    }

    #[test]
    fn zero_step() {
        let s = Slice::new(None, None, Some(0));
        assert_eq!(normalize_slice(&s, 3, false), Err(from_kind(ErrorKind::InvalidSlice)));
    }

    #[test]
    fn single_index() {
        assert_eq!(int2slice(-1, 4, true).unwrap(), Slice::new(Some(3), Some(4), Some(1)));
        assert!(int2slice(4, 4, true).is_err());
        assert!(int2slice(-5, 4, true).is_err());
        let empty = int2slice(4, 4, false).unwrap();
        assert!(normalize_slice(&empty, 4, false).unwrap().is_empty());
    }

    #[test]
    fn macro_builds_args() {
        let args = s![1, 2..;2, ..-1, Ellipsis];
        assert_eq!(args[0], SliceArg::Index(1));
        assert_eq!(args[1], SliceArg::Slice(Slice::new(Some(2), None, Some(2))));
        assert_eq!(args[2], SliceArg::Slice(Slice::new(None, Some(-1), None)));
        assert_eq!(args[3], SliceArg::Ellipsis);
        assert_eq!(args[1].to_string(), "2..;2");
    }

    #[test]
    fn layouts() {
        // 3 x 4 row major
        let (shape, strides) = ([3, 4], [4, 1]);
        let (sh, st, off) = slice_layout(&shape, &strides, 0, &s![1, ..], false).unwrap();
        assert_eq!((sh, st, off), (vec![4], vec![1], 4));
        let (sh, st, off) = slice_layout(&shape, &strides, 0, &s![..;-1, 1..3], false).unwrap();
        assert_eq!((sh, st, off), (vec![3, 2], vec![-4, 1], 9));
        let (sh, _, off) = slice_layout(&shape, &strides, 0, &s![Ellipsis, -1], false).unwrap();
        assert_eq!((sh, off), (vec![3], 3));
        let (sh, _, off) = slice_layout(&shape, &strides, 5, &s![7, ..], false).unwrap();
        assert_eq!((sh, off), (vec![0, 4], 5));
        assert!(slice_layout(&shape, &strides, 0, &s![7, ..], true).is_err());
        assert!(slice_layout(&shape, &strides, 0, &s![1], false).is_err());
        assert!(slice_layout(&shape, &strides, 0, &s![Ellipsis, Ellipsis], false).is_err());
        assert!(slice_layout(&shape, &strides, 0, &s![1, 1, Ellipsis], false).is_ok());
    }
}
