// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shape and stride algebra.
//!
//! Everything here is a pure function of shapes, strides and offsets given as
//! slices. Strides and offsets count elements, not bytes.
use itertools::izip;

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::index::{resolve_index, submode_for, IndexMode};
use crate::{Ix, Ixs, Order};

pub use self::broadcast::{broadcast_shapes, broadcast_strides};
pub use self::reshape::reshape_strides;

pub(crate) mod broadcast;
mod reshape;
mod sequence;

/// Number of elements described by `shape`.
///
/// The empty shape has zero elements here; a rank-0 array nonetheless
/// addresses the single element at its offset.
#[inline]
pub fn numel(shape: &[Ix]) -> usize {
    if shape.is_empty() {
        0
    } else {
        shape.iter().product()
    }
}

/// Number of addressable elements, with a rank-0 shape counting one, or
/// `None` if the product overflows `isize`.
pub fn size_checked(shape: &[Ix]) -> Option<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .filter(|&size| size <= isize::MAX as usize)
}

/// Contiguous strides for a freshly allocated buffer of `shape`.
///
/// For row-major order the last axis has stride 1 and every other axis the
/// product of the lengths after it; column-major order is the mirror.
pub fn shape_to_strides(shape: &[Ix], order: Order) -> Vec<Ixs> {
    let mut strides = vec![0; shape.len()];
    let mut s: Ixs = 1;
    match order {
        Order::RowMajor => {
            for (st, &d) in strides.iter_mut().zip(shape).rev() {
                *st = s;
                s *= d as Ixs;
            }
        }
        Order::ColumnMajor => {
            for (st, &d) in strides.iter_mut().zip(shape) {
                *st = s;
                s *= d as Ixs;
            }
        }
    }
    strides
}

fn is_contiguous_in(shape: &[Ix], strides: &[Ixs], offset: usize, order: Order) -> bool {
    if shape.len() != strides.len() {
        return false;
    }
    if shape.iter().any(|&d| d == 0) {
        return true;
    }
    let defaults = shape_to_strides(shape, order);
    // a dimension of length 1 can have any stride
    izip!(shape, strides, &defaults).all(|(&d, &s, &ds)| d == 1 || s == ds)
        && is_single_segment_compatible(shape, strides, offset)
}

/// Return true if `strides` equal the canonical row-major strides of
/// `shape` and the elements starting at `offset` fill one gapless segment
/// of the buffer.
///
/// Axes of length 1 never move the position, so their strides are not
/// compared. Empty arrays are contiguous.
pub fn is_row_major_contiguous(shape: &[Ix], strides: &[Ixs], offset: usize) -> bool {
    is_contiguous_in(shape, strides, offset, Order::RowMajor)
}

/// Return true if `strides` equal the canonical column-major strides of
/// `shape` and the elements starting at `offset` fill one gapless segment
/// of the buffer.
///
/// Axes of length 1 are not compared. Empty arrays are contiguous.
pub fn is_column_major_contiguous(shape: &[Ix], strides: &[Ixs], offset: usize) -> bool {
    is_contiguous_in(shape, strides, offset, Order::ColumnMajor)
}

/// Return true if the elements of the view occupy one gapless segment of
/// the buffer, in any order.
pub fn is_single_segment_compatible(shape: &[Ix], strides: &[Ixs], offset: usize) -> bool {
    let size = match size_checked(shape) {
        Some(0) | None => return false,
        Some(size) => size,
    };
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    (max - min + 1) as usize == size
}

/// Buffer index of the element with all-zero subscripts, for a view whose
/// lowest addressed element sits at buffer index 0.
pub fn strides_to_offset(shape: &[Ix], strides: &[Ixs]) -> usize {
    izip!(shape, strides)
        .filter(|&(&d, &s)| s < 0 && d > 0)
        .map(|(&d, &s)| (d - 1) * s.unsigned_abs())
        .sum()
}

/// Memory order implied by a set of strides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum StrideOrder {
    /// Neither row-major nor column-major.
    None = 0,
    RowMajor = 1,
    ColumnMajor = 2,
    /// Both, as for rank 0 and 1 arrays.
    Both = 3,
}

/// Classify strides by the ordering of their magnitudes: decreasing is
/// row-major, increasing is column-major.
pub fn strides_to_order(strides: &[Ixs]) -> StrideOrder {
    let mut row = true;
    let mut column = true;
    for w in strides.windows(2) {
        let (a, b) = (w[0].unsigned_abs(), w[1].unsigned_abs());
        row &= a >= b;
        column &= a <= b;
    }
    match (row, column) {
        (true, true) => StrideOrder::Both,
        (true, false) => StrideOrder::RowMajor,
        (false, true) => StrideOrder::ColumnMajor,
        (false, false) => StrideOrder::None,
    }
}

/// Direction in which iterating the buffer visits a view's elements: 1 when
/// all strides are nonnegative, -1 when all are negative, 0 when mixed.
pub fn iteration_order(strides: &[Ixs]) -> i8 {
    let negative = strides.iter().filter(|&&s| s < 0).count();
    if negative == 0 {
        1
    } else if negative == strides.len() {
        -1
    } else {
        0
    }
}

/// Number of axes of length 1.
pub fn singleton_dimensions(shape: &[Ix]) -> usize {
    shape.iter().filter(|&&d| d == 1).count()
}

/// Number of axes of length other than 1.
pub fn nonsingleton_dimensions(shape: &[Ix]) -> usize {
    shape.len() - singleton_dimensions(shape)
}

/// Lowest and highest buffer index addressed by the view. An empty view
/// addresses nothing and reports `(offset, offset)`.
pub fn minmax_view_buffer_index(shape: &[Ix], strides: &[Ixs], offset: usize) -> (Ixs, Ixs) {
    let offset = offset as Ixs;
    if shape.iter().any(|&d| d == 0) {
        return (offset, offset);
    }
    let (mut min, mut max) = (offset, offset);
    for (&d, &s) in izip!(shape, strides) {
        let reach = (d as Ixs - 1) * s;
        if reach > 0 {
            max += reach;
        } else {
            min += reach;
        }
    }
    (min, max)
}

pub fn min_view_buffer_index(shape: &[Ix], strides: &[Ixs], offset: usize) -> Ixs {
    minmax_view_buffer_index(shape, strides, offset).0
}

pub fn max_view_buffer_index(shape: &[Ix], strides: &[Ixs], offset: usize) -> Ixs {
    minmax_view_buffer_index(shape, strides, offset).1
}

/// Check that a view with this shape, strides and offset only addresses
/// buffer indices in `0..len`.
///
/// **Errors** with `Overflow` if the element count or an address overflows,
/// and with `OutOfBounds` if an addressed index falls outside the buffer.
pub fn can_index_buffer(len: usize, shape: &[Ix], strides: &[Ixs], offset: usize)
    -> Result<(), ShapeError>
{
    if shape.len() != strides.len() {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }
    let size = size_checked(shape).ok_or_else(|| from_kind(ErrorKind::Overflow))?;
    if size == 0 {
        return Ok(());
    }
    let offset_i = Ixs::try_from(offset).map_err(|_| from_kind(ErrorKind::Overflow))?;
    let mut min = offset_i;
    let mut max = offset_i;
    for (&d, &s) in izip!(shape, strides) {
        let reach = (d as Ixs - 1)
            .checked_mul(s)
            .ok_or_else(|| from_kind(ErrorKind::Overflow))?;
        if reach > 0 {
            max = max.checked_add(reach).ok_or_else(|| from_kind(ErrorKind::Overflow))?;
        } else {
            min = min.checked_add(reach).ok_or_else(|| from_kind(ErrorKind::Overflow))?;
        }
    }
    if min < 0 || max as usize >= len {
        return Err(from_kind(ErrorKind::OutOfBounds));
    }
    Ok(())
}

/// Buffer index of the element at `index`, which must be within `shape`.
#[inline]
pub(crate) fn offset_of(strides: &[Ixs], offset: usize, index: &[Ix]) -> usize {
    let mut pos = offset as Ixs;
    for (&i, &s) in izip!(index, strides) {
        pos += i as Ixs * s;
    }
    pos as usize
}

/// Convert subscripts to a buffer index.
///
/// Each subscript is resolved against its axis length using `modes`, which
/// is cycled when shorter than the rank (an empty list means `throw`).
///
/// **Errors** with `IndexOutOfBounds` if a subscript cannot be resolved, and
/// with `IncompatibleShape` for a wrong number of subscripts.
pub fn sub2ind(shape: &[Ix], strides: &[Ixs], offset: usize, subs: &[Ixs], modes: &[IndexMode])
    -> Result<usize, ShapeError>
{
    if subs.len() != shape.len() {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }
    let mut ind = offset as Ixs;
    for (axis, (&d, &s, &sub)) in izip!(shape, strides, subs).enumerate() {
        let mode = submode_for(modes, axis, IndexMode::Throw);
        let i = resolve_index(sub, d as Ixs - 1, mode)?;
        ind += i * s;
    }
    usize::try_from(ind).map_err(|_| from_kind(ErrorKind::IndexOutOfBounds))
}

/// Split a linear index into subscripts by axis lengths, fastest axis last
/// for row-major and first for column-major order.
fn unravel(shape: &[Ix], order: Order, mut idx: usize) -> Vec<Ix> {
    let mut out = vec![0; shape.len()];
    let mut visit = |i: usize| {
        let d = shape[i];
        out[i] = idx % d;
        idx /= d;
    };
    match order {
        Order::RowMajor => (0..shape.len()).rev().for_each(&mut visit),
        Order::ColumnMajor => (0..shape.len()).for_each(&mut visit),
    }
    out
}

/// Peel subscripts off a buffer-relative index by dividing by the strides,
/// slowest axis first. Negative strides count down from the end of the axis.
fn peel(shape: &[Ix], strides: &[Ixs], order: Order, mut idx: Ixs) -> Vec<Ix> {
    let mut out = vec![0; shape.len()];
    let mut visit = |i: usize| {
        let s = strides[i];
        if s == 0 {
            return;
        }
        let k = idx / s;
        idx -= k * s;
        out[i] = if s < 0 { (shape[i] as Ixs - 1 + k) as Ix } else { k as Ix };
    };
    match order {
        Order::RowMajor => (0..shape.len()).for_each(&mut visit),
        Order::ColumnMajor => (0..shape.len()).rev().for_each(&mut visit),
    }
    out
}

/// Convert a linear index to subscripts.
///
/// With a zero offset `idx` is a linear index in `order` over `shape`.
/// Otherwise `idx` is a buffer index counted from the lowest buffer index
/// the view addresses, and subscripts are recovered from the strides.
///
/// **Errors** with `IndexOutOfBounds` if `idx` cannot be resolved under
/// `mode`.
pub fn ind2sub(shape: &[Ix], strides: &[Ixs], offset: usize, order: Order, idx: Ixs,
               mode: IndexMode)
    -> Result<Vec<Ix>, ShapeError>
{
    // a rank-0 view holds one element
    let len = if shape.is_empty() { 1 } else { numel(shape) };
    if offset == 0 {
        let i = resolve_index(idx, len as Ixs - 1, mode)?;
        return Ok(unravel(shape, order, i as usize));
    }
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    if len == 0 {
        return Err(from_kind(ErrorKind::IndexOutOfBounds));
    }
    let i = resolve_index(idx, max - min, mode)?;
    Ok(peel(shape, strides, order, i))
}

/// Convert a linear view index to a buffer index.
///
/// **Errors** with `IndexOutOfBounds` if `idx` cannot be resolved against
/// the number of elements under `mode`.
pub fn vind2bind(shape: &[Ix], strides: &[Ixs], offset: usize, order: Order, idx: Ixs,
                 mode: IndexMode)
    -> Result<usize, ShapeError>
{
    let len = if shape.is_empty() { 1 } else { numel(shape) };
    let i = resolve_index(idx, len as Ixs - 1, mode)?;
    let subs = unravel(shape, order, i as usize);
    Ok(offset_of(strides, offset, &subs))
}

/// Convert a buffer index to a linear view index.
///
/// `idx` is counted from the lowest buffer index the view addresses.
///
/// **Errors** with `IndexOutOfBounds` if `idx` cannot be resolved under
/// `mode`.
pub fn bind2vind(shape: &[Ix], strides: &[Ixs], offset: usize, order: Order, idx: Ixs,
                 mode: IndexMode)
    -> Result<usize, ShapeError>
{
    if shape.iter().any(|&d| d == 0) {
        return Err(from_kind(ErrorKind::IndexOutOfBounds));
    }
    let (min, max) = minmax_view_buffer_index(shape, strides, offset);
    let i = resolve_index(idx, max - min, mode)?;
    let subs = peel(shape, strides, order, i);
    let mut ind = 0;
    let mut fold = |axis: usize| {
        ind = ind * shape[axis] + subs[axis];
    };
    match order {
        Order::RowMajor => (0..shape.len()).for_each(&mut fold),
        Order::ColumnMajor => (0..shape.len()).rev().for_each(&mut fold),
    }
    Ok(ind)
}
