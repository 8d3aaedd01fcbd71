// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![crate_name = "ndview"]
#![doc(html_root_url = "https://docs.rs/ndview/0.1/")]
#![allow(
    clippy::many_single_char_names,
    clippy::deref_addrof,
    clippy::unreadable_literal,
    clippy::len_without_is_empty
)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The `ndview` crate provides [`NdArray`], a dynamically typed
//! n-dimensional view over a shared, typed buffer.
//!
//! An `NdArray` binds a [`Buffer`], a [`DType`], a shape, signed strides, an
//! element offset and an [`Order`] into a random access multidimensional
//! array. Views derived from it (slices, reshapes, transposes, flips,
//! broadcasts) share the buffer and never copy elements.
//!
//! - **Data types**: a closed registry of element types ([`DType`]) with
//!   byte widths, enumeration constants and one character codes.
//! - **Casting**: policy checks with [`can_cast`] and type promotion with
//!   [`promote`].
//! - **Layout algebra**: pure functions over shapes and strides in
//!   [`dimension`].
//! - **Slicing**: [`Slice`], [`SliceArg`] and the [`s![]`](s!) macro, with
//!   Python style negative indices and steps.
//! - **Broadcasting**: [`broadcast_shapes`], [`NdArray::broadcast_to`] and
//!   [`broadcast_arrays`]; broadcast views are read-only.
//!
//! ## Example
//!
//! ```
//! use ndview::{NdArray, Order, Value};
//!
//! let a = NdArray::from_vec(vec![1., 2., 3., 4., 5., 6.], &[2, 3], Order::RowMajor).unwrap();
//! assert_eq!(a.get(&[1, 2]), Some(Value::Float64(6.)));
//!
//! let t = a.transpose();
//! assert_eq!(t.shape(), &[3, 2]);
//! assert_eq!(t.get(&[2, 1]), Some(Value::Float64(6.)));
//!
//! // views alias the buffer
//! t.set(&[0, 0], 10.);
//! assert_eq!(a.get(&[0, 0]), Some(Value::Float64(10.)));
//! ```
//!
//! ## Crate Feature Flags
//!
//! - `std`: enabled by default.
//! - `serde`: `Serialize`/`Deserialize` for the small configuration types
//!   (`DType`, `Order`, `IndexMode`, `CastingMode`, `Slice`, `SliceArg`,
//!   `Value`).

#[macro_use]
mod private;

mod arrayformat;
mod arraytraits;
pub mod casting;
mod data_repr;
mod data_traits;
pub mod dimension;
pub mod dtype;
mod error;
mod impl_constructors;
mod impl_internal_constructors;
mod impl_methods;
mod impl_views;
pub mod index;
mod iterators;
pub mod meta;
mod order;
mod slice;
mod value;

pub use crate::casting::{can_cast, promote, CastingMode};
pub use crate::data_repr::Buffer;
pub use crate::data_traits::{DataBuffer, Element, Uint8Clamped};
pub use crate::dimension::{broadcast_shapes, numel, shape_to_strides};
pub use crate::dtype::{bytes_per_element, dtype_to_enum, enum_to_dtype, DType, DTypeKind};
pub use crate::error::{ErrorKind, ShapeError};
pub use crate::impl_constructors::ArrayOptions;
pub use crate::impl_views::{broadcast_arrays, ReshapeCopy};
pub use crate::index::IndexMode;
pub use crate::iterators::{IndexedIter, Iter};
pub use crate::order::Order;
pub use crate::slice::{int2slice, normalize_slice, Ellipsis, NormalizedSlice, Slice, SliceArg};
pub use crate::value::Value;

pub use num_complex::{Complex32, Complex64};

/// Array index type
pub type Ix = usize;
/// Array index type (signed)
pub type Ixs = isize;

/// Derived layout properties of an array, computed once when the array is
/// created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Flags {
    /// Strides are the canonical row-major strides of the shape.
    pub row_major_contiguous: bool,
    /// Strides are the canonical column-major strides of the shape.
    pub column_major_contiguous: bool,
    /// Element writes are refused.
    pub read_only: bool,
}

/// A dynamically typed n-dimensional array view.
///
/// An `NdArray` is a descriptor over a shared [`Buffer`]: shape, strides and
/// offset locate the elements, `dtype` describes them. The element at
/// subscripts `idx` lives at buffer index `offset + Σ idx[i] * strides[i]`;
/// every such index is checked to be inside the buffer when the array is
/// created, so element access never needs to recheck the layout.
///
/// The structural fields never change after construction. Every view
/// operation returns a new `NdArray` sharing the same buffer, and cloning an
/// `NdArray` is cheap and also shares the buffer. Only element contents are
/// mutable, through [`set`](NdArray::set) and friends, unless the array is
/// read-only. Writes through one view are visible through all views of the
/// same buffer.
///
/// A rank-0 array (empty shape) addresses exactly one element, at `offset`,
/// although [`numel`] of its shape is zero.
///
/// ## Contents
///
/// + [Construction](#construction)
/// + [Accessors](#accessors)
/// + [Element access](#element-access)
/// + [Views](#views)
/// + [Iteration](#iteration)
#[derive(Clone)]
pub struct NdArray {
    data: Buffer,
    dtype: DType,
    shape: Vec<Ix>,
    strides: Vec<Ixs>,
    offset: usize,
    order: Order,
    flags: Flags,
    mode: IndexMode,
    submode: Vec<IndexMode>,
}
