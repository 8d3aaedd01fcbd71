// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Binary serialization of array meta data.
//!
//! The meta data of an array is everything except its elements. It is
//! written in host byte order with the following layout:
//!
//! ```text
//! | endianness (1) | dtype (2) | ndims (8) | shape (ndims*8) | strides (ndims*8) |
//! | offset (8) | order (1) | mode (1) | nsubmodes (8) | submodes (nsubmodes*1) |
//! ```
//!
//! The endianness byte is 1 for little endian and 0 for big endian. Strides
//! and offset are in bytes, except for `generic` arrays which have no
//! element width and use element units.

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{DType, IndexMode, Ix, Ixs, NdArray, Order};

/// Decoded array meta data, with strides and offset in elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaData {
    pub dtype: DType,
    pub shape: Vec<Ix>,
    pub strides: Vec<Ixs>,
    pub offset: usize,
    pub order: Order,
    pub mode: IndexMode,
    pub submode: Vec<IndexMode>,
}

const HOST_ENDIANNESS: u8 = if cfg!(target_endian = "little") { 1 } else { 0 };

/// Serialize the meta data of `array`.
///
/// ```
/// use ndview::meta::{deserialize_meta_data, serialize_meta_data};
/// use ndview::{NdArray, Order};
///
/// let a = NdArray::from_vec(vec![1f64, 2., 3., 4.], &[2, 2], Order::RowMajor).unwrap();
/// let bytes = serialize_meta_data(&a);
/// let meta = deserialize_meta_data(&bytes).unwrap();
/// assert_eq!(meta.shape, [2, 2]);
/// assert_eq!(meta.strides, [2, 1]);
/// ```
pub fn serialize_meta_data(array: &NdArray) -> Vec<u8> {
    let unit = array.bytes_per_element().unwrap_or(1) as i64;
    let ndims = array.ndim();
    let nsub = array.submode().len();
    let mut out = Vec::with_capacity(1 + 2 + 8 + 16 * ndims + 8 + 1 + 1 + 8 + nsub);
    out.push(HOST_ENDIANNESS);
    out.extend_from_slice(&array.dtype().code().to_ne_bytes());
    out.extend_from_slice(&(ndims as i64).to_ne_bytes());
    for &d in array.shape() {
        out.extend_from_slice(&(d as i64).to_ne_bytes());
    }
    for &s in array.strides() {
        out.extend_from_slice(&(s as i64 * unit).to_ne_bytes());
    }
    out.extend_from_slice(&(array.offset() as i64 * unit).to_ne_bytes());
    out.extend_from_slice(&array.order().code().to_ne_bytes());
    out.extend_from_slice(&array.mode().code().to_ne_bytes());
    out.extend_from_slice(&(nsub as i64).to_ne_bytes());
    for &m in array.submode() {
        out.extend_from_slice(&m.code().to_ne_bytes());
    }
    out
}

/// A cursor over serialized bytes.
struct Reader<'a> {
    bytes: &'a [u8],
    swap: bool,
}

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], ShapeError> {
        if self.bytes.len() < N {
            return Err(malformed("truncated"));
        }
        let (head, rest) = self.bytes.split_at(N);
        self.bytes = rest;
        let mut buf = [0; N];
        buf.copy_from_slice(head);
        if self.swap {
            buf.reverse();
        }
        Ok(buf)
    }

    fn i8(&mut self) -> Result<i8, ShapeError> {
        self.take::<1>().map(i8::from_ne_bytes)
    }

    fn i16(&mut self) -> Result<i16, ShapeError> {
        self.take::<2>().map(i16::from_ne_bytes)
    }

    fn i64(&mut self) -> Result<i64, ShapeError> {
        self.take::<8>().map(i64::from_ne_bytes)
    }

    fn len(&mut self) -> Result<usize, ShapeError> {
        let n = self.i64()?;
        usize::try_from(n).map_err(|_| malformed("negative length"))
    }
}

fn malformed(what: &str) -> ShapeError {
    tracing::debug!(what, "malformed meta data");
    from_kind(ErrorKind::InvalidMetaData)
}

/// Deserialize meta data written by [`serialize_meta_data`], possibly on a
/// host of the other byte order.
///
/// **Errors** with `InvalidMetaData` if the bytes are truncated, hold an
/// unknown dtype, order or mode constant, or byte strides that are not a
/// multiple of the element width.
pub fn deserialize_meta_data(bytes: &[u8]) -> Result<MetaData, ShapeError> {
    let (&endianness, rest) = bytes.split_first().ok_or_else(|| malformed("empty"))?;
    if endianness > 1 {
        return Err(malformed("endianness"));
    }
    let mut r = Reader { bytes: rest, swap: endianness != HOST_ENDIANNESS };

    let dtype = DType::from_code(r.i16()?).ok_or_else(|| malformed("dtype"))?;
    let unit = dtype.bytes_per_element().unwrap_or(1) as i64;
    let ndims = r.len()?;
    // each axis needs 16 bytes
    if ndims > r.bytes.len() / 16 {
        return Err(malformed("truncated"));
    }
    let shape = (0..ndims)
        .map(|_| r.len())
        .collect::<Result<Vec<_>, _>>()?;
    let mut strides = Vec::with_capacity(ndims);
    for _ in 0..ndims {
        let s = r.i64()?;
        if s % unit != 0 {
            return Err(malformed("stride"));
        }
        strides.push((s / unit) as Ixs);
    }
    let offset = r.len()?;
    if offset as i64 % unit != 0 {
        return Err(malformed("offset"));
    }
    let order = Order::from_code(r.i8()?).ok_or_else(|| malformed("order"))?;
    let mode = IndexMode::from_code(r.i8()?).ok_or_else(|| malformed("mode"))?;
    let nsub = r.len()?;
    if nsub > r.bytes.len() {
        return Err(malformed("truncated"));
    }
    let submode = (0..nsub)
        .map(|_| r.i8().and_then(|c| IndexMode::from_code(c).ok_or_else(|| malformed("submode"))))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MetaData {
        dtype,
        shape,
        strides,
        offset: offset / unit as usize,
        order,
        mode,
        submode,
    })
}
