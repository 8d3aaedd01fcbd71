// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Constructor methods for NdArray
//!
use crate::dimension::{self, can_index_buffer, shape_to_strides};
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{Buffer, DType, Element, Flags, IndexMode, Ix, Ixs, NdArray, Order, Value};

/// Per-array configuration given at construction.
///
/// `mode` governs linear indexing (`iget`/`iset`). `submode` holds one mode
/// per dimension for subscript indexing (`get`/`set`), cycled when shorter
/// than the rank. The default is `throw` everywhere and a writable array.
///
/// ```
/// use ndview::{ArrayOptions, IndexMode};
///
/// let options = ArrayOptions::new()
///     .mode(IndexMode::Wrap)
///     .submode(vec![IndexMode::Clamp])
///     .read_only(true);
/// assert_eq!(options.get_mode(), IndexMode::Wrap);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayOptions {
    mode: IndexMode,
    submode: Vec<IndexMode>,
    read_only: bool,
}

impl Default for ArrayOptions {
    fn default() -> Self {
        ArrayOptions {
            mode: IndexMode::Throw,
            submode: vec![IndexMode::Throw],
            read_only: false,
        }
    }
}

impl ArrayOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the linear index mode.
    pub fn mode(mut self, mode: IndexMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the per-dimension subscript modes. An empty list means `[mode]`.
    pub fn submode(mut self, submode: Vec<IndexMode>) -> Self {
        self.submode = submode;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub fn get_mode(&self) -> IndexMode {
        self.mode
    }

    pub fn get_submode(&self) -> &[IndexMode] {
        &self.submode
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }
}

/// # Construction
impl NdArray {
    /// Create an array over `buffer` with the given layout and default
    /// options.
    ///
    /// **Errors** if the buffer does not hold `dtype` elements
    /// (`IncompatibleDtype`), if `strides` and `shape` differ in length
    /// (`IncompatibleShape`), or if the layout addresses an element outside
    /// the buffer (`OutOfBounds`, or `Overflow`).
    ///
    /// ```
    /// use ndview::{Buffer, DType, NdArray, Order, Value};
    ///
    /// let buf = Buffer::from_vec(vec![1i32, 2, 3, 4, 5, 6]);
    /// // every other column, read right to left
    /// let a = NdArray::new(DType::Int32, buf, &[2, 2], &[3, -2], 2, Order::RowMajor).unwrap();
    /// assert_eq!(a.get(&[0, 0]), Some(Value::Int32(3)));
    /// assert_eq!(a.get(&[1, 1]), Some(Value::Int32(4)));
    /// ```
    pub fn new(dtype: DType, buffer: Buffer, shape: &[Ix], strides: &[Ixs], offset: usize,
               order: Order)
        -> Result<NdArray, ShapeError>
    {
        Self::with_options(dtype, buffer, shape, strides, offset, order, ArrayOptions::default())
    }

    /// Create an array over `buffer` with the given layout and options.
    ///
    /// **Errors** as for [`new`](NdArray::new).
    pub fn with_options(dtype: DType, buffer: Buffer, shape: &[Ix], strides: &[Ixs],
                        offset: usize, order: Order, options: ArrayOptions)
        -> Result<NdArray, ShapeError>
    {
        if buffer.dtype() != dtype {
            tracing::debug!(%dtype, buffer = %buffer.dtype(), "buffer dtype mismatch");
            return Err(from_kind(ErrorKind::IncompatibleDtype));
        }
        if let Err(e) = can_index_buffer(buffer.len(), shape, strides, offset) {
            tracing::debug!(?shape, ?strides, offset, len = buffer.len(), error = %e,
                            "rejected array layout");
            return Err(e);
        }
        let ArrayOptions { mode, submode, read_only } = options;
        let submode = if submode.is_empty() { vec![mode] } else { submode };
        Ok(NdArray {
            flags: Flags::compute(shape, strides, offset, read_only),
            data: buffer,
            dtype,
            shape: shape.to_vec(),
            strides: strides.to_vec(),
            offset,
            order,
            mode,
            submode,
        })
    }

    /// Create a contiguous array over the whole of `buffer`.
    ///
    /// **Errors** with `IncompatibleShape` if the buffer length does not
    /// match the shape.
    pub fn from_buffer(buffer: Buffer, shape: &[Ix], order: Order) -> Result<NdArray, ShapeError> {
        let size = dimension::size_checked(shape).ok_or_else(|| from_kind(ErrorKind::Overflow))?;
        if size != buffer.len() {
            return Err(crate::error::incompatible_shapes(&[buffer.len()], shape));
        }
        let strides = shape_to_strides(shape, order);
        Self::new(buffer.dtype(), buffer, shape, &strides, 0, order)
    }

    /// Create a contiguous array from a vector of elements (no copying
    /// needed).
    ///
    /// ```
    /// use ndview::{DType, NdArray, Order};
    ///
    /// let a = NdArray::from_vec(vec![1u8, 2, 3, 4], &[2, 2], Order::ColumnMajor).unwrap();
    /// assert_eq!(a.dtype(), DType::Uint8);
    /// assert_eq!(a.strides(), &[1, 2]);
    /// ```
    pub fn from_vec<T: Element>(v: Vec<T>, shape: &[Ix], order: Order) -> Result<NdArray, ShapeError> {
        Self::from_buffer(Buffer::from_vec(v), shape, order)
    }

    /// Create a contiguous array of `dtype` holding `values`, converted to
    /// `dtype`, in `order`.
    pub fn from_values(dtype: DType, values: &[Value], shape: &[Ix], order: Order)
        -> Result<NdArray, ShapeError>
    {
        Self::from_buffer(Buffer::from_values(dtype, values), shape, order)
    }

    /// Create a freshly allocated array of zeros.
    ///
    /// **Errors** with `Overflow` if the number of elements overflows.
    pub fn zeros(dtype: DType, shape: &[Ix], order: Order) -> Result<NdArray, ShapeError> {
        let size = dimension::size_checked(shape).ok_or_else(|| from_kind(ErrorKind::Overflow))?;
        Self::from_buffer(Buffer::zeros(dtype, size), shape, order)
    }

    /// Create a freshly allocated array of zeros with the dtype, shape, order
    /// and index modes of `self`.
    pub fn zeros_like(&self) -> NdArray {
        let size = dimension::size_checked(&self.shape).unwrap_or(0);
        let strides = shape_to_strides(&self.shape, self.order);
        NdArray {
            data: Buffer::zeros(self.dtype, size),
            dtype: self.dtype,
            flags: Flags::compute(&self.shape, &strides, 0, false),
            shape: self.shape.clone(),
            strides,
            offset: 0,
            order: self.order,
            mode: self.mode,
            submode: self.submode.clone(),
        }
    }

    /// Create a freshly allocated array like `self`.
    ///
    /// Buffers are always initialized, so this is the same as
    /// [`zeros_like`](NdArray::zeros_like).
    pub fn empty_like(&self) -> NdArray {
        self.zeros_like()
    }

    /// Return the same view with new index modes and read-only flag.
    ///
    /// A read-only array stays read-only: `options` can only add the flag.
    pub fn with_array_options(&self, options: ArrayOptions) -> NdArray {
        let ArrayOptions { mode, submode, read_only } = options;
        let read_only = read_only || self.flags.read_only;
        let mut a = self.clone().with_read_only(read_only);
        a.mode = mode;
        a.submode = if submode.is_empty() { vec![mode] } else { submode };
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_layouts() {
        let buf = Buffer::from_vec(vec![0f64; 6]);
        let err = |r: Result<NdArray, ShapeError>| r.err().map(|e| e.kind());
        assert_eq!(
            err(NdArray::new(DType::Float32, buf.clone(), &[6], &[1], 0, Order::C)),
            Some(ErrorKind::IncompatibleDtype)
        );
        assert_eq!(
            err(NdArray::new(DType::Float64, buf.clone(), &[2, 3], &[3], 0, Order::C)),
            Some(ErrorKind::IncompatibleShape)
        );
        assert_eq!(
            err(NdArray::new(DType::Float64, buf.clone(), &[2, 3], &[3, 1], 1, Order::C)),
            Some(ErrorKind::OutOfBounds)
        );
        assert_eq!(
            err(NdArray::new(DType::Float64, buf.clone(), &[2, 3], &[-3, 1], 0, Order::C)),
            Some(ErrorKind::OutOfBounds)
        );
        assert!(NdArray::new(DType::Float64, buf.clone(), &[2, 3], &[-3, 1], 3, Order::C).is_ok());
        assert!(NdArray::new(DType::Float64, buf.clone(), &[], &[], 5, Order::C).is_ok());
        assert!(NdArray::new(DType::Float64, buf, &[], &[], 6, Order::C).is_err());
    }

    #[test]
    fn flags_are_computed() {
        let a = NdArray::zeros(DType::Int16, &[2, 3], Order::ColumnMajor).unwrap();
        assert!(a.flags().column_major_contiguous);
        assert!(!a.flags().row_major_contiguous);
        assert!(!a.flags().read_only);
        let b = NdArray::zeros(DType::Int16, &[], Order::RowMajor).unwrap();
        assert_eq!(b.data().len(), 1);
        assert!(b.flags().row_major_contiguous && b.flags().column_major_contiguous);
    }

    #[test]
    fn options() {
        let buf = Buffer::from_vec(vec![1i8, 2, 3]);
        let opts = ArrayOptions::new().mode(IndexMode::Clamp).submode(vec![]).read_only(true);
        let a = NdArray::with_options(DType::Int8, buf, &[3], &[1], 0, Order::C, opts).unwrap();
        assert_eq!(a.mode(), IndexMode::Clamp);
        assert_eq!(a.submode(), &[IndexMode::Clamp]);
        assert!(a.is_read_only());
    }

    #[test]
    fn buffer_length_must_match() {
        assert_eq!(
            NdArray::from_vec(vec![1., 2., 3.], &[2, 2], Order::C).err().map(|e| e.kind()),
            Some(ErrorKind::IncompatibleShape)
        );
        let z = NdArray::from_vec(vec![1., 2., 3., 4.], &[2, 2], Order::C).unwrap().zeros_like();
        assert_eq!(z.to_vec::<f64>(Order::C), [0.; 4]);
    }
}
