// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// An error related to array shape, layout or indexing.
///
/// Returned by the array constructors and by every operation that derives a
/// new view, because those are the places where the buffer bounds invariant
/// is established.
#[derive(Clone)]
pub struct ShapeError {
    // we want to be able to change this representation later
    repr: ErrorKind,
}

impl ShapeError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.repr
    }

    /// Create a new `ShapeError`
    pub fn from_kind(error: ErrorKind) -> Self {
        from_kind(error)
    }
}

/// Error code for an error related to array shape, layout or indexing.
///
/// This enumeration is not exhaustive. The representation of the enum
/// is not guaranteed.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// incompatible shape
    IncompatibleShape = 1,
    /// incompatible memory layout
    IncompatibleLayout,
    /// the strides and offset address memory outside of the buffer
    OutOfBounds,
    /// an index or subscript is outside of the array dimensions
    IndexOutOfBounds,
    /// an axis does not exist
    InvalidAxis,
    /// an axis list is not a permutation of the array axes
    InvalidPermutation,
    /// a slice has a zero step or a slice list is malformed
    InvalidSlice,
    /// a buffer or value does not match the requested data type
    IncompatibleDtype,
    /// the array is read-only
    ReadOnly,
    /// arithmetic overflow in the shape or strides
    Overflow,
    /// serialized meta data is truncated or holds an unknown constant
    InvalidMetaData,
    /// a name does not denote a data type, order, index mode or casting mode
    UnknownName,
}

#[inline(always)]
pub fn from_kind(k: ErrorKind) -> ShapeError {
    ShapeError { repr: k }
}

impl PartialEq for ShapeError {
    #[inline(always)]
    fn eq(&self, rhs: &Self) -> bool {
        self.repr == rhs.repr
    }
}

impl Eq for ShapeError {}

impl Error for ShapeError {}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self.kind() {
            ErrorKind::IncompatibleShape => "incompatible shapes",
            ErrorKind::IncompatibleLayout => "incompatible memory layout",
            ErrorKind::OutOfBounds => "strides and offset lead to out of bounds indexing",
            ErrorKind::IndexOutOfBounds => "index out of bounds",
            ErrorKind::InvalidAxis => "invalid axis",
            ErrorKind::InvalidPermutation => "axes are not a permutation of the array dimensions",
            ErrorKind::InvalidSlice => "invalid slice",
            ErrorKind::IncompatibleDtype => "incompatible data type",
            ErrorKind::ReadOnly => "array is read-only",
            ErrorKind::Overflow => "arithmetic overflow",
            ErrorKind::InvalidMetaData => "malformed meta data",
            ErrorKind::UnknownName => "unrecognized name",
        };
        write!(f, "ShapeError/{:?}: {}", self.kind(), description)
    }
}

impl fmt::Debug for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

pub(crate) fn incompatible_shapes(from: &[usize], to: &[usize]) -> ShapeError {
    tracing::debug!(?from, ?to, "incompatible shapes");
    from_kind(ErrorKind::IncompatibleShape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_kind() {
        let e = from_kind(ErrorKind::IncompatibleLayout);
        assert_eq!(e.kind(), ErrorKind::IncompatibleLayout);
        assert!(e.to_string().contains("IncompatibleLayout"));
        assert!(format!("{:?}", e).contains("incompatible memory layout"));
    }

    #[test]
    fn equality_is_by_kind() {
        assert_eq!(from_kind(ErrorKind::ReadOnly), ShapeError::from_kind(ErrorKind::ReadOnly));
        assert_ne!(from_kind(ErrorKind::ReadOnly), from_kind(ErrorKind::OutOfBounds));
    }
}
