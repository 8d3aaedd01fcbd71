// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::dimension::{self, can_index_buffer};
use crate::{Flags, Ix, Ixs, NdArray};

impl Flags {
    pub(crate) fn compute(shape: &[Ix], strides: &[Ixs], offset: usize, read_only: bool) -> Flags {
        Flags {
            row_major_contiguous: dimension::is_row_major_contiguous(shape, strides, offset),
            column_major_contiguous: dimension::is_column_major_contiguous(shape, strides, offset),
            read_only,
        }
    }
}

// internal "builder-like" methods
impl NdArray {
    /// Create a view of the same buffer with a new layout. Flags are
    /// recomputed; read-only is inherited.
    ///
    /// The caller needs to ensure that the new layout addresses only elements
    /// inside the buffer.
    pub(crate) fn with_layout(&self, shape: Vec<Ix>, strides: Vec<Ixs>, offset: usize) -> NdArray {
        debug_assert_eq!(shape.len(), strides.len());
        debug_assert!(can_index_buffer(self.data.len(), &shape, &strides, offset).is_ok());
        let flags = Flags::compute(&shape, &strides, offset, self.flags.read_only);
        tracing::trace!(?shape, ?strides, offset, "derived view");
        NdArray {
            data: self.data.clone(),
            dtype: self.dtype,
            shape,
            strides,
            offset,
            order: self.order,
            flags,
            mode: self.mode,
            submode: self.submode.clone(),
        }
    }

    /// Set the read-only flag of this array value.
    pub(crate) fn with_read_only(mut self, read_only: bool) -> NdArray {
        self.flags.read_only = read_only;
        self
    }
}
