// Copyright 2024 ndview developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::{NdArray, Value};

fn format_array<F>(array: &NdArray, f: &mut fmt::Formatter<'_>, mut format: F) -> fmt::Result
where
    F: FnMut(&Value, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    let ndim = array.ndim();
    let mut last_index = vec![0; ndim];
    for _ in 0..ndim {
        write!(f, "[")?;
    }
    let mut first = true;
    // Use the indexed iterator, and take the index wraparounds
    // as cues for when to add []'s and how many to add.
    for (index, elt) in array.indexed_iter() {
        let take_n = if ndim == 0 { 1 } else { ndim - 1 };
        let mut update_index = false;
        for (i, (a, b)) in index.iter().take(take_n).zip(&last_index).enumerate() {
            if a != b {
                // # of ['s needed
                let n = ndim - i - 1;
                for _ in 0..n {
                    write!(f, "]")?;
                }
                writeln!(f, ",")?;
                for _ in 0..ndim - n {
                    write!(f, " ")?;
                }
                for _ in 0..n {
                    write!(f, "[")?;
                }
                first = true;
                update_index = true;
                break;
            }
        }
        if !first {
            write!(f, ", ")?;
        }
        first = false;
        format(&elt, f)?;

        if update_index {
            last_index = index;
        }
    }
    for _ in 0..ndim {
        write!(f, "]")?;
    }
    Ok(())
}

/// Format the array using `Display` and apply the formatting parameters used
/// to each element.
///
/// The array is shown in multiline style.
impl fmt::Display for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, fmt::Display::fmt)
    }
}

/// Format the array using `Display` for the elements, followed by the layout
/// of the view.
impl fmt::Debug for NdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, |elt, f| fmt::Display::fmt(elt, f))?;
        write!(f, " shape={:?}, strides={:?}, offset={}, dtype={}, order={}",
               self.shape(), self.strides(), self.offset(), self.dtype(), self.order())?;
        let flags = self.flags();
        if flags.read_only {
            write!(f, ", read-only")?;
        }
        Ok(())
    }
}
