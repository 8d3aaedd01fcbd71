use itertools::izip;

use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{Ix, Ixs};

/// Calculate the common shape for a pair of array shapes, that they can be
/// broadcasted to. Return an error if the shapes are not compatible.
///
/// Shapes are right-aligned; two lengths are compatible when they are equal
/// or either is 1, and the output takes the length that is not 1.
///
/// Uses the [NumPy broadcasting rules]
//  (https://docs.scipy.org/doc/numpy/user/basics.broadcasting.html#general-broadcasting-rules).
fn co_broadcast(shape1: &[Ix], shape2: &[Ix]) -> Result<Vec<Ix>, ShapeError> {
    let (k, overflow) = shape1.len().overflowing_sub(shape2.len());
    // Swap the order if shape2 is longer.
    if overflow {
        return co_broadcast(shape2, shape1);
    }
    // The output should be the same length as shape1.
    let mut out = shape1.to_vec();
    for (out, &s2) in izip!(&mut out[k..], shape2) {
        if *out != s2 {
            if *out == 1 {
                *out = s2
            } else if s2 != 1 {
                return Err(from_kind(ErrorKind::IncompatibleShape));
            }
        }
    }
    Ok(out)
}

/// Broadcast any number of shapes to a common shape.
///
/// The empty list broadcasts to the rank-0 shape `[]`.
///
/// **Errors** with `IncompatibleShape` if two shapes have lengths along the
/// same axis that are unequal and both different from 1.
///
/// ```
/// use ndview::broadcast_shapes;
///
/// assert_eq!(broadcast_shapes(&[&[3, 1], &[1, 4]]).unwrap(), [3, 4]);
/// assert_eq!(broadcast_shapes(&[&[8, 1, 6, 1], &[7, 1, 5]]).unwrap(), [8, 7, 6, 5]);
/// assert!(broadcast_shapes(&[&[2, 3], &[4, 3]]).is_err());
/// ```
pub fn broadcast_shapes(shapes: &[&[Ix]]) -> Result<Vec<Ix>, ShapeError> {
    let mut out = Vec::new();
    for shape in shapes {
        out = co_broadcast(&out, shape).map_err(|e| {
            tracing::debug!(?shapes, "shapes cannot be broadcast together");
            e
        })?;
    }
    Ok(out)
}

/// Compute strides that view an array of shape `from` and strides `strides`
/// as shape `to`. Axes added on the left and axes stretched from length 1
/// get stride 0.
///
/// Return `None` if `from` cannot be broadcast to `to`.
pub fn broadcast_strides(from: &[Ix], strides: &[Ixs], to: &[Ix]) -> Option<Vec<Ixs>> {
    if from.len() > to.len() {
        return None;
    }
    let k = to.len() - from.len();
    let mut new_strides = vec![0; to.len()];
    for (new_stride, &to_len, &from_len, &stride) in
        izip!(&mut new_strides[k..], &to[k..], from, strides)
    {
        if from_len == to_len {
            *new_stride = stride;
        } else if from_len != 1 {
            return None;
        }
        // a stretched axis keeps stride 0
    }
    Some(new_strides)
}
