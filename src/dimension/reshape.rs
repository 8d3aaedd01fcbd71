use crate::dimension::sequence::{Forward, Reverse, Sequence, SequenceMut};
use crate::dimension::{numel, shape_to_strides};
use crate::error::{from_kind, ErrorKind, ShapeError};
use crate::{Ix, Ixs, Order};

/// Compute strides that let an array of shape `from` and strides `strides`
/// be viewed with shape `to` without moving any element, reading elements
/// in `order`.
///
/// Returns:
///
/// - IncompatibleShape if the two shapes do not have the same number of
///   elements
/// - IncompatibleLayout if the data would have to be copied into a new
///   memory layout
pub fn reshape_strides(from: &[Ix], strides: &[Ixs], to: &[Ix], order: Order)
    -> Result<Vec<Ixs>, ShapeError>
{
    debug_assert_eq!(from.len(), strides.len());
    let from_size = if from.is_empty() { 1 } else { numel(from) };
    let to_size = if to.is_empty() { 1 } else { numel(to) };
    if from_size != to_size {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }
    if from_size == 0 || to.is_empty() {
        // nothing is addressed, or a single element at the offset
        return Ok(shape_to_strides(to, order));
    }
    let mut to_strides = vec![0; to.len()];
    match order {
        Order::RowMajor => {
            reshape_dim_c(&Forward(from), &Forward(strides),
                          &Forward(to), Forward(&mut to_strides[..]))?;
        }
        Order::ColumnMajor => {
            reshape_dim_c(&Reverse(from), &Reverse(strides),
                          &Reverse(to), Reverse(&mut to_strides[..]))?;
        }
    }
    Ok(to_strides)
}

/// Walk both shapes in step, merging runs of axes until their lengths
/// agree, and distribute the stride of each merged run over the target axes.
///
/// This function uses RowMajor index ordering if the inputs are read in the
/// forward direction and ColumnMajor index ordering if they are read in the
/// reversed direction.
///
/// Preconditions: both shapes have the same nonzero number of elements.
fn reshape_dim_c<D, S, E, E2>(from_dim: &D, from_strides: &S, to_dim: &E, mut to_strides: E2)
    -> Result<(), ShapeError>
where
    D: Sequence<Output = Ix>,
    S: Sequence<Output = Ixs>,
    E: Sequence<Output = Ix>,
    E2: SequenceMut<Output = Ixs>,
{
    // cursor indexes into the from and to dimensions
    let mut fi = 0;
    let mut ti = 0;

    while fi < from_dim.len() && ti < to_dim.len() {
        let mut fd = from_dim[fi];
        let mut fs = from_strides[fi];
        let mut td = to_dim[ti];

        if fd == td {
            to_strides[ti] = from_strides[fi];
            fi += 1;
            ti += 1;
            continue;
        }

        if fd == 1 {
            fi += 1;
            continue;
        }

        if td == 1 {
            to_strides[ti] = 1;
            ti += 1;
            continue;
        }

        if fd == 0 || td == 0 {
            debug_assert!(false, "zero dim not handled by this function");
            return Err(from_kind(ErrorKind::IncompatibleShape));
        }

        // stride times element count is distributed over a combination of axes
        let mut fstride_whole = fs * (fd as Ixs);
        let mut fd_product = fd;
        let mut td_product = td;

        while fd_product != td_product {
            if fd_product < td_product {
                // take another axis on the from side
                fi += 1;
                if fi >= from_dim.len() {
                    return Err(from_kind(ErrorKind::IncompatibleShape));
                }
                fd = from_dim[fi];
                fd_product *= fd;
                if fd > 1 {
                    let fs_old = fs;
                    fs = from_strides[fi];
                    // this axis and the previous one must be contiguous together
                    if fs_old != fd as Ixs * fs {
                        return Err(from_kind(ErrorKind::IncompatibleLayout));
                    }
                }
            } else {
                // take another axis on the to side, assigning the stride of
                // the axis left behind
                fstride_whole /= td as Ixs;
                to_strides[ti] = fstride_whole;
                ti += 1;
                if ti >= to_dim.len() {
                    return Err(from_kind(ErrorKind::IncompatibleShape));
                }

                td = to_dim[ti];
                td_product *= td;
            }
        }

        fstride_whole /= td as Ixs;
        to_strides[ti] = fstride_whole;

        fi += 1;
        ti += 1;
    }

    // skip past 1-dims at the end
    while fi < from_dim.len() && from_dim[fi] == 1 {
        fi += 1;
    }

    while ti < to_dim.len() && to_dim[ti] == 1 {
        to_strides[ti] = 1;
        ti += 1;
    }

    if fi < from_dim.len() || ti < to_dim.len() {
        return Err(from_kind(ErrorKind::IncompatibleShape));
    }

    Ok(())
}

#[test]
fn test_reshape() {
    macro_rules! test_reshape {
        (fail $order:ident from $from:expr, $stride:expr, to $to:expr) => {
            let res = reshape_strides(&$from, &$stride, &$to, Order::$order);
            println!("Reshape {:?} {:?} to {:?}, order {:?}\n  => {:?}",
                     $from, $stride, $to, Order::$order, res);
            let _res = res.expect_err("Expected failed reshape");
        };
        (ok $order:ident from $from:expr, $stride:expr, to $to:expr, $to_stride:expr) => {{
            let res = reshape_strides(&$from, &$stride, &$to, Order::$order);
            println!("Reshape {:?} {:?} to {:?}, order {:?}\n  => {:?}",
                     $from, $stride, $to, Order::$order, res);
            let res = res.expect("Expected successful reshape");
            let expected: &[Ixs] = &$to_stride;
            assert_eq!(res, expected, "mismatch in strides");
        }};
    }

    test_reshape!(ok C from [1, 2, 3], [6, 3, 1], to [1, 2, 3], [6, 3, 1]);
    test_reshape!(ok C from [1, 2, 3], [6, 3, 1], to [2, 3], [3, 1]);
    test_reshape!(ok C from [1, 2, 3], [6, 3, 1], to [6], [1]);
    test_reshape!(fail C from [1, 2, 3], [6, 3, 1], to [1]);
    test_reshape!(fail F from [1, 2, 3], [6, 3, 1], to [1]);

    test_reshape!(ok C from [6], [1], to [3, 2], [2, 1]);
    test_reshape!(ok C from [3, 4, 5], [20, 5, 1], to [4, 15], [15, 1]);
    test_reshape!(ok C from [4, 4], [4, 1], to [2, 2, 4, 1], [8, 4, 1, 1]);
    test_reshape!(ok C from [4, 4], [8, 1], to [2, 2, 2, 2], [16, 8, 2, 1]);
    test_reshape!(fail C from [4, 4], [8, 1], to [2, 1, 4, 2]);

    test_reshape!(ok C from [16], [4], to [2, 2, 4], [32, 16, 4]);
    test_reshape!(ok C from [16], [-4], to [2, 2, 4], [-32, -16, -4]);
    test_reshape!(ok F from [16], [4], to [2, 2, 4], [4, 8, 16]);
    test_reshape!(ok F from [16], [-4], to [2, 2, 4], [-4, -8, -16]);

    test_reshape!(fail F from [3, 4, 5], [20, 5, 1], to [4, 15]);
    test_reshape!(ok F from [3, 4, 5], [1, 3, 12], to [12, 5], [1, 12]);

    // preserve stride if shape matches
    test_reshape!(ok C from [2, 10], [1, 2], to [2, 10], [1, 2]);

    // broadcast shapes
    test_reshape!(ok C from [3, 4, 5, 7], [0, 0, 7, 1], to [12, 35], [0, 1]);
    test_reshape!(fail C from [3, 4, 5, 7], [0, 0, 7, 1], to [28, 15]);

    // one-filled shapes
    test_reshape!(ok C from [1, 10], [1, 1], to [1, 5, 1, 1, 2], [1, 2, 2, 2, 1]);
    test_reshape!(ok F from [1, 10], [1, 1], to [1, 5, 1, 1, 2], [1, 1, 5, 5, 5]);
    test_reshape!(fail F from [1, 5, 1, 2, 1], [1, 2, 1, 1, 1], to [10]);

    // element count mismatch and empty arrays
    test_reshape!(fail C from [2, 3], [3, 1], to [7]);
    test_reshape!(ok C from [2, 0], [1, 1], to [0, 5], [5, 1]);
    test_reshape!(ok C from [1, 1], [1, 1], to [0 as Ix; 0], []);
}
