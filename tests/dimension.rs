use quickcheck::{quickcheck, TestResult};

use ndview::dimension::{
    bind2vind, ind2sub, iteration_order, max_view_buffer_index, min_view_buffer_index, numel,
    shape_to_strides, strides_to_offset, strides_to_order, sub2ind, vind2bind, StrideOrder,
};
use ndview::index::{resolve_index, submode_for};
use ndview::{ErrorKind, IndexMode, Ix, Ixs, Order};

fn small_shape(dims: Vec<u8>) -> Vec<Ix> {
    dims.into_iter().take(4).map(|d| (d % 4 + 1) as Ix).collect()
}

quickcheck! {
    fn view_and_buffer_index_invert(dims: Vec<u8>, flip_first: bool) -> TestResult {
        let shape = small_shape(dims);
        if shape.is_empty() {
            return TestResult::discard();
        }
        let mut strides = shape_to_strides(&shape, Order::RowMajor);
        let mut offset = 0;
        if flip_first {
            offset = (shape[0] - 1) * strides[0] as usize;
            strides[0] = -strides[0];
        }
        let min = min_view_buffer_index(&shape, &strides, offset);
        for v in 0..numel(&shape) {
            let b = vind2bind(&shape, &strides, offset, Order::RowMajor, v as Ixs, IndexMode::Throw);
            let b = match b {
                Ok(b) => b,
                Err(_) => return TestResult::failed(),
            };
            let back = bind2vind(&shape, &strides, offset, Order::RowMajor, b as Ixs - min,
                                 IndexMode::Throw);
            if back != Ok(v) {
                return TestResult::failed();
            }
        }
        TestResult::passed()
    }

    fn column_major_linear_index(dims: Vec<u8>) -> bool {
        let shape = small_shape(dims);
        let strides = shape_to_strides(&shape, Order::ColumnMajor);
        (0..numel(&shape)).all(|v| {
            vind2bind(&shape, &strides, 0, Order::ColumnMajor, v as Ixs, IndexMode::Throw) == Ok(v)
        })
    }
}

#[test]
fn subscripts_round_trip() {
    let shape = [3, 4];
    let strides = shape_to_strides(&shape, Order::RowMajor);
    for idx in 0..12 {
        let subs = ind2sub(&shape, &strides, 0, Order::RowMajor, idx, IndexMode::Throw).unwrap();
        let subs = subs.iter().map(|&s| s as Ixs).collect::<Vec<_>>();
        assert_eq!(sub2ind(&shape, &strides, 0, &subs, &[]), Ok(idx as usize));
    }
}

#[test]
fn rank0_holds_one_element() {
    let empty: &[Ix] = &[];
    assert_eq!(ind2sub(&[], &[], 0, Order::RowMajor, 0, IndexMode::Throw), Ok(vec![]));
    assert_eq!(ind2sub(&[], &[], 3, Order::ColumnMajor, 0, IndexMode::Throw).unwrap(), empty);
    assert_eq!(ind2sub(&[], &[], 0, Order::RowMajor, -1, IndexMode::Normalize), Ok(vec![]));
    assert_eq!(ind2sub(&[], &[], 0, Order::RowMajor, 5, IndexMode::Wrap), Ok(vec![]));
    assert_eq!(ind2sub(&[], &[], 0, Order::RowMajor, 1, IndexMode::Throw).map_err(|e| e.kind()),
               Err(ErrorKind::IndexOutOfBounds));
    assert_eq!(vind2bind(&[], &[], 3, Order::RowMajor, 0, IndexMode::Throw), Ok(3));
    // an empty but not rank-0 shape holds nothing
    assert!(ind2sub(&[2, 0], &[1, 2], 0, Order::RowMajor, 0, IndexMode::Throw).is_err());
    assert!(ind2sub(&[2, 0], &[1, 2], 4, Order::RowMajor, 0, IndexMode::Throw).is_err());
}

#[test]
fn out_of_range_subscripts() {
    let err = sub2ind(&[2, 2], &[2, 1], 0, &[0, 5], &[IndexMode::Throw]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexOutOfBounds);
    let err = sub2ind(&[2, 2], &[2, 1], 0, &[0], &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IncompatibleShape);
    // modes cycle over the axes
    let modes = [IndexMode::Clamp, IndexMode::Wrap];
    assert_eq!(sub2ind(&[2, 3, 2], &[6, 2, 1], 0, &[9, 4, 9], &modes), Ok(6 + 2 + 1));
}

#[test]
fn index_resolution() {
    assert_eq!(resolve_index(-1, 4, IndexMode::Normalize), Ok(4));
    assert_eq!(resolve_index(-6, 4, IndexMode::Normalize).map_err(|e| e.kind()),
               Err(ErrorKind::IndexOutOfBounds));
    assert_eq!(resolve_index(7, 4, IndexMode::Wrap), Ok(2));
    assert_eq!(resolve_index(7, 4, IndexMode::Clamp), Ok(4));
    assert!(resolve_index(0, -1, IndexMode::Clamp).is_err());
    assert_eq!(submode_for(&[], 3, IndexMode::Wrap), IndexMode::Wrap);
    assert_eq!(submode_for(&[IndexMode::Clamp, IndexMode::Throw], 3, IndexMode::Wrap),
               IndexMode::Throw);
}

#[test]
fn layout_of_a_flipped_view() {
    // rows reversed over a 3x4 row-major buffer
    let (shape, strides, offset) = ([3, 4], [-4, 1], 8);
    assert_eq!(strides_to_offset(&shape, &strides), 8);
    assert_eq!(strides_to_order(&strides), StrideOrder::RowMajor);
    assert_eq!(iteration_order(&strides), 0);
    assert_eq!(min_view_buffer_index(&shape, &strides, offset), 0);
    assert_eq!(max_view_buffer_index(&shape, &strides, offset), 11);
    assert_eq!(vind2bind(&shape, &strides, offset, Order::RowMajor, 0, IndexMode::Throw), Ok(8));
    assert_eq!(vind2bind(&shape, &strides, offset, Order::RowMajor, 11, IndexMode::Throw), Ok(3));
}
