use ndview::{broadcast_arrays, broadcast_shapes, ArrayOptions, DType, ErrorKind, IndexMode, NdArray,
             Order, Value};

#[test]
fn shapes_broadcast() {
    assert_eq!(broadcast_shapes(&[&[3, 1], &[1, 4]]).unwrap(), [3, 4]);
    assert_eq!(broadcast_shapes(&[&[5, 1, 3], &[4, 1], &[3]]).unwrap(), [5, 4, 3]);
    assert_eq!(broadcast_shapes(&[&[], &[2, 2]]).unwrap(), [2, 2]);
    assert_eq!(broadcast_shapes(&[&[1, 0], &[3, 1]]).unwrap(), [3, 0]);
    assert_eq!(broadcast_shapes(&[]).unwrap(), Vec::<usize>::new());
    assert_eq!(broadcast_shapes(&[&[2, 3], &[3, 3]]).map_err(|e| e.kind()),
               Err(ErrorKind::IncompatibleShape));
}

#[test]
fn broadcast_view_reads_source_elements() {
    let column = NdArray::from_vec(vec![1, 2, 3], &[3, 1], Order::RowMajor).unwrap();
    let row = NdArray::from_vec(vec![10, 20, 30, 40], &[1, 4], Order::RowMajor).unwrap();
    let shape = broadcast_shapes(&[column.shape(), row.shape()]).unwrap();
    let bc = column.broadcast_to(&shape).unwrap();
    let br = row.broadcast_to(&shape).unwrap();
    for i in 0..3 {
        for j in 0..4 {
            assert_eq!(bc.get(&[i, j]), column.get(&[i, 0]));
            assert_eq!(br.get(&[i, j]), row.get(&[0, j]));
        }
    }
}

#[test]
fn broadcast_views_are_read_only() {
    let a = NdArray::from_vec(vec![1.], &[1], Order::RowMajor).unwrap();
    let b = a.broadcast_to(&[2, 3]).unwrap();
    assert!(b.is_read_only());
    assert!(b.flags().read_only);
    assert_eq!(b.strides(), &[0, 0]);
    b.set(&[1, 1], 5.);
    assert_eq!(a.get(&[0]), Some(Value::Float64(1.)));
    assert!(b.try_iset(0, 5.).is_err());
    // the source stays writable
    a.set(&[0], 2.);
    assert_eq!(b.get(&[1, 2]), Some(Value::Float64(2.)));
}

#[test]
fn new_options_keep_broadcast_views_read_only() {
    let a = NdArray::from_vec(vec![1, 2, 3], &[3], Order::RowMajor).unwrap();
    let b = a.broadcast_to(&[4, 3]).unwrap()
             .with_array_options(ArrayOptions::new().mode(IndexMode::Wrap));
    assert!(b.is_read_only());
    assert_eq!(b.mode(), IndexMode::Wrap);
    b.set(&[0, 0], 99);
    assert_eq!(b.try_set(&[0, 0], 99).err().map(|e| e.kind()), Some(ErrorKind::ReadOnly));
    assert_eq!(b.to_vec::<i32>(Order::RowMajor), [1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    assert_eq!(a.to_vec::<i32>(Order::RowMajor), [1, 2, 3]);

    // a writable array can still be made read-only
    let c = a.with_array_options(ArrayOptions::new().read_only(true));
    assert!(c.is_read_only() && !a.is_read_only());
}

#[test]
fn rank0_broadcasts_to_anything() {
    let z = NdArray::zeros(DType::Int8, &[], Order::RowMajor).unwrap();
    assert!(z.broadcast_to(&[]).is_ok());
    assert!(z.broadcast_to(&[7, 2, 9]).is_ok());
    let a = NdArray::zeros(DType::Int8, &[2, 1], Order::RowMajor).unwrap();
    assert!(a.broadcast_to(&[1]).is_err());
    assert!(a.broadcast_to(&[]).is_err());
    assert!(a.broadcast_to(&[32, 2, 1]).is_ok());
    assert!(a.broadcast_to(&[32, 1, 2]).is_err());
}

#[test]
fn broadcast_many_arrays() {
    let a = NdArray::zeros(DType::Float32, &[4, 1, 3], Order::RowMajor).unwrap();
    let b = NdArray::zeros(DType::Float64, &[5, 1], Order::ColumnMajor).unwrap();
    let c = NdArray::zeros(DType::Uint8, &[], Order::RowMajor).unwrap();
    let out = broadcast_arrays(&[&a, &b, &c]).unwrap();
    assert_eq!(out.len(), 3);
    for v in &out {
        assert_eq!(v.shape(), &[4, 5, 3]);
        assert!(v.is_read_only());
    }
    assert_eq!(out[1].dtype(), DType::Float64);
    assert!(out[2].shares_buffer(&c));
}
