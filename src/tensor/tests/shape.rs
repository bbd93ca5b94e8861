use crate::assert_panic;
use crate::errors::TensorError;
use crate::tensor::Tensor;

#[test]
fn test_compare_shapes() {
    let tensor1 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    let tensor2 = Tensor::new(&[1., 2., 3., 4.], &[1, 4]);
    assert!(tensor1.is_same_shape(&tensor2));

    let tensor2 = Tensor::new(&[1., 2., 3., 4.], &[4, 1]);
    assert!(!tensor1.is_same_shape(&tensor2));
}

#[test]
fn test_is_scalar_and_number() {
    assert!(Tensor::new(&[1.], &[]).is_scalar());
    assert!(Tensor::new(&[1.], &[1, 1]).is_scalar());
    assert!(!Tensor::new(&[1., 2.], &[2]).is_scalar());
    assert_eq!(Tensor::new(&[7.], &[1, 1]).number(), Some(7.));
    assert_eq!(Tensor::new(&[1., 2.], &[2]).number(), None);
}

#[test]
fn test_stack_with_new_dim() {
    assert_panic!(Tensor::stack(&[], true), TensorError::EmptyList);

    let t1 = Tensor::new(&[1., 2.], &[1, 2]);
    let t2 = Tensor::new(&[3., 4.], &[1, 2]);
    let stacked = Tensor::stack(&[&t1, &t2], true);
    assert_eq!(stacked, Tensor::new(&[1., 2., 3., 4.], &[2, 1, 2]));

    let t3 = Tensor::new(&[1., 2., 3.], &[1, 3]);
    assert_panic!(
        Tensor::stack(&[&t1, &t3], true),
        TensorError::InconsitentShape
    );
}

#[test]
fn test_stack_without_new_dim() {
    let t1 = Tensor::new(&[1., 2.], &[1, 2]);
    let t2 = Tensor::new(&[3., 4., 5., 6.], &[2, 2]);
    let stacked = Tensor::stack(&[&t1, &t2], false);
    assert_eq!(stacked, Tensor::new(&[1., 2., 3., 4., 5., 6.], &[3, 2]));
}

#[test]
fn test_concat_last_axis() {
    let a = Tensor::new(&[1., 2., 3., 4.], &[2, 2]);
    let b = Tensor::new(&[5., 6.], &[2, 1]);
    let c = Tensor::concat(&[&a, &b], 1);
    assert_eq!(c, Tensor::new(&[1., 2., 5., 3., 4., 6.], &[2, 3]));
}

#[test]
fn test_select_and_narrow() {
    let x = Tensor::new(&[0., 1., 2., 3., 4., 5., 6., 7., 8., 9., 10., 11.], &[3, 2, 2]);
    assert_eq!(x.select(0, 1), Tensor::new(&[4., 5., 6., 7.], &[2, 2]));
    assert_eq!(x.select(2, 0), Tensor::new(&[0., 2., 4., 6., 8., 10.], &[3, 2]));
    assert_eq!(x.narrow(0, 1, 2).shape(), &[2, 2, 2]);
    assert_eq!(x.narrow(2, 1, 1).to_vec(), vec![1., 3., 5., 7., 9., 11.]);
    assert_panic!(
        x.select(0, 3),
        TensorError::IndexOutOfRange {
            axis: 0,
            len: 3,
            start: 3,
            end: 4,
        }
    );
}

#[test]
fn test_transpose_dims_then_reshape() {
    // [time=2, batch=3] -> [batch=3, time=2]
    let x = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[2, 3]);
    let t = x.transpose_dims(0, 1);
    assert_eq!(t.shape(), &[3, 2]);
    assert_eq!(t.to_vec(), vec![1., 4., 2., 5., 3., 6.]);
    // 转置后的reshape按新的行优先顺序进行
    assert_eq!(t.reshape(&[6]).to_vec(), vec![1., 4., 2., 5., 3., 6.]);
    assert_eq!(x.unsqueeze(0).shape(), &[1, 2, 3]);
}

#[test]
fn test_select_rows() {
    let new = Tensor::new(&[1., 2., 3., 4., 5., 6.], &[3, 2]);
    let old = Tensor::new(&[-1., -2., -3., -4., -5., -6.], &[3, 2]);
    let picked = Tensor::select_rows(&[true, false, true], &new, &old);
    assert_eq!(picked.to_vec(), vec![1., 2., -3., -4., 5., 6.]);
    assert_panic!(
        Tensor::select_rows(&[true, false], &new, &old),
        TensorError::IncompatibleShape
    );
}
