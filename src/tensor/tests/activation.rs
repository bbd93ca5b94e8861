use crate::tensor::Tensor;
use approx::assert_abs_diff_eq;

#[test]
fn test_sigmoid_and_tanh() {
    let x = Tensor::new(&[0.0, 1.0, -1.0], &[3]);
    let s = x.sigmoid().to_vec();
    assert_abs_diff_eq!(s[0], 0.5, epsilon = 1e-6);
    assert_abs_diff_eq!(s[1], 0.731_058_6, epsilon = 1e-6);
    assert_abs_diff_eq!(s[2], 0.268_941_4, epsilon = 1e-6);

    let t = x.tanh().to_vec();
    assert_abs_diff_eq!(t[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(t[1], 0.761_594_2, epsilon = 1e-6);
    assert_abs_diff_eq!(t[2], -0.761_594_2, epsilon = 1e-6);
}

#[test]
fn test_selu() {
    let x = Tensor::new(&[0.0, 1.0, -1.0], &[3]);
    let y = x.selu().to_vec();
    assert_abs_diff_eq!(y[0], 0.0, epsilon = 1e-6);
    assert_abs_diff_eq!(y[1], 1.050_701, epsilon = 1e-5);
    // λ·α·(e⁻¹ - 1)
    assert_abs_diff_eq!(y[2], -1.111_330_7, epsilon = 1e-5);
}

#[test]
fn test_softmax_last_axis() {
    let x = Tensor::new(&[1.0, 2.0, 3.0, 1000.0, 1000.0, 1000.0], &[2, 3]);
    let y = x.softmax();
    assert_eq!(y.shape(), &[2, 3]);
    let v = y.to_vec();
    assert_abs_diff_eq!(v[0], 0.090_030_57, epsilon = 1e-6);
    assert_abs_diff_eq!(v[1], 0.244_728_47, epsilon = 1e-6);
    assert_abs_diff_eq!(v[2], 0.665_240_94, epsilon = 1e-6);
    // 大数值不溢出
    for p in &v[3..] {
        assert_abs_diff_eq!(*p, 1.0 / 3.0, epsilon = 1e-6);
    }
}

#[test]
fn test_max_and_sum_axis() {
    let x = Tensor::new(&[1., 5., 3., 4., 2., 6.], &[2, 3]);
    assert_eq!(x.max_axis(1), Tensor::new(&[5., 6.], &[2]));
    assert_eq!(x.sum_axis(0), Tensor::new(&[5., 7., 9.], &[3]));
    assert_eq!(x.sum().number(), Some(21.));
}
