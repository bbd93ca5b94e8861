/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 张量上的激活函数（逐元素）以及沿最后一维的softmax
 */

use crate::tensor::Tensor;
use ndarray::Axis;

/// SELU 的 λ
pub const SELU_SCALE: f32 = 1.050_700_987_355_480_5;
/// SELU 的 α
pub const SELU_ALPHA: f32 = 1.673_263_242_354_377_3;

impl Tensor {
    pub fn sigmoid(&self) -> Tensor {
        self.map(|x| 1.0 / (1.0 + (-x).exp()))
    }

    pub fn tanh(&self) -> Tensor {
        self.map(f32::tanh)
    }

    /// selu(x) = λ·x （x > 0），λ·α·(eˣ - 1)（x ≤ 0）
    pub fn selu(&self) -> Tensor {
        self.map(|x| {
            if x > 0.0 {
                SELU_SCALE * x
            } else {
                SELU_SCALE * SELU_ALPHA * x.exp_m1()
            }
        })
    }

    /// 沿最后一维做数值稳定的softmax
    pub fn softmax(&self) -> Tensor {
        assert!(self.dimension() >= 1, "softmax需要至少1维的张量");
        let last = Axis(self.dimension() - 1);
        let mut data = self.data.clone();
        for mut lane in data.lanes_mut(last) {
            let max = lane.fold(f32::NEG_INFINITY, |m, &x| m.max(x));
            lane.mapv_inplace(|x| (x - max).exp());
            let sum = lane.sum();
            lane.mapv_inplace(|x| x / sum);
        }
        Tensor { data }
    }
}
