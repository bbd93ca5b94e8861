use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Axis, IxDyn, Zip};
use std::cmp::PartialEq;

impl PartialEq for Tensor {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

/// 按 NumPy 规则计算两个形状广播后的形状，不可广播时返回None
pub(in crate::tensor) fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut shape = vec![0; rank];
    for i in 0..rank {
        let da = if i + a.len() >= rank { a[i + a.len() - rank] } else { 1 };
        let db = if i + b.len() >= rank { b[i + b.len() - rank] } else { 1 };
        shape[i] = match (da, db) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            _ => return None,
        };
    }
    Some(shape)
}

/// 两个张量的逐元素运算（支持广播），加减乘共用
pub(in crate::tensor) fn elementwise<F>(a: &Tensor, b: &Tensor, operator: Operator, f: F) -> Tensor
where
    F: Fn(f32, f32) -> f32,
{
    let shape = broadcast_shape(a.shape(), b.shape()).unwrap_or_else(|| {
        panic!(
            "{}",
            TensorError::OperatorError {
                operator,
                tensor1_shape: a.shape().to_vec(),
                tensor2_shape: b.shape().to_vec(),
            }
        )
    });
    let dim = IxDyn(&shape);
    // 形状已校验可广播，这里的broadcast不会失败
    let (Some(av), Some(bv)) = (a.data.broadcast(dim.clone()), b.data.broadcast(dim)) else {
        unreachable!("广播形状已通过校验");
    };
    let data = Zip::from(&av).and(&bv).map_collect(|&x, &y| f(x, y));
    Tensor { data }
}

impl Tensor {
    /// 对张量中的所有元素求和并返回一个形状为[1]的标量。
    pub fn sum(&self) -> Tensor {
        Tensor::from(self.data.sum())
    }

    /// 沿`axis`维求和，结果比原张量少一维
    pub fn sum_axis(&self, axis: usize) -> Tensor {
        self.assert_axis(axis);
        Tensor {
            data: self.data.sum_axis(Axis(axis)),
        }
    }

    /// 沿`axis`维取最大值，结果比原张量少一维
    pub fn max_axis(&self, axis: usize) -> Tensor {
        self.assert_axis(axis);
        Tensor {
            data: self
                .data
                .map_axis(Axis(axis), |lane| lane.fold(f32::NEG_INFINITY, |m, &x| m.max(x))),
        }
    }

    /// 对每个元素应用`f`，返回新张量
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Tensor {
        Tensor {
            data: self.data.mapv(f),
        }
    }

    fn assert_axis(&self, axis: usize) {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
    }
}
