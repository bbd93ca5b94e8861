use crate::errors::{Operator, TensorError};
use crate::tensor::Tensor;
use ndarray::{Axis, Ix2};

impl Tensor {
    /// 实现矩阵乘法。只接受2阶张量，否则会触发panic。
    /// 需要保证前一个张量的列数（col）等于后一个张量的行数（row），否则也会触发panic。
    pub fn mat_mul(&self, other: &Tensor) -> Tensor {
        assert!(self.dimension() == 2, "输入的张量维度必须为2");
        assert!(other.dimension() == 2, "输入的张量维度必须为2");
        assert!(
            self.shape()[1] == other.shape()[0],
            "前一个张量的列数必须等于后一个张量的行数"
        );
        let (Ok(self_data), Ok(other_data)) = (
            self.data.view().into_dimensionality::<Ix2>(),
            other.data.view().into_dimensionality::<Ix2>(),
        ) else {
            unreachable!("维数已校验为2");
        };
        Tensor {
            data: self_data.dot(&other_data).into_dyn(),
        }
    }

    /// 批量矩阵乘法：[b, n, m] × [b, m, p] -> [b, n, p]
    pub fn batch_mat_mul(&self, other: &Tensor) -> Tensor {
        assert!(self.dimension() == 3, "输入的张量维度必须为3");
        assert!(other.dimension() == 3, "输入的张量维度必须为3");
        assert!(
            self.shape()[0] == other.shape()[0] && self.shape()[2] == other.shape()[1],
            "{}",
            TensorError::OperatorError {
                operator: Operator::MatMul,
                tensor1_shape: self.shape().to_vec(),
                tensor2_shape: other.shape().to_vec(),
            }
        );
        let products = (0..self.shape()[0])
            .map(|b| self.select(0, b).mat_mul(&other.select(0, b)))
            .collect::<Vec<_>>();
        let views = products.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::stack(Axis(0), &views)
            .unwrap_or_else(|_| panic!("{}", TensorError::InconsitentShape));
        Tensor { data }
    }
}
