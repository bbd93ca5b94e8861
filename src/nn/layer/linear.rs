/*
 * @Author       : 老董
 * @Date         : 2026-01-17
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : Linear (全连接) 层
 */

use crate::errors::ModelError;
use crate::nn::{Init, Module, Session};
use crate::tensor::Tensor;

/// Linear (全连接) 层
///
/// PyTorch 风格的全连接层：`output = x @ W + b`
///
/// # 输入/输出形状
/// - 输入：[batch_size, in_features]
/// - 输出：[batch_size, out_features]
///
/// # 使用示例
/// ```ignore
/// let fc = Linear::new(&session, 8, 100, true);
/// let scores = fc.forward(&h)?;
/// ```
#[derive(Debug, Clone)]
pub struct Linear {
    /// 权重参数 [in_features, out_features]
    pub(crate) weights: Tensor,
    /// 偏置参数 [1, out_features]（可选）
    pub(crate) bias: Option<Tensor>,
    in_features: usize,
    out_features: usize,
}

impl Linear {
    /// 创建新的 Linear 层（Kaiming 初始化权重，偏置置零）
    pub fn new(session: &Session, in_features: usize, out_features: usize, use_bias: bool) -> Self {
        let weights = session.parameter(&[in_features, out_features], Init::Kaiming);
        let bias = use_bias.then(|| session.parameter(&[1, out_features], Init::Zeros));
        Self {
            weights,
            bias,
            in_features,
            out_features,
        }
    }

    /// 前向传播
    ///
    /// # 参数
    /// - `x`: 输入张量，形状 [batch_size, in_features]
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        if x.dimension() != 2 || x.shape()[1] != self.in_features {
            let batch = x.shape().first().copied().unwrap_or(0);
            return Err(ModelError::shape_mismatch(
                &[batch, self.in_features],
                x.shape(),
                "Linear的输入形状",
            ));
        }
        let output = x.mat_mul(&self.weights);
        Ok(match &self.bias {
            Some(b) => output + b,
            None => output,
        })
    }

    pub const fn in_features(&self) -> usize {
        self.in_features
    }

    pub const fn out_features(&self) -> usize {
        self.out_features
    }
}

impl Module for Linear {
    fn parameters(&self) -> Vec<&Tensor> {
        std::iter::once(&self.weights).chain(self.bias.as_ref()).collect()
    }
}
