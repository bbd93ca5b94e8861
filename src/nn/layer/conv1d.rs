/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Conv1d (1D 空洞卷积) 层 - PyTorch 风格 API
 *
 * 输入/输出形状（特征优先）：
 * - 输入：[batch_size, in_channels, L]
 * - 输出：[batch_size, out_channels, L']
 *
 * 输出长度计算（步长固定为 1）：
 * L' = L + 2*padding - dilation*(kernel_size - 1)
 *
 * 计算：output[b, o, t] = bias[o] + Σ_{c,k} K[o, c, k] · x_pad[b, c, t + k*dilation]
 */

use crate::errors::ModelError;
use crate::nn::{Init, Module, Session};
use crate::tensor::Tensor;
use ndarray::{Array3, Ix1, Ix3};

#[derive(Debug, Clone)]
pub struct Conv1d {
    /// 卷积核参数 [out_channels, in_channels, kernel_size]
    pub(crate) kernel: Tensor,
    /// 偏置参数 [out_channels]
    pub(crate) bias: Tensor,
    in_channels: usize,
    out_channels: usize,
    kernel_size: usize,
    padding: usize,
    dilation: usize,
}

impl Conv1d {
    /// 创建新的 Conv1d 层（LeCun 正态初始化卷积核，偏置置零）
    pub fn new(
        session: &Session,
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        padding: usize,
        dilation: usize,
    ) -> Self {
        let kernel = session.parameter(
            &[out_channels, in_channels, kernel_size],
            Init::LeCun {
                fan_in: in_channels * kernel_size,
            },
        );
        let bias = session.parameter(&[out_channels], Init::Zeros);
        Self {
            kernel,
            bias,
            in_channels,
            out_channels,
            kernel_size,
            padding,
            dilation,
        }
    }

    /// 给定输入长度时的输出长度；结果不为正时返回None
    pub fn output_len(&self, input_len: usize) -> Option<usize> {
        let span = self.dilation * (self.kernel_size - 1);
        (input_len + 2 * self.padding).checked_sub(span).filter(|&l| l > 0)
    }

    pub fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        let shape_err = || {
            let batch = x.shape().first().copied().unwrap_or(0);
            let len = x.shape().get(2).copied().unwrap_or(0);
            ModelError::shape_mismatch(
                &[batch, self.in_channels, len],
                x.shape(),
                "Conv1d的输入形状",
            )
        };
        if x.dimension() != 3 || x.shape()[1] != self.in_channels {
            return Err(shape_err());
        }
        let (batch, input_len) = (x.shape()[0], x.shape()[2]);
        let output_len = self.output_len(input_len).ok_or_else(shape_err)?;

        let input = x.view().into_dimensionality::<Ix3>().map_err(|_| shape_err())?;
        let kernel = self.kernel.view().into_dimensionality::<Ix3>().map_err(|_| shape_err())?;
        let bias = self.bias.view().into_dimensionality::<Ix1>().map_err(|_| shape_err())?;

        let mut output = Array3::<f32>::zeros((batch, self.out_channels, output_len));
        for ((b, o, t), value) in output.indexed_iter_mut() {
            let mut acc = bias[o];
            for k in 0..self.kernel_size {
                // 填充区域视为 0，直接跳过
                let Some(pos) = (t + k * self.dilation).checked_sub(self.padding) else {
                    continue;
                };
                if pos >= input_len {
                    continue;
                }
                for c in 0..self.in_channels {
                    acc += kernel[[o, c, k]] * input[[b, c, pos]];
                }
            }
            *value = acc;
        }
        Ok(Tensor::from(output.into_dyn()))
    }

    pub const fn kernel_size(&self) -> usize {
        self.kernel_size
    }

    pub const fn padding(&self) -> usize {
        self.padding
    }

    pub const fn dilation(&self) -> usize {
        self.dilation
    }

    pub const fn out_channels(&self) -> usize {
        self.out_channels
    }
}

impl Module for Conv1d {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.kernel, &self.bias]
    }
}
