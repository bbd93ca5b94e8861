/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 编码器交给解码器、并在解码步之间传递的循环状态
 */

use crate::tensor::Tensor;

/// 解码器的运行状态，由调用方持有并在各步之间传递
///
/// 每个张量的形状为 [num_layers, batch, hidden_size]。
#[derive(Debug, Clone, PartialEq)]
pub enum RnnState {
    Gru(Tensor),
    Lstm { hidden: Tensor, cell: Tensor },
}

impl RnnState {
    /// 作为输出的隐藏状态
    pub fn hidden(&self) -> &Tensor {
        match self {
            Self::Gru(hidden) | Self::Lstm { hidden, .. } => hidden,
        }
    }

    pub fn cell(&self) -> Option<&Tensor> {
        match self {
            Self::Gru(_) => None,
            Self::Lstm { cell, .. } => Some(cell),
        }
    }

    /// 隐藏状态的层数；状态不是`[L, B, H]`的三维张量时返回`None`
    pub fn num_layers(&self) -> Option<usize> {
        self.layer_dim(0)
    }

    pub fn batch_size(&self) -> Option<usize> {
        self.layer_dim(1)
    }

    fn layer_dim(&self, axis: usize) -> Option<usize> {
        let shape = self.hidden().shape();
        (shape.len() == 3).then(|| shape[axis])
    }

    pub(crate) const fn kind(&self) -> &'static str {
        match self {
            Self::Gru(_) => "GRU",
            Self::Lstm { .. } => "LSTM",
        }
    }
}
