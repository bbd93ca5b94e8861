/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Embedding (词嵌入) 层：按 token id 查表
 */

use crate::errors::ModelError;
use crate::nn::{Init, Module, Session};
use crate::tensor::Tensor;
use ndarray::Array2;

/// 词嵌入表，权重形状 [vocab_size, embedding_dim]，按标准正态分布初始化。
///
/// 编码器与解码器可以通过 `Rc<Embedding>` 共享同一张表。
#[derive(Debug, Clone)]
pub struct Embedding {
    pub(crate) weight: Tensor,
    vocab_size: usize,
    embedding_dim: usize,
}

impl Embedding {
    pub fn new(session: &Session, vocab_size: usize, embedding_dim: usize) -> Self {
        let weight = session.parameter(
            &[vocab_size, embedding_dim],
            Init::Normal {
                mean: 0.0,
                std: 1.0,
            },
        );
        Self {
            weight,
            vocab_size,
            embedding_dim,
        }
    }

    /// 查一批 token：`ids` 长度为 n，返回 [n, embedding_dim]
    pub fn forward(&self, ids: &[usize]) -> Result<Tensor, ModelError> {
        if let Some(&bad) = ids.iter().find(|&&id| id >= self.vocab_size) {
            return Err(ModelError::shape_mismatch(
                &[self.vocab_size],
                &[bad],
                "token id 超出词表范围",
            ));
        }
        if ids.is_empty() {
            return Ok(Tensor::zeros(&[0, self.embedding_dim]));
        }
        let rows = ids
            .iter()
            .map(|&id| self.weight.select(0, id))
            .collect::<Vec<_>>();
        Ok(Tensor::stack(&rows.iter().collect::<Vec<_>>(), true))
    }

    /// 查一整个时间优先的批次：`ids` 形状 [T, B]，返回 [T, B, embedding_dim]
    pub fn forward_sequence(&self, ids: &Array2<usize>) -> Result<Tensor, ModelError> {
        let (seq_len, batch) = ids.dim();
        let flat = ids.iter().copied().collect::<Vec<_>>();
        Ok(self
            .forward(&flat)?
            .reshape(&[seq_len, batch, self.embedding_dim]))
    }

    pub const fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    pub const fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

impl Module for Embedding {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weight]
    }
}
