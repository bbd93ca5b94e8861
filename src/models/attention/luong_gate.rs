/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Luong-gate 注意力：查询与读出都经过两层 SELU + AlphaDropout 的自归一化变换
 *
 *   e_t = m_t · linear_in(h)
 *   α   = softmax(e)
 *   c   = Σ α_t m_t
 *   out = linear_out([h; c])
 * 记忆（编码器卷积上下文）的宽度须等于 hidden_size。
 */

use super::{AttentionMechanism, check_query_and_memory, dot_scores, weighted_read};
use crate::errors::ModelError;
use crate::nn::{AlphaDropout, Linear, Module, Session};
use crate::tensor::Tensor;

const DROPOUT: f32 = 0.1;

/// Linear -> SELU -> AlphaDropout，重复两次
#[derive(Debug)]
struct SeluBlock {
    layers: [Linear; 2],
    dropout: AlphaDropout,
}

impl SeluBlock {
    fn new(session: &Session, in_features: usize, out_features: usize) -> Self {
        Self {
            layers: [
                Linear::new(session, in_features, out_features, true),
                Linear::new(session, out_features, out_features, true),
            ],
            dropout: AlphaDropout::new(session, DROPOUT),
        }
    }

    fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        self.layers.iter().try_fold(x.clone(), |h, layer| {
            Ok(self.dropout.forward(&layer.forward(&h)?.selu()))
        })
    }
}

impl Module for SeluBlock {
    fn parameters(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }
}

#[derive(Debug)]
pub struct LuongGateAttention {
    linear_in: SeluBlock,
    linear_out: SeluBlock,
    hidden_size: usize,
}

impl LuongGateAttention {
    pub fn new(session: &Session, hidden_size: usize) -> Self {
        Self {
            linear_in: SeluBlock::new(session, hidden_size, hidden_size),
            linear_out: SeluBlock::new(session, 2 * hidden_size, hidden_size),
            hidden_size,
        }
    }
}

impl AttentionMechanism for LuongGateAttention {
    fn attend(&self, output: &Tensor, context: &Tensor) -> Result<(Tensor, Tensor), ModelError> {
        check_query_and_memory(
            "LuongGate注意力",
            output,
            context,
            self.hidden_size,
            self.hidden_size,
        )?;
        let query = self.linear_in.forward(output)?;
        let (read, weights) = weighted_read(&dot_scores(context, &query), context);
        let attended = self.linear_out.forward(&Tensor::concat(&[output, &read], 1))?;
        Ok((attended, weights))
    }
}

impl Module for LuongGateAttention {
    fn parameters(&self) -> Vec<&Tensor> {
        [self.linear_in.parameters(), self.linear_out.parameters()].concat()
    }
}
