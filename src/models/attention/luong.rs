/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Luong（general 打分）注意力
 *
 *   e_t = m_t · (W_in h)
 *   α   = softmax(e)
 *   c   = Σ α_t m_t
 *   out = tanh(maxout(W_out [c; h]))
 */

use super::{AttentionMechanism, check_query_and_memory, dot_scores, maxout, weighted_read};
use crate::errors::ModelError;
use crate::nn::{Linear, Module, Session};
use crate::tensor::Tensor;

#[derive(Debug)]
pub struct LuongAttention {
    linear_in: Linear,
    linear_out: Linear,
    hidden_size: usize,
    memory_width: usize,
    pool_size: usize,
}

impl LuongAttention {
    pub fn new(
        session: &Session,
        hidden_size: usize,
        memory_width: usize,
        pool_size: usize,
    ) -> Result<Self, ModelError> {
        if pool_size == 0 {
            return Err(ModelError::ConfigurationError(
                "Luong注意力的pool_size须大于0".to_string(),
            ));
        }
        Ok(Self {
            linear_in: Linear::new(session, hidden_size, memory_width, false),
            linear_out: Linear::new(
                session,
                memory_width + hidden_size,
                hidden_size * pool_size,
                true,
            ),
            hidden_size,
            memory_width,
            pool_size,
        })
    }
}

impl AttentionMechanism for LuongAttention {
    fn attend(&self, output: &Tensor, context: &Tensor) -> Result<(Tensor, Tensor), ModelError> {
        check_query_and_memory(
            "Luong注意力",
            output,
            context,
            self.hidden_size,
            self.memory_width,
        )?;
        let query = self.linear_in.forward(output)?;
        let (read, weights) = weighted_read(&dot_scores(context, &query), context);
        let combined = self.linear_out.forward(&Tensor::concat(&[&read, output], 1))?;
        Ok((maxout(&combined, self.pool_size).tanh(), weights))
    }
}

impl Module for LuongAttention {
    fn parameters(&self) -> Vec<&Tensor> {
        [self.linear_in.parameters(), self.linear_out.parameters()].concat()
    }
}
