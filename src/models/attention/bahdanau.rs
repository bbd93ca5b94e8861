/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Bahdanau（加性）注意力
 *
 *   e_t = v · tanh(W_m m_t + W_h h)
 *   α   = softmax(e)
 *   c   = Σ α_t m_t
 *   out = maxout(W_r [c; h])
 */

use super::{AttentionMechanism, check_query_and_memory, maxout, weighted_read};
use crate::errors::ModelError;
use crate::nn::{Linear, Module, Session};
use crate::tensor::Tensor;

#[derive(Debug)]
pub struct BahdanauAttention {
    memory_proj: Linear,
    query_proj: Linear,
    v: Linear,
    readout: Linear,
    hidden_size: usize,
    memory_width: usize,
    pool_size: usize,
}

impl BahdanauAttention {
    pub fn new(
        session: &Session,
        hidden_size: usize,
        memory_width: usize,
        pool_size: usize,
    ) -> Result<Self, ModelError> {
        if pool_size == 0 {
            return Err(ModelError::ConfigurationError(
                "Bahdanau注意力的pool_size须大于0".to_string(),
            ));
        }
        Ok(Self {
            memory_proj: Linear::new(session, memory_width, hidden_size, false),
            query_proj: Linear::new(session, hidden_size, hidden_size, true),
            v: Linear::new(session, hidden_size, 1, false),
            readout: Linear::new(session, memory_width + hidden_size, hidden_size * pool_size, true),
            hidden_size,
            memory_width,
            pool_size,
        })
    }
}

impl AttentionMechanism for BahdanauAttention {
    fn attend(&self, output: &Tensor, context: &Tensor) -> Result<(Tensor, Tensor), ModelError> {
        let (seq_len, batch, width) = check_query_and_memory(
            "Bahdanau注意力",
            output,
            context,
            self.hidden_size,
            self.memory_width,
        )?;

        let keys = self
            .memory_proj
            .forward(&context.reshape(&[seq_len * batch, width]))?
            .reshape(&[seq_len, batch, self.hidden_size]);
        let query = self.query_proj.forward(output)?;
        let energy = (keys + &query).tanh().reshape(&[seq_len * batch, self.hidden_size]);
        let scores = self
            .v
            .forward(&energy)?
            .reshape(&[seq_len, batch])
            .transpose_dims(0, 1);

        let (read, weights) = weighted_read(&scores, context);
        let combined = self.readout.forward(&Tensor::concat(&[&read, output], 1))?;
        Ok((maxout(&combined, self.pool_size), weights))
    }
}

impl Module for BahdanauAttention {
    fn parameters(&self) -> Vec<&Tensor> {
        [
            self.memory_proj.parameters(),
            self.query_proj.parameters(),
            self.v.parameters(),
            self.readout.parameters(),
        ]
        .concat()
    }
}
