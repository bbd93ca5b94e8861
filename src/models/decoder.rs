/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 循环解码器：单步的 词嵌入 -> 堆叠循环单元 -> （可选）注意力 -> 词表打分
 *
 * 解码器只提供单步函数，时间步循环与下一个输入 token 的选取由外部驱动方负责。
 * bahdanau/luong 注意力读取当前步的词嵌入（作为长度为 1 的记忆），
 * luong_gate 读取编码器的卷积上下文。
 */

use std::rc::Rc;

use super::{Attention, AttentionMechanism, CellType, RnnState, Seq2SeqConfig};
use crate::errors::ModelError;
use crate::nn::{Embedding, Linear, Module, Session, StackedGru, StackedLstm};
use crate::tensor::Tensor;

#[derive(Debug)]
enum DecoderRnn {
    Gru(StackedGru),
    Lstm(StackedLstm),
}

/// `decode_step`的结果
#[derive(Debug, Clone)]
pub struct DecoderOutput {
    /// 未归一化的词表打分 [B, tgt_vocab_size]
    pub scores: Tensor,
    /// 更新后的状态，交给下一步
    pub state: RnnState,
    /// 注意力权重 [B, T_ctx]；未使用注意力时为`None`
    pub attention: Option<Tensor>,
}

#[derive(Debug)]
pub struct RnnDecoder {
    embedding: Rc<Embedding>,
    rnn: DecoderRnn,
    attention: Option<Attention>,
    linear: Linear,
    config: Seq2SeqConfig,
}

impl RnnDecoder {
    /// 创建解码器
    ///
    /// - `embedding`为`None`时新建一张`tgt_vocab_size`大小的词嵌入表
    /// - `use_attention`为`false`时无论配置如何都不使用注意力
    pub fn new(
        session: &Session,
        config: &Seq2SeqConfig,
        embedding: Option<Rc<Embedding>>,
        use_attention: bool,
    ) -> Result<Self, ModelError> {
        config.validate()?;
        let embedding = match embedding {
            Some(e) if e.embedding_dim() != config.emb_size => {
                return Err(ModelError::ConfigurationError(format!(
                    "共享词嵌入的维度{}与emb_size({})不一致",
                    e.embedding_dim(),
                    config.emb_size
                )));
            }
            Some(e) => e,
            None => Rc::new(Embedding::new(session, config.tgt_vocab_size, config.emb_size)),
        };
        let rnn = match config.cell {
            CellType::Gru => DecoderRnn::Gru(StackedGru::new(
                session,
                config.emb_size,
                config.hidden_size,
                config.dec_num_layers,
                config.dropout,
            )),
            CellType::Lstm => DecoderRnn::Lstm(StackedLstm::new(
                session,
                config.emb_size,
                config.hidden_size,
                config.dec_num_layers,
                config.dropout,
            )),
        };
        let attention = if use_attention {
            Attention::from_type(
                session,
                config.attention,
                config.hidden_size,
                config.emb_size,
                config.pool_size,
            )?
        } else {
            None
        };
        log::debug!(
            "创建解码器：cell={}, layers={}, attention={}",
            config.cell,
            config.dec_num_layers,
            if attention.is_some() {
                config.attention.to_string()
            } else {
                "none".to_string()
            }
        );
        Ok(Self {
            embedding,
            rnn,
            attention,
            linear: Linear::new(session, config.hidden_size, config.tgt_vocab_size, true),
            config: config.clone(),
        })
    }

    /// 解码一步
    ///
    /// # 参数
    /// - `input_ids`: 每个样本当前步的输入 token，长度为 B
    /// - `state`: 运行状态，每个张量 [dec_num_layers, B, H]
    /// - `conv_context`: 编码器的卷积上下文 [T, B, H]（仅 luong_gate 读取）
    pub fn decode_step(
        &self,
        input_ids: &[usize],
        state: &RnnState,
        conv_context: &Tensor,
    ) -> Result<DecoderOutput, ModelError> {
        let embs = self.embedding.forward(input_ids)?;
        let (output, state) = match (&self.rnn, state) {
            (DecoderRnn::Gru(rnn), RnnState::Gru(hidden)) => {
                let (output, hidden) = rnn.step(&embs, hidden)?;
                (output, RnnState::Gru(hidden))
            }
            (DecoderRnn::Lstm(rnn), RnnState::Lstm { hidden, cell }) => {
                let (output, (hidden, cell)) = rnn.step(&embs, &(hidden.clone(), cell.clone()))?;
                (output, RnnState::Lstm { hidden, cell })
            }
            (_, other) => {
                return Err(ModelError::shape_mismatch(
                    &[self.config.dec_num_layers, input_ids.len(), self.config.hidden_size],
                    other.hidden().shape(),
                    format!(
                        "{}解码器收到了{}状态",
                        self.config.cell.to_string().to_uppercase(),
                        other.kind()
                    ),
                ));
            }
        };

        let (output, attention) = match &self.attention {
            Some(attention) => {
                let memory = if attention.reads_conv_context() {
                    conv_context.clone()
                } else {
                    embs.unsqueeze(0)
                };
                let (output, weights) = attention.attend(&output, &memory)?;
                (output, Some(weights))
            }
            None => (output, None),
        };
        log::trace!("解码一步：batch={}", input_ids.len());

        Ok(DecoderOutput {
            scores: self.compute_score(&output)?,
            state,
            attention,
        })
    }

    /// 把解码器输出 [B, H] 投影为词表打分 [B, tgt_vocab_size]
    pub fn compute_score(&self, hiddens: &Tensor) -> Result<Tensor, ModelError> {
        self.linear.forward(hiddens)
    }

    pub fn attention(&self) -> Option<&Attention> {
        self.attention.as_ref()
    }

    pub fn embedding(&self) -> &Rc<Embedding> {
        &self.embedding
    }

    pub const fn config(&self) -> &Seq2SeqConfig {
        &self.config
    }
}

impl Module for RnnDecoder {
    fn parameters(&self) -> Vec<&Tensor> {
        let rnn = match &self.rnn {
            DecoderRnn::Gru(rnn) => rnn.parameters(),
            DecoderRnn::Lstm(rnn) => rnn.parameters(),
        };
        let attention = self
            .attention
            .as_ref()
            .map(|a| a.parameters())
            .unwrap_or_default();
        [self.embedding.parameters(), rnn, attention, self.linear.parameters()].concat()
    }
}
