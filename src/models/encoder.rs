/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 循环编码器：词嵌入 -> 按真实长度展开的多层（双向）GRU/LSTM -> 多尺度空洞卷积精炼
 *
 * 输出三样东西：
 * - outputs：[T, B, H]，双向时把正反两半相加（而非拼接）
 * - state：约简到解码器层数的最终状态 [dec_num_layers, B, H]
 * - conv_context：outputs 经三层空洞卷积（dilation 1/2/3）后的 [T, B, H]
 */

use std::rc::Rc;

use ndarray::Array2;

use super::{CellType, RnnState, Seq2SeqConfig};
use crate::errors::ModelError;
use crate::nn::{AlphaDropout, Conv1d, Embedding, Gru, Lstm, Module, Session};
use crate::tensor::Tensor;

const CONV_KERNEL_SIZE: usize = 3;
const CONV_DILATIONS: [usize; 3] = [1, 2, 3];
const CONV_DROPOUT: f32 = 0.05;

/// 三层 Conv1d(kernel=3, padding=dilation) -> SELU -> AlphaDropout，序列长度保持不变
#[derive(Debug)]
pub struct DilatedConvStack {
    convs: Vec<Conv1d>,
    dropout: AlphaDropout,
}

impl DilatedConvStack {
    pub fn new(session: &Session, channels: usize) -> Self {
        let convs = CONV_DILATIONS
            .iter()
            .map(|&d| Conv1d::new(session, channels, channels, CONV_KERNEL_SIZE, d, d))
            .collect();
        Self {
            convs,
            dropout: AlphaDropout::new(session, CONV_DROPOUT),
        }
    }

    /// `x`: [T, B, H]，返回同形状的张量
    pub fn forward(&self, x: &Tensor) -> Result<Tensor, ModelError> {
        // 卷积沿时间轴进行：[T, B, H] -> [B, H, T]
        let mut conv = x.permute(&[1, 2, 0]);
        for layer in &self.convs {
            conv = self.dropout.forward(&layer.forward(&conv)?.selu());
        }
        Ok(conv.permute(&[2, 0, 1]))
    }

    pub fn convs(&self) -> &[Conv1d] {
        &self.convs
    }
}

impl Module for DilatedConvStack {
    fn parameters(&self) -> Vec<&Tensor> {
        self.convs.iter().flat_map(|c| c.parameters()).collect()
    }
}

#[derive(Debug)]
enum EncoderRnn {
    Gru(Gru),
    Lstm(Lstm),
}

/// `encode`的结果，编码器输出与卷积上下文在整个解码过程中只读共享
#[derive(Debug, Clone)]
pub struct EncoderOutput {
    /// [T, B, H]
    pub outputs: Tensor,
    /// 约简后的初始解码状态，每个张量 [dec_num_layers, B, H]
    pub state: RnnState,
    /// [T, B, H]
    pub conv_context: Tensor,
}

#[derive(Debug)]
pub struct RnnEncoder {
    embedding: Rc<Embedding>,
    rnn: EncoderRnn,
    dconv: DilatedConvStack,
    config: Seq2SeqConfig,
}

impl RnnEncoder {
    /// 创建编码器；`embedding`为`None`时新建一张`src_vocab_size`大小的词嵌入表
    pub fn new(
        session: &Session,
        config: &Seq2SeqConfig,
        embedding: Option<Rc<Embedding>>,
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
            None => Rc::new(Embedding::new(session, config.src_vocab_size, config.emb_size)),
        };
        let rnn = match config.cell {
            CellType::Gru => EncoderRnn::Gru(Gru::new(
                session,
                config.emb_size,
                config.hidden_size,
                config.enc_num_layers,
                config.bidirectional,
                config.dropout,
            )),
            CellType::Lstm => EncoderRnn::Lstm(Lstm::new(
                session,
                config.emb_size,
                config.hidden_size,
                config.enc_num_layers,
                config.bidirectional,
                config.dropout,
            )),
        };
        log::debug!(
            "创建编码器：cell={}, layers={}, bidirectional={}, hidden={}",
            config.cell,
            config.enc_num_layers,
            config.bidirectional,
            config.hidden_size
        );
        Ok(Self {
            embedding,
            rnn,
            dconv: DilatedConvStack::new(session, config.hidden_size),
            config: config.clone(),
        })
    }

    /// 编码一批时间优先的 token 序列
    ///
    /// # 参数
    /// - `ids`: [T, B]，超出真实长度的位置为填充
    /// - `lengths`: 每个样本的真实长度，`1 <= len <= T`
    pub fn encode(&self, ids: &Array2<usize>, lengths: &[usize]) -> Result<EncoderOutput, ModelError> {
        let (seq_len, batch) = ids.dim();
        if seq_len == 0 || batch == 0 {
            return Err(ModelError::shape_mismatch(
                &[seq_len.max(1), batch.max(1)],
                &[seq_len, batch],
                "编码器的输入不能为空",
            ));
        }
        log::trace!("编码：seq_len={seq_len}, batch={batch}");

        let embeds = self.embedding.forward_sequence(ids)?;
        let (outputs, state) = match &self.rnn {
            EncoderRnn::Gru(rnn) => {
                let (outputs, hidden) = rnn.forward(&embeds, lengths)?;
                (outputs, RnnState::Gru(hidden))
            }
            EncoderRnn::Lstm(rnn) => {
                let (outputs, (hidden, cell)) = rnn.forward(&embeds, lengths)?;
                (outputs, RnnState::Lstm { hidden, cell })
            }
        };

        let hidden = self.config.hidden_size;
        let outputs = if self.config.bidirectional {
            outputs.narrow(2, 0, hidden) + outputs.narrow(2, hidden, hidden)
        } else {
            outputs
        };
        let conv_context = self.dconv.forward(&outputs)?;

        Ok(EncoderOutput {
            outputs,
            state: self.reduce_state(state),
            conv_context,
        })
    }

    /// 把 [L * D, B, H] 的编码器最终状态约简为 [dec_num_layers, B, H]
    ///
    /// - GRU：取前 dec_num_layers 个条目
    /// - LSTM：隐藏状态与细胞状态各自每隔一个取一个（即各层的正向条目）
    fn reduce_state(&self, state: RnnState) -> RnnState {
        match state {
            RnnState::Gru(hidden) => {
                RnnState::Gru(hidden.narrow(0, 0, self.config.dec_num_layers))
            }
            RnnState::Lstm { hidden, cell } => RnnState::Lstm {
                hidden: every_other(&hidden),
                cell: every_other(&cell),
            },
        }
    }

    pub fn embedding(&self) -> &Rc<Embedding> {
        &self.embedding
    }

    pub const fn config(&self) -> &Seq2SeqConfig {
        &self.config
    }
}

fn every_other(t: &Tensor) -> Tensor {
    let rows = (0..t.shape()[0])
        .step_by(2)
        .map(|i| t.select(0, i))
        .collect::<Vec<_>>();
    Tensor::stack(&rows.iter().collect::<Vec<_>>(), true)
}

impl Module for RnnEncoder {
    fn parameters(&self) -> Vec<&Tensor> {
        let rnn = match &self.rnn {
            EncoderRnn::Gru(rnn) => rnn.parameters(),
            EncoderRnn::Lstm(rnn) => rnn.parameters(),
        };
        [self.embedding.parameters(), rnn, self.dconv.parameters()].concat()
    }
}
