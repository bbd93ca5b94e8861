/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 注意力机制：解码器单步输出对一段记忆（context）做加权读取
 *
 * 所有机制共用同一契约：
 *   attend(output [B, H], context [T, B, W]) -> (attended [B, H], weights [B, T])
 * 具体机制在解码器构造时一次性选定（见`Attention`），而不是每步按字符串分派。
 */

mod bahdanau;
mod luong;
mod luong_gate;

pub use bahdanau::BahdanauAttention;
pub use luong::LuongAttention;
pub use luong_gate::LuongGateAttention;

use crate::errors::ModelError;
use crate::nn::{Module, Session};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

use super::AttentionType;

#[enum_dispatch]
#[derive(Debug)]
pub enum Attention {
    BahdanauAttention,
    LuongAttention,
    LuongGateAttention,
}

#[enum_dispatch(Attention)]
pub trait AttentionMechanism: Module {
    /// 用解码器输出 `output` [B, H] 查询记忆 `context` [T, B, W]
    ///
    /// # 返回
    /// (融合了上下文的输出 [B, H], 归一化的注意力权重 [B, T])
    fn attend(&self, output: &Tensor, context: &Tensor) -> Result<(Tensor, Tensor), ModelError>;
}

impl Attention {
    /// 按配置构造注意力；`AttentionType::None`返回`Ok(None)`
    ///
    /// `memory_width`为 bahdanau/luong 所读取记忆的特征宽度（即词嵌入维度），
    /// luong_gate 读取卷积上下文，其宽度恒为`hidden_size`。
    pub fn from_type(
        session: &Session,
        attention_type: AttentionType,
        hidden_size: usize,
        memory_width: usize,
        pool_size: usize,
    ) -> Result<Option<Self>, ModelError> {
        Ok(match attention_type {
            AttentionType::None => None,
            AttentionType::Bahdanau => Some(
                BahdanauAttention::new(session, hidden_size, memory_width, pool_size)?.into(),
            ),
            AttentionType::Luong => {
                Some(LuongAttention::new(session, hidden_size, memory_width, pool_size)?.into())
            }
            AttentionType::LuongGate => Some(LuongGateAttention::new(session, hidden_size).into()),
        })
    }

    /// 是否读取编码器的卷积上下文（否则读取当前步的词嵌入）
    pub const fn reads_conv_context(&self) -> bool {
        matches!(self, Self::LuongGateAttention(_))
    }
}

impl Module for Attention {
    fn parameters(&self) -> Vec<&Tensor> {
        match self {
            Self::BahdanauAttention(a) => a.parameters(),
            Self::LuongAttention(a) => a.parameters(),
            Self::LuongGateAttention(a) => a.parameters(),
        }
    }
}

/// 校验查询与记忆的形状，返回 (T, B, W)
pub(crate) fn check_query_and_memory(
    name: &str,
    output: &Tensor,
    context: &Tensor,
    hidden_size: usize,
    memory_width: usize,
) -> Result<(usize, usize, usize), ModelError> {
    let batch = output.shape().first().copied().unwrap_or(0);
    if output.dimension() != 2 || output.shape()[1] != hidden_size {
        return Err(ModelError::shape_mismatch(
            &[batch, hidden_size],
            output.shape(),
            format!("{name}的查询形状"),
        ));
    }
    let seq_len = context.shape().first().copied().unwrap_or(0);
    if context.dimension() != 3
        || seq_len == 0
        || context.shape()[1] != batch
        || context.shape()[2] != memory_width
    {
        return Err(ModelError::shape_mismatch(
            &[seq_len, batch, memory_width],
            context.shape(),
            format!("{name}的记忆形状"),
        ));
    }
    Ok((seq_len, batch, memory_width))
}

/// 由 [B, T] 的打分得到归一化权重，并据此读取记忆
///
/// 返回 (上下文向量 [B, W], 权重 [B, T])
pub(crate) fn weighted_read(scores: &Tensor, context: &Tensor) -> (Tensor, Tensor) {
    let (seq_len, batch, width) = (context.shape()[0], context.shape()[1], context.shape()[2]);
    let weights = scores.softmax();
    let memory = context.permute(&[1, 0, 2]); // [B, T, W]
    let read = weights
        .reshape(&[batch, 1, seq_len])
        .batch_mat_mul(&memory)
        .reshape(&[batch, width]);
    (read, weights)
}

/// 记忆 [T, B, W] 与逐样本查询 [B, W] 的点积打分，返回 [B, T]
pub(crate) fn dot_scores(context: &Tensor, query: &Tensor) -> Tensor {
    let (seq_len, batch, width) = (context.shape()[0], context.shape()[1], context.shape()[2]);
    context
        .permute(&[1, 0, 2])
        .batch_mat_mul(&query.reshape(&[batch, width, 1]))
        .reshape(&[batch, seq_len])
}

/// maxout：把 [B, H * pool] 按每 pool 个一组取最大值，得到 [B, H]
pub(crate) fn maxout(x: &Tensor, pool_size: usize) -> Tensor {
    if pool_size == 1 {
        return x.clone();
    }
    let (batch, width) = (x.shape()[0], x.shape()[1]);
    x.reshape(&[batch, width / pool_size, pool_size]).max_axis(2)
}

