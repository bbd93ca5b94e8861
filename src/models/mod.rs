/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 序列到序列模型的核心：配置、循环状态、注意力、编码器与解码器
 *
 * 数据流：
 *   encode(ids, lengths) -> (outputs, state, conv_context)
 *   decode_step(input_ids, state, conv_context) -> (scores, state', attention_weights)
 * 时间步循环（teacher forcing / 采样 / beam search）由外部驱动方负责。
 */

pub mod attention;
mod config;
mod decoder;
mod encoder;
mod state;

pub use attention::{
    Attention, AttentionMechanism, BahdanauAttention, LuongAttention, LuongGateAttention,
};
pub use config::{AttentionType, CellType, Seq2SeqConfig};
pub use decoder::{DecoderOutput, RnnDecoder};
pub use encoder::{DilatedConvStack, EncoderOutput, RnnEncoder};
pub use state::RnnState;

#[cfg(test)]
mod tests;
