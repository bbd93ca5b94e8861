mod config;
mod decoder;

use super::{AttentionType, CellType, Seq2SeqConfig};

/// 测试用的小配置：双向两层 GRU，luong_gate 注意力
pub(super) fn small_config() -> Seq2SeqConfig {
    Seq2SeqConfig {
        cell: CellType::Gru,
        emb_size: 6,
        hidden_size: 8,
        enc_num_layers: 2,
        dec_num_layers: 2,
        dropout: 0.1,
        bidirectional: true,
        src_vocab_size: 20,
        tgt_vocab_size: 30,
        attention: AttentionType::LuongGate,
        pool_size: 2,
    }
}
