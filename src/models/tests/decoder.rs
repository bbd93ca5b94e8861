/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : RnnDecoder 测试
 */

use std::rc::Rc;

use super::small_config;
use crate::assert_err;
use crate::errors::ModelError;
use crate::models::{AttentionType, CellType, RnnDecoder, RnnState};
use crate::nn::{Embedding, Module, Session};
use crate::tensor::Tensor;

fn gru_state(layers: usize, batch: usize) -> RnnState {
    RnnState::Gru(Tensor::zeros(&[layers, batch, 8]))
}

#[test]
fn test_decode_step_luong_gate() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    let decoder = RnnDecoder::new(&session, &small_config(), None, true)?;
    let context = Tensor::ones(&[5, 2, 8]);
    let out = decoder.decode_step(&[1, 2], &gru_state(2, 2), &context)?;
    assert_eq!(out.scores.shape(), &[2, 30]);
    assert_eq!(out.state.hidden().shape(), &[2, 2, 8]);
    let weights = out.attention.expect("luong_gate 应返回注意力权重");
    assert_eq!(weights.shape(), &[2, 5]);
    Ok(())
}

#[test]
fn test_embedding_attention_reads_one_position() -> Result<(), ModelError> {
    for attention in [AttentionType::Bahdanau, AttentionType::Luong] {
        let session = Session::new_with_seed(0);
        let mut config = small_config();
        config.attention = attention;
        let decoder = RnnDecoder::new(&session, &config, None, true)?;
        let out = decoder.decode_step(&[3, 4, 5], &gru_state(2, 3), &Tensor::zeros(&[9, 3, 8]))?;
        assert_eq!(out.scores.shape(), &[3, 30]);
        // 记忆只有当前步的词嵌入
        assert_eq!(out.attention, Some(Tensor::ones(&[3, 1])));
    }
    Ok(())
}

#[test]
fn test_no_attention_ignores_conv_context() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    session.set_eval_mode();
    let mut config = small_config();
    config.attention = AttentionType::None;
    let decoder = RnnDecoder::new(&session, &config, None, true)?;
    assert!(decoder.attention().is_none());

    let state = gru_state(2, 2);
    let a = decoder.decode_step(&[1, 2], &state, &Tensor::zeros(&[4, 2, 8]))?;
    let b = decoder.decode_step(&[1, 2], &state, &Tensor::ones(&[3, 2, 8]))?;
    assert!(a.attention.is_none());
    assert_eq!(a.scores, b.scores);
    assert_eq!(a.state, b.state);
    Ok(())
}

#[test]
fn test_use_attention_flag_overrides_config() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    let decoder = RnnDecoder::new(&session, &small_config(), None, false)?;
    assert!(decoder.attention().is_none());
    let out = decoder.decode_step(&[0], &gru_state(2, 1), &Tensor::zeros(&[2, 1, 8]))?;
    assert!(out.attention.is_none());
    Ok(())
}

#[test]
fn test_scores_are_projection_of_top_layer() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    session.set_eval_mode();
    let decoder = RnnDecoder::new(&session, &small_config(), None, false)?;
    let out = decoder.decode_step(&[4, 7], &gru_state(2, 2), &Tensor::zeros(&[1, 2, 8]))?;
    let top = out.state.hidden().select(0, 1);
    assert_eq!(out.scores, decoder.compute_score(&top)?);
    Ok(())
}

#[test]
fn test_lstm_decoder() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    let mut config = small_config();
    config.cell = CellType::Lstm;
    config.enc_num_layers = 3;
    config.dec_num_layers = 3;
    let decoder = RnnDecoder::new(&session, &config, None, true)?;
    let state = RnnState::Lstm {
        hidden: Tensor::zeros(&[3, 2, 8]),
        cell: Tensor::zeros(&[3, 2, 8]),
    };
    let out = decoder.decode_step(&[1, 1], &state, &Tensor::zeros(&[6, 2, 8]))?;
    assert_eq!(out.state.hidden().shape(), &[3, 2, 8]);
    assert_eq!(out.state.cell().map(Tensor::shape), Some(&[3, 2, 8][..]));
    Ok(())
}

#[test]
fn test_decode_step_errors() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    let decoder = RnnDecoder::new(&session, &small_config(), None, true)?;
    let context = Tensor::zeros(&[4, 2, 8]);

    let lstm_state = RnnState::Lstm {
        hidden: Tensor::zeros(&[2, 2, 8]),
        cell: Tensor::zeros(&[2, 2, 8]),
    };
    assert_err!(
        decoder.decode_step(&[1, 2], &lstm_state, &context),
        ModelError::ShapeMismatch([2, 2, 8], [2, 2, 8], "GRU解码器收到了LSTM状态")
    );
    assert_err!(
        decoder.decode_step(&[1, 2], &gru_state(1, 2), &context),
        ModelError::ShapeMismatch([2, 2, 8], [1, 2, 8], "StackedGRU的状态形状")
    );
    assert_err!(
        decoder.decode_step(&[1, 2, 3], &gru_state(2, 2), &context),
        ModelError::ShapeMismatch([2, 3, 8], [2, 2, 8], "StackedGRU的状态形状")
    );
    assert_err!(
        decoder.decode_step(&[30, 2], &gru_state(2, 2), &context),
        ModelError::ShapeMismatch([30], [30], "token id 超出词表范围")
    );
    assert_err!(
        decoder.decode_step(&[1, 2], &gru_state(2, 2), &Tensor::zeros(&[4, 2, 6])),
        ModelError::ShapeMismatch([4, 2, 8], [4, 2, 6], "LuongGate注意力的记忆形状")
    );
    Ok(())
}

#[test]
fn test_shared_embedding_between_encoder_and_decoder() -> Result<(), ModelError> {
    let session = Session::new_with_seed(0);
    let mut config = small_config();
    config.tgt_vocab_size = config.src_vocab_size;
    let shared = Rc::new(Embedding::new(&session, config.src_vocab_size, config.emb_size));
    let encoder = crate::models::RnnEncoder::new(&session, &config, Some(Rc::clone(&shared)))?;
    let decoder = RnnDecoder::new(&session, &config, Some(Rc::clone(&shared)), true)?;
    assert!(Rc::ptr_eq(encoder.embedding(), decoder.embedding()));
    assert_eq!(Rc::strong_count(&shared), 3);
    // 共享表在两侧都被计为参数
    assert!(decoder.num_params() > 1);
    Ok(())
}
