/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 编码器在不同填充长度下保持序列长度，且填充内容不影响结果
 */

use ndarray::Array2;
use su_seq2seq::errors::ModelError;
use su_seq2seq::models::{AttentionType, CellType, RnnEncoder, Seq2SeqConfig};
use su_seq2seq::nn::Session;

fn config(cell: CellType, bidirectional: bool) -> Seq2SeqConfig {
    Seq2SeqConfig {
        cell,
        emb_size: 5,
        hidden_size: 6,
        enc_num_layers: 2,
        dec_num_layers: if cell == CellType::Lstm && !bidirectional { 1 } else { 2 },
        dropout: 0.25,
        bidirectional,
        src_vocab_size: 40,
        tgt_vocab_size: 40,
        attention: AttentionType::LuongGate,
        pool_size: 1,
    }
}

fn ids(seq_len: usize, lengths: &[usize], pad: usize) -> Array2<usize> {
    Array2::from_shape_fn((seq_len, lengths.len()), |(t, b)| {
        if t < lengths[b] { (t * 5 + b + 2) % 40 } else { pad }
    })
}

#[test]
fn test_length_preserved_for_padded_lengths() -> Result<(), ModelError> {
    for cell in [CellType::Gru, CellType::Lstm] {
        for bidirectional in [false, true] {
            let session = Session::new_with_seed(1);
            let config = config(cell, bidirectional);
            let encoder = RnnEncoder::new(&session, &config, None)?;
            for seq_len in [1_usize, 5, 20] {
                let lengths = [seq_len, seq_len.div_ceil(2), 1];
                let enc = encoder.encode(&ids(seq_len, &lengths, 0), &lengths)?;
                assert_eq!(enc.outputs.shape(), &[seq_len, 3, 6]);
                assert_eq!(enc.conv_context.shape(), &[seq_len, 3, 6]);
                assert_eq!(
                    enc.state.hidden().shape(),
                    &[config.dec_num_layers, 3, 6]
                );
            }
        }
    }
    Ok(())
}

#[test]
fn test_padding_never_leaks_into_real_positions() -> Result<(), ModelError> {
    for cell in [CellType::Gru, CellType::Lstm] {
        let session = Session::new_with_seed(5);
        session.set_eval_mode();
        let encoder = RnnEncoder::new(&session, &config(cell, true), None)?;
        let lengths = [7, 3, 1, 5];
        let a = encoder.encode(&ids(7, &lengths, 0), &lengths)?;
        let b = encoder.encode(&ids(7, &lengths, 39), &lengths)?;
        assert_eq!(a.outputs, b.outputs);
        assert_eq!(a.state, b.state);
        assert_eq!(a.conv_context, b.conv_context);
    }
    Ok(())
}
