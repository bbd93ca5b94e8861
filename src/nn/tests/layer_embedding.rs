/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Embedding 单元测试
 */

use crate::assert_err;
use crate::errors::ModelError;
use crate::nn::{Embedding, Module, Session};
use crate::tensor::Tensor;
use ndarray::array;

fn small_table() -> Embedding {
    let session = Session::new_with_seed(42);
    let mut emb = Embedding::new(&session, 3, 2);
    emb.weight = Tensor::new(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5], &[3, 2]);
    emb
}

#[test]
fn test_embedding_creation() {
    let session = Session::new_with_seed(42);
    let emb = Embedding::new(&session, 100, 8);
    assert_eq!(emb.vocab_size(), 100);
    assert_eq!(emb.embedding_dim(), 8);
    assert_eq!(emb.num_elements(), 800);
}

#[test]
fn test_embedding_lookup() -> Result<(), ModelError> {
    let emb = small_table();
    let y = emb.forward(&[2, 0, 2])?;
    assert_eq!(y, Tensor::new(&[2.0, 2.5, 0.0, 0.5, 2.0, 2.5], &[3, 2]));
    assert_eq!(emb.forward(&[])?.shape(), &[0, 2]);
    Ok(())
}

#[test]
fn test_embedding_sequence_is_time_major() -> Result<(), ModelError> {
    let emb = small_table();
    // [T=2, B=2]
    let ids = array![[1, 2], [0, 1]];
    let y = emb.forward_sequence(&ids)?;
    assert_eq!(y.shape(), &[2, 2, 2]);
    assert_eq!(y.select(0, 0).select(0, 1), Tensor::new(&[2.0, 2.5], &[2]));
    assert_eq!(y.select(0, 1).select(0, 0), Tensor::new(&[0.0, 0.5], &[2]));
    Ok(())
}

#[test]
fn test_embedding_out_of_vocab() {
    let emb = small_table();
    assert_err!(
        emb.forward(&[0, 3]),
        ModelError::ShapeMismatch([3], [3], "token id 超出词表范围")
    );
}
