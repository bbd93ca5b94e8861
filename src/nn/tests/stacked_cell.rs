/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : StackedGru / StackedLstm 单元测试
 */

use crate::assert_err;
use crate::errors::ModelError;
use crate::nn::{Dropout, GruCell, RecurrentCell, Session, StackedGru, StackedLstm};
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const P: f32 = 0.5;

fn random_input(shape: &[usize]) -> Tensor {
    Tensor::normal_with_rng(0.0, 1.0, shape, &mut StdRng::seed_from_u64(17))
}

/// 用独立的 Dropout 按“层间施加、最后一层之后不施加”的规则手动重放一步
fn replay(session: &Session, stacked: &StackedGru, input: &Tensor, state: &Tensor) -> (Tensor, Vec<Tensor>) {
    let dropout = Dropout::new(session, P);
    let mut layer_input = input.clone();
    let mut states = vec![];
    for (i, layer) in stacked.layers().iter().enumerate() {
        let h = layer.step(&layer_input, &state.select(0, i)).unwrap();
        layer_input = if i + 1 != stacked.num_layers() {
            dropout.forward(&h)
        } else {
            h.clone()
        };
        states.push(h);
    }
    (layer_input, states)
}

#[test]
fn test_dropout_applied_between_layers_only() -> Result<(), ModelError> {
    for num_layers in [1, 2, 3] {
        let session = Session::new_with_seed(42);
        let stacked = StackedGru::new(&session, 4, 6, num_layers, P);
        let input = random_input(&[3, 4]);
        let state = random_input(&[num_layers, 3, 6]);

        session.set_seed(1000);
        let (output, new_state) = stacked.step(&input, &state)?;
        session.set_seed(1000);
        let (expected_output, expected_states) = replay(&session, &stacked, &input, &state);

        assert_eq!(output, expected_output);
        for (i, expected) in expected_states.iter().enumerate() {
            assert_eq!(&new_state.select(0, i), expected);
        }
        // 最后一层的输出不做 dropout，即使在 train 模式下也与其新状态一致
        assert_eq!(output, new_state.select(0, num_layers - 1));
    }
    Ok(())
}

#[test]
fn test_single_layer_consumes_no_randomness() -> Result<(), ModelError> {
    let session = Session::new_with_seed(42);
    let stacked = StackedGru::new(&session, 4, 6, 1, P);
    session.set_seed(7);
    stacked.step(&random_input(&[2, 4]), &stacked.zero_state(2))?;
    let next = session.with_rng(|rng| rng.r#gen::<u64>());
    assert_eq!(next, StdRng::seed_from_u64(7).r#gen::<u64>());
    Ok(())
}

#[test]
fn test_eval_mode_is_deterministic() -> Result<(), ModelError> {
    let session = Session::new_with_seed(42);
    let stacked = StackedLstm::new(&session, 4, 6, 3, P);
    let input = random_input(&[2, 4]);
    let state = stacked.zero_state(2);
    session.set_eval_mode();
    let (out_a, (h_a, c_a)) = stacked.step(&input, &state)?;
    let (out_b, (h_b, c_b)) = stacked.step(&input, &state)?;
    assert_eq!(out_a, out_b);
    assert_eq!(h_a, h_b);
    assert_eq!(c_a, c_b);
    assert_eq!(h_a.shape(), &[3, 2, 6]);
    assert_eq!(out_a, h_a.select(0, 2));
    Ok(())
}

#[test]
fn test_upper_layers_take_hidden_size_input() {
    let session = Session::new_with_seed(42);
    let stacked = StackedGru::new(&session, 10, 6, 3, 0.0);
    let inputs = stacked
        .layers()
        .iter()
        .map(GruCell::input_size)
        .collect::<Vec<_>>();
    assert_eq!(inputs, vec![10, 6, 6]);
}

#[test]
fn test_stacked_shape_mismatch() {
    let session = Session::new_with_seed(42);
    let stacked = StackedGru::new(&session, 8, 8, 2, 0.0);
    assert_err!(
        stacked.step(&Tensor::zeros(&[3, 8]), &Tensor::zeros(&[2, 2, 8])),
        ModelError::ShapeMismatch([2, 3, 8], [2, 2, 8], "StackedGRU的状态形状")
    );
    assert_err!(
        stacked.step(&Tensor::zeros(&[2, 7]), &stacked.zero_state(2)),
        ModelError::ShapeMismatch([2, 8], [2, 7], "StackedGRU的输入形状")
    );
    let lstm = StackedLstm::new(&session, 8, 8, 2, 0.0);
    let (h, _) = lstm.zero_state(2);
    assert_err!(
        lstm.step(&Tensor::zeros(&[2, 8]), &(h, Tensor::zeros(&[1, 2, 8]))),
        ModelError::ShapeMismatch([2, 2, 8], [1, 2, 8], "StackedLSTM的状态形状")
    );
}
