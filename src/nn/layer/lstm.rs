/*
 * @Author       : 老董
 * @Date         : 2025-12-30
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : LSTM（长短期记忆）
 *
 * 公式:
 *   i_t = σ(x_t @ W_ii + h_{t-1} @ W_hi + b_i)   # 输入门
 *   f_t = σ(x_t @ W_if + h_{t-1} @ W_hf + b_f)   # 遗忘门
 *   g_t = tanh(x_t @ W_ig + h_{t-1} @ W_hg + b_g) # 候选细胞
 *   o_t = σ(x_t @ W_io + h_{t-1} @ W_ho + b_o)   # 输出门
 *   c_t = f_t ⊙ c_{t-1} + i_t ⊙ g_t              # 细胞状态
 *   h_t = o_t ⊙ tanh(c_t)                        # 隐藏状态
 *
 * 权重布局（与 PyTorch 不同，我们使用更清晰的分离结构）:
 * - W_ii, W_if, W_ig, W_io: 各 [input_size, hidden_size]
 * - W_hi, W_hf, W_hg, W_ho: 各 [hidden_size, hidden_size]
 * - b_i, b_f, b_g, b_o: 各 [1, hidden_size]
 */

use super::recurrent::{Recurrent, RecurrentCell, check_step_shapes};
use crate::errors::ModelError;
use crate::nn::{Init, Module, Session};
use crate::tensor::Tensor;

/// 多层、可选双向、按真实长度展开的 LSTM 序列层
pub type Lstm = Recurrent<LstmCell>;

/// 单层 LSTM 单元，状态为 (hidden, cell)
#[derive(Debug, Clone)]
pub struct LstmCell {
    // === 输入门参数 ===
    pub(crate) w_ii: Tensor,
    pub(crate) w_hi: Tensor,
    pub(crate) b_i: Tensor,
    // === 遗忘门参数 ===
    pub(crate) w_if: Tensor,
    pub(crate) w_hf: Tensor,
    pub(crate) b_f: Tensor,
    // === 候选细胞参数 ===
    pub(crate) w_ig: Tensor,
    pub(crate) w_hg: Tensor,
    pub(crate) b_g: Tensor,
    // === 输出门参数 ===
    pub(crate) w_io: Tensor,
    pub(crate) w_ho: Tensor,
    pub(crate) b_o: Tensor,
    input_size: usize,
    hidden_size: usize,
}

impl LstmCell {
    pub fn new(session: &Session, input_size: usize, hidden_size: usize) -> Self {
        let w_i = || session.parameter(&[input_size, hidden_size], Init::Kaiming);
        let w_h = || session.parameter(&[hidden_size, hidden_size], Init::Kaiming);
        let zeros = || session.parameter(&[1, hidden_size], Init::Zeros);
        Self {
            w_ii: w_i(),
            w_hi: w_h(),
            b_i: zeros(),
            w_if: w_i(),
            w_hf: w_h(),
            // 遗忘门偏置初始化为 1（有助于训练初期记住信息）
            b_f: session.parameter(&[1, hidden_size], Init::Ones),
            w_ig: w_i(),
            w_hg: w_h(),
            b_g: zeros(),
            w_io: w_i(),
            w_ho: w_h(),
            b_o: zeros(),
            input_size,
            hidden_size,
        }
    }
}

impl RecurrentCell for LstmCell {
    /// (hidden, cell)
    type State = (Tensor, Tensor);

    const NAME: &'static str = "LSTM";

    fn build(session: &Session, input_size: usize, hidden_size: usize) -> Self {
        Self::new(session, input_size, hidden_size)
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn zero_state(&self, batch_size: usize) -> (Tensor, Tensor) {
        let zeros = Tensor::zeros(&[batch_size, self.hidden_size]);
        (zeros.clone(), zeros)
    }

    fn step(&self, x: &Tensor, state: &(Tensor, Tensor)) -> Result<(Tensor, Tensor), ModelError> {
        check_step_shapes(self, x, state)?;
        let (h_prev, c_prev) = state;

        let i_gate = (x.mat_mul(&self.w_ii) + h_prev.mat_mul(&self.w_hi) + &self.b_i).sigmoid();
        let f_gate = (x.mat_mul(&self.w_if) + h_prev.mat_mul(&self.w_hf) + &self.b_f).sigmoid();
        let g_gate = (x.mat_mul(&self.w_ig) + h_prev.mat_mul(&self.w_hg) + &self.b_g).tanh();
        let o_gate = (x.mat_mul(&self.w_io) + h_prev.mat_mul(&self.w_ho) + &self.b_o).sigmoid();

        let cell = &f_gate * c_prev + &i_gate * &g_gate;
        let hidden = &o_gate * &cell.tanh();
        Ok((hidden, cell))
    }

    fn hidden(state: &(Tensor, Tensor)) -> &Tensor {
        &state.0
    }

    fn tensors(state: &(Tensor, Tensor)) -> Vec<&Tensor> {
        vec![&state.0, &state.1]
    }

    fn map_state<F: Fn(&Tensor) -> Tensor>(state: &(Tensor, Tensor), f: F) -> (Tensor, Tensor) {
        (f(&state.0), f(&state.1))
    }

    fn stack_states(states: &[(Tensor, Tensor)]) -> (Tensor, Tensor) {
        let hidden = states.iter().map(|s| &s.0).collect::<Vec<_>>();
        let cell = states.iter().map(|s| &s.1).collect::<Vec<_>>();
        (Tensor::stack(&hidden, true), Tensor::stack(&cell, true))
    }

    fn select_rows(
        mask: &[bool],
        when_true: &(Tensor, Tensor),
        when_false: &(Tensor, Tensor),
    ) -> (Tensor, Tensor) {
        (
            Tensor::select_rows(mask, &when_true.0, &when_false.0),
            Tensor::select_rows(mask, &when_true.1, &when_false.1),
        )
    }
}

impl Module for LstmCell {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![
            &self.w_ii, &self.w_hi, &self.b_i, // 输入门
            &self.w_if, &self.w_hf, &self.b_f, // 遗忘门
            &self.w_ig, &self.w_hg, &self.b_g, // 候选细胞
            &self.w_io, &self.w_ho, &self.b_o, // 输出门
        ]
    }
}
