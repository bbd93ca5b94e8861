/*
 * @Author       : 老董
 * @Date         : 2026-01-21
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : Gru (门控循环单元)
 *
 * 公式:
 *   r_t = σ(x_t @ W_ir + h_{t-1} @ W_hr + b_r)     # 重置门
 *   z_t = σ(x_t @ W_iz + h_{t-1} @ W_hz + b_z)     # 更新门
 *   n_t = tanh(x_t @ W_in + r_t ⊙ (h_{t-1} @ W_hn) + b_n)  # 候选状态
 *   h_t = (1 - z_t) ⊙ n_t + z_t ⊙ h_{t-1}         # 隐藏状态
 */

use super::recurrent::{Recurrent, RecurrentCell, check_step_shapes};
use crate::errors::ModelError;
use crate::nn::{Init, Module, Session};
use crate::tensor::Tensor;

/// 多层、可选双向、按真实长度展开的 GRU 序列层
pub type Gru = Recurrent<GruCell>;

/// 单层 GRU 单元，一次前进一个时间步
///
/// # 输入/输出形状
/// - 输入：[`batch_size`, `input_size`]
/// - 状态：[`batch_size`, `hidden_size`]
#[derive(Debug, Clone)]
pub struct GruCell {
    // === 重置门参数 ===
    pub(crate) w_ir: Tensor, // [input_size, hidden_size]
    pub(crate) w_hr: Tensor, // [hidden_size, hidden_size]
    pub(crate) b_r: Tensor,  // [1, hidden_size]
    // === 更新门参数 ===
    pub(crate) w_iz: Tensor,
    pub(crate) w_hz: Tensor,
    pub(crate) b_z: Tensor,
    // === 候选状态参数 ===
    pub(crate) w_in: Tensor,
    pub(crate) w_hn: Tensor,
    pub(crate) b_n: Tensor,
    input_size: usize,
    hidden_size: usize,
}

impl GruCell {
    pub fn new(session: &Session, input_size: usize, hidden_size: usize) -> Self {
        let w_i = || session.parameter(&[input_size, hidden_size], Init::Kaiming);
        let w_h = || session.parameter(&[hidden_size, hidden_size], Init::Kaiming);
        let b = || session.parameter(&[1, hidden_size], Init::Zeros);
        Self {
            w_ir: w_i(),
            w_hr: w_h(),
            b_r: b(),
            w_iz: w_i(),
            w_hz: w_h(),
            b_z: b(),
            w_in: w_i(),
            w_hn: w_h(),
            b_n: b(),
            input_size,
            hidden_size,
        }
    }
}

impl RecurrentCell for GruCell {
    type State = Tensor;

    const NAME: &'static str = "GRU";

    fn build(session: &Session, input_size: usize, hidden_size: usize) -> Self {
        Self::new(session, input_size, hidden_size)
    }

    fn input_size(&self) -> usize {
        self.input_size
    }

    fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    fn zero_state(&self, batch_size: usize) -> Tensor {
        Tensor::zeros(&[batch_size, self.hidden_size])
    }

    fn step(&self, x: &Tensor, h: &Tensor) -> Result<Tensor, ModelError> {
        check_step_shapes(self, x, h)?;

        // === 重置门 ===
        let r_gate = (x.mat_mul(&self.w_ir) + h.mat_mul(&self.w_hr) + &self.b_r).sigmoid();
        // === 更新门 ===
        let z_gate = (x.mat_mul(&self.w_iz) + h.mat_mul(&self.w_hz) + &self.b_z).sigmoid();
        // === 候选状态 ===
        let r_h_hn = &r_gate * &h.mat_mul(&self.w_hn);
        let n_gate = (x.mat_mul(&self.w_in) + r_h_hn + &self.b_n).tanh();

        // h_t = (1 - z_t) ⊙ n_t + z_t ⊙ h
        // 重写为: h_t = n_t + z_t ⊙ (h - n_t) 以减少计算
        let z_diff = &z_gate * &(h - &n_gate);
        Ok(&n_gate + &z_diff)
    }

    fn hidden(state: &Tensor) -> &Tensor {
        state
    }

    fn tensors(state: &Tensor) -> Vec<&Tensor> {
        vec![state]
    }

    fn map_state<F: Fn(&Tensor) -> Tensor>(state: &Tensor, f: F) -> Tensor {
        f(state)
    }

    fn stack_states(states: &[Tensor]) -> Tensor {
        Tensor::stack(&states.iter().collect::<Vec<_>>(), true)
    }

    fn select_rows(mask: &[bool], when_true: &Tensor, when_false: &Tensor) -> Tensor {
        Tensor::select_rows(mask, when_true, when_false)
    }
}

impl Module for GruCell {
    fn parameters(&self) -> Vec<&Tensor> {
        vec![
            // 重置门
            &self.w_ir,
            &self.w_hr,
            &self.b_r,
            // 更新门
            &self.w_iz,
            &self.w_hz,
            &self.b_z,
            // 候选状态
            &self.w_in,
            &self.w_hn,
            &self.b_n,
        ]
    }
}
