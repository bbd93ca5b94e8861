/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 循环单元的公共抽象（RecurrentCell），以及按真实长度展开的多层/双向序列层（Recurrent）
 *
 * Recurrent 的语义等价于 PyTorch 中 pack_padded_sequence -> nn.GRU/nn.LSTM -> pad_packed_sequence：
 * - 正向：第 t 步只更新 t < len 的样本，其余样本保持原状态
 * - 反向：从 t = len - 1 开始（更早的步上该样本状态保持为零）
 * - 超出真实长度的输出位置一律为 0
 * 状态的挑选是逐行拷贝（`Tensor::select_rows`），因此填充位置的内容
 * 不会以任何方式（包括 ±0 的符号位）影响真实位置的结果。
 */

use crate::errors::ModelError;
use crate::nn::{Dropout, Module, Session};
use crate::tensor::Tensor;

/// 单层、单步的循环单元（GRU 单元、LSTM 单元）
///
/// `State` 既表示单层状态（每个张量 [batch, hidden]），
/// 也表示多层堆叠后的状态（每个张量 [layers, batch, hidden]）。
pub trait RecurrentCell: Module {
    type State: Clone + std::fmt::Debug;

    /// 用于错误信息与日志
    const NAME: &'static str;

    fn build(session: &Session, input_size: usize, hidden_size: usize) -> Self
    where
        Self: Sized;

    fn input_size(&self) -> usize;

    fn hidden_size(&self) -> usize;

    fn zero_state(&self, batch_size: usize) -> Self::State;

    /// 前进一步：`input` [batch, input_size]，`state` 为单层状态
    fn step(&self, input: &Tensor, state: &Self::State) -> Result<Self::State, ModelError>;

    /// 状态中作为输出的隐藏向量
    fn hidden(state: &Self::State) -> &Tensor;

    /// 状态包含的全部张量（GRU 为 h，LSTM 为 h 与 c）
    fn tensors(state: &Self::State) -> Vec<&Tensor>;

    /// 对状态中的每个张量做同一变换
    fn map_state<F: Fn(&Tensor) -> Tensor>(state: &Self::State, f: F) -> Self::State;

    /// 把若干单层状态沿新的首维堆叠为多层状态
    fn stack_states(states: &[Self::State]) -> Self::State;

    /// 按样本逐行在两个状态间挑选
    fn select_rows(mask: &[bool], when_true: &Self::State, when_false: &Self::State) -> Self::State;
}

/// 校验单步输入与单层状态的形状，供各单元的 `step` 复用
pub(crate) fn check_step_shapes<C: RecurrentCell>(
    cell: &C,
    input: &Tensor,
    state: &C::State,
) -> Result<(), ModelError> {
    let batch = input.shape().first().copied().unwrap_or(0);
    if input.dimension() != 2 || input.shape()[1] != cell.input_size() {
        return Err(ModelError::shape_mismatch(
            &[batch, cell.input_size()],
            input.shape(),
            format!("{}单元的输入形状", C::NAME),
        ));
    }
    let expected = [batch, cell.hidden_size()];
    for t in C::tensors(state) {
        if t.shape() != expected {
            return Err(ModelError::shape_mismatch(
                &expected,
                t.shape(),
                format!("{}单元的状态形状", C::NAME),
            ));
        }
    }
    Ok(())
}

/// 多层、可选双向的循环序列层
///
/// # 输入/输出形状（时间优先）
/// - 输入：[seq_len, batch, input_size] 与每个样本的真实长度
/// - 输出：[seq_len, batch, directions * hidden_size]
/// - 最终状态：[num_layers * directions, batch, hidden_size]，按 (层, 方向) 排列，
///   即 [l0_正向, l0_反向, l1_正向, l1_反向, ...]
///
/// 相邻两层之间（最后一层之后除外）在 train 模式下施加 dropout。
#[derive(Debug)]
pub struct Recurrent<C: RecurrentCell> {
    /// 按 (层, 方向) 排列的单元
    pub(crate) cells: Vec<C>,
    num_layers: usize,
    bidirectional: bool,
    input_size: usize,
    hidden_size: usize,
    dropout: Dropout,
}

impl<C: RecurrentCell> Recurrent<C> {
    pub fn new(
        session: &Session,
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        bidirectional: bool,
        dropout: f32,
    ) -> Self {
        let directions = if bidirectional { 2 } else { 1 };
        let cells = (0..num_layers)
            .flat_map(|layer| {
                let layer_input = if layer == 0 {
                    input_size
                } else {
                    hidden_size * directions
                };
                (0..directions).map(move |_| layer_input)
            })
            .map(|layer_input| C::build(session, layer_input, hidden_size))
            .collect();
        Self {
            cells,
            num_layers,
            bidirectional,
            input_size,
            hidden_size,
            dropout: Dropout::new(session, dropout),
        }
    }

    /// 前向传播，见结构体文档中的形状约定
    pub fn forward(&self, x: &Tensor, lengths: &[usize]) -> Result<(Tensor, C::State), ModelError> {
        if x.dimension() != 3 || x.shape()[2] != self.input_size {
            let (t, b) = match x.shape() {
                [t, b, ..] => (*t, *b),
                _ => (0, 0),
            };
            return Err(ModelError::shape_mismatch(
                &[t, b, self.input_size],
                x.shape(),
                format!("{}序列层的输入形状", C::NAME),
            ));
        }
        let (seq_len, batch) = (x.shape()[0], x.shape()[1]);
        if lengths.len() != batch {
            return Err(ModelError::shape_mismatch(
                &[batch],
                &[lengths.len()],
                "lengths 的个数须等于 batch 大小",
            ));
        }
        if let Some(&bad) = lengths.iter().find(|&&l| l == 0 || l > seq_len) {
            return Err(ModelError::shape_mismatch(
                &[seq_len],
                &[bad],
                "每个样本的真实长度须在 [1, seq_len] 内",
            ));
        }

        let directions = self.num_directions();
        let zeros = Tensor::zeros(&[batch, self.hidden_size]);
        let mut layer_input = x.clone();
        let mut final_states = Vec::with_capacity(self.cells.len());

        for layer in 0..self.num_layers {
            let mut direction_outputs = Vec::with_capacity(directions);
            for direction in 0..directions {
                let cell = &self.cells[layer * directions + direction];
                let mut state = cell.zero_state(batch);
                let mut outputs = vec![zeros.clone(); seq_len];
                let steps: Box<dyn Iterator<Item = usize>> = if direction == 0 {
                    Box::new(0..seq_len)
                } else {
                    Box::new((0..seq_len).rev())
                };
                for t in steps {
                    let mask = lengths.iter().map(|&l| t < l).collect::<Vec<_>>();
                    let new_state = cell.step(&layer_input.select(0, t), &state)?;
                    state = C::select_rows(&mask, &new_state, &state);
                    outputs[t] = Tensor::select_rows(&mask, C::hidden(&state), &zeros);
                }
                direction_outputs.push(Tensor::stack(&outputs.iter().collect::<Vec<_>>(), true));
                final_states.push(state);
            }

            let output = Tensor::concat(&direction_outputs.iter().collect::<Vec<_>>(), 2);
            layer_input = if layer + 1 < self.num_layers {
                self.dropout.forward(&output)
            } else {
                output
            };
        }

        Ok((layer_input, C::stack_states(&final_states)))
    }

    pub const fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    pub const fn num_layers(&self) -> usize {
        self.num_layers
    }

    pub const fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn cells(&self) -> &[C] {
        &self.cells
    }
}

impl<C: RecurrentCell> Module for Recurrent<C> {
    fn parameters(&self) -> Vec<&Tensor> {
        self.cells.iter().flat_map(|c| c.parameters()).collect()
    }
}
