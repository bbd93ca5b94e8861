/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 堆叠循环单元（StackedGru / StackedLstm）：解码器每个时间步使用的多层单步函数
 *
 * 第 i 层以第 i-1 层的新隐藏向量为输入；层与层之间施加 dropout，
 * 最后一层的输出不做 dropout。各层的新状态沿新的首维（层维）堆叠返回。
 */

use super::recurrent::RecurrentCell;
use super::{GruCell, LstmCell};
use crate::errors::ModelError;
use crate::nn::{Dropout, Module, Session};
use crate::tensor::Tensor;

/// 多层 GRU 单步函数，状态为 [num_layers, batch, hidden]
pub type StackedGru = Stacked<GruCell>;
/// 多层 LSTM 单步函数，状态为 ([num_layers, batch, hidden], [num_layers, batch, hidden])
pub type StackedLstm = Stacked<LstmCell>;

#[derive(Debug)]
pub struct Stacked<C: RecurrentCell> {
    layers: Vec<C>,
    dropout: Dropout,
    input_size: usize,
    hidden_size: usize,
}

impl<C: RecurrentCell> Stacked<C> {
    pub fn new(
        session: &Session,
        input_size: usize,
        hidden_size: usize,
        num_layers: usize,
        dropout: f32,
    ) -> Self {
        let layers = (0..num_layers)
            .map(|i| {
                let layer_input = if i == 0 { input_size } else { hidden_size };
                C::build(session, layer_input, hidden_size)
            })
            .collect();
        Self {
            layers,
            dropout: Dropout::new(session, dropout),
            input_size,
            hidden_size,
        }
    }

    /// 所有层各前进一步
    ///
    /// # 参数
    /// - `input`: [batch, input_size]
    /// - `state`: 每个张量形状为 [num_layers, batch, hidden_size]
    ///
    /// # 返回
    /// (最后一层的新隐藏向量 [batch, hidden_size], 同形状的新状态)
    pub fn step(&self, input: &Tensor, state: &C::State) -> Result<(Tensor, C::State), ModelError> {
        let batch = input.shape().first().copied().unwrap_or(0);
        if input.dimension() != 2 || input.shape()[1] != self.input_size {
            return Err(ModelError::shape_mismatch(
                &[batch, self.input_size],
                input.shape(),
                format!("Stacked{}的输入形状", C::NAME),
            ));
        }
        let expected = [self.num_layers(), batch, self.hidden_size];
        for t in C::tensors(state) {
            if t.shape() != expected {
                return Err(ModelError::shape_mismatch(
                    &expected,
                    t.shape(),
                    format!("Stacked{}的状态形状", C::NAME),
                ));
            }
        }

        let mut layer_input = input.clone();
        let mut new_states = Vec::with_capacity(self.layers.len());
        for (i, layer) in self.layers.iter().enumerate() {
            let layer_state = C::map_state(state, |t| t.select(0, i));
            let new_state = layer.step(&layer_input, &layer_state)?;
            layer_input = if i + 1 != self.layers.len() {
                self.dropout.forward(C::hidden(&new_state))
            } else {
                C::hidden(&new_state).clone()
            };
            new_states.push(new_state);
        }

        Ok((layer_input, C::stack_states(&new_states)))
    }

    /// 全零的初始状态
    pub fn zero_state(&self, batch_size: usize) -> C::State {
        let states = self
            .layers
            .iter()
            .map(|l| l.zero_state(batch_size))
            .collect::<Vec<_>>();
        C::stack_states(&states)
    }

    pub fn layers(&self) -> &[C] {
        &self.layers
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub const fn input_size(&self) -> usize {
        self.input_size
    }

    pub const fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub const fn dropout(&self) -> &Dropout {
        &self.dropout
    }
}

impl<C: RecurrentCell> Module for Stacked<C> {
    fn parameters(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|l| l.parameters()).collect()
    }
}
