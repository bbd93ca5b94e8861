/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 负责神经网络（neural network）的基础层：线性、嵌入、dropout、卷积与循环单元
 */

pub mod layer;
mod module;
mod session;
mod var;

pub use layer::{
    AlphaDropout, Conv1d, Dropout, Embedding, Gru, GruCell, Linear, Lstm, LstmCell, Recurrent,
    RecurrentCell, Stacked, StackedGru, StackedLstm,
};
pub use module::Module;
pub use session::Session;
pub use var::Init;

#[cfg(test)]
mod tests;
