/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : Layer 模块 - 持有参数张量、提供纯前向计算的基础层
 */

mod conv1d;
mod dropout;
mod embedding;
mod gru;
mod linear;
mod lstm;
mod recurrent;
mod stacked;

pub use conv1d::Conv1d;
pub use dropout::{AlphaDropout, Dropout};
pub use embedding::Embedding;
pub use gru::{Gru, GruCell};
pub use linear::Linear;
pub use lstm::{Lstm, LstmCell};
pub use recurrent::{Recurrent, RecurrentCell};
pub use stacked::{Stacked, StackedGru, StackedLstm};
