//! # su_seq2seq
//!
//! 面向“语义单元”（semantic unit）的序列到序列模型核心：
//! - 按真实长度展开的多层（双向）GRU/LSTM 编码器，并以多尺度空洞卷积精炼编码器输出；
//! - 带可选注意力（bahdanau / luong / luong_gate）的单步循环解码器；
//! - 两者共用的堆叠循环单元（`StackedGru` / `StackedLstm`）。
//!
//! 训练循环、损失、beam search、数据加载与词表构建均不在本库范围内，
//! 解码的时间步循环由调用方驱动。
//!
//! ```ignore
//! let session = Session::new_with_seed(42);
//! let config = Seq2SeqConfig::from_json_file("config.json")?;
//! let encoder = RnnEncoder::new(&session, &config, None)?;
//! let decoder = RnnDecoder::new(&session, &config, None, true)?;
//!
//! session.set_eval_mode();
//! let enc = encoder.encode(&ids, &lengths)?;
//! let mut state = enc.state;
//! let step = decoder.decode_step(&start_ids, &state, &enc.conv_context)?;
//! state = step.state;
//! ```

pub mod errors;
pub mod models;
pub mod nn;
pub mod tensor;
pub mod utils;
