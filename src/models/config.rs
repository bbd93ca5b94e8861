/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 模型配置（serde/JSON），以及单元类型、注意力类型的解析与校验
 */

use crate::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 循环单元类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CellType {
    Gru,
    Lstm,
}

impl FromStr for CellType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gru" => Ok(Self::Gru),
            "lstm" => Ok(Self::Lstm),
            other => Err(ModelError::ConfigurationError(format!(
                "未知的循环单元类型：{other}"
            ))),
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Gru => "gru",
            Self::Lstm => "lstm",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<String> for CellType {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<CellType> for String {
    fn from(cell: CellType) -> Self {
        cell.to_string()
    }
}

/// 注意力类型；`None` 表示不使用注意力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AttentionType {
    None,
    Bahdanau,
    Luong,
    LuongGate,
}

impl FromStr for AttentionType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // 历史配置文件里写的是 "None"
            "none" | "None" => Ok(Self::None),
            "bahdanau" => Ok(Self::Bahdanau),
            "luong" => Ok(Self::Luong),
            "luong_gate" => Ok(Self::LuongGate),
            other => Err(ModelError::ConfigurationError(format!(
                "未知的注意力类型：{other}"
            ))),
        }
    }
}

impl fmt::Display for AttentionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Bahdanau => "bahdanau",
            Self::Luong => "luong",
            Self::LuongGate => "luong_gate",
        };
        write!(f, "{name}")
    }
}

impl TryFrom<String> for AttentionType {
    type Error = ModelError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AttentionType> for String {
    fn from(attention: AttentionType) -> Self {
        attention.to_string()
    }
}

fn default_pool_size() -> usize {
    1
}

/// 编码器与解码器共用的配置
///
/// # JSON 示例
/// ```json
/// {
///   "cell": "gru", "emb_size": 8, "hidden_size": 8,
///   "enc_num_layers": 2, "dec_num_layers": 2, "dropout": 0.1,
///   "bidirectional": true, "src_vocab_size": 50, "tgt_vocab_size": 60,
///   "attention": "luong_gate", "pool_size": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seq2SeqConfig {
    pub cell: CellType,
    pub emb_size: usize,
    pub hidden_size: usize,
    pub enc_num_layers: usize,
    pub dec_num_layers: usize,
    pub dropout: f32,
    pub bidirectional: bool,
    pub src_vocab_size: usize,
    pub tgt_vocab_size: usize,
    pub attention: AttentionType,
    /// 仅 bahdanau/luong 使用的 maxout 分组数
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

impl Seq2SeqConfig {
    /// 解析 JSON 并校验
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 读取 JSON 文件并校验
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, ModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub const fn num_directions(&self) -> usize {
        if self.bidirectional { 2 } else { 1 }
    }

    /// 校验数值范围，以及编码器最终状态能否按约简规则对齐到解码器层数
    pub fn validate(&self) -> Result<(), ModelError> {
        let sizes = [
            ("emb_size", self.emb_size),
            ("hidden_size", self.hidden_size),
            ("enc_num_layers", self.enc_num_layers),
            ("dec_num_layers", self.dec_num_layers),
            ("src_vocab_size", self.src_vocab_size),
            ("tgt_vocab_size", self.tgt_vocab_size),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(ModelError::ConfigurationError(format!("{name}须大于0")));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(ModelError::ConfigurationError(format!(
                "dropout须在[0, 1)内，实际为{}",
                self.dropout
            )));
        }
        if matches!(self.attention, AttentionType::Bahdanau | AttentionType::Luong)
            && self.pool_size == 0
        {
            return Err(ModelError::ConfigurationError("pool_size须大于0".to_string()));
        }
        self.check_layer_counts()
    }

    fn check_layer_counts(&self) -> Result<(), ModelError> {
        let (enc, dec) = (self.enc_num_layers, self.dec_num_layers);
        if enc < dec {
            return Err(ModelError::ConfigurationError(format!(
                "enc_num_layers({enc})不能小于dec_num_layers({dec})"
            )));
        }
        // 编码器最终状态共有 enc * D 个 (层, 方向) 条目
        let entries = enc * self.num_directions();
        match self.cell {
            // 取前 dec 个条目
            CellType::Gru if entries < dec => Err(ModelError::ConfigurationError(format!(
                "GRU编码器只有{entries}个状态条目，不足dec_num_layers({dec})"
            ))),
            // 每隔一个取一个，共 ceil(entries / 2) 个
            CellType::Lstm if entries.div_ceil(2) != dec => {
                Err(ModelError::ConfigurationError(format!(
                    "LSTM编码器的{entries}个状态条目按步长2取出{}个，与dec_num_layers({dec})不符",
                    entries.div_ceil(2)
                )))
            }
            _ => Ok(()),
        }
    }
}
