/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 错误类型：张量层面的编程错误（TensorError，以panic形式抛出）
 *                 与模型层面的可恢复错误（ModelError，以Result形式返回）
 */

use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量列表为空")]
    EmptyList,
    #[error("张量形状不一致")]
    InconsitentShape,
    #[error("张量形状不兼容")]
    IncompatibleShape,
    #[error("交换张量时，输入的维度数至少需要2个")]
    PermuteNeedAtLeast2Dims,
    #[error("需要交换的维度必须是唯一且在[0, <张量维数>)范围内")]
    PermuteNeedUniqueAndInRange,
    #[error("维度{axis}超出范围：张量只有{dimension}个维度")]
    AxisOutOfRange { axis: usize, dimension: usize },
    #[error("索引越界：维度{axis}的长度为{len}，但访问了[{start}, {end})")]
    IndexOutOfRange {
        axis: usize,
        len: usize,
        start: usize,
        end: usize,
    },
}

/// 模型层面的错误。
///
/// 与[`TensorError`]不同，这些错误源于调用方传入的数据或配置，
/// 因此一律以`Result`返回，而不是panic。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// 输入/状态的形状与层的配置不一致
    #[error("形状不匹配：期望{expected:?}，实际{got:?}（{message}）")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 无法识别的单元类型、注意力类型，或层数等配置互相矛盾
    #[error("配置错误：{0}")]
    ConfigurationError(String),
    /// 读取配置文件失败
    #[error("读取文件失败：{0}")]
    Io(String),
}

impl ModelError {
    pub(crate) fn shape_mismatch(
        expected: &[usize],
        got: &[usize],
        message: impl Into<String>,
    ) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            got: got.to_vec(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for ModelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        Self::ConfigurationError(e.to_string())
    }
}
