/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : Module trait 定义
 */

use crate::tensor::Tensor;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异：单步、整段序列、带状态……）
/// - `new()` **不是** trait 方法（参数各异）
/// - `parameters()` 返回参数张量的引用（签名一致，放入 trait）
///
/// # 使用示例
///
/// ```ignore
/// impl Module for RnnDecoder {
///     fn parameters(&self) -> Vec<&Tensor> {
///         [self.rnn.parameters(), self.linear.parameters()].concat()
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可学习参数
    fn parameters(&self) -> Vec<&Tensor>;

    /// 获取参数张量的数量
    fn num_params(&self) -> usize {
        self.parameters().len()
    }

    /// 获取所有参数中标量元素的总数
    fn num_elements(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }
}
