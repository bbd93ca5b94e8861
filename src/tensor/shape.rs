use super::Tensor;
use crate::errors::{Operator, TensorError};
use ndarray::{Axis, IxDyn, Slice};
use std::collections::HashSet;

impl Tensor {
    pub fn reshape(&self, shape: &[usize]) -> Self {
        let total_elements: usize = self.data.len();
        let new_total_elements: usize = shape.iter().product();
        assert!(
            total_elements == new_total_elements,
            "{}",
            TensorError::IncompatibleShape
        );
        // `as_standard_layout`保证permute之后的张量也能按行优先顺序重排
        let data = self
            .data
            .as_standard_layout()
            .into_owned()
            .into_shape(IxDyn(shape))
            .unwrap_or_else(|_| panic!("{}", TensorError::IncompatibleShape));
        Self { data }
    }

    /// 在指定维度上增加一个长度为1的维度。
    ///
    /// ```ignore
    /// let tensor = Tensor::new(&[1.0, 2.0, 3.0], &[3]);
    /// assert_eq!(tensor.unsqueeze(0).shape(), &[1, 3]);
    /// assert_eq!(tensor.unsqueeze(1).shape(), &[3, 1]);
    /// ```
    pub fn unsqueeze(&self, dim: usize) -> Self {
        assert!(
            dim <= self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis: dim,
                dimension: self.dimension(),
            }
        );
        let mut new_shape = self.shape().to_vec();
        new_shape.insert(dim, 1);
        self.reshape(&new_shape)
    }

    /// 将多个张量沿着首个维度堆叠起来，返回一个新的张量。
    /// * `tensors` - 一个包含多个张量的数组的引用。
    /// * `new_dim` - 布尔值，指示是否增加一个新的维度来堆叠。
    ///
    /// 当 `new_dim` 为 `true` 时，所有张量须具有相同的形状，结果形状为`[tensors.len(), ...]`。
    /// 当 `new_dim` 为 `false`，每个张量的第一个维度可以不同，但其余维度应相同。
    /// 否则panic。
    pub fn stack(tensors: &[&Self], new_dim: bool) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);

        let first_shape = tensors[0].shape();
        let skip = if new_dim { 0 } else { 1 };
        let compatible_shapes = |t: &Self| {
            let t_shape = t.shape();
            t_shape.len() == first_shape.len()
                && t_shape
                    .iter()
                    .skip(skip)
                    .zip(first_shape.iter().skip(skip))
                    .all(|(a, b)| a == b)
        };
        assert!(
            tensors.iter().all(|t| compatible_shapes(t)),
            "{}",
            TensorError::InconsitentShape
        );

        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = if new_dim {
            ndarray::stack(Axis(0), &views)
        } else {
            ndarray::concatenate(Axis(0), &views)
        }
        .unwrap_or_else(|_| panic!("{}", TensorError::InconsitentShape));
        Self { data }
    }

    /// 沿`axis`维拼接多个张量，除`axis`外的其余维度须一致
    pub fn concat(tensors: &[&Self], axis: usize) -> Self {
        assert!(!tensors.is_empty(), "{}", TensorError::EmptyList);
        let first = tensors[0];
        for t in tensors.iter().skip(1) {
            let compatible = t.dimension() == first.dimension()
                && axis < first.dimension()
                && t
                    .shape()
                    .iter()
                    .zip(first.shape())
                    .enumerate()
                    .all(|(i, (a, b))| i == axis || a == b);
            assert!(
                compatible,
                "{}",
                TensorError::OperatorError {
                    operator: Operator::Concat,
                    tensor1_shape: first.shape().to_vec(),
                    tensor2_shape: t.shape().to_vec(),
                }
            );
        }
        let views = tensors.iter().map(|t| t.data.view()).collect::<Vec<_>>();
        let data = ndarray::concatenate(Axis(axis), &views)
            .unwrap_or_else(|_| panic!("{}", TensorError::InconsitentShape));
        Self { data }
    }

    /// 取出`axis`维上第`index`个切片，结果比原张量少一维
    pub fn select(&self, axis: usize, index: usize) -> Self {
        self.check_range(axis, index, index + 1);
        Self {
            data: self.data.index_axis(Axis(axis), index).to_owned(),
        }
    }

    /// 取出`axis`维上`[start, start + len)`的部分，维数不变
    pub fn narrow(&self, axis: usize, start: usize, len: usize) -> Self {
        self.check_range(axis, start, start + len);
        Self {
            data: self
                .data
                .slice_axis(Axis(axis), Slice::from(start..start + len))
                .to_owned(),
        }
    }

    /// 按第0维逐行挑选：`mask[i]`为true取`when_true`的第i行，否则取`when_false`的第i行。
    /// 结果是逐元素的拷贝，不经过任何算术运算。
    pub fn select_rows(mask: &[bool], when_true: &Self, when_false: &Self) -> Self {
        assert!(
            when_true.is_same_shape(when_false),
            "{}",
            TensorError::InconsitentShape
        );
        assert!(
            when_true.dimension() >= 1 && when_true.shape()[0] == mask.len(),
            "{}",
            TensorError::IncompatibleShape
        );
        let mut data = when_false.data.clone();
        for (i, _) in mask.iter().enumerate().filter(|(_, m)| **m) {
            data.index_axis_mut(Axis(0), i)
                .assign(&when_true.data.index_axis(Axis(0), i));
        }
        Self { data }
    }

    /// 交换张量的两个（以上）维度，并将其返回（不影响原张量）
    pub fn permute(&self, axes: &[usize]) -> Self {
        assert!(axes.len() >= 2, "{}", TensorError::PermuteNeedAtLeast2Dims);
        // 检查axes中的所有元素必须是唯一且在[0, <张量维数>)范围内
        let unique_axes = axes.iter().copied().collect::<HashSet<_>>();
        assert!(
            !(unique_axes.len() != axes.len()
                || !unique_axes.iter().all(|&a| a < self.dimension())),
            "{}",
            TensorError::PermuteNeedUniqueAndInRange
        );

        let permuted_data = self.data.clone().permuted_axes(axes);
        Self {
            data: permuted_data.as_standard_layout().into_owned(),
        }
    }

    /// 交换指定的两个维度
    pub fn transpose_dims(&self, dim1: usize, dim2: usize) -> Self {
        assert!(
            dim1 < self.dimension() && dim2 < self.dimension(),
            "维度超出范围"
        );
        let mut axes: Vec<usize> = (0..self.dimension()).collect();
        axes.swap(dim1, dim2);
        self.permute(&axes)
    }

    fn check_range(&self, axis: usize, start: usize, end: usize) {
        assert!(
            axis < self.dimension(),
            "{}",
            TensorError::AxisOutOfRange {
                axis,
                dimension: self.dimension(),
            }
        );
        let len = self.shape()[axis];
        assert!(
            start < end && end <= len,
            "{}",
            TensorError::IndexOutOfRange {
                axis,
                len,
                start,
                end,
            }
        );
    }
}
