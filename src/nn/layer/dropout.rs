/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Dropout 与 AlphaDropout
 *
 * 两者都只在 train 模式下生效，掩码从 Session 的 RNG 逐元素抽取；
 * eval 模式下原样返回输入。
 *
 * AlphaDropout 与 SELU 配合使用，被丢弃的位置置为 α' = -λα，
 * 再做仿射变换 a·x + b，使输出保持零均值、单位方差：
 *   a = ((1 - p)(1 + p·α'²))^(-1/2)
 *   b = -a·α'·p
 */

use crate::nn::Session;
use crate::tensor::Tensor;
use crate::tensor::{SELU_ALPHA, SELU_SCALE};
use rand::Rng;

fn keep_mask(session: &Session, shape: &[usize], p: f32) -> Tensor {
    let len = shape.iter().product::<usize>();
    let mask = session.with_rng(|rng| {
        (0..len)
            .map(|_| if rng.r#gen::<f32>() < p { 0.0 } else { 1.0 })
            .collect::<Vec<_>>()
    });
    Tensor::new(&mask, shape)
}

/// 标准（inverted）dropout：以概率 p 置零，保留的元素放大 1/(1-p)
#[derive(Debug, Clone)]
pub struct Dropout {
    session: Session,
    p: f32,
}

impl Dropout {
    pub fn new(session: &Session, p: f32) -> Self {
        Self {
            session: session.clone(),
            p,
        }
    }

    pub fn forward(&self, x: &Tensor) -> Tensor {
        if self.session.is_eval_mode() || self.p <= 0.0 {
            return x.clone();
        }
        let mask = keep_mask(&self.session, x.shape(), self.p);
        x * &mask * (1.0 / (1.0 - self.p))
    }

    pub const fn p(&self) -> f32 {
        self.p
    }
}

/// 保持自归一化性质的 dropout，见文件头的公式
#[derive(Debug, Clone)]
pub struct AlphaDropout {
    session: Session,
    p: f32,
}

impl AlphaDropout {
    pub fn new(session: &Session, p: f32) -> Self {
        Self {
            session: session.clone(),
            p,
        }
    }

    pub fn forward(&self, x: &Tensor) -> Tensor {
        if self.session.is_eval_mode() || self.p <= 0.0 {
            return x.clone();
        }
        let alpha_prime = -SELU_SCALE * SELU_ALPHA;
        let p = self.p;
        let a = ((1.0 - p) * (1.0 + p * alpha_prime * alpha_prime)).powf(-0.5);
        let b = -a * alpha_prime * p;

        let mask = keep_mask(&self.session, x.shape(), p);
        let dropped = x * &mask + (1.0 - &mask) * alpha_prime;
        dropped * a + b
    }

    pub const fn p(&self) -> f32 {
        self.p
    }
}
