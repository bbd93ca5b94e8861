/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : Session：各层共享的运行上下文（train/eval 模式 + 随机数生成器）
 *
 * 各层在创建时克隆一份 Session 句柄（Rc），因此切换模式对所有层同时生效；
 * dropout 类层在 eval 模式下直接返回输入，不消耗随机数。
 */

use crate::nn::Init;
use crate::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::RefCell;
use std::rc::Rc;

pub struct SessionInner {
    is_eval_mode: bool,
    rng: StdRng,
}

/// 运行上下文句柄，Clone 开销极低（Rc clone）
///
/// # 使用示例
/// ```ignore
/// let session = Session::new_with_seed(42);
/// let encoder = RnnEncoder::new(&session, &config, None)?;
/// session.set_eval_mode();
/// let out = encoder.encode(&ids, &lengths)?;
/// ```
#[derive(Clone)]
pub struct Session {
    inner: Rc<RefCell<SessionInner>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("is_eval_mode", &self.is_eval_mode())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// 创建新的 Session（随机种子来自系统熵），默认处于 train 模式
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// 创建带固定种子的 Session，参数初始化与 dropout 掩码均可复现
    pub fn new_with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionInner {
                is_eval_mode: false,
                rng,
            })),
        }
    }

    /// 重置随机数生成器
    pub fn set_seed(&self, seed: u64) {
        self.inner.borrow_mut().rng = StdRng::seed_from_u64(seed);
    }

    pub fn set_train_mode(&self) {
        self.inner.borrow_mut().is_eval_mode = false;
    }

    pub fn set_eval_mode(&self) {
        self.inner.borrow_mut().is_eval_mode = true;
    }

    pub fn is_train_mode(&self) -> bool {
        !self.inner.borrow().is_eval_mode
    }

    pub fn is_eval_mode(&self) -> bool {
        self.inner.borrow().is_eval_mode
    }

    /// 在 eval 模式下执行闭包，结束后恢复原来的模式
    pub fn eval_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let was_train = self.is_train_mode();
        self.set_eval_mode();
        let result = f();
        if was_train {
            self.set_train_mode();
        }
        result
    }

    /// 按初始化策略生成一个参数张量（使用 Session 的 RNG）
    pub fn parameter(&self, shape: &[usize], init: Init) -> Tensor {
        self.with_rng(|rng| init.generate_with_rng(shape, rng))
    }

    pub(crate) fn with_rng<R>(&self, f: impl FnOnce(&mut StdRng) -> R) -> R {
        f(&mut self.inner.borrow_mut().rng)
    }
}
