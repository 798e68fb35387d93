// crates/gm_foundation/src/float.rs

//! 数值常量与浮点辅助
//!
//! 提供核函数中反复使用的符号函数、安全除法和 Kahan 补偿求和。
//!
//! 重力异常由大量边/面贡献累加而成，贡献之间常有数量级差异，
//! 因此累加器统一使用 [`KahanSum`] / [`KahanVec3`]。

// ============================================================================
// 数值常量
// ============================================================================

/// 浮点数相等性比较的默认容差
pub const DEFAULT_EPSILON: f64 = 1e-14;

/// 安全除法的最小分母阈值
pub const SAFE_DIV_EPSILON: f64 = 1e-14;

// ============================================================================
// 标量辅助函数
// ============================================================================

/// 三值符号函数
///
/// 与 `f64::signum` 不同，零（含 `-0.0`）返回 `0.0`，NaN 返回 `0.0`。
///
/// ```
/// use gm_foundation::float::sign;
///
/// assert_eq!(sign(-3.0), -1.0);
/// assert_eq!(sign(0.0), 0.0);
/// assert_eq!(sign(-0.0), 0.0);
/// assert_eq!(sign(2.5), 1.0);
/// ```
#[inline]
pub fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// 安全除法，分母过小时返回 `fallback`
#[inline]
pub fn safe_div(a: f64, b: f64, fallback: f64) -> f64 {
    if b.abs() < SAFE_DIV_EPSILON {
        fallback
    } else {
        a / b
    }
}

/// 相对/绝对混合容差比较
#[inline]
pub fn approx_eq(a: f64, b: f64, rel: f64, abs: f64) -> bool {
    let diff = (a - b).abs();
    diff <= abs || diff <= rel * a.abs().max(b.abs())
}

// ============================================================================
// Kahan 补偿求和
// ============================================================================

/// Kahan 补偿求和器
///
/// 减少大量浮点数累加时的舍入误差。
///
/// # 示例
///
/// ```
/// use gm_foundation::float::KahanSum;
///
/// let mut sum = KahanSum::new();
/// for _ in 0..10000 {
///     sum.add(0.1);
/// }
/// let error = (sum.value() - 1000.0).abs();
/// assert!(error < 1e-10, "误差应该很小: {}", error);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanSum {
    /// 累加和
    sum: f64,
    /// 补偿项（低位精度损失）
    compensation: f64,
}

impl KahanSum {
    /// 创建新的 Kahan 求和器
    #[inline]
    pub fn new() -> Self {
        Self {
            sum: 0.0,
            compensation: 0.0,
        }
    }

    /// 添加一个值
    #[inline]
    pub fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        // (t - sum) 是 y 的高位部分，减去 y 得到丢失的低位部分
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    /// 获取当前求和值
    #[inline]
    pub fn value(&self) -> f64 {
        self.sum
    }

    /// 重置求和器
    #[inline]
    pub fn reset(&mut self) {
        self.sum = 0.0;
        self.compensation = 0.0;
    }

    /// 从迭代器求和
    pub fn sum_iter<I: IntoIterator<Item = f64>>(iter: I) -> f64 {
        let mut kahan = Self::new();
        for v in iter {
            kahan.add(v);
        }
        kahan.value()
    }
}

impl std::iter::Sum<f64> for KahanSum {
    fn sum<I: Iterator<Item = f64>>(iter: I) -> Self {
        let mut kahan = KahanSum::new();
        for v in iter {
            kahan.add(v);
        }
        kahan
    }
}

/// 三分量 Kahan 累加器（场向量 / 梯度向量）
#[derive(Debug, Clone, Copy, Default)]
pub struct KahanVec3 {
    components: [KahanSum; 3],
}

impl KahanVec3 {
    /// 创建零累加器
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一个三分量值
    #[inline]
    pub fn add(&mut self, value: [f64; 3]) {
        for (acc, v) in self.components.iter_mut().zip(value) {
            acc.add(v);
        }
    }

    /// 当前累加值
    #[inline]
    pub fn value(&self) -> [f64; 3] {
        [
            self.components[0].value(),
            self.components[1].value(),
            self.components[2].value(),
        ]
    }
}

// ============================================================================
// 测试
// ============================================================================
