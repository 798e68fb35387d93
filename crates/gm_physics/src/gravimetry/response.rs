// crates/gm_physics/src/gravimetry/response.rs

//! 核函数与正演结果容器

use gm_foundation::error::{GmError, GmResult};
use serde::{Deserialize, Serialize};

/// 单点（或单条边/单个面）的场贡献
///
/// - `field`: 场向量 (x, y, z)，剖面问题中 y 分量恒为 0
/// - `gradient`: 竖直分量的梯度
///
/// 组装后的结果中梯度对场源位置求导，即等于对测点坐标求导的相反数。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldSample {
    /// 场向量
    pub field: [f64; 3],
    /// 竖直分量梯度
    pub gradient: [f64; 3],
}

impl FieldSample {
    /// 零贡献
    pub const ZERO: Self = Self {
        field: [0.0; 3],
        gradient: [0.0; 3],
    };

    /// 创建
    #[inline]
    pub const fn new(field: [f64; 3], gradient: [f64; 3]) -> Self {
        Self { field, gradient }
    }

    /// 两部分同乘一个系数
    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            field: self.field.map(|v| v * factor),
            gradient: self.gradient.map(|v| v * factor),
        }
    }

    /// 是否为零贡献
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.field.iter().chain(&self.gradient).all(|&v| v == 0.0)
    }

    /// 所有分量均有限
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.field.iter().chain(&self.gradient).all(|v| v.is_finite())
    }
}

/// 一批测点上的正演结果，顺序与输入测点一致
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GravityResponse {
    /// 各测点的场向量
    pub field: Vec<[f64; 3]>,
    /// 各测点的竖直分量梯度
    pub gradient: Vec<[f64; 3]>,
}

impl GravityResponse {
    /// 由单点结果构建
    pub fn from_samples(samples: Vec<FieldSample>) -> Self {
        let (field, gradient) = samples.into_iter().map(|s| (s.field, s.gradient)).unzip();
        Self { field, gradient }
    }

    /// 测点数
    #[inline]
    pub fn len(&self) -> usize {
        self.field.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.field.is_empty()
    }

    /// 第 i 个测点的结果
    pub fn sample(&self, i: usize) -> GmResult<FieldSample> {
        GmError::check_index("measurement", i, self.len())?;
        Ok(FieldSample::new(self.field[i], self.gradient[i]))
    }

    /// 水平分量 x
    pub fn gx(&self) -> Vec<f64> {
        self.field.iter().map(|f| f[0]).collect()
    }

    /// 竖直分量 z
    pub fn gz(&self) -> Vec<f64> {
        self.field.iter().map(|f| f[2]).collect()
    }

    /// 竖直分量的竖直梯度
    pub fn gzz(&self) -> Vec<f64> {
        self.gradient.iter().map(|g| g[2]).collect()
    }

    /// 检查所有分量有限，返回首个非有限值所在的测点
    pub fn check_finite(&self) -> GmResult<()> {
        for (i, (f, g)) in self.field.iter().zip(&self.gradient).enumerate() {
            for &v in f.iter().chain(g) {
                if !v.is_finite() {
                    return Err(GmError::non_finite(format!("response[{}]", i), v));
                }
            }
        }
        Ok(())
    }
}
