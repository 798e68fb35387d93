// crates/gm_physics/src/gravimetry/constants.rs

//! 位场正演物理常数
//!
//! 重力结果默认以 mGal 为单位，即引力常数已除以 1e-5。

use gm_foundation::error::{GmError, GmResult};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 万有引力常数 [m³/(kg·s²)]
pub const G_SI: f64 = 6.6742e-11;

/// 1 mGal 对应的 SI 加速度 [m/s²]
pub const MGAL: f64 = 1e-5;

/// 真空磁导率 [H/m]
pub const MU0: f64 = 4.0 * PI * 1e-7;

/// 位场物理常数
///
/// 与数值算法无关，仅决定输出单位。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// 引力常数（已含单位换算）
    pub g: f64,
    /// 真空磁导率 [H/m]
    pub mu0: f64,
}

impl Default for PhysicalConstants {
    /// 默认输出 mGal
    fn default() -> Self {
        Self::mgal()
    }
}

impl PhysicalConstants {
    /// 以 mGal 为输出单位
    pub fn mgal() -> Self {
        Self {
            g: G_SI / MGAL,
            mu0: MU0,
        }
    }

    /// 以 m/s² 为输出单位
    pub fn si() -> Self {
        Self { g: G_SI, mu0: MU0 }
    }

    /// 泊松关系系数 μ0 / (4πG)
    #[inline]
    pub fn poisson_factor(&self) -> f64 {
        self.mu0 / (4.0 * PI * self.g)
    }

    /// 校验常数为正的有限值
    pub fn validate(&self) -> GmResult<()> {
        for (name, value) in [("g", self.g), ("mu0", self.mu0)] {
            GmError::check_finite(name, value)?;
            if value <= 0.0 {
                return Err(GmError::invalid_input(format!(
                    "物理常数 {} 必须为正: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
