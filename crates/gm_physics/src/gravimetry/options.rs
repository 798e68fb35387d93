// crates/gm_physics/src/gravimetry/options.rs

//! 正演计算选项

use super::constants::PhysicalConstants;
use gm_foundation::error::GmResult;
use gm_foundation::tolerance::GeometryTolerance;
use serde::{Deserialize, Serialize};

/// 正演计算选项
///
/// `parallel` 仅在启用 `parallel` feature 时生效，否则总是顺序计算。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForwardOptions {
    /// 物理常数（决定输出单位）
    pub constants: PhysicalConstants,
    /// 核函数容差
    pub tolerance: GeometryTolerance,
    /// 是否按测点并行
    pub parallel: bool,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            tolerance: GeometryTolerance::default(),
            parallel: true,
        }
    }
}

impl ForwardOptions {
    /// 使用给定常数，其余取默认
    pub fn with_constants(constants: PhysicalConstants) -> Self {
        Self {
            constants,
            ..Self::default()
        }
    }

    /// 顺序计算
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// 校验
    pub fn validate(&self) -> GmResult<()> {
        self.constants.validate()
    }
}
