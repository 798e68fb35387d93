// crates/gm_foundation/src/lib.rs

//! GravMag Foundation Layer
//!
//! 基础层，提供整个工作区共享的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型 `GmError` / `GmResult`
//! - [`float`]: 数值常量、符号函数和 Kahan 补偿求和
//! - [`tolerance`]: 几何与核函数容差配置
//!
//! # 设计原则
//!
//! 1. **最小依赖**: 仅依赖 serde 和 thiserror
//! 2. **无全局状态**: 容差通过参数注入，不使用全局静态变量
//! 3. **退化几何不是错误**: 前置条件违规才返回错误
//!
//! # 示例
//!
//! ```
//! use gm_foundation::{
//!     error::{GmError, GmResult},
//!     float::KahanSum,
//! };
//!
//! fn total(values: &[f64]) -> GmResult<f64> {
//!     if values.is_empty() {
//!         return Err(GmError::invalid_input("空数组"));
//!     }
//!     Ok(KahanSum::sum_iter(values.iter().copied()))
//! }
//!
//! assert_eq!(total(&[1.0, 2.0]).unwrap(), 3.0);
//! assert!(total(&[]).is_err());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod float;
pub mod tolerance;

// 重导出常用类型
pub use error::{GmError, GmResult};
pub use float::{sign, KahanSum};
pub use tolerance::GeometryTolerance;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::error::{GmError, GmResult};
    pub use crate::float::{safe_div, sign, KahanSum, KahanVec3};
    pub use crate::tolerance::GeometryTolerance;
    pub use crate::{ensure, require};
}
