// crates/gm_config/src/lib.rs

//! GravMag 配置层
//!
//! 汇总网格构建与正演的选项，提供 JSON 读写与校验。
//!
//! # 模块概览
//!
//! - [`gravmag_config`]: GravMagConfig 统一配置
//! - [`error`]: 配置错误类型
//!
//! # 层级架构
//!
//! ```text
//! gm_config     ─> GravMagConfig (本层)
//! gm_physics    ─> PhysicalConstants, ForwardOptions
//! gm_mesh       ─> ParaMeshOptions, ParaGridOptions, GeneratorOptions
//! gm_geo
//! gm_foundation ─> GmError, GeometryTolerance
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod gravmag_config;

// 重导出核心类型
pub use error::ConfigError;
pub use gravmag_config::GravMagConfig;
