// crates/gm_physics/src/lib.rs

//! GravMag 物理模块
//!
//! 重力与磁法正演的闭式核函数及网格边界积分。
//!
//! # 模块结构
//!
//! - [`gravimetry`]: 线积分、面核、解析体、磁异常、网格响应
//!
//! # Features
//!
//! - `parallel`（默认）: 使用 rayon 按测点并行

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod gravimetry;

// 重导出常用类型
pub use gravimetry::{
    calc_poly_gz, grav, BodyParams, FieldSample, ForwardOptions, GravityResponse,
    PhysicalConstants,
};
