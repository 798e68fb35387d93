// crates/gm_geo/src/lib.rs
//! GravMag 几何模块
//!
//! 提供正演核函数和 PLC 构建共用的几何原语。
//!
//! # 模块
//!
//! - `geometry`: 点/向量 (Point2D, Point3D) 与包围盒
//! - `polygon`: 2D 剖面多边形与圆构建
//! - `face`: 3D 平面多边形面
//!
//! # 示例
//!
//! ```
//! use gm_geo::prelude::*;
//!
//! let pts = build_circle(Point2D::new(0.0, -10.0), 2.0, 48, Orientation::CounterClockwise).unwrap();
//! let poly = Polygon2D::new(pts).unwrap();
//! assert_eq!(poly.edge_count(), 48);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod face;
pub mod geometry;
pub mod polygon;

/// 预导入模块
pub mod prelude {
    pub use crate::face::Face3D;
    pub use crate::geometry::{BoundingBox, Point2D, Point3D};
    pub use crate::polygon::{build_circle, Orientation, Polygon2D};
}

// 重导出常用类型
pub use face::Face3D;
pub use geometry::{BoundingBox, Point2D, Point3D};
pub use polygon::{build_circle, Orientation, Polygon2D};
