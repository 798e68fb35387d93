// crates/gm_physics/src/gravimetry/mod.rs

//! 重力与磁法正演
//!
//! 提供位场正演的闭式核函数：
//! - 二维线积分 (Won & Bevis)
//! - 多面体面核 (Singh & Guptasarma)
//! - 球体、水平圆柱、半板的解析解
//! - 基于泊松关系的磁异常
//! - 网格边界积分
//!
//! # 设计
//!
//! 核函数只处理单个测点、单条边或单个面；批量计算是对单点函数的显式映射，
//! 每个测点独立累加，可按测点并行。
//!
//! # 使用示例
//!
//! ```
//! use gm_geo::{build_circle, Orientation, Point2D, Polygon2D};
//! use gm_physics::gravimetry::{calc_poly_gz, surface_profile, PhysicalConstants};
//!
//! let circle = build_circle(Point2D::new(0.0, -5.0), 1.0, 48, Orientation::CounterClockwise).unwrap();
//! let poly = Polygon2D::new(circle).unwrap();
//! let points = surface_profile(&[-10.0, 0.0, 10.0]);
//! let r = calc_poly_gz(&points, &poly, 1000.0, &PhysicalConstants::default()).unwrap();
//! assert!(r.gz()[1] > r.gz()[0]);
//! ```

mod batch;
pub mod bodies;
pub mod constants;
pub mod line_integral;
pub mod magnetics;
pub mod mesh_response;
pub mod options;
pub mod polygon;
pub mod response;
pub mod solid_angle;

pub use bodies::{AnalyticBody, HalfPlate, HorizontalCylinder, Sphere};
pub use constants::{PhysicalConstants, G_SI, MGAL, MU0};
pub use line_integral::{line_integral_won_bevis, line_integral_won_bevis_with};
pub use magnetics::{
    ba_z_cylinder_horiz, ba_z_sphere, induced_magnetization, inducing_field, poisson_eotvos,
};
pub use mesh_response::{grav, grav_with, BodyParams};
pub use options::ForwardOptions;
pub use polygon::{bz_poly, calc_poly_gz, calc_poly_gz_with, surface_profile};
pub use response::{FieldSample, GravityResponse};
pub use solid_angle::{face_response_singh_gup, solid_angle, vertex_angle};
