// crates/gm_mesh/src/lib.rs

//! GravMag 网格模块
//!
//! 构建交给外部网格生成器的 PLC，并提供对已有网格的简单操作。
//!
//! # 核心类型
//!
//! - [`Plc`]: 分段线性复形（节点、边、区域标记、孔洞）
//! - [`Mesh`]: 带单元数据的非结构网格
//! - [`MeshGenerator`]: 外部三角剖分器接口
//!
//! # 模块结构
//!
//! - [`builder`]: 参数域/测区/圆形 PLC 与一维序列
//! - [`merge`]: 网格合并
//! - [`generation`]: 规则网格与四边形加密
//! - [`transform`]: 剖面网格到 3D 的变换与旋转
//! - [`generator`]: 生成器接口与耳切法实现
//!
//! # 示例
//!
//! ```rust
//! use gm_geo::Point3D;
//! use gm_mesh::builder::{create_para_mesh_plc, ParaMeshOptions};
//!
//! let sensors: Vec<Point3D> = (0..21).map(|i| Point3D::new(i as f64, 0.0, 0.0)).collect();
//! let plc = create_para_mesh_plc(&sensors, &ParaMeshOptions::default()).unwrap();
//! assert_eq!(plc.regions().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attributes;
pub mod builder;
pub mod error;
pub mod generation;
pub mod generator;
pub mod markers;
pub mod merge;
pub mod mesh;
pub mod node_index;
pub mod plc;
pub mod transform;

// 重新导出核心类型
pub use attributes::CellDataMap;
pub use builder::{
    create_circle_plc, create_coarse_poly, create_fine_poly, create_para_mesh_plc, grange,
    grange_log, grange_n, increasing_range, ParaMeshOptions,
};
pub use error::{MeshError, MeshResult};
pub use generation::{
    create_grid, create_para_mesh_2d_grid, refine_quad_to_tri, ParaGridOptions, QuadSplit,
};
pub use generator::{create_mesh, EarClipGenerator, GeneratorOptions, MeshGenerator, MeshInput};
pub use merge::{merge_meshes, merge_two_meshes};
pub use mesh::{Boundary, Cell, Mesh, Node};
pub use plc::{merge_plc, Plc, PlcEdge, PlcNode, RegionMarker};
pub use transform::{rotate_2d_mesh_to_world, transform_2d_mesh_to_3d};
