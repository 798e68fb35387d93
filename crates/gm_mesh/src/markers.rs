// crates/gm_mesh/src/markers.rs

//! 节点、边界与区域保留标记
//!
//! 数值与下游网格生成器及正演求解器约定一致，不可更改。

/// 传感器（电极/测点）节点
pub const MARKER_NODE_SENSOR: i32 = -99;

/// 齐次 Neumann 边界（地表）
pub const MARKER_BOUND_HOMOGEN_NEUMANN: i32 = -1;

/// 混合边界（外部世界边界）
pub const MARKER_BOUND_MIXED: i32 = -2;

/// 齐次 Dirichlet 边界
pub const MARKER_BOUND_HOMOGEN_DIRICHLET: i32 = -3;

/// Dirichlet 边界
pub const MARKER_BOUND_DIRICHLET: i32 = -4;

/// 外部延拓区域
pub const REGION_BOUNDARY: i32 = 1;

/// 参数（反演）区域
pub const REGION_PARAMETER: i32 = 2;

/// 参数区域边界边
pub const MARKER_PARA_EDGE: i32 = 1;

/// 是否为参与正演的边界标记
#[inline]
pub fn is_active_boundary(marker: i32) -> bool {
    marker != 0
}
