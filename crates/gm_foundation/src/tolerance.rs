// crates/gm_foundation/src/tolerance.rs

//! 几何与核函数容差配置
//!
//! 所有阈值通过参数注入，不使用全局静态变量。
//! 默认值与地球物理脚本工具箱的历史行为一致。

use serde::{Deserialize, Serialize};

/// 几何容差配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryTolerance {
    /// 近竖直边判据：|x2 - x1| 小于该值时使用竖直极限公式 [m]
    pub vertical_edge: f64,
    /// 多边形首尾重合判据 [m]
    pub closing_point: f64,
    /// 判定传感器位于 z=0 平面（即以 z 为深度轴）的绝对容差 [m]
    pub depth_plane: f64,
    /// 区域标记相对角点的偏移 [m]
    pub region_offset: f64,
    /// 合并网格时节点去重容差 [m]
    pub node_merge: f64,
}

impl Default for GeometryTolerance {
    fn default() -> Self {
        Self {
            vertical_edge: 1e-4,
            closing_point: 1e-8,
            depth_plane: 1e-8,
            region_offset: 1e-3,
            node_merge: 1e-9,
        }
    }
}

impl GeometryTolerance {
    /// 判断边是否近竖直
    #[inline]
    pub fn is_vertical(&self, dx: f64) -> bool {
        dx.abs() < self.vertical_edge
    }

    /// 判断两点距离是否可视为重合
    #[inline]
    pub fn is_closing(&self, distance: f64) -> bool {
        distance < self.closing_point
    }

    /// 判断坐标是否位于零平面
    #[inline]
    pub fn is_on_plane(&self, value: f64) -> bool {
        value.abs() < self.depth_plane
    }
}
