// crates/gm_geo/src/face.rs

//! 3D 平面多边形面
//!
//! 外法向由节点顺序按右手定则导出，不单独存储。

use crate::geometry::Point3D;
use gm_foundation::error::{GmError, GmResult};
use serde::{Deserialize, Serialize};

/// 3D 平面多边形面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face3D {
    nodes: Vec<Point3D>,
}

impl Face3D {
    /// 由有序节点创建面
    ///
    /// 相邻重复的节点（含首尾重复）只保留一个，保证每条边长度非零。
    ///
    /// # 错误
    /// 去重后节点少于 3 个
    pub fn new(mut nodes: Vec<Point3D>) -> GmResult<Self> {
        nodes.dedup();
        while nodes.len() > 1 && nodes.first() == nodes.last() {
            nodes.pop();
        }
        if nodes.len() < 3 {
            return Err(GmError::invalid_input(format!(
                "面至少需要 3 个互异节点, 实际 {}",
                nodes.len()
            )));
        }
        Ok(Self { nodes })
    }

    /// 节点
    #[inline]
    pub fn nodes(&self) -> &[Point3D] {
        &self.nodes
    }

    /// 节点数
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 第 i 个节点（循环取模）
    #[inline]
    pub fn node(&self, i: usize) -> Point3D {
        self.nodes[i % self.nodes.len()]
    }

    /// 节点平均中心
    pub fn center(&self) -> Point3D {
        let sum = self
            .nodes
            .iter()
            .fold(Point3D::ZERO, |acc, p| acc + *p);
        sum.scale(1.0 / self.nodes.len() as f64)
    }

    /// 面积加权法向（Newell 方法，长度为面积的 2 倍）
    pub fn area_normal(&self) -> Point3D {
        let n = self.nodes.len();
        (0..n).fold(Point3D::ZERO, |acc, i| {
            let a = self.nodes[i];
            let b = self.nodes[(i + 1) % n];
            acc + Point3D::new(
                (a.y - b.y) * (a.z + b.z),
                (a.z - b.z) * (a.x + b.x),
                (a.x - b.x) * (a.y + b.y),
            )
        })
    }

    /// 单位外法向，零面积面返回 None
    pub fn unit_normal(&self) -> Option<Point3D> {
        self.area_normal().normalize()
    }

    /// 面积
    pub fn area(&self) -> f64 {
        0.5 * self.area_normal().length()
    }

    /// 平移（返回新面）
    #[must_use]
    pub fn translated(&self, offset: Point3D) -> Self {
        Self {
            nodes: self.nodes.iter().map(|p| *p + offset).collect(),
        }
    }

    /// 反转节点顺序（法向取反）
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut nodes = self.nodes.clone();
        nodes.reverse();
        Self { nodes }
    }
}
