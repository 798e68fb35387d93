// crates/gm_mesh/src/plc.rs

//! 分段线性复形 (PLC)
//!
//! PLC 是交给外部网格生成器的输入几何：带标记的节点、连接节点的边、
//! 区域标记点（区域编号 + 最大单元面积）以及孔洞点。
//!
//! 2D PLC 中节点位置的 y 分量为竖直坐标（向上为正），z 恒为 0。
//!
//! # 示例
//!
//! ```
//! use gm_geo::Point3D;
//! use gm_mesh::plc::Plc;
//!
//! let mut plc = Plc::new_2d();
//! let a = plc.create_node(Point3D::new(0.0, 0.0, 0.0), 0);
//! let b = plc.create_node(Point3D::new(1.0, 0.0, 0.0), 0);
//! plc.create_edge(a, b, -1).unwrap();
//! assert_eq!(plc.edge_count(), 1);
//! assert!(plc.create_edge(a, 5, -1).is_err());
//! ```

use crate::error::{MeshError, MeshResult};
use crate::node_index::NodeIndex;
use gm_foundation::error::{GmError, GmResult};
use gm_geo::{BoundingBox, Point3D};
use serde::{Deserialize, Serialize};

/// PLC 节点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlcNode {
    /// 位置
    pub pos: Point3D,
    /// 节点标记
    pub marker: i32,
}

/// PLC 边
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlcEdge {
    /// 起止节点编号
    pub nodes: [usize; 2],
    /// 边界标记
    pub marker: i32,
}

/// 区域标记点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionMarker {
    /// 区域内部一点
    pub pos: Point3D,
    /// 区域编号
    pub marker: i32,
    /// 最大单元面积，0 表示不约束
    pub max_cell_size: f64,
}

/// 分段线性复形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plc {
    dimension: usize,
    nodes: Vec<PlcNode>,
    edges: Vec<PlcEdge>,
    regions: Vec<RegionMarker>,
    holes: Vec<Point3D>,
}

impl Default for Plc {
    fn default() -> Self {
        Self::new_2d()
    }
}

impl Plc {
    /// 创建指定维度的空 PLC
    pub fn new(dimension: usize) -> GmResult<Self> {
        if dimension != 2 && dimension != 3 {
            return Err(GmError::invalid_input(format!(
                "PLC 维度只能为 2 或 3, 实际 {dimension}"
            )));
        }
        Ok(Self {
            dimension,
            nodes: Vec::new(),
            edges: Vec::new(),
            regions: Vec::new(),
            holes: Vec::new(),
        })
    }

    /// 创建空的 2D PLC
    pub fn new_2d() -> Self {
        Self {
            dimension: 2,
            nodes: Vec::new(),
            edges: Vec::new(),
            regions: Vec::new(),
            holes: Vec::new(),
        }
    }

    /// 维度
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// 添加节点，返回节点编号
    pub fn create_node(&mut self, pos: Point3D, marker: i32) -> usize {
        self.nodes.push(PlcNode { pos, marker });
        self.nodes.len() - 1
    }

    /// 添加节点，若距离 `tol` 内已有节点则复用
    ///
    /// 复用时保留已有节点的非零标记，已有标记为 0 时采用新标记。
    pub fn create_node_with_check(&mut self, pos: Point3D, marker: i32, tol: f64) -> usize {
        let existing = self
            .nodes
            .iter()
            .position(|n| n.pos.distance(&pos) <= tol);
        match existing {
            Some(id) => {
                if self.nodes[id].marker == 0 {
                    self.nodes[id].marker = marker;
                }
                id
            }
            None => self.create_node(pos, marker),
        }
    }

    /// 添加边
    ///
    /// # 错误
    /// - 节点编号越界
    /// - 起止节点相同
    pub fn create_edge(&mut self, a: usize, b: usize, marker: i32) -> MeshResult<usize> {
        let n = self.nodes.len();
        for id in [a, b] {
            if id >= n {
                return Err(MeshError::node_out_of_range("create_edge", id, n));
            }
        }
        if a == b {
            return Err(MeshError::invalid_topology(
                "create_edge",
                format!("边的两个端点相同: {a}"),
            ));
        }
        self.edges.push(PlcEdge {
            nodes: [a, b],
            marker,
        });
        Ok(self.edges.len() - 1)
    }

    /// 添加区域标记
    pub fn add_region_marker(&mut self, pos: Point3D, marker: i32, max_cell_size: f64) {
        self.regions.push(RegionMarker {
            pos,
            marker,
            max_cell_size,
        });
    }

    /// 添加孔洞标记
    pub fn add_hole(&mut self, pos: Point3D) {
        self.holes.push(pos);
    }

    /// 节点
    #[inline]
    pub fn nodes(&self) -> &[PlcNode] {
        &self.nodes
    }

    /// 边
    #[inline]
    pub fn edges(&self) -> &[PlcEdge] {
        &self.edges
    }

    /// 区域标记
    #[inline]
    pub fn regions(&self) -> &[RegionMarker] {
        &self.regions
    }

    /// 孔洞
    #[inline]
    pub fn holes(&self) -> &[Point3D] {
        &self.holes
    }

    /// 节点数
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 边数
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 节点位置
    pub fn node_pos(&self, id: usize) -> GmResult<Point3D> {
        GmError::check_index("plc_node", id, self.nodes.len())?;
        Ok(self.nodes[id].pos)
    }

    /// 按标记查找第一个节点
    pub fn find_node_by_marker(&self, marker: i32) -> Option<usize> {
        self.nodes.iter().position(|n| n.marker == marker)
    }

    /// 包围盒，空 PLC 返回 None
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.nodes.iter().map(|n| &n.pos))
    }

    /// 检查边引用与几何有效性
    ///
    /// # 错误
    /// - 边引用越界节点
    /// - 零长度边
    /// - 节点坐标非有限
    pub fn validate(&self) -> GmResult<()> {
        for (i, node) in self.nodes.iter().enumerate() {
            if !node.pos.is_finite() {
                return Err(GmError::invalid_input(format!("PLC 节点 {i} 坐标非有限")));
            }
        }
        let n = self.nodes.len();
        for (i, edge) in self.edges.iter().enumerate() {
            let [a, b] = edge.nodes;
            GmError::check_index("plc_node", a.max(b), n)?;
            if self.nodes[a].pos == self.nodes[b].pos {
                return Err(MeshError::invalid_topology(
                    "validate",
                    format!("边 {i} ({a}-{b}) 长度为零"),
                )
                .into());
            }
        }
        Ok(())
    }
}

/// 合并多个 PLC
///
/// 位置重合（容差 `tol`）的节点被复用，边、区域标记与孔洞按输入顺序拼接。
///
/// # 错误
/// - 输入为空
/// - 维度不一致
pub fn merge_plc(plcs: &[Plc], tol: f64) -> GmResult<Plc> {
    let first = plcs
        .first()
        .ok_or_else(|| GmError::invalid_input("merge_plc: 输入 PLC 列表为空"))?;
    let mut out = Plc::new(first.dimension())?;
    let mut index = NodeIndex::new(tol);

    for plc in plcs {
        if plc.dimension() != out.dimension() {
            return Err(
                MeshError::dimension_mismatch("merge_plc", out.dimension(), plc.dimension())
                    .into(),
            );
        }
        let mut map = Vec::with_capacity(plc.node_count());
        for node in plc.nodes() {
            let id = match index.find(node.pos) {
                Some(id) => {
                    if out.nodes[id].marker == 0 {
                        out.nodes[id].marker = node.marker;
                    }
                    id
                }
                None => {
                    let id = out.create_node(node.pos, node.marker);
                    index.insert(node.pos, id);
                    id
                }
            };
            map.push(id);
        }
        for edge in plc.edges() {
            let [a, b] = edge.nodes;
            if map[a] != map[b] {
                out.create_edge(map[a], map[b], edge.marker)?;
            }
        }
        out.regions.extend_from_slice(plc.regions());
        out.holes.extend_from_slice(plc.holes());
    }

    log::debug!(
        "merge_plc: {} 个 PLC -> {} 节点, {} 边",
        plcs.len(),
        out.node_count(),
        out.edge_count()
    );
    Ok(out)
}
