// crates/gm_mesh/src/mesh.rs

//! 非结构网格
//!
//! 由外部生成器或本 crate 工具构建的网格：节点、单元、边界（2D 为边，3D 为面）
//! 和单元数据表。正演只读取 `marker != 0` 的边界。
//!
//! # 示例
//!
//! ```
//! use gm_geo::Point3D;
//! use gm_mesh::mesh::Mesh;
//!
//! let mut mesh = Mesh::new_2d();
//! let ids: Vec<usize> = [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]
//!     .iter()
//!     .map(|&(x, y)| mesh.create_node(Point3D::new(x, y, 0.0), 0))
//!     .collect();
//! mesh.create_cell(ids.clone(), 1).unwrap();
//! for i in 0..3 {
//!     mesh.create_boundary(vec![ids[i], ids[(i + 1) % 3]], 1).unwrap();
//! }
//! assert!(mesh.check_closed_boundary().is_ok());
//! ```

use crate::attributes::CellDataMap;
use crate::error::{MeshError, MeshResult};
use crate::markers::is_active_boundary;
use gm_foundation::error::{GmError, GmResult};
use gm_geo::{BoundingBox, Point3D};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 网格节点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 位置
    pub pos: Point3D,
    /// 标记
    pub marker: i32,
}

/// 网格单元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// 节点编号（2D 逆时针）
    pub nodes: Vec<usize>,
    /// 单元（区域）标记
    pub marker: i32,
}

/// 网格边界：2D 为两节点的边，3D 为平面多边形面
///
/// 节点顺序决定外法向（右手定则）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// 节点编号
    pub nodes: Vec<usize>,
    /// 边界标记
    pub marker: i32,
}

/// 非结构网格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    dimension: usize,
    nodes: Vec<Node>,
    cells: Vec<Cell>,
    boundaries: Vec<Boundary>,
    data: CellDataMap,
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new_2d()
    }
}

impl Mesh {
    /// 创建指定维度的空网格
    pub fn new(dimension: usize) -> GmResult<Self> {
        if dimension != 2 && dimension != 3 {
            return Err(GmError::invalid_input(format!(
                "网格维度只能为 2 或 3, 实际 {dimension}"
            )));
        }
        Ok(Self {
            dimension,
            nodes: Vec::new(),
            cells: Vec::new(),
            boundaries: Vec::new(),
            data: CellDataMap::new(0),
        })
    }

    /// 创建空的 2D 网格
    pub fn new_2d() -> Self {
        Self {
            dimension: 2,
            nodes: Vec::new(),
            cells: Vec::new(),
            boundaries: Vec::new(),
            data: CellDataMap::new(0),
        }
    }

    /// 复制节点、单元与边界，不含单元数据
    pub(crate) fn clone_geometry(&self) -> Self {
        Self {
            dimension: self.dimension,
            nodes: self.nodes.clone(),
            cells: self.cells.clone(),
            boundaries: self.boundaries.clone(),
            data: CellDataMap::new(self.cells.len()),
        }
    }

    /// 维度
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    // ========================================================================
    // 构建
    // ========================================================================

    /// 添加节点，返回编号
    pub fn create_node(&mut self, pos: Point3D, marker: i32) -> usize {
        self.nodes.push(Node { pos, marker });
        self.nodes.len() - 1
    }

    /// 添加节点，若距离 `tol` 内已有节点则返回其编号
    pub fn create_node_with_check(&mut self, pos: Point3D, marker: i32, tol: f64) -> usize {
        match self.nodes.iter().position(|n| n.pos.distance(&pos) <= tol) {
            Some(id) => id,
            None => self.create_node(pos, marker),
        }
    }

    fn check_node_ids(&self, operation: &'static str, ids: &[usize]) -> MeshResult<()> {
        let n = self.nodes.len();
        match ids.iter().find(|&&id| id >= n) {
            Some(&bad) => Err(MeshError::node_out_of_range(operation, bad, n)),
            None => Ok(()),
        }
    }

    /// 添加单元
    ///
    /// 已有单元数据的数组在末尾补 0。
    pub fn create_cell(&mut self, nodes: Vec<usize>, marker: i32) -> MeshResult<usize> {
        let min_nodes = self.dimension + 1;
        if nodes.len() < min_nodes {
            return Err(MeshError::ElementCountMismatch {
                required: min_nodes,
                provided: nodes.len(),
            });
        }
        self.check_node_ids("create_cell", &nodes)?;
        self.cells.push(Cell { nodes, marker });
        self.data.push_cell(0.0);
        Ok(self.cells.len() - 1)
    }

    /// 添加边界
    ///
    /// 2D 边界必须恰为 2 个节点，3D 边界至少 3 个节点。
    pub fn create_boundary(&mut self, nodes: Vec<usize>, marker: i32) -> MeshResult<usize> {
        let ok = match self.dimension {
            2 => nodes.len() == 2,
            _ => nodes.len() >= 3,
        };
        if !ok {
            return Err(MeshError::ElementCountMismatch {
                required: self.dimension,
                provided: nodes.len(),
            });
        }
        self.check_node_ids("create_boundary", &nodes)?;
        self.boundaries.push(Boundary { nodes, marker });
        Ok(self.boundaries.len() - 1)
    }

    // ========================================================================
    // 访问
    // ========================================================================

    /// 节点
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// 单元
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// 可变单元（仅允许修改标记，节点编号须保持有效）
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// 边界
    #[inline]
    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// 节点数
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 单元数
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// 边界数
    #[inline]
    pub fn boundary_count(&self) -> usize {
        self.boundaries.len()
    }

    /// 节点位置
    #[inline]
    pub fn node_pos(&self, id: usize) -> Point3D {
        self.nodes[id].pos
    }

    /// 全部节点位置
    pub fn positions(&self) -> Vec<Point3D> {
        self.nodes.iter().map(|n| n.pos).collect()
    }

    /// 修改节点位置
    pub fn set_node_pos(&mut self, id: usize, pos: Point3D) -> GmResult<()> {
        GmError::check_index("node", id, self.nodes.len())?;
        self.nodes[id].pos = pos;
        Ok(())
    }

    /// 单元标记
    pub fn cell_markers(&self) -> Vec<i32> {
        self.cells.iter().map(|c| c.marker).collect()
    }

    /// 单元中心（节点平均）
    pub fn cell_center(&self, cell: &Cell) -> Point3D {
        let sum = cell
            .nodes
            .iter()
            .fold(Point3D::ZERO, |acc, &id| acc + self.nodes[id].pos);
        sum.scale(1.0 / cell.nodes.len() as f64)
    }

    /// 边界节点位置
    pub fn boundary_positions(&self, boundary: &Boundary) -> Vec<Point3D> {
        boundary.nodes.iter().map(|&id| self.nodes[id].pos).collect()
    }

    /// 参与正演的边界（标记非 0）
    pub fn active_boundaries(&self) -> impl Iterator<Item = &Boundary> + '_ {
        self.boundaries
            .iter()
            .filter(|b| is_active_boundary(b.marker))
    }

    /// 包围盒，空网格返回 None
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(self.nodes.iter().map(|n| &n.pos))
    }

    // ========================================================================
    // 单元数据
    // ========================================================================

    /// 单元数据表
    #[inline]
    pub fn data(&self) -> &CellDataMap {
        &self.data
    }

    /// 可变单元数据表
    #[inline]
    pub fn data_mut(&mut self) -> &mut CellDataMap {
        &mut self.data
    }

    /// 设置单元数据
    pub fn set_cell_data(&mut self, name: &str, values: Vec<f64>) -> MeshResult<()> {
        self.data.set(name, values)
    }

    pub(crate) fn reset_data(&mut self) {
        self.data.reset(self.cells.len());
    }

    // ========================================================================
    // 变换与检查
    // ========================================================================

    /// 平移全部节点
    pub fn translate(&mut self, offset: Point3D) {
        for node in &mut self.nodes {
            node.pos += offset;
        }
    }

    /// 检查活动边界是否闭合且绕向一致
    ///
    /// - 2D: 每个节点的出度等于入度
    /// - 3D: 每条有向边 (a, b) 都有反向边 (b, a) 与之配对
    pub fn check_closed_boundary(&self) -> MeshResult<()> {
        if self.dimension == 2 {
            let mut degree: HashMap<usize, i64> = HashMap::new();
            for b in self.active_boundaries() {
                *degree.entry(b.nodes[0]).or_insert(0) += 1;
                *degree.entry(b.nodes[1]).or_insert(0) -= 1;
            }
            let mut unbalanced: Vec<usize> = degree
                .into_iter()
                .filter(|&(_, d)| d != 0)
                .map(|(id, _)| id)
                .collect();
            if !unbalanced.is_empty() {
                unbalanced.sort_unstable();
                return Err(MeshError::invalid_topology(
                    "check_closed_boundary",
                    format!("边界链未闭合或绕向不一致, 节点 {:?}", unbalanced),
                ));
            }
        } else {
            let mut directed: HashMap<(usize, usize), i64> = HashMap::new();
            for b in self.active_boundaries() {
                let n = b.nodes.len();
                for i in 0..n {
                    let a = b.nodes[i];
                    let c = b.nodes[(i + 1) % n];
                    *directed.entry((a, c)).or_insert(0) += 1;
                }
            }
            for (&(a, c), &count) in &directed {
                let reverse = directed.get(&(c, a)).copied().unwrap_or(0);
                if reverse != count {
                    return Err(MeshError::invalid_topology(
                        "check_closed_boundary",
                        format!("边界面未闭合或法向不一致, 边 ({a}, {c})"),
                    ));
                }
            }
        }
        Ok(())
    }
}
