// crates/gm_mesh/src/generator.rs

//! 网格生成器接口
//!
//! 三角剖分（Triangle、Tetgen 等）作为外部协作者，通过 [`MeshGenerator`] 注入。
//! 内置 [`EarClipGenerator`] 用耳切法剖分单个闭合边界链，不支持质量/面积约束。

use crate::error::MeshError;
use crate::markers::MARKER_BOUND_HOMOGEN_NEUMANN;
use crate::merge::MERGE_NODE_TOLERANCE;
use crate::mesh::Mesh;
use crate::plc::{merge_plc, Plc};
use gm_foundation::error::{GmError, GmResult};
use gm_geo::{Point2D, Point3D};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 网格生成选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// 最小角约束 [度]
    pub quality: f64,
    /// 最大单元面积 [m²]，0 表示不约束
    pub area: f64,
    /// 平滑迭代次数，0 表示不平滑
    pub smooth_iterations: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            quality: 30.0,
            area: 0.0,
            smooth_iterations: 0,
        }
    }
}

impl GeneratorOptions {
    /// 校验选项
    pub fn validate(&self) -> GmResult<()> {
        GmError::check_range("quality", self.quality, 0.0, 60.0)?;
        GmError::check_range("area", self.area, 0.0, f64::MAX)?;
        Ok(())
    }
}

/// 由 PLC 生成网格的外部协作者
pub trait MeshGenerator: Send + Sync {
    /// 生成器名称
    fn name(&self) -> &str;

    /// 由 2D PLC 生成网格
    fn generate(&self, plc: &Plc, opts: &GeneratorOptions) -> GmResult<Mesh>;
}

/// 网格生成输入
#[derive(Debug, Clone, Copy)]
pub enum MeshInput<'a> {
    /// 散点，由其凸包构成边界
    Points(&'a [Point2D]),
    /// 单个 PLC
    Plc(&'a Plc),
    /// 多个 PLC，先合并
    Plcs(&'a [Plc]),
}

/// 由点集、PLC 或 PLC 列表生成网格
///
/// # 错误
/// - 3D PLC: [`GmError::NotImplemented`]
/// - 无节点: [`GmError::InvalidInput`]
pub fn create_mesh(
    input: MeshInput<'_>,
    generator: &dyn MeshGenerator,
    opts: &GeneratorOptions,
) -> GmResult<Mesh> {
    opts.validate()?;
    let owned;
    let plc = match input {
        MeshInput::Points(points) => {
            let mut plc = Plc::new_2d();
            for p in points {
                plc.create_node(p.with_z(0.0), 0);
            }
            owned = plc;
            &owned
        }
        MeshInput::Plc(plc) => plc,
        MeshInput::Plcs(plcs) => {
            owned = merge_plc(plcs, MERGE_NODE_TOLERANCE)?;
            &owned
        }
    };

    if plc.dimension() == 3 {
        return Err(GmError::not_implemented("3D 网格生成"));
    }
    if plc.node_count() == 0 {
        return Err(GmError::invalid_input("PLC 中没有节点, 无法生成网格"));
    }
    plc.validate()?;

    let mesh = generator.generate(plc, opts)?;
    log::debug!(
        "create_mesh [{}]: {} 节点 -> {} 单元",
        generator.name(),
        plc.node_count(),
        mesh.cell_count()
    );
    Ok(mesh)
}

// ============================================================================
// 耳切法生成器
// ============================================================================

/// 耳切法网格生成器
///
/// PLC 的边必须构成单个闭合链（每个节点恰好连接两条边）；
/// 没有边时以节点凸包为边界。不在边界上的节点被忽略。
/// 单元标记取第一个区域标记（无区域标记时为 0）。
#[derive(Debug, Clone, Copy, Default)]
pub struct EarClipGenerator;

impl EarClipGenerator {
    /// 创建生成器
    pub fn new() -> Self {
        Self
    }
}

impl MeshGenerator for EarClipGenerator {
    fn name(&self) -> &str {
        "ear_clip"
    }

    fn generate(&self, plc: &Plc, opts: &GeneratorOptions) -> GmResult<Mesh> {
        if opts.area > 0.0 || opts.smooth_iterations > 0 {
            log::warn!("EarClipGenerator 不支持面积约束与平滑, 已忽略");
        }

        let (ring, markers) = if plc.edge_count() == 0 {
            let hull = convex_hull(plc);
            let n = hull.len();
            (hull, vec![MARKER_BOUND_HOMOGEN_NEUMANN; n])
        } else {
            boundary_ring(plc)?
        };
        if ring.len() < 3 {
            return Err(GmError::invalid_input(format!(
                "边界链至少需要 3 个节点, 实际 {}",
                ring.len()
            )));
        }
        let dropped = plc.node_count() - ring.len();
        if dropped > 0 {
            log::warn!("EarClipGenerator 忽略 {} 个不在边界上的节点", dropped);
        }

        let vertices: Vec<Point2D> = ring
            .iter()
            .map(|&id| plc.nodes()[id].pos.xy())
            .collect();
        let ccw = signed_area(&vertices) > 0.0;
        let triangles = ear_clipping(&vertices);
        if triangles.len() != vertices.len() - 2 {
            return Err(MeshError::invalid_topology(
                "ear_clipping",
                "边界自相交或退化, 无法完成剖分",
            )
            .into());
        }

        let cell_marker = plc.regions().first().map_or(0, |r| r.marker);
        let mut mesh = Mesh::new_2d();
        for &id in &ring {
            let node = plc.nodes()[id];
            mesh.create_node(Point3D::new(node.pos.x, node.pos.y, 0.0), node.marker);
        }
        for tri in &triangles {
            mesh.create_cell(tri.to_vec(), cell_marker)?;
        }
        let n = ring.len();
        for i in 0..n {
            let (a, b) = (i, (i + 1) % n);
            let edge = if ccw { vec![a, b] } else { vec![b, a] };
            mesh.create_boundary(edge, markers[i])?;
        }
        Ok(mesh)
    }
}

/// 从 PLC 的边提取单个闭合链，返回节点序列与对应边（i → i+1）的标记
fn boundary_ring(plc: &Plc) -> GmResult<(Vec<usize>, Vec<i32>)> {
    let mut adjacency: HashMap<usize, Vec<(usize, i32)>> = HashMap::new();
    for edge in plc.edges() {
        let [a, b] = edge.nodes;
        adjacency.entry(a).or_default().push((b, edge.marker));
        adjacency.entry(b).or_default().push((a, edge.marker));
    }
    if let Some((&id, nbrs)) = adjacency.iter().find(|(_, v)| v.len() != 2) {
        return Err(GmError::invalid_input(format!(
            "EarClipGenerator 只支持单个闭合边界链: 节点 {} 连接 {} 条边",
            id,
            nbrs.len()
        )));
    }

    let start = plc.edges()[0].nodes[0];
    let mut ring = vec![start];
    let mut markers = Vec::with_capacity(adjacency.len());
    let (mut prev, mut current) = (usize::MAX, start);
    loop {
        let nbrs = &adjacency[&current];
        let &(next, marker) = if nbrs[0].0 != prev { &nbrs[0] } else { &nbrs[1] };
        markers.push(marker);
        if next == start {
            break;
        }
        ring.push(next);
        prev = current;
        current = next;
    }
    if ring.len() != adjacency.len() {
        return Err(GmError::invalid_input(format!(
            "PLC 的边构成 {} 个节点的多个环, 只支持单个闭合链",
            adjacency.len()
        )));
    }
    Ok((ring, markers))
}

/// 节点凸包（逆时针，单调链算法）
fn convex_hull(plc: &Plc) -> Vec<usize> {
    let mut ids: Vec<usize> = (0..plc.node_count()).collect();
    let pos = |id: usize| plc.nodes()[id].pos.xy();
    ids.sort_by(|&a, &b| {
        let (pa, pb) = (pos(a), pos(b));
        pa.x.total_cmp(&pb.x).then(pa.y.total_cmp(&pb.y))
    });
    ids.dedup_by(|a, b| pos(*a) == pos(*b));
    if ids.len() < 3 {
        return ids;
    }

    let turn = |o: usize, a: usize, b: usize| (pos(a) - pos(o)).cross(&(pos(b) - pos(o)));
    let mut hull: Vec<usize> = Vec::with_capacity(2 * ids.len());
    for pass in [ids.clone(), ids.iter().rev().copied().collect()] {
        let base = hull.len();
        for id in pass {
            while hull.len() >= base + 2 && turn(hull[hull.len() - 2], hull[hull.len() - 1], id) <= 0.0 {
                hull.pop();
            }
            hull.push(id);
        }
        hull.pop();
    }
    hull
}

fn signed_area(vertices: &[Point2D]) -> f64 {
    let n = vertices.len();
    0.5 * (0..n)
        .map(|i| vertices[i].cross(&vertices[(i + 1) % n]))
        .sum::<f64>()
}

/// 耳切法，返回逆时针三角形（顶点下标）
fn ear_clipping(vertices: &[Point2D]) -> Vec<[usize; 3]> {
    let n = vertices.len();
    let mut triangles = Vec::with_capacity(n.saturating_sub(2));
    let mut remaining: Vec<usize> = (0..n).collect();
    if signed_area(vertices) < 0.0 {
        remaining.reverse();
    }

    let max_iterations = n * n;
    let mut iterations = 0;
    while remaining.len() > 3 && iterations < max_iterations {
        iterations += 1;
        let len = remaining.len();
        let ear = (0..len).find(|&i| {
            let prev = remaining[(i + len - 1) % len];
            let next = remaining[(i + 1) % len];
            is_ear(vertices, &remaining, prev, remaining[i], next)
        });
        match ear {
            Some(i) => {
                let prev = remaining[(i + len - 1) % len];
                let next = remaining[(i + 1) % len];
                triangles.push([prev, remaining[i], next]);
                remaining.remove(i);
            }
            None => break,
        }
    }
    if remaining.len() == 3 {
        triangles.push([remaining[0], remaining[1], remaining[2]]);
    }
    triangles
}

fn is_ear(vertices: &[Point2D], remaining: &[usize], prev: usize, curr: usize, next: usize) -> bool {
    let (a, b, c) = (vertices[prev], vertices[curr], vertices[next]);
    if (b - a).cross(&(c - a)) <= 0.0 {
        return false;
    }
    !remaining
        .iter()
        .filter(|&&i| i != prev && i != curr && i != next)
        .any(|&i| point_in_triangle(vertices[i], a, b, c))
}

/// 点在三角形内或边上
fn point_in_triangle(p: Point2D, a: Point2D, b: Point2D, c: Point2D) -> bool {
    let d1 = (a - p).cross(&(b - p));
    let d2 = (b - p).cross(&(c - p));
    let d3 = (c - p).cross(&(a - p));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{create_circle_plc, create_para_mesh_plc, ParaMeshOptions};
    use gm_geo::Orientation;

    fn l_shape() -> Plc {
        let mut plc = Plc::new_2d();
        let pts = [(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)];
        let ids: Vec<usize> = pts
            .iter()
            .map(|&(x, y)| plc.create_node(Point3D::new(x, y, 0.0), 0))
            .collect();
        for i in 0..ids.len() {
            plc.create_edge(ids[i], ids[(i + 1) % ids.len()], 1).unwrap();
        }
        plc.add_region_marker(Point3D::new(0.5, 0.5, 0.0), 2, 0.0);
        plc
    }

    fn total_area(mesh: &Mesh) -> f64 {
        mesh.cells()
            .iter()
            .map(|c| {
                let v: Vec<Point2D> = c.nodes.iter().map(|&i| mesh.node_pos(i).xy()).collect();
                signed_area(&v)
            })
            .sum()
    }

    #[test]
    fn test_ear_clip_concave_polygon() {
        let mesh = create_mesh(MeshInput::Plc(&l_shape()), &EarClipGenerator, &GeneratorOptions::default())
            .unwrap();
        assert_eq!(mesh.cell_count(), 4);
        assert!((total_area(&mesh) - 3.0).abs() < 1e-12);
        assert!(mesh.cells().iter().all(|c| c.marker == 2));
        assert!(mesh.check_closed_boundary().is_ok());
    }

    #[test]
    fn test_clockwise_circle() {
        let plc = create_circle_plc(Point2D::ZERO, 1.0, 12, 4, Orientation::Clockwise).unwrap();
        let mesh = create_mesh(MeshInput::Plc(&plc), &EarClipGenerator, &GeneratorOptions::default())
            .unwrap();
        assert_eq!(mesh.cell_count(), 10);
        assert!(total_area(&mesh) > 0.0);
        assert!(mesh.check_closed_boundary().is_ok());
        assert!(mesh.boundaries().iter().all(|b| b.marker == 4));
    }

    #[test]
    fn test_points_use_convex_hull() {
        let pts = [
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(0.5, 0.2),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ];
        let mesh = create_mesh(MeshInput::Points(&pts), &EarClipGenerator, &GeneratorOptions::default())
            .unwrap();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.cell_count(), 2);
        assert!((total_area(&mesh) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_multi_region_and_3d() {
        let plc = create_para_mesh_plc(
            &[Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 0.0, 0.0), Point3D::new(2.0, 0.0, 0.0)],
            &ParaMeshOptions::default(),
        )
        .unwrap();
        assert!(create_mesh(MeshInput::Plc(&plc), &EarClipGenerator, &GeneratorOptions::default()).is_err());

        let plc3 = Plc::new(3).unwrap();
        assert!(matches!(
            create_mesh(MeshInput::Plc(&plc3), &EarClipGenerator, &GeneratorOptions::default()),
            Err(GmError::NotImplemented { .. })
        ));
        assert!(matches!(
            create_mesh(MeshInput::Points(&[]), &EarClipGenerator, &GeneratorOptions::default()),
            Err(GmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_plc_list_is_merged() {
        let a = l_shape();
        let list = vec![a.clone()];
        let mesh = create_mesh(MeshInput::Plcs(&list), &EarClipGenerator, &GeneratorOptions::default())
            .unwrap();
        assert_eq!(mesh.node_count(), a.node_count());
    }
}
