// crates/gm_mesh/src/generation.rs

//! 结构化网格生成与加密
//!
//! - [`create_grid`]: 由两组坐标生成四边形网格
//! - [`create_para_mesh_2d_grid`]: 剖面参数域的规则网格
//! - [`refine_quad_to_tri`]: 四边形网格剖分为三角形网格
//!
//! # 使用示例
//!
//! ```rust
//! use gm_mesh::generation::{create_grid, refine_quad_to_tri, QuadSplit};
//!
//! let grid = create_grid(&[0.0, 1.0, 2.0], &[0.0, 1.0]).unwrap();
//! assert_eq!(grid.cell_count(), 2);
//!
//! let tri = refine_quad_to_tri(&grid, QuadSplit::Four).unwrap();
//! assert_eq!(tri.cell_count(), 8);
//! ```

use crate::builder::{grange, increasing_range};
use crate::error::MeshError;
use crate::markers::{MARKER_PARA_EDGE, REGION_PARAMETER};
use crate::mesh::Mesh;
use gm_foundation::error::{GmError, GmResult};
use gm_geo::Point3D;
use serde::{Deserialize, Serialize};

fn check_monotonic(name: &'static str, values: &[f64]) -> GmResult<f64> {
    if values.len() < 2 {
        return Err(GmError::invalid_input(format!(
            "{name} 至少需要 2 个坐标, 实际 {}",
            values.len()
        )));
    }
    let dir = (values[1] - values[0]).signum();
    let ok = values.iter().all(|v| v.is_finite())
        && values.windows(2).all(|w| (w[1] - w[0]) * dir > 0.0);
    if !ok {
        return Err(GmError::invalid_input(format!("{name} 坐标必须严格单调")));
    }
    Ok(dir)
}

/// 由坐标序列生成 2D 四边形网格
///
/// 节点按行主序排列（x 变化最快）。单元节点逆时针排列，
/// 外边界以逆时针方向生成、标记为 1。
///
/// # 错误
/// 任一坐标序列少于 2 个值或不严格单调
pub fn create_grid(x: &[f64], y: &[f64]) -> GmResult<Mesh> {
    let sx = check_monotonic("x", x)?;
    let sy = check_monotonic("y", y)?;
    let ccw = sx * sy > 0.0;

    let nx = x.len() - 1;
    let ny = y.len() - 1;
    let idx = |i: usize, j: usize| j * (nx + 1) + i;

    let mut mesh = Mesh::new_2d();
    for &yj in y {
        for &xi in x {
            mesh.create_node(Point3D::new(xi, yj, 0.0), 0);
        }
    }

    for j in 0..ny {
        for i in 0..nx {
            let quad = [idx(i, j), idx(i + 1, j), idx(i + 1, j + 1), idx(i, j + 1)];
            let nodes = if ccw {
                quad.to_vec()
            } else {
                vec![quad[0], quad[3], quad[2], quad[1]]
            };
            mesh.create_cell(nodes, 0)?;
        }
    }

    // 外边界：下 → 右 → 上 → 左
    let mut ring = Vec::with_capacity(2 * (nx + ny));
    ring.extend((0..nx).map(|i| idx(i, 0)));
    ring.extend((0..ny).map(|j| idx(nx, j)));
    ring.extend((1..=nx).rev().map(|i| idx(i, ny)));
    ring.extend((1..=ny).rev().map(|j| idx(0, j)));
    let n = ring.len();
    for k in 0..n {
        let (a, b) = (ring[k], ring[(k + 1) % n]);
        let edge = if ccw { vec![a, b] } else { vec![b, a] };
        mesh.create_boundary(edge, MARKER_PARA_EDGE)?;
    }

    log::debug!(
        "create_grid: {}x{} -> {} 单元, {} 边界",
        nx,
        ny,
        mesh.cell_count(),
        mesh.boundary_count()
    );
    Ok(mesh)
}

/// 参数域规则网格选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParaGridOptions {
    /// 水平网格间距（测点间距的倍数），0 视为 1
    pub para_dx: f64,
    /// 首层厚度（测点间距的倍数），0 视为 1
    pub para_dz: f64,
    /// 参数域深度 [m]，0 表示 0.4 倍参数域宽度
    pub para_depth: f64,
    /// 深度方向节点层数
    pub n_layers: usize,
    /// 参数域水平边距（测点间距的倍数）
    pub para_boundary: f64,
}

impl Default for ParaGridOptions {
    fn default() -> Self {
        Self {
            para_dx: 1.0,
            para_dz: 1.0,
            para_depth: 0.0,
            n_layers: 11,
            para_boundary: 2.0,
        }
    }
}

impl ParaGridOptions {
    /// 校验选项
    pub fn validate(&self) -> GmResult<()> {
        GmError::check_range("para_dx", self.para_dx, 0.0, f64::MAX)?;
        GmError::check_range("para_dz", self.para_dz, 0.0, f64::MAX)?;
        GmError::check_range("para_depth", self.para_depth, 0.0, f64::MAX)?;
        GmError::check_range("para_boundary", self.para_boundary, 0.0, f64::MAX)?;
        if self.n_layers < 2 {
            return Err(GmError::invalid_input(format!(
                "n_layers 至少为 2, 实际 {}",
                self.n_layers
            )));
        }
        Ok(())
    }
}

/// 生成剖面参数域规则网格
///
/// 水平方向从 `min(x) - para_boundary·a` 到 `max(x) + para_boundary·a`，
/// 步长 `para_dx·a`（a 为前两个测点的水平间距）；竖直方向由地表向下，
/// 层厚从 `para_dz·a` 线性递增至总深度 `para_depth`。所有单元标记为参数区域 2。
pub fn create_para_mesh_2d_grid(sensors: &[Point3D], opts: &ParaGridOptions) -> GmResult<Mesh> {
    opts.validate()?;
    if sensors.len() < 2 {
        return Err(GmError::invalid_input(format!(
            "参数网格至少需要 2 个测点, 实际 {}",
            sensors.len()
        )));
    }
    let spacing = (sensors[1].x - sensors[0].x).abs();
    if spacing == 0.0 {
        return Err(GmError::invalid_input("前两个测点水平间距为 0"));
    }

    let (lo, hi) = sensors
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.x), hi.max(s.x))
        });
    let xmin = lo - opts.para_boundary * spacing;
    let xmax = hi + opts.para_boundary * spacing;

    let para_dx = if opts.para_dx == 0.0 { 1.0 } else { opts.para_dx };
    let para_dz = if opts.para_dz == 0.0 { 1.0 } else { opts.para_dz };
    let para_depth = if opts.para_depth == 0.0 {
        0.4 * (xmax - xmin)
    } else {
        opts.para_depth
    };

    let x = grange(xmin, xmax, spacing * para_dx)?;
    let y: Vec<f64> = increasing_range(spacing * para_dz, para_depth, opts.n_layers)?
        .into_iter()
        .map(|v| -v)
        .collect();

    let mut mesh = create_grid(&x, &y)?;
    for cell in mesh.cells_mut() {
        cell.marker = REGION_PARAMETER;
    }
    Ok(mesh)
}

/// 四边形剖分方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadSplit {
    /// 沿对角线 0-2 剖分为 2 个三角形
    Two,
    /// 以中心点剖分为 4 个三角形
    Four,
}

/// 将四边形网格剖分为三角形网格
///
/// 子单元继承父单元的标记与单元数据；保留标记非 0 的边界。
///
/// # 错误
/// 非 2D 网格或存在非四边形单元
pub fn refine_quad_to_tri(mesh: &Mesh, split: QuadSplit) -> GmResult<Mesh> {
    if mesh.dimension() != 2 {
        return Err(MeshError::dimension_mismatch("refine_quad_to_tri", 2, mesh.dimension()).into());
    }
    if let Some(i) = mesh.cells().iter().position(|c| c.nodes.len() != 4) {
        return Err(MeshError::invalid_topology(
            "refine_quad_to_tri",
            format!("单元 {} 不是四边形", i),
        )
        .into());
    }

    let mut out = Mesh::new_2d();
    for node in mesh.nodes() {
        out.create_node(node.pos, node.marker);
    }

    // 每个父单元的子单元数
    let children = match split {
        QuadSplit::Two => 2,
        QuadSplit::Four => 4,
    };
    for cell in mesh.cells() {
        let c = &cell.nodes;
        match split {
            QuadSplit::Two => {
                out.create_cell(vec![c[0], c[1], c[2]], cell.marker)?;
                out.create_cell(vec![c[0], c[2], c[3]], cell.marker)?;
            }
            QuadSplit::Four => {
                let center = out.create_node(mesh.cell_center(cell), 0);
                for i in 0..4 {
                    out.create_cell(vec![c[i], c[(i + 1) % 4], center], cell.marker)?;
                }
            }
        }
    }

    for boundary in mesh.active_boundaries() {
        out.create_boundary(boundary.nodes.clone(), boundary.marker)?;
    }

    for key in mesh.data().names() {
        if let Some(values) = mesh.data().get(key) {
            let expanded = values
                .iter()
                .flat_map(|&v| std::iter::repeat(v).take(children))
                .collect();
            out.set_cell_data(key, expanded)?;
        }
    }

    log::debug!(
        "refine_quad_to_tri: {} 四边形 -> {} 三角形",
        mesh.cell_count(),
        out.cell_count()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_area(mesh: &Mesh, nodes: &[usize]) -> f64 {
        let n = nodes.len();
        0.5 * (0..n)
            .map(|i| {
                let a = mesh.node_pos(nodes[i]);
                let b = mesh.node_pos(nodes[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
    }

    #[test]
    fn test_grid_counts_and_orientation() {
        let grid = create_grid(&[0.0, 1.0, 2.0, 3.0], &[0.0, -1.0, -3.0]).unwrap();
        assert_eq!(grid.node_count(), 12);
        assert_eq!(grid.cell_count(), 6);
        assert_eq!(grid.boundary_count(), 10);
        for cell in grid.cells() {
            assert!(signed_area(&grid, &cell.nodes) > 0.0);
        }
        assert!(grid.check_closed_boundary().is_ok());
        assert!(grid.boundaries().iter().all(|b| b.marker == 1));
    }

    #[test]
    fn test_grid_rejects_bad_axes() {
        assert!(create_grid(&[0.0], &[0.0, 1.0]).is_err());
        assert!(create_grid(&[0.0, 1.0, 1.0], &[0.0, 1.0]).is_err());
        assert!(create_grid(&[0.0, 2.0, 1.0], &[0.0, 1.0]).is_err());
    }

    #[test]
    fn test_refine_two_and_four() {
        let mut grid = create_grid(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).unwrap();
        grid.set_cell_data("rho", vec![1.0, 2.0, 3.0, 4.0]).unwrap();

        let two = refine_quad_to_tri(&grid, QuadSplit::Two).unwrap();
        assert_eq!(two.cell_count(), 8);
        assert_eq!(two.node_count(), 9);
        assert_eq!(two.data().get("rho").unwrap()[..4], [1.0, 1.0, 2.0, 2.0]);

        let four = refine_quad_to_tri(&grid, QuadSplit::Four).unwrap();
        assert_eq!(four.cell_count(), 16);
        assert_eq!(four.node_count(), 13);
        assert_eq!(four.boundary_count(), grid.boundary_count());
        for cell in four.cells() {
            assert!(signed_area(&four, &cell.nodes) > 0.0);
        }
    }

    #[test]
    fn test_refine_rejects_triangles() {
        let tri = refine_quad_to_tri(
            &create_grid(&[0.0, 1.0], &[0.0, 1.0]).unwrap(),
            QuadSplit::Two,
        )
        .unwrap();
        assert!(refine_quad_to_tri(&tri, QuadSplit::Two).is_err());
    }

    #[test]
    fn test_para_grid() {
        let sensors: Vec<Point3D> = (0..6).map(|i| Point3D::new(i as f64 * 2.0, 0.0, 0.0)).collect();
        let opts = ParaGridOptions {
            para_depth: 10.0,
            n_layers: 5,
            ..Default::default()
        };
        let mesh = create_para_mesh_2d_grid(&sensors, &opts).unwrap();
        // x: -4..14 步长 2 -> 10 个值; y: 5 层
        assert_eq!(mesh.node_count(), 50);
        assert_eq!(mesh.cell_count(), 36);
        assert!(mesh.cells().iter().all(|c| c.marker == REGION_PARAMETER));
        let bbox = mesh.bounding_box().unwrap();
        assert!((bbox.min.y + 10.0).abs() < 1e-12);
        assert_eq!(bbox.max.y, 0.0);
        assert!((bbox.min.x + 4.0).abs() < 1e-12);
    }
}
