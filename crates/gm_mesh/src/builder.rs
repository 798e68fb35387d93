// crates/gm_mesh/src/builder.rs

//! PLC 构建器
//!
//! 由测点位置构建交给网格生成器的 PLC：
//!
//! - [`create_para_mesh_plc`]: 剖面参数域 + 外部延拓区域
//! - [`create_coarse_poly`] / [`create_fine_poly`]: 平面测区的粗/细矩形 PLC
//! - [`create_circle_plc`]: 圆形 PLC
//!
//! 以及构建时常用的一维序列 [`grange`]、[`grange_n`]、[`increasing_range`]。

use crate::markers::{
    MARKER_BOUND_HOMOGEN_NEUMANN, MARKER_BOUND_MIXED, MARKER_NODE_SENSOR, MARKER_PARA_EDGE,
    REGION_BOUNDARY, REGION_PARAMETER,
};
use crate::plc::Plc;
use gm_foundation::error::{GmError, GmResult};
use gm_foundation::tolerance::GeometryTolerance;
use gm_geo::{build_circle, BoundingBox, Orientation, Point2D, Point3D};
use serde::{Deserialize, Serialize};

// ============================================================================
// 参数域 PLC
// ============================================================================

/// 参数域 PLC 选项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParaMeshOptions {
    /// 相邻测点间加密节点的相对间距（1 表示不加密）
    ///
    /// `>= 0.5` 在相邻测点中点插入一个节点；`< 0.5` 在每个测点两侧
    /// 按该比例各插入一个节点。
    pub para_dx: f64,
    /// 参数域深度 [m]，0 表示 0.4 倍测线长度
    pub para_depth: f64,
    /// 参数域水平边距（测点间距的倍数）
    pub para_boundary: f64,
    /// 参数域最大单元面积 [m²]，0 表示不约束
    pub para_max_cell_size: f64,
    /// 外部延拓宽度（测线长度的倍数），小于 0 时取 4
    pub boundary: f64,
    /// 外部区域最大单元面积 [m²]，0 表示不约束
    pub boundary_max_cell_size: f64,
    /// 测点间距 [m]，缺省为前两个测点的距离
    pub electrode_spacing: Option<f64>,
    /// 几何容差
    pub tolerance: GeometryTolerance,
}

impl Default for ParaMeshOptions {
    fn default() -> Self {
        Self {
            para_dx: 1.0,
            para_depth: 0.0,
            para_boundary: 2.0,
            para_max_cell_size: 0.0,
            boundary: -1.0,
            boundary_max_cell_size: 0.0,
            electrode_spacing: None,
            tolerance: GeometryTolerance::default(),
        }
    }
}

impl ParaMeshOptions {
    /// 校验选项
    pub fn validate(&self) -> GmResult<()> {
        GmError::check_range("para_dx", self.para_dx, f64::MIN_POSITIVE, f64::MAX)?;
        GmError::check_range("para_depth", self.para_depth, 0.0, f64::MAX)?;
        GmError::check_range("para_boundary", self.para_boundary, 0.0, f64::MAX)?;
        GmError::check_range("para_max_cell_size", self.para_max_cell_size, 0.0, f64::MAX)?;
        GmError::check_range(
            "boundary_max_cell_size",
            self.boundary_max_cell_size,
            0.0,
            f64::MAX,
        )?;
        GmError::check_finite("boundary", self.boundary)?;
        if let Some(spacing) = self.electrode_spacing {
            GmError::check_range("electrode_spacing", spacing, f64::MIN_POSITIVE, f64::MAX)?;
        }
        Ok(())
    }
}

/// 构建剖面反演参数域 PLC
///
/// 测点须位于地表、按 x 严格递增排列。竖直坐标默认取 y；
/// 若全部测点 |y| 小于 `depth_plane` 容差，则以 z 为竖直坐标。
///
/// 生成内容：
/// - 参数域角点 n1..n4（水平外扩 `para_boundary × 测点间距`），
///   边 n1-n2、n2-n3、n3-n4 标记 1，区域 2 标记点位于 n2 + (1e-3, 1e-3)
/// - 当 `|x 跨度| × boundary > para_boundary × 测点间距` 时生成外部区域：
///   角点 n11..n14，边 n1-n11、n14-n4 为 Neumann，其余三条为混合边界，
///   区域 1 标记点位于 n12 + (1e-3, 1e-3)
/// - 地表链 n1 → 测点（含加密节点）→ n4，边从末端向首端创建，标记 Neumann
///
/// # 错误
/// - 测点少于 2 个、未按 x 严格递增或间距为 0
/// - 选项非法
pub fn create_para_mesh_plc(sensors: &[Point3D], opts: &ParaMeshOptions) -> GmResult<Plc> {
    opts.validate()?;
    if sensors.len() < 2 {
        return Err(GmError::invalid_input(format!(
            "参数域至少需要 2 个测点, 实际 {}",
            sensors.len()
        )));
    }
    if let Some(i) = sensors.windows(2).position(|w| w[1].x <= w[0].x) {
        return Err(GmError::invalid_input(format!(
            "测点必须按 x 严格递增: 第 {} 与第 {} 个测点",
            i,
            i + 1
        )));
    }

    let spacing = opts
        .electrode_spacing
        .unwrap_or_else(|| sensors[0].distance(&sensors[1]));
    if !(spacing > 0.0) {
        return Err(GmError::invalid_input("测点间距必须大于 0"));
    }

    let tol = &opts.tolerance;
    let depth_is_z = sensors.iter().all(|s| tol.is_on_plane(s.y));
    // 剖面坐标 (x, 竖直)
    let surface: Vec<Point2D> = sensors
        .iter()
        .map(|s| Point2D::new(s.x, if depth_is_z { s.z } else { s.y }))
        .collect();

    let xmin = surface[0].x;
    let xmax = surface[surface.len() - 1].x;
    let para_bound = opts.para_boundary * spacing;
    let para_depth = if opts.para_depth == 0.0 {
        0.4 * (xmax - xmin)
    } else {
        opts.para_depth
    };
    let first_z = surface[0].y;
    let last_z = surface[surface.len() - 1].y;

    let mut plc = Plc::new_2d();
    let n1 = plc.create_node(Point3D::new(xmin - para_bound, first_z, 0.0), 0);
    let n2 = plc.create_node(Point3D::new(xmin - para_bound, first_z - para_depth, 0.0), 0);
    let n3 = plc.create_node(Point3D::new(xmax + para_bound, last_z - para_depth, 0.0), 0);
    let n4 = plc.create_node(Point3D::new(xmax + para_bound, last_z, 0.0), 0);

    let boundary = if opts.boundary < 0.0 { 4.0 } else { opts.boundary };
    let bound = (xmax - xmin).abs() * boundary;
    let offset = Point3D::new(tol.region_offset, tol.region_offset, 0.0);

    if bound > para_bound {
        let p1 = plc.node_pos(n1)?;
        let p4 = plc.node_pos(n4)?;
        let p11 = p1 - Point3D::new(bound, 0.0, 0.0);
        let p12 = p11 - Point3D::new(0.0, bound + para_depth, 0.0);
        let p14 = p4 + Point3D::new(bound, 0.0, 0.0);
        let p13 = p14 - Point3D::new(0.0, bound + para_depth, 0.0);
        let n11 = plc.create_node(p11, 0);
        let n12 = plc.create_node(p12, 0);
        let n14 = plc.create_node(p14, 0);
        let n13 = plc.create_node(p13, 0);

        plc.create_edge(n1, n11, MARKER_BOUND_HOMOGEN_NEUMANN)?;
        plc.create_edge(n11, n12, MARKER_BOUND_MIXED)?;
        plc.create_edge(n12, n13, MARKER_BOUND_MIXED)?;
        plc.create_edge(n13, n14, MARKER_BOUND_MIXED)?;
        plc.create_edge(n14, n4, MARKER_BOUND_HOMOGEN_NEUMANN)?;
        plc.add_region_marker(p12 + offset, REGION_BOUNDARY, opts.boundary_max_cell_size);
    } else {
        log::warn!(
            "外部延拓宽度 {:.3} 不大于参数域边距 {:.3}, 省略外部区域",
            bound,
            para_bound
        );
    }

    plc.create_edge(n1, n2, MARKER_PARA_EDGE)?;
    plc.create_edge(n2, n3, MARKER_PARA_EDGE)?;
    plc.create_edge(n3, n4, MARKER_PARA_EDGE)?;
    let p2 = plc.node_pos(n2)?;
    plc.add_region_marker(p2 + offset, REGION_PARAMETER, opts.para_max_cell_size);

    // 地表链
    let to3 = |p: Point2D| p.with_z(0.0);
    let dx = opts.para_dx;
    let last = surface.len() - 1;
    let mut chain = vec![n1];
    for (i, &e) in surface.iter().enumerate() {
        if dx >= 0.5 {
            chain.push(plc.create_node(to3(e), MARKER_NODE_SENSOR));
            if i < last {
                let mid = (e + surface[i + 1]) * 0.5;
                chain.push(plc.create_node(to3(mid), 0));
            }
        } else {
            if i > 0 {
                let prev = surface[i - 1];
                chain.push(plc.create_node(to3(e - (e - prev) * dx), 0));
            }
            chain.push(plc.create_node(to3(e), MARKER_NODE_SENSOR));
            if i < last {
                let next = surface[i + 1];
                chain.push(plc.create_node(to3(e + (next - e) * dx), 0));
            }
        }
    }
    chain.push(n4);

    for i in (1..chain.len()).rev() {
        plc.create_edge(chain[i], chain[i - 1], MARKER_BOUND_HOMOGEN_NEUMANN)?;
    }

    log::debug!(
        "create_para_mesh_plc: {} 测点 -> {} 节点, {} 边, {} 区域",
        sensors.len(),
        plc.node_count(),
        plc.edge_count(),
        plc.regions().len()
    );
    Ok(plc)
}

// ============================================================================
// 平面测区 PLC
// ============================================================================

const COARSE_CORNER_MARKERS: [i32; 4] = [1, 2, 3, 4];
const COARSE_EDGE_MARKERS: [i32; 4] = [12, 23, 34, 41];
const FINE_CORNER_MARKERS: [i32; 4] = [5, 6, 7, 8];
const FINE_EDGE_MARKERS: [i32; 4] = [56, 67, 78, 85];

fn data_bounds(points: &[Point3D]) -> GmResult<BoundingBox> {
    let bbox = BoundingBox::from_points(points)
        .ok_or_else(|| GmError::invalid_input("测区点集为空"))?;
    if !(bbox.max_horizontal_span() > 0.0) {
        return Err(GmError::invalid_input("测区点集水平跨度为 0"));
    }
    Ok(bbox)
}

/// 添加矩形框：四个角点和首尾相连的四条边
fn add_box(
    plc: &mut Plc,
    corners: [Point3D; 4],
    node_markers: [i32; 4],
    edge_markers: [i32; 4],
) -> GmResult<()> {
    let ids: Vec<usize> = corners
        .iter()
        .zip(node_markers)
        .map(|(&p, m)| plc.create_node(p, m))
        .collect();
    for i in 0..4 {
        plc.create_edge(ids[i], ids[(i + 1) % 4], edge_markers[i])?;
    }
    Ok(())
}

fn box_corners(bbox: &BoundingBox, border: f64, z: f64) -> [Point3D; 4] {
    [
        Point3D::new(bbox.min.x - border, bbox.min.y - border, z),
        Point3D::new(bbox.max.x + border, bbox.min.y - border, z),
        Point3D::new(bbox.max.x + border, bbox.max.y + border, z),
        Point3D::new(bbox.min.x - border, bbox.max.y + border, z),
    ]
}

/// 构建平面测区的粗 PLC
///
/// 外框边距为 `max(x 跨度, y 跨度) × border_percent / 100`，位于最低高程处；
/// 角点标记 1..4，边标记 12/23/34/41；所有数据点作为自由节点加入。
pub fn create_coarse_poly(points: &[Point3D], border_percent: f64) -> GmResult<Plc> {
    GmError::check_range("border_percent", border_percent, 0.0, f64::MAX)?;
    let bbox = data_bounds(points)?;
    let border = bbox.max_horizontal_span() * border_percent / 100.0;

    let mut plc = Plc::new_2d();
    add_box(
        &mut plc,
        box_corners(&bbox, border, bbox.min.z),
        COARSE_CORNER_MARKERS,
        COARSE_EDGE_MARKERS,
    )?;
    for &p in points {
        plc.create_node(p, 0);
    }
    Ok(plc)
}

/// 构建平面测区的细 PLC
///
/// 复制粗 PLC 的四个角点（标记 1..4）及其外框，内框边距为
/// `max(x 跨度, y 跨度) × para_percent / 100`，角点标记 5..8，边标记 56/67/78/85；
/// 测点作为自由节点加入。
///
/// # 错误
/// 粗 PLC 缺少任一角点标记
pub fn create_fine_poly(coarse: &Plc, points: &[Point3D], para_percent: f64) -> GmResult<Plc> {
    GmError::check_range("para_percent", para_percent, 0.0, f64::MAX)?;
    let mut outer = [Point3D::ZERO; 4];
    for (slot, marker) in outer.iter_mut().zip(COARSE_CORNER_MARKERS) {
        let id = coarse.find_node_by_marker(marker).ok_or_else(|| {
            GmError::invalid_input(format!("粗 PLC 缺少标记为 {marker} 的角点"))
        })?;
        *slot = coarse.node_pos(id)?;
    }

    let bbox = data_bounds(points)?;
    let border = bbox.max_horizontal_span() * para_percent / 100.0;

    let mut plc = Plc::new_2d();
    add_box(&mut plc, outer, COARSE_CORNER_MARKERS, COARSE_EDGE_MARKERS)?;
    add_box(
        &mut plc,
        box_corners(&bbox, border, 0.0),
        FINE_CORNER_MARKERS,
        FINE_EDGE_MARKERS,
    )?;
    for &p in points {
        plc.create_node(p, 0);
    }
    Ok(plc)
}

/// 构建圆形 PLC
///
/// 节点由 [`build_circle`] 生成（首点位于圆顶），边首尾闭合并带 `marker`，
/// 圆心处添加区域标记 `marker`。
pub fn create_circle_plc(
    center: Point2D,
    radius: f64,
    segments: usize,
    marker: i32,
    direction: Orientation,
) -> GmResult<Plc> {
    let points = build_circle(center, radius, segments, direction)?;
    let mut plc = Plc::new_2d();
    let ids: Vec<usize> = points
        .iter()
        .map(|p| plc.create_node(p.with_z(0.0), 0))
        .collect();
    let n = ids.len();
    for i in 0..n {
        plc.create_edge(ids[i], ids[(i + 1) % n], marker)?;
    }
    plc.add_region_marker(center.with_z(0.0), marker, 0.0);
    Ok(plc)
}

// ============================================================================
// 一维序列
// ============================================================================

/// 从 `start` 以步长 `step` 填充到 `end`（含端点，若整除）
///
/// 步长符号自动与区间方向一致。
///
/// ```
/// use gm_mesh::builder::grange;
/// assert_eq!(grange(0.0, 2.0, 0.5).unwrap(), vec![0.0, 0.5, 1.0, 1.5, 2.0]);
/// assert_eq!(grange(2.0, 0.0, 1.0).unwrap(), vec![2.0, 1.0, 0.0]);
/// ```
pub fn grange(start: f64, end: f64, step: f64) -> GmResult<Vec<f64>> {
    if step == 0.0 || !step.is_finite() {
        return Err(GmError::invalid_input(format!("grange 步长非法: {step}")));
    }
    GmError::check_finite("start", start)?;
    GmError::check_finite("end", end)?;
    let d = if (end - start) * step < 0.0 { -step } else { step };
    // 1e-9 吸收 (end - start) / d 的舍入误差
    let count = (((end - start) / d).abs() + 1e-9).floor() as usize + 1;
    Ok((0..count).map(|i| start + i as f64 * d).collect())
}

/// `start` 到 `end` 的 `n` 个等距值（含两端）
pub fn grange_n(start: f64, end: f64, n: usize) -> GmResult<Vec<f64>> {
    if n < 2 {
        return Err(GmError::invalid_input(format!("grange_n 至少需要 2 个值, 实际 {n}")));
    }
    let d = (end - start) / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start + i as f64 * d).collect();
    values[n - 1] = end;
    Ok(values)
}

/// `start` 到 `end` 的 `n` 个对数等距值（含两端）
///
/// 相邻值之比恒定；`start` 与 `end` 须同号且非零。
///
/// ```
/// use gm_mesh::builder::grange_log;
/// let v = grange_log(1.0, 1000.0, 4).unwrap();
/// assert!((v[1] - 10.0).abs() < 1e-12);
/// assert_eq!(v[3], 1000.0);
/// ```
pub fn grange_log(start: f64, end: f64, n: usize) -> GmResult<Vec<f64>> {
    if n < 2 {
        return Err(GmError::invalid_input(format!("grange_log 至少需要 2 个值, 实际 {n}")));
    }
    if !(start * end > 0.0) || !start.is_finite() || !end.is_finite() {
        return Err(GmError::invalid_input(format!(
            "grange_log 端点必须同号且非零: start={start}, end={end}"
        )));
    }
    let ratio = (end / start).ln() / (n - 1) as f64;
    let mut values: Vec<f64> = (0..n).map(|i| start * (ratio * i as f64).exp()).collect();
    values[n - 1] = end;
    Ok(values)
}

/// 间距线性递增的序列
///
/// 返回 n 个值：`y[0] = 0`，第 i 段间距 `first + (i - 1)·d`，
/// d 使最后一个值恰为 `last`。`first` 与 `last` 须同号。
///
/// ```
/// use gm_mesh::builder::increasing_range;
/// let y = increasing_range(1.0, 10.0, 5).unwrap();
/// assert_eq!(y.len(), 5);
/// assert_eq!(y[1], 1.0);
/// assert!((y[4] - 10.0).abs() < 1e-12);
/// ```
pub fn increasing_range(first: f64, last: f64, n: usize) -> GmResult<Vec<f64>> {
    if n < 2 {
        return Err(GmError::invalid_input(format!(
            "increasing_range 至少需要 2 个值, 实际 {n}"
        )));
    }
    if first == 0.0 || first * last <= 0.0 {
        return Err(GmError::invalid_input(format!(
            "increasing_range 首段与终值必须同号且非零: first={first}, last={last}"
        )));
    }
    if n == 2 {
        return Ok(vec![0.0, last]);
    }
    let segments = (n - 1) as f64;
    // 间距增量的累计权重 0 + 1 + ... + (n-2)
    let weight = segments * (segments - 1.0) / 2.0;
    let d = (last - first * segments) / weight;

    let mut y = Vec::with_capacity(n);
    y.push(0.0);
    for i in 1..n {
        let prev = y[i - 1];
        y.push(prev + first + (i - 1) as f64 * d);
    }
    y[n - 1] = last;
    Ok(y)
}
