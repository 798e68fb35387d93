// crates/gm_geo/src/polygon.rs

//! 2D 剖面多边形
//!
//! 多边形默认隐式闭合（最后一点连回第一点）。显式闭合（首尾重复）的
//! 输入按开放折线处理，边数为 N-1，与“首点重复即视为已闭合”的历史约定一致。
//!
//! 顶点绕向决定异常符号，调用方必须保证绕向一致；
//! 反转顶点顺序会使计算得到的场取反。

use crate::geometry::Point2D;
use gm_foundation::error::{GmError, GmResult};
use gm_foundation::tolerance::GeometryTolerance;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// 多边形绕向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// 逆时针（x 向右、竖直向上）
    #[default]
    CounterClockwise,
    /// 顺时针
    Clockwise,
}

/// 2D 多边形 / 折线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon2D {
    points: Vec<Point2D>,
    open: bool,
}

impl Polygon2D {
    /// 创建隐式闭合多边形
    ///
    /// # 错误
    /// - 少于 3 个顶点
    /// - 相邻顶点重合（含首尾）
    pub fn new(points: Vec<Point2D>) -> GmResult<Self> {
        if points.len() < 3 {
            return Err(GmError::invalid_input(format!(
                "闭合多边形至少需要 3 个顶点, 实际 {}",
                points.len()
            )));
        }
        Self::check_distinct(&points, true)?;
        Ok(Self {
            points,
            open: false,
        })
    }

    /// 创建开放折线（N-1 条边）
    pub fn open(points: Vec<Point2D>) -> GmResult<Self> {
        if points.len() < 2 {
            return Err(GmError::invalid_input(format!(
                "折线至少需要 2 个顶点, 实际 {}",
                points.len()
            )));
        }
        Self::check_distinct(&points, false)?;
        Ok(Self { points, open: true })
    }

    /// 从顶点序列创建，自动识别显式闭合
    ///
    /// 首尾距离小于 `tol.closing_point` 时视为已显式闭合，按开放折线处理；
    /// `force_open` 为真时总是按开放折线处理。
    pub fn from_points(
        points: Vec<Point2D>,
        force_open: bool,
        tol: &GeometryTolerance,
    ) -> GmResult<Self> {
        if force_open {
            return Self::open(points);
        }
        match (points.first(), points.last()) {
            (Some(first), Some(last))
                if points.len() > 1 && tol.is_closing(first.distance_to(last)) =>
            {
                Self::open(points)
            }
            _ => Self::new(points),
        }
    }

    fn check_distinct(points: &[Point2D], closed: bool) -> GmResult<()> {
        for (i, pair) in points.windows(2).enumerate() {
            if pair[0] == pair[1] {
                return Err(GmError::invalid_input(format!(
                    "相邻顶点 {} 和 {} 重合: ({}, {})",
                    i,
                    i + 1,
                    pair[0].x,
                    pair[0].y
                )));
            }
        }
        if closed && points.first() == points.last() {
            return Err(GmError::invalid_input("闭合多边形首尾顶点重合"));
        }
        Ok(())
    }

    /// 顶点
    #[inline]
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// 顶点数
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// 是否无顶点（构造保证不会发生）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// 是否为开放折线
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 边数：闭合 N，开放 N-1
    #[inline]
    pub fn edge_count(&self) -> usize {
        if self.open {
            self.points.len() - 1
        } else {
            self.points.len()
        }
    }

    /// 按顺序遍历边 (a, b)
    pub fn edges(&self) -> impl Iterator<Item = (Point2D, Point2D)> + '_ {
        let n = self.points.len();
        (0..self.edge_count()).map(move |j| (self.points[j], self.points[(j + 1) % n]))
    }

    /// 反转顶点顺序
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self {
            points,
            open: self.open,
        }
    }

    /// 平移
    #[must_use]
    pub fn translated(&self, offset: Point2D) -> Self {
        Self {
            points: self.points.iter().map(|p| *p + offset).collect(),
            open: self.open,
        }
    }

    /// 有符号面积（鞋带公式，逆时针为正）
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| self.points[i].cross(&self.points[(i + 1) % n]))
            .sum();
        0.5 * twice
    }

    /// 绕向
    pub fn orientation(&self) -> Orientation {
        if self.signed_area() >= 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }
}

/// 构建圆形多边形顶点
///
/// 第一个顶点位于圆顶 `(0, radius)`，随后按 `direction` 以等角步长排列。
/// 逆时针对应“向左”出发。
///
/// ```
/// use gm_geo::geometry::Point2D;
/// use gm_geo::polygon::{build_circle, Orientation};
///
/// let pts = build_circle(Point2D::new(0.0, -5.0), 1.0, 4, Orientation::CounterClockwise).unwrap();
/// assert_eq!(pts.len(), 4);
/// assert!((pts[1].x + 1.0).abs() < 1e-12);
/// ```
pub fn build_circle(
    center: Point2D,
    radius: f64,
    segments: usize,
    direction: Orientation,
) -> GmResult<Vec<Point2D>> {
    if segments < 3 {
        return Err(GmError::invalid_input(format!(
            "圆至少需要 3 段, 实际 {segments}"
        )));
    }
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(GmError::out_of_range("radius", radius, 0.0, f64::MAX));
    }

    let step = 2.0 * PI / segments as f64;
    let dir = match direction {
        Orientation::CounterClockwise => -1.0,
        Orientation::Clockwise => 1.0,
    };

    let points = (0..segments)
        .map(|i| {
            let phi = i as f64 * step;
            Point2D::new(
                center.x + (dir * phi).sin() * radius,
                center.y + phi.cos() * radius,
            )
        })
        .collect();
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point2D> {
        vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
            Point2D::new(1.0, 1.0),
            Point2D::new(0.0, 1.0),
        ]
    }

    #[test]
    fn test_closed_polygon_edges() {
        let poly = Polygon2D::new(square()).unwrap();
        assert_eq!(poly.edge_count(), 4);
        let edges: Vec<_> = poly.edges().collect();
        assert_eq!(edges[3], (Point2D::new(0.0, 1.0), Point2D::new(0.0, 0.0)));
        assert!((poly.signed_area() - 1.0).abs() < 1e-15);
        assert_eq!(poly.orientation(), Orientation::CounterClockwise);
        assert_eq!(poly.reversed().orientation(), Orientation::Clockwise);
    }

    #[test]
    fn test_explicit_closing_point_is_open_chain() {
        let mut pts = square();
        pts.push(Point2D::new(0.0, 0.0));
        let poly = Polygon2D::from_points(pts, false, &GeometryTolerance::default()).unwrap();
        assert!(poly.is_open());
        assert_eq!(poly.edge_count(), 4);
    }

    #[test]
    fn test_consecutive_duplicates_rejected() {
        let pts = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 1.0),
        ];
        assert!(Polygon2D::new(pts).is_err());
        assert!(Polygon2D::new(vec![Point2D::ZERO, Point2D::new(1.0, 0.0)]).is_err());
    }

    #[test]
    fn test_build_circle_directions() {
        let ccw = build_circle(Point2D::ZERO, 2.0, 12, Orientation::CounterClockwise).unwrap();
        let cw = build_circle(Point2D::ZERO, 2.0, 12, Orientation::Clockwise).unwrap();
        assert_eq!(ccw[0], Point2D::new(0.0, 2.0));
        assert!(ccw[1].x < 0.0);
        assert!(cw[1].x > 0.0);
        for p in &ccw {
            assert!((p.length() - 2.0).abs() < 1e-12);
        }
        let poly = Polygon2D::new(ccw).unwrap();
        assert_eq!(poly.orientation(), Orientation::CounterClockwise);
        assert!(build_circle(Point2D::ZERO, 1.0, 2, Orientation::Clockwise).is_err());
        assert!(build_circle(Point2D::ZERO, 0.0, 8, Orientation::Clockwise).is_err());
    }
}
