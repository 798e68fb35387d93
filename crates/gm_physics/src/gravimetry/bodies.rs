// crates/gm_physics/src/gravimetry/bodies.rs

//! 简单几何体的解析重力解
//!
//! - [`Sphere`]: 球体（3D）
//! - [`HorizontalCylinder`]: 水平无限长圆柱（剖面，`Point2D::y` 为竖直坐标）
//! - [`HalfPlate`]: 向 +x 无限延伸的水平薄半板（剖面）
//!
//! 竖直轴向上为正，位于测点下方的正密度体给出正的 gz。
//! 梯度对场源位置求导，与多边形/网格结果的约定一致。

use super::constants::PhysicalConstants;
use gm_foundation::error::{GmError, GmResult};
use gm_geo::{Point2D, Point3D};
use std::f64::consts::PI;

/// 解析几何体
///
/// 单点函数不做检查；批量函数在出现非有限值（测点与奇点重合）时返回错误。
pub trait AnalyticBody: Sync {
    /// 测点类型
    type Point: Copy + Sync;
    /// gz 梯度类型
    type Gradient: Copy + Send + AsRef<[f64]>;

    /// 竖直分量 gz
    fn gz(&self, r: Self::Point, constants: &PhysicalConstants) -> f64;

    /// gz 梯度
    fn gz_gradient(&self, r: Self::Point, constants: &PhysicalConstants) -> Self::Gradient;

    /// 批量 gz
    fn gz_batch(&self, points: &[Self::Point], constants: &PhysicalConstants) -> GmResult<Vec<f64>> {
        points
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                let v = self.gz(p, constants);
                GmError::check_finite(&format!("gz[{}]", i), v)?;
                Ok(v)
            })
            .collect()
    }

    /// 批量 gz 梯度
    fn gz_gradient_batch(
        &self,
        points: &[Self::Point],
        constants: &PhysicalConstants,
    ) -> GmResult<Vec<Self::Gradient>> {
        finite_rows(
            "gz_gradient",
            points.iter().map(|&p| self.gz_gradient(p, constants)),
        )
    }
}

fn check_body(size_name: &'static str, size: f64, density: f64) -> GmResult<()> {
    GmError::check_finite("density", density)?;
    if !(size > 0.0) || !size.is_finite() {
        return Err(GmError::out_of_range(size_name, size, 0.0, f64::MAX));
    }
    Ok(())
}

// ============================================================
// 球体
// ============================================================

/// 均匀球体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// 球心
    pub center: Point3D,
    /// 半径 [m]
    pub radius: f64,
    /// 密度（差）[kg/m³]
    pub density: f64,
}

impl Sphere {
    /// 创建球体
    ///
    /// # 错误
    /// 半径非正或密度非有限
    pub fn new(center: Point3D, radius: f64, density: f64) -> GmResult<Self> {
        check_body("radius", radius, density)?;
        Ok(Self {
            center,
            radius,
            density,
        })
    }

    /// 剩余质量 4/3·π·R³·ρ [kg]
    #[inline]
    pub fn mass(&self) -> f64 {
        4.0 / 3.0 * PI * self.radius.powi(3) * self.density
    }

    /// 引力位 u = -G·M / |r - c|
    pub fn potential(&self, r: Point3D, constants: &PhysicalConstants) -> f64 {
        -constants.g * self.mass() / (r - self.center).length()
    }

    /// 场向量，竖直分量取向下为正
    pub fn field(&self, r: Point3D, constants: &PhysicalConstants) -> [f64; 3] {
        let d = r - self.center;
        let dist = d.length();
        let scale = -constants.g * self.mass() / (dist * dist * dist);
        [d.x * scale, d.y * scale, -d.z * scale]
    }

    /// 批量场向量
    pub fn field_batch(
        &self,
        points: &[Point3D],
        constants: &PhysicalConstants,
    ) -> GmResult<Vec<[f64; 3]>> {
        finite_rows("field", points.iter().map(|&p| self.field(p, constants)))
    }
}

impl AnalyticBody for Sphere {
    type Point = Point3D;
    type Gradient = [f64; 3];

    fn gz(&self, r: Point3D, constants: &PhysicalConstants) -> f64 {
        self.field(r, constants)[2]
    }

    fn gz_gradient(&self, r: Point3D, constants: &PhysicalConstants) -> [f64; 3] {
        let d = r - self.center;
        let h = self.center.z - r.z;
        let scale = constants.g * self.mass() / d.length().powi(5);
        [
            scale * -3.0 * h * d.x,
            scale * -3.0 * h * d.y,
            scale * (2.0 * h * h - d.x * d.x - d.y * d.y),
        ]
    }
}

// ============================================================
// 水平圆柱
// ============================================================

/// 水平无限长圆柱（沿 y 方向延伸）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalCylinder {
    /// 截面圆心 (x, z)
    pub center: Point2D,
    /// 半径 [m]
    pub radius: f64,
    /// 密度（差）[kg/m³]
    pub density: f64,
}

impl HorizontalCylinder {
    /// 创建圆柱
    pub fn new(center: Point2D, radius: f64, density: f64) -> GmResult<Self> {
        check_body("radius", radius, density)?;
        Ok(Self {
            center,
            radius,
            density,
        })
    }

    /// 线质量系数 2π·R²·ρ
    #[inline]
    pub fn line_mass(&self) -> f64 {
        2.0 * PI * self.radius * self.radius * self.density
    }

    /// 对数引力位，以圆柱表面为零点
    pub fn potential(&self, r: Point2D, constants: &PhysicalConstants) -> f64 {
        let dist = r.distance_to(&self.center);
        let (g, rr) = (constants.g, self.radius);
        if dist > rr {
            -2.0 * PI * g * rr * rr * self.density * (dist / rr).ln()
        } else {
            -PI * g * self.density * (dist * dist - rr * rr)
        }
    }

    /// 场向量 (gx, gz)，gz 向下为正
    pub fn field(&self, r: Point2D, constants: &PhysicalConstants) -> [f64; 2] {
        let d = r - self.center;
        let dist2 = d.dot(&d);
        let scale = -constants.g * self.line_mass() / dist2;
        [d.x * scale, -d.y * scale]
    }

    /// 批量场向量
    pub fn field_batch(
        &self,
        points: &[Point2D],
        constants: &PhysicalConstants,
    ) -> GmResult<Vec<[f64; 2]>> {
        finite_rows("field", points.iter().map(|&p| self.field(p, constants)))
    }
}

impl AnalyticBody for HorizontalCylinder {
    type Point = Point2D;
    type Gradient = [f64; 2];

    fn gz(&self, r: Point2D, constants: &PhysicalConstants) -> f64 {
        self.field(r, constants)[1]
    }

    fn gz_gradient(&self, r: Point2D, constants: &PhysicalConstants) -> [f64; 2] {
        let dx = r.x - self.center.x;
        let h = self.center.y - r.y;
        let dist2 = dx * dx + h * h;
        let scale = constants.g * self.line_mass() / (dist2 * dist2);
        [scale * -2.0 * dx * h, scale * (h * h - dx * dx)]
    }
}

// ============================================================
// 水平半板
// ============================================================

/// 水平薄半板，边缘位于 `edge`，向 +x 无限延伸
///
/// 半无限薄板的引力位与水平分量发散，只提供 gz 及其梯度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfPlate {
    /// 板边缘 (x, z)
    pub edge: Point2D,
    /// 厚度 [m]
    pub thickness: f64,
    /// 密度（差）[kg/m³]
    pub density: f64,
}

impl HalfPlate {
    /// 创建半板
    pub fn new(edge: Point2D, thickness: f64, density: f64) -> GmResult<Self> {
        check_body("thickness", thickness, density)?;
        Ok(Self {
            edge,
            thickness,
            density,
        })
    }

    fn surface_density(&self, constants: &PhysicalConstants) -> f64 {
        constants.g * self.density * self.thickness
    }
}

impl AnalyticBody for HalfPlate {
    type Point = Point2D;
    type Gradient = [f64; 2];

    fn gz(&self, r: Point2D, constants: &PhysicalConstants) -> f64 {
        let d = r - self.edge;
        self.surface_density(constants) * (PI + 2.0 * d.x.atan2(d.y))
    }

    fn gz_gradient(&self, r: Point2D, constants: &PhysicalConstants) -> [f64; 2] {
        let d = r - self.edge;
        let scale = 2.0 * self.surface_density(constants) / d.dot(&d);
        [-scale * d.y, scale * d.x]
    }
}

fn finite_rows<T, I>(name: &str, rows: I) -> GmResult<Vec<T>>
where
    T: AsRef<[f64]>,
    I: Iterator<Item = T>,
{
    rows.enumerate()
        .map(|(i, row)| {
            for &v in row.as_ref() {
                GmError::check_finite(&format!("{}[{}]", name, i), v)?;
            }
            Ok(row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-4;

    fn c() -> PhysicalConstants {
        PhysicalConstants::default()
    }

    #[test]
    fn test_sphere_reference_values() {
        let s = Sphere::new(Point3D::new(1.0, 2.0, -10.0), 2.0, 500.0).unwrap();
        let r = Point3D::new(4.0, 6.0, 0.0);
        let f = s.field(r, &c());
        let expect = [-0.00024005129460690947, -0.0003200683928092127, 0.0008001709820230317];
        for k in 0..3 {
            assert!((f[k] - expect[k]).abs() < 1e-15);
        }
        let g = s.gz_gradient(r, &c());
        let expect = [5.7612310705658274e-05, 7.681641427421104e-05, 0.00011202393748322443];
        for k in 0..3 {
            assert!((g[k] - expect[k]).abs() < 1e-15);
        }
        assert!((s.potential(r, &c()) + 0.010002137275287896).abs() < 1e-15);
    }

    #[test]
    fn test_sphere_gradient_is_source_derivative() {
        let s = Sphere::new(Point3D::new(-2.0, 1.0, -6.0), 1.5, 300.0).unwrap();
        let r = Point3D::new(3.0, -1.0, 0.5);
        let g = s.gz_gradient(r, &c());
        for (k, axis) in [Point3D::UNIT_X, Point3D::UNIT_Y, Point3D::UNIT_Z]
            .into_iter()
            .enumerate()
        {
            let fd = (s.gz(r + axis * EPS, &c()) - s.gz(r - axis * EPS, &c())) / (2.0 * EPS);
            assert!((g[k] + fd).abs() < 1e-6 * g[k].abs().max(1e-6));
        }
    }

    #[test]
    fn test_cylinder_reference_and_gradient() {
        let cyl = HorizontalCylinder::new(Point2D::new(0.0, -5.0), 1.0, 1000.0).unwrap();
        let top = Point2D::new(0.0, 0.0);
        assert!((cyl.gz(top, &c()) - 0.008387047075435599).abs() < 1e-15);
        assert!((cyl.gz_gradient(top, &c())[1] - 0.0016774094150871198).abs() < 1e-15);
        assert!((cyl.field(Point2D::new(-20.0, 0.0), &c())[0] - 0.001973422841278964).abs() < 1e-15);

        let r = Point2D::new(3.0, 0.0);
        let g = cyl.gz_gradient(r, &c());
        let dx = Point2D::new(EPS, 0.0);
        let dz = Point2D::new(0.0, EPS);
        let fx = (cyl.gz(r + dx, &c()) - cyl.gz(r - dx, &c())) / (2.0 * EPS);
        let fz = (cyl.gz(r + dz, &c()) - cyl.gz(r - dz, &c())) / (2.0 * EPS);
        assert!((g[0] + fx).abs() < 1e-10);
        assert!((g[1] + fz).abs() < 1e-10);
    }

    #[test]
    fn test_cylinder_potential_continuous_at_surface() {
        let cyl = HorizontalCylinder::new(Point2D::ZERO, 2.0, 100.0).unwrap();
        let inside = cyl.potential(Point2D::new(2.0 - 1e-9, 0.0), &c());
        let outside = cyl.potential(Point2D::new(2.0 + 1e-9, 0.0), &c());
        assert!((inside - outside).abs() < 1e-10);
        assert!(cyl.potential(Point2D::ZERO, &c()) > 0.0);
    }

    #[test]
    fn test_half_plate_limits() {
        let plate = HalfPlate::new(Point2D::new(0.0, -2.0), 3.0, 200.0).unwrap();
        let full = 2.0 * PI * c().g * 200.0 * 3.0;
        assert!((plate.gz(Point2D::new(0.0, 0.0), &c()) - full / 2.0).abs() < 1e-15);
        assert!((plate.gz(Point2D::new(1e6, 0.0), &c()) - full).abs() < 1e-5 * full);
        assert!(plate.gz(Point2D::new(-1e6, 0.0), &c()).abs() < 1e-5 * full);

        let r = Point2D::new(1.5, 0.0);
        let g = plate.gz_gradient(r, &c());
        let dx = Point2D::new(EPS, 0.0);
        let fx = (plate.gz(r + dx, &c()) - plate.gz(r - dx, &c())) / (2.0 * EPS);
        assert!((g[0] + fx).abs() < 1e-10);
    }

    #[test]
    fn test_batch_rejects_singular_point() {
        let s = Sphere::new(Point3D::new(0.0, 0.0, -1.0), 0.5, 1.0).unwrap();
        let pts = [Point3D::ZERO, Point3D::new(0.0, 0.0, -1.0)];
        assert!(matches!(s.gz_batch(&pts, &c()), Err(GmError::NonFinite { .. })));
        assert_eq!(s.gz_batch(&pts[..1], &c()).unwrap().len(), 1);
        assert!(s.field_batch(&pts, &c()).is_err());
    }

    #[test]
    fn test_constructor_validation() {
        assert!(Sphere::new(Point3D::ZERO, 0.0, 1.0).is_err());
        assert!(HorizontalCylinder::new(Point2D::ZERO, -1.0, 1.0).is_err());
        assert!(HalfPlate::new(Point2D::ZERO, 1.0, f64::INFINITY).is_err());
    }
}
