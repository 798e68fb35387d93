// crates/gm_physics/src/gravimetry/magnetics.rs

//! 泊松关系与磁异常
//!
//! 均匀磁化体的磁位与同形状单位密度体的引力位满足泊松关系，
//! 因此竖直磁异常可由 gz 梯度沿磁化方向的投影得到。

use super::bodies::{AnalyticBody, HorizontalCylinder, Sphere};
use super::constants::PhysicalConstants;
use gm_foundation::error::GmResult;
use gm_geo::{Point2D, Point3D};

/// 泊松-厄特沃什关系 μ0 / (4πG) · dg
#[inline]
pub fn poisson_eotvos(dg: f64, constants: &PhysicalConstants) -> f64 {
    constants.poisson_factor() * dg
}

/// 感应磁化强度 M = χ · T0 / μ0 [A/m]
///
/// `inducing_field` 为外部磁场 T0 [T]。
pub fn induced_magnetization(
    susceptibility: f64,
    inducing_field: Point3D,
    constants: &PhysicalConstants,
) -> Point3D {
    inducing_field.scale(susceptibility / constants.mu0)
}

/// 由总强度、倾角与偏角构造外部磁场向量
///
/// x 指北，y 指东，z 向上；倾角向下为正 [度]。
pub fn inducing_field(intensity: f64, inclination_deg: f64, declination_deg: f64) -> Point3D {
    let (inc, dec) = (inclination_deg.to_radians(), declination_deg.to_radians());
    Point3D::new(
        intensity * inc.cos() * dec.cos(),
        intensity * inc.cos() * dec.sin(),
        -intensity * inc.sin(),
    )
}

/// 均匀磁化球体的竖直磁异常
pub fn ba_z_sphere(
    points: &[Point3D],
    center: Point3D,
    radius: f64,
    magnetization: Point3D,
    constants: &PhysicalConstants,
) -> GmResult<Vec<f64>> {
    let unit = Sphere::new(center, radius, 1.0)?;
    let m = magnetization.to_array();
    Ok(unit
        .gz_gradient_batch(points, constants)?
        .iter()
        .map(|g| poisson_eotvos(dot(g, &m), constants))
        .collect())
}

/// 均匀磁化水平圆柱的竖直磁异常
///
/// `magnetization` 为剖面内的磁化分量 (Mx, Mz)。
pub fn ba_z_cylinder_horiz(
    points: &[Point2D],
    center: Point2D,
    radius: f64,
    magnetization: Point2D,
    constants: &PhysicalConstants,
) -> GmResult<Vec<f64>> {
    let unit = HorizontalCylinder::new(center, radius, 1.0)?;
    let m = [magnetization.x, magnetization.y];
    Ok(unit
        .gz_gradient_batch(points, constants)?
        .iter()
        .map(|g| poisson_eotvos(dot(g, &m), constants))
        .collect())
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
