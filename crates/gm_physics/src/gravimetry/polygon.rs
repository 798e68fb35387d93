// crates/gm_physics/src/gravimetry/polygon.rs

//! 二维多边形体的重力与磁异常
//!
//! 多边形沿走向无限延伸（2.5D 剖面），坐标 `(x, z)`，z 向上为正。
//! 逆时针多边形在其上方测点给出正的 gz；反转顶点顺序结果取反。

use super::batch::evaluate_points;
use super::constants::PhysicalConstants;
use super::line_integral::line_integral_won_bevis_with;
use super::magnetics::poisson_eotvos;
use super::options::ForwardOptions;
use super::response::{FieldSample, GravityResponse};
use gm_foundation::error::{GmError, GmResult};
use gm_foundation::float::KahanVec3;
use gm_foundation::tolerance::GeometryTolerance;
use gm_geo::{Point2D, Point3D, Polygon2D};

/// 多边形在各测点处的重力场与 gz 梯度
///
/// 结果单位由 `constants` 决定（默认 mGal）。
pub fn calc_poly_gz(
    points: &[Point2D],
    polygon: &Polygon2D,
    density: f64,
    constants: &PhysicalConstants,
) -> GmResult<GravityResponse> {
    calc_poly_gz_with(
        points,
        polygon,
        density,
        &ForwardOptions::with_constants(*constants),
    )
}

/// 带完整选项的 [`calc_poly_gz`]
pub fn calc_poly_gz_with(
    points: &[Point2D],
    polygon: &Polygon2D,
    density: f64,
    options: &ForwardOptions,
) -> GmResult<GravityResponse> {
    GmError::check_finite("density", density)?;
    options.validate()?;

    let scale = density * 2.0 * -options.constants.g;
    let tol = &options.tolerance;
    let response = evaluate_points(points, options.parallel, |&p| {
        polygon_sample(p, polygon, tol).scaled(scale)
    })?;

    log::debug!(
        "calc_poly_gz: {} 测点, {} 条边, density = {}",
        points.len(),
        polygon.edge_count(),
        density
    );
    Ok(response)
}

/// 单个测点的未缩放贡献
fn polygon_sample(p: Point2D, polygon: &Polygon2D, tol: &GeometryTolerance) -> FieldSample {
    let mut field = KahanVec3::new();
    let mut gradient = KahanVec3::new();
    for (a, b) in polygon.edges() {
        let s = line_integral_won_bevis_with(a - p, b - p, tol);
        field.add([-s.field[0], -s.field[1], s.field[2]]);
        gradient.add(s.gradient.map(|v| -v));
    }
    FieldSample::new(field.value(), gradient.value())
}

/// 多边形体的竖直磁异常 Bz
///
/// 由泊松关系从单位密度的 gz 梯度得到：`Bz = μ0/(4πG) · (M · (-∇gz))`。
pub fn bz_poly(
    points: &[Point2D],
    polygon: &Polygon2D,
    magnetization: Point3D,
    constants: &PhysicalConstants,
) -> GmResult<Vec<f64>> {
    let response = calc_poly_gz(points, polygon, 1.0, constants)?;
    let m = magnetization.to_array();
    Ok(response
        .gradient
        .iter()
        .map(|g| {
            let dot: f64 = g.iter().zip(&m).map(|(gi, mi)| -gi * mi).sum();
            poisson_eotvos(dot, constants)
        })
        .collect())
}

/// 地表 (z = 0) 测线上的测点
pub fn surface_profile(x: &[f64]) -> Vec<Point2D> {
    x.iter().map(|&x| Point2D::new(x, 0.0)).collect()
}
