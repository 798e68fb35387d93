// crates/gm_physics/src/gravimetry/line_integral.rs

//! Won & Bevis (1987) 二维线积分核
//!
//! 对二维多边形的一条边计算重力场贡献。两个端点已平移到以测点为原点的坐标系，
//! `Point2D::y` 表示竖直坐标 z。
//!
//! 返回值：
//! - `field = (Fx, 0, Fz)`，即 -∇u 的分量
//! - `gradient = (∂Fz/∂x, 0, ∂Fz/∂z)`
//!
//! # 退化情形
//!
//! - 任一端点与测点重合：零贡献
//! - 边的延长线经过测点（`x1·z2 == x2·z1`）：零贡献
//! - 近竖直边（`|x2 - x1| < vertical_edge`）：使用闭式极限，避免 `z21/x21` 溢出

use super::response::FieldSample;
use gm_foundation::float::sign;
use gm_foundation::tolerance::GeometryTolerance;
use gm_geo::Point2D;
use std::f64::consts::PI;

/// 使用默认容差的线积分
#[inline]
pub fn line_integral_won_bevis(p1: Point2D, p2: Point2D) -> FieldSample {
    line_integral_won_bevis_with(p1, p2, &GeometryTolerance::default())
}

/// 线积分核，竖直边判据取自 `tol.vertical_edge`
pub fn line_integral_won_bevis_with(
    p1: Point2D,
    p2: Point2D,
    tol: &GeometryTolerance,
) -> FieldSample {
    let (x1, z1) = (p1.x, p1.y);
    let (x2, z2) = (p2.x, p2.y);

    if (x1 == 0.0 && z1 == 0.0) || (x2 == 0.0 && z2 == 0.0) {
        return FieldSample::ZERO;
    }
    let xz12 = x1 * z2 - x2 * z1;
    if xz12 == 0.0 {
        return FieldSample::ZERO;
    }

    let x21 = x2 - x1;
    let z21 = z2 - z1;
    let x21s = x21 * x21;
    let z21s = z21 * z21;
    let r21s = x21s + z21s;

    let r1s = x1 * x1 + z1 * z1;
    let r2s = x2 * x2 + z2 * z2;
    let rln = (r2s.sqrt() / r1s.sqrt()).ln();

    let p = (xz12 / r21s) * ((x1 * x21 - z1 * z21) / r1s - (x2 * x21 - z2 * z21) / r2s);
    let q = (xz12 / r21s) * ((x1 * z21 + z1 * x21) / r1s - (x2 * z21 + z2 * x21) / r2s);

    let th12 = angle_difference(x1, z1, x2, z2, xz12);

    let (fx, fz, fzx, fzz) = if tol.is_vertical(x21) {
        (-x1 * th12, x1 * rln, q - z21s / r21s * rln, -p)
    } else {
        let b = z21 / x21;
        let a = (x21 * xz12) / r21s;
        let f = (th12 + b * rln) / r21s;
        (
            a * (-th12 * b + rln),
            a * (th12 + b * rln),
            q - x21 * z21 * f,
            -p + x21s * f,
        )
    };

    FieldSample::new([fx, 0.0, fz], [fzx, 0.0, fzz])
}

/// 端点方位角差 θ1 - θ2
///
/// 边跨越 z = 0 时 atan2 的分支可能使差值偏离 2π。修正后差值的符号与
/// 叉积一致：`x1·z2 < x2·z1` 时为正，`x1·z2 > x2·z1` 时为负。
fn angle_difference(x1: f64, z1: f64, x2: f64, z2: f64, xz12: f64) -> f64 {
    let mut th12 = z1.atan2(x1) - z2.atan2(x2);
    if sign(z1) != sign(z2) {
        if xz12 < 0.0 && th12 < 0.0 {
            th12 += 2.0 * PI;
        } else if xz12 > 0.0 && th12 > 0.0 {
            th12 -= 2.0 * PI;
        }
    }
    th12
}
