// crates/gm_physics/src/gravimetry/solid_angle.rs

//! Singh & Guptasarma (2001) 多面体面核
//!
//! 对以测点为原点的平面多边形面计算立体角及重力场贡献。面的外法向由节点顺序
//! 决定（右手定则）。
//!
//! # 约定
//!
//! - 节点坐标已平移到以测点为原点
//! - `direction` 为磁化（或密度）方向向量，由调用方显式给出
//! - 法向退化的面、长度为零的边不产生贡献

use super::response::FieldSample;
use gm_foundation::float::{sign, KahanSum};
use gm_geo::{Face3D, Point3D};
use std::f64::consts::PI;

/// 面上顶点 p2 处的内角（按测点方向投影到单位球面后）
///
/// 返回 `(angle, perp)`：
/// - 测点位于面所在平面（`normal · p1 == 0`）时返回 `(0, 1)`
/// - `normal · p1 > 0` 时交换 p1 与 p3，保证从测点看去绕向一致
/// - `perp < 0` 时取优角 `2π - angle`
pub fn vertex_angle(p1: Point3D, p2: Point3D, p3: Point3D, normal: Point3D) -> (f64, f64) {
    let inout = sign(normal.dot(&p1));
    let (p1, p3) = if inout > 0.0 {
        (p3, p1)
    } else if inout < 0.0 {
        (p1, p3)
    } else {
        return (0.0, 1.0);
    };

    // n1 = p2 × p1, n2 = p2 × p3 的反向
    let n1 = Point3D::new(
        p2.y * p1.z - p1.y * p2.z,
        p1.x * p2.z - p2.x * p1.z,
        p2.x * p1.y - p1.x * p2.y,
    );
    let n2 = -Point3D::new(
        p3.y * p2.z - p2.y * p3.z,
        p2.x * p3.z - p3.x * p2.z,
        p3.x * p2.y - p2.x * p3.y,
    );
    let (Some(n1), Some(n2)) = (n1.normalize(), n2.normalize()) else {
        return (0.0, 1.0);
    };

    let perp = sign(p3.dot(&n1));
    let angle = n1.dot(&n2).clamp(-1.0, 1.0).acos();
    if perp < 0.0 {
        (2.0 * PI - angle, perp)
    } else {
        (angle, perp)
    }
}

/// 面对原点张开的立体角（带符号）
///
/// Σ 顶点角 − (n − 2)π，再乘以 −sign(normal · 首节点)。
/// 测点位于面所在平面或法向退化时为 0。
pub fn solid_angle(face: &Face3D) -> f64 {
    match face.unit_normal() {
        Some(normal) => solid_angle_with_normal(face, normal),
        None => 0.0,
    }
}

fn solid_angle_with_normal(face: &Face3D, normal: Point3D) -> f64 {
    let n = face.node_count();
    let mut sum = KahanSum::new();
    for i in 0..n {
        let (angle, _) = vertex_angle(face.node(i), face.node(i + 1), face.node(i + 2), normal);
        sum.add(angle);
    }
    let w = sum.value() - (n as f64 - 2.0) * PI;
    -sign(normal.dot(&face.node(0))) * w
}

/// 单个面的场贡献
///
/// - `field = di · (lΩ + nQ − mR, mΩ + lR − nP, nΩ + mP − lQ)`，`di` 为原点到面的有向距离
/// - `gradient` 为同一组括号乘以 `normal · direction`
///
/// `(l, m, n)` 为单位外法向，P/Q/R 为各边对数项沿边向量的加权和。
pub fn face_response_singh_gup(face: &Face3D, direction: Point3D) -> FieldSample {
    let Some(normal) = face.unit_normal() else {
        log::trace!("跳过法向退化的面 ({} 节点)", face.node_count());
        return FieldSample::ZERO;
    };

    let di = face.center().dot(&normal);
    let omega = solid_angle_with_normal(face, normal);

    let mut p = KahanSum::new();
    let mut q = KahanSum::new();
    let mut r = KahanSum::new();
    for i in 0..face.node_count() {
        let v1 = face.node(i);
        let edge = face.node(i + 1) - v1;
        let len = edge.length();
        if len == 0.0 {
            continue;
        }
        let integral = edge_log_integral(v1, edge, len);
        p.add(integral * edge.x);
        q.add(integral * edge.y);
        r.add(integral * edge.z);
    }
    let (p, q, r) = (p.value(), q.value(), r.value());
    let (l, m, n) = (normal.x, normal.y, normal.z);

    let bracket = [
        l * omega + n * q - m * r,
        m * omega + l * r - n * p,
        n * omega + m * p - l * q,
    ];
    let pd = normal.dot(&direction);
    log::trace!(
        "face: n = ({:.3}, {:.3}, {:.3}), di = {:.4e}, omega = {:.6e}",
        l,
        m,
        n,
        di,
        omega
    );

    FieldSample::new(bracket.map(|b| di * b), bracket.map(|b| pd * b))
}

/// 边 v1 -> v1 + edge 上 1/r 的线积分（除以边长）
///
/// 记 `s = v1 · û`、`e = s + L`、`d²` 为测点到边所在直线的距离平方，
/// 积分为 `ln((r2 + e) / (r1 + s)) / L`。`s < 0` 或 `e < 0` 时分子或分母改写为
/// `d² / (r - s)` 形式避免相消，测点在延长线上时取其极限 `ln(r1 / r2) / L`。
/// 测点落在边上（含端点）时积分发散，返回 0。
fn edge_log_integral(v1: Point3D, edge: Point3D, len: f64) -> f64 {
    let u = edge.scale(1.0 / len);
    let r1 = v1.length();
    let r2 = (v1 + edge).length();
    let s = v1.dot(&u);
    let e = s + len;

    let ratio = if e < 0.0 {
        // 测点在终点之后一侧: (r2 + e) / (r1 + s) = (r1 - s) / (r2 - e)
        (r1 - s) / (r2 - e)
    } else {
        let den = if s >= 0.0 {
            r1 + s
        } else {
            v1.cross(&u).length_squared() / (r1 - s)
        };
        (r2 + e) / den
    };

    if ratio > 0.0 && ratio.is_finite() {
        ratio.ln() / len
    } else {
        log::trace!("测点位于边上, 跳过对数项: v1 = {:?}, edge = {:?}", v1, edge);
        0.0
    }
}
