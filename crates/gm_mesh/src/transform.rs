// crates/gm_mesh/src/transform.rs

//! 剖面网格到 3D 坐标的变换
//!
//! - [`transform_2d_mesh_to_3d`]: 网格节点的 x 视为沿测线的累计长度（tape），按参考点
//!   （如 GPS 轨迹）插值得到世界坐标 x/y；节点 y（竖直）保留为 z，并可叠加插值的地形高程。
//! - [`rotate_2d_mesh_to_world`]: 把剖面平面竖立并绕竖直轴旋转到起点→终点方向，再平移到起点。

use crate::mesh::Mesh;
use gm_foundation::error::{GmError, GmResult};
use gm_geo::Point3D;

/// 分段线性插值，超出范围时取端点值
fn interp(t: f64, tape: &[f64], values: &[f64]) -> f64 {
    let n = tape.len();
    if t <= tape[0] {
        return values[0];
    }
    if t >= tape[n - 1] {
        return values[n - 1];
    }
    // tape 严格递增
    let k = tape.partition_point(|&s| s <= t).clamp(1, n - 1);
    let (t0, t1) = (tape[k - 1], tape[k]);
    let w = (t - t0) / (t1 - t0);
    values[k - 1] + w * (values[k] - values[k - 1])
}

/// 参考点累计长度
fn tape_positions(x: &[f64], y: &[f64]) -> Vec<f64> {
    let mut tape = Vec::with_capacity(x.len());
    tape.push(0.0);
    for i in 1..x.len() {
        let d = (x[i] - x[i - 1]).hypot(y[i] - y[i - 1]);
        tape.push(tape[i - 1] + d);
    }
    tape
}

/// 将 2D 剖面网格的节点变换到 3D 世界坐标（原地修改）
///
/// - `x`, `y`: 参考点坐标
/// - `z`: 可选的参考点高程，插值后加到节点竖直坐标上
///
/// # 错误
/// - 网格非 2D
/// - 参考点少于 2 个或各数组长度不一致
/// - 相邻参考点重合
pub fn transform_2d_mesh_to_3d(
    mesh: &mut Mesh,
    x: &[f64],
    y: &[f64],
    z: Option<&[f64]>,
) -> GmResult<()> {
    if mesh.dimension() != 2 {
        return Err(GmError::invalid_mesh("transform_2d_mesh_to_3d 需要 2D 网格"));
    }
    if x.len() < 2 {
        return Err(GmError::invalid_input("参考点至少需要 2 个"));
    }
    GmError::check_size("y", x.len(), y.len())?;
    if let Some(z) = z {
        GmError::check_size("z", x.len(), z.len())?;
    }

    let tape = tape_positions(x, y);
    if tape.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(GmError::invalid_input("相邻参考点重合, 无法计算测线长度"));
    }

    for id in 0..mesh.node_count() {
        let p = mesh.node_pos(id);
        let offset = z.map_or(0.0, |z| interp(p.x, &tape, z));
        let pos = Point3D::new(interp(p.x, &tape, x), interp(p.x, &tape, y), p.y + offset);
        mesh.set_node_pos(id, pos)?;
    }
    log::debug!(
        "transform_2d_mesh_to_3d: {} 节点, 测线长度 {:.3}",
        mesh.node_count(),
        tape[tape.len() - 1]
    );
    Ok(())
}

/// 将 2D 剖面网格旋转到直线测线所在的竖直平面（原地修改）
///
/// 节点 `(x, y)` 映射为 `start + x·û + y·ẑ`，`û` 为 `start → end` 的水平单位方向。
/// 测线高程差不参与旋转，只通过 `start` 平移。
///
/// # 错误
/// - 网格非 2D
/// - 起点与终点水平重合
pub fn rotate_2d_mesh_to_world(mesh: &mut Mesh, start: Point3D, end: Point3D) -> GmResult<()> {
    if mesh.dimension() != 2 {
        return Err(GmError::invalid_mesh("rotate_2d_mesh_to_world 需要 2D 网格"));
    }
    let dir = Point3D::new(end.x - start.x, end.y - start.y, 0.0);
    let Some(u) = dir.normalize() else {
        return Err(GmError::invalid_input(format!(
            "测线起点与终点水平重合: {start:?} -> {end:?}"
        )));
    };

    for id in 0..mesh.node_count() {
        let p = mesh.node_pos(id);
        let pos = Point3D::new(start.x + p.x * u.x, start.y + p.x * u.y, start.z + p.y);
        mesh.set_node_pos(id, pos)?;
    }
    log::debug!(
        "rotate_2d_mesh_to_world: {} 节点, 方位 ({:.4}, {:.4})",
        mesh.node_count(),
        u.x,
        u.y
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::create_grid;

    #[test]
    fn test_interp_clamps() {
        let tape = [0.0, 1.0, 3.0];
        let v = [10.0, 20.0, 40.0];
        assert_eq!(interp(-1.0, &tape, &v), 10.0);
        assert_eq!(interp(2.0, &tape, &v), 30.0);
        assert_eq!(interp(5.0, &tape, &v), 40.0);
    }

    #[test]
    fn test_transform_along_diagonal() {
        let mut mesh = create_grid(&[0.0, 5.0], &[-1.0, 0.0]).unwrap();
        // 3-4-5 直线
        let x = [0.0, 3.0, 6.0];
        let y = [0.0, 4.0, 8.0];
        let z = [100.0, 100.0, 110.0];
        transform_2d_mesh_to_3d(&mut mesh, &x, &y, Some(&z)).unwrap();
        let p = mesh.node_pos(1); // tape 5, 深度 -1
        assert!((p.x - 3.0).abs() < 1e-12);
        assert!((p.y - 4.0).abs() < 1e-12);
        assert!((p.z - 99.0).abs() < 1e-12);
    }

    #[test]
    fn test_transform_length_checks() {
        let mut mesh = create_grid(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(transform_2d_mesh_to_3d(&mut mesh, &[0.0, 1.0], &[0.0], None).is_err());
        assert!(transform_2d_mesh_to_3d(&mut mesh, &[0.0, 1.0], &[0.0, 0.0], Some(&[0.0])).is_err());
        assert!(transform_2d_mesh_to_3d(&mut mesh, &[1.0, 1.0], &[0.0, 0.0], None).is_err());
    }

    #[test]
    fn test_rotate_to_profile() {
        let mut mesh = create_grid(&[0.0, 5.0], &[-2.0, 0.0]).unwrap();
        let start = Point3D::new(10.0, 20.0, 5.0);
        // 终点高程不影响方向
        let end = Point3D::new(13.0, 24.0, 40.0);
        rotate_2d_mesh_to_world(&mut mesh, start, end).unwrap();

        let p = mesh.node_pos(1); // (5, -2)
        assert!((p.x - 13.0).abs() < 1e-12);
        assert!((p.y - 24.0).abs() < 1e-12);
        assert!((p.z - 3.0).abs() < 1e-12);
        // 剖面原点映射到起点
        let q = mesh.node_pos(2); // (0, 0)
        assert!((q - start).length() < 1e-12);
    }

    #[test]
    fn test_rotate_rejects_vertical_profile() {
        let mut mesh = create_grid(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let before = mesh.clone();
        let start = Point3D::new(1.0, 1.0, 0.0);
        assert!(rotate_2d_mesh_to_world(&mut mesh, start, Point3D::new(1.0, 1.0, -5.0)).is_err());
        assert_eq!(mesh, before);

        let mut solid = Mesh::new(3).unwrap();
        assert!(rotate_2d_mesh_to_world(&mut solid, start, Point3D::ZERO).is_err());
    }
}
