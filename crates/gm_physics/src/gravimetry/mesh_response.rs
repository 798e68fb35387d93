// crates/gm_physics/src/gravimetry/mesh_response.rs

//! 网格边界积分正演
//!
//! 只使用标记非零的边界（2D 线段或 3D 面），它们须构成绕向一致的闭合链/闭合壳。
//! 2D 边界逐段使用 Won-Bevis 线积分，3D 边界逐面使用 Singh-Guptasarma 面核。
//! 网格本身不被修改，每个测点只在局部平移边界坐标。

use super::batch::evaluate_points;
use super::line_integral::line_integral_won_bevis_with;
use super::options::ForwardOptions;
use super::response::{FieldSample, GravityResponse};
use super::solid_angle::face_response_singh_gup;
use gm_foundation::error::{GmError, GmResult};
use gm_foundation::float::KahanVec3;
use gm_foundation::tolerance::GeometryTolerance;
use gm_geo::{Face3D, Point3D};
use gm_mesh::Mesh;
use serde::{Deserialize, Serialize};

/// 均匀异常体参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyParams {
    /// 密度（差）[kg/m³]
    pub density: f64,
    /// 磁化（或密度）方向，只进入 3D 面核的梯度项
    pub direction: Point3D,
}

impl BodyParams {
    /// 创建
    pub fn new(density: f64, direction: Point3D) -> Self {
        Self { density, direction }
    }

    fn validate(&self) -> GmResult<()> {
        GmError::check_finite("density", self.density)?;
        if !self.direction.is_finite() {
            return Err(GmError::invalid_input(format!(
                "方向向量必须有限: {:?}",
                self.direction
            )));
        }
        Ok(())
    }
}

/// 网格边界所围异常体的重力响应（默认选项）
pub fn grav(mesh: &Mesh, points: &[Point3D], params: &BodyParams) -> GmResult<GravityResponse> {
    grav_with(mesh, points, params, &ForwardOptions::default())
}

/// 带完整选项的 [`grav`]
///
/// # 错误
/// - 网格没有标记非零的边界
/// - 有效边界未闭合或绕向不一致
/// - 参数非有限，或结果出现非有限值
pub fn grav_with(
    mesh: &Mesh,
    points: &[Point3D],
    params: &BodyParams,
    options: &ForwardOptions,
) -> GmResult<GravityResponse> {
    params.validate()?;
    options.validate()?;

    let boundaries: Vec<Vec<Point3D>> = mesh
        .active_boundaries()
        .map(|b| mesh.boundary_positions(b))
        .collect();
    if boundaries.is_empty() {
        return Err(GmError::invalid_mesh("网格没有标记非零的边界"));
    }
    mesh.check_closed_boundary()?;

    let scale = -options.constants.g * params.density;
    let kernel = match mesh.dimension() {
        2 => BoundaryKernel::Segments(&boundaries),
        _ => BoundaryKernel::Faces(
            boundaries
                .into_iter()
                .map(Face3D::new)
                .collect::<GmResult<Vec<_>>>()?,
        ),
    };

    let tol = &options.tolerance;
    let response = evaluate_points(points, options.parallel, |&p| {
        let s = kernel.sample(p, params.direction, tol).scaled(scale);
        FieldSample::new([s.field[0], s.field[1], -s.field[2]], s.gradient)
    })?;

    log::debug!(
        "grav: {}D, {} 个边界, {} 测点, density = {}",
        mesh.dimension(),
        kernel.len(),
        points.len(),
        params.density
    );
    Ok(response)
}

enum BoundaryKernel<'a> {
    Segments(&'a [Vec<Point3D>]),
    Faces(Vec<Face3D>),
}

impl BoundaryKernel<'_> {
    fn len(&self) -> usize {
        match self {
            Self::Segments(s) => s.len(),
            Self::Faces(f) => f.len(),
        }
    }

    /// 单个测点的未缩放贡献
    fn sample(&self, p: Point3D, direction: Point3D, tol: &GeometryTolerance) -> FieldSample {
        let mut field = KahanVec3::new();
        let mut gradient = KahanVec3::new();
        match self {
            Self::Segments(segments) => {
                let origin = p.xy();
                for seg in segments.iter() {
                    let s = line_integral_won_bevis_with(
                        seg[0].xy() - origin,
                        seg[1].xy() - origin,
                        tol,
                    )
                    .scaled(-2.0);
                    field.add(s.field);
                    gradient.add(s.gradient);
                }
            }
            Self::Faces(faces) => {
                for face in faces {
                    let s = face_response_singh_gup(&face.translated(-p), direction);
                    field.add(s.field);
                    gradient.add(s.gradient);
                }
            }
        }
        FieldSample::new(field.value(), gradient.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gravimetry::polygon::calc_poly_gz;
    use gm_geo::{Point2D, Polygon2D};
    use gm_mesh::create_grid;

    fn down() -> Point3D {
        Point3D::new(0.0, 0.0, -1.0)
    }

    #[test]
    fn test_grid_block_matches_polygon() {
        let mesh = create_grid(&[-2.0, 0.0, 1.0, 3.0], &[-6.0, -4.0, -3.0]).unwrap();
        let xs = [-10.0, -1.0, 0.5, 7.0];
        let points: Vec<Point3D> = xs.iter().map(|&x| Point3D::new(x, 0.0, 0.0)).collect();
        let r = grav(&mesh, &points, &BodyParams::new(300.0, down())).unwrap();

        let poly = Polygon2D::new(vec![
            Point2D::new(-2.0, -6.0),
            Point2D::new(3.0, -6.0),
            Point2D::new(3.0, -3.0),
            Point2D::new(-2.0, -3.0),
        ])
        .unwrap();
        let profile: Vec<Point2D> = xs.iter().map(|&x| Point2D::new(x, 0.0)).collect();
        let expect = calc_poly_gz(&profile, &poly, 300.0, &Default::default()).unwrap();
        for i in 0..xs.len() {
            assert!(r.field[i][2] > 0.0);
            for k in 0..3 {
                assert!((r.field[i][k] - expect.field[i][k]).abs() < 1e-12);
                assert!((r.gradient[i][k] - expect.gradient[i][k]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_mesh_is_not_modified() {
        let mesh = create_grid(&[0.0, 1.0], &[-2.0, -1.0]).unwrap();
        let before = mesh.clone();
        let points = [Point3D::new(0.5, 0.0, 0.0), Point3D::new(4.0, 1.0, 0.0)];
        grav(&mesh, &points, &BodyParams::new(1.0, down())).unwrap();
        assert_eq!(mesh, before);
    }

    #[test]
    fn test_requires_active_boundaries() {
        let mut mesh = Mesh::new_2d();
        let a = mesh.create_node(Point3D::new(0.0, -1.0, 0.0), 0);
        let b = mesh.create_node(Point3D::new(1.0, -1.0, 0.0), 0);
        let c = mesh.create_node(Point3D::new(0.0, -2.0, 0.0), 0);
        mesh.create_cell(vec![a, b, c], 2).unwrap();
        mesh.create_boundary(vec![a, b], 0).unwrap();
        let r = grav(&mesh, &[Point3D::ZERO], &BodyParams::new(1.0, down()));
        assert!(matches!(r, Err(GmError::InvalidMesh { .. })));
    }

    #[test]
    fn test_open_chain_rejected() {
        let mut mesh = Mesh::new_2d();
        let a = mesh.create_node(Point3D::new(0.0, -1.0, 0.0), 0);
        let b = mesh.create_node(Point3D::new(1.0, -1.0, 0.0), 0);
        let c = mesh.create_node(Point3D::new(0.0, -2.0, 0.0), 0);
        mesh.create_boundary(vec![a, b], 1).unwrap();
        mesh.create_boundary(vec![b, c], 1).unwrap();
        assert!(grav(&mesh, &[Point3D::ZERO], &BodyParams::new(1.0, down())).is_err());
    }

    #[test]
    fn test_invalid_params() {
        let mesh = create_grid(&[0.0, 1.0], &[-2.0, -1.0]).unwrap();
        let bad = BodyParams::new(1.0, Point3D::new(f64::NAN, 0.0, 0.0));
        assert!(grav(&mesh, &[Point3D::ZERO], &bad).is_err());
    }
}
