// crates/gm_physics/tests/forward_model.rs

//! 正演核函数的整体性质

use gm_foundation::GmError;
use gm_geo::{build_circle, Orientation, Point2D, Point3D, Polygon2D};
use gm_mesh::{create_grid, merge_meshes, Mesh};
use gm_physics::gravimetry::{
    calc_poly_gz, grav, grav_with, line_integral_won_bevis, surface_profile, AnalyticBody,
    BodyParams, ForwardOptions, HorizontalCylinder, PhysicalConstants, Sphere,
};

fn constants() -> PhysicalConstants {
    PhysicalConstants::default()
}

fn rectangle(x0: f64, x1: f64, top: f64, bottom: f64) -> Polygon2D {
    Polygon2D::new(vec![
        Point2D::new(x0, top),
        Point2D::new(x0, bottom),
        Point2D::new(x1, bottom),
        Point2D::new(x1, top),
    ])
    .unwrap()
}

/// 中心 `c`、半边长 `h` 的立方体，六个面法向朝外
fn cube_mesh(c: Point3D, h: f64) -> Mesh {
    let mut mesh = Mesh::new(3).unwrap();
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                mesh.create_node(c + Point3D::new(sx, sy, sz) * h, 0);
            }
        }
    }
    let faces = [
        [0, 2, 6, 4],
        [1, 5, 7, 3],
        [0, 4, 5, 1],
        [2, 3, 7, 6],
        [0, 1, 3, 2],
        [4, 6, 7, 5],
    ];
    for f in faces {
        mesh.create_boundary(f.to_vec(), 1).unwrap();
    }
    mesh
}

#[test]
fn edge_touching_measurement_point_contributes_nothing() {
    let vertex = Point2D::new(1.0, 0.0);
    let poly = rectangle(-1.0, 1.0, 0.0, -2.0);
    for (a, b) in poly.edges() {
        if a == vertex || b == vertex {
            assert!(line_integral_won_bevis(a - vertex, b - vertex).is_zero());
        }
    }

    // 顶点处的结果与邻近测点连续
    let at = calc_poly_gz(&[vertex], &poly, 1.0, &constants()).unwrap();
    let near = calc_poly_gz(&[Point2D::new(1.0, 1e-6)], &poly, 1.0, &constants()).unwrap();
    assert!((at.gz()[0] - near.gz()[0]).abs() < 1e-3 * at.gz()[0].abs());
    assert!((at.gx()[0] - near.gx()[0]).abs() < 1e-3 * at.gx()[0].abs());
}

#[test]
fn reversing_polygon_negates_field() {
    let poly = Polygon2D::new(vec![
        Point2D::new(-3.0, -1.0),
        Point2D::new(-1.0, -4.0),
        Point2D::new(2.5, -3.5),
        Point2D::new(1.0, -0.5),
    ])
    .unwrap();
    let points = surface_profile(&[-8.0, -2.0, 0.0, 1.0, 9.0]);
    let fwd = calc_poly_gz(&points, &poly, 250.0, &constants()).unwrap();
    let rev = calc_poly_gz(&points, &poly.reversed(), 250.0, &constants()).unwrap();
    for i in 0..points.len() {
        for k in 0..3 {
            assert!((fwd.field[i][k] + rev.field[i][k]).abs() < 1e-14);
            assert!((fwd.gradient[i][k] + rev.gradient[i][k]).abs() < 1e-14);
        }
    }
}

#[test]
fn circle_polygon_converges_to_cylinder() {
    let center = Point2D::new(0.0, -5.0);
    let cylinder = HorizontalCylinder::new(center, 1.0, 1000.0).unwrap();
    let points = surface_profile(&[-100.0, -20.0, 30.0]);

    let mut previous = f64::INFINITY;
    for segments in [12, 48, 192] {
        let ring = build_circle(center, 1.0, segments, Orientation::CounterClockwise).unwrap();
        let poly = Polygon2D::new(ring).unwrap();
        let r = calc_poly_gz(&points, &poly, 1000.0, &constants()).unwrap();

        let mut worst: f64 = 0.0;
        for (i, p) in points.iter().enumerate() {
            let exact = cylinder.field(*p, &constants());
            let got = [r.field[i][0], r.field[i][2]];
            let mag = exact[0].hypot(exact[1]);
            let err = (got[0] - exact[0]).hypot(got[1] - exact[1]) / mag;
            worst = worst.max(err);
        }
        assert!(worst < previous, "{segments} 段误差 {worst} 未减小");
        if segments >= 48 {
            assert!(worst < 0.01, "{segments} 段误差 {worst}");
        }
        previous = worst;
    }
}

#[test]
fn vertical_sides_agree_with_tilted_sides() {
    let upright = rectangle(-1.0, 1.0, 0.0, -2.0);
    let tilted = Polygon2D::new(vec![
        Point2D::new(-1.0, 0.0),
        Point2D::new(-1.0 + 2e-4, -2.0),
        Point2D::new(1.0 + 2e-4, -2.0),
        Point2D::new(1.0, 0.0),
    ])
    .unwrap();
    let points = vec![Point2D::new(3.0, 0.5), Point2D::new(-4.0, 0.2)];
    let a = calc_poly_gz(&points, &upright, 1.0, &constants()).unwrap();
    let b = calc_poly_gz(&points, &tilted, 1.0, &constants()).unwrap();
    for i in 0..points.len() {
        assert!((a.gx()[i] - b.gx()[i]).abs() < 1e-3 * a.gx()[i].abs());
        assert!((a.gz()[i] - b.gz()[i]).abs() < 1e-3 * a.gz()[i].abs());
    }
}

#[test]
fn cube_matches_point_mass() {
    let center = Point3D::new(0.0, 0.0, -10.0);
    let density = 400.0;
    let mesh = cube_mesh(center, 1.0);
    // 同质量的球体在外部等价于点质量
    let radius = (8.0 * 3.0 / (4.0 * std::f64::consts::PI)).cbrt();
    let sphere = Sphere::new(center, radius, density).unwrap();

    let points = [
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(5.0, 0.0, 0.0),
        Point3D::new(3.0, 4.0, 2.0),
        Point3D::new(30.0, -20.0, 5.0),
    ];
    let params = BodyParams::new(density, Point3D::new(0.0, 0.0, -1.0));
    let r = grav(&mesh, &points, &params).unwrap();
    for (i, p) in points.iter().enumerate() {
        let exact = sphere.field(*p, &constants());
        let mag = exact.iter().map(|v| v * v).sum::<f64>().sqrt();
        for k in 0..3 {
            assert!(
                (r.field[i][k] - exact[k]).abs() < 1e-3 * mag,
                "point {i}, axis {k}: {} vs {}",
                r.field[i][k],
                exact[k]
            );
        }
    }
    assert!(r.gz()[0] > 0.0);
    assert!((r.gz()[0] - sphere.gz(points[0], &constants())).abs() < 2e-4 * r.gz()[0]);
}

#[test]
fn points_on_cube_edge_extension_are_finite() {
    let mesh = cube_mesh(Point3D::new(0.0, 0.0, -10.0), 1.0);
    let params = BodyParams::new(400.0, Point3D::new(0.0, 0.0, -1.0));
    // 分别位于 y = -1, z = -9 与 y = 1, z = -11 两条棱的延长线上
    let on_line = [
        Point3D::new(3.0, -1.0, -9.0),
        Point3D::new(-4.0, 1.0, -11.0),
        Point3D::new(5.0, -1.0 - 1e-9, -9.0 + 1e-9),
    ];
    let offset = Point3D::new(0.0, -1e-6, 1e-6);
    let shifted: Vec<Point3D> = on_line.iter().map(|p| *p + offset).collect();

    let a = grav(&mesh, &on_line, &params).unwrap();
    let b = grav(&mesh, &shifted, &params).unwrap();
    for i in 0..on_line.len() {
        let scale = a.field[i].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        assert!(scale > 0.0);
        for k in 0..3 {
            assert!(
                (a.field[i][k] - b.field[i][k]).abs() < 1e-4 * scale,
                "point {i}, axis {k}: {} vs {}",
                a.field[i][k],
                b.field[i][k]
            );
        }
        let gscale = a.gradient[i].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        for k in 0..3 {
            assert!((a.gradient[i][k] - b.gradient[i][k]).abs() < 1e-4 * gscale);
        }
    }
}

#[test]
fn cube_gradient_scales_with_direction() {
    let mesh = cube_mesh(Point3D::new(2.0, -1.0, -8.0), 1.5);
    let points = [Point3D::new(0.0, 0.0, 0.0), Point3D::new(6.0, 3.0, 1.0)];
    let dir = Point3D::new(0.3, -0.2, -0.9);
    let one = grav(&mesh, &points, &BodyParams::new(1.0, dir)).unwrap();
    let two = grav(&mesh, &points, &BodyParams::new(1.0, dir * 2.0)).unwrap();
    for i in 0..points.len() {
        assert_eq!(one.field[i], two.field[i]);
        for k in 0..3 {
            assert!((two.gradient[i][k] - 2.0 * one.gradient[i][k]).abs() < 1e-15);
        }
    }
}

#[test]
fn merged_blocks_superpose() {
    let left = create_grid(&[-3.0, -1.0, 0.0], &[-5.0, -3.0, -2.0]).unwrap();
    let right = create_grid(&[0.0, 2.0], &[-5.0, -4.0, -2.0]).unwrap();
    let merged = merge_meshes(&[left.clone(), right.clone()]).unwrap();

    let points: Vec<Point3D> = [-6.0, -1.5, 0.0, 1.0, 8.0]
        .iter()
        .map(|&x| Point3D::new(x, 0.0, 0.0))
        .collect();
    let params = BodyParams::new(150.0, Point3D::new(0.0, 0.0, -1.0));
    let whole = grav(&merged, &points, &params).unwrap();
    let a = grav(&left, &points, &params).unwrap();
    let b = grav(&right, &points, &params).unwrap();
    for i in 0..points.len() {
        for k in 0..3 {
            let sum = a.field[i][k] + b.field[i][k];
            assert!((whole.field[i][k] - sum).abs() < 1e-12);
        }
    }
}

#[test]
fn sequential_and_parallel_agree_on_mesh() {
    let mesh = cube_mesh(Point3D::new(0.0, 0.0, -6.0), 1.0);
    let points: Vec<Point3D> = (0..64)
        .map(|i| Point3D::new(i as f64 - 32.0, 0.5 * i as f64, 0.0))
        .collect();
    let params = BodyParams::new(1.0, Point3D::new(0.0, 0.0, -1.0));
    let par = grav_with(&mesh, &points, &params, &ForwardOptions::default()).unwrap();
    let seq = grav_with(&mesh, &points, &params, &ForwardOptions::default().sequential()).unwrap();
    assert_eq!(par, seq);
}

#[test]
fn inverted_face_is_rejected() {
    let mut mesh = cube_mesh(Point3D::new(0.0, 0.0, -6.0), 1.0);
    // 再加一个同向重复面，有向边计数不平衡
    mesh.create_boundary(vec![0, 2, 6, 4], 1).unwrap();
    let r = grav(&mesh, &[Point3D::ZERO], &BodyParams::new(1.0, Point3D::UNIT_Z));
    assert!(matches!(r, Err(GmError::InvalidMesh { .. })));
}
