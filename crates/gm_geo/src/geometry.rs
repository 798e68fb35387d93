// crates/gm_geo/src/geometry.rs

//! 几何类型定义
//!
//! 提供工作区统一的点/向量类型和包围盒。
//!
//! # 坐标约定
//!
//! - [`Point3D`]: 3D 位置、法向量、磁化向量、场向量
//! - [`Point2D`]: 2D 剖面坐标，`x` 为水平位置，`y` 为竖直坐标（向上为正，
//!   即剖面中的 z）

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

// ============================================================================
// Point3D - 3D点
// ============================================================================

/// 3D点 / 3D向量
///
/// 不可变值类型，所有运算返回新值。
///
/// # 示例
///
/// ```
/// use gm_geo::geometry::Point3D;
///
/// let p1 = Point3D::new(1.0, 2.0, 3.0);
/// let p2 = Point3D::new(4.0, 5.0, 6.0);
///
/// let sum = p1 + p2;
/// let dot = p1.dot(&p2);
/// let cross = p1.cross(&p2);
/// assert_eq!(sum, Point3D::new(5.0, 7.0, 9.0));
/// assert_eq!(dot, 32.0);
/// assert_eq!(cross, Point3D::new(-3.0, 6.0, -3.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3D {
    /// X坐标
    pub x: f64,
    /// Y坐标
    pub y: f64,
    /// Z坐标
    pub z: f64,
}

impl Point3D {
    /// 零点常量
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// 单位X向量
    pub const UNIT_X: Self = Self {
        x: 1.0,
        y: 0.0,
        z: 0.0,
    };

    /// 单位Y向量
    pub const UNIT_Y: Self = Self {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    /// 单位Z向量
    pub const UNIT_Z: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 1.0,
    };

    /// 创建新的3D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// 投影到XY平面（忽略Z坐标）
    #[inline]
    #[must_use]
    pub const fn xy(&self) -> Point2D {
        Point2D {
            x: self.x,
            y: self.y,
        }
    }

    /// 点积（内积）
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 叉积（外积）
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// 向量长度（模）
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length_squared().sqrt()
    }

    /// 向量长度的平方
    #[inline]
    #[must_use]
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// 归一化向量
    ///
    /// 如果向量长度接近零，返回 None
    #[inline]
    #[must_use]
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < 1e-300 {
            None
        } else {
            Some(self.scale(1.0 / len))
        }
    }

    /// 计算到另一个点的欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (*self - *other).length()
    }

    /// 线性插值
    #[inline]
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
            z: self.z + (other.z - self.z) * t,
        }
    }

    /// 标量乘法
    #[inline]
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }

    /// 判断是否为有限数（非NaN、非Inf）
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// 判断是否为零向量
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// 分量最小值
    #[inline]
    #[must_use]
    pub fn min(&self, other: &Self) -> Self {
        Self {
            x: self.x.min(other.x),
            y: self.y.min(other.y),
            z: self.z.min(other.z),
        }
    }

    /// 分量最大值
    #[inline]
    #[must_use]
    pub fn max(&self, other: &Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
            z: self.z.max(other.z),
        }
    }

    /// 转为数组
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

// ============================================================================
// Point3D 运算符实现
// ============================================================================

impl Add for Point3D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl AddAssign for Point3D {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Point3D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Point3D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f64> for Point3D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        self.scale(scalar)
    }
}

impl Mul<Point3D> for f64 {
    type Output = Point3D;

    #[inline]
    fn mul(self, point: Point3D) -> Point3D {
        point.scale(self)
    }
}

impl From<[f64; 3]> for Point3D {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Point3D> for [f64; 3] {
    fn from(p: Point3D) -> Self {
        [p.x, p.y, p.z]
    }
}

impl From<(f64, f64, f64)> for Point3D {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

// ============================================================================
// Point2D - 2D剖面点
// ============================================================================

/// 2D点 - 剖面坐标 (x, z)
///
/// `y` 字段保存剖面的竖直坐标，向上为正。
///
/// ```
/// use gm_geo::geometry::Point2D;
///
/// let p1 = Point2D::new(0.0, 0.0);
/// let p2 = Point2D::new(3.0, -4.0);
/// assert_eq!(p1.distance_to(&p2), 5.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// 水平坐标
    pub x: f64,
    /// 竖直坐标
    pub y: f64,
}

impl Point2D {
    /// 零点常量
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// 创建新的2D点
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 扩展为3D点，指定Z坐标
    #[inline]
    #[must_use]
    pub const fn with_z(self, z: f64) -> Point3D {
        Point3D::new(self.x, self.y, z)
    }

    /// 计算到另一个点的欧几里得距离
    #[inline]
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    /// 计算到另一个点的距离的平方
    #[inline]
    #[must_use]
    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// 2D 叉积（z 分量）
    #[inline]
    #[must_use]
    pub fn cross(&self, other: &Self) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// 点积
    #[inline]
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 向量长度
    #[inline]
    #[must_use]
    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 线性插值
    #[inline]
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// 判断是否为原点
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// 判断是否为有限数
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point2D {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point2D {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Neg for Point2D {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point2D {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

// ============================================================================
// BoundingBox - 轴对齐包围盒
// ============================================================================

/// 3D 轴对齐包围盒
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// 最小角点
    pub min: Point3D,
    /// 最大角点
    pub max: Point3D,
}

impl BoundingBox {
    /// 由点集计算包围盒，空点集返回 None
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3D>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        Some(Self { min, max })
    }

    /// x 方向跨度
    #[inline]
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// y 方向跨度
    #[inline]
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// 水平最大跨度 max(x 跨度, y 跨度)
    #[inline]
    #[must_use]
    pub fn max_horizontal_span(&self) -> f64 {
        self.width().max(self.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point3d_ops() {
        let a = Point3D::new(1.0, 0.0, 0.0);
        let b = Point3D::new(0.0, 1.0, 0.0);
        assert_eq!(a.cross(&b), Point3D::UNIT_Z);
        assert_eq!(a.dot(&b), 0.0);
        assert_eq!((a - b).length_squared(), 2.0);
        assert_eq!(-a, Point3D::new(-1.0, 0.0, 0.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a.lerp(&b, 0.5), Point3D::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_normalize_zero() {
        assert!(Point3D::ZERO.normalize().is_none());
        let n = Point3D::new(3.0, 0.0, 4.0).normalize().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_point2d_cross() {
        let a = Point2D::new(1.0, 0.0);
        let b = Point2D::new(0.0, 1.0);
        assert_eq!(a.cross(&b), 1.0);
        assert_eq!(b.cross(&a), -1.0);
    }

    #[test]
    fn test_bounding_box() {
        let pts = [
            Point3D::new(1.0, -2.0, 0.0),
            Point3D::new(-1.0, 5.0, 3.0),
            Point3D::new(4.0, 0.0, -1.0),
        ];
        let bb = BoundingBox::from_points(&pts).unwrap();
        assert_eq!(bb.min, Point3D::new(-1.0, -2.0, -1.0));
        assert_eq!(bb.max, Point3D::new(4.0, 5.0, 3.0));
        assert_eq!(bb.max_horizontal_span(), 7.0);
        assert!(BoundingBox::from_points(&[]).is_none());
    }
}
