//! 2D/3D vectors and the 3×3 affine transform.
//!
//! Purpose
//! - `Vec2` is the vertex type of every graph the boolean engine builds, so
//!   equality and hashing are bit-exact on the coordinates: two split points are
//!   the same vertex only if they were computed identically. `-0.0` and `0.0`
//!   are identified so `Eq` agrees with `==` on non-NaN input.
//! - `Ord` is a total lexicographic order (x, then y) used for deterministic
//!   iteration and for picking union-find roots.
//! - Interop with nalgebra via `From` conversions; `Mat3` is nalgebra's matrix.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use nalgebra::{Matrix3, Point2, Vector2, Vector3};

/// Homogeneous 2D affine transform.
pub type Mat3 = Matrix3<f64>;

#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

/// Immutable 2D point/vector.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ORIGIN: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const X_AXIS: Vec2 = Vec2 { x: 1.0, y: 0.0 };
    pub const Y_AXIS: Vec2 = Vec2 { x: 0.0, y: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `radians` from the x axis.
    #[inline]
    pub fn polar(radians: f64) -> Self {
        Self::new(radians.cos(), radians.sin())
    }

    #[inline]
    pub fn dot(self, o: Vec2) -> f64 {
        self.x * o.x + self.y * o.y
    }

    /// z-component of the 3D cross product; positive when `o` is counterclockwise of `self`.
    #[inline]
    pub fn cross(self, o: Vec2) -> f64 {
        self.x * o.y - self.y * o.x
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector in the same direction; the zero vector maps to itself.
    #[inline]
    pub fn norm(self) -> Self {
        let l = self.length();
        if l == 0.0 {
            self
        } else {
            self / l
        }
    }

    /// Scale so the larger-magnitude component becomes ±1. Cheaper than `norm`
    /// when only the direction matters.
    #[inline]
    pub fn pseudo_norm(self) -> Self {
        let l = self.x.abs().max(self.y.abs());
        if l == 0.0 {
            self
        } else {
            self / l
        }
    }

    #[inline]
    pub fn lerp(self, b: Vec2, t: f64) -> Self {
        self + (b - self) * t
    }

    /// Per-axis interpolation.
    #[inline]
    pub fn lerp_vec(self, b: Vec2, t: Vec2) -> Self {
        self + (b - self).mul_elem(t)
    }

    #[inline]
    pub fn mul_elem(self, o: Vec2) -> Self {
        Self::new(self.x * o.x, self.y * o.y)
    }

    #[inline]
    pub fn div_elem(self, o: Vec2) -> Self {
        Self::new(self.x / o.x, self.y / o.y)
    }

    #[inline]
    pub fn swap(self) -> Self {
        Self::new(self.y, self.x)
    }

    #[inline]
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.x), f(self.y))
    }

    #[inline]
    pub fn every(self, f: impl Fn(f64) -> bool) -> bool {
        f(self.x) && f(self.y)
    }

    pub fn rotate(self, radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c)
    }

    /// Apply an affine transform (last row of `m` ignored).
    pub fn transform(self, m: &Mat3) -> Self {
        let p = m * Vector3::new(self.x, self.y, 1.0);
        Self::new(p.x, p.y)
    }

    /// Unsigned angle between two vectors in `[0, π]`.
    pub fn angle_between(self, o: Vec2) -> f64 {
        self.cross(o).atan2(self.dot(o)).abs()
    }

    /// Per-component `|a - b| < epsilon`.
    #[inline]
    pub fn approx_eq(a: Vec2, b: Vec2, epsilon: f64) -> bool {
        (a.x - b.x).abs() < epsilon && (a.y - b.y).abs() < epsilon
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl PartialEq for Vec2 {
    #[inline]
    fn eq(&self, o: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(o.x) && canonical_bits(self.y) == canonical_bits(o.y)
    }
}

impl Eq for Vec2 {}

impl Hash for Vec2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
    }
}

impl Ord for Vec2 {
    fn cmp(&self, o: &Self) -> Ordering {
        let (ax, ay) = (f64::from_bits(canonical_bits(self.x)), f64::from_bits(canonical_bits(self.y)));
        let (bx, by) = (f64::from_bits(canonical_bits(o.x)), f64::from_bits(canonical_bits(o.y)));
        ax.total_cmp(&bx).then_with(|| ay.total_cmp(&by))
    }
}

impl PartialOrd for Vec2 {
    #[inline]
    fn partial_cmp(&self, o: &Self) -> Option<Ordering> {
        Some(self.cmp(o))
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x + o.x, self.y + o.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, o: Vec2) {
        *self = *self + o;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, o: Vec2) -> Vec2 {
        Vec2::new(self.x - o.x, self.y - o.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, o: Vec2) {
        *self = *self - o;
    }
}

impl Mul<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, k: f64) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }
}

impl Div<f64> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, k: f64) -> Vec2 {
        Vec2::new(self.x / k, self.y / k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl From<Vector2<f64>> for Vec2 {
    #[inline]
    fn from(v: Vector2<f64>) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vec2> for Vector2<f64> {
    #[inline]
    fn from(v: Vec2) -> Self {
        Vector2::new(v.x, v.y)
    }
}

impl From<Point2<f64>> for Vec2 {
    #[inline]
    fn from(p: Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<(f64, f64)> for Vec2 {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Immutable 3D vector.
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, o: Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    #[inline]
    pub fn cross(self, o: Vec3) -> Vec3 {
        Vec3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn norm(self) -> Vec3 {
        let l = self.length();
        if l == 0.0 {
            self
        } else {
            Vec3::new(self.x / l, self.y / l, self.z / l)
        }
    }

    #[inline]
    pub fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

impl PartialEq for Vec3 {
    #[inline]
    fn eq(&self, o: &Self) -> bool {
        canonical_bits(self.x) == canonical_bits(o.x)
            && canonical_bits(self.y) == canonical_bits(o.y)
            && canonical_bits(self.z) == canonical_bits(o.z)
    }
}

impl Eq for Vec3 {}

impl Hash for Vec3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_bits(self.x).hash(state);
        canonical_bits(self.y).hash(state);
        canonical_bits(self.z).hash(state);
    }
}

impl From<Vector3<f64>> for Vec3 {
    #[inline]
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for Vector3<f64> {
    #[inline]
    fn from(v: Vec3) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

/// Translation by `(x, y)`.
pub fn translate(x: f64, y: f64) -> Mat3 {
    Matrix3::new_translation(&Vector2::new(x, y))
}

/// Uniform scale about the origin.
pub fn scale(k: f64) -> Mat3 {
    Matrix3::new_scaling(k)
}

pub fn scale_xy(sx: f64, sy: f64) -> Mat3 {
    Matrix3::new_nonuniform_scaling(&Vector2::new(sx, sy))
}

/// Counterclockwise rotation about the origin.
pub fn rotate(radians: f64) -> Mat3 {
    Matrix3::new_rotation(radians)
}
