//! Three-component floating point vector, shared by positions, directions,
//! surface normals, and linear-light colors.

use approx::{relative_eq, AbsDiffEq};
use nalgebra::Vector3 as NVector3;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Epsilon shared by vector-level equality checks and general-purpose
/// "close enough to zero" guards. Distinct from the ray/shadow epsilon
/// (`crate::shading::RAY_EPSILON`) and the triangle epsilon
/// (`crate::intersection::TRIANGLE_EPSILON`) — see `DESIGN.md`.
pub const EPSILON: f64 = 1e-6;

/// An ordered triple of `f64`s. Cheap to copy; used for positions,
/// directions, normals, and RGB radiance alike.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3(NVector3<f64>);

impl Vector3 {
    pub const fn zero() -> Self {
        Self(NVector3::new(0.0, 0.0, 0.0))
    }

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(NVector3::new(x, y, z))
    }

    pub fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn get(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self(self.0.cross(&other.0))
    }

    pub fn length(&self) -> f64 {
        self.0.norm()
    }

    pub fn length_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    /// Unit-length copy of `self`. On a zero (or near-zero) vector this
    /// produces NaN/inf components rather than panicking — callers that
    /// cannot tolerate that must guard with `length()` first (spec invariant).
    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }

    /// Componentwise (Hadamard) product, used for tinting radiance by a
    /// material color.
    pub fn hadamard(&self, other: &Self) -> Self {
        Self(self.0.component_mul(&other.0))
    }

    pub fn max_component(&self) -> f64 {
        self.0.x.max(self.0.y).max(self.0.z)
    }

    /// The axis (0=x, 1=y, 2=z) with the largest absolute component.
    pub fn dominant_axis(&self) -> usize {
        let (x, y, z) = (self.0.x.abs(), self.0.y.abs(), self.0.z.abs());
        if x >= y && x >= z {
            0
        } else if y >= z {
            1
        } else {
            2
        }
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.0.x, self.0.y, self.0.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Self::Output {
        rhs * self
    }
}

impl Div<f64> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl AbsDiffEq for Vector3 {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        relative_eq!(self.0, other.0, epsilon = epsilon)
    }
}

/// `d - 2 * dot(n, d) * n`. `n` is assumed unit; `d` is used as given
/// (not re-normalized), matching the reference formula.
#[allow(non_snake_case)]
pub fn reflect(d: &Vector3, n: &Vector3) -> Vector3 {
    *d - *n * (2.0 * n.dot(d))
}

/// Snell's law in vector form. `eta = n1/n2`, the ratio of the medium the
/// ray is leaving to the medium it's entering. `d` is normalized internally.
/// Returns `None` on total internal reflection.
#[allow(non_snake_case)]
pub fn refract(d: &Vector3, n: &Vector3, eta: f64) -> Option<Vector3> {
    let I = d.normalize();
    let c = -n.dot(&I);
    let k = 1.0 - eta * eta * (1.0 - c * c);
    if k > 1.0 {
        return None;
    }
    // NOTE: `k > 1.0` above is the spec's `eta^2(1-c^2) > 1` total-internal-
    // reflection guard rewritten so we can reuse the same quantity for the
    // sqrt below (1 - eta^2(1-c^2) = 1 - (1-k) = k).
    Some(I * eta + *n * (eta * c - k.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use quickcheck_macros::quickcheck;

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    #[quickcheck]
    fn normalize_is_unit_length(x: f64, y: f64, z: f64) -> bool {
        let vec = v(x, y, z);
        if vec.length() <= 1e-6 || !vec.length().is_finite() {
            return true;
        }
        (vec.normalize().length() - 1.0).abs() < 1e-6
    }

    #[quickcheck]
    fn dot_is_commutative(a: (f64, f64, f64), b: (f64, f64, f64)) -> bool {
        let a = v(a.0, a.1, a.2);
        let b = v(b.0, b.1, b.2);
        (a.dot(&b) - b.dot(&a)).abs() < 1e-6 || !a.dot(&b).is_finite()
    }

    #[quickcheck]
    fn cross_is_anticommutative(a: (f64, f64, f64), b: (f64, f64, f64)) -> bool {
        let a = v(a.0, a.1, a.2);
        let b = v(b.0, b.1, b.2);
        let lhs = a.cross(&b);
        let rhs = (b.cross(&a)) * -1.0;
        (lhs.0 - rhs.0).norm() < 1e-6 || !lhs.length().is_finite()
    }

    #[test]
    fn cross_is_orthogonal_to_operands() {
        let a = v(1.0, 0.3, -2.0);
        let b = v(-0.4, 2.0, 1.0);
        let c = a.cross(&b);
        assert_abs_diff_eq!(c.dot(&a), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(c.dot(&b), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn reflect_is_involution_for_unit_normal() {
        let n = v(0.0, 1.0, 0.0);
        let d = v(0.5, -0.7, 0.2).normalize();
        let once = reflect(&d, &n);
        let twice = reflect(&once, &n);
        assert_abs_diff_eq!(twice, d, epsilon = 1e-6);
    }

    #[test]
    fn refract_with_matched_index_is_identity() {
        let n = v(0.0, 1.0, 0.0);
        let d = v(0.707107, -0.707107, 0.0);
        let r = refract(&d, &n, 1.0).unwrap();
        assert_abs_diff_eq!(r, d, epsilon = 1e-5);
    }

    #[test]
    fn refract_matches_reference_value() {
        let d = v(0.707107, -0.707107, 0.0);
        let n = v(0.0, 1.0, 0.0);
        let r = refract(&d, &n, 0.9).unwrap();
        assert_abs_diff_eq!(r, v(0.636396, -0.771362, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn reflect_matches_reference_value() {
        let d = v(0.707107, -0.707107, 0.0);
        let n = v(0.0, 1.0, 0.0);
        let r = reflect(&d, &n);
        assert_abs_diff_eq!(r, v(0.707107, 0.707107, 0.0), epsilon = 1e-5);
    }
}
