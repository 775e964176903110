//! Vector math for the render pipeline
//!
//! `Vector` is a mutate-in-place 3D point/free-vector. The transform order
//! (scale, then rotate Z/Y/X, then translate) is fixed; the composite-solid
//! silhouette math depends on it.

use serde::{Deserialize, Serialize};

/// Full turn in radians.
pub const TAU: f64 = std::f64::consts::TAU;

/// Linear interpolation between two scalars.
pub fn lerp(a: f64, b: f64, alpha: f64) -> f64 {
    (b - a) * alpha + a
}

/// Euclidean remainder, always in `[0, div)` for positive `div`.
pub fn modulo(num: f64, div: f64) -> f64 {
    ((num % div) + div) % div
}

/// Round to 3 decimal places, the precision of graph export and SVG output.
pub fn round3(num: f64) -> f64 {
    (num * 1000.0).round() / 1000.0
}

fn magnitude_sqrt(sum: f64) -> f64 {
    // unit vectors are extremely common after normal computation, skip sqrt
    if (sum - 1.0).abs() < 1e-8 {
        return 1.0;
    }
    sum.sqrt()
}

/// A 3D point or free vector.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Zero vector.
pub const ZERO: Vector = Vector { x: 0.0, y: 0.0, z: 0.0 };

/// Unit scale: 1 on every axis.
pub const ONE: Vector = Vector { x: 1.0, y: 1.0, z: 1.0 };

impl Vector {
    pub const ZERO: Vector = ZERO;
    pub const ONE: Vector = ONE;

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Vector pointing along +z, the default surface-normal reference.
    pub fn unit_z() -> Self {
        Self { x: 0.0, y: 0.0, z: 1.0 }
    }

    pub fn set(&mut self, other: Vector) -> &mut Self {
        *self = other;
        self
    }

    pub fn add(&mut self, other: Vector) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }

    pub fn subtract(&mut self, other: Vector) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self
    }

    /// Per-axis multiply.
    pub fn multiply(&mut self, other: Vector) -> &mut Self {
        self.x *= other.x;
        self.y *= other.y;
        self.z *= other.z;
        self
    }

    pub fn multiply_scalar(&mut self, s: f64) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self.z *= s;
        self
    }

    /// Rotate about each axis in fixed order: Z, then Y, then X.
    pub fn rotate(&mut self, rotation: Vector) -> &mut Self {
        self.rotate_z(rotation.z);
        self.rotate_y(rotation.y);
        self.rotate_x(rotation.x);
        self
    }

    pub fn rotate_z(&mut self, angle: f64) {
        let (x, y) = rotate_pair(self.x, self.y, angle);
        self.x = x;
        self.y = y;
    }

    pub fn rotate_y(&mut self, angle: f64) {
        let (x, z) = rotate_pair(self.x, self.z, angle);
        self.x = x;
        self.z = z;
    }

    pub fn rotate_x(&mut self, angle: f64) {
        let (y, z) = rotate_pair(self.y, self.z, angle);
        self.y = y;
        self.z = z;
    }

    /// Full affine step: scale, rotate, translate. Order is fixed.
    pub fn transform(&mut self, translation: Vector, rotation: Vector, scale: Vector) -> &mut Self {
        self.multiply(scale);
        self.rotate(rotation);
        self.add(translation);
        self
    }

    pub fn lerp(&mut self, other: Vector, alpha: f64) -> &mut Self {
        self.x = lerp(self.x, other.x, alpha);
        self.y = lerp(self.y, other.y, alpha);
        self.z = lerp(self.z, other.z, alpha);
        self
    }

    pub fn magnitude(&self) -> f64 {
        magnitude_sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// Magnitude of the projection onto the xy drawing plane.
    pub fn magnitude_2d(&self) -> f64 {
        magnitude_sqrt(self.x * self.x + self.y * self.y)
    }

    /// Exact component equality, used for the self-closing-path check.
    pub fn is_same(&self, other: Vector) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z
    }
}

/// 2D rotation within one coordinate pair. An angle that is a multiple of a
/// full turn is a no-op and skipped.
fn rotate_pair(a: f64, b: f64, angle: f64) -> (f64, f64) {
    if angle == 0.0 || angle % TAU == 0.0 {
        return (a, b);
    }
    let cos = angle.cos();
    let sin = angle.sin();
    (a * cos - b * sin, b * cos + a * sin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_transform_order() {
        // scale then rotate then translate
        let mut v = Vector::new(1.0, 0.0, 0.0);
        v.transform(
            Vector::new(10.0, 0.0, 0.0),
            Vector::new(0.0, 0.0, TAU / 4.0),
            Vector::new(2.0, 1.0, 1.0),
        );
        assert_abs_diff_eq!(v.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_turn_is_skipped() {
        let v0 = Vector::new(0.3, -0.7, 1.2);
        let mut v = v0;
        v.rotate(Vector::new(TAU, TAU * 2.0, -TAU));
        // exact equality: the rotation must not have touched the components
        assert!(v.is_same(v0));
    }

    #[test]
    fn test_magnitude_fast_path() {
        let v = Vector::new(3.0, 4.0, 0.0);
        assert_abs_diff_eq!(v.magnitude(), 5.0);

        // a not-quite-exact unit vector still reports exactly 1
        let n = Vector::new(1.0 + 1e-10, 0.0, 0.0);
        assert_eq!(n.magnitude(), 1.0);
        assert_eq!(n.magnitude_2d(), 1.0);
    }

    #[test]
    fn test_lerp() {
        let mut v = Vector::new(0.0, 10.0, -4.0);
        v.lerp(Vector::new(1.0, 0.0, 4.0), 0.25);
        assert_abs_diff_eq!(v.x, 0.25);
        assert_abs_diff_eq!(v.y, 7.5);
        assert_abs_diff_eq!(v.z, -2.0);
    }

    #[test]
    fn test_modulo() {
        assert_abs_diff_eq!(modulo(-1.0, TAU), TAU - 1.0);
        assert_abs_diff_eq!(modulo(TAU + 1.0, TAU), 1.0);
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12349), 0.123);
        assert_eq!(round3(2.0006), 2.001);
    }
}
