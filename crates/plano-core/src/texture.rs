//! Gradient texture mapping
//!
//! A texture maps a source quadrilateral (3 defining points) onto a
//! destination quadrilateral on the drawn surface. The destination points
//! follow the owning shape through the transform pipeline each frame; the
//! affine matrix handed to backends is recomputed from the inverse of the
//! source coordinate matrix. Rasterizing the gradient itself is backend
//! work.

use glam::{DMat3, DVec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::math::Vector;

/// Gradient definition, in source-quad coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gradient {
    /// Linear gradient from (x1, y1) to (x2, y2).
    Linear { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Radial gradient from focal circle (fx, fy, fr) to outer (cx, cy, r).
    Radial { fx: f64, fy: f64, fr: f64, cx: f64, cy: f64, r: f64 },
}

impl Gradient {
    /// Implied size, used when no source quad is given. A zero extent on one
    /// axis borrows the other axis.
    fn size(&self) -> (f64, f64) {
        let (mut w, mut h) = match *self {
            Gradient::Linear { x1, y1, x2, y2 } => ((x2 - x1).abs(), (y2 - y1).abs()),
            Gradient::Radial { fx, fy, cx, cy, .. } => ((cx - fx).abs(), (cy - fy).abs()),
        };
        if w == 0.0 {
            w = h;
        }
        if h == 0.0 {
            h = w;
        }
        (w, h)
    }
}

/// One gradient color stop; `offset` in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(offset: f64, color: impl Into<String>) -> Self {
        Self { offset, color: color.into() }
    }
}

/// Source or destination quadrilateral, given as an axis-aligned rect or as
/// 3 explicit points (top-left, top-right, bottom-left).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Quad {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Points([Vector; 3]),
}

impl Quad {
    fn resolve(quad: Option<&Quad>, size: (f64, f64)) -> [Vector; 3] {
        match quad {
            None => rect_points(0.0, 0.0, size.0, size.1),
            Some(Quad::Rect { x, y, width, height }) => rect_points(*x, *y, *width, *height),
            Some(Quad::Points(points)) => *points,
        }
    }
}

fn rect_points(x: f64, y: f64, width: f64, height: f64) -> [Vector; 3] {
    [
        Vector::new(x, y, 0.0),
        Vector::new(x + width, y, 0.0),
        Vector::new(x, y + height, 0.0),
    ]
}

/// Options for [`crate::Scene::add_texture`].
#[derive(Debug, Clone)]
pub struct TextureOptions {
    pub gradient: Gradient,
    pub color_stops: Vec<ColorStop>,
    /// Source quad; defaults to the gradient's implied size at the origin.
    pub src: Option<Quad>,
    /// Destination quad on the shape; defaults like `src`.
    pub dst: Option<Quad>,
}

impl TextureOptions {
    pub fn new(gradient: Gradient) -> Self {
        Self { gradient, color_stops: Vec::new(), src: None, dst: None }
    }
}

/// A live texture instance. Destination points are render-space state,
/// recomputed every frame by the owning shape's reset/transform pass.
#[derive(Debug, Clone)]
pub struct Texture {
    pub id: Uuid,
    pub gradient: Gradient,
    pub color_stops: Vec<ColorStop>,
    src: [Vector; 3],
    dst: [Vector; 3],
    /// Inverse of [[x1, x2, x3], [y1, y2, y3], [1, 1, 1]] over `src`.
    src_inverse: DMat3,
    /// Render-space destination points for the current frame.
    points: [Vector; 3],
}

impl Texture {
    pub fn new(options: TextureOptions) -> Self {
        let size = options.gradient.size();
        let src = Quad::resolve(options.src.as_ref(), size);
        let dst = Quad::resolve(options.dst.as_ref(), size);
        let src_inverse = DMat3::from_cols(
            DVec3::new(src[0].x, src[0].y, 1.0),
            DVec3::new(src[1].x, src[1].y, 1.0),
            DVec3::new(src[2].x, src[2].y, 1.0),
        )
        .inverse();
        Self {
            id: Uuid::new_v4(),
            gradient: options.gradient,
            color_stops: options.color_stops,
            src,
            dst,
            src_inverse,
            points: dst,
        }
    }

    /// Source quad points, as resolved at construction.
    pub fn src_points(&self) -> &[Vector; 3] {
        &self.src
    }

    /// Destination quad points before any transform is applied.
    pub fn dst_points(&self) -> &[Vector; 3] {
        &self.dst
    }

    /// Fresh instance with the same definition and a new id.
    pub fn clone_instance(&self) -> Self {
        Self { id: Uuid::new_v4(), points: self.dst, ..self.clone() }
    }

    /// Restore destination points to their untransformed positions.
    pub(crate) fn reset(&mut self) {
        self.points = self.dst;
    }

    pub(crate) fn transform(&mut self, translation: Vector, rotation: Vector, scale: Vector) {
        for point in &mut self.points {
            point.transform(translation, rotation, scale);
        }
    }

    /// Affine matrix `[a, b, c, d, e, f]` mapping source coordinates to the
    /// current render-space destination quad.
    pub fn matrix(&self) -> [f64; 6] {
        let inv = self.src_inverse;
        let px = DVec3::new(self.points[0].x, self.points[1].x, self.points[2].x);
        let py = DVec3::new(self.points[0].y, self.points[1].y, self.points[2].y);
        [
            px.dot(inv.col(0)),
            py.dot(inv.col(0)),
            px.dot(inv.col(1)),
            py.dot(inv.col(1)),
            px.dot(inv.col(2)),
            py.dot(inv.col(2)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn options() -> TextureOptions {
        TextureOptions {
            gradient: Gradient::Linear { x1: 0.0, y1: 0.0, x2: 4.0, y2: 2.0 },
            color_stops: vec![ColorStop::new(0.0, "#e62"), ColorStop::new(1.0, "#636")],
            src: None,
            dst: None,
        }
    }

    #[test]
    fn test_identity_matrix_when_untransformed() {
        let texture = Texture::new(options());
        let m = texture.matrix();
        let expected = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        for (value, want) in m.iter().zip(expected) {
            assert_abs_diff_eq!(*value, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_translation_shows_up_in_matrix() {
        let mut texture = Texture::new(options());
        texture.reset();
        texture.transform(Vector::new(3.0, -1.0, 0.0), Vector::ZERO, Vector::ONE);
        let m = texture.matrix();
        assert_abs_diff_eq!(m[4], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[5], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_out_of_plane_rotation_keeps_translation_zero() {
        // the quad lies in the z = 0 plane, so a turn about y must not
        // bleed into the matrix translation terms
        let mut texture = Texture::new(options());
        texture.reset();
        texture.transform(
            Vector::ZERO,
            Vector { y: crate::math::TAU / 4.0, ..Vector::ZERO },
            Vector::ONE,
        );
        let m = texture.matrix();
        assert_abs_diff_eq!(m[4], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[5], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[3], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_shows_up_in_matrix() {
        let mut texture = Texture::new(options());
        texture.reset();
        texture.transform(Vector::ZERO, Vector::ZERO, Vector::new(2.0, 0.5, 1.0));
        let m = texture.matrix();
        assert_abs_diff_eq!(m[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m[3], 0.5, epsilon = 1e-12);
    }
}
