//! 2D affine math.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2D {
    pub x: f32,
    pub y: f32,
}

impl Vec2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Column-major 2x3 affine matrix `[xx, xy, yx, yy, tx, ty]`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mat2D(pub [f32; 6]);

impl Default for Mat2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat2D {
    pub const IDENTITY: Mat2D = Mat2D([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn from_translate(x: f32, y: f32) -> Self {
        Mat2D([1.0, 0.0, 0.0, 1.0, x, y])
    }

    /// Translation, then rotation (radians), then scale.
    pub fn compose(x: f32, y: f32, rotation: f32, scale_x: f32, scale_y: f32) -> Self {
        if rotation == 0.0 {
            return Mat2D([scale_x, 0.0, 0.0, scale_y, x, y]);
        }
        let (sin, cos) = rotation.sin_cos();
        Mat2D([cos * scale_x, sin * scale_x, -sin * scale_y, cos * scale_y, x, y])
    }

    #[inline]
    pub fn translation(&self) -> Vec2D {
        Vec2D::new(self.0[4], self.0[5])
    }

    pub fn transform(&self, point: Vec2D) -> Vec2D {
        let m = &self.0;
        Vec2D::new(
            m[0] * point.x + m[2] * point.y + m[4],
            m[1] * point.x + m[3] * point.y + m[5],
        )
    }

    pub fn invert(&self) -> Option<Mat2D> {
        let [a, b, c, d, tx, ty] = self.0;
        let det = a * d - b * c;
        if det == 0.0 {
            return None;
        }
        let inv = 1.0 / det;
        Some(Mat2D([
            d * inv,
            -b * inv,
            -c * inv,
            a * inv,
            (c * ty - d * tx) * inv,
            (b * tx - a * ty) * inv,
        ]))
    }
}

impl Mul for Mat2D {
    type Output = Mat2D;

    fn mul(self, rhs: Mat2D) -> Mat2D {
        let a = &self.0;
        let b = &rhs.0;
        Mat2D([
            a[0] * b[0] + a[2] * b[1],
            a[1] * b[0] + a[3] * b[1],
            a[0] * b[2] + a[2] * b[3],
            a[1] * b[2] + a[3] * b[3],
            a[0] * b[4] + a[2] * b[5] + a[4],
            a[1] * b[4] + a[3] * b[5] + a[5],
        ])
    }
}
