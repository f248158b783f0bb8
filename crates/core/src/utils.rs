//! Geometric helpers for text-space math.
//!
//! Provides the affine transform used throughout the interpreter:
//! - `Matrix3`, a 3x3 homogeneous 2-D transform
//! - Rectangle helpers for optional media-box filtering

/// Small epsilon for floating-point comparisons.
pub const EPSILON: f64 = 1e-9;

/// A 2D point (x, y).
pub type Point = (f64, f64);

/// A rectangle defined by (x0, y0, x1, y1) where (x0, y0) is typically bottom-left
/// and (x1, y1) is top-right.
pub type Rect = (f64, f64, f64, f64);

/// Compares two floats for approximate equality.
#[inline]
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

/// A 2-D affine transform in homogeneous coordinates.
///
/// Rows are laid out as
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
/// and points are row vectors, so `(x, y)` maps to `(ax + cy + e, bx + dy + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3 {
    rows: [[f64; 3]; 3],
}

/// Identity transformation matrix.
pub const MATRIX_IDENTITY: Matrix3 = Matrix3 {
    rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
};

impl Matrix3 {
    /// The neutral element of `compose`.
    pub const fn identity() -> Self {
        MATRIX_IDENTITY
    }

    /// Builds a matrix from the six PDF components `a b c d e f`.
    pub const fn from_components(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self {
            rows: [[a, b, 0.0], [c, d, 0.0], [e, f, 1.0]],
        }
    }

    /// Builds a matrix from raw rows. The last column is taken as given.
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    pub const fn translation(dx: f64, dy: f64) -> Self {
        Self::from_components(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Per-glyph rendering matrix built from font size, horizontal scale and rise.
    ///
    /// `horizontal_scale` is the state's percentage value; the horizontal
    /// factor applied is `1 + horizontal_scale / 100`.
    pub fn text_rendering_matrix(font_size: f64, horizontal_scale: f64, rise: f64) -> Self {
        let h = 1.0 + horizontal_scale / 100.0;
        Self::from_components(font_size * h, 0.0, 0.0, font_size, 0.0, rise)
    }

    /// Returns the transform that applies `self` first, then `then`.
    ///
    /// With row vectors this is the plain product `self * then`.
    pub fn compose(&self, then: &Matrix3) -> Matrix3 {
        let a = &self.rows;
        let b = &then.rows;
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0].mul_add(b[0][j], a[i][1].mul_add(b[1][j], a[i][2] * b[2][j]));
            }
        }
        Matrix3 { rows }
    }

    pub const fn rows(&self) -> &[[f64; 3]; 3] {
        &self.rows
    }

    /// The six PDF components `(a, b, c, d, e, f)`.
    pub const fn components(&self) -> (f64, f64, f64, f64, f64, f64) {
        let r = &self.rows;
        (r[0][0], r[0][1], r[1][0], r[1][1], r[2][0], r[2][1])
    }

    /// Translation row `(e, f)`.
    pub const fn translation_part(&self) -> Point {
        (self.rows[2][0], self.rows[2][1])
    }

    /// Applies the transform to a point.
    pub fn apply_point(&self, (x, y): Point) -> Point {
        let (a, b, c, d, e, f) = self.components();
        (a.mul_add(x, c.mul_add(y, e)), b.mul_add(x, d.mul_add(y, f)))
    }

    /// Element-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &Matrix3, epsilon: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(l, r)| approx_eq(*l, *r, epsilon))
    }
}

impl Default for Matrix3 {
    fn default() -> Self {
        MATRIX_IDENTITY
    }
}

/// Whether `pt` lies inside `rect` (edges inclusive). The rectangle may be
/// given with its corners in either order.
pub fn rect_contains(rect: Rect, (x, y): Point) -> bool {
    let (x0, y0, x1, y1) = rect;
    let (lo_x, hi_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
    let (lo_y, hi_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
    (lo_x..=hi_x).contains(&x) && (lo_y..=hi_y).contains(&y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_moves_origin() {
        let m = Matrix3::translation(3.0, -4.0);
        assert_eq!(m.apply_point((0.0, 0.0)), (3.0, -4.0));
        assert_eq!(m.translation_part(), (3.0, -4.0));
    }

    #[test]
    fn test_compose_applies_left_first() {
        let scale = Matrix3::from_components(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let shift = Matrix3::translation(10.0, 0.0);
        // scale then shift
        assert_eq!(scale.compose(&shift).apply_point((1.0, 1.0)), (12.0, 2.0));
        // shift then scale
        assert_eq!(shift.compose(&scale).apply_point((1.0, 1.0)), (22.0, 2.0));
    }

    #[test]
    fn test_rect_contains_unordered_corners() {
        assert!(rect_contains((10.0, 10.0, 0.0, 0.0), (5.0, 5.0)));
        assert!(rect_contains((0.0, 0.0, 10.0, 10.0), (10.0, 0.0)));
        assert!(!rect_contains((0.0, 0.0, 10.0, 10.0), (10.5, 0.0)));
    }
}
