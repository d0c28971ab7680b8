use std::ops::Mul;

use crate::geometry::Point;

/// A 3x3 affine matrix
///
/// It is only possible to specify 6 out of the 9 possible values.
///
/// The full matrix is of the form:
///
/// [a b 0]
/// [c d 0]
/// [e f 1]
///
/// Points are row vectors, so `p * (m1 * m2)` applies `m1` first
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Mul<Matrix> for Matrix {
    type Output = Matrix;
    fn mul(self, other: Matrix) -> Self::Output {
        let a = self.a * other.a + self.b * other.c;
        let b = self.a * other.b + self.b * other.d;

        let c = self.c * other.a + self.d * other.c;
        let d = self.c * other.b + self.d * other.d;

        let e = self.e * other.a + self.f * other.c + other.e;
        let f = self.e * other.b + self.f * other.d + other.f;

        Matrix::new(a, b, c, d, e, f)
    }
}

impl Mul<Point> for Matrix {
    type Output = Point;

    fn mul(self, other: Point) -> Self::Output {
        let x = self.a * other.x + self.c * other.y + self.e;
        let y = self.b * other.x + self.d * other.y + self.f;

        Point::new(x, y)
    }
}

impl Matrix {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Matrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub const fn new_translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    pub fn new_scale(x: f32, y: f32) -> Self {
        Self::new(x, 0.0, 0.0, y, 0.0, 0.0)
    }

    /// The conventional 1/1000 glyph space of Type 1 and CFF fonts
    pub const fn default_font_matrix() -> Self {
        Self::new(0.001, 0.0, 0.0, 0.001, 0.0, 0.0)
    }

    pub fn from_arr(arr: [f32; 6]) -> Self {
        let [a, b, c, d, e, f] = arr;
        Self { a, b, c, d, e, f }
    }

    /// `None` for a singular matrix
    pub fn inverse(&self) -> Option<Matrix> {
        let det = self.a * self.d - self.b * self.c;

        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;

        let e = -(self.e * a + self.f * c);
        let f = -(self.e * b + self.f * d);

        Some(Matrix::new(a, b, c, d, e, f))
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn multiplication_applies_left_operand_first() {
        let scale = Matrix::new_scale(2.0, 2.0);
        let translate = Matrix::new_translation(10.0, 0.0);

        let p = (scale * translate) * Point::new(1.0, 1.0);
        assert_eq!(p, Point::new(12.0, 2.0));

        let p = (translate * scale) * Point::new(1.0, 1.0);
        assert_eq!(p, Point::new(22.0, 2.0));
    }

    #[test]
    fn inverse_undoes_the_matrix() {
        let m = Matrix::new_scale(2.0, 4.0) * Matrix::new_translation(3.0, 5.0);
        let p = Point::new(7.0, -1.0);

        assert_eq!((m * m.inverse().unwrap()) * p, p);
        assert_eq!(Matrix::new_scale(0.0, 1.0).inverse(), None);
    }
}
