//! 2×3 affine matrices in SVG `matrix(a,b,c,d,e,f)` layout.
//!
//! A [`Matrix`] stands for
//!
//! ```text
//! | a c e |
//! | b d f |
//! | 0 0 1 |
//! ```
//!
//! acting on column vectors. All constructors and [`multiply`] are pure and
//! total: NaN, infinities and singular matrices flow through untouched, so
//! callers that need sane output must check their inputs first.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    #[inline]
    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Map a point through the transform.
    #[inline]
    pub fn apply_to_point(&self, p: Point) -> Point {
        Point {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Matrix, eps: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(x, y)| (x - y).abs() <= eps)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix::IDENTITY
    }
}

impl From<[f64; 6]> for Matrix {
    fn from(m: [f64; 6]) -> Self {
        Matrix::new(m[0], m[1], m[2], m[3], m[4], m[5])
    }
}

impl From<Matrix> for [f64; 6] {
    fn from(m: Matrix) -> Self {
        m.to_array()
    }
}

/// Compose `m1 ∘ m2` (apply `m2`, then `m1`).
///
/// Associative but not commutative, so the argument order is part of the
/// contract.
pub fn multiply(m1: &Matrix, m2: &Matrix) -> Matrix {
    Matrix {
        a: m1.a * m2.a + m1.c * m2.b,
        b: m1.b * m2.a + m1.d * m2.b,
        c: m1.a * m2.c + m1.c * m2.d,
        d: m1.b * m2.c + m1.d * m2.d,
        e: m1.a * m2.e + m1.c * m2.f + m1.e,
        f: m1.b * m2.e + m1.d * m2.f + m1.f,
    }
}

pub fn translate(tx: f64, ty: f64) -> Matrix {
    Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty)
}

pub fn scale(sx: f64, sy: f64) -> Matrix {
    Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
}

/// Uniform scale, i.e. `scale(s, s)`.
#[inline]
pub fn scale_uniform(s: f64) -> Matrix {
    scale(s, s)
}

/// Rotation by `angle_deg` degrees. Positive angles turn clockwise on a
/// y-down surface (SVG/screen convention).
pub fn rotate(angle_deg: f64) -> Matrix {
    let rad = angle_deg.to_radians();
    let (sin, cos) = rad.sin_cos();
    Matrix::new(cos, sin, -sin, cos, 0.0, 0.0)
}

/// Render `matrix(a,b,c,d,e,f)` for a `transform` attribute. No rounding is
/// applied.
pub fn to_transform_string(m: &Matrix) -> String {
    m.to_string()
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("matrix(")?;
        for (i, v) in self.to_array().iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_number(f, *v)?;
        }
        f.write_str(")")
    }
}

/// Print numbers the way a browser stringifies them in the common cases:
/// integral values without a fractional part, `-0` as `0`, and the
/// `NaN`/`Infinity` spellings.
pub(crate) fn write_number(f: &mut impl fmt::Write, v: f64) -> fmt::Result {
    if v.is_nan() {
        f.write_str("NaN")
    } else if v.is_infinite() {
        f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" })
    } else if v == 0.0 {
        f.write_str("0")
    } else {
        write!(f, "{v}")
    }
}

pub(crate) fn number_string(v: f64) -> String {
    let mut s = String::new();
    // Writing into a String cannot fail.
    let _ = write_number(&mut s, v);
    s
}
