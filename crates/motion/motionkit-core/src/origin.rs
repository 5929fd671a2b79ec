//! Transform-origin resolution and pivoted composition.
//!
//! An origin spec is one or two whitespace-separated tokens in the spirit of
//! CSS `transform-origin`:
//!
//! - `N%`  → `box.origin + box.size * N / 100`
//! - `Npx` → `box.origin + N`
//! - `N`   → `box.origin + N` (user units, same as `px`)
//!
//! A single token is reused for the y axis. Extra tokens are ignored.
//!
//! **Percentages and offsets are measured from the bounding box's own
//! top-left corner, not from its centre.** `"50% 50%"` lands on the centre
//! only because it is half the size away from the corner; `"10 10"` is ten
//! units right of and below the corner.
//!
//! Tokens are read with `parseFloat` rules: the longest numeric prefix is
//! used and a token without one yields NaN. Nothing here fails; a malformed
//! token produces NaN coordinates that flow on into any matrix built from
//! them. Validate the spec upstream if that is not acceptable.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};
use crate::matrix::{multiply, translate, write_number, Matrix};

/// One axis of an origin spec.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum OriginToken {
    /// Fraction of the box size, in percent.
    Percent(f64),
    /// Explicit `px` offset from the box corner.
    Px(f64),
    /// Bare number, user units from the box corner.
    Units(f64),
}

impl OriginToken {
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        let value = parse_float_prefix(token);
        if token.ends_with('%') {
            OriginToken::Percent(value)
        } else if token.ends_with("px") {
            OriginToken::Px(value)
        } else {
            OriginToken::Units(value)
        }
    }

    /// Resolve against one axis of a box (`start` corner coordinate, `size`
    /// extent along that axis).
    #[inline]
    pub fn resolve(&self, start: f64, size: f64) -> f64 {
        match *self {
            OriginToken::Percent(p) => start + size * (p / 100.0),
            OriginToken::Px(v) | OriginToken::Units(v) => start + v,
        }
    }
}

impl fmt::Display for OriginToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            OriginToken::Percent(v) => {
                write_number(f, v)?;
                f.write_str("%")
            }
            OriginToken::Px(v) => {
                write_number(f, v)?;
                f.write_str("px")
            }
            OriginToken::Units(v) => write_number(f, v),
        }
    }
}

/// Parsed origin spec.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OriginSpec {
    pub x: OriginToken,
    pub y: OriginToken,
}

impl OriginSpec {
    /// Parse a spec. Never fails; see the module docs for NaN behaviour.
    pub fn parse(spec: &str) -> Self {
        let mut parts = spec.split_whitespace();
        // An empty spec behaves like parseFloat("") on both axes.
        let x = parts
            .next()
            .map(OriginToken::parse)
            .unwrap_or(OriginToken::Units(f64::NAN));
        let y = parts.next().map(OriginToken::parse).unwrap_or(x);
        Self { x, y }
    }

    /// `"50% 50%"`
    pub const fn center() -> Self {
        Self {
            x: OriginToken::Percent(50.0),
            y: OriginToken::Percent(50.0),
        }
    }

    /// `"50% 100%"`
    pub const fn bottom_center() -> Self {
        Self {
            x: OriginToken::Percent(50.0),
            y: OriginToken::Percent(100.0),
        }
    }

    /// Absolute pivot point for `bbox`, measured from its top-left corner.
    pub fn resolve(&self, bbox: &BoundingBox) -> Point {
        Point {
            x: self.x.resolve(bbox.x, bbox.width),
            y: self.y.resolve(bbox.y, bbox.height),
        }
    }
}

impl fmt::Display for OriginSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// Resolve `spec` against `bbox`. Offsets and percentages start at the box's
/// top-left corner, not its centre.
pub fn resolve_origin(bbox: &BoundingBox, spec: &str) -> Point {
    OriginSpec::parse(spec).resolve(bbox)
}

/// Make `transform` pivot around the point named by `spec` instead of the
/// local (0,0).
///
/// Result is `T(P) · transform · T(-P)`: the pivot translations wrap the
/// transform on both sides.
pub fn compose_around_origin(bbox: &BoundingBox, transform: &Matrix, spec: &str) -> Matrix {
    compose_around_point(resolve_origin(bbox, spec), transform)
}

pub fn compose_around_point(pivot: Point, transform: &Matrix) -> Matrix {
    let to_origin = translate(-pivot.x, -pivot.y);
    let back = translate(pivot.x, pivot.y);
    multiply(&back, &multiply(transform, &to_origin))
}

/// `parseFloat`-compatible prefix parse: leading whitespace is skipped, the
/// longest prefix that forms a decimal literal (or `Infinity`) is converted,
/// and NaN is returned when there is none.
pub fn parse_float_prefix(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let frac_digits = j - frac_start;
        if digits > 0 || frac_digits > 0 {
            i = j;
            digits += frac_digits;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    // The exponent only counts when at least one digit follows it.
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[..i].parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{rotate, scale};

    #[test]
    fn parse_float_prefix_matches_js() {
        assert_eq!(parse_float_prefix("50%"), 50.0);
        assert_eq!(parse_float_prefix("10px"), 10.0);
        assert_eq!(parse_float_prefix("  -2.5e1px"), -25.0);
        assert_eq!(parse_float_prefix(".5"), 0.5);
        assert_eq!(parse_float_prefix("7."), 7.0);
        assert_eq!(parse_float_prefix("3e"), 3.0);
        assert_eq!(parse_float_prefix("3e+"), 3.0);
        assert_eq!(parse_float_prefix("-Infinity%"), f64::NEG_INFINITY);
        assert!(parse_float_prefix("").is_nan());
        assert!(parse_float_prefix("px").is_nan());
        assert!(parse_float_prefix(".").is_nan());
        assert!(parse_float_prefix("-").is_nan());
        assert!(parse_float_prefix("abc").is_nan());
    }

    #[test]
    fn single_token_is_reused_for_y() {
        let spec = OriginSpec::parse("25%");
        assert_eq!(spec.x, OriginToken::Percent(25.0));
        assert_eq!(spec.y, OriginToken::Percent(25.0));
    }

    #[test]
    fn offsets_are_measured_from_corner() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(resolve_origin(&bbox, "0 0"), Point::new(10.0, 20.0));
        assert_eq!(resolve_origin(&bbox, "5px 7"), Point::new(15.0, 27.0));
        assert_eq!(resolve_origin(&bbox, "50%"), Point::new(60.0, 45.0));
        assert_eq!(resolve_origin(&bbox, "100% 0%"), Point::new(110.0, 20.0));
    }

    #[test]
    fn malformed_tokens_become_nan() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let p = resolve_origin(&bbox, "left 5");
        assert!(p.x.is_nan());
        assert_eq!(p.y, 5.0);
        let p = resolve_origin(&bbox, "");
        assert!(p.x.is_nan() && p.y.is_nan());
    }

    #[test]
    fn pivot_point_is_fixed() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0);
        let pivot = resolve_origin(&bbox, "50% 100%");
        for m in [rotate(33.0), scale(1.5, 0.5)] {
            let composed = compose_around_origin(&bbox, &m, "50% 100%");
            let mapped = composed.apply_to_point(pivot);
            assert!((mapped.x - pivot.x).abs() < 1e-9);
            assert!((mapped.y - pivot.y).abs() < 1e-9);
        }
    }

    #[test]
    fn display_round_trips_well_formed_specs() {
        for s in ["50% 100%", "10px 0", "0 0", "12.5% 3px"] {
            assert_eq!(OriginSpec::parse(s).to_string(), s);
        }
        assert_eq!(OriginSpec::bottom_center(), OriginSpec::parse("50% 100%"));
        assert_eq!(OriginSpec::center(), OriginSpec::parse("50%"));
    }
}
