//! Effect presets: pulse, spin and shatter.
//!
//! Presets only compute data for the engine and renderer (transform
//! strings, loop settings, piece rectangles). Creating elements and running
//! the animations stays with the host.

use std::f64::consts::PI;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{BoundingBox, Point};
use crate::matrix::{multiply, number_string, rotate, scale, translate, Matrix};
use crate::origin::{compose_around_point, OriginSpec};

/// Engine loop option: `false`, `true` (forever) or an explicit count.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LoopRepr", into = "LoopRepr")]
pub enum LoopSetting {
    Off,
    Infinite,
    Times(i64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LoopRepr {
    Flag(bool),
    Count(i64),
}

impl From<LoopRepr> for LoopSetting {
    fn from(r: LoopRepr) -> Self {
        match r {
            LoopRepr::Flag(false) => LoopSetting::Off,
            LoopRepr::Flag(true) => LoopSetting::Infinite,
            LoopRepr::Count(n) => LoopSetting::Times(n),
        }
    }
}

impl From<LoopSetting> for LoopRepr {
    fn from(l: LoopSetting) -> Self {
        match l {
            LoopSetting::Off => LoopRepr::Flag(false),
            LoopSetting::Infinite => LoopRepr::Flag(true),
            LoopSetting::Times(n) => LoopRepr::Count(n),
        }
    }
}

impl LoopSetting {
    /// Engine-adapter contract for repeat counts, kept exactly as the effect
    /// presets have always sent it:
    ///
    /// - `-1` → loop forever
    /// - `1`  → no loop
    /// - `n`  → `2n - 1` loops (each repeat is an out-and-back pair under
    ///   `alternate`)
    ///
    /// Other negative or zero counts go through the `2n - 1` branch unchanged.
    pub fn from_repeat_count(repeat_count: i32) -> Self {
        match repeat_count {
            -1 => LoopSetting::Infinite,
            1 => LoopSetting::Off,
            n => LoopSetting::Times(alternating_loops(n)),
        }
    }
}

#[inline]
fn alternating_loops(repeat_count: i32) -> i64 {
    i64::from(repeat_count) * 2 - 1
}

/// Easing curve name as understood by the engine (`"out(2)"` etc.).
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Ease {
    Linear,
    In(f64),
    Out(f64),
    InOut(f64),
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Ease::Linear => f.write_str("linear"),
            Ease::In(p) => write!(f, "in({})", number_string(p)),
            Ease::Out(p) => write!(f, "out({})", number_string(p)),
            Ease::InOut(p) => write!(f, "inOut({})", number_string(p)),
        }
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.to_string()
    }
}

impl TryFrom<String> for Ease {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let s = s.trim();
        if s == "linear" {
            return Ok(Ease::Linear);
        }
        let (name, rest) = s
            .split_once('(')
            .ok_or_else(|| format!("unknown ease '{s}'"))?;
        let power: f64 = rest
            .strip_suffix(')')
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| format!("bad ease power in '{s}'"))?;
        match name {
            "in" => Ok(Ease::In(power)),
            "out" => Ok(Ease::Out(power)),
            "inOut" => Ok(Ease::InOut(power)),
            _ => Err(format!("unknown ease '{s}'")),
        }
    }
}

/// Everything an engine needs to run one transform effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EffectAnimation {
    pub matrix: Matrix,
    /// `matrix(...)` string for the target's `transform`.
    pub transform: String,
    #[serde(rename = "loop")]
    pub loop_setting: LoopSetting,
    pub alternate: bool,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub ease: Ease,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseOptions {
    pub sx: f64,
    pub sy: f64,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub repeat_count: i32,
    pub ease: Ease,
}

impl Default for PulseOptions {
    fn default() -> Self {
        Self {
            sx: 1.1,
            sy: 1.1,
            duration_ms: 300.0,
            delay_ms: 0.0,
            repeat_count: 3,
            ease: Ease::Out(2.0),
        }
    }
}

/// Scale pulse pivoting on the bottom centre (`"50% 100%"`) of `bbox`.
///
/// Always alternates and always loops `2 * repeat_count - 1` times; unlike
/// [`spin`] there is no special case for `-1` or `1`.
pub fn pulse(bbox: &BoundingBox, opts: &PulseOptions) -> EffectAnimation {
    let pivot = OriginSpec::bottom_center().resolve(bbox);
    let matrix = compose_around_point(pivot, &scale(opts.sx, opts.sy));
    EffectAnimation {
        matrix,
        transform: matrix.to_string(),
        loop_setting: LoopSetting::Times(alternating_loops(opts.repeat_count)),
        alternate: true,
        duration_ms: opts.duration_ms,
        delay_ms: opts.delay_ms,
        ease: opts.ease,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinOptions {
    pub rotate: f64,
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub repeat_count: i32,
    pub ease: Ease,
}

impl Default for SpinOptions {
    fn default() -> Self {
        Self {
            rotate: 360.0,
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            duration_ms: 1000.0,
            delay_ms: 0.0,
            repeat_count: 1,
            ease: Ease::Out(1.0),
        }
    }
}

/// `rotate · translate(x, y) · scale(s)` about the local origin.
pub fn spin(opts: &SpinOptions) -> EffectAnimation {
    let mut matrix = rotate(opts.rotate);
    matrix = multiply(&matrix, &translate(opts.x, opts.y));
    matrix = multiply(&matrix, &scale(opts.scale, opts.scale));
    EffectAnimation {
        matrix,
        transform: matrix.to_string(),
        loop_setting: LoopSetting::from_repeat_count(opts.repeat_count),
        alternate: opts.repeat_count != 1,
        duration_ms: opts.duration_ms,
        delay_ms: opts.delay_ms,
        ease: opts.ease,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShatterOptions {
    pub rows: u32,
    pub cols: u32,
    pub duration_ms: f64,
}

impl Default for ShatterOptions {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            duration_ms: 1200.0,
        }
    }
}

/// One fragment of a shattered element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShatterPiece {
    pub row: u32,
    pub col: u32,
    /// Fragment rectangle in the same space as the source rect.
    pub rect: BoundingBox,
    /// Offset applied to the cloned content so the fragment shows its slice.
    pub clip_offset: Point,
    pub dx: f64,
    pub dy: f64,
    pub rotate_deg: f64,
}

impl ShatterPiece {
    pub fn start_transform(&self) -> String {
        "translate(0px, 0px) rotate(0deg)".to_string()
    }

    pub fn end_transform(&self) -> String {
        format!(
            "translate({}px, {}px) rotate({}deg)",
            number_string(self.dx),
            number_string(self.dy),
            number_string(self.rotate_deg)
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShatterPlan {
    pub pieces: Vec<ShatterPiece>,
    pub duration_ms: f64,
    pub easing: String,
}

/// Split `rect` into a `rows × cols` grid (row-major) and give each piece a
/// random fly-out direction, a distance in `[100, 300)` and a matching
/// rotation. Pieces fade from opacity 1 to 0.
pub fn shatter<R: Rng>(rect: &BoundingBox, opts: &ShatterOptions, rng: &mut R) -> ShatterPlan {
    let piece_w = rect.width / f64::from(opts.cols);
    let piece_h = rect.height / f64::from(opts.rows);
    let mut pieces = Vec::with_capacity((opts.rows as usize) * (opts.cols as usize));

    for row in 0..opts.rows {
        for col in 0..opts.cols {
            let (fx, fy) = (f64::from(col) * piece_w, f64::from(row) * piece_h);
            let angle = rng.gen::<f64>() * 2.0 * PI;
            let distance = 100.0 + rng.gen::<f64>() * 200.0;
            pieces.push(ShatterPiece {
                row,
                col,
                rect: BoundingBox::new(rect.x + fx, rect.y + fy, piece_w, piece_h),
                clip_offset: Point::new(-fx, -fy),
                dx: angle.cos() * distance,
                dy: angle.sin() * distance,
                rotate_deg: angle.to_degrees(),
            });
        }
    }

    ShatterPlan {
        pieces,
        duration_ms: opts.duration_ms,
        easing: "ease-out".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_string_round_trip() {
        for e in [Ease::Linear, Ease::Out(2.0), Ease::In(1.5), Ease::InOut(3.0)] {
            let s: String = e.into();
            assert_eq!(Ease::try_from(s).unwrap(), e);
        }
        assert!(Ease::try_from("bounce".to_string()).is_err());
        assert!(Ease::try_from("out(x)".to_string()).is_err());
    }

    #[test]
    fn loop_setting_serializes_like_engine_option() {
        assert_eq!(serde_json::to_string(&LoopSetting::Off).unwrap(), "false");
        assert_eq!(serde_json::to_string(&LoopSetting::Infinite).unwrap(), "true");
        assert_eq!(serde_json::to_string(&LoopSetting::Times(5)).unwrap(), "5");
        let back: LoopSetting = serde_json::from_str("true").unwrap();
        assert_eq!(back, LoopSetting::Infinite);
    }
}
