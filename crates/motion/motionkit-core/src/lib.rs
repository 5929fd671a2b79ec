//! motionkit core (engine-agnostic)
//!
//! Pure building blocks behind the animation playground:
//! - `matrix` / `origin`: 2×3 affine matrices and pivoted composition around
//!   a transform-origin spec, rendered as `matrix(a,b,c,d,e,f)`.
//! - `packing` / `timeline`: interval extraction, minimal row packing and
//!   bar layout for the visual timeline.
//! - `playback`: play/pause/reverse/scrub state machine over an external
//!   [`AnimationEngine`] with a cooperative per-frame progress poll.
//! - `effects`: pulse/spin/shatter presets.
//!
//! Adapters (wasm) own the engine handle and the frame loop; nothing here
//! touches the DOM.

pub mod config;
pub mod effects;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod matrix;
pub mod origin;
pub mod packing;
pub mod playback;
pub mod timeline;

// Re-exports for consumers (adapters)
pub use config::{Config, PlaybackConfig};
pub use effects::{
    pulse, shatter, spin, Ease, EffectAnimation, LoopSetting, PulseOptions, ShatterOptions,
    ShatterPiece, ShatterPlan, SpinOptions,
};
pub use engine::AnimationEngine;
pub use error::MotionError;
pub use geometry::{BoundingBox, Point};
pub use matrix::{multiply, rotate, scale, scale_uniform, to_transform_string, translate, Matrix};
pub use origin::{
    compose_around_origin, compose_around_point, resolve_origin, OriginSpec, OriginToken,
};
pub use packing::{max_concurrency, pack_rows, row_count, total_duration, Interval, RowAssignment};
pub use playback::{Direction, PlaybackController, PlaybackMode, PlaybackState};
pub use timeline::{
    checked_intervals, extract_intervals, BarLayout, Segment, Timeline, DEFAULT_PALETTE,
};
