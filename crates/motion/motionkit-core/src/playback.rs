//! Playback/seek controller.
//!
//! Wraps an external [`AnimationEngine`] handle and a pointer-drag scrub bar:
//!
//! ```text
//! Idle ──play──▶ Playing ◀──play/pause──▶ Paused
//!                   │                        ▲
//!              pointer down             pointer up
//!                   ▼                        │
//!                Seeking ────────────────────┘
//! ```
//!
//! `Seeking` always pauses the engine before the first seek and is left via
//! pointer-up into `Paused`; playback is not resumed automatically.
//!
//! The progress readout is a cooperative per-frame poll: the host calls
//! [`PlaybackController::on_frame`] once per animation frame until
//! [`PlaybackController::stop_polling`] or [`PlaybackController::teardown`].

use serde::{Deserialize, Serialize};

use crate::config::PlaybackConfig;
use crate::engine::AnimationEngine;
use crate::error::MotionError;
use crate::timeline::Timeline;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackMode {
    #[default]
    Idle,
    Playing,
    Paused,
    /// Pointer is down on the scrub bar; the engine is paused.
    Seeking,
}

impl PlaybackMode {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Seeking => "seeking",
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    #[inline]
    pub fn flipped(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Controller-owned playback state. Read it through
/// [`PlaybackController::state`]; only controller operations change it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    pub mode: PlaybackMode,
    /// Last time read from or sent to the engine, in milliseconds.
    pub current_time: f64,
    pub dragging: bool,
    pub direction: Direction,
    pub polling: bool,
}

#[derive(Debug)]
pub struct PlaybackController<E> {
    engine: Option<E>,
    state: PlaybackState,
    /// Timeline length used for pointer → time and time → progress mapping.
    duration: f64,
    scrub_width: f64,
}

impl<E: AnimationEngine> PlaybackController<E> {
    pub fn new(engine: E, duration: f64, cfg: &PlaybackConfig) -> Self {
        let state = PlaybackState {
            polling: cfg.auto_poll,
            ..PlaybackState::default()
        };
        Self {
            engine: Some(engine),
            state,
            duration,
            scrub_width: cfg.scrub_width,
        }
    }

    /// Build a controller whose duration is the packed timeline's total.
    pub fn for_timeline(engine: E, timeline: &Timeline, cfg: &PlaybackConfig) -> Self {
        Self::new(engine, timeline.total_duration(), cfg)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
    }

    pub fn scrub_width(&self) -> f64 {
        self.scrub_width
    }

    /// Update the scrub bar width after the host re-measures it.
    pub fn set_scrub_width(&mut self, width: f64) {
        self.scrub_width = width;
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.engine.is_some()
    }

    /// Attach a (new) engine handle, returning the previous one.
    pub fn attach(&mut self, engine: E) -> Option<E> {
        self.engine.replace(engine)
    }

    fn engine_mut(&mut self, operation: &'static str) -> Result<&mut E, MotionError> {
        match self.engine.as_mut() {
            Some(engine) => Ok(engine),
            None => {
                log::warn!("playback {operation} ignored: engine detached");
                Err(MotionError::EngineDetached { operation })
            }
        }
    }

    fn set_mode(&mut self, mode: PlaybackMode) {
        if self.state.mode != mode {
            log::debug!(
                "playback {} -> {}",
                self.state.mode.name(),
                mode.name()
            );
            self.state.mode = mode;
        }
    }

    /// Restart from the beginning unless already playing.
    pub fn play(&mut self) -> Result<(), MotionError> {
        if self.state.mode == PlaybackMode::Playing {
            return Ok(());
        }
        self.engine_mut("play")?.restart();
        self.state.dragging = false;
        self.set_mode(PlaybackMode::Playing);
        Ok(())
    }

    /// Pause the engine. During a drag the controller stays in `Seeking`
    /// until pointer-up.
    pub fn pause(&mut self) -> Result<(), MotionError> {
        self.engine_mut("pause")?.pause();
        if self.state.mode != PlaybackMode::Seeking {
            self.set_mode(PlaybackMode::Paused);
        }
        Ok(())
    }

    /// Flip the engine's time direction. The mode is left untouched.
    pub fn reverse(&mut self) -> Result<(), MotionError> {
        self.engine_mut("reverse")?.reverse();
        self.state.direction = self.state.direction.flipped();
        log::debug!("playback direction {:?}", self.state.direction);
        Ok(())
    }

    /// Map a pointer x-offset on the scrub bar to a timeline time.
    ///
    /// The offset is clamped to `[0, width]`. An unset (non-positive or
    /// non-finite) width, or a NaN offset, maps to time 0.
    pub fn seek_time_for(&self, x: f64) -> f64 {
        if !(self.scrub_width.is_finite() && self.scrub_width > 0.0) {
            return 0.0;
        }
        let fraction = (x / self.scrub_width).clamp(0.0, 1.0);
        if fraction.is_nan() {
            return 0.0;
        }
        fraction * self.duration
    }

    fn seek_to_pointer(&mut self, x: f64, operation: &'static str) -> Result<f64, MotionError> {
        let time = self.seek_time_for(x);
        self.engine_mut(operation)?.seek(time);
        self.state.current_time = time;
        Ok(time)
    }

    /// Start a scrub: pause, then seek to the pointer. Returns the seek time.
    pub fn on_pointer_down(&mut self, x: f64) -> Result<f64, MotionError> {
        let time = self.seek_time_for(x);
        let engine = self.engine_mut("pointer_down")?;
        // pause strictly before seek so the engine never seeks while playing
        engine.pause();
        engine.seek(time);
        self.state.current_time = time;
        self.state.dragging = true;
        self.set_mode(PlaybackMode::Seeking);
        Ok(time)
    }

    /// Follow the pointer while dragging. Returns `None` when no drag is
    /// active and nothing was sent to the engine.
    pub fn on_pointer_move(&mut self, x: f64) -> Result<Option<f64>, MotionError> {
        if self.state.mode != PlaybackMode::Seeking || !self.state.dragging {
            return Ok(None);
        }
        self.seek_to_pointer(x, "pointer_move").map(Some)
    }

    /// End a scrub. Leaves the engine paused.
    pub fn on_pointer_up(&mut self) {
        self.state.dragging = false;
        if self.state.mode == PlaybackMode::Seeking {
            self.set_mode(PlaybackMode::Paused);
        }
    }

    pub fn start_polling(&mut self) {
        self.state.polling = true;
    }

    pub fn stop_polling(&mut self) {
        if self.state.polling {
            log::debug!("progress polling stopped");
        }
        self.state.polling = false;
    }

    pub fn is_polling(&self) -> bool {
        self.state.polling
    }

    /// Per-frame poll: read the engine's current time and return progress as
    /// `current_time / duration` (`0` for an empty timeline). Returns `None`
    /// once polling has stopped.
    pub fn on_frame(&mut self) -> Result<Option<f64>, MotionError> {
        if !self.state.polling {
            return Ok(None);
        }
        let time = self.engine_mut("frame")?.current_time();
        self.state.current_time = time;
        Ok(Some(self.progress()))
    }

    /// Progress for the last known time, without touching the engine.
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            self.state.current_time / self.duration
        } else {
            0.0
        }
    }

    /// Stop polling and release the engine handle. Later engine operations
    /// fail with [`MotionError::EngineDetached`].
    pub fn teardown(&mut self) -> Option<E> {
        self.stop_polling();
        self.state.dragging = false;
        let engine = self.engine.take();
        if engine.is_some() {
            log::debug!("playback controller torn down");
        }
        engine
    }
}
