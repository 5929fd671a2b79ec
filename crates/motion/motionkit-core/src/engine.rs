//! Contract for the external animation engine the playback controller drives.
//!
//! The controller never builds an engine. Adapters (wasm, tests) hand in a
//! handle that is already configured with its duration, loop count and
//! targets. Calls are assumed synchronous and instantaneous.

pub trait AnimationEngine {
    fn play(&mut self);
    fn pause(&mut self);
    /// Flip the direction of time.
    fn reverse(&mut self);
    /// Jump back to the start and play.
    fn restart(&mut self);
    /// Move the playhead to `time_ms`.
    fn seek(&mut self, time_ms: f64);
    /// Playhead position in milliseconds.
    fn current_time(&self) -> f64;
}

impl<E: AnimationEngine + ?Sized> AnimationEngine for Box<E> {
    fn play(&mut self) {
        (**self).play();
    }

    fn pause(&mut self) {
        (**self).pause();
    }

    fn reverse(&mut self) {
        (**self).reverse();
    }

    fn restart(&mut self) {
        (**self).restart();
    }

    fn seek(&mut self, time_ms: f64) {
        (**self).seek(time_ms);
    }

    fn current_time(&self) -> f64 {
        (**self).current_time()
    }
}
