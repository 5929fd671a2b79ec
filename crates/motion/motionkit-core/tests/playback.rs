use std::cell::RefCell;
use std::rc::Rc;

use motionkit_core::{
    AnimationEngine, Interval, MotionError, PlaybackConfig, PlaybackController, PlaybackMode,
    Timeline,
};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    Play,
    Pause,
    Reverse,
    Restart,
    Seek(f64),
}

/// Engine double that records calls into a shared log and advances time
/// only when told to.
#[derive(Clone, Default)]
struct Recorder {
    calls: Rc<RefCell<Vec<Call>>>,
    time: Rc<RefCell<f64>>,
}

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    fn advance_to(&self, t: f64) {
        *self.time.borrow_mut() = t;
    }
}

impl AnimationEngine for Recorder {
    fn play(&mut self) {
        self.calls.borrow_mut().push(Call::Play);
    }
    fn pause(&mut self) {
        self.calls.borrow_mut().push(Call::Pause);
    }
    fn reverse(&mut self) {
        self.calls.borrow_mut().push(Call::Reverse);
    }
    fn restart(&mut self) {
        *self.time.borrow_mut() = 0.0;
        self.calls.borrow_mut().push(Call::Restart);
    }
    fn seek(&mut self, time_ms: f64) {
        *self.time.borrow_mut() = time_ms;
        self.calls.borrow_mut().push(Call::Seek(time_ms));
    }
    fn current_time(&self) -> f64 {
        *self.time.borrow()
    }
}

fn setup(width: f64, duration: f64) -> (Recorder, PlaybackController<Recorder>) {
    let engine = Recorder::default();
    let cfg = PlaybackConfig {
        scrub_width: width,
        auto_poll: true,
    };
    let ctl = PlaybackController::new(engine.clone(), duration, &cfg);
    (engine, ctl)
}

#[test]
fn pointer_down_pauses_before_seeking() {
    let (engine, mut ctl) = setup(200.0, 800.0);
    ctl.play().unwrap();
    engine.clear();

    let t = ctl.on_pointer_down(100.0).unwrap();
    assert_eq!(t, 400.0);
    assert_eq!(engine.calls(), vec![Call::Pause, Call::Seek(400.0)]);
    assert_eq!(ctl.state().mode, PlaybackMode::Seeking);
    assert!(ctl.state().dragging);
}

#[test]
fn drag_follows_pointer_and_release_stays_paused() {
    let (engine, mut ctl) = setup(200.0, 800.0);
    ctl.play().unwrap();
    ctl.on_pointer_down(0.0).unwrap();
    engine.clear();

    assert_eq!(ctl.on_pointer_move(50.0).unwrap(), Some(200.0));
    assert_eq!(ctl.on_pointer_move(400.0).unwrap(), Some(800.0));
    assert_eq!(ctl.on_pointer_move(-10.0).unwrap(), Some(0.0));
    ctl.on_pointer_up();

    assert_eq!(
        engine.calls(),
        vec![Call::Seek(200.0), Call::Seek(800.0), Call::Seek(0.0)]
    );
    assert_eq!(ctl.state().mode, PlaybackMode::Paused);
    assert!(!ctl.state().dragging);
    // no implicit resume
    assert!(!engine.calls().contains(&Call::Play));
    assert!(!engine.calls().contains(&Call::Restart));
    assert_eq!(ctl.on_pointer_move(100.0).unwrap(), None);
}

#[test]
fn play_restarts_and_is_idempotent() {
    let (engine, mut ctl) = setup(100.0, 1000.0);
    ctl.play().unwrap();
    ctl.play().unwrap();
    assert_eq!(engine.calls(), vec![Call::Restart]);
    assert_eq!(ctl.state().mode, PlaybackMode::Playing);

    ctl.pause().unwrap();
    assert_eq!(ctl.state().mode, PlaybackMode::Paused);
    ctl.play().unwrap();
    assert_eq!(
        engine.calls(),
        vec![Call::Restart, Call::Pause, Call::Restart]
    );
}

#[test]
fn pause_during_drag_keeps_seeking() {
    let (_engine, mut ctl) = setup(100.0, 1000.0);
    ctl.on_pointer_down(10.0).unwrap();
    ctl.pause().unwrap();
    assert_eq!(ctl.state().mode, PlaybackMode::Seeking);
    ctl.on_pointer_up();
    assert_eq!(ctl.state().mode, PlaybackMode::Paused);
}

#[test]
fn reverse_forwards_to_engine() {
    let (engine, mut ctl) = setup(100.0, 1000.0);
    ctl.reverse().unwrap();
    assert_eq!(engine.calls(), vec![Call::Reverse]);
    assert_eq!(ctl.state().mode, PlaybackMode::Idle);
}

#[test]
fn frames_report_progress_until_stopped() {
    let (engine, mut ctl) = setup(100.0, 800.0);
    ctl.play().unwrap();

    engine.advance_to(200.0);
    assert_eq!(ctl.on_frame().unwrap(), Some(0.25));
    engine.advance_to(800.0);
    assert_eq!(ctl.on_frame().unwrap(), Some(1.0));
    assert_eq!(ctl.state().current_time, 800.0);

    ctl.stop_polling();
    engine.advance_to(400.0);
    assert_eq!(ctl.on_frame().unwrap(), None);
    assert_eq!(ctl.state().current_time, 800.0);

    ctl.start_polling();
    assert_eq!(ctl.on_frame().unwrap(), Some(0.5));
}

#[test]
fn zero_duration_reports_zero_progress() {
    let (engine, mut ctl) = setup(100.0, 0.0);
    engine.advance_to(50.0);
    assert_eq!(ctl.on_frame().unwrap(), Some(0.0));
    assert_eq!(ctl.on_pointer_down(50.0).unwrap(), 0.0);
}

#[test]
fn teardown_detaches_engine() {
    let (_engine, mut ctl) = setup(100.0, 1000.0);
    assert!(ctl.teardown().is_some());
    assert!(!ctl.is_attached());
    assert!(!ctl.is_polling());
    assert_eq!(ctl.on_frame().unwrap(), None);

    let err = ctl.play().unwrap_err();
    assert_eq!(err, MotionError::EngineDetached { operation: "play" });
    assert_eq!(err.category(), "playback");
    assert!(matches!(
        ctl.on_pointer_down(10.0),
        Err(MotionError::EngineDetached { .. })
    ));
    ctl.start_polling();
    assert!(matches!(
        ctl.on_frame(),
        Err(MotionError::EngineDetached { operation: "frame" })
    ));
    assert!(ctl.teardown().is_none());
}

#[test]
fn controller_takes_duration_from_timeline() {
    let tl = Timeline::from_source(vec![
        Interval::new(0.0, 300.0),
        Interval::new(100.0, 400.0),
        Interval::new(400.0, 600.0),
    ]);
    let cfg = PlaybackConfig {
        scrub_width: 300.0,
        auto_poll: false,
    };
    let mut ctl = PlaybackController::for_timeline(Recorder::default(), &tl, &cfg);
    assert_eq!(ctl.duration(), 600.0);
    assert!(!ctl.is_polling());
    assert_eq!(ctl.on_pointer_down(150.0).unwrap(), 300.0);

    ctl.set_scrub_width(600.0);
    assert_eq!(ctl.on_pointer_move(150.0).unwrap(), Some(150.0));
}
