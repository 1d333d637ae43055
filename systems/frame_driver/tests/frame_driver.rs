use std::{cell::RefCell, rc::Rc, time::Duration};

use snail_run_core::{Action, ActionSet, Event, GenerationTuning, WorldTuning};
use snail_run_system_bootstrap::Bootstrap;
use snail_run_system_chunk_generation::{ChunkGenerator, Config as GeneratorConfig};
use snail_run_system_frame_driver::{
    Clock, Config, FrameDriver, FrameObserver, FrameSink, ManualClock, NullSink,
};
use snail_run_world::{query, scaffolding, World};

const FRAME: Duration = Duration::from_millis(16);

fn booted(seed: u64) -> (FrameDriver, World) {
    let tuning = WorldTuning::default();
    let generator = ChunkGenerator::new(GeneratorConfig::new(
        seed,
        GenerationTuning::default(),
        tuning.ground_y,
    ))
    .expect("default tuning is valid");
    let mut driver = FrameDriver::new(Config::from_tuning(&tuning), generator);
    let mut world = World::with_tuning(tuning.clone());
    let _ = driver.start(&mut world, &Bootstrap::from_tuning(&tuning));
    (driver, world)
}

#[derive(Default)]
struct RecordingSink {
    deltas: Vec<Duration>,
}

impl FrameSink for RecordingSink {
    fn present(&mut self, _world: &World, dt: Duration) {
        self.deltas.push(dt);
    }
}

#[test]
fn first_frame_has_zero_delta_and_long_frames_are_clamped() {
    let (mut driver, mut world) = booted(1);
    let mut sink = RecordingSink::default();
    let mut actions = ActionSet::empty();

    let first = driver.frame(&mut world, Duration::from_secs(3), &mut actions, &mut sink);
    assert_eq!(first.dt, Duration::ZERO);

    let second = driver.frame(
        &mut world,
        Duration::from_secs(3) + FRAME,
        &mut actions,
        &mut sink,
    );
    assert_eq!(second.dt, FRAME);

    let stalled = driver.frame(&mut world, Duration::from_secs(5), &mut actions, &mut sink);
    assert_eq!(stalled.dt, Duration::from_millis(50));

    let backwards = driver.frame(&mut world, Duration::from_secs(4), &mut actions, &mut sink);
    assert_eq!(backwards.dt, Duration::ZERO);

    assert_eq!(
        sink.deltas,
        vec![Duration::ZERO, FRAME, Duration::from_millis(50), Duration::ZERO]
    );
}

#[test]
fn pause_toggles_once_per_press_and_can_be_released() {
    let (mut driver, mut world) = booted(2);
    let mut clock = ManualClock::default();
    let mut actions = ActionSet::empty().with(Action::TogglePause);

    let paused = driver.frame(&mut world, clock.now(), &mut actions, &mut NullSink);
    assert!(!paused.simulated);
    assert!(query::is_paused(&world));
    assert!(!actions.contains(Action::TogglePause));
    assert_eq!(paused.events, vec![Event::PauseChanged { paused: true }]);

    let camera = query::camera_x(&world);
    let player = query::player(&world).clone();
    for _ in 0..10 {
        clock.advance(FRAME);
        actions.insert(Action::MoveRight);
        let report = driver.frame(&mut world, clock.now(), &mut actions, &mut NullSink);
        assert!(!report.simulated);
        assert!(report.events.is_empty());
    }
    assert_eq!(query::camera_x(&world), camera);
    assert_eq!(query::player(&world), &player);

    clock.advance(FRAME);
    actions.insert(Action::TogglePause);
    let resumed = driver.frame(&mut world, clock.now(), &mut actions, &mut NullSink);
    assert!(resumed.simulated);
    assert!(!query::is_paused(&world));
    assert_eq!(resumed.events[0], Event::PauseChanged { paused: false });
    assert!(query::camera_x(&world) > camera);
}

#[test]
fn streaming_restores_lookahead_within_one_frame() {
    let (mut driver, mut world) = booted(3);
    let tuning = query::tuning(&world).clone();
    let edge = query::frontier(&world).farthest_edge;
    scaffolding::advance_camera(&mut world, edge - 100.0);

    let report = driver.frame(&mut world, Duration::ZERO, &mut ActionSet::empty(), &mut NullSink);
    let appended = report
        .events
        .iter()
        .filter(|event| matches!(event, Event::ChunkAppended { .. }))
        .count();
    assert_eq!(appended, 12);
    assert!(query::frontier(&world).lead() >= tuning.lookahead_distance());
}

#[test]
fn camera_scrolls_and_terrain_keeps_up_over_a_long_run() {
    let (mut driver, mut world) = booted(4);
    let tuning = query::tuning(&world).clone();
    let mut clock = ManualClock::default();
    let mut previous_camera = query::camera_x(&world);

    for _ in 0..3_000 {
        clock.advance(FRAME);
        let mut actions = ActionSet::empty().with(Action::MoveRight);
        let _ = driver.frame(&mut world, clock.now(), &mut actions, &mut NullSink);

        let camera = query::camera_x(&world);
        assert!(camera >= previous_camera);
        previous_camera = camera;
        assert!(query::frontier(&world).lead() >= tuning.lookahead_distance());
    }
    assert!(previous_camera > 9_000.0);
}

#[derive(Default)]
struct Trace {
    phases: Vec<&'static str>,
    update_events: usize,
}

struct RecordingObserver {
    trace: Rc<RefCell<Trace>>,
}

impl FrameObserver for RecordingObserver {
    fn before_update(&mut self, _world: &World, _dt: Duration) {
        self.trace.borrow_mut().phases.push("before_update");
    }

    fn after_update(&mut self, _world: &World, events: &[Event]) {
        let mut trace = self.trace.borrow_mut();
        trace.phases.push("after_update");
        trace.update_events += events.len();
    }

    fn before_render(&mut self, _world: &World) {
        self.trace.borrow_mut().phases.push("before_render");
    }

    fn after_render(&mut self, _world: &World, _elapsed: Duration) {
        self.trace.borrow_mut().phases.push("after_render");
    }
}

#[test]
fn observers_wrap_each_phase_without_affecting_the_run() {
    let trace = Rc::new(RefCell::new(Trace::default()));
    let (mut observed, mut observed_world) = booted(9);
    observed.observe(RecordingObserver {
        trace: Rc::clone(&trace),
    });
    let (mut plain, mut plain_world) = booted(9);

    let mut clock = ManualClock::default();
    for frame in 0..120 {
        clock.advance(FRAME);
        let mut held = ActionSet::empty().with(Action::MoveRight);
        if frame % 30 == 0 {
            held.insert(Action::Jump);
        }
        let mut observed_actions = held;
        let mut plain_actions = held;
        let left = observed.frame(
            &mut observed_world,
            clock.now(),
            &mut observed_actions,
            &mut NullSink,
        );
        let right = plain.frame(&mut plain_world, clock.now(), &mut plain_actions, &mut NullSink);
        assert_eq!(left, right);
    }

    assert_eq!(query::player(&observed_world), query::player(&plain_world));
    let trace = trace.borrow();
    assert_eq!(
        &trace.phases[..4],
        &["before_update", "after_update", "before_render", "after_render"]
    );
    assert_eq!(trace.phases.len(), 120 * 4);
    assert!(trace.update_events >= 120);
}

#[test]
fn observers_skip_update_hooks_while_paused() {
    let trace = Rc::new(RefCell::new(Trace::default()));
    let (mut driver, mut world) = booted(10);
    driver.observe(RecordingObserver {
        trace: Rc::clone(&trace),
    });

    let mut actions = ActionSet::empty().with(Action::TogglePause);
    let _ = driver.frame(&mut world, Duration::ZERO, &mut actions, &mut NullSink);

    assert_eq!(
        trace.borrow().phases,
        vec!["before_render", "after_render"]
    );
}

#[test]
fn seeded_runs_replay_identically() {
    let run = |seed: u64| {
        let (mut driver, mut world) = booted(seed);
        let mut clock = ManualClock::default();
        let mut log = Vec::new();
        for frame in 0..600u32 {
            clock.advance(Duration::from_millis(u64::from(10 + frame % 9)));
            let mut actions = ActionSet::empty().with(Action::MoveRight);
            if frame % 45 == 0 {
                actions.insert(Action::Jump);
            }
            log.push(driver.frame(&mut world, clock.now(), &mut actions, &mut NullSink));
        }
        (log, query::player(&world).clone(), query::camera_x(&world))
    };

    assert_eq!(run(77), run(77));
}
