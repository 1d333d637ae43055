use std::{
    io,
    sync::{Arc, Mutex},
    time::Duration,
};

use snail_run_core::{Action, ActionSet, GenerationTuning, WorldTuning};
use snail_run_system_bootstrap::Bootstrap;
use snail_run_system_chunk_generation::{ChunkGenerator, Config as GeneratorConfig};
use snail_run_system_frame_driver::{
    Clock, Config, FrameDriver, ManualClock, NullSink, TracingObserver,
};
use snail_run_world::{query, World};
use tracing_subscriber::fmt::MakeWriter;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer is not poisoned");
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer is not poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLog {
    type Writer = CapturedLog;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

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

#[test]
fn tracing_observer_logs_each_phase_without_changing_the_run() {
    let log = CapturedLog::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(log.clone())
        .finish();

    let (mut traced, mut traced_world) = booted(21);
    traced.observe(TracingObserver);
    let (mut plain, mut plain_world) = booted(21);

    tracing::subscriber::with_default(subscriber, || {
        let mut clock = ManualClock::default();
        for frame in 0..90 {
            clock.advance(FRAME);
            let mut held = ActionSet::empty().with(Action::MoveRight);
            if frame % 30 == 0 {
                held.insert(Action::Jump);
            }
            let mut traced_actions = held;
            let mut plain_actions = held;
            let left = traced.frame(
                &mut traced_world,
                clock.now(),
                &mut traced_actions,
                &mut NullSink,
            );
            let right = plain.frame(&mut plain_world, clock.now(), &mut plain_actions, &mut NullSink);
            assert_eq!(left, right);
        }
    });

    assert_eq!(query::player(&traced_world), query::player(&plain_world));
    assert_eq!(query::camera_x(&traced_world), query::camera_x(&plain_world));

    let output = log.contents();
    assert!(output.contains("frame update"), "{output}");
    assert!(output.contains("frame rendered"), "{output}");
    assert!(output.contains("PlayerJumped"), "{output}");
}
