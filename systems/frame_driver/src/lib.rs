#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver sequencing input, simulation, streaming and presentation.
//!
//! Every frame computes a clamped delta from the host timestamp, consumes a
//! pause toggle, advances the world when it is not paused, tops up terrain
//! through the streaming policy, and finally hands the world to a
//! [`FrameSink`] for presentation. Observers are notified around each phase.

mod clock;
mod observer;

use std::time::{Duration, Instant};

use snail_run_core::{Action, ActionSet, Command, Event, WorldTuning};
use snail_run_system_bootstrap::Bootstrap;
use snail_run_system_chunk_generation::ChunkGenerator;
use snail_run_system_streaming::{Config as StreamingConfig, Streaming};
use snail_run_world::{self as world, query, World};

pub use clock::{Clock, ManualClock, SystemClock};
pub use observer::{FrameObserver, TracingObserver};

/// Consumer of the world once a frame has been simulated, typically a renderer.
pub trait FrameSink {
    /// Presents the world state for a frame that advanced by `dt`.
    fn present(&mut self, world: &World, dt: Duration);
}

/// Sink that discards frames. Used by headless runs.
#[derive(Debug, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _world: &World, _dt: Duration) {}
}

/// Configuration parameters required to construct the frame driver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    max_frame_dt: Duration,
    streaming: StreamingConfig,
}

impl Config {
    /// Creates a configuration from an explicit delta ceiling and streaming policy.
    #[must_use]
    pub const fn new(max_frame_dt: Duration, streaming: StreamingConfig) -> Self {
        Self {
            max_frame_dt,
            streaming,
        }
    }

    /// Derives the configuration from the world tuning.
    #[must_use]
    pub fn from_tuning(tuning: &WorldTuning) -> Self {
        Self::new(
            tuning.physics.max_frame_dt(),
            StreamingConfig::from_tuning(tuning),
        )
    }
}

/// Summary of one driven frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameReport {
    /// Clamped delta forwarded to the simulation.
    pub dt: Duration,
    /// Whether the simulation step ran.
    pub simulated: bool,
    /// Events emitted by the world during the frame.
    pub events: Vec<Event>,
}

/// Drives the world one frame at a time.
pub struct FrameDriver {
    max_frame_dt: Duration,
    previous_frame: Option<Duration>,
    generator: ChunkGenerator,
    streaming: Streaming,
    observers: Vec<Box<dyn FrameObserver>>,
    commands: Vec<Command>,
}

impl std::fmt::Debug for FrameDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriver")
            .field("max_frame_dt", &self.max_frame_dt)
            .field("previous_frame", &self.previous_frame)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl FrameDriver {
    /// Creates a driver owning the chunk generator used for streaming.
    #[must_use]
    pub fn new(config: Config, generator: ChunkGenerator) -> Self {
        Self {
            max_frame_dt: config.max_frame_dt,
            previous_frame: None,
            generator,
            streaming: Streaming::new(config.streaming),
            observers: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Registers an observer notified around every frame phase.
    pub fn observe<O>(&mut self, observer: O)
    where
        O: FrameObserver + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Populates a fresh world with its initial terrain and spawns the player.
    pub fn start(&mut self, world: &mut World, bootstrap: &Bootstrap) -> Vec<Event> {
        bootstrap.populate(&mut self.generator, &mut self.commands);
        let mut events = Vec::new();
        for command in self.commands.drain(..) {
            world::apply(world, command, &mut events);
        }
        tracing::info!(
            chunks = query::chunk_count(world),
            farthest_edge = query::frontier(world).farthest_edge,
            "world populated"
        );
        events
    }

    /// Runs one frame at host timestamp `now`.
    ///
    /// A pending [`Action::TogglePause`] is consumed from `actions` whether or
    /// not the world is currently paused.
    pub fn frame<S>(
        &mut self,
        world: &mut World,
        now: Duration,
        actions: &mut ActionSet,
        sink: &mut S,
    ) -> FrameReport
    where
        S: FrameSink + ?Sized,
    {
        let dt = self.advance_time(now);
        let mut events = Vec::new();

        if actions.take(Action::TogglePause) {
            world::apply(world, Command::TogglePause, &mut events);
            tracing::info!(paused = query::is_paused(world), "pause toggled");
        }

        let simulated = !query::is_paused(world);
        if simulated {
            for observer in &mut self.observers {
                observer.before_update(world, dt);
            }

            let update_start = events.len();
            world::apply(
                world,
                Command::Tick {
                    dt,
                    now,
                    actions: *actions,
                },
                &mut events,
            );
            self.stream(world, &mut events);

            for observer in &mut self.observers {
                observer.after_update(world, &events[update_start..]);
            }
        }

        for observer in &mut self.observers {
            observer.before_render(world);
        }
        let render_start = Instant::now();
        sink.present(world, dt);
        let elapsed = render_start.elapsed();
        for observer in &mut self.observers {
            observer.after_render(world, elapsed);
        }

        FrameReport {
            dt,
            simulated,
            events,
        }
    }

    fn advance_time(&mut self, now: Duration) -> Duration {
        let dt = self
            .previous_frame
            .map_or(Duration::ZERO, |previous| now.saturating_sub(previous));
        self.previous_frame = Some(now);
        dt.min(self.max_frame_dt)
    }

    fn stream(&mut self, world: &mut World, events: &mut Vec<Event>) {
        let frontier = query::frontier(world);
        if let Some(request) = self.streaming.plan(frontier) {
            tracing::debug!(
                start_x = request.start_x,
                chunk_count = request.chunk_count,
                "generating terrain"
            );
            self.generator
                .generate_request(request, &mut self.commands);
        }
        if let Some(x) = self.streaming.prune_cutoff(frontier) {
            self.commands.push(Command::PruneChunksBehind { x });
        }
        for command in self.commands.drain(..) {
            world::apply(world, command, events);
        }
    }
}
