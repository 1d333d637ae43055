#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares a fresh Snail Run.

use snail_run_core::{Command, WorldTuning};
use snail_run_system_chunk_generation::ChunkGenerator;
use snail_run_world::{query, World};

/// Produces the commands and data required to start a run.
#[derive(Debug)]
pub struct Bootstrap {
    initial_chunks: u32,
}

impl Bootstrap {
    /// Creates a bootstrap system that lays out `initial_chunks` chunks.
    #[must_use]
    pub const fn new(initial_chunks: u32) -> Self {
        Self { initial_chunks }
    }

    /// Creates a bootstrap system using the streaming tuning.
    #[must_use]
    pub fn from_tuning(tuning: &WorldTuning) -> Self {
        Self::new(tuning.streaming.initial_chunks)
    }

    /// Emits the initial terrain starting at the origin followed by the player spawn.
    pub fn populate(&self, generator: &mut ChunkGenerator, out: &mut Vec<Command>) {
        generator.generate(0.0, self.initial_chunks, out);
        out.push(Command::SpawnPlayer);
    }

    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::from_tuning(&WorldTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snail_run_core::{Event, GenerationTuning, WELCOME_BANNER};
    use snail_run_system_chunk_generation::Config;
    use snail_run_world as world;

    fn boot(seed: u64) -> (World, Vec<Event>) {
        let tuning = WorldTuning::default();
        let mut generator = ChunkGenerator::new(Config::new(
            seed,
            GenerationTuning::default(),
            tuning.ground_y,
        ))
        .expect("default tuning is valid");
        let mut commands = Vec::new();
        Bootstrap::default().populate(&mut generator, &mut commands);
        assert_eq!(commands.last(), Some(&Command::SpawnPlayer));

        let mut world = World::with_tuning(tuning);
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        (world, events)
    }

    #[test]
    fn populates_initial_chunks_from_origin() {
        let (world, _) = boot(17);
        assert_eq!(query::chunk_count(&world), 24);
        let first = query::platforms(&world).next().expect("chunks present");
        assert_eq!(first.x, 0.0);
    }

    #[test]
    fn player_starts_standing_on_first_platform() {
        for seed in 0..16 {
            let (world, events) = boot(seed);
            let player = query::player(&world);
            let first = query::platforms(&world).next().expect("chunks present");
            assert!((player.x - 100.0).abs() < f32::EPSILON);
            assert!((player.bottom() - first.y).abs() < f32::EPSILON);
            assert!(player.on_ground);
            assert!(matches!(
                events.last(),
                Some(Event::PlayerSpawned { on_ground: true, .. })
            ));
        }
    }

    #[test]
    fn banner_is_exposed() {
        let world = World::new();
        assert_eq!(Bootstrap::default().welcome_banner(&world), WELCOME_BANNER);
    }
}
