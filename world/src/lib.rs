#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Snail Run.

mod arena;
mod camera;
mod kinematics;
mod patrol;

use std::time::Duration;

use snail_run_core::{
    ActionSet, CoinId, Command, EnemyId, Event, Player, Surface, WorldTuning, WELCOME_BANNER,
};

use self::{arena::ChunkArena, camera::Camera};

/// Represents the authoritative Snail Run world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    tuning: WorldTuning,
    chunks: ChunkArena,
    player: Player,
    camera: Camera,
    paused: bool,
    lives_exhausted: bool,
    tick_index: u64,
}

impl World {
    /// Creates an empty world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(WorldTuning::default())
    }

    /// Creates an empty world driven by the provided tuning.
    ///
    /// The player starts at the tuned spawn position; the world contains no
    /// chunks until they are appended.
    #[must_use]
    pub fn with_tuning(tuning: WorldTuning) -> Self {
        Self {
            banner: WELCOME_BANNER,
            player: Player::from_tuning(&tuning.player),
            chunks: ChunkArena::new(),
            camera: Camera::default(),
            paused: false,
            lives_exhausted: false,
            tick_index: 0,
            tuning,
        }
    }

    fn spawn_player(&mut self, out_events: &mut Vec<Event>) {
        let player_tuning = &self.tuning.player;
        let mut player = Player::from_tuning(player_tuning);
        let anchor = self
            .chunks
            .iter()
            .map(|slot| slot.platform)
            .find(|platform| platform.x <= player_tuning.anchor_search_limit);
        if let Some(platform) = anchor {
            player.x = player_tuning.anchor_x;
            player.y = platform.y - player.height;
            player.previous_y = player.y;
            player.on_ground = true;
        }

        out_events.push(Event::PlayerSpawned {
            x: player.x,
            y: player.y,
            on_ground: player.on_ground,
        });
        self.player = player;
        self.lives_exhausted = false;
    }

    fn step(&mut self, dt: Duration, now: Duration, actions: ActionSet, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);
        out_events.push(Event::TimeAdvanced { dt });

        let seconds = dt.as_secs_f32();
        let was_grounded = self.player.on_ground;

        if kinematics::integrate(&mut self.player, actions, seconds, self.tuning.gravity) {
            out_events.push(Event::PlayerJumped {
                velocity_y: self.player.jump_velocity,
            });
        }

        let mut surface = kinematics::clamp_to_ground(&mut self.player, self.tuning.ground_y)
            .then_some(Surface::Ground);

        let margin = self.tuning.physics.collision_window_margin;
        let window_start = self.camera.x() - margin;
        let window_end = self.camera.x() + self.tuning.viewport_width + margin;
        let candidates = self
            .chunks
            .iter()
            .filter(|slot| slot.platform.right() >= window_start && slot.platform.x <= window_end)
            .map(|slot| (slot.id, &slot.platform));
        if let Some(chunk) = kinematics::land_on_platforms(&mut self.player, candidates) {
            surface = Some(Surface::Platform(chunk));
        }

        if let Some(surface) = surface {
            if !was_grounded {
                out_events.push(Event::PlayerLanded { surface });
            }
        }

        let coins = self.chunks.iter_mut().flat_map(|slot| {
            let chunk = slot.id;
            slot.coins
                .iter_mut()
                .enumerate()
                .map(move |(index, coin)| (CoinId::new(chunk, coin_index(index)), coin))
        });
        kinematics::collect_coins(
            &mut self.player,
            coins,
            self.tuning.physics.coin_score,
            out_events,
        );

        patrol::advance_enemies(
            &mut self.chunks,
            &mut self.player,
            seconds,
            now,
            &self.tuning,
            out_events,
        );

        if self.player.lives == 0 && !self.lives_exhausted {
            self.lives_exhausted = true;
            out_events.push(Event::LivesExhausted);
        }

        let from = self.camera.follow(self.player.x, seconds, &self.tuning);
        let to = self.camera.x();
        if to > from {
            out_events.push(Event::CameraAdvanced { from, to });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn coin_index(index: usize) -> u8 {
    u8::try_from(index).unwrap_or(u8::MAX)
}

/// Applies the provided command to the world, mutating state in place.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::AppendChunk { blueprint } => {
            let platform = blueprint.platform;
            let coins = blueprint.coins.len();
            let has_enemy = blueprint.enemy.is_some();
            let chunk = world.chunks.append(blueprint);
            out_events.push(Event::ChunkAppended {
                chunk,
                platform,
                coins,
                enemy: has_enemy.then(|| EnemyId::new(chunk)),
            });
        }
        Command::SpawnPlayer => world.spawn_player(out_events),
        Command::Tick { dt, now, actions } => {
            if world.paused {
                return;
            }
            world.step(dt, now, actions, out_events);
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseChanged {
                paused: world.paused,
            });
        }
        Command::PruneChunksBehind { x } => {
            let count = world.chunks.prune_behind(x);
            if count > 0 {
                out_events.push(Event::ChunksPruned { count });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use snail_run_core::{
        ChunkId, Coin, CoinId, Enemy, EnemyId, FrontierView, Platform, Player, WorldTuning,
    };

    use super::{coin_index, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the tuning driving the world.
    #[must_use]
    pub fn tuning(world: &World) -> &WorldTuning {
        &world.tuning
    }

    /// Provides read-only access to the player.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Current camera offset.
    #[must_use]
    pub fn camera_x(world: &World) -> f32 {
        world.camera.x()
    }

    /// Reports whether the simulation step is suspended.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Number of simulation steps executed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Reports how far generated terrain reaches ahead of the camera.
    #[must_use]
    pub fn frontier(world: &World) -> FrontierView {
        FrontierView {
            farthest_edge: world.chunks.farthest_edge(),
            camera_x: world.camera.x(),
        }
    }

    /// Number of chunks currently held by the store.
    #[must_use]
    pub fn chunk_count(world: &World) -> usize {
        world.chunks.len()
    }

    /// Retrieves a single chunk by identifier, if it was not pruned.
    #[must_use]
    pub fn chunk(world: &World, id: ChunkId) -> Option<ChunkView<'_>> {
        world.chunks.get(id).map(ChunkView::from_slot)
    }

    /// Iterates over every stored chunk in generation order.
    pub fn chunks(world: &World) -> impl Iterator<Item = ChunkView<'_>> {
        world.chunks.iter().map(ChunkView::from_slot)
    }

    /// Iterates over every stored platform in generation order.
    pub fn platforms(world: &World) -> impl Iterator<Item = &Platform> {
        world.chunks.iter().map(|slot| &slot.platform)
    }

    /// Iterates over every stored coin, collected ones included.
    pub fn coins(world: &World) -> impl Iterator<Item = (CoinId, &Coin)> {
        world.chunks.iter().flat_map(|slot| {
            let chunk = slot.id;
            slot.coins
                .iter()
                .enumerate()
                .map(move |(index, coin)| (CoinId::new(chunk, coin_index(index)), coin))
        })
    }

    /// Iterates over every stored enemy, retired ones included.
    pub fn enemies(world: &World) -> impl Iterator<Item = (EnemyId, &Enemy)> {
        world
            .chunks
            .iter()
            .filter_map(|slot| slot.enemy.as_ref().map(|enemy| (EnemyId::new(slot.id), enemy)))
    }

    /// Borrowed view of one stored chunk.
    #[derive(Clone, Copy, Debug)]
    pub struct ChunkView<'a> {
        /// Identifier allocated to the chunk.
        pub id: ChunkId,
        /// Platform anchoring the chunk.
        pub platform: &'a Platform,
        /// Coins above the platform, left to right.
        pub coins: &'a [Coin],
        /// Enemy spawned with the chunk, if any.
        pub enemy: Option<&'a Enemy>,
    }

    impl<'a> ChunkView<'a> {
        fn from_slot(slot: &'a super::arena::ChunkSlot) -> Self {
            Self {
                id: slot.id,
                platform: &slot.platform,
                coins: &slot.coins,
                enemy: slot.enemy.as_ref(),
            }
        }
    }
}

/// Mutable access used by tests to stage collision scenarios.
#[cfg(any(test, feature = "scaffolding"))]
pub mod scaffolding {
    use snail_run_core::{Coin, CoinId, Enemy, EnemyId, Player};

    use super::World;

    /// Provides mutable access to the player.
    pub fn player_mut(world: &mut World) -> &mut Player {
        &mut world.player
    }

    /// Provides mutable access to an enemy, if its chunk is still stored.
    pub fn enemy_mut(world: &mut World, id: EnemyId) -> Option<&mut Enemy> {
        world
            .chunks
            .get_mut(id.chunk())
            .and_then(|slot| slot.enemy.as_mut())
    }

    /// Provides mutable access to a coin, if its chunk is still stored.
    pub fn coin_mut(world: &mut World, id: CoinId) -> Option<&mut Coin> {
        world
            .chunks
            .get_mut(id.chunk())
            .and_then(|slot| slot.coins.get_mut(usize::from(id.index())))
    }

    /// Moves the camera forward to the provided offset. Never moves it back.
    pub fn advance_camera(world: &mut World, x: f32) {
        world.camera.place(x);
    }
}
