#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Snail Run engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then reports [`Event`] values
//! describing what changed. Systems read immutable views of the world and
//! respond exclusively with new command batches.

mod tuning;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use tuning::{
    GenerationTuning, PhysicsTuning, PlayerTuning, StreamingTuning, TuningError, WorldTuning,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Snail Run.";

/// Horizontal sentinel that defeated enemies are relocated to.
///
/// Retired enemies stay in the store but can no longer reach anything the
/// player can touch.
pub const RETIRED_ENEMY_X: f32 = -99_999.0;

/// Logical actions an input collaborator may report as held.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    /// Walk toward decreasing x.
    MoveLeft,
    /// Walk toward increasing x.
    MoveRight,
    /// Jump while standing on a surface.
    Jump,
    /// Toggle the paused state once per press.
    TogglePause,
}

impl Action {
    const fn bit(self) -> u8 {
        match self {
            Self::MoveLeft => 1 << 0,
            Self::MoveRight => 1 << 1,
            Self::Jump => 1 << 2,
            Self::TogglePause => 1 << 3,
        }
    }
}

/// Set of currently held logical actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ActionSet {
    bits: u8,
}

impl ActionSet {
    /// Creates a set with no held actions.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Returns a copy of the set with the provided action held.
    #[must_use]
    pub const fn with(self, action: Action) -> Self {
        Self {
            bits: self.bits | action.bit(),
        }
    }

    /// Reports whether the action is currently held.
    #[must_use]
    pub const fn contains(&self, action: Action) -> bool {
        self.bits & action.bit() != 0
    }

    /// Reports whether no action is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Marks the action as held.
    pub fn insert(&mut self, action: Action) {
        self.bits |= action.bit();
    }

    /// Releases the action.
    pub fn remove(&mut self, action: Action) {
        self.bits &= !action.bit();
    }

    /// Releases the action and reports whether it was held.
    ///
    /// Used for edge-triggered actions so a single press is consumed once.
    pub fn take(&mut self, action: Action) -> bool {
        let held = self.contains(action);
        self.remove(action);
        held
    }
}

impl FromIterator<Action> for ActionSet {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |set, action| set.with(action))
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Appends a generated chunk to the right end of the world store.
    AppendChunk {
        /// Platform, coins and optional enemy composing the chunk.
        blueprint: ChunkBlueprint,
    },
    /// Places the player on the anchoring platform near the world origin.
    SpawnPlayer,
    /// Advances the simulation by one step.
    Tick {
        /// Clamped simulated time that elapsed since the previous step.
        dt: Duration,
        /// Monotonic clock reading at the start of the step.
        now: Duration,
        /// Actions held by the player during the step.
        actions: ActionSet,
    },
    /// Flips the paused flag.
    TogglePause,
    /// Drops every chunk whose platform ends left of the provided x.
    PruneChunksBehind {
        /// World-space x coordinate acting as the pruning cutoff.
        x: f32,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a chunk joined the world store.
    ChunkAppended {
        /// Identifier allocated to the chunk.
        chunk: ChunkId,
        /// Platform anchoring the chunk.
        platform: Platform,
        /// Number of coins placed on the platform.
        coins: usize,
        /// Enemy patrolling the platform, if one spawned.
        enemy: Option<EnemyId>,
    },
    /// Reports that chunks far behind the camera were discarded.
    ChunksPruned {
        /// Number of chunks that were removed.
        count: usize,
    },
    /// Confirms where the player was placed when the run started.
    PlayerSpawned {
        /// Horizontal position of the player's left edge.
        x: f32,
        /// Vertical position of the player's top edge.
        y: f32,
        /// Whether the player starts standing on a platform.
        on_ground: bool,
    },
    /// Indicates that the simulation advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the step.
        dt: Duration,
    },
    /// Reports that the player left the ground.
    PlayerJumped {
        /// Vertical velocity applied by the jump.
        velocity_y: f32,
    },
    /// Reports that an airborne player came to rest on a surface.
    PlayerLanded {
        /// Surface that caught the player.
        surface: Surface,
    },
    /// Confirms that the player picked up a coin.
    CoinCollected {
        /// Identifier of the collected coin.
        coin: CoinId,
        /// Player score after the pickup.
        score: u32,
    },
    /// Confirms that the player defeated an enemy from above.
    EnemyStomped {
        /// Identifier of the retired enemy.
        enemy: EnemyId,
        /// Player score after the stomp.
        score: u32,
    },
    /// Reports that an enemy hurt the player.
    PlayerHit {
        /// Identifier of the enemy that caused the hit.
        enemy: EnemyId,
        /// Lives remaining after the hit.
        lives: u32,
    },
    /// Reports that the player's lives reached zero.
    LivesExhausted,
    /// Reports the camera movement performed during a step.
    CameraAdvanced {
        /// Camera offset before the step.
        from: f32,
        /// Camera offset after the step.
        to: f32,
    },
    /// Announces that the paused flag changed.
    PauseChanged {
        /// Whether the simulation is now paused.
        paused: bool,
    },
}

/// Surface the player can stand on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Surface {
    /// The infinite ground plane.
    Ground,
    /// The platform anchoring the provided chunk.
    Platform(ChunkId),
}

/// Unique identifier assigned to a generated chunk.
///
/// Identifiers increase monotonically in generation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Creates a new chunk identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier allocated to the chunk appended after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Identifier of a coin: its chunk and its position within the chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CoinId {
    chunk: ChunkId,
    index: u8,
}

impl CoinId {
    /// Creates a coin identifier.
    #[must_use]
    pub const fn new(chunk: ChunkId, index: u8) -> Self {
        Self { chunk, index }
    }

    /// Chunk the coin belongs to.
    #[must_use]
    pub const fn chunk(&self) -> ChunkId {
        self.chunk
    }

    /// Zero-based index of the coin within its chunk, left to right.
    #[must_use]
    pub const fn index(&self) -> u8 {
        self.index
    }
}

/// Identifier of an enemy. Chunks host at most one enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    chunk: ChunkId,
}

impl EnemyId {
    /// Creates an enemy identifier for the enemy spawned with the chunk.
    #[must_use]
    pub const fn new(chunk: ChunkId) -> Self {
        Self { chunk }
    }

    /// Chunk the enemy spawned with.
    #[must_use]
    pub const fn chunk(&self) -> ChunkId {
        self.chunk
    }
}

/// Axis-aligned box in world units. The y axis grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Aabb {
    /// Creates a box from its top-left corner and extents.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Reports whether the two boxes share interior area. Touching edges do not overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Static rectangle the player and enemies can stand on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge.
    pub x: f32,
    /// Top surface.
    pub y: f32,
    /// Horizontal extent, always positive.
    pub width: f32,
    /// Thickness, always positive.
    pub height: f32,
}

impl Platform {
    /// Creates a platform rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Reports whether the horizontal span `[left, right)` of another body overlaps the platform.
    #[must_use]
    pub fn spans(&self, left: f32, right: f32) -> bool {
        right > self.x && left < self.right()
    }
}

/// Circular pickup placed above a platform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    /// Horizontal centre.
    pub x: f32,
    /// Vertical centre.
    pub y: f32,
    /// Pickup radius.
    pub radius: f32,
    /// Whether the coin was already picked up. Never reverts.
    pub collected: bool,
}

impl Coin {
    /// Creates an uncollected coin.
    #[must_use]
    pub const fn new(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            collected: false,
        }
    }

    /// Box of side `2 * radius` used for overlap tests.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.x - self.radius,
            self.y - self.radius,
            self.radius * 2.0,
            self.radius * 2.0,
        )
    }
}

/// Patrolling snail.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
    /// Signed horizontal speed in units per second.
    pub velocity_x: f32,
}

impl Enemy {
    /// Creates an enemy with the provided box and velocity.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32, velocity_x: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            velocity_x,
        }
    }

    /// Current bounding box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Reports whether the enemy was defeated and moved to the sentinel x.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.x <= RETIRED_ENEMY_X
    }
}

/// The single player-controlled character.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
    /// Horizontal velocity in units per second.
    pub velocity_x: f32,
    /// Vertical velocity in units per second, positive when falling.
    pub velocity_y: f32,
    /// Walking speed applied while a move action is held.
    pub speed: f32,
    /// Vertical velocity applied by a jump; negative means upward.
    pub jump_velocity: f32,
    /// Whether the player stands on a surface and may jump.
    pub on_ground: bool,
    /// Accumulated score.
    pub score: u32,
    /// Remaining lives, floored at zero.
    pub lives: u32,
    /// Top edge recorded before the last positional integration.
    pub previous_y: f32,
    /// Clock reading of the last hit, if any.
    pub last_hit: Option<Duration>,
}

impl Player {
    /// Creates a player at the tuned spawn position.
    #[must_use]
    pub fn from_tuning(tuning: &PlayerTuning) -> Self {
        Self {
            x: tuning.spawn_x,
            y: tuning.spawn_y,
            width: tuning.width,
            height: tuning.height,
            velocity_x: 0.0,
            velocity_y: 0.0,
            speed: tuning.speed,
            jump_velocity: tuning.jump_velocity,
            on_ground: false,
            score: 0,
            lives: tuning.lives,
            previous_y: tuning.spawn_y,
            last_hit: None,
        }
    }

    /// Current bounding box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.x, self.y, self.width, self.height)
    }

    /// Bottom edge this step.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Bottom edge before the last positional integration.
    #[must_use]
    pub fn previous_bottom(&self) -> f32 {
        self.previous_y + self.height
    }
}

/// Atomic output of procedural generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkBlueprint {
    /// Platform anchoring the chunk.
    pub platform: Platform,
    /// Coins resting above the platform, left to right.
    pub coins: Vec<Coin>,
    /// Enemy patrolling the platform, if one spawned.
    pub enemy: Option<Enemy>,
}

/// Request to append a contiguous run of chunks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationRequest {
    /// Left edge of the first generated platform.
    pub start_x: f32,
    /// Number of chunks to generate.
    pub chunk_count: u32,
}

/// How far generated terrain reaches relative to the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrontierView {
    /// Maximum platform right edge in the store, or zero when empty.
    pub farthest_edge: f32,
    /// Current camera offset.
    pub camera_x: f32,
}

impl FrontierView {
    /// Distance between the farthest platform edge and the camera.
    #[must_use]
    pub fn lead(&self) -> f32 {
        self.farthest_edge - self.camera_x
    }
}
