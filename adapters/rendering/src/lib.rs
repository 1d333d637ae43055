#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snail Run adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use snail_run_core::ActionSet;
use snail_run_system_frame_driver::FrameSink;
use snail_run_world::{query, World};
use std::{error::Error, fmt, time::Duration};

/// Horizontal slack beyond each viewport edge within which platforms stay visible.
const PLATFORM_CULL_MARGIN: f32 = 5.0;
/// Horizontal slack for coins.
const COIN_CULL_MARGIN: f32 = 20.0;
/// Horizontal slack for enemies.
const ENEMY_CULL_MARGIN: f32 = 40.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with its alpha channel replaced.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Monotonic timestamp of the frame.
    pub now: Duration,
    /// Actions held during the frame, plus a pause toggle when it was pressed.
    pub actions: ActionSet,
}

/// Platform rectangle expressed in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenePlatform {
    /// Top-left corner.
    pub position: Vec2,
    /// Width and thickness.
    pub size: Vec2,
}

/// Coin expressed in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneCoin {
    /// Centre of the coin.
    pub center: Vec2,
    /// Radius of the coin.
    pub radius: f32,
    /// Whether the coin was already picked up and should be drawn faded.
    pub collected: bool,
}

/// Patrolling enemy expressed in screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Top-left corner of the body.
    pub position: Vec2,
    /// Extent of the body.
    pub size: Vec2,
    /// Whether the enemy currently crawls towards smaller x.
    pub heading_left: bool,
}

/// Player body expressed in screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScenePlayer {
    /// Top-left corner of the body.
    pub position: Vec2,
    /// Extent of the body.
    pub size: Vec2,
    /// Whether the player stands on a surface.
    pub on_ground: bool,
}

/// Heads-up display values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// Current score.
    pub score: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Whether the simulation is paused.
    pub paused: bool,
}

/// Visible slice of the world translated into screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Size of the visible area in world units.
    pub viewport: Vec2,
    /// Height of the ground plane.
    pub ground_y: f32,
    /// Camera offset, kept for parallax layers.
    pub camera_x: f32,
    /// Visible platforms.
    pub platforms: Vec<ScenePlatform>,
    /// Visible coins, collected ones included.
    pub coins: Vec<SceneCoin>,
    /// Visible active enemies.
    pub enemies: Vec<SceneEnemy>,
    /// Player body.
    pub player: ScenePlayer,
    /// Heads-up display values.
    pub hud: Hud,
    /// Sum of every frame delta presented so far, driving animations.
    pub elapsed: Duration,
}

impl Scene {
    /// Creates an empty scene for a viewport of the provided size.
    pub fn new(viewport: Vec2, ground_y: f32) -> Result<Self, RenderingError> {
        if !(viewport.x > 0.0 && viewport.y > 0.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.x,
                height: viewport.y,
            });
        }

        Ok(Self {
            viewport,
            ground_y,
            camera_x: 0.0,
            platforms: Vec::new(),
            coins: Vec::new(),
            enemies: Vec::new(),
            player: ScenePlayer::default(),
            hud: Hud::default(),
            elapsed: Duration::ZERO,
        })
    }

    /// Creates an empty scene matching the world's viewport.
    pub fn for_world(world: &World) -> Result<Self, RenderingError> {
        let tuning = query::tuning(world);
        Self::new(
            Vec2::new(tuning.viewport_width, tuning.viewport_height),
            tuning.ground_y,
        )
    }

    /// Replaces the scene content with the visible part of the world.
    pub fn populate(&mut self, world: &World, dt: Duration) {
        let camera_x = query::camera_x(world);
        let width = self.viewport.x;
        let visible = |left: f32, right: f32, margin: f32| {
            right - camera_x >= -margin && left - camera_x <= width + margin
        };
        let to_screen = |x: f32, y: f32| Vec2::new(x - camera_x, y);

        self.platforms.clear();
        self.platforms.extend(
            query::platforms(world)
                .filter(|platform| visible(platform.x, platform.right(), PLATFORM_CULL_MARGIN))
                .map(|platform| ScenePlatform {
                    position: to_screen(platform.x, platform.y),
                    size: Vec2::new(platform.width, platform.height),
                }),
        );

        self.coins.clear();
        self.coins.extend(
            query::coins(world)
                .filter(|(_, coin)| visible(coin.x, coin.x, COIN_CULL_MARGIN))
                .map(|(_, coin)| SceneCoin {
                    center: to_screen(coin.x, coin.y),
                    radius: coin.radius,
                    collected: coin.collected,
                }),
        );

        self.enemies.clear();
        self.enemies.extend(
            query::enemies(world)
                .filter(|(_, enemy)| !enemy.is_retired())
                .filter(|(_, enemy)| visible(enemy.x, enemy.x, ENEMY_CULL_MARGIN))
                .map(|(_, enemy)| SceneEnemy {
                    position: to_screen(enemy.x, enemy.y),
                    size: Vec2::new(enemy.width, enemy.height),
                    heading_left: enemy.velocity_x < 0.0,
                }),
        );

        let player = query::player(world);
        self.player = ScenePlayer {
            position: to_screen(player.x, player.y),
            size: Vec2::new(player.width, player.height),
            on_ground: player.on_ground,
        };
        self.hud = Hud {
            score: player.score,
            lives: player.lives,
            paused: query::is_paused(world),
        };
        self.camera_x = camera_x;
        self.elapsed = self.elapsed.saturating_add(dt);
    }
}

impl FrameSink for Scene {
    fn present(&mut self, world: &World, dt: Duration) {
        self.populate(world, dt);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Snail Run scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the input captured by the
    /// adapter for the frame and is expected to advance the simulation and
    /// refresh the scene before it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// The viewport must have a positive extent on both axes.
    InvalidViewport {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport { width, height } => {
                write!(f, "viewport must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
