//! Tunable constants driving generation and simulation.
//!
//! Every structure deserializes with per-field defaults so partial tuning
//! files only need to name the values they change.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Aggregated tuning knobs for the whole simulation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Downward acceleration applied to the player in units per second squared.
    pub gravity: f32,
    /// Constant rightward camera drift in units per second.
    pub scroll_speed: f32,
    /// Height of the ground plane; bodies never sink below it.
    pub ground_y: f32,
    /// Width of the visible window in world units.
    pub viewport_width: f32,
    /// Height of the visible window in world units.
    pub viewport_height: f32,
    /// Fraction of the viewport the camera keeps left of the player when catching up.
    pub camera_lead: f32,
    /// Player body and control parameters.
    pub player: PlayerTuning,
    /// Procedural chunk sampling parameters.
    pub generation: GenerationTuning,
    /// Collision and scoring parameters.
    pub physics: PhysicsTuning,
    /// World streaming parameters.
    pub streaming: StreamingTuning,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            gravity: 1_800.0,
            scroll_speed: 200.0,
            ground_y: 360.0,
            viewport_width: 960.0,
            viewport_height: 540.0,
            camera_lead: 0.35,
            player: PlayerTuning::default(),
            generation: GenerationTuning::default(),
            physics: PhysicsTuning::default(),
            streaming: StreamingTuning::default(),
        }
    }
}

impl WorldTuning {
    /// Checks that every sampling range is non-empty and every size is usable.
    pub fn validate(&self) -> Result<(), TuningError> {
        finite("gravity", self.gravity)?;
        finite("scroll_speed", self.scroll_speed)?;
        finite("ground_y", self.ground_y)?;
        positive("viewport_width", self.viewport_width)?;
        positive("viewport_height", self.viewport_height)?;
        unit_interval("camera_lead", self.camera_lead)?;
        positive("player.width", self.player.width)?;
        positive("player.height", self.player.height)?;
        finite("player.spawn_x", self.player.spawn_x)?;
        finite("player.spawn_y", self.player.spawn_y)?;
        finite("player.anchor_x", self.player.anchor_x)?;
        finite("player.anchor_search_limit", self.player.anchor_search_limit)?;
        finite("player.speed", self.player.speed)?;
        finite("player.jump_velocity", self.player.jump_velocity)?;
        self.generation.validate()?;
        positive("physics.patrol_right_margin", self.physics.patrol_right_margin)?;
        positive("physics.surface_tolerance", self.physics.surface_tolerance)?;
        finite(
            "physics.collision_window_margin",
            self.physics.collision_window_margin,
        )?;
        finite("physics.stomp_speed_threshold", self.physics.stomp_speed_threshold)?;
        finite("physics.stomp_bounce_factor", self.physics.stomp_bounce_factor)?;
        finite("physics.knockback_speed", self.physics.knockback_speed)?;
        finite("physics.knockback_lift", self.physics.knockback_lift)?;
        finite("physics.patrol_left_margin", self.physics.patrol_left_margin)?;
        finite("streaming.refill_gap", self.streaming.refill_gap)?;
        if let Some(margin) = self.streaming.prune_margin {
            finite("streaming.prune_margin", margin)?;
        }
        positive(
            "streaming.lookahead_viewports",
            self.streaming.lookahead_viewports,
        )?;
        if self.streaming.refill_chunks == 0 {
            return Err(TuningError::EmptyRefill);
        }
        Ok(())
    }

    /// Distance generated terrain must keep ahead of the camera.
    #[must_use]
    pub fn lookahead_distance(&self) -> f32 {
        self.viewport_width * self.streaming.lookahead_viewports
    }
}

/// Player body and control parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Left edge before the spawn anchor is resolved.
    pub spawn_x: f32,
    /// Top edge before the spawn anchor is resolved.
    pub spawn_y: f32,
    /// Left edge used when an anchoring platform is found.
    pub anchor_x: f32,
    /// Platforms starting at or before this x may anchor the spawn.
    pub anchor_search_limit: f32,
    /// Horizontal extent of the player box.
    pub width: f32,
    /// Vertical extent of the player box.
    pub height: f32,
    /// Walking speed in units per second.
    pub speed: f32,
    /// Vertical velocity applied by a jump; negative is upward.
    pub jump_velocity: f32,
    /// Lives at the start of a run.
    pub lives: u32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn_x: 80.0,
            spawn_y: 0.0,
            anchor_x: 100.0,
            anchor_search_limit: 120.0,
            width: 42.0,
            height: 54.0,
            speed: 220.0,
            jump_velocity: -600.0,
            lives: 3,
        }
    }
}

/// Procedural chunk sampling parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTuning {
    /// Inclusive lower bound of the gap before every chunk but the first.
    pub gap_min: f32,
    /// Exclusive upper bound of the gap.
    pub gap_max: f32,
    /// Inclusive lower bound of the platform width.
    pub width_min: f32,
    /// Exclusive upper bound of the platform width.
    pub width_max: f32,
    /// Height the raised tier sits above the ground tier.
    pub raised_offset: f32,
    /// Probability that a platform uses the raised tier.
    pub raised_probability: f64,
    /// Thickness of every platform.
    pub platform_thickness: f32,
    /// Smallest number of coins per chunk.
    pub coins_min: u32,
    /// Largest number of coins per chunk, inclusive.
    pub coins_max: u32,
    /// Distance from the platform's left edge to the first coin.
    pub coin_inset: f32,
    /// Horizontal spacing between consecutive coins.
    pub coin_stride: f32,
    /// Height of coin centres above the platform surface.
    pub coin_lift: f32,
    /// Radius of every coin.
    pub coin_radius: f32,
    /// Probability that a chunk spawns an enemy.
    pub enemy_probability: f64,
    /// Margin from each platform edge excluded from enemy spawn positions.
    pub enemy_edge_margin: f32,
    /// Height of the enemy's top edge above the platform surface.
    pub enemy_lift: f32,
    /// Patrol speed in units per second.
    pub enemy_speed: f32,
    /// Horizontal extent of an enemy.
    pub enemy_width: f32,
    /// Vertical extent of an enemy.
    pub enemy_height: f32,
}

impl Default for GenerationTuning {
    fn default() -> Self {
        Self {
            gap_min: 40.0,
            gap_max: 120.0,
            width_min: 180.0,
            width_max: 320.0,
            raised_offset: 80.0,
            raised_probability: 0.35,
            platform_thickness: 18.0,
            coins_min: 2,
            coins_max: 4,
            coin_inset: 24.0,
            coin_stride: 32.0,
            coin_lift: 22.0,
            coin_radius: 8.0,
            enemy_probability: 0.45,
            enemy_edge_margin: 40.0,
            enemy_lift: 18.0,
            enemy_speed: 40.0,
            enemy_width: 34.0,
            enemy_height: 24.0,
        }
    }
}

impl GenerationTuning {
    /// Checks that the sampling ranges are non-empty and fit the narrowest platform.
    pub fn validate(&self) -> Result<(), TuningError> {
        non_empty("generation.gap", self.gap_min, self.gap_max)?;
        non_empty("generation.width", self.width_min, self.width_max)?;
        if self.gap_min < 0.0 {
            return Err(TuningError::Negative {
                name: "generation.gap_min",
                value: self.gap_min,
            });
        }
        positive("generation.width_min", self.width_min)?;
        positive("generation.platform_thickness", self.platform_thickness)?;
        positive("generation.coin_radius", self.coin_radius)?;
        unit_interval("generation.raised_probability", self.raised_probability)?;
        unit_interval("generation.enemy_probability", self.enemy_probability)?;
        for (name, value) in [
            ("generation.raised_offset", self.raised_offset),
            ("generation.coin_inset", self.coin_inset),
            ("generation.coin_stride", self.coin_stride),
            ("generation.coin_lift", self.coin_lift),
            ("generation.enemy_edge_margin", self.enemy_edge_margin),
            ("generation.enemy_lift", self.enemy_lift),
            ("generation.enemy_speed", self.enemy_speed),
            ("generation.enemy_width", self.enemy_width),
            ("generation.enemy_height", self.enemy_height),
        ] {
            finite(name, value)?;
        }

        if self.coins_min > self.coins_max || self.coins_max > u32::from(u8::MAX) {
            return Err(TuningError::InvalidCoinCount {
                min: self.coins_min,
                max: self.coins_max,
            });
        }
        let last_coin_offset =
            self.coin_inset + self.coin_stride * self.coins_max.saturating_sub(1) as f32;
        if self.coins_max > 0 && (self.coin_inset < 0.0 || last_coin_offset > self.width_min) {
            return Err(TuningError::CoinRowOverflow {
                required: last_coin_offset,
                width_min: self.width_min,
            });
        }
        if self.enemy_edge_margin < 0.0 {
            return Err(TuningError::Negative {
                name: "generation.enemy_edge_margin",
                value: self.enemy_edge_margin,
            });
        }
        if self.enemy_edge_margin * 2.0 >= self.width_min {
            return Err(TuningError::EnemyMarginTooWide {
                margin: self.enemy_edge_margin,
                width_min: self.width_min,
            });
        }
        Ok(())
    }
}

/// Collision and scoring parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsTuning {
    /// Largest frame delta in milliseconds the driver forwards to the simulation.
    pub max_frame_dt_ms: u64,
    /// Extra distance beyond each viewport edge in which platforms are tested.
    pub collision_window_margin: f32,
    /// Score awarded per coin.
    pub coin_score: u32,
    /// Downward speed above which touching an enemy counts as a stomp.
    pub stomp_speed_threshold: f32,
    /// Fraction of the jump velocity applied as a bounce after a stomp.
    pub stomp_bounce_factor: f32,
    /// Score awarded per stomp.
    pub stomp_score: u32,
    /// Minimum milliseconds between two hits costing a life.
    pub hurt_cooldown_ms: u64,
    /// Horizontal speed of the knockback after a hit.
    pub knockback_speed: f32,
    /// Vertical velocity applied by the knockback; negative is upward.
    pub knockback_lift: f32,
    /// Closest an enemy's left edge may get to its platform's left edge.
    pub patrol_left_margin: f32,
    /// Closest an enemy's left edge may get to its platform's right edge.
    pub patrol_right_margin: f32,
    /// Allowed deviation between an enemy's resting height and its platform.
    pub surface_tolerance: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            max_frame_dt_ms: 50,
            collision_window_margin: 200.0,
            coin_score: 10,
            stomp_speed_threshold: 120.0,
            stomp_bounce_factor: 0.55,
            stomp_score: 25,
            hurt_cooldown_ms: 900,
            knockback_speed: 260.0,
            knockback_lift: -420.0,
            patrol_left_margin: 8.0,
            patrol_right_margin: 42.0,
            surface_tolerance: 3.0,
        }
    }
}

impl PhysicsTuning {
    /// Largest frame delta forwarded to the simulation.
    #[must_use]
    pub fn max_frame_dt(&self) -> Duration {
        Duration::from_millis(self.max_frame_dt_ms)
    }

    /// Minimum time between two life-costing hits.
    #[must_use]
    pub fn hurt_cooldown(&self) -> Duration {
        Duration::from_millis(self.hurt_cooldown_ms)
    }
}

/// World streaming parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingTuning {
    /// Chunks generated when a run starts.
    pub initial_chunks: u32,
    /// Chunks generated whenever the frontier falls behind.
    pub refill_chunks: u32,
    /// Gap inserted between the frontier and a refill run.
    pub refill_gap: f32,
    /// Viewport widths of terrain kept generated ahead of the camera.
    pub lookahead_viewports: f32,
    /// When set, chunks ending this far behind the camera are discarded.
    pub prune_margin: Option<f32>,
}

impl Default for StreamingTuning {
    fn default() -> Self {
        Self {
            initial_chunks: 24,
            refill_chunks: 12,
            refill_gap: 80.0,
            lookahead_viewports: 1.5,
            prune_margin: None,
        }
    }
}

/// Reasons a tuning set is rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum TuningError {
    /// A value that must be strictly positive was not.
    #[error("{name} must be positive (received {value})")]
    NonPositive {
        /// Dotted path of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// A value that must not be negative was.
    #[error("{name} must not be negative (received {value})")]
    Negative {
        /// Dotted path of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A half-open sampling range contains no values.
    #[error("{name} range [{min}, {max}) is empty")]
    EmptyRange {
        /// Dotted path of the offending range.
        name: &'static str,
        /// Inclusive lower bound.
        min: f32,
        /// Exclusive upper bound.
        max: f32,
    },
    /// A probability or fraction lies outside `[0, 1]`.
    #[error("{name} must lie within [0, 1] (received {value})")]
    OutOfUnitInterval {
        /// Dotted path of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The coin count range is empty or too large to index.
    #[error("coin count range {min}..={max} is invalid")]
    InvalidCoinCount {
        /// Smallest coin count.
        min: u32,
        /// Largest coin count.
        max: u32,
    },
    /// The longest coin row would extend past the narrowest platform.
    #[error("coin row reaching {required} overflows the narrowest platform ({width_min})")]
    CoinRowOverflow {
        /// Offset of the last coin from the platform's left edge.
        required: f32,
        /// Narrowest platform width.
        width_min: f32,
    },
    /// Enemy spawn margins leave no interior on the narrowest platform.
    #[error("enemy edge margin {margin} leaves no interior on a {width_min}-unit platform")]
    EnemyMarginTooWide {
        /// Margin excluded from each platform edge.
        margin: f32,
        /// Narrowest platform width.
        width_min: f32,
    },
    /// A value is NaN or infinite.
    #[error("{name} must be finite (received {value})")]
    NonFinite {
        /// Dotted path of the offending field.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Streaming would request zero chunks and never catch up.
    #[error("streaming.refill_chunks must be at least one")]
    EmptyRefill,
}

fn finite(name: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::NonFinite { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), TuningError> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive {
            name,
            value: f64::from(value),
        })
    }
}

fn non_empty(name: &'static str, min: f32, max: f32) -> Result<(), TuningError> {
    if min < max && (max - min).is_finite() {
        Ok(())
    } else {
        Err(TuningError::EmptyRange { name, min, max })
    }
}

fn unit_interval<T: Into<f64>>(name: &'static str, value: T) -> Result<(), TuningError> {
    let value = value.into();
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(TuningError::OutOfUnitInterval { name, value })
    }
}
