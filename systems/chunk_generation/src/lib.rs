#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded procedural generator emitting terrain chunk commands.

use rand::{
    distributions::{Bernoulli, Distribution, Uniform},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use snail_run_core::{
    ChunkBlueprint, Coin, Command, Enemy, GenerationRequest, GenerationTuning, Platform,
    TuningError,
};

/// Configuration parameters required to construct the chunk generator.
#[derive(Clone, Debug)]
pub struct Config {
    seed: u64,
    tuning: GenerationTuning,
    ground_y: f32,
}

impl Config {
    /// Creates a new configuration from a seed, sampling parameters and the
    /// ground tier height.
    #[must_use]
    pub const fn new(seed: u64, tuning: GenerationTuning, ground_y: f32) -> Self {
        Self {
            seed,
            tuning,
            ground_y,
        }
    }

    /// Seed the generator's random stream starts from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

/// Pure system that samples chunk blueprints from a seeded random stream.
#[derive(Debug)]
pub struct ChunkGenerator {
    rng: ChaCha8Rng,
    tuning: GenerationTuning,
    ground_y: f32,
    gap: Uniform<f32>,
    width: Uniform<f32>,
    coin_count: Uniform<u32>,
    raised: Bernoulli,
    enemy: Bernoulli,
}

impl ChunkGenerator {
    /// Creates a generator, rejecting sampling parameters that describe empty ranges.
    pub fn new(config: Config) -> Result<Self, TuningError> {
        let Config {
            seed,
            tuning,
            ground_y,
        } = config;
        tuning.validate()?;

        let raised = probability("generation.raised_probability", tuning.raised_probability)?;
        let enemy = probability("generation.enemy_probability", tuning.enemy_probability)?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            gap: Uniform::new(tuning.gap_min, tuning.gap_max),
            width: Uniform::new(tuning.width_min, tuning.width_max),
            coin_count: Uniform::new_inclusive(tuning.coins_min, tuning.coins_max),
            raised,
            enemy,
            tuning,
            ground_y,
        })
    }

    /// Emits `chunk_count` append commands laid out left to right from `start_x`.
    ///
    /// The first chunk starts exactly at `start_x`; every later chunk is
    /// separated from its predecessor by a sampled gap.
    pub fn generate(&mut self, start_x: f32, chunk_count: u32, out: &mut Vec<Command>) {
        let mut cursor = start_x;
        for index in 0..chunk_count {
            if index > 0 {
                cursor += self.gap.sample(&mut self.rng);
            }
            let blueprint = self.sample_chunk(cursor);
            cursor += blueprint.platform.width;
            out.push(Command::AppendChunk { blueprint });
        }
    }

    /// Fulfils a request produced by the streaming policy.
    pub fn generate_request(&mut self, request: GenerationRequest, out: &mut Vec<Command>) {
        self.generate(request.start_x, request.chunk_count, out);
    }

    fn sample_chunk(&mut self, x: f32) -> ChunkBlueprint {
        let tuning = &self.tuning;
        let width = self.width.sample(&mut self.rng);
        let y = if self.raised.sample(&mut self.rng) {
            self.ground_y - tuning.raised_offset
        } else {
            self.ground_y
        };
        let platform = Platform::new(x, y, width, tuning.platform_thickness);

        let coin_count = self.coin_count.sample(&mut self.rng);
        let coins = (0..coin_count)
            .map(|index| {
                Coin::new(
                    x + tuning.coin_inset + index as f32 * tuning.coin_stride,
                    y - tuning.coin_lift,
                    tuning.coin_radius,
                )
            })
            .collect();

        let enemy = if self.enemy.sample(&mut self.rng) {
            let margin = tuning.enemy_edge_margin;
            let enemy_x = self.rng.gen_range(x + margin..x + width - margin);
            let direction = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
            Some(Enemy::new(
                enemy_x,
                y - tuning.enemy_lift,
                tuning.enemy_width,
                tuning.enemy_height,
                direction * tuning.enemy_speed,
            ))
        } else {
            None
        };

        ChunkBlueprint {
            platform,
            coins,
            enemy,
        }
    }
}

fn probability(name: &'static str, value: f64) -> Result<Bernoulli, TuningError> {
    Bernoulli::new(value).map_err(|_| TuningError::OutOfUnitInterval { name, value })
}
