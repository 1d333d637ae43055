#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Streaming policy that keeps generated terrain ahead of the camera.

use snail_run_core::{FrontierView, GenerationRequest, WorldTuning};

/// Configuration parameters required to construct the streaming policy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    lookahead: f32,
    refill_chunks: u32,
    refill_gap: f32,
    prune_margin: Option<f32>,
}

impl Config {
    /// Creates a configuration from explicit thresholds.
    #[must_use]
    pub const fn new(
        lookahead: f32,
        refill_chunks: u32,
        refill_gap: f32,
        prune_margin: Option<f32>,
    ) -> Self {
        Self {
            lookahead,
            refill_chunks,
            refill_gap,
            prune_margin,
        }
    }

    /// Derives the configuration from the world tuning.
    #[must_use]
    pub fn from_tuning(tuning: &WorldTuning) -> Self {
        Self::new(
            tuning.lookahead_distance(),
            tuning.streaming.refill_chunks,
            tuning.streaming.refill_gap,
            tuning.streaming.prune_margin,
        )
    }
}

/// Pure system deciding when terrain should be generated or discarded.
#[derive(Debug)]
pub struct Streaming {
    config: Config,
}

impl Streaming {
    /// Creates a new streaming policy.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Requests a refill when the generated frontier is too close to the camera.
    #[must_use]
    pub fn plan(&self, frontier: FrontierView) -> Option<GenerationRequest> {
        if frontier.lead() >= self.config.lookahead {
            return None;
        }
        Some(GenerationRequest {
            start_x: frontier.farthest_edge + self.config.refill_gap,
            chunk_count: self.config.refill_chunks,
        })
    }

    /// Reports the offset behind which chunks may be discarded, when pruning is enabled.
    #[must_use]
    pub fn prune_cutoff(&self, frontier: FrontierView) -> Option<f32> {
        self.config
            .prune_margin
            .map(|margin| frontier.camera_x - margin)
    }
}
