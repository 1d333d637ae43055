//! Read-only frame observers.

use std::time::Duration;

use snail_run_core::Event;
use snail_run_world::{query, World};

/// Hooks invoked around each phase of a frame.
///
/// Observers only ever see the world through a shared borrow and cannot
/// influence the simulation.
pub trait FrameObserver {
    /// Called before the simulation step of an unpaused frame.
    fn before_update(&mut self, _world: &World, _dt: Duration) {}

    /// Called after the simulation step and streaming of an unpaused frame.
    fn after_update(&mut self, _world: &World, _events: &[Event]) {}

    /// Called before the world is handed to the frame sink.
    fn before_render(&mut self, _world: &World) {}

    /// Called after the frame sink returns, with the time it took.
    fn after_render(&mut self, _world: &World, _elapsed: Duration) {}
}

/// Observer that reports frame activity through `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl FrameObserver for TracingObserver {
    fn before_update(&mut self, world: &World, dt: Duration) {
        let player = query::player(world);
        tracing::debug!(
            dt_ms = dt.as_secs_f32() * 1_000.0,
            x = player.x,
            y = player.y,
            velocity_x = player.velocity_x,
            velocity_y = player.velocity_y,
            on_ground = player.on_ground,
            "frame update"
        );
    }

    fn after_update(&mut self, world: &World, events: &[Event]) {
        for event in events {
            match event {
                Event::PlayerHit { enemy, lives } => {
                    tracing::info!(?enemy, lives, "player hit");
                }
                Event::EnemyStomped { enemy, score } => {
                    tracing::info!(?enemy, score, "enemy stomped");
                }
                Event::LivesExhausted => {
                    tracing::info!(score = query::player(world).score, "no lives left");
                }
                Event::CoinCollected { coin, score } => {
                    tracing::debug!(?coin, score, "coin collected");
                }
                Event::ChunksPruned { count } => {
                    tracing::debug!(count, chunks = query::chunk_count(world), "chunks pruned");
                }
                Event::PlayerJumped { .. } | Event::PlayerLanded { .. } => {
                    tracing::debug!(?event, "player");
                }
                _ => {}
            }
        }
    }

    fn after_render(&mut self, _world: &World, elapsed: Duration) {
        tracing::trace!(render_us = elapsed.as_micros() as u64, "frame rendered");
    }
}
