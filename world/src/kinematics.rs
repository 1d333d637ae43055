//! Player integration and collision against the static world.

use snail_run_core::{Action, ActionSet, ChunkId, Coin, CoinId, Event, Platform, Player};

/// Applies input, gravity and velocity to the player for one step.
///
/// Returns `true` when the step started a jump.
pub(crate) fn integrate(player: &mut Player, actions: ActionSet, dt: f32, gravity: f32) -> bool {
    player.velocity_x = 0.0;
    if actions.contains(Action::MoveRight) {
        player.velocity_x += player.speed;
    }
    if actions.contains(Action::MoveLeft) {
        player.velocity_x -= player.speed;
    }

    let jumped = actions.contains(Action::Jump) && player.on_ground;
    if jumped {
        player.velocity_y = player.jump_velocity;
        player.on_ground = false;
    }

    player.velocity_y += gravity * dt;

    player.previous_y = player.y;
    player.x += player.velocity_x * dt;
    player.y += player.velocity_y * dt;

    jumped
}

/// Keeps the player's bottom edge from sinking below the ground plane.
///
/// Returns `true` when the player was snapped onto the ground.
pub(crate) fn clamp_to_ground(player: &mut Player, ground_y: f32) -> bool {
    if player.bottom() <= ground_y {
        return false;
    }
    player.y = ground_y - player.height;
    player.velocity_y = 0.0;
    player.on_ground = true;
    true
}

/// Swept one-sided landing test against every candidate platform.
///
/// A platform catches the player only when the bottom edge was at or above its
/// top before integration, is at or below it now, and the horizontal spans
/// overlap. Side and underside contacts are ignored. Returns the last platform
/// that caught the player.
pub(crate) fn land_on_platforms<'a, I>(player: &mut Player, platforms: I) -> Option<ChunkId>
where
    I: IntoIterator<Item = (ChunkId, &'a Platform)>,
{
    let mut landed = None;
    for (chunk, platform) in platforms {
        let crossed_top =
            player.previous_bottom() <= platform.y && player.bottom() >= platform.y;
        if crossed_top && platform.spans(player.x, player.x + player.width) {
            player.y = platform.y - player.height;
            player.velocity_y = 0.0;
            player.on_ground = true;
            landed = Some(chunk);
        }
    }
    landed
}

/// Marks every uncollected coin touching the player as collected.
pub(crate) fn collect_coins<'a, I>(player: &mut Player, coins: I, coin_score: u32, out: &mut Vec<Event>)
where
    I: IntoIterator<Item = (CoinId, &'a mut Coin)>,
{
    let bounds = player.bounds();
    for (id, coin) in coins {
        if coin.collected || !bounds.overlaps(&coin.bounds()) {
            continue;
        }
        coin.collected = true;
        player.score = player.score.saturating_add(coin_score);
        out.push(Event::CoinCollected {
            coin: id,
            score: player.score,
        });
    }
}
