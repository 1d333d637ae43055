//! Enemy patrol movement and player contact resolution.

use std::time::Duration;

use snail_run_core::{
    Enemy, EnemyId, Event, PhysicsTuning, Platform, Player, WorldTuning, RETIRED_ENEMY_X,
};

use crate::arena::ChunkArena;

/// Moves every active enemy and resolves its contact with the player.
///
/// Enemies are processed in chunk order; each one moves and is tested against
/// the player before the next one moves.
pub(crate) fn advance_enemies(
    arena: &mut ChunkArena,
    player: &mut Player,
    dt: f32,
    now: Duration,
    tuning: &WorldTuning,
    out: &mut Vec<Event>,
) {
    let lift = tuning.generation.enemy_lift;
    for index in 0..arena.len() {
        let Some((id, mut enemy)) = arena
            .slot(index)
            .and_then(|slot| slot.enemy.map(|enemy| (EnemyId::new(slot.id), enemy)))
        else {
            continue;
        };
        if enemy.is_retired() {
            continue;
        }

        enemy.x += enemy.velocity_x * dt;
        if let Some(platform) = supporting_platform(arena, &enemy, lift, &tuning.physics) {
            patrol_within(&mut enemy, &platform, lift, &tuning.physics);
        }
        resolve_contact(player, &mut enemy, id, now, &tuning.physics, out);

        if let Some(slot) = arena.slot_mut(index) {
            slot.enemy = Some(enemy);
        }
    }
}

/// Finds the first platform whose span contains the enemy and whose surface
/// sits at the enemy's resting height.
fn supporting_platform(
    arena: &ChunkArena,
    enemy: &Enemy,
    lift: f32,
    physics: &PhysicsTuning,
) -> Option<Platform> {
    arena
        .iter()
        .map(|slot| slot.platform)
        .find(|platform| is_supported_by(enemy, platform, lift, physics.surface_tolerance))
}

fn is_supported_by(enemy: &Enemy, platform: &Platform, lift: f32, tolerance: f32) -> bool {
    let inside = enemy.x > platform.x && enemy.x < platform.right();
    inside && ((platform.y - enemy.y) - lift).abs() < tolerance
}

/// Keeps the enemy inside its platform's patrol margins and rests it on the surface.
fn patrol_within(enemy: &mut Enemy, platform: &Platform, lift: f32, physics: &PhysicsTuning) {
    let left_limit = platform.x + physics.patrol_left_margin;
    let right_limit = platform.right() - physics.patrol_right_margin;
    if enemy.x < left_limit {
        enemy.x = left_limit;
        enemy.velocity_x = enemy.velocity_x.abs();
    }
    if enemy.x > right_limit {
        enemy.x = right_limit;
        enemy.velocity_x = -enemy.velocity_x.abs();
    }
    enemy.y = platform.y - lift;
}

fn resolve_contact(
    player: &mut Player,
    enemy: &mut Enemy,
    id: EnemyId,
    now: Duration,
    physics: &PhysicsTuning,
    out: &mut Vec<Event>,
) {
    if !player.bounds().overlaps(&enemy.bounds()) {
        return;
    }

    if player.velocity_y > physics.stomp_speed_threshold {
        player.velocity_y = player.jump_velocity * physics.stomp_bounce_factor;
        player.score = player.score.saturating_add(physics.stomp_score);
        enemy.x = RETIRED_ENEMY_X;
        out.push(Event::EnemyStomped {
            enemy: id,
            score: player.score,
        });
        return;
    }

    let cooled_down = player
        .last_hit
        .map_or(true, |last| now.saturating_sub(last) > physics.hurt_cooldown());
    if !cooled_down {
        return;
    }

    let facing = if enemy.velocity_x == 0.0 {
        1.0
    } else {
        enemy.velocity_x.signum()
    };
    player.lives = player.lives.saturating_sub(1);
    player.velocity_x = -facing * physics.knockback_speed;
    player.velocity_y = physics.knockback_lift;
    player.last_hit = Some(now);
    out.push(Event::PlayerHit {
        enemy: id,
        lives: player.lives,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use snail_run_core::{ChunkBlueprint, ChunkId, PlayerTuning};

    fn arena_with_enemy(enemy: Enemy) -> ChunkArena {
        let mut arena = ChunkArena::new();
        let _ = arena.append(ChunkBlueprint {
            platform: Platform::new(0.0, 360.0, 200.0, 18.0),
            coins: Vec::new(),
            enemy: Some(enemy),
        });
        arena
    }

    fn enemy_of(arena: &ChunkArena) -> Enemy {
        arena
            .get(ChunkId::new(0))
            .and_then(|slot| slot.enemy)
            .expect("enemy present")
    }

    fn distant_player() -> Player {
        let mut player = Player::from_tuning(&PlayerTuning::default());
        player.x = 2_000.0;
        player
    }

    #[test]
    fn enemy_turns_at_left_margin() {
        let mut arena = arena_with_enemy(Enemy::new(9.0, 342.0, 34.0, 24.0, -40.0));
        let mut player = distant_player();
        let mut events = Vec::new();

        advance_enemies(
            &mut arena,
            &mut player,
            0.1,
            Duration::ZERO,
            &WorldTuning::default(),
            &mut events,
        );

        let enemy = enemy_of(&arena);
        assert!((enemy.x - 8.0).abs() < f32::EPSILON);
        assert!(enemy.velocity_x > 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn unsupported_enemy_drifts_without_vertical_correction() {
        let mut arena = arena_with_enemy(Enemy::new(100.0, 100.0, 34.0, 24.0, 40.0));
        let mut player = distant_player();
        let mut events = Vec::new();

        advance_enemies(
            &mut arena,
            &mut player,
            0.5,
            Duration::ZERO,
            &WorldTuning::default(),
            &mut events,
        );

        let enemy = enemy_of(&arena);
        assert!((enemy.x - 120.0).abs() < f32::EPSILON);
        assert!((enemy.y - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn retired_enemy_stays_at_sentinel() {
        let mut arena = arena_with_enemy(Enemy::new(RETIRED_ENEMY_X, 342.0, 34.0, 24.0, 40.0));
        let mut player = distant_player();
        let mut events = Vec::new();

        advance_enemies(
            &mut arena,
            &mut player,
            0.5,
            Duration::ZERO,
            &WorldTuning::default(),
            &mut events,
        );

        assert!(enemy_of(&arena).is_retired());
    }

    #[test]
    fn hit_knocks_player_away_from_enemy_facing() {
        let physics = PhysicsTuning::default();
        let mut player = Player::from_tuning(&PlayerTuning::default());
        player.x = 100.0;
        player.y = 320.0;
        let mut enemy = Enemy::new(110.0, 342.0, 34.0, 24.0, 40.0);
        let mut events = Vec::new();

        resolve_contact(
            &mut player,
            &mut enemy,
            EnemyId::new(ChunkId::new(3)),
            Duration::from_secs(5),
            &physics,
            &mut events,
        );

        assert_eq!(player.lives, 2);
        assert!((player.velocity_x + 260.0).abs() < f32::EPSILON);
        assert!((player.velocity_y + 420.0).abs() < f32::EPSILON);
        assert_eq!(player.last_hit, Some(Duration::from_secs(5)));
        assert_eq!(
            events,
            vec![Event::PlayerHit {
                enemy: EnemyId::new(ChunkId::new(3)),
                lives: 2,
            }]
        );
    }

    #[test]
    fn stationary_enemy_knocks_player_left() {
        let physics = PhysicsTuning::default();
        let mut player = Player::from_tuning(&PlayerTuning::default());
        player.x = 100.0;
        player.y = 320.0;
        let mut enemy = Enemy::new(110.0, 342.0, 34.0, 24.0, 0.0);
        let mut events = Vec::new();

        resolve_contact(
            &mut player,
            &mut enemy,
            EnemyId::new(ChunkId::new(0)),
            Duration::ZERO,
            &physics,
            &mut events,
        );

        assert!(player.velocity_x < 0.0);
    }

    #[test]
    fn lives_never_drop_below_zero() {
        let physics = PhysicsTuning::default();
        let mut player = Player::from_tuning(&PlayerTuning::default());
        player.lives = 0;
        player.x = 100.0;
        player.y = 320.0;
        let mut enemy = Enemy::new(110.0, 342.0, 34.0, 24.0, -40.0);
        let mut events = Vec::new();

        resolve_contact(
            &mut player,
            &mut enemy,
            EnemyId::new(ChunkId::new(0)),
            Duration::ZERO,
            &physics,
            &mut events,
        );

        assert_eq!(player.lives, 0);
        assert!(player.velocity_x > 0.0);
    }
}
