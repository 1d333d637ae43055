//! Scripted input used by headless runs.

use snail_run_core::{Action, ActionSet};
use snail_run_world::{query, World};

/// Distance before a platform's right edge at which the autopilot jumps.
const TAKEOFF_DISTANCE: f32 = 40.0;

/// Runs right and jumps near the end of every platform.
#[derive(Debug, Default)]
pub(crate) struct Autopilot;

impl Autopilot {
    pub(crate) fn actions(&self, world: &World) -> ActionSet {
        let player = query::player(world);
        let mut actions = ActionSet::empty().with(Action::MoveRight);
        if !player.on_ground {
            return actions;
        }

        let left = player.x;
        let right = player.x + player.width;
        let support = query::platforms(world).find(|platform| {
            platform.spans(left, right) && (platform.y - player.bottom()).abs() < 1.0
        });
        let near_edge = support.map_or(true, |platform| platform.right() - right < TAKEOFF_DISTANCE);
        if near_edge {
            actions.insert(Action::Jump);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snail_run_core::{ChunkBlueprint, Command, Platform};
    use snail_run_world as world;

    fn world_with_platform(x: f32, width: f32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::AppendChunk {
                blueprint: ChunkBlueprint {
                    platform: Platform::new(x, 360.0, width, 18.0),
                    coins: Vec::new(),
                    enemy: None,
                },
            },
            &mut events,
        );
        world::apply(&mut world, Command::SpawnPlayer, &mut events);
        world
    }

    #[test]
    fn runs_without_jumping_mid_platform() {
        let world = world_with_platform(0.0, 400.0);
        let actions = Autopilot.actions(&world);
        assert!(actions.contains(Action::MoveRight));
        assert!(!actions.contains(Action::Jump));
    }

    #[test]
    fn jumps_near_platform_edge() {
        let world = world_with_platform(0.0, 160.0);
        assert!(Autopilot.actions(&world).contains(Action::Jump));
    }
}
