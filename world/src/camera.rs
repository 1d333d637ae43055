//! Camera controller.

use snail_run_core::WorldTuning;

/// Horizontal view offset. Never decreases.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Camera {
    x: f32,
}

impl Camera {
    pub(crate) fn x(&self) -> f32 {
        self.x
    }

    /// Drifts the camera right and catches up with a player running ahead.
    ///
    /// Returns the offset before the update.
    pub(crate) fn follow(&mut self, player_x: f32, dt: f32, tuning: &WorldTuning) -> f32 {
        let previous = self.x;
        let drifted = self.x + tuning.scroll_speed * dt;
        let catch_up = player_x - tuning.viewport_width * tuning.camera_lead;
        self.x = drifted.max(catch_up).max(previous);
        previous
    }

    #[cfg(any(test, feature = "scaffolding"))]
    pub(crate) fn place(&mut self, x: f32) {
        self.x = self.x.max(x);
    }
}
