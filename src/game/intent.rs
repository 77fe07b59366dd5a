use bevy::math::DVec2;
use bevy::prelude::*;

/// Input intent: written in Update, consumed once per simulation tick.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Intent {
    /// Desired movement direction in screen space (y down). Normalized on use.
    pub move_dir: DVec2,
    /// Cursor position in screen space, if the cursor is over the window.
    pub aim: Option<DVec2>,
    pub fire_primary: bool,
    pub fire_secondary: bool,
    /// Select a primary weapon by loadout index.
    pub select_primary: Option<usize>,
    /// Step through the secondary loadout (+1 / -1).
    pub cycle_secondary: i32,
}
