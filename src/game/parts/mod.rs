pub mod registry;
pub mod weapon;

use bevy::math::DVec2;
use serde::{Deserialize, Serialize};

use self::weapon::WeaponSpec;
use crate::game::stats::types::Seconds;

/// Opaque sprite handle. The simulation only reads the bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRef {
    pub id: String,
    pub width: f64,
    pub height: f64,
}

impl SpriteRef {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    pub fn size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}

/// Player template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSpec {
    pub sprite: SpriteRef,
    pub hp: f64,
    /// Pixels per tick.
    pub speed: f64,
    pub primary: Vec<WeaponSpec>,
    pub secondary: Vec<WeaponSpec>,
}

/// Enemy template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemySpec {
    pub id: String,
    pub sprite: SpriteRef,
    pub hp: f64,
    /// Pixels per tick.
    pub speed: f64,
    pub weapon: Option<WeaponSpec>,
}

/// Meteor template. Spin is randomized per instance from tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteorSpec {
    pub id: String,
    pub sprite: SpriteRef,
    /// Pixels per tick.
    pub speed: f64,
}

/// What an item does when the player picks it up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ItemPayload {
    /// Extra ammo for the owned weapon with this id.
    Ammo { weapon: String, amount: u32 },
    Weapon(WeaponSpec),
    Heal(f64),
    Shield(f64),
}

/// Item template, including the delay before it spawns within a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSpec {
    pub id: String,
    pub sprite: SpriteRef,
    /// Pixels per tick.
    pub speed: f64,
    pub delay: Seconds,
    pub payload: ItemPayload,
}
