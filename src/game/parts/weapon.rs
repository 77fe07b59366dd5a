use serde::{Deserialize, Serialize};

use super::SpriteRef;
use crate::game::stats::types::Seconds;
use crate::game::timer::TickTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSlot {
    Primary,
    Secondary,
}

/// How a projectile (or an enemy) picks its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    /// Constant heading from spawn rotation.
    Straight,
    /// Re-aim at the live target every tick.
    Auto,
}

/// Area effect left behind when an explosive projectile hits an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlowSpec {
    pub radius: f64,
    /// Damage per tick to every enemy in range.
    pub damage: f64,
    /// Number of ticks the blow stays active.
    pub steps: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub sprite: SpriteRef,
    pub damage: f64,
    /// Pixels per second.
    pub speed: f64,
    pub target: TargetMode,
    pub blow: Option<BlowSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WeaponKind {
    Single(ProjectileSpec),
    /// Two barrels at +/- `spacing / 2` from the center line.
    Double {
        projectile: ProjectileSpec,
        spacing: f64,
    },
    /// Instant full-line hit. Player-only.
    Beam { damage: f64, length: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub id: String,
    pub name: String,
    pub slot: WeaponSlot,
    pub kind: WeaponKind,
    pub cooldown: Seconds,
    pub ammo: u32,
}

/// A weapon instance: template + remaining ammo + cooldown.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub spec: WeaponSpec,
    pub ammo: u32,
    cooldown: TickTimer,
}

impl Weapon {
    pub fn new(spec: WeaponSpec, tps: f64) -> Self {
        let cooldown = TickTimer::ready(spec.cooldown.to_ticks(tps));
        Self {
            ammo: spec.ammo,
            spec,
            cooldown,
        }
    }

    pub fn update(&mut self) {
        self.cooldown.update();
    }

    pub fn can_fire(&self) -> bool {
        self.cooldown.is_ready() && self.ammo > 0
    }

    /// Pull the trigger. One ammo per pull regardless of barrel count.
    /// Returns the discharge pattern, or `None` with nothing consumed.
    pub fn try_fire(&mut self) -> Option<WeaponKind> {
        if !self.can_fire() {
            return None;
        }
        self.ammo -= 1;
        self.cooldown.reset();
        Some(self.spec.kind.clone())
    }

    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount);
    }
}
