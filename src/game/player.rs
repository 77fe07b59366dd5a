use bevy::math::DVec2;

use super::geometry::{Rect, rotation_of};
use super::intent::Intent;
use super::parts::weapon::{Weapon, WeaponSlot, WeaponSpec};
use super::parts::{ItemPayload, PlayerSpec, SpriteRef};
use super::stats::types::{Hp, angle_delta};
use crate::config::tuning::Tuning;

/// Ordered weapon list with a current selection.
#[derive(Debug, Clone, Default)]
pub struct Loadout {
    pub weapons: Vec<Weapon>,
    pub current: usize,
}

impl Loadout {
    pub fn new(specs: &[WeaponSpec], tps: f64) -> Self {
        Self {
            weapons: specs.iter().cloned().map(|s| Weapon::new(s, tps)).collect(),
            current: 0,
        }
    }

    pub fn current(&self) -> Option<&Weapon> {
        self.weapons.get(self.current)
    }

    pub fn current_mut(&mut self) -> Option<&mut Weapon> {
        self.weapons.get_mut(self.current)
    }

    /// Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) {
        if index < self.weapons.len() {
            self.current = index;
        }
    }

    pub fn cycle(&mut self, step: i32) {
        let len = self.weapons.len() as i32;
        if len == 0 || step == 0 {
            return;
        }
        self.current = (self.current as i32 + step).rem_euclid(len) as usize;
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Weapon> {
        self.weapons.iter_mut().find(|w| w.spec.id == id)
    }

    pub fn update(&mut self) {
        for weapon in &mut self.weapons {
            weapon.update();
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: DVec2,
    pub rotation: f64,
    pub sprite: SpriteRef,
    pub hp: Hp,
    pub max_hp: f64,
    /// Absorbs projectile damage before HP.
    pub shield: f64,
    /// Pixels per tick.
    pub speed: f64,
    pub turn_rate: f64,
    pub primary: Loadout,
    pub secondary: Loadout,
}

impl Player {
    pub fn new(spec: &PlayerSpec, tuning: &Tuning) -> Self {
        Self {
            position: tuning.player_start_position(),
            rotation: 0.0,
            sprite: spec.sprite.clone(),
            hp: Hp::new(spec.hp),
            max_hp: spec.hp,
            shield: 0.0,
            speed: spec.speed,
            turn_rate: tuning.player_turn_rate,
            primary: Loadout::new(&spec.primary, tuning.tps),
            secondary: Loadout::new(&spec.secondary, tuning.tps),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, self.sprite.size())
    }

    /// Move, clamp to the screen, turn toward the cursor, select weapons.
    pub fn steer(&mut self, intent: &Intent, tuning: &Tuning) {
        self.position += intent.move_dir.normalize_or_zero() * self.speed;
        let half = self.sprite.size() * 0.5;
        let bounds = Rect::new(half, tuning.screen_size() - half);
        self.position = bounds.clamp(self.position);

        if let Some(aim) = intent.aim {
            self.turn_toward(aim);
        }
        if let Some(index) = intent.select_primary {
            self.primary.select(index);
        }
        self.secondary.cycle(intent.cycle_secondary);
    }

    /// Rotate toward `aim` along the shortest arc, at most `turn_rate` per call.
    pub fn turn_toward(&mut self, aim: DVec2) {
        let dir = aim - self.position;
        if dir == DVec2::ZERO {
            return;
        }
        let delta = angle_delta(self.rotation, rotation_of(dir));
        self.rotation = (self.rotation + delta.clamp(-self.turn_rate, self.turn_rate))
            .rem_euclid(std::f64::consts::TAU);
    }

    /// Apply projectile damage. Returns true when the player is out of HP.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        let absorbed = amount.min(self.shield);
        self.shield -= absorbed;
        self.hp = self.hp.sub_clamped(amount - absorbed);
        !self.hp.is_alive()
    }

    pub fn apply_payload(&mut self, payload: &ItemPayload, tps: f64) {
        match payload {
            ItemPayload::Ammo { weapon, amount } => {
                let owned = self
                    .primary
                    .find_mut(weapon)
                    .or_else(|| self.secondary.find_mut(weapon));
                if let Some(w) = owned {
                    w.add_ammo(*amount);
                }
            }
            ItemPayload::Weapon(spec) => {
                let loadout = match spec.slot {
                    WeaponSlot::Primary => &mut self.primary,
                    WeaponSlot::Secondary => &mut self.secondary,
                };
                match loadout.find_mut(&spec.id) {
                    Some(w) => w.add_ammo(spec.ammo),
                    None => loadout.weapons.push(Weapon::new(spec.clone(), tps)),
                }
            }
            ItemPayload::Heal(amount) => {
                self.hp = self.hp.add_clamped(*amount, self.max_hp);
            }
            ItemPayload::Shield(amount) => {
                self.shield += amount.max(0.0);
            }
        }
    }

    pub fn update_weapons(&mut self) {
        self.primary.update();
        self.secondary.update();
    }
}
