use bevy::math::DVec2;

use super::geometry::Rect;
use super::level::BatchTarget;
use super::parts::weapon::{BlowSpec, ProjectileSpec, Weapon};
use super::parts::{ItemPayload, SpriteRef};
use super::physics::Motion;
use super::stats::types::Hp;

/// Which side fired a projectile. Homing shots pick their target by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
}

/// Shared capability of every moving entity: a motion state and a sprite box.
pub trait Body {
    fn motion(&self) -> &Motion;
    fn sprite(&self) -> &SpriteRef;
    fn is_alive(&self) -> bool;
    fn kill(&mut self);

    fn position(&self) -> DVec2 {
        self.motion().position
    }

    fn rect(&self) -> Rect {
        Rect::from_center(self.motion().position, self.sprite().size())
    }
}

macro_rules! impl_body {
    ($ty:ty) => {
        impl Body for $ty {
            fn motion(&self) -> &Motion {
                &self.motion
            }

            fn sprite(&self) -> &SpriteRef {
                &self.sprite
            }

            fn is_alive(&self) -> bool {
                self.alive
            }

            fn kill(&mut self) {
                self.alive = false;
            }
        }
    };
}

// ── Moving entities ─────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Enemy {
    pub motion: Motion,
    pub sprite: SpriteRef,
    pub hp: Hp,
    pub target: BatchTarget,
    pub weapon: Option<Weapon>,
    pub alive: bool,
}

impl Enemy {
    /// Apply damage; returns true when this hit destroyed the enemy.
    pub fn take_damage(&mut self, amount: f64) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.sub_clamped(amount);
        !self.hp.is_alive()
    }
}

#[derive(Debug, Clone)]
pub struct Meteor {
    pub motion: Motion,
    pub sprite: SpriteRef,
    pub alive: bool,
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub motion: Motion,
    pub sprite: SpriteRef,
    pub owner: Owner,
    pub spec: ProjectileSpec,
    pub alive: bool,
}

impl Projectile {
    pub fn new(spec: &ProjectileSpec, owner: Owner, position: DVec2, rotation: f64) -> Self {
        let mut motion = Motion::new(position, spec.speed);
        motion.launch(rotation);
        Self {
            motion,
            sprite: spec.sprite.clone(),
            owner,
            spec: spec.clone(),
            alive: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Item {
    pub motion: Motion,
    pub sprite: SpriteRef,
    pub payload: ItemPayload,
    pub alive: bool,
}

impl_body!(Enemy);
impl_body!(Meteor);
impl_body!(Projectile);
impl_body!(Item);

// ── Area and line effects ───────────────────────────────────────────

/// Explosion area that damages every enemy in range on each active tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blow {
    pub center: DVec2,
    pub radius: f64,
    pub damage: f64,
    pub step: u32,
    pub steps: u32,
}

impl Blow {
    pub fn new(center: DVec2, spec: &BlowSpec) -> Self {
        Self {
            center,
            radius: spec.radius,
            damage: spec.damage,
            step: 0,
            steps: spec.steps,
        }
    }

    pub fn is_active(&self) -> bool {
        self.step < self.steps
    }
}

/// A beam discharge, hit-tested once in the tick it is fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Beam {
    pub from: DVec2,
    pub to: DVec2,
    pub damage: f64,
}

// ── Visual-only state ───────────────────────────────────────────────

/// Non-interacting afterimage of a resolved beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamTrace {
    pub from: DVec2,
    pub to: DVec2,
    pub ticks_left: u32,
}

/// Destruction animation state. Rendering picks the frame from progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Explosion {
    pub position: DVec2,
    pub size: DVec2,
    pub ticks_left: u32,
    pub total: u32,
}

impl Explosion {
    pub fn new(position: DVec2, size: DVec2, total: u32) -> Self {
        Self {
            position,
            size,
            ticks_left: total,
            total,
        }
    }

    /// 0.0 at start, 1.0 when finished.
    pub fn progress(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        1.0 - self.ticks_left as f64 / self.total as f64
    }
}
