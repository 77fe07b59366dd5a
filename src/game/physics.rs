use bevy::math::DVec2;

use super::geometry::{normalize, rotation_of};

/// Shared "seek target at fixed speed" integrator.
///
/// Enemies, items and homing projectiles all move through this: integrate
/// position by the current movement vector, then re-aim at the target.
/// Meteors and straight projectiles only integrate (`advance`) and never re-aim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: DVec2,
    pub movement: DVec2,
    /// Speed scalar applied to the unit direction.
    pub speed: f64,
    pub target: DVec2,
    pub rotation: f64,
    /// Constant per-tick rotation increment (meteor spin).
    pub rotation_speed: f64,
}

impl Motion {
    pub fn new(position: DVec2, speed: f64) -> Self {
        Self {
            position,
            movement: DVec2::ZERO,
            speed,
            target: position,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    /// Set a target and aim at it immediately.
    pub fn aim_at(&mut self, target: DVec2) {
        self.target = target;
        self.movement = normalize(target - self.position) * self.speed;
    }

    /// Fixed heading: movement along `rotation` at `speed`.
    pub fn launch(&mut self, rotation: f64) {
        self.rotation = rotation;
        self.movement = super::geometry::heading(rotation) * self.speed;
    }

    /// Integrate position and spin. `scale` is 1 for per-tick speeds and
    /// `1/tps` for per-second speeds.
    pub fn advance(&mut self, scale: f64) {
        self.position += self.movement * scale;
        self.rotation += self.rotation_speed;
    }

    /// One full seek step: integrate, then re-aim at the current target.
    pub fn seek(&mut self, scale: f64) {
        self.advance(scale);
        self.aim_at(self.target);
    }

    /// Turn to face the direction of travel. Stationary bodies keep their rotation.
    pub fn face_movement(&mut self) {
        if self.movement != DVec2::ZERO {
            self.rotation = rotation_of(self.movement);
        }
    }
}
