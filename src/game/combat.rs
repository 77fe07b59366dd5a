use bevy::math::DVec2;

use super::components::{Beam, Owner, Projectile};
use super::events::GameEvent;
use super::geometry::heading;
use super::intent::Intent;
use super::parts::weapon::{WeaponKind, WeaponSlot};
use super::player::Player;
use super::spawner::Spawns;

/// What a trigger pull puts into the world.
#[derive(Debug, Clone)]
pub enum Discharge {
    Projectiles(Vec<Projectile>),
    Beam(Beam),
}

/// Turn a fired weapon pattern into projectiles or a beam.
///
/// Projectiles start `muzzle` pixels ahead of `center` along the heading and
/// inherit the firer's rotation. Double barrels sit symmetrically left and
/// right of the center line.
pub fn discharge(kind: WeaponKind, owner: Owner, center: DVec2, rotation: f64, muzzle: f64) -> Discharge {
    let forward = heading(rotation);
    let origin = center + forward * muzzle;
    match kind {
        WeaponKind::Single(spec) => {
            Discharge::Projectiles(vec![Projectile::new(&spec, owner, origin, rotation)])
        }
        WeaponKind::Double { projectile, spacing } => {
            let side = DVec2::new(rotation.cos(), rotation.sin()) * (spacing * 0.5);
            Discharge::Projectiles(vec![
                Projectile::new(&projectile, owner, origin - side, rotation),
                Projectile::new(&projectile, owner, origin + side, rotation),
            ])
        }
        WeaponKind::Beam { damage, length } => Discharge::Beam(Beam {
            from: origin,
            to: origin + forward * length,
            damage,
        }),
    }
}

/// Handle both player triggers for this tick. Projectiles go to `out`;
/// beams are returned to be resolved in this tick's collision pass.
pub fn fire_player(
    player: &mut Player,
    intent: &Intent,
    out: &mut Spawns,
    events: &mut Vec<GameEvent>,
) -> Vec<Beam> {
    let mut beams = Vec::new();
    let center = player.position;
    let rotation = player.rotation;
    let muzzle = player.sprite.height * 0.5;

    let triggers = [
        (WeaponSlot::Primary, intent.fire_primary),
        (WeaponSlot::Secondary, intent.fire_secondary),
    ];
    for (slot, pressed) in triggers {
        if !pressed {
            continue;
        }
        let loadout = match slot {
            WeaponSlot::Primary => &mut player.primary,
            WeaponSlot::Secondary => &mut player.secondary,
        };
        let Some(weapon) = loadout.current_mut() else { continue };
        let Some(kind) = weapon.try_fire() else { continue };

        events.push(GameEvent::WeaponFired {
            slot,
            weapon: weapon.spec.id.clone(),
            ammo_left: weapon.ammo,
        });
        match discharge(kind, Owner::Player, center, rotation, muzzle) {
            Discharge::Projectiles(shots) => out.player_projectiles.extend(shots),
            Discharge::Beam(beam) => beams.push(beam),
        }
    }
    beams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parts::registry::{blaster, double_rocket};
    use approx::assert_relative_eq;

    #[test]
    fn single_spawns_ahead_of_firer() {
        let Discharge::Projectiles(shots) =
            discharge(blaster().kind, Owner::Player, DVec2::new(100.0, 100.0), 0.0, 20.0)
        else {
            panic!("expected projectiles");
        };
        assert_eq!(shots.len(), 1);
        assert_relative_eq!(shots[0].motion.position.x, 100.0);
        assert_relative_eq!(shots[0].motion.position.y, 80.0);
        assert!(shots[0].motion.movement.y < 0.0);
        assert_eq!(shots[0].owner, Owner::Player);
    }

    #[test]
    fn double_spawns_symmetric_pair() {
        let Discharge::Projectiles(shots) =
            discharge(double_rocket().kind, Owner::Enemy, DVec2::ZERO, 0.0, 0.0)
        else {
            panic!("expected projectiles");
        };
        assert_eq!(shots.len(), 2);
        assert_relative_eq!(shots[0].motion.position.x, -10.0);
        assert_relative_eq!(shots[1].motion.position.x, 10.0);
        assert_eq!(shots[0].motion.rotation, shots[1].motion.rotation);
    }

    #[test]
    fn beam_spans_its_length() {
        let kind = WeaponKind::Beam {
            damage: 3.0,
            length: 50.0,
        };
        let Discharge::Beam(beam) = discharge(kind, Owner::Player, DVec2::new(0.0, 100.0), 0.0, 10.0)
        else {
            panic!("expected beam");
        };
        assert_relative_eq!(beam.from.y, 90.0);
        assert_relative_eq!(beam.to.y, 40.0);
        assert_eq!(beam.damage, 3.0);
    }
}
