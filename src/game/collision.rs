use super::components::{Beam, Blow, Body, Explosion};
use super::events::{GameEvent, ResetReason};
use super::spawner::Spawns;
use super::state::Arena;
use crate::config::tuning::Tuning;

/// Outcome of the collision matrix for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    Reset(ResetReason),
}

impl Arena {
    /// Mark an enemy destroyed: explosion, event and score, exactly once.
    pub(crate) fn destroy_enemy(&mut self, index: usize, explosion_ticks: u32) {
        let Some(enemy) = self.enemies.get_mut(index) else { return };
        if !enemy.alive {
            return;
        }
        enemy.kill();
        let (position, size) = (enemy.position(), enemy.sprite.size());
        self.explosions.push(Explosion::new(position, size, explosion_ticks));
        self.events.push(GameEvent::EnemyDestroyed { position });
        self.score += 1;
    }

    /// Mark a meteor destroyed. Only player fire scores.
    pub(crate) fn destroy_meteor(&mut self, index: usize, explosion_ticks: u32, scored: bool) {
        let Some(meteor) = self.meteors.get_mut(index) else { return };
        if !meteor.alive {
            return;
        }
        meteor.kill();
        let (position, size) = (meteor.position(), meteor.sprite.size());
        self.explosions.push(Explosion::new(position, size, explosion_ticks));
        self.events.push(GameEvent::MeteorDestroyed { position });
        if scored {
            self.score += 1;
        }
    }
}

/// Run the full collision matrix in its fixed pass order.
///
/// Entities already marked dead are skipped by every later pass, so nothing
/// resolves twice. Blows created by bombs go to `out` and start damaging on
/// the next tick. A pass that ends the run stops the matrix immediately.
pub fn resolve(arena: &mut Arena, beams: &[Beam], tuning: &Tuning, out: &mut Spawns) -> Resolution {
    let ticks = tuning.explosion_ticks;

    meteors_vs_player_projectiles(arena, ticks);
    meteors_vs_enemy_projectiles(arena, ticks);
    enemies_vs_player_projectiles(arena, ticks, out);
    enemies_vs_blows(arena, ticks);
    if let Resolution::Reset(reason) = enemies_vs_player(arena) {
        return Resolution::Reset(reason);
    }
    enemies_vs_beams(arena, beams, ticks);
    enemy_projectiles_vs_player_projectiles(arena);
    enemy_projectiles_vs_beams(arena, beams);
    if let Resolution::Reset(reason) = enemy_projectiles_vs_player(arena) {
        return Resolution::Reset(reason);
    }
    if let Resolution::Reset(reason) = meteors_vs_player(arena) {
        return Resolution::Reset(reason);
    }
    items_vs_player(arena, tuning.tps);
    Resolution::Continue
}

// ── Meteors ─────────────────────────────────────────────────────────

fn meteors_vs_player_projectiles(arena: &mut Arena, ticks: u32) {
    for mi in 0..arena.meteors.len() {
        if !arena.meteors[mi].alive {
            continue;
        }
        let rect = arena.meteors[mi].rect();
        let hit = arena
            .player_projectiles
            .iter_mut()
            .find(|p| p.alive && p.rect().intersects(&rect));
        if let Some(projectile) = hit {
            projectile.kill();
            arena.destroy_meteor(mi, ticks, true);
        }
    }
}

fn meteors_vs_enemy_projectiles(arena: &mut Arena, ticks: u32) {
    for mi in 0..arena.meteors.len() {
        if !arena.meteors[mi].alive {
            continue;
        }
        let rect = arena.meteors[mi].rect();
        let hit = arena
            .enemy_projectiles
            .iter_mut()
            .find(|p| p.alive && p.rect().intersects(&rect));
        if let Some(projectile) = hit {
            projectile.kill();
            arena.destroy_meteor(mi, ticks, false);
        }
    }
}

// ── Enemies ─────────────────────────────────────────────────────────

fn enemies_vs_player_projectiles(arena: &mut Arena, ticks: u32, out: &mut Spawns) {
    for pi in 0..arena.player_projectiles.len() {
        if !arena.player_projectiles[pi].alive {
            continue;
        }
        let rect = arena.player_projectiles[pi].rect();
        let Some(ei) = arena
            .enemies
            .iter()
            .position(|e| e.alive && e.rect().intersects(&rect))
        else {
            continue;
        };

        let projectile = &mut arena.player_projectiles[pi];
        projectile.kill();
        let (position, damage, blow) = (projectile.position(), projectile.spec.damage, projectile.spec.blow);
        match blow {
            Some(spec) => out.blows.push(Blow::new(position, &spec)),
            None => {
                if arena.enemies[ei].take_damage(damage) {
                    arena.destroy_enemy(ei, ticks);
                }
            }
        }
    }
}

fn enemies_vs_blows(arena: &mut Arena, ticks: u32) {
    for bi in 0..arena.blows.len() {
        let blow = arena.blows[bi];
        if !blow.is_active() {
            continue;
        }
        for ei in 0..arena.enemies.len() {
            let enemy = &mut arena.enemies[ei];
            if !enemy.alive || !enemy.rect().intersects_circle(blow.center, blow.radius) {
                continue;
            }
            if enemy.take_damage(blow.damage) {
                arena.destroy_enemy(ei, ticks);
            }
        }
    }
}

fn enemies_vs_player(arena: &Arena) -> Resolution {
    let rect = arena.player.rect();
    if arena.enemies.iter().any(|e| e.alive && e.rect().intersects(&rect)) {
        return Resolution::Reset(ResetReason::EnemyCollision);
    }
    Resolution::Continue
}

fn enemies_vs_beams(arena: &mut Arena, beams: &[Beam], ticks: u32) {
    for beam in beams {
        for ei in 0..arena.enemies.len() {
            let enemy = &mut arena.enemies[ei];
            if !enemy.alive || !enemy.rect().intersects_segment(beam.from, beam.to) {
                continue;
            }
            if enemy.take_damage(beam.damage) {
                arena.destroy_enemy(ei, ticks);
            }
        }
    }
}

// ── Enemy projectiles ───────────────────────────────────────────────

fn enemy_projectiles_vs_player_projectiles(arena: &mut Arena) {
    for ei in 0..arena.enemy_projectiles.len() {
        if !arena.enemy_projectiles[ei].alive {
            continue;
        }
        let rect = arena.enemy_projectiles[ei].rect();
        let hit = arena
            .player_projectiles
            .iter_mut()
            .find(|p| p.alive && p.rect().intersects(&rect));
        if let Some(projectile) = hit {
            projectile.kill();
            arena.enemy_projectiles[ei].kill();
        }
    }
}

fn enemy_projectiles_vs_beams(arena: &mut Arena, beams: &[Beam]) {
    for beam in beams {
        for projectile in &mut arena.enemy_projectiles {
            if projectile.alive && projectile.rect().intersects_segment(beam.from, beam.to) {
                projectile.kill();
            }
        }
    }
}

// ── Player body ─────────────────────────────────────────────────────

fn enemy_projectiles_vs_player(arena: &mut Arena) -> Resolution {
    let rect = arena.player.rect();
    for pi in 0..arena.enemy_projectiles.len() {
        let projectile = &mut arena.enemy_projectiles[pi];
        if !projectile.alive || !projectile.rect().intersects(&rect) {
            continue;
        }
        projectile.kill();
        let damage = projectile.spec.damage;
        let dead = arena.player.take_damage(damage);
        arena.events.push(GameEvent::PlayerHit {
            damage,
            hp: arena.player.hp.0,
        });
        if dead {
            return Resolution::Reset(ResetReason::ShotDown);
        }
    }
    Resolution::Continue
}

fn items_vs_player(arena: &mut Arena, tps: f64) {
    let rect = arena.player.rect();
    for ii in 0..arena.items.len() {
        let item = &mut arena.items[ii];
        if !item.alive || !item.rect().intersects(&rect) {
            continue;
        }
        item.kill();
        let payload = item.payload.clone();
        let id = item.sprite.id.clone();
        arena.player.apply_payload(&payload, tps);
        arena.events.push(GameEvent::ItemCollected { item: id });
    }
}

fn meteors_vs_player(arena: &Arena) -> Resolution {
    let rect = arena.player.rect();
    if arena.meteors.iter().any(|m| m.alive && m.rect().intersects(&rect)) {
        return Resolution::Reset(ResetReason::MeteorCollision);
    }
    Resolution::Continue
}
