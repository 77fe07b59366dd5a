use bevy::math::DVec2;
use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::collision::{self, Resolution};
use super::combat::{self, Discharge};
use super::components::{Beam, BeamTrace, Blow, Body, Enemy, Explosion, Item, Meteor, Owner, Projectile};
use super::events::{GameEvent, ResetReason};
use super::geometry::Rect;
use super::intent::Intent;
use super::level::{BatchTarget, Campaign, Level, Progress, generate_levels};
use super::parts::registry::Catalog;
use super::parts::weapon::TargetMode;
use super::player::Player;
use super::spawner::{Spawner, Spawns};
use super::stats::types::Tick;
use crate::config::tuning::Tuning;

#[cfg(test)]
mod tests;

/// Every live entity of a run plus the run's score and event log.
#[derive(Debug, Clone)]
pub struct Arena {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub meteors: Vec<Meteor>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub items: Vec<Item>,
    pub blows: Vec<Blow>,
    pub beam_traces: Vec<BeamTrace>,
    pub explosions: Vec<Explosion>,
    pub score: u32,
    pub events: Vec<GameEvent>,
}

impl Arena {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            enemies: Vec::new(),
            meteors: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            items: Vec::new(),
            blows: Vec::new(),
            beam_traces: Vec::new(),
            explosions: Vec::new(),
            score: 0,
            events: Vec::new(),
        }
    }
}

/// Where a run's levels come from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// The same levels every run.
    Fixed(Vec<Level>),
    /// Freshly generated from the catalog on every reset.
    Generated,
}

fn build_campaign(source: &LevelSource, catalog: &Catalog, rng: &mut StdRng) -> Campaign {
    match source {
        LevelSource::Fixed(levels) => Campaign::new(levels.clone()),
        LevelSource::Generated => Campaign::new(generate_levels(catalog, rng)),
    }
}

/// The simulation: owns all entity collections and advances them one tick at a time.
#[derive(Resource)]
pub struct Game {
    tuning: Tuning,
    catalog: Catalog,
    rng: StdRng,
    source: LevelSource,
    spawner: Spawner,
    arena: Arena,
    pending: Spawns,
    tick: Tick,
    best_score: u32,
}

impl Game {
    /// A game over procedurally generated levels.
    pub fn new(catalog: Catalog, tuning: Tuning, seed: u64) -> Self {
        Self::with_source(catalog, tuning, LevelSource::Generated, seed)
    }

    /// A game over a fixed level list.
    pub fn with_levels(catalog: Catalog, tuning: Tuning, levels: Vec<Level>, seed: u64) -> Self {
        Self::with_source(catalog, tuning, LevelSource::Fixed(levels), seed)
    }

    fn with_source(catalog: Catalog, tuning: Tuning, source: LevelSource, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let campaign = build_campaign(&source, &catalog, &mut rng);
        let spawner = Spawner::new(campaign, &tuning);
        let arena = Arena::new(Player::new(&catalog.player, &tuning));
        Self {
            tuning,
            catalog,
            rng,
            source,
            spawner,
            arena,
            pending: Spawns::default(),
            tick: Tick::default(),
            best_score: 0,
        }
    }

    /// Advance the simulation by one tick.
    ///
    /// Order: scheduler, movement (player, enemies, meteors, projectiles,
    /// items), collisions, pruning, visual effects. Entities created during
    /// the tick join the live collections last.
    pub fn update(&mut self, intent: &Intent) {
        self.tick = self.tick.next();

        let progress = self.spawner.update(
            &self.tuning,
            &self.catalog,
            self.arena.player.position,
            &mut self.rng,
            &mut self.pending,
        );
        if !self.record_progress(progress) {
            self.reset(ResetReason::CampaignComplete);
            return;
        }

        self.arena.player.steer(intent, &self.tuning);
        self.arena.player.update_weapons();
        let beams = combat::fire_player(
            &mut self.arena.player,
            intent,
            &mut self.pending,
            &mut self.arena.events,
        );
        self.move_enemies();
        for meteor in &mut self.arena.meteors {
            meteor.motion.advance(1.0);
        }
        self.move_projectiles();
        for item in &mut self.arena.items {
            item.motion.seek(1.0);
        }

        if let Resolution::Reset(reason) =
            collision::resolve(&mut self.arena, &beams, &self.tuning, &mut self.pending)
        {
            self.reset(reason);
            return;
        }
        self.trace_beams(&beams);

        self.prune();
        self.advance_effects();
        self.flush_pending();
    }

    /// Returns false once the campaign is finished.
    fn record_progress(&mut self, progress: Progress) -> bool {
        let campaign = &self.spawner.campaign;
        let event = match progress {
            Progress::Holding => return true,
            Progress::Finished => return false,
            Progress::NextWave => GameEvent::WaveAdvanced {
                wave: campaign.wave_index() + 1,
            },
            Progress::NextStage => GameEvent::StageAdvanced {
                stage: campaign.stage_index() + 1,
            },
            Progress::NextLevel => GameEvent::LevelAdvanced {
                level: campaign.level_index() + 1,
            },
        };
        debug!(
            "Campaign at level {} stage {} wave {}, {} batches queued",
            campaign.level_index() + 1,
            campaign.stage_index() + 1,
            campaign.wave_index() + 1,
            campaign.pending_batches()
        );
        self.arena.events.push(event);
        true
    }

    fn move_enemies(&mut self) {
        let player_position = self.arena.player.position;
        let screen = Rect::new(DVec2::ZERO, self.tuning.screen_size());

        for enemy in &mut self.arena.enemies {
            if enemy.target == BatchTarget::Player {
                enemy.motion.target = player_position;
            }
            enemy.motion.seek(1.0);
            enemy.motion.face_movement();

            let rect = enemy.rect();
            let Some(weapon) = enemy.weapon.as_mut() else { continue };
            weapon.update();
            if !(screen.contains(rect.min) && screen.contains(rect.max)) {
                continue;
            }
            let Some(kind) = weapon.try_fire() else { continue };
            let muzzle = enemy.sprite.height * 0.5;
            match combat::discharge(kind, Owner::Enemy, enemy.motion.position, enemy.motion.rotation, muzzle) {
                Discharge::Projectiles(shots) => self.pending.enemy_projectiles.extend(shots),
                Discharge::Beam(_) => {}
            }
        }
    }

    fn move_projectiles(&mut self) {
        let dt = self.tuning.dt();
        let arena = &mut self.arena;
        let player_position = arena.player.position;
        let enemies = &arena.enemies;

        for shot in arena
            .player_projectiles
            .iter_mut()
            .chain(arena.enemy_projectiles.iter_mut())
        {
            let target = homing_target(shot, enemies, player_position);
            steer_projectile(shot, target, dt);
        }
    }

    fn trace_beams(&mut self, beams: &[Beam]) {
        let ticks = self.tuning.beam_trace_ticks;
        self.arena
            .beam_traces
            .extend(beams.iter().map(|beam| BeamTrace {
                from: beam.from,
                to: beam.to,
                ticks_left: ticks,
            }));
    }

    /// Drop destroyed entities and everything past its exit edge.
    fn prune(&mut self) {
        let bottom = self.tuning.screen_height;
        let screen = Rect::new(DVec2::ZERO, self.tuning.screen_size());
        let arena = &mut self.arena;

        arena.enemies.retain(|e| e.is_alive() && e.position().y <= bottom);
        arena.meteors.retain(|m| m.is_alive() && m.position().y <= bottom);
        arena.items.retain(|i| i.is_alive() && i.position().y <= bottom);
        arena
            .player_projectiles
            .retain(|p| p.is_alive() && screen.contains(p.position()));
        arena
            .enemy_projectiles
            .retain(|p| p.is_alive() && screen.contains(p.position()));
    }

    fn advance_effects(&mut self) {
        let arena = &mut self.arena;
        for blow in &mut arena.blows {
            blow.step += 1;
        }
        arena.blows.retain(Blow::is_active);

        for explosion in &mut arena.explosions {
            explosion.ticks_left = explosion.ticks_left.saturating_sub(1);
        }
        arena.explosions.retain(|e| e.ticks_left > 0);

        for trace in &mut arena.beam_traces {
            trace.ticks_left = trace.ticks_left.saturating_sub(1);
        }
        arena.beam_traces.retain(|t| t.ticks_left > 0);
    }

    fn flush_pending(&mut self) {
        let Spawns {
            enemies,
            meteors,
            items,
            player_projectiles,
            enemy_projectiles,
            blows,
        } = std::mem::take(&mut self.pending);
        let arena = &mut self.arena;
        arena.enemies.extend(enemies);
        arena.meteors.extend(meteors);
        arena.items.extend(items);
        arena.player_projectiles.extend(player_projectiles);
        arena.enemy_projectiles.extend(enemy_projectiles);
        arena.blows.extend(blows);
    }

    /// Throw the run away and start over from the first level.
    pub fn reset(&mut self, reason: ResetReason) {
        let score = self.arena.score;
        self.best_score = self.best_score.max(score);
        info!("Game reset ({:?}) with score {}, best {}", reason, score, self.best_score);

        let mut events = std::mem::take(&mut self.arena.events);
        events.push(GameEvent::Reset { reason, score });

        let campaign = build_campaign(&self.source, &self.catalog, &mut self.rng);
        self.spawner = Spawner::new(campaign, &self.tuning);
        self.arena = Arena::new(Player::new(&self.catalog.player, &self.tuning));
        self.arena.events = events;
        self.pending = Spawns::default();
        self.tick = Tick::default();
    }

    /// Swap in new tuning; takes full effect from the next reset.
    pub fn set_tuning(&mut self, tuning: Tuning) {
        self.tuning = tuning;
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.arena.events)
    }

    // ── Read-only accessors ─────────────────────────────────────────

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn score(&self) -> u32 {
        self.arena.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score.max(self.arena.score)
    }

    pub fn hp(&self) -> f64 {
        self.arena.player.hp.0
    }

    pub fn max_hp(&self) -> f64 {
        self.arena.player.max_hp
    }

    pub fn shield(&self) -> f64 {
        self.arena.player.shield
    }

    /// 1-based, for display.
    pub fn level(&self) -> usize {
        self.spawner.campaign.level_index() + 1
    }

    pub fn stage(&self) -> usize {
        self.spawner.campaign.stage_index() + 1
    }

    pub fn wave(&self) -> usize {
        self.spawner.campaign.wave_index() + 1
    }

    pub fn background(&self) -> &str {
        self.spawner.campaign.background()
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }
}

/// Player shots chase the nearest enemy, enemy shots chase the player.
fn homing_target(shot: &Projectile, enemies: &[Enemy], player_position: DVec2) -> Option<DVec2> {
    match (shot.spec.target, shot.owner) {
        (TargetMode::Straight, _) => None,
        (TargetMode::Auto, Owner::Player) => nearest_enemy(enemies, shot.motion.position),
        (TargetMode::Auto, Owner::Enemy) => Some(player_position),
    }
}

fn nearest_enemy(enemies: &[Enemy], from: DVec2) -> Option<DVec2> {
    enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| e.position())
        .min_by(|a, b| a.distance_squared(from).total_cmp(&b.distance_squared(from)))
}

/// Homing shots re-aim at `target` every tick; without one they keep their heading.
fn steer_projectile(shot: &mut Projectile, target: Option<DVec2>, dt: f64) {
    match target {
        Some(target) => {
            shot.motion.target = target;
            shot.motion.seek(dt);
            shot.motion.face_movement();
        }
        None => shot.motion.advance(dt),
    }
}
