use bevy::math::DVec2;
use bevy::prelude::*;
use rand::Rng;
use rand::seq::SliceRandom;

use super::components::{Blow, Enemy, Item, Meteor, Projectile};
use super::level::{BatchTarget, Campaign, EnemyBatch, Layout, Progress};
use super::parts::ItemSpec;
use super::parts::registry::{Catalog, SpanRange};
use super::parts::weapon::Weapon;
use super::physics::Motion;
use super::timer::TickTimer;
use crate::config::tuning::Tuning;

/// Entities created during a tick. They join the live collections only after
/// the tick's movement and collision passes, so nothing is updated or
/// collision-tested in the tick it was born.
#[derive(Debug, Default)]
pub struct Spawns {
    pub enemies: Vec<Enemy>,
    pub meteors: Vec<Meteor>,
    pub items: Vec<Item>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub blows: Vec<Blow>,
}

/// Start positions for `count` entities of `size` in the given layout.
/// Rows stack upward above the screen top so batches fly in.
pub fn layout_positions(
    layout: Layout,
    count: u32,
    size: DVec2,
    offset: f64,
    screen_width: f64,
) -> Vec<DVec2> {
    let (w, h) = (size.x, size.y);
    let per_row = match layout {
        Layout::Lines => (screen_width / (w + offset)).floor(),
        Layout::Checkmate => (screen_width / (2.0 * w)).floor(),
    }
    .max(1.0) as u32;

    (0..count)
        .map(|i| {
            let row = i / per_row;
            let col = (i % per_row) as f64;
            let x = match layout {
                Layout::Lines => {
                    let gap = if col > 0.0 { col * offset } else { 0.0 };
                    col * w + gap
                }
                Layout::Checkmate => {
                    let shift = if row % 2 == 1 { w } else { 0.0 };
                    col * 2.0 * w + shift
                }
            };
            DVec2::new(x + w * 0.5, -(row as f64 + 0.5) * h)
        })
        .collect()
}

/// Drives meteor, item and enemy-batch spawning plus campaign progression.
///
/// Each category runs the same cycle: wait for its timer, pop the next
/// template, spawn it, then re-arm with the *next* template's delay. When the
/// queue is empty the timer is left alone.
#[derive(Debug, Clone)]
pub struct Spawner {
    pub campaign: Campaign,
    meteor_timer: TickTimer,
    item_timer: TickTimer,
    batch_timer: TickTimer,
}

impl Spawner {
    pub fn new(campaign: Campaign, tuning: &Tuning) -> Self {
        let mut spawner = Self {
            campaign,
            meteor_timer: TickTimer::from_secs(tuning.meteor_interval, tuning.tps),
            item_timer: TickTimer::new(0),
            batch_timer: TickTimer::new(0),
        };
        spawner.arm_stage(tuning);
        spawner
    }

    fn arm_stage(&mut self, tuning: &Tuning) {
        self.meteor_timer = TickTimer::from_secs(tuning.meteor_interval, tuning.tps);
        if let Some(delay) = self.campaign.next_item_delay() {
            self.item_timer = TickTimer::from_secs(delay, tuning.tps);
        }
        self.arm_wave(tuning);
    }

    fn arm_wave(&mut self, tuning: &Tuning) {
        if let Some(delay) = self.campaign.next_batch_delay() {
            self.batch_timer = TickTimer::from_secs(delay, tuning.tps);
        }
    }

    /// One scheduler step. Progression is checked before spawning, so a wave
    /// emptied this tick advances on the next call.
    pub fn update(
        &mut self,
        tuning: &Tuning,
        catalog: &Catalog,
        player_position: DVec2,
        rng: &mut impl Rng,
        out: &mut Spawns,
    ) -> Progress {
        let progress = self.campaign.check_progress();
        match progress {
            Progress::Finished => return progress,
            Progress::NextWave => self.arm_wave(tuning),
            Progress::NextStage | Progress::NextLevel => self.arm_stage(tuning),
            Progress::Holding => {}
        }

        self.meteor_timer.update();
        self.item_timer.update();
        self.batch_timer.update();

        if self.meteor_timer.is_ready() && self.campaign.meteors_left() > 0 {
            if let Some(meteor) = spawn_meteor(tuning, catalog, rng) {
                self.campaign.take_meteor();
                out.meteors.push(meteor);
                if self.campaign.meteors_left() > 0 {
                    self.meteor_timer.reset();
                }
            }
        }

        if self.item_timer.is_ready() {
            if let Some(spec) = self.campaign.pop_item() {
                debug!("Spawning item {}", spec.id);
                out.items.push(spawn_item(&spec, tuning, rng));
                if let Some(delay) = self.campaign.next_item_delay() {
                    self.item_timer = TickTimer::from_secs(delay, tuning.tps);
                }
            }
        }

        if self.batch_timer.is_ready() {
            if let Some(batch) = self.campaign.pop_batch() {
                debug!(
                    "Spawning batch of {} x {} ({:?}, {:?})",
                    batch.count, batch.enemy.id, batch.layout, batch.target
                );
                out.enemies
                    .extend(spawn_batch(&batch, tuning, player_position));
                if let Some(delay) = self.campaign.next_batch_delay() {
                    self.batch_timer = TickTimer::from_secs(delay, tuning.tps);
                }
            }
        }

        progress
    }
}

pub fn spawn_batch(batch: &EnemyBatch, tuning: &Tuning, player_position: DVec2) -> Vec<Enemy> {
    let spec = &batch.enemy;
    layout_positions(
        batch.layout,
        batch.count,
        spec.sprite.size(),
        batch.offset,
        tuning.screen_width,
    )
    .into_iter()
    .map(|position| {
        let mut motion = Motion::new(position, spec.speed);
        let target = match batch.target {
            BatchTarget::Player => player_position,
            BatchTarget::Straight => {
                DVec2::new(position.x, tuning.screen_height + tuning.exit_margin)
            }
        };
        motion.aim_at(target);
        motion.face_movement();
        Enemy {
            motion,
            sprite: spec.sprite.clone(),
            hp: super::stats::types::Hp::new(spec.hp),
            target: batch.target,
            weapon: spec.weapon.clone().map(|w| Weapon::new(w, tuning.tps)),
            alive: true,
        }
    })
    .collect()
}

fn spawn_meteor(tuning: &Tuning, catalog: &Catalog, rng: &mut impl Rng) -> Option<Meteor> {
    let spec = catalog.meteors.choose(rng)?;
    let (w, h) = (spec.sprite.width, spec.sprite.height);
    let x = SpanRange::new(w * 0.5, tuning.screen_width - w * 0.5).sample(rng);
    let target_x = SpanRange::new(0.0, tuning.screen_width).sample(rng);

    let mut motion = Motion::new(DVec2::new(x, -h * 0.5), spec.speed);
    motion.aim_at(DVec2::new(target_x, tuning.screen_height + h));
    motion.rotation_speed = SpanRange::new(-tuning.meteor_spin_max, tuning.meteor_spin_max).sample(rng);

    Some(Meteor {
        motion,
        sprite: spec.sprite.clone(),
        alive: true,
    })
}

fn spawn_item(spec: &ItemSpec, tuning: &Tuning, rng: &mut impl Rng) -> Item {
    let (w, h) = (spec.sprite.width, spec.sprite.height);
    let x = SpanRange::new(w * 0.5, tuning.screen_width - w * 0.5).sample(rng);
    let mut motion = Motion::new(DVec2::new(x, -h * 0.5), spec.speed);
    motion.aim_at(DVec2::new(x, tuning.screen_height + tuning.exit_margin));
    Item {
        motion,
        sprite: spec.sprite.clone(),
        payload: spec.payload.clone(),
        alive: true,
    }
}
