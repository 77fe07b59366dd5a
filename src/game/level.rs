use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use super::parts::registry::Catalog;
use super::parts::{EnemySpec, ItemSpec};
use super::stats::types::Seconds;

/// How a batch picks where its enemies fly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchTarget {
    /// Chase the player's current position every tick.
    Player,
    /// Fall straight down past the bottom edge.
    Straight,
}

/// Start-position pattern for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Lines,
    Checkmate,
}

/// A group of enemies spawned together under one delay and layout.
#[derive(Debug, Clone)]
pub struct EnemyBatch {
    pub enemy: EnemySpec,
    pub count: u32,
    pub target: BatchTarget,
    pub layout: Layout,
    pub delay: Seconds,
    /// Extra spacing between neighbours in `Lines` layout.
    pub offset: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Wave {
    pub batches: Vec<EnemyBatch>,
}

#[derive(Debug, Clone, Default)]
pub struct Stage {
    pub meteors: u32,
    pub items: Vec<ItemSpec>,
    pub waves: Vec<Wave>,
}

#[derive(Debug, Clone, Default)]
pub struct Level {
    pub background: String,
    pub stages: Vec<Stage>,
}

/// Random level structure drawn from the catalog's generation ranges.
/// Every level gets at least one stage and every stage at least one wave.
pub fn generate_levels(catalog: &Catalog, rng: &mut impl Rng) -> Vec<Level> {
    let g = &catalog.generation;
    (0..g.levels.max(1))
        .map(|_| Level {
            background: catalog
                .backgrounds
                .choose(rng)
                .cloned()
                .unwrap_or_default(),
            stages: (0..g.stages.sample(rng).max(1))
                .map(|_| generate_stage(catalog, rng))
                .collect(),
        })
        .collect()
}

fn generate_stage(catalog: &Catalog, rng: &mut impl Rng) -> Stage {
    let g = &catalog.generation;
    let items = (0..g.items.sample(rng))
        .filter_map(|_| catalog.items.choose(rng).cloned())
        .collect();
    let waves = (0..g.waves.sample(rng).max(1))
        .map(|_| Wave {
            batches: (0..g.batches.sample(rng))
                .filter_map(|_| {
                    let enemy = catalog.enemies.choose(rng)?.clone();
                    Some(EnemyBatch {
                        enemy,
                        count: g.batch_size.sample(rng),
                        target: if rng.gen_bool(0.5) {
                            BatchTarget::Player
                        } else {
                            BatchTarget::Straight
                        },
                        layout: if rng.gen_bool(0.5) {
                            Layout::Lines
                        } else {
                            Layout::Checkmate
                        },
                        delay: Seconds::new(g.batch_delay.sample(rng)),
                        offset: g.batch_offset.sample(rng),
                    })
                })
                .collect(),
        })
        .collect();
    Stage {
        meteors: g.meteors.sample(rng),
        items,
        waves,
    }
}

/// Result of one progression check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Holding,
    NextWave,
    NextStage,
    NextLevel,
    Finished,
}

/// Level → stage → wave cursor plus the pending spawn queues of the current stage.
#[derive(Debug, Clone)]
pub struct Campaign {
    levels: Vec<Level>,
    level: usize,
    stage: usize,
    wave: usize,
    meteors_left: u32,
    items: VecDeque<ItemSpec>,
    batches: VecDeque<EnemyBatch>,
}

impl Campaign {
    pub fn new(levels: Vec<Level>) -> Self {
        let mut campaign = Self {
            levels,
            level: 0,
            stage: 0,
            wave: 0,
            meteors_left: 0,
            items: VecDeque::new(),
            batches: VecDeque::new(),
        };
        campaign.enter_stage();
        campaign
    }

    fn current_stage(&self) -> Option<&Stage> {
        self.levels.get(self.level)?.stages.get(self.stage)
    }

    fn enter_stage(&mut self) {
        self.wave = 0;
        let (meteors, items) = match self.current_stage() {
            Some(stage) => (stage.meteors, stage.items.iter().cloned().collect()),
            None => (0, VecDeque::new()),
        };
        self.meteors_left = meteors;
        self.items = items;
        self.load_wave();
    }

    fn load_wave(&mut self) {
        self.batches = self
            .current_stage()
            .and_then(|stage| stage.waves.get(self.wave))
            .map(|wave| wave.batches.iter().cloned().collect())
            .unwrap_or_default();
    }

    /// Advance the cursor if the current wave/stage/level is complete.
    ///
    /// A wave is complete when its batch queue is empty. A stage is complete
    /// when its last wave is complete, its meteor quota is spent, and its item
    /// queue is empty.
    pub fn check_progress(&mut self) -> Progress {
        if !self.batches.is_empty() {
            return Progress::Holding;
        }
        let wave_count = self.current_stage().map_or(0, |s| s.waves.len());
        if self.wave + 1 < wave_count {
            self.wave += 1;
            self.load_wave();
            return Progress::NextWave;
        }
        if self.meteors_left > 0 || !self.items.is_empty() {
            return Progress::Holding;
        }
        let stage_count = self.levels.get(self.level).map_or(0, |l| l.stages.len());
        if self.stage + 1 < stage_count {
            self.stage += 1;
            self.enter_stage();
            return Progress::NextStage;
        }
        if self.level + 1 < self.levels.len() {
            self.level += 1;
            self.stage = 0;
            self.enter_stage();
            return Progress::NextLevel;
        }
        Progress::Finished
    }

    /// Spend one meteor from the quota. Never goes below zero.
    pub fn take_meteor(&mut self) -> bool {
        if self.meteors_left == 0 {
            return false;
        }
        self.meteors_left -= 1;
        true
    }

    pub fn pop_item(&mut self) -> Option<ItemSpec> {
        self.items.pop_front()
    }

    pub fn next_item_delay(&self) -> Option<Seconds> {
        self.items.front().map(|i| i.delay)
    }

    pub fn pop_batch(&mut self) -> Option<EnemyBatch> {
        self.batches.pop_front()
    }

    pub fn next_batch_delay(&self) -> Option<Seconds> {
        self.batches.front().map(|b| b.delay)
    }

    pub fn meteors_left(&self) -> u32 {
        self.meteors_left
    }

    pub fn pending_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn level_index(&self) -> usize {
        self.level
    }

    pub fn stage_index(&self) -> usize {
        self.stage
    }

    pub fn wave_index(&self) -> usize {
        self.wave
    }

    pub fn background(&self) -> &str {
        self.levels
            .get(self.level)
            .map(|l| l.background.as_str())
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::parts::SpriteRef;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn batch(delay: f64) -> EnemyBatch {
        EnemyBatch {
            enemy: EnemySpec {
                id: "dummy".into(),
                sprite: SpriteRef::new("dummy", 10.0, 10.0),
                hp: 1.0,
                speed: 1.0,
                weapon: None,
            },
            count: 1,
            target: BatchTarget::Straight,
            layout: Layout::Lines,
            delay: Seconds(delay),
            offset: 0.0,
        }
    }

    fn stage(meteors: u32, waves: usize) -> Stage {
        Stage {
            meteors,
            items: vec![],
            waves: (0..waves)
                .map(|_| Wave {
                    batches: vec![batch(1.0)],
                })
                .collect(),
        }
    }

    #[test]
    fn holds_while_batches_pending() {
        let mut c = Campaign::new(vec![Level {
            background: "bg".into(),
            stages: vec![stage(0, 2)],
        }]);
        assert_eq!(c.check_progress(), Progress::Holding);
        assert!(c.pop_batch().is_some());
        assert_eq!(c.check_progress(), Progress::NextWave);
        assert_eq!(c.wave_index(), 1);
        assert_eq!(c.pending_batches(), 1);
    }

    #[test]
    fn stage_waits_for_meteor_quota() {
        let mut c = Campaign::new(vec![Level {
            background: "bg".into(),
            stages: vec![stage(2, 1), stage(0, 1)],
        }]);
        c.pop_batch();
        assert_eq!(c.check_progress(), Progress::Holding);
        assert!(c.take_meteor());
        assert!(c.take_meteor());
        assert!(!c.take_meteor());
        assert_eq!(c.meteors_left(), 0);
        assert_eq!(c.check_progress(), Progress::NextStage);
        assert_eq!(c.stage_index(), 1);
        assert_eq!(c.wave_index(), 0);
    }

    #[test]
    fn runs_through_levels_then_finishes() {
        let mut c = Campaign::new(vec![
            Level {
                background: "a".into(),
                stages: vec![stage(0, 1)],
            },
            Level {
                background: "b".into(),
                stages: vec![stage(0, 1)],
            },
        ]);
        c.pop_batch();
        assert_eq!(c.check_progress(), Progress::NextLevel);
        assert_eq!(c.background(), "b");
        c.pop_batch();
        assert_eq!(c.check_progress(), Progress::Finished);
    }

    #[test]
    fn empty_campaign_is_finished() {
        let mut c = Campaign::new(vec![]);
        assert_eq!(c.check_progress(), Progress::Finished);
        assert_eq!(c.background(), "");
    }

    #[test]
    fn generated_levels_respect_ranges() {
        let catalog = Catalog::with_defaults();
        let g = catalog.generation.clone();
        let mut rng = StdRng::seed_from_u64(42);
        let levels = generate_levels(&catalog, &mut rng);
        assert_eq!(levels.len(), g.levels as usize);
        for level in &levels {
            assert!(catalog.backgrounds.contains(&level.background));
            assert!((g.stages.min as usize..=g.stages.max as usize).contains(&level.stages.len()));
            for stage in &level.stages {
                assert!(stage.meteors >= g.meteors.min && stage.meteors <= g.meteors.max);
                assert!(stage.items.len() <= g.items.max as usize);
                assert!(!stage.waves.is_empty());
                for wave in &stage.waves {
                    assert!(wave.batches.len() <= g.batches.max as usize);
                    for b in &wave.batches {
                        assert!(b.count >= g.batch_size.min && b.count <= g.batch_size.max);
                        assert!(b.delay.0 >= g.batch_delay.min && b.delay.0 <= g.batch_delay.max);
                    }
                }
            }
        }
    }
}
