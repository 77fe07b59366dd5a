use std::fmt;
use std::path::PathBuf;

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::weapon::{BlowSpec, ProjectileSpec, TargetMode, WeaponKind, WeaponSlot, WeaponSpec};
use super::{EnemySpec, ItemPayload, ItemSpec, MeteorSpec, PlayerSpec, SpriteRef};
use crate::config::tuning::Tuning;
use crate::game::stats::types::Seconds;

/// Inclusive integer range used by the level randomizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(self, rng: &mut impl Rng) -> u32 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Inclusive float range used by the level randomizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpanRange {
    pub min: f64,
    pub max: f64,
}

impl SpanRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample(self, rng: &mut impl Rng) -> f64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }
}

/// Knobs for procedural level structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSpec {
    pub levels: u32,
    pub stages: CountRange,
    pub waves: CountRange,
    pub batches: CountRange,
    pub batch_size: CountRange,
    pub meteors: CountRange,
    pub items: CountRange,
    /// Seconds before a batch spawns.
    pub batch_delay: SpanRange,
    /// Layout spacing in pixels.
    pub batch_offset: SpanRange,
}

impl Default for GenerationSpec {
    fn default() -> Self {
        Self {
            levels: 3,
            stages: CountRange::new(2, 3),
            waves: CountRange::new(2, 4),
            batches: CountRange::new(1, 3),
            batch_size: CountRange::new(3, 8),
            meteors: CountRange::new(3, 8),
            items: CountRange::new(0, 2),
            batch_delay: SpanRange::new(1.0, 3.0),
            batch_offset: SpanRange::new(8.0, 24.0),
        }
    }
}

/// Reasons a content catalog is unusable.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    NoEnemies,
    NoMeteors,
    NoBackgrounds,
    NoPrimaryWeapon,
    NoLevels,
    EnemyBeamWeapon { enemy: String },
    BadSprite { id: String },
    InvertedRange { field: &'static str },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEnemies => write!(f, "catalog has no enemy templates"),
            Self::NoMeteors => write!(f, "catalog has no meteor templates"),
            Self::NoBackgrounds => write!(f, "catalog has no backgrounds"),
            Self::NoPrimaryWeapon => write!(f, "player has no primary weapon"),
            Self::NoLevels => write!(f, "generation produces zero levels"),
            Self::EnemyBeamWeapon { enemy } => {
                write!(f, "enemy `{enemy}` carries a beam weapon (player-only)")
            }
            Self::BadSprite { id } => write!(f, "sprite `{id}` has a non-positive size"),
            Self::InvertedRange { field } => write!(f, "generation range `{field}` has min > max"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Static content tables: every entity template the simulation can spawn.
/// Built once at startup and handed to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub player: PlayerSpec,
    pub enemies: Vec<EnemySpec>,
    pub meteors: Vec<MeteorSpec>,
    pub items: Vec<ItemSpec>,
    pub backgrounds: Vec<String>,
    pub generation: GenerationSpec,
}

fn laser() -> ProjectileSpec {
    ProjectileSpec {
        sprite: SpriteRef::new("laser", 6.0, 16.0),
        damage: 2.0,
        speed: 600.0,
        target: TargetMode::Straight,
        blow: None,
    }
}

fn rocket() -> ProjectileSpec {
    ProjectileSpec {
        sprite: SpriteRef::new("rocket", 10.0, 24.0),
        damage: 4.0,
        speed: 400.0,
        target: TargetMode::Auto,
        blow: None,
    }
}

pub fn blaster() -> WeaponSpec {
    WeaponSpec {
        id: "blaster".into(),
        name: "Blaster".into(),
        slot: WeaponSlot::Primary,
        kind: WeaponKind::Single(laser()),
        cooldown: Seconds(0.2),
        ammo: 9999,
    }
}

pub fn double_blaster() -> WeaponSpec {
    WeaponSpec {
        id: "double_blaster".into(),
        name: "Double Blaster".into(),
        slot: WeaponSlot::Primary,
        kind: WeaponKind::Double {
            projectile: laser(),
            spacing: 14.0,
        },
        cooldown: Seconds(0.25),
        ammo: 500,
    }
}

pub fn homing_rocket() -> WeaponSpec {
    WeaponSpec {
        id: "rocket".into(),
        name: "Rocket".into(),
        slot: WeaponSlot::Secondary,
        kind: WeaponKind::Single(rocket()),
        cooldown: Seconds(0.8),
        ammo: 20,
    }
}

pub fn double_rocket() -> WeaponSpec {
    WeaponSpec {
        id: "double_rocket".into(),
        name: "Double Rocket".into(),
        slot: WeaponSlot::Secondary,
        kind: WeaponKind::Double {
            projectile: rocket(),
            spacing: 20.0,
        },
        cooldown: Seconds(1.0),
        ammo: 12,
    }
}

pub fn bomb() -> WeaponSpec {
    WeaponSpec {
        id: "bomb".into(),
        name: "Bomb".into(),
        slot: WeaponSlot::Secondary,
        kind: WeaponKind::Single(ProjectileSpec {
            sprite: SpriteRef::new("bomb", 16.0, 16.0),
            damage: 0.0,
            speed: 300.0,
            target: TargetMode::Straight,
            blow: Some(BlowSpec {
                radius: 80.0,
                damage: 3.0,
                steps: 20,
            }),
        }),
        cooldown: Seconds(1.2),
        ammo: 5,
    }
}

pub fn beam() -> WeaponSpec {
    WeaponSpec {
        id: "beam".into(),
        name: "Beam".into(),
        slot: WeaponSlot::Secondary,
        kind: WeaponKind::Beam {
            damage: 10.0,
            length: 900.0,
        },
        cooldown: Seconds(1.5),
        ammo: 5,
    }
}

fn enemy_gun(id: &str, projectile: ProjectileSpec, cooldown: f64) -> WeaponSpec {
    WeaponSpec {
        id: id.into(),
        name: id.into(),
        slot: WeaponSlot::Primary,
        kind: WeaponKind::Single(projectile),
        cooldown: Seconds(cooldown),
        ammo: u32::MAX,
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Catalog {
    /// Built-in content set.
    pub fn with_defaults() -> Self {
        let enemy_shot = ProjectileSpec {
            sprite: SpriteRef::new("enemy_shot", 6.0, 12.0),
            damage: 5.0,
            speed: 300.0,
            target: TargetMode::Straight,
            blow: None,
        };
        let seeker = ProjectileSpec {
            sprite: SpriteRef::new("enemy_seeker", 10.0, 10.0),
            damage: 8.0,
            speed: 200.0,
            target: TargetMode::Auto,
            blow: None,
        };

        Self {
            player: PlayerSpec {
                sprite: SpriteRef::new("player", 48.0, 48.0),
                hp: 100.0,
                speed: 5.0,
                primary: vec![blaster(), double_blaster()],
                secondary: vec![homing_rocket(), bomb()],
            },
            enemies: vec![
                EnemySpec {
                    id: "scout".into(),
                    sprite: SpriteRef::new("scout", 40.0, 40.0),
                    hp: 3.0,
                    speed: 2.0,
                    weapon: None,
                },
                EnemySpec {
                    id: "fighter".into(),
                    sprite: SpriteRef::new("fighter", 48.0, 48.0),
                    hp: 6.0,
                    speed: 1.5,
                    weapon: Some(enemy_gun("fighter_gun", enemy_shot, 1.5)),
                },
                EnemySpec {
                    id: "hunter".into(),
                    sprite: SpriteRef::new("hunter", 56.0, 56.0),
                    hp: 10.0,
                    speed: 1.0,
                    weapon: Some(enemy_gun("hunter_seeker", seeker, 2.5)),
                },
            ],
            meteors: vec![
                MeteorSpec {
                    id: "meteor_small".into(),
                    sprite: SpriteRef::new("meteor_small", 32.0, 32.0),
                    speed: 2.5,
                },
                MeteorSpec {
                    id: "meteor_big".into(),
                    sprite: SpriteRef::new("meteor_big", 64.0, 64.0),
                    speed: 1.5,
                },
            ],
            items: vec![
                ItemSpec {
                    id: "rocket_ammo".into(),
                    sprite: SpriteRef::new("item_ammo", 24.0, 24.0),
                    speed: 1.5,
                    delay: Seconds(8.0),
                    payload: ItemPayload::Ammo {
                        weapon: "rocket".into(),
                        amount: 10,
                    },
                },
                ItemSpec {
                    id: "double_rocket".into(),
                    sprite: SpriteRef::new("item_weapon", 24.0, 24.0),
                    speed: 1.5,
                    delay: Seconds(12.0),
                    payload: ItemPayload::Weapon(double_rocket()),
                },
                ItemSpec {
                    id: "beam".into(),
                    sprite: SpriteRef::new("item_weapon", 24.0, 24.0),
                    speed: 1.5,
                    delay: Seconds(14.0),
                    payload: ItemPayload::Weapon(beam()),
                },
                ItemSpec {
                    id: "repair".into(),
                    sprite: SpriteRef::new("item_heal", 24.0, 24.0),
                    speed: 1.5,
                    delay: Seconds(10.0),
                    payload: ItemPayload::Heal(25.0),
                },
                ItemSpec {
                    id: "shield".into(),
                    sprite: SpriteRef::new("item_shield", 24.0, 24.0),
                    speed: 1.5,
                    delay: Seconds(15.0),
                    payload: ItemPayload::Shield(30.0),
                },
            ],
            backgrounds: vec!["nebula".into(), "deep_space".into(), "starfield".into()],
            generation: GenerationSpec::default(),
        }
    }

    pub fn file_path() -> PathBuf {
        Tuning::data_dir().join("catalog.ron")
    }

    /// Load from the data directory; fall back to the built-in set on any problem.
    pub fn load_or_default() -> Self {
        let path = Self::file_path();
        if !path.exists() {
            return Self::with_defaults();
        }
        let loaded = match std::fs::read_to_string(&path) {
            Ok(contents) => match ron::from_str::<Catalog>(&contents) {
                Ok(catalog) => catalog,
                Err(e) => {
                    warn!("Failed to parse catalog.ron: {e}, using built-in content");
                    return Self::with_defaults();
                }
            },
            Err(e) => {
                warn!("Failed to read catalog.ron: {e}, using built-in content");
                return Self::with_defaults();
            }
        };
        match loaded.validate() {
            Ok(()) => {
                info!("Loaded content catalog from {:?}", path);
                loaded
            }
            Err(e) => {
                warn!("Rejected catalog.ron: {e}, using built-in content");
                Self::with_defaults()
            }
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.enemies.is_empty() {
            return Err(CatalogError::NoEnemies);
        }
        if self.meteors.is_empty() {
            return Err(CatalogError::NoMeteors);
        }
        if self.backgrounds.is_empty() {
            return Err(CatalogError::NoBackgrounds);
        }
        if self.player.primary.is_empty() {
            return Err(CatalogError::NoPrimaryWeapon);
        }
        if self.generation.levels == 0 {
            return Err(CatalogError::NoLevels);
        }

        let sprites = std::iter::once(&self.player.sprite)
            .chain(self.enemies.iter().map(|e| &e.sprite))
            .chain(self.meteors.iter().map(|m| &m.sprite))
            .chain(self.items.iter().map(|i| &i.sprite));
        for sprite in sprites {
            if sprite.width <= 0.0 || sprite.height <= 0.0 {
                return Err(CatalogError::BadSprite {
                    id: sprite.id.clone(),
                });
            }
        }

        for enemy in &self.enemies {
            if let Some(WeaponSpec {
                kind: WeaponKind::Beam { .. },
                ..
            }) = &enemy.weapon
            {
                return Err(CatalogError::EnemyBeamWeapon {
                    enemy: enemy.id.clone(),
                });
            }
        }

        let g = &self.generation;
        let counts = [
            ("stages", g.stages),
            ("waves", g.waves),
            ("batches", g.batches),
            ("batch_size", g.batch_size),
            ("meteors", g.meteors),
            ("items", g.items),
        ];
        for (field, range) in counts {
            if range.min > range.max {
                return Err(CatalogError::InvertedRange { field });
            }
        }
        for (field, range) in [("batch_delay", g.batch_delay), ("batch_offset", g.batch_offset)] {
            if range.min > range.max {
                return Err(CatalogError::InvertedRange { field });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Catalog::with_defaults().validate(), Ok(()));
    }

    #[test]
    fn rejects_enemy_beam() {
        let mut c = Catalog::with_defaults();
        c.enemies[0].weapon = Some(beam());
        assert_eq!(
            c.validate(),
            Err(CatalogError::EnemyBeamWeapon {
                enemy: "scout".into()
            })
        );
    }

    #[test]
    fn rejects_empty_tables() {
        let mut c = Catalog::with_defaults();
        c.meteors.clear();
        assert_eq!(c.validate(), Err(CatalogError::NoMeteors));

        let mut c = Catalog::with_defaults();
        c.player.primary.clear();
        assert_eq!(c.validate(), Err(CatalogError::NoPrimaryWeapon));
    }

    #[test]
    fn rejects_inverted_range_and_bad_sprite() {
        let mut c = Catalog::with_defaults();
        c.generation.waves = CountRange::new(4, 2);
        assert_eq!(
            c.validate(),
            Err(CatalogError::InvertedRange { field: "waves" })
        );

        let mut c = Catalog::with_defaults();
        c.items[0].sprite.width = 0.0;
        assert!(matches!(c.validate(), Err(CatalogError::BadSprite { .. })));
    }

    #[test]
    fn ranges_sample_inclusive() {
        let mut rng = StdRng::seed_from_u64(7);
        let r = CountRange::new(2, 4);
        for _ in 0..100 {
            let v = r.sample(&mut rng);
            assert!((2..=4).contains(&v));
        }
        assert_eq!(CountRange::new(3, 3).sample(&mut rng), 3);
        assert_eq!(SpanRange::new(1.5, 1.5).sample(&mut rng), 1.5);
    }

    #[test]
    fn catalog_survives_ron() {
        let c = Catalog::with_defaults();
        let text = ron::ser::to_string_pretty(&c, ron::ser::PrettyConfig::default())
            .expect("serialize catalog");
        let back: Catalog = ron::from_str(&text).expect("parse catalog");
        assert_eq!(back.enemies.len(), c.enemies.len());
        assert_eq!(back.player.secondary, c.player.secondary);
        assert_eq!(back.validate(), Ok(()));
    }
}
