use super::*;
use crate::game::level::{EnemyBatch, Layout, Stage, Wave};
use crate::game::parts::registry::beam;
use crate::game::parts::weapon::{BlowSpec, ProjectileSpec, Weapon};
use crate::game::parts::{EnemySpec, ItemPayload, SpriteRef};
use crate::game::physics::Motion;
use crate::game::player::Loadout;
use crate::game::stats::types::{Hp, Seconds};

fn quiet_tuning() -> Tuning {
    Tuning {
        meteor_interval: Seconds(10_000.0),
        ..Tuning::default()
    }
}

/// One stage that never completes: its single meteor is never due.
fn holding_level() -> Level {
    Level {
        background: "test".into(),
        stages: vec![Stage {
            meteors: 1,
            items: Vec::new(),
            waves: Vec::new(),
        }],
    }
}

fn game_with(levels: Vec<Level>) -> Game {
    Game::with_levels(Catalog::with_defaults(), quiet_tuning(), levels, 1)
}

fn game() -> Game {
    game_with(vec![holding_level()])
}

fn enemy_at(position: DVec2, hp: f64) -> Enemy {
    Enemy {
        motion: Motion::new(position, 0.0),
        sprite: SpriteRef::new("scout", 40.0, 40.0),
        hp: Hp::new(hp),
        target: BatchTarget::Straight,
        weapon: None,
        alive: true,
    }
}

fn meteor_at(position: DVec2) -> Meteor {
    Meteor {
        motion: Motion::new(position, 0.0),
        sprite: SpriteRef::new("meteor", 32.0, 32.0),
        alive: true,
    }
}

fn still_spec(damage: f64) -> ProjectileSpec {
    ProjectileSpec {
        sprite: SpriteRef::new("shot", 6.0, 6.0),
        damage,
        speed: 0.0,
        target: TargetMode::Straight,
        blow: None,
    }
}

fn shot(owner: Owner, damage: f64, position: DVec2) -> Projectile {
    Projectile::new(&still_spec(damage), owner, position, 0.0)
}

fn resets(events: &[GameEvent]) -> Vec<ResetReason> {
    events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Reset { reason, .. } => Some(*reason),
            _ => None,
        })
        .collect()
}

#[test]
fn projectile_pass_claims_meteor_before_body_pass() {
    let mut g = game();
    let at = g.arena.player.position;
    g.arena.meteors.push(meteor_at(at));
    g.arena
        .player_projectiles
        .push(shot(Owner::Player, 1.0, at));

    g.update(&Intent::default());

    assert_eq!(g.score(), 1);
    assert!(g.arena.meteors.is_empty());
    assert!(g.arena.player_projectiles.is_empty());
    let events = g.drain_events();
    assert!(resets(&events).is_empty());
    assert_eq!(g.tick(), Tick(1));
}

#[test]
fn player_shot_down_after_third_hit() {
    let mut g = game();
    g.arena.player.hp = Hp(10.0);
    let at = g.arena.player.position;

    let mut seen = Vec::new();
    for _ in 0..3 {
        g.arena.enemy_projectiles.push(shot(Owner::Enemy, 4.0, at));
        g.update(&Intent::default());
        seen.extend(g.drain_events());
    }

    let hp: Vec<f64> = seen
        .iter()
        .filter_map(|e| match e {
            GameEvent::PlayerHit { hp, .. } => Some(*hp),
            _ => None,
        })
        .collect();
    assert_eq!(hp, vec![6.0, 2.0, 0.0]);
    assert_eq!(resets(&seen), vec![ResetReason::ShotDown]);
    assert_eq!(g.hp(), g.max_hp());
    assert_eq!(g.tick(), Tick(0));
}

#[test]
fn enemy_dies_on_second_hit_and_scores_once() {
    let mut g = game();
    let at = DVec2::new(300.0, 200.0);
    g.arena.enemies.push(enemy_at(at, 3.0));

    g.arena.player_projectiles.push(shot(Owner::Player, 2.0, at));
    g.update(&Intent::default());
    assert_eq!(g.arena.enemies.len(), 1);
    assert_eq!(g.arena.enemies[0].hp, Hp(1.0));
    assert_eq!(g.score(), 0);

    g.arena.player_projectiles.push(shot(Owner::Player, 2.0, at));
    g.update(&Intent::default());
    assert!(g.arena.enemies.is_empty());
    assert_eq!(g.score(), 1);
    assert_eq!(g.arena.explosions.len(), 1);

    let destroyed = g
        .drain_events()
        .iter()
        .filter(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        .count();
    assert_eq!(destroyed, 1);
}

#[test]
fn blow_damages_every_active_step() {
    let mut g = game();
    let at = DVec2::new(300.0, 200.0);
    g.arena.enemies.push(enemy_at(at, 20.0));
    g.arena.enemies.push(enemy_at(at, 100.0));
    g.arena.blows.push(Blow {
        center: at,
        radius: 30.0,
        damage: 5.0,
        step: 0,
        steps: 5,
    });

    for _ in 0..3 {
        g.update(&Intent::default());
    }
    assert_eq!(g.arena.enemies.len(), 2);
    assert_eq!(g.arena.enemies[0].hp, Hp(5.0));

    // The small enemy dies on step four while the blow is still alive.
    g.update(&Intent::default());
    assert_eq!(g.arena.enemies.len(), 1);
    assert_eq!(g.score(), 1);
    assert_eq!(g.arena.blows.len(), 1);

    g.update(&Intent::default());
    assert!(g.arena.blows.is_empty());
    assert_eq!(g.arena.enemies[0].hp, Hp(75.0));

    g.update(&Intent::default());
    assert_eq!(g.arena.enemies[0].hp, Hp(75.0));
}

#[test]
fn bomb_hit_spawns_blow_for_next_tick() {
    let mut g = game();
    let at = DVec2::new(300.0, 200.0);
    g.arena.enemies.push(enemy_at(at, 100.0));
    let bomb = ProjectileSpec {
        blow: Some(BlowSpec {
            radius: 40.0,
            damage: 3.0,
            steps: 10,
        }),
        ..still_spec(50.0)
    };
    g.arena
        .player_projectiles
        .push(Projectile::new(&bomb, Owner::Player, at, 0.0));

    g.update(&Intent::default());
    assert_eq!(g.arena.enemies[0].hp, Hp(100.0));
    assert_eq!(g.arena.blows.len(), 1);
    assert_eq!(g.arena.blows[0].step, 0);
    assert!(g.arena.player_projectiles.is_empty());

    g.update(&Intent::default());
    assert_eq!(g.arena.enemies[0].hp, Hp(97.0));
}

#[test]
fn empty_weapon_never_fires() {
    let mut g = game();
    g.arena.player.primary.weapons[0].ammo = 0;
    let intent = Intent {
        fire_primary: true,
        ..Default::default()
    };

    for _ in 0..30 {
        g.update(&intent);
    }
    assert_eq!(g.arena.player.primary.weapons[0].ammo, 0);
    assert!(g.arena.player_projectiles.is_empty());
    assert!(
        !g.drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::WeaponFired { .. }))
    );
}

#[test]
fn held_trigger_respects_cooldown() {
    let mut g = game();
    g.arena.player.primary.weapons[0].ammo = 3;
    let intent = Intent {
        fire_primary: true,
        ..Default::default()
    };

    g.update(&intent);
    assert_eq!(g.arena.player.primary.weapons[0].ammo, 2);
    assert_eq!(g.arena.player_projectiles.len(), 1);

    g.update(&intent);
    assert_eq!(g.arena.player.primary.weapons[0].ammo, 2);
}

#[test]
fn wave_advances_on_the_tick_after_its_last_batch() {
    let batch = |delay: f64| EnemyBatch {
        enemy: EnemySpec {
            id: "drone".into(),
            sprite: SpriteRef::new("drone", 20.0, 20.0),
            hp: 1.0,
            speed: 0.0,
            weapon: None,
        },
        count: 1,
        target: BatchTarget::Straight,
        layout: Layout::Lines,
        delay: Seconds(delay),
        offset: 0.0,
    };
    let level = Level {
        background: "test".into(),
        stages: vec![Stage {
            meteors: 0,
            items: Vec::new(),
            waves: vec![
                Wave {
                    batches: vec![batch(0.05), batch(0.1)],
                },
                Wave {
                    batches: vec![batch(1000.0)],
                },
            ],
        }],
    };
    let mut g = game_with(vec![level]);

    for _ in 0..9 {
        g.update(&Intent::default());
    }
    assert_eq!(g.arena.enemies.len(), 2);
    assert_eq!(g.wave(), 1);

    g.update(&Intent::default());
    assert_eq!(g.wave(), 2);
    assert!(
        g.drain_events()
            .contains(&GameEvent::WaveAdvanced { wave: 2 })
    );
}

#[test]
fn finished_campaign_resets() {
    let empty = Level {
        background: "test".into(),
        stages: vec![Stage::default()],
    };
    let mut g = game_with(vec![empty]);
    g.update(&Intent::default());
    assert_eq!(resets(&g.drain_events()), vec![ResetReason::CampaignComplete]);
}

#[test]
fn body_collision_resets_and_keeps_best_score() {
    let mut g = game();
    g.arena.score = 5;
    let at = g.arena.player.position;
    g.arena.enemies.push(enemy_at(at, 10.0));

    g.update(&Intent::default());
    let events = g.drain_events();
    assert!(events.contains(&GameEvent::Reset {
        reason: ResetReason::EnemyCollision,
        score: 5,
    }));
    assert_eq!(g.score(), 0);
    assert_eq!(g.best_score(), 5);
    assert!(g.arena.enemies.is_empty());

    g.arena.meteors.push(meteor_at(g.arena.player.position));
    g.update(&Intent::default());
    assert_eq!(resets(&g.drain_events()), vec![ResetReason::MeteorCollision]);
    assert_eq!(g.best_score(), 5);
}

#[test]
fn beam_hits_enemies_and_intercepts_shots() {
    let mut g = game();
    g.arena.player.secondary = Loadout::new(&[beam()], 60.0);
    let x = g.arena.player.position.x;
    g.arena
        .enemy_projectiles
        .push(shot(Owner::Enemy, 5.0, DVec2::new(x, 400.0)));
    g.arena.enemies.push(enemy_at(DVec2::new(x, 300.0), 5.0));
    let intent = Intent {
        fire_secondary: true,
        ..Default::default()
    };

    g.update(&intent);
    assert!(g.arena.enemy_projectiles.is_empty());
    assert!(g.arena.enemies.is_empty());
    assert_eq!(g.score(), 1);
    assert_eq!(g.arena.beam_traces.len(), 1);
    assert_eq!(g.arena.player.secondary.weapons[0].ammo, beam().ammo - 1);

    for _ in 0..g.tuning().beam_trace_ticks {
        g.update(&Intent::default());
    }
    assert!(g.arena.beam_traces.is_empty());
}

#[test]
fn item_pickup_applies_payload() {
    let mut g = game();
    g.arena.player.hp = Hp(50.0);
    g.arena.items.push(Item {
        motion: Motion::new(g.arena.player.position, 0.0),
        sprite: SpriteRef::new("item_heal", 24.0, 24.0),
        payload: ItemPayload::Heal(25.0),
        alive: true,
    });

    g.update(&Intent::default());
    assert_eq!(g.hp(), 75.0);
    assert!(g.arena.items.is_empty());
    assert!(
        g.drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::ItemCollected { .. }))
    );
}

#[test]
fn enemies_hold_fire_until_fully_on_screen() {
    let mut g = game();
    let gun = Catalog::with_defaults().enemies[1]
        .weapon
        .clone()
        .map(|w| Weapon::new(w, 60.0));
    let mut edge = enemy_at(DVec2::new(100.0, 10.0), 10.0);
    edge.weapon = gun;
    g.arena.enemies.push(edge);

    g.update(&Intent::default());
    assert!(g.arena.enemy_projectiles.is_empty());

    g.arena.enemies[0].motion = Motion::new(DVec2::new(100.0, 100.0), 0.0);
    g.update(&Intent::default());
    assert_eq!(g.arena.enemy_projectiles.len(), 1);
}

#[test]
fn homing_shot_turns_toward_enemy() {
    let mut g = game();
    g.arena.enemies.push(enemy_at(DVec2::new(500.0, 300.0), 100.0));
    let rocket = ProjectileSpec {
        speed: 400.0,
        target: TargetMode::Auto,
        ..still_spec(1.0)
    };
    g.arena
        .player_projectiles
        .push(Projectile::new(&rocket, Owner::Player, DVec2::new(300.0, 300.0), 0.0));

    for _ in 0..3 {
        g.update(&Intent::default());
    }
    assert!(g.arena.player_projectiles[0].motion.position.x > 300.0);
}

#[test]
fn enemy_homing_shot_turns_toward_player() {
    let mut g = game();
    let rocket = ProjectileSpec {
        speed: 400.0,
        target: TargetMode::Auto,
        ..still_spec(1.0)
    };
    // Launched pointing up, away from the player below.
    g.arena
        .enemy_projectiles
        .push(Projectile::new(&rocket, Owner::Enemy, DVec2::new(300.0, 300.0), 0.0));

    for _ in 0..5 {
        g.update(&Intent::default());
    }
    assert!(g.arena.enemy_projectiles[0].motion.position.y > 300.0);
}

#[test]
fn enemy_shot_destroys_meteor_without_scoring() {
    let mut g = game();
    let at = DVec2::new(100.0, 300.0);
    g.arena.meteors.push(meteor_at(at));
    g.arena.enemy_projectiles.push(shot(Owner::Enemy, 1.0, at));

    g.update(&Intent::default());

    assert!(g.arena.meteors.is_empty());
    assert!(g.arena.enemy_projectiles.is_empty());
    assert_eq!(g.score(), 0);
    assert_eq!(g.arena.explosions.len(), 1);
}

#[test]
fn opposing_shots_cancel_each_other() {
    let mut g = game();
    let at = DVec2::new(100.0, 300.0);
    g.arena.enemy_projectiles.push(shot(Owner::Enemy, 1.0, at));
    g.arena
        .player_projectiles
        .push(shot(Owner::Player, 1.0, at + DVec2::new(2.0, 0.0)));

    g.update(&Intent::default());

    assert!(g.arena.enemy_projectiles.is_empty());
    assert!(g.arena.player_projectiles.is_empty());
    assert_eq!(g.score(), 0);
    assert!(resets(&g.drain_events()).is_empty());
}

#[test]
fn off_screen_entities_are_pruned() {
    let mut g = game();
    g.arena.meteors.push(meteor_at(DVec2::new(100.0, 900.0)));
    g.arena
        .player_projectiles
        .push(shot(Owner::Player, 1.0, DVec2::new(100.0, -5.0)));
    g.arena.enemies.push(enemy_at(DVec2::new(100.0, -50.0), 1.0));

    g.update(&Intent::default());
    assert!(g.arena.meteors.is_empty());
    assert!(g.arena.player_projectiles.is_empty());
    assert_eq!(g.arena.enemies.len(), 1);
}

#[test]
fn generated_game_spawns_meteors() {
    let mut g = Game::new(Catalog::with_defaults(), Tuning::default(), 42);
    let interval = g.tuning().meteor_interval.to_ticks(g.tuning().tps);
    for _ in 0..interval {
        g.update(&Intent::default());
    }
    assert_eq!(g.arena.meteors.len(), 1);
    assert_eq!(g.level(), 1);
}
