use bevy::math::DVec2;

use super::components::{BeamTrace, Blow, Explosion};
use super::parts::SpriteRef;
use super::player::Loadout;
use super::state::Game;

/// Current weapon of one loadout slot, for display.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponReadout {
    pub name: String,
    pub ammo: u32,
}

impl WeaponReadout {
    fn of(loadout: &Loadout) -> Option<Self> {
        loadout.current().map(|w| Self {
            name: w.spec.name.clone(),
            ammo: w.ammo,
        })
    }
}

/// Plain HUD state. Level, stage and wave are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub best_score: u32,
    pub hp: f64,
    pub max_hp: f64,
    pub shield: f64,
    pub level: usize,
    pub stage: usize,
    pub wave: usize,
    pub primary: Option<WeaponReadout>,
    pub secondary: Option<WeaponReadout>,
}

/// Render target for one frame. Positions are screen pixels, y down.
pub trait Surface {
    fn background(&mut self, id: &str);
    fn sprite(&mut self, sprite: &SpriteRef, position: DVec2, rotation: f64);
    fn explosion(&mut self, explosion: &Explosion);
    fn blow(&mut self, blow: &Blow);
    fn beam_trace(&mut self, trace: &BeamTrace);
    fn hud(&mut self, hud: &Hud);
}

impl Game {
    pub fn hud(&self) -> Hud {
        let player = &self.arena().player;
        Hud {
            score: self.score(),
            best_score: self.best_score(),
            hp: self.hp(),
            max_hp: self.max_hp(),
            shield: self.shield(),
            level: self.level(),
            stage: self.stage(),
            wave: self.wave(),
            primary: WeaponReadout::of(&player.primary),
            secondary: WeaponReadout::of(&player.secondary),
        }
    }

    /// Paint the current state, back to front.
    pub fn draw(&self, surface: &mut impl Surface) {
        let arena = self.arena();
        surface.background(self.background());

        let player = &arena.player;
        surface.sprite(&player.sprite, player.position, player.rotation);
        for e in &arena.enemies {
            surface.sprite(&e.sprite, e.motion.position, e.motion.rotation);
        }
        for m in &arena.meteors {
            surface.sprite(&m.sprite, m.motion.position, m.motion.rotation);
        }
        for p in arena.player_projectiles.iter().chain(&arena.enemy_projectiles) {
            surface.sprite(&p.sprite, p.motion.position, p.motion.rotation);
        }
        for i in &arena.items {
            surface.sprite(&i.sprite, i.motion.position, i.motion.rotation);
        }

        for explosion in &arena.explosions {
            surface.explosion(explosion);
        }
        for blow in &arena.blows {
            surface.blow(blow);
        }
        for trace in &arena.beam_traces {
            surface.beam_trace(trace);
        }

        surface.hud(&self.hud());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tuning::Tuning;
    use crate::game::parts::registry::Catalog;

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Surface for Recorder {
        fn background(&mut self, id: &str) {
            self.0.push(format!("bg:{id}"));
        }
        fn sprite(&mut self, sprite: &SpriteRef, _: DVec2, _: f64) {
            self.0.push(sprite.id.clone());
        }
        fn explosion(&mut self, _: &Explosion) {
            self.0.push("explosion".into());
        }
        fn blow(&mut self, _: &Blow) {
            self.0.push("blow".into());
        }
        fn beam_trace(&mut self, _: &BeamTrace) {
            self.0.push("trace".into());
        }
        fn hud(&mut self, hud: &Hud) {
            self.0.push(format!("hud:{}", hud.level));
        }
    }

    #[test]
    fn draws_background_player_then_hud() {
        let game = Game::new(Catalog::with_defaults(), Tuning::default(), 3);
        let mut out = Recorder::default();
        game.draw(&mut out);

        assert!(out.0[0].starts_with("bg:"));
        assert_eq!(out.0[1], "player");
        assert_eq!(out.0.last().map(String::as_str), Some("hud:1"));
        assert_eq!(out.0.len(), 3);
    }

    #[test]
    fn hud_shows_current_weapons() {
        let game = Game::new(Catalog::with_defaults(), Tuning::default(), 3);
        let hud = game.hud();
        assert_eq!(hud.primary.map(|w| w.name), Some("Blaster".to_string()));
        assert_eq!(hud.secondary.map(|w| w.name), Some("Rocket".to_string()));
        assert_eq!((hud.stage, hud.wave), (1, 1));
        assert_eq!(hud.hp, hud.max_hp);
    }
}
