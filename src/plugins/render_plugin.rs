use bevy::math::DVec2;
use bevy::prelude::*;

use crate::assets_map::AssetsMap;
use crate::game::components::{BeamTrace, Blow, Explosion};
use crate::game::draw::{Hud, Surface};
use crate::game::parts::SpriteRef;
use crate::game::state::Game;
use crate::plugins::game_plugin::GamePhase;

pub struct RenderPlugin;

impl Plugin for RenderPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(AssetsMap::with_defaults());
        app.add_systems(Startup, setup_camera);
        app.add_systems(Update, draw_game.run_if(in_state(GamePhase::Playing)));
    }
}

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

/// Gizmo-backed drawing target. Converts screen pixels (origin top-left,
/// y down) to world units centered on the camera.
struct GizmoSurface<'a, 'w, 's> {
    gizmos: &'a mut Gizmos<'w, 's>,
    assets: &'a AssetsMap,
    screen: DVec2,
    background: Option<Color>,
}

impl GizmoSurface<'_, '_, '_> {
    fn to_world(&self, p: DVec2) -> Vec2 {
        Vec2::new((p.x - self.screen.x * 0.5) as f32, (self.screen.y * 0.5 - p.y) as f32)
    }
}

impl Surface for GizmoSurface<'_, '_, '_> {
    fn background(&mut self, id: &str) {
        self.background = Some(self.assets.background_color(id));
    }

    fn sprite(&mut self, sprite: &SpriteRef, position: DVec2, rotation: f64) {
        // Screen rotation is clockwise with y down; world rotation is counter-clockwise.
        let iso = Isometry2d::new(self.to_world(position), Rot2::radians(-rotation as f32));
        let color = self.assets.sprite_color(&sprite.id);
        self.gizmos.rect_2d(iso, sprite.size().as_vec2(), color);
    }

    fn explosion(&mut self, explosion: &Explosion) {
        let t = explosion.progress() as f32;
        let radius = explosion.size.max_element() as f32 * 0.5 * (0.3 + t);
        let color = Color::srgba(1.0, 0.6 - 0.4 * t, 0.1, 1.0 - t);
        let center = self.to_world(explosion.position);
        self.gizmos.circle_2d(center, radius, color);
    }

    fn blow(&mut self, blow: &Blow) {
        let fade = 1.0 - blow.step as f32 / blow.steps.max(1) as f32;
        let color = Color::srgba(1.0, 0.3, 0.1, 0.3 + 0.7 * fade);
        let center = self.to_world(blow.center);
        self.gizmos.circle_2d(center, blow.radius as f32, color);
    }

    fn beam_trace(&mut self, trace: &BeamTrace) {
        let (from, to) = (self.to_world(trace.from), self.to_world(trace.to));
        self.gizmos.line_2d(from, to, Color::srgb(0.5, 1.0, 1.0));
    }

    fn hud(&mut self, hud: &Hud) {
        // HP bar along the bottom edge; text lives in the UI plugin.
        let frac = if hud.max_hp > 0.0 { (hud.hp / hud.max_hp).clamp(0.0, 1.0) } else { 0.0 };
        let left = self.to_world(DVec2::new(10.0, self.screen.y - 10.0));
        let width = (self.screen.x - 20.0) as f32;
        self.gizmos.line_2d(left, left + Vec2::X * width, Color::srgba(1.0, 1.0, 1.0, 0.2));
        self.gizmos.line_2d(left, left + Vec2::X * width * frac as f32, Color::srgb(0.2, 1.0, 0.3));
        if hud.shield > 0.0 {
            let y = left + Vec2::Y * 4.0;
            let shield = (hud.shield / hud.max_hp.max(1.0)).min(1.0) as f32;
            self.gizmos.line_2d(y, y + Vec2::X * width * shield, Color::srgb(0.4, 0.7, 1.0));
        }
    }
}

fn draw_game(
    game: Res<Game>,
    assets: Res<AssetsMap>,
    mut gizmos: Gizmos,
    mut clear: ResMut<ClearColor>,
) {
    let mut surface = GizmoSurface {
        gizmos: &mut gizmos,
        assets: &assets,
        screen: game.tuning().screen_size(),
        background: None,
    };
    game.draw(&mut surface);
    if let Some(color) = surface.background {
        clear.0 = color;
    }
}
