use bevy::prelude::*;
use std::collections::HashMap;

/// Maps sprite and background ids to placeholder colors for gizmo rendering.
#[derive(Resource, Default)]
pub struct AssetsMap {
    pub sprite_colors: HashMap<String, Color>,
    pub backgrounds: HashMap<String, Color>,
}

impl AssetsMap {
    pub fn with_defaults() -> Self {
        let mut sprites = HashMap::new();
        sprites.insert("player".into(), Color::srgb(0.2, 0.6, 1.0));
        sprites.insert("scout".into(), Color::srgb(1.0, 0.3, 0.3));
        sprites.insert("fighter".into(), Color::srgb(1.0, 0.5, 0.1));
        sprites.insert("hunter".into(), Color::srgb(0.9, 0.1, 0.6));
        sprites.insert("meteor_small".into(), Color::srgb(0.6, 0.5, 0.4));
        sprites.insert("meteor_big".into(), Color::srgb(0.5, 0.4, 0.3));
        sprites.insert("laser".into(), Color::srgb(0.4, 1.0, 1.0));
        sprites.insert("rocket".into(), Color::srgb(1.0, 1.0, 0.4));
        sprites.insert("bomb".into(), Color::srgb(1.0, 0.8, 0.0));
        sprites.insert("enemy_shot".into(), Color::srgb(1.0, 0.2, 0.2));
        sprites.insert("enemy_seeker".into(), Color::srgb(1.0, 0.0, 1.0));
        sprites.insert("item_ammo".into(), Color::srgb(0.9, 0.9, 0.2));
        sprites.insert("item_weapon".into(), Color::srgb(0.3, 1.0, 0.3));
        sprites.insert("item_heal".into(), Color::srgb(0.2, 1.0, 0.5));
        sprites.insert("item_shield".into(), Color::srgb(0.4, 0.7, 1.0));

        let mut backgrounds = HashMap::new();
        backgrounds.insert("nebula".into(), Color::srgb(0.08, 0.03, 0.12));
        backgrounds.insert("deep_space".into(), Color::srgb(0.01, 0.01, 0.04));
        backgrounds.insert("starfield".into(), Color::srgb(0.03, 0.05, 0.10));

        Self {
            sprite_colors: sprites,
            backgrounds,
        }
    }

    pub fn sprite_color(&self, id: &str) -> Color {
        self.sprite_colors
            .get(id)
            .copied()
            .unwrap_or(Color::srgb(0.5, 0.5, 0.5))
    }

    pub fn background_color(&self, id: &str) -> Color {
        self.backgrounds
            .get(id)
            .copied()
            .unwrap_or(Color::BLACK)
    }
}
