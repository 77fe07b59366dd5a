use bevy::prelude::*;

use crate::game::draw::{Hud, WeaponReadout};
use crate::game::state::Game;
use crate::plugins::game_plugin::GamePhase;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GamePhase::Playing), setup_ui);
        app.add_systems(OnExit(GamePhase::Playing), despawn_ui);
        app.add_systems(
            Update,
            (update_score_display, update_status_display).run_if(in_state(GamePhase::Playing)),
        );
    }
}

#[derive(Component)]
struct HudRoot;

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct StatusText;

fn setup_ui(mut commands: Commands) {
    commands
        .spawn((
            HudRoot,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
        ))
        .with_children(|parent| {
            parent.spawn((
                ScoreText,
                Text::new("Score: 0"),
                TextFont {
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            parent.spawn((
                StatusText,
                Text::new(""),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.2)),
            ));
        });
}

fn despawn_ui(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn update_score_display(game: Res<Game>, mut text_query: Query<&mut Text, With<ScoreText>>) {
    let hud = game.hud();
    for mut text in &mut text_query {
        **text = format!("Score: {}   Best: {}", hud.score, hud.best_score);
    }
}

fn update_status_display(game: Res<Game>, mut text_query: Query<&mut Text, With<StatusText>>) {
    let hud = game.hud();
    for mut text in &mut text_query {
        **text = status_line(&hud);
    }
}

fn weapon_label(weapon: &Option<WeaponReadout>) -> String {
    match weapon {
        Some(w) => format!("{} ({})", w.name, w.ammo),
        None => "-".into(),
    }
}

fn status_line(hud: &Hud) -> String {
    let mut line = format!(
        "Level {}  Stage {}  Wave {}\nHP {:.0}/{:.0}",
        hud.level, hud.stage, hud.wave, hud.hp, hud.max_hp
    );
    if hud.shield > 0.0 {
        line.push_str(&format!("  Shield {:.0}", hud.shield));
    }
    line.push_str(&format!(
        "\n{}  |  {}",
        weapon_label(&hud.primary),
        weapon_label(&hud.secondary)
    ));
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_lists_everything() {
        let hud = Hud {
            score: 3,
            best_score: 7,
            hp: 60.0,
            max_hp: 100.0,
            shield: 12.0,
            level: 1,
            stage: 2,
            wave: 3,
            primary: Some(WeaponReadout {
                name: "Blaster".into(),
                ammo: 9999,
            }),
            secondary: None,
        };
        assert_eq!(
            status_line(&hud),
            "Level 1  Stage 2  Wave 3\nHP 60/100  Shield 12\nBlaster (9999)  |  -"
        );
    }
}
