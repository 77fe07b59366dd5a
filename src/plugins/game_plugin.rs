use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::tuning::Tuning;
use crate::game::events::GameEvent;
use crate::game::intent::Intent;
use crate::game::parts::registry::Catalog;
use crate::game::state::Game;

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Playing,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GameEvent>();
        app.init_state::<GamePhase>();
        app.init_resource::<Intent>();

        app.add_systems(Startup, setup_game);

        // Input is sampled every frame and latched until the next tick consumes it.
        app.add_systems(
            Update,
            (read_input, back_to_menu_input).run_if(in_state(GamePhase::Playing)),
        );

        // One simulation tick per fixed step.
        app.add_systems(
            FixedUpdate,
            (advance_game, forward_events)
                .chain()
                .run_if(in_state(GamePhase::Playing)),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, (log_game_events, tuning_reload_input));
    }
}

fn setup_game(mut commands: Commands, tuning: Res<Tuning>) {
    let catalog = Catalog::load_or_default();
    let seed = rand::random::<u64>();
    info!(
        "New game: {} enemy types, {} levels, seed {}",
        catalog.enemies.len(),
        catalog.generation.levels,
        seed
    );
    commands.insert_resource(Game::new(catalog, tuning.clone(), seed));
}

// ── Input ───────────────────────────────────────────────────────────

const WEAPON_KEYS: [KeyCode; 9] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

/// Held keys overwrite the intent each frame; presses accumulate until a tick runs.
fn read_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut intent: ResMut<Intent>,
) {
    let mut dir = DVec2::ZERO;
    if keyboard.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        dir.y -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        dir.y += 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        dir.x -= 1.0;
    }
    if keyboard.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        dir.x += 1.0;
    }
    intent.move_dir = dir;

    // Window cursor coordinates are top-left origin, y down: same as the simulation.
    intent.aim = window
        .single()
        .ok()
        .and_then(Window::cursor_position)
        .map(|p| p.as_dvec2());

    intent.fire_primary = mouse.pressed(MouseButton::Left);
    intent.fire_secondary = mouse.pressed(MouseButton::Right);

    if let Some(index) = WEAPON_KEYS.iter().position(|k| keyboard.just_pressed(*k)) {
        intent.select_primary = Some(index);
    }
    if keyboard.just_pressed(KeyCode::KeyQ) {
        intent.cycle_secondary -= 1;
    }
    if keyboard.just_pressed(KeyCode::KeyE) {
        intent.cycle_secondary += 1;
    }
}

fn back_to_menu_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(GamePhase::MainMenu);
    }
}

// ── FixedUpdate ─────────────────────────────────────────────────────

fn advance_game(mut game: ResMut<Game>, mut intent: ResMut<Intent>) {
    game.update(&intent);
    intent.select_primary = None;
    intent.cycle_secondary = 0;
}

fn forward_events(mut game: ResMut<Game>, mut events: MessageWriter<GameEvent>) {
    for event in game.drain_events() {
        events.write(event);
    }
}

// ── Always-on ───────────────────────────────────────────────────────

fn log_game_events(mut events: MessageReader<GameEvent>) {
    for event in events.read() {
        match event {
            GameEvent::Reset { reason, score } => {
                info!("Run over ({:?}), score {}", reason, score);
            }
            GameEvent::LevelAdvanced { level } => info!("Level {}", level),
            GameEvent::StageAdvanced { stage } => info!("Stage {}", stage),
            GameEvent::WaveAdvanced { wave } => debug!("Wave {}", wave),
            GameEvent::ItemCollected { item } => debug!("Picked up {}", item),
            other => trace!("{:?}", other),
        }
    }
}

/// Reload tuning with F5. The fixed step follows the new tick rate.
fn tuning_reload_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tuning: ResMut<Tuning>,
    mut fixed: ResMut<Time<Fixed>>,
    game: Option<ResMut<Game>>,
) {
    if !keyboard.just_pressed(KeyCode::F5) {
        return;
    }
    tuning.reload();
    fixed.set_timestep_hz(tuning.tps);
    if let Some(mut game) = game {
        game.set_tuning(tuning.clone());
    }
}
