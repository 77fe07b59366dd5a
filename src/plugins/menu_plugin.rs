use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;

use crate::game::events::ResetReason;
use crate::game::state::Game;
use crate::plugins::game_plugin::GamePhase;

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct MainMenuRoot;

/// What a menu button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    NewGame,
    Resume,
    Quit,
}

// ── Colors ───────────────────────────────────────────────────────────

const COLOR_BG: Color = Color::srgba(0.02, 0.02, 0.06, 0.92);
const COLOR_BTN: Color = Color::srgba(0.18, 0.20, 0.28, 1.0);
const COLOR_BTN_HOVER: Color = Color::srgba(0.28, 0.32, 0.42, 1.0);
const COLOR_BTN_PRESS: Color = Color::srgba(0.12, 0.14, 0.20, 1.0);
const COLOR_TEXT: Color = Color::WHITE;
const COLOR_TEXT_DIM: Color = Color::srgba(0.6, 0.6, 0.7, 1.0);
const COLOR_ACCENT: Color = Color::srgba(1.0, 0.55, 0.15, 1.0);

// ── Plugin ───────────────────────────────────────────────────────────

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GamePhase::MainMenu), spawn_main_menu);
        app.add_systems(OnExit(GamePhase::MainMenu), despawn::<MainMenuRoot>);
        app.add_systems(Update, menu_button_system.run_if(in_state(GamePhase::MainMenu)));
    }
}

fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn spawn_main_menu(mut commands: Commands, game: Option<Res<Game>>) {
    let best = game.as_ref().map_or(0, |g| g.best_score());
    let in_progress = game.as_ref().is_some_and(|g| g.tick().0 > 0);

    commands
        .spawn((
            MainMenuRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(20.0),
                ..default()
            },
            BackgroundColor(COLOR_BG),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("SPACE SHOOTER"),
                TextFont { font_size: 56.0, ..default() },
                TextColor(COLOR_ACCENT),
                Node { margin: UiRect::bottom(Val::Px(12.0)), ..default() },
            ));
            parent.spawn((
                Text::new(format!("Best score: {best}")),
                TextFont { font_size: 20.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
                Node { margin: UiRect::bottom(Val::Px(28.0)), ..default() },
            ));
            if in_progress {
                spawn_btn(parent, "Resume", MenuCommand::Resume);
            }
            spawn_btn(parent, "New Game", MenuCommand::NewGame);
            spawn_btn(parent, "Quit", MenuCommand::Quit);
        });
}

fn menu_button_system(
    mut q: Query<(&Interaction, &MenuCommand, &mut BackgroundColor), Changed<Interaction>>,
    mut game: ResMut<Game>,
    mut next_state: ResMut<NextState<GamePhase>>,
    mut exit: MessageWriter<AppExit>,
) {
    for (interaction, command, mut bg) in &mut q {
        match *interaction {
            Interaction::Pressed => {
                *bg = BackgroundColor(COLOR_BTN_PRESS);
                run_command(*command, &mut game, &mut next_state, &mut exit);
            }
            Interaction::Hovered => *bg = BackgroundColor(COLOR_BTN_HOVER),
            Interaction::None => *bg = BackgroundColor(COLOR_BTN),
        }
    }
}

fn run_command(
    command: MenuCommand,
    game: &mut Game,
    next_state: &mut NextState<GamePhase>,
    exit: &mut MessageWriter<AppExit>,
) {
    info!("Menu: {:?}", command);
    match command {
        MenuCommand::NewGame => {
            game.reset(ResetReason::NewGame);
            next_state.set(GamePhase::Playing);
        }
        MenuCommand::Resume => next_state.set(GamePhase::Playing),
        MenuCommand::Quit => {
            exit.write(AppExit::Success);
        }
    }
}

fn spawn_btn(parent: &mut ChildSpawnerCommands, label: &str, command: MenuCommand) {
    parent
        .spawn((
            command,
            Button,
            Node {
                width: Val::Px(320.0),
                height: Val::Px(56.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                border_radius: BorderRadius::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(COLOR_BTN),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new(label),
                TextFont { font_size: 24.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
        });
}
