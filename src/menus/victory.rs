//! The victory menu, shown after clearing the final stage.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{game::state::GameScore, menus::Menu, screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::Victory), spawn_victory_menu);
    app.add_systems(
        Update,
        quit_to_title_on_key
            .run_if(in_state(Menu::Victory).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_victory_menu(mut commands: Commands, score: Res<GameScore>) {
    commands.spawn((
        widget::ui_root("Victory Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::Victory),
        children![
            widget::header("You Win!"),
            widget::label(format!("Final score: {}", score.score)),
            widget::button("Play again", play_again),
            widget::button("Quit to title", quit_to_title),
        ],
    ));
}

fn play_again(
    _: On<Pointer<Click>>,
    mut next_screen: ResMut<NextState<Screen>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    next_menu.set(Menu::None);
    next_screen.set(Screen::Loading);
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}

fn quit_to_title_on_key(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
