//! The game over menu, shown when the last life is lost.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{game::state::GameScore, menus::Menu, screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_menu);
    // Classic restart input: back to the title screen.
    app.add_systems(
        Update,
        quit_to_title_on_key
            .run_if(in_state(Menu::GameOver).and(input_just_pressed(KeyCode::Enter))),
    );
}

fn spawn_gameover_menu(mut commands: Commands, score: Res<GameScore>) {
    commands.spawn((
        widget::ui_root("Game Over Menu"),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("Game Over"),
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
    // Re-enter gameplay through the loading screen so OnEnter runs again.
    next_screen.set(Screen::Loading);
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}

fn quit_to_title_on_key(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
