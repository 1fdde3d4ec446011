//! The game's menus and transitions between them.

mod credits;
mod gameover;
mod main;
mod pause;
mod settings;
mod victory;

use bevy::prelude::*;

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins((
        credits::plugin,
        gameover::plugin,
        main::plugin,
        pause::plugin,
        settings::plugin,
        victory::plugin,
    ));
}

/// Menus overlaid on the current screen.
///
/// Registered in `configure_game` so headless test apps can observe the
/// GameOver/Victory transitions without the menu UI plugins.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Menu {
    #[default]
    None,
    Main,
    Credits,
    Settings,
    Pause,
    GameOver,
    Victory,
}
