//! Reusable UI widgets & theming.

// Unused utilities may trigger this lints undesirably.
#![allow(dead_code)]

pub mod interaction;
pub mod palette;
pub mod widget;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::{interaction::InteractionPalette, palette as ui_palette, widget};
}

use bevy::prelude::*;

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(interaction::plugin);
    app.add_systems(Startup, set_clear_color);
}

fn set_clear_color(mut commands: Commands) {
    commands.insert_resource(ClearColor(palette::SCREEN_BACKGROUND));
}
