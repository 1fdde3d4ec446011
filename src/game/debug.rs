//! Debug visualization for hitboxes and the playfield bounds.
//!
//! Toggle with the 'D' key during gameplay. Registered by the app shell, not
//! by the game plugin, because gizmos need the render stack.

use bevy::{color::palettes::css, input::common_conditions::input_just_pressed, prelude::*};

use crate::screens::Screen;

use super::collision::HitBox;
use super::enemy::EnemyState;
use super::playfield;

pub(crate) fn plugin(app: &mut App) {
    app.init_resource::<DebugOverlayVisible>();

    app.add_systems(
        Update,
        toggle_debug.run_if(in_state(Screen::Gameplay).and(input_just_pressed(KeyCode::KeyD))),
    );

    app.add_systems(
        Update,
        draw_debug_overlay.run_if(in_state(Screen::Gameplay).and(debug_visible)),
    );
}

/// Resource to track if the debug overlay is visible.
#[derive(Resource, Default)]
pub struct DebugOverlayVisible(pub bool);

fn debug_visible(debug: Res<DebugOverlayVisible>) -> bool {
    debug.0
}

fn toggle_debug(mut debug: ResMut<DebugOverlayVisible>) {
    debug.0 = !debug.0;
    let state = if debug.0 { "ON" } else { "OFF" };
    info!("Debug overlay: {}", state);
}

fn draw_debug_overlay(
    mut gizmos: Gizmos,
    hitboxes: Query<(&Transform, &HitBox, Option<&EnemyState>)>,
) {
    // Playfield bounds.
    gizmos.rect_2d(
        Isometry2d::IDENTITY,
        Vec2::new(playfield::HALF_WIDTH * 2.0, playfield::HALF_HEIGHT * 2.0),
        css::DIM_GRAY,
    );

    for (transform, hitbox, state) in &hitboxes {
        let color = match state {
            Some(EnemyState::Formation) => css::STEEL_BLUE,
            Some(EnemyState::Returning) => css::GOLD,
            Some(_) => css::ORANGE_RED,
            None => css::LIME,
        };
        gizmos.rect_2d(
            Isometry2d::from_translation(transform.translation.truncate()),
            hitbox.0 * 2.0,
            color,
        );
    }
}
