//! Starswarm - a formation shooter.
//!
//! The library crate exists so integration tests in `tests/` can build a
//! headless app against the same plugins the binary runs.

mod asset_tracking;
mod audio;
pub mod game;
pub mod menus;
pub mod othello;
pub mod screens;
mod theme;

use bevy::{asset::AssetMetaCheck, prelude::*};

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web builds on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Starswarm".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }),
                    ..default()
                }),
        );

        configure_game(app);

        // Add other plugins.
        app.add_plugins((
            asset_tracking::plugin,
            audio::plugin,
            menus::plugin,
            screens::plugin,
            theme::plugin,
            game::debug::plugin,
            game::starfield::plugin,
        ));

        // Spawn the main camera.
        app.add_systems(Startup, spawn_camera);
    }
}

/// Configuration shared by the full app and headless test apps: states,
/// system set ordering, the simulation tick rate, and the gameplay plugins.
fn configure_game(app: &mut App) {
    // One simulation tick per rendered frame at the target rate.
    app.insert_resource(Time::<Fixed>::from_hz(60.0));

    app.init_state::<screens::Screen>();
    app.init_state::<menus::Menu>();
    app.init_state::<Pause>();

    app.configure_sets(
        Update,
        (
            AppSystems::TickTimers,
            AppSystems::RecordInput,
            AppSystems::Update,
        )
            .chain(),
    );
    app.configure_sets(Update, PausableSystems.run_if(in_state(Pause(false))));
    app.configure_sets(FixedUpdate, PausableSystems.run_if(in_state(Pause(false))));

    app.add_plugins(game::plugin);
}

/// Headless configuration for integration tests.
///
/// No windowing, rendering, audio playback, or UI screens - just the
/// simulation and the states that drive it.
pub fn configure_headless(app: &mut App) {
    configure_game(app);
}

/// High-level groupings of systems for the app in the `Update` schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Tick timers.
    TickTimers,
    /// Record player input.
    RecordInput,
    /// Do everything else (consider splitting this into further variants).
    Update,
}

/// Whether the game is paused.
#[derive(States, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Pause(pub bool);

/// A system set for systems that shouldn't run while the game is paused.
#[derive(SystemSet, Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct PausableSystems;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("Camera"), Camera2d));
}
