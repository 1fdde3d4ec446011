//! Integration test harness.
//!
//! Tests stay headless: `MinimalPlugins` provides the core runtime, then
//! `starswarm::configure_headless` installs the states and gameplay plugins.
//! Simulation ticks are driven by running the `FixedUpdate` and
//! `StateTransition` schedules directly, so tests never depend on wall-clock
//! time.

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use starswarm::game::stage::Phase;
use starswarm::screens::Screen;

pub fn app_headless() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin, AssetPlugin::default()));

    // Normally inserted by the input plugin.
    app.init_resource::<ButtonInput<KeyCode>>();

    starswarm::configure_headless(&mut app);

    // Run startup systems and the initial state transitions.
    app.update();
    app
}

/// Advance one simulation tick, then apply any pending state transitions.
pub fn tick(app: &mut App) {
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(StateTransition);
}

/// Jump straight into the gameplay screen (stage intro phase).
pub fn enter_gameplay(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<Screen>>()
        .set(Screen::Gameplay);
    app.world_mut().run_schedule(StateTransition);
}

/// Skip the stage intro and start playing.
#[allow(dead_code)]
pub fn start_playing(app: &mut App) {
    app.world_mut()
        .resource_mut::<NextState<Phase>>()
        .set(Phase::Playing);
    app.world_mut().run_schedule(StateTransition);
}
