//! The main game module for the formation shooter.
//!
//! This module contains all the gameplay logic including:
//! - The enemy formation and its shared sway offset
//! - Per-enemy behavior state machines and attack paths
//! - Pooled bullets and AABB collision resolution
//! - Explosions, tractor beams and screen shake
//! - Stage progression and game state management
//!
//! Everything here runs on the fixed 60 Hz tick; speeds and countdowns are
//! expressed in pixels and ticks, not seconds.

pub mod assets;
pub mod bullet;
pub mod capture;
pub mod collision;
pub mod debug;
pub mod effects;
pub mod enemy;
pub mod formation;
pub mod highscore;
pub mod hud;
pub mod path;
pub mod player;
pub mod playfield;
pub mod stage;
pub mod starfield;
pub mod state;

use bevy::prelude::*;

use crate::{PausableSystems, menus::Menu, screens::Screen};
use self::stage::Phase;

pub(crate) fn plugin(app: &mut App) {
    // One pass over the world per tick, in a fixed order.
    app.configure_sets(
        FixedUpdate,
        (
            SimStep::Sway,
            SimStep::Entities,
            SimStep::Director,
            SimStep::Collide,
            SimStep::Resolve,
            SimStep::Effects,
        )
            .chain()
            .in_set(PausableSystems),
    );

    // The simulation proper only advances while actually playing; effects
    // keep aging behind the stage banner and the game over menu.
    app.configure_sets(
        FixedUpdate,
        SimStep::Sway.run_if(in_state(Phase::Playing).and(in_state(Menu::None))),
    );
    app.configure_sets(
        FixedUpdate,
        SimStep::Entities.run_if(in_state(Phase::Playing).and(in_state(Menu::None))),
    );
    app.configure_sets(
        FixedUpdate,
        SimStep::Director.run_if(in_state(Phase::Playing).and(in_state(Menu::None))),
    );
    app.configure_sets(
        FixedUpdate,
        SimStep::Collide.run_if(in_state(Phase::Playing).and(in_state(Menu::None))),
    );
    app.configure_sets(
        FixedUpdate,
        SimStep::Resolve.run_if(in_state(Phase::Playing).and(in_state(Menu::None))),
    );
    app.configure_sets(
        FixedUpdate,
        SimStep::Effects.run_if(in_state(Screen::Gameplay)),
    );

    app.add_plugins((
        assets::plugin,
        stage::plugin,
        formation::plugin,
        enemy::plugin,
        player::plugin,
        bullet::plugin,
        collision::plugin,
        capture::plugin,
        effects::plugin,
        state::plugin,
        hud::plugin,
        highscore::plugin,
    ));
}

/// The stages of one simulation tick, run in this order (see the per-tick
/// sequence in the module docs): sway, entity updates, group-attack director,
/// collision detection, resolution, effect aging.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimStep {
    Sway,
    Entities,
    Director,
    Collide,
    Resolve,
    Effects,
}
