mod common;

use bevy::prelude::*;

use starswarm::game::enemy::Enemy;
use starswarm::game::player::PlayerShip;
use starswarm::game::stage::Phase;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn entering_gameplay_spawns_the_wave_and_the_ship() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);

    // The gameplay screen opens on the stage intro.
    assert_eq!(
        app.world().resource::<State<Phase>>().get(),
        &Phase::StageIntro
    );

    let enemies = app
        .world_mut()
        .query::<&Enemy>()
        .iter(app.world())
        .count();
    assert_eq!(enemies, 50, "a wave is 5 rows of 10");

    let ships = app
        .world_mut()
        .query::<&PlayerShip>()
        .iter(app.world())
        .count();
    assert_eq!(ships, 1);
}

#[test]
fn the_stage_intro_hands_over_to_playing() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);

    // The banner runs for 120 ticks, then play begins.
    for _ in 0..121 {
        common::tick(&mut app);
    }
    assert_eq!(
        app.world().resource::<State<Phase>>().get(),
        &Phase::Playing
    );
}
