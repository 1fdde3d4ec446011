mod common;

use bevy::prelude::*;

use starswarm::game::enemy::Enemy;
use starswarm::game::formation::{AttackDirector, RETRY_INTERVAL};
use starswarm::game::stage::{Phase, Stage};

#[test]
fn clearing_a_wave_advances_to_the_next_stage_intro() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);
    common::start_playing(&mut app);

    let enemies: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .iter(app.world())
        .collect();
    for entity in enemies {
        app.world_mut().despawn(entity);
    }

    common::tick(&mut app);

    assert_eq!(app.world().resource::<Stage>().number, 2);
    assert_eq!(
        app.world().resource::<State<Phase>>().get(),
        &Phase::StageIntro
    );

    // The next wave is on the board again.
    let respawned = app
        .world_mut()
        .query::<&Enemy>()
        .iter(app.world())
        .count();
    assert_eq!(respawned, 50);
}

#[test]
fn group_attack_without_enough_eligible_enemies_retries_shortly() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);
    common::start_playing(&mut app);

    // Thin the wave down to two enemies: below any possible group size.
    let enemies: Vec<Entity> = app
        .world_mut()
        .query_filtered::<Entity, With<Enemy>>()
        .iter(app.world())
        .collect();
    for entity in enemies.iter().skip(2) {
        app.world_mut().despawn(*entity);
    }

    app.world_mut().resource_mut::<AttackDirector>().countdown = 0;
    common::tick(&mut app);

    let director = app.world().resource::<AttackDirector>();
    assert_eq!(
        director.countdown, RETRY_INTERVAL,
        "a failed trigger re-arms to the short retry interval"
    );
}
