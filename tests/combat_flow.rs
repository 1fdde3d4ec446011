mod common;

use bevy::prelude::*;

use starswarm::game::bullet::{Bullet, BulletState, Owner};
use starswarm::game::collision::HitBox;
use starswarm::game::enemy::{Enemy, EnemyKind, EnemyState};
use starswarm::game::path::dive_path;
use starswarm::game::player::{Captured, PlayerShip};
use starswarm::menus::Menu;

/// Spawn a live bullet directly, bypassing the pool; the collision systems
/// only care about the components.
fn spawn_bullet(app: &mut App, position: Vec2, owner: Owner) {
    let velocity = match owner {
        Owner::Player => Vec2::new(0.0, 10.0),
        Owner::Enemy => Vec2::new(0.0, -7.0),
    };
    app.world_mut().spawn((
        Bullet { velocity, owner },
        BulletState::Active,
        HitBox(Vec2::new(4.0, 8.0)),
        Transform::from_translation(position.extend(2.0)),
    ));
}

fn player_position(app: &mut App) -> Vec2 {
    app.world_mut()
        .query_filtered::<&Transform, With<PlayerShip>>()
        .single(app.world())
        .expect("one player ship")
        .translation
        .truncate()
}

#[test]
fn losing_the_last_life_ends_the_run_on_that_tick() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);
    common::start_playing(&mut app);

    {
        let mut query = app.world_mut().query::<&mut PlayerShip>();
        let mut ship = query.single_mut(app.world_mut()).expect("one player ship");
        ship.lives = 1;
        assert_eq!(ship.invulnerable, 0);
    }

    let position = player_position(&mut app);
    spawn_bullet(&mut app, position, Owner::Enemy);

    // One fixed tick, before any state transition is applied.
    app.world_mut().run_schedule(FixedUpdate);

    let mut query = app.world_mut().query::<&PlayerShip>();
    let ship = query.single(app.world()).expect("one player ship");
    assert_eq!(ship.lives, 0);
    assert!(
        matches!(
            app.world().resource::<NextState<Menu>>(),
            NextState::Pending(Menu::GameOver)
        ),
        "the game over transition must be queued on the same tick"
    );

    app.world_mut().run_schedule(StateTransition);
    assert_eq!(app.world().resource::<State<Menu>>().get(), &Menu::GameOver);
}

#[test]
fn a_hit_with_lives_to_spare_grants_invulnerability() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);
    common::start_playing(&mut app);

    let position = player_position(&mut app);
    spawn_bullet(&mut app, position, Owner::Enemy);
    common::tick(&mut app);

    let mut query = app.world_mut().query::<&PlayerShip>();
    let ship = query.single(app.world()).expect("one player ship");
    assert_eq!(ship.lives, 2);
    assert!(ship.invulnerable > 0);
    assert_eq!(app.world().resource::<State<Menu>>().get(), &Menu::None);
}

#[test]
fn shooting_the_captor_rescues_the_ship_with_dual_guns() {
    let mut app = common::app_headless();
    common::enter_gameplay(&mut app);
    common::start_playing(&mut app);

    let player_pos = player_position(&mut app);

    // Park a boss in the capture band straight above the ship.
    let boss_pos = Vec2::new(player_pos.x, player_pos.y + 175.0 + 20.0 + 25.0);
    let boss = {
        let mut query = app
            .world_mut()
            .query::<(Entity, &Enemy, &mut EnemyState, &mut Transform)>();
        let mut rng = rand::rng();
        let mut found = None;
        for (entity, enemy, mut state, mut transform) in query.iter_mut(app.world_mut()) {
            if enemy.kind != EnemyKind::Boss {
                continue;
            }
            transform.translation.x = boss_pos.x;
            transform.translation.y = boss_pos.y;
            *state = EnemyState::Diving {
                path: dive_path(boss_pos, player_pos.x, &mut rng),
                index: 0,
                group: 99,
                delay: 0,
            };
            found = Some(entity);
            break;
        }
        found.expect("the wave contains bosses")
    };

    common::tick(&mut app);

    let mut query = app.world_mut().query_filtered::<&Captured, With<PlayerShip>>();
    let held = query.single(app.world()).expect("the ship should be captured");
    assert_eq!(held.captor, boss);

    // Shoot the captor down.
    let boss_now = app
        .world()
        .entity(boss)
        .get::<Transform>()
        .expect("boss still exists")
        .translation
        .truncate();
    spawn_bullet(&mut app, boss_now, Owner::Player);
    common::tick(&mut app);

    let mut query = app.world_mut().query::<(&PlayerShip, Option<&Captured>)>();
    let (ship, captured) = query.single(app.world()).expect("one player ship");
    assert!(captured.is_none(), "rescue removes the captured state");
    assert!(ship.dual, "rescue arms the second gun");
    assert!(ship.invulnerable > 0, "rescue grants a grace period");
}
