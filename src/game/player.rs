//! The player's ship.
//!
//! Input is sampled once per tick into a resource during `Update` and
//! consumed on the fixed tick, so simulation behavior does not depend on the
//! render frame rate.

use bevy::prelude::*;

use crate::{AppSystems, PausableSystems, screens::Screen};

use super::SimStep;
use super::assets::{GameAssets, PLAYER_SIZE};
use super::bullet::{FireBullet, Owner};
use super::collision::HitBox;
use super::playfield;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_player);

    app.add_systems(
        Update,
        sample_input
            .in_set(AppSystems::RecordInput)
            .in_set(PausableSystems)
            .run_if(in_state(Screen::Gameplay)),
    );

    app.add_systems(
        FixedUpdate,
        (tick_player_timers, move_player, fire_player_guns)
            .chain()
            .in_set(SimStep::Entities),
    );
}

/// Movement speed in px per tick.
const PLAYER_SPEED: f32 = 5.0;
/// Ticks between shots.
const FIRE_COOLDOWN: u32 = 15;
/// Invulnerability window after taking a hit, in ticks.
pub const HIT_INVULNERABILITY: u32 = 120;
/// X offset of the second ship's gun in dual mode.
const DUAL_OFFSET: f32 = 30.0;
/// Resting y position of the ship.
pub const PLAYER_Y: f32 = playfield::BOTTOM + 45.0;

/// The player's ship and its run state.
#[derive(Component, Debug, Clone)]
pub struct PlayerShip {
    pub lives: u32,
    pub fire_cooldown: u32,
    /// Ticks of remaining invulnerability; no damage while positive.
    pub invulnerable: u32,
    /// Rescuing a captured ship arms a second gun.
    pub dual: bool,
}

impl Default for PlayerShip {
    fn default() -> Self {
        Self {
            lives: 3,
            fire_cooldown: 0,
            invulnerable: 0,
            dual: false,
        }
    }
}

/// Present while the ship is held by a tractor beam. The ship cannot move or
/// fire, and enemy fire passes through it.
#[derive(Component, Debug)]
pub struct Captured {
    pub remaining: u32,
    pub captor: Entity,
}

/// Keyboard state sampled once per tick.
#[derive(Resource, Debug, Default)]
pub struct PlayerInput {
    pub move_x: f32,
    pub fire: bool,
}

fn spawn_player(mut commands: Commands, assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("Player"),
        PlayerShip::default(),
        HitBox(PLAYER_SIZE / 2.0),
        assets.player_sprite(),
        Transform::from_xyz(0.0, PLAYER_Y, 1.0),
        DespawnOnExit(Screen::Gameplay),
    ));
}

fn sample_input(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let mut x = 0.0;
    if keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA) {
        x -= 1.0;
    }
    if keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD) {
        x += 1.0;
    }
    input.move_x = x;
    input.fire = keys.pressed(KeyCode::Space);
}

fn tick_player_timers(
    mut commands: Commands,
    mut player: Query<(Entity, &mut PlayerShip, Option<&mut Captured>, &mut Sprite)>,
) {
    let Ok((entity, mut ship, captured, mut sprite)) = player.single_mut() else {
        return;
    };

    ship.fire_cooldown = ship.fire_cooldown.saturating_sub(1);
    ship.invulnerable = ship.invulnerable.saturating_sub(1);

    // Blink while invulnerable.
    let alpha = if ship.invulnerable > 0 && ship.invulnerable % 4 < 2 {
        0.4
    } else {
        1.0
    };
    sprite.color = sprite.color.with_alpha(alpha);

    if let Some(mut captured) = captured {
        captured.remaining = captured.remaining.saturating_sub(1);
        if captured.remaining == 0 {
            // Released by timeout; no rescue reward.
            commands.entity(entity).remove::<Captured>();
            info!("tractor beam released the ship");
        }
    }
}

fn move_player(
    input: Res<PlayerInput>,
    mut player: Query<&mut Transform, (With<PlayerShip>, Without<Captured>)>,
) {
    let Ok(mut transform) = player.single_mut() else {
        return;
    };
    let half = PLAYER_SIZE.x / 2.0;
    let x = transform.translation.x + input.move_x * PLAYER_SPEED;
    transform.translation.x = x.clamp(playfield::LEFT + half, playfield::RIGHT - half);
}

pub(super) fn fire_player_guns(
    input: Res<PlayerInput>,
    mut fire: MessageWriter<FireBullet>,
    mut player: Query<(&Transform, &mut PlayerShip), Without<Captured>>,
) {
    let Ok((transform, mut ship)) = player.single_mut() else {
        return;
    };
    if !input.fire || ship.fire_cooldown > 0 {
        return;
    }

    let muzzle = transform.translation.truncate() + Vec2::new(0.0, PLAYER_SIZE.y / 2.0);
    fire.write(FireBullet {
        position: muzzle,
        owner: Owner::Player,
    });
    if ship.dual {
        fire.write(FireBullet {
            position: muzzle + Vec2::new(DUAL_OFFSET, 0.0),
            owner: Owner::Player,
        });
    }
    ship.fire_cooldown = FIRE_COOLDOWN;
}
