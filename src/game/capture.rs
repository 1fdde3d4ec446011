//! The boss capture mechanic.
//!
//! A diving boss hovering in the right band above the player can lock a
//! tractor beam onto it. The ship is frozen until the countdown expires, or
//! until the captor is shot down - which frees the ship with a second gun
//! and a grace period.

use bevy::prelude::*;

use super::SimStep;
use super::collision::{EnemyDestroyed, HitBox};
use super::effects::spawn_tractor_beam;
use super::enemy::{Enemy, EnemyKind, EnemyState};
use super::player::{Captured, HIT_INVULNERABILITY, PlayerShip};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        attempt_capture
            .in_set(SimStep::Entities)
            .after(super::enemy::enemy_fire),
    );
    app.add_systems(FixedUpdate, rescue_on_captor_destroyed.in_set(SimStep::Resolve));
}

/// Horizontal alignment window for a capture attempt.
const CAPTURE_ALIGN_X: f32 = 30.0;
/// The vertical gap between boss bottom and player top must be inside this
/// open interval.
const CAPTURE_GAP_MIN: f32 = 100.0;
const CAPTURE_GAP_MAX: f32 = 200.0;
/// How long a capture holds the ship, in ticks.
const CAPTURE_DURATION: u32 = 180;
/// Per-boss cooldown between capture attempts.
const CAPTURE_COOLDOWN: u32 = 600;

/// A path-following boss directly above the player fires its beam.
fn attempt_capture(
    mut commands: Commands,
    player: Query<(Entity, &Transform, &PlayerShip, &HitBox), Without<Captured>>,
    mut enemies: Query<(Entity, &Transform, &mut Enemy, &EnemyState, &HitBox), Without<PlayerShip>>,
) {
    let Ok((player_entity, player_transform, ship, player_hitbox)) = player.single() else {
        return;
    };
    if ship.invulnerable > 0 {
        return;
    }
    let player_pos = player_transform.translation.truncate();
    let player_top = player_pos.y + player_hitbox.0.y;

    for (boss_entity, transform, mut enemy, state, hitbox) in &mut enemies {
        if enemy.kind != EnemyKind::Boss || enemy.capture_cooldown > 0 {
            continue;
        }
        if !state.is_path_following() {
            continue;
        }
        let boss_pos = transform.translation.truncate();
        if (boss_pos.x - player_pos.x).abs() >= CAPTURE_ALIGN_X {
            continue;
        }
        let boss_bottom = boss_pos.y - hitbox.0.y;
        let gap = boss_bottom - player_top;
        if gap <= CAPTURE_GAP_MIN || gap >= CAPTURE_GAP_MAX {
            continue;
        }

        enemy.capture_cooldown = CAPTURE_COOLDOWN;
        commands.entity(player_entity).insert(Captured {
            remaining: CAPTURE_DURATION,
            captor: boss_entity,
        });
        spawn_tractor_beam(
            &mut commands,
            Vec2::new(boss_pos.x, boss_bottom),
            Vec2::new(player_pos.x, player_top),
        );
        info!("tractor beam captured the ship");
        // One capture at a time.
        return;
    }
}

/// Shooting down the captor frees the ship: dual guns plus a grace period.
fn rescue_on_captor_destroyed(
    mut commands: Commands,
    mut destroyed: MessageReader<EnemyDestroyed>,
    mut player: Query<(Entity, &mut PlayerShip, &Captured)>,
) {
    let Ok((entity, mut ship, captured)) = player.single_mut() else {
        // Nothing captured; skip this batch.
        destroyed.clear();
        return;
    };
    for message in destroyed.read() {
        if message.entity != captured.captor {
            continue;
        }
        commands.entity(entity).remove::<Captured>();
        ship.dual = true;
        ship.invulnerable = HIT_INVULNERABILITY;
        info!("captured ship rescued, dual guns online");
    }
}
