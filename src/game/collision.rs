//! AABB collision detection and resolution.
//!
//! Resolution order within a tick is fixed: player bullets against enemies,
//! enemy bullets against the player, then bodies against the player. A
//! bullet overlapping several targets resolves against the nearest one;
//! remaining ties fall to the earlier target in iteration order, so the
//! outcome is deterministic for a fixed entity set.

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::SimStep;
use super::bullet::{Bullet, BulletState, Owner};
use super::enemy::{Enemy, EnemyState};
use super::player::{Captured, PlayerShip};
use super::playfield::Aabb;

pub(super) fn plugin(app: &mut App) {
    app.add_message::<EnemyDestroyed>();
    app.add_message::<PlayerStruck>();

    app.add_systems(
        FixedUpdate,
        (
            player_bullets_hit_enemies,
            enemy_bullets_hit_player,
            bodies_hit_player,
        )
            .chain()
            .in_set(SimStep::Collide),
    );
}

/// Half-extent hitbox around an entity's translation.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitBox(pub Vec2);

impl HitBox {
    pub fn aabb(&self, center: Vec2) -> Aabb {
        Aabb::new(center, self.0)
    }
}

/// An enemy was shot down this tick.
#[derive(Message, Debug, Clone)]
pub struct EnemyDestroyed {
    pub entity: Entity,
    pub kind: super::enemy::EnemyKind,
    pub position: Vec2,
}

/// The player took a hit this tick.
#[derive(Message, Debug, Clone)]
pub struct PlayerStruck {
    pub position: Vec2,
}

/// Match each attacker against at most one overlapping target: the nearest
/// by squared center distance, ties broken by target order. Pure; no removal
/// happens here, so matching the same sets twice yields the same pairs.
pub fn match_pairs(
    attackers: &[(Entity, Aabb)],
    targets: &[(Entity, Aabb)],
) -> Vec<(Entity, Entity)> {
    let mut pairs = Vec::new();
    for &(attacker, attacker_box) in attackers {
        let mut best: Option<(Entity, f32)> = None;
        for &(target, target_box) in targets {
            if !attacker_box.overlaps(&target_box) {
                continue;
            }
            let d2 = attacker_box.center.distance_squared(target_box.center);
            let closer = match best {
                None => true,
                Some((_, best_d2)) => d2 < best_d2,
            };
            if closer {
                best = Some((target, d2));
            }
        }
        if let Some((target, _)) = best {
            pairs.push((attacker, target));
        }
    }
    pairs
}

/// Player bullets destroy enemies; both sides of a pair are consumed.
fn player_bullets_hit_enemies(
    mut commands: Commands,
    mut bullets: Query<(Entity, &Bullet, &mut BulletState, &Transform, &HitBox)>,
    enemies: Query<(Entity, &Enemy, &Transform, &HitBox)>,
    mut destroyed: MessageWriter<EnemyDestroyed>,
) {
    let shots: Vec<(Entity, Aabb)> = bullets
        .iter()
        .filter(|(_, bullet, state, ..)| {
            bullet.owner == Owner::Player && **state == BulletState::Active
        })
        .map(|(entity, _, _, transform, hitbox)| {
            (entity, hitbox.aabb(transform.translation.truncate()))
        })
        .collect();
    if shots.is_empty() {
        return;
    }
    let targets: Vec<(Entity, Aabb)> = enemies
        .iter()
        .map(|(entity, _, transform, hitbox)| {
            (entity, hitbox.aabb(transform.translation.truncate()))
        })
        .collect();

    // Two bullets may both pick the same enemy; it only dies once.
    let mut killed: HashSet<Entity> = HashSet::new();

    for (shot, target) in match_pairs(&shots, &targets) {
        if let Ok((_, _, mut state, _, _)) = bullets.get_mut(shot) {
            *state = BulletState::PendingReturn;
        }
        if !killed.insert(target) {
            continue;
        }
        let Ok((entity, enemy, transform, _)) = enemies.get(target) else {
            continue;
        };
        commands.entity(entity).despawn();
        destroyed.write(EnemyDestroyed {
            entity,
            kind: enemy.kind,
            position: transform.translation.truncate(),
        });
    }
}

/// Enemy bullets strike the player unless it is invulnerable or captured.
/// Every overlapping bullet is consumed; the player is struck once.
fn enemy_bullets_hit_player(
    mut bullets: Query<(Entity, &Bullet, &mut BulletState, &Transform, &HitBox)>,
    player: Query<(Entity, &PlayerShip, &Transform, &HitBox), Without<Captured>>,
    mut struck: MessageWriter<PlayerStruck>,
) {
    let Ok((player_entity, ship, transform, hitbox)) = player.single() else {
        return;
    };
    if ship.invulnerable > 0 {
        return;
    }

    let shots: Vec<(Entity, Aabb)> = bullets
        .iter()
        .filter(|(_, bullet, state, ..)| {
            bullet.owner == Owner::Enemy && **state == BulletState::Active
        })
        .map(|(entity, _, _, transform, hitbox)| {
            (entity, hitbox.aabb(transform.translation.truncate()))
        })
        .collect();
    if shots.is_empty() {
        return;
    }
    let position = transform.translation.truncate();
    let target = [(player_entity, hitbox.aabb(position))];

    let pairs = match_pairs(&shots, &target);
    if pairs.is_empty() {
        return;
    }
    for (shot, _) in &pairs {
        if let Ok((_, _, mut state, _, _)) = bullets.get_mut(*shot) {
            *state = BulletState::PendingReturn;
        }
    }
    struck.write(PlayerStruck { position });
}

/// Body contact costs the player a life but only sends the enemy home: the
/// colliding enemies leave their attack and fly back to the formation.
fn bodies_hit_player(
    player: Query<(&PlayerShip, &Transform, &HitBox), Without<Captured>>,
    mut enemies: Query<(&Transform, &mut EnemyState, &HitBox), With<Enemy>>,
    mut struck: MessageWriter<PlayerStruck>,
) {
    let Ok((ship, transform, hitbox)) = player.single() else {
        return;
    };
    if ship.invulnerable > 0 {
        return;
    }
    let position = transform.translation.truncate();
    let player_box = hitbox.aabb(position);

    let mut any_contact = false;
    for (enemy_transform, mut state, enemy_hitbox) in &mut enemies {
        let enemy_box = enemy_hitbox.aabb(enemy_transform.translation.truncate());
        if !player_box.overlaps(&enemy_box) {
            continue;
        }
        any_contact = true;
        *state = EnemyState::Returning;
    }

    if any_contact {
        struck.write(PlayerStruck { position });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(world: &mut World, center: Vec2, half: f32) -> (Entity, Aabb) {
        let entity = world.spawn_empty().id();
        (entity, Aabb::new(center, Vec2::splat(half)))
    }

    #[test]
    fn matching_is_idempotent_for_unchanged_sets() {
        let mut world = World::new();
        let shots = vec![
            boxed(&mut world, Vec2::new(0.0, 0.0), 5.0),
            boxed(&mut world, Vec2::new(100.0, 0.0), 5.0),
        ];
        let targets = vec![
            boxed(&mut world, Vec2::new(3.0, 0.0), 5.0),
            boxed(&mut world, Vec2::new(104.0, 0.0), 5.0),
            boxed(&mut world, Vec2::new(-200.0, 0.0), 5.0),
        ];

        let first = match_pairs(&shots, &targets);
        let second = match_pairs(&shots, &targets);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn multi_overlap_resolves_to_the_nearest_target() {
        let mut world = World::new();
        let shot = boxed(&mut world, Vec2::ZERO, 10.0);
        let near = boxed(&mut world, Vec2::new(4.0, 0.0), 10.0);
        let far = boxed(&mut world, Vec2::new(12.0, 0.0), 10.0);

        // Both orders produce the same winner.
        let pairs = match_pairs(&[shot], &[far, near]);
        assert_eq!(pairs, vec![(shot.0, near.0)]);
        let pairs = match_pairs(&[shot], &[near, far]);
        assert_eq!(pairs, vec![(shot.0, near.0)]);
    }

    #[test]
    fn equidistant_targets_fall_to_iteration_order() {
        let mut world = World::new();
        let shot = boxed(&mut world, Vec2::ZERO, 10.0);
        let left = boxed(&mut world, Vec2::new(-6.0, 0.0), 10.0);
        let right = boxed(&mut world, Vec2::new(6.0, 0.0), 10.0);

        let pairs = match_pairs(&[shot], &[left, right]);
        assert_eq!(pairs, vec![(shot.0, left.0)]);
    }

    #[test]
    fn no_overlap_no_pairs() {
        let mut world = World::new();
        let shot = boxed(&mut world, Vec2::ZERO, 2.0);
        let target = boxed(&mut world, Vec2::new(50.0, 50.0), 2.0);
        assert!(match_pairs(&[shot], &[target]).is_empty());
    }
}
