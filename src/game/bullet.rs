//! Pooled, owner-tagged bullets.
//!
//! Bullets and explosions are the highest-churn entities in the game, so
//! bullets come from a fixed-capacity free list spawned up front. Activation
//! and reclaim only mutate component values and visibility; pool members are
//! never despawned mid-run.

use bevy::prelude::*;

use crate::audio::sound_effect;
use crate::screens::Screen;

use super::SimStep;
use super::assets::{BULLET_SIZE, GameAssets};
use super::collision::HitBox;
use super::playfield;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Owner>();
    app.add_message::<FireBullet>();

    app.add_systems(OnEnter(Screen::Gameplay), init_bullet_pool);

    app.add_systems(
        FixedUpdate,
        (fire_bullets, move_bullets)
            .chain()
            .in_set(SimStep::Entities)
            .after(super::player::fire_player_guns)
            .after(super::enemy::enemy_fire),
    );

    // Reclaim after collision resolution has marked casualties.
    app.add_systems(FixedUpdate, reclaim_bullets.in_set(SimStep::Effects));
}

/// Upward speed of player bullets, px per tick.
pub const PLAYER_BULLET_SPEED: f32 = 10.0;
/// Downward speed of enemy bullets, px per tick.
pub const ENEMY_BULLET_SPEED: f32 = 7.0;

/// Enough for the worst case of simultaneous shots on screen.
const POOL_CAPACITY: usize = 64;

/// Which side fired a bullet. Collision only checks the opposing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component, Reflect, Default)]
#[reflect(Component)]
pub enum Owner {
    #[default]
    Player,
    Enemy,
}

impl Owner {
    fn velocity(self) -> Vec2 {
        match self {
            Owner::Player => Vec2::new(0.0, PLAYER_BULLET_SPEED),
            Owner::Enemy => Vec2::new(0.0, -ENEMY_BULLET_SPEED),
        }
    }
}

/// A bullet in flight. Velocity is in px per tick.
#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub velocity: Vec2,
    pub owner: Owner,
}

/// Pool lifecycle of a bullet entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletState {
    #[default]
    Inactive,
    Active,
    /// Hit something or left the playfield; reclaimed at the end of the tick.
    PendingReturn,
}

/// Marker for pre-spawned pool members.
#[derive(Component, Debug, Clone, Copy)]
pub struct PooledBullet;

/// Free-list over the pre-spawned bullet entities.
#[derive(Resource, Debug)]
pub struct BulletPool {
    free: Vec<Entity>,
    pub capacity: usize,
}

impl BulletPool {
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn checkout(&mut self) -> Option<Entity> {
        self.free.pop()
    }

    pub fn give_back(&mut self, entity: Entity) {
        self.free.push(entity);
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// Request to fire a bullet from `position`.
#[derive(Message, Debug, Clone)]
pub struct FireBullet {
    pub position: Vec2,
    pub owner: Owner,
}

/// Pre-spawn the whole pool, hidden and inactive. The entities despawn with
/// the screen; the pool is rebuilt on every gameplay entry.
fn init_bullet_pool(mut commands: Commands, assets: Res<GameAssets>) {
    let mut pool = BulletPool::new(POOL_CAPACITY);
    for _ in 0..POOL_CAPACITY {
        let entity = commands
            .spawn((
                Name::new("Bullet (pooled)"),
                PooledBullet,
                BulletState::Inactive,
                Bullet {
                    velocity: Vec2::ZERO,
                    owner: Owner::Player,
                },
                HitBox(BULLET_SIZE / 2.0),
                assets.bullet_sprite(Owner::Player),
                Transform::from_xyz(0.0, 0.0, 2.0),
                Visibility::Hidden,
                DespawnOnExit(Screen::Gameplay),
            ))
            .id();
        pool.give_back(entity);
    }
    commands.insert_resource(pool);
}

/// Turn fire requests into active pool members.
fn fire_bullets(
    mut commands: Commands,
    mut fire: MessageReader<FireBullet>,
    mut pool: ResMut<BulletPool>,
    assets: Res<GameAssets>,
    mut bullets: Query<
        (&mut Bullet, &mut BulletState, &mut Transform, &mut Visibility, &mut Sprite),
        With<PooledBullet>,
    >,
) {
    for request in fire.read() {
        let Some(entity) = pool.checkout() else {
            debug!("bullet pool exhausted, dropping shot");
            continue;
        };
        let Ok((mut bullet, mut state, mut transform, mut visibility, mut sprite)) =
            bullets.get_mut(entity)
        else {
            continue;
        };

        bullet.velocity = request.owner.velocity();
        bullet.owner = request.owner;
        *state = BulletState::Active;
        transform.translation = request.position.extend(2.0);
        *visibility = Visibility::Visible;
        *sprite = assets.bullet_sprite(request.owner);

        if request.owner == Owner::Player
            && let Some(sound) = &assets.fire_sound
        {
            commands.spawn(sound_effect(sound.clone()));
        }
    }
}

/// Advance active bullets; bullets that leave the playfield are reclaimed.
fn move_bullets(mut bullets: Query<(&Bullet, &mut BulletState, &mut Transform)>) {
    for (bullet, mut state, mut transform) in &mut bullets {
        if *state != BulletState::Active {
            continue;
        }
        transform.translation.x += bullet.velocity.x;
        transform.translation.y += bullet.velocity.y;

        let y = transform.translation.y;
        if y - BULLET_SIZE.y / 2.0 > playfield::TOP || y + BULLET_SIZE.y / 2.0 < playfield::BOTTOM
        {
            *state = BulletState::PendingReturn;
        }
    }
}

/// Return spent bullets to the free list without structural changes.
fn reclaim_bullets(
    pool: Option<ResMut<BulletPool>>,
    mut bullets: Query<(Entity, &mut BulletState, &mut Visibility), With<PooledBullet>>,
) {
    let Some(mut pool) = pool else {
        return;
    };
    for (entity, mut state, mut visibility) in &mut bullets {
        if *state != BulletState::PendingReturn {
            continue;
        }
        *state = BulletState::Inactive;
        *visibility = Visibility::Hidden;
        pool.give_back(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_checkout_and_give_back() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();

        let mut pool = BulletPool::new(2);
        pool.give_back(a);
        pool.give_back(b);
        assert_eq!(pool.available(), 2);

        let first = pool.checkout().expect("pool has members");
        let second = pool.checkout().expect("pool has members");
        assert_ne!(first, second);
        assert_eq!(pool.checkout(), None);

        pool.give_back(first);
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.checkout(), Some(first));
    }

    #[test]
    fn owner_selects_the_fire_direction() {
        assert!(Owner::Player.velocity().y > 0.0);
        assert!(Owner::Enemy.velocity().y < 0.0);
    }
}
