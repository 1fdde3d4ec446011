//! Enemy entities and their behavior state machine.
//!
//! Every enemy cycles through `Formation -> Attacking | Diving -> Returning
//! -> Formation`. Formation enemies hold a slot offset by the shared sway;
//! attacking and diving enemies follow a precomputed [`AttackPath`] by index;
//! returning enemies fly straight back to their slot and snap onto it.

use bevy::prelude::*;
use rand::Rng;

use super::SimStep;
use super::assets::ENEMY_SIZE;
use super::bullet::{FireBullet, Owner};
use super::collision::HitBox;
use super::formation::FormationSway;
use super::path::{AttackPath, sortie_path};
use super::player::PlayerShip;
use super::playfield::{self, Aabb};
use super::stage::Stage;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<EnemyKind>();

    app.add_systems(
        FixedUpdate,
        (
            tick_enemy_cooldowns,
            hold_formation,
            launch_solo_sorties,
            follow_attack_paths,
            recover_fallen_enemies,
            return_to_formation,
            enemy_fire,
        )
            .chain()
            .in_set(SimStep::Entities),
    );
}

/// Per-tick probability that a formation enemy launches a solo sortie.
const SOLO_SORTIE_CHANCE: f64 = 0.003;
/// Cooldown after a solo sortie, in ticks.
const SOLO_SORTIE_COOLDOWN: u32 = 120;
/// Per-tick probability that a path-following enemy fires.
const ENEMY_FIRE_CHANCE: f64 = 0.02;
/// Base fire cooldown; a random 0..FIRE_COOLDOWN_JITTER is added on top.
const FIRE_COOLDOWN_BASE: u32 = 30;
const FIRE_COOLDOWN_JITTER: u32 = 30;
/// Margin kept from the side edges when relocating a fallen enemy.
const RESPAWN_EDGE_MARGIN: f32 = 50.0;

/// Enemy archetypes. The ordering mirrors threat and score value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component, Reflect, Default)]
#[reflect(Component)]
pub enum EnemyKind {
    #[default]
    Drone,
    Boss,
    Elite,
}

impl EnemyKind {
    pub fn score(self) -> u32 {
        match self {
            EnemyKind::Drone => 100,
            EnemyKind::Boss => 200,
            EnemyKind::Elite => 300,
        }
    }

    /// Base movement speed in px per tick.
    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Drone => 2.0,
            EnemyKind::Boss => 3.0,
            EnemyKind::Elite => 4.0,
        }
    }

    pub fn color(self) -> Color {
        match self {
            EnemyKind::Drone => Color::srgb(0.25, 0.35, 0.95),
            EnemyKind::Boss => Color::srgb(0.95, 0.2, 0.2),
            EnemyKind::Elite => Color::srgb(0.65, 0.2, 0.75),
        }
    }

    pub fn explosion_color(self) -> Color {
        match self {
            EnemyKind::Drone => Color::srgb(1.0, 0.65, 0.0),
            EnemyKind::Boss => Color::srgb(1.0, 0.0, 0.0),
            EnemyKind::Elite => Color::srgb(1.0, 0.0, 1.0),
        }
    }
}

/// Data that persists across an enemy's state changes.
#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Slot in the formation grid, before the sway offset is applied.
    pub slot: Vec2,
    /// Ticks until the enemy may start another attack.
    pub attack_cooldown: u32,
    /// Ticks until the enemy may fire again.
    pub shot_cooldown: u32,
    /// Ticks until a boss may attempt another capture.
    pub capture_cooldown: u32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, slot: Vec2) -> Self {
        Self {
            kind,
            slot,
            attack_cooldown: 0,
            shot_cooldown: 0,
            capture_cooldown: 0,
        }
    }

    pub fn may_attack(&self) -> bool {
        self.attack_cooldown == 0
    }
}

/// The behavior state machine. `Returning -> Formation` is the only way back;
/// there is no terminal state.
///
/// While path-following, `index` only ever increases; the transition to
/// `Returning` fires when the index reaches the path length or the enemy
/// falls off the bottom of the playfield.
#[derive(Component, Debug, Clone, Default)]
pub enum EnemyState {
    #[default]
    Formation,
    Attacking {
        path: AttackPath,
        index: usize,
    },
    Diving {
        path: AttackPath,
        index: usize,
        group: u32,
        /// Remaining stagger before this member starts moving.
        delay: u32,
    },
    Returning,
}

impl EnemyState {
    pub fn in_formation(&self) -> bool {
        matches!(self, EnemyState::Formation)
    }

    /// True while actively following a path (stagger delay already elapsed).
    pub fn is_path_following(&self) -> bool {
        match self {
            EnemyState::Attacking { .. } => true,
            EnemyState::Diving { delay, .. } => *delay == 0,
            _ => false,
        }
    }
}

/// One normalized movement step toward `target`. Returns the new position and
/// whether it arrived: a remaining distance smaller than the step snaps onto
/// the target instead of overshooting.
pub fn step_toward(pos: Vec2, target: Vec2, step: f32) -> (Vec2, bool) {
    let delta = target - pos;
    let dist = delta.length();
    if dist < step {
        (target, true)
    } else {
        (pos + delta / dist * step, false)
    }
}

/// Outcome of one tick of path following.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathStep {
    Moved { pos: Vec2, index: usize },
    Finished,
}

/// Advance along `path` by one tick's `step`: snap onto the current waypoint
/// and bump the index when close enough, otherwise move straight at it.
pub fn follow_path(pos: Vec2, path: &AttackPath, index: usize, step: f32) -> PathStep {
    let Some(waypoint) = path.waypoint(index) else {
        return PathStep::Finished;
    };
    let (pos, arrived) = step_toward(pos, waypoint, step);
    let index = if arrived { index + 1 } else { index };
    PathStep::Moved { pos, index }
}

fn tick_enemy_cooldowns(mut enemies: Query<&mut Enemy>) {
    for mut enemy in &mut enemies {
        enemy.attack_cooldown = enemy.attack_cooldown.saturating_sub(1);
        enemy.shot_cooldown = enemy.shot_cooldown.saturating_sub(1);
        enemy.capture_cooldown = enemy.capture_cooldown.saturating_sub(1);
    }
}

/// Formation enemies track their slot plus the shared sway offset.
fn hold_formation(
    sway: Res<FormationSway>,
    mut enemies: Query<(&Enemy, &EnemyState, &mut Transform)>,
) {
    for (enemy, state, mut transform) in &mut enemies {
        if !state.in_formation() {
            continue;
        }
        let target = enemy.slot + Vec2::new(sway.offset, 0.0);
        transform.translation.x = target.x;
        transform.translation.y = target.y;
    }
}

/// Formation enemies occasionally peel off on a solo sortie toward the
/// player's current position.
fn launch_solo_sorties(
    player: Query<&Transform, With<PlayerShip>>,
    mut enemies: Query<(&Transform, &mut Enemy, &mut EnemyState), Without<PlayerShip>>,
) {
    let Ok(player_transform) = player.single() else {
        return;
    };
    let player_x = player_transform.translation.x;
    let mut rng = rand::rng();

    for (transform, mut enemy, mut state) in &mut enemies {
        if !state.in_formation() || !enemy.may_attack() {
            continue;
        }
        if !rng.random_bool(SOLO_SORTIE_CHANCE) {
            continue;
        }
        let start = transform.translation.truncate();
        *state = EnemyState::Attacking {
            path: sortie_path(start, player_x, &mut rng),
            index: 0,
        };
        enemy.attack_cooldown = SOLO_SORTIE_COOLDOWN;
        debug!("enemy at {start:?} starts a solo sortie");
    }
}

/// Move attacking and diving enemies along their paths; exhausted paths send
/// them back toward the formation.
fn follow_attack_paths(
    stage: Res<Stage>,
    mut enemies: Query<(&Enemy, &mut EnemyState, &mut Transform)>,
) {
    let speed_factor = stage.path_speed_factor();

    for (enemy, mut state, mut transform) in &mut enemies {
        let step = enemy.kind.base_speed() * speed_factor;

        let finished = match &mut *state {
            EnemyState::Attacking { path, index } => {
                advance_on_path(&mut transform, path, index, step)
            }
            EnemyState::Diving { delay, .. } if *delay > 0 => {
                *delay -= 1;
                false
            }
            EnemyState::Diving { path, index, .. } => {
                advance_on_path(&mut transform, path, index, step)
            }
            _ => false,
        };

        if finished {
            *state = EnemyState::Returning;
        }
    }
}

/// Apply one tick of path following to a transform. Returns true once the
/// path is exhausted.
fn advance_on_path(
    transform: &mut Transform,
    path: &AttackPath,
    index: &mut usize,
    step: f32,
) -> bool {
    let pos = transform.translation.truncate();
    match follow_path(pos, path, *index, step) {
        PathStep::Moved { pos, index: next } => {
            transform.translation.x = pos.x;
            transform.translation.y = pos.y;
            *index = next;
            false
        }
        PathStep::Finished => true,
    }
}

/// An enemy that drops off the bottom mid-attack reappears above the
/// playfield and flies back to its slot.
fn recover_fallen_enemies(
    mut enemies: Query<(&mut EnemyState, &mut Transform, &HitBox), With<Enemy>>,
) {
    let mut rng = rand::rng();
    for (mut state, mut transform, hitbox) in &mut enemies {
        if !matches!(*state, EnemyState::Attacking { .. } | EnemyState::Diving { .. }) {
            continue;
        }
        let aabb = Aabb::new(transform.translation.truncate(), hitbox.0);
        if playfield::fell_off_bottom(&aabb) {
            transform.translation.y = playfield::TOP + playfield::OFFSCREEN_MARGIN;
            transform.translation.x = rng.random_range(
                playfield::LEFT + RESPAWN_EDGE_MARGIN..playfield::RIGHT - RESPAWN_EDGE_MARGIN,
            );
            *state = EnemyState::Returning;
        }
    }
}

/// Returning enemies converge on their slot (plus sway) and snap onto it
/// exactly, so they never oscillate around the target.
fn return_to_formation(
    sway: Res<FormationSway>,
    mut enemies: Query<(&Enemy, &mut EnemyState, &mut Transform)>,
) {
    for (enemy, mut state, mut transform) in &mut enemies {
        if !matches!(*state, EnemyState::Returning) {
            continue;
        }
        let target = enemy.slot + Vec2::new(sway.offset, 0.0);
        let pos = transform.translation.truncate();
        let (pos, arrived) = step_toward(pos, target, enemy.kind.base_speed());
        transform.translation.x = pos.x;
        transform.translation.y = pos.y;
        if arrived {
            *state = EnemyState::Formation;
        }
    }
}

/// Path-following enemies fire downward at random.
pub(super) fn enemy_fire(
    mut fire: MessageWriter<FireBullet>,
    mut enemies: Query<(&Transform, &mut Enemy, &EnemyState)>,
) {
    let mut rng = rand::rng();
    for (transform, mut enemy, state) in &mut enemies {
        if !state.is_path_following() || enemy.shot_cooldown > 0 {
            continue;
        }
        if !rng.random_bool(ENEMY_FIRE_CHANCE) {
            continue;
        }
        let muzzle = transform.translation.truncate() - Vec2::new(0.0, ENEMY_SIZE.y / 2.0);
        fire.write(FireBullet {
            position: muzzle,
            owner: Owner::Enemy,
        });
        enemy.shot_cooldown = FIRE_COOLDOWN_BASE + rng.random_range(0..FIRE_COOLDOWN_JITTER);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::path::dive_path;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn returning_strictly_closes_distance_then_snaps() {
        let target = Vec2::new(100.0, 37.0);
        let step = 3.0;
        let mut pos = Vec2::new(-40.0, -12.0);
        let mut prev = pos.distance(target);

        loop {
            let (next, arrived) = step_toward(pos, target, step);
            pos = next;
            if arrived {
                break;
            }
            let dist = pos.distance(target);
            assert!(dist < prev, "distance must strictly decrease: {dist} >= {prev}");
            prev = dist;
        }

        // Snapped exactly, no overshoot.
        assert_eq!(pos, target);
        let (settled, arrived) = step_toward(pos, target, step);
        assert!(arrived);
        assert_eq!(settled, target);
    }

    #[test]
    fn follow_path_snaps_and_advances_the_index() {
        let mut rng = StdRng::seed_from_u64(1);
        let path = sortie_path(Vec2::new(0.0, 200.0), 0.0, &mut rng);
        let first = path.waypoint(0).expect("non-empty");

        // Start right next to the first waypoint: one tick snaps onto it.
        let near = first + Vec2::new(0.5, 0.0);
        match follow_path(near, &path, 0, 2.0) {
            PathStep::Moved { pos, index } => {
                assert_eq!(pos, first);
                assert_eq!(index, 1);
            }
            PathStep::Finished => panic!("path should not be exhausted"),
        }
    }

    #[test]
    fn exhausted_path_reports_finished() {
        let mut rng = StdRng::seed_from_u64(2);
        let path = sortie_path(Vec2::ZERO, 0.0, &mut rng);
        assert_eq!(
            follow_path(Vec2::ZERO, &path, path.len(), 2.0),
            PathStep::Finished
        );
    }

    #[test]
    fn path_index_never_decreases() {
        let mut rng = StdRng::seed_from_u64(3);
        let path = dive_test_path(&mut rng);
        let mut pos = path.waypoint(0).expect("non-empty");
        let mut index = 0;
        for _ in 0..10_000 {
            match follow_path(pos, &path, index, 3.0) {
                PathStep::Moved { pos: p, index: i } => {
                    assert!(i >= index);
                    pos = p;
                    index = i;
                }
                PathStep::Finished => return,
            }
        }
        panic!("path was never exhausted");
    }

    fn dive_test_path(rng: &mut StdRng) -> AttackPath {
        dive_path(Vec2::new(-100.0, 250.0), 80.0, rng)
    }
}
