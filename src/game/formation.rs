//! The shared formation sway and the group-attack director.
//!
//! The sway offset is the one piece of state every formation enemy reads; it
//! is written exactly once per tick, before any enemy moves. The director
//! drives coordinated group dives on a countdown that re-arms long after a
//! successful launch and short after a failed one.

use bevy::prelude::*;
use rand::Rng;
use rand::seq::IteratorRandom;

use crate::screens::Screen;

use super::SimStep;
use super::enemy::{Enemy, EnemyState};
use super::path::dive_path;
use super::player::PlayerShip;
use super::stage::{Phase, Stage};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<FormationSway>();
    app.init_resource::<AttackDirector>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_formation);
    // Each stage opens with the full delay before the first group dive.
    app.add_systems(OnEnter(Phase::Playing), arm_director);

    app.add_systems(FixedUpdate, advance_sway.in_set(SimStep::Sway));
    app.add_systems(FixedUpdate, direct_group_attacks.in_set(SimStep::Director));
}

/// Lateral travel of the formation before it bounces back.
pub const SWAY_AMPLITUDE: f32 = 50.0;

/// Ticks before the first group attack of a stage.
pub const FIRST_ATTACK_DELAY: u32 = 180;
/// Short re-arm after a failed trigger (not enough eligible enemies).
pub const RETRY_INTERVAL: u32 = 30;
/// Successful triggers re-arm to this plus a random 0..SUCCESS_INTERVAL_BASE.
const SUCCESS_INTERVAL_BASE: u32 = 120;
/// Stagger between the start of consecutive group members, in ticks.
const GROUP_STAGGER: u32 = 5;
/// Group dives put the member on a longer cooldown than solo sorties.
const GROUP_ATTACK_COOLDOWN: u32 = 180;

const GROUP_SIZE_MIN: usize = 3;
const GROUP_SIZE_MAX: usize = 5;

/// The shared lateral oscillation applied to every formation slot.
#[derive(Resource, Debug)]
pub struct FormationSway {
    pub offset: f32,
    direction: f32,
}

impl Default for FormationSway {
    fn default() -> Self {
        Self {
            offset: 0.0,
            direction: 1.0,
        }
    }
}

/// Countdown driving coordinated group dives.
#[derive(Resource, Debug)]
pub struct AttackDirector {
    pub countdown: u32,
    next_group: u32,
}

impl Default for AttackDirector {
    fn default() -> Self {
        Self {
            countdown: FIRST_ATTACK_DELAY,
            next_group: 1,
        }
    }
}

impl AttackDirector {
    /// Hand out the next group identifier. Monotonic, so ids never collide.
    pub fn next_group_id(&mut self) -> u32 {
        let id = self.next_group;
        self.next_group += 1;
        id
    }

    /// Re-arm the countdown after an attempt. A failed attempt retries
    /// shortly; a successful one waits for a randomized longer interval.
    pub fn rearm<R: Rng + ?Sized>(&mut self, launched: bool, rng: &mut R) {
        self.countdown = if launched {
            SUCCESS_INTERVAL_BASE + rng.random_range(0..SUCCESS_INTERVAL_BASE)
        } else {
            RETRY_INTERVAL
        };
    }
}

/// Pick `group_size` members out of the eligible set, or refuse when there
/// are not enough of them.
pub fn choose_members<T: Copy, R: Rng + ?Sized>(
    eligible: &[T],
    group_size: usize,
    rng: &mut R,
) -> Option<Vec<T>> {
    if eligible.len() < group_size {
        return None;
    }
    Some(
        eligible
            .iter()
            .copied()
            .choose_multiple(rng, group_size),
    )
}

fn reset_formation(mut sway: ResMut<FormationSway>, mut director: ResMut<AttackDirector>) {
    *sway = FormationSway::default();
    *director = AttackDirector::default();
}

fn arm_director(mut director: ResMut<AttackDirector>) {
    director.countdown = FIRST_ATTACK_DELAY;
}

/// Advance the shared sway once per tick, bouncing between the amplitude
/// limits. Speed scales with the stage number.
fn advance_sway(stage: Res<Stage>, mut sway: ResMut<FormationSway>) {
    sway.offset += sway.direction * stage.sway_speed();
    if sway.offset.abs() > SWAY_AMPLITUDE {
        sway.direction = -sway.direction;
    }
}

/// Tick the director countdown; at zero, try to launch a group dive and
/// re-arm either way.
fn direct_group_attacks(
    mut director: ResMut<AttackDirector>,
    player: Query<&Transform, With<PlayerShip>>,
    mut enemies: Query<(Entity, &Transform, &mut Enemy, &mut EnemyState), Without<PlayerShip>>,
) {
    if director.countdown > 0 {
        director.countdown -= 1;
        return;
    }
    let Ok(player_transform) = player.single() else {
        return;
    };
    let player_x = player_transform.translation.x;

    let mut rng = rand::rng();
    let group_size = rng.random_range(GROUP_SIZE_MIN..=GROUP_SIZE_MAX);

    let eligible: Vec<Entity> = enemies
        .iter()
        .filter(|(_, _, enemy, state)| state.in_formation() && enemy.may_attack())
        .map(|(entity, ..)| entity)
        .collect();

    let members = choose_members(&eligible, group_size, &mut rng);
    let launched = members.is_some();

    if let Some(members) = members {
        let group = director.next_group_id();
        info!("group {group} dives with {} ships", members.len());
        for (i, member) in members.into_iter().enumerate() {
            let Ok((_, transform, mut enemy, mut state)) = enemies.get_mut(member) else {
                continue;
            };
            let start = transform.translation.truncate();
            *state = EnemyState::Diving {
                path: dive_path(start, player_x, &mut rng),
                index: 0,
                group,
                delay: i as u32 * GROUP_STAGGER,
            };
            enemy.attack_cooldown = GROUP_ATTACK_COOLDOWN;
        }
    } else {
        debug!(
            "group attack skipped: {} eligible of {} needed",
            eligible.len(),
            group_size
        );
    }

    director.rearm(launched, &mut rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn too_few_eligible_fails_and_rearms_short() {
        let mut rng = StdRng::seed_from_u64(5);
        let eligible = [1u32, 2];

        let members = choose_members(&eligible, 3, &mut rng);
        assert!(members.is_none());

        let mut director = AttackDirector::default();
        director.rearm(members.is_some(), &mut rng);
        assert_eq!(director.countdown, RETRY_INTERVAL);
    }

    #[test]
    fn successful_launch_rearms_long() {
        let mut rng = StdRng::seed_from_u64(5);
        let eligible = [1u32, 2, 3, 4, 5, 6];

        let members = choose_members(&eligible, 4, &mut rng).expect("enough eligible");
        assert_eq!(members.len(), 4);
        for member in &members {
            assert!(eligible.contains(member));
        }

        let mut director = AttackDirector::default();
        director.rearm(true, &mut rng);
        assert!(director.countdown >= SUCCESS_INTERVAL_BASE);
        assert!(director.countdown < 2 * SUCCESS_INTERVAL_BASE);
    }

    #[test]
    fn group_ids_are_unique() {
        let mut director = AttackDirector::default();
        let a = director.next_group_id();
        let b = director.next_group_id();
        assert_ne!(a, b);
    }

    #[test]
    fn sway_direction_flips_at_the_amplitude() {
        let mut sway = FormationSway::default();
        let speed = 1.5;
        let mut seen_positive = false;
        let mut seen_negative = false;
        for _ in 0..1_000 {
            sway.offset += sway.direction * speed;
            if sway.offset.abs() > SWAY_AMPLITUDE {
                sway.direction = -sway.direction;
            }
            assert!(sway.offset.abs() <= SWAY_AMPLITUDE + speed);
            seen_positive |= sway.offset > 0.0;
            seen_negative |= sway.offset < 0.0;
        }
        assert!(seen_positive && seen_negative, "sway should oscillate");
    }
}
