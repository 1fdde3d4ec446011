//! Attack path generation.
//!
//! A path is generated once, at the moment an enemy leaves formation, and is
//! consumed by index afterwards - it is never re-aimed. The player's
//! x-coordinate is sampled at generation time only.

use bevy::prelude::*;
use rand::Rng;

use super::playfield;

/// An immutable, ordered sequence of waypoints.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackPath(Vec<Vec2>);

impl AttackPath {
    pub fn waypoint(&self, index: usize) -> Option<Vec2> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<Vec2> {
        self.0.last().copied()
    }
}

/// Waypoint count range for the curved segment of a sortie.
const SORTIE_CURVE_MIN: usize = 20;
const SORTIE_CURVE_MAX: usize = 40;
/// Vertical dip of the sortie curve.
const SORTIE_DIP: f32 = 200.0;
/// Straight tail appended after the curve.
const SORTIE_TAIL_STEPS: usize = 20;
const SORTIE_TAIL_STEP: f32 = 10.0;

/// How far from the playfield edge a dive swings out to.
const DIVE_EDGE_INSET: f32 = 50.0;
const DIVE_SWING_STEPS: usize = 40;
/// Slight rise during the lateral swing, before the drop.
const DIVE_SWING_RISE: f32 = 50.0;
const DIVE_DROP_STEPS: usize = 30;

/// A curved solo sortie: an S-curve from `start` toward the x-coordinate the
/// player held when the path was generated, then a straight run downward.
pub fn sortie_path<R: Rng + ?Sized>(start: Vec2, player_x: f32, rng: &mut R) -> AttackPath {
    let steps = rng.random_range(SORTIE_CURVE_MIN..=SORTIE_CURVE_MAX);
    let mut points = Vec::with_capacity(steps + SORTIE_TAIL_STEPS);

    for i in 0..steps {
        let t = i as f32 / steps as f32;
        let x = start.x + (player_x - start.x) * t;
        let y = start.y - SORTIE_DIP * (t * std::f32::consts::PI).sin();
        points.push(Vec2::new(x, y));
    }

    let mut tail = points.last().copied().unwrap_or(start);
    for _ in 0..SORTIE_TAIL_STEPS {
        tail.y -= SORTIE_TAIL_STEP;
        points.push(tail);
    }

    AttackPath(points)
}

/// A two-phase dive: swing out to a playfield edge with a slight rise, then
/// interpolate toward the player's x-coordinate down to below the playfield,
/// so the path drives the enemy fully off-screen before it is exhausted.
pub fn dive_path<R: Rng + ?Sized>(start: Vec2, player_x: f32, rng: &mut R) -> AttackPath {
    let edge_x = if rng.random_bool(0.5) {
        playfield::LEFT + DIVE_EDGE_INSET
    } else {
        playfield::RIGHT - DIVE_EDGE_INSET
    };

    let mut points = Vec::with_capacity(DIVE_SWING_STEPS + DIVE_DROP_STEPS + 1);

    for i in 0..DIVE_SWING_STEPS {
        let t = i as f32 / DIVE_SWING_STEPS as f32;
        let x = start.x + (edge_x - start.x) * t;
        let y = start.y + DIVE_SWING_RISE * (t * std::f32::consts::PI).sin();
        points.push(Vec2::new(x, y));
    }

    // The drop includes both endpoints: it starts exactly at the edge and
    // bottoms out exactly at the overshoot line.
    let swing_end_y = points.last().map_or(start.y, |p| p.y);
    let end_y = playfield::BOTTOM - playfield::OFFSCREEN_MARGIN;
    for i in 0..=DIVE_DROP_STEPS {
        let t = i as f32 / DIVE_DROP_STEPS as f32;
        let x = edge_x + (player_x - edge_x) * t;
        let y = swing_end_y + (end_y - swing_end_y) * t;
        points.push(Vec2::new(x, y));
    }

    AttackPath(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn dive_path_ends_below_the_playfield() {
        let mut rng = StdRng::seed_from_u64(7);
        let path = dive_path(Vec2::new(-100.0, 200.0), 50.0, &mut rng);
        assert!(!path.is_empty());
        let last = path.last().expect("non-empty path has a last waypoint");
        assert!(
            last.y < playfield::BOTTOM,
            "final waypoint {last:?} should be below the playfield"
        );
    }

    #[test]
    fn dive_path_visits_an_edge() {
        let mut rng = StdRng::seed_from_u64(3);
        let path = dive_path(Vec2::new(0.0, 200.0), 0.0, &mut rng);
        let near_edge = (0..path.len())
            .filter_map(|i| path.waypoint(i))
            .any(|p| p.x.abs() >= playfield::RIGHT - DIVE_EDGE_INSET - 1.0);
        assert!(near_edge, "dive should swing out to a playfield edge");
    }

    #[test]
    fn sortie_path_length_is_in_range() {
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let path = sortie_path(Vec2::new(-270.0, 250.0), 0.0, &mut rng);
            assert!(path.len() >= SORTIE_CURVE_MIN + SORTIE_TAIL_STEPS);
            assert!(path.len() <= SORTIE_CURVE_MAX + SORTIE_TAIL_STEPS);
        }
    }

    #[test]
    fn sortie_path_descends_at_the_tail() {
        let mut rng = StdRng::seed_from_u64(11);
        let start = Vec2::new(100.0, 250.0);
        let path = sortie_path(start, -50.0, &mut rng);
        let last = path.last().expect("non-empty");
        let tail_drop = SORTIE_TAIL_STEPS as f32 * SORTIE_TAIL_STEP;
        assert!(last.y < start.y - tail_drop);
    }

    #[test]
    fn same_seed_same_path() {
        let a = sortie_path(Vec2::ZERO, 120.0, &mut StdRng::seed_from_u64(42));
        let b = sortie_path(Vec2::ZERO, 120.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }
}
