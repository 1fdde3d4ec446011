//! Playfield geometry and axis-aligned bounding boxes.
//!
//! The playfield is 800x600 logical pixels with the origin at its center,
//! +y up. All gameplay positions live in this space; the camera never moves
//! apart from screen shake.

use bevy::prelude::*;

pub const HALF_WIDTH: f32 = 400.0;
pub const HALF_HEIGHT: f32 = 300.0;

pub const LEFT: f32 = -HALF_WIDTH;
pub const RIGHT: f32 = HALF_WIDTH;
pub const TOP: f32 = HALF_HEIGHT;
pub const BOTTOM: f32 = -HALF_HEIGHT;

/// How far past the bottom edge dive paths overshoot, and how far above the
/// top edge enemies respawn after falling off.
pub const OFFSCREEN_MARGIN: f32 = 50.0;

/// An axis-aligned box stored as center + half extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half: Vec2) -> Self {
        Self { center, half }
    }

    /// Overlap test. Touching edges count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        (self.center.x - other.center.x).abs() <= self.half.x + other.half.x
            && (self.center.y - other.center.y).abs() <= self.half.y + other.half.y
    }

    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }
}

/// True once an entity's top edge has fallen below the bottom of the
/// playfield.
pub fn fell_off_bottom(aabb: &Aabb) -> bool {
    aabb.top() < BOTTOM
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(15.0, 5.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn disjoint_boxes_do_not_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(25.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn touching_edges_overlap() {
        let a = Aabb::new(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(20.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
    }

    #[test]
    fn fell_off_bottom_needs_whole_box_below() {
        let straddling = Aabb::new(Vec2::new(0.0, BOTTOM), Vec2::splat(10.0));
        assert!(!fell_off_bottom(&straddling));
        let below = Aabb::new(Vec2::new(0.0, BOTTOM - 20.0), Vec2::splat(10.0));
        assert!(fell_off_bottom(&below));
    }
}
