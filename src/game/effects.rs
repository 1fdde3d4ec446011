//! Transient visual effects: explosions, tractor beams, screen shake.
//!
//! Effects age on the fixed tick and remove themselves when their lifetime
//! runs out. Screen shake is consumed by the camera in `Update` as a random
//! pixel offset, applied only while its frame counter is positive.

use bevy::prelude::*;
use rand::Rng;

use crate::screens::Screen;

use super::SimStep;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ScreenShake>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_screen_shake);

    app.add_systems(
        FixedUpdate,
        (update_explosions, update_tractor_beams).in_set(SimStep::Effects),
    );

    app.add_systems(Update, apply_screen_shake);
}

/// A growing, fading blast. Exists for exactly `duration` ticks.
///
/// `elapsed` never exceeds `duration`; the entity despawns the tick the
/// counter gets there.
#[derive(Component, Debug, Clone)]
pub struct Explosion {
    elapsed: u32,
    duration: u32,
    pub max_radius: f32,
}

impl Explosion {
    pub fn new(max_radius: f32, duration: u32) -> Self {
        Self {
            elapsed: 0,
            duration: duration.max(1),
            max_radius,
        }
    }

    /// Fraction of the lifetime spent, in [0, 1].
    pub fn progress(&self) -> f32 {
        self.elapsed as f32 / self.duration as f32
    }

    pub fn alive(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Age by one tick.
    pub fn advance(&mut self) {
        self.elapsed = (self.elapsed + 1).min(self.duration);
    }
}

/// The flickering beam a boss locks onto the player.
#[derive(Component, Debug, Clone)]
pub struct TractorBeam {
    elapsed: u32,
    duration: u32,
}

/// Remaining shake frames and magnitude.
#[derive(Resource, Debug, Default)]
pub struct ScreenShake {
    pub frames: u32,
    pub magnitude: f32,
}

impl ScreenShake {
    /// Keep the stronger of the current and the requested shake.
    pub fn trigger(&mut self, frames: u32, magnitude: f32) {
        self.frames = self.frames.max(frames);
        self.magnitude = self.magnitude.max(magnitude);
    }
}

const BEAM_DURATION: u32 = 60;
const BEAM_WIDTH: f32 = 20.0;
const BEAM_COLOR: Color = Color::srgb(0.0, 1.0, 1.0);

/// Spawn an explosion effect centered on `center`.
pub fn spawn_explosion(
    commands: &mut Commands,
    center: Vec2,
    max_radius: f32,
    duration: u32,
    color: Color,
) {
    commands.spawn((
        Name::new("Explosion"),
        Explosion::new(max_radius, duration),
        Sprite {
            color,
            custom_size: Some(Vec2::splat(max_radius * 2.0)),
            ..default()
        },
        Transform::from_translation(center.extend(3.0)).with_scale(Vec3::ZERO),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Spawn a tractor beam stretched from `from` down to `to`.
pub fn spawn_tractor_beam(commands: &mut Commands, from: Vec2, to: Vec2) {
    let height = (from.y - to.y).abs().max(1.0);
    let midpoint = (from + to) / 2.0;
    commands.spawn((
        Name::new("Tractor Beam"),
        TractorBeam {
            elapsed: 0,
            duration: BEAM_DURATION,
        },
        Sprite {
            color: BEAM_COLOR,
            custom_size: Some(Vec2::new(BEAM_WIDTH, height)),
            ..default()
        },
        Transform::from_translation(midpoint.extend(2.5)),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Radius grows linearly, opacity fades linearly, then the effect removes
/// itself.
fn update_explosions(
    mut commands: Commands,
    mut explosions: Query<(Entity, &mut Explosion, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut explosion, mut transform, mut sprite) in &mut explosions {
        if !explosion.alive() {
            commands.entity(entity).despawn();
            continue;
        }
        let progress = explosion.progress();
        transform.scale = Vec3::splat(progress);
        sprite.color = sprite.color.with_alpha(1.0 - progress);
        explosion.advance();
    }
}

/// Beams flicker on a short cycle and expire like any other effect.
fn update_tractor_beams(
    mut commands: Commands,
    mut beams: Query<(Entity, &mut TractorBeam, &mut Sprite)>,
) {
    for (entity, mut beam, mut sprite) in &mut beams {
        if beam.elapsed >= beam.duration {
            commands.entity(entity).despawn();
            continue;
        }
        let flicker = 1.0 - (beam.elapsed % 10) as f32 / 10.0;
        sprite.color = sprite.color.with_alpha(0.8 * flicker);
        beam.elapsed += 1;
    }
}

fn reset_screen_shake(mut shake: ResMut<ScreenShake>) {
    *shake = ScreenShake::default();
}

/// Jolt the camera while shake frames remain; hold it centered otherwise.
fn apply_screen_shake(
    mut shake: ResMut<ScreenShake>,
    mut camera: Query<&mut Transform, With<Camera2d>>,
) {
    let Ok(mut transform) = camera.single_mut() else {
        return;
    };
    if shake.frames > 0 {
        let mut rng = rand::rng();
        transform.translation.x = rng.random_range(-shake.magnitude..=shake.magnitude);
        transform.translation.y = rng.random_range(-shake.magnitude..=shake.magnitude);
        shake.frames -= 1;
        if shake.frames == 0 {
            shake.magnitude = 0.0;
        }
    } else if transform.translation.x != 0.0 || transform.translation.y != 0.0 {
        transform.translation.x = 0.0;
        transform.translation.y = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effect_lives_for_exactly_its_duration() {
        let mut explosion = Explosion::new(30.0, 20);
        for tick in 0..20 {
            assert!(explosion.alive(), "expected to be alive at tick {tick}");
            explosion.advance();
        }
        // Gone at tick 20.
        assert!(!explosion.alive());
    }

    #[test]
    fn progress_grows_linearly_and_saturates() {
        let mut explosion = Explosion::new(10.0, 4);
        let mut last = -1.0;
        while explosion.alive() {
            let progress = explosion.progress();
            assert!(progress > last);
            assert!((0.0..1.0).contains(&progress));
            last = progress;
            explosion.advance();
        }
        assert_eq!(explosion.progress(), 1.0);
        explosion.advance();
        assert_eq!(explosion.progress(), 1.0);
    }

    #[test]
    fn shake_keeps_the_stronger_request() {
        let mut shake = ScreenShake::default();
        shake.trigger(5, 3.0);
        shake.trigger(10, 5.0);
        assert_eq!(shake.frames, 10);
        assert_eq!(shake.magnitude, 5.0);
        shake.trigger(2, 1.0);
        assert_eq!(shake.frames, 10);
        assert_eq!(shake.magnitude, 5.0);
    }
}
