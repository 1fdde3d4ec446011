//! The scrolling star background, visible on every screen.

use bevy::prelude::*;
use rand::Rng;

use super::playfield;

pub(crate) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_starfield);
    app.add_systems(Update, scroll_stars);
}

const STAR_COUNT: usize = 150;
/// Fall speed range in px per second.
const STAR_SPEED_MIN: f32 = 60.0;
const STAR_SPEED_MAX: f32 = 180.0;

const STAR_COLORS: [Color; 3] = [
    Color::srgb(0.59, 0.59, 1.0),
    Color::srgb(1.0, 1.0, 0.78),
    Color::srgb(0.78, 0.78, 1.0),
];

#[derive(Component)]
struct Star {
    speed: f32,
}

fn spawn_starfield(mut commands: Commands) {
    let mut rng = rand::rng();
    for i in 0..STAR_COUNT {
        let size = rng.random_range(1..=3) as f32;
        commands.spawn((
            Name::new(format!("Star {i}")),
            Star {
                speed: rng.random_range(STAR_SPEED_MIN..STAR_SPEED_MAX),
            },
            Sprite {
                color: STAR_COLORS[rng.random_range(0..STAR_COLORS.len())],
                custom_size: Some(Vec2::splat(size)),
                ..default()
            },
            Transform::from_xyz(
                rng.random_range(playfield::LEFT..playfield::RIGHT),
                rng.random_range(playfield::BOTTOM..playfield::TOP),
                -10.0,
            ),
        ));
    }
}

/// Stars fall and wrap back to the top at a fresh x position.
fn scroll_stars(time: Res<Time>, mut stars: Query<(&Star, &mut Transform)>) {
    let mut rng = rand::rng();
    for (star, mut transform) in &mut stars {
        transform.translation.y -= star.speed * time.delta_secs();
        if transform.translation.y < playfield::BOTTOM {
            transform.translation.y = playfield::TOP;
            transform.translation.x = rng.random_range(playfield::LEFT..playfield::RIGHT);
        }
    }
}
