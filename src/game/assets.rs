//! Optional sprite and audio assets with procedural placeholders.
//!
//! Every handle is optional: when the file is absent from the assets
//! directory the game logs a warning once and falls back to plain colored
//! sprites (or silence, for audio). The game is fully playable asset-free.

use std::path::Path;

use bevy::prelude::*;

use super::bullet::Owner;
use super::enemy::EnemyKind;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, load_game_assets);
}

/// Sprite dimensions, shared with the hitboxes in the spawning modules.
pub const PLAYER_SIZE: Vec2 = Vec2::new(50.0, 50.0);
pub const ENEMY_SIZE: Vec2 = Vec2::new(40.0, 40.0);
pub const BULLET_SIZE: Vec2 = Vec2::new(8.0, 16.0);

const PLAYER_COLOR: Color = Color::srgb(0.9, 0.2, 0.2);
const PLAYER_BULLET_COLOR: Color = Color::srgb(1.0, 1.0, 1.0);
const ENEMY_BULLET_COLOR: Color = Color::srgb(1.0, 1.0, 0.2);

/// Holds the optional asset handles for everything the game renders or plays.
#[derive(Resource)]
pub struct GameAssets {
    player_image: Option<Handle<Image>>,
    enemy_image: Option<Handle<Image>>,
    bullet_image: Option<Handle<Image>>,
    pub fire_sound: Option<Handle<AudioSource>>,
    pub explosion_sound: Option<Handle<AudioSource>>,
    pub music: Option<Handle<AudioSource>>,
}

impl GameAssets {
    pub fn player_sprite(&self) -> Sprite {
        match &self.player_image {
            Some(image) => sized_image(image.clone(), PLAYER_SIZE),
            None => Sprite {
                color: PLAYER_COLOR,
                custom_size: Some(PLAYER_SIZE),
                ..default()
            },
        }
    }

    pub fn enemy_sprite(&self, kind: EnemyKind) -> Sprite {
        match &self.enemy_image {
            Some(image) => sized_image(image.clone(), ENEMY_SIZE),
            None => Sprite {
                color: kind.color(),
                custom_size: Some(ENEMY_SIZE),
                ..default()
            },
        }
    }

    pub fn bullet_sprite(&self, owner: Owner) -> Sprite {
        match &self.bullet_image {
            Some(image) => sized_image(image.clone(), BULLET_SIZE),
            None => Sprite {
                color: match owner {
                    Owner::Player => PLAYER_BULLET_COLOR,
                    Owner::Enemy => ENEMY_BULLET_COLOR,
                },
                custom_size: Some(BULLET_SIZE),
                ..default()
            },
        }
    }
}

fn sized_image(image: Handle<Image>, size: Vec2) -> Sprite {
    Sprite {
        image,
        custom_size: Some(size),
        ..default()
    }
}

fn load_game_assets(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(GameAssets {
        player_image: load_optional(&asset_server, "images/player.png"),
        enemy_image: load_optional(&asset_server, "images/enemy.png"),
        bullet_image: load_optional(&asset_server, "images/bullet.png"),
        fire_sound: load_optional(&asset_server, "audio/sound_effects/fire.ogg"),
        explosion_sound: load_optional(&asset_server, "audio/sound_effects/explosion.ogg"),
        music: load_optional(&asset_server, "audio/music/starswarm.ogg"),
    });
}

/// Load an asset only if the file is present on disk; otherwise warn and
/// return `None` so callers substitute a placeholder.
fn load_optional<A: Asset>(asset_server: &AssetServer, path: &str) -> Option<Handle<A>> {
    if Path::new("assets").join(path).exists() {
        Some(asset_server.load(path.to_string()))
    } else {
        warn!("asset {path:?} not found, using a placeholder");
        None
    }
}
