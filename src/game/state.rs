//! Game state management - score, lives, win/lose conditions.
//!
//! Lose: the last life is gone (the transition fires the same tick).
//! Win: the final stage's wave is wiped out (handled in `stage`).

use bevy::prelude::*;

use crate::audio::sound_effect;
use crate::{menus::Menu, screens::Screen};

use super::SimStep;
use super::assets::GameAssets;
use super::collision::{EnemyDestroyed, PlayerStruck};
use super::effects::{ScreenShake, spawn_explosion};
use super::highscore::{HighScores, ScoreEntry};
use super::player::{HIT_INVULNERABILITY, PlayerShip};
use super::stage::Stage;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<GameScore>();
    app.register_type::<GameScore>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_score);

    app.add_systems(
        FixedUpdate,
        (resolve_destroyed_enemies, resolve_player_hits)
            .chain()
            .in_set(SimStep::Resolve)
            .before(super::stage::check_stage_clear),
    );

    app.add_systems(OnEnter(Menu::GameOver), save_run_score);
    app.add_systems(OnEnter(Menu::Victory), save_run_score);
}

/// Explosion shape for a downed enemy: radius, ticks.
const ENEMY_EXPLOSION: (f32, u32) = (30.0, 20);
/// Explosion shape for a player hit.
const PLAYER_EXPLOSION: (f32, u32) = (40.0, 30);
const PLAYER_EXPLOSION_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Score and run statistics for the current game.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct GameScore {
    pub score: u32,
    pub enemies_destroyed: u32,
}

fn reset_score(mut score: ResMut<GameScore>) {
    *score = GameScore::default();
    info!("score reset");
}

/// Bank the score, blow up the wreck, rattle the screen.
fn resolve_destroyed_enemies(
    mut commands: Commands,
    mut destroyed: MessageReader<EnemyDestroyed>,
    mut score: ResMut<GameScore>,
    mut shake: ResMut<ScreenShake>,
    assets: Res<GameAssets>,
) {
    for message in destroyed.read() {
        score.score += message.kind.score();
        score.enemies_destroyed += 1;
        spawn_explosion(
            &mut commands,
            message.position,
            ENEMY_EXPLOSION.0,
            ENEMY_EXPLOSION.1,
            message.kind.explosion_color(),
        );
        shake.trigger(5, 3.0);
        if let Some(sound) = &assets.explosion_sound {
            commands.spawn(sound_effect(sound.clone()));
        }
        debug!(
            "{:?} destroyed, +{} (total {})",
            message.kind,
            message.kind.score(),
            score.score
        );
    }
}

/// Apply at most one hit per tick: lose a life, start the grace period, and
/// end the run when the last life is gone - on this same tick.
fn resolve_player_hits(
    mut commands: Commands,
    mut struck: MessageReader<PlayerStruck>,
    mut player: Query<&mut PlayerShip>,
    mut shake: ResMut<ScreenShake>,
    mut next_menu: ResMut<NextState<Menu>>,
    score: Res<GameScore>,
) {
    let Some(message) = struck.read().next().cloned() else {
        return;
    };
    // One hit per tick; drop any duplicates from this tick.
    struck.clear();
    let Ok(mut ship) = player.single_mut() else {
        return;
    };

    ship.lives = ship.lives.saturating_sub(1);
    shake.trigger(10, 5.0);
    spawn_explosion(
        &mut commands,
        message.position,
        PLAYER_EXPLOSION.0,
        PLAYER_EXPLOSION.1,
        PLAYER_EXPLOSION_COLOR,
    );

    if ship.lives == 0 {
        info!("game over, final score {}", score.score);
        next_menu.set(Menu::GameOver);
    } else {
        ship.invulnerable = HIT_INVULNERABILITY;
        info!("ship hit, {} lives left", ship.lives);
    }
}

/// Record the finished run on the leaderboard, win or lose.
fn save_run_score(
    score: Res<GameScore>,
    stage: Res<Stage>,
    mut high_scores: ResMut<HighScores>,
) {
    let entry = ScoreEntry::new(score.score, stage.number, score.enemies_destroyed);
    if high_scores.add_score(entry) {
        info!("new high score: {}", score.score);
        high_scores.save();
    }
}
