//! The in-game HUD: score, lives, and stage readouts along the top edge.

use bevy::{prelude::*, ui::Val::*};

use crate::{screens::Screen, theme::palette::LABEL_TEXT};

use super::player::PlayerShip;
use super::stage::Stage;
use super::state::GameScore;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud);
    app.add_systems(
        Update,
        (update_score_text, update_lives_text, update_stage_text)
            .run_if(in_state(Screen::Gameplay)),
    );
}

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct LivesText;

#[derive(Component)]
struct StageText;

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("HUD"),
        Node {
            position_type: PositionType::Absolute,
            width: Percent(100.0),
            padding: UiRect::all(Px(10.0)),
            justify_content: JustifyContent::SpaceBetween,
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![
            hud_text("LIVES 3", LivesText),
            hud_text("STAGE 1", StageText),
            hud_text("SCORE 0", ScoreText),
        ],
    ));
}

fn hud_text(initial: &str, marker: impl Component) -> impl Bundle {
    (
        Name::new("HUD Text"),
        Text(initial.to_string()),
        TextFont::from_font_size(24.0),
        TextColor(LABEL_TEXT),
        marker,
    )
}

fn update_score_text(score: Res<GameScore>, mut text: Query<&mut Text, With<ScoreText>>) {
    if !score.is_changed() {
        return;
    }
    let Ok(mut text) = text.single_mut() else {
        return;
    };
    text.0 = format!("SCORE {}", score.score);
}

fn update_lives_text(
    player: Query<&PlayerShip, Changed<PlayerShip>>,
    mut text: Query<&mut Text, With<LivesText>>,
) {
    let Ok(ship) = player.single() else {
        return;
    };
    let Ok(mut text) = text.single_mut() else {
        return;
    };
    text.0 = format!("LIVES {}", ship.lives);
}

fn update_stage_text(stage: Res<Stage>, mut text: Query<&mut Text, With<StageText>>) {
    if !stage.is_changed() {
        return;
    }
    let Ok(mut text) = text.single_mut() else {
        return;
    };
    text.0 = format!("STAGE {}", stage.number);
}
