//! Stage progression: the intro banner, wave layout, and difficulty scaling.
//!
//! Each entry into gameplay starts at stage 1. A stage begins with a short
//! banner phase, then plays until the wave is wiped out; clearing the final
//! stage wins the run.

use bevy::prelude::*;

use crate::{PausableSystems, menus::Menu, screens::Screen, theme::palette};

use super::SimStep;
use super::assets::{ENEMY_SIZE, GameAssets};
use super::collision::HitBox;
use super::enemy::{Enemy, EnemyKind, EnemyState};

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Stage>();
    app.init_resource::<IntroTimer>();
    app.add_sub_state::<Phase>();
    app.register_type::<Stage>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_stage);
    app.add_systems(OnEnter(Phase::StageIntro), (start_stage_intro, spawn_wave));

    app.add_systems(
        FixedUpdate,
        tick_stage_intro
            .run_if(in_state(Phase::StageIntro))
            .in_set(PausableSystems),
    );

    app.add_systems(FixedUpdate, check_stage_clear.in_set(SimStep::Resolve));
}

/// Stages to clear for a win.
pub const FINAL_STAGE: u32 = 5;

/// Length of the stage banner, in ticks.
const INTRO_TICKS: u32 = 120;

const WAVE_ROWS: u32 = 5;
const WAVE_COLS: u32 = 10;
/// Horizontal pitch between formation columns.
const SLOT_SPACING_X: f32 = 60.0;
/// Vertical pitch between formation rows.
const SLOT_SPACING_Y: f32 = 40.0;
/// X of the leftmost column.
const FIRST_COL_X: f32 = -270.0;
/// Y of the top row on stage 1; later stages start lower.
const FIRST_ROW_Y: f32 = 250.0;
const ROW_DROP_PER_STAGE: f32 = 10.0;

/// The current stage number, starting at 1.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct Stage {
    pub number: u32,
}

impl Default for Stage {
    fn default() -> Self {
        Self { number: 1 }
    }
}

impl Stage {
    /// Formation sway speed, px per tick.
    pub fn sway_speed(&self) -> f32 {
        0.5 + self.number as f32 * 0.2
    }

    /// Multiplier applied to path-following speed.
    pub fn path_speed_factor(&self) -> f32 {
        1.0 + self.number as f32 * 0.1
    }

    fn top_row_y(&self) -> f32 {
        FIRST_ROW_Y - (self.number - 1) as f32 * ROW_DROP_PER_STAGE
    }
}

/// Sub-phases of the gameplay screen.
#[derive(SubStates, Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[source(Screen = Screen::Gameplay)]
pub enum Phase {
    #[default]
    StageIntro,
    Playing,
}

/// Remaining ticks of the stage banner.
#[derive(Resource, Debug, Default)]
pub struct IntroTimer(u32);

#[derive(Component)]
struct StageBanner;

/// Which enemy occupies a given formation cell. Later stages seed more
/// elites into the front rows.
pub fn kind_for_slot(stage: u32, row: u32, col: u32) -> EnemyKind {
    match row {
        0 if stage >= 3 && col % 2 == 0 => EnemyKind::Elite,
        0 if col % 4 == 0 => EnemyKind::Elite,
        1 if col % 5 == 0 => EnemyKind::Boss,
        1 if stage >= 2 && col % 3 == 0 => EnemyKind::Elite,
        _ => EnemyKind::Drone,
    }
}

fn reset_stage(mut stage: ResMut<Stage>) {
    *stage = Stage::default();
}

fn start_stage_intro(
    mut commands: Commands,
    stage: Res<Stage>,
    mut timer: ResMut<IntroTimer>,
) {
    timer.0 = INTRO_TICKS;
    info!("stage {} intro", stage.number);

    commands.spawn((
        Name::new("Stage Banner"),
        StageBanner,
        Text2d::new(format!("STAGE {}", stage.number)),
        TextFont::from_font_size(64.0),
        TextColor(palette::LABEL_TEXT),
        Transform::from_xyz(0.0, 40.0, 5.0),
        DespawnOnExit(Phase::StageIntro),
    ));
    commands.spawn((
        Name::new("Ready Banner"),
        StageBanner,
        Text2d::new("GET READY!"),
        TextFont::from_font_size(40.0),
        TextColor(palette::HEADER_TEXT),
        Transform::from_xyz(0.0, -40.0, 5.0),
        DespawnOnExit(Phase::StageIntro),
    ));
}

/// Place the stage's wave in formation. Slots are fixed per stage; the sway
/// offset moves the whole grid later.
fn spawn_wave(mut commands: Commands, stage: Res<Stage>, assets: Res<GameAssets>) {
    let top = stage.top_row_y();
    for row in 0..WAVE_ROWS {
        for col in 0..WAVE_COLS {
            let kind = kind_for_slot(stage.number, row, col);
            let slot = Vec2::new(
                FIRST_COL_X + col as f32 * SLOT_SPACING_X,
                top - row as f32 * SLOT_SPACING_Y,
            );
            commands.spawn((
                Name::new(format!("Enemy r{row} c{col}")),
                Enemy::new(kind, slot),
                EnemyState::Formation,
                HitBox(ENEMY_SIZE / 2.0),
                assets.enemy_sprite(kind),
                Transform::from_translation(slot.extend(1.0)),
                DespawnOnExit(Screen::Gameplay),
            ));
        }
    }
    info!(
        "stage {}: spawned {} enemies",
        stage.number,
        WAVE_ROWS * WAVE_COLS
    );
}

/// Fade the banner in and out, then hand over to the playing phase.
fn tick_stage_intro(
    mut timer: ResMut<IntroTimer>,
    mut next_phase: ResMut<NextState<Phase>>,
    mut banners: Query<&mut TextColor, With<StageBanner>>,
) {
    let elapsed = INTRO_TICKS.saturating_sub(timer.0);
    let alpha = match elapsed {
        0..30 => elapsed as f32 / 30.0,
        30..90 => 1.0,
        _ => (INTRO_TICKS - elapsed) as f32 / 30.0,
    };
    for mut color in &mut banners {
        color.0 = color.0.with_alpha(alpha);
    }

    timer.0 = timer.0.saturating_sub(1);
    if timer.0 == 0 {
        next_phase.set(Phase::Playing);
    }
}

/// An empty wave ends the stage: the next one starts, or the run is won.
pub(super) fn check_stage_clear(
    mut stage: ResMut<Stage>,
    enemies: Query<(), With<Enemy>>,
    mut next_phase: ResMut<NextState<Phase>>,
    mut next_menu: ResMut<NextState<Menu>>,
) {
    if !enemies.is_empty() {
        return;
    }
    if stage.number >= FINAL_STAGE {
        info!("final stage cleared");
        next_menu.set(Menu::Victory);
    } else {
        stage.number += 1;
        info!("stage cleared, advancing to stage {}", stage.number);
        next_phase.set(Phase::StageIntro);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bosses_sit_in_the_second_row() {
        assert_eq!(kind_for_slot(1, 1, 0), EnemyKind::Boss);
        assert_eq!(kind_for_slot(1, 1, 5), EnemyKind::Boss);
        assert_eq!(kind_for_slot(1, 1, 1), EnemyKind::Drone);
    }

    #[test]
    fn later_stages_grow_more_elites() {
        let elites = |stage: u32| {
            (0..WAVE_ROWS)
                .flat_map(|row| (0..WAVE_COLS).map(move |col| (row, col)))
                .filter(|&(row, col)| kind_for_slot(stage, row, col) == EnemyKind::Elite)
                .count()
        };
        assert!(elites(3) > elites(1));
    }

    #[test]
    fn difficulty_scales_with_the_stage_number() {
        let early = Stage { number: 1 };
        let late = Stage { number: 4 };
        assert!(late.sway_speed() > early.sway_speed());
        assert!(late.path_speed_factor() > early.path_speed_factor());
        assert!(late.top_row_y() < early.top_row_y());
    }
}
