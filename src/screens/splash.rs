//! A splash screen that plays briefly at startup.

use bevy::{input::common_conditions::input_just_pressed, prelude::*};

use crate::{screens::Screen, theme::palette::HEADER_TEXT};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Splash), spawn_splash_screen);

    app.add_systems(
        Update,
        (
            tick_splash_timer.run_if(in_state(Screen::Splash)),
            continue_to_title_screen
                .run_if(in_state(Screen::Splash).and(splash_timer_finished)),
            // Skip the splash screen on any confirm input.
            skip_splash_screen.run_if(
                in_state(Screen::Splash).and(
                    input_just_pressed(KeyCode::Enter)
                        .or(input_just_pressed(KeyCode::Space))
                        .or(input_just_pressed(KeyCode::Escape)),
                ),
            ),
        ),
    );
}

const SPLASH_DURATION_SECS: f32 = 1.8;

#[derive(Component, Debug)]
struct SplashTimer(Timer);

fn spawn_splash_screen(mut commands: Commands) {
    commands.spawn((
        Name::new("Splash Screen"),
        Node {
            position_type: PositionType::Absolute,
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            align_items: AlignItems::Center,
            justify_content: JustifyContent::Center,
            ..default()
        },
        DespawnOnExit(Screen::Splash),
        SplashTimer(Timer::from_seconds(SPLASH_DURATION_SECS, TimerMode::Once)),
        children![(
            Name::new("Splash Text"),
            Text("STARSWARM".to_string()),
            TextFont::from_font_size(72.0),
            TextColor(HEADER_TEXT),
        )],
    ));
}

fn tick_splash_timer(time: Res<Time>, mut query: Query<&mut SplashTimer>) {
    for mut timer in &mut query {
        timer.0.tick(time.delta());
    }
}

fn splash_timer_finished(query: Query<&SplashTimer>) -> bool {
    query.iter().any(|timer| timer.0.is_finished())
}

fn continue_to_title_screen(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}

fn skip_splash_screen(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
