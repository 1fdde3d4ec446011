use bevy::prelude::*;

/// Off-white text for the dark background
pub const LABEL_TEXT: Color = Color::srgb(0.925, 0.925, 0.925);

/// Starfield yellow for headers
pub const HEADER_TEXT: Color = Color::srgb(0.953, 0.875, 0.365);

/// Off-white text for buttons
pub const BUTTON_TEXT: Color = Color::srgb(0.925, 0.925, 0.925);
/// #2b3c8f
pub const BUTTON_BACKGROUND: Color = Color::srgb(0.169, 0.235, 0.561);
/// #3e56bd
pub const BUTTON_HOVERED_BACKGROUND: Color = Color::srgb(0.243, 0.337, 0.741);
/// #1d2a66
pub const BUTTON_PRESSED_BACKGROUND: Color = Color::srgb(0.114, 0.165, 0.400);

/// Near-black space backdrop
pub const SCREEN_BACKGROUND: Color = Color::srgb(0.019, 0.019, 0.039);
