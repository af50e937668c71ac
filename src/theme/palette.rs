use bevy::prelude::*;

/// Light board background
pub const BACKGROUND: Color = Color::srgb(0.95, 0.95, 0.95);

/// Black score text
pub const SCORE_TEXT: Color = Color::srgb(0.0, 0.0, 0.0);

/// Red game over banner
pub const LOST_TEXT: Color = Color::srgb(1.0, 0.0, 0.0);
/// Green win banner
pub const WON_TEXT: Color = Color::srgb(0.0, 0.8, 0.0);

/// #333333
pub const SHOOTER_BARREL: Color = Color::srgb(0.2, 0.2, 0.2);
/// Aim preview dot and line
pub const AIM_PREVIEW: Color = Color::srgba(1.0, 0.0, 0.0, 0.7);
/// Outline drawn around every bubble
pub const BUBBLE_OUTLINE: Color = Color::srgba(0.0, 0.0, 0.0, 0.6);
