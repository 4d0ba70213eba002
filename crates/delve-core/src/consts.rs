//! Structural map constants.
//!
//! Tunable generation parameters live in [`crate::config::GenConfig`]; the
//! values here are fixed by the map geometry itself.

/// Full dungeon dimensions.
pub const MAX_HEIGHT: i32 = 66;
pub const MAX_WIDTH: i32 = 198;

/// Visible viewport, also the size of the surface town.
pub const SCREEN_HEIGHT: i32 = 22;
pub const SCREEN_WIDTH: i32 = 66;

/// Quarter-viewport offsets used to center room anchors in coarse cells.
pub const QUART_HEIGHT: i32 = SCREEN_HEIGHT / 4;
pub const QUART_WIDTH: i32 = SCREEN_WIDTH / 4;

/// How far the player can see; also the teleport-line displacement.
pub const MAX_SIGHT: i32 = 20;

/// Ceiling on monster difficulty levels, used by resistance rolls.
pub const MAX_MONSTER_LEVEL: u32 = 40;

/// Number of shop fronts on the surface.
pub const STORE_COUNT: usize = 6;

/// Town stores are laid out on a 2-row by 3-column slot grid.
pub const STORE_ROWS: i32 = 2;
pub const STORE_COLS: i32 = 3;
