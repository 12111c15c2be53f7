//! Floor generation constants

/// Floor dimensions in tiles
pub const FLOOR_WIDTH: usize = 56;
pub const FLOOR_HEIGHT: usize = 32;

/// Default cap on generation attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Upper bound accepted for any per-floor density parameter
pub const MAX_DENSITY: u32 = 64;

/// Spread applied to item and buried-item counts (density ± spread)
pub const SPAWN_COUNT_SPREAD: i32 = 2;
