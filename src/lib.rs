//! Deep Dive - a side-scrolling focus game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (clock, physics, obstacles, collisions)
//! - `session`: Idle/Playing/Ended controller that owns the frame loop
//! - `highscores`: Best-score persistence
//! - `reporting`: Fire-and-forget leaderboard submission
//! - `feedback`: Sound/haptic/flash cues derived from game events
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod feedback;
pub mod highscores;
pub mod reporting;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{BestScore, MemoryStore, ScoreStore, StorageError};
pub use reporting::{LogReporter, ReportError, ScoreReporter, ScoreSubmission};
pub use session::{FrameScheduler, ManualScheduler, Session, SessionConfig};
pub use settings::Settings;

/// Game configuration constants
///
/// The play field is measured in percent: x and y both run 0..100.
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const FIXED_STEP_MS: f64 = 16.667;
    /// Longest frame the clock will accept before clamping
    pub const MAX_FRAME_MS: f64 = 250.0;

    /// Player position scale applied to velocity each tick
    pub const PLAYER_INTEGRATION_SCALE: f32 = 0.55;
    /// Obstacle position scale applied to speed each tick
    pub const OBSTACLE_INTEGRATION_SCALE: f32 = 0.5;
    /// Damping applied while rising for a floaty ascent
    pub const RISE_DAMPING: f32 = 0.94;
    /// Rotation easing factor per tick
    pub const ROTATION_EASING: f32 = 0.15;

    /// Player geometry (fixed horizontal position)
    pub const PLAYER_X: f32 = 20.0;
    pub const PLAYER_SIZE: f32 = 14.0;
    pub const PLAYER_HALF_SIZE: f32 = PLAYER_SIZE / 2.0;
    pub const PLAYER_START_Y: f32 = 50.0;

    /// Field edges the player must stay within
    pub const FIELD_TOP: f32 = 2.0;
    pub const FIELD_BOTTOM: f32 = 98.0;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 14.0;
    pub const OBSTACLE_SPAWN_X: f32 = 105.0;
    /// Extra distance past the left edge before an obstacle is dropped
    pub const OBSTACLE_RETIRE_MARGIN: f32 = 5.0;
    /// Gap centers never leave this band
    pub const GAP_CENTER_MIN: f32 = 22.0;
    pub const GAP_CENTER_MAX: f32 = 78.0;

    /// Grace period before the first obstacle appears
    pub const FIRST_SPAWN_DELAY_MS: f64 = 1500.0;
    /// Distance from a gap edge that counts as a close call
    pub const NEAR_MISS_THRESHOLD: f32 = 3.0;
}

/// Current wall-clock time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

/// Current wall-clock time in milliseconds
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
