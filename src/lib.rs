//! Quiz Runner - side-scrolling arcade runner with knowledge-check level gates
//!
//! Core modules:
//! - `sim`: Frame-rate independent simulation (physics, spawning, collisions, scoring)
//! - `quiz`: Knowledge-check question bank
//! - `runner`: Host loop that owns the session and the frame clock
//! - `ledger`: Start gate and reward sink boundaries
//! - `platform`: Browser/native platform abstraction

pub mod highscores;
pub mod ledger;
pub mod platform;
pub mod quiz;
pub mod runner;
pub mod settings;
pub mod sim;

pub use highscores::HighScores;
pub use ledger::{EntryFee, InMemoryLedger, LedgerError, PointsLedger, RewardError, RewardSink};
pub use runner::Runner;
pub use settings::{Settings, SpeedMode};

/// Game configuration constants
pub mod consts {
    /// Target simulation rate the delta multiplier is normalized against
    pub const TARGET_FPS: f64 = 60.0;
    /// Target frame interval in milliseconds
    pub const TARGET_FRAME_MS: f64 = 1000.0 / TARGET_FPS;
    /// Longest wall-clock gap a single tick may cover (multiplier cap of 6).
    ///
    /// Below 10 fps the simulation runs slower than wall-clock time: exact
    /// speed is given up so a stalled host cannot move entities through the
    /// player in one step.
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Play field dimensions (screen space, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Top edge of the ground strip
    pub const GROUND_LINE: f32 = 340.0;
    /// Entities left of this x are pruned
    pub const PRUNE_X: f32 = -150.0;

    /// Player sprite box
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    /// Resting y of the player's top edge
    pub const GROUND_Y: f32 = GROUND_LINE - PLAYER_HEIGHT;
    /// Ducking hitbox (wider, half height, pinned to the ground)
    pub const DUCK_WIDTH: f32 = 50.0;
    pub const DUCK_HEIGHT: f32 = 30.0;

    /// Physics, per normalized frame
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_IMPULSE: f32 = -12.0;
    pub const DOUBLE_JUMP_IMPULSE: f32 = -10.0;
    pub const SLAM_IMPULSE: f32 = 15.0;
    pub const MAX_JUMPS: u8 = 2;

    /// Scroll speed (px per normalized frame)
    pub const MAX_SCROLL_SPEED: f32 = 14.0;
    pub const SCROLL_SPEED_STEP: f32 = 0.75;

    /// Scoring
    pub const COIN_BONUS: u64 = 50;
    pub const LEVEL_UP_SCORE_STEP: u64 = 1000;
    pub const XP_DIVISOR: u64 = 10;

    /// Timers (ms)
    pub const START_INVULNERABILITY_MS: f64 = 5000.0;
    pub const CORRECT_ANSWER_INVULNERABILITY_MS: f64 = 4000.0;
    pub const WRONG_ANSWER_INVULNERABILITY_MS: f64 = 2000.0;
    pub const SHIELD_HIT_INVULNERABILITY_MS: f64 = 2000.0;
    pub const LEVEL_UP_ANNOUNCE_DELAY_MS: f64 = 500.0;

    /// Collectible sizes
    pub const COIN_SIZE: f32 = 24.0;
    pub const POWER_UP_SIZE: f32 = 32.0;
}
