//! Runner simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Motion scaled by the frame delta multiplier only
//! - One seedable RNG owned by the session
//! - Stable iteration order (entities kept in spawn order)

pub mod clock;
pub mod collision;
pub mod motion;
pub mod physics;
pub mod schedule;
pub mod scoring;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::{Frame, FrameClock};
pub use collision::{Aabb, player_hitbox};
pub use schedule::{Schedule, ScheduledKind};
pub use spawn::{Oscillation, Species};
pub use state::{
    Coin, GameEvent, Obstacle, ObstacleKind, PauseReason, PlayerState, PowerUp, PowerUpKind,
    RunSummary, Session, SessionPhase, Snapshot, StartError,
};
pub use tick::{TickInput, tick};
