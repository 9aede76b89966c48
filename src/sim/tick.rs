//! Per-frame simulation tick
//!
//! Core game loop step: timers, then Physics -> Motion -> Spawner ->
//! Collision -> Scoring.

use super::clock::Frame;
use super::schedule::ScheduledKind;
use super::state::{GameEvent, Session, SessionPhase};
use super::{collision, motion, physics, scoring, spawn};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump / double jump (edge triggered)
    pub jump: bool,
    /// Duck pose (held)
    pub duck: bool,
    /// Fast-fall (edge triggered)
    pub slam: bool,
}

/// Advance the session by one frame and return the signals it produced
pub fn tick(session: &mut Session, input: &TickInput, frame: Frame) -> Vec<GameEvent> {
    let mut events = Vec::new();

    // Only a playing session ticks; zero-length frames change nothing
    if session.phase != SessionPhase::Playing || frame.is_idle() {
        return events;
    }

    for kind in session.schedule.drain_due(frame.now_ms) {
        match kind {
            ScheduledKind::PresentKnowledgeCheck => {
                events.push(session.present_knowledge_check());
            }
        }
    }
    if session.phase != SessionPhase::Playing {
        // Anything else that was queued stays cancelled while paused
        session.schedule.cancel_all();
        return events;
    }

    physics::step(&mut session.player, input, frame, &mut events);
    motion::advance(session, frame);
    spawn::step(session, frame);
    collision::resolve(session, frame, &mut events);

    if session.phase == SessionPhase::Playing {
        scoring::accrue(session, frame, &mut events);
    }

    events
}
