//! Score accrual and level-up detection
//!
//! Score ticks up on whole normalized frames, throttled by level: one point
//! every `level` frames. Every mutation is checked against the thousand-point
//! thresholds.

use super::clock::Frame;
use super::schedule::ScheduledKind;
use super::state::{GameEvent, Session};
use crate::consts::{LEVEL_UP_ANNOUNCE_DELAY_MS, LEVEL_UP_SCORE_STEP};

/// True when `score` sits in a higher thousand band than `checkpoint`
#[inline]
pub fn crosses_level_threshold(score: u64, checkpoint: u64) -> bool {
    score / LEVEL_UP_SCORE_STEP > checkpoint / LEVEL_UP_SCORE_STEP
}

/// Add points and fire a level-up trigger on a threshold crossing
pub fn add_score(session: &mut Session, points: u64, now_ms: f64, events: &mut Vec<GameEvent>) {
    session.score += points;
    if crosses_level_threshold(session.score, session.last_level_up_score) {
        session.last_level_up_score = session.score;
        session.schedule.push(
            now_ms + LEVEL_UP_ANNOUNCE_DELAY_MS,
            ScheduledKind::PresentKnowledgeCheck,
        );
        log::info!("Level-up threshold crossed at {}", session.score);
        events.push(GameEvent::LevelUpTriggered {
            score: session.score,
        });
    }
}

/// Count elapsed frames and accrue the throttled score.
///
/// Nothing accrues (and no partial frame carries over) while invulnerable.
pub fn accrue(session: &mut Session, frame: Frame, events: &mut Vec<GameEvent>) {
    if session.is_invulnerable(frame.now_ms) {
        session.frame_carry = 0.0;
        return;
    }

    session.frame_carry += frame.multiplier;
    while session.frame_carry >= 1.0 {
        session.frame_carry -= 1.0;
        session.frame_counter += 1;
        if session.frame_counter % session.level.max(1) as u64 == 0 {
            add_score(session, 1, frame.now_ms, events);
        }
    }
}
