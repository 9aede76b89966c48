//! Session state and core simulation types
//!
//! One `Session` owns everything a play session touches. Each start
//! reinitializes it from scratch.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::collision::{Aabb, player_hitbox};
use super::schedule::{Schedule, ScheduledKind};
use super::spawn::{Oscillation, Species, Spawner};
use crate::consts::*;
use crate::ledger::{EntryFee, LedgerError, PointsLedger, RewardError, RewardSink};
use crate::quiz::{AnswerOutcome, KnowledgeCheck};
use crate::settings::SpeedMode;

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Idle, waiting for a funded start
    Ready,
    /// Simulation ticking
    Playing,
    /// Ticking halted
    Paused(PauseReason),
    /// Run ended, rewards computed
    GameOver,
}

/// Why the session is paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    /// Player asked for a break
    Manual,
    /// A knowledge check is on screen
    KnowledgeCheck,
}

/// The runner. Horizontal position is fixed at `PLAYER_X`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Top edge of the sprite (screen space, grows downward)
    pub y: f32,
    /// Vertical velocity (negative is up)
    pub vy: f32,
    /// Jumps used since last touching the ground
    pub jump_count: u8,
    pub jumping: bool,
    pub ducking: bool,
    /// Holding a shield that absorbs one hit
    pub powered_up: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            y: GROUND_Y,
            vy: 0.0,
            jump_count: 0,
            jumping: false,
            ducking: false,
            powered_up: false,
        }
    }
}

/// Obstacle variants. Flying variants carry their oscillation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Cactus,
    Boulder,
    Bat(Oscillation),
    Drone(Oscillation),
    Comet(Oscillation),
}

impl ObstacleKind {
    pub fn species(&self) -> Species {
        match self {
            ObstacleKind::Cactus => Species::Cactus,
            ObstacleKind::Boulder => Species::Boulder,
            ObstacleKind::Bat(_) => Species::Bat,
            ObstacleKind::Drone(_) => Species::Drone,
            ObstacleKind::Comet(_) => Species::Comet,
        }
    }

    pub fn oscillation(&self) -> Option<&Oscillation> {
        match self {
            ObstacleKind::Cactus | ObstacleKind::Boulder => None,
            ObstacleKind::Bat(osc) | ObstacleKind::Drone(osc) | ObstacleKind::Comet(osc) => {
                Some(osc)
            }
        }
    }
}

/// An obstacle entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// A coin worth `COIN_BONUS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl Coin {
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Power-up variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Grow: absorbs one lethal hit
    Grow,
}

/// A power-up entity (at most one per level)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

impl PowerUp {
    pub fn hitbox(&self) -> Aabb {
        Aabb::from_pos_size(self.pos, self.size)
    }
}

/// Final result of a run, handed to the reward sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Random id the sink deduplicates on
    pub run_id: u64,
    pub final_score: u64,
    pub final_level: u32,
    pub derived_xp: u64,
}

impl RunSummary {
    pub fn new(run_id: u64, final_score: u64, final_level: u32) -> Self {
        Self {
            run_id,
            final_score,
            final_level,
            derived_xp: final_score / XP_DIVISOR,
        }
    }
}

/// Signals produced by a tick or a transition, for audio/toasts/HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { run_id: u64 },
    Jumped,
    DoubleJumped,
    Slammed,
    CoinCollected { id: u32 },
    PowerUpCollected { id: u32 },
    /// Shield absorbed a hit
    PowerLost,
    LevelUpTriggered { score: u64 },
    KnowledgeCheckPresented { question: usize },
    GameOver(RunSummary),
}

/// Reasons a start action is refused. The session stays `Ready`.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("session cannot start from {0:?}")]
    NotReady(SessionPhase),
    #[error("entry fee not paid: {0}")]
    Funding(#[from] LedgerError),
}

/// Read-only view handed to the renderer after each tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub level: u32,
    pub scroll_speed: f32,
    pub player: PlayerState,
    pub player_hitbox: Aabb,
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    pub invulnerable_remaining_ms: f64,
    pub knowledge_check: Option<KnowledgeCheck>,
    /// A level-up was announced and its check is on the way
    pub check_pending: bool,
}

/// Complete runner session
#[derive(Debug, Clone)]
pub struct Session {
    pub phase: SessionPhase,
    pub speed_mode: SpeedMode,
    /// Monotonic while playing
    pub score: u64,
    /// Starts at 1, raised by correct knowledge checks
    pub level: u32,
    /// Pixels per normalized frame
    pub scroll_speed: f32,
    pub invulnerable_until_ms: f64,
    /// Score at the last level-up trigger
    pub last_level_up_score: u64,
    /// Whole normalized frames counted outside invulnerability
    pub frame_counter: u64,
    /// Fractional frame left over from the last tick
    pub(crate) frame_carry: f32,
    pub player: PlayerState,
    /// Live entities in spawn order
    pub obstacles: Vec<Obstacle>,
    pub coins: Vec<Coin>,
    pub power_ups: Vec<PowerUp>,
    /// The power-up for this level has already spawned
    pub power_up_spawned: bool,
    pub spawner: Spawner,
    pub schedule: Schedule,
    pub knowledge_check: Option<KnowledgeCheck>,
    pub run_id: u64,
    summary: Option<RunSummary>,
    rewards_submitted: bool,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl Session {
    /// Create an idle session with a fixed seed (tests, replays)
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Pcg32::seed_from_u64(seed))
    }

    /// Create an idle session seeded from OS entropy
    pub fn from_entropy() -> Self {
        Self::with_rng(Pcg32::from_rng(&mut rand::rng()))
    }

    fn with_rng(mut rng: Pcg32) -> Self {
        let spawner = Spawner::new(1, &mut rng);
        Self {
            phase: SessionPhase::Ready,
            speed_mode: SpeedMode::default(),
            score: 0,
            level: 1,
            scroll_speed: SpeedMode::default().base_speed(),
            invulnerable_until_ms: 0.0,
            last_level_up_score: 0,
            frame_counter: 0,
            frame_carry: 0.0,
            player: PlayerState::default(),
            obstacles: Vec::new(),
            coins: Vec::new(),
            power_ups: Vec::new(),
            power_up_spawned: false,
            spawner,
            schedule: Schedule::default(),
            knowledge_check: None,
            run_id: 0,
            summary: None,
            rewards_submitted: false,
            rng,
            next_id: 1,
        }
    }

    /// Current score (polled by challenge overlays)
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Current level (polled by challenge overlays)
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Summary computed at game over
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn rewards_submitted(&self) -> bool {
        self.rewards_submitted
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_invulnerable(&self, now_ms: f64) -> bool {
        now_ms < self.invulnerable_until_ms
    }

    pub fn invulnerable_remaining_ms(&self, now_ms: f64) -> f64 {
        (self.invulnerable_until_ms - now_ms).max(0.0)
    }

    /// Open an invulnerability window. Windows overwrite, never stack.
    pub fn grant_invulnerability(&mut self, now_ms: f64, duration_ms: f64) {
        self.invulnerable_until_ms = now_ms + duration_ms;
    }

    /// Wipe all per-run state back to level 1
    fn reinitialize(&mut self, mode: SpeedMode) {
        self.speed_mode = mode;
        self.score = 0;
        self.level = 1;
        self.scroll_speed = mode.base_speed();
        self.invulnerable_until_ms = 0.0;
        self.last_level_up_score = 0;
        self.frame_counter = 0;
        self.frame_carry = 0.0;
        self.player = PlayerState::default();
        self.obstacles.clear();
        self.coins.clear();
        self.power_ups.clear();
        self.power_up_spawned = false;
        self.spawner = Spawner::new(1, &mut self.rng);
        self.schedule.cancel_all();
        self.knowledge_check = None;
        self.summary = None;
        self.rewards_submitted = false;
        self.next_id = 1;
    }

    /// `Ready -> Playing`, after the ledger accepts the entry fee.
    ///
    /// Nothing is touched when the debit fails.
    pub fn start(
        &mut self,
        mode: SpeedMode,
        ledger: &mut impl PointsLedger,
        fee: EntryFee,
        now_ms: f64,
    ) -> Result<GameEvent, StartError> {
        if self.phase != SessionPhase::Ready {
            return Err(StartError::NotReady(self.phase));
        }
        ledger.debit(fee.cost())?;

        self.reinitialize(mode);
        self.run_id = self.rng.random();
        self.grant_invulnerability(now_ms, START_INVULNERABILITY_MS);
        self.phase = SessionPhase::Playing;
        log::info!(
            "Run {:016x} started ({} mode, {:?} fee)",
            self.run_id,
            mode.as_str(),
            fee
        );
        Ok(GameEvent::Started { run_id: self.run_id })
    }

    /// `Playing -> Paused(Manual)`. Returns false if not playing.
    ///
    /// Pending timers are cancelled; a knowledge check that was about to
    /// appear is shown right away instead of being dropped.
    pub fn pause(&mut self) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        let cancelled = self.schedule.cancel_all();
        if cancelled.contains(&ScheduledKind::PresentKnowledgeCheck) {
            self.present_knowledge_check();
        } else {
            self.phase = SessionPhase::Paused(PauseReason::Manual);
            log::info!("Paused");
        }
        true
    }

    /// `Paused(Manual) -> Playing`. Knowledge checks need `acknowledge`.
    pub fn resume(&mut self) -> bool {
        if self.phase != SessionPhase::Paused(PauseReason::Manual) {
            return false;
        }
        self.phase = SessionPhase::Playing;
        log::info!("Resumed");
        true
    }

    /// Halt the run and show a randomly drawn question
    pub(crate) fn present_knowledge_check(&mut self) -> GameEvent {
        let check = KnowledgeCheck::draw(&mut self.rng);
        let question = check.question;
        self.knowledge_check = Some(check);
        self.phase = SessionPhase::Paused(PauseReason::KnowledgeCheck);
        log::info!("Knowledge check #{} at score {}", question, self.score);
        GameEvent::KnowledgeCheckPresented { question }
    }

    /// Answer the open knowledge check. Only the first answer counts.
    pub fn answer(&mut self, choice: usize) -> Option<AnswerOutcome> {
        if self.phase != SessionPhase::Paused(PauseReason::KnowledgeCheck) {
            return None;
        }
        let check = self.knowledge_check.as_mut()?;
        if check.outcome.is_some() {
            return None;
        }
        let outcome = check.resolve(choice);

        if outcome == AnswerOutcome::Correct {
            self.level += 1;
            self.scroll_speed = (self.scroll_speed + SCROLL_SPEED_STEP).min(MAX_SCROLL_SPEED);
            self.obstacles.clear();
            self.power_up_spawned = false;
            self.spawner.rearm(self.level, &mut self.rng);
            log::info!("Correct! Level {} at speed {:.2}", self.level, self.scroll_speed);
        } else {
            log::info!("Incorrect, staying on level {}", self.level);
        }
        Some(outcome)
    }

    /// Dismiss an answered knowledge check and resume play.
    ///
    /// The grace window starts now so it is not spent on the result screen.
    pub fn acknowledge(&mut self, now_ms: f64) -> bool {
        if self.phase != SessionPhase::Paused(PauseReason::KnowledgeCheck) {
            return false;
        }
        let Some(outcome) = self.knowledge_check.as_ref().and_then(|c| c.outcome) else {
            return false;
        };
        self.grant_invulnerability(now_ms, outcome.invulnerability_ms());
        self.knowledge_check = None;
        self.phase = SessionPhase::Playing;
        true
    }

    /// `Playing -> GameOver` when an external countdown runs out
    pub fn expire(&mut self) -> Option<GameEvent> {
        if self.phase != SessionPhase::Playing {
            return None;
        }
        log::info!("Time limit reached");
        Some(self.end_game())
    }

    /// Enter `GameOver` and compute the reward summary exactly once
    pub(crate) fn end_game(&mut self) -> GameEvent {
        self.schedule.cancel_all();
        self.phase = SessionPhase::GameOver;
        let (run_id, score, level) = (self.run_id, self.score, self.level);
        let summary = *self
            .summary
            .get_or_insert_with(|| RunSummary::new(run_id, score, level));
        log::info!(
            "Game over: score {} level {} xp {}",
            summary.final_score,
            summary.final_level,
            summary.derived_xp
        );
        GameEvent::GameOver(summary)
    }

    /// `GameOver -> Ready`
    pub fn reset(&mut self) -> bool {
        if self.phase != SessionPhase::GameOver {
            return false;
        }
        if self.summary.is_some() && !self.rewards_submitted {
            log::warn!("Resetting with unsubmitted rewards for run {:016x}", self.run_id);
        }
        self.reinitialize(self.speed_mode);
        self.phase = SessionPhase::Ready;
        true
    }

    /// Hand the run summary to the reward sink.
    ///
    /// Returns `Ok(true)` when this call delivered it, `Ok(false)` when there
    /// is nothing (left) to send. Failures keep the summary for a retry.
    pub fn submit_rewards(&mut self, sink: &mut impl RewardSink) -> Result<bool, RewardError> {
        let Some(summary) = self.summary else {
            return Ok(false);
        };
        if self.rewards_submitted {
            return Ok(false);
        }
        if let Err(e) = sink.submit(&summary) {
            log::warn!("Reward submission for run {:016x} failed: {}", summary.run_id, e);
            return Err(e);
        }
        self.rewards_submitted = true;
        Ok(true)
    }

    /// Read-only view for presentation
    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            level: self.level,
            scroll_speed: self.scroll_speed,
            player: self.player.clone(),
            player_hitbox: player_hitbox(&self.player),
            obstacles: self.obstacles.clone(),
            coins: self.coins.clone(),
            power_ups: self.power_ups.clone(),
            invulnerable_remaining_ms: self.invulnerable_remaining_ms(now_ms),
            knowledge_check: self.knowledge_check.clone(),
            check_pending: self
                .schedule
                .is_pending(ScheduledKind::PresentKnowledgeCheck),
        }
    }
}
