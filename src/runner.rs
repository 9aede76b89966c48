//! Host loop
//!
//! The runner is the frame scheduler: it owns the session (the only mutable
//! reference to it), the frame clock and the player's preferences. The host
//! calls `frame` once per display refresh.

use crate::ledger::{EntryFee, PointsLedger, RewardError, RewardSink};
use crate::quiz::AnswerOutcome;
use crate::settings::{Settings, SpeedMode};
use crate::sim::{
    FrameClock, GameEvent, Session, SessionPhase, Snapshot, StartError, TickInput, tick,
};

/// Session plus its scheduling state
#[derive(Debug)]
pub struct Runner {
    session: Session,
    clock: FrameClock,
    settings: Settings,
    /// A run was started before (replays cost less)
    has_played: bool,
}

impl Runner {
    /// Runner with an entropy-seeded session
    pub fn new(settings: Settings) -> Self {
        Self::with_session(Session::from_entropy(), settings)
    }

    /// Runner around an existing (e.g. fixed-seed) session
    pub fn with_session(session: Session, settings: Settings) -> Self {
        Self {
            session,
            clock: FrameClock::new(),
            settings,
            has_played: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase
    }

    /// Fee the next start will charge
    pub fn entry_fee(&self) -> EntryFee {
        if self.has_played {
            EntryFee::Replay
        } else {
            EntryFee::FirstPlay
        }
    }

    /// Change the preferred speed and persist it. Applies from the next start.
    pub fn set_speed_mode(&mut self, mode: SpeedMode) {
        if self.settings.speed_mode != mode {
            self.settings.speed_mode = mode;
            self.settings.save();
        }
    }

    /// Charge the entry fee and start a run
    pub fn start(
        &mut self,
        ledger: &mut impl PointsLedger,
        now_ms: f64,
    ) -> Result<GameEvent, StartError> {
        let fee = self.entry_fee();
        let event = self
            .session
            .start(self.settings.speed_mode, ledger, fee, now_ms)?;
        self.has_played = true;
        self.clock.reset();
        Ok(event)
    }

    /// Display-refresh callback. Ticks only while playing.
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> Vec<GameEvent> {
        if self.session.phase != SessionPhase::Playing {
            self.clock.reset();
            return Vec::new();
        }
        let frame = self.clock.advance(now_ms);
        let events = tick(&mut self.session, input, frame);
        if self.session.phase != SessionPhase::Playing {
            self.clock.reset();
        }
        events
    }

    pub fn pause(&mut self) -> bool {
        self.clock.reset();
        self.session.pause()
    }

    pub fn resume(&mut self) -> bool {
        self.clock.reset();
        self.session.resume()
    }

    pub fn answer(&mut self, choice: usize) -> Option<AnswerOutcome> {
        self.session.answer(choice)
    }

    pub fn acknowledge(&mut self, now_ms: f64) -> bool {
        self.clock.reset();
        self.session.acknowledge(now_ms)
    }

    /// External countdown ran out
    pub fn expire(&mut self) -> Option<GameEvent> {
        self.session.expire()
    }

    pub fn reset(&mut self) -> bool {
        self.session.reset()
    }

    /// Deliver the finished run to the reward sink (at most once)
    pub fn submit_rewards(&mut self, sink: &mut impl RewardSink) -> Result<bool, RewardError> {
        self.session.submit_rewards(sink)
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot {
        self.session.snapshot(now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::ledger::InMemoryLedger;
    use crate::sim::PauseReason;

    fn runner(seed: u64) -> Runner {
        Runner::with_session(Session::new(seed), Settings::default())
    }

    #[test]
    fn test_first_play_then_replay_fee() {
        let mut ledger = InMemoryLedger::new(100);
        let mut runner = runner(1);
        assert_eq!(runner.entry_fee(), EntryFee::FirstPlay);
        runner.start(&mut ledger, 0.0).unwrap();
        assert_eq!(ledger.balance(), 80);

        runner.session.end_game();
        assert!(runner.reset());
        assert_eq!(runner.entry_fee(), EntryFee::Replay);
        runner.start(&mut ledger, 1_000.0).unwrap();
        assert_eq!(ledger.balance(), 70);
    }

    #[test]
    fn test_failed_start_keeps_first_play_fee() {
        let mut ledger = InMemoryLedger::new(0);
        let mut runner = runner(2);
        assert!(runner.start(&mut ledger, 0.0).is_err());
        assert_eq!(runner.phase(), SessionPhase::Ready);
        assert_eq!(runner.entry_fee(), EntryFee::FirstPlay);
    }

    #[test]
    fn test_pause_gap_is_not_simulated() {
        let mut ledger = InMemoryLedger::new(100);
        let mut runner = runner(3);
        runner.start(&mut ledger, 0.0).unwrap();
        runner.frame(0.0, &TickInput::default());
        runner.frame(TARGET_FRAME_MS, &TickInput::default());

        assert!(runner.pause());
        assert_eq!(runner.phase(), SessionPhase::Paused(PauseReason::Manual));
        // Frames while paused do nothing
        assert!(runner.frame(5_000.0, &TickInput::default()).is_empty());

        assert!(runner.resume());
        let before = runner.session().player.clone();
        let input = TickInput {
            jump: true,
            ..Default::default()
        };
        runner.frame(60_000.0, &input);
        // First frame after resume is nominal, not a minute long
        let after = &runner.session().player;
        assert!((after.y - (before.y + JUMP_IMPULSE + GRAVITY)).abs() < 1e-3);
    }

    #[test]
    fn test_grace_window_keeps_running_while_paused() {
        let mut ledger = InMemoryLedger::new(100);
        let mut runner = runner(6);
        runner.start(&mut ledger, 0.0).unwrap();
        runner.frame(0.0, &TickInput::default());

        assert!(runner.pause());
        assert!(runner.resume());
        // Windows are wall-clock deadlines; a long break spends them
        assert_eq!(runner.snapshot(6_000.0).invulnerable_remaining_ms, 0.0);
        assert!(!runner.session().is_invulnerable(6_000.0));
    }

    #[test]
    fn test_full_run_submits_rewards_once() {
        let mut ledger = InMemoryLedger::new(100);
        let mut runner = runner(4);
        runner.start(&mut ledger, 0.0).unwrap();

        let mut now = 0.0;
        while runner.phase() == SessionPhase::Playing && now < 600_000.0 {
            runner.frame(now, &TickInput::default());
            now += TARGET_FRAME_MS;
        }
        // Standing still at level 1: an obstacle ends the run eventually
        assert_eq!(runner.phase(), SessionPhase::GameOver);

        let summary = *runner.session().summary().unwrap();
        assert!(runner.submit_rewards(&mut ledger).unwrap());
        assert!(!runner.submit_rewards(&mut ledger).unwrap());
        assert_eq!(ledger.xp(), summary.derived_xp);
        assert_eq!(summary.derived_xp, summary.final_score / 10);
    }

    #[test]
    fn test_snapshot_reflects_session() {
        let mut ledger = InMemoryLedger::new(100);
        let mut runner = runner(5);
        runner.start(&mut ledger, 0.0).unwrap();
        let snapshot = runner.snapshot(1_000.0);
        assert_eq!(snapshot.phase, SessionPhase::Playing);
        assert_eq!(snapshot.level, 1);
        assert_eq!(snapshot.invulnerable_remaining_ms, 4_000.0);
        assert_eq!(snapshot.player_hitbox.min.y, GROUND_Y);
        assert!(!snapshot.check_pending);
    }
}
