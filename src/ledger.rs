//! Points ledger boundary
//!
//! The start gate debits an entry fee before a run; the reward sink receives
//! the run summary after game over. The real ledger lives outside the game;
//! `InMemoryLedger` is the local stand-in used by the demo and tests.

use std::collections::HashSet;

use thiserror::Error;

use crate::highscores::HighScores;
use crate::sim::RunSummary;

/// Ledger failures while charging an entry fee
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u64, available: u64 },
    #[error("ledger unavailable: {0}")]
    Unavailable(String),
}

/// Failures while recording rewards
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("reward sink unavailable: {0}")]
    Unavailable(String),
}

/// Entry cost, depending on whether this is the first run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFee {
    FirstPlay,
    Replay,
}

impl EntryFee {
    pub fn cost(&self) -> u64 {
        match self {
            EntryFee::FirstPlay => 20,
            EntryFee::Replay => 10,
        }
    }
}

/// Funded-action check
pub trait PointsLedger {
    fn balance(&self) -> u64;

    /// Take `amount` from the balance, returning what is left
    fn debit(&mut self, amount: u64) -> Result<u64, LedgerError>;
}

/// Destination for finished runs. Must tolerate duplicate submissions.
pub trait RewardSink {
    fn submit(&mut self, summary: &RunSummary) -> Result<(), RewardError>;
}

/// Local ledger with a leaderboard
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balance: u64,
    xp: u64,
    leaderboard: HighScores,
    recorded_runs: HashSet<u64>,
    offline: bool,
}

impl InMemoryLedger {
    pub fn new(balance: u64) -> Self {
        Self {
            balance,
            ..Default::default()
        }
    }

    pub fn with_leaderboard(mut self, leaderboard: HighScores) -> Self {
        self.leaderboard = leaderboard;
        self
    }

    pub fn xp(&self) -> u64 {
        self.xp
    }

    pub fn leaderboard(&self) -> &HighScores {
        &self.leaderboard
    }

    /// Simulate an outage: every call fails until switched back
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }
}

impl PointsLedger for InMemoryLedger {
    fn balance(&self) -> u64 {
        self.balance
    }

    fn debit(&mut self, amount: u64) -> Result<u64, LedgerError> {
        if self.offline {
            return Err(LedgerError::Unavailable("offline".to_string()));
        }
        if amount > self.balance {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }
}

impl RewardSink for InMemoryLedger {
    fn submit(&mut self, summary: &RunSummary) -> Result<(), RewardError> {
        if self.offline {
            return Err(RewardError::Unavailable("offline".to_string()));
        }
        if !self.recorded_runs.insert(summary.run_id) {
            log::debug!("Run {:016x} already recorded", summary.run_id);
            return Ok(());
        }

        self.balance += summary.derived_xp;
        self.xp += summary.derived_xp;
        if let Some(rank) = self.leaderboard.add_score(
            summary.final_score,
            summary.final_level,
            summary.derived_xp,
            crate::platform::now_ms(),
        ) {
            log::info!("Leaderboard rank #{} with {}", rank, summary.final_score);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit() {
        let mut ledger = InMemoryLedger::new(25);
        assert_eq!(ledger.debit(EntryFee::FirstPlay.cost()), Ok(5));
        assert_eq!(
            ledger.debit(EntryFee::Replay.cost()),
            Err(LedgerError::InsufficientBalance {
                needed: 10,
                available: 5
            })
        );
        assert_eq!(ledger.balance(), 5);
    }

    #[test]
    fn test_replay_is_cheaper() {
        assert!(EntryFee::Replay.cost() < EntryFee::FirstPlay.cost());
    }

    #[test]
    fn test_offline_ledger_refuses() {
        let mut ledger = InMemoryLedger::new(100);
        ledger.set_offline(true);
        assert!(matches!(ledger.debit(1), Err(LedgerError::Unavailable(_))));
        assert_eq!(ledger.balance(), 100);
    }

    #[test]
    fn test_duplicate_submission_is_ignored() {
        let mut ledger = InMemoryLedger::new(0);
        let summary = RunSummary::new(77, 1_234, 2);
        ledger.submit(&summary).unwrap();
        ledger.submit(&summary).unwrap();
        assert_eq!(ledger.xp(), 123);
        assert_eq!(ledger.balance(), 123);
        assert_eq!(ledger.leaderboard().entries.len(), 1);
    }
}
