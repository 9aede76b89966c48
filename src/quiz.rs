//! Knowledge-check question bank
//!
//! Questions are drawn at random whenever the score crosses a level
//! threshold. Content authoring happens elsewhere; this is the fixed bank
//! the runner ships with.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{CORRECT_ANSWER_INVULNERABILITY_MS, WRONG_ANSWER_INVULNERABILITY_MS};

/// A multiple-choice question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub prompt: &'static str,
    pub choices: &'static [&'static str],
    /// Index into `choices`
    pub answer: usize,
}

pub const QUESTION_BANK: &[Question] = &[
    Question {
        prompt: "What does a wallet's private key let you do?",
        choices: &[
            "Sign transactions",
            "Change the block size",
            "Mine blocks faster",
            "Reset the network",
        ],
        answer: 0,
    },
    Question {
        prompt: "Which of these should you never share?",
        choices: &["Public address", "Seed phrase", "Transaction hash", "Block number"],
        answer: 1,
    },
    Question {
        prompt: "What links each block to the one before it?",
        choices: &["A timestamp", "A username", "The previous block's hash", "A QR code"],
        answer: 2,
    },
    Question {
        prompt: "What is a smart contract?",
        choices: &[
            "A paper agreement",
            "A chat bot",
            "A hardware wallet",
            "Code that runs on a blockchain",
        ],
        answer: 3,
    },
    Question {
        prompt: "What is a gas fee paid for?",
        choices: &[
            "Computation on the network",
            "Exchange listing",
            "Wallet downloads",
            "Account recovery",
        ],
        answer: 0,
    },
    Question {
        prompt: "What makes an NFT different from a regular token?",
        choices: &[
            "It never changes hands",
            "Each one is unique",
            "It has no owner",
            "It is always free",
        ],
        answer: 1,
    },
    Question {
        prompt: "What does a testnet let developers do?",
        choices: &[
            "Earn real rewards",
            "Skip audits",
            "Experiment without real funds",
            "Bypass consensus",
        ],
        answer: 2,
    },
    Question {
        prompt: "A message asks for your seed phrase to 'verify' your wallet. It is:",
        choices: &["Routine", "Required yearly", "Safe if urgent", "A scam"],
        answer: 3,
    },
];

/// Result of answering a knowledge check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
}

impl AnswerOutcome {
    /// Grace window opened when play resumes
    pub fn invulnerability_ms(&self) -> f64 {
        match self {
            AnswerOutcome::Correct => CORRECT_ANSWER_INVULNERABILITY_MS,
            AnswerOutcome::Incorrect => WRONG_ANSWER_INVULNERABILITY_MS,
        }
    }
}

/// An open (or answered, not yet dismissed) knowledge check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeCheck {
    /// Index into `QUESTION_BANK`
    pub question: usize,
    pub outcome: Option<AnswerOutcome>,
}

impl KnowledgeCheck {
    /// Pick a random question from the bank
    pub fn draw(rng: &mut impl Rng) -> Self {
        Self {
            question: rng.random_range(0..QUESTION_BANK.len()),
            outcome: None,
        }
    }

    pub fn question(&self) -> &'static Question {
        &QUESTION_BANK[self.question % QUESTION_BANK.len()]
    }

    /// Grade `choice` and remember the outcome
    pub fn resolve(&mut self, choice: usize) -> AnswerOutcome {
        let outcome = if choice == self.question().answer {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        self.outcome = Some(outcome);
        outcome
    }
}
