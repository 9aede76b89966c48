//! Deferred one-shot events keyed by wall-clock deadline
//!
//! Drained once at the start of every tick; cancelling is just removal.

use serde::{Deserialize, Serialize};

/// Deferred actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledKind {
    /// Pause the run and show a knowledge check (level-up announcement delay)
    PresentKnowledgeCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Scheduled {
    deadline_ms: f64,
    kind: ScheduledKind,
}

/// Pending deferred events
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    pending: Vec<Scheduled>,
}

impl Schedule {
    /// Queue `kind` to fire once `now >= deadline_ms`
    pub fn push(&mut self, deadline_ms: f64, kind: ScheduledKind) {
        self.pending.push(Scheduled { deadline_ms, kind });
    }

    /// Remove and return everything due at `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<ScheduledKind> {
        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|e| {
            if e.deadline_ms <= now_ms {
                due.push(*e);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.deadline_ms.total_cmp(&b.deadline_ms));
        due.into_iter().map(|e| e.kind).collect()
    }

    /// Drop every pending event, returning what was cancelled
    pub fn cancel_all(&mut self) -> Vec<ScheduledKind> {
        self.pending.drain(..).map(|e| e.kind).collect()
    }

    pub fn is_pending(&self, kind: ScheduledKind) -> bool {
        self.pending.iter().any(|e| e.kind == kind)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
