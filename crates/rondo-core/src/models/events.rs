//! Domain events emitted by the round lifecycle controller.

use serde::{Deserialize, Serialize};

/// Event emitted after a lifecycle transition has been committed.
///
/// Events are delivered at-least-once and in commit order for a given
/// round; no ordering is guaranteed across rounds. Consumers (care-sheet
/// generation, notifications) must be idempotent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RoundEvent {
    /// A planned round was started
    RoundStarted { round_id: u64 },

    /// A stop of a started round was marked complete
    StopCompleted { round_id: u64, stop_id: u64 },

    /// A completed stop was reverted to incomplete
    StopReactivated { round_id: u64, stop_id: u64 },

    /// Every stop of the round is complete (explicitly or implicitly)
    RoundCompleted { round_id: u64 },
}

impl RoundEvent {
    /// The round this event belongs to.
    pub fn round_id(&self) -> u64 {
        match *self {
            RoundEvent::RoundStarted { round_id }
            | RoundEvent::StopCompleted { round_id, .. }
            | RoundEvent::StopReactivated { round_id, .. }
            | RoundEvent::RoundCompleted { round_id } => round_id,
        }
    }
}
