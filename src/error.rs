//! Error kinds surfaced by the engine.
//!
//! Per the engine's error policy: errors are non-recoverable at the engine
//! level. A caller that receives an `Err` should discard the game or call
//! `Game::reset`; the engine does not retry partial operations internally.

use thiserror::Error;

/// Everything that can go wrong calling into the engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The requested operation is illegal for the game's current phase,
    /// e.g. calling `apply_action` while `phase == Phase::Chance`.
    #[error("operation not legal in phase {phase:?}")]
    PhaseError {
        /// The phase the game was actually in.
        phase: crate::game::Phase,
    },

    /// The action code is not a member of the current legal-action set.
    #[error("action code {code} is not legal in the current state")]
    IllegalAction {
        /// The rejected action code.
        code: i32,
    },

    /// A chance outcome index fell outside `1..=21`.
    #[error("chance outcome index {index} is outside 1..=21")]
    InvalidOutcome {
        /// The rejected outcome index.
        index: u8,
    },

    /// An internal invariant was violated (nibble > 15, side total != 15,
    /// both sides holding the same point, etc). This is an assertion
    /// surface, not an expected runtime condition; it only fires when
    /// `GameConfig::sanity_check` is enabled.
    #[error("internal invariant violated: {detail}")]
    CorruptedState {
        /// Human-readable description of which invariant failed.
        detail: String,
    },
}
