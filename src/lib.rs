//! Backgammon rules engine core: packed board, move executor, legal-action
//! generator, cube/match state machine, and observation encoder.

pub mod actions;
pub mod board;
pub mod constants;
pub mod cube;
pub mod dice;
pub mod error;
pub mod game;
pub mod moves;
pub mod observation;
pub mod turn;

#[cfg(test)]
mod scenarios;

pub use board::{Board, Side};
pub use cube::{Cube, CubeOwner, MatchState};
pub use dice::Dice;
pub use error::EngineError;
pub use game::{Game, GameConfig, Phase};
pub use observation::{observe, obs_dims, Layout, ObsDims, Observation, ObservationVariant, Tier};
