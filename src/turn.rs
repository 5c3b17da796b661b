//! Turn driver / cube state machine: phase transitions, chance sampling,
//! cube proposals and responses, termination, and reward.

use rand::RngCore;

use crate::board::{Board, Side};
use crate::constants::{decode_action, ACTION_DOUBLE, ACTION_NO_DOUBLE, ACTION_PASS, ACTION_TAKE, LOC_PASS};
use crate::dice::{dice_for_outcome, sample_outcome_index};
use crate::error::EngineError;
use crate::game::{Game, Phase};
use crate::moves::apply_move;

impl Game {
    /// Apply one action code in the current phase. Validates against the
    /// legal-action cache first unless `GameConfig::sanity_check` is
    /// disabled, in which case the caller is trusted not to pass an
    /// illegal code.
    pub fn apply_action(&mut self, code: i32) -> Result<(), EngineError> {
        if self.config.sanity_check && !self.legal_actions().contains(&code) {
            return Err(EngineError::IllegalAction { code });
        }
        match self.phase {
            Phase::Chance => Err(EngineError::PhaseError { phase: Phase::Chance }),
            Phase::CubeDecision => self.apply_cube_decision(code),
            Phase::CubeResponse => self.apply_cube_response(code),
            Phase::CheckerPlay => self.apply_checker_play(code),
        }
    }

    fn apply_cube_decision(&mut self, code: i32) -> Result<(), EngineError> {
        match code {
            ACTION_NO_DOUBLE => {
                log::trace!("{:?} declines to double", self.current_player);
                self.phase = Phase::Chance;
            }
            ACTION_DOUBLE => {
                log::debug!("{:?} doubles to {}", self.current_player, self.cube.value * 2);
                self.current_player = self.current_player.other();
                self.phase = Phase::CubeResponse;
            }
            _ => return Err(EngineError::IllegalAction { code }),
        }
        self.history.push(code);
        self.cache.invalidate();
        Ok(())
    }

    fn apply_cube_response(&mut self, code: i32) -> Result<(), EngineError> {
        match code {
            ACTION_PASS => {
                let doubler = self.current_player.other();
                self.terminated = true;
                self.winner = Some(doubler);
                let sign = if doubler == Side::P0 { 1.0 } else { -1.0 };
                self.reward = sign * self.cube.value as f64;
                log::debug!("{:?} passes the double, {:?} wins {}", self.current_player, doubler, self.reward);
            }
            ACTION_TAKE => {
                let taker = self.current_player;
                self.cube.take(taker);
                log::trace!("{taker:?} takes, cube now {}", self.cube.value);
                self.current_player = self.current_player.other();
                self.phase = Phase::Chance;
            }
            _ => return Err(EngineError::IllegalAction { code }),
        }
        self.history.push(code);
        self.cache.invalidate();
        Ok(())
    }

    fn apply_checker_play(&mut self, code: i32) -> Result<(), EngineError> {
        let (loc_high, loc_low) = decode_action(code);
        let dice = self.dice;
        if loc_high != LOC_PASS {
            apply_move(&mut self.board, self.current_player, loc_high, dice.high);
        }
        if loc_low != LOC_PASS {
            apply_move(&mut self.board, self.current_player, loc_low, dice.low);
        }
        self.history.push(code);
        self.cache.invalidate();
        self.assert_not_corrupted()?;

        if self.board.has_won(self.current_player) {
            self.terminated = true;
            self.winner = Some(self.current_player);
            self.reward =
                compute_game_reward(&self.board, self.current_player, self.cube.value, self.match_state.jacoby_enabled);
            log::debug!("{:?} wins, reward {}", self.current_player, self.reward);
            return Ok(());
        }

        self.remaining_actions = self.remaining_actions.saturating_sub(1);
        if self.remaining_actions == 0 {
            self.switch_turn();
        }
        Ok(())
    }

    /// Resolve a chance outcome (`1..=21`) into dice, enter `CheckerPlay`.
    /// Only legal from `Phase::Chance`.
    pub fn apply_chance(&mut self, outcome_index: u8) -> Result<(), EngineError> {
        if self.phase != Phase::Chance {
            return Err(EngineError::PhaseError { phase: self.phase });
        }
        let dice = dice_for_outcome(outcome_index)?;
        log::trace!("chance outcome {outcome_index} -> dice ({}, {})", dice.high, dice.low);
        self.dice = dice;
        self.remaining_actions = dice.initial_remaining_actions();
        self.phase = Phase::CheckerPlay;
        self.cache.invalidate();
        Ok(())
    }

    /// Draw an outcome from `rng` and apply it, repeating while the state
    /// is still (somehow) at a chance node; the deterministic RL stepper
    /// relies on this to always hand control back at a decision point.
    pub fn sample_chance(&mut self, rng: &mut impl RngCore) -> Result<(), EngineError> {
        while self.phase == Phase::Chance && !self.terminated {
            let idx = sample_outcome_index(rng);
            self.apply_chance(idx)?;
        }
        Ok(())
    }

    /// Swap the player to move, clear dice, invalidate the cache, and pick
    /// the next phase: `CubeDecision` if the incoming player may double,
    /// else `Chance`.
    pub fn switch_turn(&mut self) {
        self.current_player = self.current_player.other();
        self.dice = crate::dice::Dice::NONE;
        self.remaining_actions = 0;
        self.cache.invalidate();
        self.phase =
            if self.cube.may_double(self.current_player) { Phase::CubeDecision } else { Phase::Chance };
        log::trace!("turn switches to {:?}, phase {:?}", self.current_player, self.phase);
    }

    /// Apply `code`, then sample chance outcomes until control returns to
    /// a non-chance decision point or the game ends.
    pub fn step(&mut self, code: i32, rng: &mut impl RngCore) -> Result<(), EngineError> {
        self.apply_action(code)?;
        if !self.terminated {
            self.sample_chance(rng)?;
        }
        Ok(())
    }
}

/// Reward for `winner` finishing the game right now:
/// `sign(winner) * margin * cube_value`, margin 1/2/3 for
/// normal/gammon/backgammon, clamped to 1 under Jacoby at an undoubled
/// cube.
pub fn compute_game_reward(board: &Board, winner: Side, cube_value: u8, jacoby_enabled: bool) -> f64 {
    let loser = winner.other();
    let gammon = board.off(loser) == 0;
    let mut backgammon = false;
    if gammon {
        if board.bar(loser) > 0 {
            backgammon = true;
        } else {
            for canonical in 19..=24u8 {
                let phys = Board::physical_point(winner, canonical);
                if board.point(loser, phys) > 0 {
                    backgammon = true;
                    break;
                }
            }
        }
    }
    let mut margin = if backgammon {
        3
    } else if gammon {
        2
    } else {
        1
    };
    if jacoby_enabled && cube_value == 1 {
        margin = 1;
    }
    let sign = if winner == Side::P0 { 1.0 } else { -1.0 };
    sign * margin as f64 * cube_value as f64
}
