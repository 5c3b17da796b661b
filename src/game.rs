//! Game state & lifecycle: board, dice, cube, match context, phase,
//! history, and the legal-action cache, all bundled behind one owned
//! object so a tree search can `clone` it freely.

use crate::actions::{self, ActionCache};
use crate::board::{Board, Side};
use crate::cube::Cube;
use crate::cube::MatchState;
use crate::dice::Dice;
use crate::error::EngineError;
use crate::observation::ObservationVariant;

/// The four-phase turn machine: a decision to offer the cube, a response
/// to an offered cube, a pending dice roll, or an in-progress checker
/// play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    CubeDecision,
    CubeResponse,
    Chance,
    CheckerPlay,
}

/// Construction-time configuration: who moves first, which observation
/// variant `observe` should default to, and whether to sanity-check
/// actions before applying them.
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    pub first_player: Side,
    pub observation_variant: ObservationVariant,
    /// Re-validate every action against the legal-action set before
    /// applying it. Defaults to `true`; a throughput-sensitive caller that
    /// trusts its own action selection can disable it.
    pub sanity_check: bool,
}

impl GameConfig {
    pub fn with_sanity_check(mut self, sanity_check: bool) -> Self {
        self.sanity_check = sanity_check;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            first_player: Side::P0,
            observation_variant: ObservationVariant::default(),
            sanity_check: true,
        }
    }
}

/// A full backgammon game: board, dice, cube, match context, and the
/// bookkeeping the turn driver and action generator need.
#[derive(Debug, Clone)]
pub struct Game {
    pub(crate) config: GameConfig,
    pub(crate) board: Board,
    pub(crate) dice: Dice,
    pub(crate) remaining_actions: u8,
    pub(crate) current_player: Side,
    pub(crate) phase: Phase,
    pub(crate) cube: Cube,
    pub(crate) match_state: MatchState,
    pub(crate) history: Vec<i32>,
    pub(crate) cache: ActionCache,
    pub(crate) terminated: bool,
    pub(crate) reward: f64,
    pub(crate) winner: Option<Side>,
}

impl Game {
    /// A fresh money-play game at a chance node, standard starting
    /// layout, Jacoby off, cube centred at 1.
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    pub fn with_config(config: GameConfig) -> Self {
        Game {
            current_player: config.first_player,
            config,
            board: Board::starting(),
            dice: Dice::NONE,
            remaining_actions: 0,
            phase: Phase::Chance,
            cube: Cube::new(true),
            match_state: MatchState::money(false),
            history: Vec::new(),
            cache: ActionCache::new(),
            terminated: false,
            reward: 0.0,
            winner: None,
        }
    }

    /// Reset this game in place to a fresh starting chance node, reusing
    /// the existing allocations rather than building a new `Game`.
    pub fn reset(&mut self) {
        self.board = Board::starting();
        self.dice = Dice::NONE;
        self.remaining_actions = 0;
        self.current_player = self.config.first_player;
        self.phase = Phase::Chance;
        self.cube = Cube::new(!self.match_state.is_crawford);
        self.history.clear();
        self.cache.invalidate();
        self.terminated = false;
        self.reward = 0.0;
        self.winner = None;
    }

    /// Configure match play: sets away-distances and Crawford/post-Crawford
    /// flags, disables Jacoby, resets the cube to 1/centred, and disables
    /// the cube iff this is the Crawford game.
    pub fn init_match_game(&mut self, my_score: u32, opp_score: u32, match_length: u32, is_crawford: bool) {
        self.match_state = MatchState::for_match(my_score, opp_score, match_length, is_crawford);
        self.cube = Cube::new(!is_crawford);
        self.cache.invalidate();
    }

    // ---------- accessors ----------

    pub fn current_player(&self) -> Side {
        self.current_player
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_chance_node(&self) -> bool {
        self.phase == Phase::Chance
    }

    pub fn game_terminated(&self) -> bool {
        self.terminated
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn dice(&self) -> Dice {
        self.dice
    }

    pub fn remaining_actions(&self) -> u8 {
        self.remaining_actions
    }

    pub fn cube(&self) -> Cube {
        self.cube
    }

    pub fn match_state(&self) -> MatchState {
        self.match_state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[i32] {
        &self.history
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Canonical accessor: signed checker count for the side to move at
    /// canonical point `i` (1..=24), positive for the mover's own checkers
    /// and negative for the opponent's. Rust's `Index` trait can't return a
    /// computed `i8` by reference, so it's a plain method instead.
    pub fn at(&self, i: u8) -> i8 {
        self.board.view(self.current_player, i)
    }

    /// The side that has just won the match outright, if this game's result
    /// closed out their remaining away-distance. Read-only: derived from
    /// `match_state`'s away-distances and the terminated game's `reward`,
    /// mutating nothing. `None` in money play (no match target) or while
    /// the game isn't terminated. Starting the next game of the match (via
    /// `init_match_game`/`reset`) is left to the embedder.
    pub fn match_winner(&self) -> Option<Side> {
        if self.match_state.is_money_play() {
            return None;
        }
        let winner = self.winner?;
        let points_won = self.reward.abs() as u32;
        if points_won >= self.match_state.away_for(winner) {
            Some(winner)
        } else {
            None
        }
    }

    /// Sum of pip distances remaining for `side` (each checker's distance
    /// to bear off); also one of the arithmetic features the "full"
    /// observation tier includes.
    pub fn pip_count(&self, side: Side) -> u32 {
        let mut total = self.board.bar(side) as u32 * 25;
        for p in 1..=24u8 {
            let phys = Board::physical_point(side, p);
            let count = self.board.point(side, phys) as u32;
            total += count * (25 - p as u32);
        }
        total
    }

    /// Legal actions for the current state, regenerating the cache first
    /// if a prior mutation invalidated it.
    pub fn legal_actions(&mut self) -> &[i32] {
        if !self.cache.is_valid() {
            self.regenerate_cache();
        }
        self.cache.get()
    }

    pub(crate) fn regenerate_cache(&mut self) {
        let actions = match self.phase {
            Phase::CubeDecision => actions::cube_decision_actions(&self.cube, self.current_player),
            Phase::CubeResponse => actions::cube_response_actions(),
            Phase::Chance => Vec::new(),
            Phase::CheckerPlay => {
                actions::checker_actions(&self.board, self.current_player, self.dice, self.remaining_actions)
            }
        };
        self.cache.fill(actions);
    }

    /// Ascii board dump for debugging; never consulted by any rule.
    pub fn render(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!(
            "phase={:?} player={:?} dice=({},{}) cube={} owner={:?}\n",
            self.phase, self.current_player, self.dice.high, self.dice.low, self.cube.value, self.cube.owner
        ));
        for side in [Side::P0, Side::P1] {
            s.push_str(&format!("{side:?}: bar={} off={} points=[", self.board.bar(side), self.board.off(side)));
            for p in 1..=24u8 {
                let phys = Board::physical_point(side, p);
                let c = self.board.point(side, phys);
                if c > 0 {
                    s.push_str(&format!("{p}:{c} "));
                }
            }
            s.push_str("]\n");
        }
        s
    }

    pub(crate) fn assert_not_corrupted(&self) -> Result<(), EngineError> {
        if !self.config.sanity_check {
            return Ok(());
        }
        for side in [Side::P0, Side::P1] {
            let total = self.board.total(side);
            if total != crate::constants::CHECKERS_PER_SIDE as u32 {
                return Err(EngineError::CorruptedState {
                    detail: format!("{side:?} has {total} checkers, expected {}", crate::constants::CHECKERS_PER_SIDE),
                });
            }
        }
        for p in 1..=24u8 {
            let p0 = self.board.point(Side::P0, p);
            let p1 = self.board.point(Side::P1, p);
            if p0 > 0 && p1 > 0 {
                return Err(EngineError::CorruptedState {
                    detail: format!("point {p} is occupied by both sides ({p0} and {p1})"),
                });
            }
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
