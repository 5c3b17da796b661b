//! Doubling cube and match-play state.

use crate::board::Side;

/// Who currently owns the cube, if anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeOwner {
    None,
    Side(Side),
}

/// Top of the cube's value ladder (1-2-4-8-16-32-64); once reached, the
/// cube is stuck and can no longer be offered.
pub const MAX_CUBE_VALUE: u8 = 64;

/// The doubling cube: value, owner, and whether it is in play at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    pub value: u8,
    pub owner: CubeOwner,
    pub enabled: bool,
}

impl Cube {
    /// Centred at 1, enabled (money play default; `Game::init_match_game`
    /// disables it when Crawford is active).
    pub fn new(enabled: bool) -> Self {
        Cube {
            value: 1,
            owner: CubeOwner::None,
            enabled,
        }
    }

    /// `true` if `side` is allowed to offer a double this turn: the cube
    /// must be enabled, owned by nobody or by `side` itself, and not
    /// already at the top of its value ladder.
    pub fn may_double(&self, side: Side) -> bool {
        if !self.enabled || self.value >= MAX_CUBE_VALUE {
            return false;
        }
        match self.owner {
            CubeOwner::None => true,
            CubeOwner::Side(owner) => owner == side,
        }
    }

    /// Double the cube value and transfer ownership to `new_owner`.
    pub fn take(&mut self, new_owner: Side) {
        debug_assert!(self.value < MAX_CUBE_VALUE, "cube doubled past its value ladder");
        self.value = (self.value * 2).min(MAX_CUBE_VALUE);
        self.owner = CubeOwner::Side(new_owner);
    }
}

/// Match-play context: target score, away-distances, Crawford flags, and
/// the Jacoby rule (money play only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchState {
    pub match_length: u32,
    pub away: [u32; 2],
    pub is_crawford: bool,
    pub is_post_crawford: bool,
    pub jacoby_enabled: bool,
}

impl MatchState {
    /// Money play: no match target, Jacoby available, cube always eligible
    /// outside the (never-applicable) Crawford rule.
    pub fn money(jacoby_enabled: bool) -> Self {
        MatchState {
            match_length: 0,
            away: [u32::MAX, u32::MAX],
            is_crawford: false,
            is_post_crawford: false,
            jacoby_enabled,
        }
    }

    /// Real match play: `my_score`/`opp_score` give away-distances against
    /// `match_length`; post-Crawford is inferred when either side sits
    /// exactly 1-away and this isn't the Crawford game itself. Jacoby is
    /// disabled (it's a money-play-only rule).
    pub fn for_match(my_score: u32, opp_score: u32, match_length: u32, is_crawford: bool) -> Self {
        let away = [match_length.saturating_sub(my_score), match_length.saturating_sub(opp_score)];
        let is_post_crawford = !is_crawford && away.contains(&1);
        MatchState {
            match_length,
            away,
            is_crawford,
            is_post_crawford,
            jacoby_enabled: false,
        }
    }

    pub fn is_money_play(&self) -> bool {
        self.match_length == 0
    }

    pub fn away_for(&self, side: Side) -> u32 {
        self.away[side.index()]
    }
}
