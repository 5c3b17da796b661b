//! Immutable tables shared across the engine: the starting layout, the
//! canonical chance-outcome table, and the reserved action-code sentinels.
//!
//! None of this is mutated at runtime; there is no global mutable state
//! anywhere in the crate (see DESIGN.md's note on `DICE_OUTCOMES`).

/// Number of playable points on the board.
pub const NUM_POINTS: u8 = 24;

/// Nibble index used for a side's bar count.
pub const BAR_IDX: u8 = 0;
/// Nibble index used for a side's borne-off count.
pub const OFF_IDX: u8 = 25;
/// Unused packed slots, kept so each side's word holds a round 28 nibbles
/// (24 points + off + bar + these two).
pub const RESERVED_IDXS: [u8; 2] = [26, 27];

/// Checkers each side starts and plays a game with.
pub const CHECKERS_PER_SIDE: u8 = 15;

/// `(point, count)` pairs describing P0's starting layout, physical
/// coordinates (P0 travels 1 -> 24 -> off).
pub const P0_START: [(u8, u8); 4] = [(1, 2), (12, 5), (17, 3), (19, 5)];
/// `(point, count)` pairs describing P1's starting layout, physical
/// coordinates (P1 travels 24 -> 1 -> off), mirrored from P0's.
pub const P1_START: [(u8, u8); 4] = [(24, 2), (13, 5), (8, 3), (6, 5)];

/// Location code for "enter/move from the bar" in an action's `(loc_high,
/// loc_low)` encoding.
pub const LOC_BAR: u8 = 0;
/// Location code meaning "this die slot is unused" (padding for a blocked
/// half-move, or the sole legal action when nothing can be played).
pub const LOC_PASS: u8 = 25;

/// Base used to combine `(loc_high, loc_low)` into a single action code:
/// `code = loc_high * ACTION_BASE + loc_low + 1`.
pub const ACTION_BASE: i32 = 26;
/// Smallest valid checker-action code.
pub const MIN_CHECKER_ACTION: i32 = 1;
/// Largest valid checker-action code (`25 * 26 + 25 + 1`).
pub const MAX_CHECKER_ACTION: i32 = LOC_PASS as i32 * ACTION_BASE + LOC_PASS as i32 + 1;

/// Cube-decision sentinel: decline to offer the cube.
pub const ACTION_NO_DOUBLE: i32 = -1;
/// Cube-decision sentinel: offer the cube.
pub const ACTION_DOUBLE: i32 = -2;
/// Cube-response sentinel: accept the double.
pub const ACTION_TAKE: i32 = -3;
/// Cube-response sentinel: decline the double, forfeiting the game.
pub const ACTION_PASS: i32 = -4;

/// Encode a checker-play half-move pair into its action code.
#[inline]
pub const fn encode_action(loc_high: u8, loc_low: u8) -> i32 {
    loc_high as i32 * ACTION_BASE + loc_low as i32 + 1
}

/// Decode an action code back into its `(loc_high, loc_low)` pair. Callers
/// must only pass codes in `MIN_CHECKER_ACTION..=MAX_CHECKER_ACTION`.
#[inline]
pub const fn decode_action(code: i32) -> (u8, u8) {
    let raw = code - 1;
    ((raw / ACTION_BASE) as u8, (raw % ACTION_BASE) as u8)
}

/// One entry of the canonical chance-outcome table: a die pair and its
/// probability out of 36.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChanceOutcome {
    pub high: u8,
    pub low: u8,
    /// Numerator over a denominator of 36.
    pub weight: u8,
}

/// The 15 unordered non-double pairs (weight 2/36 each) followed by the 6
/// doubles (weight 1/36 each), fixed canonical ordering; index into this
/// table with `outcome_index - 1` for `outcome_index in 1..=21`.
pub const DICE_OUTCOMES: [ChanceOutcome; 21] = [
    ChanceOutcome { high: 2, low: 1, weight: 2 },
    ChanceOutcome { high: 3, low: 1, weight: 2 },
    ChanceOutcome { high: 3, low: 2, weight: 2 },
    ChanceOutcome { high: 4, low: 1, weight: 2 },
    ChanceOutcome { high: 4, low: 2, weight: 2 },
    ChanceOutcome { high: 4, low: 3, weight: 2 },
    ChanceOutcome { high: 5, low: 1, weight: 2 },
    ChanceOutcome { high: 5, low: 2, weight: 2 },
    ChanceOutcome { high: 5, low: 3, weight: 2 },
    ChanceOutcome { high: 5, low: 4, weight: 2 },
    ChanceOutcome { high: 6, low: 1, weight: 2 },
    ChanceOutcome { high: 6, low: 2, weight: 2 },
    ChanceOutcome { high: 6, low: 3, weight: 2 },
    ChanceOutcome { high: 6, low: 4, weight: 2 },
    ChanceOutcome { high: 6, low: 5, weight: 2 },
    ChanceOutcome { high: 1, low: 1, weight: 1 },
    ChanceOutcome { high: 2, low: 2, weight: 1 },
    ChanceOutcome { high: 3, low: 3, weight: 1 },
    ChanceOutcome { high: 4, low: 4, weight: 1 },
    ChanceOutcome { high: 5, low: 5, weight: 1 },
    ChanceOutcome { high: 6, low: 6, weight: 1 },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_outcomes_sum_to_36() {
        let total: u32 = DICE_OUTCOMES.iter().map(|o| o.weight as u32).sum();
        assert_eq!(total, 36);
    }

    #[test]
    fn action_code_roundtrips() {
        for loc_high in 0..=LOC_PASS {
            for loc_low in 0..=LOC_PASS {
                let code = encode_action(loc_high, loc_low);
                assert_eq!(decode_action(code), (loc_high, loc_low));
            }
        }
    }

    #[test]
    fn action_code_bounds() {
        assert_eq!(encode_action(0, 0), MIN_CHECKER_ACTION);
        assert_eq!(encode_action(LOC_PASS, LOC_PASS), MAX_CHECKER_ACTION);
        assert_eq!(MAX_CHECKER_ACTION, 676);
    }

    #[test]
    fn starting_layout_totals_fifteen() {
        let p0: u32 = P0_START.iter().map(|(_, c)| *c as u32).sum();
        let p1: u32 = P1_START.iter().map(|(_, c)| *c as u32).sum();
        assert_eq!(p0, 15);
        assert_eq!(p1, 15);
    }
}
