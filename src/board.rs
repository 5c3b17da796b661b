//! Bit-packed board state.
//!
//! Each side's 28 positional buckets (bar, 24 points, off, two reserved
//! slots, see `constants::{BAR_IDX, OFF_IDX, RESERVED_IDXS}`) are packed
//! as 4-bit nibbles into one `u128`, one word per side. Mutation is three
//! primitives: `count`, `incr`, `decr`, each O(1) shift-and-mask, in the
//! spirit of the bitboard column/row masks in a game like Connect-4.

use crate::constants::{BAR_IDX, CHECKERS_PER_SIDE, NUM_POINTS, OFF_IDX, P0_START, P1_START};

/// First canonical point of a side's home board (see `Board::all_home`).
const HOME_START: u8 = 19;

/// Which side of the board a checker belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    P0,
    P1,
}

impl Side {
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::P0 => Side::P1,
            Side::P1 => Side::P0,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::P0 => 0,
            Side::P1 => 1,
        }
    }
}

const NIBBLE_BITS: u32 = 4;
const NIBBLE_MASK: u128 = 0xF;

/// Two packed `u128` words, one per side, each holding 28 4-bit counters in
/// physical coordinates (P0 travels 1 -> 24 -> off, P1 travels 24 -> 1 ->
/// off; see `constants` for the bar/off/reserved slot indices).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    words: [u128; 2],
}

impl Board {
    /// Empty board: every bucket zero.
    pub fn empty() -> Self {
        Board { words: [0; 2] }
    }

    /// Standard backgammon starting position (see `constants::{P0_START,
    /// P1_START}`).
    pub fn starting() -> Self {
        let mut b = Board::empty();
        for &(point, count) in P0_START.iter() {
            for _ in 0..count {
                b.incr(Side::P0, point);
            }
        }
        for &(point, count) in P1_START.iter() {
            for _ in 0..count {
                b.incr(Side::P1, point);
            }
        }
        b
    }

    /// Read the nibble at `idx` (0-based into the packed word) for `side`.
    #[inline]
    pub fn count(&self, side: Side, idx: u8) -> u8 {
        let word = self.words[side.index()];
        ((word >> (idx as u32 * NIBBLE_BITS)) & NIBBLE_MASK) as u8
    }

    /// Increment the nibble at `idx` for `side`. Debug-asserts the result
    /// stays within the 4-bit / 15-checker invariant; release builds trust
    /// the caller for throughput.
    #[inline]
    pub fn incr(&mut self, side: Side, idx: u8) {
        let cur = self.count(side, idx);
        debug_assert!(cur < CHECKERS_PER_SIDE, "nibble overflow at idx {idx}");
        self.set(side, idx, cur + 1);
    }

    /// Decrement the nibble at `idx` for `side`.
    #[inline]
    pub fn decr(&mut self, side: Side, idx: u8) {
        let cur = self.count(side, idx);
        debug_assert!(cur > 0, "nibble underflow at idx {idx}");
        self.set(side, idx, cur - 1);
    }

    #[inline]
    fn set(&mut self, side: Side, idx: u8, value: u8) {
        let shift = idx as u32 * NIBBLE_BITS;
        let word = &mut self.words[side.index()];
        *word = (*word & !(NIBBLE_MASK << shift)) | ((value as u128 & NIBBLE_MASK) << shift);
    }

    #[inline]
    pub fn bar(&self, side: Side) -> u8 {
        self.count(side, BAR_IDX)
    }

    #[inline]
    pub fn off(&self, side: Side) -> u8 {
        self.count(side, OFF_IDX)
    }

    /// Physical point count for `side` at `point` (1..=24).
    #[inline]
    pub fn point(&self, side: Side, point: u8) -> u8 {
        debug_assert!((1..=NUM_POINTS).contains(&point));
        self.count(side, point)
    }

    /// Map a canonical point (1..=24, from `mover`'s perspective, mover
    /// travels toward 24) to its physical point index.
    #[inline]
    pub fn physical_point(mover: Side, canonical: u8) -> u8 {
        debug_assert!((1..=NUM_POINTS).contains(&canonical));
        match mover {
            Side::P0 => canonical,
            Side::P1 => NUM_POINTS + 1 - canonical,
        }
    }

    /// Map a physical point back to `mover`'s canonical numbering. The
    /// mapping is an involution, so this is the same formula as
    /// `physical_point`.
    #[inline]
    pub fn canonical_point(mover: Side, physical: u8) -> u8 {
        Board::physical_point(mover, physical)
    }

    /// Signed canonical view: positive = `mover` has checkers on canonical
    /// point `i`, negative = the opponent does, zero = empty. Per the
    /// single-occupancy invariant at most one side is ever non-zero on a
    /// given physical point.
    pub fn view(&self, mover: Side, canonical_point: u8) -> i8 {
        let phys = Board::physical_point(mover, canonical_point);
        let mine = self.point(mover, phys) as i8;
        if mine > 0 {
            return mine;
        }
        -(self.point(mover.other(), phys) as i8)
    }

    /// Total checkers `side` has on points 1..=24 plus bar plus off; should
    /// always equal `CHECKERS_PER_SIDE`.
    pub fn total(&self, side: Side) -> u32 {
        let mut total = self.bar(side) as u32 + self.off(side) as u32;
        for p in 1..=NUM_POINTS {
            total += self.point(side, p) as u32;
        }
        total
    }

    /// All 15 of `side`'s checkers borne off.
    #[inline]
    pub fn has_won(&self, side: Side) -> bool {
        self.off(side) == CHECKERS_PER_SIDE
    }

    /// `true` if every one of `side`'s checkers not yet off sits in its
    /// home board (canonical points 19..=24, the last six points before
    /// bearing off (since `src + die > 24` is what triggers a bear-off,
    /// see `moves::apply_move`), and none remain on the bar. This is the
    /// bear-off precondition.
    pub fn all_home(&self, side: Side) -> bool {
        if self.bar(side) > 0 {
            return false;
        }
        for canonical in 1..HOME_START {
            let phys = Board::physical_point(side, canonical);
            if self.point(side, phys) > 0 {
                return false;
            }
        }
        true
    }

    /// Canonical point of the checker farthest from bearing off, i.e. the
    /// smallest occupied point in `19..=24`. `None` if the home board is
    /// empty (already fully borne off or not yet all-home). Used by the
    /// over-bear rule: the farther a checker is, the more "distance" (in
    /// the usual 1..=6 ace-to-six-point sense) it has left, so this is the
    /// checker with the largest remaining distance.
    pub fn farthest_home_checker(&self, side: Side) -> Option<u8> {
        for canonical in HOME_START..=NUM_POINTS {
            let phys = Board::physical_point(side, canonical);
            if self.point(side, phys) > 0 {
                return Some(canonical);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_totals() {
        let b = Board::starting();
        assert_eq!(b.total(Side::P0), 15);
        assert_eq!(b.total(Side::P1), 15);
    }

    #[test]
    fn starting_position_canonical_symmetry() {
        let b = Board::starting();
        // Both sides see an identical canonical layout at the start.
        for i in 1..=24u8 {
            assert_eq!(b.view(Side::P0, i), b.view(Side::P1, i));
        }
        assert_eq!(b.view(Side::P0, 1), 2);
        assert_eq!(b.view(Side::P0, 12), 5);
        assert_eq!(b.view(Side::P0, 17), 3);
        assert_eq!(b.view(Side::P0, 19), 5);
    }

    #[test]
    fn incr_decr_roundtrip() {
        let mut b = Board::empty();
        b.incr(Side::P0, 5);
        b.incr(Side::P0, 5);
        assert_eq!(b.point(Side::P0, 5), 2);
        b.decr(Side::P0, 5);
        assert_eq!(b.point(Side::P0, 5), 1);
    }

    #[test]
    fn physical_point_is_an_involution() {
        for c in 1..=24u8 {
            let phys = Board::physical_point(Side::P1, c);
            assert_eq!(Board::canonical_point(Side::P1, phys), c);
        }
    }

    #[test]
    fn farthest_home_checker_and_all_home() {
        let mut b = Board::empty();
        b.incr(Side::P0, Board::physical_point(Side::P0, 20));
        b.incr(Side::P0, Board::physical_point(Side::P0, 23));
        assert!(b.all_home(Side::P0));
        assert_eq!(b.farthest_home_checker(Side::P0), Some(20));
    }

    #[test]
    fn not_all_home_with_checker_outside_home_board() {
        let mut b = Board::empty();
        b.incr(Side::P0, Board::physical_point(Side::P0, 18));
        assert!(!b.all_home(Side::P0));
    }
}
