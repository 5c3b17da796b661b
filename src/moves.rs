//! Move executor: applies a single source/die half-move to the board,
//! handling bar entry, hits, and bearing off (with over-bear).
//!
//! All coordinates taken here are canonical (mover-relative, travelling
//! toward 24, see `board::Board::physical_point`); the executor is the
//! only place that converts back to physical storage.

use crate::board::{Board, Side};
use crate::constants::LOC_BAR;

/// What happened as a result of applying one half-move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEffect {
    /// An opponent blot was hit and sent to the bar.
    pub hit: bool,
    /// The moving checker was borne off.
    pub borne_off: bool,
}

/// Canonical point a checker bears off from using `die`, honoring the
/// over-bear rule, or `None` if no checker can legally bear off with this
/// die. Requires `board.all_home(side)`.
///
/// Bear-off uses the classic ace-to-six-point distance labelling
/// (`label = 25 - canonical_point`, so the six-point (farthest from
/// home) is canonical point 19, and the ace-point is canonical point
/// 24). A die of value `d` bears off the checker at distance `d` exactly
/// if one exists; otherwise, if `d` exceeds every occupied distance, the
/// single farthest-out checker may over-bear with it.
pub fn bear_off_source(board: &Board, side: Side, die: u8) -> Option<u8> {
    if !board.all_home(side) {
        return None;
    }
    let exact_point = 25 - die;
    if board.point(side, exact_point) > 0 {
        return Some(exact_point);
    }
    let farthest = board.farthest_home_checker(side)?;
    let farthest_distance = 25 - farthest;
    if die > farthest_distance {
        Some(farthest)
    } else {
        None
    }
}

/// Is the canonical destination point blocked for `side` (opponent holds
/// two or more checkers there)?
fn blocked(board: &Board, side: Side, dest_canonical: u8) -> bool {
    let phys = Board::physical_point(side, dest_canonical);
    board.point(side.other(), phys) >= 2
}

/// Apply a half-move for `side` using one die. `src` is `LOC_BAR` (enter
/// from the bar) or a canonical point in `1..=24`. Caller is responsible
/// for only invoking this on legal, unblocked moves; in debug builds an
/// assertion catches a blocked destination.
pub fn apply_move(board: &mut Board, side: Side, src: u8, die: u8) -> MoveEffect {
    if src == LOC_BAR {
        let dest = die;
        debug_assert!(!blocked(board, side, dest), "entering onto a blocked point");
        let effect = hit_if_present(board, side, dest);
        board.decr(side, crate::constants::BAR_IDX);
        let phys = Board::physical_point(side, dest);
        board.incr(side, phys);
        return effect;
    }

    let dest_canonical = src + die;
    if dest_canonical > 24 {
        // Bear-off: caller must have already confirmed `bear_off_source`
        // returns `Some(src)` for this die.
        let phys_src = Board::physical_point(side, src);
        board.decr(side, phys_src);
        board.incr(side, crate::constants::OFF_IDX);
        return MoveEffect { hit: false, borne_off: true };
    }

    debug_assert!(!blocked(board, side, dest_canonical), "moving onto a blocked point");
    let effect = hit_if_present(board, side, dest_canonical);
    let phys_src = Board::physical_point(side, src);
    board.decr(side, phys_src);
    let phys_dest = Board::physical_point(side, dest_canonical);
    board.incr(side, phys_dest);
    effect
}

fn hit_if_present(board: &mut Board, side: Side, dest_canonical: u8) -> MoveEffect {
    let phys = Board::physical_point(side, dest_canonical);
    let opp = side.other();
    if board.point(opp, phys) == 1 {
        board.decr(opp, phys);
        board.incr(opp, crate::constants::BAR_IDX);
        MoveEffect { hit: true, borne_off: false }
    } else {
        MoveEffect { hit: false, borne_off: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_from_bar_and_hit_blot() {
        let mut board = Board::empty();
        board.incr(Side::P0, crate::constants::BAR_IDX);
        let entry_phys = Board::physical_point(Side::P0, 3);
        board.incr(Side::P1, entry_phys);
        let effect = apply_move(&mut board, Side::P0, LOC_BAR, 3);
        assert!(effect.hit);
        assert_eq!(board.bar(Side::P1), 1);
        assert_eq!(board.point(Side::P0, entry_phys), 1);
    }

    #[test]
    fn normal_move_relocates_checker() {
        let mut board = Board::starting();
        let src_phys = Board::physical_point(Side::P0, 1);
        assert_eq!(board.point(Side::P0, src_phys), 2);
        apply_move(&mut board, Side::P0, 1, 3);
        let dest_phys = Board::physical_point(Side::P0, 4);
        assert_eq!(board.point(Side::P0, src_phys), 1);
        assert_eq!(board.point(Side::P0, dest_phys), 1);
    }

    #[test]
    fn exact_bear_off() {
        let mut board = Board::empty();
        let p = Board::physical_point(Side::P0, 19); // distance 6
        board.incr(Side::P0, p);
        assert_eq!(bear_off_source(&board, Side::P0, 6), Some(19));
        let effect = apply_move(&mut board, Side::P0, 19, 6);
        assert!(effect.borne_off);
        assert_eq!(board.off(Side::P0), 1);
    }

    #[test]
    fn over_bear_from_farthest_checker_only() {
        // Checkers on canonical 20 and 23, die = 6. The 20-checker
        // (distance 5) blocks over-bearing the 23-checker (distance 2);
        // only 20 may use the 6.
        let mut board = Board::empty();
        board.incr(Side::P0, Board::physical_point(Side::P0, 20));
        board.incr(Side::P0, Board::physical_point(Side::P0, 23));
        assert_eq!(bear_off_source(&board, Side::P0, 6), Some(20));
    }

    #[test]
    fn no_bear_off_when_not_all_home() {
        let mut board = Board::empty();
        board.incr(Side::P0, Board::physical_point(Side::P0, 18));
        board.incr(Side::P0, Board::physical_point(Side::P0, 20));
        assert_eq!(bear_off_source(&board, Side::P0, 5), None);
    }
}
