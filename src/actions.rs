//! Legal-action generator and its cache.
//!
//! The hardest part of the engine: enumerates every distinct joint action
//! for the dice currently showing, enforcing bar-priority, maximal dice
//! usage, higher-die preference (non-doubles), and correct handling of
//! doubles (up to four uses of the same die value, emitted two at a
//! time).

use crate::board::{Board, Side};
use crate::constants::{
    encode_action, ACTION_DOUBLE, ACTION_NO_DOUBLE, ACTION_PASS, ACTION_TAKE, LOC_BAR, LOC_PASS,
};
use crate::dice::Dice;
use crate::moves::{apply_move, bear_off_source};

fn blocked(board: &Board, side: Side, dest_canonical: u8) -> bool {
    let phys = Board::physical_point(side, dest_canonical);
    board.point(side.other(), phys) >= 2
}

/// Every source location (`LOC_BAR` or a canonical point) from which
/// `side` can legally play `die` right now. Bar priority is enforced here
/// directly: if `side` has a checker on the bar, no other source is ever
/// returned.
fn legal_single_sources(board: &Board, side: Side, die: u8) -> Vec<u8> {
    if board.bar(side) > 0 {
        return if !blocked(board, side, die) { vec![LOC_BAR] } else { vec![] };
    }
    let bear_src = bear_off_source(board, side, die);
    let mut out = Vec::new();
    for p in 1..=24u8 {
        let phys = Board::physical_point(side, p);
        if board.point(side, phys) == 0 {
            continue;
        }
        let dest = p + die;
        if dest <= 24 {
            if !blocked(board, side, dest) {
                out.push(p);
            }
        } else if bear_src == Some(p) {
            out.push(p);
        }
    }
    out
}

/// One leaf of the ply search: the source chosen at each ply (`LOC_PASS`
/// once play is stuck) and how many of those were real moves.
struct Leaf {
    srcs: Vec<u8>,
    uses: usize,
}

/// Depth-first search over `dice_seq` (one die value per ply), speculatively
/// applying each candidate move to a cheap `Copy` board instead of
/// apply-then-undo (board words are two `u128`s, cheaper to clone than to
/// reverse a mutation).
fn search_plies(board: &Board, side: Side, dice_seq: &[u8]) -> Vec<Leaf> {
    let mut results = Vec::new();
    let mut acc = Vec::with_capacity(dice_seq.len());
    search_rec(*board, side, dice_seq, 0, &mut acc, &mut results);
    results
}

fn search_rec(board: Board, side: Side, dice_seq: &[u8], depth: usize, acc: &mut Vec<u8>, results: &mut Vec<Leaf>) {
    if depth == dice_seq.len() {
        let uses = acc.iter().filter(|&&s| s != LOC_PASS).count();
        results.push(Leaf { srcs: acc.clone(), uses });
        return;
    }
    let die = dice_seq[depth];
    let sources = legal_single_sources(&board, side, die);
    if sources.is_empty() {
        let mut srcs = acc.clone();
        srcs.resize(dice_seq.len(), LOC_PASS);
        let uses = srcs.iter().filter(|&&s| s != LOC_PASS).count();
        results.push(Leaf { srcs, uses });
        return;
    }
    for src in sources {
        let mut next = board;
        apply_move(&mut next, side, src, die);
        acc.push(src);
        search_rec(next, side, dice_seq, depth + 1, acc, results);
        acc.pop();
    }
}

/// Enumerate the legal joint checker actions for the current board, dice,
/// and how many joint actions remain this turn (2 for the first half of a
/// double, 1 otherwise). Returns encoded action codes, sorted and
/// deduplicated.
pub fn checker_actions(board: &Board, side: Side, dice: Dice, remaining_actions: u8) -> Vec<i32> {
    let pairs = if dice.is_double() {
        double_pairs(board, side, dice.high, remaining_actions)
    } else {
        non_double_pairs(board, side, dice.high, dice.low)
    };
    finalize(pairs)
}

fn double_pairs(board: &Board, side: Side, die: u8, remaining_actions: u8) -> Vec<(u8, u8)> {
    // remaining_actions == 2: this is the first of the two joint actions
    // for this double; look ahead across all four uses so the pair we
    // offer never strands an otherwise-achievable third/fourth use.
    // remaining_actions == 1: second joint action, plain depth-2 search
    // from the (already mutated) current board.
    let depth = if remaining_actions >= 2 { 4 } else { 2 };
    let dice_seq = vec![die; depth];
    let leaves = search_plies(board, side, &dice_seq);
    let max_uses = leaves.iter().map(|l| l.uses).max().unwrap_or(0);
    leaves
        .into_iter()
        .filter(|l| l.uses == max_uses)
        .map(|l| (l.srcs[0], l.srcs[1]))
        .collect()
}

fn non_double_pairs(board: &Board, side: Side, high: u8, low: u8) -> Vec<(u8, u8)> {
    let hi_lo = search_plies(board, side, &[high, low]);
    let lo_hi = search_plies(board, side, &[low, high]);

    let mut candidates: Vec<(u8, u8, usize)> = Vec::new();
    for leaf in hi_lo {
        // ply0 consumed `high`, ply1 consumed `low`.
        candidates.push((leaf.srcs[0], leaf.srcs[1], leaf.uses));
    }
    for leaf in lo_hi {
        // ply0 consumed `low`, ply1 consumed `high`.
        candidates.push((leaf.srcs[1], leaf.srcs[0], leaf.uses));
    }

    let max_uses = candidates.iter().map(|(_, _, u)| *u).max().unwrap_or(0);
    let mut maximal: Vec<(u8, u8)> = candidates
        .into_iter()
        .filter(|(_, _, u)| *u == max_uses)
        .map(|(hi, lo, _)| (hi, lo))
        .collect();

    // Higher-die preference: among maximal single-die actions, if the high
    // die is playable at all, only actions that used it survive. If the
    // high die cannot be played by itself from any source, the low-die
    // action stands (it's the only way to use a die this turn).
    if max_uses == 1 && maximal.iter().any(|(hi, _)| *hi != LOC_PASS) {
        maximal.retain(|(hi, _)| *hi != LOC_PASS);
    }
    maximal
}

fn finalize(pairs: Vec<(u8, u8)>) -> Vec<i32> {
    let mut codes: Vec<i32> = if pairs.is_empty() {
        vec![encode_action(LOC_PASS, LOC_PASS)]
    } else {
        pairs.into_iter().map(|(hi, lo)| encode_action(hi, lo)).collect()
    };
    codes.sort_unstable();
    codes.dedup();
    codes
}

/// Fixed cube-decision action set: always `NO_DOUBLE`, plus `DOUBLE` unless
/// `cube` can no longer double (see `Cube::may_double`'s `value < 64` cap).
pub fn cube_decision_actions(cube: &crate::cube::Cube, side: Side) -> Vec<i32> {
    if cube.may_double(side) {
        vec![ACTION_NO_DOUBLE, ACTION_DOUBLE]
    } else {
        vec![ACTION_NO_DOUBLE]
    }
}

/// Fixed cube-response action set.
pub fn cube_response_actions() -> Vec<i32> {
    vec![ACTION_TAKE, ACTION_PASS]
}

/// Lazily-populated, invalidate-on-mutation legal-action cache, owned by
/// the game object; invalidated on any mutation, regenerated on demand.
#[derive(Debug, Clone, Default)]
pub struct ActionCache {
    actions: Vec<i32>,
    valid: bool,
}

impl ActionCache {
    pub fn new() -> Self {
        ActionCache { actions: Vec::new(), valid: false }
    }

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Current contents without triggering regeneration; only meaningful
    /// when `is_valid()`.
    pub fn get(&self) -> &[i32] {
        &self.actions
    }

    pub fn fill(&mut self, actions: Vec<i32>) {
        self.actions = actions;
        self.valid = true;
    }
}
