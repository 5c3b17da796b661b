//! Observation encoder: perspective-canonical feature tensors in three
//! tiers (minimal / full / biased) and three layouts (3D / flat / hybrid),
//! nine variants total.
//!
//! Tiers nest: a `Full` buffer's first `Minimal::CHANNELS` channels equal
//! the `Minimal` buffer for the same game state, and likewise `Biased`
//! over `Full`. Board-local channels are spatial (one value per canonical
//! point, 1..=24); every other channel is a scalar broadcast across the
//! spatial axis.
//!
//! The "biased" tier's channel list is fixed here: five prime-length
//! indicators (length 2..=6) per side, an opponent-home-board anchor
//! count per side, a blot count per side, and a direct-shot builder count
//! per side: sixteen channels, documented channel-by-channel below.

use crate::board::{Board, Side};
use crate::cube::CubeOwner;
use crate::dice::Dice;
use crate::game::{Game, Phase};

/// Board-local channel count, identical across every tier: six
/// threshold indicators ("has >= k checkers here", k=1..=6) per side.
pub const BOARD_CHANNELS: usize = 12;
/// Non-spatial channel count added at the minimal tier: dice one-hots,
/// move-count one-hot, off-count scalars, cube/match block.
pub const MINIMAL_GLOBALS: usize = 30;
/// Non-spatial channels the full tier adds over minimal.
pub const FULL_EXTRA_GLOBALS: usize = 9;
/// Non-spatial channels the biased tier adds over full.
pub const BIASED_EXTRA_GLOBALS: usize = 16;

/// Width of the spatial axis in the 3D and hybrid layouts: my bar (0),
/// canonical points 1..=24, opponent bar (25).
pub const SPATIAL_WIDTH: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Minimal,
    Full,
    Biased,
}

impl Tier {
    fn global_channels(self) -> usize {
        match self {
            Tier::Minimal => MINIMAL_GLOBALS,
            Tier::Full => MINIMAL_GLOBALS + FULL_EXTRA_GLOBALS,
            Tier::Biased => MINIMAL_GLOBALS + FULL_EXTRA_GLOBALS + BIASED_EXTRA_GLOBALS,
        }
    }

    fn total_channels(self) -> usize {
        BOARD_CHANNELS + self.global_channels()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    ThreeD,
    Flat,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationVariant {
    pub tier: Tier,
    pub layout: Layout,
}

impl Default for ObservationVariant {
    fn default() -> Self {
        ObservationVariant { tier: Tier::Minimal, layout: Layout::ThreeD }
    }
}

/// Output size for a given observation variant: a single contiguous
/// buffer for the 3D and flat layouts, or a board/globals pair for hybrid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObsDims {
    Single(usize),
    Hybrid { board: usize, globals: usize },
}

pub fn obs_dims(variant: ObservationVariant) -> ObsDims {
    let board_elems = BOARD_CHANNELS * 24;
    let global_elems = variant.tier.global_channels();
    match variant.layout {
        Layout::ThreeD => ObsDims::Single(variant.tier.total_channels() * SPATIAL_WIDTH),
        Layout::Flat => ObsDims::Single(board_elems + global_elems),
        Layout::Hybrid => ObsDims::Hybrid { board: BOARD_CHANNELS * SPATIAL_WIDTH, globals: global_elems },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    ThreeD(Vec<f32>),
    Flat(Vec<f32>),
    Hybrid { board: Vec<f32>, globals: Vec<f32> },
}

/// Spatial (per-canonical-point) value for one of the 12 board channels.
/// `channel` 0..=5 is "mine has >= k checkers", k = channel+1; 6..=11 is
/// the same for the opponent.
fn board_channel_values(board: &Board, mover: Side, channel: usize) -> [f32; 24] {
    let (side, k) = if channel < 6 { (mover, channel + 1) } else { (mover.other(), channel - 6 + 1) };
    let mut out = [0.0f32; 24];
    for (i, slot) in out.iter_mut().enumerate() {
        let canonical = (i + 1) as u8;
        let phys = Board::physical_point(mover, canonical);
        *slot = if board.point(side, phys) as usize >= k { 1.0 } else { 0.0 };
    }
    out
}

/// Build the fixed-order minimal scalar block: dice one-hots (12),
/// move-count one-hot (4), off scalars (2), cube/match block (12).
fn minimal_globals(game: &mut Game) -> Vec<f32> {
    let mut v = Vec::with_capacity(MINIMAL_GLOBALS);

    let dice = game.dice();
    push_die_one_hot(&mut v, dice, true);
    push_die_one_hot(&mut v, dice, false);

    push_move_count_one_hot(&mut v, game);

    let side = game.current_player();
    v.push(game.board().off(side) as f32 / 15.0);
    v.push(game.board().off(side.other()) as f32 / 15.0);

    push_cube_match_block(&mut v, game);

    debug_assert_eq!(v.len(), MINIMAL_GLOBALS);
    v
}

fn push_die_one_hot(v: &mut Vec<f32>, dice: Dice, high_slot: bool) {
    let value = if high_slot { dice.high } else { dice.low };
    for face in 1..=6u8 {
        v.push(if value == face { 1.0 } else { 0.0 });
    }
}

fn push_move_count_one_hot(v: &mut Vec<f32>, game: &mut Game) {
    let mut one_hot = [0.0f32; 4];
    if !game.is_chance_node() {
        let actions = game.legal_actions();
        let totally_blocked = actions.len() == 1
            && actions[0] == crate::constants::encode_action(crate::constants::LOC_PASS, crate::constants::LOC_PASS);
        if !totally_blocked {
            let k = actions.len().clamp(1, 4);
            one_hot[k - 1] = 1.0;
        }
    }
    v.extend_from_slice(&one_hot);
}

fn push_cube_match_block(v: &mut Vec<f32>, game: &Game) {
    let phase = game.phase();
    v.push(if phase == Phase::CubeDecision { 1.0 } else { 0.0 });
    v.push(if phase == Phase::CubeResponse { 1.0 } else { 0.0 });
    v.push(if phase == Phase::CheckerPlay { 1.0 } else { 0.0 });

    let cube = game.cube();
    v.push((cube.value as f32).log2() / 6.0);
    let side = game.current_player();
    v.push(if cube.owner == CubeOwner::Side(side) { 1.0 } else { 0.0 });
    v.push(if cube.owner == CubeOwner::None { 1.0 } else { 0.0 });
    v.push(if cube.may_double(side) { 1.0 } else { 0.0 });

    let match_state = game.match_state();
    v.push(if match_state.is_money_play() { 1.0 } else { 0.0 });
    v.push(normalized_away(match_state.away_for(side)));
    v.push(normalized_away(match_state.away_for(side.other())));
    v.push(if match_state.is_crawford { 1.0 } else { 0.0 });
    v.push(if match_state.is_post_crawford { 1.0 } else { 0.0 });
}

fn normalized_away(away: u32) -> f32 {
    if away == u32::MAX {
        0.0
    } else {
        (away as f32 / 25.0).min(1.0)
    }
}

/// The nine full-tier additions over minimal: dice sum/diff, normalised
/// pip counts, a contact indicator, straggler fractions, and bar
/// fractions, each per side where applicable.
fn full_extra_globals(game: &Game) -> Vec<f32> {
    let side = game.current_player();
    let opp = side.other();
    let dice = game.dice();

    let mut v = Vec::with_capacity(FULL_EXTRA_GLOBALS);
    v.push((dice.high as f32 + dice.low as f32) / 36.0);
    v.push((dice.high as i32 - dice.low as i32).unsigned_abs() as f32 / 5.0);

    let pip_mine = game.pip_count(side) as f32 / 167.0;
    let pip_opp = game.pip_count(opp) as f32 / 167.0;
    v.push(pip_mine);
    v.push(pip_opp);

    v.push(if has_contact(game.board(), side) { 1.0 } else { 0.0 });

    v.push(straggler_fraction(game.board(), side));
    v.push(straggler_fraction(game.board(), opp));

    v.push(game.board().bar(side) as f32 / 15.0);
    v.push(game.board().bar(opp) as f32 / 15.0);

    debug_assert_eq!(v.len(), FULL_EXTRA_GLOBALS);
    v
}

/// `true` if any checker of either side still has a checker of the other
/// ahead of it on the board, i.e. hits remain possible.
fn has_contact(board: &Board, side: Side) -> bool {
    for canonical in 1..=24u8 {
        let phys = Board::physical_point(side, canonical);
        if board.point(side, phys) > 0 {
            // Everything still ahead of `canonical` (closer to bearing off)
            // that the opponent occupies is contact.
            for ahead in (canonical + 1)..=24u8 {
                let opp_phys = Board::physical_point(side, ahead);
                if board.point(side.other(), opp_phys) > 0 {
                    return true;
                }
            }
        }
    }
    board.bar(side.other()) > 0
}

/// Fraction of `side`'s checkers still in the opponent's half of the
/// board (canonical point < 13): the checkers with the farthest to go.
fn straggler_fraction(board: &Board, side: Side) -> f32 {
    let mut stragglers = 0u32;
    for canonical in 1..13u8 {
        let phys = Board::physical_point(side, canonical);
        stragglers += board.point(side, phys) as u32;
    }
    stragglers as f32 / crate::constants::CHECKERS_PER_SIDE as f32
}

/// The sixteen biased-tier additions: prime-length indicators, home-board
/// anchors, blots, and builders, each computed per side.
fn biased_extra_globals(game: &Game) -> Vec<f32> {
    let side = game.current_player();
    let opp = side.other();
    let mut v = Vec::with_capacity(BIASED_EXTRA_GLOBALS);

    for s in [side, opp] {
        for len in 2..=6u8 {
            v.push(if has_prime_of_length(game.board(), s, len) { 1.0 } else { 0.0 });
        }
    }
    for s in [side, opp] {
        v.push(opponent_home_anchor_count(game.board(), s) as f32);
    }
    for s in [side, opp] {
        v.push(blot_count(game.board(), s) as f32 / 15.0);
    }
    for s in [side, opp] {
        v.push(builder_count(game.board(), s) as f32 / 15.0);
    }

    debug_assert_eq!(v.len(), BIASED_EXTRA_GLOBALS);
    v
}

/// `true` if `side` holds `len` or more consecutive made points (>= 2
/// checkers each) somewhere on the board.
fn has_prime_of_length(board: &Board, side: Side, len: u8) -> bool {
    let mut run = 0u8;
    for canonical in 1..=24u8 {
        let phys = Board::physical_point(side, canonical);
        if board.point(side, phys) >= 2 {
            run += 1;
            if run >= len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Made points (>= 2 checkers) `side` holds inside the opponent's home
/// board (canonical 19..=24): an advanced anchor.
fn opponent_home_anchor_count(board: &Board, side: Side) -> u8 {
    let mut count = 0u8;
    for canonical in 19..=24u8 {
        let phys = Board::physical_point(side, canonical);
        if board.point(side, phys) >= 2 {
            count += 1;
        }
    }
    count
}

/// Points where `side` has exactly one checker: a hittable blot.
fn blot_count(board: &Board, side: Side) -> u8 {
    let mut count = 0u8;
    for canonical in 1..=24u8 {
        let phys = Board::physical_point(side, canonical);
        if board.point(side, phys) == 1 {
            count += 1;
        }
    }
    count
}

/// Checkers sitting within direct-shot range (1..=6) behind one of
/// `side`'s own blots or made points, available to cover or extend it.
fn builder_count(board: &Board, side: Side) -> u8 {
    let mut count = 0u8;
    for target in 1..=24u8 {
        let target_phys = Board::physical_point(side, target);
        if board.point(side, target_phys) == 0 {
            continue;
        }
        for d in 1..=6u8 {
            if target <= d {
                continue;
            }
            let source = target - d;
            let source_phys = Board::physical_point(side, source);
            if board.point(side, source_phys) > 0 {
                count += 1;
                break;
            }
        }
    }
    count
}

fn tier_globals(game: &mut Game, tier: Tier) -> Vec<f32> {
    let mut v = minimal_globals(game);
    if matches!(tier, Tier::Full | Tier::Biased) {
        v.extend(full_extra_globals(game));
    }
    if tier == Tier::Biased {
        v.extend(biased_extra_globals(game));
    }
    v
}

/// Render the full observation for `game` under `variant`, regenerating
/// the legal-action cache first if a prior mutation left it stale (the
/// move-count channel reads it).
pub fn observe(game: &mut Game, variant: ObservationVariant) -> Observation {
    let side = game.current_player();
    let board_channels: Vec<[f32; 24]> =
        (0..BOARD_CHANNELS).map(|c| board_channel_values(game.board(), side, c)).collect();
    let globals = tier_globals(game, variant.tier);

    match variant.layout {
        Layout::ThreeD => {
            let mut out = Vec::with_capacity(variant.tier.total_channels() * SPATIAL_WIDTH);
            for channel in &board_channels {
                out.push(0.0); // my bar
                out.extend_from_slice(channel);
                out.push(0.0); // opponent bar
            }
            for g in &globals {
                out.extend(std::iter::repeat_n(*g, SPATIAL_WIDTH));
            }
            Observation::ThreeD(out)
        }
        Layout::Flat => {
            let mut out = Vec::with_capacity(BOARD_CHANNELS * 24 + globals.len());
            for channel in &board_channels {
                out.extend_from_slice(channel);
            }
            out.extend(&globals);
            Observation::Flat(out)
        }
        Layout::Hybrid => {
            let mut board = Vec::with_capacity(BOARD_CHANNELS * SPATIAL_WIDTH);
            for channel in &board_channels {
                board.push(0.0);
                board.extend_from_slice(channel);
                board.push(0.0);
            }
            Observation::Hybrid { board, globals }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obs_dims_match_observe_output_len() {
        for tier in [Tier::Minimal, Tier::Full, Tier::Biased] {
            for layout in [Layout::ThreeD, Layout::Flat, Layout::Hybrid] {
                let variant = ObservationVariant { tier, layout };
                let mut g = Game::new();
                let obs = observe(&mut g, variant);
                match (obs_dims(variant), obs) {
                    (ObsDims::Single(n), Observation::ThreeD(v)) => assert_eq!(n, v.len()),
                    (ObsDims::Single(n), Observation::Flat(v)) => assert_eq!(n, v.len()),
                    (ObsDims::Hybrid { board, globals }, Observation::Hybrid { board: b, globals: g2 }) => {
                        assert_eq!(board, b.len());
                        assert_eq!(globals, g2.len());
                    }
                    other => panic!("layout/observation mismatch: {other:?}"),
                }
            }
        }
    }

    #[test]
    fn minimal_is_a_prefix_of_full_is_a_prefix_of_biased() {
        let mut g = Game::new();
        let minimal = match observe(&mut g, ObservationVariant { tier: Tier::Minimal, layout: Layout::Flat }) {
            Observation::Flat(v) => v,
            _ => unreachable!(),
        };
        let full = match observe(&mut g, ObservationVariant { tier: Tier::Full, layout: Layout::Flat }) {
            Observation::Flat(v) => v,
            _ => unreachable!(),
        };
        let biased = match observe(&mut g, ObservationVariant { tier: Tier::Biased, layout: Layout::Flat }) {
            Observation::Flat(v) => v,
            _ => unreachable!(),
        };
        assert_eq!(&full[..minimal.len()], &minimal[..]);
        assert_eq!(&biased[..full.len()], &full[..]);
    }

    #[test]
    fn opening_board_reports_two_checkers_on_point_one() {
        let mut g = Game::new();
        let board = match observe(&mut g, ObservationVariant { tier: Tier::Minimal, layout: Layout::Flat }) {
            Observation::Flat(v) => v,
            _ => unreachable!(),
        };
        // Channel 0 ("mine has >=1") at canonical point 1 (first 24 values).
        assert_eq!(board[0], 1.0);
        // Channel 1 ("mine has >=2") at point 1 is also set (starts with 2).
        assert_eq!(board[24], 1.0);
        // Channel 2 ("mine has >=3") at point 1 is not.
        assert_eq!(board[48], 0.0);
    }

    #[test]
    fn starting_position_has_contact_and_no_primes() {
        let mut g = Game::new();
        assert!(has_contact(g.board(), Side::P0));
        assert!(!has_prime_of_length(g.board(), Side::P0, 3));
        let _ = tier_globals(&mut g, Tier::Biased);
    }
}
