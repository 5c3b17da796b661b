//! End-to-end scenario tests: cube transactions, Jacoby, Crawford, forced
//! higher-die, bar priority, and over-bear, each played out through the
//! public `Game`/`turn` API rather than unit-testing a single function.

#[cfg(test)]
mod tests {
    use crate::board::{Board, Side};
    use crate::constants::{self, ACTION_DOUBLE, ACTION_PASS, ACTION_TAKE, LOC_BAR, LOC_PASS};
    use crate::dice::Dice;
    use crate::game::{Game, Phase};
    use crate::turn::compute_game_reward;

    /// A fresh game starts at a chance node (the opening roll); advance it to
    /// a `CubeDecision` for P0 the way the turn driver would at the start of
    /// any later turn, without touching the private game state.
    fn at_cube_decision_for_p0() -> Game {
        let mut g = Game::new();
        g.switch_turn();
        g.switch_turn();
        assert_eq!(g.current_player(), Side::P0);
        assert_eq!(g.phase(), Phase::CubeDecision);
        g
    }

    #[test]
    fn double_then_take_doubles_the_cube() {
        let mut g = at_cube_decision_for_p0();
        assert_eq!(g.cube().value, 1);

        g.apply_action(ACTION_DOUBLE).unwrap();
        assert_eq!(g.phase(), Phase::CubeResponse);
        assert_eq!(g.current_player(), Side::P1);
        assert_eq!(g.cube().value, 1);

        g.apply_action(ACTION_TAKE).unwrap();
        assert_eq!(g.cube().value, 2);
        assert_eq!(g.current_player(), Side::P0);
        assert_eq!(g.phase(), Phase::Chance);
        assert!(!g.game_terminated());
    }

    #[test]
    fn double_then_pass_scores_the_cube_value() {
        let mut g = at_cube_decision_for_p0();
        g.apply_action(ACTION_DOUBLE).unwrap();
        g.apply_action(ACTION_PASS).unwrap();
        assert!(g.game_terminated());
        assert_eq!(g.winner(), Some(Side::P0));
        assert_eq!(g.reward(), 1.0);
    }

    /// Play one full checker-play turn: roll a fixed chance outcome, then apply
    /// whatever the generator offers first until the turn driver hands control
    /// back (to a fresh chance node or the next player's cube decision).
    fn play_one_turn(g: &mut Game, outcome_index: u8) {
        g.apply_chance(outcome_index).unwrap();
        while g.phase() == Phase::CheckerPlay {
            let code = g.legal_actions()[0];
            g.apply_action(code).unwrap();
        }
    }

    #[test]
    fn double_then_pass_scores_a_preexisting_cube_value_of_four() {
        // Same shape as `double_then_pass_scores_the_cube_value`, but the cube
        // has already been doubled twice (to 4, owned by P0) through ordinary
        // play before the final double; passing on it awards the full
        // pre-double cube value (4), not a re-doubled 8.
        let mut g = at_cube_decision_for_p0();

        g.apply_action(ACTION_DOUBLE).unwrap(); // P0 -> P1, cube still 1
        g.apply_action(ACTION_TAKE).unwrap(); // cube = 2, owner P1, back to P0, Chance
        play_one_turn(&mut g, 1); // P0's turn; switch_turn hands P1 a CubeDecision (owns the cube)

        g.apply_action(ACTION_DOUBLE).unwrap(); // P1 -> P0, cube still 2
        g.apply_action(ACTION_TAKE).unwrap(); // cube = 4, owner P0, back to P1, Chance
        play_one_turn(&mut g, 1); // P1's turn; switch_turn hands P0 a CubeDecision (owns the cube)

        assert_eq!(g.cube().value, 4);
        g.apply_action(ACTION_DOUBLE).unwrap(); // P0 -> P1, cube still 4
        g.apply_action(ACTION_PASS).unwrap();
        assert!(g.game_terminated());
        assert_eq!(g.winner(), Some(Side::P0));
        assert_eq!(g.reward(), 4.0);
    }

    #[test]
    fn jacoby_suppresses_gammon_scoring_at_an_undoubled_cube() {
        let mut board = Board::empty();
        for _ in 0..15 {
            board.incr(Side::P0, constants::OFF_IDX);
        }
        for _ in 0..15 {
            board.incr(Side::P1, Board::physical_point(Side::P1, 12));
        }
        assert_eq!(compute_game_reward(&board, Side::P0, 1, true), 1.0);
        // With cube already at 2, the gammon clamp no longer applies.
        assert_eq!(compute_game_reward(&board, Side::P0, 2, true), 4.0);
    }

    #[test]
    fn crawford_disables_the_cube_for_both_sides() {
        let mut g = Game::new();
        g.init_match_game(4, 6, 7, true);
        assert!(!g.cube().may_double(Side::P0));
        assert!(!g.cube().may_double(Side::P1));

        g.apply_chance(1).unwrap();
        for code in g.legal_actions() {
            assert_ne!(*code, ACTION_DOUBLE);
        }
    }

    #[test]
    fn forced_higher_die_never_leaves_a_lower_only_option_when_higher_is_playable() {
        let mut board = Board::empty();
        board.incr(Side::P0, Board::physical_point(Side::P0, 10));
        let blocker = Board::physical_point(Side::P0, 19);
        board.incr(Side::P1, blocker);
        board.incr(Side::P1, blocker);

        let actions = crate::actions::checker_actions(&board, Side::P0, Dice { high: 6, low: 3 }, 1);
        assert!(!actions.is_empty());
        for code in &actions {
            let (hi, _lo) = constants::decode_action(*code);
            assert_ne!(hi, LOC_PASS, "a lower-only action survived although the higher die is playable");
        }
    }

    #[test]
    fn bar_priority_forces_bar_entry_as_a_source() {
        let mut board = Board::starting();
        board.incr(Side::P0, constants::BAR_IDX);

        let actions = crate::actions::checker_actions(&board, Side::P0, Dice { high: 4, low: 2 }, 1);
        assert!(!actions.is_empty());
        for code in &actions {
            let (hi, lo) = constants::decode_action(*code);
            assert!(hi == LOC_BAR || lo == LOC_BAR);
        }
    }

    #[test]
    fn over_bear_only_from_the_farthest_checker() {
        let mut board = Board::empty();
        board.incr(Side::P0, Board::physical_point(Side::P0, 20));
        board.incr(Side::P0, Board::physical_point(Side::P0, 23));

        let actions = crate::actions::checker_actions(&board, Side::P0, Dice { high: 6, low: 1 }, 1);
        assert!(!actions.is_empty());
        for code in &actions {
            let (hi, _lo) = constants::decode_action(*code);
            // `hi` always consumes the high die (6); the 23-checker is only
            // one pip from bearing off exactly, so it must never be the one
            // that uses the 6 to over-bear while 20 is still on the board.
            assert_ne!(hi, 23, "23-checker illegally over-bore with the 6: action {code}");
        }
    }
}
