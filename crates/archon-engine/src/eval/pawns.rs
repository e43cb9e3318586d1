//! Pawn structure evaluation.
//!
//! Evaluates doubled, isolated, passed, and linked pawns. All scores are
//! from White's perspective (positive = White advantage).

use archon_core::{Board, Color, PieceKind};

use crate::eval::score::{S, Score};

/// Penalty per extra pawn on the same file (beyond the first).
const DOUBLED_PAWN_PENALTY: Score = S(-15, -15);

/// Penalty for an isolated pawn (no friendly pawns on adjacent files).
const ISOLATED_PAWN_PENALTY: Score = S(-20, -20);

/// Bonus for a pawn standing beside or diagonally behind a friendly pawn.
const LINKED_PAWN_BONUS: Score = S(10, 10);

/// Middlegame passed-pawn bonus per squared step of advancement.
const PASSED_PAWN_STEP: i32 = 5;

/// One side's pawns as `(row, col)` pairs plus a per-file count.
struct PawnMap {
    pawns: Vec<(i32, i32)>,
    files: Vec<u8>,
}

impl PawnMap {
    fn new(board: &Board, color: Color) -> PawnMap {
        let size = board.size();
        let mut files = vec![0u8; size as usize];
        let pawns: Vec<(i32, i32)> = board
            .pieces_of(color)
            .filter(|&(_, kind)| kind == PieceKind::Pawn)
            .map(|(sq, _)| (sq.row(size) as i32, sq.col(size) as i32))
            .collect();
        for &(_, col) in &pawns {
            files[col as usize] += 1;
        }
        PawnMap { pawns, files }
    }

    fn file_count(&self, col: i32) -> u8 {
        if col < 0 {
            return 0;
        }
        self.files.get(col as usize).copied().unwrap_or(0)
    }

    fn has(&self, row: i32, col: i32) -> bool {
        self.pawns.contains(&(row, col))
    }
}

/// Passed-pawn bonus for a pawn `advance` steps beyond its home row.
///
/// Grows quadratically toward promotion; the endgame half is double the
/// middlegame half. A pawn protected by a friendly pawn earns 30% more.
pub fn passed_pawn_bonus(advance: i32, supported: bool) -> Score {
    let mut mg = advance * advance * PASSED_PAWN_STEP;
    if supported {
        mg = mg * 13 / 10;
    }
    S(mg, mg * 2)
}

/// Evaluate one side's pawn structure, returned from that side's perspective.
fn evaluate_side(board: &Board, color: Color, ours: &PawnMap, theirs: &PawnMap) -> Score {
    let size = board.size();
    let forward = color.forward() as i32;
    let mut score = Score::ZERO;

    for &count in &ours.files {
        if count > 1 {
            score += DOUBLED_PAWN_PENALTY * (count as i32 - 1);
        }
    }

    for &(row, col) in &ours.pawns {
        if ours.file_count(col - 1) == 0 && ours.file_count(col + 1) == 0 {
            score += ISOLATED_PAWN_PENALTY;
        }

        let protected = ours.has(row - forward, col - 1) || ours.has(row - forward, col + 1);
        let linked = ours.has(row, col - 1) || ours.has(row, col + 1);
        if protected || linked {
            score += LINKED_PAWN_BONUS;
        }

        let blocked_by_enemy = theirs
            .pawns
            .iter()
            .any(|&(er, ec)| (ec - col).abs() <= 1 && (er - row) * forward > 0);
        if !blocked_by_enemy {
            let advance = color.relative_row(row as u8, size) as i32 - 1;
            score += passed_pawn_bonus(advance.max(0), protected);
        }
    }

    score
}

/// Evaluate pawn structure from White's perspective.
pub fn evaluate_pawns(board: &Board) -> Score {
    let white = PawnMap::new(board, Color::White);
    let black = PawnMap::new(board, Color::Black);
    evaluate_side(board, Color::White, &white, &black)
        - evaluate_side(board, Color::Black, &black, &white)
}

#[cfg(test)]
mod tests {
    use archon_core::Board;

    use super::{
        DOUBLED_PAWN_PENALTY, ISOLATED_PAWN_PENALTY, LINKED_PAWN_BONUS, evaluate_pawns,
        passed_pawn_bonus,
    };
    use crate::eval::score::{S, Score};

    #[test]
    fn starting_positions_are_balanced() {
        assert_eq!(evaluate_pawns(&Board::standard()), Score::ZERO);
        assert_eq!(evaluate_pawns(&Board::classic()), Score::ZERO);
    }

    #[test]
    fn passed_bonus_grows_and_support_adds() {
        assert_eq!(passed_pawn_bonus(0, false), Score::ZERO);
        assert_eq!(passed_pawn_bonus(2, false), S(20, 40));
        assert_eq!(passed_pawn_bonus(2, true), S(26, 52));
        assert!(passed_pawn_bonus(5, false).eg() > passed_pawn_bonus(4, false).eg());
    }

    #[test]
    fn lone_passed_pawn() {
        // White pawn on e5 of 8×8: 3 steps past e2, isolated, passed.
        let board: Board = "4k3/8/8/4P3/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let expected = ISOLATED_PAWN_PENALTY + passed_pawn_bonus(3, false);
        assert_eq!(evaluate_pawns(&board), expected);
    }

    #[test]
    fn doubled_isolated_pawns_blocked_by_enemy() {
        // White e2+e3 are doubled and isolated; the pawns on the d and e files
        // stand in front of each other, so nobody is passed.
        let board: Board = "4k3/3p4/8/8/8/4P3/4P3/4K3 w - - 0 1".parse().unwrap();
        let white = DOUBLED_PAWN_PENALTY + ISOLATED_PAWN_PENALTY * 2;
        let black = ISOLATED_PAWN_PENALTY;
        assert_eq!(evaluate_pawns(&board), white - black);
    }

    #[test]
    fn protected_pawns_are_linked() {
        // d4 protected by e3, both passed.
        let board: Board = "4k3/8/8/8/3P4/4P3/8/4K3 w - - 0 1".parse().unwrap();
        let score = evaluate_pawns(&board);
        let expected =
            LINKED_PAWN_BONUS + passed_pawn_bonus(2, true) + passed_pawn_bonus(1, false);
        assert_eq!(score, expected);
    }

    #[test]
    fn mirrored_structure_negates() {
        let board: Board = "4k3/pp6/8/2P5/8/1P6/P7/4K3 w - - 0 1".parse().unwrap();
        assert_eq!(evaluate_pawns(&board), -evaluate_pawns(&board.mirrored()));
    }
}
