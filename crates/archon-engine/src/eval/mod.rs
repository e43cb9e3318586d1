//! Handcrafted evaluation: material, piece-square bonuses, pawn structure,
//! king safety, mobility, attack pressure, mop-up, and tempo.

pub mod endgame;
pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod pawns;
pub mod personality;
pub mod phase;
pub mod pst;
pub mod score;

use archon_core::{Board, Color};

use self::endgame::mop_up;
use self::king_safety::{attack_pressure, evaluate_king_safety};
use self::material::material;
use self::mobility::evaluate_mobility;
use self::pawns::evaluate_pawns;
use self::personality::Personality;
use self::phase::{MAX_PHASE, game_phase};
use self::pst::psqt;
use self::score::{S, Score};

/// Bonus for the side to move.
const TEMPO: Score = S(10, 5);

/// Sum of every term from White's perspective, before tapering.
pub fn evaluate_terms(board: &Board, personality: Personality) -> Score {
    let w = personality.weights();
    let mut score = material(board).scaled(w.material)
        + psqt(board)
        + evaluate_pawns(board).scaled(w.pawn_structure)
        + evaluate_king_safety(board).scaled(w.king_safety)
        + evaluate_mobility(board)
        + attack_pressure(board).scaled(w.attack)
        + mop_up(board);

    match board.side_to_move() {
        Color::White => score += TEMPO,
        Color::Black => score -= TEMPO,
    }
    score
}

/// Static evaluation in centipawns from `perspective`'s point of view.
///
/// Positive means `perspective` is better. The tempo bonus always goes to
/// the side to move, so mirroring the board (rows flipped, colors and turn
/// swapped) negates the White-perspective score.
pub fn evaluate(board: &Board, perspective: Color, personality: Personality) -> i32 {
    let white = evaluate_terms(board, personality).taper(game_phase(board), MAX_PHASE);
    match perspective {
        Color::White => white,
        Color::Black => -white,
    }
}
