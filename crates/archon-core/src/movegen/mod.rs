//! Legal move generation.
//!
//! Pseudo-legal moves are produced per movement class, then each one is
//! made and undone in place and kept only if the mover's king is not left
//! attacked.

mod castling;
mod pawns;
mod pieces;

use crate::board::Board;
use crate::chess_move::Move;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;

use self::castling::gen_castling;
use self::pawns::gen_pawns;
use self::pieces::gen_pieces;

/// Growable buffer for generated moves.
///
/// A 16×16 board with several riders can exceed any small fixed bound, so
/// the list is heap-backed with a sensible starting capacity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    /// Create an empty move list.
    pub fn new() -> MoveList {
        MoveList {
            moves: Vec::with_capacity(64),
        }
    }

    /// Push a move onto the list.
    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Return the number of moves in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Return `true` if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Return `true` if `mv` is in the list.
    #[inline]
    pub fn contains(&self, mv: Move) -> bool {
        self.moves.contains(&mv)
    }

    /// Return a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    /// Return a mutable slice of the moves.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    /// Keep only moves for which `keep` returns `true`.
    #[inline]
    pub fn retain(&mut self, keep: impl FnMut(&Move) -> bool) {
        self.moves.retain(keep);
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    #[inline]
    fn index(&self, index: usize) -> &Move {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;
    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

/// Which pseudo-legal moves to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GenMode {
    /// Everything.
    All,
    /// Captures, en passant, and capturing promotions only.
    Captures,
}

/// Push `from -> to` if `to` is empty (non-capture modes only) or holds an
/// enemy piece other than the king. Returns `true` if the square was empty.
#[inline]
pub(crate) fn push_target(
    board: &Board,
    from: crate::square::Square,
    to: crate::square::Square,
    mode: GenMode,
    list: &mut MoveList,
) -> bool {
    let target = board.piece_at(to);
    if target.is_none() {
        if mode == GenMode::All {
            list.push(Move::new(from, to));
        }
        return true;
    }
    if is_enemy_non_king(board, target) {
        list.push(Move::new(from, to));
    }
    false
}

#[inline]
pub(crate) fn is_enemy_non_king(board: &Board, target: Piece) -> bool {
    target.is_color(board.side_to_move().flip()) && target.kind() != Some(PieceKind::King)
}

fn gen_pseudo(board: &Board, mode: GenMode, list: &mut MoveList) {
    gen_pawns(board, mode, list);
    gen_pieces(board, mode, list);
    if mode == GenMode::All {
        gen_castling(board, list);
    }
}

/// Drop moves that leave the mover's king attacked, playing each on `board`.
fn retain_legal(board: &mut Board, list: &mut MoveList) {
    let us = board.side_to_move();
    list.retain(|&mv| {
        let undo = board.make_move(mv);
        let legal = !board.in_check(us);
        board.undo_move(mv, undo);
        legal
    });
}

/// Fill `list` with the legal moves of the side to move, using `board` as the
/// scratch position. The board is restored before returning.
pub fn legal_moves_into(board: &mut Board, list: &mut MoveList) {
    gen_pseudo(board, GenMode::All, list);
    retain_legal(board, list);
}

/// Fill `list` with the legal captures of the side to move.
pub fn legal_captures_into(board: &mut Board, list: &mut MoveList) {
    gen_pseudo(board, GenMode::Captures, list);
    retain_legal(board, list);
}

/// Generate all legal moves for the current position.
///
/// An empty list means the side to move is mated or stalemated.
pub fn generate_legal_moves(board: &Board) -> MoveList {
    let mut scratch = board.clone();
    let mut list = MoveList::new();
    legal_moves_into(&mut scratch, &mut list);
    list
}

/// Generate the legal captures, en passant captures, and capturing promotions.
pub fn generate_legal_captures(board: &Board) -> MoveList {
    let mut scratch = board.clone();
    let mut list = MoveList::new();
    legal_captures_into(&mut scratch, &mut list);
    list
}

impl Board {
    /// Resolve coordinate notation such as `"e2e4"` or `"e8e9e"` to a legal move.
    ///
    /// A promotion without a suffix resolves to the angel promotion.
    pub fn find_move(&self, notation: &str) -> Option<Move> {
        let moves = generate_legal_moves(self);
        let size = self.size();
        if let Some(mv) = moves.as_slice().iter().find(|mv| mv.notation(size) == notation) {
            return Some(*mv);
        }
        moves
            .as_slice()
            .iter()
            .find(|mv| {
                mv.promotion() == Some(PieceKind::Angel)
                    && mv.notation(size).strip_suffix(PieceKind::Angel.symbol()) == Some(notation)
            })
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::color::Color;
    use crate::square::Square;

    fn board(layout: &str) -> Board {
        layout.parse().unwrap()
    }

    fn sq(b: &Board, name: &str) -> Square {
        Square::parse(name, b.size()).unwrap()
    }

    #[test]
    fn standard_start_has_20_moves() {
        let moves = generate_legal_moves(&Board::standard());
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn classic_start_move_count() {
        let board = Board::classic();
        let moves = generate_legal_moves(&board);
        let pawn_moves = moves
            .as_slice()
            .iter()
            .filter(|m| board.piece_at(m.source()).kind() == Some(PieceKind::Pawn))
            .count();
        assert_eq!(pawn_moves, 18);
        let knightish = moves.len() - pawn_moves;
        // Knights, archbishop, and chancellor each have two leaps.
        assert_eq!(knightish, 8);
    }

    #[test]
    fn lone_king_on_5x5_has_5_moves() {
        let b = board("4k/5/5/5/2K2 w - - 0 1");
        assert_eq!(generate_legal_moves(&b).len(), 5);
    }

    #[test]
    fn pinned_knight_has_no_moves() {
        let b = board("4r2k/8/8/8/8/8/4N3/4K3 w - - 0 1");
        let moves = generate_legal_moves(&b);
        assert!(moves.as_slice().iter().all(|m| m.source() != sq(&b, "e2")));
    }

    #[test]
    fn double_check_only_king_moves() {
        let b = board("4r1k1/8/8/8/8/5n2/8/4K3 w - - 0 1");
        let moves = generate_legal_moves(&b);
        assert!(!moves.is_empty());
        for mv in &moves {
            assert_eq!(b.piece_at(mv.source()).kind(), Some(PieceKind::King));
        }
    }

    #[test]
    fn no_move_leaves_king_attacked() {
        let b = board("4k3/8/8/8/1b6/8/3P4/4K3 w - - 0 1");
        let mut scratch = b.clone();
        for mv in &generate_legal_moves(&b) {
            let undo = scratch.make_move(*mv);
            assert!(!scratch.in_check(Color::White), "{mv:?} leaves king in check");
            scratch.undo_move(*mv, undo);
        }
        assert_eq!(scratch, b);
    }

    #[test]
    fn king_is_never_captured() {
        // Black is left in check with White to move; the rook must not take the king.
        let b = board("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1");
        let moves = generate_legal_moves(&b);
        assert!(!moves.is_empty());
        for mv in &moves {
            assert_ne!(b.piece_at(mv.dest()).kind(), Some(PieceKind::King));
        }
    }

    #[test]
    fn checkmate_and_stalemate_have_no_moves() {
        let mate = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(mate.in_check(Color::Black));
        assert!(generate_legal_moves(&mate).is_empty());

        let stalemate = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!stalemate.in_check(Color::Black));
        assert!(generate_legal_moves(&stalemate).is_empty());
    }

    #[test]
    fn en_passant_is_generated() {
        let b = board("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let moves = generate_legal_moves(&b);
        assert_eq!(moves.as_slice().iter().filter(|m| m.is_en_passant()).count(), 1);
    }

    #[test]
    fn en_passant_discovered_check_is_illegal() {
        let b = board("4k3/8/8/KPp4r/8/8/8/8 w - c6 0 1");
        let moves = generate_legal_moves(&b);
        assert_eq!(moves.as_slice().iter().filter(|m| m.is_en_passant()).count(), 0);
    }

    #[test]
    fn promotion_offers_every_kind() {
        let b = board("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        let moves = generate_legal_moves(&b);
        let promos: Vec<_> = moves.as_slice().iter().filter(|m| m.is_promotion()).collect();
        assert_eq!(promos.len(), PieceKind::PROMOTIONS.len());
        assert_eq!(promos[0].promotion(), Some(PieceKind::Angel));
    }

    #[test]
    fn sliders_stop_at_blocked_squares() {
        let b = board("***3***/***1k1***/***3***/9/R7K/9/***3***/***3***/***3*** w - - 0 1");
        let moves = generate_legal_moves(&b);
        let rook = sq(&b, "a5");
        let rook_moves: Vec<_> = moves
            .as_slice()
            .iter()
            .filter(|m| m.source() == rook)
            .map(|m| m.dest())
            .collect();
        // b5..h5 along the rank, then a6 and a4 before the cut-away corners.
        assert_eq!(rook_moves.len(), 9);
        assert!(rook_moves.iter().all(|d| (3..=5).contains(&d.row(9))));
        assert!(rook_moves.iter().all(|d| !b.is_blocked(*d)));
    }

    #[test]
    fn captures_only_lists_captures() {
        let b = board("4k3/8/8/3p4/8/4N3/8/4K3 w - - 0 1");
        let captures = generate_legal_captures(&b);
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].dest(), sq(&b, "d5"));
    }

    #[test]
    fn find_move_resolves_notation() {
        let b = Board::classic();
        let mv = b.find_move("e2e4").unwrap();
        assert_eq!(mv.source(), sq(&b, "e2"));
        assert!(b.find_move("e2e6").is_none());

        let p = board("4k3/P7/8/8/8/8/8/4K3 w - - 0 1");
        assert_eq!(p.find_move("a7a8").and_then(|m| m.promotion()), Some(PieceKind::Angel));
        assert_eq!(p.find_move("a7a8n").and_then(|m| m.promotion()), Some(PieceKind::Knight));
    }
}
