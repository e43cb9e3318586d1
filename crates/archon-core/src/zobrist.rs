//! Zobrist hashing keys for position deduplication.
//!
//! Keys are generated at compile time from a fixed xorshift stream, so every
//! process and every worker agrees on the hash of a position.

use crate::board::Board;
use crate::color::Color;
use crate::piece::Piece;
use crate::square::Square;

const MAX_SQUARES: usize = (Square::MAX_SIZE as usize) * (Square::MAX_SIZE as usize);
const PIECE_KEY_COUNT: usize = Piece::COUNT * MAX_SQUARES;

/// Key for each (colored piece, square). Indexed by `[Piece::index()][Square::index()]`.
pub(crate) static PIECE_SQUARE: [[u64; MAX_SQUARES]; Piece::COUNT] = {
    let mut table = [[0u64; MAX_SQUARES]; Piece::COUNT];
    let mut state = SEED;
    let mut piece = 0;
    while piece < Piece::COUNT {
        let mut sq = 0;
        while sq < MAX_SQUARES {
            let (val, next) = xorshift64(state);
            table[piece][sq] = val;
            state = next;
            sq += 1;
        }
        piece += 1;
    }
    table
};

/// Key XORed when Black is the side to move.
pub(crate) static SIDE_TO_MOVE: u64 = advance(PIECE_KEY_COUNT).0;

/// Keys for castling configurations. Indexed by `CastleRights::bits()`.
pub(crate) static CASTLING: [u64; 16] = key_block::<16>(PIECE_KEY_COUNT + 1);

/// Keys for the en passant column.
pub(crate) static EN_PASSANT_COL: [u64; Square::MAX_SIZE as usize] =
    key_block::<{ Square::MAX_SIZE as usize }>(PIECE_KEY_COUNT + 17);

const SEED: u64 = 0x4152_4348_4f4e_2121; // "ARCHON!!"

/// Xorshift64 PRNG. Returns (value, next_state).
const fn xorshift64(mut state: u64) -> (u64, u64) {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    (state, state)
}

/// Skip `skip` values of the stream and return the next one with its state.
const fn advance(skip: usize) -> (u64, u64) {
    let mut state = SEED;
    let mut i = 0;
    while i < skip {
        state = xorshift64(state).1;
        i += 1;
    }
    xorshift64(state)
}

/// `N` consecutive stream values starting after `skip` values.
const fn key_block<const N: usize>(skip: usize) -> [u64; N] {
    let mut table = [0u64; N];
    let (first, mut state) = advance(skip);
    table[0] = first;
    let mut idx = 1;
    while idx < N {
        let (val, next) = xorshift64(state);
        table[idx] = val;
        state = next;
        idx += 1;
    }
    table
}

/// Key for `piece` standing on `sq`.
#[inline]
pub(crate) fn piece_key(piece: Piece, sq: Square) -> u64 {
    PIECE_SQUARE[piece.index()][sq.index()]
}

/// Compute a Zobrist hash from scratch for the given board.
pub fn hash_from_scratch(board: &Board) -> u64 {
    let size = board.size();
    let mut hash = 0u64;

    for (sq, piece) in board.occupied_squares() {
        hash ^= piece_key(piece, sq);
    }

    if board.side_to_move() == Color::Black {
        hash ^= SIDE_TO_MOVE;
    }

    hash ^= CASTLING[board.castling().bits() as usize];

    if let Some(ep) = board.en_passant() {
        hash ^= EN_PASSANT_COL[ep.col(size) as usize];
    }

    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;

    #[test]
    fn classic_position_hash_matches_field() {
        let board = Board::classic();
        assert_ne!(board.hash(), 0);
        assert_eq!(board.hash(), hash_from_scratch(&board));
    }

    #[test]
    fn different_sizes_hash_differently() {
        assert_ne!(Board::classic().hash(), Board::standard().hash());
    }

    #[test]
    fn all_keys_are_unique() {
        let mut all_keys: Vec<u64> = PIECE_SQUARE.iter().flatten().copied().collect();
        all_keys.push(SIDE_TO_MOVE);
        all_keys.extend_from_slice(&CASTLING);
        all_keys.extend_from_slice(&EN_PASSANT_COL);

        let count = all_keys.len();
        all_keys.sort_unstable();
        all_keys.dedup();
        assert_eq!(all_keys.len(), count, "some Zobrist keys collide");
    }
}
