//! Static tactical safety analysis.
//!
//! Everything here works on raw [`Board`] snapshots rather than full positions:
//! the analysis routinely looks at placements that are not legal positions
//! (pieces removed, a piece of the wrong colour put on a square, the other
//! side to move). A move counts as legal when it does not leave the mover's
//! own king attacked.

mod attackers;
mod danger;
mod defenders;
mod piece_safety;
mod trapped;

pub use attackers::{attacking_moves, direct_attacking_moves};
pub use danger::{
    has_danger_levels, move_creates_greater_threat, move_leaves_greater_threat, ThreatStrategy,
};
pub use defenders::defending_moves;
pub use piece_safety::{is_piece_safe, unsafe_pieces};
pub use trapped::is_piece_trapped;

use shakmaty::{
    attacks, Board, CastlingMode, Chess, Color, FromSetup, Position, PositionError, Setup,
};

use crate::board::{BoardPiece, RawMove};

/// Play `mv` on a copy of `board`.
///
/// Returns `None` when the moving piece is not on its origin square, the
/// destination holds a friendly piece, or the move leaves the mover's king
/// attacked.
pub fn simulate(board: &Board, mv: &RawMove) -> Option<Board> {
    let piece = board.piece_at(mv.from)?;
    if piece.color != mv.color || piece.role != mv.role {
        return None;
    }
    if board.piece_at(mv.to).is_some_and(|target| target.color == mv.color) {
        return None;
    }

    let mut after = board.clone();
    after.remove_piece_at(mv.from);
    after.set_piece_at(mv.to, mv.landed().piece());

    if king_attacked(&after, mv.color) {
        return None;
    }
    Some(after)
}

fn king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_of(color)
        .is_some_and(|king| board.attacks_to(king, !color, board.occupied()).any())
}

/// Legal moves of the piece on `piece.square`, castling excluded.
///
/// Only pieces are asked about, never pawns, so every move is along the
/// piece's attack set.
pub(crate) fn piece_moves(board: &Board, piece: &BoardPiece) -> Vec<RawMove> {
    let Some(actual) = board.piece_at(piece.square) else {
        return Vec::new();
    };
    let from = piece.square;
    let targets = attacks::attacks(from, actual, board.occupied()) & !board.by_color(actual.color);

    targets
        .into_iter()
        .map(|to| RawMove::new(actual, from, to))
        .filter(|mv| simulate(board, mv).is_some())
        .collect()
}

/// Whether `turn` has a move that checkmates on `board`.
///
/// Placements that do not form a valid position never have a mate.
pub(crate) fn has_mating_move(board: &Board, turn: Color) -> bool {
    let mut setup = Setup::empty();
    setup.board = board.clone();
    setup.turn = turn;

    let Ok(pos) = Chess::from_setup(setup, CastlingMode::Standard)
        .or_else(PositionError::ignore_too_much_material)
        .or_else(PositionError::ignore_impossible_check)
    else {
        return false;
    };

    pos.legal_moves().iter().any(|m| {
        let mut after = pos.clone();
        after.play_unchecked(m);
        after.is_checkmate()
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use shakmaty::fen::Fen;
    use shakmaty::{Board, CastlingMode, Chess, Square};

    use crate::board::BoardPiece;

    pub fn board(fen: &str) -> Board {
        let fen: Fen = fen.parse().unwrap();
        fen.into_setup().board
    }

    pub fn position(fen: &str) -> Chess {
        let fen: Fen = fen.parse().unwrap();
        fen.into_position(CastlingMode::Standard).unwrap()
    }

    pub fn piece(board: &Board, square: Square) -> BoardPiece {
        BoardPiece::at(board, square).unwrap()
    }
}
