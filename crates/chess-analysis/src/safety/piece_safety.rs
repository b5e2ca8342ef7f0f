//! Hanging-piece detection.

use shakmaty::{Board, Color, Role};

use super::{attacking_moves, defending_moves};
use crate::board::{piece_value, BoardPiece, PlayedMove};

/// Whether `piece` can be left where it stands without losing material.
///
/// `played_move` is the move that just happened, if any. A rook that has
/// just taken a knight and can only be taken back by a knight is an even trade,
/// not a hanging piece.
pub fn is_piece_safe(board: &Board, piece: &BoardPiece, played_move: Option<&PlayedMove>) -> bool {
    let direct_attackers: Vec<BoardPiece> = attacking_moves(board, piece, false)
        .iter()
        .map(|mv| mv.mover())
        .collect();
    let attackers = attacking_moves(board, piece, true);
    let defenders = defending_moves(board, piece, true);

    let knight_value = piece_value(Role::Knight);
    let captured_knight = played_move
        .and_then(|mv| mv.captured)
        .is_some_and(|role| piece_value(role) == knight_value);
    if captured_knight
        && piece.role == Role::Rook
        && attackers.len() == 1
        && !defenders.is_empty()
        && piece_value(attackers[0].role) == knight_value
    {
        return true;
    }

    let value = piece.value();
    if direct_attackers.iter().any(|attacker| attacker.value() < value) {
        return false;
    }

    if attackers.len() <= defenders.len() {
        return true;
    }

    let Some(cheapest) = direct_attackers
        .iter()
        .map(BoardPiece::value)
        .min_by(f64::total_cmp)
    else {
        return true;
    };

    if value < cheapest && defenders.iter().any(|d| piece_value(d.role) < cheapest) {
        return true;
    }

    defenders.iter().any(|d| d.role == Role::Pawn)
}

/// Pieces of `color` that are hanging.
///
/// Pawns and the king are never reported, nor is anything worth no more than
/// the piece `played_move` just captured.
pub fn unsafe_pieces(
    board: &Board,
    color: Color,
    played_move: Option<&PlayedMove>,
) -> Vec<BoardPiece> {
    let captured_value = played_move
        .and_then(|mv| mv.captured)
        .map_or(0.0, piece_value);

    board
        .by_color(color)
        .into_iter()
        .filter_map(|square| BoardPiece::at(board, square))
        .filter(|piece| {
            !matches!(piece.role, Role::Pawn | Role::King)
                && piece.value() > captured_value
                && !is_piece_safe(board, piece, played_move)
        })
        .collect()
}
