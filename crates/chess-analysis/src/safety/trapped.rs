use shakmaty::{Board, Role};

use super::{is_piece_safe, move_creates_greater_threat, piece_moves, simulate};
use crate::board::{BoardPiece, PlayedMove};

/// Whether `piece` is hanging and none of its moves gets it to safety.
///
/// With `danger_levels`, an escape that exposes something else of at least
/// the same value also counts as no escape. Pawns are never trapped.
pub fn is_piece_trapped(board: &Board, piece: &BoardPiece, danger_levels: bool) -> bool {
    if piece.role == Role::Pawn || is_piece_safe(board, piece, None) {
        return false;
    }

    piece_moves(board, piece).iter().all(|escape| {
        if board.piece_at(escape.to).is_some_and(|target| target.role == Role::King) {
            return false;
        }
        if danger_levels && move_creates_greater_threat(board, piece, escape) {
            return true;
        }
        let Some(after) = simulate(board, escape) else {
            return true;
        };
        let played = PlayedMove::from_raw(board, escape);
        let escaped = BoardPiece {
            square: escape.to,
            ..*piece
        };
        !is_piece_safe(&after, &escaped, Some(&played))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::test_support::{board, piece};
    use shakmaty::Square;

    #[test]
    fn test_safe_piece_is_not_trapped() {
        let board = board("4k3/8/8/8/4N3/8/8/4K3 w - - 0 1");
        assert!(!is_piece_trapped(&board, &piece(&board, Square::E4), true));
    }

    #[test]
    fn test_hanging_piece_with_escape() {
        // The knight is attacked by the pawn but has quiet squares to go to.
        let board = board("4k3/8/8/3p4/4N3/8/8/4K3 w - - 0 1");
        assert!(!is_piece_trapped(&board, &piece(&board, Square::E4), true));
    }

    #[test]
    fn test_hanging_pawn_is_not_trapped() {
        let board = board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        assert!(!is_piece_trapped(&board, &piece(&board, Square::E4), true));
    }

    #[test]
    fn test_cornered_knight_is_trapped() {
        // The rook hits the knight on a8. The pawn covers b6, the king c7.
        let board = board("Nr1k4/p7/8/8/8/8/8/4K3 w - - 0 1");
        let knight = piece(&board, Square::A8);
        assert!(is_piece_trapped(&board, &knight, true));
        assert!(is_piece_trapped(&board, &knight, false));
    }
}
