//! Defender sets.

use shakmaty::Board;

use super::{attacking_moves, simulate};
use crate::board::{BoardPiece, RawMove};

/// Pieces that would recapture on `piece.square`.
///
/// Every capture of the piece is tried and the recapturers of the capturing
/// piece are counted; the smallest such set is returned, since the opponent
/// will pick the capture that is least exposed. When nothing can capture, a
/// piece of the other colour is put on the square and its attackers are
/// returned, which are exactly the square's defenders.
pub fn defending_moves(board: &Board, piece: &BoardPiece, transitive: bool) -> Vec<RawMove> {
    let smallest = attacking_moves(board, piece, false)
        .iter()
        .filter_map(|capture| {
            let after = simulate(board, capture)?;
            Some(attacking_moves(&after, &capture.landed(), transitive))
        })
        .min_by_key(Vec::len);

    if let Some(recapturers) = smallest {
        return recapturers;
    }

    let flipped = BoardPiece {
        color: !piece.color,
        ..*piece
    };
    let mut defender_board = board.clone();
    defender_board.set_piece_at(piece.square, flipped.piece());
    attacking_moves(&defender_board, &flipped, transitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::safety::test_support::{board, piece};
    use shakmaty::{Role, Square};

    #[test]
    fn test_undefended_piece() {
        let board = board("4k3/8/3p4/8/4N3/8/8/4K3 w - - 0 1");
        let knight = piece(&board, Square::E4);
        assert!(defending_moves(&board, &knight, true).is_empty());
    }

    #[test]
    fn test_defenders_without_attackers() {
        // Nothing attacks the knight, the pawn on d3 and rook on e1 guard it.
        let board = board("4k3/8/8/8/4N3/3P4/8/4RK2 w - - 0 1");
        let knight = piece(&board, Square::E4);
        let defenders = defending_moves(&board, &knight, true);
        let mut roles: Vec<Role> = defenders.iter().map(|d| d.role).collect();
        roles.sort();
        assert_eq!(roles, vec![Role::Pawn, Role::Rook]);
    }

    #[test]
    fn test_recapturers_after_capture() {
        // Bishop h7 takes on e4, the pawn on d3 takes back.
        let board = board("4k3/7b/8/8/4N3/3P4/8/4K3 w - - 0 1");
        let knight = piece(&board, Square::E4);
        let defenders = defending_moves(&board, &knight, true);
        assert_eq!(defenders.len(), 1);
        assert_eq!(defenders[0].from, Square::D3);
    }

    #[test]
    fn test_smallest_recapture_set_is_chosen() {
        // Rxe4 would open the fourth rank for the queen on a4, dxe4 keeps it
        // shut. The pawn capture leaves nothing to recapture with.
        let board = board("4k3/8/8/3p4/Q2rN3/8/8/4K3 w - - 0 1");
        let knight = piece(&board, Square::E4);
        assert!(defending_moves(&board, &knight, true).is_empty());
    }
}
