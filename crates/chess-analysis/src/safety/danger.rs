//! Danger levels: when taking a hanging piece costs more than it wins.

use shakmaty::{Board, Color, Role};

use super::{attacking_moves, has_mating_move, simulate, unsafe_pieces};
use crate::board::{piece_value, BoardPiece, PlayedMove, RawMove};

/// Which comparison [`has_danger_levels`] applies to each acting move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThreatStrategy {
    /// The move must add attacks that were not there before.
    Creates,
    /// Any such attack after the move is enough.
    #[default]
    Leaves,
}

/// Attacks on `color`'s hanging pieces worth at least `threatened`, other
/// than `threatened` itself.
fn relative_unsafe_piece_attacks(
    board: &Board,
    threatened: &BoardPiece,
    color: Color,
    played_move: Option<&PlayedMove>,
) -> Vec<RawMove> {
    unsafe_pieces(board, color, played_move)
        .iter()
        .filter(|piece| piece.square != threatened.square && piece.value() >= threatened.value())
        .flat_map(|piece| attacking_moves(board, piece, false))
        .collect()
}

/// A piece worth less than a queen is pinned in place when moving it (or
/// taking it) allows a mate.
fn allows_cheap_mate(after: &Board, threatened: &BoardPiece, actor: Color) -> bool {
    threatened.value() < piece_value(Role::Queen) && has_mating_move(after, !actor)
}

/// Whether `acting` exposes the acting side's other valuable pieces to new
/// attacks, or allows a mate in reply.
///
/// Returns false when `acting` cannot be played on `board`.
pub fn move_creates_greater_threat(
    board: &Board,
    threatened: &BoardPiece,
    acting: &RawMove,
) -> bool {
    let previous = relative_unsafe_piece_attacks(board, threatened, acting.color, None);

    let Some(after) = simulate(board, acting) else {
        return false;
    };
    let played = PlayedMove::from_raw(board, acting);
    let current = relative_unsafe_piece_attacks(&after, threatened, acting.color, Some(&played));

    let is_new = |attack: &RawMove| {
        !previous
            .iter()
            .any(|old| old.from == attack.from && old.to == attack.to && old.role == attack.role)
    };
    if current.iter().any(is_new) {
        return true;
    }

    allows_cheap_mate(&after, threatened, acting.color)
}

/// Whether the acting side's valuable pieces are under attack after `acting`,
/// or a mate is allowed in reply.
///
/// Returns false when `acting` cannot be played on `board`.
pub fn move_leaves_greater_threat(
    board: &Board,
    threatened: &BoardPiece,
    acting: &RawMove,
) -> bool {
    let Some(after) = simulate(board, acting) else {
        return false;
    };

    if !relative_unsafe_piece_attacks(&after, threatened, acting.color, None).is_empty() {
        return true;
    }

    allows_cheap_mate(&after, threatened, acting.color)
}

/// Whether every one of `acting_moves` runs into a greater threat.
///
/// Used to tell a real sacrifice from a piece that only looks hanging: if
/// every capture of it costs the capturer more, the piece is protected.
pub fn has_danger_levels(
    board: &Board,
    threatened: &BoardPiece,
    acting_moves: &[RawMove],
    strategy: ThreatStrategy,
) -> bool {
    acting_moves.iter().all(|acting| match strategy {
        ThreatStrategy::Creates => move_creates_greater_threat(board, threatened, acting),
        ThreatStrategy::Leaves => move_leaves_greater_threat(board, threatened, acting),
    })
}
