//! Brilliant move detection: sound sacrifices.

use shakmaty::Position;

use crate::board::BoardPiece;
use crate::critical::{is_move_critical_candidate, CurrentNode, PreviousNode};
use crate::safety::{
    attacking_moves, has_danger_levels, is_piece_trapped, unsafe_pieces, ThreatStrategy,
};

/// Whether the played move leaves material en prise on purpose.
///
/// The mover must end up with a piece that is hanging, that the opponent can
/// actually take without running into something worse, and that was not
/// doomed anyway.
pub fn consider_brilliant_classification(
    previous: &PreviousNode<'_>,
    current: &CurrentNode<'_>,
) -> bool {
    if !is_move_critical_candidate(previous, current) {
        return false;
    }

    let played = &current.played_move;
    if played.promotion.is_some() {
        return false;
    }

    let before = previous.position.board();
    let after = current.position.board();

    let previous_unsafe = unsafe_pieces(before, played.color, None);
    let unsafe_now = unsafe_pieces(after, played.color, Some(played));

    if !current.position.is_check() && unsafe_now.len() < previous_unsafe.len() {
        return false;
    }

    let protected = unsafe_now.iter().all(|piece| {
        let captures = attacking_moves(after, piece, false);
        has_danger_levels(after, piece, &captures, ThreatStrategy::default())
    });
    if protected {
        return false;
    }

    let previously_trapped: Vec<&BoardPiece> = previous_unsafe
        .iter()
        .filter(|piece| is_piece_trapped(before, piece, true))
        .collect();
    let trapped_count = unsafe_now
        .iter()
        .filter(|piece| is_piece_trapped(after, piece, true))
        .count();

    let moved_piece_was_trapped = previously_trapped
        .iter()
        .any(|piece| piece.square == played.from);

    if trapped_count == unsafe_now.len()
        || moved_piece_was_trapped
        || trapped_count < previously_trapped.len()
    {
        return false;
    }

    !unsafe_now.is_empty()
}
