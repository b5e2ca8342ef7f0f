//! Attacker sets, including x-ray attackers.

use shakmaty::{Board, Role};

use super::simulate;
use crate::board::{BoardPiece, RawMove};

/// Captures the opposing side can make on `piece.square` right now.
///
/// An adjacent enemy king always counts as an attacker, even when capturing
/// would walk into a defended square.
pub fn direct_attacking_moves(board: &Board, piece: &BoardPiece) -> Vec<RawMove> {
    let attacker = !piece.color;
    let mut moves = Vec::new();
    let mut king_attack = None;

    for from in board.attacks_to(piece.square, attacker, board.occupied()) {
        let Some(capturer) = board.piece_at(from) else {
            continue;
        };
        let capture = RawMove::new(capturer, from, piece.square);
        if capturer.role == Role::King {
            king_attack = Some(capture);
        } else if simulate(board, &capture).is_some() {
            moves.push(capture);
        }
    }

    moves.extend(king_attack);
    moves
}

/// Attackers of `piece`. With `transitive`, pieces lined up behind a direct
/// attacker (batteries, x-rays) are included as well.
///
/// Each attacker found is lifted off a copy of the board and the square is
/// scanned again; whatever appears is a revealed attacker and gets the same
/// treatment. Kings are never lifted.
pub fn attacking_moves(board: &Board, piece: &BoardPiece, transitive: bool) -> Vec<RawMove> {
    let mut attacking = direct_attacking_moves(board, piece);
    if !transitive {
        return attacking;
    }

    let mut frontier: Vec<(Board, RawMove)> =
        attacking.iter().map(|mv| (board.clone(), *mv)).collect();

    while let Some((snapshot, attacker)) = frontier.pop() {
        if attacker.role == Role::King {
            continue;
        }

        let before: Vec<RawMove> = direct_attacking_moves(&snapshot, piece)
            .into_iter()
            .filter(|mv| mv.from != attacker.from)
            .collect();

        let mut lifted = snapshot;
        lifted.remove_piece_at(attacker.from);

        for revealed in direct_attacking_moves(&lifted, piece) {
            if before.contains(&revealed) || attacking.contains(&revealed) {
                continue;
            }
            attacking.push(revealed);
            frontier.push((lifted.clone(), revealed));
        }
    }

    attacking
}
