//! Critical move detection.
//!
//! A move is critical when it was the engine's choice and every alternative
//! throws a good part of the advantage away.

use shakmaty::{Chess, Position, Role};

use crate::board::{BoardPiece, PlayedMove};
use crate::evaluation::{expected_points_loss, Evaluation};
use crate::safety::is_piece_safe;

/// Centipawn advantage above which nothing is critical any more.
const DECIDED_CP: i32 = 700;

/// Expected points the second-best line must lose for the top move to be critical.
const CRITICAL_POINT_LOSS: f64 = 0.1;

/// The position a move was played from.
#[derive(Debug, Clone, Copy)]
pub struct PreviousNode<'a> {
    pub position: &'a Chess,
    /// Evaluation of the engine's top line (White-positive).
    pub evaluation: Evaluation,
    /// Evaluation of the second-best line, if the engine found one.
    pub second_evaluation: Option<Evaluation>,
}

/// The position a move led to.
#[derive(Debug, Clone, Copy)]
pub struct CurrentNode<'a> {
    pub position: &'a Chess,
    pub played_move: PlayedMove,
    /// Evaluation after the move (White-positive).
    pub evaluation: Evaluation,
}

impl CurrentNode<'_> {
    pub fn mover(&self) -> shakmaty::Color {
        self.played_move.color
    }

    /// Evaluation from the mover's point of view.
    pub fn subjective_evaluation(&self) -> Evaluation {
        self.evaluation.subjective(self.mover())
    }
}

/// Shared preconditions for the Critical and Brilliant labels.
///
/// Rules out positions that are already decided, moves that leave the mover
/// worse off, queen promotions and replies to check.
pub fn is_move_critical_candidate(previous: &PreviousNode<'_>, current: &CurrentNode<'_>) -> bool {
    let mover = current.mover();
    let subjective = current.subjective_evaluation();

    match previous.second_evaluation.map(|eval| eval.subjective(mover)) {
        Some(Evaluation::Centipawns(cp)) if cp >= DECIDED_CP => return false,
        Some(_) => {}
        None => {
            if let Evaluation::Centipawns(cp) = subjective {
                if cp >= DECIDED_CP {
                    return false;
                }
            }
        }
    }

    if subjective.value() < 0 {
        return false;
    }
    if current.played_move.promotion == Some(Role::Queen) {
        return false;
    }
    !previous.position.is_check()
}

/// Whether the played top move deserves the Critical label.
pub fn consider_critical_classification(
    previous: &PreviousNode<'_>,
    current: &CurrentNode<'_>,
) -> bool {
    if !is_move_critical_candidate(previous, current) {
        return false;
    }

    if let Evaluation::Mate(m) = current.subjective_evaluation() {
        if m > 0 {
            return false;
        }
    }

    let played = &current.played_move;
    if let Some(captured) = played.captured {
        let before = previous.position.board();
        if let Some(square) = played.capture_square(before) {
            let piece = BoardPiece {
                square,
                role: captured,
                color: !played.color,
            };
            // Taking a free piece is not critical, anything else would take it too.
            if !is_piece_safe(before, &piece, None) {
                return false;
            }
        }
    }

    let Some(second) = previous.second_evaluation else {
        return false;
    };

    expected_points_loss(previous.evaluation, second, played.color) >= CRITICAL_POINT_LOSS
}
