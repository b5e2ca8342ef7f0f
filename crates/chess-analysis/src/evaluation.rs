//! Chess position evaluation types and the win-probability model.

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use uci::Score;

/// Slope of the logistic curve mapping centipawns to expected points.
pub const DEFAULT_GRADIENT: f64 = 0.0035;

/// Centipawn value at which the evaluation bar is pinned to one side.
pub const BAR_CLAMP_CP: i32 = 2000;

/// Represents a chess position evaluation.
///
/// Evaluations are always from White's point of view: positive favours White
/// no matter whose move it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Evaluation {
    /// Centipawn evaluation (positive = white advantage)
    Centipawns(i32),
    /// Mate in N moves (positive = white wins, negative = black wins)
    Mate(i32),
}

impl Default for Evaluation {
    fn default() -> Self {
        Evaluation::Centipawns(0)
    }
}

impl Evaluation {
    /// Build an evaluation from raw UCI score fields. A mate score takes
    /// precedence over a centipawn score.
    pub fn from_uci_score(cp: Option<i32>, mate: Option<i32>) -> Option<Self> {
        match (cp, mate) {
            (_, Some(m)) => Some(Evaluation::Mate(m)),
            (Some(c), None) => Some(Evaluation::Centipawns(c)),
            (None, None) => None,
        }
    }

    /// Convert an engine score, which is relative to the side to move, into a
    /// White-positive evaluation.
    pub fn from_side_to_move(score: Score, turn: Color) -> Self {
        let eval = match score {
            Score::Cp(cp) => Evaluation::Centipawns(cp),
            Score::Mate(m) => Evaluation::Mate(m),
        };
        eval.subjective(turn)
    }

    /// The evaluation from `color`'s point of view (positive = good for `color`).
    ///
    /// Applying it twice with the same colour gives back the original.
    #[must_use]
    pub fn subjective(self, color: Color) -> Self {
        match color {
            Color::White => self,
            Color::Black => match self {
                Evaluation::Centipawns(cp) => Evaluation::Centipawns(-cp),
                Evaluation::Mate(m) => Evaluation::Mate(-m),
            },
        }
    }

    /// The raw signed number, centipawns or mate distance.
    pub fn value(self) -> i32 {
        match self {
            Evaluation::Centipawns(v) | Evaluation::Mate(v) => v,
        }
    }

    pub fn is_mate(self) -> bool {
        matches!(self, Evaluation::Mate(_))
    }
}

impl std::fmt::Display for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Evaluation::Centipawns(cp) => write!(f, "{:+.2}", f64::from(*cp) / 100.0),
            Evaluation::Mate(m) if *m < 0 => write!(f, "-M{}", m.unsigned_abs()),
            Evaluation::Mate(m) => write!(f, "M{}", m),
        }
    }
}

fn sign(color: Color) -> f64 {
    match color {
        Color::White => 1.0,
        Color::Black => -1.0,
    }
}

/// Expected points (0..=1) for White implied by `eval`.
pub fn expected_points(eval: Evaluation, mover: Color) -> f64 {
    expected_points_with_gradient(eval, mover, DEFAULT_GRADIENT)
}

/// [`expected_points`] with an explicit logistic gradient.
///
/// A mate score of zero (the side to move is already mated) yields 1 when
/// `mover` is White and 0 otherwise.
pub fn expected_points_with_gradient(eval: Evaluation, mover: Color, gradient: f64) -> f64 {
    match eval {
        Evaluation::Mate(0) => match mover {
            Color::White => 1.0,
            Color::Black => 0.0,
        },
        Evaluation::Mate(m) if m > 0 => 1.0,
        Evaluation::Mate(_) => 0.0,
        Evaluation::Centipawns(cp) => 1.0 / (1.0 + (-gradient * f64::from(cp)).exp()),
    }
}

/// Drop in expected points for `mover` going from `previous` to `current`.
///
/// Never negative.
pub fn expected_points_loss(previous: Evaluation, current: Evaluation, mover: Color) -> f64 {
    let before = expected_points(previous, !mover);
    let after = expected_points(current, mover);
    ((before - after) * sign(mover)).max(0.0)
}

/// Height of the black part of an evaluation bar, in percent.
pub fn bar_percentage(eval: Evaluation) -> f64 {
    match eval {
        Evaluation::Mate(0) => 50.0,
        Evaluation::Mate(m) if m > 0 => 0.0,
        Evaluation::Mate(_) => 100.0,
        Evaluation::Centipawns(cp) => {
            let clamped = f64::from(cp.clamp(-BAR_CLAMP_CP, BAR_CLAMP_CP));
            50.0 - clamped / f64::from(BAR_CLAMP_CP) * 50.0
        }
    }
}
