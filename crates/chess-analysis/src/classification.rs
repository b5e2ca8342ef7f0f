//! Move classification and per-player statistics.

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::board::serde_color;
use crate::evaluation::{expected_points_loss, Evaluation};

/// Quality label of a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// A sound sacrifice that was also the engine's choice.
    Brilliant,
    /// The only move that keeps the advantage.
    Critical,
    /// The engine's top move.
    Best,
    Excellent,
    Okay,
    Inaccuracy,
    Mistake,
    Blunder,
    /// A known opening-book move.
    Theory,
}

impl Classification {
    /// Every classification, in display order.
    pub const ALL: [Classification; 9] = [
        Classification::Brilliant,
        Classification::Critical,
        Classification::Best,
        Classification::Excellent,
        Classification::Okay,
        Classification::Inaccuracy,
        Classification::Mistake,
        Classification::Blunder,
        Classification::Theory,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Brilliant => "brilliant",
            Classification::Critical => "critical",
            Classification::Best => "best",
            Classification::Excellent => "excellent",
            Classification::Okay => "okay",
            Classification::Inaccuracy => "inaccuracy",
            Classification::Mistake => "mistake",
            Classification::Blunder => "blunder",
            Classification::Theory => "theory",
        }
    }

    /// Annotation glyph for PGN-style output.
    pub fn symbol(self) -> &'static str {
        match self {
            Classification::Brilliant => "!!",
            Classification::Critical => "!",
            Classification::Best | Classification::Excellent | Classification::Okay => "",
            Classification::Inaccuracy => "?!",
            Classification::Mistake => "?",
            Classification::Blunder => "??",
            Classification::Theory => "",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a move from the evaluations before and after it.
///
/// Both evaluations are White-positive; `mover` is the side that played.
pub fn classify_move(previous: Evaluation, current: Evaluation, mover: Color) -> Classification {
    let prev_subj = previous.subjective(mover).value();
    let curr_subj = current.subjective(mover).value();

    match (previous, current) {
        (Evaluation::Mate(prev), Evaluation::Mate(curr)) => {
            if prev_subj > 0 && curr_subj < 0 {
                return if curr_subj < -3 {
                    Classification::Mistake
                } else {
                    Classification::Blunder
                };
            }

            let mate_loss = match mover {
                Color::White => curr - prev,
                Color::Black => prev - curr,
            };
            if mate_loss < 0 || (mate_loss == 0 && curr_subj < 0) {
                Classification::Best
            } else if mate_loss < 2 {
                Classification::Excellent
            } else if mate_loss < 7 {
                Classification::Okay
            } else {
                Classification::Inaccuracy
            }
        }
        (Evaluation::Mate(_), Evaluation::Centipawns(_)) => match curr_subj {
            v if v >= 800 => Classification::Excellent,
            v if v >= 400 => Classification::Okay,
            v if v >= 200 => Classification::Inaccuracy,
            v if v >= 0 => Classification::Mistake,
            _ => Classification::Blunder,
        },
        (Evaluation::Centipawns(_), Evaluation::Mate(_)) => match curr_subj {
            v if v > 0 => Classification::Best,
            v if v >= -2 => Classification::Blunder,
            v if v >= -5 => Classification::Mistake,
            _ => Classification::Inaccuracy,
        },
        (Evaluation::Centipawns(_), Evaluation::Centipawns(_)) => {
            let point_loss = expected_points_loss(previous, current, mover);
            if point_loss < 0.01 {
                Classification::Best
            } else if point_loss < 0.045 {
                Classification::Excellent
            } else if point_loss < 0.08 {
                Classification::Okay
            } else if point_loss < 0.12 {
                Classification::Inaccuracy
            } else if point_loss < 0.22 {
                Classification::Mistake
            } else {
                Classification::Blunder
            }
        }
    }
}

/// Analysis result for a single move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveAnalysis {
    /// 1-based ply number.
    pub index: usize,
    /// Fullmove number of the position the move was played from.
    pub move_number: u32,
    /// The move as played, in SAN.
    pub san: String,
    #[serde(with = "serde_color")]
    pub color: Color,
    pub classification: Classification,
    /// The engine's preferred move in UCI notation, if it reported one.
    pub best_move: Option<String>,
    /// Evaluation after the move.
    pub evaluation: Evaluation,
    /// Evaluation the move is judged against.
    pub previous_evaluation: Evaluation,
}

/// Statistics for a player's performance in a game.
///
/// Always derived from a move list; the counts add up to `total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub brilliant: u32,
    pub critical: u32,
    pub best: u32,
    pub excellent: u32,
    pub okay: u32,
    pub inaccuracy: u32,
    pub mistake: u32,
    pub blunder: u32,
    pub theory: u32,
    /// Total moves analyzed
    pub total: u32,
}

impl PlayerStats {
    /// Count the classifications of `moves`.
    pub fn from_moves(moves: &[MoveAnalysis]) -> Self {
        let mut stats = Self::default();
        for analysis in moves {
            *stats.count_mut(analysis.classification) += 1;
            stats.total += 1;
        }
        stats
    }

    /// Number of moves with the given classification.
    pub fn count(&self, classification: Classification) -> u32 {
        match classification {
            Classification::Brilliant => self.brilliant,
            Classification::Critical => self.critical,
            Classification::Best => self.best,
            Classification::Excellent => self.excellent,
            Classification::Okay => self.okay,
            Classification::Inaccuracy => self.inaccuracy,
            Classification::Mistake => self.mistake,
            Classification::Blunder => self.blunder,
            Classification::Theory => self.theory,
        }
    }

    fn count_mut(&mut self, classification: Classification) -> &mut u32 {
        match classification {
            Classification::Brilliant => &mut self.brilliant,
            Classification::Critical => &mut self.critical,
            Classification::Best => &mut self.best,
            Classification::Excellent => &mut self.excellent,
            Classification::Okay => &mut self.okay,
            Classification::Inaccuracy => &mut self.inaccuracy,
            Classification::Mistake => &mut self.mistake,
            Classification::Blunder => &mut self.blunder,
            Classification::Theory => &mut self.theory,
        }
    }
}

/// One side's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAnalysis {
    pub player: String,
    pub stats: PlayerStats,
    pub moves: Vec<MoveAnalysis>,
}

impl PlayerAnalysis {
    pub fn new(player: impl Into<String>, moves: Vec<MoveAnalysis>) -> Self {
        Self {
            player: player.into(),
            stats: PlayerStats::from_moves(&moves),
            moves,
        }
    }
}

/// Complete analysis of a chess game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub white: PlayerAnalysis,
    pub black: PlayerAnalysis,
    /// Name of the deepest opening-book position reached.
    pub opening_name: Option<String>,
}

impl AnalysisResult {
    /// All moves of both players in game order.
    pub fn moves(&self) -> Vec<&MoveAnalysis> {
        let mut all: Vec<&MoveAnalysis> =
            self.white.moves.iter().chain(self.black.moves.iter()).collect();
        all.sort_by_key(|m| m.index);
        all
    }
}
