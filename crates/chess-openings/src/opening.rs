//! Named opening lines.

use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::San;
use shakmaty::{Chess, EnPassantMode, Position};

use crate::book::BookError;

/// Represents a chess opening with its name and move sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code for this opening (e.g., "B20", "C44").
    pub eco: String,
    /// The name of the opening.
    pub name: String,
    /// The sequence of moves in SAN, starting from the initial position.
    pub moves: Vec<String>,
}

impl Opening {
    /// Creates a new opening with the given ECO code, name, and SAN moves.
    #[must_use]
    pub fn new(eco: impl Into<String>, name: impl Into<String>, moves: &[&str]) -> Self {
        Self {
            eco: eco.into(),
            name: name.into(),
            moves: moves.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replays the line and returns the FEN reached after every ply.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::IllegalLine`] if a move does not parse or is not
    /// legal in the position it is played from.
    pub fn positions(&self) -> Result<Vec<String>, BookError> {
        let illegal = |san: &str| BookError::IllegalLine {
            opening: self.name.clone(),
            san: san.to_string(),
        };

        let mut pos = Chess::default();
        let mut fens = Vec::with_capacity(self.moves.len());
        for san in &self.moves {
            let m = san
                .parse::<San>()
                .ok()
                .and_then(|parsed| parsed.to_move(&pos).ok())
                .ok_or_else(|| illegal(san))?;
            pos = pos.play(&m).map_err(|_| illegal(san))?;
            fens.push(Fen::from_position(pos.clone(), EnPassantMode::Legal).to_string());
        }
        Ok(fens)
    }
}
