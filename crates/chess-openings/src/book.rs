//! Position-keyed opening book.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::opening::Opening;

/// Errors that can occur when building or loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the opening book file.
    #[error("failed to read opening book: {0}")]
    Io(#[from] std::io::Error),

    /// The book is not a JSON object of FEN keys to names.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A built-in line contains a move that cannot be played.
    #[error("illegal move {san} in opening line {opening}")]
    IllegalLine { opening: String, san: String },
}

/// Strips the move counters from a FEN.
///
/// The key keeps the four fields that identify a position for opening
/// purposes: placement, side to move, castling rights and en-passant square.
#[must_use]
pub fn normalize_fen(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

/// Maps normalized FENs to opening names.
#[derive(Debug, Clone, Default)]
pub struct OpeningBook {
    positions: HashMap<String, String>,
}

impl OpeningBook {
    /// Creates a new empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of positions in the book.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Names a position, replacing any previous name.
    pub fn insert(&mut self, fen: &str, name: impl Into<String>) {
        self.positions.insert(normalize_fen(fen), name.into());
    }

    /// Looks up the opening name for a position. Move counters are ignored.
    #[must_use]
    pub fn lookup(&self, fen: &str) -> Option<&str> {
        self.positions.get(&normalize_fen(fen)).map(String::as_str)
    }

    /// Builds a book from named lines.
    ///
    /// The final position of each line carries that line's name. Intermediate
    /// positions borrow the name of the first line that passes through them
    /// unless another line ends there.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::IllegalLine`] if any line cannot be replayed.
    pub fn from_openings(openings: &[Opening]) -> Result<Self, BookError> {
        let mut book = Self::new();
        let mut lines = Vec::with_capacity(openings.len());

        for opening in openings {
            let fens = opening.positions()?;
            if let Some(last) = fens.last() {
                book.insert(last, opening.name.clone());
            }
            lines.push((opening, fens));
        }

        for (opening, fens) in lines {
            for fen in fens {
                book.positions
                    .entry(normalize_fen(&fen))
                    .or_insert_with(|| opening.name.clone());
            }
        }

        Ok(book)
    }

    /// Parses a JSON object of `{ "<fen>": "<opening name>" }`.
    ///
    /// Keys may carry full FENs; they are normalized on load.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Json`] if the input is not such an object.
    pub fn from_json_str(json: &str) -> Result<Self, BookError> {
        let raw: HashMap<String, String> = serde_json::from_str(json)?;
        let positions = raw
            .into_iter()
            .map(|(fen, name)| (normalize_fen(&fen), name))
            .collect();
        Ok(Self { positions })
    }

    /// Reads a JSON opening book from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BookError::Io`] if the file cannot be read, or
    /// [`BookError::Json`] if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }
}
