//! Detection of the book prefix of a game.

use serde::{Deserialize, Serialize};

use crate::book::OpeningBook;

/// How far a game followed known theory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheoryMatch {
    /// Index (0-based ply) of the last move that reached a book position.
    pub last_theory_index: Option<usize>,
    /// Name of the deepest book position reached.
    pub opening_name: Option<String>,
}

impl TheoryMatch {
    /// Returns true if the ply at `index` is still book theory.
    #[must_use]
    pub fn is_theory(&self, index: usize) -> bool {
        self.last_theory_index.is_some_and(|last| index <= last)
    }

    /// Number of plies covered by theory.
    #[must_use]
    pub fn theory_plies(&self) -> usize {
        self.last_theory_index.map_or(0, |last| last + 1)
    }
}

/// Walks the positions reached after each ply and stops at the first one the
/// book does not know.
///
/// `positions` yields the FEN after ply 0, ply 1, and so on.
pub fn match_theory<I, S>(book: &OpeningBook, positions: I) -> TheoryMatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = TheoryMatch::default();

    for (index, fen) in positions.into_iter().enumerate() {
        match book.lookup(fen.as_ref()) {
            Some(name) => {
                result.last_theory_index = Some(index);
                result.opening_name = Some(name.to_string());
            }
            None => break,
        }
    }

    result
}
