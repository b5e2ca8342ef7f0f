//! Built-in opening book data.
//!
//! A compact set of main lines compiled into the library. It is used when no
//! external JSON book is configured.

use crate::book::{BookError, OpeningBook};
use crate::opening::Opening;

/// Returns the built-in opening lines, general lines first.
#[must_use]
pub fn builtin_openings() -> Vec<Opening> {
    vec![
        // Open games
        Opening::new("C20", "King's Pawn Game", &["e4", "e5"]),
        Opening::new("C40", "King's Knight Opening", &["e4", "e5", "Nf3"]),
        Opening::new("C44", "King's Knight Opening: Normal Variation", &["e4", "e5", "Nf3", "Nc6"]),
        Opening::new("C50", "Italian Game", &["e4", "e5", "Nf3", "Nc6", "Bc4"]),
        Opening::new(
            "C50",
            "Italian Game: Giuoco Piano",
            &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"],
        ),
        Opening::new("C60", "Ruy Lopez", &["e4", "e5", "Nf3", "Nc6", "Bb5"]),
        Opening::new("C70", "Ruy Lopez: Morphy Defense", &["e4", "e5", "Nf3", "Nc6", "Bb5", "a6"]),
        Opening::new("C65", "Ruy Lopez: Berlin Defense", &["e4", "e5", "Nf3", "Nc6", "Bb5", "Nf6"]),
        Opening::new("C45", "Scotch Game", &["e4", "e5", "Nf3", "Nc6", "d4"]),
        Opening::new("C42", "Petrov's Defense", &["e4", "e5", "Nf3", "Nf6"]),
        Opening::new("C41", "Philidor Defense", &["e4", "e5", "Nf3", "d6"]),
        Opening::new("C25", "Vienna Game", &["e4", "e5", "Nc3"]),
        Opening::new("C23", "Bishop's Opening", &["e4", "e5", "Bc4"]),
        Opening::new("C30", "King's Gambit", &["e4", "e5", "f4"]),
        // Semi-open games
        Opening::new("B00", "King's Pawn Opening", &["e4"]),
        Opening::new("B20", "Sicilian Defense", &["e4", "c5"]),
        Opening::new("B27", "Sicilian Defense: Open", &["e4", "c5", "Nf3"]),
        Opening::new(
            "B90",
            "Sicilian Defense: Najdorf Variation",
            &["e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6"],
        ),
        Opening::new("B22", "Sicilian Defense: Alapin Variation", &["e4", "c5", "c3"]),
        Opening::new("C00", "French Defense", &["e4", "e6"]),
        Opening::new(
            "C01",
            "French Defense: Exchange Variation",
            &["e4", "e6", "d4", "d5", "exd5"],
        ),
        Opening::new("C02", "French Defense: Advance Variation", &["e4", "e6", "d4", "d5", "e5"]),
        Opening::new("B10", "Caro-Kann Defense", &["e4", "c6"]),
        Opening::new(
            "B12",
            "Caro-Kann Defense: Advance Variation",
            &["e4", "c6", "d4", "d5", "e5"],
        ),
        Opening::new("B01", "Scandinavian Defense", &["e4", "d5"]),
        Opening::new("B07", "Pirc Defense", &["e4", "d6", "d4", "Nf6", "Nc3", "g6"]),
        // Closed games and Indian defenses
        Opening::new("A40", "Queen's Pawn Game", &["d4"]),
        Opening::new("D00", "Queen's Pawn Game: Symmetrical", &["d4", "d5"]),
        Opening::new("D06", "Queen's Gambit", &["d4", "d5", "c4"]),
        Opening::new("D20", "Queen's Gambit Accepted", &["d4", "d5", "c4", "dxc4"]),
        Opening::new("D30", "Queen's Gambit Declined", &["d4", "d5", "c4", "e6"]),
        Opening::new("D10", "Slav Defense", &["d4", "d5", "c4", "c6"]),
        Opening::new("D02", "London System", &["d4", "d5", "Nf3", "Nf6", "Bf4"]),
        Opening::new("A45", "Indian Defense", &["d4", "Nf6"]),
        Opening::new("E60", "King's Indian Defense", &["d4", "Nf6", "c4", "g6"]),
        Opening::new("E20", "Nimzo-Indian Defense", &["d4", "Nf6", "c4", "e6", "Nc3", "Bb4"]),
        Opening::new("D70", "Grünfeld Defense", &["d4", "Nf6", "c4", "g6", "Nc3", "d5"]),
        Opening::new("A80", "Dutch Defense", &["d4", "f5"]),
        // Flank openings
        Opening::new("A10", "English Opening", &["c4"]),
        Opening::new("A20", "English Opening: King's English", &["c4", "e5"]),
        Opening::new("A04", "Zukertort Opening", &["Nf3"]),
        Opening::new("A06", "Réti Opening", &["Nf3", "d5", "c4"]),
    ]
}

/// Builds the built-in opening book.
///
/// # Errors
///
/// Returns [`BookError::IllegalLine`] if a built-in line is malformed.
pub fn builtin_book() -> Result<OpeningBook, BookError> {
    OpeningBook::from_openings(&builtin_openings())
}
