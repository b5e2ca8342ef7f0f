//! Chess opening book and theory detection.
//!
//! This crate maps positions (normalized FEN) to opening names, ships a small
//! built-in book, loads external JSON books, and finds how long a game stayed
//! in book.

pub mod book;
pub mod builtin;
pub mod opening;
pub mod service;
pub mod theory;

pub use book::{normalize_fen, BookError, OpeningBook};
pub use opening::Opening;
pub use service::{BookSource, OpeningBookService};
pub use theory::{match_theory, TheoryMatch};
