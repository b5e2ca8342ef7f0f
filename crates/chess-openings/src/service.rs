//! Lazily loaded, shareable opening book.

use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::book::OpeningBook;
use crate::builtin::builtin_book;

/// Where the book comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookSource {
    /// The lines compiled into this crate.
    Builtin,
    /// A JSON object of FEN keys to opening names.
    File(PathBuf),
}

/// Opening book service.
///
/// The book is loaded on the first call to [`get`](Self::get) and cached for
/// the lifetime of the service. Share it between analyses with an `Arc`.
/// A book that fails to load is replaced by an empty one, so analysis simply
/// runs without theory detection.
#[derive(Debug)]
pub struct OpeningBookService {
    source: BookSource,
    book: OnceLock<OpeningBook>,
}

impl OpeningBookService {
    /// Creates a service that will load from `source` on first use.
    pub fn new(source: BookSource) -> Self {
        Self {
            source,
            book: OnceLock::new(),
        }
    }

    /// Service backed by the built-in lines.
    pub fn builtin() -> Self {
        Self::new(BookSource::Builtin)
    }

    /// Service backed by a JSON file.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(BookSource::File(path.into()))
    }

    /// Service around an already-built book. Nothing is loaded lazily.
    pub fn with_book(book: OpeningBook) -> Self {
        Self {
            source: BookSource::Builtin,
            book: OnceLock::from(book),
        }
    }

    /// Get or load the book.
    pub fn get(&self) -> &OpeningBook {
        self.book.get_or_init(|| self.load())
    }

    /// The configured source.
    pub fn source(&self) -> &BookSource {
        &self.source
    }

    /// Check if the book has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.book.get().is_some()
    }

    fn load(&self) -> OpeningBook {
        let loaded = match &self.source {
            BookSource::Builtin => builtin_book(),
            BookSource::File(path) => OpeningBook::load(path),
        };

        match loaded {
            Ok(book) => {
                info!(source = ?self.source, positions = book.len(), "opening book loaded");
                book
            }
            Err(err) => {
                warn!(source = ?self.source, error = %err, "failed to load opening book");
                OpeningBook::new()
            }
        }
    }
}

impl Default for OpeningBookService {
    fn default() -> Self {
        Self::builtin()
    }
}
