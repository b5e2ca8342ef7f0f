//! UCI (Universal Chess Interface) protocol types for driving analysis engines.
//!
//! This crate covers the GUI side of the protocol: formatting the commands a
//! client sends and parsing the lines an engine answers with. It performs no
//! I/O; process handling lives with the caller.
//!
//! # Commands sent to the engine
//!
//! - `uci` / `isready` - Handshake
//! - `setoption name MultiPV value <n>` - Request several principal variations
//! - `position fen <fen>` - Set position
//! - `go depth <d>` - Start search
//! - `stop` / `quit`
//!
//! # Messages read from the engine
//!
//! - `id name ...`, `uciok`, `readyok`
//! - `info ... multipv <k> ... score (cp|mate) <n> ... pv <move> ...`
//! - `bestmove <move> [ponder <move>]`

mod command;
mod info;

pub use command::GuiCommand;
pub use info::{EngineInfo, Score};

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification (`id name`).
    Id { name: String },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Search finished. `mv` is `None` when there are no legal moves.
    BestMove { mv: Option<String> },
    /// Anything else (option declarations, authors, banners, ...).
    Other,
}

impl EngineMessage {
    /// Parse one line of engine output.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("uciok") => EngineMessage::UciOk,
            Some("readyok") => EngineMessage::ReadyOk,
            Some("id") if parts.next() == Some("name") => EngineMessage::Id {
                name: parts.collect::<Vec<_>>().join(" "),
            },
            Some("info") => match EngineInfo::parse(line) {
                Some(info) => EngineMessage::Info(info),
                None => EngineMessage::Other,
            },
            Some("bestmove") => EngineMessage::BestMove {
                mv: parts
                    .next()
                    .filter(|m| *m != "(none)" && *m != "0000")
                    .map(str::to_string),
            },
            _ => EngineMessage::Other,
        }
    }
}
