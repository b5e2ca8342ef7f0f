//! UCI commands sent from the analysis side (the "GUI") to an engine.

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set an engine option, e.g. `setoption name MultiPV value 2`.
    SetOption { name: String, value: String },
    /// Set up the position to search.
    Position { fen: String },
    /// Search to a fixed depth.
    Go { depth: u32 },
    /// Stop calculating.
    Stop,
    /// Quit the engine.
    Quit,
}

impl GuiCommand {
    /// `setoption name MultiPV value <n>`.
    pub fn multi_pv(lines: u32) -> Self {
        GuiCommand::SetOption {
            name: "MultiPV".to_string(),
            value: lines.to_string(),
        }
    }

    /// `position fen <fen>`.
    pub fn position_fen(fen: impl Into<String>) -> Self {
        GuiCommand::Position { fen: fen.into() }
    }

    /// Format the command as a single protocol line.
    pub fn to_uci(&self) -> String {
        match self {
            GuiCommand::Uci => "uci".to_string(),
            GuiCommand::IsReady => "isready".to_string(),
            GuiCommand::SetOption { name, value } => {
                format!("setoption name {} value {}", name, value)
            }
            GuiCommand::Position { fen } => format!("position fen {}", fen),
            GuiCommand::Go { depth } => format!("go depth {}", depth),
            GuiCommand::Stop => "stop".to_string(),
            GuiCommand::Quit => "quit".to_string(),
        }
    }
}
