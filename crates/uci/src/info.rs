//! UCI info line parsing.

/// Score in centipawns or mate distance.
///
/// Engines report scores from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    /// Centipawn score (100 = 1 pawn advantage).
    Cp(i32),
    /// Mate in N moves (positive = engine winning, negative = engine losing).
    Mate(i32),
}

/// The parts of an `info` line the analysis reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineInfo {
    /// Search depth in plies.
    pub depth: Option<u32>,
    /// Index of the principal variation this line belongs to (1-based).
    pub multipv: Option<u32>,
    /// Score evaluation.
    pub score: Option<Score>,
    /// Principal variation (best line found).
    pub pv: Vec<String>,
}

impl EngineInfo {
    /// First move of the principal variation, if any.
    pub fn first_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }

    /// Parse a UCI info line. Fields the analysis does not use are skipped.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line != "info" && !line.starts_with("info ") {
            return None;
        }

        let mut info = EngineInfo::default();
        let parts: Vec<&str> = line.split_whitespace().collect();
        let mut i = 1; // Skip "info"

        while i < parts.len() {
            match parts[i] {
                "depth" => {
                    i += 1;
                    info.depth = parts.get(i).and_then(|s| s.parse().ok());
                }
                "multipv" => {
                    i += 1;
                    info.multipv = parts.get(i).and_then(|s| s.parse().ok());
                }
                "score" => {
                    i += 1;
                    let value = parts.get(i + 1).and_then(|s| s.parse().ok());
                    match (parts.get(i), value) {
                        (Some(&"cp"), Some(cp)) => info.score = Some(Score::Cp(cp)),
                        (Some(&"mate"), Some(m)) => info.score = Some(Score::Mate(m)),
                        _ => {}
                    }
                    i += 1;
                }
                "pv" => {
                    i += 1;
                    while i < parts.len() && !is_info_keyword(parts[i]) {
                        info.pv.push(parts[i].to_string());
                        i += 1;
                    }
                    continue;
                }
                // Free text runs to the end of the line.
                "string" => break,
                _ => {}
            }
            i += 1;
        }

        Some(info)
    }
}

fn is_info_keyword(s: &str) -> bool {
    matches!(
        s,
        "depth"
            | "seldepth"
            | "multipv"
            | "score"
            | "nodes"
            | "nps"
            | "time"
            | "pv"
            | "currmove"
            | "currmovenumber"
            | "hashfull"
            | "tbhits"
            | "string"
    )
}
