//! Rendering analysis results.

use std::fmt::{self, Write};

use chess_analysis::{
    bar_percentage, AnalysisResult, Classification, Evaluation, MoveAnalysis, PlayerAnalysis,
};
use shakmaty::Color;

const BAR_WIDTH: usize = 10;

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Render `result` in the requested format.
pub fn render(result: &AnalysisResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

fn render_text(result: &AnalysisResult) -> Result<String, fmt::Error> {
    let mut out = String::new();

    if let Some(name) = &result.opening_name {
        writeln!(out, "Opening: {}", name)?;
        writeln!(out)?;
    }

    for analysis in result.moves() {
        write_move(&mut out, analysis)?;
    }

    writeln!(out)?;
    write_stats(&mut out, &result.white, &result.black)?;
    Ok(out)
}

fn write_move(out: &mut String, analysis: &MoveAnalysis) -> fmt::Result {
    let prefix = match analysis.color {
        Color::White => format!("{}.", analysis.move_number),
        Color::Black => format!("{}...", analysis.move_number),
    };
    let san = format!("{}{}", analysis.san, analysis.classification.symbol());
    let best = match (&analysis.best_move, analysis.classification) {
        (
            Some(best),
            Classification::Inaccuracy | Classification::Mistake | Classification::Blunder,
        ) => format!("  best {}", best),
        _ => String::new(),
    };
    writeln!(
        out,
        "{:>6} {:<10} {:<11} {:>7} {}{}",
        prefix,
        san,
        analysis.classification,
        analysis.evaluation.to_string(),
        eval_bar(analysis.evaluation),
        best
    )
}

/// White's share of the bar as `#`, Black's as `.`.
fn eval_bar(eval: Evaluation) -> String {
    let black = (bar_percentage(eval) / 100.0 * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(BAR_WIDTH - black), ".".repeat(black))
}

fn write_stats(out: &mut String, white: &PlayerAnalysis, black: &PlayerAnalysis) -> fmt::Result {
    writeln!(out, "{:<12} {:>8} {:>8}", "", white.player, black.player)?;
    for classification in Classification::ALL {
        writeln!(
            out,
            "{:<12} {:>8} {:>8}",
            classification.as_str(),
            white.stats.count(classification),
            black.stats.count(classification)
        )?;
    }
    writeln!(
        out,
        "{:<12} {:>8} {:>8}",
        "total", white.stats.total, black.stats.total
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(
        index: usize,
        move_number: u32,
        san: &str,
        classification: Classification,
        color: Color,
    ) -> MoveAnalysis {
        MoveAnalysis {
            index,
            move_number,
            san: san.to_string(),
            color,
            classification,
            best_move: Some("g8f6".to_string()),
            evaluation: Evaluation::Centipawns(-250),
            previous_evaluation: Evaluation::Centipawns(30),
        }
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            white: PlayerAnalysis::new(
                "Alice",
                vec![
                    analysis(1, 1, "e4", Classification::Theory, Color::White),
                    analysis(3, 2, "Qh5", Classification::Mistake, Color::White),
                ],
            ),
            black: PlayerAnalysis::new(
                "Bob",
                vec![analysis(2, 1, "e5", Classification::Theory, Color::Black)],
            ),
            opening_name: Some("King's Pawn Game".to_string()),
        }
    }

    #[test]
    fn test_text_report() {
        let text = render(&result(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("Opening: King's Pawn Game"));
        assert!(text.contains("1. e4"));
        assert!(text.contains("1... e5"));
        assert!(text.contains("2. Qh5?"));
        assert!(text.contains("best g8f6"));
        // Book moves do not get a suggestion.
        assert_eq!(text.matches("best g8f6").count(), 1);
        assert!(text.lines().any(|line| line.starts_with("theory") && line.contains('1')));
    }

    #[test]
    fn test_text_report_from_black_to_move() {
        // A game set up with Black to move on move 12.
        let result = AnalysisResult {
            white: PlayerAnalysis::new(
                "Alice",
                vec![analysis(2, 13, "Nf3", Classification::Best, Color::White)],
            ),
            black: PlayerAnalysis::new(
                "Bob",
                vec![analysis(1, 12, "e5", Classification::Best, Color::Black)],
            ),
            opening_name: None,
        };
        let text = render(&result, OutputFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().map(str::trim_start).collect();
        assert!(lines[0].starts_with("12... e5"));
        assert!(lines[1].starts_with("13. Nf3"));
    }

    #[test]
    fn test_eval_bar() {
        assert_eq!(eval_bar(Evaluation::Centipawns(0)), "[#####.....]");
        assert_eq!(eval_bar(Evaluation::Mate(3)), "[##########]");
        assert_eq!(eval_bar(Evaluation::Mate(-1)), "[..........]");
    }

    #[test]
    fn test_json_report() {
        let json = render(&result(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["white"]["player"], "Alice");
        assert_eq!(value["white"]["stats"]["mistake"], 1);
        assert_eq!(value["black"]["moves"][0]["classification"], "theory");
        assert_eq!(value["black"]["moves"][0]["move_number"], 1);
        assert_eq!(value["opening_name"], "King's Pawn Game");
    }
}
