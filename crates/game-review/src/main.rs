//! Game Review - classify every move of a chess game.
//!
//! Reads the moves of a game in SAN, runs them through Stockfish and prints
//! a per-move report with Brilliant / Best / ... / Blunder labels.

mod input;
mod report;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use chess_analysis::{AnalysisConfig, AnalysisEvent, GameAnalyzer, GameInput, UciEvaluatorFactory};
use chess_openings::OpeningBookService;
use clap::Parser;
use report::OutputFormat;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::Level;

/// Game Review - classifies every move of a chess game.
#[derive(Parser)]
#[command(name = "game-review")]
#[command(about = "Classify every move of a chess game with Stockfish")]
struct Args {
    /// File containing the moves in SAN (reads stdin when omitted)
    input: Option<PathBuf>,

    /// Name of the white player
    #[arg(long, default_value = "White")]
    white: String,

    /// Name of the black player
    #[arg(long, default_value = "Black")]
    black: String,

    /// Starting position, if not the standard one
    #[arg(long)]
    fen: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, default_value_os_t = AnalysisConfig::config_path())]
    config: PathBuf,

    /// Path to the engine executable (overrides the config file)
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Search depth (overrides the config file)
    #[arg(short, long)]
    depth: Option<u32>,

    /// JSON opening book (overrides the config file)
    #[arg(long)]
    book: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Log engine traffic and per-move decisions
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Command-line values take precedence over the file.
    fn apply_overrides(&self, config: &mut AnalysisConfig) {
        if let Some(engine) = &self.engine {
            config.engine_path = engine.clone();
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(book) = &self.book {
            config.opening_book = Some(book.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let mut config = AnalysisConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    args.apply_overrides(&mut config);

    let moves = read_moves(args.input.as_deref())?;
    anyhow::ensure!(!moves.is_empty(), "no moves to analyze");

    let book = Arc::new(match &config.opening_book {
        Some(path) => OpeningBookService::from_file(path),
        None => OpeningBookService::builtin(),
    });

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let analyzer = GameAnalyzer::new(UciEvaluatorFactory::new(&config), config, book)
        .with_events(events_tx);

    let stop = analyzer.stop_handle();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            tracing::info!("Stop requested, finishing the current move");
            stop.stop();
        }
    });

    let progress = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            match event {
                AnalysisEvent::Start {
                    total_moves,
                    white,
                    black,
                } => eprintln!("Analyzing {} moves: {} vs {}", total_moves, white, black),
                AnalysisEvent::Progress { progress, .. } => eprint!("\r{:>3}%", progress),
                AnalysisEvent::Complete => eprintln!(),
                AnalysisEvent::Error { error } => eprintln!("\nAnalysis failed: {}", error),
            }
        }
    });

    let game = GameInput {
        white: args.white.clone(),
        black: args.black.clone(),
        moves,
        start_fen: args.fen.clone(),
    };
    let result = analyzer.analyze(&game).await;

    drop(analyzer);
    progress.await.context("progress reporter panicked")?;

    let result = result.context("analysis failed")?;
    print!("{}", report::render(&result, args.format)?);
    Ok(())
}

fn read_moves(path: Option<&Path>) -> anyhow::Result<Vec<String>> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading moves from stdin")?;
            text
        }
    };
    Ok(input::parse_moves(&text))
}
