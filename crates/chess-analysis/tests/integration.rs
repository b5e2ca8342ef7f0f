//! Integration tests for chess-analysis crate.
//!
//! Most tests drive the analyzer with a scripted evaluator. The ones marked
//! `#[ignore]` need Stockfish installed and available in PATH.
//! Run them with: `cargo test -p chess-analysis --test integration -- --ignored`

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use chess_analysis::{
    AnalysisConfig, AnalysisEvent, AnalysisResult, AnalyzerError, Classification, EngineError,
    Evaluation, EvaluatorFactory, GameAnalyzer, GameInput, PositionEvaluator, PvLine, StopHandle,
    UciEvaluator,
};
use chess_openings::{normalize_fen, OpeningBook, OpeningBookService};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Position};
use tokio::sync::{mpsc, Notify};
use uci::Score;

// =============================================================================
// Scripted evaluator
// =============================================================================

/// Shared bookkeeping between a test and the evaluators it hands out.
#[derive(Default)]
struct EvaluatorLog {
    created: AtomicUsize,
    evaluations: AtomicUsize,
    shutdowns: AtomicUsize,
    /// When set, the first evaluation waits for `release`.
    hold_first: AtomicBool,
    release: Notify,
    /// Stop the analysis during the given (1-based) evaluation.
    stop_at: OnceLock<(usize, StopHandle)>,
}

#[derive(Clone, Default)]
struct ScriptedFactory {
    lines: Arc<HashMap<String, Vec<PvLine>>>,
    log: Arc<EvaluatorLog>,
    fail_start: bool,
    fail_evaluations: bool,
}

struct ScriptedEvaluator {
    lines: Arc<HashMap<String, Vec<PvLine>>>,
    log: Arc<EvaluatorLog>,
    fail: bool,
}

impl EvaluatorFactory for ScriptedFactory {
    type Evaluator = ScriptedEvaluator;

    async fn create(&self) -> Result<ScriptedEvaluator, EngineError> {
        if self.fail_start {
            return Err(EngineError::InitFailed);
        }
        self.log.created.fetch_add(1, Ordering::SeqCst);
        Ok(ScriptedEvaluator {
            lines: Arc::clone(&self.lines),
            log: Arc::clone(&self.log),
            fail: self.fail_evaluations,
        })
    }
}

impl PositionEvaluator for ScriptedEvaluator {
    async fn evaluate(
        &mut self,
        fen: &str,
        _depth: u32,
        multipv: u32,
    ) -> Result<Vec<PvLine>, EngineError> {
        let call = self.log.evaluations.fetch_add(1, Ordering::SeqCst) + 1;
        if self.log.hold_first.swap(false, Ordering::SeqCst) {
            self.log.release.notified().await;
        }
        if let Some((at, handle)) = self.log.stop_at.get() {
            if call == *at {
                handle.stop();
            }
        }
        if self.fail {
            return Err(EngineError::Closed);
        }

        let mut lines = self.lines.get(&normalize_fen(fen)).cloned().unwrap_or_default();
        lines.truncate(multipv as usize);
        Ok(lines)
    }

    async fn shutdown(self) {
        self.log.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn start_position(start_fen: Option<&str>) -> Chess {
    match start_fen {
        Some(fen) => fen
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap(),
        None => Chess::default(),
    }
}

/// Normalized FEN after playing `moves` from the start position.
fn key_after(start_fen: Option<&str>, moves: &[&str]) -> String {
    let mut pos = start_position(start_fen);
    for san in moves {
        let m = san.parse::<SanPlus>().unwrap().san.to_move(&pos).unwrap();
        pos = pos.play(&m).unwrap();
    }
    normalize_fen(&Fen::from_position(pos, EnPassantMode::Legal).to_string())
}

fn cp(score: i32, best_move: &str) -> PvLine {
    PvLine {
        score: Some(Score::Cp(score)),
        best_move: Some(best_move.to_string()),
    }
}

fn mate(moves: i32, best_move: &str) -> PvLine {
    PvLine {
        score: Some(Score::Mate(moves)),
        best_move: Some(best_move.to_string()),
    }
}

fn game(moves: &[&str], start_fen: Option<&str>) -> GameInput {
    GameInput {
        white: "Alice".to_string(),
        black: "Bob".to_string(),
        moves: moves.iter().map(|m| m.to_string()).collect(),
        start_fen: start_fen.map(str::to_string),
    }
}

fn empty_book() -> Arc<OpeningBookService> {
    Arc::new(OpeningBookService::with_book(OpeningBook::new()))
}

fn analyzer(
    factory: ScriptedFactory,
    book: Arc<OpeningBookService>,
) -> GameAnalyzer<ScriptedFactory> {
    GameAnalyzer::new(factory, AnalysisConfig::default(), book)
}

fn classifications(result: &AnalysisResult) -> Vec<Classification> {
    result.moves().iter().map(|m| m.classification).collect()
}

fn drain(rx: &mut mpsc::UnboundedReceiver<AnalysisEvent>) -> Vec<AnalysisEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// =============================================================================
// Classification scenarios
// =============================================================================

#[tokio::test]
async fn test_queen_grab_is_a_blunder() {
    let moves = ["e4", "e5", "Qh5", "g6", "Qxe5+"];
    let mut lines = HashMap::new();
    // After 2...g6, White to move: slightly better.
    lines.insert(key_after(None, &moves[..4]), vec![cp(50, "h5f3"), cp(20, "h5e2")]);
    // After 3.Qxe5+, Black to move and winning.
    lines.insert(key_after(None, &moves), vec![cp(300, "d8e7")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, Arc::new(OpeningBookService::builtin()))
        .analyze(&game(&moves, None))
        .await
        .unwrap();

    let last = result.moves()[4].clone();
    assert_eq!(last.san, "Qxe5+");
    assert_eq!(last.previous_evaluation, Evaluation::Centipawns(50));
    assert_eq!(last.evaluation, Evaluation::Centipawns(-300));
    assert_eq!(last.best_move.as_deref(), Some("h5f3"));
    assert_eq!(last.classification, Classification::Blunder);
    assert_eq!(result.white.stats.blunder, 1);
}

#[tokio::test]
async fn test_book_prefix_then_engine() {
    let moves = ["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6"];
    let mut lines = HashMap::new();
    lines.insert(key_after(None, &moves[..5]), vec![cp(-30, "f8c5"), cp(-40, "g8f6")]);
    lines.insert(key_after(None, &moves), vec![cp(150, "f3g5")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, Arc::new(OpeningBookService::builtin()))
        .analyze(&game(&moves, None))
        .await
        .unwrap();

    assert_eq!(result.opening_name.as_deref(), Some("Italian Game"));
    assert_eq!(
        classifications(&result),
        vec![
            Classification::Theory,
            Classification::Theory,
            Classification::Theory,
            Classification::Theory,
            Classification::Theory,
            Classification::Inaccuracy,
        ]
    );
    assert_eq!(result.white.stats.theory, 3);
    assert_eq!(result.black.stats.theory, 2);
}

#[tokio::test]
async fn test_slower_mate_against_the_mover_is_excellent() {
    let mut lines = HashMap::new();
    lines.insert(key_after(None, &[]), vec![mate(-5, "d2d4")]);
    // Black to move mates in 4.
    lines.insert(key_after(None, &["e4"]), vec![mate(4, "d8h4")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, empty_book())
        .analyze(&game(&["e4"], None))
        .await
        .unwrap();

    let first = &result.white.moves[0];
    assert_eq!(first.previous_evaluation, Evaluation::Mate(-5));
    assert_eq!(first.evaluation, Evaluation::Mate(-4));
    assert_eq!(first.classification, Classification::Excellent);
}

#[tokio::test]
async fn test_checkmate_is_best() {
    let moves = ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"];
    let result = analyzer(ScriptedFactory::default(), empty_book())
        .analyze(&game(&moves, None))
        .await
        .unwrap();
    assert_eq!(result.moves()[6].classification, Classification::Best);
}

#[tokio::test]
async fn test_move_numbers_follow_the_start_position() {
    let start = "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 12";
    let result = analyzer(ScriptedFactory::default(), empty_book())
        .analyze(&game(&["e5", "Nf3"], Some(start)))
        .await
        .unwrap();

    let numbered: Vec<(u32, Color)> = result
        .moves()
        .iter()
        .map(|analysis| (analysis.move_number, analysis.color))
        .collect();
    assert_eq!(numbered, vec![(12, Color::Black), (13, Color::White)]);
}

#[tokio::test]
async fn test_sound_sacrifice_is_brilliant() {
    let start = "b3k3/8/8/8/8/8/8/3R2K1 w - - 0 1";
    let mut lines = HashMap::new();
    lines.insert(key_after(Some(start), &[]), vec![cp(50, "d1d5"), cp(-300, "d1d2")]);
    lines.insert(key_after(Some(start), &["Rd5"]), vec![cp(-50, "a8d5")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, empty_book())
        .analyze(&game(&["Rd5"], Some(start)))
        .await
        .unwrap();

    assert_eq!(result.white.moves[0].classification, Classification::Brilliant);
    assert_eq!(result.white.stats.brilliant, 1);
}

#[tokio::test]
async fn test_only_good_move_is_critical() {
    let mut lines = HashMap::new();
    lines.insert(key_after(None, &[]), vec![cp(30, "e2e4"), cp(-200, "d2d4")]);
    lines.insert(key_after(None, &["e4"]), vec![cp(-30, "e7e5")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, empty_book())
        .analyze(&game(&["e4"], None))
        .await
        .unwrap();
    assert_eq!(result.white.moves[0].classification, Classification::Critical);
}

#[tokio::test]
async fn test_no_second_line_means_no_critical() {
    let mut lines = HashMap::new();
    lines.insert(key_after(None, &[]), vec![cp(30, "e2e4")]);
    lines.insert(key_after(None, &["e4"]), vec![cp(-30, "e7e5")]);

    let factory = ScriptedFactory {
        lines: Arc::new(lines),
        ..Default::default()
    };
    let result = analyzer(factory, empty_book())
        .analyze(&game(&["e4"], None))
        .await
        .unwrap();
    assert_eq!(result.white.moves[0].classification, Classification::Best);
}

// =============================================================================
// Events, errors and lifecycle
// =============================================================================

#[tokio::test]
async fn test_event_sequence_and_engine_lifecycle() {
    let factory = ScriptedFactory::default();
    let log = Arc::clone(&factory.log);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let analyzer = analyzer(factory, empty_book()).with_events(tx);

    let result = analyzer.analyze(&game(&["e4", "e5", "Nf3"], None)).await.unwrap();
    assert_eq!(result.moves().len(), 3);

    let events = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            AnalysisEvent::Start {
                total_moves: 3,
                white: "Alice".to_string(),
                black: "Bob".to_string(),
            },
            AnalysisEvent::Progress { move_index: 1, progress: 33, moves_analyzed: 1 },
            AnalysisEvent::Progress { move_index: 2, progress: 67, moves_analyzed: 2 },
            AnalysisEvent::Progress { move_index: 3, progress: 100, moves_analyzed: 3 },
            AnalysisEvent::Complete,
        ]
    );

    // Two evaluations per ply, one engine, shut down once.
    assert_eq!(log.evaluations.load(Ordering::SeqCst), 6);
    assert_eq!(log.created.load(Ordering::SeqCst), 1);
    assert_eq!(log.shutdowns.load(Ordering::SeqCst), 1);
    assert!(!analyzer.is_running());
}

#[tokio::test]
async fn test_event_serialization() {
    let event = AnalysisEvent::Progress { move_index: 4, progress: 50, moves_analyzed: 4 };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "progress");
    assert_eq!(json["move_index"], 4);
    assert_eq!(serde_json::to_value(AnalysisEvent::Complete).unwrap()["type"], "complete");
}

#[tokio::test]
async fn test_engine_start_failure_reports_one_error() {
    let factory = ScriptedFactory {
        fail_start: true,
        ..Default::default()
    };
    let (tx, mut rx) = mpsc::unbounded_channel();
    let analyzer = analyzer(factory, empty_book()).with_events(tx);

    let err = analyzer.analyze(&game(&["e4"], None)).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::Engine(EngineError::InitFailed)));

    let events = drain(&mut rx);
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], AnalysisEvent::Start { .. }));
    assert!(matches!(events[1], AnalysisEvent::Error { .. }));
    assert!(!analyzer.is_running());
}

#[tokio::test]
async fn test_illegal_move_is_rejected_before_engine_start() {
    let factory = ScriptedFactory::default();
    let log = Arc::clone(&factory.log);
    let analyzer = analyzer(factory, empty_book());

    let err = analyzer.analyze(&game(&["e4", "e4"], None)).await.unwrap_err();
    assert!(matches!(err, AnalyzerError::IllegalMove { index: 1, .. }));
    assert_eq!(log.created.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_failed_evaluations_degrade_gracefully() {
    let factory = ScriptedFactory {
        fail_evaluations: true,
        ..Default::default()
    };
    let result = analyzer(factory, empty_book())
        .analyze(&game(&["d4", "d5", "c4"], None))
        .await
        .unwrap();

    assert_eq!(result.moves().len(), 3);
    for analysis in result.moves() {
        assert_eq!(analysis.evaluation, Evaluation::Centipawns(0));
        assert_eq!(analysis.best_move, None);
    }
}

#[tokio::test]
async fn test_second_analysis_is_rejected_while_running() {
    let factory = ScriptedFactory::default();
    factory.log.hold_first.store(true, Ordering::SeqCst);
    let log = Arc::clone(&factory.log);
    let analyzer = Arc::new(analyzer(factory, empty_book()));

    let running = {
        let analyzer = Arc::clone(&analyzer);
        tokio::spawn(async move { analyzer.analyze(&game(&["e4", "e5"], None)).await })
    };
    while log.evaluations.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }
    assert!(analyzer.is_running());

    let second = analyzer.analyze(&game(&["d4"], None)).await;
    assert!(matches!(second, Err(AnalyzerError::AlreadyRunning)));

    log.release.notify_one();
    let first = running.await.unwrap().unwrap();
    assert_eq!(first.moves().len(), 2);
    assert!(!analyzer.is_running());
}

#[tokio::test]
async fn test_stop_ends_after_current_move() {
    let factory = ScriptedFactory::default();
    let log = Arc::clone(&factory.log);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let analyzer = analyzer(factory, empty_book()).with_events(tx);
    // The second evaluation belongs to the first ply.
    assert!(log.stop_at.set((2, analyzer.stop_handle())).is_ok());

    let result = analyzer.analyze(&game(&["e4", "e5", "Nf3", "Nc6"], None)).await.unwrap();
    assert_eq!(result.moves().len(), 1);
    assert_eq!(log.shutdowns.load(Ordering::SeqCst), 1);
    assert!(analyzer.stop_handle().is_stopped());

    let events = drain(&mut rx);
    assert_eq!(events.last(), Some(&AnalysisEvent::Complete));
    assert_eq!(
        events.iter().filter(|e| matches!(e, AnalysisEvent::Progress { .. })).count(),
        1
    );
}

// =============================================================================
// Real engine
// =============================================================================

/// Check if Stockfish is available in PATH.
fn stockfish_available() -> bool {
    std::process::Command::new("stockfish")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .is_ok()
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn test_stockfish_reports_two_lines() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let mut engine = UciEvaluator::spawn(
        Path::new("stockfish"),
        Duration::from_secs(5),
        Duration::from_secs(10),
    )
    .await
    .expect("Failed to start Stockfish");
    assert!(engine
        .name()
        .is_some_and(|name| name.to_lowercase().contains("stockfish")));

    let lines = engine
        .evaluate("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1", 10, 2)
        .await
        .expect("Failed to evaluate starting position");
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.best_move.is_some()));
    assert_ne!(lines[0].best_move, lines[1].best_move);

    engine.shutdown().await;
}

#[tokio::test]
#[ignore = "requires Stockfish"]
async fn test_stockfish_scholars_mate() {
    if !stockfish_available() {
        eprintln!("Skipping test: Stockfish not available");
        return;
    }

    let config = AnalysisConfig {
        depth: 10,
        ..AnalysisConfig::default()
    };
    let analyzer = GameAnalyzer::new(
        chess_analysis::UciEvaluatorFactory::new(&config),
        config,
        Arc::new(OpeningBookService::builtin()),
    );
    let moves = ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"];
    let result = analyzer.analyze(&game(&moves, None)).await.expect("analysis failed");

    assert_eq!(result.moves().len(), 7);
    assert_eq!(result.moves()[0].classification, Classification::Theory);
    assert_eq!(result.moves()[6].classification, Classification::Best);
    // Nf6 allows mate in one.
    assert!(matches!(
        result.moves()[5].classification,
        Classification::Blunder | Classification::Mistake
    ));
}
