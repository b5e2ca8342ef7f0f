//! Game analysis with move classification.
//!
//! [`GameAnalyzer`] replays a game ply by ply, asks a [`PositionEvaluator`]
//! about the position before and after every move, and labels each move.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chess_openings::{match_theory, OpeningBookService, TheoryMatch};
use serde::{Deserialize, Serialize};
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::board::PlayedMove;
use crate::brilliant::consider_brilliant_classification;
use crate::classification::{
    classify_move, AnalysisResult, Classification, MoveAnalysis, PlayerAnalysis,
};
use crate::config::AnalysisConfig;
use crate::critical::{consider_critical_classification, CurrentNode, PreviousNode};
use crate::engine::{EngineError, EvaluatorFactory, PositionEvaluator, PvLine};
use crate::evaluation::Evaluation;

/// Lines requested for the position before a move: best and second best.
const LINES_BEFORE: u32 = 2;
/// Lines requested for the position after a move.
const LINES_AFTER: u32 = 1;

/// Errors that can occur during game analysis.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error from the analysis engine.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    /// Another analysis is in progress on this analyzer.
    #[error("An analysis is already running")]
    AlreadyRunning,
    /// The starting position could not be parsed.
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),
    /// A move of the game is not legal where it is played.
    #[error("Illegal move {san} at ply {index}")]
    IllegalMove { index: usize, san: String },
}

/// The game to analyze.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameInput {
    pub white: String,
    pub black: String,
    /// Moves in SAN, in playing order.
    pub moves: Vec<String>,
    /// Starting position. The standard one when unset.
    #[serde(default)]
    pub start_fen: Option<String>,
}

/// Progress notifications emitted while a game is analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalysisEvent {
    Start {
        total_moves: usize,
        white: String,
        black: String,
    },
    Progress {
        move_index: usize,
        /// Percent done, rounded.
        progress: u32,
        moves_analyzed: usize,
    },
    Complete,
    Error {
        error: String,
    },
}

/// Requests that a running analysis stop after the current move.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One verified ply of the game.
#[derive(Debug, Clone)]
struct Ply {
    before: Chess,
    after: Chess,
    mv: Move,
    san: String,
}

/// Engine verdicts around one ply, all White-positive.
#[derive(Debug, Clone, PartialEq)]
struct PlyEvaluation {
    before: Evaluation,
    second: Option<Evaluation>,
    best_move: Option<String>,
    after: Evaluation,
}

/// Clears the running flag when an analysis ends, however it ends.
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Analyzes chess games and classifies every move.
///
/// One analyzer runs one analysis at a time; a second call to
/// [`analyze`](Self::analyze) while the first is in flight is rejected.
pub struct GameAnalyzer<F> {
    factory: F,
    config: AnalysisConfig,
    book: Arc<OpeningBookService>,
    running: AtomicBool,
    stop: Arc<AtomicBool>,
    events: Option<UnboundedSender<AnalysisEvent>>,
}

impl<F: EvaluatorFactory> GameAnalyzer<F> {
    pub fn new(factory: F, config: AnalysisConfig, book: Arc<OpeningBookService>) -> Self {
        Self {
            factory,
            config,
            book,
            running: AtomicBool::new(false),
            stop: Arc::new(AtomicBool::new(false)),
            events: None,
        }
    }

    /// Send [`AnalysisEvent`]s to `events`.
    #[must_use]
    pub fn with_events(mut self, events: UnboundedSender<AnalysisEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze `game` from the first move to the last.
    ///
    /// A stop request ends the run after the move being analyzed; the moves
    /// done so far are returned.
    ///
    /// # Errors
    ///
    /// - `AnalyzerError::AlreadyRunning` if this analyzer is busy
    /// - `AnalyzerError::InvalidFen` / `AnalyzerError::IllegalMove` for a bad game
    /// - `AnalyzerError::Engine` if the engine cannot be started
    pub async fn analyze(&self, game: &GameInput) -> Result<AnalysisResult, AnalyzerError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AnalyzerError::AlreadyRunning);
        }
        let _guard = RunGuard(&self.running);
        self.stop.store(false, Ordering::SeqCst);

        match self.run(game).await {
            Ok(result) => {
                self.emit(AnalysisEvent::Complete);
                Ok(result)
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                self.emit(AnalysisEvent::Error { error: e.to_string() });
                Err(e)
            }
        }
    }

    async fn run(&self, game: &GameInput) -> Result<AnalysisResult, AnalyzerError> {
        let plies = replay(game)?;
        let total = plies.len();

        info!(white = %game.white, black = %game.black, moves = total, "starting analysis");
        self.emit(AnalysisEvent::Start {
            total_moves: total,
            white: game.white.clone(),
            black: game.black.clone(),
        });

        let theory = match_theory(self.book.get(), plies.iter().map(|ply| fen(&ply.after)));
        debug!(theory_plies = theory.theory_plies(), "opening theory matched");

        let mut evaluator = self.factory.create().await?;
        let depth = self.config.effective_depth();

        let mut white_moves = Vec::new();
        let mut black_moves = Vec::new();
        let mut previous_evaluation = Evaluation::default();

        for (i, ply) in plies.iter().enumerate() {
            if self.stop.load(Ordering::SeqCst) {
                info!(moves_analyzed = i, "analysis stopped");
                break;
            }

            let mover = ply.before.turn();
            let before_lines =
                evaluate_ply(&mut evaluator, &ply.before, depth, LINES_BEFORE, i).await;
            let after_lines = evaluate_ply(&mut evaluator, &ply.after, depth, LINES_AFTER, i).await;
            let evaluation = PlyEvaluation::from_lines(&before_lines, &after_lines, mover);

            if i == 0 {
                previous_evaluation = evaluation.before;
            }

            let classification = classify_ply(i, ply, &theory, previous_evaluation, &evaluation);
            debug!(ply = i + 1, san = %ply.san, %classification, "move classified");

            let analysis = MoveAnalysis {
                index: i + 1,
                move_number: ply.before.fullmoves().get(),
                san: ply.san.clone(),
                color: mover,
                classification,
                best_move: evaluation.best_move.clone(),
                evaluation: evaluation.after,
                previous_evaluation,
            };
            match mover {
                Color::White => white_moves.push(analysis),
                Color::Black => black_moves.push(analysis),
            }
            previous_evaluation = evaluation.after;

            self.emit(AnalysisEvent::Progress {
                move_index: i + 1,
                progress: percent(i + 1, total),
                moves_analyzed: i + 1,
            });
        }

        evaluator.shutdown().await;
        info!(
            white_moves = white_moves.len(),
            black_moves = black_moves.len(),
            "analysis finished"
        );

        Ok(AnalysisResult {
            white: PlayerAnalysis::new(game.white.clone(), white_moves),
            black: PlayerAnalysis::new(game.black.clone(), black_moves),
            opening_name: theory.opening_name,
        })
    }

    fn emit(&self, event: AnalysisEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                debug!("event receiver dropped");
            }
        }
    }
}

impl PlyEvaluation {
    fn from_lines(before: &[PvLine], after: &[PvLine], mover: Color) -> Self {
        let top = before.first();
        let score = |line: Option<&PvLine>, turn: Color| {
            line.and_then(|l| l.score)
                .map(|s| Evaluation::from_side_to_move(s, turn))
        };

        Self {
            before: score(top, mover).unwrap_or_default(),
            second: score(before.get(1), mover),
            best_move: top.and_then(|l| l.best_move.clone()),
            after: score(after.first(), !mover).unwrap_or_default(),
        }
    }
}

/// Evaluate one position. Failures are logged and yield no lines.
async fn evaluate_ply<E: PositionEvaluator>(
    evaluator: &mut E,
    position: &Chess,
    depth: u32,
    multipv: u32,
    index: usize,
) -> Vec<PvLine> {
    match evaluator.evaluate(&fen(position), depth, multipv).await {
        Ok(lines) => lines,
        Err(e) => {
            warn!(ply = index + 1, error = %e, "evaluation failed, classifying without it");
            Vec::new()
        }
    }
}

/// Label one ply. Theory beats everything, then mate, then engine comparison.
fn classify_ply(
    index: usize,
    ply: &Ply,
    theory: &TheoryMatch,
    previous_evaluation: Evaluation,
    evaluation: &PlyEvaluation,
) -> Classification {
    if theory.is_theory(index) {
        return Classification::Theory;
    }
    if ply.after.is_checkmate() {
        return Classification::Best;
    }

    let mover = ply.before.turn();
    let top_move_played = evaluation
        .best_move
        .as_deref()
        .is_some_and(|uci| is_same_move(&ply.before, uci, &ply.mv));

    let mut classification = if top_move_played {
        Classification::Best
    } else {
        classify_move(previous_evaluation, evaluation.after, mover)
    };

    let previous = PreviousNode {
        position: &ply.before,
        evaluation: evaluation.before,
        second_evaluation: evaluation.second,
    };
    let current = CurrentNode {
        position: &ply.after,
        played_move: PlayedMove::from_move(&ply.mv, mover),
        evaluation: evaluation.after,
    };

    if top_move_played && consider_critical_classification(&previous, &current) {
        classification = Classification::Critical;
    }

    if matches!(classification, Classification::Best | Classification::Critical)
        && consider_brilliant_classification(&previous, &current)
    {
        classification = Classification::Brilliant;
    }

    classification
}

/// Whether the engine's `uci` move is the move that was played, compared in SAN.
fn is_same_move(position: &Chess, uci: &str, played: &Move) -> bool {
    let Ok(engine_move) = uci.parse::<UciMove>() else {
        return false;
    };
    let Ok(engine_move) = engine_move.to_move(position) else {
        return false;
    };
    San::from_move(position, &engine_move) == San::from_move(position, played)
}

/// Validate the game and compute the position around every ply.
fn replay(game: &GameInput) -> Result<Vec<Ply>, AnalyzerError> {
    let mut position = match &game.start_fen {
        Some(start) => start
            .parse::<Fen>()
            .map_err(|e| AnalyzerError::InvalidFen(e.to_string()))?
            .into_position::<Chess>(CastlingMode::Standard)
            .map_err(|e| AnalyzerError::InvalidFen(e.to_string()))?,
        None => Chess::default(),
    };

    let mut plies = Vec::with_capacity(game.moves.len());
    for (index, san) in game.moves.iter().enumerate() {
        let illegal = || AnalyzerError::IllegalMove {
            index,
            san: san.clone(),
        };
        let mv = san
            .parse::<SanPlus>()
            .map_err(|_| illegal())?
            .san
            .to_move(&position)
            .map_err(|_| illegal())?;

        let before = position.clone();
        let san = SanPlus::from_move(before.clone(), &mv).to_string();
        position = position.play(&mv).map_err(|_| illegal())?;
        plies.push(Ply {
            before,
            after: position.clone(),
            mv,
            san,
        });
    }
    Ok(plies)
}

fn fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

fn percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 100;
    }
    (done as f64 / total as f64 * 100.0).round() as u32
}
