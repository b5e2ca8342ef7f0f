//! Chess move classification with Stockfish integration.
//!
//! This crate labels every move of a game (Brilliant, Critical, Best, ...,
//! Blunder, Theory) by comparing engine evaluations before and after the move
//! and by inspecting the board for hanging, trapped and sacrificed pieces.
//!
//! # Overview
//!
//! - [`Evaluation`] - Position evaluation (centipawn or mate score)
//! - [`Classification`] - The label given to a move
//! - [`safety`] - Static attacker/defender analysis on board snapshots
//! - [`UciEvaluator`] - Async wrapper for UCI analysis engines like Stockfish
//! - [`GameAnalyzer`] - Analyzes complete games move by move
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use chess_analysis::{AnalysisConfig, GameAnalyzer, GameInput, UciEvaluatorFactory};
//! use chess_openings::OpeningBookService;
//!
//! let config = AnalysisConfig::default();
//! let analyzer = GameAnalyzer::new(
//!     UciEvaluatorFactory::new(&config),
//!     config,
//!     Arc::new(OpeningBookService::builtin()),
//! );
//! let result = analyzer.analyze(&game).await?;
//! println!("White blunders: {}", result.white.stats.blunder);
//! ```

pub mod analyzer;
pub mod board;
pub mod brilliant;
pub mod classification;
pub mod config;
pub mod critical;
pub mod engine;
pub mod evaluation;
pub mod safety;

pub use analyzer::{AnalysisEvent, AnalyzerError, GameAnalyzer, GameInput, StopHandle};
pub use board::{piece_value, BoardPiece, PlayedMove, RawMove};
pub use brilliant::consider_brilliant_classification;
pub use classification::{
    classify_move, AnalysisResult, Classification, MoveAnalysis, PlayerAnalysis, PlayerStats,
};
pub use config::{AnalysisConfig, ConfigError};
pub use critical::{
    consider_critical_classification, is_move_critical_candidate, CurrentNode, PreviousNode,
};
pub use engine::{
    EngineError, EvaluatorFactory, PositionEvaluator, PvCollector, PvLine, UciEvaluator,
    UciEvaluatorFactory,
};
pub use evaluation::{bar_percentage, expected_points, expected_points_loss, Evaluation};
