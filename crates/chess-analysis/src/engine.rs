//! Stockfish engine wrapper for position analysis.
//!
//! [`PositionEvaluator`] is the seam the analyzer talks to. [`UciEvaluator`]
//! implements it on top of a UCI engine child process.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uci::{EngineMessage, GuiCommand, Score};

use crate::config::AnalysisConfig;

/// Errors that can occur when working with chess engines.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to spawn the engine process.
    #[error("Failed to spawn engine: {0}")]
    SpawnError(#[from] std::io::Error),
    /// Engine executable was not found at the specified path.
    #[error("Engine not found at path: {0}")]
    NotFound(String),
    /// Engine failed to initialize properly (UCI handshake failed).
    #[error("Engine initialization failed")]
    InitFailed,
    /// The engine process went away.
    #[error("Engine closed its output")]
    Closed,
    /// Writing to the engine failed.
    #[error("Engine I/O error: {0}")]
    Io(#[source] std::io::Error),
}

/// One principal variation reported for a position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PvLine {
    /// Score relative to the side to move.
    pub score: Option<Score>,
    /// First move of the line, in UCI notation.
    pub best_move: Option<String>,
}

/// Accumulates `info` lines into MultiPV slots until `bestmove`.
///
/// Only lines tagged with `multipv` are recorded. Engines send untagged
/// scores for terminal positions (`info depth 0 score mate 0`), which carry
/// no line to play.
#[derive(Debug)]
pub struct PvCollector {
    lines: Vec<PvLine>,
}

impl PvCollector {
    pub fn new(multipv: u32) -> Self {
        let slots = usize::try_from(multipv.max(1)).unwrap_or(1);
        Self {
            lines: vec![PvLine::default(); slots],
        }
    }

    /// Feed one engine message. Returns true once the search is finished.
    pub fn accept(&mut self, message: &EngineMessage) -> bool {
        match message {
            EngineMessage::Info(info) => {
                let (Some(score), Some(k)) = (info.score, info.multipv) else {
                    return false;
                };
                let slot = usize::try_from(k)
                    .ok()
                    .and_then(|k| k.checked_sub(1))
                    .and_then(|i| self.lines.get_mut(i));
                if let Some(slot) = slot {
                    slot.score = Some(score);
                    if let Some(mv) = info.first_move() {
                        slot.best_move = Some(mv.to_string());
                    }
                }
                false
            }
            EngineMessage::BestMove { .. } => true,
            _ => false,
        }
    }

    /// The lines gathered so far, best first. Stops at the first slot that
    /// never received a score.
    pub fn into_lines(self) -> Vec<PvLine> {
        self.lines
            .into_iter()
            .take_while(|line| line.score.is_some())
            .collect()
    }
}

/// Something that can score positions.
pub trait PositionEvaluator: Send {
    /// Search `fen` to `depth` and report up to `multipv` lines.
    ///
    /// A search that does not finish in time yields whatever lines were
    /// reported so far, possibly none.
    fn evaluate(
        &mut self,
        fen: &str,
        depth: u32,
        multipv: u32,
    ) -> impl Future<Output = Result<Vec<PvLine>, EngineError>> + Send;

    /// Stop the evaluator and release its resources.
    fn shutdown(self) -> impl Future<Output = ()> + Send;
}

/// Creates a fresh evaluator for each analysis run.
pub trait EvaluatorFactory: Send + Sync {
    type Evaluator: PositionEvaluator;

    fn create(&self) -> impl Future<Output = Result<Self::Evaluator, EngineError>> + Send;
}

/// A UCI engine child process.
pub struct UciEvaluator {
    child: Child,
    stdin: ChildStdin,
    messages: mpsc::Receiver<EngineMessage>,
    name: Option<String>,
    request_timeout: Duration,
    /// A timed-out search is still running; its `bestmove` has to be drained.
    search_pending: bool,
}

impl UciEvaluator {
    /// Spawn the engine at `engine_path` and complete the UCI handshake.
    ///
    /// # Errors
    ///
    /// - `EngineError::NotFound` if the executable does not exist
    /// - `EngineError::SpawnError` if the process fails to start
    /// - `EngineError::InitFailed` if the handshake does not finish within `startup_timeout`
    pub async fn spawn(
        engine_path: &Path,
        startup_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, EngineError> {
        let mut child = Command::new(engine_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    EngineError::NotFound(engine_path.display().to_string())
                }
                _ => EngineError::SpawnError(e),
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::InitFailed)?;
        let stdout = child.stdout.take().ok_or(EngineError::InitFailed)?;

        let (tx, messages) = mpsc::channel(256);
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!(target: "engine", "<< {}", line);
                if tx.send(EngineMessage::parse(&line)).await.is_err() {
                    break;
                }
            }
        });

        let mut engine = Self {
            child,
            stdin,
            messages,
            name: None,
            request_timeout,
            search_pending: false,
        };

        match tokio::time::timeout(startup_timeout, engine.handshake()).await {
            Ok(Ok(())) => {
                info!(
                    engine = engine.name().unwrap_or("unknown"),
                    "engine ready"
                );
                Ok(engine)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "engine handshake failed");
                engine.kill().await;
                Err(EngineError::InitFailed)
            }
            Err(_) => {
                warn!(
                    timeout_ms = startup_timeout.as_millis() as u64,
                    "engine handshake timed out"
                );
                engine.kill().await;
                Err(EngineError::InitFailed)
            }
        }
    }

    /// The engine's name as reported via `id name`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn handshake(&mut self) -> Result<(), EngineError> {
        self.send(&GuiCommand::Uci).await?;
        loop {
            match self.recv().await? {
                EngineMessage::Id { name } => self.name = Some(name),
                EngineMessage::UciOk => break,
                _ => {}
            }
        }

        self.send(&GuiCommand::IsReady).await?;
        while self.recv().await? != EngineMessage::ReadyOk {}
        Ok(())
    }

    async fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        let line = command.to_uci();
        debug!(target: "engine", ">> {}", line);
        self.stdin
            .write_all(format!("{line}\n").as_bytes())
            .await
            .map_err(EngineError::Io)?;
        self.stdin.flush().await.map_err(EngineError::Io)
    }

    async fn recv(&mut self) -> Result<EngineMessage, EngineError> {
        self.messages.recv().await.ok_or(EngineError::Closed)
    }

    /// Wait out a search that was stopped after a timeout.
    async fn drain_pending(&mut self) -> Result<(), EngineError> {
        if !self.search_pending {
            return Ok(());
        }
        let timeout = self.request_timeout;
        let drain = async {
            loop {
                if let EngineMessage::BestMove { .. } = self.recv().await? {
                    return Ok::<(), EngineError>(());
                }
            }
        };
        match tokio::time::timeout(timeout, drain).await {
            Ok(result) => {
                result?;
                self.search_pending = false;
                Ok(())
            }
            Err(_) => {
                warn!("engine did not acknowledge stop");
                Ok(())
            }
        }
    }

    async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!(error = %e, "engine already exited");
        }
    }
}

impl PositionEvaluator for UciEvaluator {
    async fn evaluate(
        &mut self,
        fen: &str,
        depth: u32,
        multipv: u32,
    ) -> Result<Vec<PvLine>, EngineError> {
        self.drain_pending().await?;

        self.send(&GuiCommand::multi_pv(multipv)).await?;
        self.send(&GuiCommand::position_fen(fen)).await?;
        self.send(&GuiCommand::Go { depth }).await?;

        let mut collector = PvCollector::new(multipv);
        let timeout = self.request_timeout;
        let search = async {
            loop {
                let message = self.recv().await?;
                if collector.accept(&message) {
                    return Ok::<(), EngineError>(());
                }
            }
        };

        match tokio::time::timeout(timeout, search).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    fen,
                    timeout_ms = timeout.as_millis() as u64,
                    "evaluation timed out, using partial lines"
                );
                self.send(&GuiCommand::Stop).await?;
                self.search_pending = true;
            }
        }

        Ok(collector.into_lines())
    }

    async fn shutdown(mut self) {
        if self.send(&GuiCommand::Quit).await.is_err() {
            debug!("engine stdin already closed");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.kill().await;
    }
}

/// Spawns [`UciEvaluator`]s from an [`AnalysisConfig`].
#[derive(Debug, Clone)]
pub struct UciEvaluatorFactory {
    engine_path: PathBuf,
    startup_timeout: Duration,
    request_timeout: Duration,
}

impl UciEvaluatorFactory {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            engine_path: config.engine_path.clone(),
            startup_timeout: config.startup_timeout(),
            request_timeout: config.request_timeout(),
        }
    }
}

impl EvaluatorFactory for UciEvaluatorFactory {
    type Evaluator = UciEvaluator;

    async fn create(&self) -> Result<UciEvaluator, EngineError> {
        UciEvaluator::spawn(&self.engine_path, self.startup_timeout, self.request_timeout).await
    }
}
