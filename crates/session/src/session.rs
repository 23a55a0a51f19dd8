//! The game session: one authoritative position, one engine, one lock.
//!
//! Every public operation takes the session lock for its whole duration, so
//! a human move, an engine request and a reset never interleave. Failed
//! operations leave the session exactly as it was.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chess_core::{classify, Move, Position, RulesOracle, SessionState, StandardRules};
use tracing::{debug, info, instrument, warn};

use crate::engine::{EngineBackend, EngineLauncher, EngineStatus};
use crate::error::{EngineError, MoveError, StartError};
use crate::limit::SearchLimit;
use crate::record::{GameRecord, Mover, PlayedMove};

const NO_ENGINE: &str = "no engine configured";

/// A game between a human and an engine.
///
/// The session is `Send + Sync`; share it behind an `Arc` when several
/// threads drive it.
///
/// Queries such as [`snapshot`](Self::snapshot) and
/// [`current_state`](Self::current_state) take the same lock as the
/// mutating operations. While an engine search runs they wait for it, up to
/// the search's timeout ceiling, so a renderer on another thread should not
/// poll the session during [`request_engine_move`](Self::request_engine_move).
pub struct GameSession {
    rules: Box<dyn RulesOracle>,
    inner: Mutex<Inner>,
}

struct Inner {
    position: Position,
    history: Vec<PlayedMove>,
    launcher: Option<Box<dyn EngineLauncher>>,
    engine: EngineSlot,
}

enum EngineSlot {
    /// Nothing launched (yet).
    Idle,
    Running(Box<dyn EngineBackend>),
    Failed(StartError),
    /// The engine died or hung; only a restart brings it back.
    Disconnected,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A human-only session from the standard start.
    pub fn new() -> Self {
        Self::build(Box::new(StandardRules), None, EngineSlot::Idle)
    }

    /// A session driving an engine that is already running.
    pub fn with_engine(engine: Box<dyn EngineBackend>) -> Self {
        Self::build(Box::new(StandardRules), None, EngineSlot::Running(engine))
    }

    /// A session that launches its engine on first use.
    pub fn with_launcher(launcher: Box<dyn EngineLauncher>) -> Self {
        Self::build(Box::new(StandardRules), Some(launcher), EngineSlot::Idle)
    }

    /// Replace the rules oracle.
    pub fn with_rules(mut self, rules: Box<dyn RulesOracle>) -> Self {
        self.rules = rules;
        self
    }

    /// Start from `position` instead of the standard setup.
    ///
    /// [`reset`](Self::reset) still returns to the standard setup.
    pub fn with_position(self, position: Position) -> Self {
        {
            let mut inner = self.lock();
            inner.position = position;
            inner.history.clear();
        }
        self
    }

    fn build(
        rules: Box<dyn RulesOracle>,
        launcher: Option<Box<dyn EngineLauncher>>,
        engine: EngineSlot,
    ) -> Self {
        Self {
            rules,
            inner: Mutex::new(Inner {
                position: Position::startpos(),
                history: Vec::new(),
                launcher,
                engine,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // Mutations happen only after every fallible step has succeeded.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn snapshot(&self) -> Position {
        self.lock().position.clone()
    }

    pub fn fen(&self) -> String {
        self.lock().position.fen()
    }

    pub fn current_state(&self) -> SessionState {
        classify(self.rules.as_ref(), &self.lock().position)
    }

    pub fn history(&self) -> Vec<PlayedMove> {
        self.lock().history.clone()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.rules.legal_moves(&self.lock().position)
    }

    pub fn engine_status(&self) -> EngineStatus {
        let inner = self.lock();
        match &inner.engine {
            EngineSlot::Idle if inner.launcher.is_none() => EngineStatus::HumanOnly,
            EngineSlot::Idle => EngineStatus::NotStarted,
            EngineSlot::Running(engine) if engine.is_healthy() => {
                EngineStatus::Ready(engine.name().to_string())
            }
            EngineSlot::Running(_) | EngineSlot::Disconnected => EngineStatus::Disconnected,
            EngineSlot::Failed(err) => EngineStatus::Unavailable(err.to_string()),
        }
    }

    pub fn record(&self) -> GameRecord {
        let inner = self.lock();
        GameRecord {
            start_fen: inner.position.start_fen().to_string(),
            moves: inner.history.clone(),
            state: classify(self.rules.as_ref(), &inner.position),
            fen: inner.position.fen(),
        }
    }

    // =========================================================================
    // Moves
    // =========================================================================

    /// Validate and play a move typed by the human.
    #[instrument(skip(self))]
    pub fn apply_human_move(&self, text: &str) -> Result<Move, MoveError> {
        let mut inner = self.lock();

        let state = classify(self.rules.as_ref(), &inner.position);
        if state.is_terminal() {
            return Err(MoveError::GameOver(state));
        }

        let mv: Move = text.parse()?;
        if !self.rules.is_legal(&inner.position, &mv) {
            debug!(%mv, fen = %inner.position.fen(), "rejected illegal move");
            return Err(MoveError::Illegal { mv });
        }

        self.commit(&mut inner, &mv, Mover::Human)
            .map_err(|_| MoveError::Illegal { mv })
    }

    /// Ask the engine for a move and play it.
    #[instrument(skip(self))]
    pub fn request_engine_move(&self, limit: SearchLimit) -> Result<Move, EngineError> {
        let mut inner = self.lock();
        let mv = self.consult(&mut inner, limit)?;
        self.commit(&mut inner, &mv, Mover::Engine)
            .map_err(|_| EngineError::IllegalMove { mv })
    }

    /// Ask the engine what it would play, without playing it.
    #[instrument(skip(self))]
    pub fn suggest_engine_move(&self, limit: SearchLimit) -> Result<Move, EngineError> {
        let mut inner = self.lock();
        self.consult(&mut inner, limit)
    }

    /// Back to the standard start with an empty history.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.position = Position::startpos();
        inner.history.clear();

        let refused = match &mut inner.engine {
            EngineSlot::Running(engine) => engine.new_game().err(),
            _ => None,
        };
        if let Some(err) = refused {
            warn!(error = %err, "engine did not take the new game");
            if err == EngineError::Disconnected {
                inner.engine = EngineSlot::Disconnected;
            }
        }
        info!("new game");
    }

    /// Tear down the current engine and launch a fresh one.
    #[instrument(skip(self))]
    pub fn restart_engine(&self) -> Result<String, EngineError> {
        let mut guard = self.lock();
        let inner = &mut *guard;
        let Some(launcher) = &inner.launcher else {
            return Err(EngineError::Unavailable(NO_ENGINE.to_string()));
        };
        // Drop the old process before starting its replacement.
        inner.engine = EngineSlot::Idle;

        match launcher.launch() {
            Ok(engine) => {
                let name = engine.name().to_string();
                info!(%name, "engine restarted");
                inner.engine = EngineSlot::Running(engine);
                Ok(name)
            }
            Err(err) => {
                warn!(error = %err, "engine restart failed");
                inner.engine = EngineSlot::Failed(err.clone());
                Err(err.into())
            }
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Obtain a validated move from the engine for the current position.
    fn consult(&self, inner: &mut Inner, limit: SearchLimit) -> Result<Move, EngineError> {
        let state = classify(self.rules.as_ref(), &inner.position);
        if state.is_terminal() {
            return Err(EngineError::GameOver(state));
        }

        let position = inner.position.clone();
        let text = inner.search(&position, limit)?;

        let mv: Move = text.parse().map_err(|e| {
            warn!(answer = %text, "engine answer is not a move");
            EngineError::Protocol(format!("{text:?}: {e}"))
        })?;
        if !self.rules.is_legal(&position, &mv) {
            warn!(%mv, fen = %position.fen(), "engine suggested an illegal move");
            return Err(EngineError::IllegalMove { mv });
        }
        Ok(mv)
    }

    fn commit(
        &self,
        inner: &mut Inner,
        mv: &Move,
        mover: Mover,
    ) -> Result<Move, chess_core::RulesError> {
        let before = &inner.position;
        let side = before.side_to_move();
        let san = self.rules.san(before, mv);
        let next = self.rules.apply(before, mv)?;
        let played = next.last_move().unwrap_or(*mv);

        inner.history.push(PlayedMove {
            ply: inner.history.len() + 1,
            side,
            mover,
            mv: played,
            san,
        });
        inner.position = next;

        let state = classify(self.rules.as_ref(), &inner.position);
        info!(%played, ?mover, %side, "move played");
        if state.is_terminal() {
            info!(%state, "game over");
        }
        Ok(played)
    }
}

impl Inner {
    fn engine(&mut self) -> Result<&mut dyn EngineBackend, EngineError> {
        if let EngineSlot::Idle = self.engine {
            let Some(launcher) = &self.launcher else {
                return Err(EngineError::Unavailable(NO_ENGINE.to_string()));
            };
            self.engine = match launcher.launch() {
                Ok(engine) => {
                    info!(name = %engine.name(), "engine launched");
                    EngineSlot::Running(engine)
                }
                Err(err) => {
                    warn!(error = %err, "engine unavailable, continuing human-only");
                    EngineSlot::Failed(err)
                }
            };
        }

        match &mut self.engine {
            EngineSlot::Running(engine) => Ok(engine.as_mut()),
            EngineSlot::Failed(err) => Err(EngineError::Unavailable(err.to_string())),
            EngineSlot::Disconnected => Err(EngineError::Disconnected),
            EngineSlot::Idle => Err(EngineError::Unavailable(NO_ENGINE.to_string())),
        }
    }

    /// Synchronise the engine and run one search, returning its raw answer.
    fn search(&mut self, position: &Position, limit: SearchLimit) -> Result<String, EngineError> {
        let engine = self.engine()?;
        let answer = engine
            .sync(position)
            .and_then(|()| engine.best_move(limit));

        if let Err(EngineError::Disconnected | EngineError::Timeout { .. }) = &answer {
            warn!("dropping engine until it is restarted");
            self.engine = EngineSlot::Disconnected;
        }
        answer
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
