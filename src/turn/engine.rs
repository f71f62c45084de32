//! The turn engine: phase sequencing, scoring, time attack, save and load.

use std::collections::VecDeque;

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use super::clock::{Countdown, Stopwatch};
use super::events::{EventLog, EventSink, TurnEvent};
use super::phase::{GameMode, Phase};
use super::score::Scoreboard;
use crate::core::{
    ConfigError, Coord, GameConfig, GameRng, MatchPolicy, RandomSource, SaveError, StoreError,
    TurnError,
};
use crate::grid::Token;
use crate::persist::{read_high_score, write_high_score, KeyValueStore, SaveGame};
use crate::session::{BoardSession, Clearance, ClickOutcome, MovePlan};

/// One resolved player move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub turn: u32,
    pub from: Coord,
    pub to: Coord,
    pub steps: usize,
    pub cleared: usize,
    pub points: u32,
}

/// A move waiting for its travel time to elapse.
#[derive(Clone, Debug)]
struct PendingMove {
    plan: MovePlan,
    remaining: f32,
}

/// Drives a game from start to finish.
///
/// The driver calls [`advance`](Self::advance) with elapsed seconds and
/// forwards player clicks to [`click`](Self::click). Everything the
/// presentation needs is reported through the event sink `S`.
///
/// ## Input gate
///
/// Clicks are only acted on in `PlayerTurn`, with no move in flight, while
/// not paused and with the editor closed. Anything else is ignored.
///
/// ## Moves
///
/// An accepted move resolves after `steps × move_step_secs` of driver time.
/// Until then the board is untouched; resolution applies the whole move at
/// once. A move that clears lines keeps the turn under
/// [`MatchPolicy::KeepTurn`]; every other move starts the next turn.
///
/// ## Time attack
///
/// Each player turn starts a countdown. When it runs out the next turn is
/// forced, after any move in flight has resolved.
pub struct TurnEngine<S: EventSink = EventLog, R: RandomSource = GameRng> {
    board: BoardSession<R>,
    sink: S,
    phase: Phase,
    mode: GameMode,
    turn_count: u32,
    paused: bool,
    editor_open: bool,
    editor_cursor: Option<Coord>,
    pending: Option<PendingMove>,
    expiry_due: bool,
    countdown: Countdown,
    clock: Stopwatch,
    scoreboard: Scoreboard,
    sweep: VecDeque<Vec<Coord>>,
    sweep_elapsed: f32,
    history: Vector<MoveRecord>,
}

impl TurnEngine<EventLog, GameRng> {
    /// Create an engine that buffers its events in an [`EventLog`].
    ///
    /// `config` must be valid; see [`TurnEngine::try_new`].
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self::with_sink(config, EventLog::new())
    }

    /// Validate `config`, then create an engine as [`TurnEngine::new`] does.
    pub fn try_new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }
}

impl<S: EventSink> TurnEngine<S, GameRng> {
    /// Create an engine reporting to `sink`, seeded from `config.seed`.
    #[must_use]
    pub fn with_sink(config: GameConfig, sink: S) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_parts(config, sink, rng)
    }
}

impl<S: EventSink, R: RandomSource> TurnEngine<S, R> {
    /// Create an engine from explicit collaborators.
    ///
    /// `config` is assumed to have passed [`GameConfig::validate`]; an
    /// unvalidated config (for example a zero board size or an empty
    /// palette) can panic later.
    #[must_use]
    pub fn with_parts(config: GameConfig, sink: S, rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config");
        let countdown = Countdown::new(config.time_attack_secs);
        Self {
            board: BoardSession::with_rng(config, rng),
            sink,
            phase: Phase::Idle,
            mode: GameMode::Normal,
            turn_count: 0,
            paused: false,
            editor_open: false,
            editor_cursor: None,
            pending: None,
            expiry_due: false,
            countdown,
            clock: Stopwatch::new(),
            scoreboard: Scoreboard::new(),
            sweep: VecDeque::new(),
            sweep_elapsed: 0.0,
            history: Vector::new(),
        }
    }

    // === Queries ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.board.config()
    }

    #[must_use]
    pub fn board(&self) -> &BoardSession<R> {
        &self.board
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// Number of turns started this game.
    #[must_use]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.scoreboard.score()
    }

    #[must_use]
    pub fn high_score(&self) -> u64 {
        self.scoreboard.high_score()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn is_editor_open(&self) -> bool {
        self.editor_open
    }

    #[must_use]
    pub fn is_move_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a click would currently be acted on.
    #[must_use]
    pub fn accepting_input(&self) -> bool {
        self.phase == Phase::PlayerTurn
            && self.pending.is_none()
            && !self.paused
            && !self.editor_open
    }

    /// Seconds of play, excluding paused time.
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    /// Seconds left on the time attack countdown, zero when not running.
    #[must_use]
    pub fn time_attack_remaining(&self) -> f32 {
        self.countdown.remaining()
    }

    /// Moves resolved this game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<MoveRecord> {
        &self.history
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // === Game lifecycle ===

    /// Start a new game in the current mode.
    ///
    /// Runs the opening synchronously: the board is cleared, the initial
    /// previews are placed, and the first turn begins, leaving the engine
    /// in `PlayerTurn` (or `Ending` on a board too small to play).
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub fn new_game(&mut self) -> Result<(), TurnError> {
        if self.pending.is_some() {
            return Err(TurnError::MoveInFlight);
        }

        self.board.reset();
        self.turn_count = 0;
        self.scoreboard.reset_score();
        self.history = Vector::new();
        self.editor_open = false;
        self.editor_cursor = None;
        self.expiry_due = false;
        self.sweep.clear();
        self.countdown = Countdown::new(self.config().time_attack_secs);
        self.clock.start_at(0.0);
        if self.paused {
            self.paused = false;
            self.emit(TurnEvent::Paused(false));
        }

        info!("new game");
        self.enter(Phase::Starting);
        let report = self.board.populate_initial();
        if report.board_full {
            self.emit(TurnEvent::BoardFull);
            self.begin_ending();
            return Ok(());
        }
        self.begin_turn();
        Ok(())
    }

    /// Handle a click on `coord`.
    ///
    /// Fails only on an out-of-range coordinate. A click the input gate
    /// rejects returns [`ClickOutcome::Ignored`].
    #[instrument(level = "debug", skip(self), fields(phase = ?self.phase))]
    pub fn click(&mut self, coord: Coord) -> Result<ClickOutcome, TurnError> {
        self.board.grid().get(coord)?;
        if !self.accepting_input() {
            trace!(%coord, phase = ?self.phase, "click ignored");
            return Ok(ClickOutcome::Ignored);
        }

        let outcome = self.board.click(coord)?;
        match &outcome {
            ClickOutcome::Selected(c) => self.emit(TurnEvent::Selected(*c)),
            ClickOutcome::Deselected => self.emit(TurnEvent::SelectionCleared),
            ClickOutcome::NoPath { from, to } => {
                self.emit(TurnEvent::NoPath {
                    from: *from,
                    to: *to,
                });
                self.emit(TurnEvent::SelectionCleared);
            }
            ClickOutcome::Move(plan) => {
                self.emit(TurnEvent::SelectionCleared);
                self.start_move(plan.clone());
            }
            ClickOutcome::Ignored => {}
        }
        Ok(outcome)
    }

    /// Advance driver time by `dt` seconds.
    ///
    /// Moves a pending move toward resolution, runs the time attack
    /// countdown and the play clock (both stopped while paused), and plays
    /// out the terminal sweep. The countdown also holds while the board
    /// editor is open.
    pub fn advance(&mut self, dt: f32) {
        let was_ending = self.phase == Phase::Ending;

        if !self.paused {
            self.clock.tick(dt);
            if self.phase == Phase::PlayerTurn && !self.editor_open && self.countdown.tick(dt) {
                debug!("time attack countdown ran out");
                self.expiry_due = true;
            }
        }

        if let Some(pending) = self.pending.as_mut() {
            pending.remaining -= dt;
            if pending.remaining <= 0.0 {
                if let Some(done) = self.pending.take() {
                    self.resolve_move(done.plan);
                }
            }
        }

        if self.expiry_due
            && self.pending.is_none()
            && !self.editor_open
            && self.phase == Phase::PlayerTurn
        {
            self.expiry_due = false;
            if self.board.selected().is_some() {
                self.board.deselect();
                self.emit(TurnEvent::SelectionCleared);
            }
            self.emit(TurnEvent::TimeAttackExpired);
            self.begin_turn();
        }

        if was_ending && self.phase == Phase::Ending {
            self.advance_sweep(dt);
        }
    }

    /// Toggle pause. Returns the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        debug!(paused = self.paused, "pause toggled");
        self.emit(TurnEvent::Paused(self.paused));
        self.paused
    }

    /// Choose the mode. Time attack cannot be switched off, or on again,
    /// while a time attack game is running.
    pub fn set_time_attack(&mut self, on: bool) -> Result<(), TurnError> {
        if self.phase.in_game() && self.mode.is_time_attack() {
            return Err(TurnError::TimeAttackLocked);
        }
        self.mode = GameMode::from_time_attack(on);
        if on && self.phase == Phase::PlayerTurn {
            self.countdown.restart();
        }
        Ok(())
    }

    // === Internal sequencing ===

    fn emit(&mut self, event: TurnEvent) {
        self.sink.emit(event);
    }

    fn enter(&mut self, phase: Phase) {
        debug!(from = ?self.phase, to = ?phase, turn = self.turn_count, "phase");
        self.phase = phase;
        self.emit(TurnEvent::PhaseEntered(phase));
    }

    fn register_hits(&mut self, hits: &[Clearance]) {
        for hit in hits {
            self.scoreboard.add(hit.points);
            self.emit(TurnEvent::Scored {
                points: hit.points,
                cleared: hit.cleared_count(),
            });
        }
    }

    /// Land the queued previews, place the next ones, and hand over to the
    /// player, or end the game when the board has no room.
    #[instrument(level = "debug", skip(self), fields(turn = self.turn_count))]
    fn begin_turn(&mut self) {
        self.expiry_due = false;
        self.countdown.stop();
        self.enter(Phase::TurnBegin);

        let hits = self.board.actualize_previews();
        self.register_hits(&hits);

        let count = self.config().previews_per_turn;
        let report = self.board.populate(count, self.turn_count + 1);
        if report.board_full {
            self.emit(TurnEvent::BoardFull);
            self.begin_ending();
            return;
        }

        self.turn_count += 1;
        let hints = self.board.preview_hints(&report.placed);
        self.emit(TurnEvent::PreviewsReady(hints));
        self.enter_player_turn();
    }

    fn enter_player_turn(&mut self) {
        self.enter(Phase::PlayerTurn);
        if self.mode.is_time_attack() {
            self.countdown.restart();
        }
    }

    fn start_move(&mut self, plan: MovePlan) {
        self.emit(TurnEvent::MoveStarted {
            from: plan.from,
            path: plan.path.clone(),
        });
        let travel = plan.steps() as f32 * self.config().move_step_secs;
        if travel <= 0.0 {
            self.resolve_move(plan);
        } else {
            trace!(travel, "move in flight");
            self.pending = Some(PendingMove {
                plan,
                remaining: travel,
            });
        }
    }

    #[instrument(level = "debug", skip(self, plan), fields(turn = self.turn_count))]
    fn resolve_move(&mut self, plan: MovePlan) {
        let resolution = self.board.apply_move(&plan);
        let cleared = resolution
            .clearance
            .as_ref()
            .map_or(0, Clearance::cleared_count);
        let points = resolution.points();

        if let Some(hit) = &resolution.clearance {
            self.register_hits(std::slice::from_ref(hit));
        }
        if let Some((from, to)) = resolution.relocated {
            self.emit(TurnEvent::PreviewRelocated { from, to });
        }
        self.emit(TurnEvent::MoveResolved {
            from: resolution.from,
            to: resolution.to,
            cleared,
            points,
        });
        self.history.push_back(MoveRecord {
            turn: self.turn_count,
            from: resolution.from,
            to: resolution.to,
            steps: plan.steps(),
            cleared,
            points,
        });

        if resolution.board_full {
            self.emit(TurnEvent::BoardFull);
            self.begin_ending();
        } else if resolution.scored() && self.config().match_policy == MatchPolicy::KeepTurn {
            trace!("scoring move keeps the turn");
        } else {
            self.begin_turn();
        }
    }

    fn begin_ending(&mut self) {
        self.countdown.stop();
        self.clock.stop();
        self.expiry_due = false;
        self.board.deselect();
        self.enter(Phase::Ending);
        self.sweep = self.board.sweep_waves().into();
        self.sweep_elapsed = 0.0;
        self.advance_sweep(0.0);
    }

    /// Clear one diagonal wave per `sweep_wave_secs`, then finish the game.
    fn advance_sweep(&mut self, dt: f32) {
        let wave_secs = self.config().sweep_wave_secs;
        self.sweep_elapsed += dt;
        loop {
            if self.sweep.is_empty() {
                self.finish_game();
                return;
            }
            if wave_secs > 0.0 && self.sweep_elapsed < wave_secs {
                return;
            }
            self.sweep_elapsed = (self.sweep_elapsed - wave_secs).max(0.0);
            if let Some(wave) = self.sweep.pop_front() {
                self.board.clear_wave(&wave);
                self.emit(TurnEvent::SweepWave(wave));
            }
        }
    }

    fn finish_game(&mut self) {
        let new_high_score = self.scoreboard.settle();
        info!(
            score = self.scoreboard.score(),
            turns = self.turn_count,
            new_high_score,
            "game over"
        );
        self.emit(TurnEvent::GameOver {
            score: self.scoreboard.score(),
            new_high_score,
        });
        self.enter(Phase::Idle);
    }

    // === Board editor ===

    /// Open or close the board editor. It only opens during a player turn.
    /// Closing it clears any lines the edits left. Returns whether the
    /// editor is now open.
    pub fn toggle_editor(&mut self) -> Result<bool, TurnError> {
        if !self.config().debug {
            return Err(TurnError::EditorDisabled);
        }
        if self.pending.is_some() {
            return Err(TurnError::MoveInFlight);
        }
        if !self.editor_open && self.phase != Phase::PlayerTurn {
            return Err(TurnError::WrongPhase(self.phase));
        }

        self.editor_open = !self.editor_open;
        self.editor_cursor = None;
        if self.editor_open {
            if self.board.selected().is_some() {
                self.board.deselect();
                self.emit(TurnEvent::SelectionCleared);
            }
        } else {
            let hits = self.board.hit_check_all();
            self.register_hits(&hits);
        }
        self.emit(TurnEvent::EditorToggled(self.editor_open));
        Ok(self.editor_open)
    }

    /// Point the editor at `coord`.
    pub fn editor_click(&mut self, coord: Coord) -> Result<(), TurnError> {
        self.require_editor()?;
        self.board.grid().get(coord)?;
        self.editor_cursor = Some(coord);
        Ok(())
    }

    /// Cycle the kind under the editor cursor. `None` when nothing is
    /// pointed at.
    pub fn editor_cycle_kind(&mut self, delta: i32) -> Result<Option<Token>, TurnError> {
        self.require_editor()?;
        match self.editor_cursor {
            Some(coord) => Ok(Some(self.board.cycle_kind(coord, delta)?)),
            None => Ok(None),
        }
    }

    /// Cycle the color under the editor cursor. `None` when nothing is
    /// pointed at.
    pub fn editor_cycle_color(&mut self, delta: i32) -> Result<Option<Token>, TurnError> {
        self.require_editor()?;
        match self.editor_cursor {
            Some(coord) => Ok(Some(self.board.cycle_color(coord, delta)?)),
            None => Ok(None),
        }
    }

    fn require_editor(&self) -> Result<(), TurnError> {
        if !self.config().debug {
            return Err(TurnError::EditorDisabled);
        }
        if !self.editor_open {
            return Err(TurnError::EditorClosed);
        }
        Ok(())
    }
}

/// Save and load checkpoint the population RNG, so they need the concrete
/// [`GameRng`].
impl<S: EventSink> TurnEngine<S, GameRng> {
    /// Write the game to `store`.
    ///
    /// Outside a player turn there is no resumable game: the game keys
    /// are removed and only the high score is written.
    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<(), StoreError> {
        if self.phase != Phase::PlayerTurn {
            SaveGame::clear(store)?;
            return write_high_score(store, self.scoreboard.high_score());
        }
        SaveGame::capture(
            self.board.grid(),
            self.clock.elapsed(),
            self.scoreboard.score(),
            self.turn_count,
            self.mode.is_time_attack(),
            self.scoreboard.high_score(),
        )
        .with_rng(self.board.rng().state())
        .write_to(store)
    }

    /// Restore a saved game from `store` straight into `PlayerTurn`.
    ///
    /// The preview queue is rebuilt in row-major order and the population
    /// RNG picks up where the saved game left off. On error nothing but the
    /// high score has changed.
    #[instrument(skip(self, store))]
    pub fn load<K: KeyValueStore + ?Sized>(&mut self, store: &K) -> Result<(), TurnError> {
        if self.pending.is_some() {
            return Err(TurnError::MoveInFlight);
        }
        self.scoreboard.merge_high_score(read_high_score(store));

        let save = SaveGame::read_from(store)?;
        let (size, color_count) = (self.config().board_size, self.config().color_count);
        let grid = save.grid(size, color_count)?;

        self.board.load_grid(grid);
        if let Some(rng) = &save.rng {
            *self.board.rng_mut() = GameRng::from_state(rng);
        }
        self.turn_count = save.turn;
        self.scoreboard.set_score(save.score);
        self.mode = GameMode::from_time_attack(save.time_attack);
        self.paused = false;
        self.editor_open = false;
        self.editor_cursor = None;
        self.expiry_due = false;
        self.sweep.clear();
        self.history = Vector::new();
        self.countdown = Countdown::new(self.config().time_attack_secs);
        self.clock.start_at(save.elapsed);

        info!(turn = save.turn, score = save.score, "game resumed");
        let hints = self.board.preview_hints(self.board.previews());
        self.emit(TurnEvent::PreviewsReady(hints));
        self.enter_player_turn();
        Ok(())
    }

    /// Resume the saved game, or start a new one when there is none or it
    /// cannot be read. Returns whether a saved game was resumed.
    pub fn resume_or_new<K: KeyValueStore + ?Sized>(
        &mut self,
        store: &K,
    ) -> Result<bool, TurnError> {
        match self.load(store) {
            Ok(()) => Ok(true),
            Err(TurnError::Save(SaveError::MissingKey(key))) => {
                debug!(key, "no saved game");
                self.new_game()?;
                Ok(false)
            }
            Err(TurnError::Save(err)) => {
                warn!(%err, "discarding unreadable saved game");
                self.new_game()?;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
