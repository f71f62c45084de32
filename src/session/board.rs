//! The board session: grid, preview queue, empty set, and selection.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};

use crate::core::{Coord, GameConfig, GameRng, GridError, RandomSource};
use crate::grid::{Grid, Token};
use crate::matching::{score_value, MatchEngine, MatchGroup, MatchTrigger};
use crate::pathfinding::PathFinder;

use super::empty_set::EmptySet;
use super::population::token_for_turn;

/// What the player is told about an upcoming preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreviewHint {
    /// A colored preview of this palette index.
    Color(u8),
    /// A colorless preview whose kind stays hidden until it lands.
    Hidden,
}

impl PreviewHint {
    #[must_use]
    pub fn for_token(token: Token) -> Self {
        match token.color() {
            Some(color) => PreviewHint::Color(color),
            None => PreviewHint::Hidden,
        }
    }
}

/// A player move that has been validated but not yet applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovePlan {
    pub from: Coord,
    /// Cells traversed, excluding `from` and ending at the destination.
    pub path: Vec<Coord>,
}

impl MovePlan {
    /// Destination cell.
    #[must_use]
    pub fn to(&self) -> Coord {
        self.path.last().copied().unwrap_or(self.from)
    }

    /// Number of single-cell steps.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.path.len()
    }
}

/// Result of a click on the board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Selected(Coord),
    Deselected,
    /// A move was requested and a path exists. Selection has been cleared.
    Move(MovePlan),
    /// A move was requested but the destination is unreachable. Selection
    /// has been cleared.
    NoPath { from: Coord, to: Coord },
    /// Nothing to do.
    Ignored,
}

/// Cells cleared by one hit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clearance {
    pub origin: Coord,
    pub groups: Vec<MatchGroup>,
    /// Cleared cells with the token they held.
    pub cleared: Vec<(Coord, Token)>,
    pub points: u32,
}

impl Clearance {
    #[must_use]
    pub fn cleared_count(&self) -> usize {
        self.cleared.len()
    }
}

/// Outcome of a population pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Newly previewed cells, in queue order.
    pub placed: Vec<Coord>,
    /// Set when an empty cell was needed but none remained.
    pub board_full: bool,
}

/// Outcome of an applied move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResolution {
    pub from: Coord,
    pub to: Coord,
    pub token: Token,
    pub clearance: Option<Clearance>,
    /// A preview displaced from the destination and moved elsewhere.
    pub relocated: Option<(Coord, Coord)>,
    /// Set when a displaced preview had nowhere to go.
    pub board_full: bool,
}

impl MoveResolution {
    #[must_use]
    pub fn scored(&self) -> bool {
        self.clearance.is_some()
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.clearance.as_ref().map_or(0, |c| c.points)
    }
}

/// Owns the grid and keeps the empty set and preview queue consistent
/// with it.
///
/// Invariants held between calls:
/// - a cell is in the empty set iff its token is empty;
/// - the preview queue holds exactly the preview cells, in reveal order.
#[derive(Clone, Debug)]
pub struct BoardSession<R: RandomSource = GameRng> {
    config: GameConfig,
    grid: Grid,
    empty: EmptySet,
    previews: Vec<Coord>,
    selected: Option<Coord>,
    rng: R,
}

impl BoardSession<GameRng> {
    /// Create a session seeded from `config.seed`.
    ///
    /// `config` must have passed [`GameConfig::validate`]: a zero board size
    /// or an empty palette panics on first use.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> BoardSession<R> {
    /// Create a session drawing from `rng`. Same precondition as
    /// [`BoardSession::new`].
    #[must_use]
    pub fn with_rng(config: GameConfig, rng: R) -> Self {
        debug_assert!(config.validate().is_ok(), "invalid config");
        let size = config.board_size;
        Self {
            config,
            grid: Grid::new(size),
            empty: EmptySet::full(size),
            previews: Vec::new(),
            selected: None,
            rng,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Coordinates of preview cells, in reveal order.
    #[must_use]
    pub fn previews(&self) -> &[Coord] {
        &self.previews
    }

    #[must_use]
    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.empty.len()
    }

    #[must_use]
    pub fn is_empty_cell(&self, coord: Coord) -> bool {
        self.empty.contains(coord)
    }

    pub fn rng(&self) -> &R {
        &self.rng
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Clear the board. Every cell becomes empty.
    pub fn reset(&mut self) {
        self.grid.clear();
        self.empty.fill();
        self.previews.clear();
        self.selected = None;
    }

    /// Replace the board with `grid`, rebuilding the empty set and the
    /// preview queue (row-major order) from it.
    pub fn load_grid(&mut self, grid: Grid) {
        debug_assert_eq!(grid.size(), self.config.board_size);
        self.empty.clear();
        self.previews.clear();
        for cell in grid.cells() {
            if cell.token().is_empty() {
                self.empty.insert(cell.coord());
            } else if cell.is_preview() {
                self.previews.push(cell.coord());
            }
        }
        self.grid = grid;
        self.selected = None;
    }

    /// Hints for the given preview cells, for display.
    #[must_use]
    pub fn preview_hints(&self, cells: &[Coord]) -> Vec<PreviewHint> {
        cells
            .iter()
            .filter_map(|&c| self.grid.get(c).ok())
            .map(|cell| PreviewHint::for_token(cell.token()))
            .collect()
    }

    /// Preview the opening set of normal tokens.
    pub fn populate_initial(&mut self) -> PopulateReport {
        self.populate(self.config.initial_previews, 0)
    }

    /// Preview `count` new tokens for `turn` on random empty cells.
    #[instrument(level = "debug", skip(self))]
    pub fn populate(&mut self, count: usize, turn: u32) -> PopulateReport {
        let mut report = PopulateReport::default();
        for _ in 0..count {
            let Some(coord) = self.empty.take_random(&mut self.rng) else {
                debug!(placed = report.placed.len(), "no empty cell left");
                report.board_full = true;
                break;
            };
            let token = token_for_turn(&self.config, turn, &mut self.rng);
            self.grid[coord].set_preview(token);
            self.previews.push(coord);
            report.placed.push(coord);
        }
        report
    }

    /// Turn every queued preview into an active token, in reveal order,
    /// checking each one for lines as it lands.
    #[instrument(level = "debug", skip(self))]
    pub fn actualize_previews(&mut self) -> Vec<Clearance> {
        let queue = std::mem::take(&mut self.previews);
        let mut hits = Vec::new();
        for coord in queue {
            self.grid[coord].actualize();
            if let Some(hit) = self.hit_check(coord, MatchTrigger::Population) {
                hits.push(hit);
            }
        }
        hits
    }

    /// Handle a click on `coord`.
    ///
    /// With nothing selected, an active non-block token becomes selected.
    /// With a selection, clicking a free cell (empty or preview) requests
    /// a move there, clicking another selectable token moves the selection,
    /// and anything else deselects.
    pub fn click(&mut self, coord: Coord) -> Result<ClickOutcome, GridError> {
        let target = self.grid.get(coord)?;
        let (target_active, target_selectable) = (target.is_active(), target.is_selectable());

        let Some(from) = self.selected.filter(|&s| self.grid[s].is_active()) else {
            if target_selectable {
                self.selected = Some(coord);
                return Ok(ClickOutcome::Selected(coord));
            }
            self.selected = None;
            return Ok(ClickOutcome::Ignored);
        };

        if !target_active {
            self.selected = None;
            return Ok(match self.plan_move(from, coord) {
                Some(plan) => ClickOutcome::Move(plan),
                None => ClickOutcome::NoPath { from, to: coord },
            });
        }
        if target_selectable && coord != from {
            self.selected = Some(coord);
            return Ok(ClickOutcome::Selected(coord));
        }
        self.selected = None;
        Ok(ClickOutcome::Deselected)
    }

    /// Select `coord` directly. Fails silently (returns false) on a cell
    /// that cannot be selected.
    pub fn select(&mut self, coord: Coord) -> Result<bool, GridError> {
        let selectable = self.grid.get(coord)?.is_selectable();
        if selectable {
            self.selected = Some(coord);
        }
        Ok(selectable)
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Plan a move of the token at `from` to `to`. Nothing on the board
    /// changes except pathfinding scratch state.
    pub fn plan_move(&mut self, from: Coord, to: Coord) -> Option<MovePlan> {
        if !self.grid.get(from).ok()?.is_selectable() || self.grid.get(to).ok()?.is_active() {
            return None;
        }
        let path = PathFinder::find_path(&mut self.grid, from, to)?;
        Some(MovePlan { from, path })
    }

    /// Apply a planned move in one step.
    ///
    /// The source is vacated and the token lands on the destination, which
    /// is then checked for lines. A preview the token landed on comes back
    /// at the destination if the move scored; otherwise it moves to a
    /// random empty cell, keeping its place in the queue.
    #[instrument(level = "debug", skip(self, plan), fields(from = %plan.from, to = %plan.to()))]
    pub fn apply_move(&mut self, plan: &MovePlan) -> MoveResolution {
        let (from, to) = (plan.from, plan.to());
        let token = self.grid[from].token();

        self.grid[from].clear();
        self.empty.insert(from);

        let displaced = self
            .previews
            .iter()
            .position(|&c| c == to)
            .map(|slot| (slot, self.grid[to].token()));

        self.grid[to].set_active(token);
        self.empty.remove(to);
        if self.selected == Some(from) {
            self.selected = None;
        }

        let clearance = self.hit_check(to, MatchTrigger::PlayerMove);

        let mut relocated = None;
        let mut board_full = false;
        if let Some((slot, preview)) = displaced {
            if clearance.is_some() && self.grid[to].token().is_empty() {
                self.grid[to].set_preview(preview);
                self.empty.remove(to);
            } else {
                match self.empty.take_random(&mut self.rng) {
                    Some(spot) => {
                        self.grid[spot].set_preview(preview);
                        self.previews[slot] = spot;
                        relocated = Some((to, spot));
                        trace!(%to, %spot, "preview relocated");
                    }
                    None => {
                        self.previews.remove(slot);
                        board_full = true;
                        debug!(%to, "displaced preview has no empty cell");
                    }
                }
            }
        }

        MoveResolution {
            from,
            to,
            token,
            clearance,
            relocated,
            board_full,
        }
    }

    /// Look for lines through `origin` and clear them.
    pub fn hit_check(&mut self, origin: Coord, trigger: MatchTrigger) -> Option<Clearance> {
        let groups = MatchEngine::find_lines(&self.grid, origin, trigger);
        if groups.is_empty() {
            return None;
        }
        let (cleared, points) = self.clear_cells(&MatchEngine::union(&groups));
        debug!(%origin, ?trigger, cleared = cleared.len(), points, "hit");
        Some(Clearance {
            origin,
            groups,
            cleared,
            points,
        })
    }

    /// Clear every active token among `coords`, returning what was cleared
    /// and the points it is worth. Previews and empty cells are skipped.
    fn clear_cells(&mut self, coords: &[Coord]) -> (Vec<(Coord, Token)>, u32) {
        let mut cleared = Vec::with_capacity(coords.len());
        let mut points = 0;
        for &coord in coords {
            let cell = &mut self.grid[coord];
            if !cell.is_active() {
                continue;
            }
            let token = cell.token();
            points += score_value(token.kind());
            cell.clear();
            self.empty.insert(coord);
            cleared.push((coord, token));
            if self.selected == Some(coord) {
                self.selected = None;
            }
        }
        (cleared, points)
    }

    /// Occupied cells grouped into anti-diagonal waves, starting from the
    /// top-left corner (`x + y` ascending). Waves with no tokens are skipped.
    #[must_use]
    pub fn sweep_waves(&self) -> Vec<Vec<Coord>> {
        let size = self.grid.size();
        let mut waves: Vec<Vec<Coord>> = vec![Vec::new(); size.saturating_mul(2).saturating_sub(1)];
        for cell in self.grid.cells() {
            if !cell.token().is_empty() {
                let c = cell.coord();
                waves[(c.x + c.y) as usize].push(c);
            }
        }
        waves.retain(|w| !w.is_empty());
        waves
    }

    /// Remove whatever occupies `coords`, preview or active, without scoring.
    pub fn clear_wave(&mut self, coords: &[Coord]) {
        for &coord in coords {
            let Ok(cell) = self.grid.get_mut(coord) else {
                continue;
            };
            if cell.token().is_empty() {
                continue;
            }
            cell.clear();
            self.empty.insert(coord);
            self.previews.retain(|&c| c != coord);
            if self.selected == Some(coord) {
                self.selected = None;
            }
        }
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub(crate) fn empty_mut(&mut self) -> &mut EmptySet {
        &mut self.empty
    }

    pub(crate) fn previews_mut(&mut self) -> &mut Vec<Coord> {
        &mut self.previews
    }
}
