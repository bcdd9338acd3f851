use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> InProgress
/// - NotStarted -> Won (single safe cell)
/// - InProgress -> Won
/// - InProgress -> Lost
/// - Won | Lost -> InProgress (undo)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_not_started(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    /// Indicates the game has ended and mutating intents are ignored
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// One game from first click to win or loss, plus the undo history that rewinds it.
///
/// Intents that do not apply (out of bounds, wrong cell state, game over) are silent
/// no-ops. Every intent that changes something records exactly one history entry first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    config: GameConfig,
    seed: u64,
    mines: MineField,
    board: BoardState,
    status: GameStatus,
    history: HistoryManager,
}

impl GameState {
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Same seed and same first click always produce the same mine layout.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        log::debug!("New game {:?}, seed {}", config, seed);
        Self {
            config,
            seed,
            mines: MineField::new(config.size()),
            board: BoardState::new(config.size()),
            status: GameStatus::default(),
            history: HistoryManager::new(),
        }
    }

    /// Starts a game on a fixed mine layout. Mines are considered placed already.
    pub fn with_mine_field(mines: MineField) -> Result<Self> {
        let (rows, columns) = mines.size();
        let config = GameConfig::new(rows, columns, mines.count())?;
        let mut game = Self::with_seed(config, 0);
        game.mines = mines;
        Ok(game)
    }

    /// Discards this game and its history and starts a fresh one.
    pub fn restart(&mut self, config: GameConfig) {
        log::debug!("Restarting game");
        *self = Self::new(config);
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn mine_field(&self) -> &MineField {
        &self.mines
    }

    pub fn cell_at(&self, coords: Coord2) -> Option<Cell> {
        self.board.grid.get(coords)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.board.revealed_count()
    }

    pub fn flagged_count(&self) -> CellCount {
        self.board.flagged_count()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines()
    }

    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.board.flagged_count() as isize)
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.board.triggered_mine
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn can_chord_reveal_at(&self, coords: Coord2) -> bool {
        !self.status.is_finished() && self.board.is_chord_armed(coords)
    }

    /// Cells a chord on `coords` would open, for highlighting while the flags do not match.
    pub fn chord_preview(&self, coords: Coord2) -> Vec<Coord2> {
        if self.status.is_finished() || self.board.is_chord_armed(coords) {
            return Vec::new();
        }
        self.board.chord_candidates(coords)
    }

    pub fn reveal(&mut self, coords: Coord2) -> Vec<GameEvent> {
        if self.status.is_finished() || !matches!(self.cell_at(coords), Some(Cell::Hidden)) {
            return Vec::new();
        }

        let snapshot = self.snapshot();
        if !self.mines.is_placed() {
            // only the clicked cell is guaranteed safe, its neighbors may hold mines
            let mut rng = SmallRng::seed_from_u64(self.seed);
            if let Err(err) = self.mines.place(self.config.mines(), &[coords], &mut rng) {
                log::error!("Mine placement failed: {}", err);
                return Vec::new();
            }
        }

        let mut events = Vec::new();
        let outcome =
            RevealEngine::new(&mut self.board, &self.mines, &mut events).reveal(coords);
        self.finish_reveal(snapshot, outcome, &mut events);
        events
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.status.is_finished() {
            return MarkOutcome::NoChange;
        }

        let snapshot = self.snapshot();
        let mut events = Vec::new();
        let outcome =
            RevealEngine::new(&mut self.board, &self.mines, &mut events).toggle_flag(coords);
        if outcome.has_update() {
            self.history.push(snapshot);
        }
        outcome
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Vec<GameEvent> {
        if self.status.is_finished() {
            return Vec::new();
        }

        let snapshot = self.snapshot();
        let mut events = Vec::new();
        let outcome =
            RevealEngine::new(&mut self.board, &self.mines, &mut events).chord_reveal(coords);
        self.finish_reveal(snapshot, outcome, &mut events);
        events
    }

    /// Rewinds the most recent mutating intent. Returns false when there was nothing to undo.
    ///
    /// Snapshots are only taken while the game is running, so undo always reopens a game that
    /// was won or lost. Mines stay where they were placed.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.pop() else {
            return false;
        };
        log::debug!(
            "Undo to {:?}, {} entries left",
            snapshot.status,
            self.history.len()
        );
        self.restore(snapshot);
        true
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            status: self.status,
        }
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.board = snapshot.board;
        self.status = snapshot.status;
    }

    fn finish_reveal(
        &mut self,
        snapshot: Snapshot,
        outcome: RevealOutcome,
        events: &mut Vec<GameEvent>,
    ) {
        use RevealOutcome::*;

        if outcome.has_update() {
            self.history.push(snapshot);
        }

        match outcome {
            NoChange => {}
            Revealed => self.mark_started(),
            HitMine => {
                RevealEngine::new(&mut self.board, &self.mines, events).expose_mines();
                self.status = GameStatus::Lost;
                log::debug!("Game lost at {:?}", self.board.triggered_mine);
                events.push(GameEvent::GameLost);
            }
            Won => {
                RevealEngine::new(&mut self.board, &self.mines, events).flag_remaining();
                self.status = GameStatus::Won;
                log::debug!("Game won with {} cells revealed", self.revealed_count());
                events.push(GameEvent::GameWon);
            }
        }
    }

    fn mark_started(&mut self) {
        if self.status.is_not_started() {
            log::debug!("Game started");
            self.status = GameStatus::InProgress;
        }
    }

    /// Checks that a deserialized game is internally consistent.
    pub(crate) fn validate(&self) -> Result<()> {
        let size = self.config.size();
        let shapes_match = self.mines.size() == size
            && self.board.grid.size() == size
            && self.history.iter().all(|s| s.board.grid.size() == size);
        if !shapes_match {
            return Err(GameError::InvalidBoardShape);
        }

        self.mines.validate(self.config.mines())?;
        self.board.validate(&self.mines)?;
        for snapshot in self.history.iter() {
            snapshot.board.validate(&self.mines)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(size: Coord2, mines: &[Coord2]) -> GameState {
        GameState::with_mine_field(MineField::from_mine_coords(size, mines).unwrap()).unwrap()
    }

    #[test]
    fn first_reveal_places_mines_away_from_click() {
        for seed in 0..32 {
            let config = GameConfig::new(3, 3, 8).unwrap();
            let mut game = GameState::with_seed(config, seed);

            let events = game.reveal((1, 1));

            assert!(!game.mine_field().is_mine((1, 1)));
            assert_eq!(game.mine_field().count(), 8);
            assert_eq!(game.status(), GameStatus::Won);
            assert_eq!(events.last(), Some(&GameEvent::GameWon));
        }
    }

    #[test]
    fn first_reveal_starts_game() {
        let mut game = game((3, 3), &[(0, 0)]);
        assert_eq!(game.status(), GameStatus::NotStarted);

        game.reveal((1, 1));
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.revealed_count(), 1);
    }

    #[test]
    fn losing_exposes_all_mines() {
        let mut game = game((3, 3), &[(0, 0), (2, 2)]);
        game.reveal((1, 1));
        game.toggle_flag((2, 2));

        let events = game.reveal((0, 0));

        assert_eq!(game.status(), GameStatus::Lost);
        assert_eq!(events, vec![GameEvent::MineHit((0, 0)), GameEvent::GameLost]);
        assert_eq!(game.cell_at((0, 0)), Some(Cell::Mine));
        assert_eq!(game.cell_at((2, 2)), Some(Cell::Mine));
        assert_eq!(game.triggered_mine(), Some((0, 0)));
        assert_eq!(game.flagged_count(), 0);
    }

    #[test]
    fn winning_flags_remaining_cells() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal((0, 1));
        game.reveal((1, 0));
        let events = game.reveal((1, 1));

        assert_eq!(game.status(), GameStatus::Won);
        assert_eq!(events.last(), Some(&GameEvent::GameWon));
        assert_eq!(game.cell_at((0, 0)), Some(Cell::Flagged));
        assert_eq!(game.mines_left(), 0);
    }

    #[test]
    fn finished_game_ignores_intents() {
        let mut game = game((2, 2), &[(0, 0)]);
        game.reveal((1, 1));
        game.reveal((0, 0));
        let before = game.clone();

        assert!(game.reveal((0, 1)).is_empty());
        assert_eq!(game.toggle_flag((1, 0)), MarkOutcome::NoChange);
        assert!(game.chord_reveal((1, 1)).is_empty());
        assert_eq!(game, before);
    }

    #[test]
    fn only_mutating_intents_grow_history() {
        let mut game = game((3, 3), &[(0, 0)]);

        game.reveal((1, 1));
        assert_eq!(game.history().len(), 1);
        game.reveal((1, 1));
        game.reveal((7, 7));
        game.toggle_flag((1, 1));
        game.chord_reveal((1, 1));
        assert_eq!(game.history().len(), 1);

        game.toggle_flag((0, 0));
        assert_eq!(game.history().len(), 2);
        game.chord_reveal((1, 1));
        assert_eq!(game.history().len(), 3);
        assert_eq!(game.status(), GameStatus::Won);
    }

    #[test]
    fn undo_restores_previous_state() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((1, 1));
        let before = game.snapshot();

        game.toggle_flag((0, 1));
        assert!(game.undo());
        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn undo_reopens_lost_game() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((1, 1));
        game.reveal((0, 0));
        assert_eq!(game.status(), GameStatus::Lost);

        assert!(game.undo());
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.cell_at((0, 0)), Some(Cell::Hidden));
        assert_eq!(game.triggered_mine(), None);
        assert!(game.mine_field().is_mine((0, 0)));
    }

    #[test]
    fn undo_first_reveal_keeps_mine_layout() {
        let config = GameConfig::new(5, 5, 6).unwrap();
        let mut game = GameState::with_seed(config, 42);
        game.reveal((2, 2));
        let layout = game.mine_field().clone();

        assert!(game.undo());
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert_eq!(game.revealed_count(), 0);

        game.reveal((0, 0));
        assert_eq!(game.mine_field(), &layout);
    }

    #[test]
    fn undo_on_empty_history_is_noop() {
        let mut game = game((2, 2), &[(0, 0)]);
        let before = game.clone();
        assert!(!game.undo());
        assert_eq!(game, before);
    }

    #[test]
    fn restart_discards_history() {
        let mut game = game((3, 3), &[(0, 0)]);
        game.reveal((1, 1));
        game.toggle_flag((0, 0));

        game.restart(GameConfig::new(4, 4, 2).unwrap());

        assert_eq!(game.size(), (4, 4));
        assert_eq!(game.status(), GameStatus::NotStarted);
        assert!(!game.can_undo());
        assert!(!game.mine_field().is_placed());
        assert_eq!(game.revealed_count(), 0);
    }

    #[test]
    fn chord_preview_only_while_flags_mismatch() {
        let mut game = game((3, 3), &[(0, 0), (0, 1)]);
        game.reveal((1, 1));
        game.toggle_flag((0, 0));

        assert_eq!(
            game.chord_preview((1, 1)),
            vec![(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1), (2, 2)]
        );
        assert!(!game.can_chord_reveal_at((1, 1)));

        game.toggle_flag((0, 1));
        assert!(game.chord_preview((1, 1)).is_empty());
        assert!(game.can_chord_reveal_at((1, 1)));
    }

    #[test]
    fn flag_on_first_click_cell_blocks_reveal() {
        let config = GameConfig::new(4, 4, 3).unwrap();
        let mut game = GameState::with_seed(config, 1);
        game.toggle_flag((0, 0));

        assert!(game.reveal((0, 0)).is_empty());
        assert!(!game.mine_field().is_placed());
        assert_eq!(game.status(), GameStatus::NotStarted);
    }
}
