//! Core game state and logic

use crate::board::Board;
use crate::line_clear::check_rows_and_complete;
use crate::piece::{ActivePiece, Direction};
use crate::randomizer::Randomizer;
use crate::scheduler::{DropScheduler, Phase};
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::tetromino::RotationDirection;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Game state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    /// Created but not started yet
    Ready,
    Playing,
    /// A new piece could not be placed; only a restart leaves this state
    Lost,
}

/// Input actions the game can process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    #[serde(rename = "rotateCW")]
    RotateCw,
    #[serde(rename = "rotateCCW")]
    RotateCcw,
    HardDrop,
}

impl Action {
    /// Parse a decoded command name (case-insensitive).
    /// Anything unknown is `None` and should be ignored.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Action::MoveLeft),
            "moveright" => Some(Action::MoveRight),
            "softdrop" => Some(Action::SoftDrop),
            "rotatecw" => Some(Action::RotateCw),
            "rotateccw" => Some(Action::RotateCcw),
            "harddrop" => Some(Action::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::MoveLeft => "moveLeft",
            Action::MoveRight => "moveRight",
            Action::SoftDrop => "softDrop",
            Action::RotateCw => "rotateCW",
            Action::RotateCcw => "rotateCCW",
            Action::HardDrop => "hardDrop",
        }
    }
}

/// The main game struct
///
/// Owns the board and the falling piece outright; callers only get
/// copies out through [`Game::snapshot`] and friends.
#[derive(Debug, Clone)]
pub struct Game {
    /// The game board (committed cells only)
    board: Board,
    /// Current falling piece
    current_piece: Option<ActivePiece>,
    /// Current game state
    state: GameState,
    /// Rows cleared since the last (re)start
    cleared_rows: u32,
    /// Tick interval and running flag
    scheduler: DropScheduler,
    /// Piece randomizer
    randomizer: Randomizer,
}

impl Game {
    /// Create a new game. Uses the configured seed if there is one.
    pub fn new(settings: &Settings) -> Self {
        let randomizer = match settings.gameplay.seed {
            Some(seed) => Randomizer::with_seed(seed),
            None => Randomizer::new(),
        };
        Self::with_randomizer(settings, randomizer)
    }

    /// Create a new game with a specific seed
    pub fn with_seed(settings: &Settings, seed: u64) -> Self {
        Self::with_randomizer(settings, Randomizer::with_seed(seed))
    }

    fn with_randomizer(settings: &Settings, randomizer: Randomizer) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            state: GameState::Ready,
            cleared_rows: 0,
            scheduler: DropScheduler::new(settings.timing),
            randomizer,
        }
    }

    /// Start (or restart) from an empty board at the initial speed
    pub fn start(&mut self) {
        self.board = Board::new();
        self.current_piece = None;
        self.state = GameState::Playing;
        self.cleared_rows = 0;
        self.scheduler.start();
        info!(interval = ?self.scheduler.interval(), "game started");
    }

    pub fn restart(&mut self) {
        self.start();
    }

    /// Halt ticking. The board and piece stay as they are.
    pub fn stop(&mut self) {
        if self.scheduler.is_running() {
            info!("game stopped");
        }
        self.scheduler.stop();
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> Option<&ActivePiece> {
        self.current_piece.as_ref()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_lost(&self) -> bool {
        self.state == GameState::Lost
    }

    pub fn cleared_rows(&self) -> u32 {
        self.cleared_rows
    }

    /// Current delay between ticks
    pub fn interval(&self) -> Duration {
        self.scheduler.interval()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn phase(&self) -> Phase {
        match (self.state, &self.current_piece) {
            (GameState::Lost, _) => Phase::Lost,
            (_, Some(_)) => Phase::Falling,
            (_, None) => Phase::Spawning,
        }
    }

    /// Process an action. Returns whether it changed anything.
    pub fn process_action(&mut self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.move_left(),
            Action::MoveRight => self.move_right(),
            Action::SoftDrop => self.soft_drop(),
            Action::RotateCw => self.rotate(RotationDirection::Clockwise),
            Action::RotateCcw => self.rotate(RotationDirection::CounterClockwise),
            Action::HardDrop => self.hard_drop(),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.shift(Direction::Left)
    }

    pub fn move_right(&mut self) -> bool {
        self.shift(Direction::Right)
    }

    /// One step down. A blocked soft drop does nothing; gravity locks.
    pub fn soft_drop(&mut self) -> bool {
        self.shift(Direction::Down)
    }

    pub fn rotate(&mut self, direction: RotationDirection) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        match &mut self.current_piece {
            Some(piece) => piece.rotate(&self.board, direction),
            None => false,
        }
    }

    /// Drop to the landing row and lock right away
    pub fn hard_drop(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        let Some(mut piece) = self.current_piece.take() else {
            return false;
        };
        piece.hard_drop(&self.board);
        self.lock_piece(piece);
        true
    }

    fn shift(&mut self, direction: Direction) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        match &mut self.current_piece {
            Some(piece) => piece.try_move(&self.board, direction),
            None => false,
        }
    }

    /// Run one scheduler step.
    ///
    /// Returns the delay until the next tick, or `None` once the game is
    /// lost or stopped (the caller should drop its timer).
    pub fn tick(&mut self) -> Option<Duration> {
        if !self.scheduler.is_running() {
            return None;
        }

        match self.phase() {
            Phase::Lost => {}
            Phase::Spawning => self.spawn_piece(),
            Phase::Falling => self.apply_gravity(),
        }

        if self.is_lost() {
            self.scheduler.stop();
            return None;
        }
        Some(self.scheduler.interval())
    }

    fn spawn_piece(&mut self) {
        let piece = ActivePiece::spawn(self.randomizer.next());

        if !piece.fits(&self.board) {
            info!(
                piece = piece.piece_type.label(),
                cleared_rows = self.cleared_rows,
                "spawn blocked, game over"
            );
            self.state = GameState::Lost;
            return;
        }

        let interval = self.scheduler.ramp();
        debug!(piece = piece.piece_type.label(), ?interval, "spawned piece");
        self.current_piece = Some(piece);
    }

    fn apply_gravity(&mut self) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if piece.try_move(&self.board, Direction::Down) {
            return;
        }
        if let Some(piece) = self.current_piece.take() {
            self.lock_piece(piece);
        }
    }

    /// Commit the piece and clear whatever rows it completed
    fn lock_piece(&mut self, piece: ActivePiece) {
        let (board, touched) = self.board.commit(&piece.shape, piece.x, piece.y);
        let (board, cleared) = check_rows_and_complete(&board, &touched);

        self.board = board;
        self.cleared_rows += cleared as u32;
        debug!(
            piece = piece.piece_type.label(),
            x = piece.x,
            y = piece.y,
            cleared,
            total = self.cleared_rows,
            "locked piece"
        );
    }

    /// Board with the falling piece drawn in; never stored
    pub fn render_grid(&self) -> Board {
        match &self.current_piece {
            Some(piece) => self.board.overlay(&piece.shape, piece.x, piece.y),
            None => self.board.clone(),
        }
    }

    /// Everything a renderer needs for one frame
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(&self.render_grid(), self.is_lost(), self.cleared_rows)
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}
