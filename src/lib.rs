//! TETRS engine - a Rusty Tetris core
//!
//! Board, pieces, line clears and the drop timer. Rendering, key
//! capture and the app around it live elsewhere: feed decoded
//! [`Action`]s in, pull [`Snapshot`]s out.
//!
//! ```
//! use tetrs_engine::{Action, Game, Settings};
//!
//! let mut game = Game::with_seed(&Settings::default(), 42);
//! game.start();
//! game.tick(); // spawns the first piece
//! game.process_action(Action::HardDrop);
//!
//! let frame = game.snapshot();
//! assert!(!frame.lost);
//! assert_eq!(frame.filled_count(), 4);
//! ```

pub mod board;
pub mod game;
pub mod line_clear;
pub mod piece;
pub mod randomizer;
pub mod runner;
pub mod scheduler;
pub mod settings;
pub mod snapshot;
pub mod tetromino;

pub use board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
pub use game::{Action, Game, GameState};
pub use line_clear::check_rows_and_complete;
pub use piece::{ActivePiece, Direction};
pub use randomizer::{Randomizer, random_type};
pub use runner::SessionHandle;
pub use scheduler::{DropScheduler, Phase};
pub use settings::{Settings, SettingsError};
pub use snapshot::Snapshot;
pub use tetromino::{Cell, RotationDirection, Shape, TetrominoType, shape_for};
