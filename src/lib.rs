//! Grid snake engine with a C API.
//!
//! [`Game`] owns one session: the snake, its heading, the food, the score and
//! whether the game is still running. A driver calls [`Game::move_snake`] once
//! per tick and [`Game::change_direction`] on input between ticks. The
//! [`ffi`] module exposes the same operations over an opaque handle.

pub mod config;
pub mod error;
pub mod ffi;
pub mod food;
pub mod game;
pub mod geometry;
pub mod snake;

pub use config::{Boundary, GameConfig, GRID_HEIGHT, GRID_WIDTH};
pub use error::{GameError, Result};
pub use game::{Collision, Game, GameSnapshot, GameStatus, StepResult};
pub use geometry::{Direction, Pos, PosDelta, Size};
pub use snake::Snake;
