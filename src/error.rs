use thiserror::Error;

use crate::geometry::Pos;

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("position {0} is outside the grid")]
    OutOfBounds(Pos),

    #[error("position {0} is occupied by the snake")]
    FoodOnSnake(Pos),

    #[error("speed must be finite and positive, got {0}")]
    InvalidSpeed(f32),
}

pub type Result<T> = std::result::Result<T, GameError>;
