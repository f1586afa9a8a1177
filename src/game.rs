use std::time::Duration;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{validate_speed, Boundary, GameConfig};
use crate::error::{GameError, Result};
use crate::food::place_food;
use crate::geometry::{Direction, Pos, Size};
use crate::snake::Snake;

const DEFAULT_HEADING: Direction = Direction::Right;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    /// The snake hit a wall or itself.
    GameOver,
    /// The snake covers every cell, so no food can be placed.
    Won,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    /// Normal movement, no special events
    Moved,
    /// Ate food, with score increment
    Nommed(u32),
    /// Ate the last food there was room for
    Won,
    Collision(Collision),
    /// The game had already ended, nothing changed
    Inactive,
}

impl StepResult {
    pub fn ate_food(&self) -> bool {
        matches!(self, StepResult::Nommed(_) | StepResult::Won)
    }
}

/// Everything a renderer needs, copied out in one call.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub snake: Vec<Pos>,
    pub food: Option<Pos>,
    pub score: u32,
    pub direction: Direction,
    pub status: GameStatus,
}

/// One play session.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    snake: Snake,
    direction: Direction,
    pending: Direction,
    food: Option<Pos>,
    score: u32,
    status: GameStatus,
    speed: f32,
    rng: StdRng,
}

impl Default for Game {
    fn default() -> Self {
        let config = GameConfig::default();
        let rng = StdRng::from_entropy();
        Game::build(config, rng)
    }
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same as [`Game::new`] but food placement is reproducible.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        Ok(Game::build(config, rng))
    }

    /// Starts from an arbitrary snake instead of the centered one.
    /// `segments` run head to tail and must be distinct cells on the grid.
    pub fn with_snake(
        config: GameConfig,
        segments: Vec<Pos>,
        heading: Direction,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        if segments.is_empty() {
            return Err(GameError::InvalidConfig("snake needs at least one segment".into()));
        }
        for (i, &pos) in segments.iter().enumerate() {
            if !config.size.contains(pos) {
                return Err(GameError::OutOfBounds(pos));
            }
            if segments[..i].contains(&pos) {
                return Err(GameError::InvalidConfig(format!(
                    "segment ({}, {}) appears twice",
                    pos.x, pos.y
                )));
            }
        }

        let mut game = Game::build(config, StdRng::seed_from_u64(seed));
        game.snake = Snake::from_segments(segments);
        game.direction = heading;
        game.pending = heading;
        game.respawn_food();
        Ok(game)
    }

    fn build(config: GameConfig, rng: StdRng) -> Self {
        let speed = config.initial_speed;
        let mut game = Game {
            snake: initial_snake(&config),
            config,
            direction: DEFAULT_HEADING,
            pending: DEFAULT_HEADING,
            food: None,
            score: 0,
            status: GameStatus::Active,
            speed,
            rng,
        };
        game.respawn_food();

        let head = game.snake.head();
        debug!(
            "Game initialized. Snake at ({}, {}), direction: {:?}",
            head.x, head.y, game.direction
        );
        game
    }

    /// Back to a fresh session on the same grid. The speed setting is kept.
    pub fn reset(&mut self) {
        self.snake = initial_snake(&self.config);
        self.direction = DEFAULT_HEADING;
        self.pending = DEFAULT_HEADING;
        self.score = 0;
        self.status = GameStatus::Active;
        self.respawn_food();
        debug!("Game reset");
    }

    fn respawn_food(&mut self) {
        self.food = place_food(&mut self.rng, self.config.size, &self.snake);
        if self.food.is_none() {
            info!("No free cell left for food, score {}", self.score);
            self.status = GameStatus::Won;
        }
    }

    /// Queues a heading for the next tick. Reversing onto the body is
    /// refused, as is any change once the game has ended.
    pub fn change_direction(&mut self, new_direction: Direction) -> bool {
        if self.status != GameStatus::Active {
            return false;
        }
        if self.direction.is_opposite(new_direction) {
            debug!("Invalid direction change: {:?} -> {:?}", self.direction, new_direction);
            return false;
        }
        self.pending = new_direction;
        debug!("Direction changed to {:?}", new_direction);
        true
    }

    /// Advances the game by one tick.
    pub fn move_snake(&mut self) -> StepResult {
        if self.status != GameStatus::Active {
            return StepResult::Inactive;
        }

        self.direction = self.pending;
        let head = self.snake.head();
        let new_head = match self.config.boundary {
            Boundary::Solid => head.offset(self.direction.into()),
            Boundary::Wrap => head.wrapped_add(self.direction.into(), self.config.size),
        };

        debug!(
            "Moving snake. Current head: ({}, {}), New head: ({}, {}), Direction: {:?}",
            head.x, head.y, new_head.x, new_head.y, self.direction
        );

        if !self.config.size.contains(new_head) {
            return self.end(Collision::Wall, new_head);
        }

        let nommed = self.food == Some(new_head);
        if self.snake.would_collide(new_head, nommed) {
            return self.end(Collision::Body, new_head);
        }

        self.snake.slither(new_head, nommed);
        if !nommed {
            return StepResult::Moved;
        }

        self.score = self.score.saturating_add(self.config.reward);
        debug!("Food eaten at ({}, {}), score {}", new_head.x, new_head.y, self.score);
        self.respawn_food();
        if self.status == GameStatus::Won {
            StepResult::Won
        } else {
            StepResult::Nommed(self.config.reward)
        }
    }

    fn end(&mut self, collision: Collision, at: Pos) -> StepResult {
        info!(
            "{:?} collision at ({}, {}), final score {}",
            collision, at.x, at.y, self.score
        );
        self.status = GameStatus::GameOver;
        StepResult::Collision(collision)
    }

    /// Moves the food to a chosen cell. Mostly useful for scripted scenarios.
    pub fn set_food_position(&mut self, pos: Pos) -> Result<()> {
        if !self.config.size.contains(pos) {
            return Err(GameError::OutOfBounds(pos));
        }
        if self.snake.contains(pos) {
            return Err(GameError::FoodOnSnake(pos));
        }
        self.food = Some(pos);
        Ok(())
    }

    pub fn food_position(&self) -> Option<Pos> {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn snake_len(&self) -> usize {
        self.snake.len()
    }

    /// Head to tail.
    pub fn snake_positions(&self) -> impl ExactSizeIterator<Item = &Pos> + '_ {
        self.snake.segments()
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn is_won(&self) -> bool {
        self.status == GameStatus::Won
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Heading used on the last tick.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Heading the next tick will use.
    pub fn pending_direction(&self) -> Direction {
        self.pending
    }

    pub fn size(&self) -> Size {
        self.config.size
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        validate_speed(speed)?;
        self.speed = speed;
        Ok(())
    }

    /// How long a driver should wait between ticks at the current speed.
    pub fn tick_interval(&self, base: Duration) -> Duration {
        let nanos = base.as_nanos() as f64 / self.speed as f64;
        Duration::from_nanos(nanos.round() as u64)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            snake: self.snake.segments().copied().collect(),
            food: self.food,
            score: self.score,
            direction: self.pending,
            status: self.status,
        }
    }
}

fn initial_snake(config: &GameConfig) -> Snake {
    let center = Pos::new(
        (config.size.width / 2) as i32,
        (config.size.height / 2) as i32,
    );
    Snake::new(center, DEFAULT_HEADING, config.initial_length)
}
