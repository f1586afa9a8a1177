use crate::error::{GameError, Result};
use crate::geometry::Size;

/// Grid width used by the C API.
pub const GRID_WIDTH: u16 = 20;
/// Grid height used by the C API.
pub const GRID_HEIGHT: u16 = 20;

pub const DEFAULT_INITIAL_LENGTH: usize = 1;
pub const DEFAULT_REWARD: u32 = 10;
pub const DEFAULT_SPEED: f32 = 1.0;

/// What happens when the head crosses the edge of the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Boundary {
    /// The edge is a wall and hitting it ends the game.
    #[default]
    Solid,
    /// The head reappears on the opposite edge.
    Wrap,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub size: Size,
    /// Segments in a fresh snake, head included.
    pub initial_length: usize,
    /// Score granted per food eaten.
    pub reward: u32,
    pub initial_speed: f32,
    pub boundary: Boundary,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            size: Size::new(GRID_WIDTH, GRID_HEIGHT),
            initial_length: DEFAULT_INITIAL_LENGTH,
            reward: DEFAULT_REWARD,
            initial_speed: DEFAULT_SPEED,
            boundary: Boundary::Solid,
        }
    }
}

impl GameConfig {
    pub fn new(width: u16, height: u16) -> Self {
        GameConfig {
            size: Size::new(width, height),
            ..Default::default()
        }
    }

    pub fn with_initial_length(mut self, initial_length: usize) -> Self {
        self.initial_length = initial_length;
        self
    }

    pub fn with_reward(mut self, reward: u32) -> Self {
        self.reward = reward;
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.initial_speed = speed;
        self
    }

    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(GameError::InvalidConfig(format!(
                "grid must not be empty, got {}x{}",
                self.size.width, self.size.height
            )));
        }

        // The head sits on the center column and the body trails to the left.
        let room = self.size.width as usize / 2 + 1;
        if self.initial_length == 0 || self.initial_length > room {
            return Err(GameError::InvalidConfig(format!(
                "initial length must be between 1 and {}, got {}",
                room, self.initial_length
            )));
        }

        validate_speed(self.initial_speed)
    }
}

pub(crate) fn validate_speed(speed: f32) -> Result<()> {
    if speed.is_finite() && speed > 0.0 {
        Ok(())
    } else {
        Err(GameError::InvalidSpeed(speed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.size, Size::new(20, 20));
        assert_eq!(config.initial_length, 1);
        assert_eq!(config.reward, 10);
        assert_eq!(config.initial_speed, 1.0);
        assert_eq!(config.boundary, Boundary::Solid);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new(10, 8)
            .with_initial_length(3)
            .with_reward(1)
            .with_speed(2.5)
            .with_boundary(Boundary::Wrap);

        assert_eq!(config.size, Size::new(10, 8));
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.reward, 1);
        assert_eq!(config.initial_speed, 2.5);
        assert_eq!(config.boundary, Boundary::Wrap);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(matches!(
            GameConfig::new(0, 10).validate(),
            Err(GameError::InvalidConfig(_))
        ));
        assert!(matches!(
            GameConfig::new(10, 0).validate(),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_initial_length_must_fit() {
        // 10 wide: head on x=5, so x=0..=5 gives room for 6 segments.
        assert!(GameConfig::new(10, 10).with_initial_length(6).validate().is_ok());
        assert!(GameConfig::new(10, 10).with_initial_length(7).validate().is_err());
        assert!(GameConfig::new(10, 10).with_initial_length(0).validate().is_err());
        assert!(GameConfig::new(1, 1).with_initial_length(1).validate().is_ok());
    }

    #[test]
    fn test_bad_speed_rejected() {
        for speed in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = GameConfig::default().with_speed(speed).validate();
            assert!(matches!(result, Err(GameError::InvalidSpeed(_))));
        }
    }
}
