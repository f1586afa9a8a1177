use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Pos, Size};
use crate::snake::Snake;

const MAX_SAMPLE_ATTEMPTS: usize = 64;

/// Picks a cell not covered by the snake, uniformly among all free cells.
/// Returns `None` once the snake fills the whole grid.
pub fn place_food(rng: &mut impl Rng, size: Size, snake: &Snake) -> Option<Pos> {
    let area = size.area();
    if snake.len() >= area {
        return None;
    }

    // Rejection sampling is uniform over the free cells and cheap while the
    // board is mostly empty.
    if snake.len() * 2 < area {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let pos = Pos::new(
                rng.gen_range(0..size.width as i32),
                rng.gen_range(0..size.height as i32),
            );
            if !snake.contains(pos) {
                debug!("Food placed at ({}, {})", pos.x, pos.y);
                return Some(pos);
            }
        }
    }

    let free: Vec<Pos> = size.cells().filter(|&pos| !snake.contains(pos)).collect();
    let pos = free.choose(rng).copied();
    if let Some(pos) = pos {
        debug!("Food placed at ({}, {}) from {} free cells", pos.x, pos.y, free.len());
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Direction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_food_avoids_snake() {
        let size = Size::new(10, 10);
        let snake = Snake::new(Pos::new(5, 5), Direction::Right, 5);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let pos = place_food(&mut rng, size, &snake).expect("grid has room");
            assert!(size.contains(pos));
            assert!(!snake.contains(pos));
        }
    }

    #[test]
    fn test_dense_board_finds_last_cell() {
        // 3x1 grid with two segments leaves only (2, 0)
        let size = Size::new(3, 1);
        let snake = Snake::from_segments([Pos::new(1, 0), Pos::new(0, 0)]);
        let mut rng = StdRng::seed_from_u64(1);

        for _ in 0..20 {
            assert_eq!(place_food(&mut rng, size, &snake), Some(Pos::new(2, 0)));
        }
    }

    #[test]
    fn test_full_board_has_no_food() {
        let size = Size::new(2, 1);
        let snake = Snake::from_segments([Pos::new(0, 0), Pos::new(1, 0)]);
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(place_food(&mut rng, size, &snake), None);
    }

    #[test]
    fn test_every_free_cell_reachable() {
        // 2x2 grid, one segment: all three free cells should show up
        let size = Size::new(2, 2);
        let snake = Snake::from_segments([Pos::new(0, 0)]);
        let mut rng = StdRng::seed_from_u64(11);

        let mut seen = Vec::new();
        for _ in 0..200 {
            let pos = place_food(&mut rng, size, &snake).expect("grid has room");
            if !seen.contains(&pos) {
                seen.push(pos);
            }
        }
        seen.sort_by_key(|p| (p.y, p.x));
        assert_eq!(seen, vec![Pos::new(1, 0), Pos::new(0, 1), Pos::new(1, 1)]);
    }
}
