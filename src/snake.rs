use std::collections::VecDeque;

use crate::geometry::{Direction, Pos, PosDelta};

/// The snake's body, head first and tail last.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Pos>,
}

impl Snake {
    /// Builds a straight snake with its head on `head` and the rest of the
    /// body trailing behind it, opposite to `heading`.
    pub fn new(head: Pos, heading: Direction, length: usize) -> Self {
        let back: PosDelta = heading.opposite().into();
        let mut body = VecDeque::with_capacity(length.max(1));
        let mut segment = head;
        for _ in 0..length.max(1) {
            body.push_back(segment);
            segment = segment.offset(back);
        }
        Snake { body }
    }

    /// Takes the body as given. Callers make sure it is non-empty.
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = Pos>) -> Self {
        Snake {
            body: segments.into_iter().collect(),
        }
    }

    pub fn head(&self) -> Pos {
        self.body[0]
    }

    pub fn tail(&self) -> Pos {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl ExactSizeIterator<Item = &Pos> + '_ {
        self.body.iter()
    }

    pub fn contains(&self, pos: Pos) -> bool {
        self.body.contains(&pos)
    }

    /// Would a head arriving on `pos` hit the body? Unless the snake grows
    /// this tick, the tail moves away and its cell does not count.
    pub fn would_collide(&self, pos: Pos, growing: bool) -> bool {
        let checked = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(checked).any(|&segment| segment == pos)
    }

    pub fn slither(&mut self, new_head: Pos, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            self.body.pop_back();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bent_snake() -> Snake {
        // (5,5) head, then down and right: a hook shape
        Snake::from_segments([
            Pos::new(5, 5),
            Pos::new(5, 6),
            Pos::new(5, 7),
            Pos::new(6, 7),
        ])
    }

    #[test]
    fn test_new_snake_trails_heading() {
        let snake = Snake::new(Pos::new(5, 5), Direction::Right, 3);
        let body: Vec<Pos> = snake.segments().copied().collect();

        assert_eq!(body, vec![Pos::new(5, 5), Pos::new(4, 5), Pos::new(3, 5)]);
        assert_eq!(snake.head(), Pos::new(5, 5));
        assert_eq!(snake.tail(), Pos::new(3, 5));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_new_snake_heading_up() {
        let snake = Snake::new(Pos::new(2, 2), Direction::Up, 2);
        assert_eq!(snake.tail(), Pos::new(2, 3));
    }

    #[test]
    fn test_zero_length_still_has_head() {
        let snake = Snake::new(Pos::new(1, 1), Direction::Right, 0);
        assert_eq!(snake.len(), 1);
        assert!(!snake.is_empty());
    }

    #[test]
    fn test_collision_detection() {
        let snake = bent_snake();

        assert!(snake.would_collide(Pos::new(5, 6), false));
        assert!(snake.would_collide(Pos::new(5, 5), false));
        assert!(!snake.would_collide(Pos::new(4, 6), false));

        // The tail vacates unless the snake grows
        assert!(!snake.would_collide(Pos::new(6, 7), false));
        assert!(snake.would_collide(Pos::new(6, 7), true));
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right, 3);
        let initial: Vec<Pos> = snake.segments().copied().collect();

        snake.slither(Pos::new(6, 5), false);

        assert_eq!(snake.head(), Pos::new(6, 5));
        assert_eq!(snake.len(), 3, "Length remained the same");
        assert!(!snake.contains(initial[2]), "Tail was removed");
        assert!(snake.contains(initial[0]), "Old head became body");
    }

    #[test]
    fn test_snake_growth() {
        let mut snake = Snake::new(Pos::new(5, 5), Direction::Right, 3);
        let old_tail = snake.tail();

        snake.slither(Pos::new(6, 5), true);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), old_tail);
    }
}
