use serde::{Deserialize, Serialize};
use Direction::*;

/// One grid cell. Coordinates are signed so a head that left the board
/// can still be represented until the collision is detected.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32) -> Self {
        Tile { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Tile { x: self.x + dx, y: self.y + dy }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// Whether the snake may turn straight back into its own neck.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRule {
    BlockReverse,
    AllowReverse,
}

#[derive(Debug, Clone)]
pub struct Snake {
    // Head at index 0
    tiles: Vec<Tile>,
    direction: Direction,
    grow_next_move: bool,
    turn_rule: TurnRule,
}

impl Snake {
    pub fn new(head: Tile, direction: Direction, turn_rule: TurnRule) -> Self {
        Snake { tiles: vec![head], direction, grow_next_move: false, turn_rule }
    }

    /// Builds a snake from explicit tiles, head first. Returns `None` for an empty body.
    pub fn from_tiles(tiles: Vec<Tile>, direction: Direction, turn_rule: TurnRule) -> Option<Self> {
        if tiles.is_empty() {
            return None;
        }
        Some(Snake { tiles, direction, grow_next_move: false, turn_rule })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn head(&self) -> Tile {
        self.tiles[0]
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Always false, a snake keeps at least its head.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Advances one cell. With growth pending the tail stays put.
    pub fn move_step(&mut self) {
        let new_head = self.head().step(self.direction);
        self.tiles.insert(0, new_head);

        if self.grow_next_move {
            self.grow_next_move = false;
        } else {
            self.tiles.pop();
        }
    }

    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.tiles[1..].contains(&head)
    }

    /// Shrinks the snake back to a single tile.
    pub fn set_tail(&mut self, x: i32, y: i32) {
        self.tiles.clear();
        self.tiles.push(Tile::new(x, y));
        self.grow_next_move = false;
    }

    /// Returns whether the direction was accepted.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.turn_rule == TurnRule::BlockReverse && new_direction.is_opposite(self.direction) {
            return false;
        }
        self.direction = new_direction;
        true
    }

    /// Sets the direction regardless of the turn rule. Used on reset.
    pub fn force_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    pub fn pending_growth(&self) -> bool {
        self.grow_next_move
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake(tiles: &[(i32, i32)], direction: Direction) -> Snake {
        let tiles = tiles.iter().map(|&(x, y)| Tile::new(x, y)).collect();
        Snake::from_tiles(tiles, direction, TurnRule::BlockReverse).unwrap()
    }

    #[test]
    fn test_move_keeps_length_without_growth() {
        let mut s = snake(&[(5, 5), (4, 5), (3, 5)], Right);
        s.move_step();
        assert_eq!(s.len(), 3);
        assert_eq!(s.tiles(), &[Tile::new(6, 5), Tile::new(5, 5), Tile::new(4, 5)]);
    }

    #[test]
    fn test_move_grows_once() {
        let mut s = snake(&[(5, 5), (4, 5)], Right);
        s.grow();
        assert!(s.pending_growth());
        s.move_step();
        assert_eq!(s.len(), 3);
        assert!(!s.pending_growth());
        s.move_step();
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_growth_keeps_tail_when_moving_into_neck() {
        let mut s = Snake::from_tiles(
            vec![Tile::new(3, 3), Tile::new(3, 4), Tile::new(3, 5)],
            Down,
            TurnRule::AllowReverse,
        ).unwrap();
        s.grow();
        s.move_step();
        assert_eq!(s.tiles(), &[Tile::new(3, 4), Tile::new(3, 3), Tile::new(3, 4), Tile::new(3, 5)]);
        assert!(s.check_self_collision());
    }

    #[test]
    fn test_single_tile_never_self_collides() {
        let mut s = snake(&[(2, 2)], Up);
        assert!(!s.check_self_collision());
        s.move_step();
        assert!(!s.check_self_collision());
    }

    #[test]
    fn test_self_collision_after_loop() {
        // Head walks down, left, up into its own body
        let mut s = snake(&[(5, 5), (4, 5), (3, 5), (2, 5), (1, 5)], Right);
        s.set_direction(Down);
        s.move_step();
        assert!(!s.check_self_collision());
        s.set_direction(Left);
        s.move_step();
        assert!(!s.check_self_collision());
        s.set_direction(Up);
        s.move_step();
        assert_eq!(s.head(), Tile::new(4, 5));
        assert!(s.check_self_collision());
    }

    #[test]
    fn test_reverse_blocked() {
        let mut s = snake(&[(5, 5), (4, 5)], Right);
        assert!(!s.set_direction(Left));
        assert_eq!(s.get_direction(), Right);
        assert!(s.set_direction(Up));
        assert_eq!(s.get_direction(), Up);
    }

    #[test]
    fn test_reverse_allowed() {
        let mut s = Snake::new(Tile::new(5, 5), Right, TurnRule::AllowReverse);
        assert!(s.set_direction(Left));
        assert_eq!(s.get_direction(), Left);
    }

    #[test]
    fn test_set_tail_resets_body() {
        let mut s = snake(&[(5, 5), (4, 5), (3, 5)], Right);
        s.grow();
        s.set_tail(0, 0);
        assert_eq!(s.tiles(), &[Tile::new(0, 0)]);
        assert!(!s.pending_growth());
    }

    #[test]
    fn test_force_direction_ignores_rule() {
        let mut s = snake(&[(5, 5)], Left);
        s.force_direction(Right);
        assert_eq!(s.get_direction(), Right);
    }

    #[test]
    fn test_from_tiles_rejects_empty() {
        assert!(Snake::from_tiles(vec![], Up, TurnRule::BlockReverse).is_none());
    }
}
