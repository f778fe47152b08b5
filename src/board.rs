use anyhow::Result;
use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::config::GameConfig;
use crate::food::Food;
use crate::snake::{Snake, Tile};

/// Fixed-size grid holding the snake and its food.
pub struct Board {
    width: i32,
    height: i32,
    tile_size: u32,
    food_avoids_snake: bool,
    snake: Snake,
    food: Food,
    rng: StdRng,
}

impl Board {
    /// Fails if `config` does not validate.
    pub fn new(config: &GameConfig) -> Result<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_seed(config: &GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &GameConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let snake = Snake::new(config.restart, config.start_direction, config.turn_rule);
        let food = Food::new(config.restart, &config.food_color);
        let mut board = Board {
            width: config.width,
            height: config.height,
            tile_size: config.tile_size,
            food_avoids_snake: config.food_avoids_snake,
            snake,
            food,
            rng,
        };
        board.relocate_food();
        Ok(board)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn snake_mut(&mut self) -> &mut Snake {
        &mut self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn food_mut(&mut self) -> &mut Food {
        &mut self.food
    }

    /// Swaps in a different snake, e.g. to set up a scenario.
    pub fn set_snake(&mut self, snake: Snake) {
        self.snake = snake;
    }

    pub fn contains(&self, tile: Tile) -> bool {
        tile.x >= 0 && tile.x < self.width && tile.y >= 0 && tile.y < self.height
    }

    pub fn check_snake_food_collision(&self) -> bool {
        self.snake.head() == self.food.position()
    }

    pub fn check_snake_wall_collision(&self) -> bool {
        !self.contains(self.snake.head())
    }

    pub fn snake_crashed(&self) -> bool {
        self.snake.check_self_collision() || self.check_snake_wall_collision()
    }

    pub fn relocate_food(&mut self) {
        if self.food_avoids_snake {
            let moved = self.food.change_position_avoiding(&mut self.rng, self.width, self.height, self.snake.tiles());
            if !moved {
                debug!("No free tile for food, leaving it at {:?}", self.food.position());
            }
        } else {
            self.food.change_position(&mut self.rng, self.width, self.height);
        }
        debug!("Food relocated to {:?}", self.food.position());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::{Direction, TurnRule};

    fn board(width: i32, height: i32) -> Board {
        Board::with_seed(&GameConfig::new(width, height), 42).unwrap()
    }

    fn place(board: &mut Board, tiles: &[(i32, i32)], direction: Direction) {
        let tiles = tiles.iter().map(|&(x, y)| Tile::new(x, y)).collect();
        board.set_snake(Snake::from_tiles(tiles, direction, TurnRule::BlockReverse).unwrap());
    }

    #[test]
    fn test_new_board_starts_at_restart_tile() {
        let b = board(10, 10);
        assert_eq!(b.snake().tiles(), &[Tile::new(0, 0)]);
        assert_eq!(b.snake().get_direction(), Direction::Right);
        assert!(b.contains(b.food().position()));
    }

    #[test]
    fn test_food_collision_after_move() {
        let mut b = board(10, 10);
        place(&mut b, &[(5, 5)], Direction::Right);
        b.food_mut().set_position(Tile::new(6, 5));
        assert!(!b.check_snake_food_collision());
        b.snake_mut().move_step();
        assert_eq!(b.snake().head(), Tile::new(6, 5));
        assert!(b.check_snake_food_collision());
    }

    #[test]
    fn test_wall_collision_on_every_edge() {
        let mut b = board(10, 10);
        for &(x, y, hit) in &[
            (-1, 5, true), (10, 5, true), (5, -1, true), (5, 10, true),
            (0, 0, false), (9, 9, false), (0, 9, false), (9, 0, false),
        ] {
            place(&mut b, &[(x, y)], Direction::Up);
            assert_eq!(b.check_snake_wall_collision(), hit, "head at ({}, {})", x, y);
        }
    }

    #[test]
    fn test_moving_left_off_the_board_crashes() {
        let mut b = board(10, 10);
        place(&mut b, &[(0, 5), (1, 5)], Direction::Left);
        b.snake_mut().move_step();
        assert_eq!(b.snake().head(), Tile::new(-1, 5));
        assert!(b.check_snake_wall_collision());
        assert!(b.snake_crashed());
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Board::with_seed(&GameConfig::new(0, 5), 1).is_err());
        let config = GameConfig { restart: Tile::new(-1, 0), ..Default::default() };
        assert!(Board::new(&config).is_err());
    }

    #[test]
    fn test_relocate_food_in_bounds() {
        let mut b = board(3, 2);
        for _ in 0..100 {
            b.relocate_food();
            assert!(b.contains(b.food().position()));
        }
    }

    #[test]
    fn test_relocate_food_avoiding_snake() {
        let config = GameConfig { width: 2, height: 2, food_avoids_snake: true, ..Default::default() };
        let mut b = Board::with_seed(&config, 9).unwrap();
        place(&mut b, &[(0, 0), (1, 0), (1, 1)], Direction::Left);
        for _ in 0..20 {
            b.relocate_food();
            assert_eq!(b.food().position(), Tile::new(0, 1));
        }
    }
}
