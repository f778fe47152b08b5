use rand::Rng;
use rand::seq::SliceRandom;

use crate::snake::Tile;

#[derive(Debug, Clone)]
pub struct Food {
    position: Tile,
    color: String,
}

impl Food {
    pub fn new(position: Tile, color: &str) -> Self {
        Food { position, color: color.to_owned() }
    }

    pub fn position(&self) -> Tile {
        self.position
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_position(&mut self, position: Tile) {
        self.position = position;
    }

    /// Jumps to a uniformly random tile of the board. The snake is not consulted.
    pub fn change_position<R: Rng>(&mut self, rng: &mut R, width: i32, height: i32) {
        self.position = Tile::new(rng.gen_range(0..width), rng.gen_range(0..height));
    }

    /// Jumps to a random tile not in `occupied`. Stays put and returns false
    /// when every tile is taken.
    pub fn change_position_avoiding<R: Rng>(&mut self, rng: &mut R, width: i32, height: i32, occupied: &[Tile]) -> bool {
        let choices: Vec<Tile> = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect();

        match choices.choose(rng) {
            Some(&pos) => {
                self.position = pos;
                true
            },
            None => false,
        }
    }
}
