use std::cmp::max;

use anyhow::Result;
use log::{debug, info, trace};

use crate::board::Board;
use crate::config::GameConfig;
use crate::snake::{Direction, Tile};

/// Score bookkeeping and the start/pause gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GameState {
    pub score: u32,
    pub high_score: u32,
    pub paused: bool,
    pub started: bool,
}

/// Text shown over the board, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Intro,
    Paused,
    GameOver { score: u32 },
    Playing,
}

impl Status {
    pub fn message(&self) -> Option<String> {
        match self {
            Status::Intro => Some("Press space to start".to_owned()),
            Status::Paused => Some("Press space to resume".to_owned()),
            Status::GameOver { score } => Some(format!("Game over! Score: {}", score)),
            Status::Playing => None,
        }
    }
}

/// Player intent fed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Turn(Direction),
    StartOrPause,
    /// Any other key, only steps the game
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Paused, nothing advanced
    Idle,
    Moved { ate_food: bool },
    GameOver { score: u32 },
}

/// Everything a renderer needs to paint one frame.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub width: i32,
    pub height: i32,
    pub tile_size: u32,
    pub snake: &'a [Tile],
    pub snake_head_char: char,
    pub snake_color: &'a str,
    pub food: Tile,
    pub food_color: &'a str,
    pub score: u32,
    pub high_score: u32,
    pub status: Status,
}

impl Scene<'_> {
    pub fn score_line(&self) -> String {
        format!("Score: {}  Highscore: {}", self.score, self.high_score)
    }
}

pub struct SnakeGame {
    config: GameConfig,
    board: Board,
    state: GameState,
    status: Status,
}

impl SnakeGame {
    /// Fails if `config` does not validate.
    pub fn new(config: GameConfig) -> Result<Self> {
        let board = Board::new(&config)?;
        Ok(Self::with_board(config, board))
    }

    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        let board = Board::with_seed(&config, seed)?;
        Ok(Self::with_board(config, board))
    }

    fn with_board(config: GameConfig, board: Board) -> Self {
        let state = GameState { paused: true, ..Default::default() };
        SnakeGame { config, board, state, status: Status::Intro }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Whether the timer should be driving ticks.
    pub fn is_running(&self) -> bool {
        self.state.started
    }

    /// One simulation step: crash check, then food and movement unless paused.
    pub fn tick(&mut self) -> TickOutcome {
        if self.board.snake_crashed() {
            let score = self.state.score;
            self.game_over();
            return TickOutcome::GameOver { score };
        }

        if self.state.paused {
            return TickOutcome::Idle;
        }

        let ate_food = self.board.check_snake_food_collision();
        if ate_food {
            self.state.score = self.state.score.saturating_add(self.config.score_per_food);
            self.state.high_score = max(self.state.high_score, self.state.score);
            debug!("Food eaten at {:?}, score {}", self.board.food().position(), self.state.score);
            self.board.relocate_food();
            self.board.snake_mut().grow();
        }

        self.board.snake_mut().move_step();
        trace!("Snake head at {:?}", self.board.snake().head());
        TickOutcome::Moved { ate_food }
    }

    /// Applies a key press. With `step_on_input` the press also runs a tick
    /// immediately, on top of the timer-driven ones.
    pub fn apply(&mut self, control: Control) -> Option<TickOutcome> {
        match control {
            Control::Turn(dir) => {
                if !self.board.snake_mut().set_direction(dir) {
                    debug!("Ignored reversing turn to {:?}", dir);
                }
            },
            Control::StartOrPause => {
                if !self.state.started {
                    self.state.started = true;
                    info!("Game started");
                }
                self.toggle_pause();
            },
            Control::Other => {},
        }

        if self.config.step_on_input {
            Some(self.tick())
        } else {
            None
        }
    }

    pub fn scene(&self) -> Scene<'_> {
        let snake = self.board.snake();
        Scene {
            width: self.board.width(),
            height: self.board.height(),
            tile_size: self.board.tile_size(),
            snake: snake.tiles(),
            snake_head_char: snake.head_char(),
            snake_color: &self.config.snake_color,
            food: self.board.food().position(),
            food_color: self.board.food().color(),
            score: self.state.score,
            high_score: self.state.high_score,
            status: self.status,
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn toggle_pause(&mut self) {
        self.state.paused = !self.state.paused;
        if self.state.paused {
            self.status = Status::Paused;
            info!("Paused at score {}", self.state.score);
        } else {
            self.status = Status::Playing;
            info!("Resumed");
        }
    }

    fn game_over(&mut self) {
        info!("Game over, score {} (high score {})", self.state.score, self.state.high_score);
        self.status = Status::GameOver { score: self.state.score };
        self.reset();
    }

    fn reset(&mut self) {
        self.state.score = 0;
        self.state.paused = true;
        let restart = self.config.restart;
        let snake = self.board.snake_mut();
        snake.set_tail(restart.x, restart.y);
        snake.force_direction(self.config.start_direction);
    }
}
