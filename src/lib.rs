//! Grid snake: a single-player snake game on a fixed board.
//!
//! The simulation (`snake`, `food`, `board`, `game`) knows nothing about
//! terminals; `input` and `term` adapt it to crossterm.

pub mod board;
pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod snake;
pub mod term;
