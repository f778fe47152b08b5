use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, trace};

use grid_snake::config::GameConfig;
use grid_snake::game::SnakeGame;
use grid_snake::input::{key_action, KeyAction};
use grid_snake::term::{Layout, TermManager};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = GameConfig::from_env()?;
    let mut term = TermManager::new().context("Failed to read the terminal size")?;
    Layout::fit(term.get_terminal_size(), config.width, config.height)?;

    term.setup().context("Failed to set up the terminal")?;
    let res = play(&mut term, config);
    // Restore even if the game loop failed
    let restored = term.restore().context("Failed to restore the terminal");
    res.and(restored)
}

fn play(term: &mut TermManager, config: GameConfig) -> Result<()> {
    let tick_interval = config.tick_interval();
    info!("Starting a {}x{} board, ticking every {:?}", config.width, config.height, tick_interval);

    let mut game = SnakeGame::new(config)?;
    let mut next_tick = Instant::now() + tick_interval;
    term.draw(&game.scene())?;

    loop {
        let timeout = next_tick.saturating_duration_since(Instant::now());

        if let Some(key_ev) = term.poll_key(timeout)? {
            match key_action(&key_ev) {
                KeyAction::Quit => {
                    info!("Quit with score {}", game.state().score);
                    return Ok(());
                },
                KeyAction::Game(control) => {
                    let was_running = game.is_running();
                    game.apply(control);
                    if !was_running && game.is_running() {
                        // The timer starts with the first start signal
                        next_tick = Instant::now() + tick_interval;
                    }
                    term.draw(&game.scene())?;
                },
            }
        }

        let now = Instant::now();
        if now < next_tick {
            continue;
        }

        // The timer keeps running while paused, the tick itself is gated
        next_tick += tick_interval;
        if next_tick < now {
            next_tick = now + tick_interval;
        }

        if game.is_running() {
            let outcome = game.tick();
            trace!("Tick: {:?}", outcome);
        }
        term.draw(&game.scene())?;
    }
}
