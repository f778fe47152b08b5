use std::{convert::TryFrom, io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{ensure, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::debug;

use crate::game::Scene;
use crate::snake::Tile;

pub type TermInt = u16;
pub type Coords = (TermInt, TermInt);

type Cell = (char, Color);

const BLANK: Cell = (' ', Color::Reset);
const TILE_CHAR: char = '█';
const TILE_COLS: TermInt = 2;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
    frame_drawn: bool,
}

struct Message {
    lines: Vec<String>,
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

/// Where the board frame sits on the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Top-left corner of the border
    pub origin: Coords,
    pub board_cols: TermInt,
    pub board_rows: TermInt,
}

impl Layout {
    /// Centres a `width` x `height` tile board plus its border and score line.
    pub fn fit(term: Coords, width: i32, height: i32) -> Result<Self> {
        let (cols, rows) = Self::required_size(width, height);
        ensure!(term.0 as u32 >= cols && term.1 as u32 >= rows,
            "Terminal is {}x{}, the {}x{} board needs at least {}x{}",
            term.0, term.1, width, height, cols, rows);

        let board_cols = width as TermInt * TILE_COLS;
        let board_rows = height as TermInt;
        let origin = ((term.0 - (board_cols + 2)) / 2, (term.1 - (board_rows + 3)) / 2);
        Ok(Layout { origin, board_cols, board_rows })
    }

    /// Border on all sides plus one line for the score.
    pub fn required_size(width: i32, height: i32) -> (u32, u32) {
        let cols = (width.max(0) as u32).saturating_mul(TILE_COLS as u32).saturating_add(2);
        let rows = (height.max(0) as u32).saturating_add(3);
        (cols, rows)
    }

    /// Screen position of a tile's left column, or `None` if it is off the board.
    pub fn tile_at(&self, tile: Tile) -> Option<Coords> {
        let in_board = tile.x >= 0 && tile.y >= 0
            && (tile.x as u32) * (TILE_COLS as u32) < self.board_cols as u32
            && (tile.y as u32) < self.board_rows as u32;

        if !in_board {
            return None;
        }
        Some((self.origin.0 + 1 + tile.x as TermInt * TILE_COLS, self.origin.1 + 1 + tile.y as TermInt))
    }

    pub fn score_row(&self) -> TermInt {
        self.origin.1 + self.board_rows + 2
    }
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size()?;
        let stdout = stdout();
        let screen = vec![BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None, frame_drawn: false })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)?;
        Ok(())
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Waits up to `timeout` for a key press. Resizes are handled here.
    pub fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyEvent>> {
        if !poll(timeout)? {
            return Ok(None);
        }

        match read()? {
            Event::Key(ev) => Ok(Some(ev)),
            Event::Resize(w, h) => {
                debug!("Terminal resized to {}x{}", w, h);
                self.width = w;
                self.height = h;
                self.current_msg = None;
                self.clear()?;
                Ok(None)
            },
            _ => Ok(None),
        }
    }

    /// Paints a scene, writing only the cells that changed since the last frame.
    pub fn draw(&mut self, scene: &Scene) -> Result<()> {
        let layout = Layout::fit((self.width, self.height), scene.width, scene.height)?;
        let snake_color = color_named(scene.snake_color);
        let food_color = color_named(scene.food_color);

        if !self.frame_drawn {
            self.draw_borders(&layout)?;
            self.frame_drawn = true;
        }

        // Messages are painted over the board, so take it down before touching cells
        let message = scene.status.message();
        let keep_msg = matches!((&self.current_msg, &message), (Some(m), Some(text)) if m.lines == [text.clone()]);
        if !keep_msg {
            self.hide_message()?;
        }

        let mut cells = vec![BLANK; layout.board_cols as usize * layout.board_rows as usize];
        let mut put = |tile: Tile, chars: [char; 2], color: Color| {
            if let Some((x, y)) = layout.tile_at(tile) {
                let col = (x - layout.origin.0 - 1) as usize;
                let row = (y - layout.origin.1 - 1) as usize;
                let idx = row * layout.board_cols as usize + col;
                cells[idx] = (chars[0], color);
                cells[idx + 1] = (chars[1], color);
            }
        };

        put(scene.food, [TILE_CHAR, TILE_CHAR], food_color);
        for (i, tile) in scene.snake.iter().enumerate().rev() {
            let chars = if i == 0 { [scene.snake_head_char, scene.snake_head_char] } else { [TILE_CHAR, TILE_CHAR] };
            put(*tile, chars, snake_color);
        }

        let covered = if keep_msg { self.current_msg.as_ref().map(|m| (m.top_left, m.width, m.height)) } else { None };
        for row in 0..layout.board_rows {
            for col in 0..layout.board_cols {
                let pos = (layout.origin.0 + 1 + col, layout.origin.1 + 1 + row);
                let cell = cells[row as usize * layout.board_cols as usize + col as usize];
                self.print_under(pos, cell, covered)?;
            }
        }

        let score_line = format!("{:^width$}", scene.score_line(), width = layout.board_cols as usize + 2);
        for (i, ch) in score_line.chars().enumerate() {
            let pos = (layout.origin.0 + i as TermInt, layout.score_row());
            self.print_under(pos, (ch, Color::White), covered)?;
        }

        if let (Some(text), false) = (message, keep_msg) {
            self.show_message(&[text.as_str()])?;
        }

        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_height = (lines.len() + 2) as TermInt;
        let msg_width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        let lines = lines.iter().map(|l| l.to_string()).collect();
        self.current_msg = Some(Message { lines, top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        // Restore the content from the screen buffer
        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            for x in msg.top_left.0..msg.top_left.0 + msg.width {
                if let Some(&(ch, color)) = self.screen.get(self.index((x, y))) {
                    queue!(self.stdout, cursor::MoveTo(x, y), style::SetForegroundColor(color), style::Print(ch))?;
                }
            }
        }

        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All))?;
        self.screen = vec![BLANK; self.width as usize * self.height as usize];
        self.frame_drawn = false;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush()?;
        Ok(())
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_borders(&mut self, layout: &Layout) -> Result<()> {
        let (x0, y0) = layout.origin;
        let end_x = x0 + layout.board_cols + 1;
        let end_y = y0 + layout.board_rows + 1;

        for x in x0..=end_x {
            let ch = if x == x0 || x == end_x {'+'} else {'-'};
            self.print_at((x, y0), (ch, Color::White))?;
            self.print_at((x, end_y), (ch, Color::White))?;
        }

        for y in y0 + 1..end_y {
            self.print_at((x0, y), ('|', Color::White))?;
            self.print_at((end_x, y), ('|', Color::White))?;
        }

        Ok(())
    }

    fn index(&self, pos: Coords) -> usize {
        self.width as usize * pos.1 as usize + pos.0 as usize
    }

    fn print_at(&mut self, pos: Coords, cell: Cell) -> Result<()> {
        let idx = self.index(pos);
        if self.screen.get(idx) == Some(&cell) {
            return Ok(());
        }
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(cell.1), style::Print(cell.0))?;
        self.save_at(pos, cell);
        Ok(())
    }

    // Cells hidden behind the message box only go to the back buffer
    fn print_under(&mut self, pos: Coords, cell: Cell, covered: Option<(Coords, TermInt, TermInt)>) -> Result<()> {
        if inside(pos, covered) {
            self.save_at(pos, cell);
            Ok(())
        } else {
            self.print_at(pos, cell)
        }
    }

    fn save_at(&mut self, pos: Coords, cell: Cell) {
        let idx = self.index(pos);
        if let Some(slot) = self.screen.get_mut(idx) {
            *slot = cell;
        }
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::SetForegroundColor(Color::White), style::Print(ch))?;
        Ok(())
    }
}

fn inside(pos: Coords, area: Option<(Coords, TermInt, TermInt)>) -> bool {
    match area {
        Some((top_left, w, h)) => pos.0 >= top_left.0 && pos.0 < top_left.0 + w
            && pos.1 >= top_left.1 && pos.1 < top_left.1 + h,
        None => false,
    }
}

/// Crossterm color names like "red" or "dark_green". Unknown names draw white.
pub fn color_named(name: &str) -> Color {
    Color::try_from(name).unwrap_or(Color::White)
}
