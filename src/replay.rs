//! Terminal playback of a solved move list.
//!
//! The solver only hands back moves; this module is the caller that applies
//! them one at a time with a pause between frames.

use crossterm::cursor::{Hide, MoveTo, MoveToNextLine, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent};
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::puzzle::{Board, Move, Position};

/// Board state when playback stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    pub board: Board,
    pub applied: usize,
    pub cancelled: bool,
}

/// Renders `board` one row per line. With `color`, tiles already in their
/// goal cell are green and `highlight` is shown reversed.
pub fn render(board: &Board, highlight: Option<Position>, color: bool) -> String {
    let width = (board.rows() * board.cols() - 1).to_string().len();
    let mut lines = Vec::with_capacity(board.rows());

    for row in 0..board.rows() {
        let mut cells = Vec::with_capacity(board.cols());
        for col in 0..board.cols() {
            let pos = Position::new(row, col);
            let label = board[pos];
            let text = if label == 0 {
                format!("{:>width$}", "", width = width)
            } else {
                format!("{:>width$}", label, width = width)
            };

            let cell = if !color || label == 0 {
                text
            } else if highlight == Some(pos) {
                text.reverse().bold().to_string()
            } else if label as usize == row * board.cols() + col + 1 {
                text.green().to_string()
            } else {
                text
            };
            cells.push(cell);
        }
        lines.push(cells.join(" "));
    }
    lines.join("\n")
}

/// Applies `moves` to a copy of `start`, redrawing after each one.
///
/// `wait` is called before every move with `delay`; returning `true` stops
/// playback. The returned board then holds exactly the moves applied so far.
pub fn play<W, F>(
    out: &mut W,
    start: &Board,
    moves: &[Move],
    delay: Duration,
    color: bool,
    mut wait: F,
) -> io::Result<Replay>
where
    W: Write,
    F: FnMut(Duration) -> io::Result<bool>,
{
    let mut board = start.clone();
    queue!(out, Hide, Clear(ClearType::All))?;
    draw(out, &board, None, 0, moves.len(), color)?;

    for (applied, &mv) in moves.iter().enumerate() {
        if wait(delay)? {
            execute!(out, Show, Print(format!("stopped after {} moves\r\n", applied)))?;
            return Ok(Replay {
                board,
                applied,
                cancelled: true,
            });
        }
        // The tile that slides ends up where the blank was.
        let landed = board.blank();
        board = board.apply(mv);
        draw(out, &board, Some(landed), applied + 1, moves.len(), color)?;
    }

    execute!(out, Show)?;
    Ok(Replay {
        board,
        applied: moves.len(),
        cancelled: false,
    })
}

fn draw<W: Write>(
    out: &mut W,
    board: &Board,
    highlight: Option<Position>,
    step: usize,
    total: usize,
    color: bool,
) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::FromCursorDown))?;
    for line in render(board, highlight, color).lines() {
        queue!(out, Print(line), MoveToNextLine(1))?;
    }
    queue!(
        out,
        MoveToNextLine(1),
        Print(format!("move {}/{}  (q to stop)", step, total)),
        MoveToNextLine(1)
    )?;
    out.flush()
}

/// Waits up to `delay` for `q` or `Esc`. Needs raw mode to see single keys.
pub fn wait_for_quit(delay: Duration) -> io::Result<bool> {
    let deadline = Instant::now() + delay;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !event::poll(remaining)? {
            return Ok(false);
        }
        if let Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }) = event::read()?
        {
            return Ok(true);
        }
        if remaining.is_zero() {
            return Ok(false);
        }
    }
}

/// Keeps the terminal in raw mode until dropped.
pub struct RawMode(());

impl RawMode {
    pub fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(RawMode(()))
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start() -> Board {
        Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap()
    }

    #[test]
    fn plain_render_matches_display() {
        let board = start();
        assert_eq!(format!("{}\n", render(&board, None, false)), board.to_string());
    }

    #[test]
    fn colored_render_marks_the_highlight() {
        let board = start();
        let plain = render(&board, None, false);
        let colored = render(&board, Some(Position::new(0, 0)), true);
        assert_ne!(plain, colored);
        assert!(colored.contains('\u{1b}'));
    }

    #[test]
    fn full_playback_reaches_the_goal() {
        let board = start();
        let moves = crate::Solver::default().solve(&board).moves().unwrap().to_vec();
        let mut out = Vec::new();

        let replay = play(&mut out, &board, &moves, Duration::ZERO, false, |_| Ok(false)).unwrap();
        assert!(!replay.cancelled);
        assert_eq!(replay.applied, 2);
        assert!(replay.board.is_solved());
        assert!(String::from_utf8_lossy(&out).contains("move 2/2"));
    }

    #[test]
    fn cancelling_keeps_the_moves_applied_so_far() {
        let board = start();
        let moves = crate::Solver::default().solve(&board).moves().unwrap().to_vec();
        let mut calls = 0;
        let mut out = Vec::new();

        let replay = play(&mut out, &board, &moves, Duration::ZERO, true, |_| {
            calls += 1;
            Ok(calls > 1)
        })
        .unwrap();
        assert!(replay.cancelled);
        assert_eq!(replay.applied, 1);
        assert_eq!(replay.board, board.apply(moves[0]));
    }
}
