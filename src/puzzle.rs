use rand::{seq::SliceRandom, Rng};
use std::fmt;
use std::ops::Index;

use crate::error::BoardError;

/// Direction the blank travels. The tile that sits on that side of the blank
/// slides the opposite way into the gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Move generation order. Search output depends on it, so it never changes.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` delta applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single slide: the blank moves one cell in `direction` and ends up at `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub direction: Direction,
    pub to: Position,
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.direction, self.to)
    }
}

/// A validated `rows x cols` tile arrangement with exactly one blank.
///
/// Boards are values: [`Board::apply`] hands back a new board and never
/// touches the receiver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<u32>,
    blank: Position,
}

impl Board {
    /// Builds a board from rows of labels, `0` marking the blank.
    pub fn new(grid: Vec<Vec<u32>>) -> Result<Self, BoardError> {
        let rows = grid.len();
        let cols = grid.first().map_or(0, Vec::len);
        if rows < 2 || cols < 2 {
            return Err(BoardError::TooSmall { rows, cols });
        }
        for (row, line) in grid.iter().enumerate() {
            if line.len() != cols {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
        }

        let cells = grid.into_iter().flatten().collect();
        Self::from_flat(rows, cols, cells)
    }

    /// Builds a board from row-major labels.
    pub fn from_flat(rows: usize, cols: usize, cells: Vec<u32>) -> Result<Self, BoardError> {
        if rows < 2 || cols < 2 {
            return Err(BoardError::TooSmall { rows, cols });
        }
        let expected = rows * cols;
        if cells.len() != expected {
            return Err(BoardError::TileCount {
                expected,
                found: cells.len(),
            });
        }

        let blank = Self::validate(rows, cols, &cells)?;
        Ok(Self {
            rows,
            cols,
            cells,
            blank,
        })
    }

    /// Like [`Board::new`], but also checks a caller-tracked blank position.
    pub fn with_blank(grid: Vec<Vec<u32>>, blank: Position) -> Result<Self, BoardError> {
        let board = Self::new(grid)?;
        if board.blank != blank {
            return Err(BoardError::BlankMismatch {
                row: blank.row,
                col: blank.col,
            });
        }
        Ok(board)
    }

    /// The sorted board: `1..rows*cols` in row-major order, blank in the
    /// bottom-right corner.
    pub fn goal(rows: usize, cols: usize) -> Result<Self, BoardError> {
        if rows < 2 || cols < 2 {
            return Err(BoardError::TooSmall { rows, cols });
        }
        let len = rows * cols;
        let cells = (1..len as u32).chain(std::iter::once(0)).collect();

        Ok(Self {
            rows,
            cols,
            cells,
            blank: Position::new(rows - 1, cols - 1),
        })
    }

    fn validate(rows: usize, cols: usize, cells: &[u32]) -> Result<Position, BoardError> {
        let blanks: Vec<usize> = cells
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == 0)
            .map(|(i, _)| i)
            .collect();
        let blank = match blanks.as_slice() {
            [] => return Err(BoardError::NoBlank),
            [only] => *only,
            _ => {
                return Err(BoardError::MultipleBlanks {
                    count: blanks.len(),
                })
            }
        };

        let max = (rows * cols - 1) as u32;
        let mut seen = vec![false; rows * cols];
        for &label in cells.iter().filter(|&&label| label != 0) {
            if label > max {
                return Err(BoardError::LabelOutOfRange { label, max });
            }
            if std::mem::replace(&mut seen[label as usize], true) {
                return Err(BoardError::DuplicateLabel { label });
            }
        }

        Ok(Position::new(blank / cols, blank % cols))
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn blank(&self) -> Position {
        self.blank
    }

    /// Canonical key: every label in row-major order.
    pub fn key(&self) -> &[u32] {
        &self.cells
    }

    pub fn to_rows(&self) -> Vec<Vec<u32>> {
        self.cells.chunks(self.cols).map(<[u32]>::to_vec).collect()
    }

    pub fn is_solved(&self) -> bool {
        self.heuristic() == 0
    }

    /// Sum of Manhattan distances of every non-blank tile to its goal cell.
    pub fn manhattan_distance(&self) -> usize {
        manhattan(&self.cells, self.cols)
    }

    pub fn heuristic(&self) -> usize {
        self.manhattan_distance()
    }

    /// Cell one step away from the blank in `direction`, if it is on the board.
    pub fn neighbor(&self, direction: Direction) -> Option<Position> {
        step(self.blank, direction, self.rows, self.cols)
    }

    /// Moves available from this board, in [`Direction::ALL`] order. Between
    /// two (corner) and four (interior) are produced.
    pub fn legal_moves(&self) -> impl Iterator<Item = Move> {
        moves_from(self.blank, self.rows, self.cols)
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        self.neighbor(mv.direction) == Some(mv.to)
    }

    /// Returns the board after `mv`.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not one of [`Board::legal_moves`]. Use
    /// [`Board::try_move`] for unchecked input.
    pub fn apply(&self, mv: Move) -> Board {
        assert!(
            self.is_legal(mv),
            "move {} is not legal with the blank at {}",
            mv,
            self.blank
        );
        let mut next = self.clone();
        next.slide(mv.to);
        next
    }

    pub fn try_move(&self, direction: Direction) -> Option<Board> {
        let to = self.neighbor(direction)?;
        Some(self.apply(Move { direction, to }))
    }

    fn slide(&mut self, to: Position) {
        let from = self.blank.row * self.cols + self.blank.col;
        let target = to.row * self.cols + to.col;
        self.cells.swap(from, target);
        self.blank = to;
    }

    /// Uniformly random arrangement, redrawn until it passes the parity test.
    pub fn shuffled<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::goal(rows, cols)?;

        loop {
            board.cells.shuffle(rng);
            let blank = board.cells.iter().position(|&label| label == 0).unwrap_or(0);
            board.blank = Position::new(blank / cols, blank % cols);

            if board.is_solvable() {
                return Ok(board);
            }
        }
    }

    /// Random walk of `steps` legal moves away from the goal. Always solvable.
    pub fn scrambled<R: Rng + ?Sized>(
        rows: usize,
        cols: usize,
        steps: usize,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::goal(rows, cols)?;
        let mut options = Vec::with_capacity(4);

        for _ in 0..steps {
            options.clear();
            options.extend(board.legal_moves());
            if let Some(&mv) = options.choose(rng) {
                board.slide(mv.to);
            }
        }
        Ok(board)
    }

    /// Inversion-parity test. A board that fails it can never reach the goal.
    pub fn is_solvable(&self) -> bool {
        let inversions = count_inversions(&self.cells);

        if self.cols % 2 == 1 {
            // Odd width: a vertical slide jumps a tile over an even number of others.
            inversions % 2 == 0
        } else {
            // Even width: each vertical slide flips inversion parity and moves the blank one row.
            let rows_from_bottom = self.rows - 1 - self.blank.row;
            (inversions + rows_from_bottom) % 2 == 0
        }
    }
}

impl Index<Position> for Board {
    type Output = u32;

    fn index(&self, pos: Position) -> &Self::Output {
        &self.cells[pos.row * self.cols + pos.col]
    }
}

fn step(from: Position, direction: Direction, rows: usize, cols: usize) -> Option<Position> {
    let (dr, dc) = direction.as_offset();
    let row = from.row.checked_add_signed(dr)?;
    let col = from.col.checked_add_signed(dc)?;
    (row < rows && col < cols).then(|| Position::new(row, col))
}

/// Moves for a blank at `blank` on a `rows x cols` grid.
pub(crate) fn moves_from(blank: Position, rows: usize, cols: usize) -> impl Iterator<Item = Move> {
    Direction::ALL.into_iter().filter_map(move |direction| {
        step(blank, direction, rows, cols).map(|to| Move { direction, to })
    })
}

pub(crate) fn manhattan(cells: &[u32], cols: usize) -> usize {
    cells
        .iter()
        .enumerate()
        .map(|(index, &label)| tile_distance(label, index, cols))
        .sum()
}

/// Manhattan distance of `label` sitting at row-major `index` from its goal
/// cell. The blank contributes nothing.
pub(crate) fn tile_distance(label: u32, index: usize, cols: usize) -> usize {
    if label == 0 {
        return 0;
    }
    let goal = label as usize - 1;
    (index / cols).abs_diff(goal / cols) + (index % cols).abs_diff(goal % cols)
}

fn count_inversions(cells: &[u32]) -> usize {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &val)| val != 0)
        .map(|(i, &val)| {
            cells[i + 1..]
                .iter()
                .filter(|&&next| next != 0 && next < val)
                .count()
        })
        .sum()
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.cells.len() - 1).to_string().len();
        for row in self.cells.chunks(self.cols) {
            for (col, &val) in row.iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                if val == 0 {
                    write!(f, "{:>width$}", "", width = width)?;
                } else {
                    write!(f, "{:>width$}", val, width = width)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
