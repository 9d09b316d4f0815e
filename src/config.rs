use std::time::Duration;

/// Search budgets. The default runs the search to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Stop with [`AbortReason::ExpansionLimit`](crate::AbortReason) after this many expansions.
    pub max_expansions: Option<usize>,
    /// Stop with [`AbortReason::TimeLimit`](crate::AbortReason) once this much wall time has passed.
    pub time_limit: Option<Duration>,
    /// Report boards that fail the inversion-parity test as unsolvable
    /// without searching them.
    pub parity_check: bool,
}

impl SolverConfig {
    pub fn with_max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_parity_check(mut self, enabled: bool) -> Self {
        self.parity_check = enabled;
        self
    }
}

/// Random moves per cell used to scramble a board, as in the interactive game.
pub const SCRAMBLE_MOVES_PER_CELL: usize = 20;

/// Default random-walk length for a `rows x cols` scramble.
pub fn default_scramble_steps(rows: usize, cols: usize) -> usize {
    rows * cols * SCRAMBLE_MOVES_PER_CELL
}

/// Board sizes offered by the interactive game, from 3x3 up to 7x8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub number: u8,
    pub rows: usize,
    pub cols: usize,
}

impl Level {
    pub const ALL: [Level; 10] = [
        Level::new(1, 3, 3),
        Level::new(2, 3, 4),
        Level::new(3, 4, 4),
        Level::new(4, 4, 5),
        Level::new(5, 5, 5),
        Level::new(6, 5, 6),
        Level::new(7, 6, 6),
        Level::new(8, 6, 7),
        Level::new(9, 7, 7),
        Level::new(10, 7, 8),
    ];

    const fn new(number: u8, rows: usize, cols: usize) -> Self {
        Self { number, rows, cols }
    }

    pub fn get(number: u8) -> Option<Level> {
        Self::ALL.iter().copied().find(|level| level.number == number)
    }

    /// Random-walk length the game uses to scramble a board of this size.
    pub fn scramble_steps(&self) -> usize {
        default_scramble_steps(self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_grow_from_three_by_three() {
        assert_eq!(Level::get(1), Some(Level::new(1, 3, 3)));
        assert_eq!(Level::get(10).map(|l| (l.rows, l.cols)), Some((7, 8)));
        assert_eq!(Level::get(0), None);
        assert_eq!(Level::get(11), None);
        assert_eq!(Level::get(1).unwrap().scramble_steps(), 180);
    }

    #[test]
    fn level_scramble_matches_the_free_default() {
        for level in Level::ALL {
            assert_eq!(
                level.scramble_steps(),
                default_scramble_steps(level.rows, level.cols)
            );
        }
        assert_eq!(default_scramble_steps(2, 5), 200);
    }

    #[test]
    fn builder_sets_budgets() {
        let cfg = SolverConfig::default()
            .with_max_expansions(10)
            .with_time_limit(Duration::from_millis(5))
            .with_parity_check(true);
        assert_eq!(cfg.max_expansions, Some(10));
        assert_eq!(cfg.time_limit, Some(Duration::from_millis(5)));
        assert!(cfg.parity_check);
        assert_eq!(SolverConfig::default().max_expansions, None);
    }
}
