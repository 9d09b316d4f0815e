/**
 * Property tests for the solver on boards small enough to search exhaustively.
 *
 * Covered:
 * - A* move count matches a plain breadth-first search.
 * - Replaying the returned moves always lands on the goal.
 * - Generated moves stay on the board.
 * - Heuristic is zero exactly on the goal layout.
 */
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use slide_solver::{Board, BoardError, Position, SolveOutcome, Solver};
use std::collections::{HashSet, VecDeque};

/// Shortest move count by breadth-first search, `None` if the goal is unreachable.
fn reference_distance(start: &Board) -> Option<usize> {
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    seen.insert(start.key().to_vec());
    queue.push_back((start.clone(), 0));

    while let Some((board, depth)) = queue.pop_front() {
        if board.is_solved() {
            return Some(depth);
        }
        for mv in board.legal_moves() {
            let next = board.apply(mv);
            if seen.insert(next.key().to_vec()) {
                queue.push_back((next, depth + 1));
            }
        }
    }
    None
}

fn replay(start: &Board, outcome: &SolveOutcome) -> Board {
    outcome
        .moves()
        .expect("expected a solution")
        .iter()
        .fold(start.clone(), |board, &mv| board.apply(mv))
}

fn walked(rows: usize, cols: usize, steps: usize, seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    Board::scrambled(rows, cols, steps, &mut rng).unwrap()
}

#[test]
fn regression_fixture_two_moves_from_goal() {
    let start = Board::new(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 5, 8]]).unwrap();
    let outcome = slide_solver::solve(start.to_rows()).unwrap();

    assert_eq!(reference_distance(&start), Some(2));
    assert_eq!(outcome.moves().map(<[_]>::len), Some(2));
    assert_eq!(
        replay(&start, &outcome).to_rows(),
        vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 0]]
    );
}

#[test]
fn invalid_boards_never_reach_the_search() {
    assert_eq!(
        slide_solver::solve(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 0, 8]]),
        Err(BoardError::MultipleBlanks { count: 2 })
    );
    assert!(matches!(
        slide_solver::solve(vec![vec![1, 2, 3], vec![4, 0, 6], vec![7, 8, 8]]),
        Err(BoardError::DuplicateLabel { label: 8 })
    ));
}

#[test]
fn unsolvable_three_by_three_ends_without_a_solution() {
    let start = Board::new(vec![vec![2, 1, 3], vec![4, 5, 6], vec![7, 8, 0]]).unwrap();
    let outcome = Solver::default().solve(&start);

    assert_eq!(reference_distance(&start), None);
    match outcome {
        SolveOutcome::NoSolution { stats } => assert_eq!(stats.expanded, 181_440),
        other => panic!("expected no solution, got {other}"),
    }
}

#[test]
fn four_by_four_walk_is_solved_optimally() {
    // A short walk keeps the BFS tractable.
    let start = walked(4, 4, 14, 99);
    let outcome = Solver::default().solve(&start);

    assert_eq!(
        outcome.moves().map(<[_]>::len),
        reference_distance(&start)
    );
    assert!(replay(&start, &outcome).is_solved());
}

#[test]
fn rectangular_walks_are_solved_optimally() {
    for (rows, cols) in [(2, 4), (4, 2), (3, 4), (4, 3), (2, 5)] {
        for seed in 0..15 {
            let start = walked(rows, cols, 18, seed);
            let outcome = Solver::default().solve(&start);

            assert_eq!(
                outcome.moves().map(<[_]>::len),
                reference_distance(&start),
                "{}x{} seed {}",
                rows,
                cols,
                seed
            );
            assert!(replay(&start, &outcome).is_solved());
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn astar_matches_breadth_first_search(
        rows in 2usize..=4,
        cols in 2usize..=4,
        steps in 0usize..=20,
        seed in any::<u64>(),
    ) {
        let start = walked(rows, cols, steps, seed);
        let outcome = Solver::default().solve(&start);

        prop_assert_eq!(outcome.moves().map(<[_]>::len), reference_distance(&start));
        prop_assert!(replay(&start, &outcome).is_solved());
    }

    #[test]
    fn legal_moves_stay_on_the_board(
        rows in 2usize..=7,
        cols in 2usize..=8,
        steps in 0usize..200,
        seed in any::<u64>(),
    ) {
        let board = walked(rows, cols, steps, seed);
        let moves: Vec<_> = board.legal_moves().collect();

        prop_assert!((2..=4).contains(&moves.len()));
        for mv in moves {
            prop_assert!(mv.to.row < rows && mv.to.col < cols);
            let blank = board.blank();
            prop_assert_eq!(blank.row.abs_diff(mv.to.row) + blank.col.abs_diff(mv.to.col), 1);
            prop_assert_eq!(board.apply(mv).blank(), mv.to);
        }
    }

    #[test]
    fn heuristic_is_zero_only_on_the_goal(
        rows in 2usize..=5,
        cols in 2usize..=5,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::shuffled(rows, cols, &mut rng).unwrap();
        let goal = Board::goal(rows, cols).unwrap();

        prop_assert_eq!(board.heuristic() == 0, board == goal);
        prop_assert_eq!(goal.heuristic(), 0);
        prop_assert_eq!(goal.blank(), Position::new(rows - 1, cols - 1));
    }
}
