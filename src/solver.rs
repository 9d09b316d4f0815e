use log::{debug, trace};
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::config::SolverConfig;
use crate::puzzle::{self, Board, Move, Position};

/// Index into the search arena. Nodes are appended in discovery order, so a
/// smaller id also means "discovered earlier".
type NodeId = usize;

const TRACE_EVERY: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    ExpansionLimit(usize),
    TimeLimit(Duration),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::ExpansionLimit(limit) => write!(f, "expansion limit of {} reached", limit),
            AbortReason::TimeLimit(limit) => write!(f, "time limit of {:?} reached", limit),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes moved from the frontier to the closed set.
    pub expanded: usize,
    /// Successor boards built during expansion, kept or not.
    pub generated: usize,
    /// Frontier nodes whose cost was lowered by a cheaper path.
    pub improved: usize,
    pub peak_frontier: usize,
    pub elapsed: Duration,
}

/// How a solve call ended. Only an invalid board is an error; everything
/// the search itself can report lives here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved { moves: Vec<Move>, stats: SearchStats },
    /// The frontier ran dry, or the parity test ruled the board out.
    NoSolution { stats: SearchStats },
    /// A budget ran out first. Says nothing about solvability.
    Aborted { reason: AbortReason, stats: SearchStats },
}

impl SolveOutcome {
    pub fn moves(&self) -> Option<&[Move]> {
        match self {
            SolveOutcome::Solved { moves, .. } => Some(moves),
            _ => None,
        }
    }

    pub fn stats(&self) -> &SearchStats {
        match self {
            SolveOutcome::Solved { stats, .. }
            | SolveOutcome::NoSolution { stats }
            | SolveOutcome::Aborted { stats, .. } => stats,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }
}

impl fmt::Display for SolveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveOutcome::Solved { moves, .. } => write!(f, "solved in {} moves", moves.len()),
            SolveOutcome::NoSolution { .. } => write!(f, "no solution"),
            SolveOutcome::Aborted { reason, .. } => write!(f, "aborted: {}", reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    Frontier,
    Expanded,
}

struct Node {
    cells: Rc<[u32]>,
    blank: Position,
    g: usize,
    h: usize,
    parent: Option<NodeId>,
    last_move: Option<Move>,
    state: NodeState,
}

impl Node {
    fn priority(&self) -> usize {
        self.g + self.h
    }
}

/// A* over board states with the Manhattan heuristic.
///
/// The solver holds no state between calls; every [`Solver::solve`] builds
/// its own arena and drops it on return.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn solve(&self, board: &Board) -> SolveOutcome {
        let started = Instant::now();
        debug!(
            "solving {}x{} board, initial heuristic {}",
            board.rows(),
            board.cols(),
            board.heuristic()
        );

        if self.config.parity_check && !board.is_solvable() {
            debug!("board fails the parity test, skipping search");
            return SolveOutcome::NoSolution {
                stats: SearchStats {
                    elapsed: started.elapsed(),
                    ..SearchStats::default()
                },
            };
        }

        let mut search = Search::new(board);
        let outcome = loop {
            let Some(current) = search.pop() else {
                break SolveOutcome::NoSolution {
                    stats: search.finish(started),
                };
            };

            if search.arena[current].h == 0 {
                let moves = reconstruct(&search.arena, current);
                break SolveOutcome::Solved {
                    moves,
                    stats: search.finish(started),
                };
            }

            if let Some(reason) = self.budget_exceeded(&search.stats, started) {
                break SolveOutcome::Aborted {
                    reason,
                    stats: search.finish(started),
                };
            }

            search.expand(current);
            if search.stats.expanded % TRACE_EVERY == 0 {
                trace!(
                    "expanded {} nodes, frontier {}, f = {}",
                    search.stats.expanded,
                    search.frontier,
                    search.arena[current].priority()
                );
            }
        };

        let stats = outcome.stats();
        debug!(
            "{} after expanding {} of {} generated nodes ({} improved, peak frontier {}) in {:?}",
            outcome,
            stats.expanded,
            stats.generated,
            stats.improved,
            stats.peak_frontier,
            stats.elapsed
        );
        outcome
    }

    fn budget_exceeded(&self, stats: &SearchStats, started: Instant) -> Option<AbortReason> {
        if let Some(limit) = self.config.max_expansions {
            if stats.expanded >= limit {
                return Some(AbortReason::ExpansionLimit(limit));
            }
        }
        if let Some(limit) = self.config.time_limit {
            if started.elapsed() >= limit {
                return Some(AbortReason::TimeLimit(limit));
            }
        }
        None
    }
}

/// Per-call search state: the node arena plus the two structures indexing
/// into it. `open` orders frontier nodes by `(f, id)`; `index` maps every
/// discovered layout to its node.
struct Search {
    rows: usize,
    cols: usize,
    arena: Vec<Node>,
    open: BinaryHeap<Reverse<(usize, NodeId)>>,
    index: FxHashMap<Rc<[u32]>, NodeId>,
    frontier: usize,
    scratch: Vec<u32>,
    stats: SearchStats,
}

impl Search {
    fn new(board: &Board) -> Self {
        let mut search = Self {
            rows: board.rows(),
            cols: board.cols(),
            arena: Vec::new(),
            open: BinaryHeap::new(),
            index: FxHashMap::default(),
            frontier: 0,
            scratch: Vec::with_capacity(board.key().len()),
            stats: SearchStats::default(),
        };
        let cells: Rc<[u32]> = Rc::from(board.key());
        search.insert(cells, board.blank(), 0, board.heuristic(), None, None);
        search
    }

    fn insert(
        &mut self,
        cells: Rc<[u32]>,
        blank: Position,
        g: usize,
        h: usize,
        parent: Option<NodeId>,
        last_move: Option<Move>,
    ) {
        let id = self.arena.len();
        self.index.insert(Rc::clone(&cells), id);
        self.arena.push(Node {
            cells,
            blank,
            g,
            h,
            parent,
            last_move,
            state: NodeState::Frontier,
        });
        self.open.push(Reverse((g + h, id)));
        self.frontier += 1;
        self.stats.peak_frontier = self.stats.peak_frontier.max(self.frontier);
    }

    /// Next frontier node by lowest f, earliest discovery first. Heap entries
    /// left behind by a cost revision or by expansion are skipped.
    fn pop(&mut self) -> Option<NodeId> {
        while let Some(Reverse((f, id))) = self.open.pop() {
            let node = &self.arena[id];
            if node.state == NodeState::Frontier && node.priority() == f {
                return Some(id);
            }
        }
        None
    }

    fn expand(&mut self, current: NodeId) {
        let node = &mut self.arena[current];
        node.state = NodeState::Expanded;
        let cells = Rc::clone(&node.cells);
        let blank = node.blank;
        let g = node.g + 1;
        let h = node.h;
        self.frontier -= 1;
        self.stats.expanded += 1;

        let from = blank.row * self.cols + blank.col;
        for mv in puzzle::moves_from(blank, self.rows, self.cols) {
            let to = mv.to.row * self.cols + mv.to.col;
            let label = cells[to];

            self.scratch.clear();
            self.scratch.extend_from_slice(&cells);
            self.scratch.swap(from, to);
            self.stats.generated += 1;

            if let Some(&existing) = self.index.get(self.scratch.as_slice()) {
                let node = &mut self.arena[existing];
                if node.state == NodeState::Expanded || node.g <= g {
                    continue;
                }
                node.g = g;
                node.parent = Some(current);
                node.last_move = Some(mv);
                let f = node.priority();
                // Keeps its id, so ties still favour the original discovery.
                self.open.push(Reverse((f, existing)));
                self.stats.improved += 1;
                continue;
            }

            let child_h = h + puzzle::tile_distance(label, from, self.cols)
                - puzzle::tile_distance(label, to, self.cols);
            debug_assert_eq!(child_h, puzzle::manhattan(&self.scratch, self.cols));

            let child: Rc<[u32]> = Rc::from(self.scratch.as_slice());
            self.insert(child, mv.to, g, child_h, Some(current), Some(mv));
        }
    }

    fn finish(&mut self, started: Instant) -> SearchStats {
        self.stats.elapsed = started.elapsed();
        self.stats
    }
}

/// Walks parent links back from `goal` and returns the moves in start to
/// goal order. The start node has no parent and yields an empty path.
fn reconstruct(arena: &[Node], goal: NodeId) -> Vec<Move> {
    let mut moves = Vec::new();
    let mut cursor = Some(goal);
    while let Some(id) = cursor {
        let node = &arena[id];
        moves.extend(node.last_move);
        cursor = node.parent;
    }
    moves.reverse();
    moves
}
