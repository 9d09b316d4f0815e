use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, Read};
use std::process::ExitCode;
use std::time::Duration;

use slide_solver::replay::{self, RawMode};
use slide_solver::{default_scramble_steps, Board, Level, SolveOutcome, Solver, SolverConfig};

#[derive(Parser, Debug)]
#[command(name = "slide-solver", version, about = "Solve sliding-tile puzzles with A*")]
struct Args {
    /// Board to solve. Rows are separated by `;` or newlines, cells by `,` or
    /// spaces, 0 is the blank. Pass `-` to read it from stdin. Omit to solve
    /// a scrambled board instead.
    #[arg(long)]
    board: Option<String>,

    /// Size preset for a scrambled board: 1 (3x3) up to 10 (7x8).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=10))]
    level: u8,

    /// Scrambled board height. Overrides --level together with --cols.
    #[arg(long, requires = "cols")]
    rows: Option<usize>,

    /// Scrambled board width.
    #[arg(long, requires = "rows")]
    cols: Option<usize>,

    /// RNG seed for scrambling. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Random moves used to scramble. Defaults to rows * cols * 20.
    #[arg(long)]
    scramble: Option<usize>,

    /// Give up after expanding this many nodes.
    #[arg(long, env = "SLIDE_MAX_EXPANSIONS")]
    max_expansions: Option<usize>,

    /// Give up after this many milliseconds of search.
    #[arg(long, env = "SLIDE_TIME_LIMIT_MS")]
    time_limit_ms: Option<u64>,

    /// Report parity-unsolvable boards without searching.
    #[arg(long)]
    parity_check: bool,

    /// Animate the solution, pausing this many ms between moves (q stops).
    #[arg(long, value_name = "ms")]
    replay_ms: Option<u64>,

    /// Only print the outcome line.
    #[arg(long, short)]
    quiet: bool,

    /// Log verbosity: -v info, -vv debug, -vvv trace. RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let board = match args.board.as_deref() {
        Some(text) => {
            let text = if text == "-" {
                let mut input = String::new();
                io::stdin()
                    .read_to_string(&mut input)
                    .context("reading board from stdin")?;
                input
            } else {
                text.to_owned()
            };
            parse_board(&text)?
        }
        None => scrambled_board(&args)?,
    };

    let mut config = SolverConfig::default().with_parity_check(args.parity_check);
    if let Some(limit) = args.max_expansions {
        config = config.with_max_expansions(limit);
    }
    if let Some(ms) = args.time_limit_ms {
        config = config.with_time_limit(Duration::from_millis(ms));
    }

    if !args.quiet {
        println!("Initial board:\n{}", board);
    }

    let outcome = Solver::new(config).solve(&board);
    let stats = outcome.stats();
    info!(
        "expanded {} nodes, generated {}, peak frontier {}, {:?}",
        stats.expanded, stats.generated, stats.peak_frontier, stats.elapsed
    );

    match &outcome {
        SolveOutcome::Solved { moves, .. } => {
            println!("Found solution with {} moves", moves.len());
            if args.quiet {
                return Ok(ExitCode::SUCCESS);
            }
            match args.replay_ms {
                Some(ms) => animate(&board, moves, Duration::from_millis(ms))?,
                None => print_steps(&board, moves),
            }
            Ok(ExitCode::SUCCESS)
        }
        SolveOutcome::NoSolution { .. } => {
            println!("No solution exists for this board");
            Ok(ExitCode::from(2))
        }
        SolveOutcome::Aborted { reason, .. } => {
            println!("Search aborted: {}", reason);
            Ok(ExitCode::from(3))
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn scrambled_board(args: &Args) -> Result<Board> {
    let (rows, cols) = match (args.rows, args.cols) {
        (Some(rows), Some(cols)) => (rows, cols),
        _ => {
            let level = Level::get(args.level)
                .with_context(|| format!("unknown level {}", args.level))?;
            (level.rows, level.cols)
        }
    };
    let steps = args
        .scramble
        .unwrap_or_else(|| default_scramble_steps(rows, cols));
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!("scrambling {}x{} board with {} random moves", rows, cols, steps);
    Board::scrambled(rows, cols, steps, &mut rng).context("building scrambled board")
}

fn parse_board(text: &str) -> Result<Board> {
    let mut grid = Vec::new();
    for (line_no, line) in text.split(|c: char| c == ';' || c == '\n').enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|cell| !cell.is_empty())
            .map(|cell| {
                cell.parse::<u32>()
                    .with_context(|| format!("row {}: `{}` is not a tile label", line_no + 1, cell))
            })
            .collect::<Result<Vec<_>>>()?;
        grid.push(row);
    }
    if grid.is_empty() {
        bail!("board is empty");
    }
    Board::new(grid).context("invalid board")
}

fn print_steps(start: &Board, moves: &[slide_solver::Move]) {
    let mut board = start.clone();
    for item in moves {
        board = board.apply(*item);
        println!("{}\n{}", item, board);
    }
}

fn animate(start: &Board, moves: &[slide_solver::Move], delay: Duration) -> Result<()> {
    let mut stdout = io::stdout();
    let result = {
        let _raw = RawMode::enable().context("switching terminal to raw mode")?;
        replay::play(&mut stdout, start, moves, delay, true, replay::wait_for_quit)
    };
    let ended = result.context("drawing replay")?;
    if ended.cancelled {
        println!(
            "Stopped after {} of {} moves:\n{}",
            ended.applied,
            moves.len(),
            ended.board
        );
    }
    Ok(())
}
