//! # `csp-solver`
//!
//! A command-line Sudoku solver built on constraint satisfaction. Puzzles
//! arrive as 81-character strings (row-major, `'0'` for blanks), are run
//! through arc-consistency propagation and, where that is not enough,
//! backtracking search with forward checking. Each solved puzzle is written
//! to the output file as its 81 digits followed by the stage that cracked
//! it (`AC3` or `BTS`).
//!
//! ## Usage
//!
//! ```sh
//! # Solve a single puzzle
//! csp-solver 003020600900305001001806400008102900700000008006708200002609500800203009005010300
//!
//! # Solve every puzzle in a file, one 81-character line each
//! csp-solver file --path puzzles.txt --output solved.txt
//!
//! # Generate shell completions
//! csp-solver completions bash
//! ```
//!
//! Options shared by both solve forms: `--debug` raises the log level,
//! `--stats` prints a statistics table (on by default), `--print-solution`
//! echoes the solved grid, `--selection` picks the search's
//! variable-ordering heuristic.

use clap::{Args, CommandFactory, Parser, Subcommand};
use csp_solver::csp::board::Board;
use csp_solver::csp::solver::{CspSolver, Solution, SolveStats, Solver, Stage};
use csp_solver::csp::variable_selection::{FirstUnassigned, Mrv, SelectionStrategy};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tikv_jemalloc_ctl::{epoch, stats};

/// Global allocator, kept for performance and so the stats table can report
/// allocated/resident memory.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "csp-solver", version, about = "A constraint-satisfaction Sudoku solver")]
struct Cli {
    /// An optional puzzle argument: 81 characters, row-major, '0' for
    /// blank cells. Used when no subcommand is given.
    puzzle: Option<String>,

    /// Specifies the subcommand to execute (e.g. `file`, `completions`).
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve every puzzle in a file, one 81-character string per line.
    /// Blank lines and lines starting with '#' are skipped.
    File {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across the solve forms.
#[derive(Args, Debug, Clone)]
struct CommonOptions {
    /// Enable debug logging during the solving process.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Enable printing of solve statistics.
    #[arg(short, long, default_value_t = true)]
    stats: bool,

    /// Print the solved grid to stdout.
    #[arg(short, long, default_value_t = false)]
    print_solution: bool,

    /// File the solution lines are written to.
    #[arg(short, long, default_value = "output.txt")]
    output: PathBuf,

    /// Variable-ordering heuristic used by the search engine.
    #[arg(long, value_enum, default_value_t = SelectionStrategy::Mrv)]
    selection: SelectionStrategy,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "csp-solver",
                &mut std::io::stdout(),
            );
        }
        Some(Commands::File { path, common }) => {
            init_logging(common.debug);
            run_file(&path, &common);
        }
        None => {
            let Some(puzzle) = cli.puzzle else {
                eprintln!("No puzzle provided. Use --help for more information.");
                std::process::exit(1);
            };
            init_logging(cli.common.debug);
            run_single(&puzzle, &cli.common);
        }
    }
}

fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Solves one puzzle string, writes the solution line and reports.
/// Exits nonzero on malformed input, I/O failure or an unsolvable puzzle.
fn run_single(input: &str, common: &CommonOptions) {
    let board = match input.trim().parse::<Board>() {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Error parsing puzzle: {e}");
            std::process::exit(1);
        }
    };

    let (solution, elapsed, solve_stats) = solve_board(board, common.selection);

    match solution {
        Some(solution) => {
            let line = format!("{} {}", solution.board, solution.stage);
            write_output(&common.output, &format!("{line}\n"));

            if common.print_solution {
                println!("{}", solution.board.to_grid_string());
            }
            if common.stats {
                print_stats(&board, elapsed, &solve_stats, Some(solution.stage));
            }
            println!("SOLVED ({})", solution.stage);
        }
        None => {
            if common.stats {
                print_stats(&board, elapsed, &solve_stats, None);
            }
            println!("UNSOLVABLE");
            std::process::exit(1);
        }
    }
}

/// Solves every puzzle line in `path`, writing one solution line per solved
/// puzzle. Exits nonzero if any line was malformed or unsolvable.
fn run_file(path: &Path, common: &CommonOptions) {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Unable to read {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    let mut solved_lines = Vec::new();
    let mut failures = 0usize;

    for (number, line) in contents.lines().enumerate() {
        if !is_puzzle_line(line) {
            continue;
        }

        match line.trim().parse::<Board>() {
            Ok(board) => {
                let (solution, elapsed, solve_stats) = solve_board(board, common.selection);
                match solution {
                    Some(solution) => {
                        solved_lines.push(format!("{} {}", solution.board, solution.stage));
                        if common.print_solution {
                            println!("{}", solution.board.to_grid_string());
                        }
                        if common.stats {
                            print_stats(&board, elapsed, &solve_stats, Some(solution.stage));
                        }
                    }
                    None => {
                        eprintln!("line {}: puzzle has no solution", number + 1);
                        failures += 1;
                    }
                }
            }
            Err(e) => {
                eprintln!("line {}: {e}", number + 1);
                failures += 1;
            }
        }
    }

    let mut out = solved_lines.join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    write_output(&common.output, &out);

    println!("{} solved, {} failed", solved_lines.len(), failures);
    if failures > 0 {
        std::process::exit(1);
    }
}

/// A line counts as a puzzle unless it is blank or a '#' comment.
fn is_puzzle_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Runs the two-stage solver with the requested variable ordering.
fn solve_board(
    board: Board,
    selection: SelectionStrategy,
) -> (Option<Solution>, Duration, SolveStats) {
    let time = std::time::Instant::now();

    let (solution, solve_stats) = match selection {
        SelectionStrategy::Mrv => {
            let mut solver = CspSolver::<Mrv>::new(board);
            (solver.solve(), solver.stats())
        }
        SelectionStrategy::FirstUnassigned => {
            let mut solver = CspSolver::<FirstUnassigned>::new(board);
            (solver.solve(), solver.stats())
        }
    };

    (solution, time.elapsed(), solve_stats)
}

fn write_output(path: &Path, contents: &str) {
    if let Err(e) = std::fs::write(path, contents) {
        eprintln!("Unable to write {}: {e}", path.display());
        std::process::exit(1);
    }
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {:<28} {:>18}  |", label, value);
}

/// Prints a summary of problem and search statistics, including memory
/// figures read from jemalloc.
fn print_stats(board: &Board, elapsed: Duration, s: &SolveStats, stage: Option<Stage>) {
    // Advance the epoch so the allocator figures reflect the solve.
    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    println!("\n=======================[ Solve Statistics ]==========================");
    stat_line("Givens", board.assigned_count());
    stat_line(
        "Stage",
        stage.map_or_else(|| "-".to_string(), |tag| tag.to_string()),
    );
    stat_line("Arc revisions", s.revisions);
    stat_line("Decisions", s.decisions);
    stat_line("Inferred assignments", s.inferences);
    stat_line("Backtracks", s.backtracks);
    stat_line("Memory usage (MiB)", format!("{allocated_mib:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident_mib:.2}"));
    stat_line("CPU time (s)", format!("{:.3}", elapsed.as_secs_f64()));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_puzzle_line_filter_skips_blanks_and_comments() {
        assert!(!is_puzzle_line(""));
        assert!(!is_puzzle_line("   "));
        assert!(!is_puzzle_line("# a comment"));
        assert!(!is_puzzle_line("  # indented comment"));
        assert!(is_puzzle_line(&"0".repeat(81)));
    }

    #[test]
    fn test_solve_board_tags_stage() {
        let easy: Board =
            "023456789456709123789123450231564897564897231897231564312645978645978312978312645"
                .parse()
                .expect("board should parse");
        let (solution, _, _) = solve_board(easy, SelectionStrategy::Mrv);
        assert_eq!(solution.expect("solvable").stage, Stage::Ac3);

        let empty: Board = "0".repeat(81).parse().expect("board should parse");
        let (solution, _, _) = solve_board(empty, SelectionStrategy::Mrv);
        assert_eq!(solution.expect("solvable").stage, Stage::Bts);
    }
}
