use criterion::{criterion_group, criterion_main, Criterion};
use csp_solver::csp::board::Board;
use csp_solver::csp::solver::{CspSolver, Solver};
use csp_solver::csp::variable_selection::{FirstUnassigned, Mrv};
use std::hint::black_box;

const EASY: &str =
    "023456789456709123789123450231564897564897231897231564312645978645978312978312645";

const HARD: &str =
    "100007090030020008009600500005300900010080002600004000300000010040000007007000300";

const EMPTY: &str =
    "000000000000000000000000000000000000000000000000000000000000000000000000000000000";

fn board(s: &str) -> Board {
    s.parse().expect("benchmark board should parse")
}

fn bench_ac3_only(c: &mut Criterion) {
    let easy = board(EASY);
    c.bench_function("solve_easy_ac3", |b| {
        b.iter(|| {
            let mut solver = CspSolver::<Mrv>::new(black_box(easy));
            black_box(solver.solve())
        });
    });
}

fn bench_backtracking(c: &mut Criterion) {
    let hard = board(HARD);
    c.bench_function("solve_hard_bts", |b| {
        b.iter(|| {
            let mut solver = CspSolver::<Mrv>::new(black_box(hard));
            black_box(solver.solve())
        });
    });
}

fn bench_empty_board(c: &mut Criterion) {
    let empty = board(EMPTY);
    c.bench_function("solve_empty_bts", |b| {
        b.iter(|| {
            let mut solver = CspSolver::<Mrv>::new(black_box(empty));
            black_box(solver.solve())
        });
    });
}

fn bench_selection_strategies(c: &mut Criterion) {
    let empty = board(EMPTY);
    let mut group = c.benchmark_group("variable_selection");
    group.bench_function("mrv", |b| {
        b.iter(|| {
            let mut solver = CspSolver::<Mrv>::new(black_box(empty));
            black_box(solver.solve())
        });
    });
    group.bench_function("first_unassigned", |b| {
        b.iter(|| {
            let mut solver = CspSolver::<FirstUnassigned>::new(black_box(empty));
            black_box(solver.solve())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_ac3_only,
    bench_backtracking,
    bench_empty_board,
    bench_selection_strategies
);
criterion_main!(benches);
