use criterion::{black_box, criterion_group, criterion_main, Criterion};
use xiangqi_core::fen::{parse_fen, START_POSITION};
use xiangqi_core::game::is_checkmate;
use xiangqi_core::movegen::generate_all_moves;
use xiangqi_core::types::Color;

const MIDDLEGAME: &str = "r1bakab1r/9/1cn4c1/p1p1p1p1p/9/6P2/P1P1P3P/1C2C1N2/9/RNBAKAB1R b";

fn movegen_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("movegen");
    group.sample_size(100);

    let opening = parse_fen(START_POSITION).expect("parse");
    group.bench_function("opening_all_moves", |b| {
        b.iter(|| generate_all_moves(black_box(&opening.board), Color::Red))
    });

    let middlegame = parse_fen(MIDDLEGAME).expect("parse");
    group.bench_function("middlegame_all_moves", |b| {
        b.iter(|| generate_all_moves(black_box(&middlegame.board), middlegame.turn))
    });

    group.bench_function("opening_checkmate_probe", |b| {
        b.iter(|| is_checkmate(black_box(&opening.board), Color::Black))
    });

    group.finish();
}

criterion_group!(benches, movegen_benchmarks);
criterion_main!(benches);
