//! Criterion benchmarks measure time of the clearly separated pieces of code:
//! legal move recomputation and draw detection over a long history.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use decachess::chess::core::Square;
use decachess::chess::position::Position;

const OPENING: [(&str, &str); 12] = [
    ("e2", "e4"),
    ("e9", "e7"),
    ("g1", "f3"),
    ("g10", "f8"),
    ("i1", "h3"),
    ("i10", "h8"),
    ("g2", "g3"),
    ("g9", "g8"),
    ("h1", "g2"),
    ("h10", "g9"),
    ("f1", "h1"),
    ("f10", "h10"),
];

fn square(text: &str) -> Square {
    Square::try_from(text).expect("valid square")
}

fn play_opening() -> Position {
    let mut position = Position::starting();
    for (from, to) in OPENING {
        let _ = position
            .make_move(square(from), square(to))
            .expect("legal move");
    }
    position
}

fn movegen_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("Move generation");
    for (name, placement) in [
        ("starting", "startpos"),
        ("compound pieces", "k9/10/10/3M6/10/4A5/5C4/10/10/9K"),
        ("castling", "r4k3r/10/10/10/10/10/10/10/10/R4K3R"),
    ] {
        let _ = group.bench_with_input(BenchmarkId::new("parse and update", name), placement, |b, placement| {
            b.iter(|| black_box(Position::try_from(placement).expect("valid placement")));
        });
    }
    let _ = group.bench_function("opening", |b| b.iter(|| black_box(play_opening())));
    group.finish();
}

fn draw_bench(c: &mut Criterion) {
    let mut position = play_opening();
    for _ in 0..10 {
        for (from, to) in [("b1", "c3"), ("b10", "c8"), ("c3", "b1"), ("c8", "b10")] {
            let _ = position
                .make_move(square(from), square(to))
                .expect("legal move");
        }
    }
    let _ = c.bench_function("draw detection", |b| b.iter(|| black_box(position.is_draw())));
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(10);
    targets = movegen_bench, draw_bench
}

criterion_main!(movegen);
