use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sokoban_astar::config::{HeuristicKind, Limits};
use sokoban_astar::{LoadLevel, Solve};

// allowing unused so i can bench just one or few
// and still notice other warnings if there are any
#[allow(unused)]
fn bench_two_boxes(c: &mut Criterion) {
    bench_level(c, HeuristicKind::Greedy, "levels/custom/04-two-boxes.txt", 100);
    bench_level(c, HeuristicKind::Nearest, "levels/custom/04-two-boxes.txt", 100);
    bench_level(c, HeuristicKind::Misplaced, "levels/custom/04-two-boxes.txt", 100);
}

#[allow(unused)]
fn bench_corridor(c: &mut Criterion) {
    bench_level(c, HeuristicKind::Nearest, "levels/custom/03-corridor.txt", 100);
}

#[allow(unused)]
fn bench_state_limit(c: &mut Criterion) {
    // nothing to find, measures raw expansion speed
    bench_level(c, HeuristicKind::Nearest, "levels/custom/sealed-room.txt", 20);
}

fn bench_level(c: &mut Criterion, heuristic: HeuristicKind, level_path: &str, samples: usize) {
    let level = level_path.load_level().unwrap();

    let mut group = c.benchmark_group(heuristic.to_string());
    group.sample_size(samples);
    group.bench_function(level_path, |b| {
        b.iter(|| {
            black_box(
                level
                    .solve(black_box(heuristic), black_box(Limits::default()))
                    .unwrap(),
            )
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_two_boxes,
    bench_corridor,
    //bench_state_limit,
);
criterion_main!(benches);
