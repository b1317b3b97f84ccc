use criterion::{black_box, criterion_group, criterion_main, Criterion};
use kitchen_core::Cell;
use kitchen_nav::{NavGrid, Occupants};

fn comb(width: u32, height: u32) -> NavGrid {
    let mut grid = NavGrid::new(width, height);
    // Alternating walls with gaps at opposite ends to force long detours.
    for x in (2..width as i32 - 1).step_by(2) {
        let gap = if (x / 2) % 2 == 0 { 0 } else { height as i32 - 1 };
        for y in 0..height as i32 {
            if y != gap {
                grid.set_blocked(Cell::new(x, y), true);
            }
        }
    }
    grid
}

fn bench_grid(c: &mut Criterion) {
    let grid = comb(64, 64);
    let start = Cell::new(0, 0);
    let goal = Cell::new(63, 63);

    let mut group = c.benchmark_group("kitchen-nav/grid");

    group.bench_function("shortest_path", |b| {
        b.iter(|| {
            let path = grid.shortest_path(start, goal);
            black_box(path.len());
        })
    });

    group.bench_function("reachable", |b| {
        b.iter(|| {
            let reach = grid.reachable(start, Occupants::Block);
            black_box(reach.distance(goal));
        })
    });

    group.finish();
}

criterion_group!(benches, bench_grid);
criterion_main!(benches);
