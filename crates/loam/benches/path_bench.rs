use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::IVec2;
use loam::{find_path, Board};

fn bench_open_board(c: &mut Criterion) {
    // Worst-case corner-to-corner route with nothing in the way.
    let board: Board<u32> = Board::new(64, 64);
    let goal = IVec2::new(63, 63);

    c.bench_function("find_path_open_64x64", |b| {
        b.iter(|| find_path(&board, black_box(IVec2::ZERO), black_box(goal), 2))
    });
}

fn bench_serpentine(c: &mut Criterion) {
    // Alternating wall rows force the route to snake across the board.
    let mut board: Board<u32> = Board::new(64, 64);
    let mut handle = 0u32;
    for y in (1..63).step_by(2) {
        let gap = if (y / 2) % 2 == 0 { 63 } else { 0 };
        for x in 0..64 {
            if x == gap {
                continue;
            }
            board.place(handle, 1, IVec2::new(x, y)).unwrap();
            handle += 1;
        }
    }
    let goal = IVec2::new(63, 63);

    c.bench_function("find_path_serpentine_64x64", |b| {
        b.iter(|| find_path(&board, black_box(IVec2::ZERO), black_box(goal), 2))
    });
}

fn bench_unreachable(c: &mut Criterion) {
    // Sealed goal: the search must drain the whole frontier.
    let mut board: Board<u32> = Board::new(64, 64);
    let center = IVec2::new(32, 32);
    for (i, step) in [
        IVec2::new(1, 0),
        IVec2::new(-1, 0),
        IVec2::new(0, 1),
        IVec2::new(0, -1),
    ]
    .into_iter()
    .enumerate()
    {
        board.place(i as u32, 1, center + step).unwrap();
    }

    c.bench_function("find_path_unreachable_64x64", |b| {
        b.iter(|| find_path(&board, black_box(IVec2::ZERO), black_box(center), 2))
    });
}

criterion_group!(benches, bench_open_board, bench_serpentine, bench_unreachable);
criterion_main!(benches);
