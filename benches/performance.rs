//! Performance benchmarks for replay and graph queries.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use social_graph::{Address, GraphIndex, ListOp, ListRecord, OperationEntry, OwnershipEntry};

fn address(n: u32) -> Address {
    let mut bytes = [0u8; 20];
    bytes[16..].copy_from_slice(&n.to_be_bytes());
    Address(bytes)
}

/// `lists` owners, each following `per_list` distinct accounts with every fifth one tagged.
///
/// `7 * j` is distinct modulo `2 * lists` while `per_list <= 2 * lists`.
fn build_log(lists: u32, per_list: u32) -> (Vec<OwnershipEntry>, Vec<OperationEntry>) {
    let ownership: Vec<_> = (0..lists)
        .map(|i| OwnershipEntry::new(u64::from(i), address(i)))
        .collect();

    let mut ops = Vec::new();
    for slot in 0..lists {
        for j in 0..per_list {
            let target = ListRecord::address(address((slot * 31 + j * 7) % (lists * 2)));
            ops.push(OperationEntry::new(
                slot as usize,
                ListOp::Add(target.clone()).encode(),
            ));
            if j % 5 == 0 {
                let tag = if j % 10 == 0 { "block" } else { "top8" };
                ops.push(OperationEntry::new(
                    slot as usize,
                    ListOp::Tag(target, tag.to_string()).encode(),
                ));
            }
        }
    }
    (ownership, ops)
}

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");

    for lists in [10u32, 100, 500] {
        let (ownership, ops) = build_log(lists, 20);
        group.bench_with_input(BenchmarkId::new("lists", lists), &lists, |b, _| {
            b.iter(|| {
                let index = GraphIndex::default();
                black_box(index.rebuild(&ownership, &ops).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let (ownership, ops) = build_log(500, 20);
    let index = GraphIndex::default();
    index.rebuild(&ownership, &ops).unwrap();

    c.bench_function("followers", |b| {
        b.iter(|| black_box(index.get_followers(&address(42))));
    });

    c.bench_function("leaderboard_followers", |b| {
        b.iter(|| black_box(index.get_leaderboard_followers(10)));
    });

    c.bench_function("leaderboard_following", |b| {
        b.iter(|| black_box(index.get_leaderboard_following(10)));
    });
}

criterion_group!(benches, bench_replay, bench_queries);
criterion_main!(benches);
