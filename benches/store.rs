// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gasearch::model::ImageId;
use gasearch::store::{FieldUpdate, FileStore, MemoryStore, SessionStore, WriteDurability};

mod fixtures;
mod profiler;

use fixtures::TempDir;

const ACTIVITY_CLICKS: usize = 40;

fn fill_activity(store: &mut SessionStore) {
    for idx in 0..ACTIVITY_CLICKS {
        store
            .append_activity("coral reef", ImageId::new(idx * 13))
            .expect("append_activity");
    }
}

// Benchmark identity (keep stable):
// - Group name in this file: `store.session`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `memory_save`, `file_save_durable`).
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.session");

    group.bench_function("memory_save", |b| {
        let mut store = SessionStore::new(MemoryStore::new());
        b.iter(|| {
            store
                .save(
                    black_box(3),
                    black_box(7),
                    FieldUpdate::value("fish, coral reef, diver"),
                    FieldUpdate::Keep,
                )
                .expect("save")
        })
    });

    group.bench_function("memory_load_with_activity", |b| {
        let mut store = SessionStore::new(MemoryStore::new());
        fill_activity(&mut store);
        b.iter(|| black_box(store.load()))
    });

    for (name, durability) in [
        ("file_save", WriteDurability::BestEffort),
        ("file_save_durable", WriteDurability::Durable),
    ] {
        group.bench_function(name, |b| {
            b.iter_batched_ref(
                || TempDir::new(name),
                |tmp| {
                    let file_store = FileStore::new(tmp.path()).with_durability(durability);
                    let path = file_store.path();
                    let mut store = SessionStore::new(file_store);
                    store
                        .save(1, 2, FieldUpdate::value("shark"), FieldUpdate::Clear)
                        .expect("save");
                    black_box(std::fs::metadata(path).expect("store metadata").len())
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.bench_function("file_load_with_activity", |b| {
        let tmp = TempDir::new("file_load");
        let mut store = SessionStore::new(FileStore::new(tmp.path()));
        fill_activity(&mut store);
        b.iter(|| black_box(store.load()))
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_store
}
criterion_main!(benches);
