// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use gasearch::controller::{Action, Controller, Notice, SelectTarget, UserPrompt};
use gasearch::i18n::Messages;
use gasearch::model::{top_classes, SessionState, TOP_CLASSES_LIMIT, TOP_CLASSES_MIN_COUNT};
use gasearch::pages::Page;
use gasearch::store::{MemoryStore, SessionStore};
use gasearch::view::{build_page, PageView};

mod fixtures;
mod profiler;

use fixtures::Case;

struct AcceptAll;

impl UserPrompt for AcceptAll {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }

    fn notify(&mut self, _notice: Notice) {}
}

// Benchmark identity (keep stable):
// - Group names in this file: `page.build`, `page.interaction`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time.
fn benches_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("page.build");

    for (name, case) in [("small", Case::Small), ("full", Case::Full)] {
        let config = fixtures::config(case);
        let dataset = fixtures::dataset(case);
        let results = fixtures::results(case);
        let messages = Messages::default();
        let session = SessionState::new(0, 3);

        group.bench_function(format!("top_classes_{name}"), |b| {
            b.iter(|| {
                black_box(top_classes(
                    black_box(&dataset),
                    black_box(&results),
                    TOP_CLASSES_LIMIT,
                    TOP_CLASSES_MIN_COUNT,
                ))
            })
        });

        let page = Page::Results {
            top_classes: top_classes(&dataset, &results, TOP_CLASSES_LIMIT, TOP_CLASSES_MIN_COUNT),
            target: results[results.len() / 2],
            results: results.clone(),
        };
        group.bench_function(format!("view_{name}"), |b| {
            b.iter(|| {
                let view = build_page(
                    black_box(&dataset),
                    black_box(&page),
                    &session,
                    &config,
                    &messages,
                );
                match view {
                    PageView::Results(view) => black_box(view.cells().count()),
                    PageView::Finished { .. } => unreachable!("results page"),
                }
            })
        });
    }

    group.finish();
}

fn benches_interaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("page.interaction");

    let config = fixtures::config(Case::Small);
    let dataset = fixtures::dataset(Case::Small);
    let results = fixtures::results(Case::Small);
    let target = results[7];

    group.bench_function("label_clicks_then_search", |b| {
        b.iter_batched(
            || SessionStore::new(MemoryStore::new()),
            |store| {
                let session = store.load();
                let messages = Messages::default();
                let mut controller =
                    Controller::new(config.clone(), messages, store, session, Some(target));
                let mut prompt = AcceptAll;
                for &id in results.iter().take(20) {
                    if let Some(&class_id) = dataset.labels(id).first() {
                        let text = dataset.classes().name(class_id).unwrap_or_default().to_owned();
                        let action = Action::AddLabelText {
                            text,
                            source: Some(id),
                        };
                        controller.handle(action, &mut prompt);
                    }
                }
                controller.handle(Action::Select(SelectTarget::Grid(target)), &mut prompt);
                controller.handle(Action::Select(SelectTarget::Grid(target)), &mut prompt);
                black_box(controller.handle(Action::SubmitTextQuery, &mut prompt))
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group! {
    name = benches;
    config = profiler::criterion();
    targets = benches_build, benches_interaction
}
criterion_main!(benches);
