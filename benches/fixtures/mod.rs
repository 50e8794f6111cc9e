// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

#![allow(dead_code)]

// Shared deterministic benchmark fixtures (no RNG).

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use gasearch::config::Config;
use gasearch::model::fixtures::demo_dataset;
use gasearch::model::{Dataset, ImageId};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    pub fn new(prefix: &str) -> Self {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);

        let mut path = std::env::temp_dir();
        path.push(format!("gasearch_bench_{prefix}_{pid}_{nanos}_{counter}"));
        std::fs::create_dir_all(&path).expect("create temp dir");

        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Case {
    /// 12x5 grid over a small corpus.
    Small,
    /// Production-sized page over a corpus the size of the sea photo set.
    Full,
}

pub fn config(case: Case) -> Config {
    match case {
        Case::Small => Config {
            lines: 12,
            dataset_size: 2_000,
            ..Config::default()
        },
        Case::Full => Config::default(),
    }
}

pub fn dataset(case: Case) -> Dataset {
    demo_dataset(config(case).dataset_size)
}

/// Ids of one result page, spread over the whole corpus.
pub fn results(case: Case) -> Vec<ImageId> {
    let config = config(case);
    let capacity = config.page_capacity();
    let stride = (config.dataset_size / capacity).max(1);
    (0..capacity)
        .map(|idx| ImageId::new((idx * stride) % config.dataset_size))
        .collect()
}
