// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo corpus used by `--demo`, tests, and benchmarks.

use super::dataset::{ClassCatalog, ClassInfo, Dataset, ImageRecord};
use super::ids::{ClassId, ImageId};

const DEMO_CLASSES: &[(&str, f64)] = &[
    ("water", 61.0),
    ("fish", 34.5),
    ("coral reef", 21.2),
    ("diver", 12.8),
    ("sand", 9.4),
    ("turtle", 4.1),
    ("shark", 2.6),
    ("jellyfish", 1.9),
    ("octopus", 0.8),
    ("shipwreck", 0.3),
    ("seahorse", 0.1),
    ("boat", 6.7),
];

const LABELS_PER_IMAGE: usize = 6;

pub fn demo_catalog() -> ClassCatalog {
    ClassCatalog::new(
        DEMO_CLASSES
            .iter()
            .map(|(name, frequency_percent)| ClassInfo {
                name: (*name).into(),
                frequency_percent: *frequency_percent,
            })
            .collect(),
    )
}

/// Deterministic corpus of `size` images; consecutive ids share most labels, like frames of
/// one video.
pub fn demo_dataset(size: usize) -> Dataset {
    let catalog = demo_catalog();
    let class_count = catalog.len() as u64;
    let records = (0..size).map(|idx| {
        let scene = (idx / 7) as u64;
        let mut state = scene.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let mut labels = Vec::with_capacity(LABELS_PER_IMAGE);
        while labels.len() < LABELS_PER_IMAGE {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let class_id = ClassId::new(((state >> 33) % class_count) as u32);
            if !labels.contains(&class_id) {
                labels.push(class_id);
            }
        }
        ImageRecord::new(ImageId::new(idx), labels)
    });
    Dataset::new(catalog, records)
}

/// Evenly spread target ids for the demo experiment.
pub fn demo_targets(dataset_size: usize, count: usize) -> Vec<ImageId> {
    if dataset_size == 0 || count == 0 {
        return Vec::new();
    }
    let stride = (dataset_size / count).max(1);
    (0..count)
        .map(|idx| ImageId::new((idx * stride + stride / 2).min(dataset_size - 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{demo_dataset, demo_targets};
    use crate::model::ImageId;

    #[test]
    fn demo_dataset_is_deterministic_with_distinct_labels() {
        let first = demo_dataset(30);
        let second = demo_dataset(30);
        assert_eq!(first, second);
        assert_eq!(first.len(), 30);

        for record in first.records() {
            let mut labels = record.labels.to_vec();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), record.labels.len());
        }
    }

    #[test]
    fn demo_targets_stay_in_range() {
        let targets = demo_targets(10, 4);
        assert_eq!(targets.len(), 4);
        assert!(targets.iter().all(|id| id.get() < 10));
        assert_eq!(demo_targets(0, 3), Vec::<ImageId>::new());
    }
}
