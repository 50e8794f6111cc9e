// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::{BTreeMap, HashMap};

use smallvec::SmallVec;
use smol_str::SmolStr;

use super::{ClassId, ImageId};

/// Labels attached to one image, most confident first.
pub type Labels = SmallVec<[ClassId; 8]>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub labels: Labels,
}

impl ImageRecord {
    pub fn new(id: ImageId, labels: impl IntoIterator<Item = ClassId>) -> Self {
        Self {
            id,
            labels: labels.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassInfo {
    pub name: SmolStr,
    /// Share of corpus images carrying this class, in percent.
    pub frequency_percent: f64,
}

/// Class names and frequencies, indexed by [`ClassId`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassCatalog {
    classes: Vec<ClassInfo>,
}

impl ClassCatalog {
    pub fn new(classes: Vec<ClassInfo>) -> Self {
        Self { classes }
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn get(&self, class_id: ClassId) -> Option<&ClassInfo> {
        self.classes.get(class_id.index())
    }

    pub fn name(&self, class_id: ClassId) -> Option<&str> {
        self.get(class_id).map(|info| info.name.as_str())
    }

    /// Frequency for coloring; unknown classes count as never seen.
    pub fn frequency(&self, class_id: ClassId) -> f64 {
        self.get(class_id).map_or(0.0, |info| info.frequency_percent)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &ClassInfo)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(idx, info)| (ClassId::new(idx as u32), info))
    }
}

/// The static corpus the experiment runs over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    classes: ClassCatalog,
    records: BTreeMap<ImageId, ImageRecord>,
}

impl Dataset {
    pub fn new(classes: ClassCatalog, records: impl IntoIterator<Item = ImageRecord>) -> Self {
        Self {
            classes,
            records: records.into_iter().map(|record| (record.id, record)).collect(),
        }
    }

    pub fn classes(&self) -> &ClassCatalog {
        &self.classes
    }

    pub fn record(&self, id: ImageId) -> Option<&ImageRecord> {
        self.records.get(&id)
    }

    pub fn records(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// One past the highest classified image id. Unclassified images below it still count.
    pub fn id_bound(&self) -> usize {
        self.records.last_key_value().map_or(0, |(id, _)| id.get() + 1)
    }

    /// Labels of `id`, empty when the image carries no classification.
    pub fn labels(&self, id: ImageId) -> &[ClassId] {
        self.records.get(&id).map_or(&[], |record| record.labels.as_slice())
    }
}

/// Default length of the top-classes row.
pub const TOP_CLASSES_LIMIT: usize = 5;
/// A class must occur more often than this on the page to be suggested.
pub const TOP_CLASSES_MIN_COUNT: usize = 5;

/// Most common classes among the labels of `shown` images, most common first.
///
/// Ties keep the order in which classes were first encountered.
pub fn top_classes(
    dataset: &Dataset,
    shown: &[ImageId],
    limit: usize,
    min_count: usize,
) -> Vec<ClassId> {
    let mut counts = HashMap::<ClassId, (usize, usize)>::new();
    let mut next_seen = 0usize;
    for id in shown {
        for &class_id in dataset.labels(*id) {
            let entry = counts.entry(class_id).or_insert_with(|| {
                next_seen += 1;
                (0, next_seen)
            });
            entry.0 += 1;
        }
    }

    let mut ranked = counts.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|(_, (count_a, seen_a)), (_, (count_b, seen_b))| {
        count_b.cmp(count_a).then_with(|| seen_a.cmp(seen_b))
    });

    ranked
        .into_iter()
        .take(limit)
        .filter(|(_, (count, _))| *count > min_count)
        .map(|(class_id, _)| class_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{top_classes, ClassCatalog, ClassInfo, Dataset, ImageRecord};
    use crate::model::{ClassId, ImageId};

    fn catalog(names: &[&str]) -> ClassCatalog {
        ClassCatalog::new(
            names
                .iter()
                .map(|name| ClassInfo {
                    name: (*name).into(),
                    frequency_percent: 1.0,
                })
                .collect(),
        )
    }

    fn class(id: u32) -> ClassId {
        ClassId::new(id)
    }

    #[test]
    fn id_bound_follows_highest_id_in_sparse_table() {
        let records = [0, 1, 499].map(|idx| ImageRecord::new(ImageId::new(idx), [class(0)]));
        let dataset = Dataset::new(catalog(&["fish"]), records);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.id_bound(), 500);
        assert_eq!(Dataset::default().id_bound(), 0);
    }

    #[test]
    fn top_classes_require_more_than_min_count() {
        let records = (0..6).map(|idx| {
            let labels = if idx < 3 { vec![class(0), class(1)] } else { vec![class(1)] };
            ImageRecord::new(ImageId::new(idx), labels)
        });
        let dataset = Dataset::new(catalog(&["fish", "coral"]), records);
        let shown = (0..6).map(ImageId::new).collect::<Vec<_>>();

        assert_eq!(top_classes(&dataset, &shown, 5, 5), vec![class(1)]);
        assert_eq!(top_classes(&dataset, &shown, 5, 2), vec![class(1), class(0)]);
    }

    #[test]
    fn top_classes_break_ties_by_first_appearance() {
        let records = vec![
            ImageRecord::new(ImageId::new(0), [class(2), class(0)]),
            ImageRecord::new(ImageId::new(1), [class(0), class(2)]),
        ];
        let dataset = Dataset::new(catalog(&["a", "b", "c"]), records);
        let shown = [ImageId::new(0), ImageId::new(1)];

        assert_eq!(top_classes(&dataset, &shown, 5, 0), vec![class(2), class(0)]);
        assert_eq!(top_classes(&dataset, &shown, 1, 0), vec![class(2)]);
    }

    #[test]
    fn unknown_images_and_classes_are_harmless() {
        let dataset = Dataset::new(catalog(&["a"]), Vec::new());
        assert!(dataset.labels(ImageId::new(9)).is_empty());
        assert_eq!(dataset.classes().frequency(class(7)), 0.0);
        assert!(top_classes(&dataset, &[ImageId::new(9)], 5, 0).is_empty());
    }
}
