// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Pages served by the search backend.
//!
//! The interaction core only talks to the backend through [`Navigation`]s. A [`PageSource`]
//! answers one navigation with the next [`Page`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::controller::Navigation;
use crate::model::{
    top_classes, ClassId, Dataset, ImageId, SessionState, TOP_CLASSES_LIMIT, TOP_CLASSES_MIN_COUNT,
};
use crate::store::StoreError;

pub const QUERY_LOG_FILENAME: &str = "queries.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Results {
        /// Result images in rank order.
        results: Vec<ImageId>,
        target: ImageId,
        /// Most common classes among the results, most common first.
        top_classes: Vec<ClassId>,
    },
    /// Every target has been searched.
    Finished,
}

impl Page {
    pub fn target(&self) -> Option<ImageId> {
        match self {
            Self::Results { target, .. } => Some(*target),
            Self::Finished => None,
        }
    }
}

pub trait PageSource {
    /// Builds the page shown after `navigation` (`None` on first load) for the loaded `session`.
    fn page(
        &mut self,
        navigation: Option<&Navigation>,
        session: &SessionState,
        dataset: &Dataset,
    ) -> Page;
}

/// Backend without search: every navigation shows the same first screen.
#[derive(Debug, Clone)]
pub struct StaticPageSource {
    targets: Vec<ImageId>,
    first_screen: Vec<ImageId>,
    query_log: Option<QueryLog>,
}

impl StaticPageSource {
    pub fn new(targets: Vec<ImageId>, first_screen: Vec<ImageId>) -> Self {
        Self {
            targets,
            first_screen,
            query_log: None,
        }
    }

    /// First screen made of the first `capacity` images of the dataset.
    pub fn from_dataset(dataset: &Dataset, targets: Vec<ImageId>, capacity: usize) -> Self {
        let first_screen = dataset.records().map(|record| record.id).take(capacity).collect();
        Self::new(targets, first_screen)
    }

    pub fn with_query_log(mut self, query_log: QueryLog) -> Self {
        self.query_log = Some(query_log);
        self
    }

    pub fn targets(&self) -> &[ImageId] {
        &self.targets
    }
}

impl PageSource for StaticPageSource {
    fn page(
        &mut self,
        navigation: Option<&Navigation>,
        session: &SessionState,
        dataset: &Dataset,
    ) -> Page {
        let Some(target) = self.targets.get(session.target_index).copied() else {
            log::info!("all {} targets searched", self.targets.len());
            return Page::Finished;
        };

        let results = self.first_screen.clone();
        let top_classes =
            top_classes(dataset, &results, TOP_CLASSES_LIMIT, TOP_CLASSES_MIN_COUNT);

        if let (Some(query_log), Some(navigation)) = (self.query_log.as_mut(), navigation) {
            if let Err(err) = query_log.record(navigation, session, target, &results) {
                log::warn!("cannot append to query log: {err}");
            }
        }

        Page::Results {
            results,
            target,
            top_classes,
        }
    }
}

/// One-based rank of `target` in `results`.
pub fn rank_of(results: &[ImageId], target: ImageId) -> Option<usize> {
    results.iter().position(|id| *id == target).map(|idx| idx + 1)
}

/// Appends one CSV line per search navigation: `query;target;session;rank;"activity"`.
///
/// The rank column is empty when the target is not among the results.
#[derive(Debug, Clone)]
pub struct QueryLog {
    path: PathBuf,
    session_id: String,
}

impl QueryLog {
    pub fn new(dir: &Path, session_id: impl Into<String>) -> Self {
        Self {
            path: dir.join(QUERY_LOG_FILENAME),
            session_id: session_id.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(
        &mut self,
        navigation: &Navigation,
        session: &SessionState,
        target: ImageId,
        results: &[ImageId],
    ) -> Result<(), StoreError> {
        let query = match navigation {
            Navigation::TextQuery(query) => query.clone(),
            Navigation::Similarity(id) | Navigation::Bayes(id) => id.to_string(),
            Navigation::Advance | Navigation::Answer(_) => return Ok(()),
        };
        let rank = rank_of(results, target).map(|rank| rank.to_string()).unwrap_or_default();
        let line = format!(
            "{query};{target};{};{rank};\"{}\"\n",
            self.session_id, session.activity_log
        );

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(line.as_bytes()).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::{rank_of, Page, PageSource, QueryLog, StaticPageSource};
    use crate::controller::Navigation;
    use crate::model::fixtures::{demo_dataset, demo_targets};
    use crate::model::{ImageId, SessionState};
    use crate::store::test_support::TempDir;

    #[test]
    fn serves_targets_in_order_then_finishes() {
        let dataset = demo_dataset(200);
        let targets = demo_targets(200, 2);
        let mut source = StaticPageSource::from_dataset(&dataset, targets.clone(), 30);

        let page = source.page(None, &SessionState::new(0, 0), &dataset);
        let Page::Results { results, target, top_classes } = page else {
            panic!("expected results");
        };
        assert_eq!(results.len(), 30);
        assert_eq!(target, targets[0]);
        assert!(top_classes.len() <= 5);

        let page = source.page(Some(&Navigation::Advance), &SessionState::new(1, 0), &dataset);
        assert_eq!(page.target(), Some(targets[1]));

        let page = source.page(Some(&Navigation::Advance), &SessionState::new(2, 0), &dataset);
        assert_eq!(page, Page::Finished);
        assert_eq!(page.target(), None);
    }

    #[test]
    fn rank_is_one_based() {
        let results = [ImageId::new(4), ImageId::new(9)];
        assert_eq!(rank_of(&results, ImageId::new(9)), Some(2));
        assert_eq!(rank_of(&results, ImageId::new(1)), None);
    }

    #[test]
    fn query_log_records_searches_with_activity() {
        let tmp = TempDir::new("query-log");
        let dataset = demo_dataset(50);
        let mut source = StaticPageSource::from_dataset(&dataset, vec![ImageId::new(3)], 10)
            .with_query_log(QueryLog::new(tmp.path(), "abc123"));

        let mut session = SessionState::new(0, 1);
        session.activity_log.push("fish", ImageId::new(7));
        source.page(Some(&Navigation::TextQuery("fish".to_owned())), &session, &dataset);
        source.page(Some(&Navigation::Advance), &session, &dataset);
        source.page(Some(&Navigation::Bayes(ImageId::new(12))), &session, &dataset);

        let log = std::fs::read_to_string(tmp.path().join(super::QUERY_LOG_FILENAME)).unwrap();
        assert_eq!(log, "fish;3;abc123;4;\"fish:7|\"\n12;3;abc123;4;\"fish:7|\"\n");
    }
}
