// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Experiment configuration.
//!
//! Every field has a default, so a config file only lists what it changes.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;

/// Image count of the corpus the experiment was designed for.
pub const DEFAULT_DATASET_SIZE: usize = 22036;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Attempts allowed per target before the session force-advances.
    pub max_attempts: u32,
    /// Rows of the result grid.
    pub lines: usize,
    pub photos_on_line: usize,
    /// Label buttons visible per tile before the "more" toggle.
    pub displayed_classes: usize,
    pub dataset_size: usize,
    /// Offsets around the context center, in display order.
    pub context_offsets: Vec<isize>,
    pub context_shift: usize,
    pub color_growth_factor: f64,
    pub query_connective: String,
    pub similarity_search_enabled: bool,
    pub show_last_query: bool,
    pub shift_in_context_enabled: bool,
    pub photos_address: String,
    pub photo_extension: String,
    pub locale: Option<Locale>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            lines: 60,
            photos_on_line: 5,
            displayed_classes: 3,
            dataset_size: DEFAULT_DATASET_SIZE,
            context_offsets: vec![-2, -1, 0, 1, 2],
            context_shift: 3,
            color_growth_factor: 1.4,
            query_connective: ", ".to_owned(),
            similarity_search_enabled: true,
            show_last_query: true,
            shift_in_context_enabled: true,
            photos_address: "../static/data/sea_photos/".to_owned(),
            photo_extension: ".jpg".to_owned(),
            locale: None,
        }
    }
}

/// What [`Config::fit_dataset_size`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetSizeFit {
    Kept,
    /// The configured size cut off classified images.
    Raised { configured: usize },
    /// The default size was replaced by the corpus bound.
    Derived { configured: usize },
    /// The configured size exceeds every classified id and was kept.
    BeyondRecords { id_bound: usize },
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read config {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "cannot parse config {path:?}: {source}"),
            Self::Invalid { field, reason } => {
                write!(f, "invalid config field `{field}`: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Invalid { .. } => None,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

impl Config {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        log::info!("loaded config from {path:?}");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(invalid("max_attempts", "must be at least 1"));
        }
        if self.lines == 0 {
            return Err(invalid("lines", "must be at least 1"));
        }
        if self.photos_on_line == 0 {
            return Err(invalid("photos_on_line", "must be at least 1"));
        }
        if self.dataset_size == 0 {
            return Err(invalid("dataset_size", "must be at least 1"));
        }
        if self.context_offsets.is_empty() {
            return Err(invalid("context_offsets", "must not be empty"));
        }
        let mut sorted = self.context_offsets.clone();
        sorted.sort_unstable();
        if sorted.iter().zip(sorted.iter().rev()).any(|(lo, hi)| *lo != -*hi) {
            return Err(invalid("context_offsets", "must be symmetric around 0"));
        }
        if !self.color_growth_factor.is_finite() || self.color_growth_factor < 0.0 {
            return Err(invalid("color_growth_factor", "must be a finite, non-negative number"));
        }
        Ok(())
    }

    /// Reconciles `dataset_size` with a loaded corpus whose ids are all below `id_bound`.
    ///
    /// A default or too small size becomes `id_bound`. A larger configured size is kept, since
    /// the classification table may leave the last images out.
    pub fn fit_dataset_size(&mut self, id_bound: usize) -> DatasetSizeFit {
        let configured = self.dataset_size;
        if configured == id_bound || id_bound == 0 {
            DatasetSizeFit::Kept
        } else if configured < id_bound {
            self.dataset_size = id_bound;
            DatasetSizeFit::Raised { configured }
        } else if configured == DEFAULT_DATASET_SIZE {
            self.dataset_size = id_bound;
            DatasetSizeFit::Derived { configured }
        } else {
            DatasetSizeFit::BeyondRecords { id_bound }
        }
    }

    /// Grid cells on one page.
    pub fn page_capacity(&self) -> usize {
        self.lines.saturating_mul(self.photos_on_line)
    }
}
