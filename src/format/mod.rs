// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Dataset file formats.
//!
//! A dataset folder holds the class list, the image classification table, and optionally the
//! list of target images for the experiment.

pub mod classes;
pub mod labels;

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use classes::{parse_class_list, ClassListParseError};
pub use labels::{parse_label_table, LabelTableParseError};

use crate::model::{Dataset, ImageId};

pub const CLASS_LIST_FILENAME: &str = "nounlist.txt";
pub const LABEL_TABLE_FILENAME: &str = "result.csv";
pub const TARGETS_FILENAME: &str = "targets.txt";

#[derive(Debug)]
pub enum DatasetError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    ClassList {
        path: PathBuf,
        source: ClassListParseError,
    },
    LabelTable {
        path: PathBuf,
        source: LabelTableParseError,
    },
    InvalidTarget {
        path: PathBuf,
        value: String,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::ClassList { path, source } => {
                write!(f, "cannot parse class list {path:?}: {source}")
            }
            Self::LabelTable { path, source } => {
                write!(f, "cannot parse label table {path:?}: {source}")
            }
            Self::InvalidTarget { path, value } => {
                write!(f, "invalid one-based target id {value:?} in {path:?}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::ClassList { source, .. } => Some(source),
            Self::LabelTable { source, .. } => Some(source),
            Self::InvalidTarget { .. } => None,
        }
    }
}

/// Parses a comma-separated list of one-based target ids.
pub fn parse_targets(source: &str) -> Result<Vec<ImageId>, String> {
    source
        .split(|ch: char| ch == ',' || ch.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| match part.parse::<usize>() {
            Ok(number) if number > 0 => Ok(ImageId::new(number - 1)),
            _ => Err(part.to_owned()),
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct DatasetFolder {
    root: PathBuf,
}

impl DatasetFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn class_list_path(&self) -> PathBuf {
        self.root.join(CLASS_LIST_FILENAME)
    }

    pub fn label_table_path(&self) -> PathBuf {
        self.root.join(LABEL_TABLE_FILENAME)
    }

    pub fn targets_path(&self) -> PathBuf {
        self.root.join(TARGETS_FILENAME)
    }

    pub fn load_dataset(&self) -> Result<Dataset, DatasetError> {
        let class_list_path = self.class_list_path();
        let catalog = parse_class_list(&read(&class_list_path)?).map_err(|source| {
            DatasetError::ClassList {
                path: class_list_path.clone(),
                source,
            }
        })?;

        let label_table_path = self.label_table_path();
        let records = parse_label_table(&read(&label_table_path)?).map_err(|source| {
            DatasetError::LabelTable {
                path: label_table_path.clone(),
                source,
            }
        })?;

        log::info!(
            "loaded dataset from {:?}: {} classes, {} classified images",
            self.root,
            catalog.len(),
            records.len()
        );
        Ok(Dataset::new(catalog, records))
    }

    /// Targets listed in the folder, or `None` when the folder has no target list.
    pub fn load_targets(&self) -> Result<Option<Vec<ImageId>>, DatasetError> {
        let path = self.targets_path();
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(DatasetError::Io { path, source }),
        };
        parse_targets(&source)
            .map(Some)
            .map_err(|value| DatasetError::InvalidTarget { path, value })
    }
}

fn read(path: &Path) -> Result<String, DatasetError> {
    fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}
