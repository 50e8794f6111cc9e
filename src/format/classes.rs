// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Class list parsing.
//!
//! One class per line, `name : percent`. The class id is the zero-based line number, so blank
//! lines in the middle of the file are rejected rather than skipped.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{ClassCatalog, ClassInfo};

fn class_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(concat!(
            r"^\s*(?P<name>.*?)\s*:\s*",
            r"(?P<percent>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)\s*$",
        ))
        .expect("class line pattern")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassListParseError {
    InvalidLine { line_no: usize, line: String },
    EmptyName { line_no: usize },
    InvalidPercent { line_no: usize, value: String },
}

impl fmt::Display for ClassListParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLine { line_no, line } => {
                write!(f, "line {line_no}: expected `name : percent`, got {line:?}")
            }
            Self::EmptyName { line_no } => write!(f, "line {line_no}: class name is empty"),
            Self::InvalidPercent { line_no, value } => {
                write!(f, "line {line_no}: invalid class percentage {value:?}")
            }
        }
    }
}

impl std::error::Error for ClassListParseError {}

pub fn parse_class_list(source: &str) -> Result<ClassCatalog, ClassListParseError> {
    let pattern = class_line_pattern();
    let mut classes = Vec::new();

    for (idx, line) in source.lines().enumerate() {
        let line_no = idx + 1;
        let Some(captures) = pattern.captures(line) else {
            return Err(ClassListParseError::InvalidLine {
                line_no,
                line: line.to_owned(),
            });
        };

        let name = captures.name("name").map_or("", |m| m.as_str());
        if name.is_empty() {
            return Err(ClassListParseError::EmptyName { line_no });
        }

        let raw_percent = captures.name("percent").map_or("", |m| m.as_str());
        let frequency_percent = raw_percent
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ClassListParseError::InvalidPercent {
                line_no,
                value: raw_percent.to_owned(),
            })?;

        classes.push(ClassInfo {
            name: name.into(),
            frequency_percent,
        });
    }

    Ok(ClassCatalog::new(classes))
}
