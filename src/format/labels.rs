// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Image classification table.
//!
//! Semicolon-separated with a header row naming at least the `id` and `top` columns. `id` is
//! one-based on disk; `top` is a bracketed, comma-separated list of class ids, most confident
//! first, e.g. `[12, 4, 7]`.

use std::fmt;

use memchr::memchr_iter;
use rayon::prelude::*;

use crate::model::{ClassId, ImageId, ImageRecord, Labels};

const SEPARATOR: u8 = b';';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelTableParseError {
    MissingHeader,
    MissingColumn { column: &'static str },
    MissingField { line_no: usize, column: &'static str },
    InvalidImageId { line_no: usize, value: String },
    InvalidClassList { line_no: usize, value: String },
}

impl fmt::Display for LabelTableParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingHeader => f.write_str("label table is empty (missing header row)"),
            Self::MissingColumn { column } => write!(f, "label table header lacks `{column}`"),
            Self::MissingField { line_no, column } => {
                write!(f, "line {line_no}: missing `{column}` field")
            }
            Self::InvalidImageId { line_no, value } => {
                write!(f, "line {line_no}: invalid one-based image id {value:?}")
            }
            Self::InvalidClassList { line_no, value } => {
                write!(f, "line {line_no}: invalid class list {value:?}")
            }
        }
    }
}

impl std::error::Error for LabelTableParseError {}

fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start = 0usize;
    for end in memchr_iter(SEPARATOR, line.as_bytes()) {
        fields.push(line[start..end].trim());
        start = end + 1;
    }
    fields.push(line[start..].trim());
    fields
}

fn parse_class_ids(raw: &str) -> Option<Labels> {
    let inner = raw.trim().strip_prefix('[')?.strip_suffix(']')?.trim();
    if inner.is_empty() {
        return Some(Labels::new());
    }
    inner
        .split(',')
        .map(|part| part.trim().parse::<u32>().ok().map(ClassId::new))
        .collect()
}

pub fn parse_label_table(source: &str) -> Result<Vec<ImageRecord>, LabelTableParseError> {
    let lines = source.lines().collect::<Vec<_>>();
    let header = lines.first().ok_or(LabelTableParseError::MissingHeader)?;
    let columns = split_fields(header);
    let position = |column: &'static str| {
        columns
            .iter()
            .position(|name| *name == column)
            .ok_or(LabelTableParseError::MissingColumn { column })
    };
    let id_col = position("id")?;
    let top_col = position("top")?;

    lines
        .par_iter()
        .enumerate()
        .skip(1)
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            let line_no = idx + 1;
            let fields = split_fields(line);
            let raw_id = fields
                .get(id_col)
                .ok_or(LabelTableParseError::MissingField { line_no, column: "id" })?;
            let raw_top = fields
                .get(top_col)
                .ok_or(LabelTableParseError::MissingField { line_no, column: "top" })?;

            let file_number = raw_id
                .parse::<usize>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| LabelTableParseError::InvalidImageId {
                    line_no,
                    value: (*raw_id).to_owned(),
                })?;
            let labels = parse_class_ids(raw_top).ok_or_else(|| {
                LabelTableParseError::InvalidClassList {
                    line_no,
                    value: (*raw_top).to_owned(),
                }
            })?;

            Ok(ImageRecord {
                id: ImageId::new(file_number - 1),
                labels,
            })
        })
        .collect()
}
