// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Fuzzy class palette: type part of a class name, pick it, and it is added to the query.

use crate::model::{ClassCatalog, ClassId};

pub(crate) const PALETTE_MAX_ROWS: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ClassPalette {
    query: String,
    matches: Vec<ClassId>,
    cursor: usize,
}

impl ClassPalette {
    pub(crate) fn new(catalog: &ClassCatalog) -> Self {
        let mut palette = Self {
            query: String::new(),
            matches: Vec::new(),
            cursor: 0,
        };
        palette.refresh(catalog);
        palette
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn matches(&self) -> &[ClassId] {
        &self.matches
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn selected(&self) -> Option<ClassId> {
        self.matches.get(self.cursor).copied()
    }

    pub(crate) fn push(&mut self, ch: char, catalog: &ClassCatalog) {
        self.query.push(ch);
        self.refresh(catalog);
    }

    pub(crate) fn pop(&mut self, catalog: &ClassCatalog) {
        self.query.pop();
        self.refresh(catalog);
    }

    pub(crate) fn move_by(&mut self, delta: isize) {
        if self.matches.is_empty() {
            self.cursor = 0;
            return;
        }
        let last = self.matches.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn refresh(&mut self, catalog: &ClassCatalog) {
        self.matches = if self.query.trim().is_empty() {
            catalog.iter().map(|(class_id, _)| class_id).collect()
        } else {
            rank_classes(catalog, &self.query)
        };
        self.cursor = 0;
    }
}

/// Classes whose names fuzzily contain `query`, best match first.
pub(crate) fn rank_classes(catalog: &ClassCatalog, query: &str) -> Vec<ClassId> {
    let needle = query.trim().to_lowercase();
    let mut scored = catalog
        .iter()
        .filter_map(|(class_id, info)| {
            let haystack = info.name.to_lowercase();
            fuzzy_score(&needle, &haystack).map(|score| (score, haystack, class_id))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, name_a, _), (score_b, name_b, _)| {
        score_b.cmp(score_a).then_with(|| name_a.cmp(name_b))
    });
    scored.into_iter().map(|(_, _, class_id)| class_id).collect()
}

#[derive(Debug, Clone, Copy)]
struct SubsequenceStats {
    first: usize,
    span: usize,
    consecutive: usize,
    start_boundary: bool,
}

fn fuzzy_score(needle: &str, haystack: &str) -> Option<i64> {
    if needle.is_empty() {
        return None;
    }

    let subseq = subsequence_stats(needle, haystack)?;
    let ratio = rapidfuzz::fuzz::ratio(needle.chars(), haystack.chars());

    let mut score = (ratio * 1000.0).round() as i64;
    score -= subseq.span as i64;
    score -= (subseq.first as i64) / 4;
    score += (subseq.consecutive as i64) * 40;
    if subseq.start_boundary {
        score += 150;
    }
    if haystack.contains(needle) {
        score += 2000;
    }
    if haystack == needle {
        score += 5000;
    }

    Some(score)
}

fn subsequence_stats(needle: &str, haystack: &str) -> Option<SubsequenceStats> {
    let mut needle_iter = needle.chars().peekable();
    let mut first: Option<usize> = None;
    let mut last = 0usize;
    let mut prev_match: Option<usize> = None;
    let mut consecutive = 0usize;
    let mut start_boundary = false;
    let mut prev_hay: Option<char> = None;

    for (idx, ch) in haystack.chars().enumerate() {
        let Some(&want) = needle_iter.peek() else {
            break;
        };

        if ch == want {
            needle_iter.next();
            if first.is_none() {
                first = Some(idx);
                start_boundary = prev_hay.map_or(true, is_boundary_char);
            }
            if prev_match.is_some_and(|prev| idx == prev + 1) {
                consecutive += 1;
            }
            prev_match = Some(idx);
            last = idx;
        }

        prev_hay = Some(ch);
    }

    if needle_iter.peek().is_some() {
        return None;
    }

    let first = first?;
    Some(SubsequenceStats {
        first,
        span: last.saturating_sub(first).saturating_add(1),
        consecutive,
        start_boundary,
    })
}

fn is_boundary_char(ch: char) -> bool {
    matches!(ch, ' ' | '-' | '_' | '/')
}
