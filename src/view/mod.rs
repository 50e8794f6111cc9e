// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Page view-model.
//!
//! [`build_page`] turns a backend [`Page`] plus the loaded session into everything a front-end
//! draws. Per-page interaction state (selection, open overlays, expanded tiles) is owned by the
//! controller and layered on top by the front-end.

use smol_str::SmolStr;

use crate::color::{color_for, Rgb};
use crate::config::Config;
use crate::i18n::{MessageKey, Messages};
use crate::model::{ClassId, Dataset, ImageId, SessionState};
use crate::pages::Page;

pub const MORE_GLYPH: char = '+';
pub const LESS_GLYPH: char = '-';

/// File path of an image: `photos_address` + zero-padded one-based number + extension.
pub fn image_path(config: &Config, id: ImageId) -> String {
    format!(
        "{}{:05}{}",
        config.photos_address,
        id.file_number(),
        config.photo_extension
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelButton {
    pub class_id: ClassId,
    pub text: SmolStr,
    /// Background derived from the class frequency; top-class buttons are uncolored.
    pub color: Option<Rgb>,
    /// Hidden until the tile's "more" toggle is flipped.
    pub hidden: bool,
    /// Image whose label row the button belongs to.
    pub source: Option<ImageId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub id: ImageId,
    pub image_path: String,
    pub labels: Vec<LabelButton>,
}

impl GridCell {
    pub fn has_more(&self) -> bool {
        self.labels.iter().any(|label| label.hidden)
    }

    pub fn toggle_glyph(&self, expanded: bool) -> char {
        if expanded {
            LESS_GLYPH
        } else {
            MORE_GLYPH
        }
    }

    pub fn visible_labels(&self, expanded: bool) -> impl Iterator<Item = &LabelButton> {
        self.labels.iter().filter(move |label| expanded || !label.hidden)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPanel {
    pub id: ImageId,
    pub image_path: String,
    pub title: &'static str,
    /// Label of the skip control; absent once the budget is spent.
    pub skip_label: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBar {
    pub prefill: String,
    pub input_visible: bool,
    pub clear_visible: bool,
    pub similarity_visible: bool,
    /// "Search", or "Next" once the attempt budget is spent.
    pub primary_label: &'static str,
    pub clear_label: &'static str,
    pub similarity_label: &'static str,
    pub attempts_left: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextControls {
    pub shift_enabled: bool,
}

impl ContextControls {
    /// Shift arrows are only shown while a context window is open.
    pub fn visible(&self, context_open: bool) -> bool {
        self.shift_enabled && context_open
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub rows: Vec<Vec<GridCell>>,
    pub top_classes_title: &'static str,
    pub top_classes: Vec<LabelButton>,
    pub target: TargetPanel,
    pub context_controls: ContextControls,
    pub search_bar: SearchBar,
}

impl ResultsView {
    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.rows.iter().flatten()
    }

    pub fn cell(&self, id: ImageId) -> Option<&GridCell> {
        self.cells().find(|cell| cell.id == id)
    }

    /// Row and column of `id` in the grid.
    pub fn position(&self, id: ImageId) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(row_idx, row)| {
            row.iter().position(|cell| cell.id == id).map(|col| (row_idx, col))
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageView {
    Results(ResultsView),
    Finished { message: &'static str },
}

fn class_text(dataset: &Dataset, class_id: ClassId) -> SmolStr {
    match dataset.classes().name(class_id) {
        Some(name) => SmolStr::new(name),
        None => SmolStr::new(format!("#{class_id}")),
    }
}

fn label_row(dataset: &Dataset, config: &Config, id: ImageId) -> Vec<LabelButton> {
    dataset
        .labels(id)
        .iter()
        .enumerate()
        .map(|(idx, &class_id)| LabelButton {
            class_id,
            text: class_text(dataset, class_id),
            color: Some(color_for(
                dataset.classes().frequency(class_id),
                config.color_growth_factor,
            )),
            hidden: idx >= config.displayed_classes,
            source: Some(id),
        })
        .collect()
}

pub fn build_page(
    dataset: &Dataset,
    page: &Page,
    session: &SessionState,
    config: &Config,
    messages: &Messages,
) -> PageView {
    let (results, target, top_classes) = match page {
        Page::Results {
            results,
            target,
            top_classes,
        } => (results, *target, top_classes),
        Page::Finished => {
            return PageView::Finished {
                message: messages.text(MessageKey::Finished),
            }
        }
    };

    let columns = config.photos_on_line.max(1);
    let rows = results
        .iter()
        .take(config.page_capacity())
        .map(|&id| GridCell {
            id,
            image_path: image_path(config, id),
            labels: label_row(dataset, config, id),
        })
        .collect::<Vec<_>>()
        .chunks(columns)
        .map(<[GridCell]>::to_vec)
        .collect();

    let top_classes = top_classes
        .iter()
        .map(|&class_id| LabelButton {
            class_id,
            text: class_text(dataset, class_id),
            color: None,
            hidden: false,
            source: None,
        })
        .collect();

    let exhausted = session.budget_exhausted(config.max_attempts);
    let search_bar = SearchBar {
        prefill: if config.show_last_query {
            session.last_query.clone()
        } else {
            String::new()
        },
        input_visible: !exhausted,
        clear_visible: !exhausted,
        similarity_visible: config.similarity_search_enabled && !exhausted,
        primary_label: messages.text(if exhausted {
            MessageKey::Next
        } else {
            MessageKey::Search
        }),
        clear_label: messages.text(MessageKey::Clear),
        similarity_label: messages.text(MessageKey::Similar),
        attempts_left: config.max_attempts.saturating_sub(session.attempt_count),
    };

    PageView::Results(ResultsView {
        rows,
        top_classes_title: messages.text(MessageKey::TopClasses),
        top_classes,
        target: TargetPanel {
            id: target,
            image_path: image_path(config, target),
            title: messages.text(MessageKey::Target),
            skip_label: (!exhausted).then(|| messages.text(MessageKey::Skip)),
        },
        context_controls: ContextControls {
            shift_enabled: config.shift_in_context_enabled,
        },
        search_bar,
    })
}
