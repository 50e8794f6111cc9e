// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::{ActivityLog, ImageId};

/// Progress through the experiment, persisted across page loads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Ordinal of the target currently sought. Never decreases within a session.
    pub target_index: usize,
    /// Attempts spent on the current target, in `[0, max_attempts]`.
    pub attempt_count: u32,
    pub last_query: String,
    pub activity_log: ActivityLog,
}

impl SessionState {
    pub fn new(target_index: usize, attempt_count: u32) -> Self {
        Self {
            target_index,
            attempt_count,
            ..Self::default()
        }
    }

    pub fn budget_exhausted(&self, max_attempts: u32) -> bool {
        self.attempt_count >= max_attempts
    }

    pub fn is_final_attempt(&self, max_attempts: u32) -> bool {
        max_attempts > 0 && self.attempt_count == max_attempts - 1
    }
}

/// Per-page selection. Discarded on navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub selected_image_id: Option<ImageId>,
    /// Whether the selected grid tile is currently drawn as selected.
    ///
    /// Clicking a context thumbnail clears the highlight without changing the selection.
    pub highlighted: bool,
    /// Center of the open context window; `None` while the detail overlay is closed.
    pub context_center_id: Option<ImageId>,
}

impl SelectionState {
    pub fn highlighted_image_id(&self) -> Option<ImageId> {
        self.selected_image_id.filter(|_| self.highlighted)
    }
}
