// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use crate::model::ImageId;

/// A committing request to the search backend. Performing one rebuilds the whole page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Show the next target with a fresh result set (`?s`).
    Advance,
    TextQuery(String),
    Similarity(ImageId),
    Bayes(ImageId),
    Answer(ImageId),
}

impl Navigation {
    pub fn to_query_string(&self) -> String {
        self.to_string()
    }

    /// Whether the navigation spends one attempt on the current target.
    pub fn is_search(&self) -> bool {
        matches!(self, Self::TextQuery(_) | Self::Similarity(_) | Self::Bayes(_))
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Advance => f.write_str("?s"),
            Self::TextQuery(query) => write!(f, "?query=\"{query}\""),
            Self::Similarity(id) => write!(f, "?sim_id={id}"),
            Self::Bayes(id) => write!(f, "?b_id={id}"),
            Self::Answer(id) => write!(f, "?answer={id}"),
        }
    }
}
