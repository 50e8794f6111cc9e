// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! The persisted session progress, per-page selection, and the read-only dataset records the
//! pages are built from.

pub mod activity;
pub mod dataset;
pub mod fixtures;
pub mod ids;
pub mod session;

pub use activity::{ActivityEntry, ActivityLog};
pub use dataset::{
    top_classes, ClassCatalog, ClassInfo, Dataset, ImageRecord, Labels, TOP_CLASSES_LIMIT,
    TOP_CLASSES_MIN_COUNT,
};
pub use ids::{ClassId, ImageId};
pub use session::{SelectionState, SessionState};
