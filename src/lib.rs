// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Gasearch: interactive known-item image search sessions.
//!
//! A participant is shown a target image and a page of results, and searches for the target with
//! text queries, relevance feedback, and similarity search within a fixed attempt budget. The
//! session progress lives in a key-value store so that every search is a fresh page built from
//! persisted state.

pub mod color;
pub mod config;
pub mod controller;
pub mod format;
pub mod i18n;
pub mod logging;
pub mod model;
pub mod pages;
pub mod store;
pub mod tui;
pub mod view;
