// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Logger setup for the binary.
//!
//! The terminal belongs to the UI, so records go to a file in the session directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const LOG_FILENAME: &str = "gasearch.log";

/// Initializes `env_logger` from `RUST_LOG` (default `info`), appending to `dir/gasearch.log`.
///
/// Returns the log file path.
pub fn init(dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILENAME);
    let file = fs::OpenOptions::new().create(true).append(true).open(&path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(io::Error::other)?;

    log::info!("gasearch {} starting up", env!("CARGO_PKG_VERSION"));
    Ok(path)
}
