// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Persistence for the experiment session.
//!
//! Session fields live in a small string key-value store. [`SessionStore`] gives typed access
//! to them; [`FileStore`] keeps them in a JSON file inside a session directory and
//! [`MemoryStore`] keeps them in memory.

pub mod file;
pub mod kv;
pub mod session_store;

pub use file::{FileStore, WriteDurability};
pub use kv::{DiscardStore, KeyValueStore, MemoryStore, StoreError};
pub use session_store::{
    FieldUpdate, SessionStore, KEY_ACTIVITY, KEY_INDEX, KEY_LAST_QUERY, KEY_TRYING,
};

#[cfg(test)]
pub(crate) mod test_support {
    use std::env;
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    pub(crate) struct TempDir {
        path: PathBuf,
    }

    impl TempDir {
        pub(crate) fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!("gasearch-{prefix}-{}-{nanos}-{counter}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        pub(crate) fn path(&self) -> &Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
