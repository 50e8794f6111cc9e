// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Gasearch-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Gasearch and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use super::kv::{DiscardStore, KeyValueStore, StoreError};
use crate::model::{ActivityLog, ImageId, SessionState};

pub const KEY_INDEX: &str = "index";
pub const KEY_TRYING: &str = "trying";
pub const KEY_LAST_QUERY: &str = "last_query";
pub const KEY_ACTIVITY: &str = "activity";

/// How `save` treats an optional string field.
///
/// `Keep` leaves the stored value untouched; `Clear` stores the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate {
    #[default]
    Keep,
    Clear,
    Set(String),
}

impl FieldUpdate {
    /// `Clear` for the empty string, `Set` otherwise.
    pub fn value(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Clear
        } else {
            Self::Set(value)
        }
    }

    fn encoded(&self) -> Option<String> {
        match self {
            Self::Keep => None,
            Self::Clear => Some(quote("")),
            Self::Set(value) => Some(quote(value)),
        }
    }
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    out.push_str(value);
    out.push('"');
    out
}

fn unquote(raw: &str) -> Option<&str> {
    if raw.len() < 2 {
        return None;
    }
    raw.strip_prefix('"')?.strip_suffix('"')
}

fn encode_count(value: impl itoa::Integer) -> String {
    itoa::Buffer::new().format(value).to_owned()
}

/// Typed access to the persisted session fields.
pub struct SessionStore {
    store: Box<dyn KeyValueStore>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("persistent", &self.store.is_persistent())
            .finish()
    }
}

impl SessionStore {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    pub fn from_boxed(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn is_persistent(&self) -> bool {
        self.store.is_persistent()
    }

    /// Drops the backing store; later loads see defaults and writes are discarded.
    pub fn degrade(&mut self) {
        log::warn!("session storage degraded to per-page defaults");
        self.store = Box::new(DiscardStore);
    }

    pub fn into_inner(self) -> Box<dyn KeyValueStore> {
        self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("cannot read session field {key}: {err}");
                None
            }
        }
    }

    fn read_count<T: std::str::FromStr + Default>(&self, key: &str) -> T {
        let Some(raw) = self.read(key) else {
            return T::default();
        };
        raw.trim().parse::<T>().unwrap_or_else(|_| {
            log::warn!("ignoring malformed session field {key}={raw:?}");
            T::default()
        })
    }

    fn read_quoted(&self, key: &str) -> String {
        let Some(raw) = self.read(key) else {
            return String::new();
        };
        match unquote(&raw) {
            Some(value) => value.to_owned(),
            None => {
                log::warn!("ignoring unquoted session field {key}={raw:?}");
                String::new()
            }
        }
    }

    /// Reads the session; missing or malformed fields fall back to their defaults.
    pub fn load(&self) -> SessionState {
        SessionState {
            target_index: self.read_count(KEY_INDEX),
            attempt_count: self.read_count(KEY_TRYING),
            last_query: self.read_quoted(KEY_LAST_QUERY),
            activity_log: ActivityLog::parse(&self.read_quoted(KEY_ACTIVITY)),
        }
    }

    pub fn save(
        &mut self,
        target_index: usize,
        attempt_count: u32,
        last_query: FieldUpdate,
        activity: FieldUpdate,
    ) -> Result<(), StoreError> {
        let mut entries = vec![
            (KEY_INDEX, encode_count(target_index)),
            (KEY_TRYING, encode_count(attempt_count)),
        ];
        if let Some(value) = last_query.encoded() {
            entries.push((KEY_LAST_QUERY, value));
        }
        if let Some(value) = activity.encoded() {
            entries.push((KEY_ACTIVITY, value));
        }

        self.store.set_all(&entries)?;
        log::debug!(
            "saved session index={target_index} trying={attempt_count} \
             last_query={last_query:?} activity={activity:?}"
        );
        Ok(())
    }

    /// Appends one `text:id` entry to the persisted activity log.
    pub fn append_activity(&mut self, text: &str, source: ImageId) -> Result<(), StoreError> {
        let mut log = ActivityLog::parse(&self.read_quoted(KEY_ACTIVITY));
        log.push(text, source);
        self.store.set(KEY_ACTIVITY, &quote(&log.to_string()))
    }

    pub fn clear_activity(&mut self) -> Result<(), StoreError> {
        self.store.set(KEY_ACTIVITY, &quote(""))
    }

    /// Starts a fresh experiment run.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.save(0, 0, FieldUpdate::Clear, FieldUpdate::Clear)
    }

    /// Checks that the store accepts writes by rewriting the current counters.
    pub fn probe(&mut self) -> Result<(), StoreError> {
        let state = self.load();
        self.save(
            state.target_index,
            state.attempt_count,
            FieldUpdate::Keep,
            FieldUpdate::Keep,
        )
    }
}
