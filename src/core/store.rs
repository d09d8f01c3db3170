//! # Session Store
//!
//! In-memory entries for the lifetime of the process. Nothing is written to
//! disk; dropping the store discards the session.
//!
//! The store itself does not enforce write-once. `InteractionController`
//! checks for an existing key before it ever calls `put`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::core::entry::{Entry, EntryKey};

#[derive(Debug, Default)]
pub struct SessionStore {
    entries: BTreeMap<EntryKey, Entry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `entry` under its own key, returning whatever was there before.
    pub fn put(&mut self, entry: Entry) -> Option<Entry> {
        self.entries.insert(entry.key.clone(), entry)
    }

    pub fn get(&self, key: &EntryKey) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &EntryKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in key order (chronological for dates, ascending for sequences).
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    /// Days of the given month that have an entry.
    pub fn dates_in_month(&self, year: i32, month: u32) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries
            .keys()
            .filter_map(EntryKey::as_date)
            .filter(move |d| d.year() == year && d.month() == month)
    }
}
