//! # Entries
//!
//! The unit of a session: what the user wrote plus what came back.
//!
//! ```text
//! Draft { title?, content }   ──submit──▶   Entry { key, title?, content, response }
//!   (mutable, owned by UI)                    (write-once, owned by SessionStore)
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Mode;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Identifies one entry: a calendar day in diary mode, a message number in chat mode.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKey {
    Date(NaiveDate),
    Sequence(u64),
}

impl EntryKey {
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            EntryKey::Date(date) => Some(*date),
            EntryKey::Sequence(_) => None,
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKey::Date(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            EntryKey::Sequence(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParseError(String);

impl fmt::Display for KeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a date (YYYY-MM-DD) or sequence number: {:?}", self.0)
    }
}

impl std::error::Error for KeyParseError {}

impl FromStr for EntryKey {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u64>() {
            return Ok(EntryKey::Sequence(n));
        }
        NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(EntryKey::Date)
            .map_err(|_| KeyParseError(s.to_string()))
    }
}

/// A finalized entry. `response` holds either generated text or a rendered error.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: EntryKey,
    pub title: Option<String>,
    pub content: String,
    pub response: String,
}

/// Why a submission was refused. Never shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyTitle,
    EmptyContent,
    /// Diary submission without a selected day.
    MissingKey,
    /// Key of the wrong kind for the current mode.
    InvalidKey(EntryKey),
    FutureDate(NaiveDate),
    AlreadyFinalized(EntryKey),
    InFlight(EntryKey),
    /// A response arrived for a key that has no pending submission.
    NotPending(EntryKey),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::EmptyTitle => write!(f, "title is empty"),
            Rejection::EmptyContent => write!(f, "content is empty"),
            Rejection::MissingKey => write!(f, "no entry selected"),
            Rejection::InvalidKey(key) => write!(f, "key {key} does not fit this mode"),
            Rejection::FutureDate(date) => write!(f, "{date} is in the future"),
            Rejection::AlreadyFinalized(key) => write!(f, "entry {key} is already saved"),
            Rejection::InFlight(key) => write!(f, "entry {key} is waiting for a response"),
            Rejection::NotPending(key) => write!(f, "entry {key} has no pending submission"),
        }
    }
}

impl std::error::Error for Rejection {}

/// Text the user has typed but not submitted yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub title: Option<String>,
    pub content: String,
}

impl Draft {
    pub fn new(title: Option<&str>, content: &str) -> Self {
        Self {
            title: title.map(str::to_string),
            content: content.to_string(),
        }
    }

    /// Checks the non-empty rules for `mode`. Title is ignored in chat mode.
    pub fn check(&self, mode: Mode) -> Result<(), Rejection> {
        if mode == Mode::Diary
            && self.title.as_deref().is_none_or(|t| t.trim().is_empty())
        {
            return Err(Rejection::EmptyTitle);
        }
        if self.content.trim().is_empty() {
            return Err(Rejection::EmptyContent);
        }
        Ok(())
    }

    pub fn is_submittable(&self, mode: Mode) -> bool {
        self.check(mode).is_ok()
    }

    /// Trimmed copy as it will be stored. Chat drafts lose their title.
    pub fn normalized(&self, mode: Mode) -> Draft {
        Draft {
            title: match mode {
                Mode::Diary => self.title.as_deref().map(|t| t.trim().to_string()),
                Mode::Chat => None,
            },
            content: self.content.trim().to_string(),
        }
    }

    pub fn into_entry(self, key: EntryKey, response: String) -> Entry {
        Entry {
            key,
            title: self.title,
            content: self.content,
            response,
        }
    }
}
