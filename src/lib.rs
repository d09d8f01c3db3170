//! Daily Talk library exports for testing

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub mod core;
pub mod inference;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Which kind of session the application runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Calendar of write-once entries keyed by date.
    #[default]
    Diary,
    /// Running log of independent messages keyed by sequence number.
    Chat,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Diary => "Diary",
            Mode::Chat => "Chat",
        }
    }
}
