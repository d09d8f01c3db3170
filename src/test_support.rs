//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::Mode;
use crate::core::config::{ConfigError, CredentialSource};
use crate::core::entry::{Draft, Entry, EntryKey};
use crate::core::state::InteractionController;
use crate::core::surface::DisplaySurface;
use crate::inference::{CompletionClient, CompletionError};

/// A client that answers every prompt with the same result and remembers the prompts.
pub struct ScriptedClient {
    result: Result<String, CompletionError>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn replying(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: CompletionError) -> Self {
        Self {
            result: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "test-model"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.result.clone()
    }
}

/// Every call the controller made on the surface, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    Entry(Entry),
    Blank(EntryKey),
    Pending(EntryKey, Draft),
    SubmitEnabled(bool),
    ReadOnly(bool),
}

#[derive(Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl DisplaySurface for RecordingSurface {
    fn render_entry(&mut self, entry: &Entry) {
        self.calls.push(SurfaceCall::Entry(entry.clone()));
    }

    fn render_blank(&mut self, key: &EntryKey) {
        self.calls.push(SurfaceCall::Blank(key.clone()));
    }

    fn render_pending(&mut self, key: &EntryKey, draft: &Draft) {
        self.calls.push(SurfaceCall::Pending(key.clone(), draft.clone()));
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.calls.push(SurfaceCall::SubmitEnabled(enabled));
    }

    fn set_fields_read_only(&mut self, read_only: bool) {
        self.calls.push(SurfaceCall::ReadOnly(read_only));
    }
}

pub struct StaticCredential(pub Option<&'static str>);

impl CredentialSource for StaticCredential {
    fn get_api_key(&self) -> Result<String, ConfigError> {
        self.0
            .map(str::to_string)
            .ok_or(ConfigError::MissingCredential("OPENAI_API_KEY"))
    }
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Diary controller whose "today" is 2024-01-01.
pub fn diary_controller() -> InteractionController {
    InteractionController::with_today(Mode::Diary, day(2024, 1, 1))
}
