//! # Interaction Controller
//!
//! All session state in one place, plus the per-key state machine:
//!
//! ```text
//!            submit (valid)              response
//! Editable ─────────────────▶ Pending ─────────────▶ Finalized   (diary)
//!                                    └────────────▶ stored,     (chat: every
//!                                                   key is new)  message gets
//!                                                                a fresh key)
//! ```
//!
//! ```text
//! InteractionController
//! ├── mode: Mode                       // diary or chat
//! ├── store: SessionStore              // finalized entries
//! ├── pending: BTreeMap<Key, Draft>    // submissions awaiting a response
//! ├── draft: Draft                     // last text reported by the surface
//! ├── selected: Option<EntryKey>       // diary day currently open
//! ├── next_sequence: u64               // next chat key
//! └── today: NaiveDate                 // latest writable diary day
//! ```
//!
//! Submission is split in two (`begin_submission` / `finish_submission`) so
//! the completion call can run off the UI thread. A key stays in `pending`
//! between the halves, which is what keeps a second submit from racing the
//! first.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use log::{debug, info, warn};

use crate::Mode;
use crate::core::entry::{Draft, Entry, EntryKey, Rejection};
use crate::core::store::SessionStore;
use crate::core::surface::DisplaySurface;
use crate::inference::{CompletionClient, response_text};

/// A validated submission that still needs its completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionJob {
    pub key: EntryKey,
    pub prompt: String,
}

/// Where a key stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Editable,
    Pending,
    Finalized,
}

pub struct InteractionController {
    mode: Mode,
    store: SessionStore,
    pending: BTreeMap<EntryKey, Draft>,
    draft: Draft,
    selected: Option<EntryKey>,
    next_sequence: u64,
    today: NaiveDate,
}

impl InteractionController {
    pub fn new(mode: Mode) -> Self {
        Self::with_today(mode, Local::now().date_naive())
    }

    /// Controller whose notion of "today" is fixed, for tests and replays.
    pub fn with_today(mode: Mode, today: NaiveDate) -> Self {
        Self {
            mode,
            store: SessionStore::new(),
            pending: BTreeMap::new(),
            draft: Draft::default(),
            selected: None,
            next_sequence: 1,
            today,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected(&self) -> Option<&EntryKey> {
        self.selected.as_ref()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Keys whose completion call is still in flight.
    pub fn pending_keys(&self) -> impl Iterator<Item = &EntryKey> {
        self.pending.keys()
    }

    pub fn key_state(&self, key: &EntryKey) -> KeyState {
        if self.pending.contains_key(key) {
            KeyState::Pending
        } else if self.mode == Mode::Diary && self.store.contains(key) {
            KeyState::Finalized
        } else {
            KeyState::Editable
        }
    }

    /// The submit-affordance predicate: would a submit right now be accepted?
    pub fn can_submit(&self) -> bool {
        if !self.draft.is_submittable(self.mode) {
            return false;
        }
        match self.mode {
            Mode::Diary => self
                .selected
                .as_ref()
                .is_some_and(|key| self.check_diary_key(key).is_ok()),
            Mode::Chat => self.pending.is_empty(),
        }
    }

    fn check_diary_key(&self, key: &EntryKey) -> Result<(), Rejection> {
        let date = key
            .as_date()
            .ok_or_else(|| Rejection::InvalidKey(key.clone()))?;
        if date > self.today {
            return Err(Rejection::FutureDate(date));
        }
        match self.key_state(key) {
            KeyState::Editable => Ok(()),
            KeyState::Pending => Err(Rejection::InFlight(key.clone())),
            KeyState::Finalized => Err(Rejection::AlreadyFinalized(key.clone())),
        }
    }

    /// The surface reports new field contents.
    pub fn text_changed(&mut self, draft: Draft, surface: &mut dyn DisplaySurface) {
        self.draft = draft;
        surface.set_submit_enabled(self.can_submit());
    }

    /// The surface opened `key` (diary mode). Renders stored, pending or blank state.
    pub fn selection_changed(&mut self, key: EntryKey, surface: &mut dyn DisplaySurface) {
        if self.mode == Mode::Chat {
            debug!("Ignoring selection of {key} in chat mode");
            return;
        }
        self.draft = Draft::default();
        self.selected = Some(key.clone());

        if let Some(entry) = self.store.get(&key) {
            debug!("Opening finalized entry {key}");
            surface.render_entry(entry);
            surface.set_fields_read_only(true);
            surface.set_submit_enabled(false);
            return;
        }

        if let Some(draft) = self.pending.get(&key) {
            debug!("Opening pending entry {key}");
            surface.render_pending(&key, draft);
            surface.set_fields_read_only(true);
            surface.set_submit_enabled(false);
            return;
        }

        surface.render_blank(&key);
        let writable = self.check_diary_key(&key).is_ok();
        if !writable {
            debug!("Opening {key} read-only");
        }
        surface.set_fields_read_only(!writable);
        surface.set_submit_enabled(false);
    }

    /// The surface closed the open entry.
    pub fn selection_cleared(&mut self) {
        self.selected = None;
        self.draft = Draft::default();
    }

    /// Validates a submission and marks its key pending.
    ///
    /// Diary mode uses `key`, falling back to the selected day. Chat mode
    /// ignores `key` and allocates the next sequence number.
    pub fn begin_submission(
        &mut self,
        key: Option<EntryKey>,
        draft: Draft,
        surface: &mut dyn DisplaySurface,
    ) -> Result<CompletionJob, Rejection> {
        draft.check(self.mode)?;
        let draft = draft.normalized(self.mode);

        let key = match self.mode {
            Mode::Diary => {
                let key = key
                    .or_else(|| self.selected.clone())
                    .ok_or(Rejection::MissingKey)?;
                self.check_diary_key(&key)?;
                key
            }
            Mode::Chat => {
                if let Some(busy) = self.pending.keys().next() {
                    return Err(Rejection::InFlight(busy.clone()));
                }
                let key = EntryKey::Sequence(self.next_sequence);
                self.next_sequence += 1;
                key
            }
        };

        info!(
            "Submitting entry {key} ({} chars of content)",
            draft.content.chars().count()
        );
        surface.render_pending(&key, &draft);
        surface.set_fields_read_only(true);
        surface.set_submit_enabled(false);

        let job = CompletionJob {
            key: key.clone(),
            prompt: draft.content.clone(),
        };
        self.pending.insert(key, draft);
        Ok(job)
    }

    /// Stores the response for a pending key and renders the finished entry.
    pub fn finish_submission(
        &mut self,
        key: EntryKey,
        response: String,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Entry, Rejection> {
        let Some(draft) = self.pending.remove(&key) else {
            warn!("Dropping response for {key}: nothing pending");
            return Err(Rejection::NotPending(key));
        };

        let entry = draft.into_entry(key, response);
        self.store.put(entry.clone());
        info!("Finalized entry {} ({} entries stored)", entry.key, self.store.len());

        surface.render_entry(&entry);
        match self.mode {
            Mode::Diary => {
                if self.selected.as_ref() == Some(&entry.key) {
                    surface.set_fields_read_only(true);
                    surface.set_submit_enabled(false);
                }
            }
            Mode::Chat => {
                surface.set_fields_read_only(false);
                surface.set_submit_enabled(self.can_submit());
            }
        }
        Ok(entry)
    }

    /// Runs a whole submission, awaiting the completion call in place.
    pub async fn submit(
        &mut self,
        client: &dyn CompletionClient,
        key: Option<EntryKey>,
        draft: Draft,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Entry, Rejection> {
        let job = self.begin_submission(key, draft, surface)?;
        let response = response_text(client.complete(&job.prompt).await);
        self.finish_submission(job.key, response, surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::CompletionError;
    use crate::test_support::{RecordingSurface, ScriptedClient, SurfaceCall, day, diary_controller};

    fn key(s: &str) -> EntryKey {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_controller_defaults() {
        let controller = diary_controller();
        assert_eq!(controller.mode(), Mode::Diary);
        assert!(controller.store().is_empty());
        assert!(controller.selected().is_none());
        assert!(!controller.can_submit());
    }

    #[test]
    fn test_invalid_drafts_leave_store_untouched() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let cases = [
            Draft::new(None, "content"),
            Draft::new(Some(""), "content"),
            Draft::new(Some("  "), "content"),
            Draft::new(Some("Title"), ""),
            Draft::new(Some("Title"), " \n "),
        ];
        for draft in cases {
            let result = controller.begin_submission(Some(key("2024-01-01")), draft, &mut surface);
            assert!(matches!(
                result,
                Err(Rejection::EmptyTitle | Rejection::EmptyContent)
            ));
        }
        assert!(controller.store().is_empty());
        assert!(!controller.has_pending());
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_text_changed_drives_submit_affordance() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        controller.selection_changed(key("2024-01-01"), &mut surface);
        surface.calls.clear();

        controller.text_changed(Draft::new(Some("Morning"), ""), &mut surface);
        controller.text_changed(Draft::new(Some("Morning"), "Ran"), &mut surface);
        controller.text_changed(Draft::new(Some(" "), "Ran"), &mut surface);

        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::SubmitEnabled(false),
                SurfaceCall::SubmitEnabled(true),
                SurfaceCall::SubmitEnabled(false),
            ]
        );
    }

    #[test]
    fn test_diary_needs_a_selected_day() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        controller.text_changed(Draft::new(Some("t"), "c"), &mut surface);
        assert!(!controller.can_submit());
        let result = controller.begin_submission(None, Draft::new(Some("t"), "c"), &mut surface);
        assert_eq!(result, Err(Rejection::MissingKey));
    }

    #[test]
    fn test_diary_rejects_sequence_keys() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let result = controller.begin_submission(
            Some(EntryKey::Sequence(1)),
            Draft::new(Some("t"), "c"),
            &mut surface,
        );
        assert_eq!(result, Err(Rejection::InvalidKey(EntryKey::Sequence(1))));
    }

    #[test]
    fn test_future_dates_are_not_writable() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let tomorrow = EntryKey::Date(day(2024, 1, 2));

        controller.selection_changed(tomorrow.clone(), &mut surface);
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::Blank(tomorrow.clone()),
                SurfaceCall::ReadOnly(true),
                SurfaceCall::SubmitEnabled(false),
            ]
        );

        controller.text_changed(Draft::new(Some("t"), "c"), &mut surface);
        assert!(!controller.can_submit());
        let result = controller.begin_submission(Some(tomorrow), Draft::new(Some("t"), "c"), &mut surface);
        assert_eq!(result, Err(Rejection::FutureDate(day(2024, 1, 2))));
    }

    #[test]
    fn test_begin_marks_pending_and_disables_form() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let draft = Draft::new(Some(" Morning "), " I went for a run. ");

        let job = controller
            .begin_submission(Some(key("2024-01-01")), draft, &mut surface)
            .unwrap();

        assert_eq!(job.prompt, "I went for a run.");
        assert_eq!(controller.key_state(&job.key), KeyState::Pending);
        assert_eq!(controller.pending_keys().collect::<Vec<_>>(), vec![&job.key]);
        assert!(controller.store().is_empty());
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::Pending(job.key.clone(), Draft::new(Some("Morning"), "I went for a run.")),
                SurfaceCall::ReadOnly(true),
                SurfaceCall::SubmitEnabled(false),
            ]
        );
    }

    #[test]
    fn test_second_submit_while_pending_is_refused() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let k = key("2024-01-01");
        controller
            .begin_submission(Some(k.clone()), Draft::new(Some("a"), "first"), &mut surface)
            .unwrap();
        let second = controller.begin_submission(Some(k.clone()), Draft::new(Some("b"), "second"), &mut surface);
        assert_eq!(second, Err(Rejection::InFlight(k.clone())));

        let entry = controller
            .finish_submission(k.clone(), "ok".to_string(), &mut surface)
            .unwrap();
        assert_eq!(entry.content, "first");
        assert_eq!(controller.store().len(), 1);
    }

    #[test]
    fn test_finish_without_pending_is_refused() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let result = controller.finish_submission(key("2024-01-01"), "late".to_string(), &mut surface);
        assert_eq!(result, Err(Rejection::NotPending(key("2024-01-01"))));
        assert!(controller.store().is_empty());
    }

    #[test]
    fn test_finalized_entry_is_immutable() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let client = ScriptedClient::replying("Great job staying active!");
        let k = key("2024-01-01");

        let stored = tokio_test::block_on(controller.submit(
            &client,
            Some(k.clone()),
            Draft::new(Some("Morning"), "I went for a run."),
            &mut surface,
        ))
        .unwrap();

        let before = controller.store().get(&k).cloned().unwrap();
        assert_eq!(before, stored);

        let again = tokio_test::block_on(controller.submit(
            &client,
            Some(k.clone()),
            Draft::new(Some("Evening"), "Actually I napped."),
            &mut surface,
        ));
        assert_eq!(again, Err(Rejection::AlreadyFinalized(k.clone())));
        assert_eq!(controller.store().get(&k), Some(&before));
        assert_eq!(client.prompts(), vec!["I went for a run.".to_string()]);
    }

    #[test]
    fn test_opening_stored_entry_is_read_only() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let client = ScriptedClient::replying("Nice.");
        let k = key("2024-01-01");
        let entry = tokio_test::block_on(controller.submit(
            &client,
            Some(k.clone()),
            Draft::new(Some("Walk"), "Walked the dog."),
            &mut surface,
        ))
        .unwrap();
        controller.selection_cleared();
        surface.calls.clear();

        controller.selection_changed(k, &mut surface);

        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::Entry(entry),
                SurfaceCall::ReadOnly(true),
                SurfaceCall::SubmitEnabled(false),
            ]
        );
        controller.text_changed(Draft::new(Some("x"), "y"), &mut surface);
        assert!(!controller.can_submit());
    }

    #[test]
    fn test_opening_pending_entry_shows_draft() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let k = key("2024-01-01");
        controller
            .begin_submission(Some(k.clone()), Draft::new(Some("t"), "c"), &mut surface)
            .unwrap();
        surface.calls.clear();

        controller.selection_changed(k.clone(), &mut surface);
        assert_eq!(
            surface.calls,
            vec![
                SurfaceCall::Pending(k, Draft::new(Some("t"), "c")),
                SurfaceCall::ReadOnly(true),
                SurfaceCall::SubmitEnabled(false),
            ]
        );
    }

    #[test]
    fn test_response_for_other_day_leaves_open_form_alone() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let first = key("2023-12-30");
        controller
            .begin_submission(Some(first.clone()), Draft::new(Some("t"), "c"), &mut surface)
            .unwrap();
        controller.selection_changed(key("2023-12-31"), &mut surface);
        surface.calls.clear();

        let entry = controller
            .finish_submission(first, "r".to_string(), &mut surface)
            .unwrap();
        assert_eq!(surface.calls, vec![SurfaceCall::Entry(entry)]);
    }

    #[test]
    fn test_errors_are_stored_as_response_text() {
        let mut controller = diary_controller();
        let mut surface = RecordingSurface::default();
        let client = ScriptedClient::failing(CompletionError::RateLimitExceeded);
        let entry = tokio_test::block_on(controller.submit(
            &client,
            Some(key("2024-01-01")),
            Draft::new(Some("t"), "c"),
            &mut surface,
        ))
        .unwrap();
        assert_eq!(entry.response, CompletionError::RateLimitExceeded.to_string());
    }

    #[test]
    fn test_chat_allocates_sequence_keys() {
        let mut controller = InteractionController::with_today(Mode::Chat, day(2024, 1, 1));
        let mut surface = RecordingSurface::default();
        let client = ScriptedClient::replying("pong");

        for expected in 1..=3 {
            let entry = tokio_test::block_on(controller.submit(
                &client,
                None,
                Draft::new(Some("dropped"), "ping"),
                &mut surface,
            ))
            .unwrap();
            assert_eq!(entry.key, EntryKey::Sequence(expected));
            assert_eq!(entry.title, None);
        }
        assert_eq!(controller.store().len(), 3);
        assert_eq!(client.prompts().len(), 3);
    }

    #[test]
    fn test_chat_allows_one_pending_message() {
        let mut controller = InteractionController::with_today(Mode::Chat, day(2024, 1, 1));
        let mut surface = RecordingSurface::default();
        let job = controller
            .begin_submission(None, Draft::new(None, "one"), &mut surface)
            .unwrap();
        let second = controller.begin_submission(None, Draft::new(None, "two"), &mut surface);
        assert_eq!(second, Err(Rejection::InFlight(job.key.clone())));

        controller.text_changed(Draft::new(None, "two"), &mut surface);
        assert!(!controller.can_submit());

        surface.calls.clear();
        controller
            .finish_submission(job.key, "ok".to_string(), &mut surface)
            .unwrap();
        assert!(controller.can_submit());
        assert_eq!(surface.calls.last(), Some(&SurfaceCall::SubmitEnabled(true)));
        assert!(surface.calls.contains(&SurfaceCall::ReadOnly(false)));
    }

    #[test]
    fn test_chat_ignores_selection() {
        let mut controller = InteractionController::with_today(Mode::Chat, day(2024, 1, 1));
        let mut surface = RecordingSurface::default();
        controller.selection_changed(EntryKey::Sequence(1), &mut surface);
        assert!(surface.calls.is_empty());
        assert!(controller.selected().is_none());
    }
}
