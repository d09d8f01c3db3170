//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI, and
//! translates keyboard events into `core::Action` values. `TuiState` is the
//! `DisplaySurface` the controller drives.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Waiting** (a completion call in flight): draws every ~80ms so the
//!   spinner animates.
//! - **Idle**: sleeps up to 500ms and only redraws on events or responses.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;

use crate::Mode;
use crate::core::action::{Action, Effect, update};
use crate::core::config::{ConfigError, ResolvedConfig};
use crate::core::entry::{Draft, Entry, EntryKey};
use crate::core::state::{CompletionJob, InteractionController};
use crate::core::surface::DisplaySurface;
use crate::inference::{CompletionClient, OpenAiProvider, response_text};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    CalendarEvent, CalendarState, ChatLogState, EntryForm, FieldEvent, FormEvent, TextField,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI presentation state, and the controller's display surface.
pub struct TuiState {
    mode: Mode,
    model_name: String,
    // Diary
    calendar: CalendarState,
    form: Option<EntryForm>,
    // Chat
    chat_log: ChatLogState,
    input: TextField,
    submit_enabled: bool,
}

impl TuiState {
    pub fn new(mode: Mode, model_name: String, today: NaiveDate) -> Self {
        Self {
            mode,
            model_name,
            calendar: CalendarState::new(today),
            form: None,
            chat_log: ChatLogState::new(),
            input: TextField::new("Message", true).submit_on_enter(),
            submit_enabled: false,
        }
    }

    fn open_form(&mut self, key: &EntryKey) {
        self.form = Some(EntryForm::new(key.clone()));
    }

    /// The open form, if it shows `key`.
    fn form_for(&mut self, key: &EntryKey) -> Option<&mut EntryForm> {
        self.form.as_mut().filter(|form| &form.key == key)
    }

    fn input_draft(&self) -> Draft {
        Draft::new(None, self.input.text())
    }
}

impl DisplaySurface for TuiState {
    fn render_entry(&mut self, entry: &Entry) {
        match self.mode {
            Mode::Diary => {
                if let Some(form) = self.form_for(&entry.key) {
                    form.show_entry(entry);
                }
            }
            Mode::Chat => self.chat_log.finalize(entry),
        }
    }

    fn render_blank(&mut self, key: &EntryKey) {
        if let Some(form) = self.form.as_mut() {
            form.show_blank(key);
        }
    }

    fn render_pending(&mut self, key: &EntryKey, draft: &Draft) {
        match self.mode {
            Mode::Diary => {
                if let Some(form) = self.form_for(key) {
                    form.show_pending(key, draft);
                }
            }
            Mode::Chat => {
                self.chat_log.push_pending(key, &draft.content);
                self.input.clear();
            }
        }
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
        if let Some(form) = self.form.as_mut() {
            form.set_submit_enabled(enabled);
        }
    }

    fn set_fields_read_only(&mut self, read_only: bool) {
        match self.mode {
            Mode::Diary => {
                if let Some(form) = self.form.as_mut() {
                    form.set_read_only(read_only);
                }
            }
            Mode::Chat => self.input.read_only = read_only,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock // Non-blinking: draw() resets the blink timer
        )?;
        info!("Terminal modes enabled (bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableBracketedPaste, SetCursorStyle::DefaultUserShape);
    }
}

/// Build the completion client. Asks the credential source for the key once.
pub fn build_client(config: &ResolvedConfig) -> Result<Arc<dyn CompletionClient>, ConfigError> {
    let provider = OpenAiProvider::new(
        config,
        config.model_name.clone(),
        Some(config.openai_base_url.clone()),
    )?;
    info!(
        "Completion client ready: {} ({})",
        provider.model(),
        config.openai_base_url
    );
    Ok(Arc::new(provider))
}

/// Runs the event loop until the user quits. Must be called inside a tokio runtime.
pub fn run(config: ResolvedConfig, client: Arc<dyn CompletionClient>) -> std::io::Result<()> {
    let mut controller = InteractionController::new(config.mode);
    let mut tui = TuiState::new(config.mode, config.model_name.clone(), controller.today());

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Completion results from background tasks
    let (tx, rx) = mpsc::channel();

    let start_time = Instant::now();
    let mut needs_redraw = true;

    'event_loop: loop {
        let waiting = controller.has_pending();
        if waiting {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &controller, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if waiting {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain every pending event before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if matches!(event, TuiEvent::Resize) {
                continue;
            }
            let actions = match event {
                TuiEvent::ForceQuit => vec![Action::Quit],
                _ => match controller.mode() {
                    Mode::Diary => diary_actions(&mut tui, &event),
                    Mode::Chat => chat_actions(&mut tui, &event),
                },
            };
            for action in actions {
                if dispatch(&mut controller, &mut tui, action, &client, &tx) == Effect::Quit {
                    break 'event_loop;
                }
            }
        }

        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if dispatch(&mut controller, &mut tui, action, &client, &tx) == Effect::Quit {
                break 'event_loop;
            }
        }
    }

    info!(
        "Shutting down with {} entries (discarded)",
        controller.store().len()
    );
    ratatui::restore();
    Ok(())
}

/// Apply `action` and run the effect it asks for.
fn dispatch(
    controller: &mut InteractionController,
    tui: &mut TuiState,
    action: Action,
    client: &Arc<dyn CompletionClient>,
    tx: &mpsc::Sender<Action>,
) -> Effect {
    let chat_submit = matches!(action, Action::Submit { .. }) && controller.mode() == Mode::Chat;
    let effect = update(controller, tui, action);
    if let Effect::RequestCompletion(job) = &effect {
        spawn_completion(client.clone(), job.clone(), tx.clone());
        if chat_submit {
            // render_pending cleared the input; keep the controller's draft in step.
            let draft = tui.input_draft();
            update(controller, tui, Action::TextChanged(draft));
        }
    }
    effect
}

/// Events for diary mode: the popup form takes everything while open.
fn diary_actions(tui: &mut TuiState, event: &TuiEvent) -> Vec<Action> {
    if let Some(form) = tui.form.as_mut() {
        let key = form.key.clone();
        return match form.handle_event(event) {
            Some(FormEvent::Changed(draft)) => vec![Action::TextChanged(draft)],
            Some(FormEvent::Submit(draft)) => vec![Action::Submit {
                key: Some(key),
                draft,
            }],
            Some(FormEvent::Close) => {
                tui.form = None;
                vec![Action::SelectionCleared]
            }
            None => Vec::new(),
        };
    }

    match tui.calendar.handle_event(event) {
        Some(CalendarEvent::Open(date)) => {
            let key = EntryKey::Date(date);
            tui.open_form(&key);
            vec![Action::SelectionChanged(key)]
        }
        Some(CalendarEvent::Quit) => vec![Action::Quit],
        None => Vec::new(),
    }
}

/// Events for chat mode: scrolling goes to the log, the rest to the input.
fn chat_actions(tui: &mut TuiState, event: &TuiEvent) -> Vec<Action> {
    match event {
        TuiEvent::Escape => vec![Action::Quit],
        TuiEvent::PageUp | TuiEvent::PageDown => {
            tui.chat_log.handle_event(event);
            Vec::new()
        }
        _ => match tui.input.handle_event(event) {
            Some(FieldEvent::Changed) => vec![Action::TextChanged(tui.input_draft())],
            Some(FieldEvent::Enter) if tui.submit_enabled => vec![Action::Submit {
                key: None,
                draft: tui.input_draft(),
            }],
            Some(FieldEvent::Enter) => {
                debug!("Enter ignored: nothing to send or a message is in flight");
                Vec::new()
            }
            None => Vec::new(),
        },
    }
}

fn spawn_completion(
    client: Arc<dyn CompletionClient>,
    job: CompletionJob,
    tx: mpsc::Sender<Action>,
) {
    info!("Spawning completion request for {}", job.key);
    tokio::spawn(async move {
        let response = response_text(client.complete(&job.prompt).await);
        if tx
            .send(Action::ResponseReceived {
                key: job.key.clone(),
                response,
            })
            .is_err()
        {
            warn!("Failed to send response for {}: receiver dropped", job.key);
        }
    });
}
