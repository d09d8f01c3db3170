//! # EntryForm Component
//!
//! Popup over the calendar for one diary day: title, content and the
//! response once it arrives. Opened with Enter on a day, closed with Esc.
//!
//! The form holds no business rules. The controller decides what it shows
//! and whether it is editable through the `DisplaySurface` calls, which
//! `TuiState` forwards to the `show_*` and `set_*` methods here.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::core::entry::{Draft, Entry, EntryKey};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FieldEvent, TextField};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Title,
    Content,
}

/// Events emitted by the entry form.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Changed(Draft),
    Submit(Draft),
    Close,
}

pub struct EntryForm {
    pub key: EntryKey,
    title: TextField,
    content: TextField,
    response: Option<String>,
    pending: bool,
    read_only: bool,
    submit_enabled: bool,
    focus: Focus,
}

impl EntryForm {
    pub fn new(key: EntryKey) -> Self {
        Self {
            key,
            title: TextField::new("Title", false),
            content: TextField::new("Entry", true),
            response: None,
            pending: false,
            read_only: false,
            submit_enabled: false,
            focus: Focus::Title,
        }
    }

    pub fn show_blank(&mut self, key: &EntryKey) {
        self.key = key.clone();
        self.title.clear();
        self.content.clear();
        self.response = None;
        self.pending = false;
        self.focus = Focus::Title;
    }

    pub fn show_entry(&mut self, entry: &Entry) {
        self.key = entry.key.clone();
        self.title.set_text(entry.title.as_deref().unwrap_or_default());
        self.content.set_text(&entry.content);
        self.response = Some(entry.response.clone());
        self.pending = false;
    }

    pub fn show_pending(&mut self, key: &EntryKey, draft: &Draft) {
        self.key = key.clone();
        self.title.set_text(draft.title.as_deref().unwrap_or_default());
        self.content.set_text(&draft.content);
        self.response = None;
        self.pending = true;
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
        self.title.read_only = read_only;
        self.content.read_only = read_only;
    }

    pub fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn draft(&self) -> Draft {
        Draft::new(Some(self.title.text()), self.content.text())
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Title => Focus::Content,
            Focus::Content => Focus::Title,
        };
    }

    fn help_text(&self) -> &'static str {
        if self.read_only {
            " Esc Close "
        } else if self.submit_enabled {
            " Tab Next field  Ctrl+S Save  Esc Close "
        } else {
            " Tab Next field  Esc Close "
        }
    }
}

impl EventHandler for EntryForm {
    type Event = FormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => return Some(FormEvent::Close),
            TuiEvent::NextField => {
                self.toggle_focus();
                return None;
            }
            TuiEvent::SaveEntry => {
                return self.submit_enabled.then(|| FormEvent::Submit(self.draft()));
            }
            _ => {}
        }

        let field = match self.focus {
            Focus::Title => &mut self.title,
            Focus::Content => &mut self.content,
        };
        match field.handle_event(event)? {
            FieldEvent::Changed => Some(FormEvent::Changed(self.draft())),
            FieldEvent::Enter => {
                self.focus = Focus::Content;
                None
            }
        }
    }
}

impl Component for EntryForm {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(80, 80, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", self.key))
            .title_bottom(Line::from(self.help_text()).centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [title_area, content_area, response_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Percentage(40),
        ])
        .areas(inner);

        let editing = !self.read_only;
        self.title.focused = editing && self.focus == Focus::Title;
        self.content.focused = editing && self.focus == Focus::Content;
        self.title.render(frame, title_area);
        self.content.render(frame, content_area);

        let (text, style) = match (&self.response, self.pending) {
            (Some(response), _) => (response.clone(), Style::default().fg(Color::Green)),
            (None, true) => (
                "Waiting for a response...".to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            ),
            (None, false) => (String::new(), Style::default()),
        };
        let response = Paragraph::new(text)
            .style(style)
            .wrap(Wrap { trim: false })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .padding(Padding::horizontal(1))
                    .title("Response"),
            );
        frame.render_widget(response, response_area);
    }
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}
