//! # ChatLog Component
//!
//! Scrollable transcript for chat mode: each message the user sent followed
//! by its response, or a placeholder while the request is in flight.
//!
//! `ChatLogState` lives in `TuiState` and is fed by the `DisplaySurface`
//! calls. `ChatLog` wraps it for one frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::entry::{Entry, EntryKey};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub struct ChatItem {
    pub key: EntryKey,
    pub prompt: String,
    /// `None` while the request is in flight
    pub response: Option<String>,
}

pub struct ChatLogState {
    pub items: Vec<ChatItem>,
    /// First visible wrapped line
    pub scroll_offset: u16,
    /// When true, follow new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for page scrolling between frames)
    pub viewport_height: u16,
    max_scroll: u16,
}

impl Default for ChatLogState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatLogState {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            scroll_offset: 0,
            stick_to_bottom: true,
            viewport_height: 0,
            max_scroll: 0,
        }
    }

    pub fn push_pending(&mut self, key: &EntryKey, prompt: &str) {
        self.items.push(ChatItem {
            key: key.clone(),
            prompt: prompt.to_string(),
            response: None,
        });
        self.stick_to_bottom = true;
    }

    /// Fill in the response for `entry.key`, appending if the key is unknown.
    pub fn finalize(&mut self, entry: &Entry) {
        let item = ChatItem {
            key: entry.key.clone(),
            prompt: entry.content.clone(),
            response: Some(entry.response.clone()),
        };
        match self.items.iter_mut().find(|i| i.key == entry.key) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.stick_to_bottom = true;
    }

    fn page(&self) -> u16 {
        self.viewport_height.saturating_sub(1).max(1)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let you = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        let bot = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
        let waiting = Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC);

        let mut lines = Vec::new();
        for item in &self.items {
            lines.push(Line::from(Span::styled("You", you)));
            lines.extend(item.prompt.lines().map(|l| Line::raw(l.to_string())));
            lines.push(Line::from(Span::styled("Daily Talk", bot)));
            match &item.response {
                Some(response) => {
                    lines.extend(response.lines().map(|l| Line::raw(l.to_string())));
                }
                None => lines.push(Line::from(Span::styled("Waiting for a response...", waiting))),
            }
            lines.push(Line::default());
        }
        lines
    }
}

impl EventHandler for ChatLogState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.page());
                self.stick_to_bottom = false;
            }
            TuiEvent::PageDown => {
                self.scroll_offset = (self.scroll_offset + self.page()).min(self.max_scroll);
                self.stick_to_bottom = self.scroll_offset >= self.max_scroll;
            }
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the chat transcript.
pub struct ChatLog<'a> {
    state: &'a mut ChatLogState,
}

impl<'a> ChatLog<'a> {
    pub fn new(state: &'a mut ChatLogState) -> Self {
        Self { state }
    }
}

impl Component for ChatLog<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);

        if self.state.items.is_empty() {
            let hint = Paragraph::new("Say something to start the conversation.")
                .style(Style::default().fg(Color::DarkGray))
                .centered()
                .block(block);
            frame.render_widget(hint, area);
            return;
        }

        let paragraph = Paragraph::new(self.state.lines()).wrap(Wrap { trim: false });
        let total = paragraph.line_count(inner.width) as u16;

        let state = &mut *self.state;
        state.viewport_height = inner.height;
        state.max_scroll = total.saturating_sub(inner.height);
        if state.stick_to_bottom {
            state.scroll_offset = state.max_scroll;
        }
        state.scroll_offset = state.scroll_offset.min(state.max_scroll);

        frame.render_widget(block, area);
        frame.render_widget(paragraph.scroll((state.scroll_offset, 0)), inner);
    }
}
