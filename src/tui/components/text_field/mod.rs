//! # TextField Component
//!
//! Editable text with a bordered frame. Used for the diary title and body
//! and for the chat input.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste)
//! - Handle editing (backspace, delete, cursor movement)
//! - Refuse edits while read-only
//! - Report content changes to the parent
//!
//! ## State Management
//!
//! The buffer is internal state. `read_only`, `focused` and `multiline` are
//! props set by the parent. Cursor position and scroll state are
//! encapsulated in `CursorState`.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    VERTICAL_OVERHEAD, inner_width, next_char_boundary, prev_char_boundary, visible_lines,
    wrap_line_count, wrap_lines,
};

/// High-level events emitted by the TextField
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Buffer contents changed
    Changed,
    /// Enter pressed where it does not insert a newline
    Enter,
}

pub struct TextField {
    /// Text buffer (Internal State)
    buffer: String,
    /// Block title (Prop)
    pub label: String,
    /// Edits are refused while set (Prop)
    pub read_only: bool,
    /// Draw the cursor and highlight the border (Prop)
    pub focused: bool,
    /// Newlines are kept; Enter inserts one unless `enter_submits` (Prop)
    pub multiline: bool,
    /// Enter emits `FieldEvent::Enter` even in a multiline field (Prop)
    pub enter_submits: bool,
    cursor: CursorState,
}

impl TextField {
    pub fn new(label: &str, multiline: bool) -> Self {
        Self {
            buffer: String::new(),
            label: label.to_string(),
            read_only: false,
            focused: false,
            multiline,
            enter_submits: !multiline,
            cursor: CursorState::new(),
        }
    }

    /// Multiline field where Enter submits and Ctrl+J inserts the newline.
    pub fn submit_on_enter(mut self) -> Self {
        self.enter_submits = true;
        self
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the contents and park the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor.pos = self.buffer.len();
        self.cursor.scroll_offset = 0;
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor.reset();
    }

    /// Height needed to show the whole buffer, capped at `max_lines` rows of text.
    pub fn calculate_height(&self, content_width: u16, max_lines: u16) -> u16 {
        let lines = wrap_line_count(&self.buffer, inner_width(content_width));
        lines.min(max_lines).max(1) + VERTICAL_OVERHEAD
    }

    fn insert_str(&mut self, text: &str) -> Option<FieldEvent> {
        let text = if self.multiline {
            text.replace("\r\n", "\n")
        } else {
            text.replace(['\r', '\n'], " ")
        };
        self.buffer.insert_str(self.cursor.pos, &text);
        self.cursor.pos += text.len();
        Some(FieldEvent::Changed)
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        let visible = visible_lines(area.height);
        self.cursor
            .update_scroll_offset(&self.buffer, area.width, visible);

        let lines = wrap_lines(&self.buffer, inner_width(area.width));
        let start = (self.cursor.scroll_offset as usize).min(lines.len());
        let end = (start + visible as usize).min(lines.len());
        let visible_text = lines[start..end].join("\n");

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let text_style = if self.read_only {
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::White)
        };
        let title = if self.read_only {
            format!("{} (read-only)", self.label)
        } else {
            self.label.clone()
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1))
            .title(title);
        frame.render_widget(Paragraph::new(visible_text).block(block).style(text_style), area);

        if self.focused && !self.read_only {
            let (x, y) = self.cursor.screen_pos(&self.buffer, area);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.read_only {
            return None;
        }
        match event {
            TuiEvent::InputChar('\n') if !self.multiline => None,
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor.pos, *c);
                self.cursor.pos += c.len_utf8();
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => self.insert_str(text),
            TuiEvent::Submit if self.enter_submits => Some(FieldEvent::Enter),
            TuiEvent::Submit => self.insert_str("\n"),
            TuiEvent::Backspace => {
                if self.cursor.pos > 0 {
                    let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(prev..self.cursor.pos);
                    self.cursor.pos = prev;
                    Some(FieldEvent::Changed)
                } else {
                    None
                }
            }
            TuiEvent::Delete => {
                if self.cursor.pos < self.buffer.len() {
                    let next = next_char_boundary(&self.buffer, self.cursor.pos);
                    self.buffer.drain(self.cursor.pos..next);
                    Some(FieldEvent::Changed)
                } else {
                    None
                }
            }
            TuiEvent::CursorLeft => {
                if self.cursor.pos > 0 {
                    self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor.pos < self.buffer.len() {
                    self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                }
                None
            }
            TuiEvent::Home => {
                self.cursor.pos = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                None
            }
            TuiEvent::End => {
                self.cursor.pos = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                None
            }
            TuiEvent::CursorUp => {
                self.cursor.move_vertically(&self.buffer, -1);
                None
            }
            TuiEvent::CursorDown => {
                self.cursor.move_vertically(&self.buffer, 1);
                None
            }
            _ => None,
        }
    }
}
