//! # TitleBar Component
//!
//! Single-line status bar at the top of the screen.
//!
//! TitleBar is purely presentational: every field is a prop set by the
//! parent each frame. The text changes with state:
//!
//! 1. **Status message**: `"Daily Talk · Diary (model: gpt-3.5-turbo) | ⠋ Waiting for a response"`
//! 2. **Default**: `"Daily Talk · Diary (model: gpt-3.5-turbo)"`

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::Mode;
use crate::tui::component::Component;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub mode: Mode,
    /// Model identifier sent with every request
    pub model_name: String,
    /// Transient status, empty when idle
    pub status_message: String,
    /// Spinner frame; `None` hides the spinner
    pub spinner_frame: Option<usize>,
}

impl TitleBar {
    pub fn new(mode: Mode, model_name: String) -> Self {
        Self {
            mode,
            model_name,
            status_message: String::new(),
            spinner_frame: None,
        }
    }

    fn text(&self) -> String {
        let base = format!(
            "Daily Talk · {} (model: {})",
            self.mode.label(),
            self.model_name
        );
        match (self.status_message.is_empty(), self.spinner_frame) {
            (true, _) => base,
            (false, Some(frame)) => format!(
                "{base} | {} {}",
                SPINNER[frame % SPINNER.len()],
                self.status_message
            ),
            (false, None) => format!("{base} | {}", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
        frame.render_widget(Line::from(Span::styled(self.text(), style)), area);
    }
}
