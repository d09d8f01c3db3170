//! # Calendar Component
//!
//! Month grid for diary mode. Arrow keys move the cursor by a day or a week,
//! PgUp/PgDn by a month, Enter opens the highlighted day.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `CalendarState` lives in `TuiState`
//! - `Calendar` is created each frame with borrowed state and the day marks

use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const WEEKDAYS: &str = "Mo  Tu  We  Th  Fr  Sa  Su";
const CELL_WIDTH: usize = 4;

/// Events emitted by the calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    Open(NaiveDate),
    Quit,
}

/// Persistent cursor state. The cursor never moves past `today`.
pub struct CalendarState {
    pub selected: NaiveDate,
    pub today: NaiveDate,
}

impl CalendarState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            selected: today,
            today,
        }
    }

    fn move_to(&mut self, target: Option<NaiveDate>) {
        if let Some(date) = target {
            self.selected = date.min(self.today);
        }
    }
}

impl EventHandler for CalendarState {
    type Event = CalendarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let selected = self.selected;
        match event {
            TuiEvent::CursorLeft => self.move_to(selected.checked_sub_days(Days::new(1))),
            TuiEvent::CursorRight => self.move_to(selected.checked_add_days(Days::new(1))),
            TuiEvent::CursorUp => self.move_to(selected.checked_sub_days(Days::new(7))),
            TuiEvent::CursorDown => self.move_to(selected.checked_add_days(Days::new(7))),
            TuiEvent::PageUp => self.move_to(selected.checked_sub_months(Months::new(1))),
            TuiEvent::PageDown => self.move_to(selected.checked_add_months(Months::new(1))),
            TuiEvent::Home => self.move_to(Some(self.today)),
            TuiEvent::Submit => return Some(CalendarEvent::Open(selected)),
            TuiEvent::Escape => return Some(CalendarEvent::Quit),
            _ => {}
        }
        None
    }
}

/// Transient render wrapper for the month grid.
pub struct Calendar<'a> {
    state: &'a CalendarState,
    /// Days of the shown month that have a finalized entry (Prop)
    written: BTreeSet<u32>,
    /// Days of the shown month with a request in flight (Prop)
    pending: BTreeSet<u32>,
}

impl<'a> Calendar<'a> {
    pub fn new(
        state: &'a CalendarState,
        written: impl IntoIterator<Item = NaiveDate>,
        pending: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        let month = (state.selected.year(), state.selected.month());
        let in_month = |d: &NaiveDate| (d.year(), d.month()) == month;
        Self {
            state,
            written: written.into_iter().filter(in_month).map(|d| d.day()).collect(),
            pending: pending.into_iter().filter(in_month).map(|d| d.day()).collect(),
        }
    }

    fn day_style(&self, date: NaiveDate) -> Style {
        let day = date.day();
        let mut style = if date > self.state.today {
            Style::default().fg(Color::DarkGray)
        } else if self.pending.contains(&day) {
            Style::default().fg(Color::Yellow)
        } else if self.written.contains(&day) {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        if date == self.state.today {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        if date == self.state.selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }

    fn grid_lines(&self) -> Vec<Line<'static>> {
        let selected = self.state.selected;
        let Some(first) = selected.with_day(1) else {
            return Vec::new();
        };
        let lead = first.weekday().num_days_from_monday() as usize;

        let mut lines = vec![
            Line::from(Span::styled(
                WEEKDAYS,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];
        let mut spans: Vec<Span<'static>> = vec![Span::raw(" ".repeat(lead * CELL_WIDTH))];
        let mut column = lead;
        let mut date = Some(first);
        while let Some(current) = date.filter(|d| d.month() == selected.month()) {
            spans.push(Span::styled(format!("{:>2}", current.day()), self.day_style(current)));
            column += 1;
            if column == 7 {
                lines.push(Line::from(std::mem::take(&mut spans)));
                column = 0;
            } else {
                spans.push(Span::raw("  "));
            }
            date = current.succ_opt();
        }
        if !spans.is_empty() {
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Component for Calendar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = format!(" {} ", self.state.selected.format("%B %Y"));
        let help = " ←↑↓→ Move  PgUp/PgDn Month  Enter Open  Esc Quit ";
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(help).centered())
            .padding(Padding::uniform(1));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Left-aligned grid, centered as a whole so the columns line up.
        let width = (WEEKDAYS.len() as u16).min(inner.width);
        let grid_area = Rect {
            x: inner.x + (inner.width - width) / 2,
            width,
            ..inner
        };
        frame.render_widget(Paragraph::new(self.grid_lines()), grid_area);
    }
}
