//! Frame layout: title bar on top, then either the calendar (with the entry
//! popup over it) or the chat transcript above the message input.

use chrono::Datelike;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::Mode;
use crate::core::state::InteractionController;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Calendar, ChatLog, TitleBar};

/// Rows of text the chat input may grow to before it scrolls.
const MAX_INPUT_LINES: u16 = 6;

pub const WAITING_STATUS: &str = "Waiting for a response";

pub fn draw_ui(
    frame: &mut Frame,
    controller: &InteractionController,
    tui: &mut TuiState,
    spinner_frame: usize,
) {
    let [title_area, main_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(frame.area());

    let mut title_bar = TitleBar::new(controller.mode(), tui.model_name.clone());
    if controller.has_pending() {
        title_bar.status_message = WAITING_STATUS.to_string();
        title_bar.spinner_frame = Some(spinner_frame);
    }
    title_bar.render(frame, title_area);

    match controller.mode() {
        Mode::Diary => draw_diary(frame, main_area, controller, tui),
        Mode::Chat => draw_chat(frame, main_area, tui),
    }
}

fn draw_diary(frame: &mut Frame, area: Rect, controller: &InteractionController, tui: &mut TuiState) {
    let shown = tui.calendar.selected;
    let written = controller
        .store()
        .dates_in_month(shown.year(), shown.month());
    let pending = controller.pending_keys().filter_map(|key| key.as_date());
    Calendar::new(&tui.calendar, written, pending).render(frame, area);

    if let Some(form) = tui.form.as_mut() {
        form.render(frame, area);
    }
}

fn draw_chat(frame: &mut Frame, area: Rect, tui: &mut TuiState) {
    let input_height = tui.input.calculate_height(area.width, MAX_INPUT_LINES);
    let [log_area, input_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(input_height)]).areas(area);

    ChatLog::new(&mut tui.chat_log).render(frame, log_area);
    tui.input.focused = true;
    tui.input.render(frame, input_area);
}
