//! Cursor position tracking and navigation for the TextField.
//!
//! `CursorState` owns the cursor byte offset, scroll offset, and cached
//! geometry. All navigation methods accept `buffer: &str` explicitly; the
//! text itself is owned by `TextField`.

use super::text_wrap::{
    CONTENT_OFFSET_X, CONTENT_OFFSET_Y, display_width, inner_width, wrap_line_count, wrap_lines,
    wrap_options,
};
use ratatui::layout::Rect;

/// Cursor and scroll state, separated from the text buffer.
pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// Line offset for internal scrolling (0 when content fits in viewport)
    pub scroll_offset: u16,
    /// Cached content width from last render (used for cursor movement)
    pub last_content_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_content_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move cursor vertically (up or down) while trying to maintain column position.
    ///
    /// Returns `true` if cursor moved, `false` if already at boundary.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16) -> bool {
        let width = inner_width(self.last_content_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let lines = textwrap::wrap(buffer, wrap_options(width));
        if lines.is_empty() {
            return false;
        }

        // Byte length of a wrapped line including its trailing newline (if present)
        let line_byte_span = |line: &str, offset: usize| -> usize {
            let has_newline = offset + line.len() < buffer.len()
                && buffer.as_bytes()[offset + line.len()] == b'\n';
            line.len() + usize::from(has_newline)
        };

        let mut byte_offset = 0;
        let mut current_line_idx = 0;
        let mut column_in_line = 0;
        for (idx, line) in lines.iter().enumerate() {
            if byte_offset + line.len() >= self.pos {
                current_line_idx = idx;
                column_in_line = self.pos - byte_offset;
                break;
            }
            byte_offset += line_byte_span(line, byte_offset);
        }

        let target_line_idx = if direction < 0 {
            if current_line_idx == 0 {
                return false;
            }
            current_line_idx - 1
        } else {
            if current_line_idx >= lines.len() - 1 {
                return false;
            }
            current_line_idx + 1
        };

        let mut target_line_start = 0;
        for line in lines.iter().take(target_line_idx) {
            target_line_start += line_byte_span(line, target_line_start);
        }

        // Same column, clamped to the target line, snapped back onto a char boundary
        let target_line = &lines[target_line_idx];
        let mut target_column = column_in_line.min(target_line.len());
        while !target_line.is_char_boundary(target_column) {
            target_column -= 1;
        }
        self.pos = (target_line_start + target_column).min(buffer.len());
        true
    }

    /// Which wrapped line (0-based) the cursor is on.
    pub fn calculate_line(&self, buffer: &str, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 || self.pos == 0 {
            return 0;
        }
        wrap_lines(&buffer[..self.pos], width).len().saturating_sub(1) as u16
    }

    /// Update scroll offset to keep cursor visible within `visible` rows.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16, visible: u16) {
        let total_lines = wrap_line_count(buffer, inner_width(content_width));
        if total_lines <= visible {
            self.scroll_offset = 0;
            return;
        }

        let cursor_line = self.calculate_line(buffer, content_width);
        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + visible {
            self.scroll_offset = cursor_line.saturating_sub(visible - 1);
        }
    }

    /// Screen position for the cursor based on wrapped text layout.
    /// Returns (column, row) in screen coordinates.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let width = inner_width(area.width);
        let origin = (area.x + CONTENT_OFFSET_X, area.y + CONTENT_OFFSET_Y);
        if width == 0 {
            return origin;
        }

        let text_before_cursor = &buffer[..self.pos];
        let cursor_line = self.calculate_line(buffer, area.width);

        // Column from the last newline: textwrap trims trailing whitespace,
        // so wrapped line lengths would lose typed spaces.
        let last_newline = text_before_cursor
            .rfind('\n')
            .map(|pos| pos + 1)
            .unwrap_or(0);
        let logical_line_to_cursor = &text_before_cursor[last_newline..];
        let logical_line_wrapped = textwrap::wrap(logical_line_to_cursor, wrap_options(width));

        let cursor_col = if logical_line_wrapped.is_empty() {
            0
        } else {
            let width_of_prev_segments: u16 = logical_line_wrapped
                .iter()
                .take(logical_line_wrapped.len() - 1)
                .map(|seg| display_width(seg))
                .sum();
            display_width(logical_line_to_cursor).saturating_sub(width_of_prev_segments)
        };

        let visible_line = cursor_line.saturating_sub(self.scroll_offset);
        (
            origin.0 + cursor_col.min(width),
            origin.1 + visible_line,
        )
    }
}
