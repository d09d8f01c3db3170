//! # Display Surface
//!
//! The seam between the core and whatever draws it. The controller pushes
//! state out through this trait; the surface reports user intent back as
//! `Action`s. The terminal UI in `crate::tui` is one implementation, the
//! recording surface in the tests is another.

use crate::core::entry::{Draft, Entry, EntryKey};

pub trait DisplaySurface {
    /// Show a finalized entry. Diary: fill the open form. Chat: append to the log.
    fn render_entry(&mut self, entry: &Entry);

    /// Show an empty form for `key`.
    fn render_blank(&mut self, key: &EntryKey);

    /// Show a submitted draft whose response has not arrived yet.
    fn render_pending(&mut self, key: &EntryKey, draft: &Draft);

    fn set_submit_enabled(&mut self, enabled: bool);

    fn set_fields_read_only(&mut self, read_only: bool);
}
