//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status line with mode, model and status
//! - `Calendar`: month grid, created each frame around `CalendarState`
//! - `ChatLog`: transcript, created each frame around `ChatLogState`
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `TextField`: editable text with wrapping and a cursor
//! - `EntryForm`: diary popup made of two `TextField`s and the response
//!
//! Each component file carries its state types, event types, rendering,
//! event handling and tests.
//!
//! ```text
//! components/
//! ├── mod.rs
//! ├── title_bar.rs
//! ├── calendar.rs
//! ├── chat_log.rs
//! ├── entry_form.rs
//! └── text_field/     (cursor + wrapping helpers)
//! ```

pub mod calendar;
pub mod chat_log;
pub mod entry_form;
pub mod text_field;
mod title_bar;

pub use calendar::{Calendar, CalendarEvent, CalendarState};
pub use chat_log::{ChatLog, ChatLogState};
pub use entry_form::{EntryForm, FormEvent};
pub use text_field::{FieldEvent, TextField};
pub use title_bar::TitleBar;
