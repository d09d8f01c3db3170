//! # Actions
//!
//! Everything that can happen in Daily Talk becomes an `Action`.
//! User saves a diary page? That's `Action::Submit`.
//! The completion call returns? That's `Action::ResponseReceived`.
//!
//! `update()` applies an action to the controller and tells the caller what
//! to do next through an `Effect`. The reducer itself never does I/O; the
//! runtime executes `Effect::RequestCompletion` and feeds the result back.
//!
//! ```text
//! Controller + Action  →  update()  →  Effect
//! ```

use log::debug;

use crate::core::entry::{Draft, EntryKey};
use crate::core::state::{CompletionJob, InteractionController};
use crate::core::surface::DisplaySurface;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Field contents changed. Drives the submit affordance.
    TextChanged(Draft),
    /// A diary day was opened.
    SelectionChanged(EntryKey),
    /// The open diary day was closed.
    SelectionCleared,
    /// The user asked to save. `key` is `None` for chat messages.
    Submit { key: Option<EntryKey>, draft: Draft },
    /// A completion call finished; `response` is already display text.
    ResponseReceived { key: EntryKey, response: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    RequestCompletion(CompletionJob),
    Quit,
}

pub fn update(
    controller: &mut InteractionController,
    surface: &mut dyn DisplaySurface,
    action: Action,
) -> Effect {
    match action {
        Action::TextChanged(draft) => {
            controller.text_changed(draft, surface);
            Effect::None
        }
        Action::SelectionChanged(key) => {
            controller.selection_changed(key, surface);
            Effect::None
        }
        Action::SelectionCleared => {
            controller.selection_cleared();
            Effect::None
        }
        Action::Submit { key, draft } => match controller.begin_submission(key, draft, surface) {
            Ok(job) => Effect::RequestCompletion(job),
            Err(rejection) => {
                debug!("Submission refused: {rejection}");
                Effect::None
            }
        },
        Action::ResponseReceived { key, response } => {
            if let Err(rejection) = controller.finish_submission(key, response, surface) {
                debug!("Response ignored: {rejection}");
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
