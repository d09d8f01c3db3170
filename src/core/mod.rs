//! # Core Application Logic
//!
//! This module contains Daily Talk's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Controller (state)   │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • SessionStore         │
//!                    └───────────┬─────────────┘
//!                                │ DisplaySurface
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │   Tests    │
//!     │  Adapter   │                          │ (recording │
//!     │ (ratatui)  │                          │  surface)  │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `InteractionController`, the per-key state machine
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`entry`]: `Entry`, `EntryKey`, `Draft` and validation
//! - [`store`]: `SessionStore`, the in-memory entry map
//! - [`surface`]: the `DisplaySurface` trait
//! - [`config`]: layered configuration and the `CredentialSource`

pub mod action;
pub mod config;
pub mod entry;
pub mod state;
pub mod store;
pub mod surface;
