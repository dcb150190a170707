//! `kit`: a terminal assistant with resumable, per-mode chat sessions.
//!
//! ## Sessions
//!
//! Interactive modes (`normalchat`, `Websearch`, `codex`) run through
//! [`lifecycle::Controller`]: an optional resume menu ([`selector::choose`]),
//! a line loop ending on `exit` or end of input, and exactly one save through
//! [`chat_store::ChatStore`] on every exit path, interrupts included.
//!
//! ## Provider bootstrap
//!
//! - `KIT_PROVIDER=openai` (default) uses the Responses API and requires
//!   `OPENAI_API_KEY`; `KIT_OPENAI_BASE_URL` points it elsewhere.
//! - `KIT_PROVIDER=mock` answers offline with an echo of the input.
//!
//! ## Files
//!
//! `KIT_CONFIG_DIR` (default `~/.config/KIterminal`) holds `config.json`,
//! `instructions/<mode>.txt` and, unless `Chatpath` names another base, the
//! `KITchats` directory of saved sessions.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod instructions;
pub mod interaction;
pub mod interrupt;
pub mod lifecycle;
pub mod logging;
pub mod modes;
pub mod providers;
pub mod selector;

pub use error::KitError;
