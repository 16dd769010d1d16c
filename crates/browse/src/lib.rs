//! Interactive browse-and-select over a cloned skill repository.
//!
//! [`state`] is the pure session; [`browser`] drives it through a
//! [`prompt::Prompter`], which [`terminal::TerminalPrompter`] renders with
//! dialoguer.

pub mod browser;
pub mod error;
pub mod prompt;
pub mod state;
pub mod terminal;

pub use {
    browser::browse_and_select,
    error::{Error, Result},
    prompt::{Answer, Choice, NoteLevel, Prompt, Prompter, Validator},
    state::{Action, BrowseSession, Outcome},
    terminal::TerminalPrompter,
};
