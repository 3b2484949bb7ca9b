//! stoic-diary - Terminal Stoic journal
//!
//! Keeps one chat transcript per day, talks to the Gemini API for a guided
//! morning preparation or evening review, and exports the dialogue as
//! Markdown notes or zip archives.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::DiaryError;
