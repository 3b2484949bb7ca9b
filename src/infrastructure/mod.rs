//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod editor;
pub mod gemini;
pub mod store;

pub use config::Config;
pub use editor::EditorSession;
pub use gemini::{ChatBackend, GeminiClient};
pub use store::{DiaryRepository, JsonFileStore};
