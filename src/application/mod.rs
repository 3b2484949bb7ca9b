//! Application layer - Use cases and orchestration

pub mod chat;
pub mod export;
pub mod history;
pub mod init;
pub mod manage_settings;

pub use chat::{ChatOutcome, ChatService};
pub use export::{BatchFormat, ExportService, Selection};
pub use history::{HistoryService, ListOptions};
pub use manage_settings::SettingsService;
