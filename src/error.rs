//! Error types for stoic-diary

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the diary application
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error("Not a diary directory: {0}")]
    NotDiaryDirectory(PathBuf),

    #[error("Invalid day reference: {0}")]
    InvalidDayReference(String),

    #[error("No entry for {0}")]
    EntryNotFound(NaiveDate),

    #[error("No Gemini API key configured")]
    MissingApiKey,

    #[error("Cannot send an empty message")]
    EmptyMessage,

    #[error("Nothing to export")]
    NothingToExport,

    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Entries file is corrupt: {0}")]
    CorruptStore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl DiaryError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DiaryError::NotDiaryDirectory(_) => 2,
            DiaryError::InvalidDayReference(_) => 3,
            DiaryError::EntryNotFound(_) => 4,
            DiaryError::MissingApiKey => 5,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            DiaryError::NotDiaryDirectory(path) => {
                format!(
                    "Not a diary directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'stoic init' in this directory to create a new diary\n\
                    • Navigate to an existing diary directory\n\
                    • Set STOIC_ROOT environment variable to your diary path",
                    path.display()
                )
            }
            DiaryError::InvalidDayReference(day) => {
                format!(
                    "Invalid day reference: '{}'\n\n\
                    Valid day references:\n\
                    • today, yesterday, tomorrow\n\
                    • monday, tuesday, ..., sunday (most recent)\n\
                    • last monday, next friday, etc.\n\
                    • Specific dates: YYYY-MM-DD (e.g., 2025-01-17)\n\n\
                    Examples:\n\
                    stoic show yesterday\n\
                    stoic chat last monday\n\
                    stoic export 2025-01-15",
                    day
                )
            }
            DiaryError::EntryNotFound(date) => {
                format!(
                    "No entry for {}\n\n\
                    Suggestions:\n\
                    • Use 'stoic list' to see the days you have written\n\
                    • Use 'stoic calendar' to browse a month",
                    date.format("%Y-%m-%d")
                )
            }
            DiaryError::MissingApiKey => "No Gemini API key configured\n\n\
                To begin your journey:\n\
                • Run 'stoic config api-key <KEY>'\n\
                • Or set the GEMINI_API_KEY environment variable"
                .to_string(),
            DiaryError::Editor(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that your editor is installed and in PATH\n\
                    • Set EDITOR environment variable (e.g., export EDITOR=nano)\n\
                    • Configure editor: stoic config editor 'vim'",
                    msg
                )
            }
            DiaryError::Config(msg) if msg.contains("date format") => {
                format!(
                    "{}\n\n\
                    Expected format: YYYY-MM-DD\n\
                    Example: stoic list --from 2025-01-01 --to 2025-01-31",
                    msg
                )
            }
            DiaryError::Config(msg) if msg.contains("month format") => {
                format!("{}\n\nExpected format: YYYY-MM\nExample: stoic calendar 2025-01", msg)
            }
            DiaryError::NothingToExport => "Nothing to export\n\n\
                Suggestions:\n\
                • Pass one or more days: stoic export-batch 2025-01-15 yesterday\n\
                • Pass a range with --from/--to, or --all for every day\n\
                • Use 'stoic list' to see the days you have written"
                .to_string(),
            DiaryError::CorruptStore(_) => format!(
                "{}\n\nThe entries file was left untouched. Fix or move .stoic/entries.json aside.",
                self
            ),
            _ => self.to_string(),
        }
    }
}

/// Result type using DiaryError
pub type Result<T> = std::result::Result<T, DiaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_diary_directory_suggestion() {
        let err = DiaryError::NotDiaryDirectory(PathBuf::from("/tmp/test"));
        let msg = err.display_with_suggestions();
        assert!(msg.contains("stoic init"));
        assert!(msg.contains("STOIC_ROOT"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_invalid_day_reference_examples() {
        let err = DiaryError::InvalidDayReference("someday".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("'someday'"));
        assert!(msg.contains("YYYY-MM-DD"));
        assert!(msg.contains("stoic show yesterday"));
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_api_key_suggestions() {
        let err = DiaryError::MissingApiKey;
        let msg = err.display_with_suggestions();
        assert!(msg.contains("stoic config api-key"));
        assert!(msg.contains("GEMINI_API_KEY"));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn test_entry_not_found() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
        let err = DiaryError::EntryNotFound(date);
        assert!(err.display_with_suggestions().contains("2025-01-17"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_nothing_to_export_suggestions() {
        let msg = DiaryError::NothingToExport.display_with_suggestions();
        assert!(msg.starts_with("Nothing to export"));
        assert!(msg.contains("--all"));
        assert_eq!(DiaryError::NothingToExport.exit_code(), 1);
    }

    #[test]
    fn test_config_date_format_suggestions() {
        let err = DiaryError::Config("Invalid date format: 17-01-2025".to_string());
        let msg = err.display_with_suggestions();
        assert!(msg.contains("YYYY-MM-DD"));
        assert!(msg.contains("--from 2025-01-01"));
    }

    #[test]
    fn test_api_error_fallback() {
        let err = DiaryError::Api {
            status: 403,
            body: "denied".to_string(),
        };
        assert_eq!(err.display_with_suggestions(), "Gemini API error (403): denied");
        assert_eq!(err.exit_code(), 1);
    }
}
