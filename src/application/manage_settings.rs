//! Settings and configuration management use case

use crate::domain::settings::DEFAULT_SYSTEM_PROMPT;
use crate::error::{DiaryError, Result};
use crate::infrastructure::store::STORE_DIR;
use crate::infrastructure::{DiaryRepository, EditorSession, JsonFileStore};

/// Keys accepted by `get` and `set`
pub const VALID_KEYS: &str = "api-key, user-name, system-prompt, model, api-base, timeout, editor";

/// Service for viewing and changing settings
pub struct SettingsService {
    repository: JsonFileStore,
}

impl SettingsService {
    pub fn new(repository: JsonFileStore) -> Self {
        SettingsService { repository }
    }

    /// Get a single value; the API key is masked
    pub fn get(&self, key: &str) -> Result<String> {
        let settings = self.repository.load_settings()?;

        match key {
            "api-key" => Ok(settings.masked_api_key()),
            "user-name" => Ok(settings.user_name),
            "system-prompt" => Ok(settings.system_prompt),
            _ => {
                let config = self.repository.load_config()?;
                match key {
                    "model" => Ok(config.model),
                    "api-base" => Ok(config.api_base),
                    "timeout" => Ok(config.timeout_secs.to_string()),
                    "editor" => Ok(config.editor),
                    "created" => Ok(config.created.to_rfc3339()),
                    _ => Err(unknown_key(key)),
                }
            }
        }
    }

    /// Set a single value
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        match key {
            "api-key" | "user-name" | "system-prompt" => {
                let mut settings = self.repository.load_settings()?;
                match key {
                    "api-key" => settings.api_key = value.trim().to_string(),
                    "user-name" => settings.user_name = value.to_string(),
                    _ => settings.system_prompt = value.to_string(),
                }
                self.repository.save_settings(&settings)
            }
            "model" | "api-base" | "timeout" | "editor" => {
                let mut config = self.repository.load_config()?;
                match key {
                    "model" => config.model = value.trim().to_string(),
                    "api-base" => config.api_base = value.trim().to_string(),
                    "timeout" => {
                        config.timeout_secs = value.trim().parse().map_err(|_| {
                            DiaryError::Config(format!(
                                "Invalid timeout: '{}'. Expected a number of seconds",
                                value
                            ))
                        })?;
                    }
                    _ => config.editor = value.to_string(),
                }
                self.repository.save_config(&config)
            }
            "created" => Err(DiaryError::Config(
                "Cannot modify 'created' field (read-only)".to_string(),
            )),
            _ => Err(unknown_key(key)),
        }
    }

    /// All values as key/value pairs, in display order
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let settings = self.repository.load_settings()?;
        let config = self.repository.load_config()?;

        Ok(vec![
            ("api-key", settings.masked_api_key()),
            ("user-name", settings.user_name),
            ("model", config.model),
            ("api-base", config.api_base),
            ("timeout", config.timeout_secs.to_string()),
            ("editor", config.editor),
            ("created", config.created.to_rfc3339()),
            ("system-prompt", settings.system_prompt),
        ])
    }

    /// Restore the built-in mentor persona
    pub fn reset_prompt(&self) -> Result<()> {
        let mut settings = self.repository.load_settings()?;
        settings.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
        self.repository.save_settings(&settings)
    }

    /// Edit the persona in the configured editor; returns whether it changed
    pub fn edit_prompt(&self) -> Result<bool> {
        let config = self.repository.load_config()?;
        let mut settings = self.repository.load_settings()?;

        let scratch = self.repository.root().join(STORE_DIR).join("persona.md");
        let editor = EditorSession::new(config.get_editor());
        let edited = editor.edit_text(&scratch, &settings.system_prompt)?;

        if edited.trim().is_empty() || edited == settings.system_prompt {
            return Ok(false);
        }

        settings.system_prompt = edited;
        self.repository.save_settings(&settings)?;
        Ok(true)
    }
}

fn unknown_key(key: &str) -> DiaryError {
    DiaryError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key, VALID_KEYS
    ))
}
