//! Tool configuration (.stoic/config.toml)

use crate::error::{DiaryError, Result};
use crate::infrastructure::store::STORE_DIR;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
    pub editor: String,
    pub created: DateTime<Utc>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            editor: Self::detect_default_editor(),
            created: Utc::now(),
        }
    }
}

impl Config {
    /// Read `.stoic/config.toml` under `path`; absent keys take their defaults
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(STORE_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DiaryError::NotDiaryDirectory(path.to_path_buf())
            } else {
                DiaryError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| DiaryError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Write `.stoic/config.toml` under `path`, creating `.stoic/` if needed
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let store_dir = path.join(STORE_DIR);
        if !store_dir.exists() {
            fs::create_dir(&store_dir)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(store_dir.join(CONFIG_FILE), contents)?;
        Ok(())
    }

    /// Get the editor command, checking environment variables first
    pub fn get_editor(&self) -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| self.editor.clone())
    }

    fn detect_default_editor() -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| {
                if cfg!(windows) {
                    "notepad".to_string()
                } else {
                    "nano".to_string()
                }
            })
    }
}
