//! User settings record

use serde::{Deserialize, Serialize};

/// Persona used when the user has not customised one
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a Stoic mentor and philosopher. Your role is to help the user practice Stoicism through daily reflection.
1. Be concise, calm, and insightful.
2. Draw upon the wisdom of Marcus Aurelius, Seneca, and Epictetus, but speak naturally, not just quoting.
3. If it is morning, encourage \"Premeditatio Malorum\" (visualizing challenges) and setting virtuous intentions.
4. If it is evening, guide a review of the day: what went well, what didn't, and what can be improved.
5. Focus on the dichotomy of control: help the user distinguish between what is up to them and what is not.
";

pub const DEFAULT_USER_NAME: &str = "Traveler";

/// Environment variable that supplies a key when none is stored
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub api_key: String,
    pub user_name: String,
    pub system_prompt: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_key: String::new(),
            user_name: DEFAULT_USER_NAME.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

impl Settings {
    /// Stored key, or the environment key when none is stored
    pub fn effective_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.effective_api_key().is_some()
    }

    /// Key with all but the last four characters hidden
    pub fn masked_api_key(&self) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return "(not set)".to_string();
        }
        let chars: Vec<char> = key.chars().collect();
        let visible = chars.len().saturating_sub(4);
        let tail: String = chars[visible..].iter().collect();
        format!("{}{}", "*".repeat(visible.min(12)), tail)
    }
}
