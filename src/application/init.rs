//! Initialize diary use case

use crate::domain::Settings;
use crate::error::Result;
use crate::infrastructure::{Config, DiaryRepository, JsonFileStore};
use std::fs;
use std::path::Path;

/// Initialize a new diary at the specified path.
pub fn init(path: &Path) -> Result<JsonFileStore> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let store = JsonFileStore::new(path.to_path_buf());
    store.initialize()?;
    store.save_config(&Config::default())?;
    store.save_settings(&Settings::default())?;

    tracing::info!(path = %path.display(), "diary initialized");
    Ok(store)
}
