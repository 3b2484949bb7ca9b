//! JSON file store for settings and daily entries

use crate::domain::{DailyEntry, Settings};
use crate::error::{DiaryError, Result};
use crate::infrastructure::Config;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the data directory inside a diary root
pub const STORE_DIR: &str = ".stoic";
const SETTINGS_FILE: &str = "settings.json";
const ENTRIES_FILE: &str = "entries.json";

/// All entries, keyed by calendar date
pub type EntryMap = BTreeMap<NaiveDate, DailyEntry>;

/// Abstract store for diary data
pub trait DiaryRepository {
    /// Get the root directory of this diary
    fn root(&self) -> &Path;

    fn load_config(&self) -> Result<Config>;

    fn save_config(&self, config: &Config) -> Result<()>;

    /// Stored settings, or defaults when none are readable
    fn load_settings(&self) -> Result<Settings>;

    fn save_settings(&self, settings: &Settings) -> Result<()>;

    fn load_entries(&self) -> Result<EntryMap>;

    fn get_entry(&self, date: NaiveDate) -> Result<Option<DailyEntry>>;

    /// Replace the stored entry for `entry.date` wholesale
    fn save_entry(&self, entry: &DailyEntry) -> Result<()>;

    /// Remove an entry; returns whether it existed
    fn delete_entry(&self, date: NaiveDate) -> Result<bool>;
}

/// File system implementation of DiaryRepository
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    pub root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: PathBuf) -> Self {
        JsonFileStore { root }
    }

    /// Discover diary root by walking up from current directory
    /// First checks STOIC_ROOT environment variable, then falls back to discovery
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var("STOIC_ROOT") {
            let path = PathBuf::from(root_path);
            if Self::has_store_dir(&path) {
                return Ok(JsonFileStore::new(path));
            }
            return Err(DiaryError::Config(format!(
                "STOIC_ROOT is set to '{}' but no {} directory found. \
                Run 'stoic init' in that directory or unset STOIC_ROOT.",
                path.display(),
                STORE_DIR
            )));
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover diary root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        start
            .ancestors()
            .find(|dir| Self::has_store_dir(dir))
            .map(|dir| JsonFileStore::new(dir.to_path_buf()))
            .ok_or_else(|| DiaryError::NotDiaryDirectory(start.to_path_buf()))
    }

    fn has_store_dir(path: &Path) -> bool {
        path.join(STORE_DIR).is_dir()
    }

    pub fn is_initialized(&self) -> bool {
        Self::has_store_dir(&self.root)
    }

    /// Create the .stoic directory; fails if it already exists
    pub fn initialize(&self) -> Result<()> {
        let store_dir = self.root.join(STORE_DIR);

        if store_dir.exists() {
            return Err(DiaryError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&store_dir)?;
        Ok(())
    }

    fn data_path(&self, file: &str) -> PathBuf {
        self.root.join(STORE_DIR).join(file)
    }

    /// Write to a temp file next to the target, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so we remove the destination first.
    fn write_atomic(&self, file: &str, content: &str) -> Result<()> {
        let path = self.data_path(file);
        let tmp_path = path.with_file_name(format!("{}.tmp-{}", file, std::process::id()));

        fs::write(&tmp_path, content)?;
        if cfg!(windows) && path.exists() {
            fs::remove_file(&path)?;
        }
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn write_entries(&self, entries: &EntryMap) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        self.write_atomic(ENTRIES_FILE, &json)
    }
}

impl DiaryRepository for JsonFileStore {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_config(&self) -> Result<Config> {
        Config::load_from_dir(&self.root)
    }

    fn save_config(&self, config: &Config) -> Result<()> {
        config.save_to_dir(&self.root)
    }

    fn load_settings(&self) -> Result<Settings> {
        let path = self.data_path(SETTINGS_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Settings::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load settings, using defaults");
                Ok(Settings::default())
            }
        }
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        self.write_atomic(SETTINGS_FILE, &json)?;
        tracing::info!("settings saved");
        Ok(())
    }

    fn load_entries(&self) -> Result<EntryMap> {
        let path = self.data_path(ENTRIES_FILE);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(EntryMap::new()),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(EntryMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse entries");
            DiaryError::CorruptStore(e.to_string())
        })
    }

    fn get_entry(&self, date: NaiveDate) -> Result<Option<DailyEntry>> {
        Ok(self.load_entries()?.remove(&date))
    }

    fn save_entry(&self, entry: &DailyEntry) -> Result<()> {
        let mut entries = self.load_entries()?;
        entries.insert(entry.date, entry.clone());
        self.write_entries(&entries)?;
        tracing::debug!(date = %entry.date, messages = entry.messages.len(), "entry saved");
        Ok(())
    }

    fn delete_entry(&self, date: NaiveDate) -> Result<bool> {
        let mut entries = self.load_entries()?;
        let existed = entries.remove(&date).is_some();
        if existed {
            self.write_entries(&entries)?;
            tracing::info!(%date, "entry deleted");
        }
        Ok(existed)
    }
}
