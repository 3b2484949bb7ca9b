//! Export use case: Markdown files, merged documents and zip archives

use crate::domain::markdown::{
    archive_filename, entry_filename, format_entry, format_merged, merged_filename,
};
use crate::domain::DailyEntry;
use crate::error::{DiaryError, Result};
use crate::infrastructure::{DiaryRepository, JsonFileStore};
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Which entries a batch export covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Explicit days; days without an entry are skipped
    Dates(Vec<NaiveDate>),
    /// Inclusive date range, either end optional
    Range {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
    All,
}

/// Output layout of a batch export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchFormat {
    /// One Markdown file per day inside a zip archive
    #[default]
    Zip,
    /// All days in one Markdown document
    Merged,
}

impl FromStr for BatchFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "zip" => Ok(BatchFormat::Zip),
            "merged" | "merge" => Ok(BatchFormat::Merged),
            _ => Err(format!(
                "Invalid export format: '{}'. Valid formats: zip, merged",
                s
            )),
        }
    }
}

/// Write one archive member per entry
pub fn write_zip<W: Write + Seek>(
    writer: W,
    entries: &[DailyEntry],
    include_frontmatter: bool,
) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        zip.start_file(entry_filename(entry.date), options)?;
        zip.write_all(format_entry(entry, include_frontmatter).as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Service for exporting entries
pub struct ExportService {
    repository: JsonFileStore,
}

impl ExportService {
    pub fn new(repository: JsonFileStore) -> Self {
        ExportService { repository }
    }

    /// Markdown for a single day
    pub fn render_entry(&self, date: NaiveDate, include_frontmatter: bool) -> Result<String> {
        let entry = self
            .repository
            .get_entry(date)?
            .ok_or(DiaryError::EntryNotFound(date))?;
        Ok(format_entry(&entry, include_frontmatter))
    }

    /// Write `<date>-Stoic.md` into `dest_dir`
    pub fn export_entry(
        &self,
        date: NaiveDate,
        include_frontmatter: bool,
        dest_dir: &Path,
    ) -> Result<PathBuf> {
        let markdown = self.render_entry(date, include_frontmatter)?;
        fs::create_dir_all(dest_dir)?;
        let path = dest_dir.join(entry_filename(date));
        fs::write(&path, markdown)?;
        tracing::info!(path = %path.display(), "entry exported");
        Ok(path)
    }

    /// Entries covered by `selection`, oldest first
    pub fn select(&self, selection: &Selection) -> Result<Vec<DailyEntry>> {
        let mut entries = self.repository.load_entries()?;

        let selected: Vec<DailyEntry> = match selection {
            Selection::All => entries.into_values().collect(),
            Selection::Range { from, to } => entries
                .into_values()
                .filter(|e| from.map_or(true, |f| e.date >= f))
                .filter(|e| to.map_or(true, |t| e.date <= t))
                .collect(),
            Selection::Dates(dates) => {
                let mut dates = dates.clone();
                dates.sort();
                dates.dedup();
                dates
                    .into_iter()
                    .filter_map(|d| {
                        let entry = entries.remove(&d);
                        if entry.is_none() {
                            tracing::debug!(date = %d, "no entry, skipping");
                        }
                        entry
                    })
                    .collect()
            }
        };

        Ok(selected)
    }

    /// Export several entries into `dest_dir`; returns the written file.
    ///
    /// `now` stamps the file name (local date) and the merged frontmatter.
    pub fn export_batch(
        &self,
        selection: &Selection,
        format: BatchFormat,
        include_frontmatter: bool,
        dest_dir: &Path,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let entries = self.select(selection)?;
        if entries.is_empty() {
            return Err(DiaryError::NothingToExport);
        }

        fs::create_dir_all(dest_dir)?;
        let today = now.date_naive();

        let path = match format {
            BatchFormat::Zip => {
                let path = dest_dir.join(archive_filename(today));
                let file = fs::File::create(&path)?;
                write_zip(file, &entries, include_frontmatter)?;
                path
            }
            BatchFormat::Merged => {
                let path = dest_dir.join(merged_filename(today));
                fs::write(&path, format_merged(&entries, include_frontmatter, now.with_timezone(&Utc)))?;
                path
            }
        };

        tracing::info!(path = %path.display(), entries = entries.len(), "batch exported");
        Ok(path)
    }
}
