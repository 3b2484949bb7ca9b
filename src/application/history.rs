//! Browsing past entries

use crate::domain::DailyEntry;
use crate::error::{DiaryError, Result};
use crate::infrastructure::{DiaryRepository, JsonFileStore};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Filters for listing entries
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

/// Service for reading the diary's history
pub struct HistoryService {
    repository: JsonFileStore,
}

impl HistoryService {
    pub fn new(repository: JsonFileStore) -> Self {
        HistoryService { repository }
    }

    /// Entries matching `options`, newest first
    pub fn list(&self, options: &ListOptions) -> Result<Vec<DailyEntry>> {
        let mut entries: Vec<DailyEntry> = self
            .repository
            .load_entries()?
            .into_values()
            .rev()
            .filter(|e| options.from.map_or(true, |f| e.date >= f))
            .filter(|e| options.to.map_or(true, |t| e.date <= t))
            .filter(|e| options.tag.as_deref().map_or(true, |tag| e.has_tag(tag)))
            .collect();

        if let Some(n) = options.limit {
            entries.truncate(n);
        }
        Ok(entries)
    }

    /// Exchange counts for each day of a month that has an entry
    pub fn month(&self, year: i32, month: u32) -> Result<BTreeMap<u32, usize>> {
        let counts = self
            .repository
            .load_entries()?
            .into_values()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .map(|e| (e.date.day(), e.exchange_count()))
            .collect();
        Ok(counts)
    }

    pub fn show(&self, date: NaiveDate) -> Result<DailyEntry> {
        self.repository
            .get_entry(date)?
            .ok_or(DiaryError::EntryNotFound(date))
    }

    pub fn delete(&self, date: NaiveDate) -> Result<()> {
        if self.repository.delete_entry(date)? {
            Ok(())
        } else {
            Err(DiaryError::EntryNotFound(date))
        }
    }
}
