#![allow(dead_code, deprecated)]

use assert_cmd::Command;
use chrono::NaiveDate;
use std::path::Path;
use stoic_diary::domain::{DailyEntry, Message};
use stoic_diary::infrastructure::{DiaryRepository, JsonFileStore};

pub fn stoic_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stoic").unwrap();
    cmd.env_remove("STOIC_ROOT");
    cmd.env_remove("STOIC_LOG");
    cmd.env_remove("GEMINI_API_KEY");
    cmd.env_remove("EDITOR");
    cmd.env_remove("VISUAL");
    cmd
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Store an entry whose messages alternate user/model, starting with the user
pub fn seed_entry(root: &Path, day: NaiveDate, lines: &[&str]) {
    let store = JsonFileStore::new(root.to_path_buf());
    let mut entry = DailyEntry::new(day);
    for (i, line) in lines.iter().enumerate() {
        entry.messages.push(if i % 2 == 0 {
            Message::user(*line)
        } else {
            Message::model(*line)
        });
    }
    entry.touch();
    store.save_entry(&entry).unwrap();
}
