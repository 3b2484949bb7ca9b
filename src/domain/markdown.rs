//! Markdown rendering of diary entries for export

use crate::domain::entry::DailyEntry;
use crate::domain::message::Message;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Tags every exported reflection carries
const BASE_TAGS: [&str; 3] = ["stoicism", "review", "diary"];

/// File name for a single exported entry
pub fn entry_filename(date: NaiveDate) -> String {
    format!("{}-Stoic.md", date.format("%Y-%m-%d"))
}

/// File name for a zip archive exported on `today`
pub fn archive_filename(today: NaiveDate) -> String {
    format!("stoic-diary-export-{}.zip", today.format("%Y-%m-%d"))
}

/// File name for a merged Markdown export made on `today`
pub fn merged_filename(today: NaiveDate) -> String {
    format!("stoic-diary-merged-{}.md", today.format("%Y-%m-%d"))
}

fn push_messages(out: &mut String, messages: &[Message]) {
    for msg in messages {
        out.push_str(&format!(
            "**{}**: {}\n\n",
            msg.role.display_name(),
            msg.content
        ));
    }
}

/// Render one entry as an Obsidian-friendly Markdown note
pub fn format_entry(entry: &DailyEntry, include_frontmatter: bool) -> String {
    let date = entry.key();
    let mut content = String::new();

    if include_frontmatter {
        let mut tags: Vec<&str> = BASE_TAGS.to_vec();
        for tag in entry.tags.iter().flatten() {
            if !tags.contains(&tag.as_str()) {
                tags.push(tag.as_str());
            }
        }

        content.push_str("---\n");
        content.push_str(&format!("date: {}\n", date));
        content.push_str("type: stoic-reflection\n");
        content.push_str(&format!("tags: [{}]\n", tags.join(", ")));
        content.push_str("---\n\n");
    }

    content.push_str(&format!("# Stoic Reflection - {}\n\n", date));
    push_messages(&mut content, &entry.messages);

    content
}

/// Render several entries into one document, oldest first
pub fn format_merged(
    entries: &[DailyEntry],
    include_frontmatter: bool,
    exported_at: DateTime<Utc>,
) -> String {
    let mut sorted: Vec<&DailyEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.date);

    let mut content = String::new();

    if include_frontmatter {
        content.push_str("---\n");
        content.push_str("type: stoic-reflection-summary\n");
        content.push_str(&format!(
            "exported_at: {}\n",
            exported_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ));
        content.push_str("---\n\n");
    }

    for entry in sorted {
        content.push_str(&format!("## {}\n\n", entry.key()));
        push_messages(&mut content, &entry.messages);
        content.push_str("---\n\n");
    }

    content
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::Message;
    use chrono::TimeZone;

    fn entry(y: i32, m: u32, d: u32, lines: &[(&str, bool)]) -> DailyEntry {
        let mut entry = DailyEntry::new(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        for (text, is_user) in lines {
            entry.messages.push(if *is_user {
                Message::user(*text)
            } else {
                Message::model(*text)
            });
        }
        entry
    }

    #[test]
    fn test_format_entry_with_frontmatter() {
        let e = entry(2025, 1, 17, &[("Hello", true), ("Greetings.", false)]);
        let md = format_entry(&e, true);
        assert_eq!(
            md,
            "---\n\
             date: 2025-01-17\n\
             type: stoic-reflection\n\
             tags: [stoicism, review, diary]\n\
             ---\n\n\
             # Stoic Reflection - 2025-01-17\n\n\
             **Me**: Hello\n\n\
             **Stoic Guide**: Greetings.\n\n"
        );
    }

    #[test]
    fn test_format_entry_without_frontmatter() {
        let e = entry(2025, 1, 17, &[("Hello", true)]);
        let md = format_entry(&e, false);
        assert!(md.starts_with("# Stoic Reflection - 2025-01-17\n\n"));
        assert!(!md.contains("---"));
    }

    #[test]
    fn test_frontmatter_includes_entry_tags_once() {
        let mut e = entry(2025, 1, 17, &[("Today #patience and #diary", true)]);
        e.touch();
        let md = format_entry(&e, true);
        assert!(md.contains("tags: [stoicism, review, diary, patience]\n"));
    }

    #[test]
    fn test_format_empty_entry() {
        let e = entry(2025, 1, 17, &[]);
        assert_eq!(format_entry(&e, false), "# Stoic Reflection - 2025-01-17\n\n");
    }

    #[test]
    fn test_format_merged_sorts_oldest_first() {
        let later = entry(2025, 2, 1, &[("Later", true)]);
        let earlier = entry(2025, 1, 5, &[("Earlier", true)]);
        let exported_at = Utc.with_ymd_and_hms(2025, 2, 2, 8, 30, 0).unwrap();

        let md = format_merged(&[later, earlier], true, exported_at);

        assert!(md.starts_with(
            "---\ntype: stoic-reflection-summary\nexported_at: 2025-02-02T08:30:00.000Z\n---\n\n"
        ));
        let first = md.find("## 2025-01-05").unwrap();
        let second = md.find("## 2025-02-01").unwrap();
        assert!(first < second);
        assert!(md.ends_with("**Me**: Later\n\n---\n\n"));
    }

    #[test]
    fn test_filenames() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        assert_eq!(entry_filename(d), "2025-01-07-Stoic.md");
        assert_eq!(archive_filename(d), "stoic-diary-export-2025-01-07.zip");
        assert_eq!(merged_filename(d), "stoic-diary-merged-2025-01-07.md");
    }
}
