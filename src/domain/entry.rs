//! Daily entry aggregate

use crate::domain::hashtags::extract_tags;
use crate::domain::message::{Message, Role};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day's dialogue, keyed by its calendar date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Milliseconds since the Unix epoch
    pub last_modified: i64,
}

impl DailyEntry {
    pub fn new(date: NaiveDate) -> Self {
        DailyEntry {
            date,
            messages: Vec::new(),
            summary: None,
            tags: None,
            last_modified: Utc::now().timestamp_millis(),
        }
    }

    /// ISO key under which this entry is stored
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn exchange_count(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Refresh derived fields before the entry is written.
    ///
    /// Tags come only from the user's own messages.
    pub fn touch(&mut self) {
        let tags = extract_tags(
            self.messages
                .iter()
                .filter(|m| m.role == Role::User)
                .map(|m| m.content.as_str()),
        );
        self.tags = if tags.is_empty() { None } else { Some(tags) };
        self.last_modified = Utc::now().timestamp_millis();
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.trim_start_matches('#').to_lowercase();
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| *t == wanted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_date_serializes_as_iso() {
        let entry = DailyEntry::new(date(2025, 1, 7));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["date"], "2025-01-07");
        assert!(json.get("lastModified").is_some());
        assert!(json.get("summary").is_none());
        assert_eq!(entry.key(), "2025-01-07");
    }

    #[test]
    fn test_deserializes_browser_shape() {
        let raw = r#"{
            "date": "2025-03-02",
            "messages": [
                {"id": "1", "role": "user", "content": "Hi", "timestamp": 1},
                {"id": "2", "role": "model", "content": "Hello", "timestamp": 2}
            ],
            "lastModified": 3
        }"#;
        let entry: DailyEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.date, date(2025, 3, 2));
        assert_eq!(entry.exchange_count(), 2);
        assert_eq!(entry.messages[1].role, Role::Model);
        assert_eq!(entry.tags, None);
    }

    #[test]
    fn test_touch_collects_user_tags_only() {
        let mut entry = DailyEntry::new(date(2025, 1, 7));
        entry.messages.push(Message::user("Anger at work today #Work #anger"));
        entry.messages.push(Message::model("Consider #Seneca on anger."));
        entry.touch();
        assert_eq!(
            entry.tags,
            Some(vec!["anger".to_string(), "work".to_string()])
        );
        assert!(entry.has_tag("#work"));
        assert!(!entry.has_tag("seneca"));
    }

    #[test]
    fn test_touch_without_tags_clears_field() {
        let mut entry = DailyEntry::new(date(2025, 1, 7));
        entry.tags = Some(vec!["stale".to_string()]);
        entry.messages.push(Message::user("No tags here"));
        entry.touch();
        assert_eq!(entry.tags, None);
    }
}
