//! Output formatting utilities

use crate::domain::DailyEntry;
use chrono::{DateTime, Datelike, Local, NaiveDate};
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use std::collections::BTreeMap;

/// Format a list of entries for display
pub fn format_entry_list(entries: &[DailyEntry]) -> String {
    if entries.is_empty() {
        return "No entries found".to_string();
    }

    let mut output = String::new();
    for entry in entries {
        let count = entry.exchange_count();
        let noun = if count == 1 { "exchange" } else { "exchanges" };
        let mut line = format!("{}  {:>3} {}", entry.key(), count, noun);
        if let Some(tags) = &entry.tags {
            let tags: Vec<String> = tags.iter().map(|t| format!("#{}", t)).collect();
            line.push_str("  ");
            line.push_str(&tags.join(" "));
        }
        output.push_str(&line);
        output.push('\n');
    }
    output
}

/// Sunday-first month grid; written days are marked with `*` and listed below
pub fn format_calendar(year: i32, month: u32, counts: &BTreeMap<u32, usize>) -> String {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return String::new();
    };
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    let days_in_month = next_month
        .map(|n| n.signed_duration_since(first).num_days() as u32)
        .unwrap_or(31);

    let title = first.format("%B %Y").to_string();
    let mut output = format!("{:^35}\n", title).trim_end().to_string();
    output.push('\n');
    output.push_str(" Sun  Mon  Tue  Wed  Thu  Fri  Sat\n");

    let offset = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<String> = vec!["     ".to_string(); offset];
    for day in 1..=days_in_month {
        let marker = if counts.contains_key(&day) { '*' } else { ' ' };
        cells.push(format!("{:>4}{}", day, marker));
    }

    for week in cells.chunks(7) {
        output.push_str(week.concat().trim_end());
        output.push('\n');
    }

    if !counts.is_empty() {
        output.push('\n');
        for (day, count) in counts {
            let noun = if *count == 1 { "exchange" } else { "exchanges" };
            output.push_str(&format!(
                "{}-{:02}-{:02}  {} {}\n",
                year, month, day, count, noun
            ));
        }
    }

    output
}

/// Render a day's dialogue for the terminal
pub fn format_transcript(entry: &DailyEntry, today: NaiveDate) -> String {
    let heading = if entry.date == today {
        "Today's Session".to_string()
    } else {
        entry.key()
    };

    let mut output = format!("{}\nStoic Reflection\n\n", heading);

    if entry.is_empty() {
        output.push_str(
            "\"The happiness of your life depends upon the quality of your thoughts.\"\n",
        );
        return output;
    }

    for msg in &entry.messages {
        let time = DateTime::from_timestamp_millis(msg.timestamp)
            .map(|t| t.with_timezone(&Local).format(" (%H:%M)").to_string())
            .unwrap_or_default();
        output.push_str(&format!("{}{}:\n", msg.role.display_name(), time));
        for line in render_markdown(&msg.content).lines() {
            output.push_str("  ");
            output.push_str(line);
            output.push('\n');
        }
        output.push('\n');
    }

    output
}

/// Flatten Markdown into readable plain text
pub fn render_markdown(markdown: &str) -> String {
    let mut out = String::new();
    // One entry per open list: next number for ordered lists
    let mut lists: Vec<Option<u64>> = Vec::new();

    for event in MdParser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Rule => out.push_str("---\n\n"),
            Event::Start(Tag::List(start)) => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                lists.pop();
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                let indent = "  ".repeat(lists.len().saturating_sub(1));
                out.push_str(&indent);
                match lists.last_mut() {
                    Some(Some(n)) => {
                        out.push_str(&format!("{}. ", n));
                        *n += 1;
                    }
                    _ => out.push_str("• "),
                }
            }
            Event::End(TagEnd::Item) => {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Paragraph) => {
                out.push('\n');
                if lists.is_empty() {
                    out.push('\n');
                }
            }
            Event::End(TagEnd::Heading(_)) | Event::End(TagEnd::CodeBlock) => {
                out.push_str("\n\n");
            }
            _ => {}
        }
    }

    out.trim_end().to_string()
}
