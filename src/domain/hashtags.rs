//! Hashtag extraction from message text

use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Regex for matching hashtags: #word, #word-with-dashes, #word_with_underscores
fn tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#([a-zA-Z0-9_-]+)").unwrap())
}

/// Collect tags from markdown text into `output`, skipping code blocks and inline code.
pub fn collect_tags(markdown: &str, output: &mut BTreeSet<String>) {
    let mut in_code_block = false;

    for event in MdParser::new(markdown) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(text) if !in_code_block => {
                for captures in tag_regex().captures_iter(&text) {
                    output.insert(captures[1].to_lowercase());
                }
            }
            _ => {}
        }
    }
}

/// Extract the sorted, de-duplicated tags from a set of texts
pub fn extract_tags<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut tags = BTreeSet::new();
    for text in texts {
        collect_tags(text, &mut tags);
    }
    tags.into_iter().collect()
}
