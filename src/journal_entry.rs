use crate::utils::{
    capitalize, count_characters, count_paragraphs, count_words, format_date, sanitize_text,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    /// Label supplied by a mood control outside the fixed vocabulary.
    Other(String),
}

/// Mood vocabulary in selector order; keys 1, 2, 3 map onto it.
pub const MOOD_VOCABULARY: [Mood; 3] = [Mood::Happy, Mood::Neutral, Mood::Sad];

impl Mood {
    pub fn from_index(index: usize) -> Option<Mood> {
        MOOD_VOCABULARY.get(index).cloned()
    }

    pub fn index(&self) -> Option<usize> {
        MOOD_VOCABULARY.iter().position(|m| m == self)
    }

    pub fn label(&self) -> &str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Other(label) => label,
        }
    }
}

impl From<String> for Mood {
    fn from(label: String) -> Self {
        match label.as_str() {
            "happy" => Mood::Happy,
            "neutral" => Mood::Neutral,
            "sad" => Mood::Sad,
            _ => Mood::Other(label),
        }
    }
}

impl From<Mood> for String {
    fn from(mood: Mood) -> Self {
        mood.label().to_string()
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The single in-progress journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub text: String,
    pub mood: Option<Mood>,
    pub date: NaiveDate,
    pub word_count: usize,
    pub char_count: usize,
}

impl Entry {
    pub fn empty(date: NaiveDate) -> Self {
        Entry {
            text: String::new(),
            mood: None,
            date,
            word_count: 0,
            char_count: 0,
        }
    }

    pub fn has_content(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn refresh_counts(&mut self) {
        self.word_count = count_words(&self.text);
        self.char_count = count_characters(&self.text);
    }

    /// Copy with counts matching the current text.
    pub fn snapshot(&self) -> Entry {
        let mut entry = self.clone();
        entry.refresh_counts();
        entry
    }

    pub fn stats(&self) -> EntryStats {
        let word_count = count_words(&self.text);
        let paragraph_count = count_paragraphs(&self.text);
        let avg = word_count as f64 / paragraph_count.max(1) as f64;
        EntryStats {
            word_count,
            char_count: count_characters(&self.text),
            char_count_no_spaces: self.text.chars().filter(|c| !c.is_whitespace()).count(),
            paragraph_count,
            avg_words_per_paragraph: avg.round() as usize,
            mood: self.mood.clone(),
            has_content: self.has_content(),
        }
    }

    pub fn export_as_text(&self) -> String {
        let stats = self.stats();
        let rule = "=".repeat(RULE_WIDTH);

        let mut out = format!("Journal Entry - {}\n", format_date(self.date));
        out.push_str(&rule);
        out.push_str("\n\n");
        if let Some(mood) = &self.mood {
            out.push_str(&format!("Mood: {}\n\n", capitalize(mood.label())));
        }
        out.push_str(&self.text);
        out.push_str("\n\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "Words: {} | Characters: {} | Paragraphs: {}",
            stats.word_count, stats.char_count, stats.paragraph_count
        ));
        out
    }

    /// Standalone HTML page with the export text, ready for printing.
    pub fn print_document(&self) -> String {
        format!(
            r#"<html>
    <head>
        <title>Journal Entry</title>
        <style>
            body {{ font-family: 'Courier New', monospace; line-height: 1.6; margin: 40px; }}
            pre {{ white-space: pre-wrap; word-wrap: break-word; }}
        </style>
    </head>
    <body>
        <pre>{}</pre>
    </body>
</html>
"#,
            sanitize_text(&self.export_as_text())
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(flatten)]
    pub entry: Entry,
    pub saved_at: DateTime<Utc>,
    pub is_draft: bool,
}

impl Draft {
    pub fn new(entry: Entry, saved_at: DateTime<Utc>) -> Self {
        Draft {
            entry,
            saved_at,
            is_draft: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedEntry {
    pub id: String,
    #[serde(flatten)]
    pub entry: Entry,
    pub saved_at: DateTime<Utc>,
    pub is_draft: bool,
}

impl SavedEntry {
    pub fn new(id: String, entry: Entry, saved_at: DateTime<Utc>) -> Self {
        SavedEntry {
            id,
            entry,
            saved_at,
            is_draft: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryStats {
    pub word_count: usize,
    pub char_count: usize,
    pub char_count_no_spaces: usize,
    pub paragraph_count: usize,
    pub avg_words_per_paragraph: usize,
    pub mood: Option<Mood>,
    pub has_content: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn entry(text: &str, mood: Option<Mood>) -> Entry {
        let mut entry = Entry::empty(day());
        entry.text = text.to_string();
        entry.mood = mood;
        entry
    }

    #[test]
    fn mood_labels_round_trip_through_strings() {
        assert_eq!(Mood::from("happy".to_string()), Mood::Happy);
        assert_eq!(
            Mood::from("excited".to_string()),
            Mood::Other("excited".to_string())
        );
        assert_eq!(String::from(Mood::Sad), "sad");
        assert_eq!(Mood::from_index(1), Some(Mood::Neutral));
        assert_eq!(Mood::from_index(3), None);
        assert_eq!(Mood::Sad.index(), Some(2));
        assert_eq!(Mood::Other("x".to_string()).index(), None);
    }

    #[test]
    fn export_reports_paragraphs_and_words() {
        let export = entry("Para one.\n\nPara two.", None).export_as_text();
        assert!(export.starts_with("Journal Entry - Friday, October 16, 2026\n"));
        assert!(!export.contains("Mood:"));
        assert!(export.ends_with("Words: 4 | Characters: 20 | Paragraphs: 2"));
    }

    #[test]
    fn export_capitalizes_mood() {
        let export = entry("Fine day", Some(Mood::Happy)).export_as_text();
        let expected = format!(
            "Journal Entry - Friday, October 16, 2026\n{rule}\n\nMood: Happy\n\nFine day\n\n{rule}\nWords: 2 | Characters: 8 | Paragraphs: 1",
            rule = "=".repeat(50)
        );
        assert_eq!(export, expected);
    }

    #[test]
    fn stats_cover_all_fields() {
        let stats = entry("one two three\n\nfour", Some(Mood::Sad)).stats();
        assert_eq!(stats.word_count, 4);
        assert_eq!(stats.char_count, 19);
        assert_eq!(stats.char_count_no_spaces, 15);
        assert_eq!(stats.paragraph_count, 2);
        assert_eq!(stats.avg_words_per_paragraph, 2);
        assert_eq!(stats.mood, Some(Mood::Sad));
        assert!(stats.has_content);
    }

    #[test]
    fn stats_on_empty_text_avoid_division_by_zero() {
        let stats = entry("   ", None).stats();
        assert_eq!(stats.word_count, 0);
        assert_eq!(stats.paragraph_count, 0);
        assert_eq!(stats.avg_words_per_paragraph, 0);
        assert!(!stats.has_content);
    }

    #[test]
    fn print_document_escapes_markup() {
        let html = entry("<script>alert(1)</script>", None).print_document();
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("<title>Journal Entry</title>"));
    }

    #[test]
    fn draft_serializes_flat_camel_case() {
        let saved_at = Utc.with_ymd_and_hms(2026, 10, 16, 8, 30, 0).unwrap();
        let draft = Draft::new(entry("Hi", Some(Mood::Neutral)).snapshot(), saved_at);
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["text"], "Hi");
        assert_eq!(value["mood"], "neutral");
        assert_eq!(value["date"], "2026-10-16");
        assert_eq!(value["wordCount"], 1);
        assert_eq!(value["charCount"], 2);
        assert_eq!(value["isDraft"], true);

        let back: Draft = serde_json::from_value(value).unwrap();
        assert_eq!(back, draft);
    }
}
