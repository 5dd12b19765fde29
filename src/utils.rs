use chrono::{DateTime, NaiveDate, TimeZone};
use rand::Rng;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// Count whitespace-delimited words. Blank text has zero words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Count characters of the raw text, whitespace included.
pub fn count_characters(text: &str) -> usize {
    text.chars().count()
}

/// Count blocks separated by one or more blank lines.
///
/// A line holding only whitespace counts as blank, and blocks that are empty
/// after trimming are not counted.
pub fn count_paragraphs(text: &str) -> usize {
    let mut paragraphs = 0;
    let mut in_paragraph = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_paragraph = false;
        } else if !in_paragraph {
            in_paragraph = true;
            paragraphs += 1;
        }
    }
    paragraphs
}

/// Long human-readable date, e.g. "Friday, October 16, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

pub fn current_date_iso<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    now.date_naive().format("%Y-%m-%d").to_string()
}

/// `<prefix>_<unix millis>_<9 random base36 chars>`
pub fn generate_unique_id<Tz: TimeZone>(prefix: &str, now: &DateTime<Tz>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, now.timestamp_millis(), suffix)
}

/// Escape text for safe embedding in markup.
pub fn sanitize_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
