//! Terminal text surface for the journal entry.

use crate::entry_controller::EntryView;
use crate::journal_entry::MOOD_VOCABULARY;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

/// Multi-line text buffer with a char-indexed selection, plus the display
/// state the entry controller pushes (counts, mood, date, submit).
#[derive(Debug, Default)]
pub struct EditorView {
    text: String,
    // (anchor, cursor) in chars
    selection: (usize, usize),
    focused: bool,
    counts: (usize, usize),
    submit_enabled: bool,
    active_mood: Option<usize>,
    date_label: String,
    date_iso: String,
}

impl EditorView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.selection.1
    }

    pub fn counts(&self) -> (usize, usize) {
        self.counts
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn active_mood(&self) -> Option<usize> {
        self.active_mood
    }

    pub fn date_label(&self) -> &str {
        &self.date_label
    }

    pub fn date_iso(&self) -> &str {
        &self.date_iso
    }

    /// Zero-based line and display column of the cursor.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before: String = self.text.chars().take(self.cursor()).collect();
        let line = before.matches('\n').count();
        let current = before.rsplit('\n').next().unwrap_or("");
        (line, current.width())
    }

    /// Applies an editing key. Returns true when the text changed.
    pub fn apply_key(&mut self, key: &KeyEvent) -> bool {
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        match key.code {
            KeyCode::Char(c) if plain => {
                self.insert_str(&c.to_string());
                true
            }
            KeyCode::Enter if plain => {
                self.insert_str("\n");
                true
            }
            KeyCode::Backspace => {
                if self.delete_selection() {
                    return true;
                }
                let cursor = self.cursor();
                if cursor == 0 {
                    return false;
                }
                self.remove_range(cursor - 1, cursor);
                true
            }
            KeyCode::Delete => {
                if self.delete_selection() {
                    return true;
                }
                let cursor = self.cursor();
                if cursor >= self.len() {
                    return false;
                }
                self.remove_range(cursor, cursor + 1);
                true
            }
            KeyCode::Left => {
                self.move_to(self.cursor().saturating_sub(1));
                false
            }
            KeyCode::Right => {
                self.move_to((self.cursor() + 1).min(self.len()));
                false
            }
            KeyCode::Up => {
                self.move_up();
                false
            }
            KeyCode::Down => {
                self.move_down();
                false
            }
            KeyCode::Home => {
                self.move_to(self.line_start(self.cursor()));
                false
            }
            KeyCode::End => {
                self.move_to(self.line_end(self.cursor()));
                false
            }
            _ => false,
        }
    }

    /// Replaces the selection with `s`; line endings are normalized to `\n`.
    pub fn insert_str(&mut self, s: &str) {
        let normalized = s.replace("\r\n", "\n").replace('\r', "\n");
        self.delete_selection();
        let cursor = self.cursor();
        let at = self.byte_index(cursor);
        self.text.insert_str(at, &normalized);
        self.move_to(cursor + normalized.chars().count());
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn move_to(&mut self, index: usize) {
        self.selection = (index, index);
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let (from, to) = (self.byte_index(start), self.byte_index(end));
        self.text.replace_range(from..to, "");
        self.move_to(start);
    }

    fn delete_selection(&mut self) -> bool {
        let (a, b) = self.selection;
        if a == b {
            return false;
        }
        self.remove_range(a.min(b), a.max(b));
        true
    }

    fn line_start(&self, index: usize) -> usize {
        self.text
            .chars()
            .take(index)
            .collect::<Vec<_>>()
            .iter()
            .rposition(|c| *c == '\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, index: usize) -> usize {
        self.text
            .chars()
            .skip(index)
            .position(|c| c == '\n')
            .map(|i| index + i)
            .unwrap_or_else(|| self.len())
    }

    fn move_up(&mut self) {
        let cursor = self.cursor();
        let current_start = self.line_start(cursor);
        if current_start == 0 {
            return;
        }
        let prev_start = self.line_start(current_start - 1);
        let prev_len = current_start - 1 - prev_start;
        let column = cursor - current_start;
        self.move_to(prev_start + column.min(prev_len));
    }

    fn move_down(&mut self) {
        let cursor = self.cursor();
        let current_end = self.line_end(cursor);
        if current_end >= self.len() {
            return;
        }
        let column = cursor - self.line_start(cursor);
        let next_start = current_end + 1;
        let next_len = self.line_end(next_start) - next_start;
        self.move_to(next_start + column.min(next_len));
    }
}

impl EntryView for EditorView {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        let len = self.len();
        let (a, b) = self.selection;
        self.selection = (a.min(len), b.min(len));
    }

    fn selection(&self) -> (usize, usize) {
        self.selection
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.len();
        self.selection = (start.min(len), end.min(len));
    }

    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn show_counts(&mut self, words: usize, chars: usize) {
        self.counts = (words, chars);
    }

    fn set_submit_enabled(&mut self, enabled: bool) {
        self.submit_enabled = enabled;
    }

    fn set_active_mood(&mut self, index: Option<usize>) {
        self.active_mood = index;
    }

    fn mood_label(&self, index: usize) -> Option<String> {
        MOOD_VOCABULARY.get(index).map(|m| m.label().to_string())
    }

    fn show_date(&mut self, label: &str, iso: &str) {
        self.date_label = label.to_string();
        self.date_iso = iso.to_string();
    }
}
