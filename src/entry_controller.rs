//! Entry lifecycle: the in-progress journal entry, its mood, derived counts,
//! debounced draft persistence, save/reset and same-day draft recovery.
//!
//! State transitions:
//!
//! ```text
//! empty ──text/mood──▶ editing ──autosave (2s idle)──▶ editing + draft
//!   ▲                     │                                  │
//!   └──── save_entry ─────┴──────────────────────────────────┘
//!         (last-saved slot written, draft cleared, form reset)
//! ```
//!
//! Counts trail the text by the short debounce; the draft trails it by the
//! long one. Between a keystroke and those deadlines both are stale.

use crate::app_state::{AppState, StorageKey};
use crate::debounce::Debouncer;
use crate::error::{JournalError, Result};
use crate::journal_entry::{Draft, Entry, EntryStats, Mood, SavedEntry};
use crate::keymap::Keymap;
use crate::notifications::Severity;
use crate::signals::Signal;
use crate::utils::{current_date_iso, format_date, generate_unique_id};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// The rendering surface the controller reads from and writes to.
///
/// Offsets are in characters, not bytes.
pub trait EntryView {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);
    fn selection(&self) -> (usize, usize);
    fn set_selection(&mut self, start: usize, end: usize);
    fn focus(&mut self);
    fn blur(&mut self);
    fn has_focus(&self) -> bool;
    fn show_counts(&mut self, words: usize, chars: usize);
    fn set_submit_enabled(&mut self, enabled: bool);
    /// `None` clears every mood control; `Some(i)` activates control `i` only.
    fn set_active_mood(&mut self, index: Option<usize>);
    /// Label carried by the mood control at `index`, if such a control exists.
    fn mood_label(&self, index: usize) -> Option<String>;
    fn show_date(&mut self, label: &str, iso: &str);
}

#[derive(Debug, Clone)]
pub struct EditorSettings {
    pub tab_width: usize,
    pub counts_delay: Duration,
    pub autosave_delay: Duration,
}

impl Default for EditorSettings {
    fn default() -> Self {
        EditorSettings {
            tab_width: 4,
            counts_delay: Duration::from_millis(100),
            autosave_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled here; the surface must not apply its default behaviour.
    Consumed,
    Ignored,
}

pub struct JournalEntry<V: EntryView> {
    view: Option<V>,
    settings: EditorSettings,
    entry: Entry,
    current_mood: Option<Mood>,
    counts: Debouncer,
    autosave: Debouncer,
}

impl<V: EntryView> JournalEntry<V> {
    pub fn init(view: Option<V>, settings: EditorSettings, state: &mut AppState) -> Self {
        if view.is_none() {
            warn!("Journal text surface not found");
        }
        let today = state.clock.today();
        let mut controller = JournalEntry {
            view,
            counts: Debouncer::new(settings.counts_delay),
            autosave: Debouncer::new(settings.autosave_delay),
            settings,
            entry: Entry::empty(today),
            current_mood: None,
        };
        controller.set_current_date(state);
        controller.update_submit_state();
        controller.load_draft_on_startup(state);
        info!("Journal Entry Manager initialized");
        controller
    }

    pub fn view(&self) -> Option<&V> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut V> {
        self.view.as_mut()
    }

    pub fn current_entry(&self) -> Entry {
        self.entry.clone()
    }

    pub fn current_mood(&self) -> Option<&Mood> {
        self.current_mood.as_ref()
    }

    pub fn text_surface_focused(&self) -> bool {
        self.view.as_ref().is_some_and(|v| v.has_focus())
    }

    pub fn handle_text_changed(&mut self, new_text: String, state: &mut AppState) {
        self.entry.text = new_text;
        let now = state.clock.instant();
        self.counts.schedule(now);
        self.autosave.schedule(now);
        self.update_submit_state();
    }

    pub fn select_mood(&mut self, index: usize, state: &mut AppState) {
        let mood = Mood::from_index(index).or_else(|| {
            self.view
                .as_ref()
                .and_then(|v| v.mood_label(index))
                .map(Mood::from)
        });
        if let Some(view) = self.view.as_mut() {
            view.set_active_mood(Some(index));
        }
        self.current_mood = mood.clone();
        self.entry.mood = mood;
        self.autosave.schedule(state.clock.instant());

        match &self.current_mood {
            Some(mood) => info!("Mood selected: {}", mood),
            None => warn!("No mood defined for selector index {}", index),
        }
    }

    pub fn recompute_counts(&mut self) {
        self.entry.refresh_counts();
        if let Some(view) = self.view.as_mut() {
            view.show_counts(self.entry.word_count, self.entry.char_count);
        }
    }

    /// Runs whichever debounced work has come due.
    pub fn tick(&mut self, state: &mut AppState) {
        let now = state.clock.instant();
        if self.counts.take_due(now) {
            self.recompute_counts();
        }
        if self.autosave.take_due(now) {
            self.autosave_draft(state);
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.counts.deadline(), self.autosave.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn autosave_draft(&mut self, state: &mut AppState) {
        self.autosave.cancel();
        if !self.entry.has_content() {
            self.clear_draft(state);
            return;
        }

        let draft = Draft::new(self.entry.snapshot(), state.clock.now().to_utc());
        match state.store.set(StorageKey::Draft, &draft) {
            Ok(()) => info!("Draft auto-saved"),
            Err(e) => error!("Error auto-saving draft: {}", e),
        }
    }

    pub fn load_draft_on_startup(&mut self, state: &mut AppState) {
        let draft = match state.store.get::<Draft>(StorageKey::Draft) {
            Ok(Some(draft)) if draft.is_draft => draft,
            Ok(_) => return,
            Err(e) => {
                error!("Error loading draft: {}", e);
                return;
            }
        };

        if draft.entry.date != state.clock.today() {
            info!("Discarding draft from {}", draft.entry.date);
            self.clear_draft(state);
            return;
        }

        self.adopt(draft.entry);
        info!("Draft loaded successfully");
        state.notify("Draft restored from today", Severity::Info);
    }

    /// Loads an existing entry into the form for further editing.
    pub fn set_entry(&mut self, entry: Entry) {
        self.adopt(entry);
    }

    pub fn save_entry(&mut self, state: &mut AppState) -> Result<SavedEntry> {
        if !self.entry.has_content() {
            state.notify("Please write something before saving", Severity::Warning);
            self.focus_text_surface();
            return Err(JournalError::EmptyEntry);
        }

        let now = state.clock.now();
        let saved = SavedEntry::new(
            generate_unique_id("entry", &now),
            self.entry.snapshot(),
            now.to_utc(),
        );

        if let Err(e) = state.store.set(StorageKey::LastSavedEntry, &saved) {
            error!("Error saving entry: {}", e);
            state.notify("Error saving entry. Please try again.", Severity::Error);
            return Err(e);
        }

        self.clear_draft(state);
        self.reset_form(state);

        info!("Entry saved successfully");
        state.notify("Entry saved successfully!", Severity::Success);
        state.signals.emit(&Signal::EntrySaved(saved.clone()));
        Ok(saved)
    }

    /// Only the text is compared; a changed mood alone does not count.
    pub fn has_unsaved_changes(&self, state: &AppState) -> bool {
        if !self.entry.has_content() {
            return false;
        }
        match state.store.get::<SavedEntry>(StorageKey::LastSavedEntry) {
            Ok(Some(saved)) => saved.entry.text != self.entry.text,
            Ok(None) => true,
            Err(e) => {
                error!("Error reading last saved entry: {}", e);
                true
            }
        }
    }

    pub fn last_saved_entry(&self, state: &AppState) -> Option<SavedEntry> {
        state
            .store
            .get::<SavedEntry>(StorageKey::LastSavedEntry)
            .unwrap_or_else(|e| {
                error!("Error reading last saved entry: {}", e);
                None
            })
    }

    pub fn export_as_text(&self) -> String {
        self.entry.export_as_text()
    }

    pub fn print_document(&self) -> String {
        self.entry.print_document()
    }

    pub fn entry_stats(&self) -> EntryStats {
        let mut stats = self.entry.stats();
        stats.mood = self.current_mood.clone();
        stats
    }

    /// Focus the text surface with the cursor after the last character.
    pub fn focus_text_surface(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.focus();
            let end = view.text().chars().count();
            view.set_selection(end, end);
        }
    }

    /// Leaving the text surface saves the draft straight away.
    pub fn blur(&mut self, state: &mut AppState) {
        if let Some(view) = self.view.as_mut() {
            view.blur();
        }
        self.autosave_draft(state);
    }

    /// Keys pressed while the text surface has focus.
    pub fn handle_text_surface_key(
        &mut self,
        key: &KeyEvent,
        keymap: &Keymap,
        state: &mut AppState,
    ) -> KeyOutcome {
        if keymap.is_save(key) {
            // Empty-entry rejection is already reported to the user.
            let _ = self.save_entry(state);
            return KeyOutcome::Consumed;
        }
        if key.code == KeyCode::Tab && key.modifiers == KeyModifiers::NONE {
            self.insert_tab(state);
            return KeyOutcome::Consumed;
        }
        KeyOutcome::Ignored
    }

    /// Keys pressed anywhere else.
    pub fn handle_global_key(
        &mut self,
        key: &KeyEvent,
        keymap: &Keymap,
        state: &mut AppState,
    ) -> KeyOutcome {
        if self.text_surface_focused() {
            return KeyOutcome::Ignored;
        }
        if keymap.is_focus_editor(key) {
            self.focus_text_surface();
            return KeyOutcome::Consumed;
        }
        let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
        if let (KeyCode::Char(c @ '1'..='3'), true) = (key.code, plain) {
            self.select_mood((c as u8 - b'1') as usize, state);
            return KeyOutcome::Consumed;
        }
        KeyOutcome::Ignored
    }

    fn insert_tab(&mut self, state: &mut AppState) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let spaces = " ".repeat(self.settings.tab_width);
        let text = view.text();
        let (start, end) = view.selection();
        let (start, end) = (start.min(end), start.max(end));

        let mut updated: String = text.chars().take(start).collect();
        updated.push_str(&spaces);
        updated.extend(text.chars().skip(end));

        view.set_text(&updated);
        let cursor = start + self.settings.tab_width;
        view.set_selection(cursor, cursor);
        self.handle_text_changed(updated, state);
    }

    fn adopt(&mut self, entry: Entry) {
        self.entry = entry;
        if let Some(view) = self.view.as_mut() {
            view.set_text(&self.entry.text);
        }
        self.restore_mood_selection();
        self.recompute_counts();
        self.update_submit_state();
    }

    fn restore_mood_selection(&mut self) {
        self.current_mood = self.entry.mood.clone();
        let index = self.entry.mood.as_ref().and_then(Mood::index);
        if let Some(view) = self.view.as_mut() {
            view.set_active_mood(index);
        }
    }

    fn reset_form(&mut self, state: &mut AppState) {
        self.counts.cancel();
        self.autosave.cancel();
        if let Some(view) = self.view.as_mut() {
            view.set_text("");
            view.set_selection(0, 0);
            view.set_active_mood(None);
        }
        self.entry = Entry::empty(state.clock.today());
        self.current_mood = None;
        self.recompute_counts();
        self.update_submit_state();
        // The day may have rolled over since startup.
        self.set_current_date(state);
    }

    fn clear_draft(&mut self, state: &mut AppState) {
        if state.store.clear(StorageKey::Draft) {
            info!("Draft cleared");
        }
    }

    fn set_current_date(&mut self, state: &mut AppState) {
        let now = state.clock.now();
        self.entry.date = now.date_naive();
        if let Some(view) = self.view.as_mut() {
            view.show_date(&format_date(self.entry.date), &current_date_iso(&now));
        }
    }

    fn update_submit_state(&mut self) {
        let enabled = self.entry.has_content();
        if let Some(view) = self.view.as_mut() {
            view.set_submit_enabled(enabled);
        }
    }
}
