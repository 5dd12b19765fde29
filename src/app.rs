use crate::app_state::AppState;
use crate::clock::Clock;
use crate::config::Config;
use crate::editor::EditorView;
use crate::entry_controller::{EntryView, JournalEntry, KeyOutcome};
use crate::error::Result;
use crate::journal_entry::EntryStats;
use crate::keymap::Keymap;
use crate::notifications::Severity;
use crate::signals::{Signal, SignalKind};
use crate::theme::{Theme, ThemeController, ThemeTarget};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::cell::Cell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Theme selector row plus the root theme class.
#[derive(Debug, Default)]
pub struct ThemeBar {
    classes: Vec<&'static str>,
    pressed: [bool; 3],
}

impl ThemeBar {
    pub fn active_theme(&self) -> Option<Theme> {
        self.classes.iter().find_map(|class| Theme::from_class(class))
    }

    pub fn is_pressed(&self, theme: Theme) -> bool {
        Theme::ALL
            .iter()
            .position(|t| *t == theme)
            .is_some_and(|i| self.pressed[i])
    }
}

impl ThemeTarget for ThemeBar {
    fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| *c != class);
    }

    fn add_class(&mut self, class: &'static str) {
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    fn set_pressed(&mut self, theme: Theme, pressed: bool) {
        if let Some(i) = Theme::ALL.iter().position(|t| *t == theme) {
            self.pressed[i] = pressed;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Export(String),
    Stats(EntryStats),
}

pub struct App {
    pub state: AppState,
    pub entry: JournalEntry<EditorView>,
    pub themes: ThemeController<ThemeBar>,
    keymap: Keymap,
    follow_system: bool,
    export_dir: PathBuf,
    overlay: Option<Overlay>,
    quit_armed: bool,
    should_quit: bool,
    saved_this_session: Rc<Cell<usize>>,
}

impl App {
    pub fn new(config: &Config, clock: Box<dyn Clock>, system_theme: Option<Theme>) -> Self {
        let mut state = AppState::new(clock, config.notification_duration());

        let saved_this_session = Rc::new(Cell::new(0));
        let counter = Rc::clone(&saved_this_session);
        state.signals.subscribe(
            SignalKind::EntrySaved,
            Box::new(move |_: &Signal| -> Result<()> {
                counter.set(counter.get() + 1);
                Ok(())
            }),
        );

        let follow_system = config.theme.follow_system;
        let system = if follow_system { system_theme } else { None };
        let themes = ThemeController::init(
            Some(ThemeBar::default()),
            config.default_theme(),
            system,
            &mut state,
        );
        let entry = JournalEntry::init(
            Some(EditorView::new()),
            config.editor_settings(),
            &mut state,
        );

        App {
            state,
            entry,
            themes,
            keymap: config.keymap(),
            follow_system,
            export_dir: config.export_dir(),
            overlay: None,
            quit_armed: false,
            should_quit: false,
            saved_this_session,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub fn saved_this_session(&self) -> usize {
        self.saved_this_session.get()
    }

    pub fn editor(&self) -> Option<&EditorView> {
        self.entry.view()
    }

    pub fn editing(&self) -> bool {
        self.entry.text_surface_focused()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            Event::FocusGained if self.follow_system => {
                if let Some(theme) = crate::theme::detect_system_theme() {
                    self.handle_system_preference(theme);
                }
            }
            _ => {}
        }
    }

    pub fn handle_system_preference(&mut self, theme: Theme) {
        self.themes
            .on_system_preference_changed(theme, &mut self.state);
    }

    /// Runs due debounced work and drops expired toasts.
    pub fn tick(&mut self) {
        self.entry.tick(&mut self.state);
        let now = self.state.clock.instant();
        self.state.notifications.expire(now);
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.entry.next_deadline(), self.state.notifications.next_expiry()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.overlay.is_some() {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('x') | KeyCode::Char('s')
            ) {
                self.overlay = None;
            }
            return;
        }
        if self.editing() {
            self.handle_editor_key(key);
        } else {
            self.handle_command_key(key);
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        let outcome = self
            .entry
            .handle_text_surface_key(&key, &self.keymap, &mut self.state);
        if outcome == KeyOutcome::Consumed {
            return;
        }
        if key.code == KeyCode::Esc {
            self.entry.blur(&mut self.state);
            return;
        }
        let changed = self
            .entry
            .view_mut()
            .is_some_and(|view| view.apply_key(&key));
        if changed {
            self.push_editor_text();
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if !self.editing() {
            return;
        }
        if let Some(view) = self.entry.view_mut() {
            view.insert_str(text);
        }
        self.push_editor_text();
    }

    fn push_editor_text(&mut self) {
        if let Some(text) = self.entry.view().map(|view| view.text()) {
            self.entry.handle_text_changed(text, &mut self.state);
        }
    }

    fn handle_command_key(&mut self, key: KeyEvent) {
        let quit_armed = std::mem::take(&mut self.quit_armed);

        let outcome = self
            .entry
            .handle_global_key(&key, &self.keymap, &mut self.state);
        if outcome == KeyOutcome::Consumed {
            return;
        }
        // Commands are bare keys; chords like ctrl+s only mean something in the editor.
        if !key.modifiers.difference(KeyModifiers::SHIFT).is_empty() {
            return;
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('i') => self.entry.focus_text_surface(),
            KeyCode::Char('d') => self.choose_theme(Theme::Dark),
            KeyCode::Char('l') => self.choose_theme(Theme::Light),
            KeyCode::Char('b') => self.choose_theme(Theme::Brown),
            KeyCode::Char('t') => self.themes.cycle_themes(&mut self.state),
            KeyCode::Char('T') => self.themes.toggle_dark_light(&mut self.state),
            KeyCode::Char('0') => self.themes.reset_to_default(&mut self.state),
            KeyCode::Char('x') => {
                self.overlay = Some(Overlay::Export(self.entry.export_as_text()));
            }
            KeyCode::Char('s') => {
                self.overlay = Some(Overlay::Stats(self.entry.entry_stats()));
            }
            KeyCode::Char('r') => self.reopen_last_saved(),
            KeyCode::Char('p') => match self.print_to_file() {
                Ok(path) => self.state.notify(
                    format!("Printed to {}", path.display()),
                    Severity::Success,
                ),
                Err(e) => {
                    error!("Error printing entry: {}", e);
                    self.state.notify("Could not print entry", Severity::Error);
                }
            },
            KeyCode::Char('q') => {
                if quit_armed || !self.entry.has_unsaved_changes(&self.state) {
                    self.should_quit = true;
                } else {
                    self.quit_armed = true;
                    self.state.notify(
                        "You have unsaved changes. Press q again to quit.",
                        Severity::Warning,
                    );
                }
            }
            _ => {}
        }
    }

    fn choose_theme(&mut self, theme: Theme) {
        if let Err(e) = self.themes.set_theme(theme.name(), &mut self.state) {
            warn!("Theme change failed: {}", e);
        }
    }

    fn reopen_last_saved(&mut self) {
        match self.entry.last_saved_entry(&self.state) {
            Some(saved) => {
                info!("Reopening entry {}", saved.id);
                self.entry.set_entry(saved.entry);
                self.state.notify("Last saved entry reopened", Severity::Info);
            }
            None => self.state.notify("No saved entry yet", Severity::Info),
        }
    }

    /// Writes the printable page of the current entry into the export directory.
    pub fn print_to_file(&mut self) -> Result<PathBuf> {
        fs::create_dir_all(&self.export_dir)?;
        let stamp = self.state.clock.now().format("%Y-%m-%d-%H%M%S");
        let path = self.export_dir.join(format!("journal-{}.html", stamp));
        fs::write(&path, self.entry.print_document())?;
        info!("Printed entry to {}", path.display());
        Ok(path)
    }
}
