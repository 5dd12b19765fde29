//! Configuration loading.
//!
//! Every key is optional; a missing file means built-in defaults.

use crate::entry_controller::EditorSettings;
use crate::error::{JournalError, Result};
use crate::keymap::{Keymap, DEFAULT_FOCUS_EDITOR, DEFAULT_SAVE};
use crate::theme::{Theme, DEFAULT_THEME};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

const APP_DIR: &str = "daily-journal";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub editor: EditorConfig,

    #[serde(default)]
    pub notifications: NotificationsConfig,

    #[serde(default)]
    pub theme: ThemeConfig,

    #[serde(default)]
    pub keymap: KeymapConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    #[serde(default = "default_counts_debounce")]
    pub counts_debounce_ms: u64,

    #[serde(default = "default_autosave_debounce")]
    pub autosave_debounce_ms: u64,
}

fn default_tab_width() -> usize {
    4
}

fn default_counts_debounce() -> u64 {
    100
}

fn default_autosave_debounce() -> u64 {
    2000
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: default_tab_width(),
            counts_debounce_ms: default_counts_debounce(),
            autosave_debounce_ms: default_autosave_debounce(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notification_duration")]
    pub duration_ms: u64,
}

fn default_notification_duration() -> u64 {
    3000
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_notification_duration(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ThemeConfig {
    #[serde(default = "default_theme_name")]
    pub default: String,

    #[serde(default = "default_follow_system")]
    pub follow_system: bool,
}

fn default_theme_name() -> String {
    DEFAULT_THEME.name().to_string()
}

fn default_follow_system() -> bool {
    true
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default: default_theme_name(),
            follow_system: default_follow_system(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_save_bindings")]
    pub save: Vec<String>,

    #[serde(default = "default_focus_bindings", alias = "focusEditor")]
    pub focus_editor: Vec<String>,
}

fn default_save_bindings() -> Vec<String> {
    DEFAULT_SAVE.iter().map(|s| s.to_string()).collect()
}

fn default_focus_bindings() -> Vec<String> {
    DEFAULT_FOCUS_EDITOR.iter().map(|s| s.to_string()).collect()
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            save: default_save_bindings(),
            focus_editor: default_focus_bindings(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportConfig {
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        parse_config(&content, path)
    }

    /// Explicit path if given, else the per-user default. A missing default
    /// file is not an error; a missing explicit one is.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn editor_settings(&self) -> EditorSettings {
        EditorSettings {
            tab_width: self.editor.tab_width,
            counts_delay: Duration::from_millis(self.editor.counts_debounce_ms),
            autosave_delay: Duration::from_millis(self.editor.autosave_debounce_ms),
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notifications.duration_ms)
    }

    /// Unknown names fall back to the built-in default.
    pub fn default_theme(&self) -> Theme {
        self.theme.default.parse().unwrap_or_else(|_| {
            warn!(
                "Unknown default theme '{}' in config, using {}",
                self.theme.default, DEFAULT_THEME
            );
            DEFAULT_THEME
        })
    }

    pub fn keymap(&self) -> Keymap {
        Keymap::from_bindings(&self.keymap.save, &self.keymap.focus_editor)
    }

    pub fn log_file(&self) -> PathBuf {
        self.logging.file.clone().unwrap_or_else(default_log_path)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export.dir.clone().unwrap_or_else(default_export_dir)
    }
}

pub fn parse_config(content: &str, path: &Path) -> Result<Config> {
    toml::from_str(content).map_err(|e| JournalError::ConfigParse {
        path: path.display().to_string(),
        details: e.to_string(),
    })
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".").join(APP_DIR))
}

fn default_log_path() -> PathBuf {
    data_dir().join("journal.log")
}

fn default_export_dir() -> PathBuf {
    data_dir().join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("", Path::new("config.toml")).unwrap();
        let editor = config.editor_settings();

        assert_eq!(editor.tab_width, 4);
        assert_eq!(editor.counts_delay, Duration::from_millis(100));
        assert_eq!(editor.autosave_delay, Duration::from_millis(2000));
        assert_eq!(config.notification_duration(), Duration::from_secs(3));
        assert_eq!(config.default_theme(), Theme::Brown);
        assert!(config.theme.follow_system);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.keymap.save.len(), DEFAULT_SAVE.len());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let toml = r#"
            [editor]
            tab_width = 2

            [theme]
            default = "light"
            follow_system = false

            [keymap]
            save = ["alt+s"]
        "#;
        let config = parse_config(toml, Path::new("config.toml")).unwrap();

        assert_eq!(config.editor.tab_width, 2);
        assert_eq!(config.editor.autosave_debounce_ms, 2000);
        assert_eq!(config.default_theme(), Theme::Light);
        assert!(!config.theme.follow_system);

        let keymap = config.keymap();
        assert!(keymap.is_save(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::ALT)));
        assert!(!keymap.is_save(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(keymap.is_focus_editor(&KeyEvent::new(
            KeyCode::Char('/'),
            KeyModifiers::CONTROL
        )));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = parse_config("[theme]\ndefault = \"neon\"\n", Path::new("c.toml")).unwrap();
        assert_eq!(config.default_theme(), DEFAULT_THEME);
    }

    #[test]
    fn malformed_toml_reports_path() {
        let err = parse_config("[editor\ntab_width = ", Path::new("/tmp/bad.toml")).unwrap_err();
        match err {
            JournalError::ConfigParse { path, .. } => assert_eq!(path, "/tmp/bad.toml"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[notifications]\nduration_ms = 500").unwrap();
        writeln!(file, "[export]\ndir = \"/tmp/journal-exports\"").unwrap();

        let config = Config::load_or_default(Some(file.path())).unwrap();
        assert_eq!(config.notification_duration(), Duration::from_millis(500));
        assert_eq!(config.export_dir(), PathBuf::from("/tmp/journal-exports"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_or_default(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(JournalError::Io(_))));
    }

    #[test]
    fn log_file_override() {
        let config =
            parse_config("[logging]\nfile = \"/var/tmp/j.log\"\n", Path::new("c.toml")).unwrap();
        assert_eq!(config.log_file(), PathBuf::from("/var/tmp/j.log"));
    }
}
