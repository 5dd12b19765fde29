//! Key chord parsing and matching.
//!
//! Parses chord strings like "ctrl+s" or "super+enter" from config and
//! matches them against crossterm key events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

pub const DEFAULT_SAVE: &[&str] = &["ctrl+s", "ctrl+enter", "super+s", "super+enter"];
// Terminals deliver ctrl+/ as ctrl+7 (0x1f).
pub const DEFAULT_FOCUS_EDITOR: &[&str] = &["ctrl+/", "ctrl+7", "super+/"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub key: KeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl KeyChord {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mods = event.modifiers;
        if self.ctrl != mods.contains(KeyModifiers::CONTROL)
            || self.alt != mods.contains(KeyModifiers::ALT)
            || self.meta != mods.intersects(KeyModifiers::SUPER | KeyModifiers::META)
        {
            return false;
        }
        if self.shift && !mods.contains(KeyModifiers::SHIFT) {
            return false;
        }
        match (&self.key, &event.code) {
            (KeyCode::Char(expected), KeyCode::Char(actual)) => {
                expected.eq_ignore_ascii_case(actual)
            }
            (expected, actual) => expected == actual,
        }
    }
}

pub fn parse_key_chord(input: &str) -> Option<KeyChord> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }

    let mut chord = KeyChord {
        key: KeyCode::Null,
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    // A trailing "+" is the plus key itself, e.g. "ctrl++".
    let (modifiers, key) = match trimmed.strip_suffix("++") {
        Some(rest) => (rest, "+"),
        None => match trimmed.rsplit_once('+') {
            Some((rest, key)) => (rest, key),
            None => ("", trimmed.as_str()),
        },
    };

    for part in modifiers.split('+').map(str::trim).filter(|p| !p.is_empty()) {
        match part {
            "ctrl" | "control" => chord.ctrl = true,
            "alt" | "option" => chord.alt = true,
            "shift" => chord.shift = true,
            "meta" | "cmd" | "super" => chord.meta = true,
            _ => return None,
        }
    }

    chord.key = parse_key(key.trim())?;
    Some(chord)
}

fn parse_key(key: &str) -> Option<KeyCode> {
    match key {
        "enter" | "return" => Some(KeyCode::Enter),
        "tab" => Some(KeyCode::Tab),
        "esc" | "escape" => Some(KeyCode::Esc),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        _ => {
            let mut chars = key.chars();
            let ch = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            Some(KeyCode::Char(ch))
        }
    }
}

#[derive(Debug, Clone)]
pub struct Keymap {
    pub save: Vec<KeyChord>,
    pub focus_editor: Vec<KeyChord>,
}

impl Keymap {
    pub fn from_bindings(save: &[String], focus_editor: &[String]) -> Self {
        Keymap {
            save: parse_all(save),
            focus_editor: parse_all(focus_editor),
        }
    }

    pub fn is_save(&self, event: &KeyEvent) -> bool {
        self.save.iter().any(|chord| chord.matches(event))
    }

    pub fn is_focus_editor(&self, event: &KeyEvent) -> bool {
        self.focus_editor.iter().any(|chord| chord.matches(event))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let save: Vec<String> = DEFAULT_SAVE.iter().map(|s| s.to_string()).collect();
        let focus: Vec<String> = DEFAULT_FOCUS_EDITOR.iter().map(|s| s.to_string()).collect();
        Keymap::from_bindings(&save, &focus)
    }
}

fn parse_all(bindings: &[String]) -> Vec<KeyChord> {
    bindings
        .iter()
        .filter_map(|binding| {
            let chord = parse_key_chord(binding);
            if chord.is_none() {
                warn!("Ignoring unparseable key binding '{}'", binding);
            }
            chord
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parse_key_chord_handles_modifiers() {
        let chord = parse_key_chord("Ctrl+S").expect("chord");
        assert_eq!(chord.key, KeyCode::Char('s'));
        assert!(chord.ctrl);
        assert!(!chord.alt && !chord.shift && !chord.meta);

        let chord = parse_key_chord("cmd+enter").expect("chord");
        assert_eq!(chord.key, KeyCode::Enter);
        assert!(chord.meta);

        let chord = parse_key_chord("ctrl+/").expect("chord");
        assert_eq!(chord.key, KeyCode::Char('/'));

        let chord = parse_key_chord("ctrl++").expect("chord");
        assert_eq!(chord.key, KeyCode::Char('+'));
    }

    #[test]
    fn parse_key_chord_rejects_garbage() {
        assert!(parse_key_chord("").is_none());
        assert!(parse_key_chord("hyper+s").is_none());
        assert!(parse_key_chord("ctrl+sss").is_none());
        assert!(parse_key_chord("ctrl+").is_none());
    }

    #[test]
    fn chord_matching_is_exact_on_modifiers() {
        let chord = parse_key_chord("ctrl+s").unwrap();
        assert!(chord.matches(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(chord.matches(&key(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT
        )));
        assert!(!chord.matches(&key(KeyCode::Char('s'), KeyModifiers::NONE)));
        assert!(!chord.matches(&key(
            KeyCode::Char('s'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
    }

    #[test]
    fn default_keymap_binds_save_and_focus() {
        let keymap = Keymap::default();
        assert!(keymap.is_save(&key(KeyCode::Char('s'), KeyModifiers::CONTROL)));
        assert!(keymap.is_save(&key(KeyCode::Enter, KeyModifiers::CONTROL)));
        assert!(keymap.is_save(&key(KeyCode::Char('s'), KeyModifiers::SUPER)));
        assert!(!keymap.is_save(&key(KeyCode::Enter, KeyModifiers::NONE)));

        assert!(keymap.is_focus_editor(&key(KeyCode::Char('/'), KeyModifiers::CONTROL)));
        assert!(keymap.is_focus_editor(&key(KeyCode::Char('7'), KeyModifiers::CONTROL)));
        assert!(!keymap.is_focus_editor(&key(KeyCode::Char('/'), KeyModifiers::NONE)));
    }

    #[test]
    fn from_bindings_skips_invalid_entries() {
        let keymap = Keymap::from_bindings(
            &["alt+w".to_string(), "nonsense+q".to_string()],
            &[],
        );
        assert_eq!(keymap.save.len(), 1);
        assert!(keymap.focus_editor.is_empty());
    }
}
