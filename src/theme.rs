//! Theme switching: three named themes, exactly one active.
//!
//! The active theme is expressed on a `ThemeTarget` as one exclusive root
//! class plus pressed state on the selector controls. An explicit user choice
//! goes to the theme storage slot; startup and platform-driven changes do
//! not, so the platform preference keeps applying until the user picks.

use crate::app_state::{AppState, StorageKey};
use crate::error::{JournalError, Result};
use crate::signals::Signal;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    Light,
    Brown,
}

pub const DEFAULT_THEME: Theme = Theme::Brown;

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Dark, Theme::Light, Theme::Brown];

    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
            Theme::Brown => "brown",
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
            Theme::Brown => "theme-dark-brown",
        }
    }

    pub fn from_class(class: &str) -> Option<Theme> {
        Theme::ALL.into_iter().find(|t| t.class_name() == class)
    }

    pub fn next(self) -> Theme {
        let index = Theme::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Theme::ALL[(index + 1) % Theme::ALL.len()]
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette {
                background: Color::Rgb(24, 24, 27),
                foreground: Color::Rgb(228, 228, 231),
                muted: Color::Rgb(113, 113, 122),
                accent: Color::Rgb(56, 189, 248),
                border: Color::Rgb(63, 63, 70),
            },
            Theme::Light => Palette {
                background: Color::Rgb(250, 250, 249),
                foreground: Color::Rgb(28, 25, 23),
                muted: Color::Rgb(120, 113, 108),
                accent: Color::Rgb(37, 99, 235),
                border: Color::Rgb(214, 211, 209),
            },
            Theme::Brown => Palette {
                background: Color::Rgb(43, 33, 24),
                foreground: Color::Rgb(236, 224, 205),
                muted: Color::Rgb(150, 128, 104),
                accent: Color::Rgb(214, 154, 84),
                border: Color::Rgb(92, 71, 52),
            },
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = JournalError;

    fn from_str(s: &str) -> Result<Self> {
        Theme::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| JournalError::InvalidTheme(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
}

/// Platform light/dark preference as reported by the terminal.
pub fn detect_system_theme() -> Option<Theme> {
    std::env::var("COLORFGBG")
        .ok()
        .and_then(|value| theme_from_colorfgbg(&value))
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); the last field is the
/// background palette index.
pub fn theme_from_colorfgbg(value: &str) -> Option<Theme> {
    let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    if background <= 6 || background == 8 {
        Some(Theme::Dark)
    } else {
        Some(Theme::Light)
    }
}

/// Where the active theme is shown.
pub trait ThemeTarget {
    fn remove_class(&mut self, class: &str);
    fn add_class(&mut self, class: &'static str);
    fn set_pressed(&mut self, theme: Theme, pressed: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeInfo {
    pub current: Theme,
    pub available: [Theme; 3],
    pub default: Theme,
    pub saved: Option<Theme>,
}

pub struct ThemeController<T: ThemeTarget> {
    target: Option<T>,
    default_theme: Theme,
    active: Option<Theme>,
}

impl<T: ThemeTarget> ThemeController<T> {
    pub fn init(
        target: Option<T>,
        default_theme: Theme,
        system: Option<Theme>,
        state: &mut AppState,
    ) -> Self {
        if target.is_none() {
            warn!("Theme selector not found");
        }
        let mut controller = ThemeController {
            target,
            default_theme,
            active: None,
        };
        controller.load_saved_theme(system, state);
        info!("Theme Manager initialized");
        controller
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    /// Explicit user choice: applied and remembered.
    pub fn set_theme(&mut self, name: &str, state: &mut AppState) -> Result<()> {
        let theme = name.parse::<Theme>().inspect_err(|_| {
            warn!("Invalid theme name: {}", name);
        })?;
        self.apply(theme, state, true);
        Ok(())
    }

    pub fn saved_theme(&self, state: &AppState) -> Option<Theme> {
        match state.store.get::<Theme>(StorageKey::Theme) {
            Ok(saved) => saved,
            Err(e) => {
                error!("Error loading saved theme: {}", e);
                None
            }
        }
    }

    /// Stored choice, else platform preference, else the default.
    pub fn load_saved_theme(&mut self, system: Option<Theme>, state: &mut AppState) {
        let theme = self
            .saved_theme(state)
            .or(system)
            .unwrap_or(self.default_theme);
        self.apply(theme, state, false);
    }

    pub fn on_system_preference_changed(&mut self, system: Theme, state: &mut AppState) {
        if self.saved_theme(state).is_some() {
            return;
        }
        if self.active != Some(system) {
            self.apply(system, state, false);
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.active.unwrap_or(self.default_theme)
    }

    pub fn toggle_dark_light(&mut self, state: &mut AppState) {
        let next = if self.current_theme() == Theme::Dark {
            Theme::Light
        } else {
            Theme::Dark
        };
        self.apply(next, state, true);
    }

    pub fn cycle_themes(&mut self, state: &mut AppState) {
        let next = self.current_theme().next();
        self.apply(next, state, true);
    }

    pub fn reset_to_default(&mut self, state: &mut AppState) {
        self.apply(self.default_theme, state, true);
    }

    pub fn theme_info(&self, state: &AppState) -> ThemeInfo {
        ThemeInfo {
            current: self.current_theme(),
            available: Theme::ALL,
            default: self.default_theme,
            saved: self.saved_theme(state),
        }
    }

    fn apply(&mut self, theme: Theme, state: &mut AppState, persist: bool) {
        if let Some(target) = self.target.as_mut() {
            for t in Theme::ALL {
                target.remove_class(t.class_name());
            }
            target.add_class(theme.class_name());
            for t in Theme::ALL {
                target.set_pressed(t, t == theme);
            }
        }
        self.active = Some(theme);

        if persist {
            if let Err(e) = state.store.set(StorageKey::Theme, &theme) {
                error!("Error saving theme: {}", e);
            }
        }

        state.signals.emit(&Signal::ThemeChanged {
            theme,
            class: theme.class_name(),
        });
        info!("Theme changed to: {}", theme);
    }
}
