pub mod app;
pub mod app_state;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod editor;
pub mod entry_controller;
pub mod error;
pub mod journal_entry;
pub mod keymap;
pub mod logging;
pub mod notifications;
pub mod signals;
pub mod theme;
pub mod ui;
pub mod utils;
