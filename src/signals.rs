//! Observer list for application signals.
//!
//! Controllers emit signals without knowing who, if anyone, listens.
//! A failing listener is logged and skipped; the rest still run.

use crate::error::Result;
use crate::journal_entry::SavedEntry;
use crate::theme::Theme;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    EntrySaved(SavedEntry),
    ThemeChanged { theme: Theme, class: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    EntrySaved,
    ThemeChanged,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::EntrySaved(_) => SignalKind::EntrySaved,
            Signal::ThemeChanged { .. } => SignalKind::ThemeChanged,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.kind() {
            SignalKind::EntrySaved => "entrySaved",
            SignalKind::ThemeChanged => "themeChanged",
        }
    }
}

pub type Listener = Box<dyn FnMut(&Signal) -> Result<()>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct SignalBus {
    next_id: u64,
    listeners: Vec<(ListenerId, SignalKind, Listener)>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, kind: SignalKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, signal: &Signal) {
        let kind = signal.kind();
        let mut delivered = 0;
        for (_, listener_kind, listener) in self.listeners.iter_mut() {
            if *listener_kind != kind {
                continue;
            }
            delivered += 1;
            if let Err(e) = listener(signal) {
                error!("Error dispatching {} signal: {}", signal.name(), e);
            }
        }
        debug!("{} delivered to {} listener(s)", signal.name(), delivered);
    }
}
