//! Collaborators handed to every interactive component

use std::sync::Arc;

use shared::Language;

use crate::events::RefreshBus;
use crate::logging::Logger;
use crate::notify::{LogNotifier, Notifier};

/// Logger, notifier, refresh bus and message language
#[derive(Clone)]
pub struct ConsoleContext {
    pub logger: Logger,
    pub notifier: Arc<dyn Notifier>,
    pub bus: RefreshBus,
    pub language: Language,
}

impl ConsoleContext {
    pub fn new(logger: Logger, notifier: Arc<dyn Notifier>, language: Language) -> Self {
        Self {
            logger,
            notifier,
            bus: RefreshBus::new(),
            language,
        }
    }

    /// Share an existing bus so components on different pages stay in sync
    pub fn with_bus(mut self, bus: RefreshBus) -> Self {
        self.bus = bus;
        self
    }
}

impl Default for ConsoleContext {
    fn default() -> Self {
        Self::new(Logger::default(), Arc::new(LogNotifier), Language::default())
    }
}

impl std::fmt::Debug for ConsoleContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleContext")
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}
