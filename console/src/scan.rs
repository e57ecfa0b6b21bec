//! Barcode scanner field
//!
//! Scanners type the code and press Enter. Only Enter (key code 13)
//! resolves; every other key is a plain edit. The field is cleared after
//! each resolution, successful or not, so the next code can follow.

use std::sync::Arc;

pub use shared::ENTER_KEY_CODE;
use shared::{capitalize, scanner_placeholder, Entity, Language, ParentRef};

use crate::context::ConsoleContext;
use crate::error::ConsoleError;
use crate::remote::{ExactLookup, Lookup};

const LOG_CONTEXT: &str = "scan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

impl Key {
    pub fn from_code(code: u32) -> Self {
        if code == ENTER_KEY_CODE {
            Key::Enter
        } else {
            Key::Other
        }
    }
}

/// A code captured at the moment Enter was pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub code: String,
}

/// Result of pressing a key in a scan input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPress {
    /// Not Enter; nothing to do
    Edit,
    /// Enter on an empty or whitespace-only field
    Blank,
    Submit(ScanRequest),
}

/// Text buffer with the Enter-submits contract
#[derive(Debug, Clone, Default)]
pub struct ScanInput {
    value: String,
}

impl ScanInput {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.value = text.into();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    pub fn on_key(&self, key_code: u32) -> KeyPress {
        if Key::from_code(key_code) != Key::Enter {
            return KeyPress::Edit;
        }
        let code = self.value.trim();
        if code.is_empty() {
            KeyPress::Blank
        } else {
            KeyPress::Submit(ScanRequest {
                code: code.to_string(),
            })
        }
    }
}

/// What a scan resolved to
#[derive(Debug)]
pub enum ScanOutcome<T> {
    /// Blank code, no lookup made
    Skipped,
    Selected(T),
    /// Several records share the code
    Ambiguous(Vec<T>),
    NotFound,
    Failed(ConsoleError),
}

impl<T: Entity> ScanOutcome<T> {
    /// Parent reference to scope a batch listing with, on a single hit
    pub fn parent(&self) -> Option<ParentRef> {
        match self {
            ScanOutcome::Selected(entity) => Some(entity.as_parent()),
            _ => None,
        }
    }
}

/// Message shown when a code matches nothing
pub fn not_found_message(language: Language) -> &'static str {
    language.pick(
        "No record matches the scanned code",
        "No se encontró ningún registro con ese código",
    )
}

/// Scan field placeholder: the selected parent's name, or a waiting hint
pub fn placeholder(selected: Option<&ParentRef>, language: Language) -> String {
    match selected {
        Some(parent) => capitalize(&parent.name),
        None => scanner_placeholder(language).to_string(),
    }
}

/// Scan field bound to an exact lookup
pub struct ScanField<T> {
    input: ScanInput,
    lookup: Arc<dyn ExactLookup<T>>,
    context: ConsoleContext,
}

impl<T: Send + 'static> ScanField<T> {
    pub fn new(lookup: Arc<dyn ExactLookup<T>>, context: ConsoleContext) -> Self {
        Self {
            input: ScanInput::default(),
            lookup,
            context,
        }
    }

    pub fn value(&self) -> &str {
        self.input.value()
    }

    /// Ordinary edit
    pub fn set_value(&mut self, text: impl Into<String>) {
        self.input.set(text);
    }

    /// Handle a key press. `None` for anything but Enter.
    pub async fn on_key(&mut self, key_code: u32) -> Option<ScanOutcome<T>> {
        match self.input.on_key(key_code) {
            KeyPress::Edit => None,
            KeyPress::Blank => {
                self.input.clear();
                Some(ScanOutcome::Skipped)
            }
            KeyPress::Submit(request) => Some(self.resolve(request).await),
        }
    }

    /// Look the code up, report failures and clear the field
    pub async fn resolve(&mut self, request: ScanRequest) -> ScanOutcome<T> {
        let code = self.lookup.normalize_code(&request.code);
        tracing::debug!(%code, "scan lookup");
        let result = self.lookup.lookup_exact(&code).await;
        self.input.clear();

        match result {
            Ok(Lookup::One(entity)) => ScanOutcome::Selected(entity),
            Ok(Lookup::Many(candidates)) => ScanOutcome::Ambiguous(candidates),
            Ok(Lookup::NotFound) => {
                self.context
                    .notifier
                    .info(not_found_message(self.context.language));
                ScanOutcome::NotFound
            }
            Err(err) => {
                self.context
                    .logger
                    .error(LOG_CONTEXT, format!("lookup failed: {}", err));
                self.context
                    .notifier
                    .error(&err.user_message(self.context.language));
                ScanOutcome::Failed(err)
            }
        }
    }
}

impl<T> std::fmt::Debug for ScanField<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanField")
            .field("input", &self.input)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EntityId;

    #[test]
    fn test_only_enter_submits() {
        let mut input = ScanInput::default();
        input.set("7501234567890");
        assert_eq!(input.on_key(65), KeyPress::Edit);
        assert_eq!(
            input.on_key(ENTER_KEY_CODE),
            KeyPress::Submit(ScanRequest {
                code: "7501234567890".to_string()
            })
        );
    }

    #[test]
    fn test_blank_code_is_not_submitted() {
        let mut input = ScanInput::default();
        assert_eq!(input.on_key(ENTER_KEY_CODE), KeyPress::Blank);
        input.set("   ");
        assert_eq!(input.on_key(ENTER_KEY_CODE), KeyPress::Blank);
    }

    #[test]
    fn test_placeholder() {
        let parent = ParentRef::new(EntityId(2), "cera de abeja");
        assert_eq!(placeholder(Some(&parent), Language::Spanish), "Cera De Abeja");
        assert_eq!(placeholder(None, Language::Spanish), "Esperando scanner...");
        assert_eq!(placeholder(None, Language::English), "Waiting for scanner...");
    }
}
