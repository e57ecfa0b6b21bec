//! Yes/no gate in front of destructive actions

/// Holds the target of a pending confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationModal<T> {
    pending: Option<T>,
    message: String,
}

impl<T> Default for ConfirmationModal<T> {
    fn default() -> Self {
        Self {
            pending: None,
            message: String::new(),
        }
    }
}

impl<T> ConfirmationModal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the question for `target`, replacing any earlier one
    pub fn ask(&mut self, target: T, message: impl Into<String>) {
        self.pending = Some(target);
        self.message = message.into();
    }

    pub fn is_visible(&self) -> bool {
        self.pending.is_some()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn target(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Close without effects
    pub fn decline(&mut self) {
        self.pending = None;
        self.message.clear();
    }

    /// Close and hand back the target. Later calls return `None`.
    pub fn accept(&mut self) -> Option<T> {
        self.message.clear();
        self.pending.take()
    }
}
