//! Search-and-pick modal for codes that match several records
//!
//! Hidden, it holds no state and does no work. Visible, it has a scan input
//! with the same Enter contract as the scan field, and a result list.

use std::sync::Arc;

use crate::context::ConsoleContext;
use crate::remote::{ExactLookup, Lookup};
use crate::scan::{not_found_message, KeyPress, ScanInput};

const LOG_CONTEXT: &str = "picker";

pub struct PickModal<T> {
    visible: bool,
    input: ScanInput,
    results: Vec<T>,
    loading: bool,
    lookup: Arc<dyn ExactLookup<T>>,
    context: ConsoleContext,
}

impl<T: Clone + Send + 'static> PickModal<T> {
    pub fn new(lookup: Arc<dyn ExactLookup<T>>, context: ConsoleContext) -> Self {
        Self {
            visible: false,
            input: ScanInput::default(),
            results: Vec::new(),
            loading: false,
            lookup,
            context,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn open(&mut self) {
        self.visible = true;
    }

    /// Open with candidates already resolved, e.g. by an ambiguous scan
    pub fn open_with(&mut self, candidates: Vec<T>) {
        self.visible = true;
        self.results = candidates;
    }

    /// Close and forget the query and results
    pub fn close(&mut self) {
        self.visible = false;
        self.loading = false;
        self.input.clear();
        self.results.clear();
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        if self.visible {
            self.input.set(text);
        }
    }

    /// Enter runs the lookup; other keys are edits. Ignored while hidden.
    pub async fn on_key(&mut self, key_code: u32) {
        if !self.visible {
            return;
        }
        match self.input.on_key(key_code) {
            KeyPress::Edit => {}
            KeyPress::Blank => self.input.clear(),
            KeyPress::Submit(request) => {
                self.loading = true;
                let code = self.lookup.normalize_code(&request.code);
                let result = self.lookup.lookup_exact(&code).await;
                match result {
                    Ok(Lookup::One(entity)) => self.results = vec![entity],
                    Ok(Lookup::Many(candidates)) => self.results = candidates,
                    Ok(Lookup::NotFound) => {
                        self.results.clear();
                        self.context
                            .notifier
                            .info(not_found_message(self.context.language));
                    }
                    Err(err) => {
                        self.context
                            .logger
                            .error(LOG_CONTEXT, format!("lookup failed: {}", err));
                        self.context
                            .notifier
                            .error(&err.user_message(self.context.language));
                    }
                }
                self.input.clear();
                self.loading = false;
            }
        }
    }

    /// Hand the chosen row to `on_select`, then close
    pub fn pick(&mut self, index: usize, on_select: impl FnOnce(T)) -> bool {
        if !self.visible {
            return false;
        }
        let Some(chosen) = self.results.get(index).cloned() else {
            return false;
        };
        on_select(chosen);
        self.close();
        true
    }
}

impl<T> std::fmt::Debug for PickModal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickModal")
            .field("visible", &self.visible)
            .field("loading", &self.loading)
            .field("results", &self.results.len())
            .finish_non_exhaustive()
    }
}
