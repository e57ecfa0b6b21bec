//! Add/edit modal
//!
//! Holds a typed draft, validates it locally, sends it, and on success
//! resets, notifies, publishes a refresh and closes. On failure the draft
//! stays as entered so the user can retry.

use std::sync::Arc;

use shared::{Entity, EntityId, FieldError, FormSchema};

use crate::context::ConsoleContext;
use crate::error::{ConsoleError, ConsoleResult};
use crate::remote::Mutations;

const LOG_CONTEXT: &str = "form";

/// Form contents for each mode
#[derive(Debug, Clone, PartialEq)]
pub enum Draft<C, U> {
    Add(C),
    Edit { id: EntityId, input: U },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Add,
    Edit(EntityId),
}

/// Result of a submit attempt
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// The modal is not open
    Closed,
    /// A previous submit is still in flight
    Busy,
    /// Local validation failed; nothing was sent
    Invalid(FieldError),
    Saved(T),
    /// The server call failed; the draft is kept
    Failed(ConsoleError),
}

impl<T> SubmitOutcome<T> {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved(_))
    }
}

pub struct CrudModal<T, M: Mutations<T>> {
    mutations: Arc<M>,
    context: ConsoleContext,
    visible: bool,
    draft: Option<Draft<M::Create, M::Update>>,
    error: Option<FieldError>,
    in_flight: bool,
}

impl<T, M> CrudModal<T, M>
where
    T: Entity,
    M: Mutations<T>,
    M::Create: FormSchema + Clone,
    M::Update: FormSchema + Clone,
{
    pub fn new(mutations: Arc<M>, context: ConsoleContext) -> Self {
        Self {
            mutations,
            context,
            visible: false,
            draft: None,
            error: None,
            in_flight: false,
        }
    }

    pub fn open_add(&mut self, input: M::Create) {
        self.open(Draft::Add(input));
    }

    pub fn open_edit(&mut self, id: EntityId, input: M::Update) {
        self.open(Draft::Edit { id, input });
    }

    fn open(&mut self, draft: Draft<M::Create, M::Update>) {
        self.visible = true;
        self.draft = Some(draft);
        self.error = None;
    }

    /// Close and discard the draft
    pub fn close(&mut self) {
        self.visible = false;
        self.draft = None;
        self.error = None;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// A submit is in flight; the submit button renders disabled
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn mode(&self) -> Option<Mode> {
        self.draft.as_ref().map(|draft| match draft {
            Draft::Add(_) => Mode::Add,
            Draft::Edit { id, .. } => Mode::Edit(*id),
        })
    }

    pub fn draft(&self) -> Option<&Draft<M::Create, M::Update>> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut Draft<M::Create, M::Update>> {
        self.draft.as_mut()
    }

    /// Inline validation message from the last submit
    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    /// Validate and mark the modal busy. Returns the normalized payload to
    /// send, or the outcome that ends this submit.
    pub fn begin_submit(&mut self) -> Result<Draft<M::Create, M::Update>, SubmitOutcome<T>> {
        if !self.visible {
            return Err(SubmitOutcome::Closed);
        }
        if self.in_flight {
            return Err(SubmitOutcome::Busy);
        }
        let draft = self.draft.clone().ok_or(SubmitOutcome::Closed)?;

        let normalized = match draft {
            Draft::Add(input) => {
                let input = input.normalized();
                input.check().map(|()| Draft::Add(input))
            }
            Draft::Edit { id, input } => {
                let input = input.normalized();
                input.check().map(|()| Draft::Edit { id, input })
            }
        };

        match normalized {
            Ok(payload) => {
                self.error = None;
                self.in_flight = true;
                Ok(payload)
            }
            Err(field_error) => {
                self.error = Some(field_error.clone());
                Err(SubmitOutcome::Invalid(field_error))
            }
        }
    }

    /// Apply the server's answer to a submit started with [`Self::begin_submit`]
    pub fn finish_submit(&mut self, result: ConsoleResult<T>) -> SubmitOutcome<T> {
        self.in_flight = false;
        let language = self.context.language;
        let editing = matches!(self.mode(), Some(Mode::Edit(_)));

        match result {
            Ok(saved) => {
                self.close();
                self.context.notifier.success(if editing {
                    language.pick("Changes saved", "Cambios guardados")
                } else {
                    language.pick("Record created", "Registro creado")
                });
                self.context.bus.publish(T::KIND);
                SubmitOutcome::Saved(saved)
            }
            Err(err) => {
                self.context
                    .logger
                    .error(LOG_CONTEXT, format!("save {} failed: {}", T::KIND, err));
                self.context.notifier.error(&err.user_message(language));
                SubmitOutcome::Failed(err)
            }
        }
    }

    /// Validate, send and apply the answer
    pub async fn submit(&mut self) -> SubmitOutcome<T> {
        let payload = match self.begin_submit() {
            Ok(payload) => payload,
            Err(outcome) => return outcome,
        };
        let result = match &payload {
            Draft::Add(input) => self.mutations.create(input).await,
            Draft::Edit { id, input } => self.mutations.update(*id, input).await,
        };
        self.finish_submit(result)
    }
}

impl<T, M: Mutations<T>> std::fmt::Debug for CrudModal<T, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudModal")
            .field("visible", &self.visible)
            .field("in_flight", &self.in_flight)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}
