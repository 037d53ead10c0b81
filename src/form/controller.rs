use std::future::Future;
use std::marker::PhantomData;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::fields::{FieldErrors, FieldKey, FieldSet, FormModel, InputEvent};
use super::validation::{ValidationResult, Validator};
use crate::error::{AuthFailure, FormError, FormResult, SubmitError};

/// Phase of the form's submissions. `Validating` while any attempt is validating,
/// otherwise `Submitting` while any attempt is in flight, otherwise `Idle`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmitState {
    Idle,
    Validating,
    Submitting,
}

/// What the form shows around its submit control.
///
/// `is_loading` is true while at least one attempt is in flight. `error` only holds the
/// message of a rejected attempt and is cleared when the next valid attempt starts.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SubmissionState {
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Invalid(FieldErrors),
    Succeeded,
    /// The auth client refused the credentials with this message.
    Rejected(String),
}

/// Submit action raised by the rendering layer. The controller always prevents the
/// default action before doing anything else.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Clone, Debug)]
pub struct FormSnapshot {
    pub fields: FieldSet,
    pub field_errors: FieldErrors,
    pub submission: SubmissionState,
    pub submit_state: SubmitState,
    pub submit_count: u32,
    pub last_outcome: Option<SubmitOutcome>,
}

pub type SubmissionListener = Arc<dyn Fn(&SubmissionState) + Send + Sync>;

pub(super) struct FormState {
    pub(super) fields: FieldSet,
    pub(super) field_errors: FieldErrors,
    pub(super) submission: SubmissionState,
    pub(super) submit_state: SubmitState,
    pub(super) submit_count: u32,
    pub(super) last_outcome: Option<SubmitOutcome>,
    validating: u32,
    in_flight: u32,
}

/// Field store, validator and submission state of one form instance.
///
/// Clones share the same state. There is no re-entrancy guard: a second submit while
/// one is in flight runs independently and calls the action again. Hosts that want to
/// prevent it disable the submit control while `is_loading` is set.
pub struct FormController<M> {
    pub(super) state: Arc<RwLock<FormState>>,
    validator: Arc<dyn Validator>,
    listeners: Arc<RwLock<Vec<SubmissionListener>>>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Clone for FormController<M> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            validator: self.validator.clone(),
            listeners: self.listeners.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> FormController<M>
where
    M: FormModel,
{
    pub fn new(initial: M, validator: impl Validator + 'static) -> Self {
        Self::with_validator(initial, Arc::new(validator))
    }

    pub fn with_validator(initial: M, validator: Arc<dyn Validator>) -> Self {
        Self {
            state: Arc::new(RwLock::new(FormState {
                fields: initial.to_field_set(),
                field_errors: FieldErrors::new(),
                submission: SubmissionState::default(),
                submit_state: SubmitState::Idle,
                submit_count: 0,
                last_outcome: None,
                validating: 0,
                in_flight: 0,
            })),
            validator,
            listeners: Arc::new(RwLock::new(Vec::new())),
            _model: PhantomData,
        }
    }

    /// Stores `value` under `key`. Input never triggers validation.
    pub fn set_field(&self, key: impl Into<FieldKey>, value: impl Into<String>) -> FormResult<()> {
        let key = key.into();
        tracing::trace!(field = %key, "field input");
        write_lock(&self.state, "writing field value")?
            .fields
            .set_field(key, value);
        Ok(())
    }

    pub fn on_input(&self, event: &InputEvent) -> FormResult<()> {
        self.set_field(event.name.clone(), event.value.clone())
    }

    pub fn fields(&self) -> FormResult<FieldSet> {
        Ok(read_lock(&self.state, "reading fields")?.fields.clone())
    }

    pub fn model(&self) -> FormResult<M> {
        Ok(M::from_field_set(
            &read_lock(&self.state, "reading form model")?.fields,
        ))
    }

    pub fn field_errors(&self) -> FormResult<FieldErrors> {
        Ok(read_lock(&self.state, "reading field errors")?
            .field_errors
            .clone())
    }

    pub fn field_error(&self, key: &str) -> FormResult<Option<String>> {
        Ok(read_lock(&self.state, "reading field error")?
            .field_errors
            .get(key)
            .map(str::to_owned))
    }

    pub fn submission(&self) -> FormResult<SubmissionState> {
        Ok(read_lock(&self.state, "reading submission state")?
            .submission
            .clone())
    }

    pub fn snapshot(&self) -> FormResult<FormSnapshot> {
        let state = read_lock(&self.state, "creating form snapshot")?;
        Ok(FormSnapshot {
            fields: state.fields.clone(),
            field_errors: state.field_errors.clone(),
            submission: state.submission.clone(),
            submit_state: state.submit_state,
            submit_count: state.submit_count,
            last_outcome: state.last_outcome.clone(),
        })
    }

    /// Registers a listener called with the new submission state whenever
    /// `is_loading` or `error` changes.
    pub fn subscribe(
        &self,
        listener: impl Fn(&SubmissionState) + Send + Sync + 'static,
    ) -> FormResult<()> {
        write_lock(&self.listeners, "registering submission listener")?.push(Arc::new(listener));
        Ok(())
    }

    /// Runs one validation pass. Field errors are cleared first and replaced by the result.
    pub async fn validate(&self) -> FormResult<ValidationResult> {
        let fields = {
            let mut state = write_lock(&self.state, "starting validation")?;
            state.field_errors.clear();
            state.fields.clone()
        };

        tracing::debug!(fields = fields.len(), "validating form");
        let result = self.validator.validate(&fields).await;

        let mut state = write_lock(&self.state, "applying validation result")?;
        match &result {
            ValidationResult::Valid => state.field_errors.clear(),
            ValidationResult::Invalid(errors) => {
                tracing::debug!(invalid_fields = errors.len(), "form validation failed");
                state.field_errors = errors.clone();
            }
        }
        Ok(result)
    }

    /// Validates, then runs `action` with the typed model while `is_loading` is set.
    ///
    /// A rejected [`AuthFailure`] is consumed into `error`. Any unclassified failure
    /// is returned on the error channel after `is_loading` has been reset.
    pub async fn submit<F, Fut>(
        &self,
        event: &mut SubmitEvent,
        action: F,
    ) -> Result<SubmitOutcome, SubmitError>
    where
        F: FnOnce(M) -> Fut,
        Fut: Future<Output = Result<(), AuthFailure>>,
    {
        event.prevent_default();

        let attempt = {
            let mut state = write_lock(&self.state, "preparing submit")?;
            state.submit_count = state.submit_count.saturating_add(1);
            state.validating += 1;
            refresh_submit_state(&mut state)?;
            state.submit_count
        };
        let mut guard = AttemptGuard {
            controller: self,
            attempt,
            stage: AttemptStage::Validating,
        };

        if let ValidationResult::Invalid(errors) = self.validate().await? {
            let outcome = SubmitOutcome::Invalid(errors);
            guard.reject_invalid(outcome.clone())?;
            return Ok(outcome);
        }

        let model = guard.start_submitting()?;
        tracing::debug!(attempt, "submitting form");

        match action(model).await {
            Ok(()) => {
                guard.settle(None, SubmitOutcome::Succeeded)?;
                tracing::debug!(attempt, "submit succeeded");
                Ok(SubmitOutcome::Succeeded)
            }
            Err(AuthFailure::Rejected(error)) => {
                tracing::warn!(attempt, error = %error, "submit rejected");
                let outcome = SubmitOutcome::Rejected(error.message.clone());
                guard.settle(Some(error.message), outcome.clone())?;
                Ok(outcome)
            }
            Err(AuthFailure::Unclassified(error)) => {
                drop(guard);
                tracing::error!(attempt, error = %error, "unhandled submit failure");
                Err(SubmitError::Unclassified(error))
            }
        }
    }
}

impl<M> FormController<M> {
    fn notify(&self, submission: &SubmissionState) {
        let listeners = match self.listeners.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        for listener in listeners {
            listener(submission);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AttemptStage {
    Validating,
    Submitting,
    Settled,
}

/// Tracks one submit attempt. Dropping it before it settles, through an unclassified
/// failure or the future being dropped, releases the attempt and resets `is_loading`
/// once nothing else is in flight.
struct AttemptGuard<'a, M> {
    controller: &'a FormController<M>,
    attempt: u32,
    stage: AttemptStage,
}

impl<M: FormModel> AttemptGuard<'_, M> {
    fn reject_invalid(&mut self, outcome: SubmitOutcome) -> FormResult<()> {
        let mut state = write_lock(
            &self.controller.state,
            "handling submit validation failure",
        )?;
        self.stage = AttemptStage::Settled;
        state.validating = state.validating.saturating_sub(1);
        state.last_outcome = Some(outcome);
        refresh_submit_state(&mut state)
    }

    fn start_submitting(&mut self) -> FormResult<M> {
        let (model, submission) = {
            let mut state = write_lock(
                &self.controller.state,
                "moving submit state to submitting",
            )?;
            self.stage = AttemptStage::Submitting;
            state.validating = state.validating.saturating_sub(1);
            state.in_flight += 1;
            state.submission.error = None;
            state.submission.is_loading = true;
            refresh_submit_state(&mut state)?;
            (M::from_field_set(&state.fields), state.submission.clone())
        };
        self.controller.notify(&submission);
        Ok(model)
    }

    fn settle(mut self, error: Option<String>, outcome: SubmitOutcome) -> FormResult<()> {
        let submission = {
            let mut state = write_lock(&self.controller.state, "completing submit")?;
            self.stage = AttemptStage::Settled;
            release_in_flight(&mut state);
            state.submission.error = error;
            state.last_outcome = Some(outcome);
            refresh_submit_state(&mut state)?;
            state.submission.clone()
        };
        self.controller.notify(&submission);
        Ok(())
    }
}

impl<M> Drop for AttemptGuard<'_, M> {
    fn drop(&mut self) {
        if self.stage == AttemptStage::Settled {
            return;
        }
        let submission = {
            let mut state = match self.controller.state.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            match self.stage {
                AttemptStage::Validating => {
                    state.validating = state.validating.saturating_sub(1);
                }
                AttemptStage::Submitting => release_in_flight(&mut state),
                AttemptStage::Settled => {}
            }
            if let Err(error) = refresh_submit_state(&mut state) {
                tracing::error!(attempt = self.attempt, error = %error, "abandoned submit");
            }
            (self.stage == AttemptStage::Submitting).then(|| state.submission.clone())
        };
        if let Some(submission) = submission {
            self.controller.notify(&submission);
        }
    }
}

fn release_in_flight(state: &mut FormState) {
    state.in_flight = state.in_flight.saturating_sub(1);
    state.submission.is_loading = state.in_flight > 0;
}

/// Moves the phase to what the pending attempts imply. `Idle` is only reached once no
/// attempt is validating or in flight.
fn refresh_submit_state(state: &mut FormState) -> FormResult<()> {
    let next = if state.validating > 0 {
        SubmitState::Validating
    } else if state.in_flight > 0 {
        SubmitState::Submitting
    } else {
        SubmitState::Idle
    };
    let current = state.submit_state;
    if current == next {
        return Ok(());
    }

    let allowed = matches!(
        (current, next),
        (SubmitState::Idle, SubmitState::Validating)
            | (SubmitState::Submitting, SubmitState::Validating)
            | (SubmitState::Validating, SubmitState::Submitting)
            | (_, SubmitState::Idle)
    );
    if !allowed {
        return Err(FormError::InvalidStateTransition {
            from: current,
            to: next,
        });
    }
    state.submit_state = next;
    Ok(())
}

pub(super) fn read_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockReadGuard<'a, T>> {
    lock.read().map_err(|_| FormError::StatePoisoned(context))
}

pub(super) fn write_lock<'a, T>(
    lock: &'a RwLock<T>,
    context: &'static str,
) -> FormResult<RwLockWriteGuard<'a, T>> {
    lock.write().map_err(|_| FormError::StatePoisoned(context))
}
