use super::controller::{FormController, SubmissionState, read_lock};
use super::fields::{FieldKey, FormModel};
use crate::error::FormResult;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Text,
    Password,
}

/// Everything a renderer needs to draw one labeled input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InputProps {
    pub name: FieldKey,
    pub id: String,
    pub label: String,
    pub kind: InputKind,
    pub value: String,
    pub required: bool,
    pub invalid: bool,
    pub aria_invalid: bool,
    pub error: Option<String>,
}

/// The submit button. `disabled` mirrors `loading`, which keeps a second submit from
/// starting while one is in flight.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubmitControl {
    pub label: String,
    pub loading: bool,
    pub disabled: bool,
}

impl SubmitControl {
    pub fn new(label: impl Into<String>, submission: &SubmissionState) -> Self {
        Self {
            label: label.into(),
            loading: submission.is_loading,
            disabled: submission.is_loading,
        }
    }
}

impl<M> FormController<M>
where
    M: FormModel,
{
    pub fn input_props(
        &self,
        key: FieldKey,
        label: impl Into<String>,
        kind: InputKind,
        required: bool,
    ) -> FormResult<InputProps> {
        let state = read_lock(&self.state, "reading input presentation")?;
        let error = state.field_errors.get(key.as_str()).map(str::to_owned);
        let value = state.fields.value(key.as_str()).to_owned();
        Ok(InputProps {
            id: key.as_str().to_owned(),
            name: key,
            label: label.into(),
            kind,
            value,
            required,
            invalid: error.is_some(),
            aria_invalid: error.is_some(),
            error,
        })
    }

    /// Top-level message shown above the submit control, present only after a
    /// rejected attempt.
    pub fn error_banner(&self) -> FormResult<Option<String>> {
        Ok(read_lock(&self.state, "reading error banner")?
            .submission
            .error
            .clone())
    }

    pub fn submit_control(&self, label: impl Into<String>) -> FormResult<SubmitControl> {
        let state = read_lock(&self.state, "reading submit control")?;
        Ok(SubmitControl::new(label, &state.submission))
    }
}
