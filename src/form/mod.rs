mod binding;
mod controller;
mod fields;
mod validation;


pub use binding::{InputKind, InputProps, SubmitControl};
pub use controller::{
    FormController, FormSnapshot, SubmissionListener, SubmissionState, SubmitEvent,
    SubmitOutcome, SubmitState,
};
pub use fields::{FieldErrors, FieldKey, FieldSet, FormModel, InputEvent};
pub use jobboard_form_derive::FormModel;
pub use validation::{BoxedValidationFuture, Rule, Schema, ValidationResult, Validator, validate};
