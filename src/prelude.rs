pub use crate::AppConfig;
pub use crate::auth::{AuthClient, AuthFlow, AuthForm, Credentials, InMemoryAuthBackend};
pub use crate::error::{AuthError, AuthFailure, SessionError, SubmitError};
pub use crate::form::{
    FieldErrors, FieldKey, FieldSet, FormController, FormModel, InputEvent, Rule, Schema,
    SubmissionState, SubmitEvent, SubmitOutcome, ValidationResult,
};
pub use crate::overlay::DialogState;
pub use crate::pages::SignInPage;
pub use crate::session::{Session, SessionContext, SessionSource};
