use std::sync::Arc;

use super::client::{AuthClient, AuthFlow, Credentials};
use crate::error::{AuthFailure, FormResult, SubmitError};
use crate::form::{
    FormController, FormModel, InputEvent, InputKind, InputProps, Schema, SubmitControl,
    SubmitEvent, SubmitOutcome,
};
use crate::session::SessionContext;

/// Presentation of an [`AuthForm`] at one point in time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthFormView {
    pub title: &'static str,
    pub email: InputProps,
    pub password: InputProps,
    pub error_banner: Option<String>,
    pub submit: SubmitControl,
}

/// A sign-in or registration form: the form controller bound to its flow, its schema,
/// the auth client and the shared session context.
#[derive(Clone)]
pub struct AuthForm {
    flow: AuthFlow,
    controller: FormController<Credentials>,
    schema: Arc<Schema>,
    client: Arc<dyn AuthClient>,
    session: SessionContext,
}

impl AuthForm {
    pub fn new(
        flow: AuthFlow,
        schema: Schema,
        client: Arc<dyn AuthClient>,
        session: SessionContext,
    ) -> Self {
        let schema = Arc::new(schema);
        Self {
            flow,
            controller: FormController::with_validator(Credentials::default(), schema.clone()),
            schema,
            client,
            session,
        }
    }

    pub fn flow(&self) -> AuthFlow {
        self.flow
    }

    pub fn controller(&self) -> &FormController<Credentials> {
        &self.controller
    }

    pub fn on_input(&self, event: &InputEvent) -> FormResult<()> {
        self.controller.on_input(event)
    }

    /// Validates, calls the flow's auth operation, then refetches the session before
    /// the loading state clears.
    pub async fn submit(&self, event: &mut SubmitEvent) -> Result<SubmitOutcome, SubmitError> {
        let flow = self.flow;
        let client = self.client.clone();
        let session = self.session.clone();
        self.controller
            .submit(event, move |credentials| async move {
                let authenticated = flow.call(client.as_ref(), &credentials).await?;
                tracing::info!(
                    flow = ?flow,
                    user_id = %authenticated.user_id,
                    "authenticated"
                );
                session.refetch().await?;
                Ok::<(), AuthFailure>(())
            })
            .await
    }

    pub fn email_input(&self) -> FormResult<InputProps> {
        let key = Credentials::fields().email();
        let required = self.schema.is_required(key.as_str());
        self.controller
            .input_props(key, "Email", InputKind::Text, required)
    }

    pub fn password_input(&self) -> FormResult<InputProps> {
        let key = Credentials::fields().password();
        let required = self.schema.is_required(key.as_str());
        self.controller
            .input_props(key, "Password", InputKind::Password, required)
    }

    pub fn error_banner(&self) -> FormResult<Option<String>> {
        self.controller.error_banner()
    }

    pub fn submit_control(&self) -> FormResult<SubmitControl> {
        self.controller.submit_control(self.flow.submit_label())
    }

    pub fn view(&self) -> FormResult<AuthFormView> {
        Ok(AuthFormView {
            title: self.flow.title(),
            email: self.email_input()?,
            password: self.password_input()?,
            error_banner: self.error_banner()?,
            submit: self.submit_control()?,
        })
    }
}
