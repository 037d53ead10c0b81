use std::sync::Arc;

use crate::auth::{AuthClient, AuthFlow, AuthForm, AuthFormView};
use crate::config::SchemaSet;
use crate::error::FormResult;
use crate::overlay::{DialogCloseReason, DialogState};
use crate::session::SessionContext;

pub const REGISTER_TOGGLE_LABEL: &str = "No account? Register here";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignInPageView {
    pub sign_in: AuthFormView,
    pub register_toggle_label: &'static str,
    /// Present only while the registration dialog is open.
    pub register: Option<AuthFormView>,
}

/// Sign-in form with a registration dialog layered on top.
///
/// The registration form lives as long as the page, so closing and reopening the
/// dialog shows the previous input and errors.
pub struct SignInPage {
    sign_in: AuthForm,
    register: AuthForm,
    register_dialog: DialogState,
}

impl SignInPage {
    pub fn new(schemas: &SchemaSet, client: Arc<dyn AuthClient>, session: SessionContext) -> Self {
        Self {
            sign_in: AuthForm::new(
                AuthFlow::SignIn,
                schemas.for_flow(AuthFlow::SignIn).clone(),
                client.clone(),
                session.clone(),
            ),
            register: AuthForm::new(
                AuthFlow::Register,
                schemas.for_flow(AuthFlow::Register).clone(),
                client,
                session,
            ),
            register_dialog: DialogState::default(),
        }
    }

    pub fn sign_in_form(&self) -> &AuthForm {
        &self.sign_in
    }

    pub fn toggle_register(&mut self) -> bool {
        self.register_dialog.toggle()
    }

    pub fn close_register(&mut self, reason: DialogCloseReason) {
        self.register_dialog.close(reason);
    }

    pub fn is_register_open(&self) -> bool {
        self.register_dialog.is_open()
    }

    pub fn register_dialog(&self) -> Option<&AuthForm> {
        self.register_dialog.is_open().then_some(&self.register)
    }

    pub fn view(&self) -> FormResult<SignInPageView> {
        Ok(SignInPageView {
            sign_in: self.sign_in.view()?,
            register_toggle_label: REGISTER_TOGGLE_LABEL,
            register: self.register_dialog().map(AuthForm::view).transpose()?,
        })
    }
}
