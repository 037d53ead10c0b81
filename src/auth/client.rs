use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::error::AuthFailure;
use crate::form::FormModel;
use crate::session::Session;

/// Email and password as typed into a sign-in or registration form.
#[derive(Clone, Default, Eq, PartialEq, FormModel)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub type BoxedAuthFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Session, AuthFailure>> + Send + 'a>>;

/// Remote sign-in and sign-up. Each call is one independent attempt: nothing is
/// deduplicated and nothing is retried.
pub trait AuthClient: Send + Sync {
    fn sign_in<'a>(&'a self, credentials: &'a Credentials) -> BoxedAuthFuture<'a>;
    fn sign_up<'a>(&'a self, credentials: &'a Credentials) -> BoxedAuthFuture<'a>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AuthFlow {
    SignIn,
    Register,
}

impl AuthFlow {
    pub fn call<'a>(
        self,
        client: &'a dyn AuthClient,
        credentials: &'a Credentials,
    ) -> BoxedAuthFuture<'a> {
        match self {
            AuthFlow::SignIn => client.sign_in(credentials),
            AuthFlow::Register => client.sign_up(credentials),
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            AuthFlow::SignIn => "Sign in",
            AuthFlow::Register => "Create account",
        }
    }

    pub const fn submit_label(self) -> &'static str {
        match self {
            AuthFlow::SignIn => "Sign In",
            AuthFlow::Register => "Register",
        }
    }
}
