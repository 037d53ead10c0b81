mod client;
mod form;
mod memory;

pub use client::{AuthClient, AuthFlow, BoxedAuthFuture, Credentials, CredentialsFields};
pub use form::{AuthForm, AuthFormView};
pub use memory::{ACCOUNT_EXISTS, INVALID_CREDENTIALS, InMemoryAuthBackend};
